//! PID 控制器命令

use crate::config::{CliConfig, ControllerConfig};
use anyhow::{Result, bail};
use clap::Subcommand;
use kobuki_sdk::PidGains;

/// PID 控制器设置
#[derive(Subcommand, Debug)]
pub enum PidCommand {
    /// 恢复出厂增益
    Default,

    /// 设置用户增益（未指定时使用配置文件中的 [controller]）
    User {
        #[arg(long, requires_all = ["ki", "kd"])]
        kp: Option<f64>,
        #[arg(long, requires_all = ["kp", "kd"])]
        ki: Option<f64>,
        #[arg(long, requires_all = ["kp", "ki"])]
        kd: Option<f64>,
    },
}

impl PidCommand {
    /// 解析最终使用的用户增益
    pub fn user_gains(
        config: &CliConfig,
        kp: Option<f64>,
        ki: Option<f64>,
        kd: Option<f64>,
    ) -> Result<PidGains> {
        let controller = match (kp, ki, kd) {
            (Some(kp), Some(ki), Some(kd)) => ControllerConfig { kp, ki, kd },
            _ => match config.controller {
                Some(controller) => controller,
                None => bail!("未指定增益，且配置文件中没有 [controller]"),
            },
        };
        if [controller.kp, controller.ki, controller.kd]
            .iter()
            .any(|g| !g.is_finite() || *g < 0.0)
        {
            bail!("增益必须是非负有限值: {:?}", controller);
        }
        Ok(controller.gains())
    }

    pub fn execute(&self, config: &CliConfig, port: Option<&str>) -> Result<()> {
        match *self {
            PidCommand::Default => {
                let mut kobuki = super::connect(config, port)?;
                kobuki.set_controller_default()?;
                println!("✅ 已恢复出厂 PID 增益");
            },
            PidCommand::User { kp, ki, kd } => {
                let gains = Self::user_gains(config, kp, ki, kd)?;
                let mut kobuki = super::connect(config, port)?;
                kobuki.set_controller_user(gains)?;
                println!("✅ 已设置用户 PID 增益 kp={} ki={} kd={}", gains.kp, gains.ki, gains.kd);
            },
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_gains_win() {
        let config = CliConfig {
            controller: Some(ControllerConfig {
                kp: 1.0,
                ki: 1.0,
                kd: 1.0,
            }),
            ..Default::default()
        };
        let gains = PidCommand::user_gains(&config, Some(100.0), Some(0.1), Some(2.0)).unwrap();
        assert_eq!(gains, PidGains::new(100_000, 100, 2_000));
    }

    #[test]
    fn test_falls_back_to_config() {
        let config = CliConfig {
            controller: Some(ControllerConfig {
                kp: 5.0,
                ki: 0.0,
                kd: 0.5,
            }),
            ..Default::default()
        };
        let gains = PidCommand::user_gains(&config, None, None, None).unwrap();
        assert_eq!(gains, PidGains::new(5_000, 0, 500));
    }

    #[test]
    fn test_missing_gains_is_an_error() {
        let config = CliConfig::default();
        assert!(PidCommand::user_gains(&config, None, None, None).is_err());
        assert!(PidCommand::user_gains(&config, Some(-1.0), Some(0.0), Some(0.0)).is_err());
    }
}
