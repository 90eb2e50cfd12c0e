//! CLI 配置文件
//!
//! 默认位置 `<config_dir>/kobuki/config.toml`，可用 `--config` 覆盖。
//!
//! ```toml
//! [driver]
//! port = "/dev/ttyUSB0"
//! baud_rate = 115200
//! read_timeout_ms = 10
//!
//! [driver.receiver]
//! max_checksum_failures = 3
//! idle = { kind = "sleep", micros = 100 }
//!
//! [controller]
//! kp = 100.0
//! ki = 0.1
//! kd = 2.0
//! ```

use anyhow::{Context, Result};
use kobuki_sdk::{DriverConfig, PidGains};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// 用户 PID 增益（实数）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControllerConfig {
    pub kp: f64,
    pub ki: f64,
    pub kd: f64,
}

impl ControllerConfig {
    pub fn gains(&self) -> PidGains {
        PidGains::from_real(self.kp, self.ki, self.kd)
    }
}

/// CLI 配置
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// 驱动配置
    pub driver: DriverConfig,
    /// 用户 PID 增益（`pid user` 未指定参数时使用）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub controller: Option<ControllerConfig>,
}

impl CliConfig {
    /// 默认配置文件路径
    pub fn default_path() -> Result<PathBuf> {
        let mut path = dirs::config_dir().ok_or_else(|| anyhow::anyhow!("无法确定配置目录"))?;
        path.push("kobuki");
        path.push("config.toml");
        Ok(path)
    }

    /// 加载配置；文件不存在时返回默认配置
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("读取配置文件失败: {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("解析配置文件失败: {}", path.display()))
    }

    /// 序列化为 TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("序列化配置失败")
    }

    /// 保存配置（自动创建目录）
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).context("创建配置目录失败")?;
        }
        let content = format!("# Kobuki CLI Configuration\n\n{}", self.to_toml()?);
        fs::write(path, content).with_context(|| format!("写入配置文件失败: {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kobuki_sdk::driver::IdleStrategy;

    #[test]
    fn test_missing_file_yields_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = CliConfig::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, CliConfig::default());
        assert_eq!(config.driver.port, "/dev/serial0");
    }

    #[test]
    fn test_save_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = CliConfig::default();
        config.driver.port = "/dev/ttyUSB0".to_string();
        config.driver.receiver.max_checksum_failures = 5;
        config.driver.receiver.idle = IdleStrategy::Yield;
        config.controller = Some(ControllerConfig {
            kp: 100.0,
            ki: 0.1,
            kd: 2.0,
        });

        config.save(&path).unwrap();
        let loaded = CliConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "[driver]\nport = \"/dev/ttyACM0\"\n\n[driver.receiver]\nidle = { kind = \"sleep\", micros = 250 }\n",
        )
        .unwrap();

        let config = CliConfig::load(&path).unwrap();
        assert_eq!(config.driver.port, "/dev/ttyACM0");
        assert_eq!(config.driver.baud_rate, 115_200);
        assert_eq!(config.driver.receiver.max_checksum_failures, 3);
        assert_eq!(config.driver.receiver.idle, IdleStrategy::Sleep { micros: 250 });
        assert!(config.controller.is_none());
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[driver]\nbaud_rate = \"fast\"\n").unwrap();
        assert!(CliConfig::load(&path).is_err());
    }

    #[test]
    fn test_controller_gains_conversion() {
        let controller = ControllerConfig {
            kp: 100.0,
            ki: 0.1,
            kd: 2.0,
        };
        assert_eq!(controller.gains(), PidGains::new(100_000, 100, 2_000));
    }
}
