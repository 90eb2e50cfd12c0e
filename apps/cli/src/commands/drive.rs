//! 运动命令

use crate::config::CliConfig;
use anyhow::{Result, bail};
use clap::Args;
use kobuki_sdk::Odometer;
use kobuki_sdk::driver::turn_duration;
use std::time::Duration;

/// 按左右轮速行驶一段时间后停止
#[derive(Args, Debug)]
pub struct DriveCommand {
    /// 左轮速度（mm/s）
    #[arg(short, long, allow_negative_numbers = true)]
    pub left: i16,

    /// 右轮速度（mm/s）
    #[arg(short, long, allow_negative_numbers = true)]
    pub right: i16,

    /// 行驶时长（毫秒）
    #[arg(short, long, default_value_t = 1000)]
    pub duration_ms: u64,
}

impl DriveCommand {
    pub fn execute(&self, config: &CliConfig, port: Option<&str>) -> Result<()> {
        let mut kobuki = super::connect(config, port)?;
        let mut odometer = Odometer::new();
        // 先读一帧作为里程基准
        odometer.update(&kobuki.poll_sensors()?);

        println!("🚗 左 {} mm/s，右 {} mm/s，{} ms", self.left, self.right, self.duration_ms);
        kobuki.drive_direct(self.left, self.right)?;
        let last = super::poll_for(&mut kobuki, Duration::from_millis(self.duration_ms));
        kobuki.stop()?;

        if let Some(snapshot) = last? {
            odometer.update(&snapshot);
        }
        println!("✅ 已停止，行程 {:.3} m", odometer.distance_m());
        Ok(())
    }
}

/// 固定半径转弯指定角度后停止
#[derive(Args, Debug)]
pub struct TurnCommand {
    /// 转弯角度（度，0 < angle ≤ 180）
    #[arg(short, long, default_value_t = 90.0)]
    pub angle: f64,

    /// 向右转（默认向左）
    #[arg(long)]
    pub right: bool,
}

impl TurnCommand {
    pub fn execute(&self, config: &CliConfig, port: Option<&str>) -> Result<()> {
        let Some(duration) = turn_duration(self.angle) else {
            bail!("转弯角度必须在 (0, 180] 内: {}", self.angle);
        };

        let mut kobuki = super::connect(config, port)?;
        let start = kobuki.poll_sensors()?.heading_deg();

        println!(
            "↪️  {} {}°（预计 {} ms）",
            if self.right { "右转" } else { "左转" },
            self.angle,
            duration.as_millis()
        );
        if self.right {
            kobuki.turn_right_fixed()?;
        } else {
            kobuki.turn_left_fixed()?;
        }
        let last = super::poll_for(&mut kobuki, duration);
        kobuki.stop()?;

        let end = last?.and_then(|s| s.heading_deg());
        match (start, end) {
            (Some(a), Some(b)) => println!("✅ 已停止，航向变化 {:.2}°", b - a),
            _ => println!("✅ 已停止"),
        }
        Ok(())
    }
}
