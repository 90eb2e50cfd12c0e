//! 命令定义和实现

pub mod config;
pub mod drive;
pub mod info;
pub mod monitor;
pub mod pid;
pub mod ports;
pub mod sound;

pub use config::ConfigCommand;
pub use drive::{DriveCommand, TurnCommand};
pub use info::InfoCommand;
pub use monitor::MonitorCommand;
pub use pid::PidCommand;
pub use sound::SoundCommand;

use crate::config::CliConfig;
use anyhow::{Context, Result};
use kobuki_sdk::{Kobuki, KobukiBuilder, SerialPortAdapter};
use std::time::{Duration, Instant};

/// 打开底盘（命令行 `--port` 优先于配置文件）
pub fn connect(config: &CliConfig, port: Option<&str>) -> Result<Kobuki<SerialPortAdapter>> {
    let mut builder = KobukiBuilder::from_config(&config.driver);
    if let Some(port) = port {
        builder = builder.port(port);
    }
    let path = builder.config().port;
    println!("🔌 连接到底盘 {} ...", path);
    builder.build().with_context(|| format!("打开串口失败: {}", path))
}

/// 持续读取反馈帧直到超时，返回最后一帧
///
/// 运动期间保持读取，避免串口输入缓冲区积压。
pub fn poll_for(
    kobuki: &mut Kobuki<SerialPortAdapter>,
    duration: Duration,
) -> Result<Option<kobuki_sdk::SensorSnapshot>> {
    let deadline = Instant::now() + duration;
    let mut last = None;
    while Instant::now() < deadline {
        last = Some(kobuki.poll_sensors()?);
    }
    Ok(last)
}
