//! 监控传感器反馈
//!
//! 打印传感器快照、按键上升沿和累计里程，Ctrl-C 退出。

use crate::config::CliConfig;
use anyhow::Result;
use clap::Args;
use kobuki_sdk::{ButtonEdgeDetector, Odometer, SensorSnapshot};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::warn;

/// 监控命令参数
#[derive(Args, Debug)]
pub struct MonitorCommand {
    /// 读取的帧数（默认无限）
    #[arg(short, long)]
    pub count: Option<u64>,

    /// 每 N 帧打印一次
    #[arg(short, long, default_value_t = 10)]
    pub every: u64,
}

/// 单行摘要
pub fn summary(snapshot: &SensorSnapshot) -> String {
    let (left, right) = snapshot.encoders();
    let (bl, bc, br) = snapshot.bumps();
    let [b0, b1, b2] = snapshot.buttons();
    let flag = |b: bool| if b { '1' } else { '0' };
    let heading = snapshot
        .heading_deg()
        .map(|h| format!("{:7.2}°", h))
        .unwrap_or_else(|| "      -".to_string());
    format!(
        "t={:5}ms enc=({:5},{:5}) bump={}{}{} btn={}{}{} bat={:4.1}V {:?} heading={}",
        snapshot.basic.timestamp_ms,
        left,
        right,
        flag(bl),
        flag(bc),
        flag(br),
        flag(b0),
        flag(b1),
        flag(b2),
        snapshot.battery_voltage(),
        snapshot.basic.charger,
        heading,
    )
}

impl MonitorCommand {
    pub fn execute(&self, config: &CliConfig, port: Option<&str>) -> Result<()> {
        let mut kobuki = super::connect(config, port)?;

        let running = Arc::new(AtomicBool::new(true));
        let r = running.clone();
        ctrlc::set_handler(move || r.store(false, Ordering::SeqCst))?;

        let mut buttons = ButtonEdgeDetector::new();
        let mut odometer = Odometer::new();
        let every = self.every.max(1);
        let mut frames = 0u64;

        while running.load(Ordering::SeqCst) && self.count.is_none_or(|n| frames < n) {
            let snapshot = match kobuki.poll_sensors() {
                Ok(snapshot) => snapshot,
                Err(e) if e.is_fatal() => return Err(e.into()),
                Err(e) => {
                    warn!("Skipping frame: {}", e);
                    kobuki.resync()?;
                    continue;
                },
            };
            frames += 1;
            odometer.update(&snapshot);

            if buttons.is_button_edge(&snapshot) {
                println!("🔘 按键按下: {:?}", snapshot.buttons());
            }
            if frames % every == 0 {
                println!("{}  dist={:.3}m", summary(&snapshot), odometer.distance_m());
            }
        }

        let stats = kobuki.receiver_stats();
        println!(
            "✅ 共 {} 帧，校验失败 {} 次，丢弃 {} 字节",
            stats.frames, stats.checksum_failures, stats.discarded_bytes
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_line() {
        let mut payload = vec![0x01, 0x0F, 0x64, 0x00, 0x04, 0x00, 0x00];
        payload.extend_from_slice(&[0x0A, 0x00, 0x14, 0x00, 0x00, 0x00, 0x01, 0x00, 0xA0, 0x00]);
        let snapshot = SensorSnapshot::parse(&payload).unwrap();
        let line = summary(&snapshot);
        assert!(line.contains("t=  100ms"), "{line}");
        assert!(line.contains("enc=(   10,   20)"), "{line}");
        assert!(line.contains("bump=100"), "{line}");
        assert!(line.contains("btn=100"), "{line}");
        assert!(line.contains("bat=16.0V"), "{line}");
    }
}
