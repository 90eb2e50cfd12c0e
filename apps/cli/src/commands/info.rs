//! 查询设备信息

use crate::config::CliConfig;
use anyhow::Result;
use clap::Args;
use kobuki_sdk::SensorSnapshot;
use kobuki_sdk::protocol::{ControllerInfo, UniqueDeviceId, Version};

/// 请求版本、唯一 ID 和控制器增益
#[derive(Args, Debug)]
pub struct InfoCommand {
    /// 等待应答的最大帧数
    #[arg(long, default_value_t = 50)]
    pub max_polls: u32,
}

/// 从多帧反馈中收集的设备信息
#[derive(Debug, Default, Clone, PartialEq)]
pub struct DeviceInfo {
    pub hardware_version: Option<Version>,
    pub firmware_version: Option<Version>,
    pub unique_device_id: Option<UniqueDeviceId>,
    pub controller: Option<ControllerInfo>,
}

impl DeviceInfo {
    /// 合并一帧中出现的信息子载荷
    pub fn merge(&mut self, snapshot: &SensorSnapshot) {
        if let Some(v) = snapshot.hardware_version {
            self.hardware_version = Some(v);
        }
        if let Some(v) = snapshot.firmware_version {
            self.firmware_version = Some(v);
        }
        if let Some(id) = snapshot.unique_device_id {
            self.unique_device_id = Some(id);
        }
        if let Some(info) = snapshot.controller_info {
            self.controller = Some(info);
        }
    }

    pub fn is_complete(&self) -> bool {
        self.hardware_version.is_some()
            && self.firmware_version.is_some()
            && self.unique_device_id.is_some()
            && self.controller.is_some()
    }
}

fn show<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "(未收到)".to_string())
}

impl InfoCommand {
    pub fn execute(&self, config: &CliConfig, port: Option<&str>) -> Result<()> {
        let mut kobuki = super::connect(config, port)?;
        kobuki.request_information()?;
        kobuki.request_controller_gain()?;

        let mut info = DeviceInfo::default();
        for _ in 0..self.max_polls {
            info.merge(&kobuki.poll_sensors()?);
            if info.is_complete() {
                break;
            }
        }

        println!("📋 设备信息");
        println!("  硬件版本: {}", show(info.hardware_version));
        println!("  固件版本: {}", show(info.firmware_version));
        println!("  唯一 ID:  {}", show(info.unique_device_id));
        match info.controller {
            Some(c) => {
                let (kp, ki, kd) = c.gains.as_real();
                println!("  PID:      {:?} kp={} ki={} kd={}", c.mode, kp, ki, kd);
            },
            None => println!("  PID:      (未收到)"),
        }
        if !info.is_complete() {
            println!("⚠️  {} 帧内未收到全部应答", self.max_polls);
        }
        Ok(())
    }
}
