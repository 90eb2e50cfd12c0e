//! Kobuki SDK - Kobuki 移动底盘 Rust SDK
//!
//! 通过串口（115200 8N1）与 Kobuki 底盘通信：接收约 50Hz 的传感器反馈帧，
//! 发送运动、PID、声音等命令帧。
//!
//! # 架构设计
//!
//! 本 SDK 采用分层架构，从底层到高层：
//!
//! - **串口层** (`serial`): 字节流抽象，真实串口与 mock 后端
//! - **协议层** (`protocol`): 帧编解码、命令子载荷、传感器子载荷解析
//! - **驱动层** (`driver`): 组帧状态机、类型化命令接口、里程计
//!
//! # 快速开始
//!
//! ```no_run
//! use kobuki_sdk::prelude::*;
//!
//! kobuki_sdk::init_logging("kobuki=info").ok();
//!
//! let mut kobuki = KobukiBuilder::new().port("/dev/ttyUSB0").build()?;
//! let mut buttons = ButtonEdgeDetector::new();
//! loop {
//!     let snapshot = kobuki.poll_sensors()?;
//!     if buttons.is_button_edge(&snapshot) {
//!         kobuki.play_sound_sequence(SoundSequence::Button)?;
//!     }
//! }
//! # Ok::<(), DriverError>(())
//! ```

pub use kobuki_driver as driver;
pub use kobuki_protocol as protocol;
pub use kobuki_serial as serial;

// Prelude 模块
pub mod prelude;

mod logging;

pub use logging::{LoggingError, init_logging};

// --- 用户以此为界 ---
// 以下是通过 Facade Pattern 提供的公共 API

// 串口层常用类型
pub use serial::{SerialAdapter, SerialError, SerialPortAdapter};

// 协议层
pub use protocol::{KobukiFrame, PidGains, ProtocolError, SensorSnapshot, SoundSequence};

// 驱动层
pub use driver::{
    ButtonEdgeDetector, DriverConfig, DriverError, Kobuki, KobukiBuilder, Odometer,
    ReceiverConfig,
};
