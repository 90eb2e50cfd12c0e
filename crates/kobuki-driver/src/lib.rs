//! 驱动层模块
//!
//! 本模块提供 Kobuki 底盘的设备驱动功能，包括：
//! - 串口帧接收状态机（滑动帧头同步、校验失败上限）
//! - 类型化的命令接口（运动、PID、声音、通用输出、信息请求）
//! - 轮速到圆弧的换算与固定转弯时长估算
//! - 按键上升沿检测
//! - 编码器里程计
//!
//! # 使用场景
//!
//! 单线程同步阻塞：`Kobuki` 独占串口，所有操作都需要 `&mut self`。

mod builder;
pub mod buttons;
mod error;
mod kobuki;
pub mod motion;
pub mod odometry;
pub mod receiver;

pub use builder::{DEFAULT_BAUD_RATE, DEFAULT_PORT, DriverConfig, KobukiBuilder};
pub use buttons::ButtonEdgeDetector;
pub use error::DriverError;
pub use kobuki::Kobuki;
pub use motion::{
    TurnDirection, direct_to_arc, estimate_turn_duration_ms, fixed_turn, turn_duration,
};
pub use odometry::{Odometer, encoder_delta, ticks_to_meters};
pub use receiver::{FrameReceiver, FrameView, IdleStrategy, ReceiverConfig, ReceiverStats};
