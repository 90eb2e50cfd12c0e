//! Prelude - 常用类型的便捷导入
//!
//! ```rust
//! use kobuki_sdk::prelude::*;
//! ```

// 驱动层
pub use crate::driver::{
    ButtonEdgeDetector, DriverConfig, IdleStrategy, Kobuki, KobukiBuilder, Odometer,
    ReceiverConfig, TurnDirection,
};

// 协议层
pub use crate::protocol::{BaseControlCommand, KobukiFrame, PidGains, SensorSnapshot, SoundSequence};

// 串口层（常用 Trait）
pub use crate::serial::SerialAdapter;

// 错误类型
pub use crate::driver::DriverError;
pub use crate::protocol::ProtocolError;
pub use crate::serial::SerialError;
