//! 子载荷 ID 常量定义和枚举
//!
//! Kobuki 帧载荷由若干 `[id, len, data...]` 子载荷拼接而成。
//! 命令方向与反馈方向的 ID 空间相互独立（例如 0x01 既是 Base Control 命令，
//! 也是 Basic Sensor Data 反馈）。

// ============================================================================
// 命令子载荷 ID 常量（主机 -> 底盘）
// ============================================================================

/// 底盘运动控制（速度 + 转弯半径）
pub const ID_BASE_CONTROL: u8 = 0x01;

/// 播放单音
pub const ID_SOUND: u8 = 0x03;

/// 播放预设音效序列
pub const ID_SOUND_SEQUENCE: u8 = 0x04;

/// 请求附加信息（硬件版本/固件版本/UDID）
pub const ID_REQUEST_EXTRA: u8 = 0x09;

/// 通用输出（数字输出、电源通道、LED）
pub const ID_GENERAL_PURPOSE_OUTPUT: u8 = 0x0C;

/// 设置轮速控制器 PID 增益
pub const ID_SET_CONTROLLER_GAIN: u8 = 0x0D;

/// 读取轮速控制器 PID 增益
pub const ID_GET_CONTROLLER_GAIN: u8 = 0x0E;

// ============================================================================
// 反馈子载荷 ID 常量（底盘 -> 主机）
// ============================================================================

/// 基础传感器数据（碰撞、跌落、编码器、按键、电池等）
pub const ID_BASIC_SENSOR_DATA: u8 = 0x01;

/// 回充座红外信号
pub const ID_DOCKING_IR: u8 = 0x03;

/// 惯性传感器（航向角、角速度）
pub const ID_INERTIAL_SENSOR: u8 = 0x04;

/// 悬崖传感器 ADC 原始值
pub const ID_CLIFF: u8 = 0x05;

/// 电机电流
pub const ID_CURRENT: u8 = 0x06;

/// 硬件版本
pub const ID_HARDWARE_VERSION: u8 = 0x0A;

/// 固件版本
pub const ID_FIRMWARE_VERSION: u8 = 0x0B;

/// 三轴陀螺仪原始数据
pub const ID_RAW_GYRO: u8 = 0x0D;

/// 通用输入（数字 + 模拟）
pub const ID_GENERAL_PURPOSE_INPUT: u8 = 0x10;

/// 设备唯一 ID
pub const ID_UNIQUE_DEVICE_ID: u8 = 0x13;

/// 控制器信息（当前 PID 增益）
pub const ID_CONTROLLER_INFO: u8 = 0x15;

// ============================================================================
// 反馈子载荷长度（厂商文档定义的固定长度）
// ============================================================================

pub const LEN_BASIC_SENSOR_DATA: usize = 15;
pub const LEN_DOCKING_IR: usize = 3;
pub const LEN_INERTIAL_SENSOR: usize = 7;
pub const LEN_CLIFF: usize = 6;
pub const LEN_CURRENT: usize = 2;
pub const LEN_VERSION: usize = 4;
/// 原始陀螺仪为变长：2 字节头 + N 组 6 字节采样
pub const LEN_RAW_GYRO_HEADER: usize = 2;
pub const LEN_GENERAL_PURPOSE_INPUT: usize = 16;
pub const LEN_UNIQUE_DEVICE_ID: usize = 12;
pub const LEN_CONTROLLER_INFO: usize = 13;

// ============================================================================
// ID 分类枚举
// ============================================================================

/// 反馈子载荷类型分类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackKind {
    BasicSensorData,
    DockingIr,
    InertialSensor,
    Cliff,
    Current,
    HardwareVersion,
    FirmwareVersion,
    RawGyro,
    GeneralPurposeInput,
    UniqueDeviceId,
    ControllerInfo,
    /// 未知类型（按长度跳过）
    Unknown,
}

impl FeedbackKind {
    /// 根据子载荷 ID 判断类型
    pub fn from_id(id: u8) -> Self {
        match id {
            ID_BASIC_SENSOR_DATA => FeedbackKind::BasicSensorData,
            ID_DOCKING_IR => FeedbackKind::DockingIr,
            ID_INERTIAL_SENSOR => FeedbackKind::InertialSensor,
            ID_CLIFF => FeedbackKind::Cliff,
            ID_CURRENT => FeedbackKind::Current,
            ID_HARDWARE_VERSION => FeedbackKind::HardwareVersion,
            ID_FIRMWARE_VERSION => FeedbackKind::FirmwareVersion,
            ID_RAW_GYRO => FeedbackKind::RawGyro,
            ID_GENERAL_PURPOSE_INPUT => FeedbackKind::GeneralPurposeInput,
            ID_UNIQUE_DEVICE_ID => FeedbackKind::UniqueDeviceId,
            ID_CONTROLLER_INFO => FeedbackKind::ControllerInfo,
            _ => FeedbackKind::Unknown,
        }
    }

    /// 子载荷的最小长度（厂商文档定义）
    pub fn min_len(self) -> usize {
        match self {
            FeedbackKind::BasicSensorData => LEN_BASIC_SENSOR_DATA,
            FeedbackKind::DockingIr => LEN_DOCKING_IR,
            FeedbackKind::InertialSensor => LEN_INERTIAL_SENSOR,
            FeedbackKind::Cliff => LEN_CLIFF,
            FeedbackKind::Current => LEN_CURRENT,
            FeedbackKind::HardwareVersion | FeedbackKind::FirmwareVersion => LEN_VERSION,
            FeedbackKind::RawGyro => LEN_RAW_GYRO_HEADER,
            FeedbackKind::GeneralPurposeInput => LEN_GENERAL_PURPOSE_INPUT,
            FeedbackKind::UniqueDeviceId => LEN_UNIQUE_DEVICE_ID,
            FeedbackKind::ControllerInfo => LEN_CONTROLLER_INFO,
            FeedbackKind::Unknown => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feedback_kind_known() {
        assert_eq!(FeedbackKind::from_id(0x01), FeedbackKind::BasicSensorData);
        assert_eq!(FeedbackKind::from_id(0x04), FeedbackKind::InertialSensor);
        assert_eq!(FeedbackKind::from_id(0x0D), FeedbackKind::RawGyro);
        assert_eq!(FeedbackKind::from_id(0x15), FeedbackKind::ControllerInfo);
    }

    #[test]
    fn test_feedback_kind_unknown() {
        assert_eq!(FeedbackKind::from_id(0x02), FeedbackKind::Unknown);
        assert_eq!(FeedbackKind::from_id(0xFF), FeedbackKind::Unknown);
        assert_eq!(FeedbackKind::Unknown.min_len(), 0);
    }

    #[test]
    fn test_min_len() {
        assert_eq!(FeedbackKind::BasicSensorData.min_len(), 15);
        assert_eq!(FeedbackKind::ControllerInfo.min_len(), 13);
        assert_eq!(FeedbackKind::HardwareVersion.min_len(), 4);
    }
}
