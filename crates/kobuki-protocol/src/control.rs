//! 命令子载荷定义
//!
//! 包含所有发往底盘的命令结构体，提供构建子载荷的方法
//! 和转换为 `KobukiFrame` 的方法。每个子载荷的布局为
//! `[id, len, data...]`，data 内多字节字段为小端字节序。

use crate::ids::*;
use crate::{
    KobukiFrame, ProtocolError, bytes_to_i16_le, i16_to_bytes_le, u16_to_bytes_le,
    u32_to_bytes_le,
};

// ============================================================================
// 底盘运动控制 (0x01)
// ============================================================================

/// 转弯半径哨兵值：直行（无穷大半径）
pub const RADIUS_STRAIGHT: i16 = 0;

/// 转弯半径哨兵值：原地旋转（方向由速度符号决定，正为逆时针）
pub const RADIUS_SPIN: i16 = 1;

/// 底盘运动控制指令 (0x01)
///
/// 以圆弧方式描述运动：`speed` 单位 mm/s，`radius` 单位 mm。
/// `radius` 的 0 和 1 是保留的哨兵值，见 [`RADIUS_STRAIGHT`] 与 [`RADIUS_SPIN`]。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BaseControlCommand {
    pub speed: i16,  // Byte 2-3
    pub radius: i16, // Byte 4-5
}

impl BaseControlCommand {
    /// 数据段长度
    pub const DATA_LEN: u8 = 4;

    pub fn new(speed: i16, radius: i16) -> Self {
        Self { speed, radius }
    }

    /// 直行
    pub fn straight(speed: i16) -> Self {
        Self::new(speed, RADIUS_STRAIGHT)
    }

    /// 原地旋转（正速度为逆时针）
    pub fn spin(speed: i16) -> Self {
        Self::new(speed, RADIUS_SPIN)
    }

    /// 停止
    pub fn stop() -> Self {
        Self::new(0, RADIUS_STRAIGHT)
    }

    /// 构建子载荷
    pub fn to_payload(self) -> [u8; 6] {
        let mut data = [0u8; 6];
        data[0] = ID_BASE_CONTROL;
        data[1] = Self::DATA_LEN;
        data[2..4].copy_from_slice(&i16_to_bytes_le(self.speed));
        data[4..6].copy_from_slice(&i16_to_bytes_le(self.radius));
        data
    }

    /// 转换为帧
    pub fn to_frame(self) -> KobukiFrame {
        KobukiFrame::new(&self.to_payload())
    }

    /// 从子载荷解析（用于回放与测试）
    pub fn from_payload(payload: &[u8]) -> Result<Self, ProtocolError> {
        if payload.len() < 6 {
            return Err(ProtocolError::InvalidLength {
                expected: 6,
                actual: payload.len(),
            });
        }
        if payload[0] != ID_BASE_CONTROL {
            return Err(ProtocolError::InvalidValue {
                field: "BaseControlCommand.id".to_string(),
                value: payload[0],
            });
        }
        if payload[1] != Self::DATA_LEN {
            return Err(ProtocolError::SubPayloadLength {
                id: ID_BASE_CONTROL,
                expected: Self::DATA_LEN as usize,
                actual: payload[1] as usize,
            });
        }

        Ok(Self {
            speed: bytes_to_i16_le([payload[2], payload[3]]),
            radius: bytes_to_i16_le([payload[4], payload[5]]),
        })
    }
}

// ============================================================================
// 轮速控制器 PID 增益 (0x0D / 0x0E)
// ============================================================================

/// PID 增益（定点数，实际增益 = 原始值 / 1000）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PidGains {
    pub kp: u32,
    pub ki: u32,
    pub kd: u32,
}

impl PidGains {
    /// 定点缩放系数
    pub const SCALE: f64 = 1000.0;

    pub fn new(kp: u32, ki: u32, kd: u32) -> Self {
        Self { kp, ki, kd }
    }

    /// 从实数增益构建（乘以 1000 后向零截断，负值饱和为 0）
    pub fn from_real(kp: f64, ki: f64, kd: f64) -> Self {
        Self {
            kp: (kp * Self::SCALE) as u32,
            ki: (ki * Self::SCALE) as u32,
            kd: (kd * Self::SCALE) as u32,
        }
    }

    /// 获取实数增益 (kp, ki, kd)
    pub fn as_real(&self) -> (f64, f64, f64) {
        (
            self.kp as f64 / Self::SCALE,
            self.ki as f64 / Self::SCALE,
            self.kd as f64 / Self::SCALE,
        )
    }
}

/// 设置控制器增益指令 (0x0D)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerGainCommand {
    /// 恢复出厂默认增益（mode = 0x00，其余 12 字节保留为 0）
    Default,
    /// 用户自定义增益（mode = 0x01）
    User(PidGains),
}

impl ControllerGainCommand {
    /// 数据段长度
    pub const DATA_LEN: u8 = 13;

    /// 构建子载荷
    pub fn to_payload(self) -> [u8; 15] {
        let mut data = [0u8; 15];
        data[0] = ID_SET_CONTROLLER_GAIN;
        data[1] = Self::DATA_LEN;
        match self {
            ControllerGainCommand::Default => {
                data[2] = 0x00;
                // Byte 3-14: 保留，已初始化为 0
            },
            ControllerGainCommand::User(gains) => {
                data[2] = 0x01;
                data[3..7].copy_from_slice(&u32_to_bytes_le(gains.kp));
                data[7..11].copy_from_slice(&u32_to_bytes_le(gains.ki));
                data[11..15].copy_from_slice(&u32_to_bytes_le(gains.kd));
            },
        }
        data
    }

    /// 转换为帧
    pub fn to_frame(self) -> KobukiFrame {
        KobukiFrame::new(&self.to_payload())
    }
}

/// 读取控制器增益指令 (0x0E)
///
/// 底盘在下一个反馈帧中附带 Controller Info (0x15) 子载荷。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GetControllerGainCommand;

impl GetControllerGainCommand {
    pub fn to_payload(self) -> [u8; 3] {
        [ID_GET_CONTROLLER_GAIN, 0x01, 0x00]
    }

    pub fn to_frame(self) -> KobukiFrame {
        KobukiFrame::new(&self.to_payload())
    }
}

// ============================================================================
// 声音 (0x03 / 0x04)
// ============================================================================

/// 预设音效序列
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum SoundSequence {
    /// 开机音
    #[default]
    On = 0x00,
    /// 关机音
    Off = 0x01,
    /// 回充
    Recharge = 0x02,
    /// 按键
    Button = 0x03,
    /// 错误
    Error = 0x04,
    /// 清扫开始
    CleaningStart = 0x05,
    /// 清扫结束
    CleaningEnd = 0x06,
}

impl TryFrom<u8> for SoundSequence {
    type Error = ProtocolError;

    fn try_from(value: u8) -> Result<Self, ProtocolError> {
        match value {
            0x00 => Ok(SoundSequence::On),
            0x01 => Ok(SoundSequence::Off),
            0x02 => Ok(SoundSequence::Recharge),
            0x03 => Ok(SoundSequence::Button),
            0x04 => Ok(SoundSequence::Error),
            0x05 => Ok(SoundSequence::CleaningStart),
            0x06 => Ok(SoundSequence::CleaningEnd),
            _ => Err(ProtocolError::InvalidValue {
                field: "SoundSequence".to_string(),
                value,
            }),
        }
    }
}

/// 播放音效序列指令 (0x04)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SoundSequenceCommand {
    pub sequence: SoundSequence,
}

impl SoundSequenceCommand {
    pub fn new(sequence: SoundSequence) -> Self {
        Self { sequence }
    }

    pub fn to_payload(self) -> [u8; 3] {
        [ID_SOUND_SEQUENCE, 0x01, self.sequence as u8]
    }

    pub fn to_frame(self) -> KobukiFrame {
        KobukiFrame::new(&self.to_payload())
    }
}

/// 单音周期单位（秒）
///
/// 底盘按 `note = 1 / (f * 2.75µs)` 解释音符字段。
pub const NOTE_PERIOD_S: f64 = 0.000_002_75;

/// 播放单音指令 (0x03)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SoundCommand {
    pub note: u16,       // Byte 2-3
    pub duration_ms: u8, // Byte 4
}

impl SoundCommand {
    pub fn new(note: u16, duration_ms: u8) -> Self {
        Self { note, duration_ms }
    }

    /// 按频率（Hz）构建，音符值向零截断并饱和到 u16 范围
    pub fn from_frequency(frequency_hz: f64, duration_ms: u8) -> Self {
        let note = (1.0 / (frequency_hz * NOTE_PERIOD_S)) as u16;
        Self { note, duration_ms }
    }

    pub fn to_payload(self) -> [u8; 5] {
        let mut data = [0u8; 5];
        data[0] = ID_SOUND;
        data[1] = 0x03;
        data[2..4].copy_from_slice(&u16_to_bytes_le(self.note));
        data[4] = self.duration_ms;
        data
    }

    pub fn to_frame(self) -> KobukiFrame {
        KobukiFrame::new(&self.to_payload())
    }
}

// ============================================================================
// 附加信息请求 (0x09)
// ============================================================================

/// 请求附加信息指令 (0x09)
///
/// 底盘在下一个反馈帧中附带对应子载荷。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestExtraCommand {
    pub flags: u16,
}

impl RequestExtraCommand {
    /// 硬件版本 (0x0A)
    pub const HARDWARE_VERSION: u16 = 0x01;
    /// 固件版本 (0x0B)
    pub const FIRMWARE_VERSION: u16 = 0x02;
    /// 设备唯一 ID (0x13)
    pub const UNIQUE_DEVICE_ID: u16 = 0x08;

    pub fn new(flags: u16) -> Self {
        Self { flags }
    }

    /// 同时请求硬件版本、固件版本和 UDID
    pub fn all() -> Self {
        Self::new(Self::UNIQUE_DEVICE_ID | Self::FIRMWARE_VERSION | Self::HARDWARE_VERSION)
    }

    pub fn to_payload(self) -> [u8; 4] {
        let mut data = [0u8; 4];
        data[0] = ID_REQUEST_EXTRA;
        data[1] = 0x02;
        data[2..4].copy_from_slice(&u16_to_bytes_le(self.flags));
        data
    }

    pub fn to_frame(self) -> KobukiFrame {
        KobukiFrame::new(&self.to_payload())
    }
}

impl Default for RequestExtraCommand {
    fn default() -> Self {
        Self::all()
    }
}

// ============================================================================
// 通用输出 (0x0C)
// ============================================================================

/// 通用输出指令 (0x0C)
///
/// 位布局（u16，小端）：
/// - Bit 0-3: 数字输出 0-3
/// - Bit 4-7: 电源通道（3.3V / 5V / 12V5A / 12V1.5A），本指令始终全部打开，
///   避免误关控制板供电
/// - Bit 8-11: LED（LED1 红 / LED1 绿 / LED2 红 / LED2 绿）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GeneralOutputCommand {
    /// 低 4 位有效
    pub outputs: u8,
    /// 低 4 位有效
    pub leds: u8,
}

impl GeneralOutputCommand {
    /// 全部电源通道
    pub const POWER_ALL: u16 = 0x00F0;

    pub fn new(outputs: u8, leds: u8) -> Self {
        Self { outputs, leds }
    }

    /// 组合后的 16 位标志
    pub fn flags(&self) -> u16 {
        (((self.leds & 0x0F) as u16) << 8) | Self::POWER_ALL | (self.outputs & 0x0F) as u16
    }

    pub fn to_payload(self) -> [u8; 4] {
        let mut data = [0u8; 4];
        data[0] = ID_GENERAL_PURPOSE_OUTPUT;
        data[1] = 0x02;
        data[2..4].copy_from_slice(&u16_to_bytes_le(self.flags()));
        data
    }

    pub fn to_frame(self) -> KobukiFrame {
        KobukiFrame::new(&self.to_payload())
    }
}
