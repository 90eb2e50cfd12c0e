//! 反馈帧结构体定义
//!
//! 底盘以约 50Hz 主动推送反馈帧，载荷由若干 `[id, len, data...]`
//! 子载荷拼接而成。本模块提供各子载荷的结构体、物理量转换方法，
//! 以及把整帧载荷解析为 [`SensorSnapshot`] 的入口。

use crate::control::PidGains;
use crate::ids::*;
use crate::{KobukiFrame, ProtocolError, bytes_to_i16_le, bytes_to_u16_le, bytes_to_u32_le};
use bilge::prelude::*;
use std::fmt;

// ============================================================================
// 位域结构体定义
// ============================================================================

/// 碰撞传感器位域 (Basic Sensor Data Byte 2)
///
/// bilge 默认 LSB first，Bit 0 对应右侧。
#[bitsize(8)]
#[derive(FromBits, DebugBits, Clone, Copy, Default, PartialEq)]
pub struct BumperFlags {
    pub right: bool,  // Bit 0
    pub center: bool, // Bit 1
    pub left: bool,   // Bit 2
    pub reserved: u5, // Bit 3-7: 保留
}

/// 轮子悬空位域 (Basic Sensor Data Byte 3)
#[bitsize(8)]
#[derive(FromBits, DebugBits, Clone, Copy, Default, PartialEq)]
pub struct WheelDropFlags {
    pub right: bool,  // Bit 0
    pub left: bool,   // Bit 1
    pub reserved: u6, // Bit 2-7: 保留
}

/// 悬崖传感器位域 (Basic Sensor Data Byte 4)
#[bitsize(8)]
#[derive(FromBits, DebugBits, Clone, Copy, Default, PartialEq)]
pub struct CliffFlags {
    pub right: bool,  // Bit 0
    pub center: bool, // Bit 1
    pub left: bool,   // Bit 2
    pub reserved: u5, // Bit 3-7: 保留
}

/// 按键位域 (Basic Sensor Data Byte 11)
#[bitsize(8)]
#[derive(FromBits, DebugBits, Clone, Copy, Default, PartialEq)]
pub struct ButtonFlags {
    pub b0: bool,     // Bit 0
    pub b1: bool,     // Bit 1
    pub b2: bool,     // Bit 2
    pub reserved: u5, // Bit 3-7: 保留
}

impl ButtonFlags {
    /// 按 B0/B1/B2 顺序返回按键状态
    pub fn as_array(&self) -> [bool; 3] {
        [self.b0(), self.b1(), self.b2()]
    }

    /// 是否有任意按键按下
    pub fn any(&self) -> bool {
        self.b0() || self.b1() || self.b2()
    }
}

/// 电机过流位域 (Basic Sensor Data Byte 14)
///
/// 注意：与碰撞/悬崖位域相反，Bit 0 对应左轮。
#[bitsize(8)]
#[derive(FromBits, DebugBits, Clone, Copy, Default, PartialEq)]
pub struct OvercurrentFlags {
    pub left: bool,   // Bit 0
    pub right: bool,  // Bit 1
    pub reserved: u6, // Bit 2-7: 保留
}

// ============================================================================
// 枚举类型定义
// ============================================================================

/// 充电状态 (Basic Sensor Data Byte 12)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChargerState {
    /// 未充电
    #[default]
    Discharging,
    /// 充电座充电完成
    DockingCharged,
    /// 充电座充电中
    DockingCharging,
    /// 适配器充电完成
    AdapterCharged,
    /// 适配器充电中
    AdapterCharging,
    /// 未定义的状态码
    Unknown(u8),
}

impl From<u8> for ChargerState {
    fn from(value: u8) -> Self {
        match value {
            0 => ChargerState::Discharging,
            2 => ChargerState::DockingCharged,
            6 => ChargerState::DockingCharging,
            18 => ChargerState::AdapterCharged,
            22 => ChargerState::AdapterCharging,
            other => ChargerState::Unknown(other),
        }
    }
}

impl ChargerState {
    /// 是否正在充电
    pub fn is_charging(&self) -> bool {
        matches!(
            self,
            ChargerState::DockingCharging | ChargerState::AdapterCharging
        )
    }

    /// 是否连接了充电源（充电座或适配器）
    pub fn is_plugged(&self) -> bool {
        !matches!(self, ChargerState::Discharging | ChargerState::Unknown(_))
    }
}

/// 控制器增益类型 (Controller Info Byte 0)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, num_enum::FromPrimitive)]
#[repr(u8)]
pub enum GainMode {
    /// 出厂默认增益
    #[default]
    Default = 0x00,
    /// 用户自定义增益
    User = 0x01,
}

// ============================================================================
// 子载荷结构体
// ============================================================================

/// 校验已知子载荷的最小长度
fn ensure_len(id: u8, data: &[u8]) -> Result<(), ProtocolError> {
    let expected = FeedbackKind::from_id(id).min_len();
    if data.len() < expected {
        return Err(ProtocolError::SubPayloadLength {
            id,
            expected,
            actual: data.len(),
        });
    }
    Ok(())
}

/// 基础传感器数据 (0x01)
///
/// - 时间戳单位：1ms，16 位回绕
/// - 编码器：16 位回绕计数
/// - 电池电压单位：0.1V
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BasicSensorData {
    pub timestamp_ms: u16,            // Byte 0-1
    pub bumper: BumperFlags,          // Byte 2
    pub wheel_drop: WheelDropFlags,   // Byte 3
    pub cliff: CliffFlags,            // Byte 4
    pub left_encoder: u16,            // Byte 5-6
    pub right_encoder: u16,           // Byte 7-8
    pub left_pwm: i8,                 // Byte 9
    pub right_pwm: i8,                // Byte 10
    pub buttons: ButtonFlags,         // Byte 11
    pub charger: ChargerState,        // Byte 12
    pub battery: u8,                  // Byte 13: 单位 0.1V
    pub overcurrent: OvercurrentFlags, // Byte 14
}

impl BasicSensorData {
    pub fn parse(data: &[u8]) -> Result<Self, ProtocolError> {
        ensure_len(ID_BASIC_SENSOR_DATA, data)?;
        Ok(Self {
            timestamp_ms: bytes_to_u16_le([data[0], data[1]]),
            bumper: BumperFlags::from(u8::new(data[2])),
            wheel_drop: WheelDropFlags::from(u8::new(data[3])),
            cliff: CliffFlags::from(u8::new(data[4])),
            left_encoder: bytes_to_u16_le([data[5], data[6]]),
            right_encoder: bytes_to_u16_le([data[7], data[8]]),
            left_pwm: data[9] as i8,
            right_pwm: data[10] as i8,
            buttons: ButtonFlags::from(u8::new(data[11])),
            charger: ChargerState::from(data[12]),
            battery: data[13],
            overcurrent: OvercurrentFlags::from(u8::new(data[14])),
        })
    }

    /// 电池电压（V）
    pub fn battery_voltage(&self) -> f64 {
        self.battery as f64 * 0.1
    }
}

/// 回充座红外信号 (0x03)
///
/// 每个字节是一个接收器的信号位掩码（近/远 左/中/右）。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DockingIr {
    pub right: u8,
    pub central: u8,
    pub left: u8,
}

impl DockingIr {
    pub fn parse(data: &[u8]) -> Result<Self, ProtocolError> {
        ensure_len(ID_DOCKING_IR, data)?;
        Ok(Self {
            right: data[0],
            central: data[1],
            left: data[2],
        })
    }
}

/// 惯性传感器 (0x04)
///
/// - 航向角单位：0.01°，上电时为 0
/// - 角速度单位：0.01°/s
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InertialSensorData {
    pub angle: i16,      // Byte 0-1
    pub angle_rate: i16, // Byte 2-3
    // Byte 4-6: 未使用
}

impl InertialSensorData {
    pub fn parse(data: &[u8]) -> Result<Self, ProtocolError> {
        ensure_len(ID_INERTIAL_SENSOR, data)?;
        Ok(Self {
            angle: bytes_to_i16_le([data[0], data[1]]),
            angle_rate: bytes_to_i16_le([data[2], data[3]]),
        })
    }

    /// 航向角（度）
    pub fn heading_deg(&self) -> f64 {
        self.angle as f64 / 100.0
    }

    /// 航向角（弧度）
    pub fn heading_rad(&self) -> f64 {
        self.heading_deg().to_radians()
    }

    /// 角速度（度/秒）
    pub fn angle_rate_deg_s(&self) -> f64 {
        self.angle_rate as f64 / 100.0
    }
}

/// 悬崖传感器 ADC 原始值 (0x05)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CliffSensorData {
    pub right: u16,
    pub central: u16,
    pub left: u16,
}

impl CliffSensorData {
    pub fn parse(data: &[u8]) -> Result<Self, ProtocolError> {
        ensure_len(ID_CLIFF, data)?;
        Ok(Self {
            right: bytes_to_u16_le([data[0], data[1]]),
            central: bytes_to_u16_le([data[2], data[3]]),
            left: bytes_to_u16_le([data[4], data[5]]),
        })
    }
}

/// 电机电流 (0x06)，单位 10mA
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MotorCurrent {
    pub left: u8,
    pub right: u8,
}

impl MotorCurrent {
    pub fn parse(data: &[u8]) -> Result<Self, ProtocolError> {
        ensure_len(ID_CURRENT, data)?;
        Ok(Self {
            left: data[0],
            right: data[1],
        })
    }

    /// 左轮电流（A）
    pub fn left_amps(&self) -> f64 {
        self.left as f64 * 0.01
    }

    /// 右轮电流（A）
    pub fn right_amps(&self) -> f64 {
        self.right as f64 * 0.01
    }
}

/// 硬件/固件版本 (0x0A / 0x0B)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Version {
    pub major: u8,
    pub minor: u8,
    pub patch: u8,
}

impl Version {
    /// `id` 为 0x0A 或 0x0B，仅用于错误信息
    pub fn parse(id: u8, data: &[u8]) -> Result<Self, ProtocolError> {
        ensure_len(id, data)?;
        Ok(Self {
            patch: data[0],
            minor: data[1],
            major: data[2],
        })
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// 陀螺仪原始值分辨率（°/s per LSB）
pub const RAW_GYRO_DEG_PER_LSB: f64 = 0.00875;

/// 三轴陀螺仪原始数据 (0x0D)
///
/// 变长子载荷：帧序号 + 数据长度（i16 个数）+ N 组 (x, y, z)。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawGyroData {
    pub frame_id: u8,
    pub samples: Vec<[i16; 3]>,
}

impl RawGyroData {
    pub fn parse(data: &[u8]) -> Result<Self, ProtocolError> {
        ensure_len(ID_RAW_GYRO, data)?;
        let declared = data[1] as usize / 3;
        let available = (data.len() - LEN_RAW_GYRO_HEADER) / 6;
        let samples = data[LEN_RAW_GYRO_HEADER..]
            .chunks_exact(6)
            .take(declared.min(available))
            .map(|c| {
                [
                    bytes_to_i16_le([c[0], c[1]]),
                    bytes_to_i16_le([c[2], c[3]]),
                    bytes_to_i16_le([c[4], c[5]]),
                ]
            })
            .collect();
        Ok(Self {
            frame_id: data[0],
            samples,
        })
    }
}

/// 通用输入 (0x10)
///
/// - 数字输入：Bit 0-3 有效
/// - 模拟输入：12 位 ADC（0-4095 对应 0-3.3V）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GeneralPurposeInput {
    pub digital: u16,
    pub analog: [u16; 4],
    // Byte 10-15: 保留
}

impl GeneralPurposeInput {
    pub fn parse(data: &[u8]) -> Result<Self, ProtocolError> {
        ensure_len(ID_GENERAL_PURPOSE_INPUT, data)?;
        let mut analog = [0u16; 4];
        for (i, value) in analog.iter_mut().enumerate() {
            let offset = 2 + i * 2;
            *value = bytes_to_u16_le([data[offset], data[offset + 1]]);
        }
        Ok(Self {
            digital: bytes_to_u16_le([data[0], data[1]]),
            analog,
        })
    }

    /// 数字输入通道状态（0-3）
    pub fn digital_input(&self, channel: usize) -> bool {
        channel < 4 && (self.digital >> channel) & 0x01 != 0
    }
}

/// 设备唯一 ID (0x13)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UniqueDeviceId {
    pub udid: [u32; 3],
}

impl UniqueDeviceId {
    pub fn parse(data: &[u8]) -> Result<Self, ProtocolError> {
        ensure_len(ID_UNIQUE_DEVICE_ID, data)?;
        let mut udid = [0u32; 3];
        for (i, value) in udid.iter_mut().enumerate() {
            let o = i * 4;
            *value = bytes_to_u32_le([data[o], data[o + 1], data[o + 2], data[o + 3]]);
        }
        Ok(Self { udid })
    }
}

impl fmt::Display for UniqueDeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:08X}-{:08X}-{:08X}",
            self.udid[0], self.udid[1], self.udid[2]
        )
    }
}

/// 控制器信息 (0x15)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControllerInfo {
    pub mode: GainMode,
    pub gains: PidGains,
}

impl ControllerInfo {
    pub fn parse(data: &[u8]) -> Result<Self, ProtocolError> {
        ensure_len(ID_CONTROLLER_INFO, data)?;
        Ok(Self {
            mode: GainMode::from(data[0]),
            gains: PidGains {
                kp: bytes_to_u32_le([data[1], data[2], data[3], data[4]]),
                ki: bytes_to_u32_le([data[5], data[6], data[7], data[8]]),
                kd: bytes_to_u32_le([data[9], data[10], data[11], data[12]]),
            },
        })
    }
}

// ============================================================================
// 整帧快照
// ============================================================================

/// 一帧反馈的完整解码结果
///
/// `basic` 每帧必有；其余子载荷由底盘按需附带（如版本信息仅在
/// 请求后的下一帧出现），缺失时为 `None`。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SensorSnapshot {
    pub basic: BasicSensorData,
    pub docking_ir: Option<DockingIr>,
    pub inertial: Option<InertialSensorData>,
    pub cliff: Option<CliffSensorData>,
    pub current: Option<MotorCurrent>,
    pub hardware_version: Option<Version>,
    pub firmware_version: Option<Version>,
    pub raw_gyro: Option<RawGyroData>,
    pub general_purpose_input: Option<GeneralPurposeInput>,
    pub unique_device_id: Option<UniqueDeviceId>,
    pub controller_info: Option<ControllerInfo>,
}

impl SensorSnapshot {
    /// 解析整帧载荷
    ///
    /// 依次遍历 `[id, len, data...]` 子载荷：未知 ID 按长度跳过，
    /// 已知子载荷超出文档长度的尾部字节被忽略，同一 ID 重复出现时以最后一个为准。
    pub fn parse(payload: &[u8]) -> Result<Self, ProtocolError> {
        let mut basic = None;
        let mut snapshot = SensorSnapshot::default();

        let mut offset = 0;
        while offset < payload.len() {
            let id = payload[offset];
            let Some(&len) = payload.get(offset + 1) else {
                return Err(ProtocolError::Truncated {
                    id,
                    needed: 2,
                    available: payload.len() - offset,
                });
            };
            let start = offset + 2;
            let end = start + len as usize;
            if end > payload.len() {
                return Err(ProtocolError::Truncated {
                    id,
                    needed: len as usize,
                    available: payload.len() - start,
                });
            }
            let data = &payload[start..end];

            match FeedbackKind::from_id(id) {
                FeedbackKind::BasicSensorData => basic = Some(BasicSensorData::parse(data)?),
                FeedbackKind::DockingIr => snapshot.docking_ir = Some(DockingIr::parse(data)?),
                FeedbackKind::InertialSensor => {
                    snapshot.inertial = Some(InertialSensorData::parse(data)?)
                },
                FeedbackKind::Cliff => snapshot.cliff = Some(CliffSensorData::parse(data)?),
                FeedbackKind::Current => snapshot.current = Some(MotorCurrent::parse(data)?),
                FeedbackKind::HardwareVersion => {
                    snapshot.hardware_version = Some(Version::parse(id, data)?)
                },
                FeedbackKind::FirmwareVersion => {
                    snapshot.firmware_version = Some(Version::parse(id, data)?)
                },
                FeedbackKind::RawGyro => snapshot.raw_gyro = Some(RawGyroData::parse(data)?),
                FeedbackKind::GeneralPurposeInput => {
                    snapshot.general_purpose_input = Some(GeneralPurposeInput::parse(data)?)
                },
                FeedbackKind::UniqueDeviceId => {
                    snapshot.unique_device_id = Some(UniqueDeviceId::parse(data)?)
                },
                FeedbackKind::ControllerInfo => {
                    snapshot.controller_info = Some(ControllerInfo::parse(data)?)
                },
                FeedbackKind::Unknown => {},
            }

            offset = end;
        }

        snapshot.basic = basic.ok_or(ProtocolError::MissingSubPayload {
            id: ID_BASIC_SENSOR_DATA,
        })?;
        Ok(snapshot)
    }

    /// 按键状态 [B0, B1, B2]
    pub fn buttons(&self) -> [bool; 3] {
        self.basic.buttons.as_array()
    }

    /// 碰撞状态 (left, center, right)
    pub fn bumps(&self) -> (bool, bool, bool) {
        let b = self.basic.bumper;
        (b.left(), b.center(), b.right())
    }

    /// 轮子悬空状态 (left, right)
    pub fn wheel_drops(&self) -> (bool, bool) {
        let w = self.basic.wheel_drop;
        (w.left(), w.right())
    }

    /// 编码器计数 (left, right)
    pub fn encoders(&self) -> (u16, u16) {
        (self.basic.left_encoder, self.basic.right_encoder)
    }

    /// 电池电压（V）
    pub fn battery_voltage(&self) -> f64 {
        self.basic.battery_voltage()
    }

    /// 航向角（度），帧中无惯性子载荷时返回 None
    pub fn heading_deg(&self) -> Option<f64> {
        self.inertial.map(|i| i.heading_deg())
    }
}

impl TryFrom<&KobukiFrame> for SensorSnapshot {
    type Error = ProtocolError;

    fn try_from(frame: &KobukiFrame) -> Result<Self, Self::Error> {
        Self::parse(frame.payload())
    }
}
