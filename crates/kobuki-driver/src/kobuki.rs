//! Kobuki 底盘句柄
//!
//! 持有串口适配器和帧接收器，所有操作都是同步阻塞的，按到达顺序处理帧。

use crate::error::DriverError;
use crate::motion::{self, TurnDirection};
use crate::receiver::{FrameReceiver, ReceiverConfig, ReceiverStats};
use kobuki_protocol::{
    BaseControlCommand, ControllerGainCommand, GeneralOutputCommand, GetControllerGainCommand,
    KobukiFrame, PidGains, RequestExtraCommand, SensorSnapshot, SoundCommand, SoundSequence,
    SoundSequenceCommand,
};
use kobuki_serial::SerialAdapter;
use tracing::debug;

/// Kobuki 底盘
///
/// 泛型参数 `A` 为串口后端：真实设备使用 `SerialPortAdapter`，
/// 测试使用 `MockSerialAdapter`。
///
/// # Example
///
/// ```no_run
/// use kobuki_driver::KobukiBuilder;
///
/// let mut kobuki = KobukiBuilder::new().port("/dev/ttyUSB0").build()?;
/// let snapshot = kobuki.poll_sensors()?;
/// if snapshot.bumps() != (false, false, false) {
///     kobuki.stop()?;
/// }
/// # Ok::<(), kobuki_driver::DriverError>(())
/// ```
#[derive(Debug)]
pub struct Kobuki<A: SerialAdapter> {
    adapter: A,
    receiver: FrameReceiver,
}

impl<A: SerialAdapter> Kobuki<A> {
    pub fn new(adapter: A, config: ReceiverConfig) -> Self {
        Self {
            adapter,
            receiver: FrameReceiver::new(config),
        }
    }

    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    pub fn adapter_mut(&mut self) -> &mut A {
        &mut self.adapter
    }

    /// 取回串口适配器
    pub fn into_inner(self) -> A {
        self.adapter
    }

    pub fn receiver_stats(&self) -> ReceiverStats {
        self.receiver.stats()
    }

    // ------------------------------------------------------------------------
    // 接收
    // ------------------------------------------------------------------------

    /// 阻塞等待下一帧并解析为传感器快照
    pub fn poll_sensors(&mut self) -> Result<SensorSnapshot, DriverError> {
        let view = self.receiver.receive(&mut self.adapter)?;
        Ok(view.parse_sensors()?)
    }

    /// 阻塞等待下一帧，返回未解析的帧
    pub fn poll_frame(&mut self) -> Result<KobukiFrame, DriverError> {
        let view = self.receiver.receive(&mut self.adapter)?;
        Ok(view.to_frame())
    }

    /// 丢弃串口输入缓冲区和未完成的帧，从下一个帧头重新同步
    pub fn resync(&mut self) -> Result<(), DriverError> {
        self.adapter.clear_input()?;
        self.receiver.reset();
        Ok(())
    }

    // ------------------------------------------------------------------------
    // 发送
    // ------------------------------------------------------------------------

    /// 发送一帧
    pub fn send(&mut self, frame: &KobukiFrame) -> Result<(), DriverError> {
        debug!("Sending frame: {}", hex::encode(frame.encode()));
        self.adapter.send_frame(frame)?;
        self.adapter.flush()?;
        Ok(())
    }

    /// 按左右轮速（mm/s）行驶，换算规则见 [`motion::direct_to_arc`]
    pub fn drive_direct(&mut self, left: i16, right: i16) -> Result<(), DriverError> {
        let cmd = motion::direct_to_arc(left, right);
        debug!(
            "drive_direct({}, {}) -> speed={} radius={}",
            left, right, cmd.speed, cmd.radius
        );
        self.send(&cmd.to_frame())
    }

    /// 按圆弧行驶（半径 0 直行，1 原地旋转）
    pub fn drive_radius(&mut self, radius: i16, speed: i16) -> Result<(), DriverError> {
        self.send(&BaseControlCommand::new(speed, radius).to_frame())
    }

    /// 停止
    pub fn stop(&mut self) -> Result<(), DriverError> {
        self.drive_radius(0, 0)
    }

    /// 固定左转（半径 10mm，35mm/s）
    pub fn turn_left_fixed(&mut self) -> Result<(), DriverError> {
        self.send(&motion::fixed_turn(TurnDirection::Left).to_frame())
    }

    /// 固定右转（半径 10mm，-35mm/s）
    pub fn turn_right_fixed(&mut self) -> Result<(), DriverError> {
        self.send(&motion::fixed_turn(TurnDirection::Right).to_frame())
    }

    /// 恢复轮速控制器出厂增益
    pub fn set_controller_default(&mut self) -> Result<(), DriverError> {
        self.send(&ControllerGainCommand::Default.to_frame())
    }

    /// 设置轮速控制器用户增益
    pub fn set_controller_user(&mut self, gains: PidGains) -> Result<(), DriverError> {
        self.send(&ControllerGainCommand::User(gains).to_frame())
    }

    /// 请求当前控制器增益（在后续反馈帧的 `controller_info` 中返回）
    pub fn request_controller_gain(&mut self) -> Result<(), DriverError> {
        self.send(&GetControllerGainCommand.to_frame())
    }

    /// 播放预设音效
    pub fn play_sound_sequence(&mut self, sequence: SoundSequence) -> Result<(), DriverError> {
        self.send(&SoundSequenceCommand::new(sequence).to_frame())
    }

    /// 播放单音
    ///
    /// # Errors
    /// - `DriverError::InvalidInput`: 频率不是正的有限值
    pub fn play_sound(&mut self, frequency_hz: f64, duration_ms: u8) -> Result<(), DriverError> {
        if !(frequency_hz.is_finite() && frequency_hz > 0.0) {
            return Err(DriverError::InvalidInput(format!(
                "frequency must be positive, got {frequency_hz}"
            )));
        }
        self.send(&SoundCommand::from_frequency(frequency_hz, duration_ms).to_frame())
    }

    /// 设置数字输出与 LED（各取低 4 位，电源通道保持打开）
    pub fn set_general_output(&mut self, outputs: u8, leds: u8) -> Result<(), DriverError> {
        self.send(&GeneralOutputCommand::new(outputs, leds).to_frame())
    }

    /// 请求硬件版本、固件版本和设备唯一 ID
    pub fn request_information(&mut self) -> Result<(), DriverError> {
        self.send(&RequestExtraCommand::all().to_frame())
    }
}
