//! 串口帧接收状态机
//!
//! 逐字节读取串口，按 `AwaitHeader → ReadLength → ReadPayload → ReadChecksum`
//! 的顺序组帧。帧头用 2 字节滑动窗口匹配，因此 `AA AA 55` 也是合法帧头。
//! 缓冲区只保存 `len ++ payload ++ checksum`，从不包含帧头。
//!
//! 校验失败时丢弃当前帧并重新同步；连续失败计数跨调用保留，
//! 超过上限后返回 [`DriverError::ChecksumFailures`]。

use crate::error::DriverError;
use kobuki_protocol::{
    HEADER, KobukiFrame, MAX_BODY_LEN, ProtocolError, SensorSnapshot, checksum,
};
use kobuki_serial::SerialAdapter;
use std::time::Duration;
use tracing::{debug, error, trace, warn};

/// 暂无数据时的等待策略
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "kind", rename_all = "snake_case")
)]
pub enum IdleStrategy {
    /// 忙等（最低延迟，占满一个核）
    BusySpin,
    /// 让出时间片
    Yield,
    /// 睡眠指定微秒（spin_sleep 提供微秒级精度）
    Sleep { micros: u64 },
}

impl Default for IdleStrategy {
    fn default() -> Self {
        IdleStrategy::Sleep { micros: 100 }
    }
}

impl IdleStrategy {
    /// 执行一次等待
    pub fn idle(&self) {
        match *self {
            IdleStrategy::BusySpin => std::hint::spin_loop(),
            IdleStrategy::Yield => std::thread::yield_now(),
            IdleStrategy::Sleep { micros } => spin_sleep::sleep(Duration::from_micros(micros)),
        }
    }
}

/// 接收器配置
///
/// # Example
///
/// ```
/// use kobuki_driver::{IdleStrategy, ReceiverConfig};
///
/// let config = ReceiverConfig {
///     max_checksum_failures: 5,
///     idle: IdleStrategy::Yield,
/// };
/// assert_ne!(config, ReceiverConfig::default());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct ReceiverConfig {
    /// 可容忍的连续校验失败次数，再失败一次即报错
    pub max_checksum_failures: u32,
    /// 暂无数据时的等待策略
    pub idle: IdleStrategy,
}

impl Default for ReceiverConfig {
    fn default() -> Self {
        Self {
            max_checksum_failures: 3,
            idle: IdleStrategy::default(),
        }
    }
}

/// 接收统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReceiverStats {
    /// 校验通过的帧数
    pub frames: u64,
    /// 校验失败的帧数（累计，不因成功而清零）
    pub checksum_failures: u64,
    /// 同步过程中丢弃的字节数
    pub discarded_bytes: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    AwaitHeader,
    ReadLength,
    ReadPayload { remaining: usize },
    ReadChecksum,
}

/// 一帧已校验的帧体视图
///
/// 借用接收器内部缓冲区，下一次接收前有效。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameView<'a> {
    body: &'a [u8],
}

impl<'a> FrameView<'a> {
    /// 长度字节
    pub fn len(&self) -> u8 {
        self.body[0]
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 载荷
    pub fn payload(&self) -> &'a [u8] {
        &self.body[1..self.body.len() - 1]
    }

    /// 校验字节
    pub fn checksum(&self) -> u8 {
        self.body[self.body.len() - 1]
    }

    /// 帧体原始字节（`len ++ payload ++ checksum`）
    pub fn as_bytes(&self) -> &'a [u8] {
        self.body
    }

    /// 复制为独立的帧
    pub fn to_frame(&self) -> KobukiFrame {
        KobukiFrame::new(self.payload())
    }

    /// 解析为传感器快照
    pub fn parse_sensors(&self) -> Result<SensorSnapshot, ProtocolError> {
        SensorSnapshot::parse(self.payload())
    }
}

/// 帧接收器
#[derive(Debug)]
pub struct FrameReceiver {
    config: ReceiverConfig,
    state: State,
    /// 帧头滑动窗口中的上一个字节
    last_byte: Option<u8>,
    buf: Box<[u8]>,
    filled: usize,
    consecutive_failures: u32,
    stats: ReceiverStats,
}

impl Default for FrameReceiver {
    fn default() -> Self {
        Self::new(ReceiverConfig::default())
    }
}

impl FrameReceiver {
    pub fn new(config: ReceiverConfig) -> Self {
        Self {
            config,
            state: State::AwaitHeader,
            last_byte: None,
            buf: vec![0u8; MAX_BODY_LEN].into_boxed_slice(),
            filled: 0,
            consecutive_failures: 0,
            stats: ReceiverStats::default(),
        }
    }

    pub fn config(&self) -> &ReceiverConfig {
        &self.config
    }

    /// 当前连续校验失败次数
    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    pub fn stats(&self) -> ReceiverStats {
        self.stats
    }

    /// 丢弃未完成的帧并清零失败计数
    pub fn reset(&mut self) {
        self.abort_frame();
        self.consecutive_failures = 0;
    }

    fn abort_frame(&mut self) {
        self.state = State::AwaitHeader;
        self.last_byte = None;
        self.filled = 0;
    }

    fn push(&mut self, byte: u8) {
        self.buf[self.filled] = byte;
        self.filled += 1;
    }

    /// 阻塞读取直到收到一帧校验通过的帧
    ///
    /// # Errors
    /// - `DriverError::Serial`: 读取失败；未完成的帧被丢弃，失败计数保留
    /// - `DriverError::ChecksumFailures`: 连续校验失败超过上限；失败计数随后清零
    pub fn receive<'a, A>(&'a mut self, adapter: &mut A) -> Result<FrameView<'a>, DriverError>
    where
        A: SerialAdapter + ?Sized,
    {
        loop {
            let byte = match adapter.read_byte() {
                Ok(Some(byte)) => byte,
                Ok(None) => {
                    self.config.idle.idle();
                    continue;
                },
                Err(e) => {
                    if self.state != State::AwaitHeader {
                        debug!("Read error in {:?}, dropping partial frame", self.state);
                    }
                    self.abort_frame();
                    return Err(e.into());
                },
            };

            match self.state {
                State::AwaitHeader => {
                    if self.last_byte == Some(HEADER[0]) && byte == HEADER[1] {
                        self.state = State::ReadLength;
                        self.last_byte = None;
                    } else {
                        if let Some(dropped) = self.last_byte {
                            trace!("Dropping byte 0x{:02X} while seeking header", dropped);
                            self.stats.discarded_bytes += 1;
                        }
                        self.last_byte = Some(byte);
                    }
                },
                State::ReadLength => {
                    self.filled = 0;
                    self.push(byte);
                    self.state = if byte == 0 {
                        State::ReadChecksum
                    } else {
                        State::ReadPayload {
                            remaining: byte as usize,
                        }
                    };
                },
                State::ReadPayload { remaining } => {
                    self.push(byte);
                    self.state = if remaining == 1 {
                        State::ReadChecksum
                    } else {
                        State::ReadPayload {
                            remaining: remaining - 1,
                        }
                    };
                },
                State::ReadChecksum => {
                    let expected = checksum(&self.buf[..self.filled]);
                    self.push(byte);
                    self.state = State::AwaitHeader;

                    if expected == byte {
                        self.consecutive_failures = 0;
                        self.stats.frames += 1;
                        let body = &self.buf[..self.filled];
                        debug!("Received frame: len={} body={}", body[0], hex::encode(body));
                        return Ok(FrameView { body });
                    }

                    self.stats.checksum_failures += 1;
                    self.filled = 0;
                    warn!(
                        "Checksum mismatch: expected 0x{:02X}, got 0x{:02X} ({} consecutive)",
                        expected,
                        byte,
                        self.consecutive_failures.saturating_add(1)
                    );

                    if self.consecutive_failures >= self.config.max_checksum_failures {
                        let count = self.consecutive_failures.saturating_add(1);
                        self.consecutive_failures = 0;
                        error!("Giving up after {} consecutive checksum failures", count);
                        return Err(DriverError::ChecksumFailures { count });
                    }
                    self.consecutive_failures += 1;
                },
            }
        }
    }
}
