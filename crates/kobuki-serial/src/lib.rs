//! # Kobuki Serial Adapter Layer
//!
//! 串口硬件抽象层，提供统一的字节流接口抽象。
//!
//! - [`SerialPortAdapter`]：基于 `serialport` 的真实串口后端
//! - [`mock::MockSerialAdapter`]：脚本化的内存后端（`mock` feature）

use std::io;
use thiserror::Error;

// 重新导出 kobuki-protocol 中的 KobukiFrame
pub use kobuki_protocol::KobukiFrame;

pub mod port;

pub use port::{PortInfo, PortKind, SerialConfig, SerialPortAdapter, list_ports};

#[cfg(any(test, feature = "mock"))]
pub mod mock;

/// 串口适配层统一错误类型
#[derive(Error, Debug)]
pub enum SerialError {
    #[error("IO Error: {0}")]
    Io(#[from] io::Error),
    #[error("Port Error: {0}")]
    Port(#[from] serialport::Error),
    #[error("Device disconnected")]
    Disconnected,
}

impl SerialError {
    /// 设备已不可用（重试没有意义）
    pub fn is_fatal(&self) -> bool {
        match self {
            SerialError::Disconnected => true,
            SerialError::Port(e) => matches!(e.kind(), serialport::ErrorKind::NoDevice),
            SerialError::Io(e) => matches!(
                e.kind(),
                io::ErrorKind::NotFound | io::ErrorKind::BrokenPipe | io::ErrorKind::PermissionDenied
            ),
        }
    }
}

/// 串口字节流适配器
///
/// 读取为非阻塞语义：`read` 返回 `Ok(0)` 表示暂无数据（超时），
/// 由上层的空闲策略决定如何等待。
pub trait SerialAdapter {
    /// 读取可用字节，返回读取数量；`Ok(0)` 表示暂无数据
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, SerialError>;

    /// 写入全部字节
    fn write_all(&mut self, bytes: &[u8]) -> Result<(), SerialError>;

    /// 读取单个字节；`Ok(None)` 表示暂无数据
    fn read_byte(&mut self) -> Result<Option<u8>, SerialError> {
        let mut byte = [0u8; 1];
        match self.read(&mut byte)? {
            0 => Ok(None),
            _ => Ok(Some(byte[0])),
        }
    }

    /// 编码并发送一帧
    fn send_frame(&mut self, frame: &KobukiFrame) -> Result<(), SerialError> {
        self.write_all(&frame.encode())
    }

    /// 刷新输出缓冲区
    fn flush(&mut self) -> Result<(), SerialError> {
        Ok(())
    }

    /// 丢弃输入缓冲区中尚未读取的字节
    fn clear_input(&mut self) -> Result<(), SerialError> {
        Ok(())
    }
}

impl<A: SerialAdapter + ?Sized> SerialAdapter for Box<A> {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, SerialError> {
        (**self).read(buf)
    }

    fn write_all(&mut self, bytes: &[u8]) -> Result<(), SerialError> {
        (**self).write_all(bytes)
    }

    fn read_byte(&mut self) -> Result<Option<u8>, SerialError> {
        (**self).read_byte()
    }

    fn send_frame(&mut self, frame: &KobukiFrame) -> Result<(), SerialError> {
        (**self).send_frame(frame)
    }

    fn flush(&mut self) -> Result<(), SerialError> {
        (**self).flush()
    }

    fn clear_input(&mut self) -> Result<(), SerialError> {
        (**self).clear_input()
    }
}
