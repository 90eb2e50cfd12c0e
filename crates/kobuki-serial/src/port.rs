//! 基于 `serialport` 的串口后端
//!
//! Kobuki 底盘固定使用 115200 8N1、无流控。打开时清空输入缓冲区，
//! 丢弃上电后积压的半帧数据。

use crate::{SerialAdapter, SerialError};
use serialport::{ClearBuffer, DataBits, FlowControl, Parity, SerialPort, SerialPortType, StopBits};
use std::io::{self, Read, Write};
use std::time::Duration;
use tracing::{debug, info, trace};

/// 串口参数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SerialConfig {
    /// 波特率（默认 115200）
    pub baud_rate: u32,
    /// 单次读超时；超时视为暂无数据
    pub timeout: Duration,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            baud_rate: 115_200,
            timeout: Duration::from_millis(10),
        }
    }
}

/// 真实串口适配器
pub struct SerialPortAdapter {
    port: Box<dyn SerialPort>,
    path: String,
}

impl SerialPortAdapter {
    /// 打开串口（8N1，无流控）并清空输入缓冲区
    pub fn open(path: &str, config: SerialConfig) -> Result<Self, SerialError> {
        let port = serialport::new(path, config.baud_rate)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .timeout(config.timeout)
            .open()?;
        port.clear(ClearBuffer::Input)?;

        info!(
            "Opened serial port {} @ {} baud (timeout {:?})",
            path, config.baud_rate, config.timeout
        );
        Ok(Self {
            port,
            path: path.to_string(),
        })
    }

    /// 设备路径
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl std::fmt::Debug for SerialPortAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialPortAdapter")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl SerialAdapter for SerialPortAdapter {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, SerialError> {
        match self.port.read(buf) {
            Ok(n) => Ok(n),
            Err(e)
                if matches!(
                    e.kind(),
                    io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted
                ) =>
            {
                trace!("Serial read returned no data ({:?})", e.kind());
                Ok(0)
            },
            Err(e) => Err(SerialError::Io(e)),
        }
    }

    fn write_all(&mut self, bytes: &[u8]) -> Result<(), SerialError> {
        self.port.write_all(bytes)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), SerialError> {
        self.port.flush()?;
        Ok(())
    }

    fn clear_input(&mut self) -> Result<(), SerialError> {
        self.port.clear(ClearBuffer::Input)?;
        debug!("Cleared input buffer of {}", self.path);
        Ok(())
    }
}

// ============================================================================
// 端口枚举
// ============================================================================

/// 端口类型
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PortKind {
    Usb {
        vid: u16,
        pid: u16,
        serial_number: Option<String>,
        manufacturer: Option<String>,
        product: Option<String>,
    },
    Pci,
    Bluetooth,
    Unknown,
}

/// 可用串口信息
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PortInfo {
    pub name: String,
    pub kind: PortKind,
}

impl From<serialport::SerialPortInfo> for PortInfo {
    fn from(info: serialport::SerialPortInfo) -> Self {
        let kind = match info.port_type {
            SerialPortType::UsbPort(usb) => PortKind::Usb {
                vid: usb.vid,
                pid: usb.pid,
                serial_number: usb.serial_number,
                manufacturer: usb.manufacturer,
                product: usb.product,
            },
            SerialPortType::PciPort => PortKind::Pci,
            SerialPortType::BluetoothPort => PortKind::Bluetooth,
            SerialPortType::Unknown => PortKind::Unknown,
        };
        Self {
            name: info.port_name,
            kind,
        }
    }
}

/// 列出系统中的串口
pub fn list_ports() -> Result<Vec<PortInfo>, SerialError> {
    let ports = serialport::available_ports()?;
    Ok(ports.into_iter().map(PortInfo::from).collect())
}
