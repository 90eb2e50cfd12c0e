//! # Kobuki Protocol
//!
//! Kobuki 底盘串口协议定义（无硬件依赖）
//!
//! ## 模块
//!
//! - `ids`: 子载荷（sub-payload）ID 常量定义
//! - `control`: 命令帧构建
//! - `feedback`: 传感器反馈解析
//!
//! ## 帧格式
//!
//! ```text
//! [0xAA][0x55][len:u8][payload: len 字节][checksum:u8]
//! checksum = XOR(len, payload[0], ..., payload[len-1])
//! ```
//!
//! ## 字节序
//!
//! 载荷内所有多字节字段均为小端字节序（Little-Endian）。
//! 本模块提供了字节序转换工具函数。

pub mod control;
pub mod feedback;
pub mod ids;

// 重新导出常用类型
pub use control::*;
pub use feedback::*;
pub use ids::*;

use smallvec::SmallVec;
use thiserror::Error;

/// 帧头（固定两字节）
pub const HEADER: [u8; 2] = [0xAA, 0x55];

/// 单帧载荷最大长度（长度字段为 u8）
pub const MAX_PAYLOAD_LEN: usize = u8::MAX as usize;

/// 帧开销：帧头 2 字节 + 长度 1 字节 + 校验 1 字节
pub const FRAME_OVERHEAD: usize = 4;

/// 帧体最大长度（长度字节 + 载荷 + 校验字节，不含帧头）
pub const MAX_BODY_LEN: usize = 1 + MAX_PAYLOAD_LEN + 1;

/// 载荷缓冲区
///
/// 命令载荷最长 15 字节（PID 设置），栈上预留 32 字节即可覆盖所有发送路径；
/// 传感器反馈载荷通常在 70 字节以上，会溢出到堆上，这在 50Hz 的接收频率下可以接受。
pub type PayloadBuffer = SmallVec<[u8; 32]>;

/// 完整线上字节缓冲区（帧头 + 长度 + 载荷 + 校验）
pub type WireBuffer = SmallVec<[u8; 36]>;

/// Kobuki 串口帧的统一抽象
///
/// 协议层和传输层之间的中间抽象：命令通过 `to_frame()` 构建 `KobukiFrame`，
/// 再由 `encode()` 生成线上字节；接收端验证过校验和的帧体通过
/// [`KobukiFrame::from_body`] 还原。
///
/// # 示例
///
/// ```rust
/// use kobuki_protocol::KobukiFrame;
///
/// let frame = KobukiFrame::new(&[0x04, 0x01, 0x00]);
/// assert_eq!(frame.len(), 3);
/// assert_eq!(frame.encode().as_slice(), &[0xAA, 0x55, 0x03, 0x04, 0x01, 0x00, 0x06]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KobukiFrame {
    payload: PayloadBuffer,
}

impl KobukiFrame {
    /// 创建帧（超过 255 字节的部分被截断）
    pub fn new(payload: &[u8]) -> Self {
        let len = payload.len().min(MAX_PAYLOAD_LEN);
        Self {
            payload: SmallVec::from_slice(&payload[..len]),
        }
    }

    /// 创建帧，载荷超长时返回错误
    pub fn try_new(payload: &[u8]) -> Result<Self, ProtocolError> {
        if payload.len() > MAX_PAYLOAD_LEN {
            return Err(ProtocolError::PayloadTooLong {
                len: payload.len(),
            });
        }
        Ok(Self::new(payload))
    }

    /// 获取载荷切片
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// 载荷长度（即线上的长度字节）
    pub fn len(&self) -> u8 {
        self.payload.len() as u8
    }

    /// 检查载荷是否为空
    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }

    /// 计算校验和：XOR(len ++ payload)
    pub fn checksum(&self) -> u8 {
        self.len() ^ checksum(&self.payload)
    }

    /// 线上总字节数（len + 4）
    pub fn wire_len(&self) -> usize {
        self.payload.len() + FRAME_OVERHEAD
    }

    /// 编码为线上字节
    pub fn encode(&self) -> WireBuffer {
        let mut out = WireBuffer::with_capacity(self.wire_len());
        out.extend_from_slice(&HEADER);
        out.push(self.len());
        out.extend_from_slice(&self.payload);
        out.push(self.checksum());
        out
    }

    /// 从完整线上字节解析（含帧头，长度必须精确匹配）
    pub fn decode(bytes: &[u8]) -> Result<Self, ProtocolError> {
        if bytes.len() < FRAME_OVERHEAD {
            return Err(ProtocolError::InvalidLength {
                expected: FRAME_OVERHEAD,
                actual: bytes.len(),
            });
        }
        if bytes[..2] != HEADER {
            return Err(ProtocolError::InvalidHeader {
                found: [bytes[0], bytes[1]],
            });
        }
        Self::from_body(&bytes[2..])
    }

    /// 从帧体解析（长度字节 + 载荷 + 校验字节，不含帧头）
    ///
    /// 这是接收状态机缓冲区的布局。
    pub fn from_body(body: &[u8]) -> Result<Self, ProtocolError> {
        let Some(&len) = body.first() else {
            return Err(ProtocolError::InvalidLength {
                expected: 2,
                actual: 0,
            });
        };
        let expected = len as usize + 2;
        if body.len() != expected {
            return Err(ProtocolError::InvalidLength {
                expected,
                actual: body.len(),
            });
        }

        let frame = Self::new(&body[1..expected - 1]);
        let actual = body[expected - 1];
        let expected_cs = frame.checksum();
        if expected_cs != actual {
            return Err(ProtocolError::ChecksumMismatch {
                expected: expected_cs,
                actual,
            });
        }
        Ok(frame)
    }
}

/// 对字节序列做 XOR 累积
///
/// 帧校验和等于 `checksum(&[len]) ^ checksum(payload)`，
/// 即对长度字节和全部载荷字节做 XOR。
pub fn checksum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0u8, |acc, &b| acc ^ b)
}

/// 协议解析错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("Invalid frame length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("Payload too long: {len} bytes (max 255)")]
    PayloadTooLong { len: usize },

    #[error("Invalid frame header: {found:02X?}")]
    InvalidHeader { found: [u8; 2] },

    #[error("Checksum mismatch: expected 0x{expected:02X}, got 0x{actual:02X}")]
    ChecksumMismatch { expected: u8, actual: u8 },

    #[error("Sub-payload 0x{id:02X} has invalid length: expected {expected}, got {actual}")]
    SubPayloadLength { id: u8, expected: usize, actual: usize },

    #[error("Sub-payload 0x{id:02X} truncated: needs {needed} bytes, {available} available")]
    Truncated {
        id: u8,
        needed: usize,
        available: usize,
    },

    #[error("Missing sub-payload 0x{id:02X}")]
    MissingSubPayload { id: u8 },

    #[error("Invalid value for field {field}: {value}")]
    InvalidValue { field: String, value: u8 },
}

/// 字节序转换工具函数
///
/// 协议使用小端字节序，这些函数用于在协议层进行字节序转换。
///
/// 小端字节序转 u16
pub fn bytes_to_u16_le(bytes: [u8; 2]) -> u16 {
    u16::from_le_bytes(bytes)
}

/// 小端字节序转 i16
pub fn bytes_to_i16_le(bytes: [u8; 2]) -> i16 {
    i16::from_le_bytes(bytes)
}

/// 小端字节序转 u32
pub fn bytes_to_u32_le(bytes: [u8; 4]) -> u32 {
    u32::from_le_bytes(bytes)
}

/// i16 转小端字节序
pub fn i16_to_bytes_le(value: i16) -> [u8; 2] {
    value.to_le_bytes()
}

/// u16 转小端字节序
pub fn u16_to_bytes_le(value: u16) -> [u8; 2] {
    value.to_le_bytes()
}

/// u32 转小端字节序
pub fn u32_to_bytes_le(value: u32) -> [u8; 4] {
    value.to_le_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_xor() {
        assert_eq!(checksum(&[]), 0);
        assert_eq!(checksum(&[0x12]), 0x12);
        assert_eq!(checksum(&[0x0F, 0xF0]), 0xFF);
        assert_eq!(checksum(&[0xAB, 0xAB]), 0x00);
    }

    #[test]
    fn test_frame_checksum_includes_length_byte() {
        // len=3, payload=[04 01 00] -> 03 ^ 04 ^ 01 ^ 00 = 06
        let frame = KobukiFrame::new(&[0x04, 0x01, 0x00]);
        assert_eq!(frame.checksum(), 0x06);
    }

    #[test]
    fn test_encode_layout() {
        let frame = KobukiFrame::new(&[0x09, 0x02, 0x0B, 0x00]);
        let bytes = frame.encode();
        assert_eq!(bytes.len(), frame.wire_len());
        assert_eq!(&bytes[..3], &[0xAA, 0x55, 0x04]);
        assert_eq!(&bytes[3..7], &[0x09, 0x02, 0x0B, 0x00]);
        assert_eq!(bytes[7], 0x04 ^ 0x09 ^ 0x02 ^ 0x0B);
    }

    #[test]
    fn test_empty_frame() {
        let frame = KobukiFrame::new(&[]);
        assert!(frame.is_empty());
        assert_eq!(frame.encode().as_slice(), &[0xAA, 0x55, 0x00, 0x00]);
    }

    #[test]
    fn test_new_truncates_oversized_payload() {
        let payload = vec![0x11u8; 300];
        let frame = KobukiFrame::new(&payload);
        assert_eq!(frame.len(), 255);
        assert_eq!(frame.payload().len(), 255);
    }

    #[test]
    fn test_try_new_rejects_oversized_payload() {
        let payload = vec![0u8; 256];
        assert_eq!(
            KobukiFrame::try_new(&payload),
            Err(ProtocolError::PayloadTooLong { len: 256 })
        );
        assert!(KobukiFrame::try_new(&payload[..255]).is_ok());
    }

    #[test]
    fn test_decode_valid_frame() {
        let original = KobukiFrame::new(&[0x01, 0x04, 0x64, 0x00, 0x00, 0x00]);
        let decoded = KobukiFrame::decode(&original.encode()).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn test_decode_bad_header() {
        let err = KobukiFrame::decode(&[0xAA, 0x56, 0x00, 0x00]).unwrap_err();
        assert_eq!(err, ProtocolError::InvalidHeader { found: [0xAA, 0x56] });
    }

    #[test]
    fn test_decode_bad_checksum() {
        let mut bytes = KobukiFrame::new(&[0x04, 0x01, 0x03]).encode();
        let last = bytes.len() - 1;
        bytes[last] ^= 0xFF;
        assert!(matches!(
            KobukiFrame::decode(&bytes),
            Err(ProtocolError::ChecksumMismatch { .. })
        ));
    }

    #[test]
    fn test_from_body_length_mismatch() {
        // 声明 3 字节载荷，但只给了 1 字节
        let err = KobukiFrame::from_body(&[0x03, 0x01, 0x02]).unwrap_err();
        assert_eq!(
            err,
            ProtocolError::InvalidLength {
                expected: 5,
                actual: 3
            }
        );
        assert!(KobukiFrame::from_body(&[]).is_err());
    }

    #[test]
    fn test_le_helpers() {
        assert_eq!(bytes_to_u16_le([0x34, 0x12]), 0x1234);
        assert_eq!(bytes_to_i16_le([0xFF, 0xFF]), -1);
        assert_eq!(bytes_to_u32_le([0x78, 0x56, 0x34, 0x12]), 0x1234_5678);
        assert_eq!(i16_to_bytes_le(-2), [0xFE, 0xFF]);
        assert_eq!(u16_to_bytes_le(0x1234), [0x34, 0x12]);
        assert_eq!(u32_to_bytes_le(0x1234_5678), [0x78, 0x56, 0x34, 0x12]);
    }
}
