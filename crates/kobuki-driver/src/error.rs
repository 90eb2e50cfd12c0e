//! 驱动层错误类型定义

use kobuki_protocol::ProtocolError;
use kobuki_serial::SerialError;
use thiserror::Error;

/// 驱动层错误类型
#[derive(Error, Debug)]
pub enum DriverError {
    /// 串口错误
    #[error("Serial error: {0}")]
    Serial(#[from] SerialError),

    /// 协议解析错误
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// 连续校验失败超过上限
    #[error("Too many consecutive checksum failures ({count})")]
    ChecksumFailures { count: u32 },

    /// 无效输入
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl DriverError {
    /// 连续校验失败的状态码
    pub const STATUS_CHECKSUM_FAILURES: i32 = -1500;

    /// 负数状态码，供需要数值错误码的调用方使用
    ///
    /// | 错误 | 状态码 |
    /// |------|--------|
    /// | `Serial` | -1 |
    /// | `Protocol` | -2 |
    /// | `InvalidInput` | -3 |
    /// | `ChecksumFailures` | -1500 |
    pub fn status_code(&self) -> i32 {
        match self {
            DriverError::Serial(_) => -1,
            DriverError::Protocol(_) => -2,
            DriverError::InvalidInput(_) => -3,
            DriverError::ChecksumFailures { .. } => Self::STATUS_CHECKSUM_FAILURES,
        }
    }

    /// 底盘已不可用；其余错误可在重新同步后继续读取
    pub fn is_fatal(&self) -> bool {
        match self {
            DriverError::Serial(e) => e.is_fatal(),
            DriverError::Protocol(_)
            | DriverError::ChecksumFailures { .. }
            | DriverError::InvalidInput(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::DriverError;
    use kobuki_protocol::ProtocolError;
    use kobuki_serial::SerialError;

    /// 测试 DriverError 的 Display 实现
    #[test]
    fn test_driver_error_display() {
        let driver_error = DriverError::Serial(SerialError::Disconnected);
        let msg = format!("{}", driver_error);
        assert!(msg.contains("Serial") && msg.contains("disconnected"), "{}", msg);

        let driver_error = DriverError::Protocol(ProtocolError::MissingSubPayload { id: 0x01 });
        let msg = format!("{}", driver_error);
        assert!(msg.contains("Missing sub-payload 0x01"), "{}", msg);

        let driver_error = DriverError::ChecksumFailures { count: 4 };
        assert_eq!(
            format!("{}", driver_error),
            "Too many consecutive checksum failures (4)"
        );
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(DriverError::Serial(SerialError::Disconnected).status_code(), -1);
        assert_eq!(
            DriverError::Protocol(ProtocolError::PayloadTooLong { len: 300 }).status_code(),
            -2
        );
        assert_eq!(DriverError::InvalidInput("x".into()).status_code(), -3);
        assert_eq!(DriverError::ChecksumFailures { count: 4 }.status_code(), -1500);
    }

    #[test]
    fn test_fatal_errors() {
        assert!(DriverError::Serial(SerialError::Disconnected).is_fatal());
        assert!(
            DriverError::Serial(SerialError::Io(std::io::ErrorKind::BrokenPipe.into())).is_fatal()
        );
        assert!(
            !DriverError::Serial(SerialError::Io(std::io::ErrorKind::TimedOut.into())).is_fatal()
        );
        assert!(!DriverError::ChecksumFailures { count: 4 }.is_fatal());
        assert!(!DriverError::Protocol(ProtocolError::MissingSubPayload { id: 0x01 }).is_fatal());
    }

    /// 测试 From<ProtocolError> 转换
    #[test]
    fn test_from_protocol_error() {
        let driver_error: DriverError = ProtocolError::MissingSubPayload { id: 0x01 }.into();
        match driver_error {
            DriverError::Protocol(ProtocolError::MissingSubPayload { id }) => assert_eq!(id, 0x01),
            _ => panic!("Expected Protocol variant"),
        }
    }
}
