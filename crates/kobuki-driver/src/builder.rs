//! Builder 模式实现
//!
//! 提供链式构造 `Kobuki` 实例的便捷方式。

use crate::error::DriverError;
use crate::kobuki::Kobuki;
use crate::receiver::ReceiverConfig;
use kobuki_serial::{SerialAdapter, SerialConfig, SerialPortAdapter};
use std::time::Duration;

/// 默认串口设备
pub const DEFAULT_PORT: &str = "/dev/serial0";

/// 默认波特率
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

/// 驱动配置
///
/// 可从配置文件反序列化（`serde` feature），缺省字段取默认值。
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct DriverConfig {
    /// 串口设备路径
    pub port: String,
    /// 波特率
    pub baud_rate: u32,
    /// 串口单次读超时（毫秒）
    pub read_timeout_ms: u64,
    /// 接收器配置
    pub receiver: ReceiverConfig,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT.to_string(),
            baud_rate: DEFAULT_BAUD_RATE,
            read_timeout_ms: 10,
            receiver: ReceiverConfig::default(),
        }
    }
}

/// Kobuki Builder（链式构造）
///
/// # Example
///
/// ```no_run
/// use kobuki_driver::{IdleStrategy, KobukiBuilder, ReceiverConfig};
/// use std::time::Duration;
///
/// // 使用默认配置（/dev/serial0, 115200）
/// let kobuki = KobukiBuilder::new().build()?;
///
/// // 自定义串口和接收器配置
/// let kobuki = KobukiBuilder::new()
///     .port("/dev/ttyUSB0")
///     .read_timeout(Duration::from_millis(5))
///     .receiver_config(ReceiverConfig {
///         max_checksum_failures: 5,
///         idle: IdleStrategy::Yield,
///     })
///     .build()?;
/// # Ok::<(), kobuki_driver::DriverError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct KobukiBuilder {
    port: Option<String>,
    baud_rate: Option<u32>,
    read_timeout: Option<Duration>,
    receiver_config: Option<ReceiverConfig>,
}

impl KobukiBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// 从配置构建
    pub fn from_config(config: &DriverConfig) -> Self {
        Self {
            port: Some(config.port.clone()),
            baud_rate: Some(config.baud_rate),
            read_timeout: Some(Duration::from_millis(config.read_timeout_ms)),
            receiver_config: Some(config.receiver),
        }
    }

    /// 设置串口设备（可选，默认 `/dev/serial0`）
    pub fn port(mut self, port: impl Into<String>) -> Self {
        self.port = Some(port.into());
        self
    }

    /// 设置波特率（可选，默认 115200）
    pub fn baud_rate(mut self, baud_rate: u32) -> Self {
        self.baud_rate = Some(baud_rate);
        self
    }

    /// 设置串口读超时（可选，默认 10ms）
    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = Some(timeout);
        self
    }

    /// 设置接收器配置（可选）
    pub fn receiver_config(mut self, config: ReceiverConfig) -> Self {
        self.receiver_config = Some(config);
        self
    }

    /// 最终生效的配置
    pub fn config(&self) -> DriverConfig {
        let defaults = DriverConfig::default();
        DriverConfig {
            port: self.port.clone().unwrap_or(defaults.port),
            baud_rate: self.baud_rate.unwrap_or(defaults.baud_rate),
            read_timeout_ms: self
                .read_timeout
                .map(|t| t.as_millis() as u64)
                .unwrap_or(defaults.read_timeout_ms),
            receiver: self.receiver_config.unwrap_or(defaults.receiver),
        }
    }

    /// 打开串口并构建实例
    ///
    /// # Errors
    /// - `DriverError::Serial`: 串口打开失败
    pub fn build(self) -> Result<Kobuki<SerialPortAdapter>, DriverError> {
        let config = self.config();
        let serial = SerialConfig {
            baud_rate: config.baud_rate,
            timeout: self
                .read_timeout
                .unwrap_or(Duration::from_millis(config.read_timeout_ms)),
        };
        let adapter = SerialPortAdapter::open(&config.port, serial)?;
        Ok(Kobuki::new(adapter, config.receiver))
    }

    /// 使用已有的适配器构建（测试或自定义后端）
    pub fn build_with_adapter<A: SerialAdapter>(self, adapter: A) -> Kobuki<A> {
        Kobuki::new(adapter, self.config().receiver)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::receiver::IdleStrategy;
    use kobuki_serial::mock::MockSerialAdapter;

    #[test]
    fn test_driver_config_default() {
        let config = DriverConfig::default();
        assert_eq!(config.port, "/dev/serial0");
        assert_eq!(config.baud_rate, 115_200);
        assert_eq!(config.read_timeout_ms, 10);
        assert_eq!(config.receiver, ReceiverConfig::default());
    }

    #[test]
    fn test_builder_chain() {
        let builder = KobukiBuilder::new()
            .port("/dev/ttyUSB1")
            .baud_rate(57_600)
            .read_timeout(Duration::from_millis(25));
        let config = builder.config();
        assert_eq!(config.port, "/dev/ttyUSB1");
        assert_eq!(config.baud_rate, 57_600);
        assert_eq!(config.read_timeout_ms, 25);
    }

    #[test]
    fn test_builder_from_config_roundtrip() {
        let config = DriverConfig {
            port: "/dev/kobuki".to_string(),
            baud_rate: 115_200,
            read_timeout_ms: 3,
            receiver: ReceiverConfig {
                max_checksum_failures: 7,
                idle: IdleStrategy::Yield,
            },
        };
        assert_eq!(KobukiBuilder::from_config(&config).config(), config);
    }

    #[test]
    fn test_build_with_adapter_uses_receiver_config() {
        let mut mock = MockSerialAdapter::new();
        mock.push_bytes(&[0xAA, 0x55, 0x00, 0x00]);
        let mut kobuki = KobukiBuilder::new()
            .receiver_config(ReceiverConfig {
                max_checksum_failures: 1,
                idle: IdleStrategy::BusySpin,
            })
            .build_with_adapter(mock);
        assert!(kobuki.poll_frame().unwrap().is_empty());
    }

    #[test]
    fn test_build_missing_port_fails() {
        let result = KobukiBuilder::new().port("/dev/kobuki-does-not-exist").build();
        assert!(matches!(result, Err(DriverError::Serial(_))));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_driver_config_serde_defaults() {
        let config: DriverConfig = serde_json::from_str(r#"{"port": "/dev/ttyACM0"}"#).unwrap();
        assert_eq!(config.port, "/dev/ttyACM0");
        assert_eq!(config.baud_rate, 115_200);
        assert_eq!(config.receiver.idle, IdleStrategy::Sleep { micros: 100 });
    }
}
