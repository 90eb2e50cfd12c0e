//! 脚本化的内存串口，用于无硬件测试
//!
//! 读取按脚本顺序回放字节、空闲读（`Ok(0)`）和注入的 IO 错误；
//! 脚本耗尽后返回 [`SerialError::Disconnected`]，避免测试在空闲中无限等待。
//! 写入的字节全部记录，供断言使用。

use crate::{SerialAdapter, SerialError};
use std::collections::VecDeque;
use std::io;

/// 脚本事件
#[derive(Debug, Clone, PartialEq, Eq)]
enum MockEvent {
    Byte(u8),
    Idle,
    Fail(io::ErrorKind),
}

/// 内存串口
#[derive(Debug, Default)]
pub struct MockSerialAdapter {
    script: VecDeque<MockEvent>,
    written: Vec<u8>,
    idle_reads: usize,
    flushes: usize,
    write_error: Option<io::ErrorKind>,
}

impl MockSerialAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// 以给定字节初始化
    pub fn with_bytes(bytes: &[u8]) -> Self {
        let mut mock = Self::new();
        mock.push_bytes(bytes);
        mock
    }

    /// 追加待读取的字节
    pub fn push_bytes(&mut self, bytes: &[u8]) -> &mut Self {
        self.script.extend(bytes.iter().copied().map(MockEvent::Byte));
        self
    }

    /// 追加一次空闲读（`read` 返回 `Ok(0)`）
    pub fn push_idle(&mut self, count: usize) -> &mut Self {
        self.script.extend(std::iter::repeat_n(MockEvent::Idle, count));
        self
    }

    /// 追加一次读错误
    pub fn push_error(&mut self, kind: io::ErrorKind) -> &mut Self {
        self.script.push_back(MockEvent::Fail(kind));
        self
    }

    /// 之后的写入全部失败
    pub fn fail_writes(&mut self, kind: io::ErrorKind) {
        self.write_error = Some(kind);
    }

    /// 已写入的字节
    pub fn written(&self) -> &[u8] {
        &self.written
    }

    /// 取出并清空已写入的字节
    pub fn take_written(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.written)
    }

    /// 已发生的空闲读次数
    pub fn idle_reads(&self) -> usize {
        self.idle_reads
    }

    /// `flush` 调用次数
    pub fn flushes(&self) -> usize {
        self.flushes
    }

    /// 脚本中剩余事件数
    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl SerialAdapter for MockSerialAdapter {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, SerialError> {
        match self.script.front() {
            None => return Err(SerialError::Disconnected),
            Some(MockEvent::Idle) => {
                self.script.pop_front();
                self.idle_reads += 1;
                return Ok(0);
            },
            Some(MockEvent::Fail(kind)) => {
                let kind = *kind;
                self.script.pop_front();
                return Err(SerialError::Io(io::Error::from(kind)));
            },
            Some(MockEvent::Byte(_)) => {},
        }

        let mut n = 0;
        while n < buf.len() {
            match self.script.front() {
                Some(&MockEvent::Byte(b)) => {
                    buf[n] = b;
                    n += 1;
                    self.script.pop_front();
                },
                _ => break,
            }
        }
        Ok(n)
    }

    fn write_all(&mut self, bytes: &[u8]) -> Result<(), SerialError> {
        if let Some(kind) = self.write_error {
            return Err(SerialError::Io(io::Error::from(kind)));
        }
        self.written.extend_from_slice(bytes);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), SerialError> {
        self.flushes += 1;
        Ok(())
    }

    fn clear_input(&mut self) -> Result<(), SerialError> {
        self.script.retain(|e| !matches!(e, MockEvent::Byte(_)));
        Ok(())
    }
}
