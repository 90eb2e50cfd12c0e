//! 编码器里程计
//!
//! 编码器为 16 位回绕计数，两次采样之间的差值按最短有符号距离计算，
//! 因此相邻两帧间单轮位移不能超过 32767 个脉冲（50Hz 下远大于最高轮速）。

use kobuki_protocol::SensorSnapshot;

/// 每个编码器脉冲对应的轮子行程（米）
pub const METERS_PER_TICK: f64 = 0.000_085_292_090_497_737_556_558;

/// 两次编码器读数之间的最短有符号差值（模 65536）
pub fn encoder_delta(previous: u16, current: u16) -> i32 {
    current.wrapping_sub(previous) as i16 as i32
}

/// 脉冲数换算为米
pub fn ticks_to_meters(ticks: i32) -> f64 {
    ticks as f64 * METERS_PER_TICK
}

/// 累积行程
///
/// 首次更新只记录基准读数；之后每次更新累加左右轮行程的平均值。
/// 后退时行程为负。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Odometer {
    last: Option<(u16, u16)>,
    left_m: f64,
    right_m: f64,
}

impl Odometer {
    pub fn new() -> Self {
        Self::default()
    }

    /// 以一组编码器读数更新，返回本次新增的行程（米）
    pub fn update_encoders(&mut self, left: u16, right: u16) -> f64 {
        let Some((last_left, last_right)) = self.last.replace((left, right)) else {
            return 0.0;
        };
        let dl = ticks_to_meters(encoder_delta(last_left, left));
        let dr = ticks_to_meters(encoder_delta(last_right, right));
        self.left_m += dl;
        self.right_m += dr;
        (dl + dr) / 2.0
    }

    /// 以传感器快照更新
    pub fn update(&mut self, snapshot: &SensorSnapshot) -> f64 {
        let (left, right) = snapshot.encoders();
        self.update_encoders(left, right)
    }

    /// 累计行程（两轮平均，米）
    pub fn distance_m(&self) -> f64 {
        (self.left_m + self.right_m) / 2.0
    }

    /// 左右轮各自的累计行程（米）
    pub fn wheel_distances_m(&self) -> (f64, f64) {
        (self.left_m, self.right_m)
    }

    /// 清零并丢弃基准读数
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
