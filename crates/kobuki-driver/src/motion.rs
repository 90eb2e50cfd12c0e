//! 运动学换算
//!
//! 底盘只接受 `(speed, radius)` 圆弧指令，这里提供左右轮速到圆弧的换算
//! 以及固定转弯的参数和时长估算。

use kobuki_protocol::{BaseControlCommand, RADIUS_SPIN, RADIUS_STRAIGHT};
use std::time::Duration;

/// 轮速换算半径时使用的轮距系数
pub const WHEEL_TRACK_CONSTANT: f64 = 123.0;

/// 固定转弯半径（mm）
pub const FIXED_TURN_RADIUS_MM: i16 = 10;

/// 固定转弯速度（mm/s）
pub const FIXED_TURN_SPEED_MM_S: i16 = 35;

/// 固定转弯的有效角度上限（度）
pub const MAX_FIXED_TURN_ANGLE_DEG: f64 = 180.0;

/// 转向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnDirection {
    /// 逆时针
    Left,
    /// 顺时针
    Right,
}

/// 左右轮速（mm/s）换算为圆弧指令
///
/// - 两轮同速：直行
/// - 速度取绝对值较大的一侧，相等时取左轮
/// - 半径 `round((l + r) / (2 (r - l) / 123))`，四舍五入远离零
/// - 半径超出 i16：退化为直行，速度不变
/// - 半径为 0 或 1：原地旋转哨兵 1，速度取反
///
/// # Example
///
/// ```
/// use kobuki_driver::motion::direct_to_arc;
///
/// let cmd = direct_to_arc(50, -50);
/// assert_eq!((cmd.radius, cmd.speed), (1, -50));
/// ```
pub fn direct_to_arc(left: i16, right: i16) -> BaseControlCommand {
    if left == right {
        return BaseControlCommand::new(left, RADIUS_STRAIGHT);
    }

    let speed = if right.unsigned_abs() > left.unsigned_abs() {
        right
    } else {
        left
    };

    let (l, r) = (left as f64, right as f64);
    let radius = ((l + r) / (2.0 * (r - l) / WHEEL_TRACK_CONSTANT)).round();

    if radius > i16::MAX as f64 || radius < i16::MIN as f64 {
        return BaseControlCommand::new(speed, RADIUS_STRAIGHT);
    }

    match radius as i16 {
        0 | 1 => BaseControlCommand::new(speed.saturating_neg(), RADIUS_SPIN),
        radius => BaseControlCommand::new(speed, radius),
    }
}

/// 固定转弯指令：半径 10mm，左转 +35mm/s，右转 -35mm/s
pub fn fixed_turn(direction: TurnDirection) -> BaseControlCommand {
    let speed = match direction {
        TurnDirection::Left => FIXED_TURN_SPEED_MM_S,
        TurnDirection::Right => -FIXED_TURN_SPEED_MM_S,
    };
    BaseControlCommand::new(speed, FIXED_TURN_RADIUS_MM)
}

/// 固定转弯达到指定角度所需时间（毫秒）
///
/// 经验公式 `angle · (10.08/90) · 1000 · ((-0.2/90) · angle + 1.15)`，
/// 仅在 `0 < angle ≤ 180` 内有意义，但对任意输入按公式原样计算。
pub fn estimate_turn_duration_ms(angle_deg: f64) -> f64 {
    angle_deg * (10.08 / 90.0) * 1000.0 * ((-0.2 / 90.0) * angle_deg + 1.15)
}

/// 固定转弯时长，角度不在 `(0, 180]` 内时返回 None
pub fn turn_duration(angle_deg: f64) -> Option<Duration> {
    if !(angle_deg > 0.0 && angle_deg <= MAX_FIXED_TURN_ANGLE_DEG) {
        return None;
    }
    Some(Duration::from_secs_f64(
        estimate_turn_duration_ms(angle_deg) / 1000.0,
    ))
}
