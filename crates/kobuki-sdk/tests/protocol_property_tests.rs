//! 协议层与接收器的属性测试
//!
//! 使用 proptest 验证帧编码、组帧和换算的不变量。

use kobuki_sdk::driver::{FrameReceiver, IdleStrategy, ReceiverConfig, direct_to_arc, encoder_delta};
use kobuki_sdk::protocol::{BaseControlCommand, KobukiFrame, checksum};
use kobuki_sdk::serial::mock::MockSerialAdapter;
use kobuki_sdk::{DriverError, SerialError};
use proptest::prelude::*;

fn receiver() -> FrameReceiver {
    FrameReceiver::new(ReceiverConfig {
        max_checksum_failures: 3,
        idle: IdleStrategy::BusySpin,
    })
}

proptest! {
    /// 校验和等于长度字节与全部载荷字节的 XOR
    #[test]
    fn frame_checksum_is_xor_of_length_and_payload(
        payload in proptest::collection::vec(any::<u8>(), 0..=255)
    ) {
        let frame = KobukiFrame::new(&payload);
        let bytes = frame.encode();
        let expected = payload.iter().fold(payload.len() as u8, |acc, &b| acc ^ b);
        prop_assert_eq!(bytes.len(), payload.len() + 4);
        prop_assert_eq!(bytes[bytes.len() - 1], expected);
        prop_assert_eq!(frame.checksum(), (payload.len() as u8) ^ checksum(&payload));
    }

    /// 接收器恰好接受尾字节等于校验和的帧
    #[test]
    fn receiver_accepts_exactly_matching_checksum(
        payload in proptest::collection::vec(any::<u8>(), 0..=255),
        trailer in any::<u8>(),
    ) {
        let len = payload.len() as u8;
        let expected = len ^ checksum(&payload);

        let mut bytes = vec![0xAA, 0x55, len];
        bytes.extend_from_slice(&payload);
        bytes.push(trailer);

        let mut mock = MockSerialAdapter::with_bytes(&bytes);
        let mut rx = receiver();
        let result = rx.receive(&mut mock).map(|view| view.payload().to_vec());
        match result {
            Ok(received) => {
                prop_assert_eq!(trailer, expected);
                prop_assert_eq!(received, payload);
            },
            Err(DriverError::Serial(SerialError::Disconnected)) => {
                prop_assert_ne!(trailer, expected);
                prop_assert_eq!(rx.consecutive_failures(), 1);
            },
            Err(e) => prop_assert!(false, "unexpected error: {}", e),
        }
    }

    /// 前置任意不含帧头的垃圾字节不影响组帧
    #[test]
    fn receiver_resyncs_after_garbage(
        garbage in proptest::collection::vec(0u8..0xAA, 0..64),
        payload in proptest::collection::vec(any::<u8>(), 0..32),
    ) {
        let mut bytes = garbage.clone();
        bytes.extend_from_slice(&KobukiFrame::new(&payload).encode());
        let mut mock = MockSerialAdapter::with_bytes(&bytes);
        let mut rx = receiver();
        let view = rx.receive(&mut mock).unwrap();
        prop_assert_eq!(view.payload(), payload.as_slice());
    }

    /// 运动指令经线上字节往返后速度与半径不变
    #[test]
    fn drive_command_wire_roundtrip(speed in any::<i16>(), radius in any::<i16>()) {
        let cmd = BaseControlCommand::new(speed, radius);
        let frame = KobukiFrame::decode(&cmd.to_frame().encode()).unwrap();
        let decoded = BaseControlCommand::from_payload(frame.payload()).unwrap();
        prop_assert_eq!(decoded.speed, speed);
        prop_assert_eq!(decoded.radius, radius);
    }

    /// 轮速换算：速度总是取自两轮之一（或其饱和取反）
    #[test]
    fn direct_to_arc_speed_comes_from_a_wheel(left in any::<i16>(), right in any::<i16>()) {
        let cmd = direct_to_arc(left, right);
        let candidates = [left, right, left.saturating_neg(), right.saturating_neg()];
        prop_assert!(candidates.contains(&cmd.speed));
        if cmd.radius == 1 {
            prop_assert!(left != right);
            let wheel = if right.unsigned_abs() > left.unsigned_abs() { right } else { left };
            prop_assert_eq!(cmd.speed, wheel.saturating_neg());
        }
    }

    /// 编码器差值在 ±32767 内可精确还原
    #[test]
    fn encoder_delta_inverts_wrapping_add(start in any::<u16>(), delta in -32768i32..=32767) {
        let end = start.wrapping_add(delta as i16 as u16);
        prop_assert_eq!(encoder_delta(start, end), delta);
    }
}
