//! 基于 mock 串口的端到端测试
//!
//! 模拟底盘的反馈流（含噪声、损坏帧和空闲读），验证快照解析、
//! 按键上升沿、里程计和命令回写的完整流程。

use kobuki_sdk::prelude::*;
use kobuki_sdk::serial::mock::MockSerialAdapter;
use std::io;

/// 构建一帧反馈：基础传感器数据 + 惯性传感器
fn feedback_frame(timestamp: u16, encoders: (u16, u16), buttons: u8, angle: i16) -> Vec<u8> {
    let mut payload = vec![0x01, 0x0F];
    payload.extend_from_slice(&timestamp.to_le_bytes());
    payload.extend_from_slice(&[0x00, 0x00, 0x00]);
    payload.extend_from_slice(&encoders.0.to_le_bytes());
    payload.extend_from_slice(&encoders.1.to_le_bytes());
    payload.extend_from_slice(&[0x00, 0x00, buttons, 0x00, 0x9B, 0x00]);
    payload.extend_from_slice(&[0x04, 0x07]);
    payload.extend_from_slice(&angle.to_le_bytes());
    payload.extend_from_slice(&[0x00; 5]);
    KobukiFrame::new(&payload).encode().to_vec()
}

fn corrupt(mut bytes: Vec<u8>) -> Vec<u8> {
    let last = bytes.len() - 1;
    bytes[last] = bytes[last].wrapping_add(1);
    bytes
}

fn kobuki(mock: MockSerialAdapter) -> Kobuki<MockSerialAdapter> {
    KobukiBuilder::new()
        .receiver_config(ReceiverConfig {
            idle: IdleStrategy::BusySpin,
            ..Default::default()
        })
        .build_with_adapter(mock)
}

#[test]
fn test_session_with_noise_edges_and_odometry() {
    let mut mock = MockSerialAdapter::new();
    mock.push_bytes(&[0x00, 0xAA, 0x12]);
    mock.push_bytes(&feedback_frame(20, (65_000, 100), 0x00, 0));
    mock.push_idle(2);
    mock.push_bytes(&corrupt(feedback_frame(40, (0, 0), 0x01, 0)));
    mock.push_bytes(&feedback_frame(40, (65_400, 500), 0x01, 4500));
    mock.push_bytes(&feedback_frame(60, (264, 900), 0x01, 9000));

    let mut kobuki = kobuki(mock);
    let mut buttons = ButtonEdgeDetector::new();
    let mut odometer = Odometer::new();

    let first = kobuki.poll_sensors().unwrap();
    assert!(!buttons.is_button_edge(&first));
    odometer.update(&first);

    let second = kobuki.poll_sensors().unwrap();
    assert_eq!(second.basic.timestamp_ms, 40);
    assert!(buttons.is_button_edge(&second));
    odometer.update(&second);
    assert_eq!(second.heading_deg(), Some(45.0));

    let third = kobuki.poll_sensors().unwrap();
    assert!(!buttons.is_button_edge(&third));
    odometer.update(&third);

    // 左右轮各前进 800 个脉冲（左轮跨越回绕点）
    let expected = kobuki_sdk::driver::ticks_to_meters(800);
    assert!((odometer.distance_m() - expected).abs() < 1e-12);

    let stats = kobuki.receiver_stats();
    assert_eq!(stats.frames, 3);
    assert_eq!(stats.checksum_failures, 1);
}

#[test]
fn test_session_commands_are_written_in_order() {
    let mut kobuki = kobuki(MockSerialAdapter::new());
    kobuki.drive_direct(200, 200).unwrap();
    kobuki.play_sound_sequence(SoundSequence::CleaningEnd).unwrap();
    kobuki.stop().unwrap();

    let mut expected = Vec::new();
    expected.extend_from_slice(&BaseControlCommand::new(200, 0).to_frame().encode());
    expected.extend_from_slice(&KobukiFrame::new(&[0x04, 0x01, 0x06]).encode());
    expected.extend_from_slice(&BaseControlCommand::stop().to_frame().encode());
    assert_eq!(kobuki.adapter().written(), expected.as_slice());
}

#[test]
fn test_session_checksum_cap_across_calls() {
    let mut mock = MockSerialAdapter::new();
    for t in 0..3 {
        mock.push_bytes(&corrupt(feedback_frame(t, (0, 0), 0, 0)));
    }
    mock.push_error(io::ErrorKind::TimedOut);
    mock.push_bytes(&corrupt(feedback_frame(3, (0, 0), 0, 0)));
    mock.push_bytes(&feedback_frame(4, (0, 0), 0, 0));

    let mut kobuki = kobuki(mock);
    assert_eq!(kobuki.poll_sensors().unwrap_err().status_code(), -1);
    assert_eq!(kobuki.poll_sensors().unwrap_err().status_code(), -1500);
    assert_eq!(kobuki.poll_sensors().unwrap().basic.timestamp_ms, 4);
}

#[test]
fn test_session_information_reply() {
    let mut payload = feedback_frame(0, (0, 0), 0, 0);
    // 去掉帧头、长度和校验，追加版本与 UDID 子载荷后重新组帧
    let mut inner = payload[3..payload.len() - 1].to_vec();
    inner.extend_from_slice(&[0x0A, 0x04, 0x00, 0x00, 0x01, 0x00]);
    inner.extend_from_slice(&[0x0B, 0x04, 0x02, 0x01, 0x01, 0x00]);
    inner.extend_from_slice(&[0x13, 0x0C]);
    for word in [0x1111_2222u32, 0x3333_4444, 0x5555_6666] {
        inner.extend_from_slice(&word.to_le_bytes());
    }
    payload = KobukiFrame::new(&inner).encode().to_vec();

    let mut kobuki = kobuki(MockSerialAdapter::with_bytes(&payload));
    kobuki.request_information().unwrap();
    let snapshot = kobuki.poll_sensors().unwrap();
    assert_eq!(snapshot.hardware_version.unwrap().to_string(), "1.0.0");
    assert_eq!(snapshot.firmware_version.unwrap().to_string(), "1.1.2");
    assert_eq!(
        snapshot.unique_device_id.unwrap().to_string(),
        "11112222-33334444-55556666"
    );
}
