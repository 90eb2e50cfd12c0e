//! 按键上升沿检测

use kobuki_protocol::SensorSnapshot;

/// 按键上升沿检测器
///
/// 锁存 B0/B1/B2 上一次的状态，每次调用都会更新全部三个锁存值。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ButtonEdgeDetector {
    latched: [bool; 3],
}

impl ButtonEdgeDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// 更新锁存值，返回每个按键是否出现上升沿
    pub fn update(&mut self, buttons: [bool; 3]) -> [bool; 3] {
        let mut edges = [false; 3];
        for (i, pressed) in buttons.into_iter().enumerate() {
            edges[i] = pressed && !self.latched[i];
        }
        self.latched = buttons;
        edges
    }

    /// 任意按键本次按下且上次未按下时返回 true
    pub fn is_button_edge(&mut self, snapshot: &SensorSnapshot) -> bool {
        self.update(snapshot.buttons()).contains(&true)
    }

    /// 上一次观察到的按键状态
    pub fn latched(&self) -> [bool; 3] {
        self.latched
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 只含基础传感器数据的快照，按键字节为 `buttons`
    fn snapshot_with_buttons(buttons: u8) -> SensorSnapshot {
        let mut payload = vec![0x01, 0x0F];
        payload.extend_from_slice(&[0u8; 15]);
        payload[2 + 11] = buttons;
        SensorSnapshot::parse(&payload).unwrap()
    }

    #[test]
    fn test_edge_sequence() {
        let mut detector = ButtonEdgeDetector::new();
        let results: Vec<bool> = [0x00, 0x01, 0x01, 0x00, 0x01]
            .iter()
            .map(|&b| detector.is_button_edge(&snapshot_with_buttons(b)))
            .collect();
        assert_eq!(results, vec![false, true, false, false, true]);
    }

    #[test]
    fn test_all_latches_update_every_call() {
        let mut detector = ButtonEdgeDetector::new();
        assert!(detector.is_button_edge(&snapshot_with_buttons(0x01)));
        // B0 保持按下、B2 新按下 -> 上升沿
        assert!(detector.is_button_edge(&snapshot_with_buttons(0x05)));
        assert_eq!(detector.latched(), [true, false, true]);
        // B0 松开、B2 保持 -> 无上升沿
        assert!(!detector.is_button_edge(&snapshot_with_buttons(0x04)));
    }

    #[test]
    fn test_per_button_edges() {
        let mut detector = ButtonEdgeDetector::new();
        assert_eq!(detector.update([false, true, false]), [false, true, false]);
        assert_eq!(detector.update([true, true, true]), [true, false, true]);
        assert_eq!(detector.update([false, false, false]), [false; 3]);
    }
}
