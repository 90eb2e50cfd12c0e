//! 按键启停的巡航演示
//!
//! 按任意按键在「停止」与「直行」间切换；直行时碰到障碍物会
//! 原地转 90° 后继续，行驶 2 米后自动停止。Ctrl-C 退出前发送停止指令。
//!
//! ```bash
//! cargo run -p kobuki-sdk --example bump_and_turn -- /dev/ttyUSB0
//! ```

use anyhow::{Context, Result};
use kobuki_sdk::driver::turn_duration;
use kobuki_sdk::prelude::*;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

const CRUISE_SPEED_MM_S: i16 = 150;
const LEG_LENGTH_M: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq)]
enum State {
    Off,
    Driving,
    Turning { until: Instant },
}

fn main() -> Result<()> {
    kobuki_sdk::init_logging("info").ok();

    let port = std::env::args()
        .nth(1)
        .unwrap_or_else(|| kobuki_sdk::driver::DEFAULT_PORT.to_string());
    let mut kobuki = KobukiBuilder::new()
        .port(&port)
        .build()
        .with_context(|| format!("failed to open {port}"))?;

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || r.store(false, Ordering::SeqCst))?;

    let mut buttons = ButtonEdgeDetector::new();
    let mut odometer = Odometer::new();
    let mut state = State::Off;
    let quarter_turn = turn_duration(90.0).context("90° is a valid turn angle")?;

    while running.load(Ordering::SeqCst) {
        let snapshot = kobuki.poll_sensors()?;
        let pressed = buttons.is_button_edge(&snapshot);
        odometer.update(&snapshot);

        state = match state {
            State::Off if pressed => {
                odometer.reset();
                println!("Driving");
                State::Driving
            },
            State::Off => State::Off,
            State::Driving if pressed || odometer.distance_m() >= LEG_LENGTH_M => {
                kobuki.stop()?;
                println!("Stopped after {:.2} m", odometer.distance_m());
                State::Off
            },
            State::Driving if snapshot.bumps() != (false, false, false) => {
                kobuki.turn_left_fixed()?;
                State::Turning {
                    until: Instant::now() + quarter_turn,
                }
            },
            State::Driving => {
                kobuki.drive_direct(CRUISE_SPEED_MM_S, CRUISE_SPEED_MM_S)?;
                State::Driving
            },
            State::Turning { until } if Instant::now() >= until => State::Driving,
            turning @ State::Turning { .. } => turning,
        };
    }

    kobuki.stop()?;
    Ok(())
}
