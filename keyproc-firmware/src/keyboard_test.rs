extern crate std;

use std::{vec, vec::Vec};

use keyproc_common::keycodes::kc;

use crate::{
    collab_test_stub::{
        Call, CallLog, FakeCommand, FakeLayers, FakeLeds, FakeMatrix, FakeMouse, RecordingHost,
    },
    command::NoCommand,
    layer::Keymap,
    led::NoLeds,
    matrix::PinMatrix,
    mousekey::{MouseKeyState, NoMouseKeys},
    pin_test_stub::{ColPin, RowPin, Switches},
    time_driver_test_stub::set_millis,
};

use super::*;

type TestKeyboard =
    Keyboard<FakeMatrix, FakeLayers, RecordingHost, FakeCommand, FakeMouse, FakeLeds>;

fn keyboard(rows: usize, cols: usize, capabilities: Capabilities) -> (CallLog, TestKeyboard) {
    let log = CallLog::default();
    let kb = Keyboard::new(
        FakeMatrix::new(&log, rows, cols),
        FakeLayers::new(&log, rows, cols),
        RecordingHost::new(&log),
        FakeCommand::new(&log),
        FakeMouse::new(&log),
        FakeLeds::new(&log),
        capabilities,
    );
    (log, kb)
}

fn press(kb: &mut TestKeyboard, row: usize, col: usize, code: u16) {
    kb.layers_mut().set(row, col, code);
    kb.matrix_mut().press(row, col);
}

fn sent_reports(calls: &[Call]) -> Vec<(u8, Vec<u8>)> {
    calls
        .iter()
        .filter_map(|c| match c {
            Call::SendReport { modifiers, keys } => Some((*modifiers, keys.clone())),
            _ => None,
        })
        .collect()
}

fn sent_system(calls: &[Call]) -> Vec<u16> {
    calls
        .iter()
        .filter_map(|c| match c {
            Call::SendSystem(code) => Some(*code),
            _ => None,
        })
        .collect()
}

fn sent_consumer(calls: &[Call]) -> Vec<u16> {
    calls
        .iter()
        .filter_map(|c| match c {
            Call::SendConsumer(code) => Some(*code),
            _ => None,
        })
        .collect()
}

#[test]
fn single_key() {
    let (log, mut kb) = keyboard(2, 2, Capabilities::FULL);
    press(&mut kb, 0, 0, kc::A);

    kb.run_cycle();

    assert_eq!(
        log.take(),
        vec![
            Call::Scan,
            Call::SwapReport,
            Call::ClearReport,
            Call::AddKey(0x04),
            Call::FunctionBits(0),
            Call::Command,
            Call::SendReport {
                modifiers: 0,
                keys: vec![0x04]
            },
            Call::SendConsumer(0),
            Call::SendSystem(0),
            Call::MouseFlush,
        ]
    );
}

#[test]
fn shift_and_key_in_one_report() {
    let (log, mut kb) = keyboard(2, 2, Capabilities::FULL);
    press(&mut kb, 1, 0, kc::A);
    press(&mut kb, 0, 1, kc::LSHIFT);

    kb.run_cycle();

    assert_eq!(
        sent_reports(&log.take()),
        vec![(0x02, vec![kc::A as u8])]
    );
}

#[test]
fn ghost_aborts_cycle() {
    let (log, mut kb) = keyboard(2, 2, Capabilities::FULL);
    press(&mut kb, 0, 0, kc::A);
    press(&mut kb, 1, 1, kc::MS_UP);
    kb.matrix_mut().ghost = true;
    kb.host_mut().leds = 0x03;

    kb.run_cycle();

    assert_eq!(log.take(), vec![Call::Scan]);
    assert_eq!(kb.last_leds(), 0);
}

#[test]
fn modifiers_are_or_of_pressed_cells() {
    let codes = [kc::LCTRL, kc::RSHIFT, kc::LGUI, kc::LCTRL];
    let expected = 0x01 | 0x20 | 0x08;

    for rotate in 0..codes.len() {
        let (log, mut kb) = keyboard(2, 2, Capabilities::BASIC);
        for (i, code) in codes.iter().cycle().skip(rotate).take(4).enumerate() {
            press(&mut kb, i / 2, i % 2, *code);
        }
        kb.run_cycle();
        assert_eq!(sent_reports(&log.take()), vec![(expected, vec![])]);
    }
}

#[test]
fn key_set_is_distinct_usages() {
    let codes = [kc::B, kc::A, kc::B, kc::NO, kc::C, kc::A];

    for rotate in 0..codes.len() {
        let (log, mut kb) = keyboard(2, 3, Capabilities::BASIC);
        for (i, code) in codes.iter().cycle().skip(rotate).take(6).enumerate() {
            press(&mut kb, i / 3, i % 3, *code);
        }
        kb.run_cycle();
        assert_eq!(
            sent_reports(&log.take()),
            vec![(0, vec![kc::A as u8, kc::B as u8, kc::C as u8])]
        );
    }
}

#[test]
fn last_system_and_consumer_code_wins() {
    let (log, mut kb) = keyboard(2, 2, Capabilities::FULL);
    press(&mut kb, 0, 0, kc::SYSTEM_SLEEP);
    press(&mut kb, 0, 1, kc::AUDIO_VOL_UP);
    press(&mut kb, 1, 0, kc::AUDIO_MUTE);
    press(&mut kb, 1, 1, kc::SYSTEM_WAKE);

    kb.run_cycle();

    let calls = log.take();
    assert_eq!(sent_system(&calls), vec![0x83]);
    assert_eq!(sent_consumer(&calls), vec![kc::AUDIO_MUTE & 0x0fff]);
}

#[test]
fn unknown_system_code_leaves_system_code() {
    let (log, mut kb) = keyboard(1, 2, Capabilities::FULL);
    press(&mut kb, 0, 0, kc::SYSTEM_POWER);
    press(&mut kb, 0, 1, 0x01a0);

    kb.run_cycle();

    assert_eq!(sent_system(&log.take()), vec![0x81]);
}

#[test]
fn power_wakes_suspended_host() {
    let (log, mut kb) = keyboard(1, 1, Capabilities::FULL);
    press(&mut kb, 0, 0, kc::SYSTEM_POWER);

    kb.run_cycle();
    assert_eq!(log.count(|c| *c == Call::RemoteWakeup), 0);

    kb.host_mut().suspended = true;
    kb.run_cycle();
    assert_eq!(log.count(|c| *c == Call::RemoteWakeup), 0);

    kb.host_mut().remote_wakeup_enabled = true;
    kb.run_cycle();
    assert_eq!(log.count(|c| *c == Call::RemoteWakeup), 1);

    log.take();
    kb.layers_mut().set(0, 0, kc::SYSTEM_SLEEP);
    kb.run_cycle();
    assert_eq!(log.count(|c| *c == Call::RemoteWakeup), 0);
}

#[test]
fn function_keys_update_layer() {
    let (log, mut kb) = keyboard(1, 3, Capabilities::FULL);
    press(&mut kb, 0, 0, kc::FN2);
    press(&mut kb, 0, 1, kc::FN0);
    press(&mut kb, 0, 2, kc::FN2);

    kb.run_cycle();

    let calls = log.take();
    assert!(calls.contains(&Call::FunctionBits(0b101)));
    assert_eq!(sent_reports(&calls), vec![(0, vec![])]);
}

#[test]
fn command_suppresses_transmit_and_leds() {
    let (log, mut kb) = keyboard(1, 2, Capabilities::FULL);
    press(&mut kb, 0, 0, kc::A);
    press(&mut kb, 0, 1, kc::MS_BTN1);
    kb.command_mut().handle = true;
    kb.host_mut().leds = 0x02;

    kb.run_cycle();

    let calls = log.take();
    assert_eq!(calls.last(), Some(&Call::Command));
    assert!(calls.contains(&Call::FunctionBits(0)));
    assert!(calls.iter().all(|c| !matches!(
        c,
        Call::SendReport { .. }
            | Call::SendSystem(_)
            | Call::SendConsumer(_)
            | Call::SetLeds(_)
            | Call::MouseFlush
    )));
    assert_eq!(kb.last_leds(), 0);
}

#[test]
fn unmodified_matrix_sends_only_mouse() {
    let (log, mut kb) = keyboard(1, 2, Capabilities::FULL);
    press(&mut kb, 0, 0, kc::A);
    press(&mut kb, 0, 1, kc::MS_LEFT);
    kb.matrix_mut().modified = false;

    kb.run_cycle();

    let calls = log.take();
    assert!(sent_reports(&calls).is_empty());
    assert!(sent_system(&calls).is_empty());
    assert!(sent_consumer(&calls).is_empty());
    assert!(calls.contains(&Call::AddKey(0x04)));
    assert!(calls.contains(&Call::MouseDecode(kc::MS_LEFT)));
    assert_eq!(calls.last(), Some(&Call::MouseFlush));
}

#[test]
fn led_sync_only_on_change() {
    let (log, mut kb) = keyboard(1, 1, Capabilities::FULL);

    kb.run_cycle();
    assert_eq!(log.count(|c| matches!(c, Call::SetLeds(_))), 0);

    kb.host_mut().leds = 0x05;
    kb.run_cycle();
    assert_eq!(log.count(|c| matches!(c, Call::SetLeds(_))), 1);
    assert_eq!(kb.last_leds(), 0x05);

    kb.matrix_mut().modified = false;
    kb.run_cycle();
    kb.run_cycle();
    assert_eq!(log.count(|c| matches!(c, Call::SetLeds(_))), 1);

    kb.host_mut().leds = 0;
    kb.run_cycle();
    assert_eq!(log.take().last(), Some(&Call::SetLeds(0)));
}

#[test]
fn set_leds_updates_shadow() {
    let (log, mut kb) = keyboard(1, 1, Capabilities::FULL);
    kb.set_leds(0x02);
    assert_eq!(log.take(), vec![Call::SetLeds(0x02)]);

    kb.host_mut().leds = 0x02;
    kb.run_cycle();
    assert_eq!(log.count(|c| matches!(c, Call::SetLeds(_))), 0);
}

#[test]
fn basic_capabilities_ignore_extra_and_mouse_keys() {
    let (log, mut kb) = keyboard(1, 4, Capabilities::BASIC);
    press(&mut kb, 0, 0, kc::SYSTEM_POWER);
    press(&mut kb, 0, 1, kc::AUDIO_MUTE);
    press(&mut kb, 0, 2, kc::MS_UP);
    press(&mut kb, 0, 3, kc::Z);
    kb.host_mut().suspended = true;
    kb.host_mut().remote_wakeup_enabled = true;

    kb.run_cycle();

    assert_eq!(
        log.take(),
        vec![
            Call::Scan,
            Call::SwapReport,
            Call::ClearReport,
            Call::AddKey(kc::Z as u8),
            Call::FunctionBits(0),
            Call::Command,
            Call::SendReport {
                modifiers: 0,
                keys: vec![kc::Z as u8]
            },
        ]
    );
}

#[test]
fn extrakey_only() {
    let caps = Capabilities {
        extrakey: true,
        ..Capabilities::BASIC
    };
    let (log, mut kb) = keyboard(1, 2, caps);
    press(&mut kb, 0, 0, kc::MEDIA_PLAY_PAUSE);
    press(&mut kb, 0, 1, kc::MS_BTN1);

    kb.run_cycle();

    let calls = log.take();
    assert_eq!(sent_consumer(&calls), vec![kc::MEDIA_PLAY_PAUSE & 0x0fff]);
    assert_eq!(sent_system(&calls), vec![0]);
    assert!(!calls
        .iter()
        .any(|c| matches!(c, Call::MouseDecode(_) | Call::MouseFlush)));
}

#[test]
fn mousekey_only() {
    let caps = Capabilities {
        mousekey: true,
        ..Capabilities::BASIC
    };
    let (log, mut kb) = keyboard(1, 2, caps);
    press(&mut kb, 0, 0, kc::AUDIO_VOL_DOWN);
    press(&mut kb, 0, 1, kc::MS_WH_DOWN);

    kb.run_cycle();

    let calls = log.take();
    assert!(sent_consumer(&calls).is_empty());
    assert!(calls.contains(&Call::MouseDecode(kc::MS_WH_DOWN)));
    assert_eq!(calls.last(), Some(&Call::MouseFlush));
}

#[test]
fn unrecognized_codes_are_ignored() {
    let (log, mut kb) = keyboard(1, 3, Capabilities::FULL);
    press(&mut kb, 0, 0, 0x0f10);
    press(&mut kb, 0, 1, 0x2345);
    press(&mut kb, 0, 2, kc::NO);

    kb.run_cycle();

    let calls = log.take();
    assert_eq!(sent_reports(&calls), vec![(0, vec![])]);
    assert!(!calls.iter().any(|c| matches!(
        c,
        Call::AddKey(_) | Call::AddModifier(_) | Call::MouseDecode(_)
    )));
}

#[test]
fn debug_matrix_keeps_behaviour() {
    let caps = Capabilities {
        debug_matrix: true,
        ..Capabilities::FULL
    };
    let (log, mut kb) = keyboard(2, 2, caps);
    press(&mut kb, 1, 1, kc::A);

    kb.run_cycle();

    assert_eq!(sent_reports(&log.take()), vec![(0, vec![0x04])]);
}

#[test]
fn init_initialises_matrix() {
    let (log, mut kb) = keyboard(1, 1, Capabilities::FULL);
    kb.init();
    assert_eq!(log.take(), vec![Call::MatrixInit]);
}

#[test]
fn real_collaborators() {
    use crate::host::{HostState, ReportChannel};
    use crate::report::{MouseReport, Report};
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;

    set_millis(1_000);

    let switches = Switches::new(2, 2);
    let matrix: PinMatrix<ColPin, RowPin, 2, 2> =
        PinMatrix::new(switches.row_pins(), switches.col_pins(), 0);
    let mut keymap = Keymap::new([
        [[kc::A, kc::FN0], [kc::LSHIFT, kc::MS_BTN1]],
        [[kc::B, kc::FN0], [kc::AUDIO_MUTE, kc::MS_BTN1]],
    ]);
    keymap.set_fn_layer(0, 1).unwrap();

    let channel = ReportChannel::<NoopRawMutex, 8>::default();
    let state = HostState::<NoopRawMutex>::new();
    let host = crate::host::ReportHost::new(&channel, &state);

    let mut kb = Keyboard::new(
        matrix,
        keymap,
        host,
        NoCommand,
        MouseKeyState::default(),
        NoLeds,
        Capabilities::FULL,
    );
    kb.init();

    switches.down(0, 0);
    switches.down(1, 0);
    kb.run_cycle();

    let Some(Report::Keyboard(report)) = channel.try_receive() else {
        panic!("expected keyboard report");
    };
    assert_eq!(report.modifiers, 0x02);
    assert_eq!(report.keys().collect::<Vec<_>>(), vec![0x04]);
    // the first extra-key codes match the host's initial state
    assert_eq!(channel.try_receive(), None);

    switches.down(0, 1);
    kb.run_cycle();
    assert!(matches!(channel.try_receive(), Some(Report::Keyboard(_))));
    assert_eq!(channel.try_receive(), None);
    assert_eq!(kb.layers().current_layer(), 1);

    switches.up(0, 0);
    switches.down(1, 1);
    kb.run_cycle();
    let Some(Report::Keyboard(report)) = channel.try_receive() else {
        panic!("expected keyboard report");
    };
    assert_eq!(report.modifiers, 0);
    assert_eq!(report.key_count(), 0);
    assert_eq!(
        channel.try_receive(),
        Some(Report::Consumer(kc::AUDIO_MUTE & 0x0fff))
    );
    assert_eq!(
        channel.try_receive(),
        Some(Report::Mouse(MouseReport {
            buttons: 1,
            ..Default::default()
        }))
    );
    assert_eq!(channel.try_receive(), None);

    state.set_leds(0x01);
    kb.run_cycle();
    assert_eq!(kb.last_leds(), 0x01);
    assert_eq!(channel.try_receive(), None);
}

#[test]
fn no_mouse_keys_flush_nothing() {
    let log = CallLog::default();
    let mut matrix = FakeMatrix::new(&log, 1, 1);
    matrix.press(0, 0);
    let mut layers = FakeLayers::new(&log, 1, 1);
    layers.set(0, 0, kc::MS_UP);
    let mut kb = Keyboard::new(
        matrix,
        layers,
        RecordingHost::new(&log),
        NoCommand,
        NoMouseKeys,
        NoLeds,
        Capabilities::FULL,
    );

    kb.run_cycle();

    let calls = log.take();
    assert!(!calls.iter().any(|c| matches!(c, Call::SendMouse(_))));
    assert_eq!(sent_reports(&calls), vec![(0, vec![])]);
}
