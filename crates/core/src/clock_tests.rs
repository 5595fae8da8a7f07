// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn system_clock_is_past_2020() {
    let clock = SystemClock;
    assert!(clock.epoch_ms() > 1_577_836_800_000);
}

#[test]
fn fake_clock_advances() {
    let clock = FakeClock::new(1_000_000);
    assert_eq!(clock.epoch_ms(), 1_000_000);
    clock.advance_ms(500);
    assert_eq!(clock.epoch_ms(), 1_000_500);
    clock.set_epoch_ms(42);
    assert_eq!(clock.epoch_ms(), 42);
}

#[test]
fn fake_clock_clones_share_time() {
    let clock = FakeClock::new(10);
    let other = clock.clone();
    clock.advance_ms(5);
    assert_eq!(other.epoch_ms(), 15);
}
