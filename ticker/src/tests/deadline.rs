use ustick_hal::TimerRegs;

use super::fixture;

#[test]
fn past_target_delivers_inline() {
    let f = fixture(1_000_000);
    f.sim.step(500);
    f.ticker.arm(200);
    assert_eq!(f.fired(), 1);
    assert!(!f.sim.match_irq_enabled());

    // Nothing further is pending.
    f.sim.step(0x2_0000);
    assert_eq!(f.fired(), 1);
}

#[test]
fn current_time_counts_as_past() {
    let f = fixture(1_000_000);
    f.sim.step(500);
    f.ticker.arm(500);
    assert_eq!(f.fired(), 1);
}

#[test]
fn short_deadline_fires_on_the_dot() {
    let f = fixture(1_000_000);
    f.ticker.arm(100);
    f.sim.step(99);
    assert_eq!(f.fired(), 0);
    f.sim.step(1);
    assert_eq!(f.fired(), 1);
    assert!(!f.sim.match_irq_enabled());

    // Exactly once: later cycles must not re-deliver.
    f.sim.step(0x3_0000);
    assert_eq!(f.fired(), 1);
}

#[test]
fn multi_cycle_deadline_takes_the_biased_detour() {
    let f = fixture(1_000_000);
    // 200000us = 0x30D40 ticks: three full cycles plus a low remainder,
    // so the first compare is biased half a cycle past the remainder.
    f.ticker.arm(200_000);
    assert_eq!(f.sim.compare(), 0x8D40);

    // After the biased hop the true remainder is programmed.
    f.sim.step(0x9000);
    assert_eq!(f.sim.compare(), 0x0D40);
    assert_eq!(f.fired(), 0);

    f.sim.step(200_000 - 0x9000 - 1);
    assert_eq!(f.fired(), 0);
    f.sim.step(1);
    assert_eq!(f.fired(), 1);
    assert_eq!(f.ticker.read_time(), 200_000);
}

#[test]
fn zero_remainder_bias_fires_on_time() {
    let f = fixture(1_000_000);
    // 0x3_0000 ticks out: the low half of the delta is zero, so the bias
    // applies with a final compare value of exactly zero. The biased hop
    // at 0x8000 must not be mistaken for the terminal match.
    f.ticker.arm(0x3_0000);
    assert_eq!(f.sim.compare(), 0x8000);

    f.sim.step(0x2_8000);
    assert_eq!(f.fired(), 0, "delivered before the target");
    assert_eq!(f.sim.compare(), 0);

    f.sim.step(0x8000 - 1);
    assert_eq!(f.fired(), 0);
    f.sim.step(1);
    assert_eq!(f.fired(), 1);
    assert_eq!(f.ticker.read_time(), 0x3_0000);
}

#[test]
fn large_remainder_skips_the_bias() {
    let f = fixture(1_000_000);
    // 0x2_9000 ticks out: the low half is >= half a cycle, so the
    // remainder is programmed directly and both cycles are counted down.
    f.ticker.arm(0x2_9000);
    assert_eq!(f.sim.compare(), 0x9000);
    f.sim.step(0x2_9000 - 1);
    assert_eq!(f.fired(), 0);
    f.sim.step(1);
    assert_eq!(f.fired(), 1);
}

#[test]
fn divisor_scaled_deadline_is_exact() {
    // 14 MHz -> 7 ticks per microsecond.
    let f = fixture(14_000_000);
    f.ticker.arm(10_000);
    f.sim.step(7 * 10_000 - 1);
    assert_eq!(f.fired(), 0);
    f.sim.step(1);
    assert_eq!(f.fired(), 1);
    assert_eq!(f.ticker.read_time(), 10_000);
}

#[test]
fn cancel_suppresses_delivery() {
    let f = fixture(1_000_000);
    f.ticker.arm(1_000);
    f.sim.step(500);
    f.ticker.cancel();
    f.sim.step(0x3_0000);
    assert_eq!(f.fired(), 0);
}

#[test]
fn stale_match_after_cancel_is_a_no_op() {
    let f = fixture(1_000_000);
    f.ticker.arm(1_000);

    // The compare latches while delivery is masked, then the deadline is
    // canceled with the event still in hardware.
    f.sim.mask_irqs();
    f.sim.step(1_500);
    assert!(f.sim.match_flag());
    f.ticker.cancel();
    f.sim.unmask_irqs();
    assert_eq!(f.fired(), 0);

    // Even an explicit handler run must treat the latched match as stale.
    f.ticker.on_event();
    assert_eq!(f.fired(), 0);
    assert!(f.sim.match_flag());

    f.ticker.clear_match();
    assert!(!f.sim.match_flag());
}

#[test]
fn rearm_replaces_the_previous_deadline() {
    let f = fixture(1_000_000);
    f.ticker.arm(1_000);
    f.sim.step(100);
    f.ticker.arm(2_000);

    f.sim.step(1_900 - 1);
    assert_eq!(f.fired(), 0, "the replaced deadline must not deliver");
    f.sim.step(1);
    assert_eq!(f.fired(), 1);

    f.sim.step(0x3_0000);
    assert_eq!(f.fired(), 1);
}

#[test]
fn rearm_from_the_hook_is_honored() {
    let f = fixture(1_000_000);
    f.ticker.arm(100);
    f.sim.step(100);
    assert_eq!(f.fired(), 1);

    // Terminal delivery disables the compare source, so a fresh arm
    // starts from a clean state.
    f.ticker.arm(300);
    f.sim.step(199);
    assert_eq!(f.fired(), 1);
    f.sim.step(1);
    assert_eq!(f.fired(), 2);
}
