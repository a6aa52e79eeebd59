use std::time::Duration;

use approx::{assert_abs_diff_eq, assert_relative_eq};
use livechart::interaction::{InputSource, KeyCode, ScriptedInput};
use livechart::pacing::{Clock, FPS_WINDOW, FramePacer, ManualClock, TimingStrategy};

/// Input whose waits take `timeout + overshoot` on a shared manual clock.
#[derive(Debug)]
struct SleepyInput {
    clock: ManualClock,
    overshoot: Duration,
    polls: Vec<Duration>,
    keys: Vec<KeyCode>,
    released: usize,
}

impl SleepyInput {
    fn new(clock: &ManualClock, overshoot: Duration) -> Self {
        Self {
            clock: clock.clone(),
            overshoot,
            polls: Vec::new(),
            keys: Vec::new(),
            released: 0,
        }
    }
}

impl InputSource for SleepyInput {
    fn poll_key(&mut self, timeout: Duration) -> Option<KeyCode> {
        self.polls.push(timeout);
        self.clock.advance(timeout + self.overshoot);
        self.keys.pop()
    }

    fn release(&mut self) {
        self.released += 1;
    }
}

#[test]
fn adaptive_overshoot_estimate_converges() {
    let clock = ManualClock::new();
    let input = SleepyInput::new(&clock, Duration::from_millis(2));
    let mut pacer = FramePacer::with_clock(input, clock, 50, TimingStrategy::Adaptive);

    pacer.tick();
    assert_eq!(pacer.last_adjusted_wait(), Some(Duration::from_millis(20)));

    for _ in 0..150 {
        pacer.tick();
    }

    assert_abs_diff_eq!(pacer.overshoot_estimate(), 0.002, epsilon = 1e-5);
    assert_eq!(pacer.last_adjusted_wait(), Some(Duration::from_millis(18)));
}

#[test]
fn early_wakeups_drive_the_estimate_negative() {
    #[derive(Debug)]
    struct EarlyInput(ManualClock);

    impl InputSource for EarlyInput {
        fn poll_key(&mut self, timeout: Duration) -> Option<KeyCode> {
            self.0.advance(timeout.saturating_sub(Duration::from_millis(1)));
            None
        }
    }

    let clock = ManualClock::new();
    let mut pacer = FramePacer::with_clock(
        EarlyInput(clock.clone()),
        clock,
        50,
        TimingStrategy::Adaptive,
    );
    for _ in 0..100 {
        pacer.tick();
    }

    assert!(pacer.overshoot_estimate() < -0.000_9);
}

#[test]
fn converged_pacer_reports_target_rate() {
    let clock = ManualClock::new();
    let input = SleepyInput::new(&clock, Duration::from_millis(2));
    let mut pacer = FramePacer::with_clock(input, clock, 50, TimingStrategy::Adaptive);

    for _ in 0..(FPS_WINDOW * 3) {
        pacer.tick();
    }

    assert_relative_eq!(pacer.fps(), 50.0, epsilon = 1e-6);
}

#[test]
fn fps_is_zero_until_two_ticks() {
    let clock = ManualClock::new();
    let input = SleepyInput::new(&clock, Duration::ZERO);
    let mut pacer = FramePacer::with_clock(input, clock, 60, TimingStrategy::Adaptive);

    assert_eq!(pacer.fps(), 0.0);
    pacer.tick();
    assert_eq!(pacer.fps(), 0.0);
    pacer.tick();
    assert!(pacer.fps() > 0.0);
}

#[test]
fn late_frames_only_pump_input() {
    let clock = ManualClock::new();
    let input = SleepyInput::new(&clock, Duration::ZERO);
    let mut pacer = FramePacer::with_clock(input, clock.clone(), 50, TimingStrategy::Adaptive);

    clock.advance(Duration::from_millis(35));
    pacer.tick();

    assert_eq!(pacer.input().polls, vec![Duration::from_millis(1)]);
    assert_eq!(pacer.overshoot_estimate(), 0.0);
}

#[test]
fn unlimited_and_zero_rate_never_throttle() {
    let clock = ManualClock::new();
    let mut unlimited = FramePacer::with_clock(
        ScriptedInput::new(),
        clock.clone(),
        60,
        TimingStrategy::Unlimited,
    );
    let mut zero_rate =
        FramePacer::with_clock(ScriptedInput::new(), clock, 0, TimingStrategy::Adaptive);

    for _ in 0..5 {
        unlimited.tick();
        zero_rate.tick();
    }

    assert!(
        unlimited
            .input()
            .polls()
            .iter()
            .all(|poll| *poll == Duration::from_millis(1))
    );
    assert_eq!(zero_rate.input().polls().len(), 5);
    assert_eq!(zero_rate.frame_duration(), Duration::ZERO);
    assert_eq!(unlimited.last_adjusted_wait(), None);
}

#[test]
fn hybrid_sleeps_short_then_spins_to_the_deadline() {
    let clock = ManualClock::with_auto_step(Duration::from_micros(10));
    let input = SleepyInput::new(&clock, Duration::ZERO);
    let mut pacer = FramePacer::with_clock(input, clock.clone(), 50, TimingStrategy::Hybrid);

    pacer.tick();

    assert_eq!(pacer.last_adjusted_wait(), Some(Duration::from_millis(17)));
    let now = clock.peek();
    assert!(now >= Duration::from_millis(20));
    assert!(now < Duration::from_millis(21));
}

#[test]
fn hybrid_near_the_deadline_polls_minimally() {
    let clock = ManualClock::with_auto_step(Duration::from_micros(10));
    let input = SleepyInput::new(&clock, Duration::ZERO);
    let mut pacer = FramePacer::with_clock(input, clock.clone(), 50, TimingStrategy::Hybrid);

    clock.advance(Duration::from_millis(18));
    pacer.tick();

    assert_eq!(pacer.input().polls, vec![Duration::from_millis(1)]);
}

#[test]
fn keys_pressed_while_waiting_are_returned() {
    let clock = ManualClock::new();
    let mut input = SleepyInput::new(&clock, Duration::ZERO);
    input.keys.push(KeyCode::from('p'));
    let mut pacer = FramePacer::with_clock(input, clock, 30, TimingStrategy::Adaptive);

    assert_eq!(pacer.tick(), Some(KeyCode::from('p')));
    assert_eq!(pacer.tick(), None);
}

#[test]
fn target_rate_changes_apply_immediately() {
    let clock = ManualClock::new();
    let mut pacer =
        FramePacer::with_clock(ScriptedInput::new(), clock, 60, TimingStrategy::Adaptive);

    pacer.set_target_rate(100);
    assert_eq!(pacer.target_rate(), 100);
    assert_eq!(pacer.frame_duration(), Duration::from_millis(10));

    pacer.set_target_rate(-5);
    assert_eq!(pacer.target_rate(), 0);
    assert_eq!(pacer.frame_duration(), Duration::ZERO);
}

#[test]
fn stop_releases_input_once() {
    let clock = ManualClock::new();
    let input = SleepyInput::new(&clock, Duration::ZERO);
    let mut pacer = FramePacer::with_clock(input, clock.clone(), 60, TimingStrategy::Adaptive);

    pacer.stop();
    pacer.stop();

    assert!(pacer.is_stopped());
    assert_eq!(pacer.input().released, 1);
    assert_eq!(clock.now(), Duration::ZERO);
}
