use std::collections::VecDeque;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::interaction::{InputSource, KeyCode};

use super::{Clock, MonotonicClock};

/// Number of tick timestamps kept for the FPS estimate.
pub const FPS_WINDOW: usize = 120;

/// EMA factor applied to each new overshoot observation.
pub const OVERSHOOT_SMOOTHING: f64 = 0.1;

const MIN_WAIT: Duration = Duration::from_millis(1);
const HYBRID_SLEEP_THRESHOLD: Duration = Duration::from_millis(3);
const HYBRID_SAFETY_MARGIN: Duration = Duration::from_millis(2);

/// How the pacer spends the time left in a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TimingStrategy {
    /// Single blocking wait, shortened by the learned overshoot of past waits.
    #[default]
    Adaptive,
    /// Blocking wait for the bulk of the frame, then a bounded busy-spin.
    Hybrid,
    /// Never throttle; only pump input.
    Unlimited,
}

/// Frame-rate governor that also owns the host input pump.
///
/// Every [`FramePacer::tick`] waits through the [`InputSource`], so key
/// presses are collected while the loop sleeps.
#[derive(Debug)]
pub struct FramePacer<I: InputSource, C: Clock = MonotonicClock> {
    input: I,
    clock: C,
    strategy: TimingStrategy,
    target_rate: u32,
    frame_duration: Duration,
    last_tick: Duration,
    tick_times: VecDeque<Duration>,
    fps: f64,
    overshoot_ema: f64,
    last_adjusted_wait: Option<Duration>,
    stopped: bool,
}

impl<I: InputSource> FramePacer<I, MonotonicClock> {
    #[must_use]
    pub fn new(input: I, target_rate: u32, strategy: TimingStrategy) -> Self {
        Self::with_clock(input, MonotonicClock::new(), target_rate, strategy)
    }
}

impl<I: InputSource, C: Clock> FramePacer<I, C> {
    #[must_use]
    pub fn with_clock(input: I, clock: C, target_rate: u32, strategy: TimingStrategy) -> Self {
        let last_tick = clock.now();
        Self {
            input,
            clock,
            strategy,
            target_rate,
            frame_duration: frame_duration_for(target_rate),
            last_tick,
            tick_times: VecDeque::with_capacity(FPS_WINDOW),
            fps: 0.0,
            overshoot_ema: 0.0,
            last_adjusted_wait: None,
            stopped: false,
        }
    }

    /// Paces one frame and returns the key pressed meanwhile, if any.
    pub fn tick(&mut self) -> Option<KeyCode> {
        let now = self.clock.now();

        if self.target_rate == 0 || self.strategy == TimingStrategy::Unlimited {
            let key = self.input.poll_key(MIN_WAIT);
            self.record_tick(now);
            return key;
        }

        let elapsed = now.saturating_sub(self.last_tick);
        let remaining = self.frame_duration.as_secs_f64() - elapsed.as_secs_f64();
        let key = match self.strategy {
            TimingStrategy::Hybrid => self.tick_hybrid(remaining),
            _ => self.tick_adaptive(remaining),
        };

        let finished = self.clock.now();
        self.record_tick(finished);
        key
    }

    fn tick_adaptive(&mut self, remaining: f64) -> Option<KeyCode> {
        if remaining <= 0.0 {
            let key = self.input.poll_key(MIN_WAIT);
            self.last_tick = self.clock.now();
            return key;
        }

        let wait = whole_millis_at_least_one(remaining - self.overshoot_ema);
        let before = self.clock.now();
        let key = self.input.poll_key(wait);
        let after = self.clock.now();

        let overshoot = after.saturating_sub(before).as_secs_f64() - wait.as_secs_f64();
        self.overshoot_ema += OVERSHOOT_SMOOTHING * (overshoot - self.overshoot_ema);
        self.last_adjusted_wait = Some(wait);
        self.last_tick = after;
        trace!(
            wait_ms = wait.as_millis() as u64,
            overshoot_s = overshoot,
            ema_s = self.overshoot_ema,
            "adaptive wait"
        );
        key
    }

    fn tick_hybrid(&mut self, remaining: f64) -> Option<KeyCode> {
        let deadline = self.last_tick + self.frame_duration;

        let key = if remaining > HYBRID_SLEEP_THRESHOLD.as_secs_f64() {
            let wait =
                whole_millis_at_least_one(remaining - HYBRID_SAFETY_MARGIN.as_secs_f64());
            self.last_adjusted_wait = Some(wait);
            self.input.poll_key(wait)
        } else {
            self.last_adjusted_wait = Some(MIN_WAIT);
            self.input.poll_key(MIN_WAIT)
        };

        let spin_started = self.clock.now();
        loop {
            let now = self.clock.now();
            if now >= deadline || now.saturating_sub(spin_started) >= self.frame_duration {
                break;
            }
            std::hint::spin_loop();
        }

        self.last_tick = self.clock.now();
        key
    }

    fn record_tick(&mut self, now: Duration) {
        if self.tick_times.len() == FPS_WINDOW {
            self.tick_times.pop_front();
        }
        self.tick_times.push_back(now);
        self.last_tick = now;

        if self.tick_times.len() < 2 {
            return;
        }
        let oldest = self.tick_times.front().copied().unwrap_or(now);
        let elapsed = now.saturating_sub(oldest).as_secs_f64();
        if elapsed > 0.0 {
            self.fps = (self.tick_times.len() - 1) as f64 / elapsed;
        }
    }

    /// Measured rate over the last [`FPS_WINDOW`] ticks; zero until two ticks
    /// were recorded.
    #[must_use]
    pub fn fps(&self) -> f64 {
        self.fps
    }

    #[must_use]
    pub fn target_rate(&self) -> u32 {
        self.target_rate
    }

    /// Changes the target rate; negative values clamp to zero (unthrottled).
    pub fn set_target_rate(&mut self, rate: i64) {
        let rate = u32::try_from(rate.max(0)).unwrap_or(u32::MAX);
        debug!(target_rate = rate, "pacer target rate changed");
        self.target_rate = rate;
        self.frame_duration = frame_duration_for(rate);
    }

    #[must_use]
    pub fn frame_duration(&self) -> Duration {
        self.frame_duration
    }

    #[must_use]
    pub fn strategy(&self) -> TimingStrategy {
        self.strategy
    }

    pub fn set_strategy(&mut self, strategy: TimingStrategy) {
        self.strategy = strategy;
    }

    /// Smoothed difference between actual and requested wait, in seconds.
    /// Negative when the host tends to wake early.
    #[must_use]
    pub fn overshoot_estimate(&self) -> f64 {
        self.overshoot_ema
    }

    /// Blocking wait requested on the most recent throttled tick.
    #[must_use]
    pub fn last_adjusted_wait(&self) -> Option<Duration> {
        self.last_adjusted_wait
    }

    #[must_use]
    pub fn input(&self) -> &I {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut I {
        &mut self.input
    }

    #[must_use]
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Releases the input source. Further calls are no-ops.
    pub fn stop(&mut self) {
        if self.stopped {
            return;
        }
        self.stopped = true;
        self.input.release();
        debug!("pacer stopped");
    }

    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }
}

fn frame_duration_for(rate: u32) -> Duration {
    if rate == 0 {
        Duration::ZERO
    } else {
        Duration::from_secs_f64(1.0 / f64::from(rate))
    }
}

fn whole_millis_at_least_one(seconds: f64) -> Duration {
    let millis = (seconds * 1000.0).floor();
    if millis.is_finite() && millis >= 1.0 {
        Duration::from_millis(millis as u64)
    } else {
        MIN_WAIT
    }
}
