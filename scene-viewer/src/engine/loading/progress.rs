use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use constants::render_settings::{TIMER_PROGRESS_INTERVAL_SECS, TIMER_PROGRESS_STEP};

fn default_step() -> f32 {
    TIMER_PROGRESS_STEP
}

fn default_interval_secs() -> f32 {
    TIMER_PROGRESS_INTERVAL_SECS
}

/// How the loading bar advances.
///
/// `Completion` follows real load callbacks and is what the viewer ships with.
/// `Timer` is the fallback for hosts that cannot report completion: it fills
/// the bar at a fixed cadence and does NOT reflect actual load state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum ProgressStrategy {
    #[default]
    Completion,
    Timer {
        #[serde(default = "default_step")]
        step: f32,
        #[serde(default = "default_interval_secs")]
        interval_secs: f32,
    },
}

/// Repeating fixed-step progress simulation backing `ProgressStrategy::Timer`.
#[derive(Debug, Clone)]
pub struct ProgressTimer {
    timer: Timer,
    step: f32,
    value: f32,
    finished: bool,
}

impl ProgressTimer {
    pub fn new(step: f32, interval_secs: f32) -> Self {
        Self {
            timer: Timer::from_seconds(interval_secs.max(f32::EPSILON), TimerMode::Repeating),
            step: step.clamp(f32::EPSILON, 1.0),
            value: 0.0,
            finished: false,
        }
    }

    /// Advance by `delta`. Each elapsed interval either adds one step or,
    /// once the bar is already full, marks the simulation finished.
    pub fn tick(&mut self, delta: Duration) {
        self.timer.tick(delta);
        for _ in 0..self.timer.times_finished_this_tick() {
            if self.finished {
                break;
            }
            if self.value >= 1.0 {
                self.finished = true;
            } else {
                self.value = (self.value + self.step).min(1.0);
            }
        }
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fills_in_four_intervals_and_finishes_on_fifth() {
        let mut timer = ProgressTimer::new(TIMER_PROGRESS_STEP, TIMER_PROGRESS_INTERVAL_SECS);
        let interval = Duration::from_millis(500);

        for expected in [0.25, 0.5, 0.75, 1.0] {
            timer.tick(interval);
            assert_eq!(timer.value(), expected);
            assert!(!timer.is_finished());
        }

        timer.tick(interval);
        assert!(timer.is_finished());
        assert_eq!(timer.value(), 1.0);
    }

    #[test]
    fn test_partial_interval_does_not_advance() {
        let mut timer = ProgressTimer::new(TIMER_PROGRESS_STEP, TIMER_PROGRESS_INTERVAL_SECS);
        timer.tick(Duration::from_millis(499));
        assert_eq!(timer.value(), 0.0);
        timer.tick(Duration::from_millis(1));
        assert_eq!(timer.value(), 0.25);
    }

    #[test]
    fn test_strategy_json_forms() {
        let completion: ProgressStrategy =
            serde_json::from_str(r#"{"strategy":"completion"}"#).unwrap();
        assert_eq!(completion, ProgressStrategy::Completion);

        let timer: ProgressStrategy =
            serde_json::from_str(r#"{"strategy":"timer","step":0.1,"interval_secs":2.0}"#)
                .unwrap();
        assert_eq!(
            timer,
            ProgressStrategy::Timer {
                step: 0.1,
                interval_secs: 2.0
            }
        );

        // A bare timer falls back to +0.25 every 500 ms.
        let bare: ProgressStrategy = serde_json::from_str(r#"{"strategy":"timer"}"#).unwrap();
        assert_eq!(
            bare,
            ProgressStrategy::Timer {
                step: TIMER_PROGRESS_STEP,
                interval_secs: TIMER_PROGRESS_INTERVAL_SECS
            }
        );
    }
}
