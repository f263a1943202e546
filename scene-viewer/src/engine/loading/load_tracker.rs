use bevy::prelude::*;
use serde::Serialize;
use std::time::Duration;

use crate::engine::loading::progress::{ProgressStrategy, ProgressTimer};
use crate::errors::ViewerError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadKind {
    Model,
    Audio,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    Pending,
    Loaded,
    Failed(String),
}

impl LoadStatus {
    pub fn is_resolved(&self) -> bool {
        !matches!(self, LoadStatus::Pending)
    }
}

/// One asset whose completion contributes to overall readiness.
#[derive(Debug, Clone)]
pub struct LoadTask {
    pub resource_id: String,
    pub kind: LoadKind,
    pub status: LoadStatus,
}

/// Aggregates independent load callbacks into a single progress value and a
/// one-shot "ready" signal.
///
/// Failed units count as resolved so a broken asset never stalls the loading
/// screen; the failure stays available through [`AssetLoadTracker::failures`].
#[derive(Resource, Debug)]
pub struct AssetLoadTracker {
    tasks: Vec<LoadTask>,
    frozen: bool,
    timer: Option<ProgressTimer>,
    timer_cancelled: bool,
    high_water: f32,
    ready_fired: bool,
}

impl Default for AssetLoadTracker {
    fn default() -> Self {
        Self::new(&ProgressStrategy::Completion)
    }
}

impl AssetLoadTracker {
    pub fn new(strategy: &ProgressStrategy) -> Self {
        let timer = match strategy {
            ProgressStrategy::Completion => None,
            ProgressStrategy::Timer {
                step,
                interval_secs,
            } => Some(ProgressTimer::new(*step, *interval_secs)),
        };

        Self {
            tasks: Vec::new(),
            frozen: false,
            timer,
            timer_cancelled: false,
            high_water: 0.0,
            ready_fired: false,
        }
    }

    pub fn register(
        &mut self,
        resource_id: impl Into<String>,
        kind: LoadKind,
    ) -> Result<(), ViewerError> {
        let resource_id = resource_id.into();
        if self.frozen {
            return Err(ViewerError::configuration(
                "load unit registered after freeze",
                resource_id,
            ));
        }
        if self.task(&resource_id).is_some() {
            return Err(ViewerError::configuration(
                "duplicate load unit",
                resource_id,
            ));
        }

        self.tasks.push(LoadTask {
            resource_id,
            kind,
            status: LoadStatus::Pending,
        });
        Ok(())
    }

    /// Seal the unit list. Readiness is only evaluated once frozen.
    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub fn complete(&mut self, resource_id: &str) -> Result<(), ViewerError> {
        self.resolve(resource_id, LoadStatus::Loaded)
    }

    pub fn fail(&mut self, resource_id: &str, reason: impl Into<String>) -> Result<(), ViewerError> {
        self.resolve(resource_id, LoadStatus::Failed(reason.into()))
    }

    fn resolve(&mut self, resource_id: &str, status: LoadStatus) -> Result<(), ViewerError> {
        let task = self
            .tasks
            .iter_mut()
            .find(|t| t.resource_id == resource_id)
            .ok_or_else(|| ViewerError::asset_load(resource_id, "unknown load unit"))?;

        if task.status.is_resolved() {
            return Err(ViewerError::asset_load(resource_id, "already resolved"));
        }

        task.status = status;
        self.raise_high_water();
        Ok(())
    }

    /// Drive the fallback timer. No-op under the completion strategy or once
    /// the timer has been cancelled.
    pub fn tick(&mut self, delta: Duration) {
        if let Some(timer) = self.timer.as_mut() {
            timer.tick(delta);
            self.raise_high_water();
        }
    }

    fn raise_high_water(&mut self) {
        self.high_water = self.high_water.max(self.raw_progress());
    }

    fn raw_progress(&self) -> f32 {
        if let Some(timer) = &self.timer {
            return timer.value();
        }
        if self.tasks.is_empty() {
            return if self.frozen { 1.0 } else { 0.0 };
        }
        self.resolved() as f32 / self.expected() as f32
    }

    /// Monotonically non-decreasing progress in `[0, 1]`.
    pub fn progress(&self) -> f32 {
        if self.ready_fired {
            return 1.0;
        }
        self.high_water.max(self.raw_progress()).clamp(0.0, 1.0)
    }

    pub fn expected(&self) -> usize {
        self.tasks.len()
    }

    pub fn resolved(&self) -> usize {
        self.tasks.iter().filter(|t| t.status.is_resolved()).count()
    }

    pub fn task(&self, resource_id: &str) -> Option<&LoadTask> {
        self.tasks.iter().find(|t| t.resource_id == resource_id)
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &str)> {
        self.tasks.iter().filter_map(|t| match &t.status {
            LoadStatus::Failed(reason) => Some((t.resource_id.as_str(), reason.as_str())),
            _ => None,
        })
    }

    fn ready_condition(&self) -> bool {
        if !self.frozen {
            return false;
        }
        match &self.timer {
            Some(timer) => timer.is_finished(),
            None => self.tasks.iter().all(|t| t.status.is_resolved()),
        }
    }

    /// Returns `true` exactly once: on the first call after the ready
    /// condition holds. The fallback timer is cancelled at that moment.
    pub fn take_ready(&mut self) -> bool {
        if self.ready_fired || !self.ready_condition() {
            return false;
        }
        self.ready_fired = true;
        self.high_water = 1.0;
        if self.timer.take().is_some() {
            self.timer_cancelled = true;
        }
        true
    }

    pub fn is_ready(&self) -> bool {
        self.ready_fired
    }

    pub fn timer_active(&self) -> bool {
        self.timer.is_some()
    }

    pub fn timer_cancelled(&self) -> bool {
        self.timer_cancelled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use constants::render_settings::{TIMER_PROGRESS_INTERVAL_SECS, TIMER_PROGRESS_STEP};

    const UNITS: [(&str, LoadKind); 4] = [
        ("bus", LoadKind::Model),
        ("audio:bus", LoadKind::Audio),
        ("audio:birds", LoadKind::Audio),
        ("audio:music", LoadKind::Audio),
    ];

    fn frozen_tracker() -> AssetLoadTracker {
        let mut tracker = AssetLoadTracker::new(&ProgressStrategy::Completion);
        for (id, kind) in UNITS {
            tracker.register(id, kind).unwrap();
        }
        tracker.freeze();
        tracker
    }

    fn permutations(items: &[usize]) -> Vec<Vec<usize>> {
        if items.len() <= 1 {
            return vec![items.to_vec()];
        }
        let mut out = Vec::new();
        for i in 0..items.len() {
            let mut rest = items.to_vec();
            let head = rest.remove(i);
            for mut tail in permutations(&rest) {
                tail.insert(0, head);
                out.push(tail);
            }
        }
        out
    }

    #[test]
    fn test_any_interleaving_fires_ready_once_with_monotonic_progress() {
        for order in permutations(&[0, 1, 2, 3]) {
            for failure_mask in 0u8..16 {
                let mut tracker = frozen_tracker();
                let mut last = tracker.progress();
                let mut fired = 0;

                for &unit in &order {
                    assert!(!tracker.is_ready());
                    let id = UNITS[unit].0;
                    if failure_mask & (1 << unit) != 0 {
                        tracker.fail(id, "404").unwrap();
                    } else {
                        tracker.complete(id).unwrap();
                    }

                    let now = tracker.progress();
                    assert!(now >= last, "progress regressed in {order:?}/{failure_mask}");
                    last = now;

                    if tracker.take_ready() {
                        fired += 1;
                    }
                }

                // Extra polls must not re-fire.
                assert!(!tracker.take_ready());
                assert_eq!(fired, 1, "order {order:?} mask {failure_mask}");
                assert_eq!(tracker.progress(), 1.0);
                assert_eq!(tracker.failures().count(), failure_mask.count_ones() as usize);
            }
        }
    }

    #[test]
    fn test_three_succeed_one_fails() {
        let mut tracker = frozen_tracker();
        tracker.complete("bus").unwrap();
        tracker.complete("audio:bus").unwrap();
        tracker.complete("audio:birds").unwrap();
        assert_eq!(tracker.progress(), 0.75);
        assert!(!tracker.take_ready());

        tracker.fail("audio:music", "decode error").unwrap();
        assert_eq!(tracker.progress(), 1.0);
        assert!(tracker.take_ready());
        assert!(!tracker.take_ready());

        let failures: Vec<_> = tracker.failures().collect();
        assert_eq!(failures, vec![("audio:music", "decode error")]);
        assert_eq!(
            tracker.task("audio:music").map(|t| t.status.clone()),
            Some(LoadStatus::Failed("decode error".into()))
        );
    }

    #[test]
    fn test_not_ready_until_frozen() {
        let mut tracker = AssetLoadTracker::new(&ProgressStrategy::Completion);
        tracker.register("bus", LoadKind::Model).unwrap();
        tracker.complete("bus").unwrap();
        assert!(!tracker.take_ready());

        tracker.freeze();
        assert!(tracker.take_ready());
    }

    #[test]
    fn test_empty_frozen_tracker_is_ready() {
        let mut tracker = AssetLoadTracker::new(&ProgressStrategy::Completion);
        assert_eq!(tracker.progress(), 0.0);
        tracker.freeze();
        assert_eq!(tracker.progress(), 1.0);
        assert!(tracker.take_ready());
    }

    #[test]
    fn test_registration_rules() {
        let mut tracker = AssetLoadTracker::new(&ProgressStrategy::Completion);
        tracker.register("bus", LoadKind::Model).unwrap();
        assert!(matches!(
            tracker.register("bus", LoadKind::Model),
            Err(ViewerError::Configuration { .. })
        ));

        tracker.freeze();
        assert!(matches!(
            tracker.register("late", LoadKind::Audio),
            Err(ViewerError::Configuration { .. })
        ));
        assert_eq!(tracker.expected(), 1);
    }

    #[test]
    fn test_bogus_reports_are_rejected_without_side_effects() {
        let mut tracker = frozen_tracker();
        assert!(matches!(
            tracker.complete("ghost"),
            Err(ViewerError::AssetLoad { .. })
        ));

        tracker.complete("bus").unwrap();
        assert!(matches!(
            tracker.fail("bus", "late failure"),
            Err(ViewerError::AssetLoad { .. })
        ));
        assert_eq!(tracker.task("bus").map(|t| t.status.clone()), Some(LoadStatus::Loaded));
        assert_eq!(tracker.failures().count(), 0);
    }

    #[test]
    fn test_timer_fallback_ignores_completion_and_cancels_once() {
        let strategy = ProgressStrategy::Timer {
            step: TIMER_PROGRESS_STEP,
            interval_secs: TIMER_PROGRESS_INTERVAL_SECS,
        };
        let mut tracker = AssetLoadTracker::new(&strategy);
        for (id, kind) in UNITS {
            tracker.register(id, kind).unwrap();
        }
        tracker.freeze();

        // Real completions are recorded but do not move the bar.
        for (id, _) in UNITS {
            tracker.complete(id).unwrap();
        }
        assert_eq!(tracker.progress(), 0.0);
        assert!(!tracker.take_ready());

        let interval = Duration::from_secs_f32(TIMER_PROGRESS_INTERVAL_SECS);
        for _ in 0..4 {
            tracker.tick(interval);
            assert!(!tracker.take_ready());
        }
        assert_eq!(tracker.progress(), 1.0);
        assert!(tracker.timer_active());

        tracker.tick(interval);
        assert!(tracker.take_ready());
        assert!(!tracker.timer_active());
        assert!(tracker.timer_cancelled());

        // Further ticks are inert once cancelled.
        tracker.tick(interval);
        assert!(!tracker.take_ready());
        assert_eq!(tracker.progress(), 1.0);
    }
}
