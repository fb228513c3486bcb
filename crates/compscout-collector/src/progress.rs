//! Per-run stage tracking and snapshot delivery.

use compscout_core::{Stage, StageProgress, StageStatus};
use tokio::sync::mpsc::UnboundedSender;

/// Sending half of a progress subscription.
pub type ProgressSender = UnboundedSender<Vec<StageProgress>>;

/// Owns the seven stage entries of one run.
///
/// Every accepted status change sends a full copy of the list to each
/// subscriber. Subscribers whose receiver was dropped are forgotten.
///
/// Dropping the tracker while a stage is still running marks that stage
/// `error`, so a run that unwinds or is cancelled mid-stage still leaves
/// subscribers with a final snapshot.
pub(crate) struct ProgressTracker {
    stages: Vec<StageProgress>,
    subscribers: Vec<ProgressSender>,
}

impl ProgressTracker {
    pub(crate) fn new(subscribers: Vec<ProgressSender>) -> Self {
        Self {
            stages: Stage::ALL.iter().copied().map(StageProgress::pending).collect(),
            subscribers,
        }
    }

    pub(crate) fn start(&mut self, stage: Stage) {
        tracing::info!(stage = %stage, "stage started");
        self.transition(stage, StageStatus::Running, None, None);
    }

    pub(crate) fn complete(
        &mut self,
        stage: Stage,
        data: Option<serde_json::Value>,
        message: Option<String>,
    ) {
        tracing::info!(stage = %stage, "stage completed");
        self.transition(stage, StageStatus::Completed, data, message);
    }

    pub(crate) fn fail(&mut self, stage: Stage, message: String) {
        tracing::warn!(stage = %stage, message = %message, "stage ended in error");
        self.transition(stage, StageStatus::Error, None, Some(message));
    }

    /// The stage currently marked running, if any.
    pub(crate) fn running(&self) -> Option<Stage> {
        Stage::ALL
            .iter()
            .copied()
            .find(|stage| self.stages[stage.index()].status == StageStatus::Running)
    }

    pub(crate) fn snapshot(&self) -> Vec<StageProgress> {
        self.stages.clone()
    }

    fn transition(
        &mut self,
        stage: Stage,
        next: StageStatus,
        data: Option<serde_json::Value>,
        message: Option<String>,
    ) {
        let entry = &mut self.stages[stage.index()];
        if !entry.status.can_advance_to(next) {
            if entry.status.is_terminal() {
                tracing::warn!(stage = %stage, to = ?next, "stage already finished");
            } else {
                tracing::warn!(
                    stage = %stage,
                    from = ?entry.status,
                    to = ?next,
                    "ignoring out-of-order stage transition"
                );
            }
            return;
        }

        entry.status = next;
        entry.progress = next.progress();
        if data.is_some() {
            entry.data = data;
        }
        if message.is_some() {
            entry.message = message;
        }

        self.notify();
    }

    fn notify(&mut self) {
        if self.subscribers.is_empty() {
            return;
        }
        let snapshot = self.snapshot();
        self.subscribers
            .retain(|subscriber| subscriber.send(snapshot.clone()).is_ok());
    }
}

impl Drop for ProgressTracker {
    fn drop(&mut self) {
        if let Some(stage) = self.running() {
            self.fail(stage, "stage was interrupted before finishing".to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use tokio::sync::mpsc::unbounded_channel;

    use super::*;

    #[test]
    fn starts_with_seven_pending_entries() {
        let tracker = ProgressTracker::new(Vec::new());
        let stages = tracker.snapshot();
        assert_eq!(stages.len(), 7);
        assert!(stages.iter().all(|s| s.status == StageStatus::Pending));
        assert_eq!(stages[0].step_name, "Blog search");
        assert_eq!(stages[6].step_name, "Video transcript analysis");
        assert_eq!(tracker.running(), None);
    }

    #[test]
    fn each_change_sends_a_full_snapshot() {
        let (tx, mut rx) = unbounded_channel();
        let mut tracker = ProgressTracker::new(vec![tx]);

        tracker.start(Stage::BlogAcquisition);
        assert_eq!(tracker.running(), Some(Stage::BlogAcquisition));
        tracker.complete(
            Stage::BlogAcquisition,
            Some(serde_json::json!({"count": 3})),
            None,
        );

        let first = rx.try_recv().expect("running snapshot");
        assert_eq!(first.len(), 7);
        assert_eq!(first[0].status, StageStatus::Running);
        assert_eq!(first[0].progress, 50);

        let second = rx.try_recv().expect("completed snapshot");
        assert_eq!(second[0].status, StageStatus::Completed);
        assert_eq!(second[0].progress, 100);
        assert_eq!(second[0].data, Some(serde_json::json!({"count": 3})));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn backward_transitions_are_ignored() {
        let (tx, mut rx) = unbounded_channel();
        let mut tracker = ProgressTracker::new(vec![tx]);

        tracker.complete(Stage::VideoAcquisition, None, None);
        assert!(rx.try_recv().is_err(), "pending cannot jump to completed");

        tracker.start(Stage::VideoAcquisition);
        tracker.fail(Stage::VideoAcquisition, "gateway down".to_string());
        tracker.start(Stage::VideoAcquisition);

        let stages = tracker.snapshot();
        assert_eq!(stages[1].status, StageStatus::Error);
        assert_eq!(stages[1].progress, 100);
        assert_eq!(stages[1].message.as_deref(), Some("gateway down"));
        assert_eq!(rx.try_recv().map(|s| s[1].status), Ok(StageStatus::Running));
        assert_eq!(rx.try_recv().map(|s| s[1].status), Ok(StageStatus::Error));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn dropped_subscribers_are_forgotten() {
        let (tx, rx) = unbounded_channel();
        let mut tracker = ProgressTracker::new(vec![tx]);
        drop(rx);

        tracker.start(Stage::BlogAcquisition);
        assert!(tracker.subscribers.is_empty());
    }

    #[test]
    fn dropping_mid_stage_fails_the_running_stage() {
        let (tx, mut rx) = unbounded_channel();
        let mut tracker = ProgressTracker::new(vec![tx]);
        tracker.start(Stage::BlogAcquisition);
        tracker.complete(Stage::BlogAcquisition, None, None);
        tracker.start(Stage::VideoAcquisition);
        drop(tracker);

        let last = std::iter::from_fn(|| rx.try_recv().ok())
            .last()
            .expect("snapshots were sent");
        assert_eq!(last[0].status, StageStatus::Completed);
        assert_eq!(last[1].status, StageStatus::Error);
        assert_eq!(last[1].message.as_deref(), Some("stage was interrupted before finishing"));
        assert!(last[2..].iter().all(|s| s.status == StageStatus::Pending));
    }

    #[test]
    fn dropping_between_stages_sends_nothing() {
        let (tx, mut rx) = unbounded_channel();
        let mut tracker = ProgressTracker::new(vec![tx]);
        tracker.start(Stage::BlogAcquisition);
        tracker.complete(Stage::BlogAcquisition, None, None);
        let _ = rx.try_recv();
        let _ = rx.try_recv();
        drop(tracker);

        assert!(rx.try_recv().is_err());
    }
}
