use crate::{animation::ease::Ease, foundation::core::Millis};

/// What a path animation does to its segment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnimationKind {
    /// Progressive draw of a new path segment.
    Draw,
    /// Fade-and-shrink of segments past the target index.
    Erase,
}

/// A duration-bearing animation. Completion is signalled by the session's scheduler at
/// [`AnimationTask::completes_at`]; nothing interrupts a task once started.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AnimationTask {
    /// Event index the transition targets.
    pub target: usize,
    /// Draw or erase.
    pub kind: AnimationKind,
    /// Clock time the task began.
    pub started_at: Millis,
    /// Length of the animation.
    pub duration: Millis,
    /// Curve applied to progress.
    pub ease: Ease,
}

impl AnimationTask {
    /// Clock time the animation ends.
    pub fn completes_at(&self) -> Millis {
        self.started_at + self.duration
    }

    /// True once `now` reaches [`AnimationTask::completes_at`].
    pub fn is_finished(&self, now: Millis) -> bool {
        now >= self.completes_at()
    }

    /// Eased progress in `0..=1`. Zero-length tasks are complete immediately.
    pub fn progress(&self, now: Millis) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_sub(self.started_at);
        let t = (elapsed.0 as f64) / (self.duration.0 as f64);
        self.ease.apply(t)
    }
}

/// At most one path animation in flight.
///
/// The lock is held from the moment a task starts until its duration plus `grace` has
/// elapsed. Non-user navigation must observe [`AnimationLock::is_busy`] and back off; user
/// navigation may replace the held task.
#[derive(Clone, Debug)]
pub struct AnimationLock {
    grace: Millis,
    held: Option<AnimationTask>,
}

impl AnimationLock {
    /// Empty lock that stays busy `grace` past each task's end.
    pub fn new(grace: Millis) -> Self {
        Self { grace, held: None }
    }

    /// True while a task is held and its release deadline has not passed.
    pub fn is_busy(&self, now: Millis) -> bool {
        self.release_at().is_some_and(|at| now < at)
    }

    /// Take the lock for `task`, replacing any held task. Returns the release deadline.
    pub fn acquire(&mut self, task: AnimationTask) -> Millis {
        let at = task.completes_at() + self.grace;
        self.held = Some(task);
        at
    }

    /// Deadline at which the held task stops blocking, if any.
    pub fn release_at(&self) -> Option<Millis> {
        self.held.map(|t| t.completes_at() + self.grace)
    }

    /// The held task, even if its deadline has passed.
    pub fn in_flight(&self) -> Option<&AnimationTask> {
        self.held.as_ref()
    }

    /// Drop the held task and return it.
    pub fn release(&mut self) -> Option<AnimationTask> {
        self.held.take()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/task.rs"]
mod tests;
