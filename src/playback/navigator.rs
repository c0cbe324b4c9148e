/// Which way the timeline last moved.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    /// Towards later events.
    Forward,
    /// Towards earlier events.
    Backward,
    /// No move yet, or a jump to the same index.
    #[default]
    None,
}

impl Direction {
    /// Direction of a move from `from` to `to`.
    pub fn between(from: usize, to: usize) -> Self {
        match to.cmp(&from) {
            std::cmp::Ordering::Greater => Self::Forward,
            std::cmp::Ordering::Less => Self::Backward,
            std::cmp::Ordering::Equal => Self::None,
        }
    }
}

/// Mutable navigation state of a session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackState {
    /// Event being shown.
    pub current_index: usize,
    /// Event shown before the last accepted navigation.
    pub previous_index: usize,
    /// Direction of the last accepted navigation.
    pub direction: Direction,
    /// Autoplay running.
    pub is_playing: bool,
    /// Slider drag in progress.
    pub is_dragging: bool,
}

/// A navigation request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GoTo {
    /// Requested index, clamped on arbitration.
    pub index: usize,
    /// Animate the transition.
    pub animated: bool,
    /// Came from the user, so it may override a running animation.
    pub user_initiated: bool,
}

impl GoTo {
    /// User request.
    pub fn user(index: usize, animated: bool) -> Self {
        Self {
            index,
            animated,
            user_initiated: true,
        }
    }

    /// Animated request from autoplay or another internal source.
    pub fn auto(index: usize) -> Self {
        Self {
            index,
            animated: true,
            user_initiated: false,
        }
    }
}

/// An accepted navigation request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition {
    /// Index before the move.
    pub from: usize,
    /// Index after the move.
    pub to: usize,
    /// Which way the move goes.
    pub direction: Direction,
    /// Animate paths; false redraws statically.
    pub animate: bool,
    /// Animate the camera; false jumps.
    pub animate_camera: bool,
}

/// Clamp `index` into `0..len`. Zero for an empty trajectory.
pub fn clamp_index(index: usize, len: usize) -> usize {
    index.min(len.saturating_sub(1))
}

/// Decide whether `req` is accepted and what it does.
///
/// Rejected when there is nothing to navigate, or when an animation holds the lock and the
/// request did not come from the user.
pub fn arbitrate(
    state: &PlaybackState,
    len: usize,
    req: GoTo,
    lock_busy: bool,
) -> Option<Transition> {
    if len == 0 {
        return None;
    }
    if lock_busy && !req.user_initiated {
        tracing::debug!(index = req.index, "navigation rejected while animating");
        return None;
    }
    let to = clamp_index(req.index, len);
    let direction = Direction::between(state.current_index, to);
    Some(Transition {
        from: state.current_index,
        to,
        direction,
        animate: req.animated && direction != Direction::None,
        animate_camera: req.animated,
    })
}
