#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionLifecycle {
    Idle,
    /// Overlay created; init payload held until its first paint.
    AwaitingReady,
    Active,
}

impl SessionLifecycle {
    pub fn is_active(self) -> bool {
        !matches!(self, Self::Idle)
    }
}

pub fn can_transition(from: SessionLifecycle, to: SessionLifecycle) -> bool {
    matches!(
        (from, to),
        (SessionLifecycle::Idle, SessionLifecycle::AwaitingReady)
            | (SessionLifecycle::AwaitingReady, SessionLifecycle::Active)
            | (SessionLifecycle::AwaitingReady, SessionLifecycle::Idle)
            | (SessionLifecycle::Active, SessionLifecycle::Idle)
    ) || from == to
}

#[cfg(test)]
mod tests {
    use super::{can_transition, SessionLifecycle::*};

    #[test]
    fn overlay_must_paint_before_becoming_active() {
        assert!(can_transition(Idle, AwaitingReady));
        assert!(!can_transition(Idle, Active));
        assert!(can_transition(AwaitingReady, Active));
    }

    #[test]
    fn any_live_state_can_tear_down() {
        assert!(can_transition(AwaitingReady, Idle));
        assert!(can_transition(Active, Idle));
        assert!(!Idle.is_active());
        assert!(AwaitingReady.is_active());
    }
}
