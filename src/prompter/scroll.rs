//! Frame-driven auto-scroll.
//!
//! Timestamps are milliseconds on the display clock (the same unit a frame
//! callback receives). The engine never schedules anything itself: `play()`
//! hands out a [`FrameSubscription`] and the window feeds ticks back through
//! [`ScrollEngine::tick`] until the subscription is cancelled.

/// Content units per second at speed multiplier 1.0.
pub const BASE_UNITS_PER_SECOND: f64 = 50.0;
/// Frame gaps at or above this are treated as a clock discontinuity.
pub const RESYNC_THRESHOLD_MS: f64 = 100.0;
/// Pause at the end of the script before rewinding to the top.
pub const END_RESET_DELAY_MS: f64 = 1000.0;

pub const DEFAULT_SPEED: f64 = 1.0;
pub const MIN_SPEED: f64 = 0.1;
pub const MAX_SPEED: f64 = 3.0;

/// Clamp operator input to the accepted speed range. Non-numeric input maps
/// to the default speed.
pub fn clamp_speed(raw: f64) -> f64 {
    if raw.is_nan() {
        DEFAULT_SPEED
    } else {
        raw.clamp(MIN_SPEED, MAX_SPEED)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayState {
    #[default]
    Stopped,
    Playing,
}

impl PlayState {
    pub fn is_playing(self) -> bool {
        matches!(self, Self::Playing)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Advance {
    pub offset: f64,
    pub reached_end: bool,
}

/// Cancel token for the per-frame callback installed by `play()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameSubscription(u64);

#[derive(Debug, Clone)]
pub struct ScrollEngine {
    speed: f64,
    offset: f64,
    state: PlayState,
    reference_ms: Option<f64>,
    content_extent: f64,
    viewport_extent: f64,
    subscription: Option<FrameSubscription>,
    next_subscription: u64,
    reset_deadline_ms: Option<f64>,
}

impl Default for ScrollEngine {
    fn default() -> Self {
        Self {
            speed: DEFAULT_SPEED,
            offset: 0.0,
            state: PlayState::Stopped,
            reference_ms: None,
            content_extent: 0.0,
            viewport_extent: 0.0,
            subscription: None,
            next_subscription: 0,
            reset_deadline_ms: None,
        }
    }
}

impl ScrollEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn play_state(&self) -> PlayState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state.is_playing()
    }

    pub fn subscription(&self) -> Option<FrameSubscription> {
        self.subscription
    }

    pub fn reset_deadline(&self) -> Option<f64> {
        self.reset_deadline_ms
    }

    /// Whether the window should keep producing frames for this engine.
    pub fn wants_frames(&self) -> bool {
        self.subscription.is_some() || self.reset_deadline_ms.is_some()
    }

    /// Rejects non-positive or non-finite multipliers and keeps the current
    /// speed. Takes effect on the next tick.
    pub fn set_speed(&mut self, multiplier: f64) -> bool {
        if !(multiplier.is_finite() && multiplier > 0.0) {
            tracing::warn!(multiplier, "ignoring invalid scroll speed");
            return false;
        }
        self.speed = multiplier;
        true
    }

    pub fn set_extents(&mut self, content_extent: f64, viewport_extent: f64) {
        self.content_extent = content_extent.max(0.0);
        self.viewport_extent = viewport_extent.max(0.0);
    }

    pub fn content_extent(&self) -> f64 {
        self.content_extent
    }

    pub fn viewport_extent(&self) -> f64 {
        self.viewport_extent
    }

    pub fn is_at_end(&self) -> bool {
        (self.offset + self.viewport_extent).ceil() >= self.content_extent
    }

    pub fn play(&mut self, now_ms: f64) -> FrameSubscription {
        self.reset_deadline_ms = None;
        if let Some(subscription) = self.subscription {
            return subscription;
        }
        self.next_subscription += 1;
        let subscription = FrameSubscription(self.next_subscription);
        self.state = PlayState::Playing;
        self.reference_ms = Some(now_ms);
        self.subscription = Some(subscription);
        tracing::debug!(speed = self.speed, offset = self.offset, "scroll playing");
        subscription
    }

    pub fn pause(&mut self) {
        if self.subscription.take().is_some() {
            tracing::debug!(offset = self.offset, "scroll paused");
        }
        self.state = PlayState::Stopped;
        self.reference_ms = None;
    }

    pub fn toggle(&mut self, now_ms: f64) -> PlayState {
        if self.is_playing() {
            self.pause();
        } else {
            self.play(now_ms);
        }
        self.state
    }

    /// Rewind to the top. Playback state is left alone.
    pub fn reset(&mut self) {
        self.reset_deadline_ms = None;
        self.offset = 0.0;
    }

    /// Deliver a frame for `subscription`. Ticks for a cancelled or replaced
    /// subscription are ignored.
    pub fn tick(&mut self, subscription: FrameSubscription, now_ms: f64) -> Option<Advance> {
        if self.subscription != Some(subscription) {
            tracing::trace!(?subscription, "dropping stale frame");
            return None;
        }
        Some(self.advance(now_ms))
    }

    pub fn advance(&mut self, now_ms: f64) -> Advance {
        if !self.is_playing() {
            return Advance {
                offset: self.offset,
                reached_end: false,
            };
        }

        let reference = self.reference_ms.unwrap_or(now_ms);
        let delta_ms = now_ms - reference;
        if delta_ms > 0.0 && delta_ms < RESYNC_THRESHOLD_MS {
            self.offset += BASE_UNITS_PER_SECOND * self.speed * delta_ms / 1000.0;
        } else if delta_ms != 0.0 {
            tracing::trace!(delta_ms, "resynchronising frame clock");
        }
        self.reference_ms = Some(now_ms);

        if self.is_at_end() {
            self.offset = self
                .offset
                .min((self.content_extent - self.viewport_extent).max(0.0));
            self.pause();
            self.reset_deadline_ms = Some(now_ms + END_RESET_DELAY_MS);
            tracing::debug!(offset = self.offset, "reached end of script");
            return Advance {
                offset: self.offset,
                reached_end: true,
            };
        }

        Advance {
            offset: self.offset,
            reached_end: false,
        }
    }

    /// Apply the delayed end-of-script rewind once its deadline passes.
    /// Returns true when the offset was reset.
    pub fn poll_reset(&mut self, now_ms: f64) -> bool {
        match self.reset_deadline_ms {
            Some(deadline) if now_ms >= deadline => {
                self.reset_deadline_ms = None;
                self.offset = 0.0;
                true
            }
            _ => false,
        }
    }
}
