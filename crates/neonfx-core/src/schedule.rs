//! Cooperative scheduling primitives on a millisecond timeline.
//!
//! Nothing here owns a thread or a callback. Effects hold a [`Timer`] or a
//! [`FrameClock`] and poll it with the current time from their own `tick`.
//! Cancelling disarms the primitive, so a stopped effect has nothing left
//! that could fire.

/// Lifecycle shared by every effect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Lifecycle {
    #[default]
    Idle,
    Running,
}

impl Lifecycle {
    pub fn is_running(self) -> bool {
        self == Lifecycle::Running
    }
}

/// A one-shot timer: "run the next step after N milliseconds".
#[derive(Debug, Clone, Default)]
pub struct Timer {
    due_ms: Option<u64>,
}

impl Timer {
    pub const fn new() -> Self {
        Self { due_ms: None }
    }

    /// Arm the timer to fire `delay_ms` after `now_ms`, replacing any
    /// pending deadline.
    pub fn arm(&mut self, now_ms: u64, delay_ms: u64) {
        self.due_ms = Some(now_ms.saturating_add(delay_ms));
    }

    /// Disarm the timer. A disarmed timer never fires.
    pub fn cancel(&mut self) {
        self.due_ms = None;
    }

    pub fn is_armed(&self) -> bool {
        self.due_ms.is_some()
    }

    pub fn due_ms(&self) -> Option<u64> {
        self.due_ms
    }

    /// Fire the timer if its deadline has passed.
    ///
    /// Returns the scheduled deadline, which callers use as the base for the
    /// next `arm` so chained steps do not drift with poll latency.
    pub fn fire(&mut self, now_ms: u64) -> Option<u64> {
        match self.due_ms {
            Some(due) if now_ms >= due => {
                self.due_ms = None;
                Some(due)
            }
            _ => None,
        }
    }
}

/// A recurring fixed-rate clock: "run this every frame".
#[derive(Debug, Clone)]
pub struct FrameClock {
    interval_ms: u64,
    next_ms: Option<u64>,
}

impl FrameClock {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms: interval_ms.max(1),
            next_ms: None,
        }
    }

    /// Build a clock from a frame rate.
    pub fn from_fps(fps: u32) -> Self {
        Self::new(1000 / u64::from(fps.max(1)))
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    /// Start ticking; the first frame is due immediately.
    pub fn start(&mut self, now_ms: u64) {
        self.next_ms = Some(now_ms);
    }

    pub fn stop(&mut self) {
        self.next_ms = None;
    }

    pub fn is_running(&self) -> bool {
        self.next_ms.is_some()
    }

    /// Returns true when a frame is due, and schedules the following one.
    ///
    /// Missed frames are dropped rather than replayed.
    pub fn poll(&mut self, now_ms: u64) -> bool {
        match self.next_ms {
            Some(next) if now_ms >= next => {
                let following = next.saturating_add(self.interval_ms);
                self.next_ms = Some(if following > now_ms {
                    following
                } else {
                    now_ms.saturating_add(self.interval_ms)
                });
                true
            }
            _ => false,
        }
    }
}

/// Fires exactly once, the first time its target is observed visible.
///
/// Plays the part of an intersection observer that detaches itself after the
/// first hit, so each effect is initialized at most once per element.
#[derive(Debug, Clone, Default)]
pub struct VisibilityTrigger {
    fired: bool,
}

impl VisibilityTrigger {
    pub const fn new() -> Self {
        Self { fired: false }
    }

    /// Feed the current visibility; true only on the first visible report.
    pub fn observe(&mut self, visible: bool) -> bool {
        if visible && !self.fired {
            self.fired = true;
            true
        } else {
            false
        }
    }

    pub fn has_fired(&self) -> bool {
        self.fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timer_fires_once_at_deadline() {
        let mut timer = Timer::new();
        timer.arm(100, 50);
        assert_eq!(timer.fire(149), None);
        assert_eq!(timer.fire(160), Some(150));
        assert_eq!(timer.fire(1000), None);
        assert!(!timer.is_armed());
    }

    #[test]
    fn test_cancelled_timer_never_fires() {
        let mut timer = Timer::new();
        timer.arm(0, 10);
        timer.cancel();
        assert_eq!(timer.fire(u64::MAX), None);
    }

    #[test]
    fn test_frame_clock_cadence() {
        let mut clock = FrameClock::new(10);
        assert!(!clock.poll(0));

        clock.start(0);
        assert!(clock.poll(0));
        assert!(!clock.poll(5));
        assert!(clock.poll(10));
        // Falling far behind drops frames instead of bursting
        assert!(clock.poll(95));
        assert!(!clock.poll(100));
        assert!(clock.poll(105));

        clock.stop();
        assert!(!clock.poll(1000));
    }

    #[test]
    fn test_frame_clock_from_fps() {
        assert_eq!(FrameClock::from_fps(30).interval_ms(), 33);
        assert_eq!(FrameClock::from_fps(0).interval_ms(), 1000);
    }

    #[test]
    fn test_visibility_trigger_fires_once() {
        let mut trigger = VisibilityTrigger::new();
        assert!(!trigger.observe(false));
        assert!(trigger.observe(true));
        assert!(!trigger.observe(true));
        assert!(!trigger.observe(false));
        assert!(!trigger.observe(true));
        assert!(trigger.has_fired());
    }
}
