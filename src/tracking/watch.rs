//! Watch-progress throttling and resume bookkeeping
//!
//! One tracker per lesson load. Player time-updates arrive many times per
//! second; the tracker decides which of them are worth a network report and
//! remembers the one-shot resume seek so re-running effects cannot seek
//! twice. All counters reset when the lesson identity changes.

/// Throttle state for one lesson's playback session
#[derive(Debug, Clone)]
pub struct WatchTracker {
    /// Lesson (course) this tracker belongs to
    lesson_id: i64,
    /// Last percent sent to the backend; advances optimistically
    last_reported: u8,
    /// The one-shot resume seek has been consumed
    resumed: bool,
}

impl WatchTracker {
    /// Minimum forward delta, in percent, worth a report (short of 100)
    pub const MIN_DELTA: u8 = 5;

    /// Fresh tracker for a lesson
    pub fn new(lesson_id: i64) -> Self {
        Self { lesson_id, last_reported: 0, resumed: false }
    }

    /// Lesson this tracker belongs to
    pub fn lesson_id(&self) -> i64 {
        self.lesson_id
    }

    /// Last percent handed out for reporting
    pub fn last_reported(&self) -> u8 {
        self.last_reported
    }

    /// Reset all counters when the lesson identity changes
    pub fn switch_lesson(&mut self, lesson_id: i64) {
        if lesson_id != self.lesson_id {
            *self = Self::new(lesson_id);
        }
    }

    /// Watch percent for a playback position, clamped to 0-100
    pub fn percent(current_time: f64, duration: f64) -> u8 {
        if duration <= 0.0 {
            return 0;
        }
        ((current_time / duration) * 100.0).round().clamp(0.0, 100.0) as u8
    }

    /// Handle a player time-update
    ///
    /// Returns the percent to report, or None when the update is not worth
    /// sending: progress must move forward, and by at least [`Self::MIN_DELTA`]
    /// unless it reaches 100. The returned value is recorded as reported
    /// before any network call happens, regardless of its outcome.
    pub fn on_time_update(&mut self, current_time: f64, duration: f64) -> Option<u8> {
        if duration <= 0.0 {
            return None;
        }

        let rounded = Self::percent(current_time, duration);
        if rounded <= self.last_reported {
            return None;
        }
        if rounded < 100 && rounded - self.last_reported < Self::MIN_DELTA {
            return None;
        }

        self.last_reported = rounded;
        Some(rounded)
    }

    /// Handle the playback-ended event: always report 100
    pub fn on_ended(&mut self) -> u8 {
        self.last_reported = 100;
        100
    }

    /// One-shot resume seek target for a partially watched lesson
    ///
    /// Yields `(percent / 100) * duration` when the stored percent is
    /// strictly between 0 and 100 and the duration is known, at most once
    /// per lesson load. Consuming the seek also primes `last_reported` so
    /// playback resumed at 40% does not immediately re-report 40%.
    pub fn resume_target(&mut self, progress_percent: u8, duration: f64) -> Option<f64> {
        if self.resumed {
            return None;
        }
        if progress_percent == 0 || progress_percent >= 100 {
            return None;
        }
        if duration <= 0.0 {
            return None;
        }

        let target = (f64::from(progress_percent) / 100.0) * duration;
        if target <= 0.0 || target >= duration {
            return None;
        }

        self.last_reported = progress_percent;
        self.resumed = true;
        Some(target)
    }
}
