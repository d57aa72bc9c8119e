//! Per-actor timers
//!
//! Timers count down in simulated seconds. The engine advances an actor's
//! [`TimerSet`] once per tick by the actor's scaled delta and hands the ids
//! that fired to the actor's behavior.

/// Identifier of a scheduled timer, unique within its [`TimerSet`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u32);

#[derive(Debug, Clone)]
struct Timer {
    id: TimerId,
    remaining: f32,
    period: Option<f32>,
}

/// Ordered collection of pending timers
#[derive(Debug, Clone, Default)]
pub struct TimerSet {
    timers: Vec<Timer>,
    next_id: u32,
}

impl TimerSet {
    /// Most firings one repeating timer reports from a single advance;
    /// further elapsed periods are skipped
    pub const MAX_FIRINGS_PER_ADVANCE: u32 = 1024;

    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire once after `after_sec` seconds
    pub fn schedule(&mut self, after_sec: f32) -> TimerId {
        self.push(after_sec, None)
    }

    /// Fire every `period_sec` seconds, first after one period
    ///
    /// Periods are clamped to a small positive minimum so a repeating timer
    /// cannot fire unboundedly within one tick.
    pub fn schedule_repeating(&mut self, period_sec: f32) -> TimerId {
        let period = period_sec.max(1e-3);
        self.push(period, Some(period))
    }

    /// Cancel a timer; unknown or already fired ids are ignored
    pub fn cancel(&mut self, id: TimerId) {
        self.timers.retain(|t| t.id != id);
    }

    /// Whether the timer is still pending
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.timers.iter().any(|t| t.id == id)
    }

    /// Number of pending timers
    pub fn len(&self) -> usize {
        self.timers.len()
    }

    /// Whether no timer is pending
    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Advance every timer by `delta_sec`
    ///
    /// Returns fired ids in schedule order. A repeating timer appears once
    /// per elapsed period, up to [`Self::MAX_FIRINGS_PER_ADVANCE`]. Non-finite
    /// deltas are ignored.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn advance(&mut self, delta_sec: f32) -> Vec<TimerId> {
        let mut fired = Vec::new();
        if !delta_sec.is_finite() {
            return fired;
        }
        for timer in &mut self.timers {
            timer.remaining -= delta_sec;
            if timer.remaining > 0.0 {
                continue;
            }
            match timer.period {
                None => fired.push(timer.id),
                Some(period) => {
                    let overdue = -f64::from(timer.remaining);
                    let period = f64::from(period);
                    let periods = (overdue / period).floor() + 1.0;
                    let count = periods.min(f64::from(Self::MAX_FIRINGS_PER_ADVANCE)) as usize;
                    fired.extend(std::iter::repeat(timer.id).take(count));
                    // Next firing stays within (0, period] of now.
                    timer.remaining = (periods.mul_add(period, -overdue) as f32).max(f32::MIN_POSITIVE);
                }
            }
        }
        self.timers.retain(|t| t.period.is_some() || t.remaining > 0.0);
        fired
    }

    fn push(&mut self, remaining: f32, period: Option<f32>) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.timers.push(Timer {
            id,
            remaining,
            period,
        });
        id
    }
}
