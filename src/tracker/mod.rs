//! The tracker owns everything the presentation layer binds to: today's glass counter, the daily
//! goal, the rolling monthly history and the notification gate. It holds no timers and no global
//! state. Dates come from an injected [Clock], persistence goes through an injected
//! [Preferences] store.

pub mod gate;
pub mod history;

use anyhow::Result;
use chrono::{Datelike, NaiveDate, Timelike};
use tracing::{debug, info};

use crate::{
    prefs::{Preferences, GLASSES_DRUNK, GOAL, LAST_DATE, YESTERDAY_GLASSES},
    utils::{
        clock::Clock,
        time::{date_key, in_reminder_window, parse_date_key},
    },
};

use gate::{DisableOutcome, GateState, NotificationGate};
use history::{archive_slot, MonthlyHistory};

pub const DEFAULT_GOAL: i64 = 10;

/// Outcome of the user declaring the daily goal reached.
#[derive(Debug, PartialEq, Eq)]
pub enum StopFlow {
    /// Goal met, the disable confirmation is now pending.
    GoalReached,
    /// Short of the goal, nothing changes.
    Incomplete { remaining: i64 },
    /// Reminders are already off for today.
    AlreadyDisabled,
}

pub struct HydrationTracker<P: Preferences> {
    prefs: P,
    clock: Box<dyn Clock>,
    gate: NotificationGate,
}

impl<P: Preferences> HydrationTracker<P> {
    pub fn new(prefs: P, clock: Box<dyn Clock>) -> Self {
        Self {
            prefs,
            clock,
            gate: NotificationGate::new(),
        }
    }

    fn today(&self) -> NaiveDate {
        self.clock.local_now().date()
    }

    /// Daily reset-and-archive. On the first observation of a new day the previous count moves
    /// into its day-of-month history slot (and `yesterday_glasses`) and the counter zeroes.
    /// Calling it again on the same day is a no-op.
    pub fn rollover(&mut self) -> Result<()> {
        let today = date_key(self.today());
        let last = self.prefs.get_string(LAST_DATE);

        if last.as_deref() == Some(today.as_str()) {
            return Ok(());
        }

        if let Some(last_date) = last.as_deref().and_then(parse_date_key) {
            let count = self.prefs.get_int(GLASSES_DRUNK, 0);
            let slot = archive_slot(last_date.day());
            info!("New day, archiving {count} glasses into slot {slot}");
            self.prefs.set_int(&crate::prefs::day_slot_key(slot), count)?;
            self.prefs.set_int(YESTERDAY_GLASSES, count)?;
        }

        self.prefs.set_int(GLASSES_DRUNK, 0)?;
        self.prefs.set_string(LAST_DATE, &today)?;
        Ok(())
    }

    pub fn glasses_drunk(&self) -> i64 {
        self.prefs.get_int(GLASSES_DRUNK, 0)
    }

    pub fn goal(&self) -> i64 {
        self.prefs.get_int(GOAL, DEFAULT_GOAL)
    }

    pub fn increment(&mut self) -> Result<i64> {
        let count = self.glasses_drunk() + 1;
        self.prefs.set_int(GLASSES_DRUNK, count)?;
        debug!("Glasses drunk today: {count}");
        Ok(count)
    }

    pub fn reset(&mut self) -> Result<()> {
        self.prefs.set_int(GLASSES_DRUNK, 0)
    }

    /// Updates the goal. Non-positive values are rejected and leave the stored goal untouched;
    /// returns whether the value was accepted.
    pub fn set_goal(&mut self, glasses: i64) -> Result<bool> {
        if glasses < 1 {
            debug!("Rejecting goal {glasses}");
            return Ok(false);
        }
        self.prefs.set_int(GOAL, glasses)?;
        Ok(true)
    }

    pub fn yesterday(&self) -> Option<i64> {
        history::yesterday_glasses(&self.prefs)
    }

    pub fn history(&self) -> MonthlyHistory {
        MonthlyHistory::load(&self.prefs)
    }

    /// Current gate state, after syncing with the persisted switch.
    pub fn gate_state(&mut self) -> Result<GateState> {
        let today = self.today();
        self.gate.observe(&mut self.prefs, today)
    }

    /// The user declares the goal reached and asks to stop reminders for the day.
    pub fn begin_stop_flow(&mut self) -> Result<StopFlow> {
        if !self.gate_state()?.is_enabled() {
            return Ok(StopFlow::AlreadyDisabled);
        }
        let remaining = self.goal() - self.glasses_drunk();
        if remaining > 0 {
            return Ok(StopFlow::Incomplete { remaining });
        }
        self.gate.begin_confirm()?;
        Ok(StopFlow::GoalReached)
    }

    /// The user opts into disabling; arms the confirmation lockout.
    pub fn request_disable(&mut self) -> Result<()> {
        self.gate.request_disable(self.clock.local_now())
    }

    /// Final confirmation. Rejected with [DisableOutcome::Locked] until the lockout elapses.
    pub fn confirm_disable(&mut self) -> Result<DisableOutcome> {
        let now = self.clock.local_now();
        self.gate.confirm_disable(&mut self.prefs, now, now.date())
    }

    /// Dismisses the confirmation flow, keeping reminders on.
    pub fn cancel_stop_flow(&mut self) {
        self.gate.cancel()
    }

    /// Hourly scheduler entry point. Returns whether a reminder should fire right now. Outside
    /// the 07:00-23:59 window or with the gate off this is a silent no-op, never an error.
    pub fn on_hourly_tick(&mut self) -> Result<bool> {
        self.rollover()?;
        let now = self.clock.local_now();
        if !in_reminder_window(now.hour()) {
            debug!("Tick at {now} outside the reminder window");
            return Ok(false);
        }
        Ok(self.gate_state()? == GateState::Enabled)
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

    use crate::{
        prefs::{memory::MemoryPreferences, Preferences, GLASSES_DRUNK, LAST_DATE},
        tracker::gate::{DisableOutcome, GateState},
        utils::clock::test_clock::ManualClock,
    };

    use super::{HydrationTracker, StopFlow};

    fn at(y: i32, m: u32, d: u32, hour: u32) -> NaiveDateTime {
        NaiveDateTime::new(
            NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            NaiveTime::from_hms_opt(hour, 0, 0).unwrap(),
        )
    }

    fn tracker_at(start: NaiveDateTime) -> (HydrationTracker<MemoryPreferences>, ManualClock) {
        let clock = ManualClock::new(start);
        let tracker = HydrationTracker::new(MemoryPreferences::default(), Box::new(clock.clone()));
        (tracker, clock)
    }

    #[test]
    fn test_increments_accumulate_within_a_day() -> Result<()> {
        let (mut tracker, _) = tracker_at(at(2024, 1, 1, 9));
        tracker.rollover()?;

        for expected in 1..=5 {
            assert_eq!(tracker.increment()?, expected);
        }
        assert_eq!(tracker.glasses_drunk(), 5);

        tracker.reset()?;
        assert_eq!(tracker.glasses_drunk(), 0);
        Ok(())
    }

    #[test]
    fn test_rollover_is_idempotent_within_a_day() -> Result<()> {
        let (mut tracker, clock) = tracker_at(at(2024, 1, 1, 9));
        tracker.rollover()?;
        tracker.increment()?;
        tracker.increment()?;

        clock.advance(Duration::hours(2));
        tracker.rollover()?;
        tracker.rollover()?;

        assert_eq!(tracker.glasses_drunk(), 2);
        assert_eq!(tracker.yesterday(), None);
        Ok(())
    }

    #[test]
    fn test_rollover_archives_previous_day() -> Result<()> {
        let (mut tracker, clock) = tracker_at(at(2024, 1, 15, 9));
        tracker.rollover()?;
        for _ in 0..6 {
            tracker.increment()?;
        }

        clock.advance(Duration::days(1));
        tracker.rollover()?;

        assert_eq!(tracker.glasses_drunk(), 0);
        assert_eq!(tracker.yesterday(), Some(6));
        assert_eq!(tracker.history().day(15), Some(6));
        Ok(())
    }

    #[test]
    fn test_first_run_does_not_archive() -> Result<()> {
        let (mut tracker, _) = tracker_at(at(2024, 1, 15, 9));
        tracker.rollover()?;

        assert_eq!(tracker.yesterday(), None);
        assert!(tracker.history().iter_days().all(|(_, v)| v.is_none()));
        Ok(())
    }

    #[test]
    fn test_day_31_archives_into_slot_30() -> Result<()> {
        let clock = ManualClock::new(at(2024, 1, 31, 9));
        let mut prefs = MemoryPreferences::default();
        prefs.set_string(LAST_DATE, "20240131")?;
        prefs.set_int(GLASSES_DRUNK, 3)?;
        let mut tracker = HydrationTracker::new(prefs, Box::new(clock.clone()));

        clock.advance(Duration::days(1));
        tracker.rollover()?;

        assert_eq!(tracker.history().day(30), Some(3));
        Ok(())
    }

    #[test]
    fn test_goal_validation() -> Result<()> {
        let (mut tracker, _) = tracker_at(at(2024, 1, 1, 9));

        assert!(!tracker.set_goal(0)?);
        assert!(!tracker.set_goal(-5)?);
        assert_eq!(tracker.goal(), 10);

        assert!(tracker.set_goal(12)?);
        assert_eq!(tracker.goal(), 12);
        Ok(())
    }

    #[test]
    fn test_stop_flow_short_of_goal_keeps_gate_enabled() -> Result<()> {
        let (mut tracker, _) = tracker_at(at(2024, 1, 1, 9));
        tracker.rollover()?;
        tracker.increment()?;

        assert_eq!(
            tracker.begin_stop_flow()?,
            StopFlow::Incomplete { remaining: 9 }
        );
        assert_eq!(tracker.gate_state()?, GateState::Enabled);
        Ok(())
    }

    #[test]
    fn test_full_disable_scenario_and_next_day_reset() -> Result<()> {
        let (mut tracker, clock) = tracker_at(at(2024, 1, 1, 9));
        tracker.rollover()?;
        tracker.set_goal(10)?;
        for _ in 0..10 {
            tracker.increment()?;
        }

        assert_eq!(tracker.begin_stop_flow()?, StopFlow::GoalReached);
        tracker.request_disable()?;

        clock.advance(Duration::seconds(3));
        assert!(matches!(
            tracker.confirm_disable()?,
            DisableOutcome::Locked { .. }
        ));

        clock.advance(Duration::seconds(2));
        assert_eq!(tracker.confirm_disable()?, DisableOutcome::Disabled);
        assert_eq!(tracker.gate_state()?, GateState::DisabledToday);
        assert_eq!(tracker.begin_stop_flow()?, StopFlow::AlreadyDisabled);

        // First read on the next day re-enables automatically.
        clock.advance(Duration::days(1));
        assert_eq!(tracker.gate_state()?, GateState::Enabled);
        Ok(())
    }

    #[test]
    fn test_hourly_tick_respects_window_and_gate() -> Result<()> {
        let (mut tracker, clock) = tracker_at(at(2024, 1, 1, 6));
        assert!(!tracker.on_hourly_tick()?);

        clock.advance(Duration::hours(1));
        assert!(tracker.on_hourly_tick()?);

        // Disable for today and the same hour goes quiet.
        tracker.set_goal(1)?;
        tracker.increment()?;
        tracker.begin_stop_flow()?;
        tracker.request_disable()?;
        clock.advance(Duration::seconds(5));
        tracker.confirm_disable()?;
        assert!(!tracker.on_hourly_tick()?);

        // Next day the tick fires again, and the rollover inside it archived the counter.
        clock.advance(Duration::days(1));
        assert!(tracker.on_hourly_tick()?);
        assert_eq!(tracker.glasses_drunk(), 0);
        assert_eq!(tracker.history().day(1), Some(1));
        Ok(())
    }

    #[test]
    fn test_tick_after_23_is_silent() -> Result<()> {
        let clock = ManualClock::new(NaiveDateTime::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveTime::from_hms_opt(0, 0, 0).unwrap(),
        ));
        let mut tracker =
            HydrationTracker::new(MemoryPreferences::default(), Box::new(clock.clone()));

        assert!(!tracker.on_hourly_tick()?);
        assert_eq!(tracker.history().day(1), None);
        Ok(())
    }
}
