use anyhow::{bail, Result};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use tracing::{debug, info};

use crate::{
    prefs::{Preferences, NOTIFICATIONS_DISABLED_DATE, NOTIFICATIONS_ENABLED},
    utils::time::date_key,
};

/// How long the destructive confirmation stays locked after the warning is shown.
pub const DISABLE_LOCKOUT: Duration = Duration::seconds(5);

/// Per-day on/off switch for the hourly reminders, plus the opt-out confirmation flow.
///
/// Only the on/off side is persisted (`notifications_enabled` and the date it was disabled on).
/// The confirmation steps live in memory and evaporate with the process, which matches the
/// dialog-driven flow: dismissing it is cancelling it.
pub struct NotificationGate {
    state: GateState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    Enabled,
    /// Goal reached, asking whether to silence reminders for the rest of the day.
    PendingConfirm,
    /// Destructive confirmation shown. The confirm action is rejected until `unlock_at`.
    Warning { unlock_at: NaiveDateTime },
    DisabledToday,
}

impl GateState {
    pub fn is_enabled(&self) -> bool {
        !matches!(self, GateState::DisabledToday)
    }
}

/// Result of attempting the final disable confirmation.
#[derive(Debug, PartialEq, Eq)]
pub enum DisableOutcome {
    Disabled,
    /// Lockout still running, nothing changed.
    Locked { remaining: Duration },
}

impl Default for NotificationGate {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationGate {
    pub fn new() -> Self {
        Self {
            state: GateState::Enabled,
        }
    }

    /// Synchronizes the gate with the persisted switch. This is the only place that compares
    /// `notifications_disabled_date` against today: a matching date keeps the gate off, anything
    /// else (including yesterday) flips the stored switch back on.
    pub fn observe(&mut self, prefs: &mut impl Preferences, today: NaiveDate) -> Result<GateState> {
        let enabled = prefs.get_bool(NOTIFICATIONS_ENABLED, true);
        let disabled_today = prefs
            .get_string(NOTIFICATIONS_DISABLED_DATE)
            .is_some_and(|date| date == date_key(today));

        if !enabled && disabled_today {
            self.state = GateState::DisabledToday;
        } else {
            if !enabled {
                info!("New day, re-enabling reminders");
                prefs.set_bool(NOTIFICATIONS_ENABLED, true)?;
            }
            if self.state == GateState::DisabledToday {
                self.state = GateState::Enabled;
            }
            // Pending dialog steps survive observation within the same day.
        }
        Ok(self.state)
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    /// Enabled -> PendingConfirm. The caller is responsible for checking the goal first.
    pub fn begin_confirm(&mut self) -> Result<()> {
        match self.state {
            GateState::Enabled => {
                self.state = GateState::PendingConfirm;
                Ok(())
            }
            state => bail!("Can't start the disable flow from {state:?}"),
        }
    }

    /// PendingConfirm -> Warning, arming the lockout from `now`.
    pub fn request_disable(&mut self, now: NaiveDateTime) -> Result<()> {
        match self.state {
            GateState::PendingConfirm => {
                self.state = GateState::Warning {
                    unlock_at: now + DISABLE_LOCKOUT,
                };
                Ok(())
            }
            state => bail!("Can't request disabling from {state:?}"),
        }
    }

    /// Warning -> DisabledToday, once the lockout has elapsed. An early confirmation is rejected
    /// and leaves the warning in place.
    pub fn confirm_disable(
        &mut self,
        prefs: &mut impl Preferences,
        now: NaiveDateTime,
        today: NaiveDate,
    ) -> Result<DisableOutcome> {
        match self.state {
            GateState::Warning { unlock_at } if now < unlock_at => {
                debug!("Disable confirmation rejected, lockout has not elapsed");
                Ok(DisableOutcome::Locked {
                    remaining: unlock_at - now,
                })
            }
            GateState::Warning { .. } => {
                prefs.set_bool(NOTIFICATIONS_ENABLED, false)?;
                prefs.set_string(NOTIFICATIONS_DISABLED_DATE, &date_key(today))?;
                self.state = GateState::DisabledToday;
                info!("Reminders disabled until tomorrow");
                Ok(DisableOutcome::Disabled)
            }
            state => bail!("Can't confirm disabling from {state:?}"),
        }
    }

    /// Backs out of the confirmation flow. Does not touch a persisted disable.
    pub fn cancel(&mut self) {
        if matches!(
            self.state,
            GateState::PendingConfirm | GateState::Warning { .. }
        ) {
            self.state = GateState::Enabled;
        }
    }
}
