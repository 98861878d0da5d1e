use anyhow::Result;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::{
    prefs::Preferences,
    tracker::HydrationTracker,
    utils::{clock::Clock, time::next_hour_start},
};

use super::notify::Notifier;

const REMINDER_SUMMARY: &str = "Hydrawatch";
const REMINDER_BODY: &str = "Hydration break: drink a glass of water now!";

/// Drives the hourly reminder. Wakes at every top of the hour, asks the tracker whether a
/// reminder is due and hands it to the notifier. The decision (gate state, time window, day
/// rollover) lives entirely in the tracker, this loop only schedules.
pub struct ReminderModule<P: Preferences> {
    tracker: HydrationTracker<P>,
    notifier: Box<dyn Notifier>,
    shutdown: CancellationToken,
    clock: Box<dyn Clock>,
}

impl<P: Preferences> ReminderModule<P> {
    pub fn new(
        tracker: HydrationTracker<P>,
        notifier: Box<dyn Notifier>,
        shutdown: CancellationToken,
        clock: Box<dyn Clock>,
    ) -> Self {
        Self {
            tracker,
            notifier,
            shutdown,
            clock,
        }
    }

    fn tick(&mut self) -> Result<()> {
        if self.tracker.on_hourly_tick()? {
            self.notifier.notify(REMINDER_SUMMARY, REMINDER_BODY)?;
            info!("Reminder sent");
        } else {
            debug!("Reminder suppressed");
        }
        Ok(())
    }

    /// Executes the reminder event loop.
    pub async fn run(mut self) -> Result<()> {
        loop {
            let now = self.clock.local_now();
            let wait = (next_hour_start(now) - now)
                .to_std()
                .unwrap_or(std::time::Duration::ZERO);
            let wake_point = self.clock.instant() + wait;

            tokio::select! {
                // Cancelation means we stop execution of the event loop.
                _ = self.shutdown.cancelled() => {
                    return Ok(())
                }
                _ = self.clock.sleep_until(wake_point) => ()
            }

            if let Err(e) = self.tick() {
                // A failed delivery shouldn't kill the loop, the next hour gets another chance.
                error!("Encountered an error during the reminder tick {:?}", e);
            }
        }
    }
}
