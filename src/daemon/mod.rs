use std::path::PathBuf;

use anyhow::Result;
use notify::{DesktopNotifier, Notifier};
use reminder::ReminderModule;
use tokio_util::sync::CancellationToken;
use tracing::error;

use crate::{
    prefs::{file::FilePreferences, Preferences},
    tracker::HydrationTracker,
    utils::clock::{Clock, DefaultClock},
};

pub mod args;
pub mod notify;
pub mod reminder;
pub mod shutdown;

/// Represents the starting point for the daemon
pub async fn start_daemon(dir: PathBuf) -> Result<()> {
    std::env::set_current_dir("/")?;

    let prefs = FilePreferences::open(&dir)?;

    let shutdown_token = CancellationToken::new();

    let reminder = create_reminder(
        prefs,
        Box::new(DesktopNotifier),
        &shutdown_token,
        DefaultClock,
    );

    let (_, reminder_result) = tokio::join!(
        shutdown::detect_shutdown(shutdown_token.clone()),
        reminder.run(),
    );

    if let Err(reminder_result) = reminder_result {
        error!("Reminder module got an error {:?}", reminder_result);
    }

    Ok(())
}

fn create_reminder<P: Preferences>(
    prefs: P,
    notifier: Box<dyn Notifier>,
    shutdown_token: &CancellationToken,
    clock: impl Clock + Clone,
) -> ReminderModule<P> {
    let tracker = HydrationTracker::new(prefs, Box::new(clock.clone()));
    ReminderModule::new(tracker, notifier, shutdown_token.clone(), Box::new(clock))
}
