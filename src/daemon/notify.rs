use anyhow::Result;
use tracing::info;

/// Contract for delivering a reminder to the user. The reminder loop only ever asks for one
/// notification at a time, delivery details stay behind this trait.
#[cfg_attr(test, mockall::automock)]
pub trait Notifier: Send {
    fn notify(&mut self, summary: &str, body: &str) -> Result<()>;
}

/// Desktop notifications through the platform notification service.
pub struct DesktopNotifier;

impl Notifier for DesktopNotifier {
    fn notify(&mut self, summary: &str, body: &str) -> Result<()> {
        info!("Showing notification: {summary}");
        notify_rust::Notification::new()
            .appname("hydrawatch")
            .summary(summary)
            .body(body)
            .show()?;
        Ok(())
    }
}
