use std::io::{self, Write};

use ansi_term::Colour;
use anyhow::Result;
use clap::CommandFactory;
use tracing::info;

use crate::{
    prefs::Preferences,
    tracker::{
        gate::{DisableOutcome, DISABLE_LOCKOUT},
        HydrationTracker, StopFlow,
    },
};

use super::{chart::render_month, Args};

pub fn drink(tracker: &mut HydrationTracker<impl Preferences>) -> Result<()> {
    let count = tracker.increment()?;
    let goal = tracker.goal();
    println!("{count} / {goal} glasses today");
    if count >= goal {
        println!(
            "{}",
            Colour::Green.paint("Goal reached! Run `hydrawatch done` to stop today's reminders.")
        );
    }
    Ok(())
}

pub fn reset(tracker: &mut HydrationTracker<impl Preferences>) -> Result<()> {
    tracker.reset()?;
    println!("Counter reset, 0 / {} glasses today", tracker.goal());
    Ok(())
}

pub fn set_goal(tracker: &mut HydrationTracker<impl Preferences>, glasses: i64) -> Result<()> {
    if !tracker.set_goal(glasses)? {
        return Err(Args::command()
            .error(
                clap::error::ErrorKind::ValueValidation,
                format!("The daily goal must be at least 1 glass, got {glasses}"),
            )
            .into());
    }
    println!("Daily goal set to {glasses} glasses");
    Ok(())
}

pub fn status(tracker: &mut HydrationTracker<impl Preferences>) -> Result<()> {
    println!(
        "{} / {} glasses today",
        tracker.glasses_drunk(),
        tracker.goal()
    );
    if tracker.gate_state()?.is_enabled() {
        println!("{}", Colour::Green.paint("Reminders are ON for today"));
    } else {
        println!(
            "{}",
            Colour::Red.paint("Reminders are OFF for today, back on tomorrow")
        );
    }
    Ok(())
}

pub fn yesterday(tracker: &HydrationTracker<impl Preferences>) -> Result<()> {
    match tracker.yesterday() {
        Some(count) => println!("Yesterday: {count} glasses"),
        None => println!("No data for yesterday"),
    }
    Ok(())
}

pub fn month(tracker: &HydrationTracker<impl Preferences>) -> Result<()> {
    print!("{}", render_month(&tracker.history(), tracker.goal(), true));
    Ok(())
}

/// The goal-reached flow: congratulate, offer to silence reminders for the rest of the day and,
/// after the warning countdown, confirm the disable. Ctrl-C anywhere dismisses the flow and
/// keeps reminders on.
pub async fn done(tracker: &mut HydrationTracker<impl Preferences>) -> Result<()> {
    match tracker.begin_stop_flow()? {
        StopFlow::AlreadyDisabled => {
            println!("Reminders are already off for today. They come back tomorrow.");
            return Ok(());
        }
        StopFlow::Incomplete { remaining } => {
            println!(
                "Keep going! {remaining} more {} to reach your goal.",
                if remaining == 1 { "glass" } else { "glasses" }
            );
            return Ok(());
        }
        StopFlow::GoalReached => {}
    }

    println!(
        "{}",
        Colour::Green.paint("Congratulations, you've reached today's hydration goal!")
    );
    if !prompt_yes("Turn off reminders until tomorrow?")? {
        tracker.cancel_stop_flow();
        println!("We'll keep reminding you to stay hydrated.");
        return Ok(());
    }

    tracker.request_disable()?;
    println!(
        "{}",
        Colour::Red.paint("Warning: reminders will stay off until tomorrow.")
    );

    if !countdown(tracker).await? {
        return Ok(());
    }

    if !prompt_yes("Really turn off reminders for today?")? {
        tracker.cancel_stop_flow();
        println!("Reminders stay on.");
        return Ok(());
    }

    match tracker.confirm_disable()? {
        DisableOutcome::Disabled => {
            info!("Reminders disabled through the cli");
            println!("Reminders are off for today. Enjoy your accomplishment!");
        }
        DisableOutcome::Locked { remaining } => {
            // Only reachable if the prompt was answered faster than the lockout, e.g. piped input.
            println!(
                "Confirmation is locked for another {} seconds, reminders stay on.",
                remaining.num_seconds().max(1)
            );
            tracker.cancel_stop_flow();
        }
    }
    Ok(())
}

/// Counts the lockout down on one line. Returns false when the user interrupted it.
async fn countdown(tracker: &mut HydrationTracker<impl Preferences>) -> Result<bool> {
    print!("You can confirm in");
    io::stdout().flush()?;
    for remaining in (1..=DISABLE_LOCKOUT.num_seconds()).rev() {
        print!(" {remaining}...");
        io::stdout().flush()?;
        tokio::select! {
            _ = tokio::time::sleep(std::time::Duration::from_secs(1)) => (),
            _ = tokio::signal::ctrl_c() => {
                tracker.cancel_stop_flow();
                println!("\nCancelled, reminders stay on.");
                return Ok(false);
            }
        }
    }
    println!();
    Ok(true)
}

fn prompt_yes(question: &str) -> Result<bool> {
    print!("{question} [y/N]: ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(matches!(
        line.trim().to_ascii_lowercase().as_str(),
        "y" | "yes"
    ))
}
