pub mod chart;
pub mod commands;
pub mod daemon_path;
pub mod process;

use std::{env, path::PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::level_filters::LevelFilter;

use crate::{
    daemon::start_daemon,
    prefs::file::FilePreferences,
    tracker::HydrationTracker,
    utils::{
        clock::DefaultClock,
        dir::create_application_default_path,
        logging::{enable_logging, CLI_PREFIX},
    },
};

#[derive(Parser, Debug)]
#[command(name = "Hydrawatch", version, long_about = None)]
#[command(about = "Daily water-glass tracker with hourly desktop reminders", long_about = None)]
pub(crate) struct Args {
    #[command(subcommand)]
    commands: Commands,
    #[arg(long, help = "Enable logging")]
    log: bool,
}

#[derive(Subcommand, Debug)]
#[command(version, about, long_about = None)]
enum Commands {
    #[command(about = "Record one glass of water drunk")]
    Drink,
    #[command(about = "Reset today's counter to zero")]
    Reset,
    #[command(about = "Set the daily goal in glasses")]
    Goal {
        #[arg(allow_negative_numbers = true)]
        glasses: i64,
    },
    #[command(about = "Show today's tally, goal and reminder status")]
    Status,
    #[command(about = "Show yesterday's intake")]
    Yesterday,
    #[command(about = "Show the 30-day intake chart")]
    Month,
    #[command(
        about = "Declare today's goal reached and optionally turn reminders off until tomorrow"
    )]
    Done,
    #[command(about = "Starts the reminder daemon for the application")]
    Init {
        #[arg(
            long,
            help = "Application directory. By default tries to save into $XDG_STATE_HOME or $HOME/.local/state"
        )]
        dir: Option<PathBuf>,
    },
    #[command(
        about = "Run the daemon directly in the current console. Used for creating a daemon internally and for debugging"
    )]
    Serve {
        #[arg(
            long,
            help = "Application directory. By default tries to save into $XDG_STATE_HOME or $HOME/.local/state"
        )]
        dir: Option<PathBuf>,
    },
    #[command(about = "Stop currently running daemon.")]
    Stop {},
}

pub async fn run_cli() -> Result<()> {
    let args = Args::parse();

    let app_dir = create_application_default_path()?;
    let logging_level = if args.log {
        Some(LevelFilter::TRACE)
    } else {
        None
    };
    enable_logging(CLI_PREFIX, &app_dir, logging_level, args.log)?;

    match args.commands {
        Commands::Init { dir } => {
            process::restart_daemon(dir)?;
            Ok(())
        }
        Commands::Stop {} => {
            let daemon = daemon_path::to_daemon_path(env::current_exe()?);
            process::kill_previous_daemons(&daemon);
            Ok(())
        }
        Commands::Serve { dir } => {
            start_daemon(dir.unwrap_or(app_dir)).await?;
            Ok(())
        }
        command => {
            let prefs = FilePreferences::open(&app_dir)?;
            let mut tracker = HydrationTracker::new(prefs, Box::new(DefaultClock));
            // Every screen-open archives and zeroes exactly once on a new day.
            tracker.rollover()?;

            match command {
                Commands::Drink => commands::drink(&mut tracker),
                Commands::Reset => commands::reset(&mut tracker),
                Commands::Goal { glasses } => commands::set_goal(&mut tracker, glasses),
                Commands::Status => commands::status(&mut tracker),
                Commands::Yesterday => commands::yesterday(&tracker),
                Commands::Month => commands::month(&tracker),
                Commands::Done => commands::done(&mut tracker).await,
                Commands::Init { .. } | Commands::Serve { .. } | Commands::Stop {} => {
                    unreachable!()
                }
            }
        }
    }
}
