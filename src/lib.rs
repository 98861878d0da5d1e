//! Simple to use cli/daemon for tracking daily water intake.
//! The cli records glasses drunk against a daily goal and keeps a rolling 30-day history, the
//! daemon nudges with a desktop notification every hour between 07:00 and midnight until the
//! goal is reached.
//!

pub mod cli;
pub mod daemon;
pub mod prefs;
pub mod tracker;
pub mod utils;
