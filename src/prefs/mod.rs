//! Key-value persistence for the tracker.
//!  The basic idea is:
//!   - Every piece of tracker state is an independently meaningful key.
//!   - Writes are synchronous and go to a single locked JSON file.
//!   - Consumers receive the store through the [Preferences] trait, never through a global.

pub mod file;

use anyhow::Result;

pub const GLASSES_DRUNK: &str = "glasses_drunk";
pub const LAST_DATE: &str = "last_date";
pub const GOAL: &str = "goal";
pub const NOTIFICATIONS_ENABLED: &str = "notifications_enabled";
pub const NOTIFICATIONS_DISABLED_DATE: &str = "notifications_disabled_date";
pub const YESTERDAY_GLASSES: &str = "yesterday_glasses";

/// Key of the monthly history slot for a day of month in `1..=30`.
pub fn day_slot_key(day: u32) -> String {
    format!("day_{day}_glasses")
}

/// Interface for abstracting storage of tracker state.
///
/// Reads take a default instead of returning an error so that a fresh store behaves like the
/// documented initial state. Writes persist immediately.
pub trait Preferences {
    fn get_int(&self, key: &str, default: i64) -> i64;

    fn set_int(&mut self, key: &str, value: i64) -> Result<()>;

    fn get_string(&self, key: &str) -> Option<String>;

    fn set_string(&mut self, key: &str, value: &str) -> Result<()>;

    fn get_bool(&self, key: &str, default: bool) -> bool;

    fn set_bool(&mut self, key: &str, value: bool) -> Result<()>;
}

#[cfg(test)]
pub(crate) mod memory {
    use std::collections::BTreeMap;

    use anyhow::Result;
    use serde_json::Value;

    use super::Preferences;

    /// In-memory store for tests.
    #[derive(Default)]
    pub struct MemoryPreferences {
        values: BTreeMap<String, Value>,
    }

    impl Preferences for MemoryPreferences {
        fn get_int(&self, key: &str, default: i64) -> i64 {
            self.values
                .get(key)
                .and_then(Value::as_i64)
                .unwrap_or(default)
        }

        fn set_int(&mut self, key: &str, value: i64) -> Result<()> {
            self.values.insert(key.to_string(), value.into());
            Ok(())
        }

        fn get_string(&self, key: &str) -> Option<String> {
            self.values
                .get(key)
                .and_then(Value::as_str)
                .map(str::to_string)
        }

        fn set_string(&mut self, key: &str, value: &str) -> Result<()> {
            self.values.insert(key.to_string(), value.into());
            Ok(())
        }

        fn get_bool(&self, key: &str, default: bool) -> bool {
            self.values
                .get(key)
                .and_then(Value::as_bool)
                .unwrap_or(default)
        }

        fn set_bool(&mut self, key: &str, value: bool) -> Result<()> {
            self.values.insert(key.to_string(), value.into());
            Ok(())
        }
    }
}
