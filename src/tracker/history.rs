use crate::prefs::{day_slot_key, Preferences, YESTERDAY_GLASSES};

/// Marker stored in history slots that were never written. Distinct from a recorded 0.
pub const NO_DATA: i64 = -1;

/// Number of day slots the history keeps. Day 31 reuses the last slot so the ring stays fixed.
pub const HISTORY_DAYS: u32 = 30;

/// Slot a finished day is archived into.
pub fn archive_slot(day_of_month: u32) -> u32 {
    day_of_month.min(HISTORY_DAYS)
}

/// Rolling 30-day view of archived daily totals, keyed by day of month.
pub struct MonthlyHistory {
    days: Vec<i64>,
}

impl MonthlyHistory {
    pub fn load(prefs: &impl Preferences) -> Self {
        let days = (1..=HISTORY_DAYS)
            .map(|day| prefs.get_int(&day_slot_key(day), NO_DATA))
            .collect();
        Self { days }
    }

    /// Recorded total for a day of month in `1..=30`, or `None` for "no data".
    pub fn day(&self, day_of_month: u32) -> Option<i64> {
        let value = self.days[day_of_month as usize - 1];
        (value != NO_DATA).then_some(value)
    }

    pub fn iter_days(&self) -> impl Iterator<Item = (u32, Option<i64>)> + '_ {
        (1..=HISTORY_DAYS).map(|day| (day, self.day(day)))
    }

    /// Average over days that have a recorded value. `None` when nothing was recorded yet.
    pub fn average(&self) -> Option<f64> {
        let recorded: Vec<i64> = self.days.iter().copied().filter(|v| *v != NO_DATA).collect();
        if recorded.is_empty() {
            return None;
        }
        Some(recorded.iter().sum::<i64>() as f64 / recorded.len() as f64)
    }
}

/// Yesterday's archived total, or `None` when there is no data yet.
pub fn yesterday_glasses(prefs: &impl Preferences) -> Option<i64> {
    let value = prefs.get_int(YESTERDAY_GLASSES, NO_DATA);
    (value != NO_DATA).then_some(value)
}

#[cfg(test)]
mod tests {
    use anyhow::Result;

    use crate::prefs::{day_slot_key, memory::MemoryPreferences, Preferences, YESTERDAY_GLASSES};

    use super::{archive_slot, yesterday_glasses, MonthlyHistory};

    #[test]
    fn test_missing_slot_is_no_data_and_distinct_from_zero() -> Result<()> {
        let mut prefs = MemoryPreferences::default();
        prefs.set_int(&day_slot_key(2), 0)?;
        prefs.set_int(&day_slot_key(3), 7)?;

        let history = MonthlyHistory::load(&prefs);
        assert_eq!(history.day(1), None);
        assert_eq!(history.day(2), Some(0));
        assert_eq!(history.day(3), Some(7));
        Ok(())
    }

    #[test]
    fn test_average_ignores_empty_slots() -> Result<()> {
        let mut prefs = MemoryPreferences::default();
        assert_eq!(MonthlyHistory::load(&prefs).average(), None);

        prefs.set_int(&day_slot_key(1), 4)?;
        prefs.set_int(&day_slot_key(2), 0)?;
        prefs.set_int(&day_slot_key(10), 8)?;

        let average = MonthlyHistory::load(&prefs).average().unwrap();
        assert!((average - 4.0).abs() < f64::EPSILON);
        Ok(())
    }

    #[test]
    fn test_day_31_lands_in_the_last_slot() {
        assert_eq!(archive_slot(1), 1);
        assert_eq!(archive_slot(30), 30);
        assert_eq!(archive_slot(31), 30);
    }

    #[test]
    fn test_yesterday_defaults_to_no_data() -> Result<()> {
        let mut prefs = MemoryPreferences::default();
        assert_eq!(yesterday_glasses(&prefs), None);

        prefs.set_int(YESTERDAY_GLASSES, 0)?;
        assert_eq!(yesterday_glasses(&prefs), Some(0));
        Ok(())
    }
}
