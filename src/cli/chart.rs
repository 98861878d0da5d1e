use ansi_term::Colour;

use crate::tracker::history::MonthlyHistory;

/// Bars longer than this get clipped so the chart survives narrow terminals.
const MAX_BAR_GLASSES: i64 = 40;

/// Renders the 30-day history as one row per day. "No data" renders as a dash, distinct from a
/// recorded zero which gets an empty bar with its count.
pub fn render_month(history: &MonthlyHistory, goal: i64, colored: bool) -> String {
    let mut out = String::new();
    out.push_str(&format!("Monthly intake (goal: {goal} glasses)\n"));

    for (day, value) in history.iter_days() {
        let line = match value {
            Some(count) => {
                let bar = "█".repeat(count.clamp(0, MAX_BAR_GLASSES) as usize);
                let bar = if colored && count >= goal {
                    Colour::Green.paint(bar).to_string()
                } else if colored {
                    Colour::Blue.paint(bar).to_string()
                } else {
                    bar
                };
                format!("{day:>2} │ {bar} {count}\n")
            }
            None => format!("{day:>2} │ -\n"),
        };
        out.push_str(&line);
    }

    match history.average() {
        Some(average) => out.push_str(&format!("Average over recorded days: {average:.1}\n")),
        None => out.push_str("No recorded days yet\n"),
    }
    out
}
