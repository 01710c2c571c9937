// Plain-text odds table.

use std::fmt;

use draftodds_core::{LotteryEntry, ProbabilityMatrix};

const NAME_WIDTH: usize = 20;
const PICK_WIDTH: usize = 7;

/// Fixed-width odds table, one row per lottery entry.
///
/// Cells are percentages with one decimal; picks an entry can never land are
/// left blank.
pub struct OddsTable<'a> {
    pub title: &'a str,
    pub entries: &'a [LotteryEntry],
    pub matrix: &'a ProbabilityMatrix,
    pub total_chances: u32,
}

impl fmt::Display for OddsTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{}: {} teams, {} tickets",
            self.title,
            self.entries.len(),
            self.total_chances
        )?;

        write!(f, "{:<NAME_WIDTH$} {:>8} {:>7}", "Team", "Record", "Chances")?;
        for pick in 1..=self.matrix.len() {
            write!(f, " {:>PICK_WIDTH$}", format!("#{pick}"))?;
        }
        writeln!(f)?;

        for (i, entry) in self.entries.iter().enumerate() {
            write!(
                f,
                "{:<NAME_WIDTH$} {:>8} {:>7}",
                team_label(entry),
                entry.record.to_string(),
                entry.chances
            )?;
            for pick in 0..self.matrix.len() {
                match self.matrix.percent(i, pick) {
                    Some(pct) => write!(f, " {pct:>PICK_WIDTH$.1}")?,
                    None => write!(f, " {:>PICK_WIDTH$}", "")?,
                }
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

/// Render the odds table to a string.
pub fn format_odds_table(
    title: &str,
    entries: &[LotteryEntry],
    matrix: &ProbabilityMatrix,
    total_chances: u32,
) -> String {
    OddsTable {
        title,
        entries,
        matrix,
        total_chances,
    }
    .to_string()
}

/// Team name, marking picks held by another team and clipped to the column.
fn team_label(entry: &LotteryEntry) -> String {
    let label = if entry.is_traded() {
        format!("{} (to {})", entry.name, entry.tid)
    } else {
        entry.name.clone()
    };
    label.chars().take(NAME_WIDTH).collect()
}
