// Lottery order and ticket assignment.
//
// Teams enter the lottery worst record first and take tickets from a chance
// table by slot. Teams with identical records share the tickets of the slots
// they occupy.

use std::cmp::Ordering;

use tracing::{debug, warn};

use crate::entry::LotteryEntry;
use crate::error::{LotteryError, LotteryResult};

/// Standard 14-team chance table, worst team first. Sums to 1000.
pub const DEFAULT_CHANCES: [u32; 14] = [250, 199, 156, 119, 88, 63, 43, 28, 17, 11, 8, 7, 6, 5];

/// Sort entries into lottery order: worst winning percentage first.
///
/// Identical records keep a deterministic order by `original_tid`.
pub fn lottery_order(entries: &mut [LotteryEntry]) {
    entries.sort_by(|a, b| {
        a.record
            .cmp_win_pct(&b.record)
            .then_with(|| a.original_tid.cmp(&b.original_tid))
    });
}

/// Assign tickets from `table` to entries already in lottery order.
///
/// Returns the number of tickets handed out, which is the pool size to pass
/// to the odds engine. A table longer than the entry list is truncated.
pub fn assign_chances(
    entries: &mut [LotteryEntry],
    table: &[u32],
    split_ties: bool,
) -> LotteryResult<u32> {
    if table.len() < entries.len() {
        return Err(LotteryError::invalid(format!(
            "chance table has {} slots for {} teams",
            table.len(),
            entries.len()
        )));
    }
    if table.len() > entries.len() {
        warn!(
            "chance table has {} slots, using the first {}",
            table.len(),
            entries.len()
        );
    }

    for (entry, &chances) in entries.iter_mut().zip(table) {
        entry.chances = chances;
    }

    if split_ties {
        for run in tied_runs(entries) {
            split_run(&mut entries[run.0..run.1]);
        }
    }

    Ok(entries.iter().map(|e| e.chances).sum())
}

/// Half-open index ranges of consecutive entries with identical records.
fn tied_runs(entries: &[LotteryEntry]) -> Vec<(usize, usize)> {
    let mut runs = Vec::new();
    let mut start = 0;
    for i in 1..=entries.len() {
        let run_ends = i == entries.len()
            || entries[i].record.cmp_win_pct(&entries[start].record) != Ordering::Equal;
        if run_ends {
            if i - start > 1 {
                runs.push((start, i));
            }
            start = i;
        }
    }
    runs
}

/// Share a run's tickets evenly, earliest entries taking the remainder.
fn split_run(run: &mut [LotteryEntry]) {
    let total: u32 = run.iter().map(|e| e.chances).sum();
    let len = run.len() as u32;
    let (base, extra) = (total / len, total % len);
    for (i, entry) in run.iter_mut().enumerate() {
        entry.chances = base + u32::from((i as u32) < extra);
    }
    debug!(teams = run.len(), total, "split tickets among tied teams");
}
