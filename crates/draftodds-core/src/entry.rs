// Lottery entries and the team records that place them in lottery order.

use std::cmp::Ordering;
use std::fmt;

// ---------------------------------------------------------------------------
// Record
// ---------------------------------------------------------------------------

/// A team's season record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Record {
    pub won: u32,
    pub lost: u32,
    pub tied: u32,
}

impl Record {
    pub fn new(won: u32, lost: u32, tied: u32) -> Self {
        Record { won, lost, tied }
    }

    /// Games played. Widened so any three `u32` counts add without overflow.
    pub fn games(&self) -> u64 {
        u64::from(self.won) + u64::from(self.lost) + u64::from(self.tied)
    }

    /// Winning percentage, counting a tie as half a win. Zero games is 0.0.
    pub fn win_pct(&self) -> f64 {
        let games = self.games();
        if games == 0 {
            return 0.0;
        }
        (f64::from(self.won) + f64::from(self.tied) / 2.0) / games as f64
    }

    /// Compare winning percentages exactly.
    ///
    /// Cross-multiplies the doubled win counts so that records such as 41-41
    /// and 40-40-2 compare equal without floating point rounding.
    pub fn cmp_win_pct(&self, other: &Record) -> Ordering {
        // Products of two widened counts can exceed u64, so compare in u128.
        let half_wins = |r: &Record| u128::from(r.won) * 2 + u128::from(r.tied);
        let (a_games, b_games) = (u128::from(self.games()), u128::from(other.games()));
        match (a_games, b_games) {
            (0, 0) => Ordering::Equal,
            (0, _) => 0u128.cmp(&half_wins(other)),
            (_, 0) => half_wins(self).cmp(&0),
            _ => (half_wins(self) * b_games).cmp(&(half_wins(other) * a_games)),
        }
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.tied > 0 {
            write!(f, "{}-{}-{}", self.won, self.lost, self.tied)
        } else {
            write!(f, "{}-{}", self.won, self.lost)
        }
    }
}

// ---------------------------------------------------------------------------
// LotteryEntry
// ---------------------------------------------------------------------------

/// One team's stake in the draft lottery.
///
/// Only `chances` feeds the probability math; the identity fields ride along
/// so callers can label the resulting rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LotteryEntry {
    /// Team that currently owns the pick.
    pub tid: u32,
    /// Team whose record placed the pick in the lottery.
    pub original_tid: u32,
    pub name: String,
    pub record: Record,
    /// Tickets held out of the lottery pool.
    pub chances: u32,
}

impl LotteryEntry {
    pub fn new(tid: u32, name: impl Into<String>, record: Record) -> Self {
        LotteryEntry {
            tid,
            original_tid: tid,
            name: name.into(),
            record,
            chances: 0,
        }
    }

    pub fn with_chances(mut self, chances: u32) -> Self {
        self.chances = chances;
        self
    }

    /// Whether the pick has been traded away from the team that earned it.
    pub fn is_traded(&self) -> bool {
        self.tid != self.original_tid
    }
}
