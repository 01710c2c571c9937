// Closed-form draft lottery odds.
//
// Only the top picks are drawn by lottery. Every team left out of the draw
// keeps its standings order, so its final pick is its natural slot pushed
// back by the number of later-slotted teams that jumped into the drawn
// picks. Enumerating every ordered draw of the top picks gives the first
// three columns exactly, and summing each unordered top-three set into
// "skip" buckets gives the rest.

use std::collections::BTreeMap;

use tracing::debug;

use crate::entry::LotteryEntry;
use crate::error::{LotteryError, LotteryResult};

/// Pool size used by the standard chance table.
pub const DEFAULT_TOTAL_CHANCES: u32 = 1000;

/// Number of picks decided by the weighted draw.
pub const LOTTERY_PICKS: usize = 3;

// ---------------------------------------------------------------------------
// ProbabilityMatrix
// ---------------------------------------------------------------------------

/// Pick probabilities, one row per entry and one column per pick.
///
/// `cell(i, j)` is the probability that entry `i` receives pick `j + 1`, or
/// `None` where the lottery can never place the entry.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbabilityMatrix {
    rows: Vec<Vec<Option<f64>>>,
}

impl ProbabilityMatrix {
    pub(crate) fn empty(n: usize) -> Self {
        ProbabilityMatrix {
            rows: vec![vec![None; n]; n],
        }
    }

    pub(crate) fn from_rows(rows: Vec<Vec<Option<f64>>>) -> Self {
        ProbabilityMatrix { rows }
    }

    pub(crate) fn set(&mut self, entry: usize, pick: usize, prob: f64) {
        self.rows[entry][pick] = Some(prob);
    }

    /// Number of entries (and picks).
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn cell(&self, entry: usize, pick: usize) -> Option<f64> {
        self.rows.get(entry)?.get(pick).copied().flatten()
    }

    pub fn row(&self, entry: usize) -> Option<&[Option<f64>]> {
        self.rows.get(entry).map(Vec::as_slice)
    }

    pub fn rows(&self) -> &[Vec<Option<f64>>] {
        &self.rows
    }

    /// Sum of the assigned cells in a row. Should be 1.0 for every entry.
    pub fn row_sum(&self, entry: usize) -> f64 {
        self.rows
            .get(entry)
            .map(|row| row.iter().flatten().sum())
            .unwrap_or(0.0)
    }

    /// Sum of a pick column across all entries.
    pub fn column_sum(&self, pick: usize) -> f64 {
        self.rows
            .iter()
            .filter_map(|row| row.get(pick).copied().flatten())
            .sum()
    }

    /// Cell as a percentage rounded to one decimal place.
    pub fn percent(&self, entry: usize, pick: usize) -> Option<f64> {
        self.cell(entry, pick).map(to_percent)
    }
}

/// Convert a probability into a percentage rounded to one decimal.
pub fn to_percent(prob: f64) -> f64 {
    (prob * 1000.0).round() / 10.0
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Check that `chances` describes a complete pool of `total_chances` tickets.
pub fn validate_pool(chances: &[u32], total_chances: u32) -> LotteryResult<()> {
    if total_chances == 0 {
        return Err(LotteryError::invalid("pool size must be greater than 0"));
    }
    let sum: u64 = chances.iter().map(|&c| u64::from(c)).sum();
    if sum != u64::from(total_chances) {
        return Err(LotteryError::invalid(format!(
            "chances sum to {sum}, expected a pool of {total_chances}"
        )));
    }
    Ok(())
}

/// Tickets left after removing `drawn` from the pool, as a divisor.
fn remaining(total: u32, drawn: &[u32], pick: usize) -> LotteryResult<f64> {
    let left = i64::from(total) - drawn.iter().map(|&c| i64::from(c)).sum::<i64>();
    if left <= 0 {
        return Err(LotteryError::DegenerateLotteryState { pick });
    }
    Ok(left as f64)
}

// ---------------------------------------------------------------------------
// Core computation
// ---------------------------------------------------------------------------

/// Compute pick probabilities for lottery entries in lottery order.
pub fn pick_probabilities(
    entries: &[LotteryEntry],
    total_chances: u32,
) -> LotteryResult<ProbabilityMatrix> {
    let chances: Vec<u32> = entries.iter().map(|e| e.chances).collect();
    pick_probabilities_from_chances(&chances, total_chances)
}

/// Compute pick probabilities from ticket counts alone.
///
/// Index order is lottery order: index `i` has natural pick `i + 1`.
pub fn pick_probabilities_from_chances(
    chances: &[u32],
    total_chances: u32,
) -> LotteryResult<ProbabilityMatrix> {
    let n = chances.len();
    if n == 0 {
        return Ok(ProbabilityMatrix::empty(0));
    }
    validate_pool(chances, total_chances)?;

    let mut matrix = ProbabilityMatrix::empty(n);
    let combos = top_three(chances, total_chances, &mut matrix)?;
    fill_skipped(&combos, n, &mut matrix);

    debug!(
        entries = n,
        total_chances,
        combos = combos.len(),
        "computed lottery pick probabilities"
    );
    Ok(matrix)
}

/// Probability of each unordered set of three entries taking the drawn picks.
///
/// Keys are sorted index triples.
pub(crate) type TopThreeCombos = BTreeMap<[usize; 3], f64>;

/// Stage one: exact marginals for the drawn picks, plus the top-three sets.
fn top_three(
    chances: &[u32],
    total: u32,
    matrix: &mut ProbabilityMatrix,
) -> LotteryResult<TopThreeCombos> {
    let n = chances.len();
    let t = f64::from(total);
    let c = |i: usize| f64::from(chances[i]);
    let mut combos = TopThreeCombos::new();

    for i in 0..n {
        matrix.set(i, 0, c(i) / t);
        if n < 2 {
            continue;
        }

        let mut second = 0.0;
        let mut third = 0.0;
        for k in (0..n).filter(|&k| k != i) {
            let first_k = c(k) / t;
            let after_k = remaining(total, &[chances[k]], 2)?;
            second += first_k * c(i) / after_k;

            for l in (0..n).filter(|&l| l != i && l != k) {
                let second_l = c(l) / after_k;
                let after_kl = remaining(total, &[chances[k], chances[l]], 3)?;
                let prob = first_k * second_l * c(i) / after_kl;
                third += prob;

                let mut key = [i, k, l];
                key.sort_unstable();
                *combos.entry(key).or_insert(0.0) += prob;
            }
        }

        matrix.set(i, 1, second);
        if n >= LOTTERY_PICKS {
            matrix.set(i, 2, third);
        }
    }

    Ok(combos)
}

/// Stage two: picks after the draw, by how many later slots jumped ahead.
fn fill_skipped(combos: &TopThreeCombos, n: usize, matrix: &mut ProbabilityMatrix) {
    for i in 0..n {
        let mut skipped = [0.0_f64; LOTTERY_PICKS + 1];
        for (key, &prob) in combos {
            if key.contains(&i) {
                continue;
            }
            let jumped = key.iter().filter(|&&m| m > i).count();
            skipped[jumped] += prob;
        }

        for (jumped, &prob) in skipped.iter().enumerate() {
            let pick = i + jumped;
            if pick >= LOTTERY_PICKS && pick < n {
                matrix.set(i, pick, prob);
            }
        }
    }
}

#[cfg(test)]
pub(crate) fn top_three_combos(
    chances: &[u32],
    total: u32,
) -> LotteryResult<TopThreeCombos> {
    let mut matrix = ProbabilityMatrix::empty(chances.len());
    top_three(chances, total, &mut matrix)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
