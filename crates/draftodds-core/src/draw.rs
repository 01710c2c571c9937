// Weighted lottery draw and Monte Carlo estimate of the pick odds.

use rand::Rng;
use tracing::info;

use crate::error::{LotteryError, LotteryResult};
use crate::odds::{validate_pool, ProbabilityMatrix, LOTTERY_PICKS};

/// Run one lottery. Returns the entry index holding each pick, in pick order.
///
/// The drawn picks are sampled by ticket count without replacement; every
/// other entry follows in its original order.
pub fn draw_order<R: Rng>(
    chances: &[u32],
    total_chances: u32,
    rng: &mut R,
) -> LotteryResult<Vec<usize>> {
    if chances.is_empty() {
        return Ok(Vec::new());
    }
    validate_pool(chances, total_chances)?;
    draw_validated(chances, total_chances, rng)
}

fn draw_validated<R: Rng>(
    chances: &[u32],
    total_chances: u32,
    rng: &mut R,
) -> LotteryResult<Vec<usize>> {
    let n = chances.len();
    let mut drawn = vec![false; n];
    let mut order = Vec::with_capacity(n);
    let mut pool = total_chances;

    for pick in 1..=LOTTERY_PICKS.min(n) {
        if pool == 0 {
            return Err(LotteryError::DegenerateLotteryState { pick });
        }
        let mut ticket = rng.random_range(0..pool);
        let winner = (0..n)
            .filter(|&i| !drawn[i])
            .find(|&i| {
                if ticket < chances[i] {
                    true
                } else {
                    ticket -= chances[i];
                    false
                }
            })
            .ok_or(LotteryError::DegenerateLotteryState { pick })?;
        drawn[winner] = true;
        pool -= chances[winner];
        order.push(winner);
    }

    order.extend((0..n).filter(|&i| !drawn[i]));
    Ok(order)
}

/// Estimate the pick probabilities by running `trials` lotteries.
///
/// Every cell of the result is set, including picks an entry never landed.
pub fn simulate<R: Rng>(
    chances: &[u32],
    total_chances: u32,
    trials: u32,
    rng: &mut R,
) -> LotteryResult<ProbabilityMatrix> {
    if trials == 0 {
        return Err(LotteryError::invalid("simulation needs at least one trial"));
    }
    let n = chances.len();
    if n == 0 {
        return Ok(ProbabilityMatrix::from_rows(Vec::new()));
    }
    validate_pool(chances, total_chances)?;

    let mut counts = vec![vec![0u32; n]; n];
    for _ in 0..trials {
        for (pick, entry) in draw_validated(chances, total_chances, rng)?
            .into_iter()
            .enumerate()
        {
            counts[entry][pick] += 1;
        }
    }

    info!(entries = n, trials, "simulated draft lottery");

    let trials = f64::from(trials);
    let rows: Vec<Vec<Option<f64>>> = counts
        .into_iter()
        .map(|row| {
            row.into_iter()
                .map(|count| Some(f64::from(count) / trials))
                .collect()
        })
        .collect();
    Ok(ProbabilityMatrix::from_rows(rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chances::DEFAULT_CHANCES;
    use crate::odds::pick_probabilities_from_chances;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn draw_is_a_permutation() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let mut order = draw_order(&DEFAULT_CHANCES, 1000, &mut rng).unwrap();
            order.sort_unstable();
            assert_eq!(order, (0..14).collect::<Vec<_>>());
        }
    }

    #[test]
    fn undrawn_entries_keep_their_order() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..200 {
            let order = draw_order(&DEFAULT_CHANCES, 1000, &mut rng).unwrap();
            let rest = &order[LOTTERY_PICKS..];
            assert!(rest.windows(2).all(|w| w[0] < w[1]), "{order:?}");
        }
    }

    #[test]
    fn zero_ticket_entry_never_wins_a_drawn_pick() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..200 {
            let order = draw_order(&[600, 300, 100, 0], 1000, &mut rng).unwrap();
            assert_eq!(order[3], 3);
        }
    }

    #[test]
    fn same_seed_same_draw() {
        let a = draw_order(&DEFAULT_CHANCES, 1000, &mut StdRng::seed_from_u64(99)).unwrap();
        let b = draw_order(&DEFAULT_CHANCES, 1000, &mut StdRng::seed_from_u64(99)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn draw_rejects_bad_pool() {
        let mut rng = StdRng::seed_from_u64(0);
        let err = draw_order(&[100, 100], 1000, &mut rng).unwrap_err();
        assert!(matches!(err, LotteryError::InvalidLotteryInput { .. }));
    }

    #[test]
    fn draw_rejects_exhausted_pool() {
        let mut rng = StdRng::seed_from_u64(0);
        let err = draw_order(&[1000, 0], 1000, &mut rng).unwrap_err();
        assert_eq!(err, LotteryError::DegenerateLotteryState { pick: 2 });
    }

    #[test]
    fn simulation_agrees_with_closed_form() {
        let chances = [400, 300, 200, 100];
        let exact = pick_probabilities_from_chances(&chances, 1000).unwrap();
        let mut rng = StdRng::seed_from_u64(2024);
        let estimate = simulate(&chances, 1000, 20_000, &mut rng).unwrap();

        for i in 0..chances.len() {
            for pick in 0..chances.len() {
                let expected = exact.cell(i, pick).unwrap_or(0.0);
                let observed = estimate.cell(i, pick).unwrap();
                assert!(
                    (expected - observed).abs() < 0.02,
                    "entry {i} pick {pick}: exact {expected}, simulated {observed}"
                );
            }
            assert!((estimate.row_sum(i) - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn simulation_needs_trials() {
        let mut rng = StdRng::seed_from_u64(0);
        let err = simulate(&[1000], 1000, 0, &mut rng).unwrap_err();
        assert!(matches!(err, LotteryError::InvalidLotteryInput { .. }));
    }
}
