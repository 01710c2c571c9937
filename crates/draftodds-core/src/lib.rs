// Draft lottery odds engine.
//
// Pure computation only: no I/O, configuration, or rendering. The CLI crate
// layers standings loading and reporting on top.

pub mod chances;
pub mod draw;
pub mod entry;
pub mod error;
pub mod odds;

pub use entry::{LotteryEntry, Record};
pub use error::{LotteryError, LotteryResult};
pub use odds::{
    pick_probabilities, pick_probabilities_from_chances, ProbabilityMatrix,
    DEFAULT_TOTAL_CHANCES, LOTTERY_PICKS,
};
