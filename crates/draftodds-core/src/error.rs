// Error types for the lottery engine.

use thiserror::Error;

/// Result alias used throughout the lottery engine.
pub type LotteryResult<T> = Result<T, LotteryError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LotteryError {
    /// The entries or pool size cannot describe a lottery.
    #[error("invalid lottery input: {reason}")]
    InvalidLotteryInput { reason: String },

    /// A conditional draw would have to pick from an empty pool.
    #[error("degenerate lottery: no tickets remain when drawing pick {pick}")]
    DegenerateLotteryState { pick: usize },
}

impl LotteryError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        LotteryError::InvalidLotteryInput {
            reason: reason.into(),
        }
    }
}
