//! Contract violations.

use crate::{frac_scale::FracScaleError, Asset, AssetError, ShareType, Timestamp};

/// A broken caller precondition or internal invariant of the vesting logic.
///
/// None of these can happen if the caller checks the allowance predicates before mutating and
/// supplies a non-decreasing time.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum ContractViolation {
    /// The balance went above the amount the linear schedule started with.
    #[error("negative withdrawn amount: {0}")]
    NegativeWithdrawn(ShareType),
    /// The derived withdrawable amount went negative.
    #[error("negative allowed withdraw: {0}")]
    NegativeAllowance(ShareType),
    /// The balance the policy is evaluated against is negative.
    #[error("negative balance: {0}")]
    NegativeBalance(ShareType),
    /// The amount involved in the operation is negative.
    #[error("negative amount: {0}")]
    NegativeAmount(ShareType),
    /// The withdrawal is larger than the whole balance.
    #[error("withdraw of {amount:?} exceeds the balance of {balance:?}")]
    WithdrawExceedsBalance {
        /// The requested amount.
        amount: Asset,
        /// The balance at the time of the request.
        balance: Asset,
    },
    /// The supplied time is before the last accrual update.
    #[error("time went backwards: last update at {last_update:?}, now is {now:?}")]
    NonMonotonicTime {
        /// The moment of the last accrual update.
        last_update: Timestamp,
        /// The supplied current time.
        now: Timestamp,
    },
    /// The withdrawal needs more coin-seconds than were earned.
    #[error("insufficient coin-seconds: needed {needed}, earned {earned}")]
    InsufficientCoinSeconds {
        /// The coin-seconds the withdrawal consumes.
        needed: u128,
        /// The coin-seconds earned so far.
        earned: u128,
    },
    /// The policy allows withdrawing more than the balance holds.
    #[error("allowed withdraw of {allowed} exceeds the balance of {balance}")]
    AllowanceExceedsBalance {
        /// The amount the policy allows.
        allowed: i128,
        /// The balance amount.
        balance: ShareType,
    },
    /// The policy can not accept vested deposits.
    #[error("the policy does not accept vested deposits")]
    DepositVestedUnsupported,
    /// An overflow occured in the accrual arithmetic.
    #[error("overflow")]
    Overflow,
    /// Asset arithmetic failed.
    #[error("asset: {0}")]
    Asset(#[from] AssetError),
    /// Fractional scaling failed.
    #[error("frac scale: {0}")]
    FracScale(#[from] FracScaleError),
}
