//! The vesting policy context.

use crate::{Asset, Timestamp};

/// A snapshot of the state a vesting policy operation is evaluated against.
///
/// Built fresh for every call and never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VestingPolicyContext {
    /// The balance before the operation is applied.
    pub balance: Asset,
    /// The current time.
    pub now: Timestamp,
    /// The amount involved in the operation.
    pub amount: Asset,
}

impl VestingPolicyContext {
    /// Create a new context.
    pub const fn new(balance: Asset, now: Timestamp, amount: Asset) -> Self {
        Self {
            balance,
            now,
            amount,
        }
    }
}
