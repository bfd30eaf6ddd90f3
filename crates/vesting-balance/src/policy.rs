//! The closed set of vesting policies a balance can be governed by.

use vesting_policy_cdd::{CddVestingPolicy, CddVestingPolicyInitializer};
use vesting_policy_linear::{LinearVestingPolicy, LinearVestingPolicyInitializer};
use vesting_primitives::{Asset, ContractViolation, VestingPolicy, VestingPolicyContext};

/// The policy of a vesting balance.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    codec::Encode,
    codec::Decode,
    codec::MaxEncodedLen,
    scale_info::TypeInfo,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Policy {
    /// Linear vesting with a cliff.
    Linear(LinearVestingPolicy),
    /// Coin-seconds vesting.
    Cdd(CddVestingPolicy),
}

/// The configuration a new vesting balance policy is created from.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VestingPolicyInitializer {
    /// Linear vesting with a cliff.
    Linear(LinearVestingPolicyInitializer),
    /// Coin-seconds vesting.
    Cdd(CddVestingPolicyInitializer),
}

impl VestingPolicy for Policy {
    fn allowed_withdraw(&self, ctx: &VestingPolicyContext) -> Result<Asset, ContractViolation> {
        match self {
            Self::Linear(policy) => policy.allowed_withdraw(ctx),
            Self::Cdd(policy) => policy.allowed_withdraw(ctx),
        }
    }

    fn is_deposit_allowed(&self, ctx: &VestingPolicyContext) -> bool {
        match self {
            Self::Linear(policy) => policy.is_deposit_allowed(ctx),
            Self::Cdd(policy) => policy.is_deposit_allowed(ctx),
        }
    }

    fn is_deposit_vested_allowed(&self, ctx: &VestingPolicyContext) -> bool {
        match self {
            Self::Linear(policy) => policy.is_deposit_vested_allowed(ctx),
            Self::Cdd(policy) => policy.is_deposit_vested_allowed(ctx),
        }
    }

    fn is_withdraw_allowed(&self, ctx: &VestingPolicyContext) -> Result<bool, ContractViolation> {
        match self {
            Self::Linear(policy) => policy.is_withdraw_allowed(ctx),
            Self::Cdd(policy) => policy.is_withdraw_allowed(ctx),
        }
    }

    fn on_deposit(&mut self, ctx: &VestingPolicyContext) -> Result<(), ContractViolation> {
        match self {
            Self::Linear(policy) => policy.on_deposit(ctx),
            Self::Cdd(policy) => policy.on_deposit(ctx),
        }
    }

    fn on_deposit_vested(&mut self, ctx: &VestingPolicyContext) -> Result<(), ContractViolation> {
        match self {
            Self::Linear(policy) => policy.on_deposit_vested(ctx),
            Self::Cdd(policy) => policy.on_deposit_vested(ctx),
        }
    }

    fn on_withdraw(&mut self, ctx: &VestingPolicyContext) -> Result<(), ContractViolation> {
        match self {
            Self::Linear(policy) => policy.on_withdraw(ctx),
            Self::Cdd(policy) => policy.on_withdraw(ctx),
        }
    }
}
