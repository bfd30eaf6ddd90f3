//! The linear vesting policy with a cliff.

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(
    missing_docs,
    clippy::missing_docs_in_private_items,
    clippy::clone_on_ref_ptr
)]

use vesting_primitives::{
    frac_scale::{FracScale, FracScaleError, WideFracScaler},
    sum_below_max_shares, Asset, ContractViolation, ShareType, Timestamp, VestingPolicy,
    VestingPolicyContext,
};

/// The linear vesting policy.
///
/// Nothing is withdrawable before the cliff; after it, the vested part grows linearly until the
/// whole `begin_balance` is vested at the end of the duration.
///
/// The policy keeps no accrual state: the amount withdrawn so far is derived from how far the
/// balance went down from `begin_balance`. The balance must thus never grow above
/// `begin_balance`; once the cliff has passed, such a balance is a contract violation.
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
#[serde(deny_unknown_fields)]
pub struct LinearVestingPolicy {
    /// The moment the vesting starts.
    pub begin_timestamp: Timestamp,
    /// The cliff duration (counting from the `begin_timestamp`).
    pub vesting_cliff_seconds: u32,
    /// The full vesting duration (counting from the `begin_timestamp`).
    pub vesting_duration_seconds: u32,
    /// The balance at the `begin_timestamp`.
    pub begin_balance: ShareType,
}

/// The parameters a new [`LinearVestingPolicy`] is created from.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LinearVestingPolicyInitializer {
    /// The moment the vesting starts.
    pub begin_timestamp: Timestamp,
    /// The cliff duration (counting from the `begin_timestamp`).
    pub vesting_cliff_seconds: u32,
    /// The full vesting duration (counting from the `begin_timestamp`).
    pub vesting_duration_seconds: u32,
}

/// An error that can happen at [`LinearVestingPolicyInitializer::init`].
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum InitError {
    /// The cliff ends after the vesting is over.
    #[error("cliff of {cliff} seconds is longer than the duration of {duration} seconds")]
    CliffAfterDuration {
        /// The cliff seconds.
        cliff: u32,
        /// The duration seconds.
        duration: u32,
    },
}

impl LinearVestingPolicyInitializer {
    /// Create the policy for a balance of `begin_balance`.
    pub fn init(&self, begin_balance: ShareType) -> Result<LinearVestingPolicy, InitError> {
        if self.vesting_cliff_seconds > self.vesting_duration_seconds {
            return Err(InitError::CliffAfterDuration {
                cliff: self.vesting_cliff_seconds,
                duration: self.vesting_duration_seconds,
            });
        }

        Ok(LinearVestingPolicy {
            begin_timestamp: self.begin_timestamp,
            vesting_cliff_seconds: self.vesting_cliff_seconds,
            vesting_duration_seconds: self.vesting_duration_seconds,
            begin_balance,
        })
    }
}

impl LinearVestingPolicy {
    /// Compute the part of the `begin_balance` vested `elapsed` seconds after the `begin_timestamp`.
    fn total_vested(&self, elapsed: u64) -> Result<ShareType, ContractViolation> {
        let duration = u64::from(self.vesting_duration_seconds);
        if elapsed >= duration {
            return Ok(self.begin_balance);
        }

        let begin_balance = u64::try_from(self.begin_balance)
            .map_err(|_| ContractViolation::NegativeBalance(self.begin_balance))?;
        let total_vested = WideFracScaler::frac_scale(&begin_balance, &elapsed, &duration)?;
        ShareType::try_from(total_vested).map_err(|_| FracScaleError::Conversion.into())
    }
}

impl VestingPolicy for LinearVestingPolicy {
    fn allowed_withdraw(&self, ctx: &VestingPolicyContext) -> Result<Asset, ContractViolation> {
        let nothing = Asset::zero(ctx.amount.asset_id);

        if ctx.now <= self.begin_timestamp {
            return Ok(nothing);
        }
        // Strictly positive after the check above.
        let elapsed = (ctx.now - self.begin_timestamp).unsigned_abs();

        if elapsed < u64::from(self.vesting_cliff_seconds) {
            return Ok(nothing);
        }

        let total_vested = self.total_vested(elapsed)?;
        let withdrawn_already = self
            .begin_balance
            .checked_sub(ctx.balance.amount)
            .ok_or(ContractViolation::Overflow)?;
        if withdrawn_already < 0 {
            return Err(ContractViolation::NegativeWithdrawn(withdrawn_already));
        }
        let allowed = total_vested
            .checked_sub(withdrawn_already)
            .ok_or(ContractViolation::Overflow)?;
        if allowed < 0 {
            return Err(ContractViolation::NegativeAllowance(allowed));
        }

        Ok(Asset::new(allowed, ctx.amount.asset_id))
    }

    fn is_deposit_allowed(&self, ctx: &VestingPolicyContext) -> bool {
        ctx.amount.asset_id == ctx.balance.asset_id && sum_below_max_shares(&ctx.amount, &ctx.balance)
    }

    fn is_deposit_vested_allowed(&self, _ctx: &VestingPolicyContext) -> bool {
        false
    }

    fn is_withdraw_allowed(&self, ctx: &VestingPolicyContext) -> Result<bool, ContractViolation> {
        if ctx.amount.asset_id != ctx.balance.asset_id {
            return Ok(false);
        }
        Ok(ctx.amount <= self.allowed_withdraw(ctx)?)
    }

    fn on_deposit(&mut self, _ctx: &VestingPolicyContext) -> Result<(), ContractViolation> {
        Ok(())
    }

    fn on_deposit_vested(&mut self, _ctx: &VestingPolicyContext) -> Result<(), ContractViolation> {
        Err(ContractViolation::DepositVestedUnsupported)
    }

    fn on_withdraw(&mut self, _ctx: &VestingPolicyContext) -> Result<(), ContractViolation> {
        Ok(())
    }
}
