//! The vesting policy interface.

use crate::{Asset, ContractViolation, VestingPolicyContext};

/// A rule that decides which part of a vesting balance is withdrawable.
///
/// The `on_*` hooks are invoked before the balance itself changes, so the context always carries
/// the pre-operation balance.
pub trait VestingPolicy {
    /// Compute how much of the balance is withdrawable at `ctx.now`.
    fn allowed_withdraw(&self, ctx: &VestingPolicyContext) -> Result<Asset, ContractViolation>;

    /// Check whether `ctx.amount` may be deposited.
    fn is_deposit_allowed(&self, ctx: &VestingPolicyContext) -> bool;

    /// Check whether `ctx.amount` may be deposited as already vested.
    fn is_deposit_vested_allowed(&self, ctx: &VestingPolicyContext) -> bool;

    /// Check whether `ctx.amount` may be withdrawn.
    fn is_withdraw_allowed(&self, ctx: &VestingPolicyContext) -> Result<bool, ContractViolation>;

    /// Update the policy state for a deposit of `ctx.amount`.
    fn on_deposit(&mut self, ctx: &VestingPolicyContext) -> Result<(), ContractViolation>;

    /// Update the policy state for a deposit of already vested `ctx.amount`.
    fn on_deposit_vested(&mut self, ctx: &VestingPolicyContext) -> Result<(), ContractViolation>;

    /// Update the policy state for a withdrawal of `ctx.amount`.
    fn on_withdraw(&mut self, ctx: &VestingPolicyContext) -> Result<(), ContractViolation>;
}
