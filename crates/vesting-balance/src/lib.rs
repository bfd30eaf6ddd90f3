//! A balance whose withdrawable part is governed by a vesting policy.
//!
//! The caller is expected to check the allowance predicates before invoking the corresponding
//! mutators. The plain mutators treat a broken contract as fatal and panic; the `checked_*`
//! flavours return the [`ContractViolation`] instead, for callers that sit across a trust boundary.

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(
    missing_docs,
    clippy::missing_docs_in_private_items,
    clippy::clone_on_ref_ptr
)]

use tracing::{error, trace};
use vesting_primitives::{
    Asset, ContractViolation, ShareType, Timestamp, VestingPolicy, VestingPolicyContext,
    MAX_SHARE_SUPPLY,
};

mod policy;

pub use policy::{Policy, VestingPolicyInitializer};
pub use vesting_policy_cdd::{CddVestingPolicy, CddVestingPolicyInitializer};
pub use vesting_policy_linear::{LinearVestingPolicy, LinearVestingPolicyInitializer};
pub use vesting_primitives as primitives;


/// An error that can happen at [`VestingBalance::new`].
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum InitializerError {
    /// The initial balance is zero or negative.
    #[error("initial balance must be positive, got {0}")]
    NonPositiveBalance(ShareType),
    /// The initial balance is over the max share supply.
    #[error("initial balance of {0} is over the max share supply")]
    BalanceOverSupply(ShareType),
    /// The linear policy parameters are invalid.
    #[error("linear policy: {0}")]
    Linear(#[from] vesting_policy_linear::InitError),
    /// The coin-seconds policy parameters are invalid.
    #[error("cdd policy: {0}")]
    Cdd(#[from] vesting_policy_cdd::InitError),
}

/// A vesting balance.
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
pub struct VestingBalance {
    /// The balance under vesting.
    balance: Asset,
    /// The policy governing the balance; never swapped for the other variant.
    policy: Policy,
}

/// Whether the `balance` holds at least the `amount` of the same asset.
fn covers(balance: &Asset, amount: &Asset) -> bool {
    amount <= balance
}

/// Log the violation and abort.
#[track_caller]
fn fatal<T>(result: Result<T, ContractViolation>) -> T {
    match result {
        Ok(val) => val,
        Err(err) => {
            error!(message = "Vesting contract violated", %err);
            panic!("vesting contract violated: {err}");
        }
    }
}

impl VestingBalance {
    /// Create a new vesting balance with a policy set up by the `initializer` at `now`.
    pub fn new(
        now: Timestamp,
        balance: Asset,
        initializer: &VestingPolicyInitializer,
    ) -> Result<Self, InitializerError> {
        if balance.amount <= 0 {
            return Err(InitializerError::NonPositiveBalance(balance.amount));
        }
        if balance.amount > MAX_SHARE_SUPPLY {
            return Err(InitializerError::BalanceOverSupply(balance.amount));
        }

        let policy = match initializer {
            VestingPolicyInitializer::Linear(initializer) => {
                Policy::Linear(initializer.init(balance.amount)?)
            }
            VestingPolicyInitializer::Cdd(initializer) => Policy::Cdd(initializer.init(now)?),
        };

        Ok(Self::from_parts(balance, policy))
    }

    /// Restore a vesting balance from its stored parts.
    pub fn from_parts(balance: Asset, policy: Policy) -> Self {
        Self { balance, policy }
    }

    /// The balance under vesting.
    pub fn balance(&self) -> Asset {
        self.balance
    }

    /// The policy governing the balance.
    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    /// Snapshot the current balance for an operation.
    fn context(&self, now: Timestamp, amount: Asset) -> VestingPolicyContext {
        VestingPolicyContext::new(self.balance, now, amount)
    }

    /// Check whether `amount` may be deposited at `now`.
    pub fn is_deposit_allowed(&self, now: Timestamp, amount: Asset) -> bool {
        self.policy.is_deposit_allowed(&self.context(now, amount))
    }

    /// Check whether `amount` may be deposited as already vested at `now`.
    pub fn is_deposit_vested_allowed(&self, now: Timestamp, amount: Asset) -> bool {
        self.policy
            .is_deposit_vested_allowed(&self.context(now, amount))
    }

    /// Check whether `amount` may be withdrawn at `now`.
    pub fn checked_is_withdraw_allowed(
        &self,
        now: Timestamp,
        amount: Asset,
    ) -> Result<bool, ContractViolation> {
        let allowed = self
            .policy
            .is_withdraw_allowed(&self.context(now, amount))?;

        // A policy allowing to withdraw more than the balance holds is broken.
        if allowed && !covers(&self.balance, &amount) {
            return Err(ContractViolation::AllowanceExceedsBalance {
                allowed: i128::from(amount.amount),
                balance: self.balance.amount,
            });
        }

        Ok(allowed)
    }

    /// Check whether `amount` may be withdrawn at `now`.
    ///
    /// Panics if the contract is violated.
    #[track_caller]
    pub fn is_withdraw_allowed(&self, now: Timestamp, amount: Asset) -> bool {
        fatal(self.checked_is_withdraw_allowed(now, amount))
    }

    /// Compute the amount withdrawable at `now`.
    pub fn checked_get_allowed_withdraw(&self, now: Timestamp) -> Result<Asset, ContractViolation> {
        let nothing = Asset::zero(self.balance.asset_id);
        self.policy.allowed_withdraw(&self.context(now, nothing))
    }

    /// Compute the amount withdrawable at `now`.
    ///
    /// Panics if the contract is violated.
    #[track_caller]
    pub fn get_allowed_withdraw(&self, now: Timestamp) -> Asset {
        fatal(self.checked_get_allowed_withdraw(now))
    }

    /// Deposit `amount` at `now`.
    ///
    /// No allowance check is done here; see [`Self::is_deposit_allowed`].
    pub fn checked_deposit(
        &mut self,
        now: Timestamp,
        amount: Asset,
    ) -> Result<(), ContractViolation> {
        let ctx = self.context(now, amount);
        let balance = self.balance.checked_add(&amount)?;

        self.policy.on_deposit(&ctx)?;
        self.balance = balance;

        trace!(
            message = "Deposited into the vesting balance",
            ?now,
            ?amount,
            balance = ?self.balance
        );
        Ok(())
    }

    /// Deposit `amount` at `now`.
    ///
    /// Panics if the contract is violated.
    #[track_caller]
    pub fn deposit(&mut self, now: Timestamp, amount: Asset) {
        fatal(self.checked_deposit(now, amount))
    }

    /// Deposit already vested `amount` at `now`.
    ///
    /// No allowance check is done here; see [`Self::is_deposit_vested_allowed`].
    pub fn checked_deposit_vested(
        &mut self,
        now: Timestamp,
        amount: Asset,
    ) -> Result<(), ContractViolation> {
        let ctx = self.context(now, amount);
        let balance = self.balance.checked_add(&amount)?;

        self.policy.on_deposit_vested(&ctx)?;
        self.balance = balance;

        trace!(
            message = "Deposited vested funds into the vesting balance",
            ?now,
            ?amount,
            balance = ?self.balance
        );
        Ok(())
    }

    /// Deposit already vested `amount` at `now`.
    ///
    /// Panics if the contract is violated.
    #[track_caller]
    pub fn deposit_vested(&mut self, now: Timestamp, amount: Asset) {
        fatal(self.checked_deposit_vested(now, amount))
    }

    /// Withdraw `amount` at `now`.
    ///
    /// No allowance check is done here; see [`Self::is_withdraw_allowed`].
    pub fn checked_withdraw(
        &mut self,
        now: Timestamp,
        amount: Asset,
    ) -> Result<(), ContractViolation> {
        if !covers(&self.balance, &amount) {
            return Err(ContractViolation::WithdrawExceedsBalance {
                amount,
                balance: self.balance,
            });
        }

        let ctx = self.context(now, amount);
        let balance = self.balance.checked_sub(&amount)?;

        self.policy.on_withdraw(&ctx)?;
        self.balance = balance;

        trace!(
            message = "Withdrawn from the vesting balance",
            ?now,
            ?amount,
            balance = ?self.balance
        );
        Ok(())
    }

    /// Withdraw `amount` at `now`.
    ///
    /// Panics if the contract is violated.
    #[track_caller]
    pub fn withdraw(&mut self, now: Timestamp, amount: Asset) {
        fatal(self.checked_withdraw(now, amount))
    }
}
