//! The coin-seconds (coin-days-destroyed) vesting policy.
//!
//! Holding `N` shares for `S` seconds earns `N * S` coin-seconds, up to the cap of
//! `balance * vesting_seconds`. Withdrawing `X` shares consumes `X * vesting_seconds` of the
//! earned coin-seconds, so the withdrawable amount is `coin_seconds_earned / vesting_seconds`.

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(
    missing_docs,
    clippy::missing_docs_in_private_items,
    clippy::clone_on_ref_ptr
)]

use vesting_primitives::{
    frac_scale::FracScaleError, sum_below_max_shares, Asset, ContractViolation, ShareType,
    Timestamp, VestingPolicy, VestingPolicyContext,
};

/// The coin-seconds vesting policy.
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
pub struct CddVestingPolicy {
    /// The holding time it takes for a share to become fully vested.
    pub vesting_seconds: u32,
    /// Nothing can be withdrawn until after this moment.
    pub start_claim: Timestamp,
    /// The coin-seconds accrued as of `coin_seconds_earned_last_update`.
    pub coin_seconds_earned: u128,
    /// The moment the `coin_seconds_earned` was last brought up to date.
    pub coin_seconds_earned_last_update: Timestamp,
}

/// The parameters a new [`CddVestingPolicy`] is created from.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CddVestingPolicyInitializer {
    /// Nothing can be withdrawn until after this moment.
    pub start_claim: Timestamp,
    /// The holding time it takes for a share to become fully vested.
    pub vesting_seconds: u32,
}

/// An error that can happen at [`CddVestingPolicyInitializer::init`].
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum InitError {
    /// The vesting seconds are zero.
    #[error("vesting seconds must be non-zero")]
    ZeroVestingSeconds,
}

impl CddVestingPolicyInitializer {
    /// Create the policy with no coin-seconds earned as of `now`.
    pub fn init(&self, now: Timestamp) -> Result<CddVestingPolicy, InitError> {
        if self.vesting_seconds == 0 {
            return Err(InitError::ZeroVestingSeconds);
        }

        Ok(CddVestingPolicy {
            vesting_seconds: self.vesting_seconds,
            start_claim: self.start_claim,
            coin_seconds_earned: 0,
            coin_seconds_earned_last_update: now,
        })
    }
}

/// Widen a balance amount.
fn balance_amount(ctx: &VestingPolicyContext) -> Result<u128, ContractViolation> {
    u128::try_from(ctx.balance.amount)
        .map_err(|_| ContractViolation::NegativeBalance(ctx.balance.amount))
}

/// Widen an operation amount.
fn operation_amount(ctx: &VestingPolicyContext) -> Result<u128, ContractViolation> {
    u128::try_from(ctx.amount.amount).map_err(|_| ContractViolation::NegativeAmount(ctx.amount.amount))
}

impl CddVestingPolicy {
    /// The coin-seconds it takes to fully vest `amount` shares.
    fn full_vesting_coin_seconds(&self, amount: u128) -> Result<u128, ContractViolation> {
        amount
            .checked_mul(u128::from(self.vesting_seconds))
            .ok_or(ContractViolation::Overflow)
    }

    /// Compute the coin-seconds earned as of `ctx.now`, without updating the state.
    pub fn compute_coin_seconds_earned(
        &self,
        ctx: &VestingPolicyContext,
    ) -> Result<u128, ContractViolation> {
        if ctx.now < self.coin_seconds_earned_last_update {
            return Err(ContractViolation::NonMonotonicTime {
                last_update: self.coin_seconds_earned_last_update,
                now: ctx.now,
            });
        }
        let delta_seconds = (ctx.now - self.coin_seconds_earned_last_update).unsigned_abs();

        let balance = balance_amount(ctx)?;
        let delta_coin_seconds = balance
            .checked_mul(u128::from(delta_seconds))
            .ok_or(ContractViolation::Overflow)?;
        let coin_seconds_earned_cap = self.full_vesting_coin_seconds(balance)?;

        Ok(self
            .coin_seconds_earned
            .saturating_add(delta_coin_seconds)
            .min(coin_seconds_earned_cap))
    }

    /// Bring the earned coin-seconds up to `ctx.now`.
    pub fn update_coin_seconds_earned(
        &mut self,
        ctx: &VestingPolicyContext,
    ) -> Result<(), ContractViolation> {
        self.coin_seconds_earned = self.compute_coin_seconds_earned(ctx)?;
        self.coin_seconds_earned_last_update = ctx.now;
        Ok(())
    }
}

impl VestingPolicy for CddVestingPolicy {
    fn allowed_withdraw(&self, ctx: &VestingPolicyContext) -> Result<Asset, ContractViolation> {
        if ctx.now <= self.start_claim {
            return Ok(Asset::zero(ctx.balance.asset_id));
        }

        let coin_seconds_earned = self.compute_coin_seconds_earned(ctx)?;
        let withdraw_available = coin_seconds_earned
            .checked_div(u128::from(self.vesting_seconds))
            .ok_or(FracScaleError::DivisionByZero)?;

        let balance = balance_amount(ctx)?;
        if withdraw_available > balance {
            return Err(ContractViolation::AllowanceExceedsBalance {
                allowed: i128::try_from(withdraw_available).unwrap_or(i128::MAX),
                balance: ctx.balance.amount,
            });
        }

        let withdraw_available = ShareType::try_from(withdraw_available)
            .map_err(|_| FracScaleError::Conversion)?;
        Ok(Asset::new(withdraw_available, ctx.balance.asset_id))
    }

    fn is_deposit_allowed(&self, ctx: &VestingPolicyContext) -> bool {
        ctx.amount.asset_id == ctx.balance.asset_id && sum_below_max_shares(&ctx.amount, &ctx.balance)
    }

    fn is_deposit_vested_allowed(&self, ctx: &VestingPolicyContext) -> bool {
        self.is_deposit_allowed(ctx)
    }

    fn is_withdraw_allowed(&self, ctx: &VestingPolicyContext) -> Result<bool, ContractViolation> {
        Ok(ctx.amount <= self.allowed_withdraw(ctx)?)
    }

    /// Accrue with the pre-deposit balance; the new funds start earning from `ctx.now`.
    fn on_deposit(&mut self, ctx: &VestingPolicyContext) -> Result<(), ContractViolation> {
        self.update_coin_seconds_earned(ctx)
    }

    fn on_deposit_vested(&mut self, ctx: &VestingPolicyContext) -> Result<(), ContractViolation> {
        let vested = self.full_vesting_coin_seconds(operation_amount(ctx)?)?;
        let coin_seconds_earned = self
            .compute_coin_seconds_earned(ctx)?
            .checked_add(vested)
            .ok_or(ContractViolation::Overflow)?;

        self.coin_seconds_earned = coin_seconds_earned;
        self.coin_seconds_earned_last_update = ctx.now;
        Ok(())
    }

    fn on_withdraw(&mut self, ctx: &VestingPolicyContext) -> Result<(), ContractViolation> {
        let needed = self.full_vesting_coin_seconds(operation_amount(ctx)?)?;
        let earned = self.compute_coin_seconds_earned(ctx)?;
        // Only reachable if the caller skipped `is_withdraw_allowed`.
        let coin_seconds_earned = earned
            .checked_sub(needed)
            .ok_or(ContractViolation::InsufficientCoinSeconds { needed, earned })?;

        self.coin_seconds_earned = coin_seconds_earned;
        self.coin_seconds_earned_last_update = ctx.now;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use vesting_primitives::{AssetId, MAX_SHARE_SUPPLY};

    use super::*;

    const CORE: AssetId = AssetId(0);
    const DAY: u32 = 86_400;

    fn policy(vesting_seconds: u32, start_claim: u32) -> CddVestingPolicy {
        CddVestingPolicyInitializer {
            start_claim: Timestamp(start_claim),
            vesting_seconds,
        }
        .init(Timestamp(0))
        .unwrap()
    }

    fn ctx(balance: ShareType, now: u32, amount: ShareType) -> VestingPolicyContext {
        VestingPolicyContext::new(
            Asset::new(balance, CORE),
            Timestamp(now),
            Asset::new(amount, CORE),
        )
    }

    /// This test verifies the half-day accrual of a one-day vesting.
    #[test]
    fn logic_simple() {
        let mut policy = policy(DAY, 0);

        // Deposit onto an empty balance.
        policy.on_deposit(&ctx(0, 0, 100)).unwrap();
        assert_eq!(policy.coin_seconds_earned, 0);

        let half_day = ctx(100, 43_200, 0);
        assert_eq!(policy.compute_coin_seconds_earned(&half_day), Ok(4_320_000));
        assert_eq!(policy.allowed_withdraw(&half_day), Ok(Asset::new(50, CORE)));

        let full_day = ctx(100, DAY, 0);
        assert_eq!(policy.compute_coin_seconds_earned(&full_day), Ok(8_640_000));
        assert_eq!(policy.allowed_withdraw(&full_day), Ok(Asset::new(100, CORE)));
    }

    #[test]
    fn accrual_is_capped() {
        let policy = policy(DAY, 0);

        let compute = |now| policy.compute_coin_seconds_earned(&ctx(100, now, 0)).unwrap();

        let mut previous = 0;
        for now in (0..3 * DAY).step_by(3_600) {
            let earned = compute(now);
            assert!(earned >= previous, "at {}", now);
            assert!(earned <= 100 * u128::from(DAY), "at {}", now);
            previous = earned;
        }
        assert_eq!(compute(u32::MAX), 100 * u128::from(DAY));
    }

    #[test]
    fn nothing_before_start_claim() {
        let policy = policy(DAY, 1_000);

        let compute = |now| policy.allowed_withdraw(&ctx(100, now, 0)).unwrap().amount;

        assert_eq!(compute(0), 0);
        assert_eq!(compute(999), 0);
        assert_eq!(compute(1_000), 0);
        // Coin-seconds accrued before the start claim count as soon as it passes.
        assert_eq!(compute(1_001), 1);
        assert_eq!(compute(2 * DAY), 100);
    }

    /// This test verifies that a withdrawal consumes exactly `amount * vesting_seconds`.
    #[test]
    fn withdraw_consumes_coin_seconds() {
        let mut policy = policy(DAY, 0);

        let withdraw = ctx(100, 43_200, 30);
        assert_eq!(policy.is_withdraw_allowed(&withdraw), Ok(true));
        policy.on_withdraw(&withdraw).unwrap();

        assert_eq!(policy.coin_seconds_earned, 4_320_000 - 30 * u128::from(DAY));
        assert_eq!(policy.coin_seconds_earned_last_update, Timestamp(43_200));
        assert_eq!(
            policy.allowed_withdraw(&ctx(70, 43_200, 0)),
            Ok(Asset::new(20, CORE))
        );
    }

    #[test]
    fn withdraw_over_allowance() {
        let mut policy = policy(DAY, 0);

        let withdraw = ctx(100, 43_200, 51);
        assert_eq!(policy.is_withdraw_allowed(&withdraw), Ok(false));
        assert_matches!(
            policy.on_withdraw(&withdraw),
            Err(ContractViolation::InsufficientCoinSeconds {
                needed: 4_406_400,
                earned: 4_320_000
            })
        );

        // The state is left untouched.
        assert_eq!(policy.coin_seconds_earned, 0);
        assert_eq!(policy.coin_seconds_earned_last_update, Timestamp(0));
    }

    /// This test verifies that a deposit accrues the pre-deposit balance first, and the deposited
    /// funds only start accruing from the deposit moment.
    #[test]
    fn deposit_accrues_pre_deposit_balance() {
        let mut policy = policy(DAY, 0);

        policy.on_deposit(&ctx(100, 43_200, 100)).unwrap();
        assert_eq!(policy.coin_seconds_earned, 4_320_000);
        assert_eq!(policy.coin_seconds_earned_last_update, Timestamp(43_200));

        // Another half a day for the doubled balance.
        let later = ctx(200, DAY, 0);
        assert_eq!(policy.compute_coin_seconds_earned(&later), Ok(12_960_000));
        assert_eq!(policy.allowed_withdraw(&later), Ok(Asset::new(150, CORE)));
    }

    #[test]
    fn update_is_idempotent() {
        let mut policy = policy(DAY, 0);

        let ctx = ctx(100, 1_000, 0);
        policy.update_coin_seconds_earned(&ctx).unwrap();
        let expected = policy.clone();
        policy.update_coin_seconds_earned(&ctx).unwrap();
        policy.update_coin_seconds_earned(&ctx).unwrap();

        assert_eq!(policy, expected);
        assert_eq!(policy.coin_seconds_earned, 100_000);
    }

    /// This test verifies that vested deposits are withdrawable right away.
    #[test]
    fn deposit_vested() {
        let mut policy = policy(DAY, 0);

        let deposit = ctx(0, 10, 500);
        assert!(policy.is_deposit_vested_allowed(&deposit));
        policy.on_deposit_vested(&deposit).unwrap();
        assert_eq!(policy.coin_seconds_earned, 500 * u128::from(DAY));

        for amount in [1, 250, 500] {
            assert_eq!(policy.is_withdraw_allowed(&ctx(500, 10, amount)), Ok(true));
        }
        assert_eq!(policy.is_withdraw_allowed(&ctx(500, 10, 501)), Ok(false));
    }

    #[test]
    fn time_going_backwards_is_a_violation() {
        let mut policy = policy(DAY, 0);
        policy.update_coin_seconds_earned(&ctx(100, 1_000, 0)).unwrap();

        let expected = Err(ContractViolation::NonMonotonicTime {
            last_update: Timestamp(1_000),
            now: Timestamp(999),
        });
        assert_eq!(policy.compute_coin_seconds_earned(&ctx(100, 999, 0)), expected);
        assert_eq!(
            policy.allowed_withdraw(&ctx(100, 999, 0)).map(|_| ()),
            expected.clone().map(|_| ())
        );
        assert_eq!(policy.on_deposit(&ctx(100, 999, 1)), expected.map(|_| ()));
    }

    #[test]
    fn negative_amounts_are_violations() {
        let mut policy = policy(DAY, 0);

        assert_matches!(
            policy.compute_coin_seconds_earned(&ctx(-1, 10, 0)),
            Err(ContractViolation::NegativeBalance(-1))
        );
        assert_matches!(
            policy.on_withdraw(&ctx(100, 10, -1)),
            Err(ContractViolation::NegativeAmount(-1))
        );
    }

    #[test]
    fn is_deposit_allowed_logic() {
        let policy = policy(DAY, 0);

        assert!(policy.is_deposit_allowed(&ctx(100, 0, MAX_SHARE_SUPPLY - 100)));
        assert!(!policy.is_deposit_allowed(&ctx(100, 0, MAX_SHARE_SUPPLY - 99)));
        assert!(!policy.is_deposit_vested_allowed(&ctx(100, 0, MAX_SHARE_SUPPLY - 99)));

        let other_asset = VestingPolicyContext::new(
            Asset::new(100, CORE),
            Timestamp(0),
            Asset::new(1, AssetId(1)),
        );
        assert!(!policy.is_deposit_allowed(&other_asset));
        assert!(!policy.is_deposit_vested_allowed(&other_asset));
        assert_eq!(policy.is_withdraw_allowed(&other_asset), Ok(false));
    }

    /// This test verifies that the accrual of the whole supply over the longest time fits.
    #[test]
    fn max_supply_accrual() {
        let policy = policy(u32::MAX, 0);

        let ctx = ctx(MAX_SHARE_SUPPLY, u32::MAX, 0);
        assert_eq!(
            policy.compute_coin_seconds_earned(&ctx),
            Ok(MAX_SHARE_SUPPLY as u128 * u128::from(u32::MAX))
        );
        assert_eq!(
            policy.allowed_withdraw(&ctx),
            Ok(Asset::new(MAX_SHARE_SUPPLY, CORE))
        );
    }

    #[test]
    fn init_rejects_zero_vesting_seconds() {
        let initializer = CddVestingPolicyInitializer {
            start_claim: Timestamp(0),
            vesting_seconds: 0,
        };
        assert_matches!(
            initializer.init(Timestamp(0)),
            Err(InitError::ZeroVestingSeconds)
        );
    }

    #[test]
    fn serde_parse() {
        let val = r#"{"start_claim": 40, "vesting_seconds": 86400}"#;
        let val: CddVestingPolicyInitializer = serde_json::from_str(val).unwrap();
        assert_eq!(
            val,
            CddVestingPolicyInitializer {
                start_claim: Timestamp(40),
                vesting_seconds: DAY,
            }
        );
    }

    #[test]
    #[should_panic = "unknown field `unknown_field`"]
    fn serde_parse_does_not_allow_unknown_fields() {
        let val = r#"{"start_claim": 40, "vesting_seconds": 86400, "unknown_field": 123}"#;
        let _: CddVestingPolicyInitializer = serde_json::from_str(val).unwrap();
    }
}
