//! Primitives shared by the vesting policies and the vesting balance.

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(
    missing_docs,
    clippy::missing_docs_in_private_items,
    clippy::clone_on_ref_ptr
)]

mod asset;
mod context;
mod error;
pub mod frac_scale;
mod policy;
mod timestamp;

pub use asset::{Asset, AssetError, AssetId};
pub use context::VestingPolicyContext;
pub use error::ContractViolation;
pub use policy::VestingPolicy;
pub use timestamp::Timestamp;

/// The integer type used to count shares of an asset.
pub type ShareType = i64;

/// The maximum amount of shares any asset may ever have in circulation.
pub const MAX_SHARE_SUPPLY: ShareType = 1_000_000_000_000_000;

// Summing two in-range amounts must never wrap around.
static_assertions::const_assert!(MAX_SHARE_SUPPLY <= ShareType::MAX / 2);

/// Check that both amounts and their sum stay within [`MAX_SHARE_SUPPLY`].
///
/// The sum is computed in `i128`, so the check itself can not overflow for any inputs.
pub fn sum_below_max_shares(a: &Asset, b: &Asset) -> bool {
    let max = i128::from(MAX_SHARE_SUPPLY);
    let a = i128::from(a.amount);
    let b = i128::from(b.amount);
    a <= max && b <= max && a + b <= max
}
