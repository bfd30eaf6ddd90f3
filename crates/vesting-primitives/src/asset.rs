//! Asset amounts.

use core::cmp::Ordering;

use crate::ShareType;

/// An identifier of the asset type.
///
/// The default value is the core asset.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    codec::Encode,
    codec::Decode,
    codec::MaxEncodedLen,
    scale_info::TypeInfo,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(transparent)]
pub struct AssetId(pub u64);

/// An error that can happen at [`Asset`] arithmetic.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum AssetError {
    /// The operands are of different asset types.
    #[error("asset id mismatch: {left:?} vs {right:?}")]
    IdMismatch {
        /// The asset id of the left operand.
        left: AssetId,
        /// The asset id of the right operand.
        right: AssetId,
    },
    /// An overflow occured.
    #[error("overflow")]
    Overflow,
}

/// An amount of some particular asset.
///
/// Two assets are only ordered against each other when their ids match; any comparison between
/// different asset types is `false`.
#[derive(
    Debug,
    Clone,
    Copy,
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
pub struct Asset {
    /// The amount of shares.
    pub amount: ShareType,
    /// The asset type.
    pub asset_id: AssetId,
}

impl Asset {
    /// Create a new asset amount.
    pub const fn new(amount: ShareType, asset_id: AssetId) -> Self {
        Self { amount, asset_id }
    }

    /// Zero shares of the given asset type.
    pub const fn zero(asset_id: AssetId) -> Self {
        Self::new(0, asset_id)
    }

    /// Ensure the `other` asset is of the same type as this one.
    fn ensure_same_id(&self, other: &Self) -> Result<(), AssetError> {
        if self.asset_id != other.asset_id {
            return Err(AssetError::IdMismatch {
                left: self.asset_id,
                right: other.asset_id,
            });
        }
        Ok(())
    }

    /// Add two amounts of the same asset type.
    pub fn checked_add(&self, other: &Self) -> Result<Self, AssetError> {
        self.ensure_same_id(other)?;
        let amount = self
            .amount
            .checked_add(other.amount)
            .ok_or(AssetError::Overflow)?;
        Ok(Self::new(amount, self.asset_id))
    }

    /// Subtract an amount of the same asset type.
    pub fn checked_sub(&self, other: &Self) -> Result<Self, AssetError> {
        self.ensure_same_id(other)?;
        let amount = self
            .amount
            .checked_sub(other.amount)
            .ok_or(AssetError::Overflow)?;
        Ok(Self::new(amount, self.asset_id))
    }
}

impl PartialOrd for Asset {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.asset_id != other.asset_id {
            return None;
        }
        Some(self.amount.cmp(&other.amount))
    }
}
