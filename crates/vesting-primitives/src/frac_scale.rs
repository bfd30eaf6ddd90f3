//! Scaling of amounts by a fraction in a wide intermediate type.

use core::marker::PhantomData;

/// An error that can happen at [`FracScale`].
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum FracScaleError {
    /// An overflow occured.
    #[error("overflow")]
    Overflow,
    /// A division by zero occured.
    #[error("division by zero")]
    DivisionByZero,
    /// Convertion from the internal computations type to the value type failed.
    #[error("type conversion")]
    Conversion,
}

/// Fractional scaler.
///
/// Effectively represent multiplication of the value to a fraction operation: x * (a/b),
/// rounded down.
pub trait FracScale {
    /// The value type to scale.
    type Value;
    /// The type used for the fraction nominator and denominator.
    type FracPart;

    /// Compute `value` * (`nom` / `denom`).
    fn frac_scale(
        value: &Self::Value,
        nom: &Self::FracPart,
        denom: &Self::FracPart,
    ) -> Result<Self::Value, FracScaleError>;
}

/// A scaler that upcasts everything to `T` before multiplying, and only narrows the final result.
///
/// With `T = u128` and 64-bit operands the product can never overflow.
pub struct SimpleFracScaler<T, Value, FracPart>(PhantomData<(T, Value, FracPart)>);

/// The scaler used for share amounts and second counts.
pub type WideFracScaler = SimpleFracScaler<u128, u64, u64>;

impl<T, Value, FracPart> FracScale for SimpleFracScaler<T, Value, FracPart>
where
    T: num_traits::CheckedMul + num_traits::CheckedDiv + num_traits::Zero,
    Value: Into<T> + Copy + num_traits::Zero,
    FracPart: Into<T> + Copy,
    T: TryInto<Value>,
{
    type Value = Value;
    type FracPart = FracPart;

    fn frac_scale(
        value: &Self::Value,
        nom: &Self::FracPart,
        denom: &Self::FracPart,
    ) -> Result<Self::Value, FracScaleError> {
        let value = (*value).into();
        let nom = (*nom).into();

        let upscaled = value.checked_mul(&nom).ok_or(FracScaleError::Overflow)?;
        if upscaled.is_zero() {
            return Ok(num_traits::Zero::zero());
        }

        let denom = (*denom).into();
        let downscaled = upscaled
            .checked_div(&denom)
            .ok_or(FracScaleError::DivisionByZero)?;
        downscaled
            .try_into()
            .map_err(|_| FracScaleError::Conversion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MAX_SHARE_SUPPLY;

    #[test]
    fn narrow_intermediate_overflows() {
        let max = u8::MAX;
        let tests = [
            (0, 1, 1, Ok(0)),
            (max, 1, 1, Ok(max)),
            (0xff, 1, 2, Ok(127)),
            (2, 1, 3, Ok(0)),
            (100, 0, 0, Ok(0)),
            (10, 10, 0, Err(FracScaleError::DivisionByZero)),
            (max, max, max, Err(FracScaleError::Overflow)),
            (max, 2, 1, Err(FracScaleError::Overflow)),
        ];

        for (value, nom, denom, expected) in tests {
            let actual = <SimpleFracScaler<u8, u8, u8>>::frac_scale(&value, &nom, &denom);
            assert_eq!(actual, expected, "u8 {} {} {}", value, nom, denom);
        }
    }

    /// This test verifies that the wide scaler handles the largest share amounts multiplied by
    /// the longest second counts.
    #[test]
    fn wide_scaler_share_amounts() {
        let max_shares = MAX_SHARE_SUPPLY as u64;
        let tests = [
            (1000, 100, 1000, Ok(100)),
            (1000, 500, 1000, Ok(500)),
            (1000, 1, 3, Ok(333)),
            (2, 1, 3, Ok(0)),
            (1000, 2, 3, Ok(666)),
            (max_shares, u64::from(u32::MAX), u64::from(u32::MAX), Ok(max_shares)),
            (max_shares, u64::from(u32::MAX) - 1, u64::from(u32::MAX), Ok(max_shares - 232_831)),
            (u64::MAX, u64::MAX, u64::MAX, Ok(u64::MAX)),
            (1000, 1, 0, Err(FracScaleError::DivisionByZero)),
            (u64::MAX, 2, 1, Err(FracScaleError::Conversion)),
        ];

        for (value, nom, denom, expected) in tests {
            let actual = WideFracScaler::frac_scale(&value, &nom, &denom);
            assert_eq!(actual, expected, "u128 u64 {} {} {}", value, nom, denom);
        }
    }

    #[test]
    fn biguint_intermediate() {
        let tests = [
            (u128::MAX, u64::MAX, u64::MAX, Ok(u128::MAX)),
            (2, u64::MAX - 1, u64::MAX, Ok(1)),
            (u128::MAX, 2, 1, Err(FracScaleError::Conversion)),
        ];

        for (value, nom, denom, expected) in tests {
            let actual =
                <SimpleFracScaler<num::BigUint, u128, u64>>::frac_scale(&value, &nom, &denom);
            assert_eq!(actual, expected, "BigUint u128 u64 {} {} {}", value, nom, denom);
        }
    }
}
