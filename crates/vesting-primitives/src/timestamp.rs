//! Second-granularity points in time.

use core::ops::Sub;

/// A point in time, in seconds since the Unix epoch.
///
/// The vesting logic never reads a clock; every timestamp is supplied by the caller.
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
pub struct Timestamp(pub u32);

impl Timestamp {
    /// Create a timestamp from seconds since the Unix epoch.
    pub const fn from_secs(secs: u32) -> Self {
        Self(secs)
    }

    /// The seconds since the Unix epoch.
    pub const fn secs(&self) -> u32 {
        self.0
    }
}

impl Sub for Timestamp {
    /// A signed amount of seconds.
    type Output = i64;

    fn sub(self, rhs: Self) -> Self::Output {
        i64::from(self.0) - i64::from(rhs.0)
    }
}
