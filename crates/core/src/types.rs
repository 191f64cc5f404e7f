//! Shared scalar types: timestamps, fixed-point credits, speed multipliers.

use std::fmt;
use std::time::Duration;

use serde::{Serialize, Serializer};

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Micro-credits per whole credit.
pub const MICROS_PER_CREDIT: u64 = 1_000_000;

/// Speed multiplier denominator (multipliers are stored in hundredths).
const SPEED_SCALE: u64 = 100;

// ---------------------------------------------------------------------------
// Credits
// ---------------------------------------------------------------------------

/// A fixed-point reward amount with six decimal places.
///
/// Stored as integer micro-credits so that settled rewards are exact:
/// `0.8 * 0.3` is `0.24`, not `0.24000000000000002`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Credits(u64);

impl Credits {
    pub const ZERO: Credits = Credits(0);

    pub const fn from_micros(micros: u64) -> Self {
        Self(micros)
    }

    /// Build from thousandths of a credit, e.g. `from_millis(800)` is `0.8`.
    pub const fn from_millis(millis: u64) -> Self {
        Self(millis * 1_000)
    }

    pub const fn micros(self) -> u64 {
        self.0
    }

    /// Scale by a device speed multiplier, truncating below one micro-credit.
    pub const fn scale(self, speed: SpeedMultiplier) -> Self {
        Self(self.0 * speed.0 as u64 / SPEED_SCALE)
    }

    pub const fn saturating_add(self, other: Credits) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    /// Full six-digit rendering, e.g. `0.240000`. Used on the wire.
    pub fn to_fixed_string(self) -> String {
        format!(
            "{}.{:06}",
            self.0 / MICROS_PER_CREDIT,
            self.0 % MICROS_PER_CREDIT
        )
    }
}

impl std::iter::Sum for Credits {
    fn sum<I: Iterator<Item = Credits>>(iter: I) -> Self {
        iter.fold(Credits::ZERO, Credits::saturating_add)
    }
}

/// Human rendering: at least two decimals, trailing zeros trimmed beyond that.
impl fmt::Display for Credits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / MICROS_PER_CREDIT;
        let frac = format!("{:06}", self.0 % MICROS_PER_CREDIT);
        let trimmed = frac.trim_end_matches('0');
        let frac = if trimmed.len() < 2 { &frac[..2] } else { trimmed };
        write!(f, "{whole}.{frac}")
    }
}

impl Serialize for Credits {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_fixed_string())
    }
}

// ---------------------------------------------------------------------------
// SpeedMultiplier
// ---------------------------------------------------------------------------

/// Relative device speed in hundredths (`SpeedMultiplier(120)` is 1.2x).
///
/// Always non-zero; catalog entries are the only constructors in practice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SpeedMultiplier(u32);

impl SpeedMultiplier {
    /// Panics at compile time (in const contexts) if `hundredths` is zero.
    pub const fn from_hundredths(hundredths: u32) -> Self {
        assert!(hundredths > 0, "speed multiplier must be positive");
        Self(hundredths)
    }

    pub const fn hundredths(self) -> u32 {
        self.0
    }

    pub fn as_f64(self) -> f64 {
        self.0 as f64 / SPEED_SCALE as f64
    }

    /// Divide a base duration by this multiplier: faster devices wait less.
    pub fn scale_wait(self, base: Duration) -> Duration {
        let millis = base.as_millis() as u64 * SPEED_SCALE / self.0 as u64;
        Duration::from_millis(millis)
    }
}

impl fmt::Display for SpeedMultiplier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}x", self.as_f64())
    }
}

impl Serialize for SpeedMultiplier {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_f64())
    }
}
