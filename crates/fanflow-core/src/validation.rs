//! Validation utilities shared between the service and its views

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::CoreError;

/// Upper bound of the report slider
pub const MAX_WAIT_MINUTES: u32 = 45;
/// Step of the report slider
pub const WAIT_STEP_MINUTES: u32 = 5;
/// Value the report slider starts at
pub const DEFAULT_REPORT_MINUTES: u32 = 5;

/// A reported wait time, always within `0..=MAX_WAIT_MINUTES`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct WaitMinutes(u32);

impl WaitMinutes {
    /// Snaps any integer to the nearest slider step, then clamps it into the accepted range
    pub fn clamped(minutes: i64) -> Self {
        let step = i64::from(WAIT_STEP_MINUTES);
        let snapped = minutes.saturating_add(step / 2).div_euclid(step) * step;
        Self(snapped.clamp(0, i64::from(MAX_WAIT_MINUTES)) as u32)
    }

    pub fn new(minutes: u32) -> Result<Self, CoreError> {
        if minutes > MAX_WAIT_MINUTES {
            return Err(CoreError::Validation(format!(
                "wait of {} minutes exceeds the {} minute maximum",
                minutes, MAX_WAIT_MINUTES
            )));
        }
        Ok(Self(minutes))
    }

    pub fn get(&self) -> u32 {
        self.0
    }
}

impl Default for WaitMinutes {
    fn default() -> Self {
        Self(DEFAULT_REPORT_MINUTES)
    }
}

impl TryFrom<u32> for WaitMinutes {
    type Error = CoreError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        WaitMinutes::new(value)
    }
}

impl From<WaitMinutes> for u32 {
    fn from(value: WaitMinutes) -> Self {
        value.0
    }
}

impl fmt::Display for WaitMinutes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validate that a configured probability lies within `[0, 1]`
pub fn validate_probability(name: &str, value: f64) -> Result<f64, CoreError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(CoreError::Validation(format!(
            "{} must be between 0 and 1, got {}",
            name, value
        )));
    }
    Ok(value)
}
