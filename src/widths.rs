//! Standard breakpoint widths and the width policy.
//!
//! This is the one contract the generator and the selector share. The
//! generator emits a variant for every width in [`StandardWidths::width_list`];
//! the renderer asks [`StandardWidths::select`] which of those to request.
//! Both are driven by the same [`WidthPolicy`], so a width the selector can
//! return is always a width the generator produced (with one accepted
//! exception at the low end, see below).
//!
//! ## Policies
//!
//! | Native width | `strict` | `native-aware` |
//! |---|---|---|
//! | ≥ largest (e.g. 3000) | 2400 | 2400 |
//! | exact standard (e.g. 1080) | 1080 | 1080 |
//! | between breakpoints (e.g. 2048) | 1600 | 2048 |
//! | below smallest (e.g. 500) | 640 | 640 |
//!
//! The last row is the accepted over-request: no variant exists for a source
//! narrower than the smallest breakpoint (upscaling is never done), but the
//! selector still has to return *something*.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Default breakpoints, descending.
pub const DEFAULT_STANDARD_WIDTHS: [u32; 5] = [2400, 1600, 1080, 750, 640];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WidthsError {
    #[error("standard widths must not be empty")]
    Empty,
    #[error("standard widths must be non-zero")]
    Zero,
    #[error("duplicate standard width: {0}")]
    Duplicate(u32),
}

/// Which widths exist for a given native width.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum WidthPolicy {
    /// Only standard breakpoints.
    #[default]
    Strict,
    /// Standard breakpoints plus the native width itself when it falls
    /// strictly between two breakpoints.
    NativeAware,
}

impl WidthPolicy {
    /// The extra native-width variant this policy admits, if any.
    fn native_extra(self, widths: &StandardWidths, native_width: u32) -> Option<u32> {
        match self {
            WidthPolicy::Strict => None,
            WidthPolicy::NativeAware => (native_width > widths.smallest()
                && native_width < widths.largest()
                && !widths.contains(native_width))
            .then_some(native_width),
        }
    }
}

impl fmt::Display for WidthPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WidthPolicy::Strict => f.write_str("strict"),
            WidthPolicy::NativeAware => f.write_str("native-aware"),
        }
    }
}

/// Strictly decreasing, non-empty list of breakpoint widths.
///
/// Input order doesn't matter; [`StandardWidths::new`] sorts descending and
/// rejects empty lists, zeros, and duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<u32>", into = "Vec<u32>")]
pub struct StandardWidths(Vec<u32>);

impl StandardWidths {
    pub fn new(widths: impl Into<Vec<u32>>) -> Result<Self, WidthsError> {
        let mut widths = widths.into();
        if widths.is_empty() {
            return Err(WidthsError::Empty);
        }
        if widths.contains(&0) {
            return Err(WidthsError::Zero);
        }
        widths.sort_unstable_by(|a, b| b.cmp(a));
        if let Some(pair) = widths.windows(2).find(|pair| pair[0] == pair[1]) {
            return Err(WidthsError::Duplicate(pair[0]));
        }
        Ok(Self(widths))
    }

    /// Breakpoints, descending.
    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }

    pub fn largest(&self) -> u32 {
        self.0[0]
    }

    pub fn smallest(&self) -> u32 {
        self.0[self.0.len() - 1]
    }

    pub fn contains(&self, width: u32) -> bool {
        self.0.contains(&width)
    }

    /// Pick the variant width to request for an image of `native_width`.
    ///
    /// Total over its input and allocation-free. Always equal to the last
    /// element of [`width_list`](Self::width_list), or the smallest
    /// breakpoint when that list is empty.
    pub fn select(&self, native_width: u32, policy: WidthPolicy) -> u32 {
        if let Some(native) = policy.native_extra(self, native_width) {
            return native;
        }
        self.0
            .iter()
            .copied()
            .find(|&w| w <= native_width)
            .unwrap_or_else(|| self.smallest())
    }

    /// Every width that exists for an image of `native_width`, ascending.
    ///
    /// Empty when the image is narrower than the smallest breakpoint.
    pub fn width_list(&self, native_width: u32, policy: WidthPolicy) -> Vec<u32> {
        let mut list: Vec<u32> = self
            .0
            .iter()
            .rev()
            .copied()
            .filter(|&w| w <= native_width)
            .collect();
        // The native extra is above every admitted breakpoint, so order holds.
        list.extend(policy.native_extra(self, native_width));
        list
    }
}

impl Default for StandardWidths {
    fn default() -> Self {
        Self(DEFAULT_STANDARD_WIDTHS.to_vec())
    }
}

impl TryFrom<Vec<u32>> for StandardWidths {
    type Error = WidthsError;

    fn try_from(widths: Vec<u32>) -> Result<Self, Self::Error> {
        Self::new(widths)
    }
}

impl From<StandardWidths> for Vec<u32> {
    fn from(widths: StandardWidths) -> Self {
        widths.0
    }
}
