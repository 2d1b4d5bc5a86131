//! Count-to-color banding.

use std::str::FromStr;

use crate::{Error, Result};

/// One band: counts strictly below `below` use `color`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Band {
    pub below: u32,
    pub color: String,
}

/// Ordered color policy for cell fills.
///
/// Zero always maps to `empty`. Any other count takes the first band whose
/// `below` exceeds it, so a count equal to a threshold lands in the higher
/// band. Counts past the last threshold use `max`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorBand {
    empty: String,
    bands: Vec<Band>,
    max: String,
}

impl ColorBand {
    /// Build a policy, rejecting thresholds that are not strictly increasing
    /// or that would shadow the empty color.
    pub fn new(empty: impl Into<String>, bands: Vec<Band>, max: impl Into<String>) -> Result<Self> {
        let mut previous = 1;
        for band in &bands {
            if band.below <= previous {
                return Err(Error::Validation(format!(
                    "band threshold {} must be greater than {}",
                    band.below, previous
                )));
            }
            previous = band.below;
        }

        Ok(Self {
            empty: empty.into(),
            bands,
            max: max.into(),
        })
    }

    /// GitHub contribution colors: 0, 1-2, 3-5, 6-9, 10+.
    pub fn github() -> Self {
        Self::preset("#ebedf0", &[(3, "#9be9a8"), (6, "#40c463"), (10, "#30a14e")], "#216e39")
    }

    /// Older GitHub palette: 0, 1, 2-3, 4-6, 7+.
    pub fn classic() -> Self {
        Self::preset("#ebedf0", &[(2, "#c6e48b"), (4, "#7bc96f"), (7, "#239a3b")], "#196127")
    }

    fn preset(empty: &str, bands: &[(u32, &str)], max: &str) -> Self {
        Self {
            empty: empty.to_string(),
            bands: bands
                .iter()
                .map(|&(below, color)| Band {
                    below,
                    color: color.to_string(),
                })
                .collect(),
            max: max.to_string(),
        }
    }

    pub fn color_for(&self, count: u32) -> &str {
        if count == 0 {
            return &self.empty;
        }
        self.bands
            .iter()
            .find(|band| count < band.below)
            .map(|band| band.color.as_str())
            .unwrap_or(&self.max)
    }
}

impl Default for ColorBand {
    fn default() -> Self {
        Self::github()
    }
}

impl FromStr for ColorBand {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "github" => Ok(Self::github()),
            "classic" => Ok(Self::classic()),
            other => Err(Error::Config(format!("unknown palette '{}'", other))),
        }
    }
}
