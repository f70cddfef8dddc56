use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// Factor applied to the global color for cells that belong to the
/// previous or next month.
pub const ADJACENT_MONTH_TINT: f64 = 0.7;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ColorParseError {
    #[error("expected 4 color channels, found {0}")]
    ChannelCount(usize),
    #[error("invalid color channel {0:?}")]
    InvalidChannel(String),
    #[error("color channel {0} is outside 0.0..=1.0")]
    OutOfRange(f64),
}

/// RGBA color with every channel in `0.0..=1.0`.
///
/// Stored in the table service as `"(r, g, b, a)"` with four decimals per
/// channel, which is also the serde representation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::new(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Rgba = Rgba::new(0.0, 0.0, 0.0, 1.0);
    pub const DEFAULT_GLOBAL: Rgba = Rgba::new(0.5, 0.5, 0.5, 1.0);

    pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    pub fn parse(raw: &str) -> Result<Self, ColorParseError> {
        let trimmed = raw.trim();
        let inner = trimmed
            .strip_prefix('(')
            .and_then(|rest| rest.strip_suffix(')'))
            .unwrap_or(trimmed);
        let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
        if parts.len() != 4 {
            return Err(ColorParseError::ChannelCount(parts.len()));
        }
        let mut channels = [0.0_f64; 4];
        for (slot, part) in channels.iter_mut().zip(parts) {
            let value: f64 = part
                .parse()
                .map_err(|_| ColorParseError::InvalidChannel(part.to_string()))?;
            if !value.is_finite() {
                return Err(ColorParseError::InvalidChannel(part.to_string()));
            }
            if !(0.0..=1.0).contains(&value) {
                return Err(ColorParseError::OutOfRange(value));
            }
            *slot = value;
        }
        Ok(Self::new(channels[0], channels[1], channels[2], channels[3]))
    }

    /// Resolves a color column read from the store.
    ///
    /// Absent or blank values inherit `fallback`; anything that fails to
    /// parse becomes opaque white.
    pub fn resolve_stored(raw: Option<&str>, fallback: Rgba) -> Rgba {
        match raw.map(str::trim) {
            None | Some("") => fallback,
            Some(value) => Rgba::parse(value).unwrap_or_else(|err| {
                warn!("Unreadable stored color {:?}: {}", value, err);
                Rgba::WHITE
            }),
        }
    }

    pub fn to_storage_string(&self) -> String {
        format!(
            "({:.4}, {:.4}, {:.4}, {:.4})",
            self.r, self.g, self.b, self.a
        )
    }

    pub fn luma(&self) -> f64 {
        0.299 * self.r + 0.587 * self.g + 0.114 * self.b
    }

    /// Black on bright backgrounds, white otherwise.
    pub fn text_color(&self) -> Rgba {
        if self.luma() > 0.5 {
            Rgba::BLACK
        } else {
            Rgba::WHITE
        }
    }

    pub fn tinted(&self, factor: f64) -> Rgba {
        Rgba::new(self.r * factor, self.g * factor, self.b * factor, self.a)
    }

    pub fn complement(&self) -> Rgba {
        Rgba::new(1.0 - self.r, 1.0 - self.g, 1.0 - self.b, self.a)
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Rgba::DEFAULT_GLOBAL
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_storage_string())
    }
}

impl std::str::FromStr for Rgba {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Rgba::parse(s)
    }
}

impl TryFrom<String> for Rgba {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Rgba::parse(&value)
    }
}

impl From<Rgba> for String {
    fn from(color: Rgba) -> Self {
        color.to_storage_string()
    }
}
