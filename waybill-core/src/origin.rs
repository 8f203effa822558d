//! Trip origins and the device-location seam.
//!
//! The engine accepts either a device position or a manually entered
//! address as the start of a trip, and a manual origin may substitute for
//! geolocation at any time. Device positions arrive through the [`Locator`]
//! capability; the engine never talks to location hardware itself.

use std::fmt;

use geo::Coord;
use thiserror::Error;

/// Starting point of a trip.
///
/// Coordinates are WGS84 with `x = longitude` and `y = latitude`, matching
/// the convention used across the engine.
///
/// # Examples
/// ```
/// use waybill_core::Origin;
///
/// let origin = Origin::address("800 Robson St")?;
/// assert_eq!(origin.to_string(), "800 Robson St");
/// # Ok::<(), waybill_core::OriginError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Origin {
    /// Device location.
    Location(Coord<f64>),
    /// Manually entered address or place string.
    Address(String),
}

/// Errors returned by [`Origin::address`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OriginError {
    /// The manual origin string was empty or whitespace.
    #[error("manual origin must not be empty")]
    Empty,
}

impl Origin {
    /// Validate and construct a manually entered origin.
    ///
    /// # Errors
    ///
    /// Returns [`OriginError::Empty`] when the string is empty or
    /// whitespace-only.
    pub fn address(value: impl Into<String>) -> Result<Self, OriginError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(OriginError::Empty);
        }
        Ok(Self::Address(value))
    }

    /// Construct an origin from a device position.
    #[must_use]
    pub const fn location(position: Coord<f64>) -> Self {
        Self::Location(position)
    }

    /// Resolve the device position into an origin without applying it.
    ///
    /// # Errors
    ///
    /// Propagates [`LocateError`] from the collaborator; callers typically
    /// fall back to a manual [`Origin::address`].
    pub fn from_locator<L: Locator>(locator: &L) -> Result<Self, LocateError> {
        locator.locate().map(Self::Location)
    }

    /// Whether the origin would render as an empty string.
    ///
    /// Only reachable for an [`Origin::Address`] constructed directly from
    /// an empty literal; [`Origin::address`] rejects those at the door.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Location(_) => false,
            Self::Address(value) => value.trim().is_empty(),
        }
    }
}

impl fmt::Display for Origin {
    /// Renders as `"lat,lng"` for device positions, or the raw string for
    /// manual entries — the formats route providers and navigation links
    /// expect.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Location(position) => write!(f, "{},{}", position.y, position.x),
            Self::Address(value) => f.write_str(value),
        }
    }
}

/// Errors returned by [`Locator::locate`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocateError {
    /// The device could not produce a position.
    #[error("location unavailable: {reason}")]
    Unavailable {
        /// Failure reason reported by the geolocation collaborator.
        reason: String,
    },
}

/// Supplies the device's current position.
///
/// Implementations live outside the engine (platform geolocation, a fixed
/// test position). A failed lookup is user-actionable, not fatal: the
/// caller offers manual origin entry instead.
pub trait Locator {
    /// Return the current WGS84 position (`x = longitude`, `y = latitude`).
    ///
    /// # Errors
    ///
    /// Returns [`LocateError::Unavailable`] with the collaborator's reason
    /// when no position can be produced.
    fn locate(&self) -> Result<Coord<f64>, LocateError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn manual_origin_rejects_blank_input() {
        assert_eq!(Origin::address("   "), Err(OriginError::Empty));
        assert_eq!(Origin::address(""), Err(OriginError::Empty));
    }

    #[rstest]
    fn location_renders_latitude_first() {
        let origin = Origin::location(Coord {
            x: -123.1207,
            y: 49.2827,
        });
        assert_eq!(origin.to_string(), "49.2827,-123.1207");
    }

    #[rstest]
    fn manual_origin_renders_verbatim() {
        let origin = Origin::address("800 Robson St").expect("valid origin");
        assert_eq!(origin.to_string(), "800 Robson St");
        assert!(!origin.is_empty());
    }

    #[rstest]
    fn from_locator_wraps_the_position() {
        let locator = crate::test_support::FixedLocator::at(Coord { x: 1.0, y: 2.0 });
        let origin = Origin::from_locator(&locator).expect("position available");
        assert_eq!(origin, Origin::Location(Coord { x: 1.0, y: 2.0 }));
    }

    #[rstest]
    fn from_locator_propagates_unavailability() {
        let locator = crate::test_support::UnavailableLocator::new("permission denied");
        let err = Origin::from_locator(&locator).expect_err("no position");
        assert_eq!(
            err,
            LocateError::Unavailable {
                reason: "permission denied".to_owned(),
            }
        );
    }
}
