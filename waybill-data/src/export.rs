//! Navigation deep-link export.
//!
//! Builds a turn-by-turn handoff URL for an external navigation app: the
//! origin, the pinned destination, and the remaining active stops as
//! ordered intermediate waypoints. The engine hands the link over and
//! plays no further part in navigation.

use thiserror::Error;
use url::Url;
use waybill_core::{Origin, Stop};

/// Directions endpoint understood by the external navigation app.
const NAVIGATION_ENDPOINT: &str = "https://www.google.com/maps/dir/";

/// Errors returned by [`navigation_url`].
#[derive(Debug, Error)]
pub enum ExportError {
    /// No active stops to navigate to.
    #[error("at least one active stop is required")]
    NoStops,
    /// The origin renders as an empty string.
    #[error("origin must not be empty")]
    EmptyOrigin,
    /// The navigation endpoint could not be assembled.
    #[error("failed to build navigation link: {0}")]
    InvalidBase(#[from] url::ParseError),
}

/// Build a navigation deep link over the active stops in current order.
///
/// The last stop becomes the destination; the rest are intermediate
/// waypoints, joined in order. Percent-encoding is handled by the URL
/// query serializer.
///
/// # Errors
///
/// Returns [`ExportError::NoStops`] for an empty stop list and
/// [`ExportError::EmptyOrigin`] for an origin that renders empty.
///
/// # Examples
/// ```
/// use waybill_core::{Origin, Stop};
/// use waybill_data::export::navigation_url;
///
/// let stops = vec![
///     Stop::new("1596 Johnston St", "59", 1),
///     Stop::new("550 W Broadway", "62", 2),
/// ];
/// let url = navigation_url(&Origin::address("800 Robson St")?, &stops)?;
/// assert!(url.as_str().starts_with("https://www.google.com/maps/dir/?api=1"));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn navigation_url(origin: &Origin, active_stops: &[Stop]) -> Result<Url, ExportError> {
    let Some((destination, waypoints)) = active_stops.split_last() else {
        return Err(ExportError::NoStops);
    };
    if origin.is_empty() {
        return Err(ExportError::EmptyOrigin);
    }

    let mut url = Url::parse(NAVIGATION_ENDPOINT)?;
    let joined = waypoints
        .iter()
        .map(|stop| stop.address.as_str())
        .collect::<Vec<_>>()
        .join("|");
    {
        let mut query = url.query_pairs_mut();
        query.append_pair("api", "1");
        query.append_pair("origin", &origin.to_string());
        query.append_pair("destination", &destination.address);
        if !joined.is_empty() {
            query.append_pair("waypoints", &joined);
        }
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Coord;
    use rstest::rstest;
    use std::collections::HashMap;

    fn stops(addresses: &[&str]) -> Vec<Stop> {
        addresses
            .iter()
            .enumerate()
            .map(|(index, address)| Stop::new(*address, "59", index as u32 + 1))
            .collect()
    }

    fn query_map(url: &Url) -> HashMap<String, String> {
        url.query_pairs()
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect()
    }

    #[rstest]
    fn link_pins_the_destination_and_orders_waypoints() {
        let origin = Origin::address("800 Robson St").unwrap();
        let url = navigation_url(
            &origin,
            &stops(&["1596 Johnston St", "1081 Burrard St", "550 W Broadway"]),
        )
        .expect("link should build");

        let query = query_map(&url);
        assert_eq!(query.get("api").map(String::as_str), Some("1"));
        assert_eq!(
            query.get("origin").map(String::as_str),
            Some("800 Robson St")
        );
        assert_eq!(
            query.get("destination").map(String::as_str),
            Some("550 W Broadway")
        );
        assert_eq!(
            query.get("waypoints").map(String::as_str),
            Some("1596 Johnston St|1081 Burrard St")
        );
    }

    #[rstest]
    fn single_stop_link_omits_waypoints() {
        let origin = Origin::address("800 Robson St").unwrap();
        let url =
            navigation_url(&origin, &stops(&["550 W Broadway"])).expect("link should build");

        let query = query_map(&url);
        assert_eq!(
            query.get("destination").map(String::as_str),
            Some("550 W Broadway")
        );
        assert!(!query.contains_key("waypoints"));
    }

    #[rstest]
    fn device_origins_render_as_coordinates() {
        let origin = Origin::location(Coord {
            x: -123.1207,
            y: 49.2827,
        });
        let url = navigation_url(&origin, &stops(&["550 W Broadway"])).expect("link should build");

        let query = query_map(&url);
        assert_eq!(
            query.get("origin").map(String::as_str),
            Some("49.2827,-123.1207")
        );
    }

    #[rstest]
    fn empty_stop_list_is_rejected() {
        let origin = Origin::address("800 Robson St").unwrap();
        let err = navigation_url(&origin, &[]).expect_err("should fail");
        assert!(matches!(err, ExportError::NoStops));
    }

    #[rstest]
    fn blank_origin_is_rejected() {
        let err = navigation_url(&Origin::Address(String::new()), &stops(&["550 W Broadway"]))
            .expect_err("should fail");
        assert!(matches!(err, ExportError::EmptyOrigin));
    }
}
