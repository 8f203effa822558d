//! Plan command implementation for the Waybill CLI.

use std::io::BufReader;

use camino::Utf8PathBuf;
use clap::Parser;
use geo::Coord;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use waybill_core::{
    IngestOptions, NullVisualizer, Origin, RecognizedStop, RefreshOutcome, RouteProvider,
    RouteVisualizer, TripPlanner,
};
use waybill_data::export::navigation_url;
use waybill_data::routing::{HttpRouteProvider, HttpRouteProviderConfig};

use crate::{
    ARG_ORIGIN, ARG_ORIGIN_LAT, ARG_ORIGIN_LNG, ARG_PLAN_STOPS, ARG_ROUTE_BASE_URL, CliError,
    ENV_PLAN_ORIGIN, ENV_PLAN_STOPS, write_json,
};

/// CLI arguments for the `plan` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Ingest a JSON file of recognized stops, request an \
                 optimized driving order from the directions service, and \
                 write the resulting itinerary as JSON. The origin comes \
                 from --origin (a free-text address) or from the \
                 --origin-lat/--origin-lng pair.",
    about = "Optimize a stops file into a driving itinerary"
)]
#[ortho_config(prefix = "WAYBILL")]
pub(crate) struct PlanArgs {
    /// Path to a JSON file of recognized stops.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) stops: Option<Utf8PathBuf>,
    /// Manual origin address, e.g. "800 Robson St".
    #[arg(long = ARG_ORIGIN, value_name = "address")]
    #[serde(default)]
    pub(crate) origin: Option<String>,
    /// Device latitude; pair with --origin-lng.
    #[arg(long = ARG_ORIGIN_LAT, value_name = "deg")]
    #[serde(default)]
    pub(crate) origin_lat: Option<f64>,
    /// Device longitude; pair with --origin-lat.
    #[arg(long = ARG_ORIGIN_LNG, value_name = "deg")]
    #[serde(default)]
    pub(crate) origin_lng: Option<f64>,
    /// Base URL of the directions service.
    #[arg(long = ARG_ROUTE_BASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) route_base_url: Option<String>,
    /// Base value for synthesized delivery numbers.
    #[arg(long, value_name = "n")]
    #[serde(default)]
    pub(crate) number_offset: Option<u32>,
    /// Include a navigation deep link in the itinerary.
    #[arg(long)]
    #[serde(default)]
    pub(crate) link: bool,
    /// Write the itinerary JSON here instead of stdout.
    #[arg(long, value_name = "path")]
    #[serde(default)]
    pub(crate) out: Option<Utf8PathBuf>,
}

impl PlanArgs {
    pub(crate) fn into_config(self) -> Result<PlanConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        PlanConfig::try_from(merged)
    }
}

/// Resolved `plan` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PlanConfig {
    /// Path to the stops JSON file.
    pub(crate) stops_path: Utf8PathBuf,
    /// Trip origin.
    pub(crate) origin: Origin,
    /// Base URL of the directions service.
    pub(crate) route_base_url: String,
    /// Ingestion policy.
    pub(crate) ingest_options: IngestOptions,
    /// Whether to include a navigation deep link.
    pub(crate) link: bool,
    /// Optional output path.
    pub(crate) out: Option<Utf8PathBuf>,
}

impl TryFrom<PlanArgs> for PlanConfig {
    type Error = CliError;

    fn try_from(args: PlanArgs) -> Result<Self, Self::Error> {
        let stops_path = args.stops.ok_or(CliError::MissingArgument {
            field: ARG_PLAN_STOPS,
            env: ENV_PLAN_STOPS,
        })?;

        let origin = resolve_origin(args.origin, args.origin_lat, args.origin_lng)?;

        let default_base_url = HttpRouteProviderConfig::default().base_url;
        let route_base_url = args.route_base_url.unwrap_or(default_base_url);

        let ingest_options = args.number_offset.map_or_else(IngestOptions::default, |offset| {
            IngestOptions {
                synthesized_number_offset: offset,
            }
        });

        Ok(Self {
            stops_path,
            origin,
            route_base_url,
            ingest_options,
            link: args.link,
            out: args.out,
        })
    }
}

/// Resolve the origin flags into a single [`Origin`].
fn resolve_origin(
    origin: Option<String>,
    lat: Option<f64>,
    lng: Option<f64>,
) -> Result<Origin, CliError> {
    match (origin, lat, lng) {
        (Some(address), None, None) => Ok(Origin::address(address)?),
        (None, Some(lat), Some(lng)) => Ok(Origin::location(Coord { x: lng, y: lat })),
        (None, None, None) => Err(CliError::MissingArgument {
            field: ARG_ORIGIN,
            env: ENV_PLAN_ORIGIN,
        }),
        _ => Err(CliError::AmbiguousOrigin),
    }
}

pub(crate) fn run(args: PlanArgs) -> Result<(), CliError> {
    let config = args.into_config()?;
    let entries = read_stops(&config.stops_path)?;

    let provider = HttpRouteProvider::with_config(HttpRouteProviderConfig::new(
        config.route_base_url.clone(),
    ))
    .map_err(|source| CliError::BuildRouteProvider {
        base_url: config.route_base_url.clone(),
        source,
    })?;

    let mut planner = TripPlanner::new(provider, NullVisualizer)
        .with_ingest_options(config.ingest_options.clone());
    planner.set_origin(config.origin.clone())?;
    let outcome = planner.ingest(entries)?;
    if outcome != RefreshOutcome::Routed {
        return Err(CliError::EmptyManifest);
    }

    let navigation_link = if config.link {
        let url = navigation_url(&config.origin, &planner.active_stops())?;
        Some(url.to_string())
    } else {
        None
    };

    let doc = build_doc(&planner, navigation_link);
    write_json(&doc, config.out.as_deref())
}

fn read_stops(path: &Utf8PathBuf) -> Result<Vec<RecognizedStop>, CliError> {
    let file = std::fs::File::open(path.as_std_path()).map_err(|source| CliError::ReadInput {
        path: path.clone(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| CliError::ParseStops {
        path: path.clone(),
        source,
    })
}

/// Itinerary document written by `waybill plan`.
#[derive(Debug, Serialize)]
pub(crate) struct ItineraryDoc {
    /// Trip origin as rendered for the provider.
    pub(crate) origin: String,
    /// Active stops in optimized driving order.
    pub(crate) stops: Vec<ItineraryStop>,
    /// Per-leg metrics in driving order.
    pub(crate) legs: Vec<ItineraryLeg>,
    /// Trip totals.
    pub(crate) summary: Option<ItinerarySummary>,
    /// Navigation deep link, when requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) navigation_link: Option<String>,
}

/// One stop of the itinerary.
#[derive(Debug, Serialize)]
pub(crate) struct ItineraryStop {
    /// 1-based driving position.
    pub(crate) order: u32,
    /// Manifest label.
    pub(crate) delivery_number: String,
    /// Delivery address.
    pub(crate) address: String,
    /// Whether the stop is already done.
    pub(crate) completed: bool,
}

/// One leg of the itinerary.
#[derive(Debug, Serialize)]
pub(crate) struct ItineraryLeg {
    /// Driving distance in metres.
    pub(crate) distance_meters: u64,
    /// Driving time in seconds.
    pub(crate) duration_seconds: u64,
    /// Resolved end address.
    pub(crate) end_address: String,
    /// End latitude in degrees.
    pub(crate) end_lat: f64,
    /// End longitude in degrees.
    pub(crate) end_lng: f64,
}

/// Trip totals as shown to the courier.
#[derive(Debug, Serialize)]
pub(crate) struct ItinerarySummary {
    /// Total distance in kilometres, one decimal.
    pub(crate) distance_km: f64,
    /// Total duration, `"{h}h {m}min"`.
    pub(crate) duration: String,
    /// Whether the figures are a stop-count estimate.
    pub(crate) estimated: bool,
}

pub(crate) fn build_doc<P, V>(
    planner: &TripPlanner<P, V>,
    navigation_link: Option<String>,
) -> ItineraryDoc
where
    P: RouteProvider,
    V: RouteVisualizer,
{
    let stops = planner
        .active_stops()
        .into_iter()
        .map(|stop| ItineraryStop {
            order: stop.order,
            delivery_number: stop.delivery_number,
            address: stop.address,
            completed: stop.completed,
        })
        .collect();

    let legs = planner
        .last_route()
        .map(|route| {
            route
                .legs
                .iter()
                .map(|leg| ItineraryLeg {
                    distance_meters: leg.distance_meters,
                    duration_seconds: leg.duration.as_secs(),
                    end_address: leg.end_address.clone(),
                    end_lat: leg.end_location.y,
                    end_lng: leg.end_location.x,
                })
                .collect()
        })
        .unwrap_or_default();

    let summary = planner.summary().map(|summary| ItinerarySummary {
        distance_km: summary.distance_km(),
        duration: summary.duration_label(),
        estimated: summary.is_estimate(),
    });

    ItineraryDoc {
        origin: planner
            .origin()
            .map(ToString::to_string)
            .unwrap_or_default(),
        stops,
        legs,
        summary,
        navigation_link,
    }
}
