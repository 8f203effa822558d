//! Trip orchestration: mutations, re-optimization, and reconciliation.
//!
//! [`TripPlanner`] is the single writer of the stop set. Every mutation
//! flows through one explicit code path that requests a fresh optimization
//! for the active subset, applies the returned visiting order by
//! identifier, and recomputes the trip summary. There are no timers and no
//! implicit recomputation: a mutation either refreshes the route
//! immediately or, when it was a no-op, does nothing at all.
//!
//! The planner is single-threaded by construction — every method takes
//! `&mut self`, so hosts on multi-threaded runtimes must serialize access
//! themselves (a mutex or a single-owner task). The only suspending
//! operation is the provider round trip, hidden behind the synchronous
//! [`RouteProvider`] trait. Hosts that drive the provider out of band can
//! still apply results safely through the [`TripPlanner::snapshot`] /
//! [`TripPlanner::apply_route_result`] seam: results from a superseded
//! generation are discarded, and identifier-based reconciliation tolerates
//! stops completed or removed while the request was in flight.

use log::debug;

use crate::ingest::{IngestOptions, IngestReport, RecognizedStop, map_recognized};
use crate::manifest::Manifest;
use crate::origin::Origin;
use crate::provider::{RouteError, RouteProvider, RouteRequest};
use crate::route::RouteResult;
use crate::stop::{Stop, StopId};
use crate::summary::TripSummary;
use crate::visualize::RouteVisualizer;

/// Result of a refresh pass over the active stop set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The provider returned a route; order, summary, and visuals updated.
    Routed,
    /// The active subset is empty; route state and summary were cleared.
    Cleared,
    /// No origin is known yet, so nothing was requested. User-actionable,
    /// not an error: supply a device position or a manual origin.
    AwaitingOrigin,
    /// The mutation referenced an unknown stop or changed nothing, so no
    /// optimization was issued.
    NoChange,
}

/// Snapshot of the active subset an optimization request was built from.
///
/// Captured before the provider round trip so that a response completing
/// after further mutations can still be applied safely — or discarded,
/// when the manifest generation has moved on.
#[derive(Debug, Clone)]
pub struct RouteSnapshot {
    generation: u64,
    active: Vec<Stop>,
}

impl RouteSnapshot {
    /// The active stops at capture time, ascending by order.
    #[must_use]
    pub fn active(&self) -> &[Stop] {
        &self.active
    }
}

/// Owns the manifest and keeps it consistent with the route provider.
///
/// # Examples
/// ```
/// use waybill_core::{
///     NullVisualizer, Origin, RecognizedStop, RefreshOutcome, RouteError,
///     RouteProvider, RouteRequest, RouteResult, TripPlanner,
/// };
///
/// struct KeepOrder;
///
/// impl RouteProvider for KeepOrder {
///     fn optimize(&self, request: &RouteRequest) -> Result<RouteResult, RouteError> {
///         request.validate()?;
///         let order = (0..request.waypoints().len()).collect();
///         Ok(RouteResult::new(order, Vec::new()))
///     }
/// }
///
/// let mut planner = TripPlanner::new(KeepOrder, NullVisualizer);
/// planner.set_origin(Origin::address("800 Robson St")?)?;
/// let outcome = planner.ingest(vec![RecognizedStop {
///     delivery_number: None,
///     address: "1596 Johnston St".to_owned(),
/// }])?;
/// assert_eq!(outcome, RefreshOutcome::Routed);
/// assert_eq!(planner.active_stops().len(), 1);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct TripPlanner<P, V> {
    manifest: Manifest,
    origin: Option<Origin>,
    last_route: Option<RouteResult>,
    summary: Option<TripSummary>,
    generation: u64,
    ingest_options: IngestOptions,
    provider: P,
    visualizer: V,
}

impl<P, V> TripPlanner<P, V>
where
    P: RouteProvider,
    V: RouteVisualizer,
{
    /// Construct a planner with an empty manifest and no origin.
    #[must_use]
    pub fn new(provider: P, visualizer: V) -> Self {
        Self {
            manifest: Manifest::new(),
            origin: None,
            last_route: None,
            summary: None,
            generation: 0,
            ingest_options: IngestOptions::default(),
            provider,
            visualizer,
        }
    }

    /// Replace the ingestion policy.
    #[must_use]
    pub fn with_ingest_options(mut self, options: IngestOptions) -> Self {
        self.ingest_options = options;
        self
    }

    /// Set the trip origin and refresh the route.
    ///
    /// A manual origin may replace a device position at any time, and the
    /// other way round.
    ///
    /// # Errors
    ///
    /// Propagates provider failures from the refresh; the manifest is left
    /// unchanged by those.
    pub fn set_origin(&mut self, origin: Origin) -> Result<RefreshOutcome, RouteError> {
        self.origin = Some(origin);
        self.refresh()
    }

    /// Replace the stop set with freshly recognized entries and refresh.
    ///
    /// The previous stops are discarded entirely. A placeholder summary is
    /// derived from the stop count before the provider is asked, so the
    /// caller always has figures to show; the refresh replaces them with
    /// provider-confirmed ones on success.
    ///
    /// # Errors
    ///
    /// Propagates provider failures from the refresh. The new stops and
    /// the placeholder summary survive such a failure.
    pub fn ingest(
        &mut self,
        entries: Vec<RecognizedStop>,
    ) -> Result<RefreshOutcome, RouteError> {
        let IngestReport {
            stops,
            skipped_blank,
        } = map_recognized(entries, &self.ingest_options);
        if skipped_blank > 0 {
            debug!("Ingestion skipped {skipped_blank} blank stop lines");
        }

        self.touch();
        let count = stops.len();
        self.manifest.replace_all(stops);
        self.last_route = None;
        self.summary = (count > 0).then(|| TripSummary::estimate(count));
        self.refresh()
    }

    /// Flip a stop's completion flag and refresh.
    ///
    /// # Errors
    ///
    /// Propagates provider failures from the refresh; unknown identifiers
    /// return [`RefreshOutcome::NoChange`] without touching the provider.
    pub fn toggle_completed(&mut self, id: StopId) -> Result<RefreshOutcome, RouteError> {
        if !self.manifest.toggle_completed(id) {
            return Ok(RefreshOutcome::NoChange);
        }
        self.touch();
        self.refresh()
    }

    /// Remove a stop and refresh.
    ///
    /// # Errors
    ///
    /// Propagates provider failures from the refresh; unknown identifiers
    /// return [`RefreshOutcome::NoChange`] without touching the provider.
    pub fn remove_stop(&mut self, id: StopId) -> Result<RefreshOutcome, RouteError> {
        if !self.manifest.remove(id) {
            return Ok(RefreshOutcome::NoChange);
        }
        self.touch();
        self.refresh()
    }

    /// Clear every completion flag and refresh.
    ///
    /// # Errors
    ///
    /// Propagates provider failures from the refresh; when no stop was
    /// completed this returns [`RefreshOutcome::NoChange`] without
    /// touching the provider.
    pub fn reset_completed(&mut self) -> Result<RefreshOutcome, RouteError> {
        if !self.manifest.reset_completed() {
            return Ok(RefreshOutcome::NoChange);
        }
        self.touch();
        self.refresh()
    }

    /// Request a fresh optimization for the current active subset.
    ///
    /// An empty active subset clears the visualizer, the last route, and
    /// the summary instead of calling the provider. A missing origin
    /// reports [`RefreshOutcome::AwaitingOrigin`].
    ///
    /// # Errors
    ///
    /// Returns the provider's [`RouteError`]; the manifest keeps its prior
    /// orders and the summary its last value.
    pub fn refresh(&mut self) -> Result<RefreshOutcome, RouteError> {
        let snapshot = self.snapshot();
        if snapshot.active.is_empty() {
            self.visualizer.clear();
            self.last_route = None;
            self.summary = None;
            return Ok(RefreshOutcome::Cleared);
        }
        let Some(origin) = self.origin.clone() else {
            return Ok(RefreshOutcome::AwaitingOrigin);
        };

        let request = RouteRequest {
            origin,
            stops: snapshot.active.clone(),
        };
        let route = self.provider.optimize(&request)?;
        self.apply_route_result(&snapshot, route);
        Ok(RefreshOutcome::Routed)
    }

    /// Capture the active subset and the current mutation generation.
    #[must_use]
    pub fn snapshot(&self) -> RouteSnapshot {
        RouteSnapshot {
            generation: self.generation,
            active: self.manifest.active_stops(),
        }
    }

    /// Apply a provider result computed against `snapshot`.
    ///
    /// Returns false and changes nothing when the manifest has been
    /// mutated since the snapshot was taken — the response is stale and a
    /// newer refresh is already on its way. Otherwise the visiting order
    /// is reconciled by identifier, the summary is recomputed from the
    /// same response, and the visualizer is shown the route. The summary
    /// updates even when the reconciler rejects a mismatched permutation;
    /// the metrics describe the response, not the reorder.
    pub fn apply_route_result(&mut self, snapshot: &RouteSnapshot, route: RouteResult) -> bool {
        if snapshot.generation != self.generation {
            debug!(
                "Discarded stale route result: generation {} behind {}",
                snapshot.generation, self.generation
            );
            return false;
        }

        self.manifest.apply_visiting_order(&snapshot.active, &route);
        self.summary = Some(TripSummary::from_route(&route));
        self.visualizer.show_route(&route);
        self.last_route = Some(route);
        true
    }

    /// The stops in ingestion order.
    #[must_use]
    pub fn stops(&self) -> &[Stop] {
        self.manifest.stops()
    }

    /// Every stop ascending by `order`, for presentation.
    #[must_use]
    pub fn ordered_stops(&self) -> Vec<Stop> {
        self.manifest.ordered_stops()
    }

    /// The active subset ascending by `order`.
    #[must_use]
    pub fn active_stops(&self) -> Vec<Stop> {
        self.manifest.active_stops()
    }

    /// The owned manifest, read-only.
    #[must_use]
    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// Current trip figures, if any stops exist.
    #[must_use]
    pub fn summary(&self) -> Option<&TripSummary> {
        self.summary.as_ref()
    }

    /// The most recent provider result, if one has been applied.
    #[must_use]
    pub fn last_route(&self) -> Option<&RouteResult> {
        self.last_route.as_ref()
    }

    /// The current origin, if known.
    #[must_use]
    pub fn origin(&self) -> Option<&Origin> {
        self.origin.as_ref()
    }

    /// The owned visualizer, read-only — useful for recording doubles.
    #[must_use]
    pub fn visualizer(&self) -> &V {
        &self.visualizer
    }

    fn touch(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }
}
