//! Behavioural tests for [`TripPlanner`].
//!
//! These drive the planner through a scripted provider double to verify
//! the ingest → optimize → reconcile flow without any network access.

use std::cell::RefCell;
use std::time::Duration;

use geo::Coord;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use waybill_core::{
    NullVisualizer, Origin, RecognizedStop, RefreshOutcome, RouteError, RouteLeg,
    RouteProvider, RouteRequest, RouteResult, SummarySource, TripPlanner,
};

/// What the scripted provider should answer.
#[derive(Clone)]
enum Script {
    /// Return the given permutation over the request's waypoints.
    Order(Vec<usize>),
    /// Return the identity permutation.
    Identity,
    /// Reject every request at the service level.
    Fail,
}

struct ScriptedProvider {
    script: Script,
}

impl RouteProvider for ScriptedProvider {
    fn optimize(&self, request: &RouteRequest) -> Result<RouteResult, RouteError> {
        request.validate()?;
        let legs: Vec<RouteLeg> = request
            .stops
            .iter()
            .map(|stop| RouteLeg {
                distance_meters: 1_000,
                duration: Duration::from_secs(60),
                end_address: stop.address.clone(),
                end_location: Coord { x: 0.0, y: 0.0 },
            })
            .collect();
        match &self.script {
            Script::Order(order) => Ok(RouteResult::new(order.clone(), legs)),
            Script::Identity => {
                Ok(RouteResult::new((0..request.waypoints().len()).collect(), legs))
            }
            Script::Fail => Err(RouteError::Service {
                code: "NOT_FOUND".to_owned(),
                message: "address could not be resolved".to_owned(),
            }),
        }
    }
}

type TestPlanner = TripPlanner<ScriptedProvider, NullVisualizer>;
type PlannerCell = RefCell<Option<TestPlanner>>;
type OutcomeCell = RefCell<Option<Result<RefreshOutcome, RouteError>>>;

#[fixture]
fn planner() -> PlannerCell {
    RefCell::new(None)
}

#[fixture]
fn outcome() -> OutcomeCell {
    RefCell::new(None)
}

fn entries(addresses: &[&str]) -> Vec<RecognizedStop> {
    addresses
        .iter()
        .map(|address| RecognizedStop {
            delivery_number: None,
            address: (*address).to_owned(),
        })
        .collect()
}

fn install(planner: &PlannerCell, script: Script) {
    *planner.borrow_mut() = Some(TripPlanner::new(
        ScriptedProvider { script },
        NullVisualizer,
    ));
}

// --- Given steps ---

#[given("a provider that visits the second stop first")]
fn provider_swaps(#[from(planner)] planner: &PlannerCell) {
    install(planner, Script::Order(vec![1, 0]));
}

#[given("a provider that keeps the visiting order")]
fn provider_identity(#[from(planner)] planner: &PlannerCell) {
    install(planner, Script::Identity);
}

#[given("a provider that rejects every request")]
fn provider_fails(#[from(planner)] planner: &PlannerCell) {
    install(planner, Script::Fail);
}

#[given("a known origin")]
fn known_origin(#[from(planner)] planner: &PlannerCell) {
    let mut guard = planner.borrow_mut();
    let planner = guard.as_mut().expect("planner must be initialised");
    planner
        .set_origin(Origin::address("800 Robson St").expect("valid origin"))
        .expect("refresh over an empty manifest cannot fail");
}

// --- When steps ---

#[when("I ingest a manifest with three stops")]
fn ingest_three(
    #[from(planner)] planner: &PlannerCell,
    #[from(outcome)] outcome: &OutcomeCell,
) {
    let mut guard = planner.borrow_mut();
    let planner = guard.as_mut().expect("planner must be initialised");
    *outcome.borrow_mut() = Some(planner.ingest(entries(&["A st", "B st", "C st"])));
}

#[when("I ingest a manifest with one stop")]
fn ingest_one(
    #[from(planner)] planner: &PlannerCell,
    #[from(outcome)] outcome: &OutcomeCell,
) {
    let mut guard = planner.borrow_mut();
    let planner = guard.as_mut().expect("planner must be initialised");
    *outcome.borrow_mut() = Some(planner.ingest(entries(&["A st"])));
}

#[when("I remove the remaining stop")]
fn remove_remaining(
    #[from(planner)] planner: &PlannerCell,
    #[from(outcome)] outcome: &OutcomeCell,
) {
    let mut guard = planner.borrow_mut();
    let planner = guard.as_mut().expect("planner must be initialised");
    let id = planner
        .active_stops()
        .first()
        .expect("one active stop remains")
        .id;
    *outcome.borrow_mut() = Some(planner.remove_stop(id));
}

// --- Then steps ---

#[then("the active order becomes B, A, C")]
fn active_order_bac(#[from(planner)] planner: &PlannerCell) {
    let guard = planner.borrow();
    let planner = guard.as_ref().expect("planner must be initialised");
    let addresses: Vec<String> = planner
        .active_stops()
        .into_iter()
        .map(|stop| stop.address)
        .collect();
    assert_eq!(addresses, vec!["B st", "A st", "C st"]);
}

#[then("the summary is provider-confirmed")]
fn summary_confirmed(#[from(planner)] planner: &PlannerCell) {
    let guard = planner.borrow();
    let planner = guard.as_ref().expect("planner must be initialised");
    let summary = planner.summary().expect("summary present");
    assert_eq!(summary.source, SummarySource::Provider);
}

#[then("the planner awaits an origin")]
fn awaits_origin(#[from(outcome)] outcome: &OutcomeCell) {
    let borrowed = outcome.borrow();
    assert_eq!(
        borrowed.as_ref().expect("an outcome was recorded"),
        &Ok(RefreshOutcome::AwaitingOrigin)
    );
}

#[then("the summary is an estimate")]
fn summary_estimate(#[from(planner)] planner: &PlannerCell) {
    let guard = planner.borrow();
    let planner = guard.as_ref().expect("planner must be initialised");
    assert!(planner.summary().expect("summary present").is_estimate());
}

#[then("the route state is cleared")]
fn route_cleared(
    #[from(planner)] planner: &PlannerCell,
    #[from(outcome)] outcome: &OutcomeCell,
) {
    {
        let borrowed = outcome.borrow();
        assert_eq!(
            borrowed.as_ref().expect("an outcome was recorded"),
            &Ok(RefreshOutcome::Cleared)
        );
    }
    let guard = planner.borrow();
    let planner = guard.as_ref().expect("planner must be initialised");
    assert!(planner.active_stops().is_empty());
    assert!(planner.summary().is_none());
    assert!(planner.last_route().is_none());
}

#[then("the refresh reports a service failure")]
fn reports_service_failure(#[from(outcome)] outcome: &OutcomeCell) {
    let borrowed = outcome.borrow();
    assert!(
        matches!(
            borrowed.as_ref().expect("an outcome was recorded"),
            Err(RouteError::Service { .. })
        ),
        "expected a service failure, got {borrowed:?}"
    );
}

#[then("the stop orders are unchanged")]
fn orders_unchanged(#[from(planner)] planner: &PlannerCell) {
    let guard = planner.borrow();
    let planner = guard.as_ref().expect("planner must be initialised");
    let orders: Vec<u32> = planner
        .active_stops()
        .iter()
        .map(|stop| stop.order)
        .collect();
    assert_eq!(orders, vec![1, 2, 3]);
}

// --- Scenario registrations ---

macro_rules! register_scenario {
    ($fn_name:ident, $title:literal) => {
        #[scenario(path = "tests/features/trip_planner.feature", name = $title)]
        fn $fn_name(planner: PlannerCell, outcome: OutcomeCell) {
            let _ = (planner, outcome);
        }
    };
}

register_scenario!(
    optimizing_a_fresh_manifest,
    "optimizing a freshly ingested manifest"
);
register_scenario!(ingesting_without_an_origin, "ingesting without an origin");
register_scenario!(removing_the_only_active_stop, "removing the only active stop");
register_scenario!(
    provider_failure_preserves_the_manifest,
    "provider failure preserves the manifest"
);
