//! The canonical ordered collection of delivery stops.
//!
//! [`Manifest`] owns the stop set and enforces its invariants: identifier
//! uniqueness for the lifetime of the collection, silent no-ops for
//! mutations naming unknown identifiers, and identifier-based
//! reconciliation of provider visiting orders. Replacing the stop set
//! discards the previous one entirely; there is no merging across
//! captures.

use log::warn;

use crate::route::RouteResult;
use crate::stop::{Stop, StopId};

/// Ordered collection of delivery stops.
///
/// Stops are held in ingestion order; [`Manifest::active_stops`] and
/// [`Manifest::ordered_stops`] sort by the `order` field on the way out,
/// keeping ingestion order for ties (ties are expected once completed
/// stops retain stale order values).
///
/// # Examples
/// ```
/// use waybill_core::{Manifest, Stop};
///
/// let mut manifest = Manifest::new();
/// manifest.replace_all(vec![
///     Stop::new("1596 Johnston St", "59", 1),
///     Stop::new("1081 Burrard St", "60", 2),
/// ]);
/// assert_eq!(manifest.active_stops().len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    stops: Vec<Stop>,
}

impl Manifest {
    /// Construct an empty manifest.
    #[must_use]
    pub const fn new() -> Self {
        Self { stops: Vec::new() }
    }

    /// Discard the current stops and install a new set.
    ///
    /// The incoming set is trusted to carry fresh identities; each capture
    /// creates its own, so identifier collisions across ingestions cannot
    /// occur.
    pub fn replace_all(&mut self, stops: Vec<Stop>) {
        self.stops = stops;
    }

    /// Flip the completion flag of the stop with the given identifier.
    ///
    /// The stop's `order` is left untouched until the next reconciliation.
    /// Returns false (and changes nothing) for unknown identifiers.
    pub fn toggle_completed(&mut self, id: StopId) -> bool {
        match self.stops.iter_mut().find(|stop| stop.id == id) {
            Some(stop) => {
                stop.completed = !stop.completed;
                true
            }
            None => false,
        }
    }

    /// Delete the stop with the given identifier.
    ///
    /// Returns false (and changes nothing) for unknown identifiers.
    pub fn remove(&mut self, id: StopId) -> bool {
        match self.stops.iter().position(|stop| stop.id == id) {
            Some(index) => {
                self.stops.remove(index);
                true
            }
            None => false,
        }
    }

    /// Clear the completion flag on every stop, leaving orders unchanged.
    ///
    /// Idempotent; returns whether any stop actually changed.
    pub fn reset_completed(&mut self) -> bool {
        let mut changed = false;
        for stop in &mut self.stops {
            if stop.completed {
                stop.completed = false;
                changed = true;
            }
        }
        changed
    }

    /// The not-yet-completed stops, ascending by `order`.
    ///
    /// This is the only subset ever sent to the route provider.
    #[must_use]
    pub fn active_stops(&self) -> Vec<Stop> {
        let mut active: Vec<Stop> = self
            .stops
            .iter()
            .filter(|stop| stop.is_active())
            .cloned()
            .collect();
        active.sort_by_key(|stop| stop.order);
        active
    }

    /// Every stop, completed or not, ascending by `order`.
    #[must_use]
    pub fn ordered_stops(&self) -> Vec<Stop> {
        let mut ordered = self.stops.clone();
        ordered.sort_by_key(|stop| stop.order);
        ordered
    }

    /// The stops in ingestion order, without copying.
    #[must_use]
    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    /// Look up a stop by identifier.
    #[must_use]
    pub fn get(&self, id: StopId) -> Option<&Stop> {
        self.stops.iter().find(|stop| stop.id == id)
    }

    /// Number of stops, completed ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stops.len()
    }

    /// Whether the manifest holds no stops at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Merge a provider visiting order back onto the stop set.
    ///
    /// `snapshot` is the active subset the optimization request was built
    /// from — its last element is the pinned destination, the rest are the
    /// waypoints the permutation indexes into. Stops are matched by
    /// identifier, never by position, so applying a result against a
    /// manifest that has since changed is safe: stops removed or completed
    /// in the meantime are simply not found and keep their previous state.
    ///
    /// A permutation whose length does not match the waypoint count, or
    /// that indexes out of range, marks the result as stale and skips the
    /// reorder entirely. Returns whether the new order was applied.
    pub fn apply_visiting_order(&mut self, snapshot: &[Stop], result: &RouteResult) -> bool {
        let Some((destination, waypoints)) = snapshot.split_last() else {
            return false;
        };
        if result.waypoint_order.len() != waypoints.len() {
            warn!(
                "Skipped reconciliation: permutation length {} does not match waypoint count {}",
                result.waypoint_order.len(),
                waypoints.len()
            );
            return false;
        }

        let mut visited: Vec<StopId> = Vec::with_capacity(snapshot.len());
        for &index in &result.waypoint_order {
            match waypoints.get(index) {
                Some(stop) => visited.push(stop.id),
                None => {
                    warn!("Skipped reconciliation: permutation index {index} is out of range");
                    return false;
                }
            }
        }
        visited.push(destination.id);

        for stop in &mut self.stops {
            if let Some(position) = visited.iter().position(|id| *id == stop.id) {
                if let Ok(position) = u32::try_from(position) {
                    stop.order = position + 1;
                }
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    fn stops(addresses: &[&str]) -> Vec<Stop> {
        addresses
            .iter()
            .enumerate()
            .map(|(index, address)| Stop::new(*address, (59 + index).to_string(), index as u32 + 1))
            .collect()
    }

    #[fixture]
    fn manifest() -> Manifest {
        let mut manifest = Manifest::new();
        manifest.replace_all(stops(&["A st", "B st", "C st"]));
        manifest
    }

    fn result_with_order(order: Vec<usize>) -> RouteResult {
        RouteResult::new(order, Vec::new())
    }

    #[rstest]
    fn replace_all_discards_previous_stops(mut manifest: Manifest) {
        manifest.replace_all(stops(&["D st"]));
        assert_eq!(manifest.len(), 1);
        assert_eq!(manifest.stops()[0].address, "D st");
    }

    #[rstest]
    fn toggle_flips_completion_and_keeps_order(mut manifest: Manifest) {
        let id = manifest.stops()[1].id;
        assert!(manifest.toggle_completed(id));
        let stop = manifest.get(id).unwrap();
        assert!(stop.completed);
        assert_eq!(stop.order, 2);
        assert!(manifest.toggle_completed(id));
        assert!(!manifest.get(id).unwrap().completed);
    }

    #[rstest]
    fn toggle_of_unknown_id_is_a_no_op(mut manifest: Manifest) {
        let before = manifest.clone();
        assert!(!manifest.toggle_completed(StopId::new()));
        assert_eq!(manifest, before);
    }

    #[rstest]
    fn toggle_twice_restores_the_active_set(mut manifest: Manifest) {
        let before = manifest.active_stops();
        let id = manifest.stops()[0].id;
        manifest.toggle_completed(id);
        manifest.toggle_completed(id);
        assert_eq!(manifest.active_stops(), before);
    }

    #[rstest]
    fn remove_deletes_only_the_named_stop(mut manifest: Manifest) {
        let id = manifest.stops()[0].id;
        assert!(manifest.remove(id));
        assert!(!manifest.remove(id));
        assert_eq!(manifest.len(), 2);
        assert!(manifest.get(id).is_none());
    }

    #[rstest]
    fn reset_is_idempotent(mut manifest: Manifest) {
        let first = manifest.stops()[0].id;
        let second = manifest.stops()[1].id;
        manifest.toggle_completed(first);
        manifest.toggle_completed(second);

        assert!(manifest.reset_completed());
        let once = manifest.clone();
        assert!(!manifest.reset_completed());
        assert_eq!(manifest, once);
        assert_eq!(manifest.active_stops().len(), 3);
    }

    #[rstest]
    fn active_stops_sorts_by_order(mut manifest: Manifest) {
        // Simulate a prior reconciliation that moved C st first.
        let ids: Vec<StopId> = manifest.stops().iter().map(|stop| stop.id).collect();
        let snapshot = manifest.active_stops();
        let applied = manifest.apply_visiting_order(&snapshot, &result_with_order(vec![1, 0]));
        assert!(applied);

        let active = manifest.active_stops();
        assert_eq!(active[0].id, ids[1]);
        assert_eq!(active[1].id, ids[0]);
        assert_eq!(active[2].id, ids[2]);
    }

    #[rstest]
    fn reconciliation_pins_the_destination_last(mut manifest: Manifest) {
        // Active [A, B, C], provider visits B then A, C pinned: B=1, A=2, C=3.
        let snapshot = manifest.active_stops();
        assert!(manifest.apply_visiting_order(&snapshot, &result_with_order(vec![1, 0])));

        let by_address = |address: &str| {
            manifest
                .stops()
                .iter()
                .find(|stop| stop.address == address)
                .unwrap()
                .order
        };
        assert_eq!(by_address("B st"), 1);
        assert_eq!(by_address("A st"), 2);
        assert_eq!(by_address("C st"), 3);
    }

    #[rstest]
    fn over_length_permutation_is_skipped(mut manifest: Manifest) {
        let snapshot = manifest.active_stops();
        let before = manifest.clone();
        // Three indices over two waypoints: stale or mismatched response.
        assert!(!manifest.apply_visiting_order(&snapshot, &result_with_order(vec![2, 0, 1])));
        assert_eq!(manifest, before);
    }

    #[rstest]
    fn out_of_range_permutation_is_skipped(mut manifest: Manifest) {
        let snapshot = manifest.active_stops();
        let before = manifest.clone();
        assert!(!manifest.apply_visiting_order(&snapshot, &result_with_order(vec![5, 0])));
        assert_eq!(manifest, before);
    }

    #[rstest]
    fn reconciliation_never_resurrects_a_removed_stop(mut manifest: Manifest) {
        let snapshot = manifest.active_stops();
        let removed = snapshot[0].id;
        manifest.remove(removed);

        assert!(manifest.apply_visiting_order(&snapshot, &result_with_order(vec![1, 0])));
        assert!(manifest.get(removed).is_none());
        assert_eq!(manifest.len(), 2);
    }

    #[rstest]
    fn reconciliation_leaves_concurrently_completed_stops_untouched(mut manifest: Manifest) {
        let snapshot = manifest.active_stops();
        let completed = snapshot[2].id;
        manifest.toggle_completed(completed);

        assert!(manifest.apply_visiting_order(&snapshot, &result_with_order(vec![1, 0])));
        let stop = manifest.get(completed).unwrap();
        // Still completed; its order may have been renumbered by identity
        // match, which is harmless for an inactive stop.
        assert!(stop.completed);
    }

    #[rstest]
    fn completed_stops_keep_stale_orders_after_reconciliation(mut manifest: Manifest) {
        let completed = manifest.stops()[0].id;
        manifest.toggle_completed(completed);

        // Active subset is now [B, C]; provider keeps that order.
        let snapshot = manifest.active_stops();
        assert!(manifest.apply_visiting_order(&snapshot, &result_with_order(vec![0])));

        assert_eq!(manifest.get(completed).unwrap().order, 1);
        let active = manifest.active_stops();
        assert_eq!(active[0].order, 1);
        assert_eq!(active[1].order, 2);
        // Orders 1 now appear on both a completed and an active stop: the
        // documented non-strict invariant.
    }

    #[rstest]
    fn empty_snapshot_is_rejected(mut manifest: Manifest) {
        assert!(!manifest.apply_visiting_order(&[], &result_with_order(Vec::new())));
    }
}
