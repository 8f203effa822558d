//! Delivery stops and their identities.
//!
//! A [`Stop`] is one line of a recognized delivery manifest: an address to
//! visit, the label printed next to it, and the courier's progress state.

use std::fmt;

use uuid::Uuid;

/// Opaque stable identifier for a [`Stop`].
///
/// Generated once at ingestion time and never reused or regenerated.
/// Reconciliation matches stops by identifier rather than by position, so
/// the identifier must stay stable for the lifetime of the manifest.
///
/// # Examples
/// ```
/// use waybill_core::StopId;
///
/// let id = StopId::new();
/// assert_ne!(id, StopId::new());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct StopId(Uuid);

impl StopId {
    /// Generate a fresh identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for StopId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for StopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A single delivery stop.
///
/// `order` is a 1-based position among *all* stops, completed or not. It is
/// unique and dense when a manifest is ingested, but only loosely maintained
/// afterwards: reconciliation rewrites the orders of the active subset while
/// completed or removed stops keep their last known position, so gaps and
/// duplicates across the two groups are expected. Only the relative order
/// within the active subset is guaranteed monotonic after a successful
/// reconciliation.
///
/// # Examples
/// ```
/// use waybill_core::Stop;
///
/// let stop = Stop::new("1596 Johnston St", "59", 1);
/// assert!(!stop.completed);
/// assert_eq!(stop.order, 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Stop {
    /// Stable identity, assigned at ingestion.
    pub id: StopId,
    /// Free-text delivery address, opaque to the engine and resolved by the
    /// route provider.
    pub address: String,
    /// Label printed on the manifest next to the address, or a synthesized
    /// value when the recognition service omitted it.
    pub delivery_number: String,
    /// Whether the courier has marked this stop done.
    pub completed: bool,
    /// 1-based position among all stops; see the type-level notes.
    pub order: u32,
}

impl Stop {
    /// Construct a pending stop with a fresh identity.
    #[must_use]
    pub fn new(
        address: impl Into<String>,
        delivery_number: impl Into<String>,
        order: u32,
    ) -> Self {
        Self {
            id: StopId::new(),
            address: address.into(),
            delivery_number: delivery_number.into(),
            completed: false,
            order,
        }
    }

    /// Whether this stop is still to be driven.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        !self.completed
    }
}
