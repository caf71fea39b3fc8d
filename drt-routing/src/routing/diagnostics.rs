//! Diagnostics raised while routing and checking plans.

use std::fmt;

use tracing::warn;

use super::TripRequest;
use crate::validation::StructuralViolation;

/// Why a trip was routed as a walk instead of using the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FallbackReason {
    /// No boarding stop within reach of the origin
    NoAccessStop,
    /// No alighting stop within reach of the destination
    NoEgressStop,
    /// Boarding and alighting stops share a link
    SameStopLink,
    /// Origin and destination share a link
    SameLink,
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            FallbackReason::NoAccessStop => "no access stop found",
            FallbackReason::NoEgressStop => "no egress stop found",
            FallbackReason::SameStopLink => "access and egress stops are on the same link",
            FallbackReason::SameLink => "origin and destination are on the same link",
        };
        f.write_str(text)
    }
}

/// Receives diagnostics from routers and plan checks.
///
/// Sinks are shared between workers.
pub trait DiagnosticSink: Send + Sync {
    /// A trip fell back to walking.
    fn fallback(&self, request: &TripRequest, reason: FallbackReason);

    /// A plan failed its structural check.
    fn structural_violation(&self, description: &str, violation: &StructuralViolation);
}

/// Forwards diagnostics to `tracing` as warnings.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn fallback(&self, request: &TripRequest, reason: FallbackReason) {
        warn!(
            traveller = %request.traveller,
            origin = %request.origin.link_id(),
            destination = %request.destination.link_id(),
            departure_time = request.departure_time,
            "{reason}, traveller will walk"
        );
    }

    fn structural_violation(&self, description: &str, violation: &StructuralViolation) {
        warn!(%violation, "{description}");
    }
}

/// Discards all diagnostics.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn fallback(&self, _request: &TripRequest, _reason: FallbackReason) {}

    fn structural_violation(&self, _description: &str, _violation: &StructuralViolation) {}
}
