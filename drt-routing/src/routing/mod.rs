//! Trip routing for the on-demand service.
//!
//! A router turns a [`TripRequest`] into a [`Trip`]: the legs and
//! interaction activities that take the traveller from origin to destination.
//! Two schemes are supported:
//!
//! - door-to-door: the vehicle picks up at the origin link and drops off at
//!   the destination link
//! - stop-based: the traveller walks to a designated stop, rides to another
//!   and walks on from there
//!
//! Where the service cannot be used the traveller walks, with the walk tagged
//! by the service's fallback mode. Routers are built per worker by a
//! [`RouterFactory`]; everything they share is read-only.

mod config;
mod diagnostics;
mod direct_ride;
mod door_to_door;
mod factory;
mod request;
mod stop_based;
mod stop_finder;


use crate::domain::Trip;

pub use config::{ConfigError, OperatingScheme, ServiceConfig};
pub use diagnostics::{DiagnosticSink, FallbackReason, NullSink, TracingSink};
pub use direct_ride::DirectRideBuilder;
pub use door_to_door::DoorToDoorRouter;
pub use factory::{RouterFactory, ServiceRouter};
pub use request::{RoutingError, TripRequest};
pub use stop_based::StopBasedRouter;
pub use stop_finder::{
    ClosestStopFinder, ServiceAreaStopFinder, StopFinder, StopPair, stops_from_service_area,
};

/// Computes trips for requests.
///
/// Routers own a path calculator and are therefore used by one worker at a
/// time.
pub trait RoutingModule {
    fn calc_route(&mut self, request: &TripRequest) -> Result<Trip, RoutingError>;
}
