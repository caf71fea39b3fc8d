//! Routing via designated stops.

use std::sync::Arc;

use tracing::debug;

use super::{
    DiagnosticSink, DirectRideBuilder, FallbackReason, RoutingError, RoutingModule,
    ServiceConfig, StopFinder, TripRequest,
};
use crate::domain::{Activity, Clock, PlanElement, Trip};
use crate::network::PathCalculator;
use crate::walk::{WALK_MODE, WalkRouter};

/// Routes trips that board and alight at designated stops.
///
/// A routed trip is: walk to the boarding stop, board, ride, alight, walk to
/// the destination. When no stop is in reach of either end, or both stops sit
/// on the same link, the traveller walks the whole way instead.
pub struct StopBasedRouter<P> {
    rides: DirectRideBuilder<P>,
    walk_router: Arc<dyn WalkRouter>,
    stop_finder: Arc<dyn StopFinder>,
    config: Arc<ServiceConfig>,
    sink: Arc<dyn DiagnosticSink>,
}

impl<P: PathCalculator> StopBasedRouter<P> {
    pub fn new(
        rides: DirectRideBuilder<P>,
        walk_router: Arc<dyn WalkRouter>,
        stop_finder: Arc<dyn StopFinder>,
        config: Arc<ServiceConfig>,
        sink: Arc<dyn DiagnosticSink>,
    ) -> Self {
        Self {
            rides,
            walk_router,
            stop_finder,
            config,
            sink,
        }
    }

    /// Walks from origin to destination.
    ///
    /// Network walk legs are retagged with the fallback mode so the trip is
    /// attributed to the service. Off-network legs keep their mode.
    fn walk_whole_trip(
        &self,
        request: &TripRequest,
        reason: FallbackReason,
    ) -> Result<Trip, RoutingError> {
        if self.config.print_detailed_warnings {
            self.sink.fallback(request, reason);
        }

        let mut elements = self.walk_router.calc_route(
            &request.origin,
            &request.destination,
            request.departure_time,
            &request.traveller,
        )?;
        let fallback_mode = self.config.fallback_mode();
        for leg in elements.iter_mut().filter_map(PlanElement::as_leg_mut) {
            if leg.mode() == WALK_MODE {
                leg.set_mode(fallback_mode.clone());
            }
        }
        Ok(Trip::from_elements(elements))
    }
}

impl<P: PathCalculator> RoutingModule for StopBasedRouter<P> {
    fn calc_route(&mut self, request: &TripRequest) -> Result<Trip, RoutingError> {
        request.validate()?;

        let stops = self
            .stop_finder
            .find_stops(&request.origin, &request.destination)?;
        let (access, egress) = match (stops.access, stops.egress) {
            (None, _) => return self.walk_whole_trip(request, FallbackReason::NoAccessStop),
            (_, None) => return self.walk_whole_trip(request, FallbackReason::NoEgressStop),
            (Some(access), Some(egress)) if access.link_id() == egress.link_id() => {
                return self.walk_whole_trip(request, FallbackReason::SameStopLink);
            }
            (Some(access), Some(egress)) => (access, egress),
        };

        let stage_type = self.config.stage_activity_type();
        let boarding_at = access.location();
        let alighting_at = egress.location();
        let mut trip = Trip::new();
        let mut clock = Clock::starting_at(request.departure_time);

        let access_walk = self.walk_router.calc_route(
            &request.origin,
            &boarding_at,
            clock.now(),
            &request.traveller,
        )?;
        clock = clock.advance_over(&access_walk);
        trip.extend(access_walk);

        let boarding = PlanElement::from(Activity::stage(stage_type.clone(), boarding_at));
        clock = clock.advance(&boarding);
        trip.push(boarding);

        // The ride keeps the trip's departure time; the clock still moves on
        // by its travel time.
        let ride = PlanElement::from(self.rides.build(
            request.departure_time,
            access.link_id(),
            egress.link_id(),
        )?);
        clock = clock.advance(&ride);
        trip.push(ride);

        let alighting = PlanElement::from(Activity::stage(stage_type, alighting_at.clone()));
        clock = clock.advance(&alighting);
        trip.push(alighting);

        let egress_walk = self.walk_router.calc_route(
            &alighting_at,
            &request.destination,
            clock.now(),
            &request.traveller,
        )?;
        trip.extend(egress_walk);

        debug!(
            traveller = %request.traveller,
            access = %access.id(),
            egress = %egress.id(),
            "routed stop-based trip"
        );
        Ok(trip)
    }
}
