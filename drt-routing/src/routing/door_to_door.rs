//! Routing without fixed stops.

use std::sync::Arc;

use tracing::debug;

use super::{
    DiagnosticSink, DirectRideBuilder, FallbackReason, RoutingError, RoutingModule,
    ServiceConfig, TripRequest,
};
use crate::domain::{Activity, Clock, Leg, Location, PlanElement, Trip};
use crate::network::PathCalculator;
use crate::walk::WalkRouter;

/// Routes trips picked up and dropped off at the traveller's own links.
///
/// A trip between two locations on the same link is walked. Otherwise the
/// traveller rides from the origin link to the destination link, optionally
/// walking to and from those links first when the service is configured to
/// insert access and egress walks.
pub struct DoorToDoorRouter<P> {
    rides: DirectRideBuilder<P>,
    walk_router: Arc<dyn WalkRouter>,
    config: Arc<ServiceConfig>,
    sink: Arc<dyn DiagnosticSink>,
}

impl<P: PathCalculator> DoorToDoorRouter<P> {
    pub fn new(
        rides: DirectRideBuilder<P>,
        walk_router: Arc<dyn WalkRouter>,
        config: Arc<ServiceConfig>,
        sink: Arc<dyn DiagnosticSink>,
    ) -> Self {
        Self {
            rides,
            walk_router,
            config,
            sink,
        }
    }

    /// Walks the whole trip as one leg tagged with the fallback mode.
    fn walk_whole_trip(&self, request: &TripRequest) -> Result<Trip, RoutingError> {
        if self.config.print_detailed_warnings {
            self.sink.fallback(request, FallbackReason::SameLink);
        }

        let walk = self.walk_router.calc_route(
            &request.origin,
            &request.destination,
            request.departure_time,
            &request.traveller,
        )?;
        let duration = Clock::starting_at(0.0).advance_over(&walk).now();
        let distance = walk
            .iter()
            .filter_map(PlanElement::as_leg)
            .filter_map(Leg::distance)
            .sum();

        let leg = Leg::new(
            self.config.fallback_mode(),
            request.origin.link_id().clone(),
            request.destination.link_id().clone(),
            request.departure_time,
            duration,
        )
        .with_distance(distance);
        Ok(Trip::from_elements(vec![leg.into()]))
    }
}

impl<P: PathCalculator> RoutingModule for DoorToDoorRouter<P> {
    fn calc_route(&mut self, request: &TripRequest) -> Result<Trip, RoutingError> {
        request.validate()?;

        let origin = &request.origin;
        let destination = &request.destination;
        if origin.link_id() == destination.link_id() {
            return self.walk_whole_trip(request);
        }

        let stage_type = self.config.stage_activity_type();
        let mut trip = Trip::new();
        let mut clock = Clock::starting_at(request.departure_time);

        if self.config.insert_access_egress_walk && !origin.is_stop() {
            let pickup = Location::on_link(origin.link_id().clone());
            let access =
                self.walk_router
                    .calc_route(origin, &pickup, clock.now(), &request.traveller)?;
            clock = clock.advance_over(&access);
            trip.extend(access);

            let boarding = PlanElement::from(Activity::stage(stage_type.clone(), pickup));
            clock = clock.advance(&boarding);
            trip.push(boarding);
        }

        // Unlike stop-based trips, the ride departs once access and boarding
        // are done.
        let ride = PlanElement::from(self.rides.build(
            clock.now(),
            origin.link_id(),
            destination.link_id(),
        )?);
        clock = clock.advance(&ride);
        trip.push(ride);

        if self.config.insert_access_egress_walk {
            let dropoff = Location::on_link(destination.link_id().clone());
            let alighting = PlanElement::from(Activity::stage(stage_type, dropoff.clone()));
            clock = clock.advance(&alighting);
            trip.push(alighting);

            let egress =
                self.walk_router
                    .calc_route(&dropoff, destination, clock.now(), &request.traveller)?;
            trip.extend(egress);
        }

        debug!(
            traveller = %request.traveller,
            elements = trip.len(),
            arrival = trip.end_time(request.departure_time),
            "routed door-to-door trip"
        );
        Ok(trip)
    }
}
