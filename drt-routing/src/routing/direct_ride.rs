//! Builds the ride leg of a trip.

use std::sync::Arc;

use tracing::debug;

use super::{RoutingError, ServiceConfig};
use crate::domain::{Leg, LinkId, RideAttributes};
use crate::network::PathCalculator;

/// Builds single ride legs between two links from the direct path.
///
/// The leg's travel time is the service-level bound rather than the direct
/// travel time: dispatch may detour to share the vehicle, and the bound is
/// what the traveller is promised.
#[derive(Debug)]
pub struct DirectRideBuilder<P> {
    calculator: P,
    config: Arc<ServiceConfig>,
}

impl<P: PathCalculator> DirectRideBuilder<P> {
    pub fn new(calculator: P, config: Arc<ServiceConfig>) -> Self {
        Self { calculator, config }
    }

    /// Builds a ride from `from` to `to` departing at `departure_time`.
    ///
    /// # Errors
    ///
    /// Returns `Err` if either link is unknown or no path connects them.
    pub fn build(
        &mut self,
        departure_time: f64,
        from: &LinkId,
        to: &LinkId,
    ) -> Result<Leg, RoutingError> {
        let path = self.calculator.calc_path(from, to, departure_time)?;

        let unshared_ride_time = path.travel_time;
        let max_travel_time = self.config.max_travel_time(unshared_ride_time);
        debug!(
            %from,
            %to,
            departure_time,
            unshared_ride_time,
            max_travel_time,
            "built direct ride"
        );

        let ride = RideAttributes {
            distance: path.distance,
            unshared_ride_time,
            max_travel_time,
            max_wait_time: self.config.max_wait_time,
        };
        Ok(Leg::new(
            self.config.mode.clone(),
            from.clone(),
            to.clone(),
            departure_time,
            max_travel_time,
        )
        .with_ride(ride))
    }
}
