//! Walk routing.
//!
//! Routers use walks for access to and egress from the service, and as the
//! fallback when the service cannot be used. Walks are produced by a
//! [`WalkRouter`]; [`TeleportationWalkRouter`] teleports along the beeline
//! between two points.

use std::sync::Arc;

use geo::{Coord, Distance, Euclidean, Point};
use serde::{Deserialize, Serialize};

use crate::domain::{Activity, Clock, Leg, Location, PlanElement, TravellerId};
use crate::network::{Network, NetworkError};
use crate::routing::ConfigError;

/// Mode of a walk leg on the network.
pub const WALK_MODE: &str = "walk";

/// Mode of a walk leg between a location's coordinate and its link.
pub const NON_NETWORK_WALK_MODE: &str = "non_network_walk";

/// Activity type separating consecutive walk legs.
pub const WALK_INTERACTION: &str = "walk interaction";

/// Routes walk sub-trips between two locations.
///
/// The returned elements start and end with a leg and alternate between legs
/// and interaction activities. Departure times on the returned legs are set
/// from `departure_time` onwards.
pub trait WalkRouter: Send + Sync {
    fn calc_route(
        &self,
        from: &Location,
        to: &Location,
        departure_time: f64,
        traveller: &TravellerId,
    ) -> Result<Vec<PlanElement>, NetworkError>;
}

/// Parameters for teleported walks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WalkConfig {
    /// Walking speed in metres per second.
    pub speed: f64,

    /// Ratio of walked distance to beeline distance.
    pub beeline_distance_factor: f64,

    /// Whether to walk off-network between a location's coordinate and its
    /// link before and after the network walk.
    pub access_egress: bool,
}

impl WalkConfig {
    pub fn new(speed: f64, beeline_distance_factor: f64, access_egress: bool) -> Self {
        Self {
            speed,
            beeline_distance_factor,
            access_egress,
        }
    }

    /// Checks that walks take a finite, non-negative time.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.speed.is_finite() || self.speed <= 0.0 {
            return Err(ConfigError::NonPositiveWalkSpeed(self.speed));
        }
        if !self.beeline_distance_factor.is_finite() || self.beeline_distance_factor < 1.0 {
            return Err(ConfigError::BeelineFactorBelowOne(
                self.beeline_distance_factor,
            ));
        }
        Ok(())
    }
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self {
            speed: 0.83333,
            beeline_distance_factor: 1.3,
            access_egress: false,
        }
    }
}

/// Teleports the traveller along the beeline at a fixed speed.
///
/// Without access/egress this yields a single walk leg. With it, the
/// network walk runs between the two links' coordinates and is framed by
/// off-network legs wherever a location's coordinate differs from its link's.
#[derive(Debug, Clone)]
pub struct TeleportationWalkRouter {
    network: Arc<Network>,
    config: WalkConfig,
}

impl TeleportationWalkRouter {
    pub fn new(network: Arc<Network>, config: WalkConfig) -> Self {
        Self { network, config }
    }

    fn teleport(
        &self,
        mode: &str,
        from: &Location,
        to: &Location,
        from_coord: Coord,
        to_coord: Coord,
        departure_time: f64,
    ) -> Leg {
        let beeline = Euclidean.distance(Point::from(from_coord), Point::from(to_coord));
        let distance = beeline * self.config.beeline_distance_factor;
        let travel_time = distance / self.config.speed;
        Leg::new(
            mode,
            from.link_id().clone(),
            to.link_id().clone(),
            departure_time,
            travel_time,
        )
        .with_distance(distance)
    }
}

impl WalkRouter for TeleportationWalkRouter {
    fn calc_route(
        &self,
        from: &Location,
        to: &Location,
        departure_time: f64,
        _traveller: &TravellerId,
    ) -> Result<Vec<PlanElement>, NetworkError> {
        let from_coord = self.network.resolve_coord(from)?;
        let to_coord = self.network.resolve_coord(to)?;

        if !self.config.access_egress {
            let leg = self.teleport(WALK_MODE, from, to, from_coord, to_coord, departure_time);
            return Ok(vec![leg.into()]);
        }

        let from_link = Location::on_link(from.link_id().clone());
        let to_link = Location::on_link(to.link_id().clone());
        let from_link_coord = self.network.link_coord(from.link_id())?;
        let to_link_coord = self.network.link_coord(to.link_id())?;

        let mut elements = Vec::with_capacity(5);
        let mut clock = Clock::starting_at(departure_time);

        if from_coord != from_link_coord {
            let access = self.teleport(
                NON_NETWORK_WALK_MODE,
                from,
                &from_link,
                from_coord,
                from_link_coord,
                clock.now(),
            );
            elements.push(access.into());
            elements.push(interaction(from_link.clone()));
            clock = clock.advance_over(&elements);
        }

        let main = self.teleport(
            WALK_MODE,
            &from_link,
            &to_link,
            from_link_coord,
            to_link_coord,
            clock.now(),
        );
        let main = PlanElement::from(main);
        clock = clock.advance(&main);
        elements.push(main);

        if to_coord != to_link_coord {
            let stage = interaction(to_link.clone());
            clock = clock.advance(&stage);
            elements.push(stage);
            let egress = self.teleport(
                NON_NETWORK_WALK_MODE,
                &to_link,
                to,
                to_link_coord,
                to_coord,
                clock.now(),
            );
            elements.push(egress.into());
        }

        Ok(elements)
    }
}

fn interaction(location: Location) -> PlanElement {
    Activity::new(WALK_INTERACTION, location)
        .with_maximum_duration(0.0)
        .into()
}
