//! Leg type.
//!
//! A `Leg` is a single movement within a trip: a walk, an off-network walk,
//! or a ride on the service. Ride legs carry [`RideAttributes`].

use serde::{Deserialize, Serialize};

use super::LinkId;

/// Service-level attributes attached to a ride leg.
///
/// # Invariants
///
/// - `max_travel_time = alpha * unshared_ride_time + beta` for the service's
///   alpha and beta at the time the leg was built
/// - `max_travel_time >= unshared_ride_time` whenever `alpha >= 1` and `beta >= 0`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RideAttributes {
    /// Length of the direct path, including the last link.
    pub distance: f64,
    /// Travel time of the direct path, including both boundary links.
    pub unshared_ride_time: f64,
    /// Upper bound on the ride duration promised to the traveller.
    pub max_travel_time: f64,
    /// Upper bound on the wait for pickup. Enforced by dispatch, not here.
    pub max_wait_time: f64,
}

/// A leg of a trip.
///
/// Times are seconds since simulation midnight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Leg {
    mode: String,
    start_link: LinkId,
    end_link: LinkId,
    departure_time: f64,
    travel_time: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    distance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    ride: Option<RideAttributes>,
}

impl Leg {
    /// Creates a leg without ride attributes.
    ///
    /// # Examples
    ///
    /// ```
    /// use drt_routing::domain::{Leg, LinkId};
    ///
    /// let leg = Leg::new("walk", LinkId::from("L1"), LinkId::from("L2"), 3600.0, 120.0);
    /// assert_eq!(leg.mode(), "walk");
    /// assert_eq!(leg.arrival_time(), 3720.0);
    /// assert!(!leg.is_ride());
    /// ```
    pub fn new(
        mode: impl Into<String>,
        start_link: LinkId,
        end_link: LinkId,
        departure_time: f64,
        travel_time: f64,
    ) -> Self {
        Self {
            mode: mode.into(),
            start_link,
            end_link,
            departure_time,
            travel_time,
            distance: None,
            ride: None,
        }
    }

    /// Sets the route distance.
    pub fn with_distance(mut self, distance: f64) -> Self {
        self.distance = Some(distance);
        self
    }

    /// Attaches ride attributes, turning this into a ride leg.
    ///
    /// The route distance is taken from the attributes.
    pub fn with_ride(mut self, ride: RideAttributes) -> Self {
        self.distance = Some(ride.distance);
        self.ride = Some(ride);
        self
    }

    pub fn mode(&self) -> &str {
        &self.mode
    }

    /// Replaces the mode tag.
    pub fn set_mode(&mut self, mode: impl Into<String>) {
        self.mode = mode.into();
    }

    pub fn start_link(&self) -> &LinkId {
        &self.start_link
    }

    pub fn end_link(&self) -> &LinkId {
        &self.end_link
    }

    pub fn departure_time(&self) -> f64 {
        self.departure_time
    }

    pub fn travel_time(&self) -> f64 {
        self.travel_time
    }

    /// Returns the scheduled arrival (departure plus travel time).
    pub fn arrival_time(&self) -> f64 {
        self.departure_time + self.travel_time
    }

    /// Returns the route distance, if known.
    pub fn distance(&self) -> Option<f64> {
        self.distance
    }

    /// Returns the ride attributes if this is a ride leg.
    pub fn ride(&self) -> Option<&RideAttributes> {
        self.ride.as_ref()
    }

    /// Returns true if this leg rides the service.
    pub fn is_ride(&self) -> bool {
        self.ride.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(s: &str) -> LinkId {
        LinkId::from(s)
    }

    fn ride() -> RideAttributes {
        RideAttributes {
            distance: 4200.0,
            unshared_ride_time: 600.0,
            max_travel_time: 1020.0,
            max_wait_time: 300.0,
        }
    }

    #[test]
    fn walk_leg_has_no_ride_attributes() {
        let leg = Leg::new("walk", link("A"), link("B"), 100.0, 50.0).with_distance(65.0);

        assert_eq!(leg.mode(), "walk");
        assert_eq!(leg.start_link(), &link("A"));
        assert_eq!(leg.end_link(), &link("B"));
        assert_eq!(leg.distance(), Some(65.0));
        assert!(leg.ride().is_none());
        assert!(!leg.is_ride());
    }

    #[test]
    fn ride_leg_takes_distance_from_attributes() {
        let leg = Leg::new("drt", link("A"), link("B"), 0.0, 1020.0).with_ride(ride());

        assert!(leg.is_ride());
        assert_eq!(leg.distance(), Some(4200.0));
        assert_eq!(leg.ride().map(|r| r.unshared_ride_time), Some(600.0));
    }

    #[test]
    fn retag_mode() {
        let mut leg = Leg::new("walk", link("A"), link("B"), 0.0, 10.0);
        leg.set_mode("drt_walk");
        assert_eq!(leg.mode(), "drt_walk");
    }

    #[test]
    fn arrival_time() {
        let leg = Leg::new("walk", link("A"), link("B"), 100.0, 50.0);
        assert_eq!(leg.arrival_time(), 150.0);
    }

    #[test]
    fn serializes_camel_case_and_skips_missing_ride() {
        let leg = Leg::new("walk", link("A"), link("B"), 0.0, 10.0);
        let json = serde_json::to_value(&leg).unwrap();

        assert_eq!(json["departureTime"], 0.0);
        assert_eq!(json["travelTime"], 10.0);
        assert!(json.get("ride").is_none());

        let leg = leg.with_ride(ride());
        let json = serde_json::to_value(&leg).unwrap();
        assert_eq!(json["ride"]["maxTravelTime"], 1020.0);
    }
}
