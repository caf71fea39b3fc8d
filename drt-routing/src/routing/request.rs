//! Routing requests and errors.

use serde::{Deserialize, Serialize};

use crate::domain::{Activity, Location, Plan, TravellerId, Trip};
use crate::network::{NetworkError, PathError};

/// Error from routing a trip.
///
/// Every variant is fatal for the trip. Conditions the routers recover from
/// (no stop nearby, identical links) never surface here; they produce a
/// fallback walk trip instead.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RoutingError {
    /// The path calculator could not connect the two links
    #[error(transparent)]
    Path(#[from] PathError),

    /// A location refers to something the network does not contain
    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error("invalid trip request: {0}")]
    InvalidRequest(String),
}

fn default_origin_activity() -> String {
    "origin".to_string()
}

fn default_destination_activity() -> String {
    "destination".to_string()
}

/// A request to route one trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripRequest {
    pub origin: Location,

    pub destination: Location,

    /// Seconds since simulation midnight.
    pub departure_time: f64,

    pub traveller: TravellerId,

    /// Type of the traveller's activity at the origin, used when the trip is
    /// wrapped into a plan for checking.
    #[serde(default = "default_origin_activity")]
    pub origin_activity: String,

    /// Type of the traveller's activity at the destination.
    #[serde(default = "default_destination_activity")]
    pub destination_activity: String,
}

impl TripRequest {
    pub fn new(
        origin: Location,
        destination: Location,
        departure_time: f64,
        traveller: TravellerId,
    ) -> Self {
        Self {
            origin,
            destination,
            departure_time,
            traveller,
            origin_activity: default_origin_activity(),
            destination_activity: default_destination_activity(),
        }
    }

    /// Validate the request.
    pub fn validate(&self) -> Result<(), RoutingError> {
        if !self.departure_time.is_finite() {
            return Err(RoutingError::InvalidRequest(format!(
                "departure time must be finite, got {}",
                self.departure_time
            )));
        }
        if self.departure_time < 0.0 {
            return Err(RoutingError::InvalidRequest(format!(
                "departure time must be non-negative, got {}",
                self.departure_time
            )));
        }
        Ok(())
    }

    /// Wraps a routed trip between the traveller's origin and destination
    /// activities.
    pub fn to_plan(&self, trip: Trip) -> Plan {
        trip.into_plan(
            Activity::new(self.origin_activity.clone(), self.origin.clone()),
            Activity::new(self.destination_activity.clone(), self.destination.clone()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ElementKind, Leg, LinkId, PlanElement};

    fn request(departure_time: f64) -> TripRequest {
        TripRequest::new(
            Location::on_link(LinkId::from("A")),
            Location::on_link(LinkId::from("B")),
            departure_time,
            TravellerId::from("p1"),
        )
    }

    #[test]
    fn validate_departure_time() {
        assert_eq!(request(0.0).validate(), Ok(()));
        assert_eq!(request(28_800.0).validate(), Ok(()));
        assert!(matches!(
            request(-1.0).validate(),
            Err(RoutingError::InvalidRequest(_))
        ));
        assert!(matches!(
            request(f64::NAN).validate(),
            Err(RoutingError::InvalidRequest(_))
        ));
        assert!(matches!(
            request(f64::INFINITY).validate(),
            Err(RoutingError::InvalidRequest(_))
        ));
    }

    #[test]
    fn to_plan_uses_activity_types() {
        let mut request = request(0.0);
        request.origin_activity = "home".into();
        request.destination_activity = "work".into();

        let trip = Trip::from_elements(vec![
            Leg::new("walk", LinkId::from("A"), LinkId::from("B"), 0.0, 10.0).into(),
        ]);
        let plan = request.to_plan(trip);

        let kinds: Vec<_> = plan.elements().iter().map(PlanElement::kind).collect();
        assert_eq!(
            kinds,
            vec![ElementKind::Activity, ElementKind::Leg, ElementKind::Activity]
        );
        let first = plan.elements()[0].as_activity().unwrap();
        assert_eq!(first.activity_type(), "home");
        let last = plan.elements()[2].as_activity().unwrap();
        assert_eq!(last.activity_type(), "work");
        assert_eq!(last.location().link_id(), &LinkId::from("B"));
    }

    #[test]
    fn deserialize_with_default_activities() {
        let request: TripRequest = serde_json::from_str(
            r#"{
                "origin": {"link": "A"},
                "destination": {"link": "B", "coord": {"x": 5.0, "y": 0.0}},
                "departureTime": 3600.0,
                "traveller": "p7"
            }"#,
        )
        .unwrap();

        assert_eq!(request.traveller, TravellerId::from("p7"));
        assert_eq!(request.departure_time, 3600.0);
        assert_eq!(request.origin_activity, "origin");
        assert_eq!(request.destination_activity, "destination");
    }
}
