//! Locations and stops.

use geo::Coord;
use serde::{Deserialize, Serialize};

use super::{LinkId, StopId};

/// A place a trip can start or end at.
///
/// Every location is attached to a network link. The coordinate is optional;
/// when absent, consumers derive it from the link (see
/// [`Network::resolve_coord`](crate::network::Network::resolve_coord)).
/// A location that represents a designated stop carries the stop's id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    link: LinkId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    coord: Option<Coord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    stop: Option<StopId>,
}

impl Location {
    /// A location at the given coordinate, attached to `link`.
    pub fn new(link: LinkId, coord: Coord) -> Self {
        Self {
            link,
            coord: Some(coord),
            stop: None,
        }
    }

    /// A location known only by its link.
    pub fn on_link(link: LinkId) -> Self {
        Self {
            link,
            coord: None,
            stop: None,
        }
    }

    /// Returns the link this location is attached to.
    pub fn link_id(&self) -> &LinkId {
        &self.link
    }

    /// Returns the explicit coordinate, if any.
    pub fn coord(&self) -> Option<Coord> {
        self.coord
    }

    /// Returns the stop this location represents, if any.
    pub fn stop_id(&self) -> Option<&StopId> {
        self.stop.as_ref()
    }

    /// Returns true if this location is a designated stop.
    pub fn is_stop(&self) -> bool {
        self.stop.is_some()
    }
}

/// A designated boarding/alighting point.
///
/// Only used when the service operates with fixed stops.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stop {
    id: StopId,
    link: LinkId,
    coord: Coord,
}

impl Stop {
    /// Creates a stop on `link` at `coord`.
    pub fn new(id: StopId, link: LinkId, coord: Coord) -> Self {
        Self { id, link, coord }
    }

    pub fn id(&self) -> &StopId {
        &self.id
    }

    pub fn link_id(&self) -> &LinkId {
        &self.link
    }

    pub fn coord(&self) -> Coord {
        self.coord
    }

    /// Returns this stop as a trip location.
    pub fn location(&self) -> Location {
        Location {
            link: self.link.clone(),
            coord: Some(self.coord),
            stop: Some(self.id.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_on_link_has_no_coord() {
        let loc = Location::on_link(LinkId::from("L1"));
        assert_eq!(loc.link_id(), &LinkId::from("L1"));
        assert!(loc.coord().is_none());
        assert!(!loc.is_stop());
    }

    #[test]
    fn stop_location_carries_identity() {
        let stop = Stop::new(
            StopId::from("S1"),
            LinkId::from("L3"),
            Coord { x: 10.0, y: 20.0 },
        );
        let loc = stop.location();

        assert!(loc.is_stop());
        assert_eq!(loc.stop_id(), Some(&StopId::from("S1")));
        assert_eq!(loc.link_id(), &LinkId::from("L3"));
        assert_eq!(loc.coord(), Some(Coord { x: 10.0, y: 20.0 }));
    }

    #[test]
    fn deserialize_minimal_location() {
        let loc: Location = serde_json::from_str(r#"{"link": "L9"}"#).unwrap();
        assert_eq!(loc, Location::on_link(LinkId::from("L9")));

        let loc: Location =
            serde_json::from_str(r#"{"link": "L9", "coord": {"x": 1.0, "y": 2.0}}"#).unwrap();
        assert_eq!(loc.coord(), Some(Coord { x: 1.0, y: 2.0 }));
    }
}
