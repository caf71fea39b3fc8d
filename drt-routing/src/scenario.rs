//! Scenario files.
//!
//! A scenario is a JSON document holding everything needed to route a batch
//! of trips: the road network, the service configuration, designated stops
//! or a service area, walk parameters and the requests themselves.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use geo::{Coord, LineString, MultiPolygon, Polygon};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::batch::{BatchError, BatchRouter, RoutedTrip};
use crate::domain::{LinkId, NodeId, Stop};
use crate::network::{FreeSpeedPathCalculator, Link, Network, NetworkError};
use crate::routing::{
    ClosestStopFinder, ConfigError, DiagnosticSink, OperatingScheme, RouterFactory,
    ServiceAreaStopFinder, ServiceConfig, StopFinder, TripRequest, stops_from_service_area,
};
use crate::walk::{TeleportationWalkRouter, WalkConfig};

/// Error from loading or running a scenario.
#[derive(Debug, thiserror::Error)]
pub enum ScenarioError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid scenario JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid network: {0}")]
    Network(#[from] NetworkError),

    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("operating scheme {0:?} requires a service area")]
    MissingServiceArea(OperatingScheme),

    #[error(transparent)]
    Batch(#[from] BatchError),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDef {
    pub id: NodeId,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkDef {
    pub id: LinkId,
    pub from: NodeId,
    pub to: NodeId,
    /// Metres.
    pub length: f64,
    /// Metres per second.
    pub freespeed: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkDef {
    pub nodes: Vec<NodeDef>,
    pub links: Vec<LinkDef>,
}

impl NetworkDef {
    pub fn build(&self) -> Result<Network, NetworkError> {
        let mut network = Network::new();
        for node in &self.nodes {
            network.add_node(node.id.clone(), Coord { x: node.x, y: node.y })?;
        }
        for link in &self.links {
            network.add_link(Link::new(
                link.id.clone(),
                link.from.clone(),
                link.to.clone(),
                link.length,
                link.freespeed,
            ))?;
        }
        Ok(network)
    }
}

/// A routing scenario as read from JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    #[serde(default)]
    pub service: ServiceConfig,

    #[serde(default)]
    pub walk: WalkConfig,

    pub network: NetworkDef,

    #[serde(default)]
    pub stops: Vec<Stop>,

    /// Exterior rings of the service area polygons, as `[x, y]` pairs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_area: Option<Vec<Vec<[f64; 2]>>>,

    #[serde(default)]
    pub requests: Vec<TripRequest>,

    /// Check every routed plan for activity/leg alternation.
    #[serde(default)]
    pub check_plans: bool,

    /// Worker threads. Defaults to rayon's global pool.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workers: Option<usize>,
}

impl Scenario {
    /// Load a scenario from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ScenarioError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ScenarioError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&contents)
    }

    pub fn from_json(json: &str) -> Result<Self, ScenarioError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Returns the service area, if one is given.
    pub fn service_area(&self) -> Option<MultiPolygon<f64>> {
        let rings = self.service_area.as_ref()?;
        let polygons = rings
            .iter()
            .map(|ring| {
                let exterior: LineString<f64> =
                    ring.iter().map(|&[x, y]| Coord { x, y }).collect();
                Polygon::new(exterior, vec![])
            })
            .collect();
        Some(MultiPolygon::new(polygons))
    }

    /// Builds the stop finder the operating scheme needs, if any.
    ///
    /// Stop-based service uses the listed stops, restricted to the service
    /// area when one is given. Service-area-based service derives its stops
    /// from the network links inside the area.
    pub fn stop_finder(
        &self,
        network: &Arc<Network>,
    ) -> Result<Option<Arc<dyn StopFinder>>, ScenarioError> {
        let radius = self.service.max_walk_distance;
        let finder: Arc<dyn StopFinder> = match self.service.operating_scheme {
            OperatingScheme::DoorToDoor => return Ok(None),
            OperatingScheme::StopBased => match self.service_area() {
                Some(area) => Arc::new(ServiceAreaStopFinder::new(
                    Arc::clone(network),
                    self.stops.clone(),
                    &area,
                    radius,
                )),
                None => Arc::new(ClosestStopFinder::new(
                    Arc::clone(network),
                    self.stops.clone(),
                    radius,
                )),
            },
            OperatingScheme::ServiceAreaBased => {
                let area = self
                    .service_area()
                    .ok_or(ScenarioError::MissingServiceArea(self.service.operating_scheme))?;
                let stops = stops_from_service_area(network, &area);
                info!(stops = stops.len(), "derived stops from service area");
                Arc::new(ClosestStopFinder::new(Arc::clone(network), stops, radius))
            }
        };
        Ok(Some(finder))
    }

    /// Builds the router factory for this scenario.
    pub fn router_factory(
        &self,
        network: &Arc<Network>,
        sink: Arc<dyn DiagnosticSink>,
    ) -> Result<RouterFactory, ScenarioError> {
        self.walk.validate()?;
        let walk_router = TeleportationWalkRouter::new(Arc::clone(network), self.walk.clone());
        let factory = RouterFactory::new(
            Arc::new(self.service.clone()),
            Arc::new(walk_router),
            self.stop_finder(network)?,
            sink,
        )?;
        Ok(factory)
    }

    /// Routes every request of the scenario.
    pub fn run(&self, sink: Arc<dyn DiagnosticSink>) -> Result<Vec<RoutedTrip>, ScenarioError> {
        let network = Arc::new(self.network.build()?);
        info!(
            nodes = network.node_count(),
            links = network.link_count(),
            scheme = ?self.service.operating_scheme,
            "loaded network"
        );

        let factory = self.router_factory(&network, sink)?;
        let routed = BatchRouter::new(factory)
            .with_plan_checks(self.check_plans)
            .with_workers(self.workers)
            .route_all(&self.requests, || {
                FreeSpeedPathCalculator::new(Arc::clone(&network))
            })?;
        Ok(routed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TravellerId;
    use crate::routing::NullSink;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SCENARIO: &str = r#"{
        "service": {
            "mode": "drt",
            "operatingScheme": "doorToDoor",
            "maxTravelTimeAlpha": 1.5,
            "maxTravelTimeBeta": 120.0
        },
        "network": {
            "nodes": [
                {"id": "A", "x": 0.0, "y": 0.0},
                {"id": "B", "x": 1000.0, "y": 0.0},
                {"id": "C", "x": 2000.0, "y": 0.0},
                {"id": "D", "x": 3000.0, "y": 0.0}
            ],
            "links": [
                {"id": "AB", "from": "A", "to": "B", "length": 1000.0, "freespeed": 10.0},
                {"id": "BC", "from": "B", "to": "C", "length": 1000.0, "freespeed": 10.0},
                {"id": "CD", "from": "C", "to": "D", "length": 1000.0, "freespeed": 10.0}
            ]
        },
        "stops": [
            {"id": "S1", "link": "AB", "coord": {"x": 1000.0, "y": 0.0}},
            {"id": "S2", "link": "CD", "coord": {"x": 3000.0, "y": 0.0}}
        ],
        "requests": [
            {
                "origin": {"link": "AB"},
                "destination": {"link": "CD"},
                "departureTime": 3600.0,
                "traveller": "p1"
            },
            {
                "origin": {"link": "BC"},
                "destination": {"link": "BC"},
                "departureTime": 7200.0,
                "traveller": "p2"
            }
        ],
        "checkPlans": true
    }"#;

    fn scenario() -> Scenario {
        Scenario::from_json(SCENARIO).unwrap()
    }

    #[test]
    fn parse_scenario_with_defaults() {
        let scenario = scenario();
        assert_eq!(scenario.service.mode, "drt");
        assert_eq!(scenario.service.max_wait_time, 600.0);
        assert_eq!(scenario.walk, WalkConfig::default());
        assert_eq!(scenario.network.nodes.len(), 4);
        assert_eq!(scenario.stops.len(), 2);
        assert_eq!(scenario.requests.len(), 2);
        assert!(scenario.check_plans);
        assert_eq!(scenario.workers, None);
        assert!(scenario.service_area().is_none());
    }

    #[test]
    fn run_door_to_door() {
        let routed = scenario().run(Arc::new(NullSink)).unwrap();
        assert_eq!(routed.len(), 2);

        // AB -> CD: 1s + BC 100s + CD 100s
        let ride = routed[0].trip.ride_legs().next().unwrap();
        assert_eq!(ride.ride().unwrap().unshared_ride_time, 201.0);
        assert_eq!(ride.travel_time(), 1.5 * 201.0 + 120.0);

        assert_eq!(routed[1].traveller, TravellerId::from("p2"));
        assert_eq!(routed[1].trip.modes(), vec!["drt_walk"]);
    }

    #[test]
    fn run_stop_based() {
        let mut scenario = scenario();
        scenario.service.operating_scheme = OperatingScheme::StopBased;
        scenario.service.max_walk_distance = 600.0;

        let routed = scenario.run(Arc::new(NullSink)).unwrap();
        // AB midpoint is 500m from S1, CD midpoint 500m from S2
        assert_eq!(
            routed[0].trip.modes(),
            vec!["walk", "drt", "walk"]
        );
        // BC midpoint is closest to S1 from both ends, so the trip walks
        assert_eq!(routed[1].trip.modes(), vec!["drt_walk"]);
    }

    #[test]
    fn service_area_scheme_requires_area() {
        let mut scenario = scenario();
        scenario.service.operating_scheme = OperatingScheme::ServiceAreaBased;
        let network = Arc::new(scenario.network.build().unwrap());

        assert!(matches!(
            scenario.stop_finder(&network),
            Err(ScenarioError::MissingServiceArea(
                OperatingScheme::ServiceAreaBased
            ))
        ));
    }

    #[test]
    fn service_area_scheme_derives_stops() {
        let mut scenario = scenario();
        scenario.service.operating_scheme = OperatingScheme::ServiceAreaBased;
        scenario.service.max_walk_distance = 600.0;
        // covers nodes B and C: stops on links AB and BC
        scenario.service_area = Some(vec![vec![
            [500.0, -100.0],
            [2500.0, -100.0],
            [2500.0, 100.0],
            [500.0, 100.0],
            [500.0, -100.0],
        ]]);

        let routed = scenario.run(Arc::new(NullSink)).unwrap();
        let ride = routed[0].trip.ride_legs().next().unwrap();
        assert_eq!(ride.start_link(), &LinkId::from("AB"));
        assert_eq!(ride.end_link(), &LinkId::from("BC"));
    }

    #[test]
    fn invalid_config_is_reported() {
        let mut scenario = scenario();
        scenario.service.max_travel_time_beta = -1.0;
        assert!(matches!(
            scenario.run(Arc::new(NullSink)),
            Err(ScenarioError::Config(ConfigError::NegativeBeta(_)))
        ));
    }

    #[test]
    fn degenerate_walk_config_is_reported() {
        let mut scenario = scenario();
        scenario.walk.speed = 0.0;
        assert!(matches!(
            scenario.run(Arc::new(NullSink)),
            Err(ScenarioError::Config(ConfigError::NonPositiveWalkSpeed(_)))
        ));

        let mut scenario = self::scenario();
        scenario.walk.speed = -1.0;
        assert!(matches!(
            scenario.run(Arc::new(NullSink)),
            Err(ScenarioError::Config(ConfigError::NonPositiveWalkSpeed(_)))
        ));
    }

    #[test]
    fn bad_network_is_reported() {
        let mut scenario = scenario();
        scenario.network.links[0].to = NodeId::from("Z");
        assert!(matches!(
            scenario.run(Arc::new(NullSink)),
            Err(ScenarioError::Network(NetworkError::UnknownNode(_)))
        ));
    }

    #[test]
    fn load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(SCENARIO.as_bytes()).unwrap();

        let scenario = Scenario::from_path(file.path()).unwrap();
        assert_eq!(scenario, self::scenario());
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = Scenario::from_path(dir.path().join("missing.json"));
        assert!(matches!(result, Err(ScenarioError::Io { .. })));
    }

    #[test]
    fn malformed_json_is_reported() {
        assert!(matches!(
            Scenario::from_json("{\"network\": 3}"),
            Err(ScenarioError::Json(_))
        ));
    }
}
