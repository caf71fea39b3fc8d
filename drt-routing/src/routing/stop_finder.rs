//! Finding boarding and alighting stops.
//!
//! Stops are indexed in an R-tree over their planar coordinates. A stop
//! qualifies for a location when it lies within the walk radius; the nearest
//! qualifying stop wins, ties going to the smaller stop id.

use std::fmt;
use std::sync::Arc;

use geo::{Contains, MultiPolygon, Point};
use rstar::{PointDistance, RTree, RTreeObject, AABB};
use tracing::trace;

use super::RoutingError;
use crate::domain::{Location, Stop, StopId};
use crate::network::Network;

/// The stops chosen for one trip.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StopPair {
    /// Where the traveller boards, if any stop is in reach of the origin.
    pub access: Option<Stop>,
    /// Where the traveller alights, if any stop is in reach of the destination.
    pub egress: Option<Stop>,
}

/// Chooses boarding and alighting stops for a trip.
///
/// Implementations are read-only and shared between workers.
pub trait StopFinder: Send + Sync {
    /// Finds the boarding stop for `origin` and the alighting stop for
    /// `destination`, independently of each other.
    fn find_stops(
        &self,
        origin: &Location,
        destination: &Location,
    ) -> Result<StopPair, RoutingError>;
}

#[derive(Debug, Clone)]
struct StopNode {
    stop: Arc<Stop>,
    point: [f64; 2],
}

impl StopNode {
    fn new(stop: Arc<Stop>) -> Self {
        let coord = stop.coord();
        Self {
            stop,
            point: [coord.x, coord.y],
        }
    }
}

impl RTreeObject for StopNode {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for StopNode {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

/// Picks the closest stop within a fixed radius.
#[derive(Clone)]
pub struct ClosestStopFinder {
    network: Arc<Network>,
    index: RTree<StopNode>,
    max_distance: f64,
}

impl ClosestStopFinder {
    /// Indexes `stops` for lookups within `max_distance` metres.
    pub fn new(network: Arc<Network>, stops: Vec<Stop>, max_distance: f64) -> Self {
        let nodes = stops
            .into_iter()
            .map(|stop| StopNode::new(Arc::new(stop)))
            .collect();
        Self {
            network,
            index: RTree::bulk_load(nodes),
            max_distance,
        }
    }

    /// Number of indexed stops.
    pub fn len(&self) -> usize {
        self.index.size()
    }

    pub fn is_empty(&self) -> bool {
        self.index.size() == 0
    }

    fn closest(&self, location: &Location) -> Result<Option<Stop>, RoutingError> {
        let coord = self.network.resolve_coord(location)?;
        let query = [coord.x, coord.y];
        let radius_2 = self.max_distance * self.max_distance;

        let best = self
            .index
            .locate_within_distance(query, radius_2)
            .map(|node| (node.distance_2(&query), node))
            .min_by(|(da, a), (db, b)| {
                da.total_cmp(db)
                    .then_with(|| stop_id(a).cmp(stop_id(b)))
            })
            .map(|(_, node)| Stop::clone(&node.stop));

        trace!(
            link = %location.link_id(),
            stop = ?best.as_ref().map(Stop::id),
            "closest stop"
        );
        Ok(best)
    }
}

impl fmt::Debug for ClosestStopFinder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClosestStopFinder")
            .field("stops", &self.index.size())
            .field("max_distance", &self.max_distance)
            .finish()
    }
}

fn stop_id(node: &StopNode) -> &StopId {
    node.stop.id()
}

impl StopFinder for ClosestStopFinder {
    fn find_stops(
        &self,
        origin: &Location,
        destination: &Location,
    ) -> Result<StopPair, RoutingError> {
        Ok(StopPair {
            access: self.closest(origin)?,
            egress: self.closest(destination)?,
        })
    }
}

/// Like [`ClosestStopFinder`], but only stops inside a service area qualify.
#[derive(Debug, Clone)]
pub struct ServiceAreaStopFinder {
    inner: ClosestStopFinder,
}

impl ServiceAreaStopFinder {
    pub fn new(
        network: Arc<Network>,
        stops: Vec<Stop>,
        area: &MultiPolygon<f64>,
        max_distance: f64,
    ) -> Self {
        let inside = stops
            .into_iter()
            .filter(|stop| area.contains(&Point::from(stop.coord())))
            .collect();
        Self {
            inner: ClosestStopFinder::new(network, inside, max_distance),
        }
    }

    /// Number of stops inside the service area.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl StopFinder for ServiceAreaStopFinder {
    fn find_stops(
        &self,
        origin: &Location,
        destination: &Location,
    ) -> Result<StopPair, RoutingError> {
        self.inner.find_stops(origin, destination)
    }
}

/// Derives one stop per link ending inside `area`.
///
/// The stop takes the link's id and sits at the link's to-node. Stops are
/// returned sorted by id.
pub fn stops_from_service_area(network: &Network, area: &MultiPolygon<f64>) -> Vec<Stop> {
    let mut stops: Vec<Stop> = network
        .links()
        .filter_map(|link| {
            let coord = network.node_coord(link.to_node())?;
            area.contains(&Point::from(coord)).then(|| {
                Stop::new(
                    StopId::new(link.id().as_str()),
                    link.id().clone(),
                    coord,
                )
            })
        })
        .collect();
    stops.sort_by(|a, b| a.id().cmp(b.id()));
    stops
}
