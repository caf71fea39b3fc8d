//! Least-cost path queries.
//!
//! Routers consume shortest paths through the [`PathCalculator`] trait and
//! never look at the search itself. [`FreeSpeedPathCalculator`] is a plain
//! Dijkstra over free-speed travel times, enough to run the routers without
//! a host simulation.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use std::sync::Arc;

use ordered_float::OrderedFloat;
use tracing::trace;

use super::Network;
use crate::domain::{LinkId, NodeId};

/// Time charged for leaving the first link of a path.
///
/// Vehicles start at the end of the boarding link, so only the move onto the
/// next link is charged rather than the whole link.
pub const FIRST_LINK_TRAVEL_TIME: f64 = 1.0;

/// Errors from path queries.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PathError {
    #[error("unknown link {0}")]
    UnknownLink(LinkId),

    #[error("no path from link {from} to link {to}")]
    NoPath { from: LinkId, to: LinkId },
}

/// Travel time and distance of a least-cost path between two links.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathData {
    /// Includes traversal of both boundary links.
    pub travel_time: f64,
    /// Includes the last link but not the first.
    pub distance: f64,
}

/// Computes least-cost paths between links.
///
/// Implementations may keep search buffers between calls, hence `&mut self`.
/// They are not required to be thread-safe: give each worker its own.
pub trait PathCalculator {
    fn calc_path(
        &mut self,
        from: &LinkId,
        to: &LinkId,
        departure_time: f64,
    ) -> Result<PathData, PathError>;
}

impl<P: PathCalculator + ?Sized> PathCalculator for Box<P> {
    fn calc_path(
        &mut self,
        from: &LinkId,
        to: &LinkId,
        departure_time: f64,
    ) -> Result<PathData, PathError> {
        (**self).calc_path(from, to, departure_time)
    }
}

#[derive(Debug, Clone, Copy)]
struct Label {
    time: f64,
    distance: f64,
}

/// Dijkstra over free-speed link travel times.
///
/// Travel times do not depend on the departure time.
#[derive(Debug)]
pub struct FreeSpeedPathCalculator {
    network: Arc<Network>,
    labels: HashMap<NodeId, Label>,
    queue: BinaryHeap<Reverse<(OrderedFloat<f64>, NodeId)>>,
}

impl FreeSpeedPathCalculator {
    pub fn new(network: Arc<Network>) -> Self {
        Self {
            network,
            labels: HashMap::new(),
            queue: BinaryHeap::new(),
        }
    }

    /// Shortest node-to-node search. Returns the label at `target`.
    fn search(&mut self, source: &NodeId, target: &NodeId) -> Option<Label> {
        self.labels.clear();
        self.queue.clear();

        self.labels.insert(
            source.clone(),
            Label {
                time: 0.0,
                distance: 0.0,
            },
        );
        self.queue.push(Reverse((OrderedFloat(0.0), source.clone())));

        while let Some(Reverse((OrderedFloat(time), node))) = self.queue.pop() {
            let label = self.labels[&node];
            if time > label.time {
                continue; // stale entry
            }
            if &node == target {
                return Some(label);
            }

            for link_id in self.network.out_links(&node) {
                let Some(link) = self.network.link(link_id) else {
                    continue;
                };
                let next = Label {
                    time: label.time + link.travel_time(),
                    distance: label.distance + link.length(),
                };
                let improves = self
                    .labels
                    .get(link.to_node())
                    .is_none_or(|existing| next.time < existing.time);
                if improves {
                    self.labels.insert(link.to_node().clone(), next);
                    self.queue
                        .push(Reverse((OrderedFloat(next.time), link.to_node().clone())));
                }
            }
        }

        None
    }
}

impl PathCalculator for FreeSpeedPathCalculator {
    fn calc_path(
        &mut self,
        from: &LinkId,
        to: &LinkId,
        departure_time: f64,
    ) -> Result<PathData, PathError> {
        let network = Arc::clone(&self.network);
        let from_link = network
            .link(from)
            .ok_or_else(|| PathError::UnknownLink(from.clone()))?;
        let to_link = network
            .link(to)
            .ok_or_else(|| PathError::UnknownLink(to.clone()))?;

        if from == to {
            return Ok(PathData {
                travel_time: FIRST_LINK_TRAVEL_TIME,
                distance: 0.0,
            });
        }

        let inner = self
            .search(from_link.to_node(), to_link.from_node())
            .ok_or_else(|| PathError::NoPath {
                from: from.clone(),
                to: to.clone(),
            })?;

        let path = PathData {
            travel_time: FIRST_LINK_TRAVEL_TIME + inner.time + to_link.travel_time(),
            distance: inner.distance + to_link.length(),
        };
        trace!(%from, %to, departure_time, ?path, "calculated path");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::test_support::corridor;
    use crate::network::Link;
    use geo::Coord;

    fn link(s: &str) -> LinkId {
        LinkId::from(s)
    }

    #[test]
    fn adjacent_links() {
        let mut calc = FreeSpeedPathCalculator::new(Arc::new(corridor(3)));
        let path = calc.calc_path(&link("L0"), &link("L1"), 0.0).unwrap();

        // 1s to leave L0, nothing in between, 100s for L1
        assert_eq!(path.travel_time, 101.0);
        assert_eq!(path.distance, 1000.0);
    }

    #[test]
    fn counts_inner_and_last_links() {
        let mut calc = FreeSpeedPathCalculator::new(Arc::new(corridor(5)));
        let path = calc.calc_path(&link("L0"), &link("L3"), 0.0).unwrap();

        // L1 + L2 inside, L3 last
        assert_eq!(path.travel_time, 1.0 + 200.0 + 100.0);
        assert_eq!(path.distance, 3000.0);
    }

    #[test]
    fn same_link() {
        let mut calc = FreeSpeedPathCalculator::new(Arc::new(corridor(3)));
        let path = calc.calc_path(&link("L1"), &link("L1"), 0.0).unwrap();
        assert_eq!(path.travel_time, FIRST_LINK_TRAVEL_TIME);
        assert_eq!(path.distance, 0.0);
    }

    #[test]
    fn unreachable_pair_is_an_error() {
        // corridor links only go forward
        let mut calc = FreeSpeedPathCalculator::new(Arc::new(corridor(4)));
        let result = calc.calc_path(&link("L2"), &link("L0"), 0.0);
        assert_eq!(
            result,
            Err(PathError::NoPath {
                from: link("L2"),
                to: link("L0"),
            })
        );
    }

    #[test]
    fn unknown_link_is_an_error() {
        let mut calc = FreeSpeedPathCalculator::new(Arc::new(corridor(3)));
        assert_eq!(
            calc.calc_path(&link("X"), &link("L1"), 0.0),
            Err(PathError::UnknownLink(link("X")))
        );
        assert_eq!(
            calc.calc_path(&link("L0"), &link("X"), 0.0),
            Err(PathError::UnknownLink(link("X")))
        );
    }

    #[test]
    fn prefers_faster_route() {
        // N0 -> N1 -> N2 slowly, or N0 -> N2 directly and fast
        let mut network = corridor(3);
        network.add_node(NodeId::from("S"), Coord { x: -10.0, y: 0.0 }).unwrap();
        network
            .add_link(Link::new(link("IN"), NodeId::from("S"), NodeId::from("N0"), 10.0, 10.0))
            .unwrap();
        network
            .add_link(Link::new(link("FAST"), NodeId::from("N0"), NodeId::from("N2"), 3000.0, 100.0))
            .unwrap();
        network.add_node(NodeId::from("E"), Coord { x: 3000.0, y: 0.0 }).unwrap();
        network
            .add_link(Link::new(link("OUT"), NodeId::from("N2"), NodeId::from("E"), 10.0, 10.0))
            .unwrap();

        let mut calc = FreeSpeedPathCalculator::new(Arc::new(network));
        let path = calc.calc_path(&link("IN"), &link("OUT"), 0.0).unwrap();

        // FAST takes 30s, L0 + L1 take 200s
        assert_eq!(path.travel_time, 1.0 + 30.0 + 1.0);
        assert_eq!(path.distance, 3010.0);
    }

    #[test]
    fn reusable_across_queries() {
        let mut calc = FreeSpeedPathCalculator::new(Arc::new(corridor(5)));
        let first = calc.calc_path(&link("L0"), &link("L3"), 0.0).unwrap();
        let _ = calc.calc_path(&link("L3"), &link("L0"), 0.0);
        let again = calc.calc_path(&link("L0"), &link("L3"), 0.0).unwrap();
        assert_eq!(first, again);
    }
}
