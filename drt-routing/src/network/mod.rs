//! Road network the service drives on.
//!
//! The network is loaded once per simulation run and shared read-only
//! between all routers.

mod path;

use std::collections::HashMap;

use geo::Coord;

use crate::domain::{LinkId, Location, NodeId};

pub use path::{
    FIRST_LINK_TRAVEL_TIME, FreeSpeedPathCalculator, PathCalculator, PathData, PathError,
};

/// Errors building or querying a network.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NetworkError {
    #[error("unknown link {0}")]
    UnknownLink(LinkId),

    #[error("unknown node {0}")]
    UnknownNode(NodeId),

    #[error("duplicate node {0}")]
    DuplicateNode(NodeId),

    #[error("duplicate link {0}")]
    DuplicateLink(LinkId),

    #[error("invalid link {link}: {reason}")]
    InvalidLink { link: LinkId, reason: &'static str },
}

/// A directed link between two nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    id: LinkId,
    from: NodeId,
    to: NodeId,
    length: f64,
    freespeed: f64,
}

impl Link {
    /// Creates a link. `length` is in metres, `freespeed` in metres per second.
    pub fn new(id: LinkId, from: NodeId, to: NodeId, length: f64, freespeed: f64) -> Self {
        Self {
            id,
            from,
            to,
            length,
            freespeed,
        }
    }

    pub fn id(&self) -> &LinkId {
        &self.id
    }

    pub fn from_node(&self) -> &NodeId {
        &self.from
    }

    pub fn to_node(&self) -> &NodeId {
        &self.to
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    /// Time to traverse the link at free speed.
    pub fn travel_time(&self) -> f64 {
        self.length / self.freespeed
    }
}

/// A directed road network.
#[derive(Debug, Clone, Default)]
pub struct Network {
    nodes: HashMap<NodeId, Coord>,
    links: HashMap<LinkId, Link>,
    /// Outgoing links per node, in insertion order so searches are deterministic.
    out_links: HashMap<NodeId, Vec<LinkId>>,
}

impl Network {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node at `coord`.
    pub fn add_node(&mut self, id: NodeId, coord: Coord) -> Result<(), NetworkError> {
        if self.nodes.contains_key(&id) {
            return Err(NetworkError::DuplicateNode(id));
        }
        self.nodes.insert(id, coord);
        Ok(())
    }

    /// Adds a link between two existing nodes.
    ///
    /// # Errors
    ///
    /// Returns `Err` if:
    /// - a link with the same id exists
    /// - either end node is unknown
    /// - the length is negative or the free speed is not positive
    pub fn add_link(&mut self, link: Link) -> Result<(), NetworkError> {
        if self.links.contains_key(&link.id) {
            return Err(NetworkError::DuplicateLink(link.id));
        }
        for node in [&link.from, &link.to] {
            if !self.nodes.contains_key(node) {
                return Err(NetworkError::UnknownNode(node.clone()));
            }
        }
        if link.length.is_nan() || link.length < 0.0 {
            return Err(NetworkError::InvalidLink {
                link: link.id,
                reason: "length must be non-negative",
            });
        }
        if link.freespeed.is_nan() || link.freespeed <= 0.0 {
            return Err(NetworkError::InvalidLink {
                link: link.id,
                reason: "free speed must be positive",
            });
        }

        self.out_links
            .entry(link.from.clone())
            .or_default()
            .push(link.id.clone());
        self.links.insert(link.id.clone(), link);
        Ok(())
    }

    pub fn link(&self, id: &LinkId) -> Option<&Link> {
        self.links.get(id)
    }

    pub fn node_coord(&self, id: &NodeId) -> Option<Coord> {
        self.nodes.get(id).copied()
    }

    /// Returns all links, in no particular order.
    pub fn links(&self) -> impl Iterator<Item = &Link> {
        self.links.values()
    }

    /// Returns the links leaving `node`.
    pub fn out_links(&self, node: &NodeId) -> &[LinkId] {
        self.out_links.get(node).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the representative coordinate of a link: its midpoint.
    pub fn link_coord(&self, id: &LinkId) -> Result<Coord, NetworkError> {
        let link = self
            .link(id)
            .ok_or_else(|| NetworkError::UnknownLink(id.clone()))?;
        let from = self
            .node_coord(&link.from)
            .ok_or_else(|| NetworkError::UnknownNode(link.from.clone()))?;
        let to = self
            .node_coord(&link.to)
            .ok_or_else(|| NetworkError::UnknownNode(link.to.clone()))?;
        Ok(Coord {
            x: (from.x + to.x) / 2.0,
            y: (from.y + to.y) / 2.0,
        })
    }

    /// Returns the coordinate of a location, falling back to its link's
    /// coordinate when the location has none.
    pub fn resolve_coord(&self, location: &Location) -> Result<Coord, NetworkError> {
        match location.coord() {
            Some(coord) => Ok(coord),
            None => self.link_coord(location.link_id()),
        }
    }
}
