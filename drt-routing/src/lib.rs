//! Trip routing for an on-demand ride service.
//!
//! Answers: "how does this traveller get from here to there using the
//! service?" Trips are either picked up door-to-door or routed via
//! designated stops, and fall back to walking when the service cannot be
//! used.

pub mod batch;
pub mod domain;
pub mod network;
pub mod routing;
pub mod scenario;
pub mod validation;
pub mod walk;
