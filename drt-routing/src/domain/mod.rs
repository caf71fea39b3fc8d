//! Domain types for trip routing.
//!
//! Locations, stops, legs, activities and the trips assembled from them.
//! All of these are created fresh for each routing call.

mod activity;
mod clock;
mod ids;
mod leg;
mod location;
mod trip;

pub use activity::{Activity, STAGE_ACTIVITY_DURATION};
pub use clock::Clock;
pub use ids::{LinkId, NodeId, StopId, TravellerId};
pub use leg::{Leg, RideAttributes};
pub use location::{Location, Stop};
pub use trip::{ElementKind, Plan, PlanElement, Trip};
