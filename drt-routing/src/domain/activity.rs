//! Activity type.

use serde::{Deserialize, Serialize};

use super::Location;

/// Maximum duration of a boarding or alighting activity, in seconds.
pub const STAGE_ACTIVITY_DURATION: f64 = 1.0;

/// Something the traveller does at a location between legs.
///
/// Within a trip, activities are interaction activities: boarding or
/// alighting the service, or a change between walk segments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    #[serde(rename = "type")]
    activity_type: String,
    location: Location,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    maximum_duration: Option<f64>,
}

impl Activity {
    /// Creates an activity with no maximum duration.
    pub fn new(activity_type: impl Into<String>, location: Location) -> Self {
        Self {
            activity_type: activity_type.into(),
            location,
            maximum_duration: None,
        }
    }

    /// Creates a boarding/alighting activity at `location`.
    ///
    /// Stage activities last [`STAGE_ACTIVITY_DURATION`] so that the
    /// interaction with the vehicle takes a small but nonzero time.
    pub fn stage(activity_type: impl Into<String>, location: Location) -> Self {
        Self::new(activity_type, location).with_maximum_duration(STAGE_ACTIVITY_DURATION)
    }

    pub fn with_maximum_duration(mut self, duration: f64) -> Self {
        self.maximum_duration = Some(duration);
        self
    }

    pub fn activity_type(&self) -> &str {
        &self.activity_type
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn maximum_duration(&self) -> Option<f64> {
        self.maximum_duration
    }
}
