//! Service configuration for trip routing.

use serde::{Deserialize, Serialize};

/// How travellers get on and off the service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OperatingScheme {
    /// Pickup and drop-off at any link.
    #[default]
    DoorToDoor,
    /// Pickup and drop-off at designated stops only.
    StopBased,
    /// Designated stops derived from every link inside the service area.
    ServiceAreaBased,
}

impl OperatingScheme {
    /// Returns true if this scheme routes via stops.
    pub fn uses_stops(self) -> bool {
        matches!(
            self,
            OperatingScheme::StopBased | OperatingScheme::ServiceAreaBased
        )
    }
}

/// Errors from invalid configuration.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("service mode must not be empty")]
    EmptyMode,

    #[error("maxTravelTimeAlpha must be at least 1, got {0}")]
    AlphaBelowOne(f64),

    #[error("maxTravelTimeBeta must be non-negative, got {0}")]
    NegativeBeta(f64),

    #[error("maxWaitTime must be non-negative, got {0}")]
    NegativeWaitTime(f64),

    #[error("maxWalkDistance must be positive, got {0}")]
    NonPositiveWalkDistance(f64),

    #[error("walk speed must be positive, got {0}")]
    NonPositiveWalkSpeed(f64),

    #[error("beelineDistanceFactor must be at least 1, got {0}")]
    BeelineFactorBelowOne(f64),

    #[error("operating scheme {0:?} requires a stop finder")]
    MissingStopFinder(OperatingScheme),
}

/// Configuration of the on-demand service.
///
/// These constants are read-only for the whole simulation run and shared by
/// every router.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServiceConfig {
    /// Mode tag of ride legs. Interaction and fallback names derive from it.
    pub mode: String,

    pub operating_scheme: OperatingScheme,

    /// Multiplier on the unshared ride time in the service-level bound.
    pub max_travel_time_alpha: f64,

    /// Constant term of the service-level bound (seconds).
    pub max_travel_time_beta: f64,

    /// Maximum wait for pickup (seconds). Passed on to dispatch.
    pub max_wait_time: f64,

    /// Whether door-to-door trips walk between the traveller's location and
    /// the pickup/drop-off link.
    pub insert_access_egress_walk: bool,

    /// Whether to report every trip that falls back to walking.
    pub print_detailed_warnings: bool,

    /// Search radius for access and egress stops (metres).
    pub max_walk_distance: f64,
}

impl ServiceConfig {
    /// Create a configuration for `mode` with the given service-level constants.
    pub fn new(
        mode: impl Into<String>,
        operating_scheme: OperatingScheme,
        max_travel_time_alpha: f64,
        max_travel_time_beta: f64,
    ) -> Self {
        Self {
            mode: mode.into(),
            operating_scheme,
            max_travel_time_alpha,
            max_travel_time_beta,
            ..Self::default()
        }
    }

    /// The service-level bound for a ride whose direct path takes
    /// `unshared_ride_time`.
    ///
    /// # Examples
    ///
    /// ```
    /// use drt_routing::routing::{OperatingScheme, ServiceConfig};
    ///
    /// let config = ServiceConfig::new("drt", OperatingScheme::DoorToDoor, 1.5, 120.0);
    /// assert_eq!(config.max_travel_time(600.0), 1020.0);
    /// ```
    pub fn max_travel_time(&self, unshared_ride_time: f64) -> f64 {
        self.max_travel_time_alpha * unshared_ride_time + self.max_travel_time_beta
    }

    /// Activity type for boarding and alighting.
    pub fn stage_activity_type(&self) -> String {
        format!("{} interaction", self.mode)
    }

    /// Mode tag for trips that walk instead of using the service.
    pub fn fallback_mode(&self) -> String {
        format!("{}_walk", self.mode)
    }

    /// Checks every constant is in range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.mode.trim().is_empty() {
            return Err(ConfigError::EmptyMode);
        }
        if self.max_travel_time_alpha.is_nan() || self.max_travel_time_alpha < 1.0 {
            return Err(ConfigError::AlphaBelowOne(self.max_travel_time_alpha));
        }
        if self.max_travel_time_beta.is_nan() || self.max_travel_time_beta < 0.0 {
            return Err(ConfigError::NegativeBeta(self.max_travel_time_beta));
        }
        if self.max_wait_time.is_nan() || self.max_wait_time < 0.0 {
            return Err(ConfigError::NegativeWaitTime(self.max_wait_time));
        }
        if self.max_walk_distance.is_nan() || self.max_walk_distance <= 0.0 {
            return Err(ConfigError::NonPositiveWalkDistance(self.max_walk_distance));
        }
        Ok(())
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            mode: "drt".to_string(),
            operating_scheme: OperatingScheme::DoorToDoor,
            max_travel_time_alpha: 1.7,
            max_travel_time_beta: 120.0,
            max_wait_time: 600.0, // 10 minutes
            insert_access_egress_walk: false,
            print_detailed_warnings: true,
            max_walk_distance: 500.0,
        }
    }
}
