//! Assembling routers from their collaborators.

use std::sync::Arc;

use super::{
    ConfigError, DiagnosticSink, DirectRideBuilder, DoorToDoorRouter, RoutingError,
    RoutingModule, ServiceConfig, StopBasedRouter, StopFinder, TripRequest,
};
use crate::domain::Trip;
use crate::network::PathCalculator;
use crate::walk::WalkRouter;

/// The router for the configured operating scheme.
pub enum ServiceRouter<P> {
    DoorToDoor(DoorToDoorRouter<P>),
    StopBased(StopBasedRouter<P>),
}

impl<P: PathCalculator> RoutingModule for ServiceRouter<P> {
    fn calc_route(&mut self, request: &TripRequest) -> Result<Trip, RoutingError> {
        match self {
            ServiceRouter::DoorToDoor(router) => router.calc_route(request),
            ServiceRouter::StopBased(router) => router.calc_route(request),
        }
    }
}

#[derive(Clone)]
enum Scheme {
    DoorToDoor,
    StopBased(Arc<dyn StopFinder>),
}

/// Builds one router per worker from shared, read-only collaborators.
///
/// Each router gets its own path calculator since calculators keep search
/// state between calls.
#[derive(Clone)]
pub struct RouterFactory {
    config: Arc<ServiceConfig>,
    walk_router: Arc<dyn WalkRouter>,
    scheme: Scheme,
    sink: Arc<dyn DiagnosticSink>,
}

impl RouterFactory {
    /// Create a factory for `config`.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the configuration is invalid, or if the operating
    /// scheme routes via stops and no stop finder is given.
    pub fn new(
        config: Arc<ServiceConfig>,
        walk_router: Arc<dyn WalkRouter>,
        stop_finder: Option<Arc<dyn StopFinder>>,
        sink: Arc<dyn DiagnosticSink>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let scheme = match (config.operating_scheme.uses_stops(), stop_finder) {
            (false, _) => Scheme::DoorToDoor,
            (true, Some(finder)) => Scheme::StopBased(finder),
            (true, None) => return Err(ConfigError::MissingStopFinder(config.operating_scheme)),
        };

        Ok(Self {
            config,
            walk_router,
            scheme,
            sink,
        })
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn sink(&self) -> &Arc<dyn DiagnosticSink> {
        &self.sink
    }

    /// Builds a router that owns `calculator`.
    pub fn build<P: PathCalculator>(&self, calculator: P) -> ServiceRouter<P> {
        let rides = DirectRideBuilder::new(calculator, Arc::clone(&self.config));
        match &self.scheme {
            Scheme::DoorToDoor => ServiceRouter::DoorToDoor(DoorToDoorRouter::new(
                rides,
                Arc::clone(&self.walk_router),
                Arc::clone(&self.config),
                Arc::clone(&self.sink),
            )),
            Scheme::StopBased(finder) => ServiceRouter::StopBased(StopBasedRouter::new(
                rides,
                Arc::clone(&self.walk_router),
                Arc::clone(finder),
                Arc::clone(&self.config),
                Arc::clone(&self.sink),
            )),
        }
    }
}

impl std::fmt::Debug for RouterFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouterFactory")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
