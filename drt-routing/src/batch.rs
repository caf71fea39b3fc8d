//! Routing many requests in parallel.
//!
//! Each rayon worker builds its own router, with its own path calculator,
//! from a shared [`RouterFactory`]. Routers are never shared between
//! threads.

use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

use crate::domain::{TravellerId, Trip};
use crate::network::PathCalculator;
use crate::routing::{RouterFactory, RoutingError, RoutingModule, ServiceRouter, TripRequest};
use crate::validation::{PlanChecker, StructuralViolation};

/// Error from batch routing.
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("request {index} for traveller {traveller} failed: {source}")]
    Routing {
        index: usize,
        traveller: TravellerId,
        source: RoutingError,
    },

    #[error("plan of traveller {traveller} (request {index}) is malformed: {source}")]
    Structure {
        index: usize,
        traveller: TravellerId,
        source: StructuralViolation,
    },

    #[error("failed to build worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}

/// A routed trip together with the request it answers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutedTrip {
    pub traveller: TravellerId,
    pub departure_time: f64,
    pub trip: Trip,
}

/// Routes batches of requests over a rayon pool.
#[derive(Debug, Clone)]
pub struct BatchRouter {
    factory: RouterFactory,
    checker: Option<PlanChecker>,
    workers: Option<usize>,
}

impl BatchRouter {
    pub fn new(factory: RouterFactory) -> Self {
        Self {
            factory,
            checker: None,
            workers: None,
        }
    }

    /// Check every routed trip's plan for activity/leg alternation.
    ///
    /// Violations are reported to the factory's diagnostic sink and fail the
    /// batch.
    pub fn with_plan_checks(mut self, enabled: bool) -> Self {
        self.checker = enabled.then(|| PlanChecker::new(self.factory.sink().clone()));
        self
    }

    /// Run on a dedicated pool of `workers` threads instead of the global one.
    pub fn with_workers(mut self, workers: Option<usize>) -> Self {
        self.workers = workers;
        self
    }

    /// Routes every request, returning trips in request order.
    ///
    /// `new_calculator` is called once per worker.
    ///
    /// # Errors
    ///
    /// Returns the first failure encountered. Which failure is reported when
    /// several requests fail is unspecified.
    pub fn route_all<P, F>(
        &self,
        requests: &[TripRequest],
        new_calculator: F,
    ) -> Result<Vec<RoutedTrip>, BatchError>
    where
        P: PathCalculator,
        F: Fn() -> P + Sync + Send,
    {
        info!(
            requests = requests.len(),
            workers = ?self.workers,
            check_plans = self.checker.is_some(),
            "routing batch"
        );

        match self.workers {
            Some(workers) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(workers)
                    .build()?;
                pool.install(|| self.route_parallel(requests, &new_calculator))
            }
            None => self.route_parallel(requests, &new_calculator),
        }
    }

    fn route_parallel<P, F>(
        &self,
        requests: &[TripRequest],
        new_calculator: &F,
    ) -> Result<Vec<RoutedTrip>, BatchError>
    where
        P: PathCalculator,
        F: Fn() -> P + Sync + Send,
    {
        requests
            .par_iter()
            .enumerate()
            .map_init(
                || self.factory.build(new_calculator()),
                |router, (index, request)| self.route_one(router, index, request),
            )
            .collect()
    }

    fn route_one<P: PathCalculator>(
        &self,
        router: &mut ServiceRouter<P>,
        index: usize,
        request: &TripRequest,
    ) -> Result<RoutedTrip, BatchError> {
        let trip = router
            .calc_route(request)
            .map_err(|source| BatchError::Routing {
                index,
                traveller: request.traveller.clone(),
                source,
            })?;

        if let Some(checker) = &self.checker {
            let plan = request.to_plan(trip.clone());
            let description = format!("plan of traveller {}", request.traveller);
            checker
                .check(&description, plan.elements())
                .map_err(|source| BatchError::Structure {
                    index,
                    traveller: request.traveller.clone(),
                    source,
                })?;
        }

        debug!(index, traveller = %request.traveller, elements = trip.len(), "routed request");
        Ok(RoutedTrip {
            traveller: request.traveller.clone(),
            departure_time: request.departure_time,
            trip,
        })
    }
}
