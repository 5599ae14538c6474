//! Trait for talking to a transit real-time service.

use tracing::error;

use crate::error::Result;
use crate::models::{Departure, ProviderMap, Route, RouteId, Stop};

/// The four NexTrip resources.
///
/// Every method issues exactly one GET and returns its own fresh result, so
/// calls are independent and may run concurrently.
#[async_trait::async_trait]
pub trait TransitApi: Send + Sync {
    /// Providers keyed by id.
    async fn list_providers(&self) -> Result<ProviderMap>;

    /// All routes, in the order the service returns them.
    async fn list_routes(&self) -> Result<Vec<Route>>;

    /// Stops on `route` travelling in `direction`. The direction code is
    /// service-defined and passed through unchecked.
    async fn list_stops(&self, route: RouteId, direction: i64) -> Result<Vec<Stop>>;

    /// Upcoming departures from `stop_id` on `route` in `direction`.
    async fn list_departures(
        &self,
        route: RouteId,
        direction: i64,
        stop_id: &str,
    ) -> Result<Vec<Departure>>;
}

/// Logs a failed fetch and falls back to an empty result.
///
/// Callers that use this cannot tell a failed request from an empty listing.
pub fn or_report<T: Default>(result: Result<T>, what: &str) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            error!(error = %e, kind = ?e.kind(), url = e.url(), what, "NexTrip fetch failed");
            T::default()
        }
    }
}
