use async_trait::async_trait;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::fetch::{BasicClient, HttpClient, fetch_json};
use crate::models::{Departure, ProviderMap, ProviderRecord, Route, RouteId, Stop, provider_map};
use crate::services::transit_api::TransitApi;

const FORMAT_JSON: &str = "format=json";

/// NexTrip client over any [`HttpClient`].
pub struct NexTripClient<C = BasicClient> {
    http: C,
    config: ClientConfig,
}

impl NexTripClient<BasicClient> {
    pub fn new(config: ClientConfig) -> reqwest::Result<Self> {
        let http = BasicClient::with_config(&config)?;
        Ok(Self { http, config })
    }
}

impl<C: HttpClient> NexTripClient<C> {
    pub fn with_http_client(http: C, config: ClientConfig) -> Self {
        Self { http, config }
    }

    pub fn http(&self) -> &C {
        &self.http
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        self.config.endpoint(&format!("{path}?{FORMAT_JSON}"))
    }
}

fn stops_path(route: RouteId, direction: i64) -> String {
    format!("Stops/{route}/{direction}")
}

/// Departures hang directly off the API root, there is no resource segment.
///
/// The stop id becomes exactly one path segment. Ids that URL parsing would
/// drop or treat as a dot-segment (even percent-encoded) are refused.
fn departures_path(route: RouteId, direction: i64, stop_id: &str) -> Result<String> {
    let path = format!("{route}/{direction}/{}", urlencoding::encode(stop_id));
    if matches!(stop_id, "" | "." | "..") {
        return Err(Error::InvalidUrl {
            url: path,
            reason: format!("stop id {stop_id:?} is not a usable path segment"),
        });
    }
    Ok(path)
}

#[async_trait]
impl<C: HttpClient> TransitApi for NexTripClient<C> {
    #[tracing::instrument(skip(self))]
    async fn list_providers(&self) -> Result<ProviderMap> {
        let records: Vec<ProviderRecord> = fetch_json(&self.http, &self.url("Providers")).await?;
        let providers = provider_map(records);
        debug!(count = providers.len(), "Providers decoded");
        Ok(providers)
    }

    #[tracing::instrument(skip(self))]
    async fn list_routes(&self) -> Result<Vec<Route>> {
        let routes: Vec<Route> = fetch_json(&self.http, &self.url("Routes")).await?;
        debug!(count = routes.len(), "Routes decoded");
        Ok(routes)
    }

    #[tracing::instrument(skip(self), fields(route = %route))]
    async fn list_stops(&self, route: RouteId, direction: i64) -> Result<Vec<Stop>> {
        let url = self.url(&stops_path(route, direction));
        let stops: Vec<Stop> = fetch_json(&self.http, &url).await?;
        debug!(count = stops.len(), "Stops decoded");
        Ok(stops)
    }

    #[tracing::instrument(skip(self), fields(route = %route))]
    async fn list_departures(
        &self,
        route: RouteId,
        direction: i64,
        stop_id: &str,
    ) -> Result<Vec<Departure>> {
        let url = self.url(&departures_path(route, direction, stop_id)?);
        let departures: Vec<Departure> = fetch_json(&self.http, &url).await?;
        debug!(count = departures.len(), "Departures decoded");
        Ok(departures)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stops_path() {
        assert_eq!(stops_path(RouteId(902), 1), "Stops/902/1");
        assert_eq!(stops_path(RouteId(5), -7), "Stops/5/-7");
    }

    #[test]
    fn test_departures_path_has_no_resource_segment() {
        assert_eq!(departures_path(RouteId(902), 1, "EABK").unwrap(), "902/1/EABK");
    }

    #[test]
    fn test_departures_path_encodes_stop_id() {
        assert_eq!(departures_path(RouteId(2), 4, "A/B C").unwrap(), "2/4/A%2FB%20C");
    }

    #[test]
    fn test_departures_path_rejects_dot_and_empty_stop_ids() {
        for stop_id in ["", ".", ".."] {
            let err = departures_path(RouteId(902), 1, stop_id).unwrap_err();
            assert!(matches!(err, Error::InvalidUrl { .. }), "{stop_id:?}: {err}");
        }
        assert_eq!(departures_path(RouteId(902), 1, "...").unwrap(), "902/1/...");
    }

    #[test]
    fn test_url_appends_format() {
        let client = NexTripClient::with_http_client(BasicClient::new(), ClientConfig::default());
        assert_eq!(client.config(), &ClientConfig::default());
        assert_eq!(
            client.url("Providers"),
            "https://svc.metrotransit.org/NexTrip/Providers?format=json"
        );
        assert_eq!(
            client.url(&departures_path(RouteId(902), 1, "EABK").unwrap()),
            "https://svc.metrotransit.org/NexTrip/902/1/EABK?format=json"
        );
    }
}
