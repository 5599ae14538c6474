//! Records returned by the NexTrip endpoints.
//!
//! Field names on the wire are PascalCase and several integer identifiers are
//! sent as JSON strings (`"Value": "8"`), hence the renames and
//! [`numeric_string`].

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::timestamp::VendorTimestamp;

pub type ProviderId = i64;

/// Provider id to display name.
pub type ProviderMap = HashMap<ProviderId, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouteId(pub i64);

impl fmt::Display for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RouteId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(RouteId)
    }
}

/// One entry of the `Providers` listing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProviderRecord {
    #[serde(rename = "Text")]
    pub name: String,
    #[serde(rename = "Value", deserialize_with = "numeric_string")]
    pub id: ProviderId,
}

/// Folds provider records into a map. A repeated id keeps the last name seen.
pub fn provider_map<I>(records: I) -> ProviderMap
where
    I: IntoIterator<Item = ProviderRecord>,
{
    records.into_iter().map(|p| (p.id, p.name)).collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "ProviderID", deserialize_with = "numeric_string")]
    pub provider_id: ProviderId,
    #[serde(rename = "Route", deserialize_with = "numeric_string")]
    pub id: RouteId,
}

/// A boarding location on one route and direction. The id is opaque.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stop {
    #[serde(rename = "Text")]
    pub name: String,
    #[serde(rename = "Value")]
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Departure {
    /// `true` for a real-time observation, `false` for a schedule estimate.
    #[serde(rename = "Actual")]
    pub actual: bool,
    #[serde(rename = "DepartureTime")]
    pub departure_time: VendorTimestamp,
}

/// Deserializes an integer that the service wraps in a JSON string.
pub fn numeric_string<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    let raw = String::deserialize(deserializer)?;
    raw.parse()
        .map_err(|e| serde::de::Error::custom(format!("invalid numeric string {raw:?}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_value_parses_numeric_string() {
        for n in [
            0,
            1,
            8,
            42,
            -3,
            i32::MAX as i64,
            3_000_000_000,
            i64::MAX,
            i64::MIN,
        ] {
            let raw = format!(r#"{{"Text":"P","Value":"{n}"}}"#);
            let p: ProviderRecord = serde_json::from_str(&raw).unwrap();
            assert_eq!(p.id, n);
        }
    }

    #[test]
    fn test_provider_value_rejects_bare_number() {
        let result = serde_json::from_str::<ProviderRecord>(r#"{"Text":"P","Value":8}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_provider_value_rejects_non_numeric() {
        let result = serde_json::from_str::<ProviderRecord>(r#"{"Text":"P","Value":"eight"}"#);
        let err = result.unwrap_err().to_string();
        assert!(err.contains("eight"), "{err}");
    }

    #[test]
    fn test_provider_map_last_write_wins() {
        let records: Vec<ProviderRecord> = serde_json::from_str(
            r#"[{"Text":"Metro","Value":"0"},{"Text":"Other","Value":"1"},{"Text":"Later","Value":"0"}]"#,
        )
        .unwrap();
        let map = provider_map(records);
        assert_eq!(map.len(), 2);
        assert_eq!(map[&0], "Later");
        assert_eq!(map[&1], "Other");
    }

    #[test]
    fn test_route_decodes() {
        let route: Route = serde_json::from_str(
            r#"{"Description":"METRO Blue Line","ProviderID":"8","Route":"901"}"#,
        )
        .unwrap();
        assert_eq!(
            route,
            Route {
                description: "METRO Blue Line".into(),
                provider_id: 8,
                id: RouteId(901),
            }
        );
    }

    #[test]
    fn test_stop_keeps_opaque_id() {
        let stops: Vec<Stop> =
            serde_json::from_str(r#"[{"Text":"Mall of America Station","Value":"MAAM"}]"#).unwrap();
        assert_eq!(stops[0].id, "MAAM");
        assert_eq!(stops[0].name, "Mall of America Station");
    }

    #[test]
    fn test_departure_ignores_extra_fields() {
        let deps: Vec<Departure> = serde_json::from_str(
            r#"[{"Actual":true,"BlockNumber":1105,"DepartureText":"3 Min","DepartureTime":"\/Date(1700000000000-0600)\/","Route":"Blue"},
                {"Actual":false,"DepartureTime":null}]"#,
        )
        .unwrap();
        assert!(deps[0].actual);
        assert_eq!(
            deps[0].departure_time.as_datetime().unwrap().timestamp_millis(),
            1_700_000_000_000
        );
        assert!(!deps[1].actual);
        assert!(deps[1].departure_time.is_unset());
    }

    #[test]
    fn test_route_id_wider_than_32_bits() {
        let route: Route = serde_json::from_str(
            r#"{"Description":"Big","ProviderID":"3000000000","Route":"2147483648"}"#,
        )
        .unwrap();
        assert_eq!(route.id, RouteId(2_147_483_648));
        assert_eq!(route.provider_id, 3_000_000_000);
    }

    #[test]
    fn test_provider_value_out_of_i64_range_fails() {
        let result = serde_json::from_str::<ProviderRecord>(
            r#"{"Text":"P","Value":"9223372036854775808"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_route_id_display_and_parse() {
        assert_eq!(RouteId(902).to_string(), "902");
        assert_eq!("902".parse::<RouteId>().unwrap(), RouteId(902));
    }
}
