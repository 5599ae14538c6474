//! Output formatting and persistence for fetched NexTrip records.
//!
//! Supports plain text lines, pretty JSON, and CSV append for departures.

use anyhow::Result;
use chrono::{DateTime, Utc};
use csv::WriterBuilder;
use serde::Serialize;
use std::fs::OpenOptions;
use std::path::Path;
use tracing::debug;

use crate::models::{Departure, ProviderId, ProviderMap, Route, RouteId, Stop};

pub fn format_provider(id: ProviderId, name: &str) -> String {
    format!("Provider Name: {name}\tProvider Value: {id}")
}

/// Providers ordered by id, so repeated runs print identically.
pub fn sorted_providers(providers: &ProviderMap) -> Vec<(ProviderId, &str)> {
    let mut sorted: Vec<_> = providers
        .iter()
        .map(|(id, name)| (*id, name.as_str()))
        .collect();
    sorted.sort_unstable_by_key(|(id, _)| *id);
    sorted
}

pub fn format_route(route: &Route) -> String {
    format!(
        "Route {}: {} (provider {})",
        route.id, route.description, route.provider_id
    )
}

pub fn format_stop(stop: &Stop) -> String {
    format!("{}\t{}", stop.id, stop.name)
}

pub fn format_departure(departure: &Departure) -> String {
    let source = if departure.actual { "actual" } else { "scheduled" };
    format!("{}\t{source}", departure.departure_time)
}

/// Renders any record set as pretty-printed JSON.
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// One CSV row per departure, tagged with what was asked for and when.
#[derive(Debug, Serialize)]
pub struct DepartureRecord<'a> {
    pub fetched_at: DateTime<Utc>,
    pub route: RouteId,
    pub direction: i64,
    pub stop_id: &'a str,
    pub actual: bool,
    pub departure_time: Option<DateTime<Utc>>,
}

/// Appends departures as rows to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_departures(
    path: &str,
    route: RouteId,
    direction: i64,
    stop_id: &str,
    departures: &[Departure],
) -> Result<()> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, rows = departures.len(), "Appending CSV records");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // IMPORTANT when appending
        .from_writer(file);

    let fetched_at = Utc::now();
    for departure in departures {
        writer.serialize(DepartureRecord {
            fetched_at,
            route,
            direction,
            stop_id,
            actual: departure.actual,
            departure_time: departure.departure_time.as_datetime(),
        })?;
    }
    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timestamp::decode_vendor_timestamp;
    use crate::timestamp::VendorTimestamp;
    use std::env;
    use std::fs;

    fn temp_path(name: &str) -> String {
        format!("{}/{}", env::temp_dir().display(), name)
    }

    fn departures() -> Vec<Departure> {
        vec![
            Departure {
                actual: true,
                departure_time: decode_vendor_timestamp("/Date(0-0500)/").unwrap(),
            },
            Departure {
                actual: false,
                departure_time: VendorTimestamp::UNSET,
            },
        ]
    }

    #[test]
    fn test_format_provider() {
        assert_eq!(
            format_provider(8, "Metro Transit"),
            "Provider Name: Metro Transit\tProvider Value: 8"
        );
    }

    #[test]
    fn test_sorted_providers() {
        let providers: ProviderMap =
            [(9, "B".to_string()), (1, "A".to_string())].into_iter().collect();
        assert_eq!(sorted_providers(&providers), vec![(1, "A"), (9, "B")]);
    }

    #[test]
    fn test_format_departure() {
        let lines: Vec<_> = departures().iter().map(format_departure).collect();
        assert_eq!(lines[0], "1970-01-01T00:00:00+00:00\tactual");
        assert_eq!(lines[1], "null\tscheduled");
    }

    #[test]
    fn test_to_json_does_not_panic() {
        let json = to_json(&departures()).unwrap();
        assert!(json.contains("\"Actual\": true"));
    }

    #[test]
    fn test_append_departures_writes_header_once() {
        let path = temp_path("nextrip_test_header.csv");
        let _ = fs::remove_file(&path);

        append_departures(&path, RouteId(902), 1, "EABK", &departures()).unwrap();
        append_departures(&path, RouteId(902), 1, "EABK", &departures()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let header_count = content.lines().filter(|l| l.contains("fetched_at")).count();
        assert_eq!(header_count, 1);
        // 1 header + 2 rows per append
        assert_eq!(content.lines().count(), 5);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_append_departures_leaves_unset_time_empty() {
        let path = temp_path("nextrip_test_unset.csv");
        let _ = fs::remove_file(&path);

        append_departures(&path, RouteId(5), 4, "7SOL", &departures()[1..]).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let row = content.lines().nth(1).unwrap();
        assert!(row.ends_with(",5,4,7SOL,false,"), "{row}");

        fs::remove_file(&path).unwrap();
    }
}
