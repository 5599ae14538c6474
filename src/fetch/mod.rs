mod basic;
mod client;

pub use basic::BasicClient;
pub use client::HttpClient;

use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::error::{Error, Result};

const SLOW_FETCH: Duration = Duration::from_secs(15);

/// Issues a single GET for `url` and returns the full body.
///
/// The body is read to the end on every path, which hands the connection back
/// to the pool. A non-2xx status is an error and its body is discarded.
pub async fn fetch_bytes<C: HttpClient + ?Sized>(client: &C, url: &str) -> Result<Vec<u8>> {
    let parsed = reqwest::Url::parse(url).map_err(|e| Error::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;
    let req = reqwest::Request::new(reqwest::Method::GET, parsed);

    debug!(url, "GET");
    let started = Instant::now();

    let resp = client.execute(req).await.map_err(|source| Error::Transport {
        url: url.to_string(),
        source,
    })?;

    let status = resp.status();
    if !status.is_success() {
        let _ = resp.bytes().await;
        return Err(Error::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let bytes = resp.bytes().await.map_err(|source| Error::Transport {
        url: url.to_string(),
        source,
    })?;

    let elapsed = started.elapsed();
    if elapsed > SLOW_FETCH {
        warn!(url, elapsed_secs = elapsed.as_secs(), "NexTrip fetch was slow");
    }
    debug!(url, status = status.as_u16(), bytes = bytes.len(), "Response received");

    Ok(bytes.to_vec())
}

/// [`fetch_bytes`] followed by a JSON decode into `T`.
pub async fn fetch_json<C, T>(client: &C, url: &str) -> Result<T>
where
    C: HttpClient + ?Sized,
    T: DeserializeOwned,
{
    let bytes = fetch_bytes(client, url).await?;
    serde_json::from_slice(&bytes).map_err(|source| Error::Decode {
        url: url.to_string(),
        source,
    })
}
