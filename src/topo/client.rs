use reqwest::blocking::Client;
use tracing::debug;

use crate::config::TopoConfig;
use crate::error::{HeatmapError, Result};

use super::TopoQuery;


/// Anything that can answer a [`TopoQuery`] with a raw griddap payload.
pub trait TopoFetcher {
    fn fetch(&self, query: &TopoQuery) -> Result<String>;
}

/// Blocking client for the ERDDAP `usgsCeSrtm30v6` dataset. Requests are never retried.
pub struct ErddapClient {
    endpoint: String,
    client: Client,
}

impl ErddapClient {
    pub fn new(config: &TopoConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|source| HeatmapError::Network {
                url: config.endpoint.clone(),
                source,
            })?;

        Ok(ErddapClient {
            endpoint: config.endpoint.clone(),
            client,
        })
    }
}

impl TopoFetcher for ErddapClient {
    fn fetch(&self, query: &TopoQuery) -> Result<String> {
        let url = query.url(&self.endpoint);
        debug!(%url, "requesting topography");

        let network = |source: reqwest::Error| HeatmapError::Network {
            url: url.clone(),
            source,
        };

        self.client
            .get(&url)
            .send()
            .and_then(|response| response.error_for_status())
            .map_err(network)?
            .text()
            .map_err(network)
    }
}
