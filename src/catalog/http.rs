use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::card::CardSet;
use crate::config::CatalogConfig;

use super::{CardCatalog, CardPage, CatalogError};

const API_KEY_HEADER: &str = "X-Api-Key";

/// [`CardCatalog`] over the public REST API.
#[derive(Debug, Clone)]
pub struct HttpCatalog {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

#[derive(Deserialize)]
struct Envelope<T> {
    data: T,
}

impl HttpCatalog {
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|err| CatalogError::Transport(err.to_string()))?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    fn get(&self, path: &str) -> RequestBuilder {
        let request = self.client.get(format!("{}/{}", self.base_url, path));
        match &self.api_key {
            Some(key) => request.header(API_KEY_HEADER, key),
            None => request,
        }
    }

    fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<Option<T>, CatalogError> {
        let response = request
            .send()
            .map_err(|err| CatalogError::Transport(err.to_string()))?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(CatalogError::Status {
                status: status.as_u16(),
                url: response.url().to_string(),
            });
        }
        response
            .json::<T>()
            .map(Some)
            .map_err(|err| CatalogError::Decode(err.to_string()))
    }
}

impl CardCatalog for HttpCatalog {
    fn fetch_cards(&self, query: &str, page: u32, page_size: u32) -> Result<CardPage, CatalogError> {
        let request = self.get("cards").query(&[
            ("q", query.to_string()),
            ("page", page.to_string()),
            ("pageSize", page_size.to_string()),
        ]);
        tracing::debug!(query, page, page_size, "requesting catalog cards");
        Ok(self.send::<CardPage>(request)?.unwrap_or_default())
    }

    fn fetch_set(&self, set_id: &str) -> Result<Option<CardSet>, CatalogError> {
        let request = self.get(&format!("sets/{}", set_id));
        Ok(self
            .send::<Envelope<CardSet>>(request)?
            .map(|envelope| envelope.data))
    }

    fn fetch_sets(&self) -> Result<Vec<CardSet>, CatalogError> {
        Ok(self
            .send::<Envelope<Vec<CardSet>>>(self.get("sets"))?
            .map(|envelope| envelope.data)
            .unwrap_or_default())
    }
}
