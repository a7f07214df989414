use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::{
    DataSource, Dimension,
    error::QueryError,
    models::{ListEntry, MealDetail, MealId, MealRecord, MealSummary, items},
};

pub const DEFAULT_ENDPOINT: &str = "https://www.themealdb.com/api/json/v1";

const MEALS_KEY: &str = "meals";
const CATEGORIES_KEY: &str = "categories";

/// TheMealDB over HTTP. Every request is bounded by the client timeout.
pub struct RemoteSource {
    client: Client,
    base: String,
}

impl RemoteSource {
    pub fn new(endpoint: &str, key: &str, timeout: Duration) -> Result<Self, QueryError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base: format!("{}/{}", endpoint.trim_end_matches('/'), key),
        })
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        items_key: &str,
    ) -> Result<Vec<T>, QueryError> {
        let url = format!("{}/{path}", self.base);
        debug!("GET {path} {query:?}");

        let response = self.client.get(&url).query(query).send().await?;

        let status = response.status();
        if !status.is_success() {
            warn!("Provider answered {status} for {path} {query:?}");
            return Err(QueryError::Status(status));
        }

        let body = response.text().await?;

        Ok(items(&body, items_key)?)
    }
}

#[async_trait]
impl DataSource for RemoteSource {
    async fn list(&self, dimension: Dimension) -> Result<Vec<Option<String>>, QueryError> {
        let entries: Vec<ListEntry> = match dimension {
            Dimension::Area => self.fetch("list.php", &[("a", "list")], MEALS_KEY).await?,
            Dimension::Category => self.fetch("categories.php", &[], CATEGORIES_KEY).await?,
        };

        Ok(entries.into_iter().map(|entry| entry.name).collect())
    }

    async fn filter(
        &self,
        dimension: Dimension,
        value: &str,
    ) -> Result<Vec<MealSummary>, QueryError> {
        self.fetch("filter.php", &[(dimension.param(), value)], MEALS_KEY)
            .await
    }

    async fn lookup(&self, id: &MealId) -> Result<Option<MealDetail>, QueryError> {
        let records: Vec<MealRecord> = self
            .fetch("lookup.php", &[("i", id.as_str())], MEALS_KEY)
            .await?;

        Ok(records.into_iter().next().map(MealDetail::from))
    }
}
