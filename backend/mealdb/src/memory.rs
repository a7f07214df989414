//! In-memory catalog standing in for the provider in tests.
use std::{
    collections::{HashMap, HashSet},
    sync::Mutex,
    time::Duration,
};

use async_trait::async_trait;
use reqwest::StatusCode;

use crate::{DataSource, Dimension, MealDetail, MealId, MealSummary, QueryError};

#[derive(Default)]
pub struct MemorySource {
    lists: HashMap<Dimension, Vec<Option<String>>>,
    meals: HashMap<(Dimension, String), Vec<MealSummary>>,
    details: HashMap<MealId, MealDetail>,
    failing: HashSet<Dimension>,
    failing_filters: HashSet<(Dimension, String)>,
    failing_lookups: bool,
    delays: HashMap<(Dimension, String), Duration>,
    list_delays: HashMap<Dimension, Duration>,
    calls: Mutex<Vec<String>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_list(mut self, dimension: Dimension, names: &[Option<&str>]) -> Self {
        let names = names.iter().map(|name| name.map(str::to_string)).collect();
        self.lists.insert(dimension, names);
        self
    }

    pub fn with_meals(mut self, dimension: Dimension, value: &str, meals: Vec<MealSummary>) -> Self {
        self.meals.insert((dimension, value.to_string()), meals);
        self
    }

    pub fn with_detail(mut self, detail: MealDetail) -> Self {
        self.details.insert(detail.id.clone(), detail);
        self
    }

    /// Lists and filters on `dimension` answer with a provider error.
    pub fn failing(mut self, dimension: Dimension) -> Self {
        self.failing.insert(dimension);
        self
    }

    pub fn failing_filter(mut self, dimension: Dimension, value: &str) -> Self {
        self.failing_filters.insert((dimension, value.to_string()));
        self
    }

    pub fn failing_lookups(mut self) -> Self {
        self.failing_lookups = true;
        self
    }

    pub fn delayed(mut self, dimension: Dimension, value: &str, delay: Duration) -> Self {
        self.delays.insert((dimension, value.to_string()), delay);
        self
    }

    pub fn delayed_list(mut self, dimension: Dimension, delay: Duration) -> Self {
        self.list_delays.insert(dimension, delay);
        self
    }

    /// Queries issued so far, e.g. `filter Area Italian`.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }

    fn record(&self, call: String) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }

    fn check(&self, dimension: Dimension) -> Result<(), QueryError> {
        if self.failing.contains(&dimension) {
            return Err(QueryError::Status(StatusCode::INTERNAL_SERVER_ERROR));
        }

        Ok(())
    }
}

#[async_trait]
impl DataSource for MemorySource {
    async fn list(&self, dimension: Dimension) -> Result<Vec<Option<String>>, QueryError> {
        self.record(format!("list {}", dimension.label()));

        if let Some(delay) = self.list_delays.get(&dimension) {
            tokio::time::sleep(*delay).await;
        }

        self.check(dimension)?;

        Ok(self.lists.get(&dimension).cloned().unwrap_or_default())
    }

    async fn filter(
        &self,
        dimension: Dimension,
        value: &str,
    ) -> Result<Vec<MealSummary>, QueryError> {
        self.record(format!("filter {} {value}", dimension.label()));

        let key = (dimension, value.to_string());
        if let Some(delay) = self.delays.get(&key) {
            tokio::time::sleep(*delay).await;
        }

        self.check(dimension)?;
        if self.failing_filters.contains(&key) {
            return Err(QueryError::Status(StatusCode::INTERNAL_SERVER_ERROR));
        }

        Ok(self.meals.get(&key).cloned().unwrap_or_default())
    }

    async fn lookup(&self, id: &MealId) -> Result<Option<MealDetail>, QueryError> {
        self.record(format!("lookup {id}"));

        if self.failing_lookups {
            return Err(QueryError::Status(StatusCode::BAD_GATEWAY));
        }

        Ok(self.details.get(id).cloned())
    }
}
