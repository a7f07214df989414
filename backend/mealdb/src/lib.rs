//! # TheMealDB
//!
//! Client side of the third-party recipe catalog.
//!
//!
//!
//! ## Endpoints
//! All under `<endpoint>/<key>/`, answering `{ "<itemsKey>": [ ... ] | null }`.
//! - `list.php?a=list`: areas, items key `meals`, field `strArea`
//! - `categories.php`: categories, items key `categories`, field `strCategory`
//! - `filter.php?a=<area>` / `filter.php?c=<category>`: meal summaries
//! - `lookup.php?i=<id>`: full meal record
//!
//! A `null` list means nothing matched and is not an error. Any non-2xx status is.
//!
//!
//!
//! ## Quirks
//! - `idMeal` is usually a string but is compared as one regardless, so numeric ids still match
//! - Ingredients come flat as `strIngredient1..20` / `strMeasure1..20`, normalized once into [`MealDetail::ingredients`]
//! - Blank strings and nulls are used interchangeably for missing values
use async_trait::async_trait;

pub mod error;
#[cfg(any(test, feature = "testing"))]
pub mod memory;
pub mod models;
pub mod remote;
pub mod utils;

pub use error::QueryError;
pub use models::{IngredientSlot, MealDetail, MealId, MealSummary, extract_ingredients};
pub use remote::RemoteSource;
pub use reqwest::StatusCode;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Dimension {
    Area,
    Category,
}

impl Dimension {
    pub fn label(self) -> &'static str {
        match self {
            Dimension::Area => "Area",
            Dimension::Category => "Category",
        }
    }

    fn param(self) -> &'static str {
        match self {
            Dimension::Area => "a",
            Dimension::Category => "c",
        }
    }
}

/// Lookup queries against the recipe catalog.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Every value of a dimension as sent, nulls included.
    async fn list(&self, dimension: Dimension) -> Result<Vec<Option<String>>, QueryError>;

    /// Meals under one value of a dimension, in provider order.
    async fn filter(&self, dimension: Dimension, value: &str)
    -> Result<Vec<MealSummary>, QueryError>;

    async fn lookup(&self, id: &MealId) -> Result<Option<MealDetail>, QueryError>;
}
