use std::collections::BTreeSet;

use mealdb::{DataSource, Dimension, QueryError, utils::non_blank};

/// Value of the synthetic "all categories" entry.
pub const ALL_CATEGORIES: &str = "";

/// Why the filter lists could not be loaded: the first failing list query.
pub type ControlsLoadError = QueryError;

#[derive(Clone, Debug, PartialEq)]
pub struct Controls {
    pub areas: Vec<String>,
    pub categories: Vec<String>,
}

/// Both filter dimensions' values, fetched together. Either list failing
/// fails the whole load.
pub async fn load_controls<S>(source: &S) -> Result<Controls, ControlsLoadError>
where
    S: DataSource + ?Sized,
{
    let (areas, categories) = tokio::try_join!(
        source.list(Dimension::Area),
        source.list(Dimension::Category),
    )?;

    let mut categories = sorted_names(categories);
    categories.insert(0, ALL_CATEGORIES.to_string());

    Ok(Controls {
        areas: sorted_names(areas),
        categories,
    })
}

fn sorted_names(names: Vec<Option<String>>) -> Vec<String> {
    let unique: BTreeSet<String> = names
        .iter()
        .filter_map(|name| non_blank(name.as_deref()))
        .collect();

    let mut names: Vec<String> = unique.into_iter().collect();
    names.sort_by_cached_key(|name| name.to_lowercase());
    names
}
