//! # Reconciling Filters
//!
//! Turns a [`FilterSelection`] into one ordered list of meals.
//!
//! - Nothing selected: no query at all, [`Resolution::NoSelection`]
//! - One dimension: a single filter query, provider order kept
//! - Both dimensions: both filter queries in flight together, then the area
//!   list is narrowed to ids also present in the category list
//!
//! The provider has no combined filter, hence the intersection here.
use std::collections::HashSet;

use mealdb::{DataSource, Dimension, MealSummary, QueryError};

use crate::selection::FilterSelection;

#[derive(Clone, Debug, PartialEq)]
pub enum Resolution {
    NoSelection,
    NoResults,
    Meals(Vec<MealSummary>),
}

pub async fn resolve<S>(source: &S, selection: &FilterSelection) -> Result<Resolution, QueryError>
where
    S: DataSource + ?Sized,
{
    let meals = match (selection.area.as_deref(), selection.category.as_deref()) {
        (None, None) => return Ok(Resolution::NoSelection),
        (Some(area), None) => source.filter(Dimension::Area, area).await?,
        (None, Some(category)) => source.filter(Dimension::Category, category).await?,
        (Some(area), Some(category)) => {
            let (by_area, by_category) = tokio::try_join!(
                source.filter(Dimension::Area, area),
                source.filter(Dimension::Category, category),
            )?;

            intersect(by_area, &by_category)
        }
    };

    if meals.is_empty() {
        Ok(Resolution::NoResults)
    } else {
        Ok(Resolution::Meals(meals))
    }
}

/// Meals of `by_area` whose id is also in `by_category`, in `by_area` order.
pub fn intersect(by_area: Vec<MealSummary>, by_category: &[MealSummary]) -> Vec<MealSummary> {
    let ids: HashSet<&str> = by_category.iter().map(|meal| meal.id.as_str()).collect();

    by_area
        .into_iter()
        .filter(|meal| ids.contains(meal.id.as_str()))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use mealdb::memory::MemorySource;
    use tokio::time::Instant;

    use super::*;

    fn meal(id: &str) -> MealSummary {
        MealSummary::new(id, &format!("Meal {id}"), "")
    }

    fn ids(resolution: &Resolution) -> Vec<&str> {
        match resolution {
            Resolution::Meals(meals) => meals.iter().map(|meal| meal.id.as_str()).collect(),
            _ => Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_nothing_selected_issues_no_query() {
        let source = MemorySource::new().failing(Dimension::Area).failing(Dimension::Category);

        let resolution = resolve(&source, &FilterSelection::default()).await.unwrap();

        assert_eq!(resolution, Resolution::NoSelection);
        assert!(source.calls().is_empty());
    }

    #[tokio::test]
    async fn test_single_dimension_single_query() {
        let source = MemorySource::new()
            .with_meals(Dimension::Category, "Seafood", vec![meal("3"), meal("1")]);

        let resolution = resolve(&source, &FilterSelection::new("", "Seafood"))
            .await
            .unwrap();

        assert_eq!(ids(&resolution), vec!["3", "1"]);
        assert_eq!(source.calls(), vec!["filter Category Seafood"]);
    }

    #[tokio::test]
    async fn test_single_dimension_nothing_found() {
        let source = MemorySource::new();

        let resolution = resolve(&source, &FilterSelection::new("Atlantis", ""))
            .await
            .unwrap();

        assert_eq!(resolution, Resolution::NoResults);
    }

    #[tokio::test]
    async fn test_intersection_keeps_area_order() {
        let source = MemorySource::new()
            .with_meals(Dimension::Area, "Italian", vec![meal("1"), meal("2"), meal("3")])
            .with_meals(Dimension::Category, "Seafood", vec![meal("3"), meal("1")]);

        let resolution = resolve(&source, &FilterSelection::new("Italian", "Seafood"))
            .await
            .unwrap();

        assert_eq!(ids(&resolution), vec!["1", "3"]);
        assert_eq!(source.calls().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_both_dimensions_queried_together() {
        let delay = Duration::from_secs(5);
        let source = MemorySource::new()
            .with_meals(Dimension::Area, "Italian", vec![meal("1"), meal("2")])
            .with_meals(Dimension::Category, "Seafood", vec![meal("2")])
            .delayed(Dimension::Area, "Italian", delay)
            .delayed(Dimension::Category, "Seafood", delay);

        let started = Instant::now();
        let resolution = resolve(&source, &FilterSelection::new("Italian", "Seafood"))
            .await
            .unwrap();

        assert!(started.elapsed() >= delay);
        assert!(started.elapsed() < delay * 2);
        assert_eq!(ids(&resolution), vec!["2"]);
    }

    #[tokio::test]
    async fn test_disjoint_lists_are_no_results() {
        let source = MemorySource::new()
            .with_meals(Dimension::Area, "Italian", vec![meal("1"), meal("2")])
            .with_meals(Dimension::Category, "Dessert", vec![meal("7")]);

        let resolution = resolve(&source, &FilterSelection::new("Italian", "Dessert"))
            .await
            .unwrap();

        assert_eq!(resolution, Resolution::NoResults);
    }

    #[tokio::test]
    async fn test_either_failure_fails_resolution() {
        let source = MemorySource::new()
            .with_meals(Dimension::Area, "Italian", vec![meal("1")])
            .failing(Dimension::Category);

        let result = resolve(&source, &FilterSelection::new("Italian", "Seafood")).await;

        assert!(matches!(result, Err(QueryError::Status(_))));
    }

    #[tokio::test]
    async fn test_both_failures_fail_resolution() {
        let source = MemorySource::new()
            .failing(Dimension::Area)
            .failing(Dimension::Category);

        let result = resolve(&source, &FilterSelection::new("Italian", "Seafood")).await;

        assert!(matches!(result, Err(QueryError::Status(_))));
    }

    #[test]
    fn test_intersect_type_tolerant_ids() {
        let by_area: Vec<MealSummary> =
            serde_json::from_str(r#"[{"idMeal": "52772", "strMeal": "Teriyaki"}]"#).unwrap();
        let by_category: Vec<MealSummary> =
            serde_json::from_str(r#"[{"idMeal": 52772, "strMeal": "Teriyaki"}]"#).unwrap();

        assert_eq!(intersect(by_area, &by_category).len(), 1);
    }
}
