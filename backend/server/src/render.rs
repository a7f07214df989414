//! # Presenting Results
//!
//! HTML for the page shell, the results region and the detail region. Every
//! piece of provider or user text goes through [`escape_html`] first.
use mealdb::{MealDetail, MealSummary, QueryError};

use crate::{
    controls::Controls,
    reconcile::Resolution,
    selection::FilterSelection,
    utils::{escape_html, escape_multiline, safe_url},
};

const TITLE: &str = "Recipe Lookup";

/// What the results region shows.
#[derive(Clone, Debug, PartialEq)]
pub enum ListOutcome {
    Prompt,
    Loading,
    NoResults(FilterSelection),
    Failed(String),
    Meals(Vec<MealSummary>),
}

impl ListOutcome {
    pub fn resolved(selection: FilterSelection, result: Result<Resolution, QueryError>) -> Self {
        match result {
            Ok(Resolution::NoSelection) => ListOutcome::Prompt,
            Ok(Resolution::NoResults) => ListOutcome::NoResults(selection),
            Ok(Resolution::Meals(meals)) => ListOutcome::Meals(meals),
            Err(error) => ListOutcome::Failed(format!("Could not load meals. {}", describe(&error))),
        }
    }
}

/// User-facing text for a provider failure. The error itself carries the
/// request URL, access key included, so it only goes to the logs.
pub fn describe(error: &QueryError) -> String {
    match error {
        QueryError::Request(_) => "The recipe service could not be reached.".to_string(),
        QueryError::Timeout => "The recipe service timed out.".to_string(),
        QueryError::Status(status) => format!("The recipe service answered {}.", status.as_u16()),
        QueryError::Decode(_) => "The recipe service sent an unreadable response.".to_string(),
    }
}

pub fn render_message(kind: &str, text: &str) -> String {
    format!(
        r#"<p class="message {}">{}</p>"#,
        escape_html(kind),
        escape_html(text)
    )
}

pub fn render_list(outcome: &ListOutcome) -> String {
    match outcome {
        ListOutcome::Prompt => render_message("prompt", "Pick an area or a category to see meals."),
        ListOutcome::Loading => r#"<p class="message loading" role="status">Loading meals…</p>"#.to_string(),
        ListOutcome::NoResults(selection) => render_message("empty", &no_results_text(selection)),
        ListOutcome::Failed(text) => render_message("error", text),
        ListOutcome::Meals(meals) => render_cards(meals),
    }
}

fn no_results_text(selection: &FilterSelection) -> String {
    let filters: Vec<String> = selection
        .active()
        .into_iter()
        .map(|(dimension, value)| format!("{} {value}", dimension.label()))
        .collect();

    format!("No meals found for {}.", filters.join(" and "))
}

fn render_cards(meals: &[MealSummary]) -> String {
    let mut out = String::from(r#"<ul class="grid">"#);

    for meal in meals {
        let id = escape_html(meal.id.as_str());
        let name = escape_html(&meal.name);

        out.push_str(&format!(
            r#"<li class="card" tabindex="0" role="button" data-id="{id}" aria-label="{name}">"#
        ));
        if let Some(src) = safe_url(&meal.thumbnail) {
            out.push_str(&format!(r#"<img src="{src}/preview" alt="" loading="lazy">"#));
        }
        out.push_str(&format!("<h3>{name}</h3></li>"));
    }

    out.push_str("</ul>");
    out
}

const DISMISS: &str = r#"<button type="button" class="dismiss" data-dismiss>Back to results</button>"#;

/// Detail view of one meal, or the not-found message when `meal` is `None`.
pub fn render_detail(meal: Option<&MealDetail>) -> String {
    let Some(meal) = meal else {
        return format!(
            r#"<article class="detail">{DISMISS}{}</article>"#,
            render_message("empty", "That meal could not be found.")
        );
    };

    let mut out = format!(
        r#"<article class="detail" data-id="{}">{DISMISS}"#,
        escape_html(meal.id.as_str())
    );

    if let Some(src) = safe_url(&meal.thumbnail) {
        out.push_str(&format!(r#"<img class="hero" src="{src}" alt="">"#));
    }
    out.push_str(&format!("<h2>{}</h2>", escape_html(&meal.name)));

    let meta: Vec<String> = [&meal.category, &meal.area]
        .into_iter()
        .filter(|value| !value.is_empty())
        .map(|value| escape_html(value))
        .collect();
    if !meta.is_empty() {
        out.push_str(&format!(r#"<p class="meta">{}</p>"#, meta.join(" · ")));
    }

    if !meal.tags.is_empty() {
        out.push_str(r#"<ul class="tags">"#);
        for tag in &meal.tags {
            out.push_str(&format!("<li>{}</li>", escape_html(tag)));
        }
        out.push_str("</ul>");
    }

    out.push_str("<h3>Ingredients</h3><ul class=\"ingredients\">");
    for line in &meal.ingredients {
        out.push_str(&format!("<li>{}</li>", escape_html(line)));
    }
    out.push_str("</ul>");

    out.push_str(&format!(
        "<h3>Instructions</h3><p class=\"instructions\">{}</p>",
        escape_multiline(&meal.instructions)
    ));

    let links: Vec<String> = [("Watch on YouTube", &meal.youtube), ("Original recipe", &meal.source)]
        .into_iter()
        .filter_map(|(label, url)| {
            let href = safe_url(url.as_deref()?)?;
            Some(format!(r#"<a href="{href}" target="_blank" rel="noopener noreferrer">{label}</a>"#))
        })
        .collect();
    if !links.is_empty() {
        out.push_str(&format!(r#"<p class="links">{}</p>"#, links.join(" ")));
    }

    out.push_str("</article>");
    out
}

pub fn render_detail_error(text: &str) -> String {
    format!(
        r#"<article class="detail">{DISMISS}{}</article>"#,
        render_message("error", text)
    )
}

fn document(body: &str) -> String {
    format!(
        r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{TITLE}</title>
<link rel="stylesheet" href="/style.css">
</head>
<body>
<header><h1>{TITLE}</h1></header>
{body}
</body>
</html>
"#
    )
}

fn options(values: &[String], blank_label: &str) -> String {
    values
        .iter()
        .map(|value| {
            let label = if value.is_empty() { blank_label } else { value.as_str() };
            format!(
                r#"<option value="{}">{}</option>"#,
                escape_html(value),
                escape_html(label)
            )
        })
        .collect()
}

/// Full page for a fresh session with its filters populated.
pub fn render_page(session: u64, controls: &Controls) -> String {
    let areas = format!(
        r#"<option value="">Any area</option>{}"#,
        options(&controls.areas, "Any area")
    );
    let categories = options(&controls.categories, "All categories");

    document(&format!(
        r#"<main data-session="{session}">
<form class="controls" onsubmit="return false">
<label>Area <select id="area" name="area">{areas}</select></label>
<label>Category <select id="category" name="category">{categories}</select></label>
</form>
<section id="results" aria-live="polite">{}</section>
<section id="detail" hidden></section>
<template id="loading">{}</template>
</main>
<script src="/app.js" defer></script>"#,
        render_list(&ListOutcome::Prompt),
        render_list(&ListOutcome::Loading),
    ))
}

/// Page shown when the filters could not be loaded; no filtering is offered.
pub fn render_unavailable() -> String {
    document(&format!(
        "<main>{}</main>",
        render_message("error", "Filters are unavailable right now. Reload the page to try again.")
    ))
}
