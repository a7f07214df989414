use std::{collections::HashMap, time::Duration};

use axum::{
    Json, Router,
    extract::Query,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use mealdb::{DataSource, Dimension, MealId, QueryError, RemoteSource};
use serde_json::json;
use tokio::net::TcpListener;

async fn serve(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{address}")
}

async fn filter_handler(Query(params): Query<HashMap<String, String>>) -> impl IntoResponse {
    match params.get("a").map(String::as_str) {
        Some("Italian") => Json(json!({
            "meals": [
                {"strMeal": "Lasagne", "strMealThumb": "https://img/1.jpg", "idMeal": "52844"},
                {"strMeal": "Pizza", "strMealThumb": "https://img/2.jpg", "idMeal": 53014}
            ]
        })),
        _ => Json(json!({ "meals": null })),
    }
}

async fn source(app: Router) -> RemoteSource {
    let endpoint = serve(app).await;

    RemoteSource::new(&endpoint, "1", Duration::from_millis(500)).unwrap()
}

#[tokio::test]
async fn filter_keeps_provider_order() {
    let source = source(Router::new().route("/1/filter.php", get(filter_handler))).await;

    let meals = source.filter(Dimension::Area, "Italian").await.unwrap();
    let ids: Vec<&str> = meals.iter().map(|meal| meal.id.as_str()).collect();

    assert_eq!(ids, vec!["52844", "53014"]);
    assert_eq!(meals[0].name, "Lasagne");
}

#[tokio::test]
async fn null_list_is_empty() {
    let source = source(Router::new().route("/1/filter.php", get(filter_handler))).await;

    let meals = source.filter(Dimension::Area, "Atlantis").await.unwrap();

    assert!(meals.is_empty());
}

#[tokio::test]
async fn lists_read_their_own_items_key() {
    let app = Router::new()
        .route(
            "/1/list.php",
            get(|| async { Json(json!({ "meals": [{"strArea": "Italian"}, {"strArea": null}] })) }),
        )
        .route(
            "/1/categories.php",
            get(|| async {
                Json(json!({ "categories": [{"idCategory": "1", "strCategory": "Beef"}] }))
            }),
        );
    let source = source(app).await;

    let areas = source.list(Dimension::Area).await.unwrap();
    let categories = source.list(Dimension::Category).await.unwrap();

    assert_eq!(areas, vec![Some("Italian".to_string()), None]);
    assert_eq!(categories, vec![Some("Beef".to_string())]);
}

#[tokio::test]
async fn error_status_fails_the_query() {
    let app = Router::new().route(
        "/1/categories.php",
        get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "down") }),
    );
    let source = source(app).await;

    let error = source.list(Dimension::Category).await.unwrap_err();

    assert!(matches!(error, QueryError::Status(status) if status.as_u16() == 503));
}

#[tokio::test]
async fn slow_provider_times_out() {
    let app = Router::new().route(
        "/1/lookup.php",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Json(json!({ "meals": null }))
        }),
    );
    let source = source(app).await;

    let error = source.lookup(&MealId::from("52772")).await.unwrap_err();

    assert!(matches!(error, QueryError::Timeout));
}

#[tokio::test]
async fn lookup_missing_meal_is_none() {
    let app = Router::new().route(
        "/1/lookup.php",
        get(|| async { Json(json!({ "meals": null })) }),
    );
    let source = source(app).await;

    assert_eq!(source.lookup(&MealId::from("1")).await.unwrap(), None);
}

#[tokio::test]
async fn malformed_body_is_decode_error() {
    let app = Router::new().route("/1/filter.php", get(|| async { "<html>oops</html>" }));
    let source = source(app).await;

    let error = source.filter(Dimension::Category, "Seafood").await.unwrap_err();

    assert!(matches!(error, QueryError::Decode(_)));
}
