//! HTTP API for the Commission Engine.
//!
//! This module exposes the commission report and the car-model catalog
//! over HTTP using [`axum`](https://crates.io/crates/axum).  All data comes
//! from the [`ReportService`]'s data source; the rating itself runs on the
//! blocking pool since the engine fans out over rayon.  Every error,
//! including a malformed query string, is answered with an
//! `{"error": ...}` body.

use crate::catalog::{find_car_model, list_car_models, CarModelSearch};
use crate::config::AppConfig;
use crate::error::{ReportError, SourceError};
use crate::models::{Brand, CarClass, CarModel, CommissionReport};
use crate::service::ReportService;
use crate::source::{CommissionDataSource, InMemoryDataSource};
use anyhow::{Context, Result};
use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::info;

/// Application state shared across requests.
pub struct AppState<S> {
    pub reports: ReportService<S>,
}

/// Query of the commission endpoint.  A missing month or year counts as
/// zero and is rejected by the period validation.
#[derive(Debug, Default, Deserialize)]
pub struct CommissionQuery {
    pub month: Option<i64>,
    pub year: Option<i64>,
}

/// Errors returned by the handlers, rendered as `{"error": ...}`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Report(#[from] ReportError),
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error("{0}")]
    BadRequest(String),
    #[error("car model {0} not found")]
    NotFound(i64),
    #[error("report task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Report(err) if err.is_invalid_request() => StatusCode::BAD_REQUEST,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Build the API router around a report service.
pub fn build_router<S>(reports: ReportService<S>) -> Router
where
    S: CommissionDataSource + 'static,
{
    let state = Arc::new(AppState { reports });
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/report/commission", get(commission_handler::<S>))
        .route("/api/carmodel", get(car_models_handler::<S>))
        .route("/api/carmodel/brands", get(brands_handler))
        .route("/api/carmodel/classes", get(classes_handler))
        .route("/api/carmodel/:id", get(car_model_handler::<S>))
        .with_state(state)
}

async fn health_handler() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// Handler for GET /api/report/commission?month=&year=
async fn commission_handler<S>(
    State(state): State<Arc<AppState<S>>>,
    query: Result<Query<CommissionQuery>, QueryRejection>,
) -> Result<Json<Vec<CommissionReport>>, ApiError>
where
    S: CommissionDataSource + 'static,
{
    let Query(query) = query?;
    let month = query.month.unwrap_or_default();
    let year = query.year.unwrap_or_default();
    let reports =
        tokio::task::spawn_blocking(move || state.reports.commission_reports(month, year))
            .await??;
    Ok(Json(reports))
}

/// Handler for GET /api/carmodel?modelName=&modelCode=&sortBy=&sortDescending=
async fn car_models_handler<S>(
    State(state): State<Arc<AppState<S>>>,
    search: Result<Query<CarModelSearch>, QueryRejection>,
) -> Result<Json<Vec<CarModel>>, ApiError>
where
    S: CommissionDataSource + 'static,
{
    let Query(search) = search?;
    Ok(Json(list_car_models(state.reports.source(), &search)?))
}

/// Handler for GET /api/carmodel/:id
async fn car_model_handler<S>(
    State(state): State<Arc<AppState<S>>>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<CarModel>, ApiError>
where
    S: CommissionDataSource + 'static,
{
    let Path(id) = id?;
    find_car_model(state.reports.source(), id)?
        .map(Json)
        .ok_or(ApiError::NotFound(id))
}

async fn brands_handler() -> Json<Vec<&'static str>> {
    Json(Brand::ALL.iter().map(|brand| brand.as_str()).collect())
}

async fn classes_handler() -> Json<Vec<&'static str>> {
    Json(CarClass::ALL.iter().map(|class| class.as_str()).collect())
}

/// Launch the API server.  Loads the dataset named by the configuration
/// and blocks until the server terminates.
pub async fn serve(config: &AppConfig) -> Result<()> {
    let source = InMemoryDataSource::load_from_path(&config.data_file)
        .with_context(|| format!("loading {}", config.data_file.display()))?;
    let router = build_router(ReportService::new(source));

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("binding {}", config.bind_addr))?;
    info!(
        addr = %config.bind_addr,
        data = %config.data_file.display(),
        "commission server listening"
    );
    axum::serve(listener, router).await.context("server error")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ReportPeriod, Sale, Salesman};
    use crate::source::Dataset;
    use axum::body::Body;
    use axum::http::Request;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use serde_json::Value;
    use std::path::PathBuf;
    use tower::ServiceExt;

    fn dataset() -> Dataset {
        Dataset {
            salesmen: vec![
                Salesman {
                    id: 1,
                    name: "S".into(),
                    last_year_sales: dec!(600000),
                },
                Salesman {
                    id: 2,
                    name: "Idle".into(),
                    last_year_sales: dec!(0),
                },
            ],
            sales: vec![Sale {
                id: 1,
                salesman_id: 1,
                brand: "Audi".into(),
                car_class: "A-Class".into(),
                number_of_cars: 2,
                car_price: dec!(30000),
                sale_date: NaiveDate::from_ymd_opt(2024, 3, 14),
            }],
            car_models: vec![
                CarModel {
                    id: 1,
                    brand: "Audi".into(),
                    class: "A-Class".into(),
                    model_name: "A6".into(),
                    model_code: "A6".into(),
                    price: dec!(31000),
                    date_of_manufacturing: NaiveDate::from_ymd_opt(2023, 2, 1),
                    is_active: true,
                    sort_order: 2,
                },
                CarModel {
                    id: 2,
                    brand: "Renault".into(),
                    class: "C-Class".into(),
                    model_name: "Clio".into(),
                    model_code: "CLIO5".into(),
                    price: dec!(17500),
                    date_of_manufacturing: NaiveDate::from_ymd_opt(2024, 6, 1),
                    is_active: false,
                    sort_order: 1,
                },
            ],
        }
    }

    fn router() -> Router {
        build_router(ReportService::new(InMemoryDataSource::new(dataset())))
    }

    async fn get_json(router: Router, uri: &str) -> (StatusCode, Value) {
        let response = router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn error_message(body: &Value) -> &str {
        body["error"].as_str().unwrap()
    }

    #[tokio::test]
    async fn commission_report_has_expected_shape() {
        let (status, body) = get_json(router(), "/api/report/commission?month=3&year=2024").await;
        assert_eq!(status, StatusCode::OK);

        let reports = body.as_array().unwrap();
        assert_eq!(reports.len(), 2);
        let first = &reports[0];
        assert_eq!(first["salesmanName"], "S");
        for key in [
            "fixedCommission",
            "classCommission",
            "additionalCommission",
            "totalCommission",
        ] {
            assert!(first.get(key).is_some(), "missing {key}");
        }
        let total: rust_decimal::Decimal =
            serde_json::from_value(first["totalCommission"].clone()).unwrap();
        assert_eq!(total, dec!(7600));

        let brands = first["brandCommissions"].as_object().unwrap();
        let names: Vec<&str> = brands.keys().map(String::as_str).collect();
        assert_eq!(names.len(), 4);
        for brand in ["Audi", "Jaguar", "Land Rover", "Renault"] {
            assert!(names.contains(&brand), "missing brand {brand}");
        }
        let audi = &brands["Audi"];
        assert_eq!(audi["brand"], "Audi");
        for key in [
            "fixedCommission",
            "classACommission",
            "classBCommission",
            "classCCommission",
            "additionalCommission",
            "totalCommission",
        ] {
            assert!(audi.get(key).is_some(), "missing {key}");
        }

        assert_eq!(reports[1]["salesmanName"], "Idle");
        assert_eq!(reports[1]["brandCommissions"].as_object().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn invalid_month_is_a_bad_request() {
        let (status, body) = get_json(router(), "/api/report/commission?month=13&year=2024").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(error_message(&body).contains("Month"));
    }

    #[tokio::test]
    async fn negative_or_missing_month_gets_the_month_error() {
        for uri in [
            "/api/report/commission?month=-1&year=2024",
            "/api/report/commission?year=2024",
        ] {
            let (status, body) = get_json(router(), uri).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
            assert!(error_message(&body).contains("Month must be between 1 and 12"), "{uri}");
        }
    }

    #[tokio::test]
    async fn missing_year_gets_the_year_error() {
        let (status, body) = get_json(router(), "/api/report/commission?month=3").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(error_message(&body).contains("Year must be between 2000 and 2050"));
    }

    #[tokio::test]
    async fn non_numeric_month_is_a_json_bad_request() {
        let uri = "/api/report/commission?month=abc&year=2024";
        let (status, body) = get_json(router(), uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(!error_message(&body).is_empty());
    }

    #[tokio::test]
    async fn invalid_year_is_a_bad_request() {
        let (status, _) = get_json(router(), "/api/report/commission?month=1&year=2051").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    struct UnavailableSource;

    impl CommissionDataSource for UnavailableSource {
        fn salesmen(&self) -> Result<Vec<Salesman>, SourceError> {
            Err(SourceError::Io {
                path: PathBuf::from("dealership.json"),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
            })
        }

        fn sales_in(&self, _period: ReportPeriod) -> Result<Vec<Sale>, SourceError> {
            Ok(Vec::new())
        }

        fn car_models(&self) -> Result<Vec<CarModel>, SourceError> {
            Err(SourceError::Io {
                path: PathBuf::from("dealership.json"),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
            })
        }
    }

    #[tokio::test]
    async fn source_failure_is_an_internal_error() {
        let failing = build_router(ReportService::new(UnavailableSource));
        let (status, body) = get_json(failing, "/api/report/commission?month=3&year=2024").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(error_message(&body).contains("failed to load report data"));

        let failing = build_router(ReportService::new(UnavailableSource));
        let (status, body) = get_json(failing, "/api/carmodel").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(error_message(&body).contains("dealership.json"));
    }

    #[tokio::test]
    async fn lists_catalog_with_search_and_sort() {
        let (status, body) = get_json(router(), "/api/carmodel").await;
        assert_eq!(status, StatusCode::OK);
        let codes: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|model| model["modelCode"].as_str().unwrap())
            .collect();
        assert_eq!(codes, vec!["CLIO5", "A6"]);

        let ids = |body: &Value| -> Vec<i64> {
            body.as_array()
                .unwrap()
                .iter()
                .map(|model| model["id"].as_i64().unwrap())
                .collect()
        };
        let uri = "/api/carmodel?sortBy=SortOrder&sortDescending=false";
        let (_, body) = get_json(router(), uri).await;
        assert_eq!(ids(&body), vec![2, 1]);

        let (_, body) = get_json(router(), "/api/carmodel?modelName=cl").await;
        assert_eq!(ids(&body), vec![2]);
        let (_, body) = get_json(router(), "/api/carmodel?modelCode=a6").await;
        assert_eq!(ids(&body), vec![1]);

        let (status, body) = get_json(router(), "/api/carmodel?sortDescending=maybe").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(!error_message(&body).is_empty());
    }

    #[tokio::test]
    async fn fetches_car_model_by_id() {
        let (status, body) = get_json(router(), "/api/carmodel/2").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["modelName"], "Clio");
        assert_eq!(body["isActive"], false);
        assert_eq!(body["sortOrder"], 1);
        assert_eq!(body["dateOfManufacturing"], "2024-06-01");

        let (status, body) = get_json(router(), "/api/carmodel/99").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(error_message(&body), "car model 99 not found");

        let (status, _) = get_json(router(), "/api/carmodel/abc").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn lists_fixed_brands_and_classes() {
        let (_, brands) = get_json(router(), "/api/carmodel/brands").await;
        assert_eq!(brands, json!(["Audi", "Jaguar", "Land Rover", "Renault"]));
        let (_, classes) = get_json(router(), "/api/carmodel/classes").await;
        assert_eq!(classes, json!(["A-Class", "B-Class", "C-Class"]));
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let (status, body) = get_json(router(), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }
}
