//! HTTP handler functions for the crime dashboard.

use actix_web::http::header::ContentType;
use actix_web::{HttpResponse, web};
use crime_dashboard_server_models::{ApiError, ApiHealth, DashboardQueryParams};

use crate::AppState;
use crate::dashboard::{
    DashboardError, DashboardView, criteria_from, load_incidents, render_dashboard_map,
};
use crate::page::{PageContext, render_page};

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

fn text_error(e: &DashboardError) -> HttpResponse {
    match e {
        DashboardError::NoData => HttpResponse::BadGateway()
            .content_type(ContentType::plaintext())
            .body(e.to_string()),
        DashboardError::Analytics(_) | DashboardError::Map(_) => {
            log::error!("Failed to build dashboard: {e}");
            HttpResponse::InternalServerError()
                .content_type(ContentType::plaintext())
                .body(e.to_string())
        }
    }
}

fn json_error(e: &DashboardError) -> HttpResponse {
    let body = ApiError {
        error: e.to_string(),
    };
    match e {
        DashboardError::NoData => HttpResponse::BadGateway().json(body),
        DashboardError::Analytics(_) | DashboardError::Map(_) => {
            log::error!("Failed to build summary: {e}");
            HttpResponse::InternalServerError().json(body)
        }
    }
}

/// `GET /`
///
/// Renders the dashboard page for the requested filters.
pub async fn index(
    state: web::Data<AppState>,
    params: web::Query<DashboardQueryParams>,
) -> HttpResponse {
    let records = match load_incidents(state.source.as_ref()).await {
        Ok(records) => records,
        Err(e) => return text_error(&e),
    };

    let criteria = criteria_from(&params);
    let view = DashboardView::build(&records, &criteria);
    log::debug!(
        "{} of {} incidents match, {} with coordinates",
        view.filtered.len(),
        view.total_count,
        view.markers.len()
    );

    let map = match render_dashboard_map(state.source.as_ref(), &state.definition, &view.markers)
        .await
    {
        Ok(map) => map,
        Err(e) => return text_error(&e),
    };

    let html = render_page(&PageContext {
        title: &state.definition.name,
        params: &params,
        view: &view,
        map: &map,
        max_table_rows: state.max_table_rows,
    });

    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(html)
}

/// `GET /api/summary`
///
/// Returns the dashboard aggregates for the requested filters as JSON.
pub async fn summary(
    state: web::Data<AppState>,
    params: web::Query<DashboardQueryParams>,
) -> HttpResponse {
    let records = match load_incidents(state.source.as_ref()).await {
        Ok(records) => records,
        Err(e) => return json_error(&e),
    };

    let view = DashboardView::build(&records, &criteria_from(&params));

    HttpResponse::Ok().json(view.summary(state.source.id()))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::{App, test};

    use crate::configure;
    use crate::dashboard::FETCH_FAILED_MESSAGE;
    use crate::test_source::{Boundaries, StaticSource, incident, sample_incidents, state_with};

    macro_rules! app {
        ($source:expr, $rows:expr) => {
            test::init_service(
                App::new()
                    .app_data(actix_web::web::Data::new(state_with($source, $rows)))
                    .configure(configure),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn health_reports_version() {
        let app = app!(Arc::new(StaticSource::new(Vec::new())), 10);
        let req = test::TestRequest::get().uri("/api/health").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["healthy"], true);
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[actix_web::test]
    async fn fetch_failure_returns_fallback_text() {
        let app = app!(Arc::new(StaticSource::unreachable()), 10);
        let req = test::TestRequest::get().uri("/").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
        let body = test::read_body(resp).await;
        assert_eq!(body, FETCH_FAILED_MESSAGE.as_bytes());
    }

    #[actix_web::test]
    async fn empty_fetch_returns_fallback_text() {
        let source = Arc::new(StaticSource::new(Vec::new()));
        let app = app!(source.clone(), 10);
        let req = test::TestRequest::get().uri("/").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(test::read_body(resp).await, FETCH_FAILED_MESSAGE.as_bytes());
        assert_eq!(source.boundary_fetches(), 0);
    }

    #[actix_web::test]
    async fn bad_timestamp_is_a_server_error() {
        let mut records = sample_incidents();
        records[0].date_of_occurrence = None;
        let app = app!(Arc::new(StaticSource::new(records)), 10);
        let req = test::TestRequest::get().uri("/").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[actix_web::test]
    async fn page_shows_filtered_dashboard() {
        let app = app!(Arc::new(StaticSource::new(sample_incidents())), 10);
        let req = test::TestRequest::get().uri("/?ward=5&primary_type=All").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();

        assert!(body.contains("Chicago Crime Dashboard"));
        assert!(body.contains(r#"<option value="5" selected>5</option>"#));
        assert!(body.contains("Showing 3 of 3 incidents"));
        assert!(body.contains("crime-dashboard-map-data"));
        assert!(!body.contains("JA103"));
    }

    #[actix_web::test]
    async fn page_tolerates_overlay_failure() {
        let source =
            Arc::new(StaticSource::new(sample_incidents()).with_boundaries(Boundaries::Failing));
        let app = app!(source.clone(), 10);
        let req = test::TestRequest::get().uri("/").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(source.boundary_fetches(), 1);
    }

    #[actix_web::test]
    async fn page_without_coordinates_shows_placeholder() {
        let source = Arc::new(
            StaticSource::new(vec![incident("JA1", "THEFT", "1", "2024-01-01", None)])
                .with_boundaries(Boundaries::Failing),
        );
        let app = app!(source.clone(), 10);
        let req = test::TestRequest::get().uri("/").to_request();
        let body = test::call_and_read_body(&app, req).await;
        let body = String::from_utf8(body.to_vec()).unwrap();

        assert!(body.contains("No crimes with valid coordinates found based on the filters."));
        assert_eq!(source.boundary_fetches(), 0);
    }

    #[actix_web::test]
    async fn invalid_date_is_ignored() {
        let app = app!(Arc::new(StaticSource::new(sample_incidents())), 10);
        let req = test::TestRequest::get()
            .uri("/api/summary?date_from=not-a-date&date_to=2024-01-01&ward=5")
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["filteredCount"], 3);
    }

    #[actix_web::test]
    async fn summary_returns_aggregates() {
        let app = app!(Arc::new(StaticSource::new(sample_incidents())), 10);
        let req = test::TestRequest::get()
            .uri("/api/summary?ward=5")
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["source"], "static");
        assert_eq!(body["totalCount"], 4);
        assert_eq!(body["filteredCount"], 3);
        assert_eq!(body["validCoordinateCount"], 3);
        assert_eq!(body["topCategories"][0]["category"], "THEFT");
        assert_eq!(body["topCategories"][0]["count"], 2);
        assert_eq!(body["topCategories"][1]["category"], "BATTERY");
        assert_eq!(body["topCategories"][1]["count"], 1);
        assert_eq!(body["wards"][0], "5");
    }

    #[actix_web::test]
    async fn summary_single_day_range() {
        let app = app!(Arc::new(StaticSource::new(sample_incidents())), 10);
        let req = test::TestRequest::get()
            .uri("/api/summary?date_from=2024-01-01&date_to=2024-01-01")
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["filteredCount"], 2);
    }

    #[actix_web::test]
    async fn summary_fetch_failure_is_json() {
        let app = app!(Arc::new(StaticSource::unreachable()), 10);
        let req = test::TestRequest::get().uri("/api/summary").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], FETCH_FAILED_MESSAGE);
    }
}
