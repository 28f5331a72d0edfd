//! HTTP handler functions for the incident dashboard API.

use actix_web::{HttpResponse, web};
use incident_dashboard_analytics_models::EvalContext;
use incident_dashboard_server_models::{ApiDashboard, ApiError, ApiHealth, DashboardQueryParams};
use incident_dashboard_session::compute_views;

use crate::AppState;

/// `GET /api/health`
pub async fn health(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: state.records.is_ok(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        records: state.records.as_ref().map_or(0, |store| store.len()),
    })
}

/// `GET /api/dashboard`
///
/// Computes metrics, the active chart and one table page for the state
/// described by the query parameters.
pub async fn dashboard(
    state: web::Data<AppState>,
    params: web::Query<DashboardQueryParams>,
) -> HttpResponse {
    let store = match &state.records {
        Ok(store) => store,
        Err(message) => return HttpResponse::ServiceUnavailable().json(ApiError::new(message)),
    };

    let mut dashboard_state = match params.to_state() {
        Ok(dashboard_state) => dashboard_state,
        Err(e) => {
            log::debug!("Rejected dashboard query: {e}");
            return HttpResponse::BadRequest().json(ApiError::new(e.to_string()));
        }
    };

    let ctx = EvalContext::current(state.zone);
    let views = compute_views(store.records(), &dashboard_state, &ctx);
    dashboard_state.page = views.table.info.page;

    HttpResponse::Ok().json(ApiDashboard {
        state: dashboard_state,
        views,
        total_records: store.len(),
    })
}

/// `GET /api/filter-options`
///
/// Lists the distinct districts and call types for the selectors.
pub async fn filter_options(state: web::Data<AppState>) -> HttpResponse {
    match &state.records {
        Ok(store) => HttpResponse::Ok().json(store.filter_options()),
        Err(message) => HttpResponse::ServiceUnavailable().json(ApiError::new(message)),
    }
}
