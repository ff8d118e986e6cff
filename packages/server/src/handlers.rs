//! HTTP handler functions for the preparedness map API.

use std::sync::Arc;

use actix_web::{HttpResponse, web};
use beredskap_map_app::MapApp;
use beredskap_map_data::{fetch_resources, fetch_shelters, find_nearest};
use beredskap_map_server_models::{ApiError, ApiHealth, ApiNearest, NearestQueryParams};
use beredskap_map_ui::LogShell;

use crate::AppState;

/// Name of the rendered style document.
const STYLE_NAME: &str = "Beredskapskart Kristiansand";

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/resources`
///
/// All preparedness resources as a `GeoJSON` `FeatureCollection`.
pub async fn resources(state: web::Data<AppState>) -> HttpResponse {
    match fetch_resources(state.rpc.as_ref()).await {
        Ok(fc) => HttpResponse::Ok().json(fc),
        Err(e) => {
            log::error!("Failed to fetch resources: {e}");
            HttpResponse::BadGateway().json(ApiError::new("Failed to fetch resources"))
        }
    }
}

/// `GET /api/shelters`
///
/// The bundled shelter file as a `GeoJSON` `FeatureCollection`.
pub async fn shelters(state: web::Data<AppState>) -> HttpResponse {
    match fetch_shelters(state.assets.as_ref(), &state.config.shelters_path).await {
        Ok(fc) => HttpResponse::Ok().json(fc),
        Err(e) => {
            log::error!("Failed to load shelters: {e}");
            HttpResponse::BadGateway().json(ApiError::new("Failed to load shelters"))
        }
    }
}

/// `GET /api/nearest?lon=&lat=`
///
/// Ranked nearest resources to a point, closest first.
pub async fn nearest(
    state: web::Data<AppState>,
    params: web::Query<NearestQueryParams>,
) -> HttpResponse {
    match find_nearest(state.rpc.as_ref(), params.lon, params.lat).await {
        Ok(result) => HttpResponse::Ok().json(ApiNearest::from(result)),
        Err(e) => {
            log::error!("Failed to find nearest resource: {e}");
            HttpResponse::BadGateway().json(ApiError::new("Failed to find nearest resource"))
        }
    }
}

/// `GET /api/style`
///
/// The `MapLibre` style after the initialization sequence: background,
/// shelters and resources with whatever data could be loaded.
pub async fn style(state: web::Data<AppState>) -> HttpResponse {
    let mut app = MapApp::new(
        state.config.clone(),
        Arc::clone(&state.rpc),
        Arc::clone(&state.assets),
    );
    let mut doc = app.new_document();
    doc.mark_loaded();

    match app.on_load(&mut doc, &mut LogShell).await {
        Ok(report) => {
            log::debug!("Rendered style: {report:?}");
            HttpResponse::Ok().json(doc.to_style(STYLE_NAME))
        }
        Err(e) => {
            log::error!("Failed to build map style: {e}");
            HttpResponse::InternalServerError().json(ApiError::new("Failed to build map style"))
        }
    }
}
