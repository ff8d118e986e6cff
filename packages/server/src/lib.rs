#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the preparedness map.
//!
//! Proxies the Supabase remote procedures as `GeoJSON` and JSON endpoints,
//! serves the bundled shelter file from the data directory, and renders
//! the initial `MapLibre` style by running the page's initialization
//! sequence against a headless map document.

mod handlers;

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use actix_cors::Cors;
use actix_files::Files;
use actix_web::{App, HttpServer, Scope, middleware, web};
use beredskap_map_app::MapConfig;
use beredskap_map_data::assets::{AssetSource, FileAssets};
use beredskap_map_supabase::{RpcClient, SupabaseClient, SupabaseConfig};

/// Default directory holding `tilfluktsrom.geojson`.
pub const DEFAULT_DATA_DIR: &str = "data";

/// Shared application state.
pub struct AppState {
    /// Remote procedure client.
    pub rpc: Arc<dyn RpcClient>,
    /// Source of the bundled shelter file.
    pub assets: Arc<dyn AssetSource>,
    /// Map configuration.
    pub config: MapConfig,
}

/// The `/api` routes.
#[must_use]
pub fn api_scope() -> Scope {
    web::scope("/api")
        .route("/health", web::get().to(handlers::health))
        .route("/resources", web::get().to(handlers::resources))
        .route("/shelters", web::get().to(handlers::shelters))
        .route("/nearest", web::get().to(handlers::nearest))
        .route("/style", web::get().to(handlers::style))
}

/// Starts the HTTP server.
///
/// Reads `SUPABASE_URL` and `SUPABASE_KEY` for the remote procedures,
/// `BIND_ADDR` and `PORT` for the listen address, and `DATA_DIR` for the
/// static data directory.
///
/// # Errors
///
/// Returns an error if the Supabase configuration is missing or the server
/// fails to bind or run.
#[allow(clippy::future_not_send)]
pub async fn run_server() -> io::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let supabase = SupabaseConfig::from_env().map_err(io::Error::other)?;
    log::info!("Using Supabase project at {}", supabase.url);

    let data_dir =
        PathBuf::from(std::env::var("DATA_DIR").unwrap_or_else(|_| DEFAULT_DATA_DIR.to_string()));
    log::info!("Serving data from {}", data_dir.display());

    let state = web::Data::new(AppState {
        rpc: Arc::new(SupabaseClient::new(supabase)),
        assets: Arc::new(FileAssets::new(data_dir.clone())),
        config: MapConfig::embedded(),
    });

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .service(api_scope())
            .service(Files::new("/data", data_dir.clone()))
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
