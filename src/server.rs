use std::sync::Arc;

use anyhow::{bail, Result};
use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Json, Router,
};
use chrono::Local;
use serde::Deserialize;
use serde_json::json;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use crate::directory::Directory;
use crate::render;
use crate::settings::Settings;
use crate::views::{self, SiteContext, ViewOptions};

#[derive(Clone)]
pub struct AppState {
    pub directory: Arc<Directory>,
    pub views: ViewOptions,
    /// Absolute site URL for sitemap entries; the Host header is used when unset.
    pub base_url: Option<String>,
}

impl AppState {
    pub fn new(directory: Directory, settings: &Settings) -> AppState {
        AppState {
            directory: Arc::new(directory),
            views: ViewOptions {
                nearby_strategy: settings.nearby.strategy,
                nearby_limit: settings.nearby.limit,
                popular_cities: settings.popular_cities,
            },
            base_url: settings.server.base_url.clone(),
        }
    }

    fn context(&self) -> SiteContext {
        views::site_context(&self.directory, &self.views)
    }

    fn base_url(&self, headers: &HeaderMap) -> String {
        if let Some(url) = &self.base_url {
            return url.trim_end_matches('/').to_string();
        }
        let host = headers
            .get(header::HOST)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("localhost");
        format!("http://{host}")
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/about", get(about))
        .route("/search", get(search))
        .route("/sitemap", get(sitemap_page))
        .route("/sitemap.xml", get(sitemap_xml))
        .route("/state/:state", get(state_page))
        .route("/state/:state/:city", get(city_page))
        .route("/healthz", get(healthz))
        .fallback(not_found)
        .with_state(state)
}

/// Bind the first free port from `settings.server.ports` and serve until shutdown.
pub async fn serve(settings: &Settings, directory: Directory) -> Result<()> {
    let listener = bind_first(&settings.server.host, &settings.server.ports).await?;
    let addr = listener.local_addr()?;
    println!("Serving {} stores on http://{}", directory.hierarchy().store_count(), addr);

    let app = build_router(AppState::new(directory, settings));
    axum::serve(listener, app).await?;
    Ok(())
}

async fn bind_first(host: &str, ports: &[u16]) -> Result<TcpListener> {
    for &port in ports {
        match TcpListener::bind((host, port)).await {
            Ok(listener) => {
                info!(host, port, "bound");
                return Ok(listener);
            }
            Err(e) => warn!(host, port, "port unavailable: {}", e),
        }
    }
    bail!("no free port among {:?} on {}", ports, host)
}

// ── Pages ──

async fn home(State(state): State<AppState>) -> Html<String> {
    let view = views::home(state.directory.hierarchy());
    Html(render::home_page(&state.context(), &view))
}

async fn about(State(state): State<AppState>) -> Html<String> {
    Html(render::about_page(&state.context()))
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    q: Option<String>,
}

async fn search(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Response {
    let query = params.q.unwrap_or_default();
    if query.trim().is_empty() {
        return Redirect::to("/").into_response();
    }
    let results = views::search(&state.directory, &query);
    Html(render::search_page(&state.context(), &results)).into_response()
}

async fn sitemap_page(State(state): State<AppState>) -> Html<String> {
    Html(render::sitemap_page(&state.context(), state.directory.hierarchy()))
}

async fn state_page(State(state): State<AppState>, Path(state_slug): Path<String>) -> Response {
    match views::state_view(state.directory.hierarchy(), &state_slug) {
        Some(view) => Html(render::state_page(&state.context(), &view)).into_response(),
        None => not_found_response(&state),
    }
}

async fn city_page(
    State(state): State<AppState>,
    Path((state_slug, city_slug)): Path<(String, String)>,
) -> Response {
    match views::city_view(state.directory.hierarchy(), &state_slug, &city_slug, &state.views) {
        Some(view) => Html(render::city_page(&state.context(), &view)).into_response(),
        None => not_found_response(&state),
    }
}

async fn not_found(State(state): State<AppState>) -> Response {
    not_found_response(&state)
}

fn not_found_response(state: &AppState) -> Response {
    (StatusCode::NOT_FOUND, Html(render::not_found_page(&state.context()))).into_response()
}

// ── Machine-readable ──

async fn sitemap_xml(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let base = state.base_url(&headers);
    let today = Local::now().date_naive();
    let entries = views::sitemap_entries(state.directory.hierarchy(), &base, today);

    let body = match render::sitemap_xml(&entries) {
        Ok(xml) => xml,
        Err(e) => {
            error!("sitemap generation failed: {:#}", e);
            render::fallback_sitemap_xml(&base, &today.format("%Y-%m-%d").to_string())
        }
    };

    (
        [
            (header::CONTENT_TYPE, "application/xml"),
            (header::X_CONTENT_TYPE_OPTIONS, "nosniff"),
            (header::CACHE_CONTROL, "public, max-age=3600"),
        ],
        body,
    )
        .into_response()
}

async fn healthz(State(state): State<AppState>) -> Json<serde_json::Value> {
    let dir = &state.directory;
    let h = dir.hierarchy();
    Json(json!({
        "status": if dir.is_empty() { "empty" } else { "ok" },
        "origin": format!("{:?}", dir.origin()),
        "load_error": dir.load_error().map(|e| e.to_string()),
        "skipped_rows": dir.skipped_rows(),
        "stores": h.store_count(),
        "cities": h.city_count(),
        "states": h.state_count(),
    }))
}

