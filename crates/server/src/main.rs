use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use shared::{
    domain::{Hero, HeroId, NewHero},
    error::{ApiError, ErrorCode},
    protocol::{HeroQuery, HEROES_PATH},
};
use tower_http::limit::RequestBodyLimitLayer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod api;
mod app_state;
mod config;
mod store;

use api::ApiContext;
use app_state::AppState;
use config::load_settings;
use store::HeroStore;

type HttpResult<T> = Result<T, (StatusCode, Json<ApiError>)>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let settings = load_settings();
    let store = if settings.seed_heroes {
        HeroStore::seeded()
    } else {
        HeroStore::default()
    };
    info!(heroes = store.len().await, "hero collection ready");

    let state = AppState {
        api: ApiContext { store },
        response_delay: settings.response_delay,
    };
    let app = build_router(Arc::new(state), settings.max_body_bytes);

    let addr: SocketAddr = settings.server_bind.parse()?;
    info!(%addr, delay = ?settings.response_delay, "hero api listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>, max_body_bytes: usize) -> Router {
    let search_path = format!("{HEROES_PATH}/");
    let item_path = format!("{HEROES_PATH}/:id");
    Router::new()
        .route("/healthz", get(healthz))
        .route(
            HEROES_PATH,
            get(http_list_heroes)
                .post(http_create_hero)
                .put(http_update_hero),
        )
        .route(&search_path, get(http_list_heroes))
        .route(&item_path, get(http_get_hero).delete(http_delete_hero))
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn http_list_heroes(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HeroQuery>,
) -> Json<Vec<Hero>> {
    simulate_latency(&state).await;
    Json(api::list_heroes(&state.api, &query).await)
}

async fn http_get_hero(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> HttpResult<Json<Hero>> {
    simulate_latency(&state).await;
    api::get_hero(&state.api, HeroId(id))
        .await
        .map(Json)
        .map_err(http_error)
}

async fn http_create_hero(
    State(state): State<Arc<AppState>>,
    Json(new_hero): Json<NewHero>,
) -> HttpResult<(StatusCode, Json<Hero>)> {
    simulate_latency(&state).await;
    let hero = api::create_hero(&state.api, new_hero)
        .await
        .map_err(http_error)?;
    info!(id = %hero.id, name = %hero.name, "hero created");
    Ok((StatusCode::CREATED, Json(hero)))
}

async fn http_update_hero(
    State(state): State<Arc<AppState>>,
    Json(hero): Json<Hero>,
) -> HttpResult<StatusCode> {
    simulate_latency(&state).await;
    let id = hero.id;
    api::update_hero(&state.api, hero)
        .await
        .map_err(http_error)?;
    info!(%id, "hero updated");
    Ok(StatusCode::NO_CONTENT)
}

async fn http_delete_hero(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> HttpResult<Json<Hero>> {
    simulate_latency(&state).await;
    let hero = api::delete_hero(&state.api, HeroId(id))
        .await
        .map_err(http_error)?;
    info!(%id, "hero deleted");
    Ok(Json(hero))
}

async fn simulate_latency(state: &AppState) {
    if !state.response_delay.is_zero() {
        tokio::time::sleep(state.response_delay).await;
    }
}

fn http_error(error: ApiError) -> (StatusCode, Json<ApiError>) {
    let status = match error.code {
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Validation => StatusCode::BAD_REQUEST,
    };
    warn!(%status, %error, "hero request rejected");
    (status, Json(error))
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
