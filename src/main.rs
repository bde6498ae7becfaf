//! Store Rating Platform API Server
//! Mission: Role-gated store discovery and rating aggregation over HTTP

use anyhow::{Context, Result};
use axum::{
    middleware,
    routing::{get, post, put},
    Json, Router,
};
use dotenv::dotenv;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::{env, sync::Arc};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use storerate_backend::{
    api,
    auth::{api as auth_api, auth_middleware, JwtHandler},
    middleware::request_logging,
    state::AppState,
    storage::Database,
};

#[tokio::main]
async fn main() -> Result<()> {
    load_env();
    init_tracing();

    info!("🚀 Store Rating API starting");

    let db_path = resolve_data_path(env::var("APP_DB_PATH").ok(), "storerate.db");
    let jwt_secret = env::var("JWT_SECRET")
        .unwrap_or_else(|_| "dev-secret-change-in-production-minimum-32-characters".to_string());

    let db = Arc::new(Database::open(&db_path)?);
    let jwt_handler = Arc::new(JwtHandler::new(jwt_secret));

    info!("📊 Database initialized at: {}", db_path);

    let app_state = AppState::new(db, jwt_handler.clone());

    // Public routes: health, signup/login, and the store directory
    let public_routes = Router::new()
        .route("/health", get(health_check))
        .route("/auth/signup", post(auth_api::signup))
        .route("/auth/login", post(auth_api::login))
        .route("/stores", get(api::stores::list_stores))
        .with_state(app_state.clone());

    // Everything else requires a bearer token
    let protected_routes = Router::new()
        .route("/stores", post(api::stores::create_store))
        .route(
            "/stores/:id",
            get(api::stores::get_store)
                .put(api::stores::update_store)
                .delete(api::stores::delete_store),
        )
        .route("/ratings", post(api::ratings::submit_rating))
        .route("/owner/stores", get(api::owner::my_stores))
        .route("/owner/store/:id/ratings", get(api::owner::store_ratings))
        .route("/admin/stats", get(api::admin::stats))
        .route(
            "/admin/users",
            get(api::admin::list_users).post(api::admin::create_user),
        )
        .route("/admin/stores", get(api::admin::list_stores))
        .route("/user/me", get(auth_api::me))
        .route("/user/password", put(auth_api::change_password))
        .route_layer(middleware::from_fn_with_state(
            jwt_handler,
            auth_middleware,
        ))
        .with_state(app_state);

    let app = Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(middleware::from_fn(request_logging))
        .layer(CorsLayer::permissive());

    let addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:5000".to_string());
    let listener = TcpListener::bind(&addr).await?;
    info!("🎯 API server listening on {}", addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "storerate=debug,storerate_backend=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn load_env() {
    // Standard dotenv search (cwd + parents), plus the crate dir so running
    // from elsewhere with --manifest-path still picks up the local .env.
    let _ = dotenv();

    let manifest_env = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(".env");
    if manifest_env.exists() {
        let _ = dotenv::from_path(&manifest_env);
    }
}

fn resolve_data_path(env_value: Option<String>, default_filename: &str) -> String {
    let base = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let Some(raw) = env_value.filter(|v| !v.trim().is_empty()) else {
        return base.join(default_filename).to_string_lossy().to_string();
    };

    let p = PathBuf::from(raw);
    if p.is_absolute() {
        return p.to_string_lossy().to_string();
    }

    // Relative paths resolve against the crate dir, not the caller's cwd.
    base.join(p).to_string_lossy().to_string()
}
