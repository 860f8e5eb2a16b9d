use axum::{
    routing::{get, post},
    Router,
};
use rand::thread_rng;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use crate::auth::SessionStore;
use crate::config::{ensure_db_dir, Settings};
use crate::storage::{HrStore, SchemaState};

pub mod routes;

/// Server state
pub struct AppState {
    pub database_path: PathBuf,
    pub sessions: SessionStore,
    pub row_limit: usize,
    pub window_days: u32,
}

impl AppState {
    pub fn new(settings: &Settings) -> Self {
        Self {
            database_path: settings.database.clone(),
            sessions: SessionStore::new(settings.credentials.clone(), settings.session_ttl),
            row_limit: settings.row_limit,
            window_days: settings.window_days,
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .route("/login", post(routes::login))
        .route("/logout", post(routes::logout))
        .route("/dashboard", get(routes::get_dashboard))
        .route("/tables", get(routes::list_tables))
        .route("/tables/{name}", get(routes::get_table))
        .route("/tables/{name}/columns", get(routes::get_columns))
        .route("/tables/{name}/rows", post(routes::upload_rows))
        .route("/workflow", get(routes::get_workflow));

    Router::new()
        .route("/health", get(routes::health))
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Create the schema and seed demo rows on first start
pub fn prepare_database(path: &Path, seed_demo: bool) -> anyhow::Result<()> {
    ensure_db_dir(path)?;
    let store = HrStore::open(path)?;
    if store.ensure_schema()? == SchemaState::AlreadyInitialized {
        return Ok(());
    }
    if seed_demo {
        let today = chrono::Local::now().date_naive();
        if let Some(summary) = store.seed_demo_data(today, &mut thread_rng())? {
            tracing::info!("Seeded {} demo rows", summary.rows);
        }
    } else {
        store.mark_initialized()?;
    }
    Ok(())
}

pub async fn start_server(port: u16, settings: Settings) -> anyhow::Result<()> {
    prepare_database(&settings.database, settings.seed_demo)?;

    let state = Arc::new(AppState::new(&settings));
    let app = router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Starting server on {}", addr);
    println!("🌍 Server running at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
