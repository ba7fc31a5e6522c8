//! Configuration server: save endpoint plus the operator front-end files

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

use satlink_core::{SatlinkError, SatlinkResult};

use crate::export::{write_csv, ParameterRow};

pub const SAVE_CONFIG_ROUTE: &str = "/api/save-config";

/// Shared state of the save endpoint
#[derive(Debug, Clone)]
pub struct SaveState {
    save_path: Arc<PathBuf>,
}

impl SaveState {
    pub fn new(save_path: impl Into<PathBuf>) -> Self {
        SaveState {
            save_path: Arc::new(save_path.into()),
        }
    }

    pub fn save_path(&self) -> &Path {
        &self.save_path
    }
}

/// Body returned by the save endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveResponse {
    pub status: String,
    pub message: String,
}

impl SaveResponse {
    fn success(message: impl Into<String>) -> Self {
        SaveResponse {
            status: "success".into(),
            message: message.into(),
        }
    }

    fn error(message: impl Into<String>) -> Self {
        SaveResponse {
            status: "error".into(),
            message: message.into(),
        }
    }
}

/// Save endpoint, `/components/*` and everything else from `static_root`
/// (`/` resolves to `index.html`). Any origin may call it.
pub fn router(state: SaveState, static_root: &Path) -> Router {
    Router::new()
        .route(SAVE_CONFIG_ROUTE, post(save_config))
        .with_state(state)
        .nest_service("/components", ServeDir::new(static_root.join("components")))
        .fallback_service(ServeDir::new(static_root))
        .layer(CorsLayer::permissive())
}

async fn save_config(
    State(state): State<SaveState>,
    payload: Result<Json<Vec<ParameterRow>>, JsonRejection>,
) -> (StatusCode, Json<SaveResponse>) {
    let rows = match payload {
        Ok(Json(rows)) => rows,
        Err(rejection) => {
            tracing::warn!(error = %rejection.body_text(), "save request rejected");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(SaveResponse::error(rejection.body_text())),
            );
        }
    };

    match write_csv(state.save_path(), &rows).await {
        Ok(()) => (
            StatusCode::OK,
            Json(SaveResponse::success(format!(
                "Saved {} parameters to {}",
                rows.len(),
                state.save_path().display()
            ))),
        ),
        Err(e) => {
            tracing::error!(error = %e, path = %state.save_path().display(), "save failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(SaveResponse::error(e.to_string())),
            )
        }
    }
}

/// Create the directory the save endpoint writes into
pub async fn prepare_save_dir(save_path: &Path) -> SatlinkResult<()> {
    match save_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(dir) => Ok(tokio::fs::create_dir_all(dir).await?),
        None => Ok(()),
    }
}

/// Serve on `listener` until the task is dropped
pub async fn serve(
    listener: TcpListener,
    state: SaveState,
    static_root: PathBuf,
) -> SatlinkResult<()> {
    let addr = listener.local_addr()?;
    tracing::info!(
        %addr,
        path = %state.save_path().display(),
        static_root = %static_root.display(),
        "configuration server listening"
    );
    axum::serve(listener, router(state, &static_root))
        .await
        .map_err(|e| SatlinkError::Io(e.to_string()))
}
