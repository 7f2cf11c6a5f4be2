//! # Módulo Web — Formulário e API do Índice de Qualidade do Ar
//!
//! Camada fina construída com **Axum** + **Maud**. Não contém lógica de
//! inferência: apenas lê o formulário, delega ao
//! [`AirQualityController`](crate::controller::AirQualityController) e
//! serializa o resultado.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │ Browser (sliders + canvas, fetch com debounce)       │
//! ├──────────────────────────────────────────────────────┤
//! │ Axum Router (este módulo)                            │
//! │  ├── GET  /          → página completa (Maud)        │
//! │  ├── POST /evaluate  → JSON: AirQualityReport        │
//! │  └── GET  /curves    → JSON: curvas de pertinência   │
//! ├──────────────────────────────────────────────────────┤
//! │ Static Assets (tower_http::ServeDir → /assets/)      │
//! └──────────────────────────────────────────────────────┘
//! ```

pub mod handlers;
pub mod state;
pub mod templates;

use std::path::Path;

use axum::routing::{get, post};
use axum::Router;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use state::AppState;

/// Cria o router com todas as rotas da aplicação.
pub fn create_router(state: AppState, assets_dir: impl AsRef<Path>) -> Router {
    Router::new()
        // ── Página HTML ───────────────────────────────────────
        .route("/", get(handlers::index))
        // ── API JSON ──────────────────────────────────────────
        .route("/evaluate", post(handlers::evaluate))
        .route("/curves", get(handlers::curves))
        // ── Arquivos estáticos ────────────────────────────────
        .nest_service("/assets", ServeDir::new(assets_dir.as_ref()))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
