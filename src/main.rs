#![allow(dead_code, unused_imports)]
//! # Controle Difuso de Qualidade do Ar
//!
//! **Ponto de entrada** da aplicação. Converte quatro leituras de sensores
//! (CO2, H2, CO, O2) em um índice de qualidade do ar de 0 a 500 usando um
//! motor de inferência difusa estilo Mamdani.
//!
//! ## Fluxo de Inicialização
//!
//! ```text
//! main()
//!   ├── Configura tracing/logging (RUST_LOG)
//!   ├── Lê AppConfig do ambiente
//!   ├── Constrói os 3 motores (triangular, trapezoidal, gaussiano)
//!   │     └── erro de configuração → aborta
//!   ├── Monta AppState e Router
//!   └── Inicia servidor TCP em AIRQ_BIND
//! ```
//!
//! ## Exemplo de Uso
//!
//! ```bash
//! # Executar com logs padrão (info)
//! cargo run
//!
//! # Ver cada avaliação
//! RUST_LOG=air_quality_fuzzy=debug cargo run
//!
//! # Outra porta, gaussiana por padrão
//! AIRQ_BIND=127.0.0.1:8080 AIRQ_DEFAULT_FAMILY=gaussiano cargo run
//! ```

/// Módulo `config` — configuração por variáveis de ambiente.
mod config;

/// Módulo `controller` — variáveis, termos e regras do domínio de qualidade do ar.
mod controller;

/// Módulo `fuzzy` — motor de inferência difusa (pertinência, regras, defuzzificação).
mod fuzzy;

/// Módulo `web` — servidor axum, handlers HTTP e template Maud.
mod web;

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;
use crate::controller::AirQualityController;
use crate::web::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Aceita RUST_LOG para configurar o nível; padrão "info".
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("🌬️ Controle Difuso de Qualidade do Ar — Starting...");

    let config = AppConfig::from_env()?;
    tracing::info!(
        bind = %config.bind,
        assets = %config.assets_dir.display(),
        family = %config.default_family,
        "configuração carregada"
    );

    // Os motores são construídos uma vez e nunca mais mutados.
    let controller = AirQualityController::new().context("Falha ao configurar motores difusos")?;

    let state = AppState {
        controller: Arc::new(controller),
        default_family: config.default_family,
    };
    let app = web::create_router(state, &config.assets_dir);

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("Falha ao fazer bind em {}", config.bind))?;
    tracing::info!("🚀 Server running at http://{}", config.bind);

    axum::serve(listener, app).await?;

    Ok(())
}
