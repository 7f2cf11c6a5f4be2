//! # Estado da Aplicação Web
//!
//! O estado é montado uma única vez em `main` e clonado para cada handler
//! pelo extrator `State<AppState>`. Os motores difusos já chegam aqui em
//! `Ready`, então nenhum handler precisa de lock:
//!
//! ```text
//! AppState
//!  ├── controller: Arc<AirQualityController>
//!  │    ├── Arc<FuzzySystem>  (triangular)
//!  │    ├── Arc<FuzzySystem>  (trapezoidal)
//!  │    └── Arc<FuzzySystem>  (gaussiano)
//!  └── default_family
//! ```

use std::sync::Arc;

use crate::controller::{AirQualityController, MembershipFamily};

/// Estado compartilhado da aplicação Axum.
#[derive(Clone)]
pub struct AppState {
    /// Os três motores configurados, somente leitura.
    pub controller: Arc<AirQualityController>,
    /// Família usada quando a requisição não informa o seletor.
    pub default_family: MembershipFamily,
}
