//! # Configuração por Variáveis de Ambiente
//!
//! | Variável | Padrão | Uso |
//! |----------|--------|-----|
//! | `AIRQ_BIND` | `0.0.0.0:3000` | Endereço do servidor HTTP |
//! | `AIRQ_ASSETS_DIR` | `assets` | Diretório servido em `/assets` |
//! | `AIRQ_DEFAULT_FAMILY` | `triangular` | Família quando o formulário não envia seletor |
//!
//! O nível de log continua controlado por `RUST_LOG` (ver `main`).

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::controller::MembershipFamily;

const DEFAULT_BIND: &str = "0.0.0.0:3000";
const DEFAULT_ASSETS_DIR: &str = "assets";

/// Configuração da aplicação, lida uma vez na inicialização.
#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub bind: SocketAddr,
    pub assets_dir: PathBuf,
    pub default_family: MembershipFamily,
}

impl AppConfig {
    /// Lê a configuração do ambiente do processo.
    ///
    /// # Erros
    ///
    /// Retorna erro se `AIRQ_BIND` não for um endereço `host:porta` válido.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Mesma lógica de [`AppConfig::from_env`], com a fonte de valores injetável.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let bind_raw = lookup("AIRQ_BIND").unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind = bind_raw
            .parse::<SocketAddr>()
            .with_context(|| format!("AIRQ_BIND inválido: '{}'", bind_raw))?;

        let assets_dir: PathBuf = lookup("AIRQ_ASSETS_DIR")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ASSETS_DIR.to_string())
            .into();

        let default_family = lookup("AIRQ_DEFAULT_FAMILY")
            .map(|v| MembershipFamily::parse(&v))
            .unwrap_or_default();

        Ok(Self {
            bind,
            assets_dir,
            default_family,
        })
    }
}
