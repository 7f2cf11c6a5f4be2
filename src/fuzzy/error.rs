//! # Erros do Motor Difuso
//!
//! Taxonomia única de erros do motor, usada tanto na fase de
//! configuração quanto na avaliação.
//!
//! | Variante | Fase | Recuperável? |
//! |----------|------|--------------|
//! | [`FuzzyError::Configuration`] | Configuração | Não — impede o estado `Ready` |
//! | [`FuzzyError::DuplicateTerm`] | Configuração | Sim — o primeiro termo é mantido |
//! | [`FuzzyError::MissingInput`] | Avaliação | Deve chegar ao chamador |
//! | [`FuzzyError::NonFiniteInput`] | Avaliação | Deve chegar ao chamador |
//! | [`FuzzyError::InvalidState`] | Pós-configuração | Sim — a mutação é recusada |

use thiserror::Error;

/// Erro do motor de inferência difusa.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FuzzyError {
    /// Definição malformada de conjunto, variável, regra ou sistema.
    #[error("configuração inválida: {0}")]
    Configuration(String),

    /// Termo com nome repetido dentro da mesma variável.
    #[error("termo '{term}' já registrado na variável '{variable}'")]
    DuplicateTerm { variable: String, term: String },

    /// Variável de entrada configurada sem valor no mapa de entradas.
    #[error("entrada ausente para a variável '{0}'")]
    MissingInput(String),

    /// Valor de entrada NaN ou infinito.
    #[error("valor não finito para a variável '{variable}': {value}")]
    NonFiniteInput { variable: String, value: f64 },

    /// Tentativa de mutar o sistema depois que ele entrou em `Ready`.
    #[error("sistema já está pronto; operação recusada: {0}")]
    InvalidState(&'static str),
}

impl FuzzyError {
    /// Atalho para [`FuzzyError::Configuration`].
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        FuzzyError::Configuration(msg.into())
    }

    /// Código estável para respostas JSON.
    pub fn code(&self) -> &'static str {
        match self {
            FuzzyError::Configuration(_) => "CONFIGURATION",
            FuzzyError::DuplicateTerm { .. } => "DUPLICATE_TERM",
            FuzzyError::MissingInput(_) => "MISSING_INPUT",
            FuzzyError::NonFiniteInput { .. } => "NON_FINITE_INPUT",
            FuzzyError::InvalidState(_) => "INVALID_STATE",
        }
    }
}
