//! # Handlers HTTP
//!
//! Cada função pública é um handler Axum mapeado em
//! [`super::create_router()`].
//!
//! | Handler | Método | Retorno | Uso |
//! |---------|--------|---------|-----|
//! | `index` | GET | HTML completo | Formulário + gráficos |
//! | `evaluate` | POST | JSON | Índice, porcentagem, categoria, graus |
//! | `curves` | GET | JSON | Curvas de todos os termos da família |
//!
//! ## Erros
//!
//! Erros do motor viram [`ApiError`]: entradas inválidas respondem 422,
//! o restante 500, sempre com corpo `{ "error": ..., "code": ... }`.

use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::{Form, Json};
use serde::{Deserialize, Serialize};

use super::state::AppState;
use super::templates;
use crate::controller::{AirQualityReport, MembershipFamily, Reading};
use crate::fuzzy::{CurvePoint, FuzzyError, FuzzyVariable};

/// Amostras por curva gaussiana nos gráficos.
const CURVE_POINTS: usize = 100;

/// Erro do motor convertido em resposta HTTP.
#[derive(Debug)]
pub struct ApiError(FuzzyError);

impl From<FuzzyError> for ApiError {
    fn from(err: FuzzyError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0 {
            FuzzyError::MissingInput(_) | FuzzyError::NonFiniteInput { .. } => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        tracing::warn!(error = %self.0, status = %status, "avaliação recusada");
        let body = serde_json::json!({
            "error": self.0.to_string(),
            "code": self.0.code(),
        });
        (status, Json(body)).into_response()
    }
}

/// Campos do formulário de avaliação. Campos ausentes usam a posição
/// inicial dos sliders; `family` ausente usa a família padrão configurada.
#[derive(Debug, Default, Deserialize)]
pub struct EvaluateForm {
    pub co2: Option<f64>,
    pub h2: Option<f64>,
    pub co: Option<f64>,
    pub o2: Option<f64>,
    pub family: Option<String>,
}

impl EvaluateForm {
    fn reading(&self) -> Reading {
        let defaults = Reading::default();
        Reading {
            co2: self.co2.unwrap_or(defaults.co2),
            h2: self.h2.unwrap_or(defaults.h2),
            co: self.co.unwrap_or(defaults.co),
            o2: self.o2.unwrap_or(defaults.o2),
        }
    }
}

/// Query string de `/curves`.
#[derive(Debug, Default, Deserialize)]
pub struct CurvesQuery {
    pub family: Option<String>,
}

/// Curvas de uma família inteira.
#[derive(Serialize)]
pub struct CurvesResponse {
    pub family: MembershipFamily,
    pub variables: Vec<VariableCurves>,
}

/// Domínio e termos de uma variável.
#[derive(Serialize)]
pub struct VariableCurves {
    pub name: String,
    pub min: f64,
    pub max: f64,
    /// `true` para a variável de saída.
    pub output: bool,
    pub terms: Vec<TermCurve>,
}

#[derive(Serialize)]
pub struct TermCurve {
    pub name: String,
    pub points: Vec<CurvePoint>,
}

impl VariableCurves {
    fn from_variable(variable: &FuzzyVariable, output: bool) -> Self {
        Self {
            name: variable.name().to_string(),
            min: variable.min(),
            max: variable.max(),
            output,
            terms: variable
                .terms()
                .iter()
                .map(|term| TermCurve {
                    name: term.name().to_string(),
                    points: term
                        .function()
                        .curve(variable.min(), variable.max(), CURVE_POINTS),
                })
                .collect(),
        }
    }
}

fn resolve_family(selector: Option<&str>, fallback: MembershipFamily) -> MembershipFamily {
    selector.map(MembershipFamily::parse).unwrap_or(fallback)
}

/// GET `/` — Página com sliders, seletor de família e gráficos.
///
/// Já vem renderizada com o resultado da leitura inicial, para que a
/// barra não fique vazia antes do primeiro `fetch`.
pub async fn index(State(state): State<AppState>) -> Html<String> {
    let family = state.default_family;
    let reading = Reading::default();
    let initial = match state.controller.evaluate(family, reading) {
        Ok(report) => Some(report),
        Err(e) => {
            tracing::error!(error = %e, "falha ao avaliar leitura inicial");
            None
        }
    };
    let system = state.controller.engine(family);
    Html(templates::full_page(system, family, reading, initial.as_ref()).into_string())
}

/// POST `/evaluate` — Avalia o formulário e devolve o relatório em JSON.
///
/// A resposta nunca deve ser cacheada: o mesmo endpoint responde a cada
/// movimento de slider.
pub async fn evaluate(
    State(state): State<AppState>,
    Form(form): Form<EvaluateForm>,
) -> Result<impl IntoResponse, ApiError> {
    let family = resolve_family(form.family.as_deref(), state.default_family);
    let report: AirQualityReport = state.controller.evaluate(family, form.reading())?;
    Ok((
        [(header::CACHE_CONTROL, "no-cache, no-store, must-revalidate")],
        Json(report),
    ))
}

/// GET `/curves?family=` — Curvas de pertinência de todas as variáveis.
pub async fn curves(
    State(state): State<AppState>,
    Query(query): Query<CurvesQuery>,
) -> Json<CurvesResponse> {
    let family = resolve_family(query.family.as_deref(), state.default_family);
    let system = state.controller.engine(family);
    let variables = system
        .inputs()
        .iter()
        .map(|v| VariableCurves::from_variable(v, false))
        .chain(
            system
                .outputs()
                .iter()
                .map(|v| VariableCurves::from_variable(v, true)),
        )
        .collect();
    Json(CurvesResponse { family, variables })
}
