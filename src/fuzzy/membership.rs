//! # Funções de Pertinência
//!
//! Avaliadores puros de curvas paramétricas. O conjunto de formas é fechado
//! (três variantes), então a representação é um enum com um `match` no
//! avaliador — sem trait objects.
//!
//! ```text
//!  Triangular(a,b,c)     Trapezoidal(a,b,c,d)     Gaussian(center,σ)
//!
//!        1 ┤  /\               1 ┤   ____               1 ┤    .-.
//!          │ /  \                │  /    \                │  .'   '.
//!        0 ┼/────\──           0 ┼─/──────\──           0 ┼─'───────'─
//!          a  b  c               a  b    c  d                 center
//! ```
//!
//! Todas as avaliações são limitadas a `[0, 1]` para absorver erros de
//! arredondamento de ponto flutuante.

use serde::Serialize;

use super::error::FuzzyError;

/// Família de forma, usada para construir uma [`MembershipFunction`] a
/// partir de uma lista de parâmetros.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    Triangular,
    Trapezoidal,
    Gaussian,
}

impl Shape {
    /// Número de parâmetros esperado pela forma.
    pub fn arity(self) -> usize {
        match self {
            Shape::Triangular => 3,
            Shape::Trapezoidal => 4,
            Shape::Gaussian => 2,
        }
    }
}

/// Curva paramétrica imutável.
///
/// Invariantes garantidos por [`MembershipFunction::from_params`]:
/// `a ≤ b ≤ c (≤ d)` e `sigma > 0`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MembershipFunction {
    Triangular { a: f64, b: f64, c: f64 },
    Trapezoidal { a: f64, b: f64, c: f64, d: f64 },
    Gaussian { center: f64, sigma: f64 },
}

/// Ponto de uma curva amostrada para os gráficos.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct CurvePoint {
    pub x: f64,
    pub y: f64,
}

impl MembershipFunction {
    /// Constrói a curva validando aridade, finitude e ordenação dos parâmetros.
    ///
    /// # Erros
    ///
    /// [`FuzzyError::Configuration`] se:
    /// - `params.len()` difere de [`Shape::arity`]
    /// - algum parâmetro não é finito
    /// - os vértices não estão em ordem não-decrescente
    /// - `sigma <= 0`
    pub fn from_params(shape: Shape, params: &[f64]) -> Result<Self, FuzzyError> {
        if params.len() != shape.arity() {
            return Err(FuzzyError::config(format!(
                "forma {:?} exige {} parâmetros, recebeu {}",
                shape,
                shape.arity(),
                params.len()
            )));
        }
        if params.iter().any(|p| !p.is_finite()) {
            return Err(FuzzyError::config(format!(
                "parâmetros não finitos: {:?}",
                params
            )));
        }

        let function = match shape {
            Shape::Triangular => MembershipFunction::Triangular {
                a: params[0],
                b: params[1],
                c: params[2],
            },
            Shape::Trapezoidal => MembershipFunction::Trapezoidal {
                a: params[0],
                b: params[1],
                c: params[2],
                d: params[3],
            },
            Shape::Gaussian => MembershipFunction::Gaussian {
                center: params[0],
                sigma: params[1],
            },
        };

        match shape {
            Shape::Gaussian if params[1] <= 0.0 => Err(FuzzyError::config(format!(
                "sigma deve ser positivo, recebeu {}",
                params[1]
            ))),
            Shape::Triangular | Shape::Trapezoidal
                if params.windows(2).any(|w| w[0] > w[1]) =>
            {
                Err(FuzzyError::config(format!(
                    "vértices fora de ordem: {:?}",
                    params
                )))
            }
            _ => Ok(function),
        }
    }

    /// Forma desta curva.
    pub fn shape(&self) -> Shape {
        match self {
            MembershipFunction::Triangular { .. } => Shape::Triangular,
            MembershipFunction::Trapezoidal { .. } => Shape::Trapezoidal,
            MembershipFunction::Gaussian { .. } => Shape::Gaussian,
        }
    }

    /// Grau de pertinência de `x`, sempre em `[0, 1]`; a gaussiana nunca devolve 0.
    ///
    /// Lados de largura zero (`a == b`, `b == c`, ...) viram degraus
    /// verticais; `a == b == c` colapsa em um pico singular em `b`.
    pub fn evaluate(&self, x: f64) -> f64 {
        let degree = match *self {
            MembershipFunction::Triangular { a, b, c } => {
                if x < a || x > c {
                    0.0
                } else if x == b {
                    1.0
                } else if x < b {
                    // a <= x < b implica b - a > 0
                    (x - a) / (b - a)
                } else {
                    // b < x <= c implica c - b > 0
                    (c - x) / (c - b)
                }
            }
            MembershipFunction::Trapezoidal { a, b, c, d } => {
                if x < a || x > d {
                    0.0
                } else if x >= b && x <= c {
                    1.0
                } else if x < b {
                    (x - a) / (b - a)
                } else {
                    (d - x) / (d - c)
                }
            }
            MembershipFunction::Gaussian { center, sigma } => {
                let dx = x - center;
                // a cauda nunca chega a 0, mesmo quando exp() sofre underflow
                (-(dx * dx) / (2.0 * sigma * sigma)).exp().max(f64::MIN_POSITIVE)
            }
        };
        degree.clamp(0.0, 1.0)
    }

    /// Valor representativo usado na defuzzificação por média ponderada:
    /// o pico do triângulo, o meio do platô do trapézio, o centro da gaussiana.
    pub fn representative(&self) -> f64 {
        match *self {
            MembershipFunction::Triangular { b, .. } => b,
            MembershipFunction::Trapezoidal { b, c, .. } => (b + c) / 2.0,
            MembershipFunction::Gaussian { center, .. } => center,
        }
    }

    /// Amostra a curva sobre `[min, max]` para visualização.
    ///
    /// Triângulos e trapézios são lineares por partes, então basta emitir
    /// os vértices que caem no domínio (mais as duas extremidades). A
    /// gaussiana é amostrada em `points + 1` posições equidistantes.
    pub fn curve(&self, min: f64, max: f64, points: usize) -> Vec<CurvePoint> {
        let xs: Vec<f64> = match *self {
            MembershipFunction::Triangular { a, b, c } => breakpoints(min, max, &[a, b, c]),
            MembershipFunction::Trapezoidal { a, b, c, d } => {
                breakpoints(min, max, &[a, b, c, d])
            }
            MembershipFunction::Gaussian { .. } => {
                let points = points.max(1);
                let step = (max - min) / points as f64;
                (0..=points).map(|i| min + step * i as f64).collect()
            }
        };
        xs.into_iter()
            .map(|x| CurvePoint {
                x,
                y: self.evaluate(x),
            })
            .collect()
    }
}

/// Extremidades do domínio mais os vértices internos, ordenados e sem repetição.
fn breakpoints(min: f64, max: f64, vertices: &[f64]) -> Vec<f64> {
    let mut xs = Vec::with_capacity(vertices.len() + 2);
    xs.push(min);
    xs.extend(vertices.iter().copied().filter(|v| *v > min && *v < max));
    xs.push(max);
    xs.sort_by(|a, b| a.total_cmp(b));
    xs.dedup();
    xs
}
