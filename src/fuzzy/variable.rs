//! # FuzzyVariable — Eixo Linguístico
//!
//! Uma variável tem um domínio `[min, max]` e uma coleção **ordenada**
//! de termos com nomes únicos. A ordem de registro é preservada para que
//! a visualização desenhe os termos sempre na mesma sequência.
//!
//! ## Configuração Encadeada
//!
//! ```rust,ignore
//! let mut co2 = FuzzyVariable::new("co2", 900.0, 1046.0)?;
//! co2.add_term(FuzzySet::new("low", Shape::Triangular, &[900.0, 900.0, 950.0])?)?
//!    .add_term(FuzzySet::new("medium", Shape::Triangular, &[925.0, 975.0, 1025.0])?)?
//!    .add_term(FuzzySet::new("high", Shape::Triangular, &[1000.0, 1046.0, 1046.0])?)?;
//! ```

use std::collections::HashMap;

use super::error::FuzzyError;
use super::set::FuzzySet;

/// Graus de pertinência de um valor crisp, por nome de termo.
pub type Memberships = HashMap<String, f64>;

/// Variável linguística (entrada ou saída).
#[derive(Clone, Debug, PartialEq)]
pub struct FuzzyVariable {
    name: String,
    min: f64,
    max: f64,
    terms: Vec<FuzzySet>,
}

impl FuzzyVariable {
    /// Cria uma variável sem termos.
    ///
    /// # Erros
    ///
    /// [`FuzzyError::Configuration`] se o nome for vazio ou se o domínio
    /// não satisfizer `min < max` (ambos finitos).
    pub fn new(name: impl Into<String>, min: f64, max: f64) -> Result<Self, FuzzyError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(FuzzyError::config("nome de variável vazio"));
        }
        if !(min.is_finite() && max.is_finite() && min < max) {
            return Err(FuzzyError::config(format!(
                "domínio inválido para '{}': [{}, {}]",
                name, min, max
            )));
        }
        Ok(Self {
            name,
            min,
            max,
            terms: Vec::new(),
        })
    }

    /// Registra um termo. Retorna a própria variável para encadeamento.
    ///
    /// # Erros
    ///
    /// [`FuzzyError::DuplicateTerm`] se já existir um termo com o mesmo
    /// nome — o termo original é mantido e a variável segue utilizável.
    pub fn add_term(&mut self, set: FuzzySet) -> Result<&mut Self, FuzzyError> {
        if self.term(set.name()).is_some() {
            return Err(FuzzyError::DuplicateTerm {
                variable: self.name.clone(),
                term: set.name().to_string(),
            });
        }
        self.terms.push(set);
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    /// Ponto médio do domínio — resultado padrão quando nenhuma regra dispara.
    pub fn midpoint(&self) -> f64 {
        (self.min + self.max) / 2.0
    }

    /// Termos na ordem de registro.
    pub fn terms(&self) -> &[FuzzySet] {
        &self.terms
    }

    pub fn term(&self, name: &str) -> Option<&FuzzySet> {
        self.terms.iter().find(|t| t.name() == name)
    }

    /// Limita `x` ao domínio da variável.
    pub fn clamp(&self, x: f64) -> f64 {
        x.clamp(self.min, self.max)
    }

    /// Fuzzifica `x`: grau de **todos** os termos registrados, após limitar
    /// `x` ao domínio.
    pub fn fuzzify(&self, x: f64) -> Memberships {
        let x = self.clamp(x);
        self.terms
            .iter()
            .map(|t| (t.name().to_string(), t.evaluate(x)))
            .collect()
    }
}
