//! # FuzzySet — Termo Linguístico
//!
//! Um [`FuzzySet`] associa um nome ("baixo", "médio", "alto"...) a uma
//! [`MembershipFunction`]. O nome é único dentro da variável que o
//! contém; essa unicidade é verificada por
//! [`FuzzyVariable::add_term`](super::FuzzyVariable::add_term).

use super::error::FuzzyError;
use super::membership::{MembershipFunction, Shape};

/// Termo linguístico nomeado.
#[derive(Clone, Debug, PartialEq)]
pub struct FuzzySet {
    name: String,
    function: MembershipFunction,
}

impl FuzzySet {
    /// Cria um termo a partir da forma e da lista de parâmetros.
    ///
    /// # Erros
    ///
    /// [`FuzzyError::Configuration`] se o nome for vazio ou os parâmetros
    /// não servirem para a forma (ver [`MembershipFunction::from_params`]).
    ///
    /// # Exemplo
    ///
    /// ```rust,ignore
    /// let baixo = FuzzySet::new("low", Shape::Triangular, &[900.0, 900.0, 950.0])?;
    /// assert_eq!(baixo.evaluate(900.0), 1.0);
    /// ```
    pub fn new(name: impl Into<String>, shape: Shape, params: &[f64]) -> Result<Self, FuzzyError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(FuzzyError::config("nome de termo vazio"));
        }
        let function = MembershipFunction::from_params(shape, params)
            .map_err(|e| match e {
                FuzzyError::Configuration(msg) => {
                    FuzzyError::config(format!("termo '{}': {}", name, msg))
                }
                other => other,
            })?;
        Ok(Self { name, function })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn function(&self) -> &MembershipFunction {
        &self.function
    }

    /// Grau de pertinência de `x` neste termo.
    pub fn evaluate(&self, x: f64) -> f64 {
        self.function.evaluate(x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evaluates_through_its_function() {
        let set = FuzzySet::new("medium", Shape::Triangular, &[5.0, 6.0, 7.0]).unwrap();
        assert_eq!(set.name(), "medium");
        assert_eq!(set.evaluate(6.0), 1.0);
        assert!((set.evaluate(5.5) - 0.5).abs() < 1e-12);
        assert_eq!(set.function().shape(), Shape::Triangular);
    }

    #[test]
    fn empty_name_is_a_configuration_error() {
        let err = FuzzySet::new("  ", Shape::Gaussian, &[1.0, 1.0]).unwrap_err();
        assert!(matches!(err, FuzzyError::Configuration(_)));
    }

    #[test]
    fn arity_mismatch_names_the_term() {
        let err = FuzzySet::new("high", Shape::Trapezoidal, &[1.0, 2.0, 3.0]).unwrap_err();
        match err {
            FuzzyError::Configuration(msg) => assert!(msg.contains("high"), "{}", msg),
            other => panic!("erro inesperado: {:?}", other),
        }
    }
}
