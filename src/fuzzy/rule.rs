//! # FuzzyRule — Implicação Ponderada
//!
//! Uma regra tem um antecedente com uma ou mais cláusulas
//! `(variável, termo)`, combinadas **estritamente da esquerda para a
//! direita** (sem precedência entre AND e OR), e um único consequente
//! `(variável de saída, termo de saída)`.
//!
//! ```text
//! SE co2 é alto  OU  co é alto  ENTÃO qualidade é nocivo  [peso 1.0]
//!    └─ semente ─┘└─ OR ─────┘
//!
//! força = min(max(semente, c₂), ...) × peso
//! ```
//!
//! A primeira cláusula não carrega conectivo; isso é garantido pelo tipo
//! (`first` + `rest`), não por convenção.
//!
//! ## Construção
//!
//! ```rust,ignore
//! let regra = FuzzyRule::when("co2", "high")
//!     .or("co", "high")
//!     .then("air_quality", "harmful")
//!     .weight(0.9)
//!     .build()?;
//! ```

use std::collections::HashMap;
use std::fmt;

use super::error::FuzzyError;
use super::variable::Memberships;

/// Entradas fuzzificadas: variável → (termo → grau).
pub type FuzzifiedInputs = HashMap<String, Memberships>;

/// Conectivo entre a cláusula acumulada e a próxima.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Connective {
    /// Mínimo.
    And,
    /// Máximo.
    Or,
}

impl Connective {
    fn combine(self, acc: f64, degree: f64) -> f64 {
        match self {
            Connective::And => acc.min(degree),
            Connective::Or => acc.max(degree),
        }
    }
}

/// Referência `(variável, termo)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Clause {
    pub variable: String,
    pub term: String,
}

impl Clause {
    fn new(variable: impl Into<String>, term: impl Into<String>) -> Self {
        Self {
            variable: variable.into(),
            term: term.into(),
        }
    }

    /// Grau da cláusula; referências desconhecidas valem 0.
    fn degree(&self, inputs: &FuzzifiedInputs) -> f64 {
        match inputs.get(&self.variable).and_then(|t| t.get(&self.term)) {
            Some(d) => *d,
            None => {
                tracing::trace!(
                    variable = %self.variable,
                    term = %self.term,
                    "cláusula referencia termo desconhecido, grau 0"
                );
                0.0
            }
        }
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} é {}", self.variable, self.term)
    }
}

/// Regra difusa imutável.
#[derive(Clone, Debug, PartialEq)]
pub struct FuzzyRule {
    first: Clause,
    rest: Vec<(Connective, Clause)>,
    consequent: Clause,
    weight: f64,
}

impl FuzzyRule {
    /// Inicia a construção de uma regra pela primeira cláusula.
    pub fn when(variable: impl Into<String>, term: impl Into<String>) -> RuleBuilder {
        RuleBuilder {
            first: Clause::new(variable, term),
            rest: Vec::new(),
            consequent: None,
            weight: 1.0,
        }
    }

    /// Cláusulas do antecedente, na ordem de avaliação. A primeira vem
    /// com `None` no lugar do conectivo.
    pub fn antecedent(&self) -> impl Iterator<Item = (Option<Connective>, &Clause)> {
        std::iter::once((None, &self.first))
            .chain(self.rest.iter().map(|(c, clause)| (Some(*c), clause)))
    }

    pub fn consequent(&self) -> &Clause {
        &self.consequent
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Força de disparo: combina as cláusulas da esquerda para a direita
    /// (AND → mínimo, OR → máximo), multiplica pelo peso e limita a
    /// `[0, peso]`.
    pub fn firing_strength(&self, inputs: &FuzzifiedInputs) -> f64 {
        let truth = self
            .rest
            .iter()
            .fold(self.first.degree(inputs), |acc, (connective, clause)| {
                connective.combine(acc, clause.degree(inputs))
            });
        (truth * self.weight).clamp(0.0, self.weight)
    }
}

impl fmt::Display for FuzzyRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SE {}", self.first)?;
        for (connective, clause) in &self.rest {
            let op = match connective {
                Connective::And => "E",
                Connective::Or => "OU",
            };
            write!(f, " {} {}", op, clause)?;
        }
        write!(f, " ENTÃO {} [{:.2}]", self.consequent, self.weight)
    }
}

/// Builder de [`FuzzyRule`]; a validação acontece em [`RuleBuilder::build`].
#[derive(Clone, Debug)]
pub struct RuleBuilder {
    first: Clause,
    rest: Vec<(Connective, Clause)>,
    consequent: Option<Clause>,
    weight: f64,
}

impl RuleBuilder {
    pub fn and(mut self, variable: impl Into<String>, term: impl Into<String>) -> Self {
        self.rest.push((Connective::And, Clause::new(variable, term)));
        self
    }

    pub fn or(mut self, variable: impl Into<String>, term: impl Into<String>) -> Self {
        self.rest.push((Connective::Or, Clause::new(variable, term)));
        self
    }

    pub fn then(mut self, variable: impl Into<String>, term: impl Into<String>) -> Self {
        self.consequent = Some(Clause::new(variable, term));
        self
    }

    /// Peso estático da regra (padrão 1.0).
    pub fn weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    /// # Erros
    ///
    /// [`FuzzyError::Configuration`] se faltar o consequente, se algum nome
    /// estiver vazio ou se o peso não for finito e positivo.
    pub fn build(self) -> Result<FuzzyRule, FuzzyError> {
        let consequent = self
            .consequent
            .ok_or_else(|| FuzzyError::config("regra sem consequente"))?;
        if !(self.weight.is_finite() && self.weight > 0.0) {
            return Err(FuzzyError::config(format!(
                "peso de regra deve ser positivo, recebeu {}",
                self.weight
            )));
        }
        let empty = std::iter::once(&self.first)
            .chain(self.rest.iter().map(|(_, c)| c))
            .chain(std::iter::once(&consequent))
            .any(|c| c.variable.trim().is_empty() || c.term.trim().is_empty());
        if empty {
            return Err(FuzzyError::config("regra com variável ou termo vazio"));
        }
        Ok(FuzzyRule {
            first: self.first,
            rest: self.rest,
            consequent,
            weight: self.weight,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(entries: &[(&str, &str, f64)]) -> FuzzifiedInputs {
        let mut map = FuzzifiedInputs::new();
        for (var, term, degree) in entries {
            map.entry(var.to_string())
                .or_default()
                .insert(term.to_string(), *degree);
        }
        map
    }

    #[test]
    fn and_takes_the_minimum() {
        let rule = FuzzyRule::when("co2", "low")
            .and("co", "low")
            .then("q", "regular")
            .build()
            .unwrap();
        let snap = inputs(&[("co2", "low", 0.8), ("co", "low", 0.3)]);
        assert!((rule.firing_strength(&snap) - 0.3).abs() < 1e-12);
    }

    #[test]
    fn or_takes_the_maximum() {
        let rule = FuzzyRule::when("co2", "high")
            .or("co", "high")
            .then("q", "harmful")
            .build()
            .unwrap();
        let snap = inputs(&[("co2", "high", 0.2), ("co", "high", 0.7)]);
        assert!((rule.firing_strength(&snap) - 0.7).abs() < 1e-12);
    }

    #[test]
    fn combines_strictly_left_to_right() {
        // (c1 AND c2) OR c3, não c1 AND (c2 OR c3)
        let rule = FuzzyRule::when("a", "x")
            .and("b", "x")
            .or("c", "x")
            .then("q", "t")
            .build()
            .unwrap();
        let snap = inputs(&[("a", "x", 0.9), ("b", "x", 0.1), ("c", "x", 0.6)]);
        let expected = (0.9f64.min(0.1)).max(0.6);
        assert!((rule.firing_strength(&snap) - expected).abs() < 1e-12);

        // a OR b AND c: com precedência daria 0.9; da esquerda para a direita, 0.2
        let rule = FuzzyRule::when("a", "x")
            .or("b", "x")
            .and("c", "x")
            .then("q", "t")
            .build()
            .unwrap();
        let snap = inputs(&[("a", "x", 0.9), ("b", "x", 0.1), ("c", "x", 0.2)]);
        assert!((rule.firing_strength(&snap) - 0.2).abs() < 1e-12);
    }

    #[test]
    fn weight_scales_and_bounds_the_strength() {
        let rule = FuzzyRule::when("o2", "low")
            .then("q", "medium_harmful")
            .weight(0.8)
            .build()
            .unwrap();
        let snap = inputs(&[("o2", "low", 1.0)]);
        assert!((rule.firing_strength(&snap) - 0.8).abs() < 1e-12);
    }

    #[test]
    fn unknown_reference_degrades_to_zero() {
        let rule = FuzzyRule::when("co2", "very_high")
            .or("co", "high")
            .then("q", "harmful")
            .build()
            .unwrap();
        let snap = inputs(&[("co2", "high", 1.0), ("co", "high", 0.4)]);
        assert!((rule.firing_strength(&snap) - 0.4).abs() < 1e-12);

        let only_unknown = FuzzyRule::when("nox", "high").then("q", "harmful").build().unwrap();
        assert_eq!(only_unknown.firing_strength(&snap), 0.0);
    }

    #[test]
    fn build_validates_weight_and_consequent() {
        assert!(FuzzyRule::when("a", "x").build().is_err());
        assert!(FuzzyRule::when("a", "x").then("q", "t").weight(0.0).build().is_err());
        assert!(FuzzyRule::when("a", "x").then("q", "t").weight(-1.0).build().is_err());
        assert!(FuzzyRule::when("a", "x").then("q", "t").weight(f64::NAN).build().is_err());
        assert!(FuzzyRule::when("a", "").then("q", "t").build().is_err());
        let rule = FuzzyRule::when("a", "x").then("q", "t").build().unwrap();
        assert_eq!(rule.weight(), 1.0);
    }

    #[test]
    fn antecedent_exposes_connectives_in_order() {
        let rule = FuzzyRule::when("co2", "low")
            .and("co", "low")
            .and("o2", "high")
            .then("q", "optimal")
            .build()
            .unwrap();
        let connectives: Vec<Option<Connective>> = rule.antecedent().map(|(c, _)| c).collect();
        assert_eq!(
            connectives,
            vec![None, Some(Connective::And), Some(Connective::And)]
        );
        assert_eq!(
            rule.to_string(),
            "SE co2 é low E co é low E o2 é high ENTÃO q é optimal [1.00]"
        );
    }
}
