//! # FuzzySystem — Orquestrador da Inferência Mamdani
//!
//! Dono das variáveis de entrada e saída e da base de regras. Cada
//! avaliação percorre o pipeline em uma única direção:
//!
//! ```text
//! valores crisp ──fuzzify──▶ graus por termo
//!               ──regras───▶ força de disparo por regra
//!               ──MAX──────▶ ativação por termo de saída
//!               ──média────▶ valor crisp por variável de saída
//! ```
//!
//! ## Ciclo de Vida
//!
//! ```text
//! Configuring ──(finish_configuration | primeira evaluate)──▶ Ready
//!   add_input / add_output / add_rule            qualquer add_* → InvalidState
//! ```
//!
//! Em `Ready` o sistema é somente leitura; `evaluate` recebe `&self` e pode
//! ser chamado concorrentemente por várias threads (o único estado interno
//! mutável é a flag atômica de prontidão).
//!
//! Fora essa flag o motor não sincroniza nada. Ela existe porque a
//! transição implícita para `Ready` acontece dentro de `evaluate(&self)`,
//! e um `bool` comum exigiria `&mut self` ou um lock em toda avaliação.
//!
//! ## Defuzzificação
//!
//! Média ponderada discreta dos valores representativos dos termos de
//! saída (pico/centro de cada curva):
//!
//! ```text
//! y = Σ(ativaçãoᵢ × representativoᵢ) / Σ ativaçãoᵢ
//! ```
//!
//! Se nenhuma regra disparar (`Σ ativação = 0`), o resultado é o ponto médio
//! do domínio da variável de saída.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;

use super::error::FuzzyError;
use super::rule::{FuzzifiedInputs, FuzzyRule};
use super::variable::FuzzyVariable;

/// Estado do ciclo de vida do sistema.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum SystemState {
    Configuring,
    Ready,
}

/// Ativação agregada de um termo de saída.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TermActivation {
    pub term: String,
    pub activation: f64,
}

/// Rastro completo de uma avaliação.
#[derive(Clone, Debug, Serialize)]
pub struct Inference {
    /// Graus de todos os termos de todas as variáveis de entrada.
    pub fuzzified: FuzzifiedInputs,
    /// Força de disparo de cada regra, na ordem de registro.
    pub firing_strengths: Vec<f64>,
    /// Ativação de cada termo, por variável de saída.
    pub activations: HashMap<String, Vec<TermActivation>>,
    /// Valor crisp por variável de saída.
    pub outputs: HashMap<String, f64>,
}

/// Sistema de inferência difusa.
#[derive(Debug, Default)]
pub struct FuzzySystem {
    inputs: Vec<FuzzyVariable>,
    outputs: Vec<FuzzyVariable>,
    rules: Vec<FuzzyRule>,
    ready: AtomicBool,
}

impl FuzzySystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SystemState {
        if self.ready.load(Ordering::Acquire) {
            SystemState::Ready
        } else {
            SystemState::Configuring
        }
    }

    fn ensure_configuring(&mut self, operation: &'static str) -> Result<(), FuzzyError> {
        if *self.ready.get_mut() {
            Err(FuzzyError::InvalidState(operation))
        } else {
            Ok(())
        }
    }

    fn ensure_unique_variable(&self, name: &str) -> Result<(), FuzzyError> {
        let taken = self
            .inputs
            .iter()
            .chain(self.outputs.iter())
            .any(|v| v.name() == name);
        if taken {
            Err(FuzzyError::config(format!("variável '{}' já registrada", name)))
        } else {
            Ok(())
        }
    }

    /// Registra uma variável de entrada.
    ///
    /// # Erros
    ///
    /// - [`FuzzyError::InvalidState`] se o sistema já estiver `Ready`
    /// - [`FuzzyError::Configuration`] se o nome já estiver em uso
    pub fn add_input(&mut self, variable: FuzzyVariable) -> Result<&mut Self, FuzzyError> {
        self.ensure_configuring("add_input")?;
        self.ensure_unique_variable(variable.name())?;
        self.inputs.push(variable);
        Ok(self)
    }

    /// Registra uma variável de saída. Mesmos erros de [`FuzzySystem::add_input`].
    pub fn add_output(&mut self, variable: FuzzyVariable) -> Result<&mut Self, FuzzyError> {
        self.ensure_configuring("add_output")?;
        self.ensure_unique_variable(variable.name())?;
        self.outputs.push(variable);
        Ok(self)
    }

    /// Registra uma regra.
    ///
    /// O consequente precisa apontar para uma variável de saída e um termo
    /// já registrados. O antecedente **não** é verificado: referências
    /// desconhecidas apenas zeram a força da própria regra na avaliação.
    ///
    /// # Erros
    ///
    /// - [`FuzzyError::InvalidState`] se o sistema já estiver `Ready`
    /// - [`FuzzyError::Configuration`] se o consequente for desconhecido
    pub fn add_rule(&mut self, rule: FuzzyRule) -> Result<&mut Self, FuzzyError> {
        self.ensure_configuring("add_rule")?;
        let target = rule.consequent();
        let known = self
            .output(&target.variable)
            .and_then(|v| v.term(&target.term))
            .is_some();
        if !known {
            return Err(FuzzyError::config(format!(
                "consequente desconhecido: {}",
                target
            )));
        }
        self.rules.push(rule);
        Ok(self)
    }

    pub fn inputs(&self) -> &[FuzzyVariable] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[FuzzyVariable] {
        &self.outputs
    }

    pub fn rules(&self) -> &[FuzzyRule] {
        &self.rules
    }

    pub fn input(&self, name: &str) -> Option<&FuzzyVariable> {
        self.inputs.iter().find(|v| v.name() == name)
    }

    pub fn output(&self, name: &str) -> Option<&FuzzyVariable> {
        self.outputs.iter().find(|v| v.name() == name)
    }

    /// Encerra a configuração: valida o sistema e passa para `Ready`.
    /// Idempotente.
    ///
    /// # Erros
    ///
    /// [`FuzzyError::Configuration`] se não houver variável de saída ou se
    /// alguma delas não tiver termos; o sistema permanece em `Configuring`.
    pub fn finish_configuration(&self) -> Result<(), FuzzyError> {
        if self.ready.load(Ordering::Acquire) {
            return Ok(());
        }
        if self.outputs.is_empty() {
            return Err(FuzzyError::config("sistema sem variável de saída"));
        }
        if let Some(empty) = self.outputs.iter().find(|v| v.terms().is_empty()) {
            return Err(FuzzyError::config(format!(
                "variável de saída '{}' sem termos",
                empty.name()
            )));
        }
        self.ready.store(true, Ordering::Release);
        Ok(())
    }

    /// Avalia o sistema e devolve apenas os valores crisp de saída.
    pub fn evaluate(&self, inputs: &HashMap<String, f64>) -> Result<HashMap<String, f64>, FuzzyError> {
        self.evaluate_detailed(inputs).map(|inference| inference.outputs)
    }

    /// Avalia o sistema devolvendo o rastro completo da inferência.
    ///
    /// # Erros
    ///
    /// - [`FuzzyError::Configuration`] se o sistema não puder ficar `Ready`
    /// - [`FuzzyError::MissingInput`] se uma entrada registrada não tiver valor
    /// - [`FuzzyError::NonFiniteInput`] se um valor for NaN ou infinito
    pub fn evaluate_detailed(&self, inputs: &HashMap<String, f64>) -> Result<Inference, FuzzyError> {
        self.finish_configuration()?;

        // 1. Fuzzificação de todas as entradas registradas
        let mut fuzzified = FuzzifiedInputs::with_capacity(self.inputs.len());
        for variable in &self.inputs {
            let value = *inputs
                .get(variable.name())
                .ok_or_else(|| FuzzyError::MissingInput(variable.name().to_string()))?;
            if !value.is_finite() {
                return Err(FuzzyError::NonFiniteInput {
                    variable: variable.name().to_string(),
                    value,
                });
            }
            fuzzified.insert(variable.name().to_string(), variable.fuzzify(value));
        }

        // 2. Força de disparo de cada regra
        let firing_strengths: Vec<f64> = self
            .rules
            .iter()
            .map(|rule| rule.firing_strength(&fuzzified))
            .collect();

        // 3. Agregação (MAX) e 4. defuzzificação, por variável de saída
        let mut activations = HashMap::with_capacity(self.outputs.len());
        let mut outputs = HashMap::with_capacity(self.outputs.len());
        for variable in &self.outputs {
            let terms = self.aggregate(variable, &firing_strengths);
            outputs.insert(variable.name().to_string(), defuzzify(variable, &terms));
            activations.insert(variable.name().to_string(), terms);
        }

        Ok(Inference {
            fuzzified,
            firing_strengths,
            activations,
            outputs,
        })
    }

    /// Ativação de cada termo de `variable`: o máximo das forças das regras
    /// que o têm como consequente (0 se nenhuma regra o referencia).
    fn aggregate(&self, variable: &FuzzyVariable, strengths: &[f64]) -> Vec<TermActivation> {
        variable
            .terms()
            .iter()
            .map(|term| {
                let activation = self
                    .rules
                    .iter()
                    .zip(strengths)
                    .filter(|(rule, _)| {
                        let c = rule.consequent();
                        c.variable == variable.name() && c.term == term.name()
                    })
                    .map(|(_, strength)| *strength)
                    .fold(0.0, f64::max);
                TermActivation {
                    term: term.name().to_string(),
                    activation,
                }
            })
            .collect()
    }
}

/// Média ponderada dos representativos; ponto médio do domínio se nada disparou.
fn defuzzify(variable: &FuzzyVariable, activations: &[TermActivation]) -> f64 {
    let mut weighted = 0.0;
    let mut total = 0.0;
    for entry in activations {
        if entry.activation <= 0.0 {
            continue;
        }
        if let Some(term) = variable.term(&entry.term) {
            weighted += entry.activation * term.function().representative();
            total += entry.activation;
        }
    }
    if total > 0.0 {
        weighted / total
    } else {
        variable.midpoint()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::fuzzy::membership::Shape;
    use crate::fuzzy::set::FuzzySet;

    /// Sistema mínimo: uma entrada `temp` [0, 100] e uma saída `fan` [0, 10].
    fn fan_system() -> FuzzySystem {
        let mut temp = FuzzyVariable::new("temp", 0.0, 100.0).unwrap();
        temp.add_term(FuzzySet::new("cold", Shape::Triangular, &[0.0, 0.0, 50.0]).unwrap())
            .unwrap()
            .add_term(FuzzySet::new("hot", Shape::Triangular, &[50.0, 100.0, 100.0]).unwrap())
            .unwrap();

        let mut fan = FuzzyVariable::new("fan", 0.0, 10.0).unwrap();
        fan.add_term(FuzzySet::new("slow", Shape::Triangular, &[0.0, 2.0, 4.0]).unwrap())
            .unwrap()
            .add_term(FuzzySet::new("fast", Shape::Triangular, &[6.0, 8.0, 10.0]).unwrap())
            .unwrap()
            .add_term(FuzzySet::new("idle", Shape::Triangular, &[0.0, 0.0, 1.0]).unwrap())
            .unwrap();

        let mut system = FuzzySystem::new();
        system.add_input(temp).unwrap().add_output(fan).unwrap();
        system
            .add_rule(FuzzyRule::when("temp", "cold").then("fan", "slow").build().unwrap())
            .unwrap()
            .add_rule(
                FuzzyRule::when("temp", "hot")
                    .then("fan", "fast")
                    .weight(0.5)
                    .build()
                    .unwrap(),
            )
            .unwrap();
        system
    }

    fn temp(value: f64) -> HashMap<String, f64> {
        HashMap::from([("temp".to_string(), value)])
    }

    #[test]
    fn single_active_term_yields_its_representative() {
        let system = fan_system();
        // temp 10 → só "cold" (0.8) → só "slow" ativo, resultado = pico 2.0
        let out = system.evaluate(&temp(10.0)).unwrap();
        assert!((out["fan"] - 2.0).abs() < 1e-12);
        // independente da ativação
        let out = system.evaluate(&temp(40.0)).unwrap();
        assert!((out["fan"] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn weighted_average_of_active_terms() {
        let system = fan_system();
        // temp 75 → hot 0.5 × peso 0.5 = 0.25 → só "fast" → 8.0
        let inference = system.evaluate_detailed(&temp(75.0)).unwrap();
        assert!((inference.outputs["fan"] - 8.0).abs() < 1e-12);
        assert_eq!(inference.firing_strengths, vec![0.0, 0.25]);

        // temp 50 → cold 0, hot 0 → midpoint
        let out = system.evaluate(&temp(50.0)).unwrap();
        assert_eq!(out["fan"], 5.0);
    }

    #[test]
    fn no_rule_fires_defaults_to_midpoint() {
        let mut q = FuzzyVariable::new("q", 0.0, 500.0).unwrap();
        q.add_term(FuzzySet::new("optimal", Shape::Triangular, &[0.0, 0.0, 150.0]).unwrap())
            .unwrap();
        let mut x = FuzzyVariable::new("x", 0.0, 1.0).unwrap();
        x.add_term(FuzzySet::new("high", Shape::Triangular, &[0.5, 1.0, 1.0]).unwrap())
            .unwrap();
        let mut system = FuzzySystem::new();
        system.add_input(x).unwrap().add_output(q).unwrap();
        system
            .add_rule(FuzzyRule::when("x", "high").then("q", "optimal").build().unwrap())
            .unwrap();
        let out = system
            .evaluate(&HashMap::from([("x".to_string(), 0.1)]))
            .unwrap();
        assert_eq!(out["q"], 250.0);
    }

    #[test]
    fn unreferenced_terms_have_zero_activation() {
        let inference = fan_system().evaluate_detailed(&temp(10.0)).unwrap();
        let fan = &inference.activations["fan"];
        let idle = fan.iter().find(|t| t.term == "idle").unwrap();
        assert_eq!(idle.activation, 0.0);
        assert_eq!(fan.len(), 3);
    }

    #[test]
    fn aggregation_takes_the_max_per_term() {
        let mut system = fan_system();
        system
            .add_rule(
                FuzzyRule::when("temp", "cold")
                    .then("fan", "slow")
                    .weight(0.3)
                    .build()
                    .unwrap(),
            )
            .unwrap();
        let inference = system.evaluate_detailed(&temp(0.0)).unwrap();
        let slow = inference.activations["fan"]
            .iter()
            .find(|t| t.term == "slow")
            .unwrap();
        assert_eq!(slow.activation, 1.0);
    }

    #[test]
    fn missing_input_surfaces() {
        let err = fan_system().evaluate(&HashMap::new()).unwrap_err();
        assert_eq!(err, FuzzyError::MissingInput("temp".into()));
    }

    #[test]
    fn non_finite_input_is_rejected() {
        let err = fan_system().evaluate(&temp(f64::NAN)).unwrap_err();
        assert!(matches!(err, FuzzyError::NonFiniteInput { .. }));
    }

    #[test]
    fn out_of_domain_input_is_clamped() {
        let system = fan_system();
        let clamped = system.evaluate(&temp(-40.0)).unwrap();
        let edge = system.evaluate(&temp(0.0)).unwrap();
        assert_eq!(clamped, edge);
    }

    #[test]
    fn extra_inputs_are_ignored() {
        let mut inputs = temp(10.0);
        inputs.insert("humidity".into(), 80.0);
        assert!(fan_system().evaluate(&inputs).is_ok());
    }

    #[test]
    fn mutation_after_ready_is_refused() {
        let mut system = fan_system();
        assert_eq!(system.state(), SystemState::Configuring);
        system.evaluate(&temp(20.0)).unwrap();
        assert_eq!(system.state(), SystemState::Ready);

        let rule = FuzzyRule::when("temp", "hot").then("fan", "fast").build().unwrap();
        assert_eq!(
            system.add_rule(rule).unwrap_err(),
            FuzzyError::InvalidState("add_rule")
        );
        let extra = FuzzyVariable::new("extra", 0.0, 1.0).unwrap();
        assert!(matches!(
            system.add_input(extra),
            Err(FuzzyError::InvalidState(_))
        ));
        let extra_output = FuzzyVariable::new("noise", 0.0, 1.0).unwrap();
        assert!(matches!(
            system.add_output(extra_output),
            Err(FuzzyError::InvalidState(_))
        ));
        assert_eq!(system.rules().len(), 2);
        assert_eq!(system.inputs().len(), 1);
        assert_eq!(system.outputs().len(), 1);
    }

    #[test]
    fn finish_configuration_requires_outputs_with_terms() {
        let system = FuzzySystem::new();
        assert!(matches!(
            system.finish_configuration(),
            Err(FuzzyError::Configuration(_))
        ));
        assert_eq!(system.state(), SystemState::Configuring);

        let mut system = FuzzySystem::new();
        system
            .add_output(FuzzyVariable::new("q", 0.0, 1.0).unwrap())
            .unwrap();
        assert!(system.evaluate(&HashMap::new()).is_err());
        assert_eq!(system.state(), SystemState::Configuring);
    }

    #[test]
    fn duplicate_variable_names_are_rejected() {
        let mut system = fan_system();
        let again = FuzzyVariable::new("temp", 0.0, 1.0).unwrap();
        assert!(matches!(
            system.add_output(again),
            Err(FuzzyError::Configuration(_))
        ));
    }

    #[test]
    fn rule_with_unknown_consequent_is_rejected() {
        let mut system = fan_system();
        let rule = FuzzyRule::when("temp", "hot").then("fan", "turbo").build().unwrap();
        assert!(matches!(
            system.add_rule(rule),
            Err(FuzzyError::Configuration(_))
        ));
        let rule = FuzzyRule::when("temp", "hot").then("pump", "fast").build().unwrap();
        assert!(system.add_rule(rule).is_err());
    }

    #[test]
    fn rule_with_unknown_antecedent_only_zeroes_itself() {
        let mut system = fan_system();
        system
            .add_rule(FuzzyRule::when("pressure", "high").then("fan", "idle").build().unwrap())
            .unwrap();
        let inference = system.evaluate_detailed(&temp(10.0)).unwrap();
        assert_eq!(inference.firing_strengths[2], 0.0);
        assert!((inference.outputs["fan"] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn ready_system_is_shared_across_threads() {
        let system = Arc::new(fan_system());
        system.finish_configuration().unwrap();
        let expected = system.evaluate(&temp(30.0)).unwrap();
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let system = Arc::clone(&system);
                std::thread::spawn(move || system.evaluate(&temp(30.0)).unwrap())
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    }
}
