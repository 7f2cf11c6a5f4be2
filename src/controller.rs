//! # Controlador de Qualidade do Ar
//!
//! Configura o [`FuzzySystem`] específico do domínio — quatro gases de
//! entrada, um índice de qualidade do ar de saída e oito regras — para cada
//! uma das três famílias de função de pertinência, e transforma leituras
//! de sensores em um [`AirQualityReport`].
//!
//! ## Variáveis
//!
//! | Variável | Domínio (PPM) | Termos |
//! |----------|---------------|--------|
//! | `co2` | 900 – 1046 | low, medium, high |
//! | `h2` | 500 – 540 | low, medium, high |
//! | `co` | 490 – 520 | low, medium, high |
//! | `o2` | 4 – 8 | low, medium, high |
//! | `air_quality` (saída) | 0 – 500 | optimal, medium_good, regular, medium_harmful, harmful |
//!
//! ## Cache de Motores
//!
//! Os três sistemas são construídos uma única vez em
//! [`AirQualityController::new`], selados (`Ready`) e guardados em `Arc`.
//! Cada requisição apenas lê o motor da família escolhida.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::{Serialize, Serializer};

use crate::fuzzy::{
    FuzzifiedInputs, FuzzyError, FuzzyRule, FuzzySet, FuzzySystem, FuzzyVariable, Shape,
};

/// Nome da variável de saída.
pub const AIR_QUALITY: &str = "air_quality";

// ─── Famílias de função de pertinência ───────────────────────────

/// Família de curvas usada por todos os termos de um sistema.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub enum MembershipFamily {
    #[default]
    #[serde(rename = "triangular")]
    Triangular,
    #[serde(rename = "trapezoidal")]
    Trapezoidal,
    #[serde(rename = "gaussiano")]
    Gaussian,
}

impl MembershipFamily {
    pub const ALL: [MembershipFamily; 3] = [
        MembershipFamily::Triangular,
        MembershipFamily::Trapezoidal,
        MembershipFamily::Gaussian,
    ];

    /// Interpreta o seletor do formulário, sem diferenciar maiúsculas.
    /// Valores desconhecidos caem em `Triangular`.
    pub fn parse(selector: &str) -> Self {
        match selector.trim().to_ascii_lowercase().as_str() {
            "trapezoidal" => MembershipFamily::Trapezoidal,
            "gaussiano" | "gaussian" => MembershipFamily::Gaussian,
            _ => MembershipFamily::Triangular,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MembershipFamily::Triangular => "triangular",
            MembershipFamily::Trapezoidal => "trapezoidal",
            MembershipFamily::Gaussian => "gaussiano",
        }
    }

    fn shape(self) -> Shape {
        match self {
            MembershipFamily::Triangular => Shape::Triangular,
            MembershipFamily::Trapezoidal => Shape::Trapezoidal,
            MembershipFamily::Gaussian => Shape::Gaussian,
        }
    }

    fn slot(self) -> usize {
        match self {
            MembershipFamily::Triangular => 0,
            MembershipFamily::Trapezoidal => 1,
            MembershipFamily::Gaussian => 2,
        }
    }
}

impl fmt::Display for MembershipFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── Categorias ──────────────────────────────────────────────────

/// Classificação textual do índice (limiares fixos sobre [0, 500]).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Category {
    Optimal,
    MediumGood,
    Regular,
    MediumHarmful,
    Harmful,
}

impl Category {
    pub fn from_index(index: f64) -> Self {
        if index <= 100.0 {
            Category::Optimal
        } else if index <= 200.0 {
            Category::MediumGood
        } else if index <= 300.0 {
            Category::Regular
        } else if index <= 400.0 {
            Category::MediumHarmful
        } else {
            Category::Harmful
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::Optimal => "Optimal",
            Category::MediumGood => "Medium-good",
            Category::Regular => "Regular",
            Category::MediumHarmful => "Medium-harmful",
            Category::Harmful => "Harmful",
        }
    }

    /// Classe CSS usada pela barra de resultado.
    pub fn css_class(self) -> &'static str {
        match self {
            Category::Optimal => "quality-optimal",
            Category::MediumGood => "quality-good",
            Category::Regular => "quality-regular",
            Category::MediumHarmful => "quality-poor",
            Category::Harmful => "quality-harmful",
        }
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

// ─── Tabelas de parâmetros ───────────────────────────────────────

/// Parâmetros de um termo nas três famílias.
struct TermSpec {
    name: &'static str,
    triangular: &'static [f64],
    trapezoidal: &'static [f64],
    gaussian: &'static [f64],
}

impl TermSpec {
    fn params(&self, family: MembershipFamily) -> &'static [f64] {
        match family {
            MembershipFamily::Triangular => self.triangular,
            MembershipFamily::Trapezoidal => self.trapezoidal,
            MembershipFamily::Gaussian => self.gaussian,
        }
    }
}

struct VariableSpec {
    name: &'static str,
    min: f64,
    max: f64,
    terms: &'static [TermSpec],
}

impl VariableSpec {
    fn build(&self, family: MembershipFamily) -> Result<FuzzyVariable, FuzzyError> {
        let mut variable = FuzzyVariable::new(self.name, self.min, self.max)?;
        for term in self.terms {
            variable.add_term(FuzzySet::new(term.name, family.shape(), term.params(family))?)?;
        }
        Ok(variable)
    }
}

const INPUTS: &[VariableSpec] = &[
    VariableSpec {
        name: "co2",
        min: 900.0,
        max: 1046.0,
        terms: &[
            TermSpec {
                name: "low",
                triangular: &[900.0, 900.0, 950.0],
                trapezoidal: &[900.0, 900.0, 925.0, 950.0],
                gaussian: &[915.0, 15.0],
            },
            TermSpec {
                name: "medium",
                triangular: &[925.0, 975.0, 1025.0],
                trapezoidal: &[925.0, 950.0, 1000.0, 1025.0],
                gaussian: &[975.0, 20.0],
            },
            TermSpec {
                name: "high",
                triangular: &[1000.0, 1046.0, 1046.0],
                trapezoidal: &[1000.0, 1025.0, 1046.0, 1046.0],
                gaussian: &[1030.0, 15.0],
            },
        ],
    },
    VariableSpec {
        name: "h2",
        min: 500.0,
        max: 540.0,
        terms: &[
            TermSpec {
                name: "low",
                triangular: &[500.0, 500.0, 520.0],
                trapezoidal: &[500.0, 500.0, 510.0, 520.0],
                gaussian: &[505.0, 7.0],
            },
            TermSpec {
                name: "medium",
                triangular: &[510.0, 520.0, 530.0],
                trapezoidal: &[510.0, 515.0, 525.0, 530.0],
                gaussian: &[520.0, 7.0],
            },
            TermSpec {
                name: "high",
                triangular: &[525.0, 540.0, 540.0],
                trapezoidal: &[525.0, 530.0, 540.0, 540.0],
                gaussian: &[535.0, 7.0],
            },
        ],
    },
    VariableSpec {
        name: "co",
        min: 490.0,
        max: 520.0,
        terms: &[
            TermSpec {
                name: "low",
                triangular: &[490.0, 490.0, 505.0],
                trapezoidal: &[490.0, 490.0, 495.0, 505.0],
                gaussian: &[495.0, 5.0],
            },
            TermSpec {
                name: "medium",
                triangular: &[500.0, 505.0, 510.0],
                trapezoidal: &[495.0, 500.0, 505.0, 510.0],
                gaussian: &[505.0, 5.0],
            },
            TermSpec {
                name: "high",
                triangular: &[505.0, 520.0, 520.0],
                trapezoidal: &[505.0, 510.0, 520.0, 520.0],
                gaussian: &[515.0, 5.0],
            },
        ],
    },
    VariableSpec {
        name: "o2",
        min: 4.0,
        max: 8.0,
        terms: &[
            TermSpec {
                name: "low",
                triangular: &[4.0, 4.0, 5.5],
                trapezoidal: &[4.0, 4.0, 4.5, 5.5],
                gaussian: &[4.5, 0.5],
            },
            TermSpec {
                name: "medium",
                triangular: &[5.0, 6.0, 7.0],
                trapezoidal: &[5.0, 5.5, 6.5, 7.0],
                gaussian: &[6.0, 0.7],
            },
            TermSpec {
                name: "high",
                triangular: &[6.5, 8.0, 8.0],
                trapezoidal: &[6.5, 7.0, 8.0, 8.0],
                gaussian: &[7.5, 0.5],
            },
        ],
    },
];

const OUTPUT: VariableSpec = VariableSpec {
    name: AIR_QUALITY,
    min: 0.0,
    max: 500.0,
    terms: &[
        TermSpec {
            name: "harmful",
            triangular: &[400.0, 500.0, 500.0],
            trapezoidal: &[400.0, 450.0, 500.0, 500.0],
            gaussian: &[450.0, 40.0],
        },
        TermSpec {
            name: "medium_harmful",
            triangular: &[300.0, 400.0, 450.0],
            trapezoidal: &[300.0, 350.0, 400.0, 450.0],
            gaussian: &[375.0, 40.0],
        },
        TermSpec {
            name: "regular",
            triangular: &[200.0, 300.0, 400.0],
            trapezoidal: &[200.0, 250.0, 300.0, 350.0],
            gaussian: &[300.0, 40.0],
        },
        TermSpec {
            name: "medium_good",
            triangular: &[100.0, 200.0, 300.0],
            trapezoidal: &[100.0, 150.0, 200.0, 250.0],
            gaussian: &[175.0, 40.0],
        },
        TermSpec {
            name: "optimal",
            triangular: &[0.0, 0.0, 150.0],
            trapezoidal: &[0.0, 0.0, 100.0, 150.0],
            gaussian: &[75.0, 40.0],
        },
    ],
};

/// Base de regras, idêntica nas três famílias.
// As regras 3 e 4 usam `co2 medium AND co medium` e `co2 low AND o2 medium`.
// Com `co2 low AND co low → regular` e `co2 low AND o2 high → medium_good`
// a leitura ideal (900/500/490/8) dispara as duas com força 1 e o índice
// sobe para ~167 (Medium-good em vez de Optimal). Ver DESIGN.md.
fn rules() -> Result<Vec<FuzzyRule>, FuzzyError> {
    Ok(vec![
        FuzzyRule::when("co2", "high")
            .or("co", "high")
            .then(AIR_QUALITY, "harmful")
            .build()?,
        FuzzyRule::when("co2", "medium")
            .and("h2", "high")
            .then(AIR_QUALITY, "medium_harmful")
            .build()?,
        FuzzyRule::when("co2", "medium")
            .and("co", "medium")
            .then(AIR_QUALITY, "regular")
            .build()?,
        FuzzyRule::when("co2", "low")
            .and("o2", "medium")
            .then(AIR_QUALITY, "medium_good")
            .build()?,
        FuzzyRule::when("co2", "low")
            .and("co", "low")
            .and("o2", "high")
            .then(AIR_QUALITY, "optimal")
            .build()?,
        FuzzyRule::when("h2", "high")
            .and("co", "high")
            .then(AIR_QUALITY, "harmful")
            .weight(0.9)
            .build()?,
        FuzzyRule::when("o2", "low")
            .then(AIR_QUALITY, "medium_harmful")
            .weight(0.8)
            .build()?,
        FuzzyRule::when("co2", "medium")
            .and("o2", "medium")
            .then(AIR_QUALITY, "regular")
            .weight(0.7)
            .build()?,
    ])
}

/// Constrói e sela o sistema de qualidade do ar para uma família.
pub fn build_system(family: MembershipFamily) -> Result<FuzzySystem, FuzzyError> {
    let mut system = FuzzySystem::new();
    for spec in INPUTS {
        system.add_input(spec.build(family)?)?;
    }
    system.add_output(OUTPUT.build(family)?)?;
    for rule in rules()? {
        system.add_rule(rule)?;
    }
    system.finish_configuration()?;
    Ok(system)
}

// ─── Leituras e relatório ────────────────────────────────────────

/// Leitura crisp dos quatro sensores, em PPM.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Reading {
    pub co2: f64,
    pub h2: f64,
    pub co: f64,
    pub o2: f64,
}

impl Default for Reading {
    /// Posição inicial dos sliders.
    fn default() -> Self {
        Self {
            co2: 950.0,
            h2: 520.0,
            co: 500.0,
            o2: 6.0,
        }
    }
}

impl Reading {
    /// Valor de uma variável de entrada pelo nome.
    pub fn value(&self, variable: &str) -> Option<f64> {
        match variable {
            "co2" => Some(self.co2),
            "h2" => Some(self.h2),
            "co" => Some(self.co),
            "o2" => Some(self.o2),
            _ => None,
        }
    }

    fn to_inputs(self) -> HashMap<String, f64> {
        HashMap::from([
            ("co2".to_string(), self.co2),
            ("h2".to_string(), self.h2),
            ("co".to_string(), self.co),
            ("o2".to_string(), self.o2),
        ])
    }
}

/// Resultado entregue à camada web.
#[derive(Clone, Debug, Serialize)]
pub struct AirQualityReport {
    /// Índice arredondado, 0 – 500 (maior = pior).
    pub index: u32,
    /// Saída crisp do motor, sem arredondamento.
    pub raw_index: f64,
    /// `round(index / 500 × 100)`.
    pub percentage: u32,
    pub category: Category,
    pub family: MembershipFamily,
    /// Graus de todos os termos de entrada, para os gráficos.
    pub memberships: FuzzifiedInputs,
}

/// Dono dos três motores pré-configurados.
pub struct AirQualityController {
    engines: [Arc<FuzzySystem>; 3],
}

impl AirQualityController {
    /// Constrói os três sistemas. Qualquer erro de configuração é fatal.
    pub fn new() -> Result<Self, FuzzyError> {
        let engines = [
            Arc::new(build_system(MembershipFamily::Triangular)?),
            Arc::new(build_system(MembershipFamily::Trapezoidal)?),
            Arc::new(build_system(MembershipFamily::Gaussian)?),
        ];
        for family in MembershipFamily::ALL {
            let system = &engines[family.slot()];
            tracing::info!(
                family = %family,
                inputs = system.inputs().len(),
                rules = system.rules().len(),
                "motor difuso configurado"
            );
        }
        Ok(Self { engines })
    }

    pub fn engine(&self, family: MembershipFamily) -> &Arc<FuzzySystem> {
        &self.engines[family.slot()]
    }

    /// Avalia uma leitura com a família escolhida.
    ///
    /// Os valores são limitados ao domínio de cada variável antes da
    /// inferência (ruído de sensor não é rejeitado).
    pub fn evaluate(
        &self,
        family: MembershipFamily,
        reading: Reading,
    ) -> Result<AirQualityReport, FuzzyError> {
        let system = self.engine(family);
        let mut inputs = reading.to_inputs();
        for variable in system.inputs() {
            if let Some(value) = inputs.get_mut(variable.name()) {
                *value = variable.clamp(*value);
            }
        }

        let inference = system.evaluate_detailed(&inputs)?;
        let raw_index = inference
            .outputs
            .get(AIR_QUALITY)
            .copied()
            .ok_or_else(|| FuzzyError::config("sistema sem saída air_quality"))?;

        let index = raw_index.round().clamp(OUTPUT.min, OUTPUT.max) as u32;
        let percentage = (f64::from(index) / OUTPUT.max * 100.0).round() as u32;
        let category = Category::from_index(f64::from(index));

        tracing::debug!(
            family = %family,
            co2 = reading.co2,
            h2 = reading.h2,
            co = reading.co,
            o2 = reading.o2,
            index,
            category = category.label(),
            "índice de qualidade do ar calculado"
        );

        Ok(AirQualityReport {
            index,
            raw_index,
            percentage,
            category,
            family,
            memberships: inference.fuzzified,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fuzzy::SystemState;

    const BEST: Reading = Reading {
        co2: 900.0,
        h2: 500.0,
        co: 490.0,
        o2: 8.0,
    };

    const WORST: Reading = Reading {
        co2: 1046.0,
        h2: 540.0,
        co: 520.0,
        o2: 4.0,
    };

    fn controller() -> AirQualityController {
        AirQualityController::new().unwrap()
    }

    #[test]
    fn family_selector_is_case_insensitive_with_fallback() {
        assert_eq!(MembershipFamily::parse("Trapezoidal"), MembershipFamily::Trapezoidal);
        assert_eq!(MembershipFamily::parse("GAUSSIANO"), MembershipFamily::Gaussian);
        assert_eq!(MembershipFamily::parse("gaussian"), MembershipFamily::Gaussian);
        assert_eq!(MembershipFamily::parse("triangular"), MembershipFamily::Triangular);
        assert_eq!(MembershipFamily::parse("sigmoid"), MembershipFamily::Triangular);
        assert_eq!(MembershipFamily::parse(""), MembershipFamily::Triangular);
    }

    #[test]
    fn category_thresholds() {
        assert_eq!(Category::from_index(0.0), Category::Optimal);
        assert_eq!(Category::from_index(100.0), Category::Optimal);
        assert_eq!(Category::from_index(101.0), Category::MediumGood);
        assert_eq!(Category::from_index(200.0), Category::MediumGood);
        assert_eq!(Category::from_index(300.0), Category::Regular);
        assert_eq!(Category::from_index(400.0), Category::MediumHarmful);
        assert_eq!(Category::from_index(401.0), Category::Harmful);
        assert_eq!(Category::from_index(500.0), Category::Harmful);
    }

    #[test]
    fn every_engine_is_ready_and_complete() {
        let controller = controller();
        for family in MembershipFamily::ALL {
            let system = controller.engine(family);
            assert_eq!(system.state(), SystemState::Ready);
            assert_eq!(system.inputs().len(), 4);
            assert_eq!(system.outputs().len(), 1);
            assert_eq!(system.rules().len(), 8);
            assert_eq!(system.outputs()[0].terms().len(), 5);
        }
    }

    #[test]
    fn best_case_triangular_fires_optimal_rule() {
        let system = build_system(MembershipFamily::Triangular).unwrap();
        let inference = system
            .evaluate_detailed(&BEST.to_inputs())
            .unwrap();
        // regra 5: co2 low AND co low AND o2 high → optimal
        assert_eq!(inference.firing_strengths[4], 1.0);

        let report = controller()
            .evaluate(MembershipFamily::Triangular, BEST)
            .unwrap();
        assert!(report.raw_index <= 150.0, "índice {}", report.raw_index);
        assert_eq!(report.category, Category::Optimal);
    }

    #[test]
    fn worst_case_triangular_fires_harmful_rule() {
        let system = build_system(MembershipFamily::Triangular).unwrap();
        let inference = system
            .evaluate_detailed(&WORST.to_inputs())
            .unwrap();
        // regra 1: co2 high OR co high → harmful
        assert!(inference.firing_strengths[0] >= 0.9);

        let report = controller()
            .evaluate(MembershipFamily::Triangular, WORST)
            .unwrap();
        assert!(report.raw_index > 400.0, "índice {}", report.raw_index);
        assert_eq!(report.category, Category::Harmful);
    }

    #[test]
    fn category_survives_family_switch_at_extremes() {
        let controller = controller();
        for family in MembershipFamily::ALL {
            let best = controller.evaluate(family, BEST).unwrap();
            assert_eq!(best.category, Category::Optimal, "{} → {}", family, best.raw_index);
            let worst = controller.evaluate(family, WORST).unwrap();
            assert_eq!(worst.category, Category::Harmful, "{} → {}", family, worst.raw_index);
        }
    }

    #[test]
    fn readings_are_clamped_before_inference() {
        let controller = controller();
        let noisy = Reading {
            co2: 2000.0,
            h2: 900.0,
            co: 800.0,
            o2: -1.0,
        };
        let clamped = controller.evaluate(MembershipFamily::Triangular, noisy).unwrap();
        let edge = controller.evaluate(MembershipFamily::Triangular, WORST).unwrap();
        assert_eq!(clamped.raw_index, edge.raw_index);
    }

    #[test]
    fn non_finite_reading_is_an_error() {
        let reading = Reading {
            co2: f64::NAN,
            ..Reading::default()
        };
        let err = controller()
            .evaluate(MembershipFamily::Gaussian, reading)
            .unwrap_err();
        assert!(matches!(err, FuzzyError::NonFiniteInput { .. }));
    }

    #[test]
    fn report_derivations_are_consistent() {
        let controller = controller();
        for family in MembershipFamily::ALL {
            let report = controller.evaluate(family, Reading::default()).unwrap();
            assert_eq!(report.index, report.raw_index.round() as u32);
            let expected = (f64::from(report.index) / 500.0 * 100.0).round() as u32;
            assert_eq!(report.percentage, expected);
            assert_eq!(report.category, Category::from_index(f64::from(report.index)));
            assert_eq!(report.memberships.len(), 4);
            assert!(report.memberships.values().all(|terms| terms.len() == 3));
        }
    }

    #[test]
    fn report_serializes_labels() {
        let report = controller()
            .evaluate(MembershipFamily::Gaussian, BEST)
            .unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["category"], "Optimal");
        assert_eq!(json["family"], "gaussiano");
        assert!(json["memberships"]["co2"]["low"].is_number());
    }
}
