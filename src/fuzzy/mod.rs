//! # Módulo Fuzzy — Motor de Inferência Difusa (Mamdani)
//!
//! Núcleo algorítmico da aplicação. Converte leituras crisp em um valor
//! crisp de saída passando por graus de pertinência:
//!
//! | Etapa | Tipo | Resultado |
//! |-------|------|-----------|
//! | Fuzzificação | [`FuzzyVariable`] | grau por termo |
//! | Avaliação de regras | [`FuzzyRule`] | força de disparo por regra |
//! | Agregação | [`FuzzySystem`] | ativação por termo de saída (MAX) |
//! | Defuzzificação | [`FuzzySystem`] | média ponderada dos representativos |
//!
//! Nenhuma etapa faz I/O; a avaliação é síncrona e limitada pelo número de
//! termos e regras (varreduras lineares, sem recursão).

pub mod error;
pub mod membership;
pub mod rule;
pub mod set;
pub mod system;
pub mod variable;

pub use error::FuzzyError;
pub use membership::{CurvePoint, MembershipFunction, Shape};
pub use rule::{Clause, Connective, FuzzifiedInputs, FuzzyRule, RuleBuilder};
pub use set::FuzzySet;
pub use system::{FuzzySystem, Inference, SystemState, TermActivation};
pub use variable::{FuzzyVariable, Memberships};
