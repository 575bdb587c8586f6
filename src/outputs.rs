use serde::Serialize;

use crate::variable::Degrees;

/// Firing strength of one rule during an evaluation.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RuleFiring {
    pub consequence: String,
    pub strength: f64,
}

/// Result of one [`InferenceEngine::evaluate`](crate::InferenceEngine::evaluate) call.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Evaluation {
    pub(crate) crisp_output: f64,
    pub(crate) antecedent_degrees: Degrees,
    pub(crate) consequent_degrees: Degrees,
    pub(crate) fuzzified: Vec<(String, Degrees)>,
    pub(crate) firings: Vec<RuleFiring>,
}

impl Evaluation {
    /// Defuzzified value of the consequent.
    pub fn crisp_output(&self) -> f64 {
        self.crisp_output
    }

    /// Interpolated degrees of the report variable's input in each of its terms.
    pub fn antecedent_degrees(&self) -> &Degrees {
        &self.antecedent_degrees
    }

    /// Interpolated degrees of the crisp output in each consequent term.
    pub fn consequent_degrees(&self) -> &Degrees {
        &self.consequent_degrees
    }

    /// Closed-form degrees every antecedent was fuzzified to, in declaration order.
    pub fn fuzzified(&self) -> &[(String, Degrees)] {
        &self.fuzzified
    }

    pub fn firings(&self) -> &[RuleFiring] {
        &self.firings
    }
}
