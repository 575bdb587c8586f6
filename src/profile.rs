//! Cohort-specific calibrations of the health-risk engine.
//!
//! Both cohorts share the same three variables (`edad`, `imc`, `riesgo`) and
//! the same engine; only membership parameters and rule content differ.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::{EngineConfig, VariableConfig};
use crate::dsl::Premise;
use crate::error::Result;
use crate::inference::InferenceEngine;
use crate::inputs::Inputs;
use crate::membership::MembershipFunction;
use crate::outputs::Evaluation;

pub const AGE: &str = "edad";
pub const BMI: &str = "imc";
pub const RISK: &str = "riesgo";

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum Cohort {
    #[serde(rename = "femenino")]
    Female,
    #[serde(rename = "masculino")]
    Male,
}

impl Cohort {
    pub fn as_str(self) -> &'static str {
        match self {
            Cohort::Female => "femenino",
            Cohort::Male => "masculino",
        }
    }

    /// Built-in calibration table for this cohort.
    pub fn default_config(self) -> EngineConfig {
        match self {
            Cohort::Female => female_config(),
            Cohort::Male => male_config(),
        }
    }
}

impl fmt::Display for Cohort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Cohort {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "femenino" => Ok(Cohort::Female),
            "masculino" => Ok(Cohort::Male),
            other => Err(format!("unknown cohort '{other}', expected 'femenino' or 'masculino'")),
        }
    }
}

fn age_variable(adult: &str) -> VariableConfig {
    VariableConfig::new(AGE, 0., 100., 1.)
        .term("joven", MembershipFunction::trapezoid(0., 0., 20., 30.))
        .term(adult, MembershipFunction::trapezoid(25., 35., 50., 60.))
        .term("mayor", MembershipFunction::trapezoid(55., 65., 100., 100.))
}

fn bmi_variable(params: [(f64, f64); 5]) -> VariableConfig {
    let names = ["bajo", "normal", "sobrepeso", "obesidad1", "obesidad2"];

    names
        .into_iter()
        .zip(params)
        .fold(VariableConfig::new(BMI, 12., 50., 0.1), |var, (name, (mean, sigma))| {
            var.term(name, MembershipFunction::gaussian(mean, sigma))
        })
}

fn risk_variable(params: [(f64, f64, f64); 5]) -> VariableConfig {
    let names = ["muy_bajo", "bajo", "medio", "alto", "muy_alto"];

    // The universe runs past 10 to 10.9 in 0.1 steps; no term reaches beyond 10
    names
        .into_iter()
        .zip(params)
        .fold(VariableConfig::new(RISK, 0., 10.9, 0.1), |var, (name, (a, b, c))| {
            var.term(name, MembershipFunction::triangle(a, b, c))
        })
}

fn bmi(term: &str) -> Premise {
    Premise::is(BMI, term)
}

fn age(term: &str) -> Premise {
    Premise::is(AGE, term)
}

/// Cohort A, the female calibration.
pub fn female_config() -> EngineConfig {
    EngineConfig::new(
        risk_variable([
            (0.0, 0.0, 2.5),
            (2.0, 3.5, 5.0),
            (4.5, 5.8, 7.2),
            (6.8, 8.0, 9.0),
            (8.5, 10.0, 10.0),
        ]),
        BMI,
    )
    .antecedent(age_variable("adulta"))
    .antecedent(bmi_variable([
        (17.5, 1.8),
        (22.0, 2.0),
        (27.0, 2.2),
        (32.0, 2.5),
        (38.5, 3.0),
    ]))
    .rule(bmi("normal").and(age("joven").or(age("adulta"))), "bajo")
    .rule(bmi("bajo").and(age("mayor")), "medio")
    .rule(bmi("sobrepeso").and(age("adulta")), "medio")
    .rule(bmi("sobrepeso").and(age("mayor")), "alto")
    .rule(bmi("obesidad1").and(age("adulta").or(age("mayor"))), "alto")
    .rule(bmi("obesidad2"), "muy_alto")
    .rule(bmi("normal").and(age("mayor")), "medio")
}

/// Cohort B, the male calibration. BMI thresholds sit slightly higher and overweight escalates faster.
pub fn male_config() -> EngineConfig {
    EngineConfig::new(
        risk_variable([
            (0.0, 0.0, 2.0),
            (1.8, 3.2, 4.8),
            (4.4, 5.8, 7.0),
            (6.6, 8.0, 9.2),
            (8.6, 10.0, 10.0),
        ]),
        BMI,
    )
    .antecedent(age_variable("adulto"))
    .antecedent(bmi_variable([
        (18.0, 1.9),
        (23.0, 2.1),
        (28.0, 2.2),
        (33.0, 2.6),
        (39.0, 3.2),
    ]))
    .rule(bmi("normal").and(age("joven").or(age("adulto"))), "bajo")
    .rule(bmi("bajo").and(age("mayor")), "medio")
    .rule(bmi("sobrepeso").and(age("adulto").or(age("mayor"))), "alto")
    .rule(bmi("obesidad1"), "muy_alto")
    .rule(bmi("obesidad2"), "muy_alto")
    .rule(bmi("normal").and(age("mayor")), "medio")
}

/// One fully built engine per cohort.
pub struct RiskProfile {
    female: InferenceEngine,
    male: InferenceEngine,
}

impl RiskProfile {
    pub fn new(female: &EngineConfig, male: &EngineConfig) -> Result<Self> {
        let profile = Self {
            female: InferenceEngine::new(female)?,
            male: InferenceEngine::new(male)?,
        };

        info!("risk profile ready");

        Ok(profile)
    }

    /// Profile with the built-in calibration tables.
    pub fn builtin() -> Result<Self> {
        Self::new(&female_config(), &male_config())
    }

    pub fn engine(&self, cohort: Cohort) -> &InferenceEngine {
        match cohort {
            Cohort::Female => &self.female,
            Cohort::Male => &self.male,
        }
    }

    pub fn evaluate(&self, cohort: Cohort, age: f64, bmi: f64) -> Result<Evaluation> {
        let mut inputs = Inputs::new();

        inputs.add(AGE, age).add(BMI, bmi);

        self.engine(cohort).evaluate(&inputs)
    }
}
