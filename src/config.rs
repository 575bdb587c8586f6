//! Data-only engine configuration.
//!
//! An [`EngineConfig`] is the persisted artifact for one engine: universe
//! bounds, term shapes and the ordered rule list. Nothing derived from it
//! (sampled membership vectors, resolved keys) is stored, so a JSON round trip
//! reproduces the table exactly.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::dsl::Premise;
use crate::error::Result;
use crate::membership::MembershipFunction;
use crate::ops::{AndOp, DefuzzificationOp, ImplicationOp, OrOp, ProductionLink};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct UniverseConfig {
    pub lo: f64,
    pub hi: f64,
    pub step: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TermConfig {
    pub name: String,
    pub membership: MembershipFunction,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VariableConfig {
    pub name: String,
    pub universe: UniverseConfig,
    pub terms: Vec<TermConfig>,
}

impl VariableConfig {
    pub fn new(name: impl Into<String>, lo: f64, hi: f64, step: f64) -> Self {
        Self {
            name: name.into(),
            universe: UniverseConfig { lo, hi, step },
            terms: Vec::new(),
        }
    }

    pub fn term(mut self, name: impl Into<String>, membership: MembershipFunction) -> Self {
        self.terms.push(TermConfig {
            name: name.into(),
            membership,
        });
        self
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RuleConfig {
    pub premise: Premise,
    /// Term of the consequent variable
    pub consequence: String,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Operators {
    pub and: AndOp,
    pub or: OrOp,
    pub implication: ImplicationOp,
    pub aggregation: ProductionLink,
    pub defuzzification: DefuzzificationOp,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub antecedents: Vec<VariableConfig>,
    pub consequent: VariableConfig,
    pub rules: Vec<RuleConfig>,
    /// Antecedent whose input is reported term by term next to the output
    pub report_variable: String,
    #[serde(default)]
    pub operators: Operators,
    /// Clamp each input to its universe before fuzzification
    #[serde(default)]
    pub clip_inputs: bool,
}

impl EngineConfig {
    pub fn new(consequent: VariableConfig, report_variable: impl Into<String>) -> Self {
        Self {
            antecedents: Vec::new(),
            consequent,
            rules: Vec::new(),
            report_variable: report_variable.into(),
            operators: Operators::default(),
            clip_inputs: false,
        }
    }

    pub fn antecedent(mut self, variable: VariableConfig) -> Self {
        self.antecedents.push(variable);
        self
    }

    pub fn rule(mut self, premise: Premise, consequence: impl Into<String>) -> Self {
        self.rules.push(RuleConfig {
            premise,
            consequence: consequence.into(),
        });
        self
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let json = fs::read_to_string(path)?;

        Self::from_json_str(&json)
    }
}
