//! Mamdani fuzzy inference for scoring health risk from age and body-mass-index.
//!
//! An [`InferenceEngine`] is built once from a data-only [`EngineConfig`] and
//! then evaluated per request:
//!
//! 1. every antecedent input is fuzzified against its terms (closed form)
//! 2. each rule fires at the min/max combination of its premise degrees
//! 3. the consequence term is clipped at that strength and all rules are
//!    aggregated by maximum over the sampled consequent universe
//! 4. the aggregate is defuzzified by its centroid
//!
//! [`RiskProfile`] holds one engine per [`Cohort`]; [`report`] turns raw
//! measurements and evaluations into categories and advice.
//!
//! ```
//! use fuzzy_health_risk::{Cohort, RiskProfile};
//!
//! let profile = RiskProfile::builtin()?;
//! let eval = profile.evaluate(Cohort::Male, 50., 29.98)?;
//!
//! assert!(eval.crisp_output() > 6.8 && eval.crisp_output() < 8.6);
//! # Ok::<(), fuzzy_health_risk::FuzzyError>(())
//! ```

mod config;
mod dsl;
mod error;
mod inference;
mod inputs;
mod linspace;
mod math;
mod membership;
mod ops;
mod outputs;
mod profile;
pub mod report;
mod rules;
mod variable;

pub use config::{EngineConfig, Operators, RuleConfig, TermConfig, UniverseConfig, VariableConfig};
pub use dsl::Premise;
pub use error::{FuzzyError, Result};
pub use inference::InferenceEngine;
pub use inputs::Inputs;
pub use membership::MembershipFunction;
pub use ops::{AndOp, DefuzzificationOp, ImplicationOp, OrOp, ProductionLink};
pub use outputs::{Evaluation, RuleFiring};
pub use profile::{female_config, male_config, Cohort, RiskProfile, AGE, BMI, RISK};
pub use rules::{Fuzzified, Rule, Rules};
pub use variable::{Degrees, FuzzyVariable, TermIndex, Universe, VariableKey, MAX_SAMPLES};
