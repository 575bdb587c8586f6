use std::collections::HashMap;

use slotmap::{SecondaryMap, SlotMap};
use tracing::{debug, info, trace, warn};

use crate::config::{EngineConfig, Operators};
use crate::error::{FuzzyError, Result};
use crate::inputs::Inputs;
use crate::outputs::{Evaluation, RuleFiring};
use crate::rules::{Expr, Fuzzified, Rules};
use crate::variable::{FuzzyVariable, TermIndex, VariableKey};

/// A Mamdani inference system: antecedent variables, one consequent and the
/// rules linking them.
///
/// Built once from an [`EngineConfig`] and read-only afterwards, so a single
/// engine can be shared between threads and evaluated concurrently.
pub struct InferenceEngine {
    variables: SlotMap<VariableKey, FuzzyVariable>,
    antecedents: Vec<VariableKey>,
    by_name: HashMap<String, VariableKey>,
    consequent: FuzzyVariable,
    rules: Rules,
    report_variable: VariableKey,
    operators: Operators,
    clip_inputs: bool,
}

impl InferenceEngine {
    pub fn new(config: &EngineConfig) -> Result<Self> {
        let mut variables: SlotMap<VariableKey, FuzzyVariable> = SlotMap::with_key();
        let mut antecedents = Vec::with_capacity(config.antecedents.len());
        let mut by_name: HashMap<String, VariableKey> = HashMap::with_capacity(config.antecedents.len());

        for var_config in &config.antecedents {
            if by_name.contains_key(&var_config.name) || var_config.name == config.consequent.name {
                return Err(FuzzyError::DuplicateVariable {
                    variable: var_config.name.clone(),
                });
            }

            let key = variables.insert(FuzzyVariable::from_config(var_config)?);

            antecedents.push(key);
            by_name.insert(var_config.name.clone(), key);
        }

        let consequent = FuzzyVariable::from_config(&config.consequent)?;
        let report_variable = *by_name
            .get(&config.report_variable)
            .ok_or_else(|| FuzzyError::UnknownVariable {
                variable: config.report_variable.clone(),
            })?;

        if config.rules.is_empty() {
            return Err(FuzzyError::NoRules);
        }

        let lookup = |var: &str, term: &str| -> Result<(VariableKey, TermIndex)> {
            let key = *by_name.get(var).ok_or_else(|| FuzzyError::UnknownVariable {
                variable: var.to_owned(),
            })?;
            let term = variables[key].term_index(term)?;

            Ok((key, term))
        };
        let mut rules = Rules::with_capacity(config.rules.len());

        for rule in &config.rules {
            let premise = Expr::resolve(&rule.premise, &lookup)?;
            let consequence = consequent.term_index(&rule.consequence)?;

            rules.add(premise, consequence);
        }

        info!(
            antecedents = antecedents.len(),
            consequent = consequent.name(),
            rules = rules.len(),
            "built inference engine"
        );

        Ok(Self {
            variables,
            antecedents,
            by_name,
            consequent,
            rules,
            report_variable,
            operators: config.operators,
            clip_inputs: config.clip_inputs,
        })
    }

    pub fn variable(&self, name: &str) -> Option<&FuzzyVariable> {
        self.by_name.get(name).map(|key| &self.variables[*key])
    }

    pub fn antecedents(&self) -> impl Iterator<Item = &FuzzyVariable> {
        self.antecedents.iter().map(|key| &self.variables[*key])
    }

    pub fn consequent(&self) -> &FuzzyVariable {
        &self.consequent
    }

    pub fn report_variable(&self) -> &FuzzyVariable {
        &self.variables[self.report_variable]
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn operators(&self) -> Operators {
        self.operators
    }

    /// Closed-form degrees of every antecedent term, plus the crisp value each
    /// antecedent was fuzzified at (after clipping, when enabled).
    pub fn fuzzify(&self, inputs: &Inputs) -> Result<(Fuzzified, SecondaryMap<VariableKey, f64>)> {
        let mut fuzzified = SecondaryMap::with_capacity(self.antecedents.len());
        let mut crisp = SecondaryMap::with_capacity(self.antecedents.len());

        for key in &self.antecedents {
            let var = &self.variables[*key];
            let value = inputs.get(var.name()).ok_or_else(|| FuzzyError::MissingInput {
                variable: var.name().to_owned(),
            })?;

            if !value.is_finite() {
                return Err(FuzzyError::NonFiniteInput {
                    variable: var.name().to_owned(),
                    value,
                });
            }

            let value = if self.clip_inputs {
                let clipped = var.universe().clamp(value);

                if clipped != value {
                    warn!(variable = var.name(), value, clipped, "input clipped to universe");
                }

                clipped
            } else {
                value
            };

            fuzzified.insert(*key, var.fuzzify(value));
            crisp.insert(*key, value);
        }

        Ok((Fuzzified(fuzzified), crisp))
    }

    /// Firing strength of every rule, in declaration order.
    pub fn fire_strengths(&self, fuzzified: &Fuzzified) -> Vec<f64> {
        self.rules
            .iter()
            .map(|rule| rule.fire_strength(fuzzified, self.operators.and, self.operators.or))
            .collect()
    }

    /// Implicates every rule's consequence at its firing strength and folds the
    /// results into one membership vector over the consequent universe.
    pub fn aggregate(&self, strengths: &[f64]) -> Vec<f64> {
        let mut aggregated = vec![0.; self.consequent.universe().len()];

        for (rule, strength) in self.rules.iter().zip(strengths) {
            let samples = &self.consequent.term(rule.consequence()).samples;

            for (agg, membership) in aggregated.iter_mut().zip(samples) {
                let implicated = self.operators.implication.call(*strength, *membership);

                *agg = self.operators.aggregation.call(*agg, implicated);
            }
        }

        aggregated
    }

    pub fn defuzzify(&self, aggregated: &[f64]) -> Result<f64> {
        self.operators
            .defuzzification
            .call(self.consequent.universe().points(), aggregated)
            .ok_or_else(|| FuzzyError::EmptyAggregate {
                variable: self.consequent.name().to_owned(),
            })
    }

    /// Runs fuzzification, rule firing, aggregation and defuzzification, then
    /// snapshots the report variable and the consequent at their crisp values.
    pub fn evaluate(&self, inputs: &Inputs) -> Result<Evaluation> {
        let (fuzzified, crisp) = self.fuzzify(inputs)?;
        let strengths = self.fire_strengths(&fuzzified);

        for (i, (rule, strength)) in self.rules.iter().zip(&strengths).enumerate() {
            trace!(
                rule = i,
                consequence = self.consequent.term(rule.consequence()).name.as_str(),
                strength,
                "rule fired"
            );
        }

        let aggregated = self.aggregate(&strengths);
        let crisp_output = self.defuzzify(&aggregated)?;

        let report_var = self.report_variable();
        let report_input = crisp[self.report_variable];
        let antecedent_degrees = report_var.interpolated_degrees(report_input);
        let consequent_degrees = self.consequent.interpolated_degrees(crisp_output);

        debug!(
            report_variable = report_var.name(),
            report_input,
            crisp_output,
            "evaluated"
        );

        let fuzzified = self
            .antecedents
            .iter()
            .map(|key| {
                let var = &self.variables[*key];

                (var.name().to_owned(), var.degrees(crisp[*key]))
            })
            .collect();
        let firings = self
            .rules
            .iter()
            .zip(strengths)
            .map(|(rule, strength)| RuleFiring {
                consequence: self.consequent.term(rule.consequence()).name.clone(),
                strength,
            })
            .collect();

        Ok(Evaluation {
            crisp_output,
            antecedent_degrees,
            consequent_degrees,
            fuzzified,
            firings,
        })
    }
}
