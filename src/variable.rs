use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

use crate::config::{UniverseConfig, VariableConfig};
use crate::error::{FuzzyError, Result};
use crate::linspace::Linspace;
use crate::math::interp;
use crate::membership::MembershipFunction;

new_key_type! {
    /// A variable key
    pub struct VariableKey;
}

/// Upper bound on the number of points a sampled universe may hold.
pub const MAX_SAMPLES: usize = 1_000_000;

/// Evenly spaced sample points over a closed interval.
#[derive(Clone, Debug)]
pub struct Universe {
    points: Vec<f64>,
}

impl Universe {
    pub fn new(variable: &str, lo: f64, hi: f64, step: f64) -> Result<Self> {
        let invalid = |reason: String| FuzzyError::InvalidUniverse {
            variable: variable.to_owned(),
            reason,
        };

        if !(lo.is_finite() && hi.is_finite() && step.is_finite()) {
            return Err(invalid(format!("non-finite bounds [{lo}, {hi}] step {step}")));
        }
        if lo >= hi {
            return Err(invalid(format!("lower bound {lo} is not below upper bound {hi}")));
        }
        if step <= 0. || step > hi - lo {
            return Err(invalid(format!("step {step} does not fit in [{lo}, {hi}]")));
        }

        // floor is closest approx to what numpy does when counting arange samples. The epsilon
        // absorbs representation error such as 0.7 / 0.1 == 6.999999999999999
        let count = ((hi - lo) / step + 1e-9).floor() + 1.;

        if !count.is_finite() || count > MAX_SAMPLES as f64 {
            return Err(invalid(format!(
                "step {step} over [{lo}, {hi}] needs more than {MAX_SAMPLES} samples"
            )));
        }

        let num = count as usize;
        let last = lo + step * (num - 1) as f64;
        let points = Linspace::new(lo, last, num).collect();

        Ok(Self { points })
    }

    pub fn points(&self) -> &[f64] {
        &self.points
    }

    pub fn lo(&self) -> f64 {
        self.points[0]
    }

    pub fn hi(&self) -> f64 {
        self.points[self.points.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn clamp(&self, x: f64) -> f64 {
        x.clamp(self.lo(), self.hi())
    }
}

/// Index of a term within its variable, in declaration order.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct TermIndex(pub(crate) usize);

pub(crate) struct Term {
    pub(crate) name: String,
    pub(crate) membership: MembershipFunction,
    /// `membership` evaluated at every universe point
    pub(crate) samples: Vec<f64>,
}

/// A named variable over a discretized universe with an ordered set of terms.
pub struct FuzzyVariable {
    name: String,
    universe: Universe,
    terms: Vec<Term>,
}

impl FuzzyVariable {
    pub fn new(name: impl Into<String>, universe: Universe) -> Self {
        Self {
            name: name.into(),
            universe,
            terms: Vec::new(),
        }
    }

    pub(crate) fn from_config(config: &VariableConfig) -> Result<Self> {
        let UniverseConfig { lo, hi, step } = config.universe;
        let universe = Universe::new(&config.name, lo, hi, step)?;
        let mut var = Self::new(config.name.clone(), universe);

        for term in &config.terms {
            var.add_term(term.name.clone(), term.membership)?;
        }

        Ok(var)
    }

    pub fn add_term(&mut self, name: impl Into<String>, membership: MembershipFunction) -> Result<TermIndex> {
        let name = name.into();

        membership.validate(&name)?;

        if self.terms.iter().any(|t| t.name == name) {
            return Err(FuzzyError::DuplicateTerm {
                variable: self.name.clone(),
                term: name,
            });
        }

        let samples = self.universe.points().iter().map(|u| membership.degree(*u)).collect();

        self.terms.push(Term {
            name,
            membership,
            samples,
        });

        Ok(TermIndex(self.terms.len() - 1))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn universe(&self) -> &Universe {
        &self.universe
    }

    pub fn term_names(&self) -> impl Iterator<Item = &str> {
        self.terms.iter().map(|t| t.name.as_str())
    }

    pub fn term_index(&self, term: &str) -> Result<TermIndex> {
        self.terms
            .iter()
            .position(|t| t.name == term)
            .map(TermIndex)
            .ok_or_else(|| FuzzyError::UnknownTerm {
                variable: self.name.clone(),
                term: term.to_owned(),
            })
    }

    pub(crate) fn term(&self, index: TermIndex) -> &Term {
        &self.terms[index.0]
    }

    /// Closed-form degree of `x` in `term`.
    pub fn membership_at(&self, term: &str, x: f64) -> Result<f64> {
        let index = self.term_index(term)?;

        Ok(self.term(index).membership.degree(x))
    }

    /// Degree of `x` in `term`, linearly interpolated between the two universe
    /// samples bracketing `x`. Outside the universe the nearest edge sample wins.
    pub fn interpolated_membership(&self, term: &str, x: f64) -> Result<f64> {
        let index = self.term_index(term)?;

        Ok(interp(x, self.universe.points(), &self.term(index).samples))
    }

    /// Closed-form degree of `x` in every term, in declaration order.
    pub(crate) fn fuzzify(&self, x: f64) -> Vec<f64> {
        self.terms.iter().map(|t| t.membership.degree(x)).collect()
    }

    pub fn degrees(&self, x: f64) -> Degrees {
        Degrees(
            self.terms
                .iter()
                .map(|t| (t.name.clone(), t.membership.degree(x)))
                .collect(),
        )
    }

    pub fn interpolated_degrees(&self, x: f64) -> Degrees {
        Degrees(
            self.terms
                .iter()
                .map(|t| (t.name.clone(), interp(x, self.universe.points(), &t.samples)))
                .collect(),
        )
    }
}

/// Ordered mapping from term name to membership degree.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Degrees(pub(crate) Vec<(String, f64)>);

impl Degrees {
    pub fn get(&self, term: &str) -> Option<f64> {
        self.0.iter().find(|(name, _)| name == term).map(|(_, degree)| *degree)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(name, degree)| (name.as_str(), *degree))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Term with the highest degree; the earliest declared wins ties.
    pub fn dominant(&self) -> Option<(&str, f64)> {
        self.iter()
            .fold(None, |best: Option<(&str, f64)>, (name, degree)| match best {
                Some((_, top)) if top >= degree => best,
                _ => Some((name, degree)),
            })
    }

    /// Terms sorted by descending degree, stable on ties.
    pub fn ranked(&self) -> Vec<(&str, f64)> {
        let mut ranked: Vec<_> = self.iter().collect();

        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked
    }

    /// Replaces every degree with one for `term` and zero elsewhere.
    pub fn one_hot(&mut self, term: &str) {
        for (name, degree) in &mut self.0 {
            *degree = if name == term { 1. } else { 0. };
        }
    }
}

impl FromIterator<(String, f64)> for Degrees {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Degrees(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::dsl::Premise;
    use crate::inference::InferenceEngine;

    fn bmi() -> FuzzyVariable {
        let mut var = FuzzyVariable::new("imc", Universe::new("imc", 12., 50., 0.1).unwrap());

        var.add_term("normal", MembershipFunction::gaussian(22., 2.)).unwrap();
        var.add_term("sobrepeso", MembershipFunction::gaussian(27., 2.2)).unwrap();
        var
    }

    #[test]
    fn test_universe_sampling() {
        let age = Universe::new("edad", 0., 100., 1.).unwrap();
        let risk = Universe::new("riesgo", 0., 10.9, 0.1).unwrap();
        let bmi = Universe::new("imc", 12., 50., 0.1).unwrap();

        assert_eq!(age.len(), 101);
        assert_eq!(age.hi(), 100.);
        assert_eq!(risk.len(), 110);
        assert!((risk.hi() - 10.9).abs() < 1e-9);
        assert_eq!(bmi.len(), 381);
        assert!(bmi.points().windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_universe_step_that_does_not_divide_range() {
        let u = Universe::new("x", 0., 1., 0.3).unwrap();

        assert_eq!(u.len(), 4);
        assert!((u.hi() - 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_universe() {
        assert!(matches!(
            Universe::new("x", 5., 5., 0.1),
            Err(FuzzyError::InvalidUniverse { .. })
        ));
        assert!(Universe::new("x", 0., 1., 0.).is_err());
        assert!(Universe::new("x", 0., 1., 2.).is_err());
        assert!(Universe::new("x", 0., f64::INFINITY, 1.).is_err());
    }

    #[test]
    fn test_universe_sample_limit() {
        assert!(matches!(
            Universe::new("x", 0., 1e20, 1.),
            Err(FuzzyError::InvalidUniverse { .. })
        ));
        assert!(matches!(
            Universe::new("x", 0., f64::MAX, f64::MIN_POSITIVE),
            Err(FuzzyError::InvalidUniverse { .. })
        ));
        assert!(Universe::new("x", 0., (MAX_SAMPLES - 1) as f64, 1.).is_ok());
        assert!(Universe::new("x", 0., MAX_SAMPLES as f64, 1.).is_err());

        let consequent = VariableConfig::new("y", 0., 1., 0.1).term("a", MembershipFunction::triangle(0., 0.5, 1.));
        let config = EngineConfig::new(consequent, "x")
            .antecedent(VariableConfig::new("x", 0., 1e20, 1.).term("a", MembershipFunction::triangle(0., 1., 2.)))
            .rule(Premise::is("x", "a"), "a");

        assert!(matches!(
            InferenceEngine::new(&config),
            Err(FuzzyError::InvalidUniverse { .. })
        ));
    }

    #[test]
    fn test_duplicate_and_unknown_terms() {
        let mut var = bmi();

        assert!(matches!(
            var.add_term("normal", MembershipFunction::gaussian(1., 1.)),
            Err(FuzzyError::DuplicateTerm { .. })
        ));
        assert!(matches!(
            var.membership_at("obesidad1", 30.),
            Err(FuzzyError::UnknownTerm { .. })
        ));
    }

    #[test]
    fn test_nan_membership_does_not_panic() {
        let var = bmi();

        assert!(var.membership_at("normal", f64::NAN).unwrap().is_nan());
        assert!(var.interpolated_membership("normal", f64::NAN).unwrap().is_nan());
        assert!(var.interpolated_degrees(f64::NAN).iter().all(|(_, d)| d.is_nan()));
    }

    #[test]
    fn test_interpolated_tracks_closed_form() {
        let var = bmi();

        for x in [15.03, 22., 24.977, 29.98, 41.41] {
            let exact = var.membership_at("normal", x).unwrap();
            let interpolated = var.interpolated_membership("normal", x).unwrap();

            assert!((exact - interpolated).abs() < 1e-2, "{x}: {exact} vs {interpolated}");
        }
    }

    #[test]
    fn test_interpolated_clamps_to_edges() {
        let var = bmi();
        let edge = var.membership_at("sobrepeso", var.universe().hi()).unwrap();

        assert_eq!(var.interpolated_membership("sobrepeso", 80.).unwrap(), edge);
        // closed form keeps decaying past the universe
        assert!(var.membership_at("sobrepeso", 80.).unwrap() < edge);
    }

    #[test]
    fn test_degrees_order_and_ranking() {
        let var = bmi();
        let degrees = var.degrees(26.);
        let names: Vec<_> = degrees.iter().map(|(n, _)| n).collect();

        assert_eq!(names, ["normal", "sobrepeso"]);
        assert_eq!(degrees.dominant().map(|(n, _)| n), Some("sobrepeso"));
        assert_eq!(degrees.ranked()[1].0, "normal");

        let mut degrees = degrees;
        degrees.one_hot("normal");

        assert_eq!(degrees.get("normal"), Some(1.));
        assert_eq!(degrees.get("sobrepeso"), Some(0.));
    }
}
