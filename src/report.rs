//! Presentation policy layered on top of an [`Evaluation`].
//!
//! Nothing here feeds back into inference: it turns raw measurements into
//! engine inputs, and the engine's crisp output and degree snapshots into
//! categories and advice text.

use serde::Serialize;

use crate::error::{FuzzyError, Result};
use crate::profile::{Cohort, RiskProfile};
use crate::variable::Degrees;

/// Degrees at or below this are left out of the summary text. Gaussian terms
/// never reach zero, so a plain `> 0` filter would list every BMI term.
pub const DISPLAY_THRESHOLD: f64 = 0.005;

/// Only terms above this degree produce advice.
pub const RECOMMENDATION_THRESHOLD: f64 = 0.2;

pub const MAX_AGE: f64 = 120.;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReportOptions {
    pub display_threshold: f64,
    pub recommendation_threshold: f64,
    /// Snap the snapshots to a single term for the extreme category pairs
    pub extreme_overrides: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            display_threshold: DISPLAY_THRESHOLD,
            recommendation_threshold: RECOMMENDATION_THRESHOLD,
            extreme_overrides: true,
        }
    }
}

/// `weight / height²`, with height in meters.
pub fn body_mass_index(weight_kg: f64, height_m: f64) -> Result<f64> {
    if !(weight_kg.is_finite() && weight_kg > 0.) {
        return Err(FuzzyError::OutOfDomainInput {
            field: "weight",
            value: weight_kg,
        });
    }
    if !(height_m.is_finite() && height_m > 0.) {
        return Err(FuzzyError::OutOfDomainInput {
            field: "height",
            value: height_m,
        });
    }

    Ok(weight_kg / (height_m * height_m))
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, PartialOrd, Ord, Serialize)]
pub enum RiskCategory {
    VeryLow,
    Low,
    Medium,
    High,
    VeryHigh,
}

impl RiskCategory {
    pub fn from_score(score: f64) -> Self {
        match score {
            s if s < 3.5 => Self::VeryLow,
            s if s < 5.0 => Self::Low,
            s if s < 6.8 => Self::Medium,
            s if s < 8.6 => Self::High,
            _ => Self::VeryHigh,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::VeryLow => "Muy bajo",
            Self::Low => "Bajo",
            Self::Medium => "Medio",
            Self::High => "Alto",
            Self::VeryHigh => "Muy alto",
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, PartialOrd, Ord, Serialize)]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

impl BmiCategory {
    pub fn from_bmi(bmi: f64) -> Self {
        match bmi {
            b if b < 18.5 => Self::Underweight,
            b if b < 25. => Self::Normal,
            b if b < 30. => Self::Overweight,
            _ => Self::Obese,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Underweight => "Bajo peso",
            Self::Normal => "Normal",
            Self::Overweight => "Sobrepeso",
            Self::Obese => "Obesidad",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Assessment {
    pub bmi: f64,
    pub bmi_category: BmiCategory,
    pub risk_score: f64,
    pub risk_category: RiskCategory,
    pub bmi_degrees: Degrees,
    pub risk_degrees: Degrees,
    pub recommendations: String,
    pub summary: String,
}

/// Replaces the snapshots with a single certain term for the two extreme
/// category pairs. Returns whether an override applied.
///
/// The low-risk/underweight pair requires both conditions; a low risk score on
/// its own leaves the snapshots untouched.
pub fn apply_extreme_overrides(
    risk_category: &mut RiskCategory,
    bmi_category: BmiCategory,
    bmi_degrees: &mut Degrees,
    risk_degrees: &mut Degrees,
) -> bool {
    match (*risk_category, bmi_category) {
        (RiskCategory::VeryHigh, BmiCategory::Obese) => {
            bmi_degrees.one_hot("obesidad2");
            risk_degrees.one_hot("muy_alto");
            true
        },
        (RiskCategory::Low | RiskCategory::VeryLow, BmiCategory::Underweight) => {
            bmi_degrees.one_hot("bajo");
            risk_degrees.one_hot("alto");
            *risk_category = RiskCategory::High;
            true
        },
        _ => false,
    }
}

fn bmi_advice(term: &str) -> Option<&'static str> {
    match term {
        "bajo" => Some("Tienes tendencia a bajo peso, considera aumentar tu ingesta calórica."),
        "normal" => Some("Tu IMC está cerca de lo normal, mantén hábitos saludables."),
        "sobrepeso" => Some("Hay indicios de sobrepeso, mejora tu alimentación y actividad física."),
        "obesidad1" | "obesidad2" => Some("Presentas tendencia a obesidad, busca apoyo profesional."),
        _ => None,
    }
}

fn risk_advice(term: &str) -> Option<&'static str> {
    match term {
        "muy_bajo" | "bajo" => Some("Tu riesgo es bajo, sigue cuidando tu salud."),
        "medio" => Some("Riesgo medio, realiza chequeos periódicos."),
        "alto" | "muy_alto" => Some("Riesgo elevado, consulta a un médico."),
        _ => None,
    }
}

/// Advice for the two strongest terms of each snapshot above `threshold`.
pub fn recommendations(bmi_degrees: &Degrees, risk_degrees: &Degrees, threshold: f64) -> String {
    let mut advice: Vec<&str> = Vec::new();
    let sections: [(&Degrees, fn(&str) -> Option<&'static str>); 2] =
        [(bmi_degrees, bmi_advice), (risk_degrees, risk_advice)];

    for (degrees, advise) in sections {
        for (term, degree) in degrees.ranked().into_iter().take(2) {
            if degree <= threshold {
                continue;
            }
            if let Some(text) = advise(term) {
                if !advice.contains(&text) {
                    advice.push(text);
                }
            }
        }
    }

    advice.join(" ")
}

fn bmi_label(term: &str) -> &str {
    match term {
        "bajo" => "Bajo peso",
        "normal" => "Normal",
        "sobrepeso" => "Sobrepeso",
        "obesidad1" => "Obesidad tipo 1",
        "obesidad2" => "Obesidad tipo 2",
        other => other,
    }
}

fn risk_label(term: &str) -> &str {
    match term {
        "muy_bajo" => "Muy bajo",
        "bajo" => "Bajo",
        "medio" => "Medio",
        "alto" => "Alto",
        "muy_alto" => "Muy alto",
        other => other,
    }
}

/// Two-section listing of the terms above `threshold`, in declaration order.
pub fn summary(bmi_degrees: &Degrees, risk_degrees: &Degrees, threshold: f64) -> String {
    fn section(title: &str, degrees: &Degrees, label: fn(&str) -> &str, threshold: f64) -> String {
        let mut out = format!("{title}:");

        for (term, degree) in degrees.iter().filter(|(_, d)| *d > threshold) {
            out.push_str(&format!("\n- {}: {degree:.2}", label(term)));
        }

        out
    }

    format!(
        "{}\n{}",
        section("IMC Difuso", bmi_degrees, bmi_label, threshold),
        section("Riesgo Difuso", risk_degrees, risk_label, threshold)
    )
}

/// Full assessment for raw measurements: BMI, inference, categories, advice.
pub fn assess(
    profile: &RiskProfile,
    cohort: Cohort,
    age: f64,
    weight_kg: f64,
    height_m: f64,
    options: &ReportOptions,
) -> Result<Assessment> {
    if !(0. ..=MAX_AGE).contains(&age) {
        return Err(FuzzyError::OutOfDomainInput { field: "age", value: age });
    }

    let bmi = body_mass_index(weight_kg, height_m)?;
    let evaluation = profile.evaluate(cohort, age, bmi)?;
    let risk_score = evaluation.crisp_output();
    let bmi_category = BmiCategory::from_bmi(bmi);
    let mut risk_category = RiskCategory::from_score(risk_score);
    let mut bmi_degrees = evaluation.antecedent_degrees().clone();
    let mut risk_degrees = evaluation.consequent_degrees().clone();

    if options.extreme_overrides {
        apply_extreme_overrides(&mut risk_category, bmi_category, &mut bmi_degrees, &mut risk_degrees);
    }

    let recommendations = recommendations(&bmi_degrees, &risk_degrees, options.recommendation_threshold);
    let summary = summary(&bmi_degrees, &risk_degrees, options.display_threshold);

    Ok(Assessment {
        bmi,
        bmi_category,
        risk_score,
        risk_category,
        bmi_degrees,
        risk_degrees,
        recommendations,
        summary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn degrees(pairs: &[(&str, f64)]) -> Degrees {
        pairs.iter().map(|(t, d)| (t.to_string(), *d)).collect()
    }

    #[test]
    fn test_body_mass_index() {
        let bmi = body_mass_index(95., 1.78).unwrap();

        assert!((bmi - 29.9836).abs() < 1e-4);
        assert!(matches!(
            body_mass_index(70., 0.),
            Err(FuzzyError::OutOfDomainInput { field: "height", .. })
        ));
        assert!(body_mass_index(-1., 1.7).is_err());
        assert!(body_mass_index(f64::NAN, 1.7).is_err());
    }

    #[test]
    fn test_category_boundaries() {
        assert_eq!(RiskCategory::from_score(3.49), RiskCategory::VeryLow);
        assert_eq!(RiskCategory::from_score(3.5), RiskCategory::Low);
        assert_eq!(RiskCategory::from_score(6.8), RiskCategory::High);
        assert_eq!(RiskCategory::from_score(8.6), RiskCategory::VeryHigh);
        assert_eq!(BmiCategory::from_bmi(18.4), BmiCategory::Underweight);
        assert_eq!(BmiCategory::from_bmi(25.), BmiCategory::Overweight);
        assert_eq!(BmiCategory::from_bmi(30.), BmiCategory::Obese);
        assert_eq!(BmiCategory::Overweight.label(), "Sobrepeso");
    }

    #[test]
    fn test_overrides_need_both_conditions() {
        let mut bmi = degrees(&[("bajo", 0.1), ("normal", 0.9)]);
        let mut risk = degrees(&[("bajo", 0.8), ("alto", 0.)]);
        let mut category = RiskCategory::Low;

        assert!(!apply_extreme_overrides(&mut category, BmiCategory::Normal, &mut bmi, &mut risk));
        assert_eq!(category, RiskCategory::Low);
        assert_eq!(bmi.get("normal"), Some(0.9));

        assert!(apply_extreme_overrides(&mut category, BmiCategory::Underweight, &mut bmi, &mut risk));
        assert_eq!(category, RiskCategory::High);
        assert_eq!(bmi.get("bajo"), Some(1.));
        assert_eq!(risk.get("alto"), Some(1.));
        assert_eq!(risk.get("bajo"), Some(0.));
    }

    #[test]
    fn test_recommendations_dedupe_and_threshold() {
        let bmi = degrees(&[("bajo", 0.), ("obesidad1", 0.6), ("obesidad2", 0.5)]);
        let risk = degrees(&[("medio", 0.15), ("alto", 0.7)]);

        assert_eq!(
            recommendations(&bmi, &risk, RECOMMENDATION_THRESHOLD),
            "Presentas tendencia a obesidad, busca apoyo profesional. Riesgo elevado, consulta a un médico."
        );
    }

    #[test]
    fn test_summary_hides_near_zero_terms() {
        let bmi = degrees(&[("bajo", 0.001), ("normal", 0.33), ("sobrepeso", 0.655)]);
        let risk = degrees(&[("bajo", 0.043), ("medio", 0.335)]);

        assert_eq!(
            summary(&bmi, &risk, DISPLAY_THRESHOLD),
            "IMC Difuso:\n- Normal: 0.33\n- Sobrepeso: 0.66\nRiesgo Difuso:\n- Bajo: 0.04\n- Medio: 0.34"
        );
    }

    #[test]
    fn test_assess_rejects_out_of_domain_age() {
        let profile = RiskProfile::builtin().unwrap();

        assert!(matches!(
            assess(&profile, Cohort::Male, 121., 80., 1.8, &ReportOptions::default()),
            Err(FuzzyError::OutOfDomainInput { field: "age", .. })
        ));
    }
}
