use std::thread;

use fuzzy_health_risk::report::{assess, BmiCategory, ReportOptions, RiskCategory};
use fuzzy_health_risk::{
    female_config, male_config, Cohort, EngineConfig, FuzzyError, InferenceEngine, Inputs, RiskProfile, BMI,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn assert_close(actual: f64, expected: f64) {
    assert!((actual - expected).abs() < 1e-6, "expected {expected}, got {actual}");
}

#[test]
fn test_male_overweight_adult() {
    init_tracing();

    let profile = RiskProfile::builtin().unwrap();
    let bmi = 95. / (1.78 * 1.78);
    let eval = profile.evaluate(Cohort::Male, 50., bmi).unwrap();

    // sobrepeso & (adulto | mayor) -> alto dominates, obesidad1 -> muy_alto pulls right
    assert_close(eval.crisp_output(), 8.379708764041332);
    assert_eq!(RiskCategory::from_score(eval.crisp_output()), RiskCategory::High);

    let bmi_degrees = eval.antecedent_degrees();

    assert_eq!(bmi_degrees.dominant().map(|(t, _)| t), Some("sobrepeso"));
    assert_close(bmi_degrees.get("sobrepeso").unwrap(), 0.6659781000845556);
    assert_close(bmi_degrees.get("obesidad1").unwrap(), 0.5102027404140921);
    assert!(bmi_degrees.get("normal").unwrap() < 0.01);

    let risk_degrees = eval.consequent_degrees();

    assert_close(risk_degrees.get("alto").unwrap(), 0.6835760299655562);
    assert_eq!(risk_degrees.get("muy_alto"), Some(0.));
    assert_eq!(risk_degrees.get("bajo"), Some(0.));

    let strengths: Vec<_> = eval.firings().iter().map(|f| f.strength).collect();

    assert_eq!(eval.firings()[2].consequence, "alto");
    assert_close(strengths[2], 0.6659781000845556);
}

#[test]
fn test_female_normal_boundary_adult() {
    init_tracing();

    let profile = RiskProfile::builtin().unwrap();
    let bmi = 68. / (1.65 * 1.65);
    let eval = profile.evaluate(Cohort::Female, 45., bmi).unwrap();

    assert_close(eval.crisp_output(), 4.9356313581752005);

    let bmi_degrees = eval.antecedent_degrees();

    assert_close(bmi_degrees.get("normal").unwrap(), 0.3303568137406742);
    assert_close(bmi_degrees.get("sobrepeso").unwrap(), 0.6552167636455435);

    let risk_degrees = eval.consequent_degrees();
    let ranked = risk_degrees.ranked();

    assert_eq!(ranked[0].0, "medio");
    assert_eq!(ranked[1].0, "bajo");
    assert_close(risk_degrees.get("medio").unwrap(), 0.3351010447501543);
    assert_close(risk_degrees.get("bajo").unwrap(), 0.04291242788319967);
}

#[test]
fn test_cohorts_differ_only_by_calibration() {
    let profile = RiskProfile::builtin().unwrap();
    let female = profile.evaluate(Cohort::Female, 70., 17.).unwrap();
    let male = profile.evaluate(Cohort::Male, 25., 22.).unwrap();

    // bajo & mayor -> medio
    assert_close(female.crisp_output(), 5.833523715328686);
    // normal & (joven | adulto) -> bajo
    assert_close(male.crisp_output(), 3.278758273976528);
}

#[test]
fn test_repeated_evaluation_is_bit_identical() {
    let profile = RiskProfile::builtin().unwrap();
    let first = profile.evaluate(Cohort::Male, 33., 27.4).unwrap();

    for _ in 0..10 {
        assert_eq!(profile.evaluate(Cohort::Male, 33., 27.4).unwrap(), first);
    }
}

#[test]
fn test_concurrent_evaluation_shares_one_engine() {
    let profile = RiskProfile::builtin().unwrap();
    let expected = profile.evaluate(Cohort::Female, 60., 31.).unwrap();

    thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|_| s.spawn(|| profile.evaluate(Cohort::Female, 60., 31.).unwrap()))
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}

#[test]
fn test_empty_aggregate_far_outside_coverage() {
    let profile = RiskProfile::builtin().unwrap();

    // No age term covers -10, and every gaussian underflows at a BMI of 10000
    assert!(matches!(
        profile.evaluate(Cohort::Male, -10., 10_000.),
        Err(FuzzyError::EmptyAggregate { variable }) if variable == "riesgo"
    ));
}

#[test]
fn test_config_round_trip_rebuilds_identical_engine() {
    for (cohort, config) in [(Cohort::Female, female_config()), (Cohort::Male, male_config())] {
        let json = config.to_json_string().unwrap();
        let restored = EngineConfig::from_json_str(&json).unwrap();

        assert_eq!(restored, config);
        assert_eq!(restored, cohort.default_config());

        let original = InferenceEngine::new(&config).unwrap();
        let rebuilt = InferenceEngine::new(&restored).unwrap();
        let inputs: Inputs = [("edad", 41.), (BMI, 28.2)].into_iter().collect();

        assert_eq!(original.evaluate(&inputs).unwrap(), rebuilt.evaluate(&inputs).unwrap());
    }
}

#[test]
fn test_config_from_path() {
    let path = std::env::temp_dir().join(format!("fuzzy-health-risk-{}.json", std::process::id()));

    std::fs::write(&path, male_config().to_json_string().unwrap()).unwrap();

    let loaded = EngineConfig::from_path(&path);

    std::fs::remove_file(&path).unwrap();
    assert_eq!(loaded.unwrap(), male_config());
    assert!(matches!(
        EngineConfig::from_path(std::env::temp_dir().join("fuzzy-health-risk-missing.json")),
        Err(FuzzyError::Io(_))
    ));
}

#[test]
fn test_assessment_for_male_scenario() {
    let profile = RiskProfile::builtin().unwrap();
    let assessment = assess(&profile, Cohort::Male, 50., 95., 1.78, &ReportOptions::default()).unwrap();

    assert_eq!(assessment.bmi_category, BmiCategory::Overweight);
    assert_eq!(assessment.risk_category, RiskCategory::High);
    assert_eq!(
        assessment.recommendations,
        "Hay indicios de sobrepeso, mejora tu alimentación y actividad física. \
         Presentas tendencia a obesidad, busca apoyo profesional. \
         Riesgo elevado, consulta a un médico."
    );
    assert_eq!(
        assessment.summary,
        "IMC Difuso:\n- Sobrepeso: 0.67\n- Obesidad tipo 1: 0.51\n- Obesidad tipo 2: 0.02\n\
         Riesgo Difuso:\n- Alto: 0.68"
    );
}
