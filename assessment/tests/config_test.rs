//! Engine configuration integration tests

use assessment::{
    run_session, AssessmentConfig, AssessmentEngine, AssessmentError, CenterBiasedRespondent,
    Stage,
};
use typology::{Center, ContentPools, HealthLevel, RankingAnswer};

#[test]
fn test_full_yaml_config() {
    let yaml = r#"
scoring:
  rank_weights: [1.0, 0.25, 0.0]
  forced_choice_penalty: 0.75
selection:
  candidate_types: 3
  questions_per_pair: 1
  focus_types: 1
  questions_per_focus_type: 3
instincts:
  max_rank: 3
health:
  neutral_rating: 3.0
  rating_half_range: 2.0
  healthy_threshold: 20.0
  unhealthy_threshold: -20.0
progress:
  scenarios: 0.4
  forced_choice: 0.3
  instincts: 0.2
  health: 0.1
"#;

    let config = AssessmentConfig::from_yaml(yaml).expect("valid config");
    assert_eq!(config.scoring.rank_weights, [1.0, 0.25, 0.0]);
    assert_eq!(config.selection.candidate_types, 3);
    assert_eq!(config.health.healthy_threshold, 20.0);
    assert_eq!(config.progress.scenarios, 0.4);
}

#[test]
fn test_empty_yaml_is_default() {
    let config = AssessmentConfig::from_yaml("{}").unwrap();
    assert_eq!(config, AssessmentConfig::default());
}

#[test]
fn test_invalid_yaml_is_rejected() {
    let err = AssessmentConfig::from_yaml("scoring: [not, a, map]").unwrap_err();
    assert!(matches!(err, AssessmentError::YamlError(_)));

    let err = AssessmentConfig::from_yaml("selection:\n  candidate_types: 12\n").unwrap_err();
    assert!(matches!(err, AssessmentError::ConfigError(_)));
}

#[test]
fn test_zero_selection_counts_are_rejected() {
    for field in [
        "candidate_types",
        "questions_per_pair",
        "focus_types",
        "questions_per_focus_type",
    ] {
        let yaml = format!("selection:\n  {}: 0\n", field);
        let err = AssessmentConfig::from_yaml(&yaml).unwrap_err();
        match err {
            AssessmentError::ConfigError(message) => {
                assert!(message.contains(field), "{message}")
            }
            other => panic!("expected ConfigError for {field}, got {other:?}"),
        }
    }
}

#[test]
fn test_negative_or_non_finite_progress_weights_are_rejected() {
    // Sums to 1.0 but one weight is negative
    let yaml = r#"
progress:
  scenarios: 1.3
  forced_choice: -0.6
  instincts: 0.2
  health: 0.1
"#;
    let err = AssessmentConfig::from_yaml(yaml).unwrap_err();
    assert!(matches!(err, AssessmentError::ConfigError(_)));

    let mut config = AssessmentConfig::default();
    config.progress.instincts = f64::NAN;
    assert!(matches!(config.validate(), Err(AssessmentError::ConfigError(_))));

    let mut config = AssessmentConfig::default();
    config.progress.health = f64::INFINITY;
    assert!(AssessmentEngine::with_config(config).is_err());
}

#[test]
fn test_engine_rejects_invalid_config() {
    let mut config = AssessmentConfig::default();
    config.selection.focus_types = 5;
    assert!(AssessmentEngine::with_config(config).is_err());
}

#[test]
fn test_rank_weights_change_scoring() {
    let mut config = AssessmentConfig::default();
    config.scoring.rank_weights = [2.0, 0.0, 0.0];
    let engine = AssessmentEngine::with_config(config).unwrap();

    let state = engine.start_session(&engine.create_initial_session());
    let question = state.scenario_questions[0].clone();
    let mut ranking = RankingAnswer::new();
    for (i, response) in question.responses.iter().enumerate() {
        ranking.insert(response.id.clone(), (i + 1) as u8);
    }

    let next = engine.answer_scenario(&state, &question.id, &ranking);
    let expected: f64 = question.responses[0].type_weights.values().sum::<f64>() * 2.0;
    assert!((next.type_scores.total() - expected).abs() < 1e-9);
}

#[test]
fn test_health_thresholds_from_config() {
    let mut config = AssessmentConfig::default();
    // Any positive score counts as healthy
    config.health.healthy_threshold = -1.0;
    config.health.unhealthy_threshold = -50.0;
    let engine = AssessmentEngine::with_config(config).unwrap();

    let report = run_session(&engine, &CenterBiasedRespondent::new(Center::Heart)).unwrap();
    // Neutral ratings score 0, which is above the lowered threshold
    assert_eq!(report.health.score, 0.0);
    assert_eq!(report.health.level, HealthLevel::Healthy);
}

#[test]
fn test_progress_weights_from_config() {
    let mut config = AssessmentConfig::default();
    config.progress.scenarios = 0.5;
    config.progress.forced_choice = 0.2;
    config.progress.instincts = 0.2;
    config.progress.health = 0.1;
    let engine = AssessmentEngine::with_config(config).unwrap();

    let mut state = engine.start_session(&engine.create_initial_session());
    for q in state.scenario_questions.clone() {
        state = engine.answer_scenario(&state, &q.id, &RankingAnswer::new());
    }
    assert_eq!(state.stage, Stage::ForcedChoice);
    assert!((engine.progress(&state).overall_progress - 0.5).abs() < 1e-9);
}

#[test]
fn test_custom_content_changes_fingerprint() {
    let standard = AssessmentEngine::new();
    let mut pools = ContentPools::standard();
    pools.scenarios.truncate(5);
    let trimmed = AssessmentEngine::with_content(AssessmentConfig::default(), pools).unwrap();

    assert_ne!(standard.content_version(), trimmed.content_version());
    assert_eq!(trimmed.create_initial_session().scenario_questions.len(), 5);
}
