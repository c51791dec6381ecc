use recall_core::config::*;

#[test]
fn config_loads_from_empty_toml_with_all_defaults() {
    let config = RecallConfig::from_toml("").unwrap();

    // Flags are all off by default
    assert_eq!(config.flags, FeatureFlags::default());
    assert!(!config.flags.novelty_boost);
    assert!(!config.flags.rsf_fusion);

    // Scoring defaults
    assert_eq!(config.scoring.model, ScoringModel::SixFactor);
    assert_eq!(config.scoring.interference_threshold, 0.75);
    assert_eq!(config.scoring.novelty_score_cap, 0.95);

    // Retrieval defaults
    assert_eq!(config.retrieval.rrf_k, 60);
    assert_eq!(config.retrieval.channel_quality_floor, 0.2);
    assert_eq!(config.retrieval.token_budget, 2000);
    assert_eq!(config.retrieval.truncation_min_results, 3);

    // Decay defaults
    assert_eq!(config.decay.hot_threshold, 0.80);
    assert_eq!(config.decay.archive_after_days, 90.0);
    assert_eq!(config.decay.state_limits.total(), 21);

    // Validation defaults
    assert_eq!(config.validation.promotion_confidence, 0.90);
    assert_eq!(config.validation.promotion_validations, 5);

    // Chunking defaults
    assert_eq!(config.chunking.trigger_chars, 50_000);
    assert_eq!(config.chunking.target_chars, 4_000);
    assert_eq!(config.chunking.max_chars, 12_000);
    assert_eq!(config.chunking.thinning_threshold, 0.3);

    // Maintenance defaults
    assert_eq!(config.maintenance.backoff_secs, vec![60, 300, 900]);
    assert_eq!(config.maintenance.max_retries, 3);
    assert_eq!(config.maintenance.archival_batch_size, 50);

    // Observability defaults
    assert_eq!(config.observability.log_level, "info");
}

#[test]
fn config_loads_partial_toml_with_overrides() {
    let toml = r#"
[flags]
novelty_boost = true
rsf_fusion = true

[chunking]
thinning_threshold = 0.5

[scoring]
model = "five_factor"
"#;
    let config = RecallConfig::from_toml(toml).unwrap();
    assert!(config.flags.novelty_boost);
    assert!(config.flags.rsf_fusion);
    // Non-overridden flags keep defaults
    assert!(!config.flags.interference_penalty);
    assert_eq!(config.chunking.thinning_threshold, 0.5);
    assert_eq!(config.chunking.target_chars, 4_000);
    assert_eq!(config.scoring.model, ScoringModel::FiveFactor);
}

#[test]
fn config_rejects_malformed_toml() {
    let err = RecallConfig::from_toml("flags = [").unwrap_err();
    assert!(matches!(err, recall_core::RecallError::ConfigError(_)));
}

#[test]
fn config_rejects_target_above_max() {
    let toml = r#"
[chunking]
target_chars = 20000
max_chars = 12000
"#;
    assert!(RecallConfig::from_toml(toml).is_err());
}

#[test]
fn config_rejects_out_of_range_thinning_threshold() {
    let toml = "[chunking]\nthinning_threshold = 1.5\n";
    assert!(RecallConfig::from_toml(toml).is_err());
}

#[test]
fn config_loads_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("recall.toml");
    std::fs::write(&path, "[retrieval]\nrrf_k = 30\n").unwrap();
    let config = RecallConfig::from_toml(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(config.retrieval.rrf_k, 30);
}

#[test]
fn config_load_missing_file_is_config_error() {
    let err = RecallConfig::load(Some(std::path::Path::new("/nonexistent/recall.toml")))
        .unwrap_err();
    assert!(matches!(err, recall_core::RecallError::ConfigError(_)));
}

#[test]
fn flag_overrides_apply_only_to_named_flags() {
    let flags = FeatureFlags::default().with_overrides(|var| match var {
        "RECALL_NOVELTY_BOOST" => Some("true".to_string()),
        "RECALL_RSF_FUSION" => Some("garbage".to_string()),
        _ => None,
    });
    assert!(flags.novelty_boost);
    assert!(!flags.rsf_fusion, "unparseable values keep the current setting");
    assert!(!flags.interference_penalty);
}

#[test]
fn flag_overrides_can_disable() {
    let flags = FeatureFlags::all().with_overrides(|var| {
        (var == "RECALL_CONFIDENCE_TRUNCATION").then(|| "0".to_string())
    });
    assert!(!flags.confidence_truncation);
    assert!(flags.novelty_boost);
    assert!(flags.channel_min_representation);
}

#[test]
fn config_roundtrips_through_toml() {
    let mut config = RecallConfig::default();
    config.flags.score_normalization = true;
    config.retrieval.top_k = 25;
    let serialized = toml::to_string(&config).unwrap();
    let parsed = RecallConfig::from_toml(&serialized).unwrap();
    assert!(parsed.flags.score_normalization);
    assert_eq!(parsed.retrieval.top_k, 25);
}
