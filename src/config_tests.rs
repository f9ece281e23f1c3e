//! Unit tests for configuration structures and parsing.

#[cfg(test)]
mod config_tests {
    use std::collections::HashMap;
    use std::path::Path;

    use crate::config::*;
    use crate::error::ConfigError;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn load(vars: &HashMap<String, String>, require_telegram: bool) -> Result<AppConfig, ConfigError> {
        AppConfig::from_lookup(Settings::default(), |key| vars.get(key).cloned(), require_telegram)
    }

    fn full_env() -> HashMap<String, String> {
        env(&[
            ("SERPER_API_KEY", "serper-secret"),
            ("TELEGRAM_BOT_TOKEN", "123:bot-secret"),
            ("TELEGRAM_CHAT_ID", "-1001234"),
            ("OPENAI_API_KEY", "sk-openai"),
        ])
    }

    // ============= Settings Tests =============

    #[test]
    fn test_settings_default() {
        let settings = Settings::default();

        assert_eq!(settings.search.query, "gold silver price news Fed interest rate");
        assert_eq!(settings.search.num_results, 10);
        assert_eq!(settings.search.lookback_hours, 24);
        assert_eq!(settings.search.timeout_secs, 15);
        assert_eq!(settings.analysis.max_articles, 8);
        assert_eq!(settings.report.title, "Gold-Silver Intelligence Report");
        assert_eq!(settings.report.max_citations, 5);
        assert_eq!(settings.telegram.parse_mode, "HTML");
        assert_eq!(settings.telegram.timeout_secs, 10);
        assert!(settings.schedule.is_none());
    }

    #[test]
    fn test_settings_partial_yaml_keeps_defaults() {
        let yaml = r#"
search:
  query: "silver price news"
  lookback_hours: 12
report:
  max_citations: 3
schedule: "0 0 8 * * *"
"#;
        let settings = Settings::from_yaml(yaml, "test.yaml").unwrap();

        assert_eq!(settings.search.query, "silver price news");
        assert_eq!(settings.search.lookback_hours, 12);
        // Untouched keys fall back
        assert_eq!(settings.search.num_results, 10);
        assert_eq!(settings.analysis.max_articles, 8);
        assert_eq!(settings.report.max_citations, 3);
        assert_eq!(settings.report.title, "Gold-Silver Intelligence Report");
        assert_eq!(settings.schedule.as_deref(), Some("0 0 8 * * *"));
    }

    #[test]
    fn test_settings_bom_and_empty_content() {
        let with_bom = "\u{feff}analysis:\n  max_articles: 4\n";
        assert_eq!(Settings::from_yaml(with_bom, "bom.yaml").unwrap().analysis.max_articles, 4);

        assert_eq!(Settings::from_yaml("", "empty.yaml").unwrap(), Settings::default());
        assert_eq!(Settings::from_yaml("  \n\n", "blank.yaml").unwrap(), Settings::default());
    }

    #[test]
    fn test_settings_invalid_values() {
        let cases = [
            ("search:\n  num_results: 0\n", "search.num_results"),
            ("search:\n  lookback_hours: 0\n", "search.lookback_hours"),
            ("search:\n  query: \"  \"\n", "search.query"),
            ("analysis:\n  max_articles: 0\n", "analysis.max_articles"),
        ];

        for (yaml, expected_key) in cases {
            match Settings::from_yaml(yaml, "bad.yaml") {
                Err(ConfigError::Invalid { key, .. }) => assert_eq!(key, expected_key),
                other => panic!("expected Invalid for {expected_key}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_settings_malformed_yaml() {
        let err = Settings::from_yaml("search: [unclosed", "broken.yaml").unwrap_err();

        assert!(matches!(err, ConfigError::Yaml { ref path, .. } if path == "broken.yaml"));
    }

    #[test]
    fn test_example_config_matches_defaults() {
        let settings = Settings::from_yaml(include_str!("../config.example.yaml"), "config.example.yaml").unwrap();

        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_settings_missing_default_file_uses_defaults() {
        // Tests run from the crate root, which ships only config.example.yaml
        assert_eq!(Settings::load(Path::new("config.yaml")).unwrap(), Settings::default());
    }

    #[test]
    fn test_settings_missing_explicit_file_is_an_error() {
        let path = Path::new("/nonexistent/gold-silver-intel/custom.yaml");

        match Settings::load(path) {
            Err(ConfigError::Io { path, source }) => {
                assert!(path.ends_with("custom.yaml"));
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("expected Io error, got {other:?}"),
        }
    }

    // ============= Credential Tests =============

    #[test]
    fn test_full_environment() {
        let config = load(&full_env(), true).unwrap();

        assert_eq!(config.serper.api_key, "serper-secret");
        assert_eq!(config.serper.base_url, "https://google.serper.dev");

        let telegram = config.telegram().unwrap();
        assert_eq!(telegram.chat_id, "-1001234");
        assert_eq!(telegram.api_base, "https://api.telegram.org");

        assert_eq!(config.llm.provider, "OPENAI_API_KEY");
        assert_eq!(config.llm.model, "gpt-4o-mini");
        assert!(config.llm.base_url.is_none());
    }

    #[test]
    fn test_missing_serper_key() {
        let mut vars = full_env();
        vars.remove("SERPER_API_KEY");

        let err = load(&vars, false).unwrap_err();

        assert!(matches!(err, ConfigError::MissingVar("SERPER_API_KEY")));
    }

    #[test]
    fn test_blank_value_counts_as_missing() {
        let mut vars = full_env();
        vars.insert("SERPER_API_KEY".to_string(), "   ".to_string());

        assert!(matches!(
            load(&vars, false).unwrap_err(),
            ConfigError::MissingVar("SERPER_API_KEY")
        ));
    }

    #[test]
    fn test_telegram_required() {
        let mut no_token = full_env();
        no_token.remove("TELEGRAM_BOT_TOKEN");
        assert!(matches!(
            load(&no_token, true).unwrap_err(),
            ConfigError::MissingVar("TELEGRAM_BOT_TOKEN")
        ));

        let mut no_chat = full_env();
        no_chat.remove("TELEGRAM_CHAT_ID");
        assert!(matches!(
            load(&no_chat, true).unwrap_err(),
            ConfigError::MissingVar("TELEGRAM_CHAT_ID")
        ));
    }

    #[test]
    fn test_telegram_optional_when_delivery_disabled() {
        let mut vars = full_env();
        vars.remove("TELEGRAM_BOT_TOKEN");
        vars.remove("TELEGRAM_CHAT_ID");

        let config = load(&vars, false).unwrap();

        assert!(config.telegram.is_none());
        assert!(matches!(
            config.telegram().unwrap_err(),
            ConfigError::MissingVar("TELEGRAM_BOT_TOKEN")
        ));
    }

    #[test]
    fn test_base_url_overrides() {
        let mut vars = full_env();
        vars.insert("SERPER_BASE_URL".to_string(), "http://127.0.0.1:9000".to_string());
        vars.insert("TELEGRAM_API_BASE".to_string(), "http://127.0.0.1:9001".to_string());

        let config = load(&vars, true).unwrap();

        assert_eq!(config.serper.base_url, "http://127.0.0.1:9000");
        assert_eq!(config.telegram().unwrap().api_base, "http://127.0.0.1:9001");
    }

    // ============= LLM Provider Tests =============

    #[test]
    fn test_no_llm_provider() {
        let mut vars = full_env();
        vars.remove("OPENAI_API_KEY");

        let err = load(&vars, true).unwrap_err();

        assert!(matches!(err, ConfigError::NoLlmProvider(_)));
        assert!(err.to_string().contains("GEMINI_API_KEY"));
    }

    #[test]
    fn test_provider_precedence() {
        let mut vars = full_env();
        vars.insert("GEMINI_API_KEY".to_string(), "gemini-key".to_string());
        let config = load(&vars, true).unwrap();
        assert_eq!(config.llm.provider, "GEMINI_API_KEY");
        assert_eq!(config.llm.model, "gemini-2.0-flash");
        assert!(config.llm.base_url.as_deref().unwrap().contains("generativelanguage"));

        vars.insert("GLM_API_KEY".to_string(), "glm-key".to_string());
        let config = load(&vars, true).unwrap();
        assert_eq!(config.llm.provider, "GLM_API_KEY");
        assert_eq!(config.llm.model, "glm-4-flash");

        vars.insert("LLM_API_KEY".to_string(), "generic-key".to_string());
        vars.insert("LLM_BASE_URL".to_string(), "http://localhost:11434/v1".to_string());
        let config = load(&vars, true).unwrap();
        assert_eq!(config.llm.provider, "LLM_API_KEY");
        assert_eq!(config.llm.api_key, "generic-key");
        assert_eq!(config.llm.base_url.as_deref(), Some("http://localhost:11434/v1"));
    }

    #[test]
    fn test_llm_model_override() {
        let mut vars = full_env();
        vars.insert("LLM_MODEL".to_string(), "gpt-4o".to_string());

        assert_eq!(load(&vars, true).unwrap().llm.model, "gpt-4o");
    }

    // ============= CheckedConfig Tests =============

    #[test]
    fn test_checked_config_resolves_each_credential_independently() {
        let vars = env(&[("TELEGRAM_BOT_TOKEN", "123:bot-secret"), ("TELEGRAM_CHAT_ID", "-1001234")]);

        let checked = CheckedConfig::from_lookup(Settings::default(), |key| vars.get(key).cloned());

        assert!(matches!(checked.serper, Err(ConfigError::MissingVar("SERPER_API_KEY"))));
        assert_eq!(checked.telegram.as_ref().unwrap().chat_id, "-1001234");
        assert!(matches!(checked.llm, Err(ConfigError::NoLlmProvider(_))));
    }

    #[test]
    fn test_checked_config_reports_missing_chat_id() {
        let mut vars = full_env();
        vars.remove("TELEGRAM_CHAT_ID");

        let checked = CheckedConfig::from_lookup(Settings::default(), |key| vars.get(key).cloned());

        assert!(checked.serper.is_ok());
        assert!(checked.llm.is_ok());
        assert!(matches!(checked.telegram, Err(ConfigError::MissingVar("TELEGRAM_CHAT_ID"))));
    }

    // ============= Debug Redaction =============

    #[test]
    fn test_debug_redacts_secrets() {
        let config = load(&full_env(), true).unwrap();
        let debug = format!("{:?}", config);

        assert!(debug.contains("AppConfig"));
        assert!(debug.contains("-1001234"));
        assert!(!debug.contains("serper-secret"));
        assert!(!debug.contains("123:bot-secret"));
        assert!(!debug.contains("sk-openai"));
    }
}
