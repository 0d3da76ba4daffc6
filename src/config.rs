use crate::i18n::Language;
use anyhow::{bail, Context, Result};
use std::path::PathBuf;

pub const DEFAULT_OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_REQUESTS_PER_MINUTE: u32 = 4000;

#[derive(Debug, Clone)]
pub struct Config {
    // OpenAI
    pub openai_api_key: String,
    pub openai_model: String,
    pub openai_api_url: String,

    // Layout
    pub languages_dir: PathBuf,
    pub source_language: Language,
    pub target_languages: Vec<Language>,

    // Pacing
    pub requests_per_minute: u32,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let source_language = match std::env::var("SOURCE_LANGUAGE") {
            Ok(name) => Language::from_dir_name(name.trim()).context("Invalid SOURCE_LANGUAGE")?,
            Err(_) => Language::source(),
        };

        let target_languages = match std::env::var("TARGET_LANGUAGES") {
            Ok(list) => parse_language_list(&list).context("Invalid TARGET_LANGUAGES")?,
            Err(_) => Language::all_except(source_language),
        };

        if target_languages.contains(&source_language) {
            bail!(
                "TARGET_LANGUAGES must not contain the source language ({})",
                source_language
            );
        }

        let requests_per_minute = match std::env::var("REQUESTS_PER_MINUTE") {
            Ok(v) => v
                .trim()
                .parse::<u32>()
                .with_context(|| format!("Invalid REQUESTS_PER_MINUTE: '{}'", v))?,
            Err(_) => DEFAULT_REQUESTS_PER_MINUTE,
        };
        if requests_per_minute == 0 {
            bail!("REQUESTS_PER_MINUTE must be greater than zero");
        }

        Ok(Self {
            // OpenAI
            openai_api_key: std::env::var("OPENAI_API_KEY").context("OPENAI_API_KEY not set")?,
            openai_model: std::env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o".to_string()),
            openai_api_url: std::env::var("OPENAI_API_URL")
                .unwrap_or_else(|_| DEFAULT_OPENAI_API_URL.to_string()),

            // Layout
            languages_dir: std::env::var("LANGUAGES_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("Languages")),
            source_language,
            target_languages,

            requests_per_minute,
        })
    }
}

/// Parse a comma-separated list of language directory names.
///
/// Blank items are ignored and duplicates collapse to their first occurrence.
fn parse_language_list(list: &str) -> Result<Vec<Language>> {
    let mut languages = Vec::new();
    for name in list.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let language = Language::from_dir_name(name)?;
        if !languages.contains(&language) {
            languages.push(language);
        }
    }

    if languages.is_empty() {
        bail!("no languages listed");
    }
    Ok(languages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: &[&str] = &[
        "OPENAI_API_KEY",
        "OPENAI_MODEL",
        "OPENAI_API_URL",
        "LANGUAGES_DIR",
        "SOURCE_LANGUAGE",
        "TARGET_LANGUAGES",
        "REQUESTS_PER_MINUTE",
    ];

    fn clear_env() {
        for var in VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        clear_env();
        std::env::set_var("OPENAI_API_KEY", "sk-test");

        let config = Config::from_env().expect("Should load");
        assert_eq!(config.openai_api_key, "sk-test");
        assert_eq!(config.openai_model, "gpt-4o");
        assert_eq!(config.openai_api_url, DEFAULT_OPENAI_API_URL);
        assert_eq!(config.languages_dir, PathBuf::from("Languages"));
        assert_eq!(config.source_language, Language::source());
        assert_eq!(
            config.target_languages,
            Language::all_except(Language::source())
        );
        assert_eq!(config.requests_per_minute, 4000);

        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_missing_api_key() {
        clear_env();

        let err = Config::from_env().unwrap_err();
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }

    #[test]
    #[serial]
    fn test_from_env_non_default_source_targets_everything_else() {
        clear_env();
        std::env::set_var("OPENAI_API_KEY", "sk-test");
        std::env::set_var("SOURCE_LANGUAGE", "French");

        let config = Config::from_env().expect("Should load");
        let french = Language::from_dir_name("French").unwrap();
        assert_eq!(config.source_language, french);
        assert_eq!(config.target_languages.len(), 26);
        assert!(config.target_languages.contains(&Language::source()));
        assert!(!config.target_languages.contains(&french));

        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_custom_targets() {
        clear_env();
        std::env::set_var("OPENAI_API_KEY", "sk-test");
        std::env::set_var("TARGET_LANGUAGES", "French, German,,French");

        let config = Config::from_env().expect("Should load");
        let names: Vec<_> = config.target_languages.iter().map(|l| l.dir_name()).collect();
        assert_eq!(names, vec!["French", "German"]);

        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_unknown_target() {
        clear_env();
        std::env::set_var("OPENAI_API_KEY", "sk-test");
        std::env::set_var("TARGET_LANGUAGES", "French,Pirate");

        let err = Config::from_env().unwrap_err();
        assert!(format!("{:#}", err).contains("Pirate"));

        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_rejects_source_as_target() {
        clear_env();
        std::env::set_var("OPENAI_API_KEY", "sk-test");
        std::env::set_var("TARGET_LANGUAGES", "English,French");

        assert!(Config::from_env().is_err());

        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_zero_rate_rejected() {
        clear_env();
        std::env::set_var("OPENAI_API_KEY", "sk-test");
        std::env::set_var("REQUESTS_PER_MINUTE", "0");

        let err = Config::from_env().unwrap_err();
        assert!(err.to_string().contains("greater than zero"));

        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_unparseable_rate_rejected() {
        clear_env();
        std::env::set_var("OPENAI_API_KEY", "sk-test");
        std::env::set_var("REQUESTS_PER_MINUTE", "fast");

        assert!(Config::from_env().is_err());

        clear_env();
    }

    #[test]
    fn test_parse_language_list_empty() {
        assert!(parse_language_list(" , ,").is_err());
    }
}
