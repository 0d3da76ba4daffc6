//! Redo selected translations for one language.
//!
//! Usage:
//!   cargo run --bin redo -- French 0 2     # Re-translate entries 0 and 2 of every French keyed file
//!
//! Indices count entries in each target file's document order, starting at 0.
//! Selected entries that have no text yet are left alone.
//!
//! Required environment variables:
//! - OPENAI_API_KEY
//!
//! Optional: the same variables as the main binary (LANGUAGES_DIR, OPENAI_MODEL, ...)

use anyhow::{bail, Context, Result};
use keyed_translate::{config, driver, i18n::Language, translation::OpenAiTranslator};
use std::collections::BTreeSet;
use tracing::info;

/// Parse `<Language> <index>...` from the command line.
fn parse_args(args: &[String]) -> Result<(Language, BTreeSet<usize>)> {
    let Some((language, indices)) = args.split_first() else {
        bail!("Usage: redo <Language> <index> [<index>...]");
    };

    let language = Language::from_dir_name(language)?;
    if indices.is_empty() {
        bail!("At least one index is required");
    }

    let indices = indices
        .iter()
        .map(|i| {
            i.parse::<usize>()
                .with_context(|| format!("Invalid index: '{}'", i))
        })
        .collect::<Result<BTreeSet<_>>>()?;

    Ok((language, indices))
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("keyed_translate=info".parse()?)
                .add_directive("redo=info".parse()?),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (language, indices) = parse_args(&args)?;

    let config = config::Config::from_env()?;
    let translator = OpenAiTranslator::from_config(&config);
    let layout = driver::Layout::from_config(&config);

    let summary = driver::run_redo(&translator, &layout, language, &indices).await?;

    info!(
        "Redo for {} finished: {} files updated, {} failed, {} entries re-translated ({} fallbacks)",
        language, summary.tasks_completed, summary.tasks_failed, summary.translated, summary.fallbacks
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_args_valid() {
        let (language, indices) = parse_args(&args(&["French", "2", "0", "2"])).unwrap();
        assert_eq!(language.dir_name(), "French");
        assert_eq!(indices, BTreeSet::from([0, 2]));
    }

    #[test]
    fn test_parse_args_requires_language() {
        assert!(parse_args(&[]).is_err());
    }

    #[test]
    fn test_parse_args_requires_indices() {
        assert!(parse_args(&args(&["French"])).is_err());
    }

    #[test]
    fn test_parse_args_rejects_unknown_language() {
        assert!(parse_args(&args(&["fr", "0"])).is_err());
    }

    #[test]
    fn test_parse_args_rejects_negative_index() {
        let err = parse_args(&args(&["French", "-1"])).unwrap_err();
        assert!(err.to_string().contains("-1"));
    }
}
