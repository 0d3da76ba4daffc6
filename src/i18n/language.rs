//! Language type: a validated handle into the registry.

use crate::i18n::{LanguageConfig, LanguageRegistry};
use anyhow::{bail, Result};
use std::fmt;

/// A validated language.
///
/// Only languages present in the registry can be constructed, so the
/// accessors below never miss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Language {
    /// Directory name under `Languages/` (e.g., "French")
    dir_name: &'static str,
}

impl Language {
    /// Create a Language from its directory name (e.g., "PortugueseBrazilian").
    pub fn from_dir_name(dir_name: &str) -> Result<Language> {
        match LanguageRegistry::get().get_by_dir_name(dir_name) {
            Some(config) => Ok(Language {
                dir_name: config.dir_name,
            }),
            None => bail!("Unknown language: '{}'", dir_name),
        }
    }

    /// The default source language all keyed files are translated from.
    pub fn source() -> Language {
        Language {
            dir_name: LanguageRegistry::get().source().dir_name,
        }
    }

    /// Every registered language other than `source`, in registry order.
    ///
    /// This is the default target list for a run translating from `source`.
    pub fn all_except(source: Language) -> Vec<Language> {
        LanguageRegistry::get()
            .list_all()
            .into_iter()
            .filter(|config| config.dir_name != source.dir_name)
            .map(|config| Language {
                dir_name: config.dir_name,
            })
            .collect()
    }

    pub fn dir_name(&self) -> &'static str {
        self.dir_name
    }

    /// Get the full language configuration from the registry.
    fn config(&self) -> Option<&'static LanguageConfig> {
        LanguageRegistry::get().get_by_dir_name(self.dir_name)
    }

    /// English label used in the translation prompt (e.g., "Simplified Chinese").
    pub fn name(&self) -> &'static str {
        self.config().map(|c| c.name).unwrap_or(self.dir_name)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name)
    }
}
