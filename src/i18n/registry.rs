//! Language registry: Single source of truth for all supported languages.
//!
//! Every language the tool knows about lives here, keyed by the name of its
//! directory under `Languages/`. The registry is initialized once through
//! `OnceLock` and is immutable afterwards.

use std::sync::OnceLock;

/// Configuration for a supported language.
#[derive(Debug, Clone)]
pub struct LanguageConfig {
    /// Directory name under `Languages/` (e.g., "ChineseSimplified")
    pub dir_name: &'static str,

    /// English label handed to the translation service (e.g., "Simplified Chinese")
    pub name: &'static str,

    /// Whether this is the default source language (only one should be true)
    pub is_source: bool,
}

/// Global language registry singleton.
pub struct LanguageRegistry {
    languages: Vec<LanguageConfig>,
}

/// Global registry instance (initialized lazily)
static REGISTRY: OnceLock<LanguageRegistry> = OnceLock::new();

impl LanguageRegistry {
    /// Get the global language registry instance.
    pub fn get() -> &'static LanguageRegistry {
        REGISTRY.get_or_init(|| LanguageRegistry {
            languages: default_languages(),
        })
    }

    /// Get a language configuration by its directory name.
    ///
    /// Matching is exact; directory names are case-sensitive on most filesystems.
    pub fn get_by_dir_name(&self, dir_name: &str) -> Option<&LanguageConfig> {
        self.languages.iter().find(|lang| lang.dir_name == dir_name)
    }

    /// Get all languages, in registry order.
    pub fn list_all(&self) -> Vec<&LanguageConfig> {
        self.languages.iter().collect()
    }

    /// Get the source language configuration.
    ///
    /// # Panics
    /// Panics if the registry does not define exactly one source language.
    pub fn source(&self) -> &LanguageConfig {
        let sources: Vec<_> = self.languages.iter().filter(|lang| lang.is_source).collect();

        match sources.len() {
            0 => panic!("No source language found in registry"),
            1 => sources[0],
            _ => panic!("Multiple source languages found in registry"),
        }
    }
}

const fn target(dir_name: &'static str, name: &'static str) -> LanguageConfig {
    LanguageConfig {
        dir_name,
        name,
        is_source: false,
    }
}

/// Default language configurations: English as source plus the 26 targets
/// shipped in the game's `Languages/` folder.
fn default_languages() -> Vec<LanguageConfig> {
    vec![
        LanguageConfig {
            dir_name: "English",
            name: "English",
            is_source: true,
        },
        target("Arabic", "Arabic"),
        target("ChineseSimplified", "Simplified Chinese"),
        target("ChineseTraditional", "Traditional Chinese"),
        target("Czech", "Czech"),
        target("Danish", "Danish"),
        target("Dutch", "Dutch"),
        target("Estonian", "Estonian"),
        target("Finnish", "Finnish"),
        target("French", "French"),
        target("German", "German"),
        target("Hungarian", "Hungarian"),
        target("Italian", "Italian"),
        target("Japanese", "Japanese"),
        target("Korean", "Korean"),
        target("Norwegian", "Norwegian"),
        target("Polish", "Polish"),
        target("Portuguese", "Portuguese"),
        target("PortugueseBrazilian", "Brazilian Portuguese"),
        target("Romanian", "Romanian"),
        target("Russian", "Russian"),
        target("Slovak", "Slovak"),
        target("Spanish", "Spanish"),
        target("SpanishLatin", "Latin American Spanish"),
        target("Swedish", "Swedish"),
        target("Turkish", "Turkish"),
        target("Ukrainian", "Ukrainian"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_registry_get_returns_singleton() {
        let registry1 = LanguageRegistry::get();
        let registry2 = LanguageRegistry::get();

        assert!(std::ptr::eq(registry1, registry2));
    }

    #[test]
    fn test_source_is_english() {
        let source = LanguageRegistry::get().source();
        assert_eq!(source.dir_name, "English");
        assert!(source.is_source);
    }

    #[test]
    fn test_get_by_dir_name_french() {
        let config = LanguageRegistry::get()
            .get_by_dir_name("French")
            .expect("French should be registered");

        assert_eq!(config.name, "French");
        assert!(!config.is_source);
    }

    #[test]
    fn test_get_by_dir_name_uses_prompt_label() {
        let config = LanguageRegistry::get()
            .get_by_dir_name("ChineseSimplified")
            .expect("ChineseSimplified should be registered");
        assert_eq!(config.name, "Simplified Chinese");
    }

    #[test]
    fn test_get_by_dir_name_is_case_sensitive() {
        let registry = LanguageRegistry::get();
        assert!(registry.get_by_dir_name("french").is_none());
        assert!(registry.get_by_dir_name("Klingon").is_none());
        assert!(registry.get_by_dir_name("").is_none());
    }

    #[test]
    fn test_list_all_has_one_source_and_26_targets() {
        let all = LanguageRegistry::get().list_all();

        assert_eq!(all.len(), 27);
        assert_eq!(all.iter().filter(|lang| lang.is_source).count(), 1);
    }

    #[test]
    fn test_list_all_keeps_registry_order() {
        let all = LanguageRegistry::get().list_all();
        assert_eq!(all.first().map(|l| l.dir_name), Some("English"));
        assert_eq!(all.get(1).map(|l| l.dir_name), Some("Arabic"));
        assert_eq!(all.last().map(|l| l.dir_name), Some("Ukrainian"));
    }

    #[test]
    fn test_dir_names_are_unique() {
        let all = LanguageRegistry::get().list_all();
        let unique: HashSet<_> = all.iter().map(|lang| lang.dir_name).collect();
        assert_eq!(unique.len(), all.len());
    }
}
