//! Language support: the fixed set of languages the tool translates between.
//!
//! # Architecture
//!
//! - `registry`: Single source of truth for all supported languages and their metadata
//! - `language`: Validated `Language` handle used everywhere else
//! - `metrics`: Counters for calls to the translation service
//!
//! # Example
//!
//! ```rust,ignore
//! use keyed_translate::i18n::Language;
//!
//! let french = Language::from_dir_name("French")?;
//! for target in Language::all_except(Language::source()) {
//!     println!("{} -> {}", target.dir_name(), target.name());
//! }
//! ```

mod language;
mod metrics;
mod registry;

pub use language::Language;
pub use metrics::{MetricsReport, TranslationMetrics};
pub use registry::{LanguageConfig, LanguageRegistry};
