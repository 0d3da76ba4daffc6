//! Bringing one target-language keyed file in line with its source file.

use crate::i18n::Language;
use crate::keyed::{Entry, LanguageTree};
use crate::translation::{Translate, TranslationOutcome};
use anyhow::{Context, Result};
use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;
use tracing::{debug, error, info, warn};

/// Why an entry was skipped during the walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryError {
    pub key: String,
    pub reason: String,
}

impl fmt::Display for EntryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Failed to translate {}: {}", self.key, self.reason)
    }
}

/// What one reconciliation did to its target tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Keys appended because the target lacked them
    pub keys_added: usize,
    /// Entries whose text was replaced with translator output
    pub translated: usize,
    /// Translated entries that fell back to the source text
    pub fallbacks: usize,
    /// Entries skipped, in walk order
    pub errors: Vec<EntryError>,
}

/// Append an empty entry for every source key the target lacks.
///
/// Returns the number of entries appended.
pub fn add_missing_keys(source: &LanguageTree, target: &mut LanguageTree) -> usize {
    let mut seen: BTreeSet<String> = target.keys().into_iter().map(str::to_string).collect();
    let mut added = 0;

    for entry in &source.entries {
        if seen.insert(entry.key.clone()) {
            target.entries.push(Entry {
                key: entry.key.clone(),
                text: None,
            });
            added += 1;
        }
    }

    added
}

/// Reconcile `target` against `source` in memory.
///
/// Without a selection every entry whose source has text is translated from
/// that text. With a selection only entries at the given walk positions that
/// already hold text are re-translated. The source lookup runs for every
/// entry, so a key missing from the source is reported even when it is not
/// selected.
pub async fn reconcile_tree<T: Translate>(
    translator: &T,
    source: &LanguageTree,
    target: &mut LanguageTree,
    language: Language,
    selection: Option<&BTreeSet<usize>>,
) -> ReconcileReport {
    let mut report = ReconcileReport {
        keys_added: add_missing_keys(source, target),
        ..ReconcileReport::default()
    };

    for (index, entry) in target.entries.iter_mut().enumerate() {
        let source_text = match source.find(&entry.key) {
            None => {
                report.errors.push(EntryError {
                    key: entry.key.clone(),
                    reason: "key is missing from the source file".to_string(),
                });
                continue;
            }
            Some(Entry { text: None, .. }) => {
                report.errors.push(EntryError {
                    key: entry.key.clone(),
                    reason: "source entry has no text".to_string(),
                });
                continue;
            }
            Some(Entry {
                text: Some(text), ..
            }) => text,
        };

        let selected = match selection {
            Some(indices) => indices.contains(&index) && entry.text.is_some(),
            None => true,
        };
        if !selected {
            continue;
        }

        let outcome = translator.translate(source_text, language).await;
        if let TranslationOutcome::Fallback { error, .. } = &outcome {
            error!(
                "Error translating {} to {}: {}",
                entry.key,
                language.dir_name(),
                error
            );
            report.fallbacks += 1;
        } else {
            debug!("Translated {} to {}", entry.key, language.dir_name());
        }
        entry.text = Some(outcome.into_text());
        report.translated += 1;
    }

    report
}

/// Reconcile one target file against its source file and rewrite it.
///
/// A file that cannot be read or parsed aborts this task only; the error is
/// returned for the caller to log.
pub async fn reconcile<T: Translate>(
    translator: &T,
    source_path: &Path,
    target_path: &Path,
    language: Language,
    selection: Option<&BTreeSet<usize>>,
) -> Result<ReconcileReport> {
    let source = LanguageTree::load(source_path)
        .await
        .with_context(|| format!("Error reading {}", source_path.display()))?;
    let mut target = LanguageTree::load(target_path)
        .await
        .with_context(|| format!("Error reading {}", target_path.display()))?;

    let report = reconcile_tree(translator, &source, &mut target, language, selection).await;

    if !report.errors.is_empty() {
        warn!(
            "Some translations for {} in {} were not completed due to errors:",
            language.dir_name(),
            target_path.display()
        );
        for err in &report.errors {
            warn!("{}", err);
        }
    }

    target
        .save(target_path)
        .await
        .with_context(|| format!("Error writing {}", target_path.display()))?;

    info!(
        "Language {} finished ({})",
        language.dir_name(),
        target_path.display()
    );

    Ok(report)
}
