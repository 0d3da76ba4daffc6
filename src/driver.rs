//! Batch orchestration: one reconciliation task per (source file, target
//! language) pair, all polled concurrently.

use crate::config::Config;
use crate::i18n::Language;
use crate::keyed::BOILERPLATE;
use crate::reconcile::{reconcile, ReconcileReport};
use crate::translation::Translate;
use anyhow::{Context, Result};
use futures::future::join_all;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Subdirectory of every language folder holding its keyed files.
pub const KEYED_DIR: &str = "Keyed";

/// Where the language folders live and which of them to process.
#[derive(Debug, Clone)]
pub struct Layout {
    pub languages_dir: PathBuf,
    pub source_language: Language,
    pub target_languages: Vec<Language>,
}

impl Layout {
    pub fn from_config(config: &Config) -> Self {
        Self {
            languages_dir: config.languages_dir.clone(),
            source_language: config.source_language,
            target_languages: config.target_languages.clone(),
        }
    }

    pub fn keyed_dir(&self, language: Language) -> PathBuf {
        self.languages_dir.join(language.dir_name()).join(KEYED_DIR)
    }
}

/// Totals over every task of a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub tasks_completed: usize,
    pub tasks_failed: usize,
    pub keys_added: usize,
    pub translated: usize,
    pub fallbacks: usize,
    pub entry_errors: usize,
}

impl BatchSummary {
    fn record(&mut self, report: &ReconcileReport) {
        self.tasks_completed += 1;
        self.keys_added += report.keys_added;
        self.translated += report.translated;
        self.fallbacks += report.fallbacks;
        self.entry_errors += report.errors.len();
    }
}

/// Every `*.xml` file under `dir`, recursively, as paths relative to `dir`.
pub async fn discover_keyed_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let mut pending = vec![PathBuf::new()];

    while let Some(relative) = pending.pop() {
        let current = dir.join(&relative);
        let mut entries = tokio::fs::read_dir(&current)
            .await
            .with_context(|| format!("Failed to read directory {}", current.display()))?;

        while let Some(entry) = entries.next_entry().await? {
            let file_type = entry.file_type().await?;
            let child = relative.join(entry.file_name());
            if file_type.is_dir() {
                pending.push(child);
            } else if child.extension().is_some_and(|ext| ext == "xml") {
                files.push(child);
            }
        }
    }

    files.sort();
    Ok(files)
}

/// Make sure a target file exists, seeding it with the boilerplate document.
pub async fn ensure_target_file(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let exists = tokio::fs::try_exists(path)
        .await
        .with_context(|| format!("Failed to check {}", path.display()))?;
    if !exists {
        tokio::fs::write(path, BOILERPLATE)
            .await
            .with_context(|| format!("Failed to seed {}", path.display()))?;
    }
    Ok(())
}

/// One unit of work: a source file and its mirror in one target language.
#[derive(Debug, Clone)]
struct Task {
    source: PathBuf,
    target: PathBuf,
    language: Language,
}

/// Tasks ready to run, plus the number of pairs that could not be set up.
#[derive(Debug)]
struct Plan {
    tasks: Vec<Task>,
    skipped: usize,
}

/// Prepare target directories and files for every (source file, language)
/// pair. A pair whose target cannot be prepared is logged and skipped.
async fn plan_tasks(layout: &Layout, languages: &[Language]) -> Result<Plan> {
    let source_dir = layout.keyed_dir(layout.source_language);
    let files = discover_keyed_files(&source_dir).await?;
    info!(
        "Found {} keyed files for {} in {}",
        files.len(),
        layout.source_language,
        source_dir.display()
    );

    let mut plan = Plan {
        tasks: Vec::with_capacity(files.len() * languages.len()),
        skipped: 0,
    };
    for &language in languages {
        let target_dir = layout.keyed_dir(language);
        if let Err(e) = tokio::fs::create_dir_all(&target_dir).await {
            error!(
                "Skipping {} files for {}: failed to create {}: {}",
                files.len(),
                language,
                target_dir.display(),
                e
            );
            plan.skipped += files.len();
            continue;
        }

        for file in &files {
            let target = target_dir.join(file);
            if let Err(e) = ensure_target_file(&target).await {
                error!("Skipping {} for {}: {:#}", target.display(), language, e);
                plan.skipped += 1;
                continue;
            }
            plan.tasks.push(Task {
                source: source_dir.join(file),
                target,
                language,
            });
        }
    }

    Ok(plan)
}

async fn run_tasks<T: Translate>(
    translator: &T,
    tasks: Vec<Task>,
    selection: Option<&BTreeSet<usize>>,
) -> BatchSummary {
    let runs = tasks.iter().map(|task| async move {
        let result = reconcile(
            translator,
            &task.source,
            &task.target,
            task.language,
            selection,
        )
        .await;
        (task, result)
    });

    let mut summary = BatchSummary::default();
    for (task, result) in join_all(runs).await {
        match result {
            Ok(report) => summary.record(&report),
            Err(e) => {
                error!(
                    "Skipping {} for {}: {:#}",
                    task.target.display(),
                    task.language,
                    e
                );
                summary.tasks_failed += 1;
            }
        }
    }

    summary
}

/// Translate every source file into every configured target language.
pub async fn run_batch<T: Translate>(translator: &T, layout: &Layout) -> Result<BatchSummary> {
    let plan = plan_tasks(layout, &layout.target_languages).await?;
    info!("Running {} reconciliation tasks", plan.tasks.len());

    let mut summary = run_tasks(translator, plan.tasks, None).await;
    summary.tasks_failed += plan.skipped;
    Ok(summary)
}

/// Re-translate the entries at `indices` in every keyed file of one language.
///
/// Entries without text are skipped even when selected.
pub async fn run_redo<T: Translate>(
    translator: &T,
    layout: &Layout,
    language: Language,
    indices: &BTreeSet<usize>,
) -> Result<BatchSummary> {
    if language == layout.source_language {
        anyhow::bail!("Cannot redo translations for the source language ({})", language);
    }

    let plan = plan_tasks(layout, &[language]).await?;
    info!(
        "Redoing indices {:?} for {} across {} files",
        indices,
        language,
        plan.tasks.len()
    );

    let mut summary = run_tasks(translator, plan.tasks, Some(indices)).await;
    summary.tasks_failed += plan.skipped;
    Ok(summary)
}
