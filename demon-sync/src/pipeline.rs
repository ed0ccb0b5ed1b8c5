//! Shared sync pipeline entrypoint used by the daemon and `demon sync`.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Serialize;

use demon_core::{RuleSet, SyncRule};

use crate::clean::{clean_directory, CleanOutcome};
use crate::copy::{copy_new_file, matching_files};

/// Counters for one pipeline run. Informational only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub rules: usize,
    pub cleaned_destinations: usize,
    pub removed_entries: usize,
    pub copied_files: usize,
    pub failures: usize,
}

/// Run every rule in order: clean each destination once, then copy the
/// matching files of each source into it.
///
/// A destination is cleaned by the first rule naming it and never again in
/// the same run, even when that clean was partial, so files copied by earlier
/// rules survive. Nothing here fails the run; every error is logged and
/// counted.
pub fn run(rules: &RuleSet) -> SyncReport {
    run_with(rules, clean_directory)
}

fn run_with(rules: &RuleSet, mut clean: impl FnMut(&Path) -> CleanOutcome) -> SyncReport {
    let mut report = SyncReport::default();
    let mut cleaned: HashSet<PathBuf> = HashSet::new();

    for rule in rules {
        report.rules += 1;

        if cleaned.insert(rule.destination.clone()) {
            let outcome = clean(&rule.destination);
            report.removed_entries += outcome.removed;
            if outcome.is_complete() {
                report.cleaned_destinations += 1;
            } else {
                for err in &outcome.errors {
                    tracing::error!(
                        destination = %rule.destination.display(),
                        error = %err,
                        "clean failed",
                    );
                }
                report.failures += outcome.errors.len();
            }
        }

        copy_rule(rule, &mut report);
    }

    tracing::debug!(
        rules = report.rules,
        copied = report.copied_files,
        failures = report.failures,
        "work done",
    );
    report
}

fn copy_rule(rule: &SyncRule, report: &mut SyncReport) {
    let files = match matching_files(&rule.source, &rule.extension) {
        Ok(files) => files,
        Err(err) => {
            tracing::error!(source = %rule.source.display(), error = %err, "cannot scan source");
            report.failures += 1;
            return;
        }
    };

    for file in files {
        tracing::debug!(
            from = %file.display(),
            to = %rule.destination.display(),
            "copy",
        );
        match copy_new_file(&file, &rule.destination) {
            Ok(_) => report.copied_files += 1,
            Err(err) => {
                tracing::error!(path = %file.display(), error = %err, "failed copying");
                report.failures += 1;
            }
        }
    }
}
