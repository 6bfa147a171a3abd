/*!
 * Batch pipeline driver.
 *
 * Phrases are processed strictly one after another, in input order, each
 * through the retry controller. The driver owns the output document and
 * always emits exactly one phrase per input phrase.
 */

use log::{info, warn};
use std::time::Instant;

use crate::errors::TranslationError;

use super::core::TranslationBackend;
use super::document::TranslationDocument;
use super::retry::{process_record, RecordStatus, RetryPolicy};

/// Counts describing one batch run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub total: usize,
    pub translated: usize,
    pub fallen_back: usize,
    /// Changes in translated phrases whose span could not be located
    pub unresolved_changes: usize,
}

/// A phrase that was kept in its original form
#[derive(Debug, Clone, PartialEq)]
pub struct Fallback {
    pub key: String,
    pub reason: String,
}

/// Result of a completed batch
#[derive(Debug, Clone)]
pub struct BatchReport {
    pub document: TranslationDocument,
    pub summary: BatchSummary,
    pub fallbacks: Vec<Fallback>,
}

/// Sequential batch translator
pub struct BatchPipeline<B> {
    backend: B,
    policy: RetryPolicy,
}

impl<B: TranslationBackend> BatchPipeline<B> {
    pub fn new(backend: B, policy: RetryPolicy) -> Self {
        Self { backend, policy }
    }

    /// Parse `input` and translate it.
    ///
    /// A document that fails to parse aborts the batch before any phrase is
    /// processed.
    pub async fn run_json(&self, input: &str, target_language: &str) -> Result<BatchReport, TranslationError> {
        let document = TranslationDocument::from_json(input)?;
        self.run(document, target_language).await
    }

    /// Translate every phrase of `document` into `target_language`
    pub async fn run(
        &self,
        document: TranslationDocument,
        target_language: &str,
    ) -> Result<BatchReport, TranslationError> {
        self.run_with_progress(document, target_language, |_, _| {}).await
    }

    /// Translate every phrase, reporting `(done, total)` after each one
    pub async fn run_with_progress(
        &self,
        document: TranslationDocument,
        target_language: &str,
        progress_callback: impl Fn(usize, usize),
    ) -> Result<BatchReport, TranslationError> {
        let target_language = target_language.trim();
        if target_language.is_empty() {
            return Err(TranslationError::Validation("targetLanguage is required".to_string()));
        }

        let start_time = Instant::now();
        let mut output = document.empty_translation_of(target_language);
        let total = document.phrases.len();
        let mut summary = BatchSummary {
            total,
            ..BatchSummary::default()
        };
        let mut fallbacks = Vec::new();

        info!("Translating {} phrases to {}", total, target_language);

        for (index, phrase) in document.phrases.into_iter().enumerate() {
            let outcome = process_record(&self.backend, &self.policy, phrase, target_language).await;

            match outcome.status {
                RecordStatus::Translated => {
                    summary.translated += 1;
                    summary.unresolved_changes += outcome.record.unresolved_changes();
                }
                RecordStatus::FallenBack { reason } => {
                    summary.fallen_back += 1;
                    fallbacks.push(Fallback {
                        key: outcome.record.key.clone(),
                        reason,
                    });
                }
            }

            output.phrases.push(outcome.record);
            progress_callback(index + 1, total);
        }

        info!(
            "Batch finished in {:?}: {} translated, {} kept original, {} unresolved changes",
            start_time.elapsed(),
            summary.translated,
            summary.fallen_back,
            summary.unresolved_changes
        );
        if summary.fallen_back > 0 {
            warn!(
                "{} phrase(s) kept their original text: {}",
                summary.fallen_back,
                fallbacks.iter().map(|f| f.key.as_str()).collect::<Vec<_>>().join(", ")
            );
        }

        Ok(BatchReport {
            document: output,
            summary,
            fallbacks,
        })
    }
}
