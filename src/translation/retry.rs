/*!
 * Per-record retry controller.
 *
 * One attempt translates the phrase and then locates every change inside the
 * new translation. An attempt either succeeds as a whole or is discarded as a
 * whole; after the retry budget is spent the record is handed back untouched.
 */

use futures::future::try_join_all;
use log::{debug, warn};
use std::time::Duration;

use crate::app_config::PipelineConfig;
use crate::errors::TranslationError;

use super::core::TranslationBackend;
use super::document::{ChangeRecord, PhraseRecord};

/// Retry budget and backoff for one record
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Attempts per record, including the first
    pub max_attempts: u32,
    /// Fixed wait between attempts
    pub backoff: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, backoff: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff,
        }
    }

    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(config.retry_count, config.retry_backoff())
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_millis(2000))
    }
}

/// How a record left the retry controller
#[derive(Debug, Clone, PartialEq)]
pub enum RecordStatus {
    Translated,
    /// The original record was kept; `reason` is the last error seen
    FallenBack { reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordOutcome {
    pub status: RecordStatus,
    pub record: PhraseRecord,
}

impl RecordOutcome {
    fn translated(record: PhraseRecord) -> Self {
        Self {
            status: RecordStatus::Translated,
            record,
        }
    }

    fn fallen_back(record: PhraseRecord, reason: String) -> Self {
        Self {
            status: RecordStatus::FallenBack { reason },
            record,
        }
    }

    pub fn is_translated(&self) -> bool {
        self.status == RecordStatus::Translated
    }
}

/// Ephemeral retry bookkeeping for a single record
struct RetryState {
    remaining: u32,
    last_error: Option<TranslationError>,
}

/// Translate one record, retrying on backend failures.
///
/// Never fails: on exhaustion, or on an error that cannot succeed on retry,
/// the input record is returned unchanged with a `FallenBack` status.
pub async fn process_record<B>(
    backend: &B,
    policy: &RetryPolicy,
    record: PhraseRecord,
    target_language: &str,
) -> RecordOutcome
where
    B: TranslationBackend + ?Sized,
{
    if record.original.trim().is_empty() {
        warn!("Phrase '{}' has no original text, keeping it as is", record.key);
        return RecordOutcome::fallen_back(record, "empty original text".to_string());
    }

    let mut state = RetryState {
        remaining: policy.max_attempts,
        last_error: None,
    };

    while state.remaining > 0 {
        let attempt = policy.max_attempts - state.remaining + 1;

        match attempt_record(backend, &record, target_language).await {
            Ok(translated) => {
                if attempt > 1 {
                    debug!("Phrase '{}' succeeded on attempt {}/{}", record.key, attempt, policy.max_attempts);
                }
                return RecordOutcome::translated(translated);
            }
            Err(e) => {
                state.remaining -= 1;
                warn!(
                    "Phrase '{}': attempt {}/{} failed ({}), {} retries remaining",
                    record.key, attempt, policy.max_attempts, e, state.remaining
                );

                let retryable = e.is_retryable();
                state.last_error = Some(e);
                if !retryable {
                    break;
                }
                if state.remaining > 0 {
                    tokio::time::sleep(policy.backoff).await;
                }
            }
        }
    }

    let reason = state
        .last_error
        .map(|e| e.to_string())
        .unwrap_or_else(|| "retry budget exhausted".to_string());
    warn!("Phrase '{}' kept untranslated: {}", record.key, reason);
    RecordOutcome::fallen_back(record, reason)
}

/// One all-or-nothing attempt: translate the phrase, then locate each change
async fn attempt_record<B>(
    backend: &B,
    record: &PhraseRecord,
    target_language: &str,
) -> Result<PhraseRecord, TranslationError>
where
    B: TranslationBackend + ?Sized,
{
    let translated_text = backend.translate(&record.original, target_language).await?;

    let changes = match &record.changes {
        Some(changes) if record.has_changes() => {
            let located = try_join_all(
                changes
                    .iter()
                    .map(|change| locate_change(backend, &translated_text, change, target_language)),
            )
            .await?;
            Some(located)
        }
        other => other.clone(),
    };

    Ok(PhraseRecord {
        translated: Some(translated_text),
        changes,
        ..record.clone()
    })
}

async fn locate_change<B>(
    backend: &B,
    translated_text: &str,
    change: &ChangeRecord,
    target_language: &str,
) -> Result<ChangeRecord, TranslationError>
where
    B: TranslationBackend + ?Sized,
{
    let translated = if change.original.trim().is_empty() {
        warn!("Skipping change with empty original text");
        None
    } else {
        backend
            .find_corresponding(translated_text, &change.original, target_language)
            .await?
    };

    Ok(ChangeRecord {
        translated,
        ..change.clone()
    })
}
