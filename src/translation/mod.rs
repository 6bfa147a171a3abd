/*!
 * Phrase translation using language model backends.
 *
 * This module contains the orchestration core. It is split into several submodules:
 *
 * - `core`: The `TranslationBackend` seam and the provider-backed `TranslationService`
 * - `document`: Phrase document model
 * - `prompts`: Prompt builders and the not-found sentinel
 * - `rate_limit`: Minimum spacing between backend calls
 * - `retry`: Per-record retry controller
 * - `pipeline`: Sequential batch driver
 */

// Re-export main types for easier usage
pub use self::core::{BackendPolicy, TranslationBackend, TranslationService};
pub use self::document::{ChangeRecord, DocumentMetadata, LanguagePair, PhraseRecord, TranslationDocument};
pub use self::pipeline::{BatchPipeline, BatchReport, BatchSummary, Fallback};
pub use self::rate_limit::RateLimiter;
pub use self::retry::{process_record, RecordOutcome, RecordStatus, RetryPolicy};

// Submodules
pub mod core;
pub mod document;
pub mod pipeline;
pub mod prompts;
pub mod rate_limit;
pub mod retry;
