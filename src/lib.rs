/*!
 * # phrasewai - phrase document translation with AI
 *
 * A Rust library for batch translation of structured phrase documents using
 * a language model backend.
 *
 * ## Features
 *
 * - Translate every phrase of a JSON phrase document into a target language
 * - Locate the translation of styled sub-spans ("changes") inside each
 *   translated phrase with a second model call
 * - Minimum spacing between backend calls
 * - Per-phrase retries with fixed backoff, falling back to the original text
 * - ISO 639-1 and ISO 639-2 codes resolved to language names in prompts
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `translation`: Orchestration core:
 *   - `translation::core`: Backend seam and provider-backed service
 *   - `translation::document`: Phrase document model
 *   - `translation::rate_limit`: Call pacing
 *   - `translation::retry`: Per-record retry controller
 *   - `translation::pipeline`: Sequential batch driver
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `language_utils`: ISO language code utilities
 * - `providers`: Client implementations for LLM providers:
 *   - `providers::openai`: OpenAI API client
 *   - `providers::mock`: Scripted provider for tests
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]
#![allow(non_snake_case)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod file_utils;
pub mod language_utils;
pub mod providers;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use errors::{ProviderError, TranslationError};
pub use language_utils::{get_language_name, normalize_to_part2t};
pub use translation::{BatchPipeline, PhraseRecord, TranslationDocument, TranslationService};
