/*!
 * Provider implementations for language model backends.
 *
 * This module contains client implementations for the completion services
 * the translator talks to:
 * - OpenAI: OpenAI-compatible chat completions API
 * - Mock: scripted provider used by tests
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::ProviderError;

/// A single-turn completion request, independent of any provider's wire format
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// Model name
    pub model: String,

    /// System instruction
    pub system: String,

    /// User message
    pub user: String,

    /// Sampling temperature
    pub temperature: f32,

    /// Upper bound on generated tokens
    pub max_tokens: u32,
}

/// Common trait for all LLM providers
///
/// This trait defines the interface that all provider implementations must follow,
/// allowing them to be used interchangeably in the translation service.
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    /// Complete a request using this provider
    ///
    /// # Arguments
    /// * `request` - The request to complete
    ///
    /// # Returns
    /// * `Result<String, ProviderError>` - The raw text produced by the model or an error
    async fn complete(&self, request: CompletionRequest) -> Result<String, ProviderError>;

    /// Whether the provider has the credentials it needs to make a call
    fn is_configured(&self) -> bool;

    /// Short provider name used in log messages
    fn name(&self) -> &str;
}

pub mod mock;
pub mod openai;
