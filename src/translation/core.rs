/*!
 * Core translation service implementation.
 *
 * This module contains the `TranslationService`, which turns the two
 * operations the pipeline needs (phrase translation and fragment
 * correspondence) into completion requests against a `Provider`.
 */

use async_trait::async_trait;
use log::{debug, error};
use std::sync::Arc;
use std::time::Instant;

use crate::app_config::{BackendConfig, Config};
use crate::errors::{ProviderError, TranslationError};
use crate::providers::openai::OpenAI;
use crate::providers::{CompletionRequest, Provider};

use super::prompts::{self, NOT_FOUND_SENTINEL};
use super::rate_limit::RateLimiter;

/// The two model-backed operations the retry controller depends on
#[async_trait]
pub trait TranslationBackend: Send + Sync {
    /// Translate `text` into `target_language`
    async fn translate(&self, text: &str, target_language: &str) -> Result<String, TranslationError>;

    /// Locate the span of `full_translated_phrase` matching `original_fragment`.
    ///
    /// `Ok(None)` means the model explicitly reported that no span corresponds.
    async fn find_corresponding(
        &self,
        full_translated_phrase: &str,
        original_fragment: &str,
        target_language: &str,
    ) -> Result<Option<String>, TranslationError>;
}

#[async_trait]
impl<T: TranslationBackend + ?Sized> TranslationBackend for &T {
    async fn translate(&self, text: &str, target_language: &str) -> Result<String, TranslationError> {
        (**self).translate(text, target_language).await
    }

    async fn find_corresponding(
        &self,
        full_translated_phrase: &str,
        original_fragment: &str,
        target_language: &str,
    ) -> Result<Option<String>, TranslationError> {
        (**self)
            .find_corresponding(full_translated_phrase, original_fragment, target_language)
            .await
    }
}

/// Model parameters shared by every call
#[derive(Debug, Clone, PartialEq)]
pub struct BackendPolicy {
    pub model: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
}

impl BackendPolicy {
    pub fn from_config(config: &BackendConfig) -> Self {
        Self {
            model: config.model.clone(),
            temperature: config.temperature,
            max_output_tokens: config.max_output_tokens,
        }
    }

    fn request(&self, system: &str, user: String) -> CompletionRequest {
        CompletionRequest {
            model: self.model.clone(),
            system: system.to_string(),
            user,
            temperature: self.temperature,
            max_tokens: self.max_output_tokens,
        }
    }
}

/// Main translation service
#[derive(Debug, Clone)]
pub struct TranslationService {
    /// Completion provider
    provider: Arc<dyn Provider>,

    /// Model parameters
    policy: BackendPolicy,

    /// Shared pacing for backend calls
    limiter: Arc<RateLimiter>,

    /// Whether correspondence calls also wait on `limiter`
    limit_correspondence_calls: bool,
}

impl TranslationService {
    /// Create a service over an arbitrary provider
    pub fn new(provider: Arc<dyn Provider>, policy: BackendPolicy, limiter: Arc<RateLimiter>) -> Self {
        Self {
            provider,
            policy,
            limiter,
            limit_correspondence_calls: true,
        }
    }

    /// Choose whether fragment correspondence calls share the rate limiter
    pub fn with_correspondence_limit(mut self, enabled: bool) -> Self {
        self.limit_correspondence_calls = enabled;
        self
    }

    /// Build the OpenAI-backed service described by the configuration.
    ///
    /// A missing API key does not fail here; each call reports it as a
    /// configuration error before touching the network.
    pub fn from_config(config: &Config) -> Self {
        let provider = OpenAI::new(
            config.backend.resolve_api_key(),
            config.backend.endpoint.clone(),
            config.backend.timeout(),
        );
        let limiter = Arc::new(RateLimiter::new(config.pipeline.rate_limit_interval()));

        Self::new(Arc::new(provider), BackendPolicy::from_config(&config.backend), limiter)
            .with_correspondence_limit(config.pipeline.limit_correspondence_calls)
    }

    pub fn policy(&self) -> &BackendPolicy {
        &self.policy
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    fn ensure_configured(&self) -> Result<(), TranslationError> {
        if self.provider.is_configured() {
            Ok(())
        } else {
            Err(TranslationError::Configuration(format!(
                "No API key configured for the {} backend",
                self.provider.name()
            )))
        }
    }

    /// Send one request and return the trimmed, non-empty reply
    async fn complete(&self, request: CompletionRequest, label: &str) -> Result<String, TranslationError> {
        let start_time = Instant::now();

        let reply = self.provider.complete(request).await.map_err(|e| {
            error!("{} request failed: {}", label, e);
            TranslationError::Backend(e)
        })?;

        debug!("{} response received in {:?}", label, start_time.elapsed());

        let reply = reply.trim();
        if reply.is_empty() {
            return Err(TranslationError::Backend(ProviderError::EmptyResponse));
        }
        Ok(reply.to_string())
    }
}

fn require_non_empty(value: &str, field: &str) -> Result<(), TranslationError> {
    if value.trim().is_empty() {
        Err(TranslationError::Validation(format!("{} is required", field)))
    } else {
        Ok(())
    }
}

#[async_trait]
impl TranslationBackend for TranslationService {
    async fn translate(&self, text: &str, target_language: &str) -> Result<String, TranslationError> {
        require_non_empty(text, "text")?;
        require_non_empty(target_language, "targetLanguage")?;
        self.ensure_configured()?;

        let request = self.policy.request(
            prompts::translation_system_prompt(),
            prompts::translation_user_prompt(text, target_language),
        );

        self.limiter.acquire().await;
        self.complete(request, "Translation").await
    }

    async fn find_corresponding(
        &self,
        full_translated_phrase: &str,
        original_fragment: &str,
        target_language: &str,
    ) -> Result<Option<String>, TranslationError> {
        require_non_empty(full_translated_phrase, "fullTranslatedPhrase")?;
        require_non_empty(original_fragment, "originalFragment")?;
        require_non_empty(target_language, "targetLanguage")?;
        self.ensure_configured()?;

        let request = self.policy.request(
            prompts::correspondence_system_prompt(),
            prompts::correspondence_user_prompt(full_translated_phrase, original_fragment, target_language),
        );

        if self.limit_correspondence_calls {
            self.limiter.acquire().await;
        }
        let reply = self.complete(request, "Fragment correspondence").await?;

        if reply == NOT_FOUND_SENTINEL {
            debug!("No corresponding span for fragment '{}'", original_fragment);
            Ok(None)
        } else {
            Ok(Some(reply))
        }
    }
}
