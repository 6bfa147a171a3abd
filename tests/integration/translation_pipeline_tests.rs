/*!
 * Integration tests running the provider-backed service through the batch
 * pipeline
 */

use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

use phrasewai::providers::mock::MockProvider;
use phrasewai::providers::CompletionRequest;
use phrasewai::translation::prompts::{self, NOT_FOUND_SENTINEL};
use phrasewai::translation::{
    BackendPolicy, BatchPipeline, PhraseRecord, RateLimiter, RetryPolicy, TranslationService,
};

use crate::common::{phrase_with_changes, sample_document, HELLO_WORLD_DOCUMENT};

fn policy() -> BackendPolicy {
    BackendPolicy {
        model: "gpt-4o-mini".to_string(),
        temperature: 0.3,
        max_output_tokens: 1024,
    }
}

fn spanish_reply(request: &CompletionRequest) -> String {
    if request.system == prompts::correspondence_system_prompt() {
        "mundo".to_string()
    } else {
        "Hola mundo".to_string()
    }
}

fn service(provider: &MockProvider, interval_ms: u64) -> TranslationService {
    TranslationService::new(
        Arc::new(provider.clone()),
        policy(),
        Arc::new(RateLimiter::new(Duration::from_millis(interval_ms))),
    )
}

fn retry_policy() -> RetryPolicy {
    RetryPolicy::new(3, Duration::from_millis(2000))
}

#[tokio::test(start_paused = true)]
async fn test_helloWorld_shouldTranslatePhraseAndChange() {
    let provider = MockProvider::working().with_custom_response(spanish_reply);
    let pipeline = BatchPipeline::new(service(&provider, 1000), retry_policy());

    let report = pipeline.run_json(HELLO_WORLD_DOCUMENT, "es").await.unwrap();

    let phrase = &report.document.phrases[0];
    assert_eq!(phrase.translated.as_deref(), Some("Hola mundo"));
    assert_eq!(phrase.changes.as_ref().unwrap()[0].translated.as_deref(), Some("mundo"));
    assert_eq!(report.document.metadata.lang.translated, "es");

    let requests = provider.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].system, prompts::translation_system_prompt());
    assert!(requests[0].user.contains("Spanish"));
    assert!(requests[0].user.contains("Hello world"));
    assert!(requests[1].user.contains("Hola mundo"));
    assert!(requests[1].user.contains("world"));
    assert!(requests.iter().all(|r| r.model == "gpt-4o-mini" && r.max_tokens == 1024));
}

#[tokio::test(start_paused = true)]
async fn test_notFoundSentinel_shouldLeaveChangeUnresolved() {
    let provider = MockProvider::working().with_custom_response(|request| {
        if request.system == prompts::correspondence_system_prompt() {
            NOT_FOUND_SENTINEL.to_string()
        } else {
            "Hola".to_string()
        }
    });
    let pipeline = BatchPipeline::new(service(&provider, 0), retry_policy());
    let document = sample_document(vec![phrase_with_changes("k1", "Hello there", &["there"])]);

    let report = pipeline.run(document, "es").await.unwrap();

    assert_eq!(report.summary.translated, 1);
    assert_eq!(report.summary.unresolved_changes, 1);
    assert_eq!(report.document.phrases[0].changes.as_ref().unwrap()[0].translated, None);
    // Not found is an answer, not a failure
    assert_eq!(provider.request_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_rateLimiter_shouldSpaceEveryBackendCall() {
    let provider = MockProvider::working().with_custom_response(spanish_reply);
    let pipeline = BatchPipeline::new(service(&provider, 1000), retry_policy());
    let document = sample_document(vec![
        phrase_with_changes("a", "Hello world", &["world"]),
        phrase_with_changes("b", "Goodbye world", &["world"]),
    ]);
    let start = Instant::now();

    pipeline.run(document, "es").await.unwrap();

    // Four calls, the first one immediate
    assert_eq!(provider.request_count(), 4);
    assert_eq!(start.elapsed(), Duration::from_millis(3000));
}

#[tokio::test(start_paused = true)]
async fn test_rateLimiter_withCorrespondenceUnlimited_shouldOnlySpaceTranslations() {
    let provider = MockProvider::working().with_custom_response(spanish_reply);
    let service = service(&provider, 1000).with_correspondence_limit(false);
    let pipeline = BatchPipeline::new(service, retry_policy());
    let document = sample_document(vec![
        phrase_with_changes("a", "Hello world", &["world"]),
        phrase_with_changes("b", "Goodbye world", &["world"]),
    ]);
    let start = Instant::now();

    pipeline.run(document, "es").await.unwrap();

    assert_eq!(provider.request_count(), 4);
    assert_eq!(start.elapsed(), Duration::from_millis(1000));
}

#[tokio::test(start_paused = true)]
async fn test_unconfiguredProvider_shouldFallBackWithoutRequests() {
    let provider = MockProvider::unconfigured();
    let pipeline = BatchPipeline::new(service(&provider, 1000), retry_policy());
    let phrases = vec![PhraseRecord::new("a", "One"), PhraseRecord::new("b", "Two")];
    let document = sample_document(phrases.clone());
    let start = Instant::now();

    let report = pipeline.run(document, "es").await.unwrap();

    assert_eq!(report.document.phrases, phrases);
    assert_eq!(report.summary.fallen_back, 2);
    assert!(report.fallbacks.iter().all(|f| f.reason.contains("Configuration error")));
    assert_eq!(provider.request_count(), 0);
    assert_eq!(start.elapsed(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn test_failingProvider_shouldRetryThenKeepOriginal() {
    let provider = MockProvider::failing();
    let pipeline = BatchPipeline::new(service(&provider, 1000), retry_policy());
    let phrases = vec![PhraseRecord::new("a", "One")];
    let start = Instant::now();

    let report = pipeline.run(sample_document(phrases.clone()), "es").await.unwrap();

    assert_eq!(report.document.phrases, phrases);
    assert_eq!(provider.request_count(), 3);
    assert_eq!(start.elapsed(), Duration::from_millis(4000));
}

#[tokio::test(start_paused = true)]
async fn test_emptyProviderReply_shouldBeRetriedAsFailure() {
    let provider = MockProvider::empty();
    let pipeline = BatchPipeline::new(service(&provider, 0), retry_policy());

    let report = pipeline
        .run(sample_document(vec![PhraseRecord::new("a", "One")]), "es")
        .await
        .unwrap();

    assert_eq!(report.summary.fallen_back, 1);
    assert!(report.fallbacks[0].reason.contains("empty response"));
    assert_eq!(provider.request_count(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_intermittentProvider_shouldRecoverOnRetry() {
    // Every second request fails
    let provider = MockProvider::intermittent(2);
    let pipeline = BatchPipeline::new(service(&provider, 0), retry_policy());
    let document = sample_document(vec![
        PhraseRecord::new("a", "One"),
        PhraseRecord::new("b", "Two"),
        PhraseRecord::new("c", "Three"),
    ]);

    let report = pipeline.run(document, "es").await.unwrap();

    assert_eq!(report.summary.translated, 3);
    assert_eq!(provider.request_count(), 5);
    assert!(report.document.phrases[2].translated.as_deref().unwrap_or_default().starts_with("[TRANSLATED]"));
}
