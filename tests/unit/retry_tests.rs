/*!
 * Tests for the per-record retry controller
 */

use std::time::Duration;
use tokio::time::Instant;

use phrasewai::errors::TranslationError;
use phrasewai::translation::{process_record, PhraseRecord, RecordStatus, RetryPolicy};

use crate::common::mock_backends::{backend_error, ScriptedBackend};
use crate::common::phrase_with_changes;

fn policy() -> RetryPolicy {
    RetryPolicy::new(3, Duration::from_millis(2000))
}

#[test]
fn test_retryPolicy_withZeroAttempts_shouldClampToOne() {
    let policy = RetryPolicy::new(0, Duration::ZERO);
    assert_eq!(policy.max_attempts, 1);
    assert_eq!(RetryPolicy::default(), RetryPolicy::new(3, Duration::from_millis(2000)));
}

#[tokio::test(start_paused = true)]
async fn test_processRecord_firstAttemptSucceeds_shouldNotWait() {
    let backend = ScriptedBackend::echo();
    let record = phrase_with_changes("k1", "Hello world", &["world"]);
    let start = Instant::now();

    let outcome = process_record(&backend, &policy(), record, "es").await;

    assert!(outcome.is_translated());
    assert_eq!(outcome.record.translated.as_deref(), Some("[es] Hello world"));
    let changes = outcome.record.changes.as_ref().unwrap();
    assert_eq!(changes[0].translated.as_deref(), Some("[es] world"));
    assert_eq!(backend.translate_calls(), 1);
    assert_eq!(backend.locate_calls(), 1);
    assert_eq!(start.elapsed(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn test_processRecord_allAttemptsFail_shouldReturnInputUnchanged() {
    let backend = ScriptedBackend::always_failing();
    let record = phrase_with_changes("k1", "Hello world", &["world"]);
    let start = Instant::now();

    let outcome = process_record(&backend, &policy(), record.clone(), "es").await;

    assert_eq!(outcome.record, record);
    match &outcome.status {
        RecordStatus::FallenBack { reason } => assert!(reason.contains("Simulated backend failure")),
        other => panic!("expected fallback, got {:?}", other),
    }
    assert_eq!(backend.translate_calls(), 3);
    assert_eq!(backend.locate_calls(), 0);
    // Two waits between three attempts, none after the last
    assert_eq!(start.elapsed(), Duration::from_millis(4000));
}

#[tokio::test(start_paused = true)]
async fn test_processRecord_failsTwiceThenSucceeds_shouldTranslate() {
    let backend = ScriptedBackend::new(
        |text, index| if index < 2 { Err(backend_error()) } else { Ok(format!("ok:{}", text)) },
        |_, _, _| Ok(None),
    );
    let start = Instant::now();

    let outcome = process_record(&backend, &policy(), PhraseRecord::new("k1", "Hi"), "es").await;

    assert!(outcome.is_translated());
    assert_eq!(outcome.record.translated.as_deref(), Some("ok:Hi"));
    assert_eq!(backend.translate_calls(), 3);
    assert_eq!(start.elapsed(), Duration::from_millis(4000));
}

#[tokio::test(start_paused = true)]
async fn test_processRecord_fragmentFailure_shouldDiscardWholeAttempt() {
    // Each attempt produces a distinguishable translation
    let backend = ScriptedBackend::new(
        |_, index| Ok(format!("T{}", index)),
        |phrase, _, index| {
            if index == 0 {
                Err(backend_error())
            } else {
                Ok(Some(format!("in {}", phrase)))
            }
        },
    );
    let record = phrase_with_changes("k1", "Hello world", &["world"]);

    let outcome = process_record(&backend, &policy(), record, "es").await;

    assert!(outcome.is_translated());
    assert_eq!(outcome.record.translated.as_deref(), Some("T1"));
    let changes = outcome.record.changes.as_ref().unwrap();
    assert_eq!(changes[0].translated.as_deref(), Some("in T1"));
    assert_eq!(
        backend.log(),
        vec![
            "translate:Hello world".to_string(),
            "locate:T0|world".to_string(),
            "translate:Hello world".to_string(),
            "locate:T1|world".to_string(),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_processRecord_fragmentNotFound_shouldNotRetry() {
    let backend = ScriptedBackend::new(|_, _| Ok("Hola".to_string()), |_, _, _| Ok(None));
    let record = phrase_with_changes("k1", "Hello world", &["world"]);

    let outcome = process_record(&backend, &policy(), record, "es").await;

    assert!(outcome.is_translated());
    assert_eq!(outcome.record.translated.as_deref(), Some("Hola"));
    assert_eq!(outcome.record.changes.as_ref().unwrap()[0].translated, None);
    assert_eq!(outcome.record.unresolved_changes(), 1);
    assert_eq!(backend.translate_calls(), 1);
    assert_eq!(backend.locate_calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_processRecord_configurationError_shouldFallBackWithoutWaiting() {
    let backend = ScriptedBackend::new(
        |_, _| Err(TranslationError::Configuration("OPENAI_API_KEY is not set".to_string())),
        |_, _, _| Ok(None),
    );
    let record = PhraseRecord::new("k1", "Hello");
    let start = Instant::now();

    let outcome = process_record(&backend, &policy(), record.clone(), "es").await;

    assert_eq!(outcome.record, record);
    assert!(matches!(outcome.status, RecordStatus::FallenBack { ref reason } if reason.contains("OPENAI_API_KEY")));
    assert_eq!(backend.translate_calls(), 1);
    assert_eq!(start.elapsed(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn test_processRecord_emptyOriginal_shouldFallBackWithoutCalls() {
    let backend = ScriptedBackend::echo();
    let record = PhraseRecord::new("k1", "   ");

    let outcome = process_record(&backend, &policy(), record.clone(), "es").await;

    assert!(!outcome.is_translated());
    assert_eq!(outcome.record, record);
    assert_eq!(backend.translate_calls(), 0);
    assert_eq!(backend.locate_calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_processRecord_emptyChangesList_shouldStayEmpty() {
    let backend = ScriptedBackend::echo();
    let record = PhraseRecord::new("k1", "Hello").with_changes(Vec::new());

    let outcome = process_record(&backend, &policy(), record, "es").await;

    assert!(outcome.is_translated());
    assert_eq!(outcome.record.changes, Some(Vec::new()));
    assert_eq!(backend.locate_calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_processRecord_blankChangeOriginal_shouldResolveToNoneWithoutCall() {
    let backend = ScriptedBackend::echo();
    let record = phrase_with_changes("k1", "Hello world", &["", "world"]);

    let outcome = process_record(&backend, &policy(), record, "es").await;

    let changes = outcome.record.changes.as_ref().unwrap();
    assert_eq!(changes[0].translated, None);
    assert_eq!(changes[1].translated.as_deref(), Some("[es] world"));
    assert_eq!(backend.locate_calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_processRecord_multipleChanges_shouldKeepOrderAndStyle() {
    let backend = ScriptedBackend::echo();
    let mut record = phrase_with_changes("k1", "Hello big world", &["big", "world"]);
    if let Some(changes) = record.changes.as_mut() {
        changes[0].bold = Some(true);
        changes[1].link = Some("https://example.com".to_string());
    }

    let outcome = process_record(&backend, &policy(), record, "es").await;

    let changes = outcome.record.changes.as_ref().unwrap();
    assert_eq!(changes.len(), 2);
    assert_eq!(changes[0].original, "big");
    assert_eq!(changes[0].translated.as_deref(), Some("[es] big"));
    assert_eq!(changes[0].bold, Some(true));
    assert_eq!(changes[1].original, "world");
    assert_eq!(changes[1].translated.as_deref(), Some("[es] world"));
    assert_eq!(changes[1].link.as_deref(), Some("https://example.com"));
}
