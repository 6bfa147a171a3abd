/*!
 * Phrase document model.
 *
 * These types mirror the JSON exchanged with the user: a metadata block and
 * an ordered list of phrases, each optionally carrying styled sub-spans
 * ("changes") whose translations are located after the phrase itself is
 * translated. Fields this crate does not interpret are kept in `extra` so
 * they survive the round trip.
 */

use log::warn;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;

use crate::errors::TranslationError;

/// Complete translation document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationDocument {
    /// Document metadata
    pub metadata: DocumentMetadata,

    /// All phrases, in display order
    pub phrases: Vec<PhraseRecord>,
}

/// Document metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub description: String,
    pub path: String,
    pub lang: LanguagePair,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Source and target language of a document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguagePair {
    pub original: String,

    /// Empty until a batch run stamps the target language
    #[serde(default, deserialize_with = "null_as_empty")]
    pub translated: String,
}

/// One translatable phrase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhraseRecord {
    /// Stable identifier, assumed unique within a document
    pub key: String,

    /// Source (English) text
    pub original: String,

    /// Translated text; `None` until produced, and omitted from the output
    /// when the input carried no value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translated: Option<String>,

    /// Styled sub-spans of `original`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changes: Option<Vec<ChangeRecord>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A styled sub-span of a phrase's original text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeRecord {
    /// The span as it appears in the phrase's original text
    pub original: String,

    /// Matching span inside the phrase's translation; `None` when the model
    /// reported that no such span exists
    #[serde(default)]
    pub translated: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub underline: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Treat `null` like a missing string
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl PhraseRecord {
    /// Create a phrase with no translation and no changes
    pub fn new(key: impl Into<String>, original: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            original: original.into(),
            translated: None,
            changes: None,
            extra: Map::new(),
        }
    }

    /// Attach changes to the phrase
    pub fn with_changes(mut self, changes: Vec<ChangeRecord>) -> Self {
        self.changes = Some(changes);
        self
    }

    /// Whether the phrase has at least one change
    pub fn has_changes(&self) -> bool {
        self.changes.as_ref().is_some_and(|changes| !changes.is_empty())
    }

    /// Number of changes whose translation could not be located
    pub fn unresolved_changes(&self) -> usize {
        self.changes
            .as_ref()
            .map(|changes| changes.iter().filter(|c| c.translated.is_none()).count())
            .unwrap_or(0)
    }
}

impl ChangeRecord {
    /// Create an unstyled change for the given span
    pub fn new(original: impl Into<String>) -> Self {
        Self {
            original: original.into(),
            translated: None,
            bold: None,
            italic: None,
            underline: None,
            link: None,
            extra: Map::new(),
        }
    }
}

impl TranslationDocument {
    /// Parse and validate a document from JSON text.
    ///
    /// Malformed JSON, missing required fields and blank phrase keys are all
    /// reported as validation errors.
    pub fn from_json(input: &str) -> Result<Self, TranslationError> {
        let document: TranslationDocument = serde_json::from_str(input)
            .map_err(|e| TranslationError::Validation(format!("Invalid translation document: {}", e)))?;
        document.validate()?;
        Ok(document)
    }

    /// Serialize as pretty-printed JSON
    pub fn to_json_pretty(&self) -> Result<String, TranslationError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| TranslationError::Validation(format!("Failed to serialize document: {}", e)))
    }

    /// Check structural rules that serde cannot express
    pub fn validate(&self) -> Result<(), TranslationError> {
        let mut seen = HashSet::new();
        for (index, phrase) in self.phrases.iter().enumerate() {
            if phrase.key.trim().is_empty() {
                return Err(TranslationError::Validation(format!(
                    "Phrase #{} has an empty key",
                    index + 1
                )));
            }
            // Uniqueness is assumed, not enforced
            if !seen.insert(phrase.key.as_str()) {
                warn!("Duplicate phrase key '{}' at position {}", phrase.key, index + 1);
            }
        }
        Ok(())
    }

    /// Copy of the document with the target language stamped and no phrases
    pub fn empty_translation_of(&self, target_language: &str) -> Self {
        let mut metadata = self.metadata.clone();
        metadata.lang.translated = target_language.to_string();
        Self {
            metadata,
            phrases: Vec::with_capacity(self.phrases.len()),
        }
    }
}
