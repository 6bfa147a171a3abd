/*!
 * Prompt construction for the two model calls.
 */

use crate::language_utils::prompt_language_name;

/// Reserved reply meaning "no corresponding span exists"
pub const NOT_FOUND_SENTINEL: &str = "__NOT_FOUND__";

const TRANSLATION_SYSTEM_PROMPT: &str = "You are a precise translation tool. Translate the given text to the target language. \
     Provide ONLY the direct translation without explanations, quotes, or additional context.";

const CORRESPONDENCE_SYSTEM_PROMPT: &str = "You are a professional translator assistant. \
     You locate which part of a translated sentence corresponds to a fragment of its source.";

/// System instruction for phrase translation
pub fn translation_system_prompt() -> &'static str {
    TRANSLATION_SYSTEM_PROMPT
}

/// User message for phrase translation
pub fn translation_user_prompt(text: &str, target_language: &str) -> String {
    format!(
        "Translate the following text to {}:\n\n{}",
        prompt_language_name(target_language),
        text
    )
}

/// System instruction for fragment correspondence
pub fn correspondence_system_prompt() -> &'static str {
    CORRESPONDENCE_SYSTEM_PROMPT
}

/// User message asking which span of `full_translated_phrase` matches `original_fragment`
pub fn correspondence_user_prompt(
    full_translated_phrase: &str,
    original_fragment: &str,
    target_language: &str,
) -> String {
    let language = prompt_language_name(target_language);
    format!(
        "Given the following translated phrase in {language}:\n\
         \"{full_translated_phrase}\"\n\n\
         Which portion of this {language} phrase corresponds to the following English fragment:\n\
         \"{original_fragment}\"\n\n\
         Respond with ONLY the corresponding {language} fragment, copied exactly as it appears in the phrase, \
         without any additional explanation or punctuation. \
         If no portion of the phrase corresponds to the fragment, respond with exactly {NOT_FOUND_SENTINEL}."
    )
}
