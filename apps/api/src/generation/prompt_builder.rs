//! Prompt Builder: turns a profile and a free-text instruction into one
//! provider-neutral prompt. Pure: no I/O, never fails.

use crate::generation::prompts::{DEFAULT_INSTRUCTION, OPTIMIZE_PROMPT_TEMPLATE, OUTPUT_SCHEMA};
use crate::models::resume::ResumeProfile;

/// Builds the optimization prompt.
///
/// A blank `instruction` is replaced with `DEFAULT_INSTRUCTION`; anything else is
/// embedded verbatim. The profile image is left out of the serialized copy;
/// the normalizer restores it from the input profile.
pub fn build_prompt(profile: &ResumeProfile, instruction: &str) -> String {
    let mut prompt_profile = profile.clone();
    prompt_profile.personal_info.profile_image_data_url = None;

    // Derived Serialize on plain data cannot fail.
    let profile_json =
        serde_json::to_string_pretty(&prompt_profile).unwrap_or_else(|_| "{}".to_string());

    OPTIMIZE_PROMPT_TEMPLATE
        .replace("{output_schema}", OUTPUT_SCHEMA)
        .replace("{profile_json}", &profile_json)
        .replace("{instruction}", effective_instruction(instruction))
}

/// The instruction actually sent: `DEFAULT_INSTRUCTION` when `instruction` is blank.
pub fn effective_instruction(instruction: &str) -> &str {
    if instruction.trim().is_empty() {
        DEFAULT_INSTRUCTION
    } else {
        instruction
    }
}
