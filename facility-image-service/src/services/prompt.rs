//! Prompt construction for facility photo generation.

/// Build the instruction sent to the image provider. The facility name is
/// embedded verbatim as opaque text; the provider treats it as part of the
/// natural-language prompt.
pub fn facility_prompt(name: &str) -> String {
    format!("Generate a realistic healthcare facility photo named: {name}")
}
