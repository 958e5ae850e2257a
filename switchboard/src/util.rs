//! Small helpers for parsing language-model output defensively.

/// Strip markdown code fences from a model response.
///
/// Models regularly wrap JSON answers in ```` ```json ```` fences despite
/// being told not to; fences are noise, not signal.
pub(crate) fn strip_code_fences(raw: &str) -> String {
    raw.lines()
        .filter(|line| !line.trim_start().starts_with("```"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Extract the outermost JSON object from free-form model output.
///
/// Tolerates commentary before and after the object: everything from the
/// first `{` to the last `}` is taken, which matches how the responses
/// actually misbehave (a sentence of preamble, then the JSON, then a
/// sign-off).
pub(crate) fn extract_json_object(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&raw[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fences_are_stripped() {
        let fenced = "```json\n{\"a\": 1}\n```";
        assert_eq!(strip_code_fences(fenced), "{\"a\": 1}");
    }

    #[test]
    fn object_is_extracted_from_commentary() {
        let chatty = "Sure! Here is the decision:\n{\"route\": \"retrieval\"}\nHope that helps.";
        assert_eq!(extract_json_object(chatty), Some("{\"route\": \"retrieval\"}"));
    }

    #[test]
    fn no_object_yields_none() {
        assert_eq!(extract_json_object("no json here"), None);
        assert_eq!(extract_json_object("} backwards {"), None);
    }
}
