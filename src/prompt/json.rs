/// Locates the JSON object in a model response by greedy brace matching:
/// everything from the first `{` to the last `}` inclusive.
///
/// Models often wrap their answer in prose or a markdown fence despite
/// being told not to; this recovers the object without parsing either.
/// Returns `None` when no balanced-looking span exists. The caller still
/// has to run the slice through a real JSON parser.
#[must_use]
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_object() {
        assert_eq!(extract_json_object(r#"{"a":1}"#), Some(r#"{"a":1}"#));
    }

    #[test]
    fn test_strips_markdown_fence() {
        let text = "```json\n{\"title\": \"Survey\"}\n```";
        assert_eq!(extract_json_object(text), Some("{\"title\": \"Survey\"}"));
    }

    #[test]
    fn test_strips_surrounding_prose() {
        let text = "Sure! Here is your schema:\n{\"a\": {\"b\": 2}}\nLet me know if it helps.";
        assert_eq!(extract_json_object(text), Some("{\"a\": {\"b\": 2}}"));
    }

    #[test]
    fn test_greedy_spans_nested_objects() {
        let text = r#"{"fields": [{"name": "email"}]} trailing {"x": 1}"#;
        // Greedy match runs to the LAST closing brace.
        assert_eq!(
            extract_json_object(text),
            Some(r#"{"fields": [{"name": "email"}]} trailing {"x": 1}"#)
        );
    }

    #[test]
    fn test_no_object() {
        assert_eq!(extract_json_object("no json here"), None);
        assert_eq!(extract_json_object(""), None);
    }

    #[test]
    fn test_unbalanced_braces() {
        assert_eq!(extract_json_object("} {"), None);
        assert_eq!(extract_json_object("only open {"), None);
        assert_eq!(extract_json_object("only close }"), None);
    }
}
