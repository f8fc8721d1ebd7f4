use std::fmt::Write;

/// The slice of a stored form the generation prompt cares about.
#[derive(Debug, Clone)]
pub struct FormSummary {
    pub title: String,
    pub purpose: String,
    pub field_names: Vec<String>,
}

/// Renders previously created forms into a context paragraph for the
/// generation prompt. Empty input yields an empty string so the caller
/// can append it unconditionally.
#[must_use]
pub fn build_context_prompt(forms: &[FormSummary]) -> String {
    if forms.is_empty() {
        return String::new();
    }

    let mut out = String::from("Here are relevant forms the user created before:");
    for form in forms {
        let _ = write!(
            out,
            "\n- Title: \"{}\", Purpose: \"{}\", Fields: {}",
            form.title,
            form.purpose,
            form.field_names.join(", ")
        );
    }
    out
}

/// Composes the full instruction prompt sent to a generation backend.
///
/// The schema contract in the prompt must stay in sync with
/// `GeneratedForm`; the backend is asked to answer with nothing but the
/// JSON object.
#[must_use]
pub fn build_generation_prompt(request: &str, context: &str) -> String {
    let context_block = if context.is_empty() {
        String::new()
    } else {
        format!("\n\n{context}")
    };

    format!(
        r#"You are a form schema generator. Generate a JSON form schema for the following request:

"{request}"{context_block}

Return a JSON object with this exact structure:
{{
  "title": "Form Title",
  "purpose": "brief description of form purpose",
  "keywords": ["keyword1", "keyword2", "keyword3"],
  "fields": [
    {{
      "name": "fieldName",
      "type": "text|email|number|image|checkbox|select",
      "required": true|false,
      "placeholder": "optional placeholder",
      "options": ["for", "select", "fields"]
    }}
  ]
}}

Important:
- Use appropriate field types (text, email, number, image, checkbox, select)
- For image uploads, use type "image"
- Make required fields true only when necessary
- Add helpful placeholders
- Include 3-5 keywords that describe the form
- Return ONLY valid JSON, no additional text"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(title: &str, purpose: &str, fields: &[&str]) -> FormSummary {
        FormSummary {
            title: title.to_string(),
            purpose: purpose.to_string(),
            field_names: fields.iter().map(|f| (*f).to_string()).collect(),
        }
    }

    #[test]
    fn test_empty_forms_is_empty_string() {
        assert_eq!(build_context_prompt(&[]), "");
    }

    #[test]
    fn test_single_form_line() {
        let forms = vec![summary(
            "Job Application",
            "Collect applications",
            &["fullName", "email", "resume"],
        )];
        let prompt = build_context_prompt(&forms);

        assert_eq!(
            prompt,
            "Here are relevant forms the user created before:\n\
             - Title: \"Job Application\", Purpose: \"Collect applications\", Fields: fullName, email, resume"
        );
    }

    #[test]
    fn test_one_line_per_form() {
        let forms = vec![
            summary("A", "first", &["x"]),
            summary("B", "second", &["y", "z"]),
        ];
        let prompt = build_context_prompt(&forms);

        assert_eq!(prompt.lines().count(), 3);
        assert!(prompt.ends_with("- Title: \"B\", Purpose: \"second\", Fields: y, z"));
    }

    #[test]
    fn test_form_without_fields() {
        let forms = vec![summary("Empty", "nothing yet", &[])];
        let prompt = build_context_prompt(&forms);
        assert!(prompt.contains("Fields: \n") || prompt.ends_with("Fields: "));
    }

    #[test]
    fn test_generation_prompt_embeds_request() {
        let prompt = build_generation_prompt("a signup form for my newsletter", "");
        assert!(prompt.contains("\"a signup form for my newsletter\""));
        assert!(prompt.contains("Return ONLY valid JSON"));
        assert!(!prompt.contains("created before"));
    }

    #[test]
    fn test_generation_prompt_embeds_context() {
        let context = build_context_prompt(&[summary("Survey", "feedback", &["rating"])]);
        let prompt = build_generation_prompt("another survey", &context);
        assert!(prompt.contains("Here are relevant forms the user created before:"));
        assert!(prompt.contains("- Title: \"Survey\""));
    }
}
