use super::ApiError;

pub fn validate_form_id(id: i32) -> Result<i32, ApiError> {
    if id <= 0 {
        return Err(ApiError::validation(format!(
            "Invalid form ID: {}. ID must be a positive integer",
            id
        )));
    }
    Ok(id)
}

pub fn validate_prompt(prompt: &str) -> Result<&str, ApiError> {
    let trimmed = prompt.trim();
    if trimmed.is_empty() {
        return Err(ApiError::validation("Prompt is required"));
    }
    Ok(trimmed)
}

/// Syntactic email check, normalized to lower case. Deliverability is the
/// mail server's problem.
pub fn validate_email(email: &str) -> Result<String, ApiError> {
    let trimmed = email.trim();

    let Some((local, domain)) = trimmed.split_once('@') else {
        return Err(ApiError::validation("Invalid email address"));
    };

    if local.is_empty() || domain.is_empty() || !domain.contains('.') || trimmed.contains(' ') {
        return Err(ApiError::validation("Invalid email address"));
    }

    Ok(trimmed.to_lowercase())
}

/// Submission responses must be a JSON object mapping field names to values
pub fn validate_responses(responses: &serde_json::Value) -> Result<(), ApiError> {
    if responses.is_object() {
        Ok(())
    } else {
        Err(ApiError::validation(
            "Responses must be an object mapping field names to values",
        ))
    }
}

/// Image URLs are optional; when present they must be an object
pub fn validate_image_urls(
    image_urls: Option<serde_json::Value>,
) -> Result<serde_json::Value, ApiError> {
    match image_urls {
        None => Ok(serde_json::json!({})),
        Some(value) if value.is_object() => Ok(value),
        Some(_) => Err(ApiError::validation(
            "Image URLs must be an object mapping field names to URLs",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_form_id() {
        assert!(validate_form_id(1).is_ok());
        assert!(validate_form_id(12345).is_ok());
        assert!(validate_form_id(0).is_err());
        assert!(validate_form_id(-1).is_err());
    }

    #[test]
    fn test_validate_prompt() {
        assert_eq!(validate_prompt("a signup form").unwrap(), "a signup form");
        assert_eq!(validate_prompt("  trimmed  ").unwrap(), "trimmed");
        assert!(validate_prompt("").is_err());
        assert!(validate_prompt("   ").is_err());
    }

    #[test]
    fn test_validate_email() {
        assert_eq!(
            validate_email("Person@Example.com").unwrap(),
            "person@example.com"
        );
        assert_eq!(validate_email(" a@b.co ").unwrap(), "a@b.co");
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("user@").is_err());
        assert!(validate_email("user@nodot").is_err());
        assert!(validate_email("spaced user@example.com").is_err());
    }

    #[test]
    fn test_validate_responses() {
        assert!(validate_responses(&serde_json::json!({"name": "x"})).is_ok());
        assert!(validate_responses(&serde_json::json!({})).is_ok());
        assert!(validate_responses(&serde_json::json!(["a"])).is_err());
        assert!(validate_responses(&serde_json::json!("text")).is_err());
    }

    #[test]
    fn test_validate_image_urls() {
        assert_eq!(
            validate_image_urls(None).unwrap(),
            serde_json::json!({})
        );
        let urls = serde_json::json!({"avatar": "https://cdn.example/x.png"});
        assert_eq!(validate_image_urls(Some(urls.clone())).unwrap(), urls);
        assert!(validate_image_urls(Some(serde_json::json!([1, 2]))).is_err());
    }
}
