use serde::{Deserialize, Serialize};

/// A complete form schema as produced by the generation pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedForm {
    pub title: String,
    pub purpose: String,
    /// Derived from the request prompt, not returned by the model
    #[serde(default)]
    pub keywords: Vec<String>,
    pub fields: Vec<FormField>,
}

impl GeneratedForm {
    /// Field names in schema order
    #[must_use]
    pub fn field_names(&self) -> Vec<String> {
        self.fields.iter().map(|f| f.name.clone()).collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormField {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    /// Only meaningful for select and checkbox fields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Email,
    Number,
    Image,
    Checkbox,
    Select,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_documented_structure() {
        let json = r#"{
            "title": "Job Application",
            "purpose": "Collect applications for open positions",
            "fields": [
                {"name": "full_name", "type": "text", "required": true, "placeholder": "Jane Doe"},
                {"name": "email", "type": "email", "required": true},
                {"name": "resume", "type": "image", "required": false},
                {"name": "role", "type": "select", "required": true, "options": ["Engineer", "Designer"]}
            ]
        }"#;

        let form: GeneratedForm = serde_json::from_str(json).unwrap();
        assert_eq!(form.title, "Job Application");
        assert_eq!(form.fields.len(), 4);
        assert_eq!(form.fields[0].field_type, FieldType::Text);
        assert_eq!(form.fields[3].field_type, FieldType::Select);
        assert_eq!(
            form.fields[3].options.as_deref(),
            Some(&["Engineer".to_string(), "Designer".to_string()][..])
        );
        assert!(form.keywords.is_empty());
        assert_eq!(form.field_names()[1], "email");
    }

    #[test]
    fn test_rejects_unknown_field_type() {
        let json = r#"{
            "title": "T",
            "purpose": "P",
            "fields": [{"name": "x", "type": "dropdown", "required": false}]
        }"#;

        assert!(serde_json::from_str::<GeneratedForm>(json).is_err());
    }

    #[test]
    fn test_field_type_serializes_lowercase() {
        let field = FormField {
            name: "avatar".to_string(),
            field_type: FieldType::Image,
            required: false,
            placeholder: None,
            options: None,
        };

        let json = serde_json::to_value(&field).unwrap();
        assert_eq!(json["type"], "image");
        assert!(json.get("placeholder").is_none());
    }
}
