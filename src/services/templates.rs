//! Prebuilt form templates.
//!
//! A small static catalog users can instantiate without touching the LLM.
//! The list response goes through the value-level cache so the catalog can
//! later grow without changing the endpoint contract.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::db::Store;
use crate::models::{FieldType, FormField, GeneratedForm};
use crate::prompt::extract_keywords;

const TEMPLATE_LIST_CACHE_KEY: &str = "templates:list";

#[derive(Debug, Clone)]
pub struct FormTemplate {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    schema_title: &'static str,
    fields: Vec<FormField>,
}

impl FormTemplate {
    /// A concrete form ready to persist: the schema title becomes the form
    /// title, the description its purpose, and keywords are extracted the
    /// same way they are for prompted forms.
    #[must_use]
    pub fn instantiate(&self) -> GeneratedForm {
        GeneratedForm {
            title: self.schema_title.to_string(),
            purpose: self.description.to_string(),
            keywords: extract_keywords(&format!("{} {}", self.title, self.description)),
            fields: self.fields.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateSummary {
    pub id: String,
    pub title: String,
    pub description: String,
}

fn field(
    name: &str,
    field_type: FieldType,
    required: bool,
    placeholder: Option<&str>,
) -> FormField {
    FormField {
        name: name.to_string(),
        field_type,
        required,
        placeholder: placeholder.map(str::to_string),
        options: None,
    }
}

fn select_field(name: &str, required: bool, options: &[&str]) -> FormField {
    FormField {
        name: name.to_string(),
        field_type: FieldType::Select,
        required,
        placeholder: None,
        options: Some(options.iter().map(ToString::to_string).collect()),
    }
}

#[must_use]
pub fn catalog() -> Vec<FormTemplate> {
    vec![
        FormTemplate {
            id: "jobApplication",
            title: "Job Application Form",
            description: "Standard job application form",
            schema_title: "Job Application",
            fields: vec![
                field("fullName", FieldType::Text, true, Some("Enter your full name")),
                field("email", FieldType::Email, true, Some("your@email.com")),
                field("phone", FieldType::Text, true, Some("+1 (555) 000-0000")),
                field("resume", FieldType::Image, true, Some("Upload your resume (PDF)")),
                field("coverLetter", FieldType::Text, false, Some("Optional cover letter")),
            ],
        },
        FormTemplate {
            id: "signup",
            title: "User Signup Form",
            description: "Basic user registration form",
            schema_title: "Sign Up",
            fields: vec![
                field("username", FieldType::Text, true, Some("Choose a username")),
                field("email", FieldType::Email, true, Some("your@email.com")),
                field("profilePicture", FieldType::Image, false, Some("Upload profile picture")),
                field("bio", FieldType::Text, false, Some("Tell us about yourself")),
            ],
        },
        FormTemplate {
            id: "survey",
            title: "Customer Feedback Survey",
            description: "Collect customer feedback",
            schema_title: "Feedback Survey",
            fields: vec![
                select_field(
                    "satisfaction",
                    true,
                    &["Very Satisfied", "Satisfied", "Neutral", "Dissatisfied"],
                ),
                field("feedback", FieldType::Text, false, Some("Your feedback...")),
                field("email", FieldType::Email, false, Some("Optional email for follow-up")),
            ],
        },
        FormTemplate {
            id: "eventRegistration",
            title: "Event Registration Form",
            description: "Register for an event",
            schema_title: "Event Registration",
            fields: vec![
                field("name", FieldType::Text, true, Some("Your full name")),
                field("email", FieldType::Email, true, Some("your@email.com")),
                field("numberOfAttendees", FieldType::Number, true, Some("How many people?")),
                field(
                    "dietaryRestrictions",
                    FieldType::Text,
                    false,
                    Some("Any dietary restrictions?"),
                ),
                field("agreeToTerms", FieldType::Checkbox, true, None),
            ],
        },
    ]
}

#[must_use]
pub fn find(template_id: &str) -> Option<FormTemplate> {
    catalog().into_iter().find(|t| t.id == template_id)
}

#[derive(Clone)]
pub struct TemplateService {
    store: Store,
}

impl TemplateService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    /// Template summaries, served through the value cache
    pub async fn list(&self, ttl_seconds: i64) -> Result<Vec<TemplateSummary>> {
        if let Some(cached) = self.store.get_cached_value(TEMPLATE_LIST_CACHE_KEY).await? {
            match serde_json::from_value(cached) {
                Ok(list) => return Ok(list),
                Err(e) => warn!(error = %e, "Discarding malformed cached template list"),
            }
        }

        let list: Vec<TemplateSummary> = catalog()
            .iter()
            .map(|t| TemplateSummary {
                id: t.id.to_string(),
                title: t.title.to_string(),
                description: t.description.to_string(),
            })
            .collect();

        let value = serde_json::to_value(&list).context("Failed to serialize template list")?;
        self.store
            .put_cached_value(TEMPLATE_LIST_CACHE_KEY, &value, ttl_seconds)
            .await?;

        Ok(list)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_has_four_templates() {
        let ids: Vec<&str> = catalog().iter().map(|t| t.id).collect();
        assert_eq!(
            ids,
            vec!["jobApplication", "signup", "survey", "eventRegistration"]
        );
    }

    #[test]
    fn test_find_by_id() {
        let template = find("survey").unwrap();
        assert_eq!(template.title, "Customer Feedback Survey");
        assert!(find("no-such-template").is_none());
    }

    #[test]
    fn test_instantiate_survey() {
        let form = find("survey").unwrap().instantiate();
        assert_eq!(form.title, "Feedback Survey");
        assert_eq!(form.purpose, "Collect customer feedback");
        assert_eq!(form.fields.len(), 3);
        assert_eq!(form.fields[0].field_type, FieldType::Select);
        assert_eq!(
            form.fields[0].options.as_ref().map(Vec::len),
            Some(4)
        );
        assert!(form.keywords.contains(&"customer".to_string()));
    }

    #[test]
    fn test_instantiate_event_registration_checkbox() {
        let form = find("eventRegistration").unwrap().instantiate();
        let checkbox = form.fields.last().unwrap();
        assert_eq!(checkbox.name, "agreeToTerms");
        assert_eq!(checkbox.field_type, FieldType::Checkbox);
        assert!(checkbox.required);
        assert!(checkbox.placeholder.is_none());
    }
}
