pub mod form_schema;

pub use form_schema::{FieldType, FormField, GeneratedForm};
