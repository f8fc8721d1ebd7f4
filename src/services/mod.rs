pub mod auth;
pub use auth::{AuthError, AuthService};

pub mod embeddings;
pub use embeddings::EmbeddingService;

pub mod generation;
pub use generation::{GenerationBackend, GenerationError, SchemaGenerator};

pub mod retrieval;
pub use retrieval::RetrievalService;

pub mod templates;
pub use templates::{TemplateService, TemplateSummary};
