pub mod cache;
pub mod form;
pub mod submission;
pub mod user;
