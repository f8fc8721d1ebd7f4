pub mod prelude;

pub mod cache_entries;
pub mod forms;
pub mod retrieval_cache;
pub mod submissions;
pub mod users;
