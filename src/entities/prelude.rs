pub use super::cache_entries::Entity as CacheEntries;
pub use super::forms::Entity as Forms;
pub use super::retrieval_cache::Entity as RetrievalCache;
pub use super::submissions::Entity as Submissions;
pub use super::users::Entity as Users;
