mod cleanup;
mod status;
mod user;

pub use cleanup::cmd_cleanup;
pub use status::cmd_status;
pub use user::{cmd_user_add, cmd_user_list};
