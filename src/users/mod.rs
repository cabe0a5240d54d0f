mod errors;
pub mod password;
mod repo;
mod repo_types;

#[cfg(test)]
pub(crate) mod memory;

pub use errors::UserError;
pub use repo::{PgUserRepository, UserStore};
pub use repo_types::{NewUser, User};
