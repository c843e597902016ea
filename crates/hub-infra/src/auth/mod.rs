//! Authentication implementations.

mod memory;
mod password;

pub use memory::InMemoryAuthBackend;
pub use password::Argon2PasswordService;
