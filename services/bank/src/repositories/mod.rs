//! Repositories for database operations

pub mod account;
pub mod session;
pub mod user;

pub use account::AccountRepository;
pub use session::SessionRepository;
pub use user::UserRepository;
