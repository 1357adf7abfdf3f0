pub mod access;
pub mod audit;
pub mod overrides;
pub mod radar;
pub mod role;
pub mod session;
pub mod student;
pub mod view;

pub use role::{LoginError, LoginResult, ResolvedRole, Role, RoleResolver, SessionToken};
pub use session::SessionStore;

pub const LOG_TARGET: &str = "tutordash::core";
