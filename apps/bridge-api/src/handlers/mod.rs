//! Handlers 模块

pub mod auth;
pub mod publish;
pub mod system;

pub use auth::*;
pub use publish::*;
pub use system::*;
