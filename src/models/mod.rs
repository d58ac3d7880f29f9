//! Data models for user credentials, profiles, and stories.

pub mod story;
pub mod user;

pub use story::*;
pub use user::*;
