//! HTTP request handlers.

pub mod feeds;
pub mod http;
pub mod users;

pub use feeds::*;
pub use http::*;
pub use users::*;
