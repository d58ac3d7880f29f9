//! Business logic outside authentication: user profiles and the story feed.

pub mod feed;
pub mod users;

pub use feed::{CreateStoryRequest, FeedService};
pub use users::UserService;
