//! Domain logic - pure version rules independent of git and the filesystem

pub mod natsort;
pub mod tag;
pub mod version;

pub use natsort::{latest_tag, natsorted};
pub use tag::ReleaseTags;
pub use version::{Bump, Version};
