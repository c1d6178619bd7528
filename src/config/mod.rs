//! Configuration module for splitbook
//!
//! - Platform path resolution (with an environment override)
//! - User settings persistence

pub mod paths;
pub mod settings;

pub use paths::SplitbookPaths;
pub use settings::Settings;
