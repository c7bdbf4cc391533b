pub mod config;
pub mod context;
pub mod dashboard;
pub mod error;
pub mod features;
pub mod frontmatter;
pub mod hooks;
pub mod io;
pub mod paths;
pub mod session;
pub mod ship;
pub mod status;

pub use context::FeatureContext;
pub use error::{FeatflowError, Result};
pub use status::FeatureStatus;
