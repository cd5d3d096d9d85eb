pub mod config;
pub mod project;
pub mod seed;
pub mod theme;

pub use config::*;
pub use project::*;
pub use seed::*;
pub use theme::*;
