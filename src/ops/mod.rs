pub mod image;
pub mod project_ops;
pub mod query;
pub mod session;
