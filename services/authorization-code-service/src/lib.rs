pub mod config;
pub mod domain;
pub mod error;
pub mod handlers;

pub use domain::*;
pub use error::*;
pub use handlers::*;
