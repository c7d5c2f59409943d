pub mod authorization_code;
pub mod validation;

pub use authorization_code::*;
pub use validation::*;
