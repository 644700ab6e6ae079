pub mod error;
pub mod escape;
pub mod metadata;

pub use error::*;
pub use escape::*;
pub use metadata::*;
