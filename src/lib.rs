pub mod analyzers;
pub mod error;
pub mod loader;
pub mod output;
pub mod parser;
pub mod records;
pub mod schema;
pub mod stats;

pub use error::{CurveError, Result};
