pub mod browser;
pub mod cli;
pub mod codegen;
pub mod discovery;
pub mod error;
pub mod pipeline;
pub mod report;
pub mod story;
pub mod tools;
pub mod trace;

pub use error::ScaffoldError;
