pub mod logger;
pub mod timed;
pub mod trace;
