pub mod naming;
pub mod parser;
pub mod story_model;
