pub mod discoverer;
pub mod element_model;
pub mod inspector;
