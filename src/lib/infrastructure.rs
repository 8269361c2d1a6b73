//! Adapters for the outside world

pub mod email;
pub mod http;
pub mod llm;
