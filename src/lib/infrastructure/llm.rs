//! LLM summarisation backends

pub mod openai;
