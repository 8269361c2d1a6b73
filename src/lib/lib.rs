#![warn(
    missing_debug_implementations,
    rust_2018_idioms,
    missing_docs,
    rustdoc::broken_intra_doc_links,
    rustdoc::missing_crate_level_docs
)]

//! Formats visitor messages and conversations into HTML emails and relays
//! them through a transactional email provider.

pub mod domain;
pub mod infrastructure;
