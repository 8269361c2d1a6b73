//! Domain logic: formatting, requests and the collaborator traits

pub mod communication;
pub mod formatting;
pub mod reminders;
pub mod summaries;
