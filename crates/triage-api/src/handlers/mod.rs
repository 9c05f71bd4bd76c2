//! Handler modules for triage-api.

pub mod tickets;
