#![forbid(unsafe_code)]

//! CALEX research backend.
//!
//! A JSON HTTP API for research projects, their goals, uploaded documents and
//! generated insights. Records live in a pluggable [`store`]; by default one
//! JSON file per collection in the data directory, next to the uploaded files.

pub mod config;
pub mod error;
pub mod files;
pub mod gateway;
pub mod research;
pub mod store;

pub use config::Config;
pub use error::{Error, Result};
