//! Command line front end: reference store bootstrap, region identification
//! and table import.

#![deny(unsafe_code)]

pub mod cli;
pub mod commands;
pub mod logging;
pub mod progress;
pub mod summary;
