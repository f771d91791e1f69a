//! Common test utilities.
//!
//! Shared recording emitter and raw-tick fixtures for the integration suites.

#![allow(dead_code)]

pub mod fixtures;
pub mod recording;
