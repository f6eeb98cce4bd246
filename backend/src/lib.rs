//! PixelPulse Backend Library
//!
//! Local storage, the Gemini-backed assistant and the HTTP surface, exposed
//! as a library for the binary and the integration tests.

pub mod ai;
pub mod config;
pub mod db;
pub mod error;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
