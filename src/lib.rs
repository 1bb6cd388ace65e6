//! Scambait - Conversational Honeypot Service
//!
//! This crate implements a scam-baiting honeypot: inbound scammer messages
//! are classified, engaged by a persona-driven responder, and mined for
//! actionable intelligence until the session conclusion policy fires.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
