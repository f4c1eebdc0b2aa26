//! Constant values for dprov providers and engines
//!
//! This crate holds the canonical parameter names exchanged between an engine
//! and a provider, together with the size constants of the reference
//! algorithms and of the TLS record layout.

#![no_std]

pub mod names;
pub mod symmetric;
pub mod tls;
