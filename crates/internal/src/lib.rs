//! Internal utilities for the dprov workspace
//!
//! Nothing in here is part of the provider contract. The helpers are shared by
//! the engine-side handle and the reference providers.

#![no_std]
#![forbid(unsafe_code)]

pub mod constant_time;
pub mod endian;
pub mod overlap;
