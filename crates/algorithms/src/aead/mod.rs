//! Authenticated encryption providers

pub mod gcm;

pub use gcm::AesGcm;
