//! ByteMe Core - Shared types library.
//!
//! This crate provides common types used across all ByteMe console components:
//! - `client` - Session and REST client for the ByteMe admin backend
//! - `cli` - Terminal console for administrators
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. This keeps
//! it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, emails, and admin roles

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
