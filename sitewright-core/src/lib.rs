//! Sitewright Core
//!
//! Shared domain types for the sitewright build-and-publish service.
//!
//! This crate contains:
//! - Event types: the verified push notification handed to the engine
//! - Repository identity: owner/name/full-name as reported by the forge

pub mod event;

pub use event::{Owner, PushEvent, Repository};
