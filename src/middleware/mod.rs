//! Request extractors for identity and client address resolution.

pub mod auth;
