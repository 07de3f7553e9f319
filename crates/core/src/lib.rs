//! salesdesk-core — pure in-memory domain logic for the order editor.
//!
//! This crate has **zero I/O dependencies**. All types and logic operate on
//! data that the service clients ([`services`] implementations) provide:
//!
//! - [`configuration`] — configuration groups, reconciliation, and the
//!   single-select toggle.
//! - [`pricing`] — line-item total aggregation and discount calculation.
//! - [`session`] — the transient editor session: validity, change
//!   detection, and lazy per-group photo loading.
//! - [`cart`] — persisted cart line shapes and the save payload.
//! - [`query_cache`] — typed query keys and the invalidation-driven cache.
//! - [`notifications`] — the notification event envelope and its mapping
//!   to cache invalidation scopes.

pub mod cart;
pub mod configuration;
pub mod error;
pub mod notifications;
pub mod pricing;
pub mod query_cache;
pub mod serde_util;
pub mod services;
pub mod session;
pub mod types;
