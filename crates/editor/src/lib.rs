//! salesdesk-editor — async orchestration of one cart line editor.
//!
//! [`EditorController`] owns the lifecycle of an
//! [`EditorSession`](salesdesk_core::session::EditorSession): it fetches
//! configuration data through the `salesdesk-core` service traits, drives
//! toggles and quantity edits, spawns lazy photo fetches, and hands the
//! final payload to the cart service on save.

pub mod controller;

pub use controller::{CloseOutcome, EditorController, EditorError};
