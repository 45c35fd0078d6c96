// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # wiretype - hash-tagged binary wire format runtime
//!
//! Runtime support for the message artifacts produced by `wiretype-gen`:
//! type descriptors, a structural-hash dispatch table, and zero-copy views
//! over message payloads.
//!
//! A message on the wire is `[8-byte structural type hash, LE][field
//! payload]`. The payload is a plain concatenation of little-endian field
//! encodings in declared order with no padding; strings and byte blocks are
//! u32-length-prefixed. A receiver that does not know the static type of an
//! incoming buffer reads the hash prefix and resolves a decode routine
//! through the [`DispatchTable`]:
//!
//! ```rust,no_run
//! use wiretype::{DispatchTable, Result};
//!
//! fn consume(table: &DispatchTable, buffer: &[u8]) -> Result<()> {
//!     let view = table.decode(buffer)?;
//!     println!("{} ({} payload bytes)", view.type_name(), view.payload().len());
//!     Ok(())
//! }
//! ```
//!
//! ## Modules Overview
//!
//! - [`core`] - type descriptors and bounds-checked wire cursors
//! - [`dispatch`] - structural-hash dispatch table and decode entry point
//! - [`view`] - type-erased zero-copy message views
//! - [`value`] - descriptor-driven encoding for producers without
//!   generated code
//!
//! ## Lifetime contract
//!
//! Views borrow the caller's buffer and never copy or extend its lifetime.
//! The transport delivering the buffer must keep it alive for all
//! outstanding view uses. Generated per-type views additionally trust the
//! buffer to cover the declared layout and perform no bounds checks.

/// Core wire-format building blocks (descriptors, cursors).
pub mod core;
/// Structural-hash dispatch table and decode entry point.
pub mod dispatch;
/// Runtime error type.
pub mod error;
/// Descriptor-driven message encoding.
pub mod value;
/// Type-erased zero-copy message views.
pub mod view;

pub use crate::core::ser::{Cursor, CursorMut, SerError, SerResult};
pub use crate::core::types::{
    FieldLayout, FieldType, PrimitiveKind, TypeDescriptor, DYNAMIC_OFFSET, HASH_PREFIX_LEN,
    VARIABLE_SIZE,
};
pub use dispatch::{DecodeFn, DispatchEntry, DispatchTable};
pub use error::{Error, Result};
pub use value::{encode_message, FieldValue};
pub use view::MessageView;
