// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Runtime error type shared across dispatch, views, and encoding.

use crate::core::ser::SerError;
use std::fmt;

/// Errors surfaced by the runtime decode/encode paths.
///
/// `UnknownType` and `TruncatedHeader` are recoverable by the caller (log
/// and drop the message); the remaining variants indicate misassembly or
/// misuse and are reported at startup or at the offending call site.
#[derive(Debug)]
pub enum Error {
    /// Buffer shorter than the 8-byte structural-hash prefix.
    TruncatedHeader { len: usize },
    /// No dispatch entry matches the leading structural hash.
    UnknownType { hash: u64 },
    /// Two dispatch entries carry the same structural hash (table assembly).
    DuplicateHash {
        hash: u64,
        first: &'static str,
        second: &'static str,
    },
    /// Named field does not exist on the descriptor.
    FieldNotFound(String),
    /// Typed access against a field of a different kind.
    FieldMismatch {
        field: &'static str,
        expected: &'static str,
    },
    /// Cursor-level serialization failure.
    Ser(SerError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::TruncatedHeader { len } => {
                write!(f, "buffer too short for hash prefix: {} bytes", len)
            }
            Error::UnknownType { hash } => {
                write!(f, "no dispatch entry for type hash {:#018X}", hash)
            }
            Error::DuplicateHash { hash, first, second } => write!(
                f,
                "duplicate type hash {:#018X}: {} vs {}",
                hash, first, second
            ),
            Error::FieldNotFound(name) => write!(f, "field not found: {}", name),
            Error::FieldMismatch { field, expected } => {
                write!(f, "field {} is not of type {}", field, expected)
            }
            Error::Ser(err) => write!(f, "serialization error: {}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Ser(err) => Some(err),
            _ => None,
        }
    }
}

impl From<SerError> for Error {
    fn from(err: SerError) -> Self {
        Error::Ser(err)
    }
}

pub type Result<T> = core::result::Result<T, Error>;
