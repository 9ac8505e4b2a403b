//! Structural type interner for the Vitte front-end.
//!
//! `builtin`/`nominal`/`fn_type` all dedup on the way in, so two calls that
//! describe the same type always return the same [`TypeId`] — which makes
//! [`TypeInterner::equal`] a plain id comparison regardless of kind.

mod builtin;
mod interner;

pub use builtin::BuiltinType;
pub use interner::{TypeId, TypeInterner};
