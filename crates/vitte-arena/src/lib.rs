//! Bump arena and string interner backing one compile session.
//!
//! Both types are append-only: nothing allocated through them is ever freed
//! or moved individually. Dropping the owning session frees everything at
//! once, matching the spec's "dispose walks and frees" contract.

mod arena;
mod interner;

pub use arena::{Arena, ArenaRef};
pub use interner::{InternedStr, Interner};
