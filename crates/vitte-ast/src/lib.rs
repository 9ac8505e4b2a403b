//! Arena-backed AST for the Vitte core and phrase surfaces.
//!
//! Nodes are stored by value in an append-only [`Ast`], addressed by
//! [`NodeId`]. There are no back-pointers and no `Box`-based recursion:
//! every child reference is a smaller `NodeId` into the same arena.

mod kind;
mod ops;
mod store;

pub use kind::NodeKind;
pub use ops::{BinOp, EntryKind, UnOp};
pub use store::{Ast, NodeId};
