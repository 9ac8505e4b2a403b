//! Drives one compile job from registered source text to rendered
//! diagnostics and (optionally) emitted C source (§4.9).

mod codegen;
mod options;
mod pipeline;
mod resolve;
mod session;
mod target;

pub use options::{CompileOptions, EmitTarget, Surface};
pub use pipeline::{compile, CompileResult};
pub use resolve::resolve_module;
pub use session::Session;
pub use target::TargetTriple;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("no such registered file")]
    UnknownFile,
    #[error("requested emit target is not supported by this front-end")]
    UnsupportedEmitTarget,
}
