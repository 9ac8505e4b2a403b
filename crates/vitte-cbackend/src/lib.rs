//! C source backend: identifier mangling and a streaming emitter, used by
//! the driver's `--emit c` path (§4.8, §4.9 step 6).

mod emit;
mod mangle;

pub use emit::{EmitError, Emitter};
pub use mangle::{fnv1a32, mangle, sanitize_ident, temp_name, Kind};
