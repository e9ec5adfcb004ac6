//! Core types shared by the Venice compiler and virtual machine.
//!
//! - [`Span`]: source locations carried by syntax nodes and compile errors
//! - [`TypeHash`]: declaration identity for classes and enums
//! - [`Builtin`]: the closed set of builtin functions and methods
//! - error types for every phase, see [`error`]

pub mod builtin;
pub mod error;
mod span;
mod type_hash;

pub use builtin::{Builtin, Receiver};
pub use error::{BytecodeError, CompileError, RuntimeError, TypeError, VeniceError};
pub use span::Span;
pub use type_hash::TypeHash;
