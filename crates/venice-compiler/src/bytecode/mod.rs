//! Bytecode types for the Venice compiler.
//!
//! - [`Instruction`] - The instruction set for the VM
//! - [`CompiledProgram`] - Versioned per-function instruction lists
//! - text (de)serialization via [`CompiledProgram::to_text`] and
//!   [`CompiledProgram::parse`]

mod instruction;
mod program;
mod text;

pub use instruction::{FunctionRef, Instruction};
pub use program::{CompiledProgram, ENTRY_FUNCTION, Import};
