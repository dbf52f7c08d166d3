//! The bytecode-level model: opcodes, descriptors, instructions and variable tables
//!
//! A method body enters the crate through [`MethodBuilder`], visitor-style, and comes out as a
//! [`MethodCode`]: an immutable arena of [`Instruction`]s indexed by [`InsnOrder`], plus the
//! resolved variable table and try-catch ranges. Everything downstream (graphs, frames) reads
//! from that arena and never mutates it.

mod builder;
mod descriptors;
mod instruction;
mod opcode;
mod types;
mod variables;

pub use builder::*;
pub use descriptors::*;
pub use instruction::*;
pub use opcode::*;
pub use types::*;
pub use variables::*;
