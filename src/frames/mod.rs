//! Abstract operand-stack and local-slot state
//!
//! Layouts describe what type-sets occupy the stack and locals at a program point, the
//! manipulation walks them through instruction runs, and the fixpoint resolves them across the
//! whole block graph.

mod fixpoint;
mod layout;
mod manipulation;

pub use fixpoint::*;
pub use layout::*;
pub use manipulation::*;
