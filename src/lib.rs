//! Control-flow and type-flow analysis for JVM bytecode
//!
//! Feed a method body in through [`bytecode::MethodBuilder`], visitor-style, and [`analyze`]
//! turns it into a queryable [`MethodAnalysis`]: the instruction-level control-flow graph, the
//! basic-block partition over it, and resolved frame layouts telling you which type-sets can
//! occupy every stack entry and local slot at every reachable point.
//!
//! The analysis tracks sets of primitive type tags rather than single types, because bytecode
//! alone does not always determine one: `javac` compiles `boolean`, `byte`, `short` and `char`
//! arithmetic down to plain int instructions. A value keeps the narrowest set its producer
//! justifies (`iconst_1` pushes exactly `{INT}`), widens only where control-flow paths merge,
//! and narrows back down where a declared variable type or a descriptor pins it. Ambiguity is
//! an answer here, not an error; only genuine impossibilities (stack underflow, operands
//! outside every verification family an instruction accepts, merge depth mismatches) fail.
//!
//! Completed analyses can be kept in an [`AnalysisPool`], keyed by class and method, for
//! whoever needs to query them repeatedly.

pub mod analysis;
pub mod bytecode;
pub mod errors;
pub mod frames;
pub mod graph;
pub mod pool;
pub mod util;

pub use analysis::{analyze, AnalysisOptions, MethodAnalysis};
pub use errors::{AnalysisError, FrameErrorKind, Result};
pub use pool::AnalysisPool;
