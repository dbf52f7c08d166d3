//! Control-flow structure over the instruction arena
//!
//! [`ControlFlowGraph`] holds the instruction-level edges, [`BasicBlockGraph`] the partition of
//! the reachable instructions into straight-line blocks and the edges between them.

mod blocks;
mod cfg;

pub use blocks::*;
pub use cfg::*;
