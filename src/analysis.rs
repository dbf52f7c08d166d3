//! Whole-method analysis
//!
//! [`analyze`] ties the layers together: it takes the instruction stream a builder produced,
//! reconstructs a variable table when the class file shipped without one, derives the
//! instruction-level and block-level graphs and resolves the frame fixpoint over them. The
//! result is a [`MethodAnalysis`] that answers queries about any program point; methods without
//! a body (abstract or native ones) analyze to `None` rather than an error.

use crate::bytecode::{Instruction, InsnOrder, MethodCode, MethodRef, VariableTable};
use crate::errors::Result;
use crate::frames::{solve, FrameLayout, MethodFrames};
use crate::graph::{BasicBlockGraph, BlockId, ControlFlowGraph};

#[derive(Clone, Debug)]
pub struct AnalysisOptions {
    /// Keep frame layouts per instruction, not only per block
    pub instruction_frames: bool,
    /// Reconstruct a variable table from access patterns when none was compiled in
    pub reconstruct_variables: bool,
}

impl Default for AnalysisOptions {
    fn default() -> AnalysisOptions {
        AnalysisOptions {
            instruction_frames: true,
            reconstruct_variables: true,
        }
    }
}

/// Everything the analysis learned about one method body
#[derive(Debug)]
pub struct MethodAnalysis {
    code: MethodCode,
    cfg: ControlFlowGraph,
    blocks: BasicBlockGraph,
    frames: MethodFrames,
}

/// Analyzes one method body. Returns `None` when there is nothing to analyze.
pub fn analyze(code: MethodCode, options: &AnalysisOptions) -> Result<Option<MethodAnalysis>> {
    let mut code = code;
    if code.instructions.is_empty() {
        log::debug!("{} has no body to analyze", code.method);
        return Ok(None);
    }
    if options.reconstruct_variables && code.variables.is_empty() {
        log::debug!("{} carries no variable table, reconstructing one", code.method);
        code.variables = VariableTable::reconstruct(&code.instructions);
    }

    let cfg = ControlFlowGraph::build(&code);
    let blocks = BasicBlockGraph::build(&code, &cfg);
    let frames = solve(&code, &cfg, &blocks, options.instruction_frames)?;
    log::debug!(
        "analyzed {}: {} instructions in {} blocks, {} unreachable",
        code.method,
        code.instructions.len(),
        blocks.len(),
        cfg.unreachable().len()
    );
    Ok(Some(MethodAnalysis {
        code,
        cfg,
        blocks,
        frames,
    }))
}

impl MethodAnalysis {
    pub fn method(&self) -> &MethodRef {
        &self.code.method
    }

    pub fn code(&self) -> &MethodCode {
        &self.code
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.code.instructions
    }

    pub fn instruction(&self, order: InsnOrder) -> Option<&Instruction> {
        self.code.instructions.get(order.0)
    }

    /// The variable table the analysis ran with, declared or reconstructed
    pub fn variables(&self) -> &VariableTable {
        &self.code.variables
    }

    pub fn cfg(&self) -> &ControlFlowGraph {
        &self.cfg
    }

    pub fn blocks(&self) -> &BasicBlockGraph {
        &self.blocks
    }

    pub fn frames(&self) -> &MethodFrames {
        &self.frames
    }

    pub fn block_of(&self, order: InsnOrder) -> Option<BlockId> {
        self.blocks.block_at(order)
    }

    pub fn is_reachable(&self, order: InsnOrder) -> bool {
        self.cfg.is_reachable(order)
    }

    /// Frame layout on entry to the instruction, if instruction frames were kept and the
    /// instruction is reachable
    pub fn frame_before(&self, order: InsnOrder) -> Option<&FrameLayout> {
        self.frames.instruction_frames()?.before(order)
    }

    /// Frame layout after the instruction, under the same conditions
    pub fn frame_after(&self, order: InsnOrder) -> Option<&FrameLayout> {
        self.frames.instruction_frames()?.after(order)
    }
}
