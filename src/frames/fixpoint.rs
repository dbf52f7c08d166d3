//! Frame fixpoint over the block graph
//!
//! Frames propagate forwards: every block's resolved input is the join of the layouts arriving
//! over its incoming edges, and its output is its input threaded through its instructions. The
//! worklist starts at the entry block, whose input is an empty stack plus the argument slots,
//! and requeues a block whenever a merge widens its input. Joins only ever grow the type-sets
//! and never change the stack depth, so the iteration converges.
//!
//! Exception edges carry a different layout than normal edges. At every instruction covered by
//! a protected range the locals in force just before it are folded into the handler's input,
//! under a stack holding only the thrown reference. The minimal layouts from
//! [`StackManipulation::minimal_before`] are kept alongside the resolved ones and never merged
//! into them; they answer what a block requires, not what reaches it.

use crate::bytecode::{InsnOrder, MethodCode};
use crate::errors::{AnalysisError, Result};
use crate::frames::layout::{FrameLayout, FrameTable};
use crate::frames::manipulation::StackManipulation;
use crate::graph::{BasicBlockGraph, BlockId, ControlFlowGraph};
use std::collections::VecDeque;

#[derive(Default)]
struct BlockState {
    input: Option<FrameLayout>,
    output: Option<FrameLayout>,
    /// The input widened since this block was last threaded
    input_changed: bool,
    /// The last threading changed the output, so successors were remerged
    outputs_changed: bool,
}

/// Resolved and minimal frame layouts for one method
#[derive(Debug)]
pub struct MethodFrames {
    inputs: Vec<Option<FrameLayout>>,
    outputs: Vec<Option<FrameLayout>>,
    minimal_before: Vec<FrameLayout>,
    minimal_after: Vec<FrameLayout>,
    instruction_frames: Option<FrameTable>,
}

impl MethodFrames {
    /// Join of everything arriving at the block; `None` if no edge ever reached it
    pub fn input(&self, block: BlockId) -> Option<&FrameLayout> {
        self.inputs.get(block.0)?.as_ref()
    }

    /// The block's input threaded through its instructions
    pub fn output(&self, block: BlockId) -> Option<&FrameLayout> {
        self.outputs.get(block.0)?.as_ref()
    }

    /// The shallowest stack the block can execute on, independent of what reaches it
    pub fn minimal_before(&self, block: BlockId) -> &FrameLayout {
        &self.minimal_before[block.0]
    }

    /// The layout after running the block on its minimal input
    pub fn minimal_after(&self, block: BlockId) -> &FrameLayout {
        &self.minimal_after[block.0]
    }

    /// Per-instruction layouts; `None` when their computation was switched off
    pub fn instruction_frames(&self) -> Option<&FrameTable> {
        self.instruction_frames.as_ref()
    }
}

/// Solves the frame fixpoint for `code` over its block graph
pub fn solve(
    code: &MethodCode,
    cfg: &ControlFlowGraph,
    graph: &BasicBlockGraph,
    instruction_frames: bool,
) -> Result<MethodFrames> {
    let mut states: Vec<BlockState> = (0..graph.len()).map(|_| BlockState::default()).collect();
    let mut minimal_before = Vec::with_capacity(graph.len());
    let mut minimal_after = Vec::with_capacity(graph.len());
    for block in graph.blocks() {
        let manipulation = StackManipulation::for_block(code, block);
        minimal_before.push(manipulation.minimal_before()?);
        minimal_after.push(manipulation.minimal_after()?);
    }

    let mut worklist = VecDeque::new();
    if let Some(entry) = graph.entry() {
        states[entry.0].input = Some(FrameLayout::entry(code.entry_locals()));
        states[entry.0].input_changed = true;
        worklist.push_back(entry);
    }

    while let Some(block_id) = worklist.pop_front() {
        if !states[block_id.0].input_changed {
            continue;
        }
        states[block_id.0].input_changed = false;
        let input = states[block_id.0]
            .input
            .clone()
            .expect("a queued block always has an input");
        log::trace!(
            "threading {:?} under a stack of depth {}",
            block_id,
            input.stack_depth()
        );

        let block = graph.block(block_id);
        let mut handler_layouts: Vec<(InsnOrder, FrameLayout)> = vec![];
        let output = StackManipulation::for_block(code, block).apply_with(&input, |insn, before, _| {
            for handler in cfg.exceptional_successors_of(insn.order) {
                handler_layouts.push((*handler, FrameLayout::handler(before.locals.clone())));
            }
        })?;

        let changed = states[block_id.0]
            .output
            .as_ref()
            .map(|existing| existing != &output)
            .unwrap_or(true);
        states[block_id.0].outputs_changed = changed;
        if states[block_id.0].outputs_changed {
            states[block_id.0].output = Some(output.clone());
            for successor in graph.successors_of(block_id) {
                merge_into(&mut states, &mut worklist, code, graph, *successor, &output)?;
            }
        }
        for (entry_order, layout) in handler_layouts {
            let handler = graph
                .block_at(entry_order)
                .expect("handlers of live code are partitioned");
            merge_into(&mut states, &mut worklist, code, graph, handler, &layout)?;
        }
    }

    let instruction_frames = if instruction_frames {
        let mut table = FrameTable::empty(code.instructions.len());
        for (index, state) in states.iter().enumerate() {
            let input = match &state.input {
                Some(input) => input,
                None => continue,
            };
            let block = graph.block(BlockId(index));
            StackManipulation::for_block(code, block).apply_with(input, |insn, before, after| {
                table.record(insn.order, before.clone(), after.clone());
            })?;
        }
        Some(table)
    } else {
        None
    };

    Ok(MethodFrames {
        inputs: states.iter().map(|state| state.input.clone()).collect(),
        outputs: states.into_iter().map(|state| state.output).collect(),
        minimal_before,
        minimal_after,
        instruction_frames,
    })
}

fn merge_into(
    states: &mut [BlockState],
    worklist: &mut VecDeque<BlockId>,
    code: &MethodCode,
    graph: &BasicBlockGraph,
    target: BlockId,
    arriving: &FrameLayout,
) -> Result<()> {
    let state = &mut states[target.0];
    let widened = match &mut state.input {
        None => {
            state.input = Some(arriving.clone());
            true
        }
        Some(existing) => existing.merge_from(arriving).map_err(|kind| {
            let entry = graph.block(target).start;
            AnalysisError::frame(code.instructions[entry.0].label(), kind)
        })?,
    };
    if widened && !state.input_changed {
        state.input_changed = true;
        worklist.push_back(target);
    }
    Ok(())
}
