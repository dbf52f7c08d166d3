//! Partitioning instructions into basic blocks
//!
//! A block is a maximal straight-line run: one entry at the top, one exit at the bottom. The
//! partitioner walks a FIFO worklist of discovered block starts, claiming instructions forward
//! from each start until the run must end. A run ends at an instruction with explicit targets
//! or no fallthrough, before an instruction some other edge also enters (more than one normal
//! predecessor, or already claimed), and before a forced start (an exception handler entry).
//!
//! Only claimed instructions become blocks, so dead code never appears in the block graph; a
//! handler whose protected range is itself dead stays out too, since handlers are discovered
//! through the instructions they cover.

use crate::bytecode::{InsnOrder, MethodCode};
use crate::graph::cfg::ControlFlowGraph;
use std::collections::VecDeque;
use std::fmt;

/// Index of a basic block within its method's block graph
#[derive(Copy, Clone, Hash, Eq, PartialEq, PartialOrd, Ord)]
pub struct BlockId(pub usize);

impl fmt::Debug for BlockId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_fmt(format_args!("b{}", self.0))
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "b{}", self.0)
    }
}

/// A maximal straight-line run of instructions, orders `[start, end)`
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct BasicBlock {
    pub id: BlockId,
    pub start: InsnOrder,
    pub end: InsnOrder,
}

impl BasicBlock {
    pub fn orders(&self) -> impl Iterator<Item = InsnOrder> {
        (self.start.0..self.end.0).map(InsnOrder)
    }

    pub fn last(&self) -> InsnOrder {
        InsnOrder(self.end.0 - 1)
    }

    pub fn len(&self) -> usize {
        self.end.0 - self.start.0
    }

    pub fn is_empty(&self) -> bool {
        self.end.0 == self.start.0
    }

    pub fn contains(&self, order: InsnOrder) -> bool {
        self.start <= order && order < self.end
    }
}

impl fmt::Display for BasicBlock {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{} [{}, {})", self.id, self.start, self.end)
    }
}

/// The reachable part of a method partitioned into blocks, with block-level edges
#[derive(Debug)]
pub struct BasicBlockGraph {
    blocks: Vec<BasicBlock>,
    block_of: Vec<Option<BlockId>>,
    successors: Vec<Vec<BlockId>>,
    predecessors: Vec<Vec<BlockId>>,
    exceptional_successors: Vec<Vec<BlockId>>,
}

impl BasicBlockGraph {
    pub fn build(code: &MethodCode, cfg: &ControlFlowGraph) -> BasicBlockGraph {
        let len = code.instructions.len();
        let forced = cfg.handler_entries();

        let mut blocks: Vec<BasicBlock> = vec![];
        let mut block_of: Vec<Option<BlockId>> = vec![None; len];
        let mut worklist: VecDeque<InsnOrder> = VecDeque::new();
        if len > 0 {
            worklist.push_back(InsnOrder(0));
        }

        while let Some(start) = worklist.pop_front() {
            if block_of[start.0].is_some() {
                continue;
            }
            let id = BlockId(blocks.len());
            let mut order = start;
            loop {
                block_of[order.0] = Some(id);
                // Covered instructions discover their handler
                worklist.extend(cfg.exceptional_successors_of(order).iter().copied());

                if code.instructions[order.0].is_block_end() {
                    break;
                }
                let next = order.next();
                if next.0 >= len
                    || forced.contains(&next)
                    || block_of[next.0].is_some()
                    || cfg.predecessors_of(next).len() != 1
                {
                    break;
                }
                order = next;
            }
            worklist.extend(cfg.successors_of(order).iter().copied());
            blocks.push(BasicBlock {
                id,
                start,
                end: order.next(),
            });
        }

        let mut successors: Vec<Vec<BlockId>> = vec![vec![]; blocks.len()];
        let mut predecessors: Vec<Vec<BlockId>> = vec![vec![]; blocks.len()];
        let mut exceptional_successors: Vec<Vec<BlockId>> = vec![vec![]; blocks.len()];
        for block in &blocks {
            for target in cfg.successors_of(block.last()) {
                let target_block =
                    block_of[target.0].expect("normal edge leads outside every block");
                if !successors[block.id.0].contains(&target_block) {
                    successors[block.id.0].push(target_block);
                    predecessors[target_block.0].push(block.id);
                }
            }
            for order in block.orders() {
                for handler in cfg.exceptional_successors_of(order) {
                    let handler_block =
                        block_of[handler.0].expect("handler entry leads outside every block");
                    if !exceptional_successors[block.id.0].contains(&handler_block) {
                        exceptional_successors[block.id.0].push(handler_block);
                    }
                }
            }
        }

        BasicBlockGraph {
            blocks,
            block_of,
            successors,
            predecessors,
            exceptional_successors,
        }
    }

    /// The block holding the first instruction; `None` only for an empty body
    pub fn entry(&self) -> Option<BlockId> {
        self.block_of.first().copied().flatten()
    }

    pub fn blocks(&self) -> &[BasicBlock] {
        &self.blocks
    }

    pub fn block(&self, id: BlockId) -> &BasicBlock {
        &self.blocks[id.0]
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// The block claiming this instruction; `None` for dead code
    pub fn block_at(&self, order: InsnOrder) -> Option<BlockId> {
        self.block_of.get(order.0).copied().flatten()
    }

    pub fn successors_of(&self, id: BlockId) -> &[BlockId] {
        &self.successors[id.0]
    }

    pub fn predecessors_of(&self, id: BlockId) -> &[BlockId] {
        &self.predecessors[id.0]
    }

    pub fn exceptional_successors_of(&self, id: BlockId) -> &[BlockId] {
        &self.exceptional_successors[id.0]
    }
}
