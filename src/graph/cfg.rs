//! Instruction-level control flow
//!
//! [`ControlFlowGraph::build`] derives every edge of a method body once, up front, from the
//! immutable instruction arena. Normal edges are fallthrough plus the explicit jump, switch and
//! subroutine targets; `ret` resumption edges are recovered by matching each `ret` to the `jsr`
//! instructions whose subroutine can reach it. Exceptional edges (from every instruction inside
//! a protected range to its handler) are kept separate from the normal edges so that block
//! partitioning and fallthrough reasoning never see them.
//!
//! The graph stores adjacency by [`InsnOrder`], not instruction references, so it stays plain
//! data alongside the arena it was built from.

use crate::bytecode::{InsnOrder, InstructionKind, MethodCode};
use std::collections::{BTreeMap, BTreeSet, VecDeque};

#[derive(Debug)]
pub struct ControlFlowGraph {
    len: usize,
    successors: Vec<Vec<InsnOrder>>,
    predecessors: Vec<Vec<InsnOrder>>,
    exceptional_successors: Vec<Vec<InsnOrder>>,
    /// Orders where an exception handler begins
    handler_entries: BTreeSet<InsnOrder>,
    /// Orders no walk from the entry reaches, over normal and exceptional edges combined
    unreachable: BTreeSet<InsnOrder>,
}

impl ControlFlowGraph {
    pub fn build(code: &MethodCode) -> ControlFlowGraph {
        let len = code.instructions.len();
        let mut successors: Vec<Vec<InsnOrder>> = vec![vec![]; len];

        for insn in &code.instructions {
            let mut targets = insn.successors();
            if insn.falls_through() && insn.order.0 + 1 < len {
                targets.push(insn.order.next());
            }
            let out = &mut successors[insn.order.0];
            for target in targets {
                if !out.contains(&target) {
                    out.push(target);
                }
            }
        }

        for (ret, resume) in subroutine_resumptions(code, &successors) {
            let out = &mut successors[ret.0];
            if !out.contains(&resume) {
                out.push(resume);
            }
        }

        let mut predecessors: Vec<Vec<InsnOrder>> = vec![vec![]; len];
        for (order, targets) in successors.iter().enumerate() {
            for target in targets {
                predecessors[target.0].push(InsnOrder(order));
            }
        }

        let mut exceptional_successors: Vec<Vec<InsnOrder>> = vec![vec![]; len];
        let mut handler_entries = BTreeSet::new();
        for range in &code.try_catches {
            handler_entries.insert(range.handler);
            for order in range.start.0..range.end.0.min(len) {
                let out = &mut exceptional_successors[order];
                if !out.contains(&range.handler) {
                    out.push(range.handler);
                }
            }
        }

        let unreachable = sweep(len, &successors, &exceptional_successors);

        for insn in &code.instructions {
            if insn.falls_through()
                && insn.order.0 + 1 == len
                && !unreachable.contains(&insn.order)
            {
                log::warn!("execution can fall off the end of {}", code.method);
            }
        }

        ControlFlowGraph {
            len,
            successors,
            predecessors,
            exceptional_successors,
            handler_entries,
            unreachable,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Normal (non-exceptional) successors, including resolved `ret` resumption points
    pub fn successors_of(&self, order: InsnOrder) -> &[InsnOrder] {
        &self.successors[order.0]
    }

    /// Normal predecessors
    pub fn predecessors_of(&self, order: InsnOrder) -> &[InsnOrder] {
        &self.predecessors[order.0]
    }

    /// Handlers reachable from this instruction when it throws
    pub fn exceptional_successors_of(&self, order: InsnOrder) -> &[InsnOrder] {
        &self.exceptional_successors[order.0]
    }

    pub fn handler_entries(&self) -> &BTreeSet<InsnOrder> {
        &self.handler_entries
    }

    pub fn is_reachable(&self, order: InsnOrder) -> bool {
        order.0 < self.len && !self.unreachable.contains(&order)
    }

    pub fn unreachable(&self) -> &BTreeSet<InsnOrder> {
        &self.unreachable
    }
}

/// Match every `ret` to the `jsr` calls it can return for.
///
/// A subroutine is identified by its entry (some `jsr`'s target). Walking forward from the
/// entry over normal flow, skipping over nested `jsr`s to their resumption point and stopping
/// at `ret`, finds the `ret`s belonging to that entry; each then resumes after every `jsr`
/// targeting the entry. Subroutines sharing tail code over-approximate: the shared `ret` gets
/// the resumption points of both callers.
fn subroutine_resumptions(
    code: &MethodCode,
    successors: &[Vec<InsnOrder>],
) -> Vec<(InsnOrder, InsnOrder)> {
    let len = code.instructions.len();
    let mut callers: BTreeMap<InsnOrder, Vec<InsnOrder>> = BTreeMap::new();
    for insn in &code.instructions {
        if let InstructionKind::Subroutine { target } = &insn.kind {
            callers.entry(*target).or_default().push(insn.order);
        }
    }

    let mut resumptions = vec![];
    for (entry, jsr_orders) in &callers {
        let mut visited = BTreeSet::new();
        let mut stack = vec![*entry];
        while let Some(order) = stack.pop() {
            if !visited.insert(order) {
                continue;
            }
            match &code.instructions[order.0].kind {
                InstructionKind::Ret { .. } => {
                    for jsr in jsr_orders {
                        if jsr.0 + 1 < len {
                            resumptions.push((order, jsr.next()));
                        }
                    }
                }
                InstructionKind::Subroutine { .. } => {
                    if order.0 + 1 < len {
                        stack.push(order.next());
                    }
                }
                _ => stack.extend(successors[order.0].iter().copied()),
            }
        }
    }

    for insn in &code.instructions {
        if matches!(insn.kind, InstructionKind::Ret { .. })
            && !resumptions.iter().any(|(ret, _)| *ret == insn.order)
        {
            log::warn!("no jsr reaches the ret at {}", insn.label());
        }
    }

    resumptions
}

fn sweep(
    len: usize,
    successors: &[Vec<InsnOrder>],
    exceptional: &[Vec<InsnOrder>],
) -> BTreeSet<InsnOrder> {
    let mut visited = BTreeSet::new();
    if len > 0 {
        let mut queue = VecDeque::from([InsnOrder(0)]);
        while let Some(order) = queue.pop_front() {
            if !visited.insert(order) {
                continue;
            }
            queue.extend(successors[order.0].iter().copied());
            queue.extend(exceptional[order.0].iter().copied());
        }
    }
    (0..len)
        .map(InsnOrder)
        .filter(|order| !visited.contains(order))
        .collect()
}
