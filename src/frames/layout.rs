//! Frame layouts
//!
//! A [`FrameLayout`] is the abstract machine state at one program point: the operand stack as a
//! vector of type-sets (index 0 is the deepest entry) and the local slots known to hold a value,
//! each with its type-set. Joining two layouts merges what different control-flow paths agree
//! on: stacks must match in depth and union pointwise; a local survives the join only if both
//! sides define it, and its set is the union of both sides.

use crate::bytecode::{InsnOrder, StackTypeSet};
use crate::errors::FrameErrorKind;
use std::collections::BTreeMap;

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct FrameLayout {
    /// Operand stack, deepest entry first
    pub stack: Vec<StackTypeSet>,
    /// Known local slots; the upper slot of a wide value is absent
    pub locals: BTreeMap<u16, StackTypeSet>,
}

impl FrameLayout {
    pub fn new() -> FrameLayout {
        FrameLayout {
            stack: vec![],
            locals: BTreeMap::new(),
        }
    }

    /// Layout at a method entry: empty stack, argument slots filled
    pub fn entry(locals: BTreeMap<u16, StackTypeSet>) -> FrameLayout {
        FrameLayout {
            stack: vec![],
            locals,
        }
    }

    /// Layout at an exception handler entry: the thrown reference alone on the stack
    pub fn handler(locals: BTreeMap<u16, StackTypeSet>) -> FrameLayout {
        FrameLayout {
            stack: vec![StackTypeSet::REFERENCE],
            locals,
        }
    }

    pub fn stack_depth(&self) -> usize {
        self.stack.len()
    }

    /// Pointwise union with another layout reaching the same point
    pub fn join(&self, other: &FrameLayout) -> Result<FrameLayout, FrameErrorKind> {
        let mut joined = self.clone();
        joined.merge_from(other)?;
        Ok(joined)
    }

    /// Union `other` into this layout; reports whether anything widened
    pub fn merge_from(&mut self, other: &FrameLayout) -> Result<bool, FrameErrorKind> {
        if self.stack.len() != other.stack.len() {
            return Err(FrameErrorKind::DepthMismatch {
                left: self.stack.len(),
                right: other.stack.len(),
            });
        }
        let mut changed = false;
        for (mine, theirs) in self.stack.iter_mut().zip(&other.stack) {
            let union = mine.union(*theirs);
            if union != *mine {
                *mine = union;
                changed = true;
            }
        }
        // A slot defined on only one incoming path is not defined after the merge
        let dropped: Vec<u16> = self
            .locals
            .keys()
            .filter(|slot| !other.locals.contains_key(slot))
            .copied()
            .collect();
        for slot in dropped {
            self.locals.remove(&slot);
            changed = true;
        }
        for (slot, mine) in self.locals.iter_mut() {
            let theirs = other.locals[slot];
            let union = mine.union(theirs);
            if union != *mine {
                *mine = union;
                changed = true;
            }
        }
        Ok(changed)
    }
}

impl Default for FrameLayout {
    fn default() -> FrameLayout {
        FrameLayout::new()
    }
}

/// Frame layouts before and after every reachable instruction, by order
#[derive(Debug)]
pub struct FrameTable {
    frames: Vec<Option<(FrameLayout, FrameLayout)>>,
}

impl FrameTable {
    pub(crate) fn empty(len: usize) -> FrameTable {
        FrameTable {
            frames: (0..len).map(|_| None).collect(),
        }
    }

    pub(crate) fn record(&mut self, order: InsnOrder, before: FrameLayout, after: FrameLayout) {
        self.frames[order.0] = Some((before, after));
    }

    /// Layout on entry to the instruction; `None` for dead code
    pub fn before(&self, order: InsnOrder) -> Option<&FrameLayout> {
        self.frames.get(order.0)?.as_ref().map(|(before, _)| before)
    }

    /// Layout after the instruction completes; `None` for dead code
    pub fn after(&self, order: InsnOrder) -> Option<&FrameLayout> {
        self.frames.get(order.0)?.as_ref().map(|(_, after)| after)
    }
}
