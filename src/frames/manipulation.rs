//! Per-instruction frame effects
//!
//! [`StackManipulation`] threads a [`FrameLayout`] through a run of instructions. Typed
//! instructions pop what [`Instruction::consumed_from_stack_with`] lists and push what
//! [`Instruction::pushed_to_stack_with`] reports; a popped entry is compatible with an
//! expectation when it shares at least one verification family with it, so an `{INT}` produced
//! by `iconst_1` satisfies an `istore` into a declared `boolean` without being widened first.
//! The raw stack shuffles (`dup`, `pop2`, `swap`, ...) are interpreted positionally instead:
//! they move entries by category, where one wide entry or two narrow ones form a unit, and an
//! attempt to split a wide entry is an error.
//!
//! Besides the forward walk this module answers two more questions about a run: what the frame
//! must have looked like before it, given the frame after it ([`StackManipulation::apply_backwards`]),
//! and what the shallowest stack is on which it can execute at all
//! ([`StackManipulation::minimal_before`] and [`StackManipulation::minimal_after`]), computed by
//! lending the run a fresh entry each time it reaches below the stack it started with.

use crate::bytecode::{Instruction, InstructionKind, MethodCode, StackOpKind, StackTypeSet, VariableTable};
use crate::errors::{AnalysisError, FrameErrorKind, Result};
use crate::frames::layout::FrameLayout;
use crate::graph::BasicBlock;

/// The step helpers report a bare [`FrameErrorKind`]; the public walks attach the instruction
type StepResult<T> = std::result::Result<T, FrameErrorKind>;

pub struct StackManipulation<'a> {
    instructions: &'a [Instruction],
    variables: &'a VariableTable,
}

impl<'a> StackManipulation<'a> {
    pub fn new(instructions: &'a [Instruction], variables: &'a VariableTable) -> StackManipulation<'a> {
        StackManipulation {
            instructions,
            variables,
        }
    }

    pub fn for_block(code: &'a MethodCode, block: &BasicBlock) -> StackManipulation<'a> {
        StackManipulation {
            instructions: &code.instructions[block.start.0..block.end.0],
            variables: &code.variables,
        }
    }

    /// Runs the instructions over `frame` and returns the layout after the last one
    pub fn apply(&self, frame: &FrameLayout) -> Result<FrameLayout> {
        self.apply_with(frame, |_, _, _| {})
    }

    /// Like [`StackManipulation::apply`], calling `observer` with the layouts before and after
    /// each instruction
    pub fn apply_with<F>(&self, frame: &FrameLayout, mut observer: F) -> Result<FrameLayout>
    where
        F: FnMut(&Instruction, &FrameLayout, &FrameLayout),
    {
        let mut current = frame.clone();
        for insn in self.instructions {
            let before = current.clone();
            self.step(&mut current, insn)
                .map_err(|kind| AnalysisError::frame(insn.label(), kind))?;
            observer(insn, &before, &current);
        }
        Ok(current)
    }

    /// Runs the instructions in reverse, mapping a layout after the run to one that could have
    /// produced it. Stack entries consumed by the run reappear as the sets the run demanded, and
    /// a local written inside the run is unknown before it, so it is dropped. The two `pop`
    /// opcodes leave no trace of what they discarded; undoing `pop` restores one `ANY` entry and
    /// undoing `pop2` restores two, which under-reports the depth when the popped value was wide.
    pub fn apply_backwards(&self, frame: &FrameLayout) -> Result<FrameLayout> {
        let mut current = frame.clone();
        for insn in self.instructions.iter().rev() {
            self.step_backwards(&mut current, insn)
                .map_err(|kind| AnalysisError::frame(insn.label(), kind))?;
        }
        Ok(current)
    }

    /// The shallowest stack this run can execute on. Entries the run demands from below its
    /// starting stack appear typed by what first consumed them; stack shuffles demand `ANY`.
    /// Minimal layouts carry no locals.
    pub fn minimal_before(&self) -> Result<FrameLayout> {
        Ok(self.minimal_run()?.0)
    }

    /// The layout after executing this run on [`StackManipulation::minimal_before`]
    pub fn minimal_after(&self) -> Result<FrameLayout> {
        Ok(self.minimal_run()?.1)
    }

    fn step(&self, frame: &mut FrameLayout, insn: &Instruction) -> StepResult<()> {
        if let InstructionKind::StackOp { op } = &insn.kind {
            return shuffle(
                OpStack {
                    stack: &mut frame.stack,
                    borrowed: None,
                },
                *op,
            );
        }

        let consumed = insn.consumed_from_stack_with(self.variables);
        if frame.stack.len() < consumed.len() {
            return Err(FrameErrorKind::StackUnderflow {
                needed: consumed.len(),
                found: frame.stack.len(),
            });
        }
        let split = frame.stack.len() - consumed.len();
        let popped: Vec<StackTypeSet> = frame.stack.drain(split..).collect();
        for (expected, actual) in consumed.iter().zip(&popped) {
            if actual.intersection(expected.verification_family()).is_empty() {
                return Err(FrameErrorKind::TypeContradiction {
                    expected: *expected,
                    found: *actual,
                });
            }
        }

        let pushed = match &insn.kind {
            InstructionKind::Load { slot, .. } => {
                let mut pushed = insn.pushed_to_stack_with(self.variables);
                if let Some(known) = frame.locals.get(slot) {
                    let refined = pushed.intersection(*known);
                    if refined.is_empty() {
                        log::trace!(
                            "{} finds {} in slot {} where {} was declared",
                            insn.label(),
                            known,
                            slot,
                            pushed
                        );
                    } else {
                        pushed = refined;
                    }
                }
                pushed
            }
            InstructionKind::Store { slot, .. } => {
                // consumed[0] is the declared expectation, already narrowed through the table
                let value = popped[0];
                let covered = self.variables.is_declared()
                    && self.variables.lifetime_for(*slot, insn.order, true).is_some();
                let written = if covered {
                    consumed[0]
                } else {
                    let refined = value.intersection(consumed[0].verification_family());
                    if refined.is_empty() {
                        consumed[0]
                    } else {
                        refined
                    }
                };
                write_local(&mut frame.locals, *slot, written);
                StackTypeSet::VOID
            }
            InstructionKind::IInc { slot } => {
                // javac only emits iinc for plain int locals
                write_local(&mut frame.locals, *slot, StackTypeSet::INT);
                StackTypeSet::VOID
            }
            _ => insn.pushed_to_stack_with(self.variables),
        };
        if pushed != StackTypeSet::VOID {
            frame.stack.push(pushed);
        }
        Ok(())
    }

    fn step_backwards(&self, frame: &mut FrameLayout, insn: &Instruction) -> StepResult<()> {
        if let InstructionKind::StackOp { op } = &insn.kind {
            return unshuffle(&mut frame.stack, *op);
        }
        let pushed = insn.pushed_to_stack_with(self.variables);
        if pushed != StackTypeSet::VOID {
            let found = frame.stack.pop().ok_or(FrameErrorKind::StackUnderflow {
                needed: 1,
                found: 0,
            })?;
            if found.intersection(pushed.verification_family()).is_empty() {
                return Err(FrameErrorKind::TypeContradiction {
                    expected: pushed,
                    found,
                });
            }
        }
        frame.stack.extend(insn.consumed_from_stack_with(self.variables));
        for slot in insn.writes_variables() {
            frame.locals.remove(&slot);
        }
        Ok(())
    }

    fn minimal_run(&self) -> Result<(FrameLayout, FrameLayout)> {
        let mut stack: Vec<StackTypeSet> = vec![];
        let mut borrowed: Vec<StackTypeSet> = vec![];
        for insn in self.instructions {
            if let InstructionKind::StackOp { op } = &insn.kind {
                shuffle(
                    OpStack {
                        stack: &mut stack,
                        borrowed: Some(&mut borrowed),
                    },
                    *op,
                )
                .map_err(|kind| AnalysisError::frame(insn.label(), kind))?;
                continue;
            }
            for expected in insn.consumed_from_stack_with(self.variables).iter().rev() {
                if stack.pop().is_none() {
                    borrowed.push(*expected);
                }
            }
            let pushed = insn.pushed_to_stack_with(self.variables);
            if pushed != StackTypeSet::VOID {
                stack.push(pushed);
            }
        }
        // borrow order runs from the top of the starting stack downwards
        let before = FrameLayout {
            stack: borrowed.into_iter().rev().collect(),
            locals: Default::default(),
        };
        let after = FrameLayout {
            stack,
            locals: Default::default(),
        };
        Ok((before, after))
    }
}

fn write_local(
    locals: &mut std::collections::BTreeMap<u16, StackTypeSet>,
    slot: u16,
    written: StackTypeSet,
) {
    locals.insert(slot, written);
    // a wide value claims the next slot, and writing over either half of a wide pair breaks it
    if written.category() == Some(2) {
        locals.remove(&(slot + 1));
    }
    if slot > 0 {
        let broke_pair = locals
            .get(&(slot - 1))
            .map(|below| below.category() == Some(2))
            .unwrap_or(false);
        if broke_pair {
            locals.remove(&(slot - 1));
        }
    }
}

/// Operand stack view for the positional shuffles. When `borrowed` is present, reaching below
/// the bottom lends an `ANY` entry and records it instead of underflowing.
struct OpStack<'s> {
    stack: &'s mut Vec<StackTypeSet>,
    borrowed: Option<&'s mut Vec<StackTypeSet>>,
}

impl OpStack<'_> {
    fn pop_any(&mut self) -> StepResult<StackTypeSet> {
        if let Some(found) = self.stack.pop() {
            return Ok(found);
        }
        match &mut self.borrowed {
            Some(borrowed) => {
                borrowed.push(StackTypeSet::ANY);
                Ok(StackTypeSet::ANY)
            }
            None => Err(FrameErrorKind::StackUnderflow {
                needed: 1,
                found: 0,
            }),
        }
    }

    fn pop_narrow(&mut self) -> StepResult<StackTypeSet> {
        let found = self.pop_any()?;
        if found.category() == Some(2) {
            return Err(FrameErrorKind::SplitWideEntry { found });
        }
        Ok(found)
    }

    /// One wide entry or two narrow ones, deepest first
    fn pop_unit(&mut self) -> StepResult<Vec<StackTypeSet>> {
        let top = self.pop_any()?;
        if top.category() == Some(2) {
            return Ok(vec![top]);
        }
        let below = self.pop_any()?;
        if below.category() == Some(2) {
            return Err(FrameErrorKind::SplitWideEntry { found: below });
        }
        Ok(vec![below, top])
    }
}

fn shuffle(mut stack: OpStack, op: StackOpKind) -> StepResult<()> {
    match op {
        StackOpKind::Pop => {
            stack.pop_narrow()?;
        }
        StackOpKind::Pop2 => {
            stack.pop_unit()?;
        }
        StackOpKind::Dup => {
            let v1 = stack.pop_narrow()?;
            stack.stack.extend([v1, v1]);
        }
        StackOpKind::DupX1 => {
            let v1 = stack.pop_narrow()?;
            let v2 = stack.pop_narrow()?;
            stack.stack.extend([v1, v2, v1]);
        }
        StackOpKind::DupX2 => {
            let v1 = stack.pop_narrow()?;
            let under = stack.pop_unit()?;
            stack.stack.push(v1);
            stack.stack.extend(under);
            stack.stack.push(v1);
        }
        StackOpKind::Dup2 => {
            let unit = stack.pop_unit()?;
            stack.stack.extend(unit.iter().copied());
            stack.stack.extend(unit);
        }
        StackOpKind::Dup2X1 => {
            let unit = stack.pop_unit()?;
            let v = stack.pop_narrow()?;
            stack.stack.extend(unit.iter().copied());
            stack.stack.push(v);
            stack.stack.extend(unit);
        }
        StackOpKind::Dup2X2 => {
            let unit = stack.pop_unit()?;
            let under = stack.pop_unit()?;
            stack.stack.extend(unit.iter().copied());
            stack.stack.extend(under);
            stack.stack.extend(unit);
        }
        StackOpKind::Swap => {
            let v1 = stack.pop_narrow()?;
            let v2 = stack.pop_narrow()?;
            stack.stack.extend([v1, v2]);
        }
    }
    Ok(())
}

/// Positional inverse of [`shuffle`], reading unit widths out of the after-state
fn unshuffle(stack: &mut Vec<StackTypeSet>, op: StackOpKind) -> StepResult<()> {
    let len = stack.len();
    match op {
        StackOpKind::Pop => stack.push(StackTypeSet::ANY),
        StackOpKind::Pop2 => stack.extend([StackTypeSet::ANY, StackTypeSet::ANY]),
        StackOpKind::Dup => {
            need(len, 2)?;
            stack.pop();
        }
        StackOpKind::DupX1 => {
            need(len, 3)?;
            stack.remove(len - 3);
        }
        StackOpKind::DupX2 => {
            need(len, 3)?;
            let under = if wide_at(stack, len - 2) { 1 } else { 2 };
            need(len, 2 + under)?;
            stack.remove(len - 2 - under);
        }
        StackOpKind::Dup2 => {
            need(len, 2)?;
            let unit = if wide_at(stack, len - 1) { 1 } else { 2 };
            need(len, 2 * unit)?;
            stack.truncate(len - unit);
        }
        StackOpKind::Dup2X1 => {
            need(len, 2)?;
            let unit = if wide_at(stack, len - 1) { 1 } else { 2 };
            need(len, 2 * unit + 1)?;
            stack.drain(len - 2 * unit - 1..len - unit - 1);
        }
        StackOpKind::Dup2X2 => {
            need(len, 2)?;
            let unit = if wide_at(stack, len - 1) { 1 } else { 2 };
            need(len, unit + 2)?;
            let under = if wide_at(stack, len - unit - 1) { 1 } else { 2 };
            need(len, 2 * unit + under)?;
            stack.drain(len - 2 * unit - under..len - unit - under);
        }
        StackOpKind::Swap => {
            return shuffle(
                OpStack {
                    stack,
                    borrowed: None,
                },
                StackOpKind::Swap,
            );
        }
    }
    Ok(())
}

fn wide_at(stack: &[StackTypeSet], index: usize) -> bool {
    stack[index].category() == Some(2)
}

fn need(len: usize, wanted: usize) -> StepResult<()> {
    if len < wanted {
        return Err(FrameErrorKind::StackUnderflow {
            needed: wanted,
            found: len,
        });
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::bytecode::{MethodAccessFlags, MethodBuilder, Opcode};

    fn build(descriptor: &str, record: impl FnOnce(&mut MethodBuilder)) -> MethodCode {
        let mut builder = MethodBuilder::new(
            "com/example/Probe",
            "run",
            descriptor,
            MethodAccessFlags::PUBLIC | MethodAccessFlags::STATIC,
        )
        .unwrap();
        record(&mut builder);
        builder.finish().unwrap()
    }

    fn whole<'a>(code: &'a MethodCode) -> StackManipulation<'a> {
        StackManipulation::new(&code.instructions, &code.variables)
    }

    #[test]
    fn threads_a_straight_line_run() {
        let code = build("()I", |b| {
            b.visit_insn(Opcode::IConst2).unwrap();
            b.visit_insn(Opcode::IConst3).unwrap();
            b.visit_insn(Opcode::IAdd).unwrap();
            b.visit_insn(Opcode::IReturn).unwrap();
        });
        let mut afters = vec![];
        let last = whole(&code)
            .apply_with(&FrameLayout::new(), |_, _, after| afters.push(after.clone()))
            .unwrap();
        assert_eq!(afters[1].stack, vec![StackTypeSet::INT, StackTypeSet::INT]);
        assert_eq!(afters[2].stack, vec![StackTypeSet::INT]);
        assert!(last.stack.is_empty());
    }

    #[test]
    fn stack_depth_follows_pop_push_accounting() {
        let code = build("(I[Ljava/lang/String;)V", |b| {
            b.visit_var_insn(Opcode::ILoad, 0).unwrap();
            b.visit_var_insn(Opcode::ALoad, 1).unwrap();
            b.visit_insn(Opcode::ArrayLength).unwrap();
            b.visit_insn(Opcode::IAdd).unwrap();
            b.visit_var_insn(Opcode::IStore, 2).unwrap();
            b.visit_field_insn(
                Opcode::GetStatic,
                "java/lang/System",
                "out",
                "Ljava/io/PrintStream;",
            )
            .unwrap();
            b.visit_var_insn(Opcode::ILoad, 2).unwrap();
            b.visit_method_insn(
                Opcode::InvokeVirtual,
                "java/io/PrintStream",
                "println",
                "(I)V",
            )
            .unwrap();
            b.visit_insn(Opcode::Return).unwrap();
        });
        let entry = FrameLayout::entry(code.entry_locals());
        whole(&code)
            .apply_with(&entry, |insn, before, after| {
                let consumed = insn.consumed_from_stack_with(&code.variables).len();
                let pushed = if insn.pushed_to_stack_with(&code.variables) == StackTypeSet::VOID {
                    0
                } else {
                    1
                };
                assert_eq!(
                    after.stack.len(),
                    before.stack.len() - consumed + pushed,
                    "at {}",
                    insn.label()
                );
            })
            .unwrap();
    }

    #[test]
    fn dup2_duplicates_one_wide_entry() {
        let code = build("(J)J", |b| {
            b.visit_var_insn(Opcode::LLoad, 0).unwrap();
            b.visit_insn(Opcode::Dup2).unwrap();
            b.visit_insn(Opcode::LAdd).unwrap();
            b.visit_insn(Opcode::LReturn).unwrap();
        });
        let mut depths = vec![];
        whole(&code)
            .apply_with(&FrameLayout::entry(code.entry_locals()), |_, _, after| {
                depths.push(after.stack.len())
            })
            .unwrap();
        assert_eq!(depths, vec![1, 2, 1, 0]);
    }

    #[test]
    fn dup2_duplicates_two_narrow_entries() {
        let code = build("()V", |b| {
            b.visit_insn(Opcode::IConst0).unwrap();
            b.visit_insn(Opcode::FConst0).unwrap();
            b.visit_insn(Opcode::Dup2).unwrap();
            b.visit_insn(Opcode::Pop2).unwrap();
            b.visit_insn(Opcode::Pop2).unwrap();
            b.visit_insn(Opcode::Return).unwrap();
        });
        let mut depths = vec![];
        whole(&code)
            .apply_with(&FrameLayout::new(), |_, _, after| depths.push(after.stack.len()))
            .unwrap();
        assert_eq!(depths, vec![1, 2, 4, 2, 0, 0]);
    }

    #[test]
    fn pop_rejects_a_wide_entry() {
        let code = build("(J)V", |b| {
            b.visit_var_insn(Opcode::LLoad, 0).unwrap();
            b.visit_insn(Opcode::Pop).unwrap();
            b.visit_insn(Opcode::Return).unwrap();
        });
        let err = whole(&code)
            .apply(&FrameLayout::entry(code.entry_locals()))
            .unwrap_err();
        match err {
            AnalysisError::Frame {
                kind: FrameErrorKind::SplitWideEntry { found },
                ..
            } => assert_eq!(found, StackTypeSet::LONG),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn underflow_is_reported() {
        let code = build("()V", |b| {
            b.visit_insn(Opcode::IAdd).unwrap();
            b.visit_insn(Opcode::Return).unwrap();
        });
        let err = whole(&code).apply(&FrameLayout::new()).unwrap_err();
        match err {
            AnalysisError::Frame {
                kind: FrameErrorKind::StackUnderflow { needed, found },
                ..
            } => {
                assert_eq!((needed, found), (2, 0));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn contradictory_operand_is_reported() {
        let code = build("()V", |b| {
            b.visit_insn(Opcode::FConst0).unwrap();
            b.visit_var_insn(Opcode::IStore, 0).unwrap();
            b.visit_insn(Opcode::Return).unwrap();
        });
        let err = whole(&code).apply(&FrameLayout::new()).unwrap_err();
        match err {
            AnalysisError::Frame {
                kind: FrameErrorKind::TypeContradiction { found, .. },
                ..
            } => assert_eq!(found, StackTypeSet::FLOAT),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn a_store_remembers_the_flowing_type() {
        // no local variable rows: the narrow {INT} from iconst_1 survives the round trip
        let code = build("()I", |b| {
            b.visit_insn(Opcode::IConst1).unwrap();
            b.visit_var_insn(Opcode::IStore, 0).unwrap();
            b.visit_var_insn(Opcode::ILoad, 0).unwrap();
            b.visit_insn(Opcode::IReturn).unwrap();
        });
        let mut afters = vec![];
        whole(&code)
            .apply_with(&FrameLayout::new(), |_, _, after| afters.push(after.clone()))
            .unwrap();
        assert_eq!(afters[1].locals.get(&0), Some(&StackTypeSet::INT));
        assert_eq!(afters[2].stack, vec![StackTypeSet::INT]);
    }

    #[test]
    fn a_declared_boolean_narrows_the_store() {
        let code = build("()Z", |b| {
            let start = b.new_label();
            let end = b.new_label();
            b.visit_insn(Opcode::IConst1).unwrap();
            b.visit_var_insn(Opcode::IStore, 0).unwrap();
            b.visit_label(start).unwrap();
            b.visit_var_insn(Opcode::ILoad, 0).unwrap();
            b.visit_insn(Opcode::IReturn).unwrap();
            b.visit_label(end).unwrap();
            b.visit_local_variable("flag", "Z", start, end, 0).unwrap();
        });
        let mut afters = vec![];
        whole(&code)
            .apply_with(&FrameLayout::new(), |_, _, after| afters.push(after.clone()))
            .unwrap();
        assert_eq!(afters[1].locals.get(&0), Some(&StackTypeSet::BOOLEAN));
        assert_eq!(afters[2].stack, vec![StackTypeSet::BOOLEAN]);
    }

    #[test]
    fn backwards_walk_recovers_an_empty_entry_stack() {
        let code = build("()I", |b| {
            b.visit_insn(Opcode::IConst1).unwrap();
            b.visit_insn(Opcode::IConst2).unwrap();
            b.visit_insn(Opcode::IAdd).unwrap();
            b.visit_insn(Opcode::IReturn).unwrap();
        });
        let after = whole(&code).apply(&FrameLayout::new()).unwrap();
        let recovered = whole(&code).apply_backwards(&after).unwrap();
        assert!(recovered.stack.is_empty());
    }

    #[test]
    fn backwards_walk_removes_the_deep_duplicate() {
        let code = build("()V", |b| {
            b.visit_insn(Opcode::IConst0).unwrap();
            b.visit_insn(Opcode::FConst0).unwrap();
            b.visit_insn(Opcode::DupX1).unwrap();
        });
        let shuffles = StackManipulation::new(&code.instructions[2..3], &code.variables);
        let after = FrameLayout {
            stack: vec![StackTypeSet::FLOAT, StackTypeSet::INT, StackTypeSet::FLOAT],
            locals: Default::default(),
        };
        let before = shuffles.apply_backwards(&after).unwrap();
        assert_eq!(before.stack, vec![StackTypeSet::INT, StackTypeSet::FLOAT]);
    }

    #[test]
    fn minimal_frames_borrow_only_whats_missing() {
        let code = build("()I", |b| {
            b.visit_insn(Opcode::IAdd).unwrap();
            b.visit_insn(Opcode::IReturn).unwrap();
        });
        let adding = StackManipulation::new(&code.instructions[0..1], &code.variables);
        assert_eq!(
            adding.minimal_before().unwrap().stack,
            vec![StackTypeSet::TWO_COMPLEMENT, StackTypeSet::TWO_COMPLEMENT]
        );
        assert_eq!(adding.minimal_after().unwrap().stack, vec![StackTypeSet::INT]);
    }

    #[test]
    fn minimal_frames_of_a_producer_start_empty() {
        let code = build("()I", |b| {
            b.visit_insn(Opcode::IConst1).unwrap();
            b.visit_insn(Opcode::IReturn).unwrap();
        });
        let producing = StackManipulation::new(&code.instructions[0..1], &code.variables);
        assert!(producing.minimal_before().unwrap().stack.is_empty());
        assert_eq!(
            producing.minimal_after().unwrap().stack,
            vec![StackTypeSet::INT]
        );
    }

    #[test]
    fn minimal_frames_lend_stack_shuffles_any_entries() {
        let code = build("()V", |b| {
            b.visit_insn(Opcode::Dup).unwrap();
            b.visit_insn(Opcode::Return).unwrap();
        });
        let duplicating = StackManipulation::new(&code.instructions[0..1], &code.variables);
        assert_eq!(
            duplicating.minimal_before().unwrap().stack,
            vec![StackTypeSet::ANY]
        );
        assert_eq!(
            duplicating.minimal_after().unwrap().stack,
            vec![StackTypeSet::ANY, StackTypeSet::ANY]
        );
    }
}
