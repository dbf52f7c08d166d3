//! End-to-end runs over hand-assembled method bodies, exercising the stack from the builder
//! through graphs and frames to the pool.

use frameflow::bytecode::{
    InsnOrder, MethodAccessFlags, MethodBuilder, MethodCode, Opcode, StackTypeSet,
};
use frameflow::{analyze, AnalysisError, AnalysisOptions, AnalysisPool, FrameErrorKind, MethodAnalysis};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn probe(
    descriptor: &str,
    flags: MethodAccessFlags,
    record: impl FnOnce(&mut MethodBuilder),
) -> MethodCode {
    let mut builder = MethodBuilder::new("com/example/Probe", "run", descriptor, flags).unwrap();
    record(&mut builder);
    builder.finish().unwrap()
}

fn static_probe(descriptor: &str, record: impl FnOnce(&mut MethodBuilder)) -> MethodCode {
    probe(
        descriptor,
        MethodAccessFlags::PUBLIC | MethodAccessFlags::STATIC,
        record,
    )
}

fn analyzed(code: MethodCode) -> MethodAnalysis {
    analyze(code, &AnalysisOptions::default())
        .expect("analysis succeeds")
        .expect("method has a body")
}

#[test]
fn a_straight_line_sums_to_one_int() {
    init_logging();
    let code = static_probe("()I", |b| {
        b.visit_insn(Opcode::IConst1).unwrap();
        b.visit_insn(Opcode::IConst2).unwrap();
        b.visit_insn(Opcode::IAdd).unwrap();
        b.visit_insn(Opcode::IReturn).unwrap();
    });
    let analysis = analyzed(code);
    assert_eq!(analysis.blocks().len(), 1);
    assert_eq!(
        analysis.frame_after(InsnOrder(2)).unwrap().stack,
        vec![StackTypeSet::INT]
    );
    assert_eq!(
        analysis.frame_before(InsnOrder(3)).unwrap().stack,
        vec![StackTypeSet::INT]
    );
}

#[test]
fn an_int_constant_satisfies_a_boolean_field() {
    init_logging();
    let code = probe("()V", MethodAccessFlags::PUBLIC, |b| {
        b.visit_var_insn(Opcode::ALoad, 0).unwrap();
        b.visit_insn(Opcode::IConst1).unwrap();
        b.visit_field_insn(Opcode::PutField, "com/example/Probe", "done", "Z")
            .unwrap();
        b.visit_insn(Opcode::Return).unwrap();
    });
    let analysis = analyzed(code);
    // the constant reaches the boolean sink still carrying its exact type
    assert_eq!(
        analysis.frame_before(InsnOrder(2)).unwrap().stack,
        vec![StackTypeSet::REFERENCE, StackTypeSet::INT]
    );
}

#[test]
fn a_declared_boolean_narrows_loads_and_stores() {
    init_logging();
    let code = static_probe("(Z)Z", |b| {
        let from = b.new_label();
        let to = b.new_label();
        b.visit_var_insn(Opcode::ILoad, 0).unwrap();
        b.visit_var_insn(Opcode::IStore, 1).unwrap();
        b.visit_label(from).unwrap();
        b.visit_var_insn(Opcode::ILoad, 1).unwrap();
        b.visit_insn(Opcode::IReturn).unwrap();
        b.visit_label(to).unwrap();
        b.visit_local_variable("copy", "Z", from, to, 1).unwrap();
    });
    let analysis = analyzed(code);
    assert!(analysis.variables().is_declared());
    assert_eq!(
        analysis.frame_after(InsnOrder(2)).unwrap().stack,
        vec![StackTypeSet::BOOLEAN]
    );
}

#[test]
fn a_diamond_merge_unions_the_arriving_types() {
    init_logging();
    let code = static_probe("(Z)V", |b| {
        let other = b.new_label();
        let merge = b.new_label();
        b.visit_var_insn(Opcode::ILoad, 0).unwrap();
        b.visit_jump_insn(Opcode::IfEq, other).unwrap();
        b.visit_insn(Opcode::IConst1).unwrap();
        b.visit_jump_insn(Opcode::Goto, merge).unwrap();
        b.visit_label(other).unwrap();
        b.visit_insn(Opcode::FConst0).unwrap();
        b.visit_label(merge).unwrap();
        b.visit_insn(Opcode::Pop).unwrap();
        b.visit_insn(Opcode::Return).unwrap();
    });
    let analysis = analyzed(code);
    assert_eq!(
        analysis.frame_before(InsnOrder(5)).unwrap().stack,
        vec![StackTypeSet::INT.union(StackTypeSet::FLOAT)]
    );
}

#[test]
fn merging_paths_must_agree_on_stack_depth() {
    init_logging();
    let code = static_probe("(Z)V", |b| {
        let skip = b.new_label();
        b.visit_var_insn(Opcode::ILoad, 0).unwrap();
        b.visit_jump_insn(Opcode::IfEq, skip).unwrap();
        b.visit_insn(Opcode::IConst0).unwrap();
        b.visit_label(skip).unwrap();
        b.visit_insn(Opcode::Return).unwrap();
    });
    let err = analyze(code, &AnalysisOptions::default()).unwrap_err();
    assert!(matches!(
        err,
        AnalysisError::Frame {
            kind: FrameErrorKind::DepthMismatch { .. },
            ..
        }
    ));
}

#[test]
fn a_handler_starts_from_the_thrown_reference() {
    init_logging();
    let code = static_probe("(I)V", |b| {
        let from = b.new_label();
        let to = b.new_label();
        let catcher = b.new_label();
        b.visit_label(from).unwrap();
        b.visit_var_insn(Opcode::ILoad, 0).unwrap();
        b.visit_var_insn(Opcode::IStore, 1).unwrap();
        b.visit_label(to).unwrap();
        b.visit_insn(Opcode::Return).unwrap();
        b.visit_label(catcher).unwrap();
        b.visit_var_insn(Opcode::AStore, 2).unwrap();
        b.visit_var_insn(Opcode::ALoad, 2).unwrap();
        b.visit_insn(Opcode::AThrow).unwrap();
        b.visit_try_catch(from, to, catcher, Some("java/lang/RuntimeException"));
    });
    let analysis = analyzed(code);

    let handler = analysis.frame_before(InsnOrder(3)).unwrap();
    assert_eq!(handler.stack, vec![StackTypeSet::REFERENCE]);
    assert_eq!(handler.locals.get(&0), Some(&StackTypeSet::INT));

    assert_eq!(
        analysis.frame_before(InsnOrder(5)).unwrap().stack,
        vec![StackTypeSet::REFERENCE]
    );
}

#[test]
fn a_subroutine_resumes_after_each_caller() {
    init_logging();
    let code = static_probe("()V", |b| {
        let sub = b.new_label();
        b.visit_jump_insn(Opcode::Jsr, sub).unwrap();
        b.visit_jump_insn(Opcode::Jsr, sub).unwrap();
        b.visit_insn(Opcode::Return).unwrap();
        b.visit_label(sub).unwrap();
        b.visit_var_insn(Opcode::AStore, 0).unwrap();
        b.visit_var_insn(Opcode::Ret, 0).unwrap();
    });
    let analysis = analyzed(code);
    assert_eq!(
        analysis.cfg().successors_of(InsnOrder(4)),
        &[InsnOrder(1), InsnOrder(2)]
    );
    assert!(analysis.frame_before(InsnOrder(2)).unwrap().stack.is_empty());
    assert_eq!(
        analysis.frame_before(InsnOrder(3)).unwrap().stack,
        vec![StackTypeSet::REFERENCE]
    );
}

#[test]
fn switch_arms_fan_out_and_union_at_the_join() {
    init_logging();
    let code = static_probe("(I)I", |b| {
        let first = b.new_label();
        let second = b.new_label();
        let fallback = b.new_label();
        let join = b.new_label();
        b.visit_var_insn(Opcode::ILoad, 0).unwrap();
        b.visit_table_switch(fallback, &[first, second]);
        b.visit_label(first).unwrap();
        b.visit_insn(Opcode::IConst1).unwrap();
        b.visit_jump_insn(Opcode::Goto, join).unwrap();
        b.visit_label(second).unwrap();
        b.visit_insn(Opcode::FConst0).unwrap();
        b.visit_jump_insn(Opcode::Goto, join).unwrap();
        b.visit_label(fallback).unwrap();
        b.visit_insn(Opcode::IConst0).unwrap();
        b.visit_label(join).unwrap();
        b.visit_insn(Opcode::Pop).unwrap();
        b.visit_insn(Opcode::IConst5).unwrap();
        b.visit_insn(Opcode::IReturn).unwrap();
    });
    let analysis = analyzed(code);

    let switch_block = analysis.block_of(InsnOrder(1)).unwrap();
    assert_eq!(analysis.blocks().successors_of(switch_block).len(), 3);
    assert_eq!(
        analysis.frame_before(InsnOrder(7)).unwrap().stack,
        vec![StackTypeSet::INT.union(StackTypeSet::FLOAT)]
    );
}

#[test]
fn dead_code_has_no_block_and_no_frames() {
    init_logging();
    let code = static_probe("()V", |b| {
        let end = b.new_label();
        b.visit_jump_insn(Opcode::Goto, end).unwrap();
        b.visit_insn(Opcode::IConst0).unwrap();
        b.visit_insn(Opcode::Pop).unwrap();
        b.visit_label(end).unwrap();
        b.visit_insn(Opcode::Return).unwrap();
    });
    let analysis = analyzed(code);
    assert!(!analysis.is_reachable(InsnOrder(1)));
    assert!(analysis.block_of(InsnOrder(1)).is_none());
    assert!(analysis.frame_before(InsnOrder(1)).is_none());
    assert!(analysis.cfg().unreachable().contains(&InsnOrder(2)));
    assert!(analysis.is_reachable(InsnOrder(3)));
}

#[test]
fn a_dead_store_cannot_widen_a_declared_boolean() {
    init_logging();
    let code = static_probe("(Z)Z", |b| {
        let from = b.new_label();
        let to = b.new_label();
        let over = b.new_label();
        b.visit_var_insn(Opcode::ILoad, 0).unwrap();
        b.visit_var_insn(Opcode::IStore, 1).unwrap();
        b.visit_label(from).unwrap();
        b.visit_jump_insn(Opcode::Goto, over).unwrap();
        b.visit_insn(Opcode::IConst3).unwrap();
        b.visit_var_insn(Opcode::IStore, 1).unwrap();
        b.visit_label(over).unwrap();
        b.visit_var_insn(Opcode::ILoad, 1).unwrap();
        b.visit_insn(Opcode::IReturn).unwrap();
        b.visit_label(to).unwrap();
        b.visit_local_variable("flag", "Z", from, to, 1).unwrap();
    });
    let analysis = analyzed(code);
    assert!(analysis.variables().is_declared());

    // the generic int store sits on the skipped path and leaves no trace
    assert!(!analysis.is_reachable(InsnOrder(4)));
    assert!(analysis.frame_before(InsnOrder(4)).is_none());

    assert_eq!(
        analysis.frame_after(InsnOrder(1)).unwrap().locals.get(&1),
        Some(&StackTypeSet::BOOLEAN)
    );
    assert_eq!(
        analysis.frame_after(InsnOrder(5)).unwrap().stack,
        vec![StackTypeSet::BOOLEAN]
    );
}

#[test]
fn blocks_claim_each_reachable_instruction_once() {
    init_logging();
    let code = static_probe("(Z)V", |b| {
        let other = b.new_label();
        let merge = b.new_label();
        b.visit_var_insn(Opcode::ILoad, 0).unwrap();
        b.visit_jump_insn(Opcode::IfEq, other).unwrap();
        b.visit_insn(Opcode::IConst1).unwrap();
        b.visit_jump_insn(Opcode::Goto, merge).unwrap();
        b.visit_insn(Opcode::Nop).unwrap();
        b.visit_label(other).unwrap();
        b.visit_insn(Opcode::IConst2).unwrap();
        b.visit_label(merge).unwrap();
        b.visit_insn(Opcode::Pop).unwrap();
        b.visit_insn(Opcode::Return).unwrap();
    });
    let analysis = analyzed(code);
    for order in (0..analysis.instructions().len()).map(InsnOrder) {
        let claimants = analysis
            .blocks()
            .blocks()
            .iter()
            .filter(|block| block.contains(order))
            .count();
        let expected = if analysis.is_reachable(order) { 1 } else { 0 };
        assert_eq!(claimants, expected, "claimants of {:?}", order);
    }
}

#[test]
fn an_incremented_counter_stays_int_through_the_loop() {
    init_logging();
    let code = static_probe("(I)I", |b| {
        let head = b.new_label();
        let exit = b.new_label();
        b.visit_insn(Opcode::IConst0).unwrap();
        b.visit_var_insn(Opcode::IStore, 1).unwrap();
        b.visit_label(head).unwrap();
        b.visit_var_insn(Opcode::ILoad, 1).unwrap();
        b.visit_var_insn(Opcode::ILoad, 0).unwrap();
        b.visit_jump_insn(Opcode::IfICmpGe, exit).unwrap();
        b.visit_iinc(1);
        b.visit_jump_insn(Opcode::Goto, head).unwrap();
        b.visit_label(exit).unwrap();
        b.visit_var_insn(Opcode::ILoad, 1).unwrap();
        b.visit_insn(Opcode::IReturn).unwrap();
    });
    let analysis = analyzed(code);
    assert_eq!(
        analysis.frame_after(InsnOrder(7)).unwrap().stack,
        vec![StackTypeSet::INT]
    );
    let head_block = analysis.block_of(InsnOrder(2)).unwrap();
    let at_head = analysis.frames().input(head_block).unwrap();
    assert_eq!(at_head.locals.get(&1), Some(&StackTypeSet::INT));
}

#[test]
fn reanalyzing_an_identical_body_yields_identical_frames() {
    init_logging();
    fn assemble(b: &mut MethodBuilder) {
        let head = b.new_label();
        let exit = b.new_label();
        b.visit_insn(Opcode::IConst0).unwrap();
        b.visit_var_insn(Opcode::IStore, 1).unwrap();
        b.visit_label(head).unwrap();
        b.visit_var_insn(Opcode::ILoad, 1).unwrap();
        b.visit_var_insn(Opcode::ILoad, 0).unwrap();
        b.visit_jump_insn(Opcode::IfICmpGe, exit).unwrap();
        b.visit_iinc(1);
        b.visit_jump_insn(Opcode::Goto, head).unwrap();
        b.visit_label(exit).unwrap();
        b.visit_insn(Opcode::Return).unwrap();
    }
    let first = analyzed(static_probe("(I)V", assemble));
    let second = analyzed(static_probe("(I)V", assemble));

    for block in first.blocks().blocks() {
        assert_eq!(
            first.frames().input(block.id),
            second.frames().input(block.id)
        );
        assert_eq!(
            first.frames().output(block.id),
            second.frames().output(block.id)
        );
    }
    for order in (0..first.instructions().len()).map(InsnOrder) {
        assert_eq!(first.frame_before(order), second.frame_before(order));
    }
}

#[test]
fn wide_values_hold_one_stack_entry_and_two_slots() {
    init_logging();
    let code = static_probe("(J)J", |b| {
        b.visit_var_insn(Opcode::LLoad, 0).unwrap();
        b.visit_insn(Opcode::LConst1).unwrap();
        b.visit_insn(Opcode::LAdd).unwrap();
        b.visit_insn(Opcode::LReturn).unwrap();
    });
    let analysis = analyzed(code);

    let before_add = analysis.frame_before(InsnOrder(2)).unwrap();
    assert_eq!(before_add.stack.len(), 2);
    assert!(before_add.stack.iter().all(|entry| entry.category() == Some(2)));

    let entry_block = analysis.blocks().entry().unwrap();
    let entry = analysis.frames().input(entry_block).unwrap();
    assert_eq!(entry.locals.len(), 1);
    assert_eq!(entry.locals.get(&0), Some(&StackTypeSet::LONG));
}

#[test]
fn a_reconstructed_table_scopes_reused_slots() {
    init_logging();
    let code = static_probe("()V", |b| {
        b.visit_insn(Opcode::IConst1).unwrap();
        b.visit_var_insn(Opcode::IStore, 1).unwrap();
        b.visit_var_insn(Opcode::ILoad, 1).unwrap();
        b.visit_insn(Opcode::Pop).unwrap();
        b.visit_insn(Opcode::FConst0).unwrap();
        b.visit_var_insn(Opcode::FStore, 1).unwrap();
        b.visit_var_insn(Opcode::FLoad, 1).unwrap();
        b.visit_insn(Opcode::Pop).unwrap();
        b.visit_insn(Opcode::Return).unwrap();
    });
    let analysis = analyzed(code);
    assert!(!analysis.variables().is_declared());
    assert_eq!(analysis.variables().lifetimes().len(), 2);
    // with only a reconstructed table, narrowing comes from the flow, not the rows
    assert_eq!(
        analysis.frame_after(InsnOrder(2)).unwrap().stack,
        vec![StackTypeSet::INT]
    );
    assert_eq!(
        analysis.frame_after(InsnOrder(6)).unwrap().stack,
        vec![StackTypeSet::FLOAT]
    );
}

#[test]
fn the_pool_registers_once_and_clears_by_scope() {
    init_logging();
    let mut pool = AnalysisPool::new();

    let first = analyzed(static_probe("()V", |b| {
        b.visit_insn(Opcode::Return).unwrap();
    }));
    let method = first.method().clone();
    pool.register(first).unwrap();

    let again = analyzed(static_probe("()V", |b| {
        b.visit_insn(Opcode::Return).unwrap();
    }));
    assert!(matches!(
        pool.register(again),
        Err(AnalysisError::AlreadyRegistered { .. })
    ));

    assert!(pool.get_for(&method).is_some());
    assert_eq!(pool.clear_class("com/example/Probe"), 1);
    assert!(pool.is_empty());
}
