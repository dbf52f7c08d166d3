//! The instruction model
//!
//! One [`Instruction`] value exists per opcode occurrence in a method body, identified by its
//! [`InsnOrder`] (position in the method). Each instruction declares a frame-independent stack
//! and variable contract in terms of [`StackTypeSet`]s: what it pops (deepest entry first), what
//! it pushes, and which local slots it reads or writes. Field, array and invoke instructions
//! narrow their sets from declared descriptors; loads and stores of the shared two's-complement
//! opcodes narrow further through the [`VariableTable`] when a lifetime covers them.
//!
//! Positional shuffles (`dup`, `swap`, …) are the one family whose effect the fixed contract
//! cannot express; the frame engine applies those by reordering actual stack entries.

use crate::bytecode::descriptors::{FieldType, MethodDescriptor, RenderDescriptor};
use crate::bytecode::opcode::Opcode;
use crate::bytecode::types::StackTypeSet;
use crate::bytecode::variables::VariableTable;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// Position of an instruction in its method, used as its stable identity and as the graph key.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InsnOrder(pub usize);

impl InsnOrder {
    pub fn next(self) -> InsnOrder {
        InsnOrder(self.0 + 1)
    }
}

impl fmt::Debug for InsnOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "insn{}", self.0)
    }
}

impl fmt::Display for InsnOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The method owning an instruction stream
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct MethodRef {
    /// Internal binary name of the declaring class (`com/example/Foo`)
    pub class_name: String,
    pub method_name: String,
    pub descriptor: MethodDescriptor,
}

impl fmt::Display for MethodRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}{}",
            self.class_name,
            self.method_name,
            self.descriptor.render()
        )
    }
}

/// A referenced field, with its declared type parsed from the descriptor
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct FieldRef {
    pub owner: String,
    pub name: String,
    pub typ: FieldType,
}

/// What a conditional jump compares, which fixes what it consumes
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum JumpCondition {
    /// One int-family operand against zero (`ifeq` … `ifle`)
    IntZero,
    /// Two int-family operands (`if_icmpeq` … `if_icmple`)
    IntPair,
    /// One reference operand against null (`ifnull`/`ifnonnull`)
    NullCheck,
    /// Two reference operands (`if_acmpeq`/`if_acmpne`)
    ReferencePair,
}

impl JumpCondition {
    fn consumed(self) -> Vec<StackTypeSet> {
        match self {
            JumpCondition::IntZero => vec![StackTypeSet::TWO_COMPLEMENT],
            JumpCondition::IntPair => {
                vec![StackTypeSet::TWO_COMPLEMENT, StackTypeSet::TWO_COMPLEMENT]
            }
            JumpCondition::NullCheck => vec![StackTypeSet::REFERENCE],
            JumpCondition::ReferencePair => {
                vec![StackTypeSet::REFERENCE, StackTypeSet::REFERENCE]
            }
        }
    }
}

/// The positional stack shuffles
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum StackOpKind {
    Pop,
    Pop2,
    Dup,
    DupX1,
    DupX2,
    Dup2,
    Dup2X1,
    Dup2X2,
    Swap,
}

impl StackOpKind {
    /// Fewest stack entries the shuffle can legally operate on (category-2 entries count once)
    pub fn min_depth(self) -> usize {
        match self {
            StackOpKind::Pop | StackOpKind::Pop2 | StackOpKind::Dup | StackOpKind::Dup2 => 1,
            StackOpKind::DupX1
            | StackOpKind::DupX2
            | StackOpKind::Dup2X1
            | StackOpKind::Dup2X2
            | StackOpKind::Swap => 2,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum InvokeKind {
    Virtual,
    Special,
    Static,
    Interface,
    Dynamic,
}

impl InvokeKind {
    pub fn has_receiver(self) -> bool {
        !matches!(self, InvokeKind::Static | InvokeKind::Dynamic)
    }
}

/// The per-opcode-family variants, carrying only the fields that vary
#[derive(Clone, PartialEq, Debug)]
pub enum InstructionKind {
    Nop,
    /// Constant loads (`iconst`, `bipush`, `ldc`, `aconst_null`, …)
    Push { typ: StackTypeSet },
    Load { slot: u16, typ: StackTypeSet },
    Store { slot: u16, typ: StackTypeSet },
    IInc { slot: u16 },
    ArrayLoad { element: StackTypeSet },
    ArrayStore { element: StackTypeSet },
    GetField { field: FieldRef },
    PutField { field: FieldRef },
    GetStatic { field: FieldRef },
    PutStatic { field: FieldRef },
    Binary {
        operands: [StackTypeSet; 2],
        result: StackTypeSet,
    },
    Unary {
        operand: StackTypeSet,
        result: StackTypeSet,
    },
    StackOp { op: StackOpKind },
    Jump {
        target: InsnOrder,
        condition: Option<JumpCondition>,
    },
    /// `jsr`: pushes the return address and enters the subroutine
    Subroutine { target: InsnOrder },
    /// `ret`: resumes after some matching `jsr`; resumption edges live on the graph
    Ret { slot: u16 },
    Switch {
        default: InsnOrder,
        targets: Vec<InsnOrder>,
    },
    /// `typ` is `VOID` for void returns
    Return { typ: StackTypeSet },
    Invoke {
        kind: InvokeKind,
        method: MethodRef,
    },
    New { class: String },
    NewArray { array: FieldType },
    MultiNewArray { array: FieldType, dimensions: u8 },
    ArrayLength,
    CheckCast { class: String },
    InstanceOf { class: String },
    Throw,
    Monitor { enter: bool },
}

/// One opcode occurrence in a method body
#[derive(Clone, PartialEq, Debug)]
pub struct Instruction {
    pub method: Arc<MethodRef>,
    pub order: InsnOrder,
    pub line: Option<u32>,
    pub opcode: Opcode,
    pub kind: InstructionKind,
}

impl Instruction {
    pub fn new(
        method: Arc<MethodRef>,
        order: InsnOrder,
        line: Option<u32>,
        opcode: Opcode,
        kind: InstructionKind,
    ) -> Instruction {
        Instruction {
            method,
            order,
            line,
            opcode,
            kind,
        }
    }

    /// Type-sets this instruction pops, deepest entry first.
    ///
    /// Fixed per variant; field/array/invoke variants are pre-narrowed from their descriptors.
    /// Positional shuffles return an empty list (see the module docs).
    pub fn consumed_from_stack(&self) -> Vec<StackTypeSet> {
        use InstructionKind::*;
        match &self.kind {
            Nop | Push { .. } | Load { .. } | IInc { .. } | GetStatic { .. } | New { .. }
            | Ret { .. } | StackOp { .. } => vec![],
            Store { typ, .. } => vec![*typ],
            ArrayLoad { .. } => vec![StackTypeSet::REFERENCE, StackTypeSet::TWO_COMPLEMENT],
            ArrayStore { element } => vec![
                StackTypeSet::REFERENCE,
                StackTypeSet::TWO_COMPLEMENT,
                *element,
            ],
            GetField { .. } => vec![StackTypeSet::REFERENCE],
            PutField { field } => vec![StackTypeSet::REFERENCE, field.typ.stack_type()],
            PutStatic { field } => vec![field.typ.stack_type()],
            Binary { operands, .. } => operands.to_vec(),
            Unary { operand, .. } => vec![*operand],
            Jump { condition, .. } => match condition {
                Some(condition) => condition.consumed(),
                None => vec![],
            },
            Subroutine { .. } => vec![],
            Switch { .. } => vec![StackTypeSet::TWO_COMPLEMENT],
            Return { typ } => {
                if *typ == StackTypeSet::VOID {
                    vec![]
                } else {
                    vec![*typ]
                }
            }
            Invoke { kind, method } => {
                let mut consumed = vec![];
                if kind.has_receiver() {
                    consumed.push(StackTypeSet::REFERENCE);
                }
                for parameter in &method.descriptor.parameters {
                    consumed.push(parameter.stack_type());
                }
                consumed
            }
            NewArray { .. } => vec![StackTypeSet::TWO_COMPLEMENT],
            MultiNewArray { dimensions, .. } => {
                vec![StackTypeSet::TWO_COMPLEMENT; *dimensions as usize]
            }
            ArrayLength | CheckCast { .. } | InstanceOf { .. } | Throw | Monitor { .. } => {
                vec![StackTypeSet::REFERENCE]
            }
        }
    }

    /// Like [`Instruction::consumed_from_stack`], but disambiguating a two's-complement-family
    /// store through the variable table. Falls back to the family set when no lifetime covers
    /// this instruction or the declared lifetime type is not an int-family type.
    pub fn consumed_from_stack_with(&self, table: &VariableTable) -> Vec<StackTypeSet> {
        if let InstructionKind::Store { slot, typ } = &self.kind {
            if *typ == StackTypeSet::TWO_COMPLEMENT {
                return vec![narrow_family(*typ, table, *slot, self.order, true)];
            }
        }
        self.consumed_from_stack()
    }

    /// The type-set this instruction pushes; `VOID` means it pushes nothing.
    pub fn pushed_to_stack(&self) -> StackTypeSet {
        use InstructionKind::*;
        match &self.kind {
            Push { typ } | Load { typ, .. } => *typ,
            ArrayLoad { element } => *element,
            GetField { field } | GetStatic { field } => field.typ.stack_type(),
            Binary { result, .. } => *result,
            Unary { result, .. } => *result,
            Subroutine { .. } => StackTypeSet::REFERENCE,
            Invoke { method, .. } => method.descriptor.return_stack_type(),
            New { .. } | NewArray { .. } | MultiNewArray { .. } | CheckCast { .. } => {
                StackTypeSet::REFERENCE
            }
            ArrayLength => StackTypeSet::INT,
            InstanceOf { .. } => StackTypeSet::BOOLEAN,
            Nop | Store { .. } | IInc { .. } | PutField { .. } | PutStatic { .. }
            | ArrayStore { .. } | StackOp { .. } | Jump { .. } | Ret { .. } | Switch { .. }
            | Return { .. } | Throw | Monitor { .. } => StackTypeSet::VOID,
        }
    }

    /// Like [`Instruction::pushed_to_stack`], but disambiguating a two's-complement-family load
    /// through the variable table.
    pub fn pushed_to_stack_with(&self, table: &VariableTable) -> StackTypeSet {
        if let InstructionKind::Load { slot, typ } = &self.kind {
            if *typ == StackTypeSet::TWO_COMPLEMENT {
                return narrow_family(*typ, table, *slot, self.order, false);
            }
        }
        self.pushed_to_stack()
    }

    pub fn reads_variables(&self) -> BTreeSet<u16> {
        match &self.kind {
            InstructionKind::Load { slot, .. }
            | InstructionKind::IInc { slot }
            | InstructionKind::Ret { slot } => BTreeSet::from([*slot]),
            _ => BTreeSet::new(),
        }
    }

    pub fn writes_variables(&self) -> BTreeSet<u16> {
        match &self.kind {
            InstructionKind::Store { slot, .. } | InstructionKind::IInc { slot } => {
                BTreeSet::from([*slot])
            }
            _ => BTreeSet::new(),
        }
    }

    /// Explicit jump/switch/subroutine targets. Fallthrough to `order + 1` is implicit, and a
    /// `ret`'s resumption points are matched during graph construction.
    pub fn successors(&self) -> Vec<InsnOrder> {
        match &self.kind {
            InstructionKind::Jump { target, .. } | InstructionKind::Subroutine { target } => {
                vec![*target]
            }
            InstructionKind::Switch { default, targets } => {
                let mut successors = Vec::with_capacity(targets.len() + 1);
                successors.push(*default);
                successors.extend(targets.iter().copied());
                successors
            }
            _ => vec![],
        }
    }

    /// Does execution continue at `order + 1` after this instruction?
    pub fn falls_through(&self) -> bool {
        !matches!(
            &self.kind,
            InstructionKind::Jump {
                condition: None,
                ..
            } | InstructionKind::Subroutine { .. }
                | InstructionKind::Ret { .. }
                | InstructionKind::Switch { .. }
                | InstructionKind::Return { .. }
                | InstructionKind::Throw
        )
    }

    /// Does this instruction end a straight-line run (explicit targets or no fallthrough)?
    pub fn is_block_end(&self) -> bool {
        !self.falls_through() || !self.successors().is_empty()
    }

    /// Human-readable label: order, mnemonic, owning method and source line.
    pub fn label(&self) -> String {
        match self.line {
            Some(line) => format!(
                "insn{} {} at {}:{}",
                self.order, self.opcode.mnemonic(), self.method, line
            ),
            None => format!("insn{} {} at {}", self.order, self.opcode.mnemonic(), self.method),
        }
    }
}

/// Narrow an int-family set to the covering lifetime's declared type, keeping the family when
/// nothing covers the instruction, the metadata names a type outside the family, or the table
/// was reconstructed (reconstructed rows only speak at family precision).
fn narrow_family(
    family: StackTypeSet,
    table: &VariableTable,
    slot: u16,
    order: InsnOrder,
    at_store: bool,
) -> StackTypeSet {
    if !table.is_declared() {
        return family;
    }
    match table.lifetime_for(slot, order, at_store) {
        Some(lifetime) => {
            let narrowed = lifetime.stack_type().intersection(family);
            if narrowed.is_empty() {
                log::trace!(
                    "lifetime for slot {} at insn{} declares {} outside {}, keeping the family",
                    slot,
                    order,
                    lifetime.stack_type(),
                    family
                );
                family
            } else {
                narrowed
            }
        }
        None => family,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::bytecode::descriptors::ParseDescriptor;
    use crate::bytecode::variables::{VariableLifetime, VariableTable};

    pub(crate) fn test_method(descriptor: &str) -> Arc<MethodRef> {
        Arc::new(MethodRef {
            class_name: "com/example/Probe".to_string(),
            method_name: "run".to_string(),
            descriptor: MethodDescriptor::parse(descriptor).unwrap(),
        })
    }

    fn insn(order: usize, opcode: Opcode, kind: InstructionKind) -> Instruction {
        Instruction::new(test_method("()V"), InsnOrder(order), Some(7), opcode, kind)
    }

    #[test]
    fn contracts_are_fixed_per_variant() {
        let add = insn(
            0,
            Opcode::IAdd,
            InstructionKind::Binary {
                operands: [StackTypeSet::TWO_COMPLEMENT, StackTypeSet::TWO_COMPLEMENT],
                result: StackTypeSet::INT,
            },
        );
        assert_eq!(
            add.consumed_from_stack(),
            vec![StackTypeSet::TWO_COMPLEMENT, StackTypeSet::TWO_COMPLEMENT]
        );
        assert_eq!(add.pushed_to_stack(), StackTypeSet::INT);
        assert!(add.successors().is_empty());
        assert!(add.falls_through());
        assert!(!add.is_block_end());

        let ret = insn(1, Opcode::Return, InstructionKind::Return { typ: StackTypeSet::VOID });
        assert!(ret.consumed_from_stack().is_empty());
        assert_eq!(ret.pushed_to_stack(), StackTypeSet::VOID);
        assert!(!ret.falls_through());
        assert!(ret.is_block_end());
    }

    #[test]
    fn field_access_narrows_from_descriptor() {
        let field = FieldRef {
            owner: "com/example/Probe".to_string(),
            name: "flag".to_string(),
            typ: FieldType::boolean(),
        };
        let get = insn(3, Opcode::GetField, InstructionKind::GetField { field: field.clone() });
        assert_eq!(get.consumed_from_stack(), vec![StackTypeSet::REFERENCE]);
        assert_eq!(get.pushed_to_stack(), StackTypeSet::BOOLEAN);

        let put = insn(4, Opcode::PutField, InstructionKind::PutField { field });
        assert_eq!(
            put.consumed_from_stack(),
            vec![StackTypeSet::REFERENCE, StackTypeSet::BOOLEAN]
        );
        assert_eq!(put.pushed_to_stack(), StackTypeSet::VOID);
    }

    #[test]
    fn invoke_consumes_receiver_and_parameters() {
        let callee = MethodRef {
            class_name: "com/example/Target".to_string(),
            method_name: "compute".to_string(),
            descriptor: MethodDescriptor::parse("(IJ)Z").unwrap(),
        };
        let invoke = insn(
            5,
            Opcode::InvokeVirtual,
            InstructionKind::Invoke {
                kind: InvokeKind::Virtual,
                method: callee.clone(),
            },
        );
        assert_eq!(
            invoke.consumed_from_stack(),
            vec![StackTypeSet::REFERENCE, StackTypeSet::INT, StackTypeSet::LONG]
        );
        assert_eq!(invoke.pushed_to_stack(), StackTypeSet::BOOLEAN);

        let invoke_static = insn(
            6,
            Opcode::InvokeStatic,
            InstructionKind::Invoke {
                kind: InvokeKind::Static,
                method: callee,
            },
        );
        assert_eq!(
            invoke_static.consumed_from_stack(),
            vec![StackTypeSet::INT, StackTypeSet::LONG]
        );
    }

    #[test]
    fn switch_lists_default_then_targets() {
        let switch = insn(
            2,
            Opcode::TableSwitch,
            InstructionKind::Switch {
                default: InsnOrder(9),
                targets: vec![InsnOrder(4), InsnOrder(6)],
            },
        );
        assert_eq!(
            switch.successors(),
            vec![InsnOrder(9), InsnOrder(4), InsnOrder(6)]
        );
        assert!(!switch.falls_through());
        assert_eq!(switch.consumed_from_stack(), vec![StackTypeSet::TWO_COMPLEMENT]);
    }

    #[test]
    fn store_narrows_through_a_covering_lifetime() {
        let table = VariableTable::new(vec![VariableLifetime {
            slot: 2,
            start: InsnOrder(4),
            end: InsnOrder(9),
            name: "flag".to_string(),
            typ: FieldType::boolean(),
        }]);
        let store = insn(
            4,
            Opcode::IStore,
            InstructionKind::Store {
                slot: 2,
                typ: StackTypeSet::TWO_COMPLEMENT,
            },
        );
        assert_eq!(store.consumed_from_stack(), vec![StackTypeSet::TWO_COMPLEMENT]);
        assert_eq!(
            store.consumed_from_stack_with(&table),
            vec![StackTypeSet::BOOLEAN]
        );
        assert_eq!(store.writes_variables(), BTreeSet::from([2]));

        // No lifetime covers slot 3, so the family guess stands
        let uncovered = insn(
            5,
            Opcode::IStore,
            InstructionKind::Store {
                slot: 3,
                typ: StackTypeSet::TWO_COMPLEMENT,
            },
        );
        assert_eq!(
            uncovered.consumed_from_stack_with(&table),
            vec![StackTypeSet::TWO_COMPLEMENT]
        );
    }

    #[test]
    fn load_narrows_through_a_covering_lifetime() {
        let table = VariableTable::new(vec![VariableLifetime {
            slot: 1,
            start: InsnOrder(0),
            end: InsnOrder(10),
            name: "count".to_string(),
            typ: FieldType::int(),
        }]);
        let load = insn(
            3,
            Opcode::ILoad,
            InstructionKind::Load {
                slot: 1,
                typ: StackTypeSet::TWO_COMPLEMENT,
            },
        );
        assert_eq!(load.pushed_to_stack(), StackTypeSet::TWO_COMPLEMENT);
        assert_eq!(load.pushed_to_stack_with(&table), StackTypeSet::INT);
        assert_eq!(load.reads_variables(), BTreeSet::from([1]));

        // A reference load is never ambiguous, the table leaves it alone
        let aload = insn(
            4,
            Opcode::ALoad,
            InstructionKind::Load {
                slot: 1,
                typ: StackTypeSet::REFERENCE,
            },
        );
        assert_eq!(aload.pushed_to_stack_with(&table), StackTypeSet::REFERENCE);
    }
}
