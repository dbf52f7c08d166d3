//! Building a method body out of visit calls
//!
//! [`MethodBuilder`] is the input surface of the crate. A front end reading class files (or a
//! test constructing bytecode by hand) drives it visitor-style, one call per instruction in
//! order, using [`CodeLabel`]s for targets that may not be placed yet. [`MethodBuilder::finish`]
//! resolves every label to an instruction order, checks the stream for malformed references and
//! produces the immutable [`MethodCode`] the analysis consumes.
//!
//! The mapping from opcode to instruction variant lives here, including the type-set each
//! opcode family pushes and pops. Constants push exactly the type their opcode encodes
//! (`iconst_1` pushes `{INT}`, never a wider guess); loads and stores of the shared int-family
//! opcodes carry the whole family and are narrowed later through the variable table; field,
//! array and invoke instructions narrow from their descriptors up front.

use crate::bytecode::descriptors::{
    BaseType, FieldType, MethodDescriptor, ParseDescriptor,
};
use crate::bytecode::instruction::{
    FieldRef, InsnOrder, Instruction, InstructionKind, InvokeKind, JumpCondition, MethodRef,
    StackOpKind,
};
use crate::bytecode::opcode::Opcode;
use crate::bytecode::types::StackTypeSet;
use crate::bytecode::variables::{VariableLifetime, VariableTable};
use crate::errors::{AnalysisError, Result};
use bitflags::bitflags;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

bitflags! {
    /// Access flags on methods
    ///
    /// [0]: https://docs.oracle.com/javase/specs/jvms/se15/html/jvms-4.html#jvms-4.6-200-A.1
    pub struct MethodAccessFlags: u16 {
        const PUBLIC = 0x0001;
        const PRIVATE = 0x0002;
        const PROTECTED = 0x0004;
        const STATIC = 0x0008;
        const FINAL = 0x0010;
        const SYNCHRONIZED = 0x0020;
        const BRIDGE = 0x0040;
        const VARARGS = 0x0080;
        const NATIVE = 0x0100;
        const ABSTRACT = 0x0400;
        const STRICT = 0x0800;
        const SYNTHETIC = 0x1000;
    }
}

/// Opaque label handed out by [`MethodBuilder::new_label`]
#[derive(Copy, Clone, Hash, Eq, PartialEq)]
pub struct CodeLabel(usize);

impl fmt::Debug for CodeLabel {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_fmt(format_args!("l{}", self.0))
    }
}

/// A loadable constant, as delivered by an `ldc` of any width
#[derive(Debug, Clone, PartialEq)]
pub enum ConstantValue {
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    String(String),
    /// A class literal, by internal binary name
    Class(String),
}

impl ConstantValue {
    fn stack_type(&self) -> StackTypeSet {
        match self {
            ConstantValue::Int(_) => StackTypeSet::INT,
            ConstantValue::Long(_) => StackTypeSet::LONG,
            ConstantValue::Float(_) => StackTypeSet::FLOAT,
            ConstantValue::Double(_) => StackTypeSet::DOUBLE,
            ConstantValue::String(_) | ConstantValue::Class(_) => StackTypeSet::REFERENCE,
        }
    }
}

/// A try-catch range `[start, end)` with its handler entry, orders resolved
#[derive(Debug, Clone, PartialEq)]
pub struct TryCatch {
    pub start: InsnOrder,
    pub end: InsnOrder,
    pub handler: InsnOrder,
    /// `None` for a catch-all (`finally`) handler
    pub catch_type: Option<String>,
}

/// A finished, label-resolved method body
#[derive(Debug)]
pub struct MethodCode {
    pub method: Arc<MethodRef>,
    pub access: MethodAccessFlags,
    pub instructions: Vec<Instruction>,
    pub variables: VariableTable,
    pub try_catches: Vec<TryCatch>,
}

impl MethodCode {
    pub fn is_static(&self) -> bool {
        self.access.contains(MethodAccessFlags::STATIC)
    }

    /// The local slots holding arguments on entry: the receiver in slot 0 for instance methods,
    /// then each parameter at its slot. The upper slot of a wide parameter stays absent.
    pub fn entry_locals(&self) -> std::collections::BTreeMap<u16, StackTypeSet> {
        let mut locals = std::collections::BTreeMap::new();
        let mut slot: u16 = 0;
        if !self.is_static() {
            locals.insert(slot, StackTypeSet::REFERENCE);
            slot += 1;
        }
        for parameter in &self.method.descriptor.parameters {
            locals.insert(slot, parameter.stack_type());
            slot += parameter.width();
        }
        locals
    }
}

/// Instruction recorded during visiting; jump targets are still labels
enum Recorded {
    Done(InstructionKind),
    Jump {
        condition: Option<JumpCondition>,
        target: CodeLabel,
    },
    Jsr {
        target: CodeLabel,
    },
    Switch {
        default: CodeLabel,
        targets: Vec<CodeLabel>,
    },
}

struct RecordedInsn {
    opcode: Opcode,
    line: Option<u32>,
    kind: Recorded,
}

struct PendingVariable {
    slot: u16,
    name: String,
    typ: FieldType,
    start: CodeLabel,
    end: CodeLabel,
}

struct PendingTryCatch {
    start: CodeLabel,
    end: CodeLabel,
    handler: CodeLabel,
    catch_type: Option<String>,
}

/// Records one method body from visitor-style calls
pub struct MethodBuilder {
    method: Arc<MethodRef>,
    access: MethodAccessFlags,
    recorded: Vec<RecordedInsn>,
    /// Labels placed so far, at the order of the instruction that follows them
    labels: HashMap<CodeLabel, InsnOrder>,
    next_label: usize,
    current_line: Option<u32>,
    variable_rows: Vec<PendingVariable>,
    try_catches: Vec<PendingTryCatch>,
}

impl MethodBuilder {
    pub fn new(
        class_name: &str,
        method_name: &str,
        descriptor: &str,
        access: MethodAccessFlags,
    ) -> Result<MethodBuilder> {
        let descriptor = MethodDescriptor::parse(descriptor)?;
        Ok(MethodBuilder {
            method: Arc::new(MethodRef {
                class_name: class_name.to_string(),
                method_name: method_name.to_string(),
                descriptor,
            }),
            access,
            recorded: vec![],
            labels: HashMap::new(),
            next_label: 0,
            current_line: None,
            variable_rows: vec![],
            try_catches: vec![],
        })
    }

    /// Generate a fresh label
    pub fn new_label(&mut self) -> CodeLabel {
        let to_return = CodeLabel(self.next_label);
        self.next_label += 1;
        to_return
    }

    /// Place a label at the next instruction order
    pub fn visit_label(&mut self, label: CodeLabel) -> Result<()> {
        let order = InsnOrder(self.recorded.len());
        if self.labels.insert(label, order).is_some() {
            return Err(AnalysisError::DuplicateLabel(label.0));
        }
        Ok(())
    }

    /// Source line for the instructions that follow
    pub fn visit_line(&mut self, line: u32) {
        self.current_line = Some(line);
    }

    fn record(&mut self, opcode: Opcode, kind: Recorded) {
        self.recorded.push(RecordedInsn {
            opcode,
            line: self.current_line,
            kind,
        });
    }

    fn record_done(&mut self, opcode: Opcode, kind: InstructionKind) {
        self.record(opcode, Recorded::Done(kind));
    }

    /// An opcode with no operand
    pub fn visit_insn(&mut self, opcode: Opcode) -> Result<()> {
        use Opcode::*;
        use StackTypeSet as S;
        let kind = match opcode {
            Nop => InstructionKind::Nop,

            AConstNull => push(S::REFERENCE),
            IConstM1 | IConst0 | IConst1 | IConst2 | IConst3 | IConst4 | IConst5 => push(S::INT),
            LConst0 | LConst1 => push(S::LONG),
            FConst0 | FConst1 | FConst2 => push(S::FLOAT),
            DConst0 | DConst1 => push(S::DOUBLE),

            IALoad => InstructionKind::ArrayLoad { element: S::INT },
            LALoad => InstructionKind::ArrayLoad { element: S::LONG },
            FALoad => InstructionKind::ArrayLoad { element: S::FLOAT },
            DALoad => InstructionKind::ArrayLoad { element: S::DOUBLE },
            AALoad => InstructionKind::ArrayLoad { element: S::REFERENCE },
            // javac compiles boolean[] access with the byte opcodes
            BALoad => InstructionKind::ArrayLoad { element: S::BYTE.union(S::BOOLEAN) },
            CALoad => InstructionKind::ArrayLoad { element: S::CHAR },
            SALoad => InstructionKind::ArrayLoad { element: S::SHORT },

            IAStore => InstructionKind::ArrayStore { element: S::INT },
            LAStore => InstructionKind::ArrayStore { element: S::LONG },
            FAStore => InstructionKind::ArrayStore { element: S::FLOAT },
            DAStore => InstructionKind::ArrayStore { element: S::DOUBLE },
            AAStore => InstructionKind::ArrayStore { element: S::REFERENCE },
            BAStore => InstructionKind::ArrayStore { element: S::BYTE.union(S::BOOLEAN) },
            CAStore => InstructionKind::ArrayStore { element: S::CHAR },
            SAStore => InstructionKind::ArrayStore { element: S::SHORT },

            Pop => stack_op(StackOpKind::Pop),
            Pop2 => stack_op(StackOpKind::Pop2),
            Dup => stack_op(StackOpKind::Dup),
            DupX1 => stack_op(StackOpKind::DupX1),
            DupX2 => stack_op(StackOpKind::DupX2),
            Dup2 => stack_op(StackOpKind::Dup2),
            Dup2X1 => stack_op(StackOpKind::Dup2X1),
            Dup2X2 => stack_op(StackOpKind::Dup2X2),
            Swap => stack_op(StackOpKind::Swap),

            IAdd | ISub | IMul | IDiv | IRem => binary_int(S::INT),
            LAdd | LSub | LMul | LDiv | LRem => binary(S::LONG, S::LONG, S::LONG),
            FAdd | FSub | FMul | FDiv | FRem => binary(S::FLOAT, S::FLOAT, S::FLOAT),
            DAdd | DSub | DMul | DDiv | DRem => binary(S::DOUBLE, S::DOUBLE, S::DOUBLE),

            IShl | IShr | IUShr => binary_int(S::INT),
            // The shift amount of a long shift is an int
            LShl | LShr | LUShr => binary(S::LONG, S::TWO_COMPLEMENT, S::LONG),

            // javac compiles boolean `&`, `|`, `^` (and `!` as xor) with these, so the result
            // keeps the whole family rather than collapsing to int
            IAnd | IOr | IXor => binary_int(S::TWO_COMPLEMENT),
            LAnd | LOr | LXor => binary(S::LONG, S::LONG, S::LONG),

            INeg => unary(S::TWO_COMPLEMENT, S::INT),
            LNeg => unary(S::LONG, S::LONG),
            FNeg => unary(S::FLOAT, S::FLOAT),
            DNeg => unary(S::DOUBLE, S::DOUBLE),

            I2L => unary(S::TWO_COMPLEMENT, S::LONG),
            I2F => unary(S::TWO_COMPLEMENT, S::FLOAT),
            I2D => unary(S::TWO_COMPLEMENT, S::DOUBLE),
            L2I => unary(S::LONG, S::INT),
            L2F => unary(S::LONG, S::FLOAT),
            L2D => unary(S::LONG, S::DOUBLE),
            F2I => unary(S::FLOAT, S::INT),
            F2L => unary(S::FLOAT, S::LONG),
            F2D => unary(S::FLOAT, S::DOUBLE),
            D2I => unary(S::DOUBLE, S::INT),
            D2L => unary(S::DOUBLE, S::LONG),
            D2F => unary(S::DOUBLE, S::FLOAT),
            I2B => unary(S::TWO_COMPLEMENT, S::BYTE),
            I2C => unary(S::TWO_COMPLEMENT, S::CHAR),
            I2S => unary(S::TWO_COMPLEMENT, S::SHORT),

            LCmp => binary(S::LONG, S::LONG, S::INT),
            FCmpL | FCmpG => binary(S::FLOAT, S::FLOAT, S::INT),
            DCmpL | DCmpG => binary(S::DOUBLE, S::DOUBLE, S::INT),

            IReturn => self.return_kind(opcode, S::TWO_COMPLEMENT)?,
            LReturn => self.return_kind(opcode, S::LONG)?,
            FReturn => self.return_kind(opcode, S::FLOAT)?,
            DReturn => self.return_kind(opcode, S::DOUBLE)?,
            AReturn => self.return_kind(opcode, S::REFERENCE)?,
            Return => self.return_kind(opcode, S::VOID)?,

            ArrayLength => InstructionKind::ArrayLength,
            AThrow => InstructionKind::Throw,
            MonitorEnter => InstructionKind::Monitor { enter: true },
            MonitorExit => InstructionKind::Monitor { enter: false },

            _ => {
                return Err(AnalysisError::UnexpectedOpcode {
                    mnemonic: opcode.mnemonic(),
                    context: "this opcode takes an operand",
                })
            }
        };
        self.record_done(opcode, kind);
        Ok(())
    }

    /// `bipush`, `sipush` or `newarray`
    pub fn visit_int_insn(&mut self, opcode: Opcode, operand: i32) -> Result<()> {
        let kind = match opcode {
            Opcode::BiPush | Opcode::SiPush => push(StackTypeSet::INT),
            Opcode::NewArray => {
                let element = match operand {
                    4 => BaseType::Boolean,
                    5 => BaseType::Char,
                    6 => BaseType::Float,
                    7 => BaseType::Double,
                    8 => BaseType::Byte,
                    9 => BaseType::Short,
                    10 => BaseType::Int,
                    11 => BaseType::Long,
                    _ => {
                        return Err(AnalysisError::UnexpectedOpcode {
                            mnemonic: opcode.mnemonic(),
                            context: "the array type code must be 4 through 11",
                        })
                    }
                };
                InstructionKind::NewArray {
                    array: FieldType::array(FieldType::Base(element))?,
                }
            }
            _ => {
                return Err(AnalysisError::UnexpectedOpcode {
                    mnemonic: opcode.mnemonic(),
                    context: "only bipush, sipush and newarray take an int operand",
                })
            }
        };
        self.record_done(opcode, kind);
        Ok(())
    }

    /// A load, store or `ret` on a local slot
    pub fn visit_var_insn(&mut self, opcode: Opcode, slot: u16) -> Result<()> {
        use Opcode::*;
        use StackTypeSet as S;
        let kind = match opcode {
            ILoad => load(slot, S::TWO_COMPLEMENT),
            LLoad => load(slot, S::LONG),
            FLoad => load(slot, S::FLOAT),
            DLoad => load(slot, S::DOUBLE),
            ALoad => load(slot, S::REFERENCE),
            IStore => store(slot, S::TWO_COMPLEMENT),
            LStore => store(slot, S::LONG),
            FStore => store(slot, S::FLOAT),
            DStore => store(slot, S::DOUBLE),
            AStore => store(slot, S::REFERENCE),
            Ret => InstructionKind::Ret { slot },
            _ => {
                return Err(AnalysisError::UnexpectedOpcode {
                    mnemonic: opcode.mnemonic(),
                    context: "only loads, stores and ret take a slot operand",
                })
            }
        };
        self.record_done(opcode, kind);
        Ok(())
    }

    pub fn visit_iinc(&mut self, slot: u16) {
        self.record_done(Opcode::IInc, InstructionKind::IInc { slot });
    }

    /// `new`, `anewarray`, `checkcast` or `instanceof`; `class` is an internal binary name, or
    /// an array descriptor where the class file stores one
    pub fn visit_type_insn(&mut self, opcode: Opcode, class: &str) -> Result<()> {
        let kind = match opcode {
            Opcode::New => InstructionKind::New {
                class: class.to_string(),
            },
            Opcode::ANewArray => {
                let element = if class.starts_with('[') {
                    FieldType::parse(class)?
                } else {
                    FieldType::object(class)
                };
                InstructionKind::NewArray {
                    array: FieldType::array(element)?,
                }
            }
            Opcode::CheckCast => InstructionKind::CheckCast {
                class: class.to_string(),
            },
            Opcode::InstanceOf => InstructionKind::InstanceOf {
                class: class.to_string(),
            },
            _ => {
                return Err(AnalysisError::UnexpectedOpcode {
                    mnemonic: opcode.mnemonic(),
                    context: "only new, anewarray, checkcast and instanceof name a class",
                })
            }
        };
        self.record_done(opcode, kind);
        Ok(())
    }

    pub fn visit_field_insn(
        &mut self,
        opcode: Opcode,
        owner: &str,
        name: &str,
        descriptor: &str,
    ) -> Result<()> {
        let field = FieldRef {
            owner: owner.to_string(),
            name: name.to_string(),
            typ: FieldType::parse(descriptor)?,
        };
        let kind = match opcode {
            Opcode::GetField => InstructionKind::GetField { field },
            Opcode::PutField => InstructionKind::PutField { field },
            Opcode::GetStatic => InstructionKind::GetStatic { field },
            Opcode::PutStatic => InstructionKind::PutStatic { field },
            _ => {
                return Err(AnalysisError::UnexpectedOpcode {
                    mnemonic: opcode.mnemonic(),
                    context: "only the four field access opcodes name a field",
                })
            }
        };
        self.record_done(opcode, kind);
        Ok(())
    }

    pub fn visit_method_insn(
        &mut self,
        opcode: Opcode,
        owner: &str,
        name: &str,
        descriptor: &str,
    ) -> Result<()> {
        let invoke_kind = match opcode {
            Opcode::InvokeVirtual => InvokeKind::Virtual,
            Opcode::InvokeSpecial => InvokeKind::Special,
            Opcode::InvokeStatic => InvokeKind::Static,
            Opcode::InvokeInterface => InvokeKind::Interface,
            _ => {
                return Err(AnalysisError::UnexpectedOpcode {
                    mnemonic: opcode.mnemonic(),
                    context: "invokedynamic goes through visit_invoke_dynamic",
                })
            }
        };
        let method = MethodRef {
            class_name: owner.to_string(),
            method_name: name.to_string(),
            descriptor: MethodDescriptor::parse(descriptor)?,
        };
        self.record_done(
            opcode,
            InstructionKind::Invoke {
                kind: invoke_kind,
                method,
            },
        );
        Ok(())
    }

    /// An `invokedynamic` call site; it has no owner class, the name and descriptor identify it
    pub fn visit_invoke_dynamic(&mut self, name: &str, descriptor: &str) -> Result<()> {
        let method = MethodRef {
            class_name: String::new(),
            method_name: name.to_string(),
            descriptor: MethodDescriptor::parse(descriptor)?,
        };
        self.record_done(
            Opcode::InvokeDynamic,
            InstructionKind::Invoke {
                kind: InvokeKind::Dynamic,
                method,
            },
        );
        Ok(())
    }

    pub fn visit_jump_insn(&mut self, opcode: Opcode, target: CodeLabel) -> Result<()> {
        use Opcode::*;
        let condition = match opcode {
            Goto => None,
            IfEq | IfNe | IfLt | IfGe | IfGt | IfLe => Some(JumpCondition::IntZero),
            IfICmpEq | IfICmpNe | IfICmpLt | IfICmpGe | IfICmpGt | IfICmpLe => {
                Some(JumpCondition::IntPair)
            }
            IfACmpEq | IfACmpNe => Some(JumpCondition::ReferencePair),
            IfNull | IfNonNull => Some(JumpCondition::NullCheck),
            Jsr => {
                self.record(opcode, Recorded::Jsr { target });
                return Ok(());
            }
            _ => {
                return Err(AnalysisError::UnexpectedOpcode {
                    mnemonic: opcode.mnemonic(),
                    context: "this opcode does not take a branch target",
                })
            }
        };
        self.record(opcode, Recorded::Jump { condition, target });
        Ok(())
    }

    pub fn visit_table_switch(&mut self, default: CodeLabel, targets: &[CodeLabel]) {
        self.record(
            Opcode::TableSwitch,
            Recorded::Switch {
                default,
                targets: targets.to_vec(),
            },
        );
    }

    pub fn visit_lookup_switch(&mut self, default: CodeLabel, targets: &[CodeLabel]) {
        self.record(
            Opcode::LookupSwitch,
            Recorded::Switch {
                default,
                targets: targets.to_vec(),
            },
        );
    }

    pub fn visit_ldc(&mut self, constant: ConstantValue) {
        self.record_done(
            Opcode::Ldc,
            InstructionKind::Push {
                typ: constant.stack_type(),
            },
        );
    }

    /// `multianewarray`; `descriptor` is the array type being created
    pub fn visit_multi_new_array(&mut self, descriptor: &str, dimensions: u8) -> Result<()> {
        let array = FieldType::parse(descriptor)?;
        self.record_done(
            Opcode::MultiANewArray,
            InstructionKind::MultiNewArray { array, dimensions },
        );
        Ok(())
    }

    /// One row of the local variable debug table; `start`/`end` bound the scope half-open
    pub fn visit_local_variable(
        &mut self,
        name: &str,
        descriptor: &str,
        start: CodeLabel,
        end: CodeLabel,
        slot: u16,
    ) -> Result<()> {
        self.variable_rows.push(PendingVariable {
            slot,
            name: name.to_string(),
            typ: FieldType::parse(descriptor)?,
            start,
            end,
        });
        Ok(())
    }

    /// A protected range `[start, end)` with its handler; `catch_type` is `None` for catch-all
    pub fn visit_try_catch(
        &mut self,
        start: CodeLabel,
        end: CodeLabel,
        handler: CodeLabel,
        catch_type: Option<&str>,
    ) {
        self.try_catches.push(PendingTryCatch {
            start,
            end,
            handler,
            catch_type: catch_type.map(str::to_string),
        });
    }

    fn return_kind(&self, opcode: Opcode, family: StackTypeSet) -> Result<InstructionKind> {
        let declared = self.method.descriptor.return_stack_type();
        let compatible = if family == StackTypeSet::VOID {
            declared == StackTypeSet::VOID
        } else {
            !declared.intersection(family).is_empty()
        };
        if !compatible {
            return Err(AnalysisError::UnexpectedOpcode {
                mnemonic: opcode.mnemonic(),
                context: "the return opcode does not match the method descriptor",
            });
        }
        Ok(InstructionKind::Return { typ: declared })
    }

    /// Resolve all labels and seal the body
    pub fn finish(self) -> Result<MethodCode> {
        let MethodBuilder {
            method,
            access,
            recorded,
            labels,
            variable_rows,
            try_catches,
            ..
        } = self;

        let len = recorded.len();
        let resolve = |label: CodeLabel| -> Result<InsnOrder> {
            labels
                .get(&label)
                .copied()
                .ok_or(AnalysisError::UnplacedLabel(label.0))
        };
        // A branch must land on an instruction; labels placed after the last instruction are
        // only valid as exclusive range ends
        let resolve_target = |label: CodeLabel| -> Result<InsnOrder> {
            let target = resolve(label)?;
            if target.0 >= len {
                return Err(AnalysisError::TargetOutOfRange { target, len });
            }
            Ok(target)
        };

        let mut instructions = Vec::with_capacity(len);
        for (index, rec) in recorded.into_iter().enumerate() {
            let kind = match rec.kind {
                Recorded::Done(kind) => kind,
                Recorded::Jump { condition, target } => InstructionKind::Jump {
                    target: resolve_target(target)?,
                    condition,
                },
                Recorded::Jsr { target } => InstructionKind::Subroutine {
                    target: resolve_target(target)?,
                },
                Recorded::Switch { default, targets } => InstructionKind::Switch {
                    default: resolve_target(default)?,
                    targets: targets
                        .into_iter()
                        .map(resolve_target)
                        .collect::<Result<Vec<_>>>()?,
                },
            };
            instructions.push(Instruction::new(
                method.clone(),
                InsnOrder(index),
                rec.line,
                rec.opcode,
                kind,
            ));
        }

        let mut rows = Vec::with_capacity(variable_rows.len());
        for row in variable_rows {
            rows.push(VariableLifetime {
                slot: row.slot,
                name: row.name,
                typ: row.typ,
                start: resolve(row.start)?,
                end: resolve(row.end)?,
            });
        }

        let mut ranges = Vec::with_capacity(try_catches.len());
        for range in try_catches {
            ranges.push(TryCatch {
                start: resolve(range.start)?,
                end: resolve(range.end)?,
                handler: resolve_target(range.handler)?,
                catch_type: range.catch_type,
            });
        }

        Ok(MethodCode {
            method,
            access,
            instructions,
            variables: VariableTable::new(rows),
            try_catches: ranges,
        })
    }
}

fn push(typ: StackTypeSet) -> InstructionKind {
    InstructionKind::Push { typ }
}

fn load(slot: u16, typ: StackTypeSet) -> InstructionKind {
    InstructionKind::Load { slot, typ }
}

fn store(slot: u16, typ: StackTypeSet) -> InstructionKind {
    InstructionKind::Store { slot, typ }
}

fn stack_op(op: StackOpKind) -> InstructionKind {
    InstructionKind::StackOp { op }
}

fn binary(left: StackTypeSet, right: StackTypeSet, result: StackTypeSet) -> InstructionKind {
    InstructionKind::Binary {
        operands: [left, right],
        result,
    }
}

/// Both operands range over the int family
fn binary_int(result: StackTypeSet) -> InstructionKind {
    binary(
        StackTypeSet::TWO_COMPLEMENT,
        StackTypeSet::TWO_COMPLEMENT,
        result,
    )
}

fn unary(operand: StackTypeSet, result: StackTypeSet) -> InstructionKind {
    InstructionKind::Unary { operand, result }
}
