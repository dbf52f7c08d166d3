//! Local variable lifetimes
//!
//! A [`VariableLifetime`] is one row of a method's debug-time variable table: a slot, a name, a
//! declared type and the half-open order range `[start, end)` over which the value is the one
//! the row describes. The [`VariableTable`] answers point queries over those rows and is what
//! the instruction model consults to disambiguate int-family loads and stores.
//!
//! When a method carries no debug table, [`VariableTable::reconstruct`] synthesizes approximate
//! rows from the load/store pattern. Reconstructed rows answer liveness queries but carry only
//! family-level types, so the instruction model never narrows through them.

use crate::bytecode::descriptors::FieldType;
use crate::bytecode::instruction::{InsnOrder, Instruction, InstructionKind};
use crate::bytecode::types::StackTypeSet;
use crate::util::{Interval, SegmentTree};
use std::collections::BTreeMap;

/// One local variable's scope, `[start, end)` in instruction orders
#[derive(Clone, PartialEq, Debug)]
pub struct VariableLifetime {
    pub slot: u16,
    pub name: String,
    pub typ: FieldType,
    pub start: InsnOrder,
    pub end: InsnOrder,
}

impl VariableLifetime {
    pub fn stack_type(&self) -> StackTypeSet {
        self.typ.stack_type()
    }
}

impl Interval for VariableLifetime {
    type Endpoint = InsnOrder;

    fn start(&self) -> InsnOrder {
        self.start
    }

    fn end(&self) -> InsnOrder {
        self.end
    }
}

/// All variable lifetimes of one method, indexed for point queries
#[derive(Debug)]
pub struct VariableTable {
    lifetimes: Vec<VariableLifetime>,
    tree: SegmentTree<VariableLifetime>,
    /// False when the rows were reconstructed from the load/store pattern
    declared: bool,
}

impl VariableTable {
    /// Table from declared (debug information) rows
    pub fn new(lifetimes: Vec<VariableLifetime>) -> VariableTable {
        let tree = SegmentTree::new(lifetimes.clone());
        VariableTable {
            lifetimes,
            tree,
            declared: true,
        }
    }

    pub fn empty() -> VariableTable {
        VariableTable::new(vec![])
    }

    /// Approximate rows synthesized from the instruction stream.
    ///
    /// Each slot contributes one row per run of accesses sharing a type family. A run opened by
    /// a store begins right after it (debug tables scope a variable from the instruction after
    /// the write); a run opened by a read is assumed live from the start of the method, which
    /// covers parameters.
    pub fn reconstruct(instructions: &[Instruction]) -> VariableTable {
        let mut per_slot: BTreeMap<u16, Vec<Access>> = BTreeMap::new();
        for insn in instructions {
            let (slot, family, write) = match &insn.kind {
                InstructionKind::Load { slot, typ } => (*slot, *typ, false),
                InstructionKind::Store { slot, typ } => (*slot, *typ, true),
                InstructionKind::IInc { slot } => (*slot, StackTypeSet::TWO_COMPLEMENT, false),
                InstructionKind::Ret { slot } => (*slot, StackTypeSet::REFERENCE, false),
                _ => continue,
            };
            per_slot.entry(slot).or_default().push(Access {
                order: insn.order,
                family,
                write,
            });
        }

        let mut lifetimes = vec![];
        for (slot, accesses) in per_slot {
            let mut run: Option<(Access, InsnOrder)> = None;
            for access in accesses {
                match &mut run {
                    Some((first, last)) if first.family == access.family => *last = access.order,
                    Some((first, last)) => {
                        lifetimes.push(reconstructed_row(slot, first, *last));
                        run = Some((access, access.order));
                    }
                    None => run = Some((access, access.order)),
                }
            }
            if let Some((first, last)) = run {
                lifetimes.push(reconstructed_row(slot, &first, last));
            }
        }

        let tree = SegmentTree::new(lifetimes.clone());
        VariableTable {
            lifetimes,
            tree,
            declared: false,
        }
    }

    pub fn lifetimes(&self) -> &[VariableLifetime] {
        &self.lifetimes
    }

    pub fn is_empty(&self) -> bool {
        self.lifetimes.is_empty()
    }

    /// Did the rows come from debug information (as opposed to reconstruction)?
    pub fn is_declared(&self) -> bool {
        self.declared
    }

    /// The row covering `order` for `slot`, if any.
    ///
    /// With `at_store` set the query is for the value a store at `order` writes: a row whose
    /// scope opens at exactly `order + 1` wins over one merely covering `order`, since debug
    /// tables scope a variable from the instruction after the write.
    pub fn lifetime_for(
        &self,
        slot: u16,
        order: InsnOrder,
        at_store: bool,
    ) -> Option<&VariableLifetime> {
        if at_store {
            let opening = self
                .tree
                .intervals_containing(order.next())
                .into_iter()
                .find(|lt| lt.slot == slot && lt.start == order.next());
            if opening.is_some() {
                return opening;
            }
        }
        self.tree
            .intervals_containing(order)
            .into_iter()
            .find(|lt| lt.slot == slot)
    }

    pub fn is_alive_at(&self, slot: u16, order: InsnOrder, at_store: bool) -> bool {
        self.lifetime_for(slot, order, at_store).is_some()
    }

    /// Every row (any slot) covering `order`
    pub fn live_at(&self, order: InsnOrder) -> Vec<&VariableLifetime> {
        let mut live = self.tree.intervals_containing(order);
        live.sort_by_key(|lt| lt.slot);
        live
    }
}

/// One load/store/iinc/ret touch of a slot, in order
#[derive(PartialEq, Clone, Copy)]
struct Access {
    order: InsnOrder,
    family: StackTypeSet,
    write: bool,
}

fn reconstructed_row(slot: u16, first: &Access, last: InsnOrder) -> VariableLifetime {
    // A run opened by a write scopes from the next instruction; one opened by a read is
    // treated as live from entry (a parameter or a caller-visible slot)
    let start = if first.write {
        first.order.next()
    } else {
        InsnOrder(0)
    };
    VariableLifetime {
        slot,
        name: format!("local{}", slot),
        typ: family_field_type(first.family),
        start,
        end: last.next(),
    }
}

/// The representative declared type for a family set, used only by reconstructed rows
fn family_field_type(family: StackTypeSet) -> FieldType {
    if family == StackTypeSet::LONG {
        FieldType::long()
    } else if family == StackTypeSet::FLOAT {
        FieldType::float()
    } else if family == StackTypeSet::DOUBLE {
        FieldType::double()
    } else if family == StackTypeSet::REFERENCE {
        FieldType::object("java/lang/Object")
    } else {
        FieldType::int()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::bytecode::descriptors::{MethodDescriptor, ParseDescriptor};
    use crate::bytecode::instruction::MethodRef;
    use crate::bytecode::opcode::Opcode;
    use std::sync::Arc;

    fn row(slot: u16, start: usize, end: usize, typ: FieldType) -> VariableLifetime {
        VariableLifetime {
            slot,
            name: format!("v{}", slot),
            typ,
            start: InsnOrder(start),
            end: InsnOrder(end),
        }
    }

    #[test]
    fn point_queries_respect_half_open_scopes() {
        let table = VariableTable::new(vec![
            row(1, 2, 6, FieldType::int()),
            row(2, 4, 9, FieldType::boolean()),
        ]);
        assert!(!table.is_alive_at(1, InsnOrder(1), false));
        assert!(table.is_alive_at(1, InsnOrder(2), false));
        assert!(table.is_alive_at(1, InsnOrder(5), false));
        assert!(!table.is_alive_at(1, InsnOrder(6), false));
        assert!(!table.is_alive_at(3, InsnOrder(5), false));

        let live = table.live_at(InsnOrder(5));
        assert_eq!(live.len(), 2);
        assert_eq!(live[0].slot, 1);
        assert_eq!(live[1].slot, 2);
    }

    #[test]
    fn store_just_before_the_scope_matches() {
        let table = VariableTable::new(vec![row(1, 5, 9, FieldType::int())]);
        assert!(!table.is_alive_at(1, InsnOrder(4), false));
        assert!(table.is_alive_at(1, InsnOrder(4), true));
        assert!(!table.is_alive_at(1, InsnOrder(3), true));
    }

    #[test]
    fn store_between_adjacent_scopes_picks_the_opening_one() {
        let first = row(1, 2, 5, FieldType::int());
        let second = row(1, 5, 9, FieldType::boolean());
        let table = VariableTable::new(vec![first, second.clone()]);
        // order 4 is inside the first scope, but a store there writes the second variable
        let for_store = table.lifetime_for(1, InsnOrder(4), true).unwrap();
        assert_eq!(*for_store, second);
        let for_read = table.lifetime_for(1, InsnOrder(4), false).unwrap();
        assert_eq!(for_read.typ, FieldType::int());
    }

    fn probe_insns(kinds: Vec<(Opcode, InstructionKind)>) -> Vec<Instruction> {
        let method = Arc::new(MethodRef {
            class_name: "com/example/Probe".to_string(),
            method_name: "run".to_string(),
            descriptor: MethodDescriptor::parse("()V").unwrap(),
        });
        kinds
            .into_iter()
            .enumerate()
            .map(|(order, (opcode, kind))| {
                Instruction::new(method.clone(), InsnOrder(order), None, opcode, kind)
            })
            .collect()
    }

    #[test]
    fn reconstruction_scopes_a_stored_slot_after_the_store() {
        let insns = probe_insns(vec![
            (Opcode::IConst1, InstructionKind::Push { typ: StackTypeSet::INT }),
            (
                Opcode::IStore,
                InstructionKind::Store {
                    slot: 1,
                    typ: StackTypeSet::TWO_COMPLEMENT,
                },
            ),
            (
                Opcode::ILoad,
                InstructionKind::Load {
                    slot: 1,
                    typ: StackTypeSet::TWO_COMPLEMENT,
                },
            ),
            (Opcode::IReturn, InstructionKind::Return { typ: StackTypeSet::INT }),
        ]);
        let table = VariableTable::reconstruct(&insns);
        assert!(!table.is_declared());
        assert_eq!(table.lifetimes().len(), 1);
        let lt = &table.lifetimes()[0];
        assert_eq!(lt.slot, 1);
        assert_eq!((lt.start, lt.end), (InsnOrder(2), InsnOrder(3)));
        assert!(table.is_alive_at(1, InsnOrder(1), true));
        assert!(table.is_alive_at(1, InsnOrder(2), false));
        assert!(!table.is_alive_at(1, InsnOrder(3), false));
    }

    #[test]
    fn reconstruction_opens_parameter_slots_at_entry() {
        let insns = probe_insns(vec![
            (
                Opcode::ALoad,
                InstructionKind::Load {
                    slot: 0,
                    typ: StackTypeSet::REFERENCE,
                },
            ),
            (Opcode::AReturn, InstructionKind::Return { typ: StackTypeSet::REFERENCE }),
        ]);
        let table = VariableTable::reconstruct(&insns);
        let lt = &table.lifetimes()[0];
        assert_eq!((lt.start, lt.end), (InsnOrder(0), InsnOrder(1)));
    }

    #[test]
    fn reconstruction_splits_a_reused_slot_at_the_family_change() {
        let insns = probe_insns(vec![
            (
                Opcode::IStore,
                InstructionKind::Store {
                    slot: 1,
                    typ: StackTypeSet::TWO_COMPLEMENT,
                },
            ),
            (
                Opcode::ILoad,
                InstructionKind::Load {
                    slot: 1,
                    typ: StackTypeSet::TWO_COMPLEMENT,
                },
            ),
            (
                Opcode::AStore,
                InstructionKind::Store {
                    slot: 1,
                    typ: StackTypeSet::REFERENCE,
                },
            ),
            (
                Opcode::ALoad,
                InstructionKind::Load {
                    slot: 1,
                    typ: StackTypeSet::REFERENCE,
                },
            ),
        ]);
        let table = VariableTable::reconstruct(&insns);
        assert_eq!(table.lifetimes().len(), 2);
        assert_eq!(table.lifetimes()[0].typ, FieldType::int());
        assert_eq!(
            table.lifetimes()[1].typ,
            FieldType::object("java/lang/Object")
        );
        assert_eq!(table.lifetimes()[1].start, InsnOrder(3));
    }
}
