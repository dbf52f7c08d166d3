//! Computational type domain
//!
//! Every value the abstract interpreter tracks is a *set* of possible computational types, not a
//! single type. The instruction set shares one opcode across the whole two's-complement family
//! (`boolean`/`byte`/`short`/`char`/`int` all load through the same opcode, compare through the
//! same opcode, and so on), so a single stack slot frequently admits several types at once and
//! only narrows when a declared descriptor or variable lifetime pins it down.

use std::fmt;

/// One possible computational type of an operand-stack entry or local-variable slot.
///
/// `ObjectRef` covers class, interface, array and null references alike; `Void` only ever appears
/// as the "pushes nothing" marker of an instruction contract, never on an actual stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TypeTag {
    Int,
    Long,
    Float,
    Double,
    ObjectRef,
    Boolean,
    Char,
    Byte,
    Short,
    Void,
}

impl TypeTag {
    pub const ALL: [TypeTag; 10] = [
        TypeTag::Int,
        TypeTag::Long,
        TypeTag::Float,
        TypeTag::Double,
        TypeTag::ObjectRef,
        TypeTag::Boolean,
        TypeTag::Char,
        TypeTag::Byte,
        TypeTag::Short,
        TypeTag::Void,
    ];

    const fn bit(self) -> u16 {
        1 << self as u16
    }

    pub fn name(self) -> &'static str {
        match self {
            TypeTag::Int => "INT",
            TypeTag::Long => "LONG",
            TypeTag::Float => "FLOAT",
            TypeTag::Double => "DOUBLE",
            TypeTag::ObjectRef => "OBJECTREF",
            TypeTag::Boolean => "BOOLEAN",
            TypeTag::Char => "CHAR",
            TypeTag::Byte => "BYTE",
            TypeTag::Short => "SHORT",
            TypeTag::Void => "VOID",
        }
    }
}

/// An immutable set of [`TypeTag`]s, ordered by inclusion: `∅ ⊑ {tag} ⊑ … ⊑ ANY`.
///
/// Union is the lattice join used to merge type information flowing in from several control-flow
/// paths; an empty intersection is how the analysis detects a type contradiction.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct StackTypeSet(u16);

impl StackTypeSet {
    pub const EMPTY: StackTypeSet = StackTypeSet(0);

    pub const INT: StackTypeSet = StackTypeSet::of(TypeTag::Int);
    pub const LONG: StackTypeSet = StackTypeSet::of(TypeTag::Long);
    pub const FLOAT: StackTypeSet = StackTypeSet::of(TypeTag::Float);
    pub const DOUBLE: StackTypeSet = StackTypeSet::of(TypeTag::Double);
    pub const BOOLEAN: StackTypeSet = StackTypeSet::of(TypeTag::Boolean);
    pub const CHAR: StackTypeSet = StackTypeSet::of(TypeTag::Char);
    pub const BYTE: StackTypeSet = StackTypeSet::of(TypeTag::Byte);
    pub const SHORT: StackTypeSet = StackTypeSet::of(TypeTag::Short);

    /// Marks an instruction that pushes nothing (never a real stack entry)
    pub const VOID: StackTypeSet = StackTypeSet::of(TypeTag::Void);

    /// Any object or array reference, including null
    pub const REFERENCE: StackTypeSet = StackTypeSet::of(TypeTag::ObjectRef);

    /// The types sharing the int-family opcodes at the instruction-set level
    pub const TWO_COMPLEMENT: StackTypeSet = StackTypeSet(
        TypeTag::Boolean.bit()
            | TypeTag::Byte.bit()
            | TypeTag::Short.bit()
            | TypeTag::Char.bit()
            | TypeTag::Int.bit(),
    );

    pub const ANY: StackTypeSet = StackTypeSet(
        TypeTag::Int.bit()
            | TypeTag::Long.bit()
            | TypeTag::Float.bit()
            | TypeTag::Double.bit()
            | TypeTag::ObjectRef.bit()
            | TypeTag::Boolean.bit()
            | TypeTag::Char.bit()
            | TypeTag::Byte.bit()
            | TypeTag::Short.bit()
            | TypeTag::Void.bit(),
    );

    pub const NON_BOOLEAN: StackTypeSet =
        StackTypeSet(StackTypeSet::ANY.0 & !TypeTag::Boolean.bit());

    /// The category-2 types, occupying two local-variable slots
    pub const WIDE: StackTypeSet = StackTypeSet(TypeTag::Long.bit() | TypeTag::Double.bit());

    pub const fn of(tag: TypeTag) -> StackTypeSet {
        StackTypeSet(tag.bit())
    }

    pub const fn union(self, other: StackTypeSet) -> StackTypeSet {
        StackTypeSet(self.0 | other.0)
    }

    pub const fn intersection(self, other: StackTypeSet) -> StackTypeSet {
        StackTypeSet(self.0 & other.0)
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn contains(self, tag: TypeTag) -> bool {
        self.0 & tag.bit() != 0
    }

    pub const fn is_subset_of(self, other: StackTypeSet) -> bool {
        self.0 & !other.0 == 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn iter(self) -> impl Iterator<Item = TypeTag> {
        TypeTag::ALL.into_iter().filter(move |tag| self.contains(*tag))
    }

    /// The set as the class-file verifier sees it: the whole two's-complement family checks as a
    /// single int type, so any set touching the family widens to include all of it. Used when
    /// testing whether a value is acceptable where a narrower family member is required.
    pub fn verification_family(self) -> StackTypeSet {
        if self.intersection(StackTypeSet::TWO_COMPLEMENT).is_empty() {
            self
        } else {
            self.union(StackTypeSet::TWO_COMPLEMENT)
        }
    }

    /// `Some(2)` for category-2 sets (long/double), `Some(1)` for category-1 sets, `None` when
    /// the set mixes both categories and the stack shape cannot be determined statically.
    pub fn category(self) -> Option<u8> {
        if self.is_empty() || self == StackTypeSet::VOID {
            None
        } else if self.is_subset_of(StackTypeSet::WIDE) {
            Some(2)
        } else if self.intersection(StackTypeSet::WIDE).is_empty() {
            Some(1)
        } else {
            None
        }
    }
}

impl fmt::Display for StackTypeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == StackTypeSet::ANY {
            return write!(f, "ANY");
        }
        write!(f, "{{")?;
        let mut first = true;
        for tag in self.iter() {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{}", tag.name())?;
            first = false;
        }
        write!(f, "}}")
    }
}

impl fmt::Debug for StackTypeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl FromIterator<TypeTag> for StackTypeSet {
    fn from_iter<I: IntoIterator<Item = TypeTag>>(iter: I) -> StackTypeSet {
        iter.into_iter()
            .fold(StackTypeSet::EMPTY, |acc, tag| acc.union(StackTypeSet::of(tag)))
    }
}
