//! Errors reported while assembling a method body or running the frame analysis
//!
//! Malformed input (unknown opcodes, unplaced labels, bad descriptors) surfaces while the
//! method is being built. Soundness violations (stack underflow, contradictory types, merge
//! depth mismatches) surface from the frame engine with the offending instruction attached.
//! Ambiguity is never an error: a set that stays wide is an answer, not a failure.

use crate::bytecode::{DescriptorError, InsnOrder, StackTypeSet};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AnalysisError>;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("unknown opcode byte 0x{0:02x}")]
    UnknownOpcode(u8),

    #[error("opcode {mnemonic} is not valid here: {context}")]
    UnexpectedOpcode {
        mnemonic: &'static str,
        context: &'static str,
    },

    #[error("bad descriptor: {0}")]
    Descriptor(#[from] DescriptorError),

    /// A label was referenced by a jump, switch or try-catch range but never placed
    #[error("label l{0} was referenced but never placed")]
    UnplacedLabel(usize),

    /// A label was placed twice (indicates a bug in the caller's visit sequence)
    #[error("label l{0} was placed twice")]
    DuplicateLabel(usize),

    #[error("branch target {target} is outside the method (length {len})")]
    TargetOutOfRange { target: InsnOrder, len: usize },

    /// The bytecode manipulates the stack in a way no execution could satisfy
    #[error("at {label}: {kind}")]
    Frame { label: String, kind: FrameErrorKind },

    /// The pool already holds an analysis for this method; registrations are write-once
    #[error("{class_name}.{method_name} is already registered")]
    AlreadyRegistered {
        class_name: String,
        method_name: String,
    },
}

impl AnalysisError {
    /// Attaches the offending instruction to a soundness violation. The analysis is about to
    /// abort, so the violation is also logged here.
    pub fn frame(label: String, kind: FrameErrorKind) -> AnalysisError {
        log::error!("{}: {}", label, kind);
        AnalysisError::Frame { label, kind }
    }
}

/// The soundness violations the frame engine can detect
#[derive(Error, Debug, PartialEq, Eq)]
pub enum FrameErrorKind {
    #[error("stack underflow (needed {needed} entries, found {found})")]
    StackUnderflow { needed: usize, found: usize },

    /// The value on the stack shares no type with what the instruction can accept
    #[error("type contradiction (instruction accepts {expected}, stack holds {found})")]
    TypeContradiction {
        expected: StackTypeSet,
        found: StackTypeSet,
    },

    /// Two control-flow paths reach the same point with different stack depths
    #[error("stack depth mismatch between merging paths ({left} vs {right})")]
    DepthMismatch { left: usize, right: usize },

    /// A positional shuffle needs a category layout the stack cannot provide
    #[error("stack shuffle cannot split the wide entry {found}")]
    SplitWideEntry { found: StackTypeSet },
}
