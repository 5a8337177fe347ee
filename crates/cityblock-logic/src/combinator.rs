//! Locating arithmetic combinators by what they compute.
//!
//! Station templates carry several arithmetic combinators whose constants
//! depend on the commodity. They are found by operation and operand shape
//! rather than by position in the entity list, so reordering a template
//! does not break parametrization.

use std::fmt;

use cityblock_core::{ArithmeticConditions, ArithmeticOperation, Blueprint, SignalId};

/// Prototype name of the arithmetic combinator.
pub const ARITHMETIC_COMBINATOR: &str = "arithmetic-combinator";

// ---------------------------------------------------------------------------
// Operand patterns
// ---------------------------------------------------------------------------

/// What one side of an arithmetic combinator must hold to match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    /// A signal with this name, of any type.
    Signal(&'static str),
    /// This exact constant.
    Constant(i32),
    /// Anything, including nothing.
    Any,
}

impl Operand {
    fn matches(&self, signal: Option<&SignalId>, constant: Option<i32>) -> bool {
        match self {
            Operand::Signal(name) => signal.is_some_and(|s| s.name == *name),
            Operand::Constant(value) => constant == Some(*value),
            Operand::Any => true,
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Signal(name) => f.write_str(name),
            Operand::Constant(value) => write!(f, "{value}"),
            Operand::Any => f.write_str("_"),
        }
    }
}

/// `first <operation> second`, matched against an arithmetic combinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CombinatorPattern {
    pub first: Operand,
    pub operation: ArithmeticOperation,
    pub second: Operand,
}

impl CombinatorPattern {
    pub const fn new(first: Operand, operation: ArithmeticOperation, second: Operand) -> Self {
        Self {
            first,
            operation,
            second,
        }
    }

    pub fn matches(&self, conditions: &ArithmeticConditions) -> bool {
        conditions.operation == self.operation
            && self
                .first
                .matches(conditions.first_signal.as_ref(), conditions.first_constant)
            && self
                .second
                .matches(conditions.second_signal.as_ref(), conditions.second_constant)
    }
}

impl fmt::Display for CombinatorPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.first, self.operation, self.second)
    }
}

// ---------------------------------------------------------------------------
// Lookup
// ---------------------------------------------------------------------------

/// Why a pattern did not resolve to exactly one combinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupFailure {
    NotFound,
    Ambiguous(usize),
}

/// Index into `blueprint.entities` of the single arithmetic combinator
/// matching `pattern`.
pub fn locate(blueprint: &Blueprint, pattern: &CombinatorPattern) -> Result<usize, LookupFailure> {
    let mut matches = blueprint
        .entities
        .iter()
        .enumerate()
        .filter(|(_, e)| e.name == ARITHMETIC_COMBINATOR)
        .filter(|(_, e)| e.arithmetic_conditions().is_some_and(|c| pattern.matches(c)))
        .map(|(index, _)| index);

    let first = matches.next().ok_or(LookupFailure::NotFound)?;
    match matches.count() {
        0 => Ok(first),
        more => Err(LookupFailure::Ambiguous(more + 1)),
    }
}

// ===========================================================================
// Tests
// ===========================================================================
