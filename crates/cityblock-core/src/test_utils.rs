//! Shared test helpers for unit tests, integration tests, and benchmarks.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]`.

use std::num::NonZeroU32;

use crate::blueprint::*;
use crate::commodity::Commodity;
use crate::id::EntityNumber;

// ===========================================================================
// Commodities
// ===========================================================================

pub fn stack(n: u32) -> NonZeroU32 {
    NonZeroU32::new(n).expect("stack size must be positive")
}

pub fn iron_plate() -> Commodity {
    Commodity::item("iron-plate", stack(100))
}

pub fn gear_wheel() -> Commodity {
    Commodity::item("iron-gear-wheel", stack(100))
}

pub fn copper_cable() -> Commodity {
    Commodity::item("copper-cable", stack(200))
}

pub fn water() -> Commodity {
    Commodity::fluid("water")
}

pub fn petroleum() -> Commodity {
    Commodity::fluid("petroleum-gas")
}

// ===========================================================================
// Entities
// ===========================================================================

pub fn entity(number: u32, name: &str, x: f64, y: f64) -> Entity {
    Entity::new(EntityNumber(number), name, Position::new(x, y))
}

/// An arithmetic combinator with the given conditions.
pub fn arithmetic(number: u32, x: f64, y: f64, conditions: ArithmeticConditions) -> Entity {
    let mut e = entity(number, "arithmetic-combinator", x, y);
    e.control_behavior = Some(ControlBehavior {
        arithmetic_conditions: Some(conditions),
        extra: Extra::new(),
    });
    e
}

/// `signal <op> constant`.
pub fn signal_by_constant(
    signal: &str,
    op: ArithmeticOperation,
    constant: i32,
) -> ArithmeticConditions {
    ArithmeticConditions {
        first_signal: Some(SignalId::virtual_signal(signal)),
        operation: op,
        second_constant: Some(constant),
        output_signal: Some(SignalId::virtual_signal(signal)),
        ..Default::default()
    }
}

/// `constant <op> signal`.
pub fn constant_by_signal(
    constant: i32,
    op: ArithmeticOperation,
    signal: &str,
) -> ArithmeticConditions {
    ArithmeticConditions {
        first_constant: Some(constant),
        operation: op,
        second_signal: Some(SignalId::virtual_signal(signal)),
        output_signal: Some(SignalId::virtual_signal(signal)),
        ..Default::default()
    }
}

// ===========================================================================
// Blueprints
// ===========================================================================

/// A row of `len` poles, each linked to its neighbours on either side.
pub fn pole_chain(name: &str, len: u32) -> Blueprint {
    let mut bp = Blueprint::new();
    for n in 1..=len {
        let mut pole = entity(n, name, n as f64 * 5.0 + 0.5, 0.5);
        let mut neighbours = Vec::new();
        if n > 1 {
            neighbours.push(EntityNumber(n - 1));
        }
        if n < len {
            neighbours.push(EntityNumber(n + 1));
        }
        pole.neighbours = Some(neighbours);
        bp.entities.push(pole);
    }
    bp
}

fn point(red: Option<WireConnection>, green: Option<WireConnection>) -> ConnectionPoint {
    ConnectionPoint {
        red: red.map(|w| vec![w]),
        green: green.map(|w| vec![w]),
        extra: Extra::new(),
    }
}

/// Two combinators wired to each other: red from #1 input to #2 output and
/// green from #1 output to #2 input.
pub fn combinator_pair() -> Blueprint {
    let mut a = arithmetic(
        1,
        0.5,
        1.0,
        signal_by_constant("signal-A", ArithmeticOperation::Multiply, 2),
    );
    a.connections = Some(Connections {
        first: Some(point(Some(WireConnection::to(EntityNumber(2), Some(2))), None)),
        second: Some(point(None, Some(WireConnection::to(EntityNumber(2), Some(1))))),
        extra: Extra::new(),
    });

    let mut b = arithmetic(
        2,
        1.5,
        1.0,
        signal_by_constant("signal-B", ArithmeticOperation::Add, 1),
    );
    b.connections = Some(Connections {
        first: Some(point(None, Some(WireConnection::to(EntityNumber(1), Some(2))))),
        second: Some(point(Some(WireConnection::to(EntityNumber(1), Some(1))), None)),
        extra: Extra::new(),
    });

    let mut bp = Blueprint::new();
    bp.entities.extend([a, b]);
    bp
}
