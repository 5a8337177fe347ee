//! Typed model of the blueprint exchange document.
//!
//! Only the fields the composition engine reads or rewrites are modelled
//! explicitly. Everything else is captured in a flattened `extra` map on the
//! owning struct, so a document survives decode/encode without losing data.

use crate::id::EntityNumber;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::ops::Add;

/// Fields of a JSON object that are carried through untouched.
pub type Extra = Map<String, Value>;

// ---------------------------------------------------------------------------
// Geometry
// ---------------------------------------------------------------------------

/// A position on the blueprint grid. Entity centres sit on whole or half
/// tiles depending on their footprint.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// Tolerance used when comparing positions. Grid coordinates are whole or
/// half tiles, so anything below this is representation noise.
pub const POSITION_EPSILON: f64 = 1e-6;

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// This position shifted by `offset`.
    pub fn translated(self, offset: Offset) -> Self {
        Self {
            x: self.x + offset.x,
            y: self.y + offset.y,
        }
    }

    /// Whether both coordinates agree within [`POSITION_EPSILON`].
    pub fn approx_eq(&self, other: &Position) -> bool {
        (self.x - other.x).abs() < POSITION_EPSILON && (self.y - other.y).abs() < POSITION_EPSILON
    }
}

impl Add<Offset> for Position {
    type Output = Position;

    fn add(self, offset: Offset) -> Position {
        self.translated(offset)
    }
}

/// A 2D translation applied while merging. Missing fields default to 0.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Offset {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
}

impl Offset {
    pub const ZERO: Offset = Offset { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// This offset repeated `n` times (the anchor of the `n`-th slot when
    /// `self` is the slot pitch).
    pub fn times(self, n: usize) -> Self {
        let n = n as f64;
        Self {
            x: self.x * n,
            y: self.y * n,
        }
    }
}

// ---------------------------------------------------------------------------
// Signals
// ---------------------------------------------------------------------------

/// The namespace a signal name lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalType {
    Item,
    Fluid,
    Virtual,
}

/// A circuit signal, e.g. `{"type": "virtual", "name": "signal-I"}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SignalId {
    #[serde(rename = "type")]
    pub kind: SignalType,
    pub name: String,
}

impl SignalId {
    pub fn new(kind: SignalType, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
        }
    }

    pub fn virtual_signal(name: impl Into<String>) -> Self {
        Self::new(SignalType::Virtual, name)
    }
}

/// Arithmetic operation of an arithmetic combinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ArithmeticOperation {
    #[default]
    #[serde(rename = "*")]
    Multiply,
    #[serde(rename = "/")]
    Divide,
    #[serde(rename = "+")]
    Add,
    #[serde(rename = "-")]
    Subtract,
    #[serde(rename = "%")]
    Modulo,
    #[serde(rename = "^")]
    Power,
    #[serde(rename = "<<")]
    ShiftLeft,
    #[serde(rename = ">>")]
    ShiftRight,
    #[serde(rename = "AND")]
    And,
    #[serde(rename = "OR")]
    Or,
    #[serde(rename = "XOR")]
    Xor,
}

impl ArithmeticOperation {
    /// The operator as written in the exchange format.
    pub fn symbol(self) -> &'static str {
        match self {
            ArithmeticOperation::Multiply => "*",
            ArithmeticOperation::Divide => "/",
            ArithmeticOperation::Add => "+",
            ArithmeticOperation::Subtract => "-",
            ArithmeticOperation::Modulo => "%",
            ArithmeticOperation::Power => "^",
            ArithmeticOperation::ShiftLeft => "<<",
            ArithmeticOperation::ShiftRight => ">>",
            ArithmeticOperation::And => "AND",
            ArithmeticOperation::Or => "OR",
            ArithmeticOperation::Xor => "XOR",
        }
    }
}

impl fmt::Display for ArithmeticOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Operands and operation of an arithmetic combinator. Each side is either a
/// signal or a constant.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ArithmeticConditions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_signal: Option<SignalId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_constant: Option<i32>,
    #[serde(default)]
    pub operation: ArithmeticOperation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub second_signal: Option<SignalId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub second_constant: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_signal: Option<SignalId>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Kind-specific circuit configuration of an entity.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ControlBehavior {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arithmetic_conditions: Option<ArithmeticConditions>,
    #[serde(flatten)]
    pub extra: Extra,
}

// ---------------------------------------------------------------------------
// Wires
// ---------------------------------------------------------------------------

/// One end of a circuit wire, pointing at another entity of the same
/// blueprint.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WireConnection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<EntityNumber>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub circuit_id: Option<u8>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl WireConnection {
    pub fn to(entity: EntityNumber, circuit_id: Option<u8>) -> Self {
        Self {
            entity_id: Some(entity),
            circuit_id,
            extra: Extra::new(),
        }
    }
}

/// Red and green wires attached to one circuit connection point.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ConnectionPoint {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub red: Option<Vec<WireConnection>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub green: Option<Vec<WireConnection>>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Circuit connections of an entity. Combinators have an input point `"1"`
/// and an output point `"2"`; most other entities only use `"1"`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Connections {
    #[serde(rename = "1", default, skip_serializing_if = "Option::is_none")]
    pub first: Option<ConnectionPoint>,
    #[serde(rename = "2", default, skip_serializing_if = "Option::is_none")]
    pub second: Option<ConnectionPoint>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Connections {
    /// Every wire on the four buses (point 1/2, red/green).
    pub fn wires(&self) -> impl Iterator<Item = &WireConnection> {
        [&self.first, &self.second]
            .into_iter()
            .flatten()
            .flat_map(|point| [&point.red, &point.green].into_iter().flatten())
            .flatten()
    }

    /// Mutable access to every wire on the four buses.
    pub fn wires_mut(&mut self) -> impl Iterator<Item = &mut WireConnection> {
        [&mut self.first, &mut self.second]
            .into_iter()
            .flatten()
            .flat_map(|point| [&mut point.red, &mut point.green].into_iter().flatten())
            .flatten()
    }
}

// ---------------------------------------------------------------------------
// Entities
// ---------------------------------------------------------------------------

/// A single placed entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub entity_number: EntityNumber,
    pub name: String,
    pub position: Position,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connections: Option<Connections>,
    /// Copper-wire neighbours of an electric pole (undirected).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub neighbours: Option<Vec<EntityNumber>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control_behavior: Option<ControlBehavior>,
    /// Display name of a train stop.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub station: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Entity {
    pub fn new(entity_number: EntityNumber, name: impl Into<String>, position: Position) -> Self {
        Self {
            entity_number,
            name: name.into(),
            position,
            direction: None,
            connections: None,
            neighbours: None,
            control_behavior: None,
            station: None,
            extra: Extra::new(),
        }
    }

    pub fn arithmetic_conditions(&self) -> Option<&ArithmeticConditions> {
        self.control_behavior
            .as_ref()
            .and_then(|cb| cb.arithmetic_conditions.as_ref())
    }

    pub fn arithmetic_conditions_mut(&mut self) -> Option<&mut ArithmeticConditions> {
        self.control_behavior
            .as_mut()
            .and_then(|cb| cb.arithmetic_conditions.as_mut())
    }

    /// Entity numbers this entity points at through wires or neighbours.
    pub fn references(&self) -> impl Iterator<Item = EntityNumber> + '_ {
        let wires = self
            .connections
            .iter()
            .flat_map(|c| c.wires())
            .filter_map(|w| w.entity_id);
        let neighbours = self.neighbours.iter().flatten().copied();
        wires.chain(neighbours)
    }
}

/// A blueprint icon slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Icon {
    pub signal: SignalId,
    pub index: u32,
}

// ---------------------------------------------------------------------------
// Blueprint
// ---------------------------------------------------------------------------

fn default_item() -> String {
    "blueprint".to_string()
}

/// An ordered list of entities plus document metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Blueprint {
    #[serde(default = "default_item")]
    pub item: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub icons: Vec<Icon>,
    #[serde(default)]
    pub entities: Vec<Entity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u64>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Blueprint {
    /// Create an empty blueprint.
    pub fn new() -> Self {
        Self {
            item: default_item(),
            label: None,
            icons: Vec::new(),
            entities: Vec::new(),
            version: None,
            extra: Extra::new(),
        }
    }

    /// Number of entities.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Highest entity number in use, if any.
    pub fn max_entity_number(&self) -> Option<EntityNumber> {
        self.entities.iter().map(|e| e.entity_number).max()
    }

    /// The number the next appended entity should receive.
    pub fn next_entity_number(&self) -> EntityNumber {
        self.max_entity_number()
            .map_or(EntityNumber::FIRST, |n| n.offset(1))
    }

    pub fn entity(&self, number: EntityNumber) -> Option<&Entity> {
        self.entities.iter().find(|e| e.entity_number == number)
    }

    pub fn entity_mut(&mut self, number: EntityNumber) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.entity_number == number)
    }

    /// Entities with the given prototype name, in document order.
    pub fn entities_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Entity> {
        self.entities.iter().filter(move |e| e.name == name)
    }
}

impl Default for Blueprint {
    fn default() -> Self {
        Self::new()
    }
}

/// The top-level exchange document: `{"blueprint": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlueprintString {
    pub blueprint: Blueprint,
}

impl BlueprintString {
    pub fn new(blueprint: Blueprint) -> Self {
        Self { blueprint }
    }
}

impl From<Blueprint> for BlueprintString {
    fn from(blueprint: Blueprint) -> Self {
        Self::new(blueprint)
    }
}

// ===========================================================================
// Tests
// ===========================================================================
