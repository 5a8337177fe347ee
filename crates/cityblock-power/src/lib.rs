//! Power pole wiring for assembled layouts.
//!
//! Poles are found by prototype and position, then linked by recording each
//! pole in the other's `neighbours` list. Links are undirected: both ends
//! always list each other, and linking an already linked pair is a no-op.
//!
//! # Design
//!
//! - Templates place poles at exact half-tile coordinates, so position
//!   lookup uses [`POSITION_EPSILON`] only to absorb float noise from
//!   offset arithmetic.
//! - A lookup that finds nothing, or more than one pole, is an error. The
//!   assembler never guesses which pole was meant.

use std::fmt;

use cityblock_core::{Blueprint, EntityNumber, POSITION_EPSILON, Position};
use log::trace;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Pole kinds
// ---------------------------------------------------------------------------

/// Electric pole prototypes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoleKind {
    Small,
    Medium,
    Big,
    Substation,
}

impl PoleKind {
    pub const ALL: [PoleKind; 4] = [
        PoleKind::Small,
        PoleKind::Medium,
        PoleKind::Big,
        PoleKind::Substation,
    ];

    /// Prototype name used in blueprints.
    pub fn entity_name(self) -> &'static str {
        match self {
            PoleKind::Small => "small-electric-pole",
            PoleKind::Medium => "medium-electric-pole",
            PoleKind::Big => "big-electric-pole",
            PoleKind::Substation => "substation",
        }
    }

    /// Kind of the prototype called `name`, if it is a pole.
    pub fn from_entity_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.entity_name() == name)
    }
}

impl fmt::Display for PoleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.entity_name())
    }
}

/// A pole the layout expects at a fixed place.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PoleAnchor {
    pub kind: PoleKind,
    pub position: Position,
}

impl PoleAnchor {
    pub fn new(kind: PoleKind, x: f64, y: f64) -> Self {
        Self {
            kind,
            position: Position::new(x, y),
        }
    }
}

impl fmt::Display for PoleAnchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at ({}, {})",
            self.kind, self.position.x, self.position.y
        )
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from locating or linking poles.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PowerError {
    #[error("no {0} in the layout")]
    PoleNotFound(PoleAnchor),
    #[error("{count} poles match {anchor}")]
    AmbiguousPole { anchor: PoleAnchor, count: usize },
    #[error("entity {0} does not exist")]
    UnknownEntity(EntityNumber),
    #[error("entity {number} is a `{name}`, not a power pole")]
    NotAPole { number: EntityNumber, name: String },
    #[error("cannot link pole {0} to itself")]
    SelfLink(EntityNumber),
}

// ---------------------------------------------------------------------------
// Lookup
// ---------------------------------------------------------------------------

/// Number of the single `kind` pole standing at `position`.
pub fn find_pole(
    blueprint: &Blueprint,
    kind: PoleKind,
    position: Position,
) -> Result<EntityNumber, PowerError> {
    let anchor = PoleAnchor { kind, position };
    let mut found = blueprint
        .entities_named(kind.entity_name())
        .filter(|e| e.position.approx_eq(&position))
        .map(|e| e.entity_number);

    let first = found.next().ok_or(PowerError::PoleNotFound(anchor))?;
    match found.count() {
        0 => Ok(first),
        more => Err(PowerError::AmbiguousPole {
            anchor,
            count: more + 1,
        }),
    }
}

/// [`find_pole`] for an anchor.
pub fn find_anchor(blueprint: &Blueprint, anchor: &PoleAnchor) -> Result<EntityNumber, PowerError> {
    find_pole(blueprint, anchor.kind, anchor.position)
}

// ---------------------------------------------------------------------------
// Linking
// ---------------------------------------------------------------------------

fn check_pole(blueprint: &Blueprint, number: EntityNumber) -> Result<(), PowerError> {
    let entity = blueprint
        .entity(number)
        .ok_or(PowerError::UnknownEntity(number))?;
    if PoleKind::from_entity_name(&entity.name).is_none() {
        return Err(PowerError::NotAPole {
            number,
            name: entity.name.clone(),
        });
    }
    Ok(())
}

fn add_neighbour(blueprint: &mut Blueprint, pole: EntityNumber, neighbour: EntityNumber) -> bool {
    let Some(entity) = blueprint.entity_mut(pole) else {
        return false;
    };
    let neighbours = entity.neighbours.get_or_insert_with(Vec::new);
    if neighbours.contains(&neighbour) {
        return false;
    }
    neighbours.push(neighbour);
    true
}

/// Link poles `a` and `b`. Returns `false` if they were already linked.
///
/// Both numbers are checked before either list is touched.
pub fn connect(
    blueprint: &mut Blueprint,
    a: EntityNumber,
    b: EntityNumber,
) -> Result<bool, PowerError> {
    if a == b {
        return Err(PowerError::SelfLink(a));
    }
    check_pole(blueprint, a)?;
    check_pole(blueprint, b)?;

    let forward = add_neighbour(blueprint, a, b);
    let backward = add_neighbour(blueprint, b, a);
    trace!("link {a} <-> {b}");
    Ok(forward || backward)
}

/// Whether `a` lists `b` and `b` lists `a`.
pub fn are_linked(blueprint: &Blueprint, a: EntityNumber, b: EntityNumber) -> bool {
    let lists = |from: EntityNumber, to: EntityNumber| {
        blueprint
            .entity(from)
            .and_then(|e| e.neighbours.as_ref())
            .is_some_and(|n| n.contains(&to))
    };
    lists(a, b) && lists(b, a)
}

/// Locate both anchors and link them.
pub fn connect_anchors(
    blueprint: &mut Blueprint,
    from: &PoleAnchor,
    to: &PoleAnchor,
) -> Result<(EntityNumber, EntityNumber), PowerError> {
    let a = find_anchor(blueprint, from)?;
    let b = find_anchor(blueprint, to)?;
    connect(blueprint, a, b)?;
    Ok((a, b))
}

// ===========================================================================
// Tests
// ===========================================================================
