//! Referential integrity checks for a blueprint.
//!
//! A well-formed blueprint uses each entity number once, and every wire or
//! neighbour it records points at an entity inside the same blueprint.

use std::collections::BTreeSet;

use crate::blueprint::Blueprint;
use crate::id::EntityNumber;

/// A single integrity violation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("entity number {0} is used more than once")]
    DuplicateNumber(EntityNumber),
    #[error("entity {entity} is wired to {target}, which does not exist")]
    DanglingWire {
        entity: EntityNumber,
        target: EntityNumber,
    },
    #[error("entity {entity} lists neighbour {target}, which does not exist")]
    DanglingNeighbour {
        entity: EntityNumber,
        target: EntityNumber,
    },
}

impl Blueprint {
    /// Every integrity violation, in document order.
    pub fn problems(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        let mut numbers = BTreeSet::new();
        for entity in &self.entities {
            if !numbers.insert(entity.entity_number) {
                errors.push(ValidationError::DuplicateNumber(entity.entity_number));
            }
        }

        for entity in &self.entities {
            let wires = entity.connections.iter().flat_map(|c| c.wires());
            for target in wires.filter_map(|w| w.entity_id) {
                if !numbers.contains(&target) {
                    errors.push(ValidationError::DanglingWire {
                        entity: entity.entity_number,
                        target,
                    });
                }
            }
            for &target in entity.neighbours.iter().flatten() {
                if !numbers.contains(&target) {
                    errors.push(ValidationError::DanglingNeighbour {
                        entity: entity.entity_number,
                        target,
                    });
                }
            }
        }
        errors
    }

    /// `Ok` if the blueprint has no integrity violations, otherwise the
    /// first one found.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self.problems().into_iter().next() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
