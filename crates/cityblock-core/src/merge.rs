//! Appending one blueprint onto another.
//!
//! The source's entities are cloned, shifted by an [`Offset`] and renumbered
//! so they continue after the target's highest entity number. Renumbering
//! goes through an explicit table built from the source itself, so every wire
//! and neighbour inside the copy keeps pointing at the same logical entity.

use std::collections::BTreeMap;

use log::debug;

use crate::blueprint::{Blueprint, Entity, Offset};
use crate::id::EntityNumber;

/// Errors from merging two blueprints. On error the target is unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MergeError {
    #[error("source entity {entity} references {target}, which is not part of the source")]
    DanglingReference {
        entity: EntityNumber,
        target: EntityNumber,
    },
    #[error("source blueprint uses entity number {0} more than once")]
    DuplicateNumber(EntityNumber),
}

/// Range of entities appended by a merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeSummary {
    /// Number given to the first appended entity.
    pub first: EntityNumber,
    /// How many entities were appended.
    pub count: usize,
}

impl MergeSummary {
    /// Numbers of all appended entities, in order.
    pub fn numbers(&self) -> impl Iterator<Item = EntityNumber> {
        let first = self.first;
        (0..self.count as u32).map(move |k| first.offset(k))
    }
}

/// Old-number to new-number table for one merge.
struct Renumbering {
    table: BTreeMap<EntityNumber, EntityNumber>,
}

impl Renumbering {
    fn for_source(source: &Blueprint, first: EntityNumber) -> Result<Self, MergeError> {
        let mut table = BTreeMap::new();
        for (k, entity) in source.entities.iter().enumerate() {
            let renumbered = first.offset(k as u32);
            if table.insert(entity.entity_number, renumbered).is_some() {
                return Err(MergeError::DuplicateNumber(entity.entity_number));
            }
        }
        Ok(Self { table })
    }

    fn resolve(
        &self,
        owner: EntityNumber,
        target: EntityNumber,
    ) -> Result<EntityNumber, MergeError> {
        self.table
            .get(&target)
            .copied()
            .ok_or(MergeError::DanglingReference {
                entity: owner,
                target,
            })
    }

    /// Clone `entity` into its merged form.
    fn apply(&self, entity: &Entity, offset: Offset) -> Result<Entity, MergeError> {
        let owner = entity.entity_number;
        let mut copy = entity.clone();
        copy.entity_number = self.resolve(owner, owner)?;
        copy.position = copy.position.translated(offset);

        if let Some(connections) = copy.connections.as_mut() {
            for wire in connections.wires_mut() {
                if let Some(target) = wire.entity_id {
                    wire.entity_id = Some(self.resolve(owner, target)?);
                }
            }
        }

        if let Some(neighbours) = copy.neighbours.as_mut() {
            for neighbour in neighbours.iter_mut() {
                *neighbour = self.resolve(owner, *neighbour)?;
            }
        }

        Ok(copy)
    }
}

impl Blueprint {
    /// Append a repositioned, renumbered copy of `source`'s entities.
    ///
    /// Entities keep their source order. `source` is only read, so the same
    /// master can be merged any number of times at different offsets.
    pub fn merge(
        &mut self,
        source: &Blueprint,
        offset: Offset,
    ) -> Result<MergeSummary, MergeError> {
        let first = self.next_entity_number();
        let renumbering = Renumbering::for_source(source, first)?;

        let appended = source
            .entities
            .iter()
            .map(|entity| renumbering.apply(entity, offset))
            .collect::<Result<Vec<_>, _>>()?;

        let count = appended.len();
        self.entities.extend(appended);

        debug!(
            "merged {count} entities at ({}, {}) starting at {first}",
            offset.x, offset.y
        );

        Ok(MergeSummary { first, count })
    }
}

// ===========================================================================
// Tests
// ===========================================================================
