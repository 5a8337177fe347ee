//! The Layout Assembler.
//!
//! A city block is built slot by slot on top of the skeleton. For slot `i`:
//!
//! 1. the `i`-th branch is merged in place (branches are pre-positioned);
//! 2. the slot's station is built for its commodity and merged at the slot
//!    anchor;
//! 3. every earlier slot `j` gets a transport segment across the new row,
//!    chosen by slot `j`'s own role and commodity;
//! 4. the station pole is linked to the trunk pole (first slot) or to the
//!    slot's branch pole.
//!
//! Integrity problems in the finished layout are logged as warnings.

use cityblock_core::{Blueprint, BlueprintString, codec};
use cityblock_data::{Recipe, Slot, TemplateLibrary, TransportKind};
use cityblock_logic::{StationVariant, build_station};
use cityblock_power::{PowerError, connect, find_anchor};
use log::{debug, info, warn};

use crate::error::AssembleError;

/// Label prefix of an assembled blueprint.
pub const LABEL_PREFIX: &str = "City block";

/// Counts of what an assembly did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssemblyStats {
    pub slots: usize,
    pub branch_merges: usize,
    pub station_merges: usize,
    pub transport_merges: usize,
    pub power_links: usize,
}

/// An assembled layout before encoding.
#[derive(Debug, Clone)]
pub struct Assembly {
    pub blueprint: Blueprint,
    pub stats: AssemblyStats,
}

impl Assembly {
    /// Encode the layout as an exchange string.
    pub fn encode(&self) -> Result<String, AssembleError> {
        Ok(codec::encode(&BlueprintString::new(self.blueprint.clone()))?)
    }
}

/// Builds city blocks from one template library.
///
/// The assembler only borrows the library, so any number of assemblies can
/// share the same masters.
#[derive(Debug, Clone, Copy)]
pub struct Assembler<'a> {
    library: &'a TemplateLibrary,
}

impl<'a> Assembler<'a> {
    pub fn new(library: &'a TemplateLibrary) -> Self {
        Self { library }
    }

    pub fn library(&self) -> &'a TemplateLibrary {
        self.library
    }

    /// Assemble `recipe` and encode it as an exchange string.
    pub fn assemble(&self, recipe: &Recipe) -> Result<String, AssembleError> {
        self.assemble_blueprint(recipe)?.encode()
    }

    /// Assemble `recipe` into a blueprint.
    pub fn assemble_blueprint(&self, recipe: &Recipe) -> Result<Assembly, AssembleError> {
        let requested = recipe.slot_count();
        let capacity = self.library.capacity();
        if requested > capacity {
            return Err(AssembleError::CapacityExceeded {
                requested,
                capacity,
            });
        }

        let mut layout = self.library.skeleton().clone();
        if let Some(name) = &recipe.name {
            layout.label = Some(format!("{LABEL_PREFIX}: {name}"));
        }

        let mut stats = AssemblyStats::default();
        let slots: Vec<Slot<'_>> = recipe.slots().collect();
        for slot in &slots {
            self.place_slot(&mut layout, slot, &slots[..slot.index], &mut stats)?;
            stats.slots += 1;
        }

        for problem in layout.problems() {
            warn!("assembled layout: {problem}");
        }
        info!(
            "assembled {} slots: {} entities, {} transport segments, {} power links",
            stats.slots,
            layout.len(),
            stats.transport_merges,
            stats.power_links
        );
        Ok(Assembly {
            blueprint: layout,
            stats,
        })
    }

    fn place_slot(
        &self,
        layout: &mut Blueprint,
        slot: &Slot<'_>,
        earlier: &[Slot<'_>],
        stats: &mut AssemblyStats,
    ) -> Result<(), AssembleError> {
        let i = slot.index;
        let geometry = self.library.layout();

        // Capacity was checked up front.
        let branch = self
            .library
            .branch(i)
            .ok_or(AssembleError::CapacityExceeded {
                requested: i + 1,
                capacity: self.library.capacity(),
            })?;
        layout.merge(branch, Default::default())?;
        stats.branch_merges += 1;

        let variant = StationVariant::new(slot.role.direction(), slot.commodity.class());
        let station = build_station(self.library.station(variant), variant, slot.commodity)
            .map_err(|source| AssembleError::Station { slot: i, source })?;
        let merged = layout.merge(&station, geometry.slot_offset(i))?;
        stats.station_merges += 1;
        debug!(
            "slot {i}: {variant} station for `{}` as {}..{}",
            slot.commodity.name(),
            merged.first,
            merged.first.offset(merged.count.saturating_sub(1) as u32)
        );

        for column in earlier {
            let kind = TransportKind::for_slot(column.role, column.commodity.class());
            layout.merge(
                self.library.transport(kind),
                geometry.transport_offset(column.index, i),
            )?;
            stats.transport_merges += 1;
        }

        self.link_power(layout, i)
            .map_err(|source| AssembleError::Power { slot: i, source })?;
        stats.power_links += 1;
        Ok(())
    }

    fn link_power(&self, layout: &mut Blueprint, index: usize) -> Result<(), PowerError> {
        let geometry = self.library.layout();
        let feeder = find_anchor(layout, &geometry.feeder_pole_at(index))?;
        let station = find_anchor(layout, &geometry.station_pole_at(index))?;
        connect(layout, feeder, station)?;
        Ok(())
    }
}

// ===========================================================================
// Tests
// ===========================================================================
