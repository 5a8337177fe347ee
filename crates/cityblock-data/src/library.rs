//! The Template Library: the read-only master blueprints a city block is
//! assembled from.
//!
//! Masters are parsed and validated once, when the library is built, and
//! are only handed out as `&Blueprint`. Every consumer clones before it
//! changes anything.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use cityblock_core::{Blueprint, CommodityClass};
use cityblock_logic::StationVariant;
use log::debug;

use crate::loader::{
    DataLoadError, Format, deserialize_str, find_data_file, find_template_file, load_template,
    parse_template, require_template_file,
};
use crate::schema::{LayoutConfig, SlotRole};

// ===========================================================================
// Template names
// ===========================================================================

pub const SKELETON: &str = "skeleton";
pub const BRANCH_BOTTOM: &str = "branch_bottom";
pub const LAYOUT: &str = "layout";

/// Base name of the `index`-th branch template.
pub fn branch_name(index: usize) -> String {
    format!("branch_{index}")
}

/// Underground segment carrying a slot's commodity past the rows below it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportKind {
    /// Belts running away from the trunk, for ingredients.
    Belts,
    /// Belts running towards the trunk, for products.
    BeltsUp,
    Pipes,
}

impl TransportKind {
    pub const ALL: [TransportKind; 3] = [
        TransportKind::Belts,
        TransportKind::BeltsUp,
        TransportKind::Pipes,
    ];

    /// Segment for a slot with the given role and commodity class. Fluids
    /// use pipes in either direction.
    pub fn for_slot(role: SlotRole, class: CommodityClass) -> Self {
        match (class, role) {
            (CommodityClass::Fluid, _) => TransportKind::Pipes,
            (CommodityClass::Item, SlotRole::Ingredient) => TransportKind::Belts,
            (CommodityClass::Item, SlotRole::Product) => TransportKind::BeltsUp,
        }
    }

    pub fn template_name(self) -> &'static str {
        match self {
            TransportKind::Belts => "underground_belts",
            TransportKind::BeltsUp => "underground_belts_up",
            TransportKind::Pipes => "underground_pipes",
        }
    }
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.template_name())
    }
}

// ===========================================================================
// Built-in templates
// ===========================================================================

macro_rules! builtin {
    ($name:literal) => {
        ($name, include_str!(concat!("../templates/", $name, ".json")))
    };
}

const BUILTIN_TEMPLATES: &[(&str, &str)] = &[
    builtin!("skeleton"),
    builtin!("branch_bottom"),
    builtin!("item_unloading_station"),
    builtin!("item_loading_station"),
    builtin!("fluid_unloading_station"),
    builtin!("fluid_loading_station"),
    builtin!("underground_belts"),
    builtin!("underground_belts_up"),
    builtin!("underground_pipes"),
];

const BUILTIN_BRANCHES: &[(&str, &str)] = &[
    builtin!("branch_0"),
    builtin!("branch_1"),
    builtin!("branch_2"),
    builtin!("branch_3"),
    builtin!("branch_4"),
    builtin!("branch_5"),
];

const BUILTIN_LAYOUT: &str = include_str!("../templates/layout.ron");

// ===========================================================================
// Library
// ===========================================================================

/// All master templates plus the slot geometry they were authored for.
#[derive(Debug, Clone)]
pub struct TemplateLibrary {
    skeleton: Blueprint,
    branches: Vec<Blueprint>,
    branch_bottom: Blueprint,
    stations: HashMap<StationVariant, Blueprint>,
    transport: HashMap<TransportKind, Blueprint>,
    layout: LayoutConfig,
}

/// Named templates collected while a library is being built.
struct Sources {
    templates: HashMap<String, Blueprint>,
}

impl Sources {
    fn take(&mut self, name: &str, origin: &Path) -> Result<Blueprint, DataLoadError> {
        self.templates
            .remove(name)
            .ok_or_else(|| DataLoadError::MissingRequired {
                file: name.to_string(),
                dir: origin.to_path_buf(),
            })
    }
}

impl TemplateLibrary {
    fn assemble(
        mut sources: Sources,
        branches: Vec<Blueprint>,
        layout: LayoutConfig,
        origin: &Path,
    ) -> Result<Self, DataLoadError> {
        if branches.is_empty() {
            return Err(DataLoadError::MissingRequired {
                file: branch_name(0),
                dir: origin.to_path_buf(),
            });
        }

        let skeleton = sources.take(SKELETON, origin)?;
        let branch_bottom = sources.take(BRANCH_BOTTOM, origin)?;

        let mut stations = HashMap::new();
        for variant in StationVariant::ALL {
            stations.insert(variant, sources.take(variant.template_name(), origin)?);
        }
        let mut transport = HashMap::new();
        for kind in TransportKind::ALL {
            transport.insert(kind, sources.take(kind.template_name(), origin)?);
        }

        debug!(
            "template library from {}: {} branches",
            origin.display(),
            branches.len()
        );
        Ok(Self {
            skeleton,
            branches,
            branch_bottom,
            stations,
            transport,
            layout,
        })
    }

    /// Names of every non-branch template a library needs.
    fn required_names() -> impl Iterator<Item = &'static str> {
        [SKELETON, BRANCH_BOTTOM]
            .into_iter()
            .chain(StationVariant::ALL.into_iter().map(|v| v.template_name()))
            .chain(TransportKind::ALL.into_iter().map(|k| k.template_name()))
    }

    /// The templates shipped with this crate: six branches.
    pub fn builtin() -> Result<Self, DataLoadError> {
        let origin = Path::new("<builtin>");
        let parse = |name: &str, text: &str| {
            parse_template(text, Format::Json, &PathBuf::from(format!("{name}.json")))
        };

        let mut templates = HashMap::new();
        for &(name, text) in BUILTIN_TEMPLATES {
            templates.insert(name.to_string(), parse(name, text)?);
        }
        let branches = BUILTIN_BRANCHES
            .iter()
            .map(|&(name, text)| parse(name, text))
            .collect::<Result<Vec<_>, _>>()?;
        let layout = deserialize_str(BUILTIN_LAYOUT, Format::Ron, Path::new("layout.ron"))?;

        Self::assemble(Sources { templates }, branches, layout, origin)
    }

    /// Load a library from a directory holding the same template names as
    /// the built-in set, each as `.json`, `.bp` or `.txt`.
    ///
    /// Branches are read as `branch_0`, `branch_1`, ... up to the first
    /// missing index. `layout.ron|toml|json` is optional.
    pub fn load_dir(dir: &Path) -> Result<Self, DataLoadError> {
        let mut templates = HashMap::new();
        for name in Self::required_names() {
            let path = require_template_file(dir, name)?;
            templates.insert(name.to_string(), load_template(&path)?);
        }

        let mut branches = Vec::new();
        while let Some(path) = find_template_file(dir, &branch_name(branches.len()))? {
            branches.push(load_template(&path)?);
        }

        let layout = match find_data_file(dir, LAYOUT)? {
            Some(path) => LayoutConfig::load(&path)?,
            None => LayoutConfig::default(),
        };

        Self::assemble(Sources { templates }, branches, layout, dir)
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn skeleton(&self) -> &Blueprint {
        &self.skeleton
    }

    /// The `index`-th branch, if the library has that many.
    pub fn branch(&self, index: usize) -> Option<&Blueprint> {
        self.branches.get(index)
    }

    pub fn branches(&self) -> &[Blueprint] {
        &self.branches
    }

    /// Largest number of slots a layout can have.
    pub fn capacity(&self) -> usize {
        self.branches.len()
    }

    /// End piece of the branch line. Shipped with the set; the assembler
    /// does not place it.
    pub fn branch_bottom(&self) -> &Blueprint {
        &self.branch_bottom
    }

    pub fn station(&self, variant: StationVariant) -> &Blueprint {
        // Every variant is inserted by `assemble`.
        &self.stations[&variant]
    }

    pub fn transport(&self, kind: TransportKind) -> &Blueprint {
        &self.transport[&kind]
    }

    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }
}

// ===========================================================================
// Tests
// ===========================================================================
