//! Serde data file structs: recipes and slot layout.
//!
//! These are read from RON, JSON, or TOML files by the loader, or built
//! directly in code.

use std::path::Path;

use cityblock_core::{Commodity, Offset};
use cityblock_logic::StationDirection;
use cityblock_power::{PoleAnchor, PoleKind};
use serde::{Deserialize, Serialize};

use crate::loader::{DataLoadError, Format, deserialize_file, deserialize_str};

// ===========================================================================
// Recipes
// ===========================================================================

/// What a city block consumes and produces.
///
/// ```toml
/// name = "gears"
///
/// [[ingredients]]
/// class = "item"
/// name = "iron-plate"
/// stack_size = 100
///
/// [[products]]
/// class = "item"
/// name = "iron-gear-wheel"
/// stack_size = 100
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Recipe {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub ingredients: Vec<Commodity>,
    pub products: Vec<Commodity>,
}

/// Whether a slot unloads an ingredient or loads a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotRole {
    Ingredient,
    Product,
}

impl SlotRole {
    /// Ingredients arrive by train, products leave by train.
    pub fn direction(self) -> StationDirection {
        match self {
            SlotRole::Ingredient => StationDirection::Unloading,
            SlotRole::Product => StationDirection::Loading,
        }
    }
}

/// One station position of a city block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot<'a> {
    pub index: usize,
    pub role: SlotRole,
    pub commodity: &'a Commodity,
}

impl Recipe {
    pub fn new(ingredients: Vec<Commodity>, products: Vec<Commodity>) -> Self {
        Self {
            name: None,
            ingredients,
            products,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Parse a recipe from JSON text.
    pub fn from_json(json: &str) -> Result<Self, DataLoadError> {
        deserialize_str(json, Format::Json, Path::new("<recipe>"))
    }

    /// Number of slots: ingredients plus products.
    pub fn slot_count(&self) -> usize {
        self.ingredients.len() + self.products.len()
    }

    /// Ingredient slots first, then product slots, in file order.
    pub fn slots(&self) -> impl Iterator<Item = Slot<'_>> {
        let ingredients = self.ingredients.iter().map(|c| (SlotRole::Ingredient, c));
        let products = self.products.iter().map(|c| (SlotRole::Product, c));
        ingredients
            .chain(products)
            .enumerate()
            .map(|(index, (role, commodity))| Slot {
                index,
                role,
                commodity,
            })
    }
}

/// Load a recipe file (RON, TOML or JSON).
pub fn load_recipe(path: &Path) -> Result<Recipe, DataLoadError> {
    deserialize_file(path)
}

// ===========================================================================
// Layout
// ===========================================================================

/// Where slot-relative things go. Slot `i` is anchored at `slot_pitch * i`;
/// the pole bases are the slot 0 positions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub slot_pitch: Offset,
    /// Pole in the skeleton that slot 0 connects to.
    pub trunk_pole: PoleAnchor,
    pub branch_pole: PoleAnchor,
    pub station_pole: PoleAnchor,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            slot_pitch: Offset::new(-8.0, 6.0),
            trunk_pole: PoleAnchor::new(PoleKind::Big, 72.0, 0.0),
            branch_pole: PoleAnchor::new(PoleKind::Medium, 69.5, 5.5),
            station_pole: PoleAnchor::new(PoleKind::Medium, 68.5, 7.5),
        }
    }
}

impl LayoutConfig {
    /// Anchor offset of slot `index`.
    pub fn slot_offset(&self, index: usize) -> Offset {
        self.slot_pitch.times(index)
    }

    /// Offset of the transport segment backfilled under slot `column` when
    /// slot `row` is added. `row` must be at least 1.
    pub fn transport_offset(&self, column: usize, row: usize) -> Offset {
        let rows_above = row.saturating_sub(1) as f64;
        Offset::new(
            self.slot_pitch.x * column as f64,
            self.slot_pitch.y * rows_above,
        )
    }

    fn shifted(anchor: PoleAnchor, offset: Offset) -> PoleAnchor {
        PoleAnchor {
            kind: anchor.kind,
            position: anchor.position + offset,
        }
    }

    /// Branch pole of slot `index`.
    pub fn branch_pole_at(&self, index: usize) -> PoleAnchor {
        Self::shifted(self.branch_pole, self.slot_offset(index))
    }

    /// Station pole of slot `index`.
    pub fn station_pole_at(&self, index: usize) -> PoleAnchor {
        Self::shifted(self.station_pole, self.slot_offset(index))
    }

    /// The pole slot `index` feeds its station from: the skeleton's trunk
    /// pole for the first slot, the slot's own branch pole otherwise.
    pub fn feeder_pole_at(&self, index: usize) -> PoleAnchor {
        if index == 0 {
            self.trunk_pole
        } else {
            self.branch_pole_at(index)
        }
    }

    /// Read a layout file (RON, TOML or JSON). Missing fields keep their
    /// defaults.
    pub fn load(path: &Path) -> Result<Self, DataLoadError> {
        deserialize_file(path)
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::tests::{cleanup, make_test_dir};
    use cityblock_core::Position;
    use cityblock_core::test_utils::*;
    use std::fs;

    #[test]
    fn recipe_from_json() {
        let recipe = Recipe::from_json(
            r#"{
                "ingredients": [{"class": "item", "name": "iron-plate", "stack_size": 100}],
                "products": [{"class": "fluid", "name": "water"}]
            }"#,
        )
        .unwrap();
        assert_eq!(recipe, Recipe::new(vec![iron_plate()], vec![water()]));
        assert_eq!(recipe.name, None);
    }

    #[test]
    fn recipe_rejects_zero_stack_size() {
        let result = Recipe::from_json(
            r#"{"ingredients": [{"class": "item", "name": "x", "stack_size": 0}], "products": []}"#,
        );
        assert!(matches!(result, Err(DataLoadError::Parse { .. })));
    }

    #[test]
    fn recipe_rejects_item_without_stack_size() {
        let result = Recipe::from_json(
            r#"{"ingredients": [{"class": "item", "name": "iron-plate"}], "products": []}"#,
        );
        assert!(matches!(result, Err(DataLoadError::Parse { .. })));
    }

    #[test]
    fn recipe_rejects_unknown_class() {
        let result = Recipe::from_json(
            r#"{"ingredients": [], "products": [{"class": "energy", "name": "steam"}]}"#,
        );
        assert!(matches!(result, Err(DataLoadError::Parse { .. })));
    }

    #[test]
    fn recipe_requires_both_lists() {
        let result = Recipe::from_json(
            r#"{"products": [{"class": "item", "name": "iron-gear-wheel", "stack_size": 100}]}"#,
        );
        assert!(matches!(result, Err(DataLoadError::Parse { .. })));
        assert!(matches!(
            Recipe::from_json("{}"),
            Err(DataLoadError::Parse { .. })
        ));
    }

    #[test]
    fn recipe_rejects_misspelled_keys() {
        let result = Recipe::from_json(
            r#"{
                "ingredient": [{"class": "item", "name": "iron-plate", "stack_size": 100}],
                "product": []
            }"#,
        );
        assert!(matches!(result, Err(DataLoadError::Parse { .. })));
    }

    #[test]
    fn explicit_empty_recipe_is_accepted() {
        let recipe = Recipe::from_json(r#"{"ingredients": [], "products": []}"#).unwrap();
        assert_eq!(recipe, Recipe::default());
        assert_eq!(recipe.slot_count(), 0);
    }

    #[test]
    fn load_recipe_rejects_empty_file() {
        let dir = make_test_dir("recipe_empty");
        let path = dir.join("empty.toml");
        fs::write(&path, "").unwrap();

        let result = load_recipe(&path);

        assert!(matches!(result, Err(DataLoadError::Parse { .. })));
        cleanup(&dir);
    }

    #[test]
    fn load_recipe_ron() {
        let dir = make_test_dir("recipe_ron");
        let path = dir.join("gears.ron");
        fs::write(
            &path,
            r#"(
    name: Some("gears"),
    ingredients: [(class: "item", name: "iron-plate", stack_size: 100)],
    products: [(class: "fluid", name: "water")],
)"#,
        )
        .unwrap();

        let recipe = load_recipe(&path).unwrap();

        assert_eq!(recipe.name.as_deref(), Some("gears"));
        assert_eq!(recipe.ingredients, vec![iron_plate()]);
        assert_eq!(recipe.products, vec![water()]);
        cleanup(&dir);
    }

    #[test]
    fn load_recipe_toml() {
        let dir = make_test_dir("recipe_toml");
        let path = dir.join("gears.toml");
        fs::write(
            &path,
            r#"
name = "gears"

[[ingredients]]
class = "item"
name = "iron-plate"
stack_size = 100

[[products]]
class = "item"
name = "iron-gear-wheel"
stack_size = 100
"#,
        )
        .unwrap();

        let recipe = load_recipe(&path).unwrap();

        assert_eq!(recipe.name.as_deref(), Some("gears"));
        assert_eq!(recipe.ingredients, vec![iron_plate()]);
        assert_eq!(recipe.products, vec![gear_wheel()]);
        cleanup(&dir);
    }

    #[test]
    fn slots_list_ingredients_then_products() {
        let recipe = Recipe::new(vec![iron_plate(), water()], vec![gear_wheel()]);
        let slots: Vec<_> = recipe.slots().collect();

        assert_eq!(recipe.slot_count(), 3);
        assert_eq!(slots.len(), 3);
        assert_eq!(slots[0].role, SlotRole::Ingredient);
        assert_eq!(slots[1].commodity, &water());
        assert_eq!(slots[2].role, SlotRole::Product);
        assert_eq!(slots[2].index, 2);
        assert_eq!(slots[2].role.direction(), StationDirection::Loading);
    }

    #[test]
    fn default_layout_geometry() {
        let layout = LayoutConfig::default();

        assert_eq!(layout.slot_offset(0), Offset::ZERO);
        assert_eq!(layout.slot_offset(3), Offset::new(-24.0, 18.0));
        assert_eq!(layout.transport_offset(0, 1), Offset::new(0.0, 0.0));
        assert_eq!(layout.transport_offset(2, 4), Offset::new(-16.0, 18.0));

        assert_eq!(
            layout.station_pole_at(2).position,
            Position::new(68.5 - 16.0, 7.5 + 12.0)
        );
        assert_eq!(
            layout.feeder_pole_at(2).position,
            Position::new(69.5 - 16.0, 5.5 + 12.0)
        );
        assert_eq!(layout.feeder_pole_at(0).kind, PoleKind::Big);
        assert_eq!(layout.feeder_pole_at(0).position, Position::new(72.0, 0.0));
    }

    #[test]
    fn layout_file_overrides_some_fields() {
        let dir = make_test_dir("layout_partial");
        let path = dir.join("layout.ron");
        fs::write(&path, "(slot_pitch: (x: -10.0, y: 6.0))").unwrap();

        let layout = LayoutConfig::load(&path).unwrap();

        assert_eq!(layout.slot_pitch, Offset::new(-10.0, 6.0));
        assert_eq!(layout.trunk_pole, LayoutConfig::default().trunk_pole);
        cleanup(&dir);
    }

    #[test]
    fn layout_from_json() {
        let dir = make_test_dir("layout_json");
        let path = dir.join("layout.json");
        fs::write(
            &path,
            r#"{"trunk_pole": {"kind": "substation", "position": {"x": 71, "y": 1}}}"#,
        )
        .unwrap();

        let layout = LayoutConfig::load(&path).unwrap();

        assert_eq!(
            layout.trunk_pole,
            PoleAnchor::new(PoleKind::Substation, 71.0, 1.0)
        );
        assert_eq!(layout.slot_pitch, Offset::new(-8.0, 6.0));
        cleanup(&dir);
    }
}
