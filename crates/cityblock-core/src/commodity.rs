//! Commodity descriptors: what a station loads or unloads.

use crate::blueprint::{SignalId, SignalType};
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;

/// Whether a commodity moves in discrete stacks or as a fluid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommodityClass {
    Item,
    Fluid,
}

/// An ingredient or product of a recipe, tagged by `class`:
///
/// ```json
/// {"class": "item", "name": "iron-plate", "stack_size": 100}
/// {"class": "fluid", "name": "water"}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "class", rename_all = "lowercase")]
pub enum Commodity {
    Item {
        name: String,
        stack_size: NonZeroU32,
    },
    Fluid {
        name: String,
    },
}

impl Commodity {
    pub fn item(name: impl Into<String>, stack_size: NonZeroU32) -> Self {
        Commodity::Item {
            name: name.into(),
            stack_size,
        }
    }

    pub fn fluid(name: impl Into<String>) -> Self {
        Commodity::Fluid { name: name.into() }
    }

    pub fn name(&self) -> &str {
        match self {
            Commodity::Item { name, .. } | Commodity::Fluid { name } => name,
        }
    }

    pub fn class(&self) -> CommodityClass {
        match self {
            Commodity::Item { .. } => CommodityClass::Item,
            Commodity::Fluid { .. } => CommodityClass::Fluid,
        }
    }

    /// Units per stack. Fluids have none.
    pub fn stack_size(&self) -> Option<NonZeroU32> {
        match self {
            Commodity::Item { stack_size, .. } => Some(*stack_size),
            Commodity::Fluid { .. } => None,
        }
    }

    /// The circuit signal carrying this commodity's count.
    pub fn signal(&self) -> SignalId {
        let kind = match self.class() {
            CommodityClass::Item => SignalType::Item,
            CommodityClass::Fluid => SignalType::Fluid,
        };
        SignalId::new(kind, self.name())
    }

    /// Rich-text icon tag, e.g. `[item=iron-plate]`.
    pub fn rich_text(&self) -> String {
        match self.class() {
            CommodityClass::Item => format!("[item={}]", self.name()),
            CommodityClass::Fluid => format!("[fluid={}]", self.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_item() {
        let c: Commodity =
            serde_json::from_str(r#"{"class": "item", "name": "iron-plate", "stack_size": 100}"#)
                .unwrap();
        assert_eq!(c.name(), "iron-plate");
        assert_eq!(c.class(), CommodityClass::Item);
        assert_eq!(c.stack_size().map(NonZeroU32::get), Some(100));
    }

    #[test]
    fn deserialize_fluid_ignores_extra_fields() {
        let c: Commodity = serde_json::from_str(
            r#"{"class": "fluid", "name": "water", "amount": 100, "type": "fluid"}"#,
        )
        .unwrap();
        assert_eq!(c, Commodity::fluid("water"));
        assert_eq!(c.stack_size(), None);
    }

    #[test]
    fn zero_stack_size_rejected() {
        let result: Result<Commodity, _> =
            serde_json::from_str(r#"{"class": "item", "name": "iron-plate", "stack_size": 0}"#);
        assert!(result.is_err());
    }

    #[test]
    fn missing_stack_size_rejected() {
        let result: Result<Commodity, _> =
            serde_json::from_str(r#"{"class": "item", "name": "iron-plate"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn unknown_class_rejected() {
        let result: Result<Commodity, _> =
            serde_json::from_str(r#"{"class": "energy", "name": "joules"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn rich_text_and_signal() {
        let plate = Commodity::item("iron-plate", NonZeroU32::new(100).unwrap());
        assert_eq!(plate.rich_text(), "[item=iron-plate]");
        assert_eq!(plate.signal(), SignalId::new(SignalType::Item, "iron-plate"));

        let oil = Commodity::fluid("crude-oil");
        assert_eq!(oil.rich_text(), "[fluid=crude-oil]");
        assert_eq!(oil.signal().kind, SignalType::Fluid);
    }
}
