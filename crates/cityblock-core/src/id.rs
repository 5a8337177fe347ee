use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies an entity within one blueprint. The exchange format numbers
/// entities from 1, in the order they appear in the entity list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityNumber(pub u32);

impl EntityNumber {
    /// The first number handed out in an empty blueprint.
    pub const FIRST: EntityNumber = EntityNumber(1);

    /// The number `n` places after this one.
    pub fn offset(self, n: u32) -> Self {
        EntityNumber(self.0 + n)
    }
}

impl fmt::Display for EntityNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_number_equality() {
        assert_eq!(EntityNumber(3), EntityNumber(3));
        assert_ne!(EntityNumber(3), EntityNumber(4));
    }

    #[test]
    fn entity_number_serializes_as_bare_integer() {
        let json = serde_json::to_string(&EntityNumber(42)).unwrap();
        assert_eq!(json, "42");
        let back: EntityNumber = serde_json::from_str("7").unwrap();
        assert_eq!(back, EntityNumber(7));
    }

    #[test]
    fn offset_and_display() {
        assert_eq!(EntityNumber::FIRST.offset(4), EntityNumber(5));
        assert_eq!(EntityNumber(12).to_string(), "#12");
    }
}
