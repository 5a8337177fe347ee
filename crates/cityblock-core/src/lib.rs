//! Cityblock Core -- the blueprint document model and composition engine.
//!
//! This crate owns everything that touches a blueprint's entity list
//! directly: the typed document model, entity numbering, merging one
//! blueprint into another, integrity validation, and the exchange-string
//! codec.
//!
//! # Merge Pattern
//!
//! Template blueprints are read-only masters. A layout is composed by
//! merging copies of them into a fresh target at computed offsets:
//!
//! ```rust,ignore
//! let mut layout = library.skeleton().clone();
//! let summary = layout.merge(library.branch(0)?, Offset::ZERO)?;
//! layout.merge(&station, Offset::new(-8.0, 6.0))?;
//! let exchange = codec::encode(&BlueprintString::new(layout))?;
//! ```
//!
//! # Key Types
//!
//! - [`blueprint::Blueprint`] -- Ordered entity list plus metadata.
//! - [`blueprint::Entity`] -- One placed entity with wires, neighbours, and
//!   circuit configuration.
//! - [`merge::MergeSummary`] -- Range of entity numbers appended by a merge.
//! - [`commodity::Commodity`] -- Item or fluid handled by a station.
//! - [`codec`] -- Versioned, compressed exchange strings.

pub mod blueprint;
pub mod codec;
pub mod commodity;
pub mod id;
pub mod merge;
pub mod validation;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use blueprint::{
    ArithmeticConditions, ArithmeticOperation, Blueprint, BlueprintString, ConnectionPoint,
    Connections, ControlBehavior, Entity, Extra, Icon, Offset, POSITION_EPSILON, Position,
    SignalId, SignalType, WireConnection,
};
pub use codec::CodecError;
pub use commodity::{Commodity, CommodityClass};
pub use id::EntityNumber;
pub use merge::{MergeError, MergeSummary};
pub use validation::ValidationError;
