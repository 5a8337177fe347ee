//! Train station parametrization.
//!
//! Station templates are authored for a reference item with a stack size of
//! 100. Building a station for a concrete commodity clones the template,
//! renames the train stop, and rescales the circuit constants that depend on
//! the stack size.

use std::fmt;
use std::num::NonZeroU32;

use cityblock_core::ArithmeticOperation::{Divide, Subtract};
use cityblock_core::{Blueprint, Commodity, CommodityClass};
use log::trace;

use crate::combinator::{CombinatorPattern, LookupFailure, Operand, locate};

/// Prototype name of the train stop.
pub const TRAIN_STOP: &str = "train-stop";

/// Virtual signal an unloading station counts its buffer with.
pub const SIGNAL_INVENTORY: &str = "signal-I";
/// Virtual signal an unloading station tracks its train limit with.
pub const SIGNAL_RATE: &str = "signal-L";
/// Wildcard signal loading stations compute over.
pub const SIGNAL_EACH: &str = "signal-each";

/// Buffer chests per station.
const CHESTS: i32 = 6;
/// Slots per buffer chest.
const CHEST_SLOTS: i32 = 48;
/// Slots per cargo wagon.
const WAGON_SLOTS: i32 = 40;

// ---------------------------------------------------------------------------
// Combinator roles
// ---------------------------------------------------------------------------

/// Fill-percentage indicator of an unloading station.
pub const UNLOADING_INDICATOR: CombinatorPattern = CombinatorPattern::new(
    Operand::Signal(SIGNAL_INVENTORY),
    Divide,
    Operand::Constant(288),
);
/// Free buffer space of an unloading station.
pub const UNLOADING_BUFFER: CombinatorPattern = CombinatorPattern::new(
    Operand::Constant(28800),
    Subtract,
    Operand::Signal(SIGNAL_INVENTORY),
);
/// Train limit of an unloading station.
pub const UNLOADING_THROUGHPUT: CombinatorPattern = CombinatorPattern::new(
    Operand::Signal(SIGNAL_RATE),
    Divide,
    Operand::Constant(4000),
);
/// Fill-percentage indicator of a loading station.
pub const LOADING_INDICATOR: CombinatorPattern = CombinatorPattern::new(
    Operand::Signal(SIGNAL_EACH),
    Divide,
    Operand::Constant(288),
);
/// Train limit of a loading station.
pub const LOADING_THROUGHPUT: CombinatorPattern = CombinatorPattern::new(
    Operand::Signal(SIGNAL_EACH),
    Divide,
    Operand::Constant(4000),
);
/// Free tank space of a fluid unloading station.
pub const FLUID_UNLOADING_BUFFER: CombinatorPattern = CombinatorPattern::new(
    Operand::Constant(50000),
    Subtract,
    Operand::Signal(SIGNAL_INVENTORY),
);

/// Buffer capacity in units: `6 * 48 * stack`.
pub fn buffer_capacity(stack: NonZeroU32) -> Option<i32> {
    i32::try_from(stack.get())
        .ok()?
        .checked_mul(CHESTS * CHEST_SLOTS)
}

/// Divisor turning the buffer count into a percentage: `6 * 48 * stack / 100`.
/// Never below 1 so the combinator does not divide by zero.
pub fn indicator_divisor(stack: NonZeroU32) -> Option<i32> {
    buffer_capacity(stack).map(|capacity| (capacity / 100).max(1))
}

/// Units per full wagon: `40 * stack`.
pub fn throughput_divisor(stack: NonZeroU32) -> Option<i32> {
    i32::try_from(stack.get()).ok()?.checked_mul(WAGON_SLOTS)
}

// ---------------------------------------------------------------------------
// Variants
// ---------------------------------------------------------------------------

/// Whether trains deliver to or collect from the station.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StationDirection {
    Unloading,
    Loading,
}

impl StationDirection {
    /// Marker used in the stop name.
    pub fn marker(self) -> char {
        match self {
            StationDirection::Unloading => 'U',
            StationDirection::Loading => 'L',
        }
    }
}

/// One of the four station templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StationVariant {
    ItemUnloading,
    ItemLoading,
    FluidUnloading,
    FluidLoading,
}

impl StationVariant {
    pub const ALL: [StationVariant; 4] = [
        StationVariant::ItemUnloading,
        StationVariant::ItemLoading,
        StationVariant::FluidUnloading,
        StationVariant::FluidLoading,
    ];

    pub fn new(direction: StationDirection, class: CommodityClass) -> Self {
        match (direction, class) {
            (StationDirection::Unloading, CommodityClass::Item) => StationVariant::ItemUnloading,
            (StationDirection::Loading, CommodityClass::Item) => StationVariant::ItemLoading,
            (StationDirection::Unloading, CommodityClass::Fluid) => StationVariant::FluidUnloading,
            (StationDirection::Loading, CommodityClass::Fluid) => StationVariant::FluidLoading,
        }
    }

    pub fn direction(self) -> StationDirection {
        match self {
            StationVariant::ItemUnloading | StationVariant::FluidUnloading => {
                StationDirection::Unloading
            }
            StationVariant::ItemLoading | StationVariant::FluidLoading => StationDirection::Loading,
        }
    }

    pub fn class(self) -> CommodityClass {
        match self {
            StationVariant::ItemUnloading | StationVariant::ItemLoading => CommodityClass::Item,
            StationVariant::FluidUnloading | StationVariant::FluidLoading => CommodityClass::Fluid,
        }
    }

    /// Base file name of the template.
    pub fn template_name(self) -> &'static str {
        match self {
            StationVariant::ItemUnloading => "item_unloading_station",
            StationVariant::ItemLoading => "item_loading_station",
            StationVariant::FluidUnloading => "fluid_unloading_station",
            StationVariant::FluidLoading => "fluid_loading_station",
        }
    }
}

impl fmt::Display for StationVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StationVariant::ItemUnloading => "item unloading",
            StationVariant::ItemLoading => "item loading",
            StationVariant::FluidUnloading => "fluid unloading",
            StationVariant::FluidLoading => "fluid loading",
        })
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from building a station.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StationError {
    #[error("{variant} station template has no train stop")]
    MissingStop { variant: StationVariant },
    #[error("{variant} station template has {count} train stops, expected one")]
    AmbiguousStop {
        variant: StationVariant,
        count: usize,
    },
    #[error("{variant} station template has no {role} combinator matching `{pattern}`")]
    MissingCombinator {
        variant: StationVariant,
        role: &'static str,
        pattern: String,
    },
    #[error(
        "{variant} station template has {count} {role} combinators matching `{pattern}`, expected one"
    )]
    AmbiguousCombinator {
        variant: StationVariant,
        role: &'static str,
        pattern: String,
        count: usize,
    },
    #[error("{variant} station cannot handle `{name}`")]
    ClassMismatch {
        variant: StationVariant,
        name: String,
    },
    #[error("stack size {stack_size} of `{name}` overflows the {role} constant")]
    ConstantOverflow {
        name: String,
        stack_size: u32,
        role: &'static str,
    },
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Per-build context: the variant and commodity being built.
struct Rewrite<'a> {
    variant: StationVariant,
    commodity: &'a Commodity,
}

impl Rewrite<'_> {
    fn combinator(
        &self,
        station: &Blueprint,
        role: &'static str,
        pattern: &CombinatorPattern,
    ) -> Result<usize, StationError> {
        locate(station, pattern).map_err(|failure| match failure {
            LookupFailure::NotFound => StationError::MissingCombinator {
                variant: self.variant,
                role,
                pattern: pattern.to_string(),
            },
            LookupFailure::Ambiguous(count) => StationError::AmbiguousCombinator {
                variant: self.variant,
                role,
                pattern: pattern.to_string(),
                count,
            },
        })
    }

    fn train_stop(&self, station: &Blueprint) -> Result<usize, StationError> {
        let stops: Vec<usize> = station
            .entities
            .iter()
            .enumerate()
            .filter(|(_, e)| e.name == TRAIN_STOP)
            .map(|(index, _)| index)
            .collect();
        match stops.as_slice() {
            [] => Err(StationError::MissingStop {
                variant: self.variant,
            }),
            [index] => Ok(*index),
            _ => Err(StationError::AmbiguousStop {
                variant: self.variant,
                count: stops.len(),
            }),
        }
    }

    fn stack_size(&self) -> Result<NonZeroU32, StationError> {
        self.commodity
            .stack_size()
            .ok_or_else(|| StationError::ClassMismatch {
                variant: self.variant,
                name: self.commodity.name().to_string(),
            })
    }

    fn constant(
        &self,
        role: &'static str,
        compute: fn(NonZeroU32) -> Option<i32>,
    ) -> Result<i32, StationError> {
        let stack = self.stack_size()?;
        compute(stack).ok_or_else(|| StationError::ConstantOverflow {
            name: self.commodity.name().to_string(),
            stack_size: stack.get(),
            role,
        })
    }
}

/// Stop name for a station, e.g. `[U] [item=iron-plate]`.
pub fn stop_name(direction: StationDirection, commodity: &Commodity) -> String {
    format!("[{}] {}", direction.marker(), commodity.rich_text())
}

/// Build a station for `commodity` from the `variant` template.
///
/// The template is only read. Every combinator the variant rewrites is
/// located before anything is changed, so a template missing one of them
/// fails without producing a half-parametrized station.
pub fn build_station(
    template: &Blueprint,
    variant: StationVariant,
    commodity: &Commodity,
) -> Result<Blueprint, StationError> {
    if variant.class() != commodity.class() {
        return Err(StationError::ClassMismatch {
            variant,
            name: commodity.name().to_string(),
        });
    }

    let rewrite = Rewrite { variant, commodity };
    let mut station = template.clone();
    let stop = rewrite.train_stop(&station)?;
    let signal = commodity.signal();

    match variant {
        StationVariant::ItemUnloading => {
            let indicator = rewrite.combinator(&station, "indicator", &UNLOADING_INDICATOR)?;
            let buffer = rewrite.combinator(&station, "buffer", &UNLOADING_BUFFER)?;
            let throughput = rewrite.combinator(&station, "throughput", &UNLOADING_THROUGHPUT)?;
            let indicator_value = rewrite.constant("indicator", indicator_divisor)?;
            let buffer_value = rewrite.constant("buffer", buffer_capacity)?;
            let throughput_value = rewrite.constant("throughput", throughput_divisor)?;

            if let Some(c) = station.entities[indicator].arithmetic_conditions_mut() {
                c.first_signal = Some(signal.clone());
                c.second_constant = Some(indicator_value);
            }
            if let Some(c) = station.entities[buffer].arithmetic_conditions_mut() {
                c.first_constant = Some(buffer_value);
                c.second_signal = Some(signal);
            }
            if let Some(c) = station.entities[throughput].arithmetic_conditions_mut() {
                c.second_constant = Some(throughput_value);
            }
            trace!(
                "{variant} `{}`: indicator /{indicator_value}, buffer {buffer_value}, throughput /{throughput_value}",
                commodity.name()
            );
        }
        StationVariant::ItemLoading => {
            let indicator = rewrite.combinator(&station, "indicator", &LOADING_INDICATOR)?;
            let throughput = rewrite.combinator(&station, "throughput", &LOADING_THROUGHPUT)?;
            let indicator_value = rewrite.constant("indicator", indicator_divisor)?;
            let throughput_value = rewrite.constant("throughput", throughput_divisor)?;

            if let Some(c) = station.entities[indicator].arithmetic_conditions_mut() {
                c.second_constant = Some(indicator_value);
            }
            if let Some(c) = station.entities[throughput].arithmetic_conditions_mut() {
                c.second_constant = Some(throughput_value);
            }
            trace!(
                "{variant} `{}`: indicator /{indicator_value}, throughput /{throughput_value}",
                commodity.name()
            );
        }
        StationVariant::FluidUnloading => {
            let buffer = rewrite.combinator(&station, "buffer", &FLUID_UNLOADING_BUFFER)?;
            if let Some(c) = station.entities[buffer].arithmetic_conditions_mut() {
                c.second_signal = Some(signal);
            }
        }
        StationVariant::FluidLoading => {}
    }

    station.entities[stop].station = Some(stop_name(variant.direction(), commodity));
    Ok(station)
}

// ===========================================================================
// Tests
// ===========================================================================
