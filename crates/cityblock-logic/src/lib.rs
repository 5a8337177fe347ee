//! Circuit logic of train stations.
//!
//! Station templates carry arithmetic combinators that count buffered
//! cargo, report a fill percentage, and set the train limit. Their
//! constants are authored for a reference commodity and rescaled here for
//! the commodity a station actually handles.
//!
//! Combinators are identified by what they compute ([`combinator`]), never
//! by their index in the entity list. [`station::build_station`] locates
//! every combinator a variant needs before rewriting any of them.

pub mod combinator;
pub mod station;

pub use combinator::{CombinatorPattern, LookupFailure, Operand, locate};
pub use station::{
    StationDirection, StationError, StationVariant, build_station, buffer_capacity,
    indicator_divisor, stop_name, throughput_divisor,
};
