use cityblock_core::{CodecError, MergeError};
use cityblock_logic::StationError;
use cityblock_power::PowerError;

/// Errors from assembling a city block. Assembly is all-or-nothing: on any
/// error no layout is produced.
#[derive(Debug, thiserror::Error)]
pub enum AssembleError {
    #[error("recipe needs {requested} slots but the template library only has {capacity}")]
    CapacityExceeded { requested: usize, capacity: usize },

    #[error("cannot build the station for slot {slot}")]
    Station {
        slot: usize,
        #[source]
        source: StationError,
    },

    #[error("merge failed")]
    Merge(#[from] MergeError),

    #[error("cannot connect power for slot {slot}")]
    Power {
        slot: usize,
        #[source]
        source: PowerError,
    },

    #[error("cannot encode the assembled layout")]
    Codec(#[from] CodecError),
}
