use std::io;

use thiserror::Error;

pub type PincrackResult<T> = std::result::Result<T, PincrackError>;

#[derive(Error, Debug)]
pub enum PincrackError {
    #[error("the {field} value {value} is outside its bound of {bound}")]
    InvalidCandidate {
        field: &'static str,
        value: u32,
        bound: u32,
    },

    #[error("the flat id {0} does not fit in a candidate space of {1} slots")]
    OutOfRange(u32, u32),

    #[error("the {field} bound {bound} must be between 1 and 100 to fit its two-digit token")]
    Bound { field: &'static str, bound: u32 },

    #[error("the field bounds tile {tiled} slots but the declared capacity is {declared}")]
    Capacity { tiled: u64, declared: u64 },

    #[error("the batch range starts at {0} but ends at {1}")]
    BatchRange(u32, u32),

    #[error("the thread group size {0} must be between 1 and 1024")]
    GroupSize(u32),

    #[error("the verdict buffer holds {0} slots but the candidate space has {1}")]
    BufferMismatch(usize, u32),

    #[error(
        "Unable to access the file at the given path. Make sure the right permissions are available"
    )]
    Io(#[from] io::Error),
}
