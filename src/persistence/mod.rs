//! Save/load persistence
//!
//! - `wire`: primitive little-endian encodings
//! - `codec`: versioned, append-only record layout
//! - `storage`: atomic single-file record storage

pub mod codec;
pub mod storage;
pub mod wire;

pub use codec::{DECODE_PLAN, DecodedRecord, FORMAT_VERSION, FieldGroup, decode, encode};
pub use storage::{FileStorage, RecordStorage};
