//! Visor module - Readable entity forms, transaction JSON codec,
//! transaction status and chain snapshots

mod readable;
mod codec;
mod status;
mod metadata;
mod visor;

pub use readable::*;
pub use codec::*;
pub use status::*;
pub use metadata::*;
pub use visor::*;
