//! Draw subsystem
//!
//! Winner records, draw sessions, the draw engine and the shared error
//! taxonomy.

mod engine;
mod errors;
mod session;
mod winner;

pub use engine::DrawEngine;
pub use errors::{DrawError, DrawResult};
pub use session::{DrawSession, RedrawBatch, RedrawRecord, SessionId};
pub use winner::{Winner, WinnerId, WinnerStatus};
