//! Prize configuration
//!
//! A prize names a draw and fixes how many winners it gets.

mod book;

pub use book::{Prize, PrizeBook, PrizeId, PrizeUpdate};
