//! Diff cache for stagehand.
//!
//! Each staged file owns a [`DiffCache`] chosen by its file type. Text files
//! fetch line-level content from the backend and keep the flattened result;
//! image files only derive two source addresses and never fetch.
//!
//! # Key Types
//!
//! - [`DiffCache`] -- Per-file cache, polymorphic over text and image
//! - [`TextDiff`] / [`DiffLine`] -- Flattened, classified diff lines
//! - [`ImageDiff`] / [`ImageEndpoint`] -- Image diff sources and state
//! - [`DiffTicket`] / [`TicketCounter`] -- Identity of one outstanding fetch

pub mod cache;
pub mod error;
pub mod image;
pub mod line;
pub mod text;

pub use cache::{DiffCache, DiffOutcome, DiffTicket, TicketCounter};
pub use error::{DiffError, DiffResult};
pub use image::{encode_component, ImageDiff, ImageDiffState, ImageEndpoint, ImageVersion};
pub use line::{classify, flatten_hunks, DiffLine};
pub use text::TextDiff;
