//! Umbrella crate for the `foil-metrology` workspace.
//!
//! Re-exports the image model, the color classifier, the diameter scanner and
//! the report helpers, plus a generator for synthetic foil scans.

pub use fm_classify::*;
pub use fm_core::*;
pub use fm_report::*;
pub use fm_scan::*;

pub mod synth;
