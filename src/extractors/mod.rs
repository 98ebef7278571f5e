//! SAFER snapshot extraction modules
//!
//! Each module handles one structural feature of the Company Snapshot page.

mod address_extractor;
mod checkbox_extractor;
mod crash_extractor;
mod inspection_extractor;
mod label_extractor;
pub mod text;

pub use address_extractor::*;
pub use checkbox_extractor::*;
pub use crash_extractor::*;
pub use inspection_extractor::*;
pub use label_extractor::*;
