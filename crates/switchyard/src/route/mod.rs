//! Route module: template parsing and the segment model
//!
//! Both submodules are pure: parsing a template never consults validators
//! or router state.

pub mod parser;
pub mod segment;

// Re-export commonly used items
pub use parser::{parse_template, specificity};
pub use segment::{Parameter, Segment, WILDCARD_NAME};
