//! What the external landmark model hands to the vitals core, and the
//! adapters that replay or supplement it.

pub mod domain;
pub mod infrastructure;
