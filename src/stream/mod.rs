//! Event streams and their combinators
//!
//! The operators live in extension traits, one per family, mirroring how the
//! combinators are grouped: structural, time-based and count-based.

pub mod core;
pub mod rate;
pub mod structural;
pub mod window;

// Re-export core types
pub use self::core::{EventStream, Subscription};

// Re-export combinator traits
pub use rate::RateStreamExt;
pub use structural::StructuralStreamExt;
pub use window::WindowStreamExt;
