//! Built-in document analyzers

mod code;
mod link;
mod properties;
mod structure;
mod tag;
mod task;

pub use link::{LinkAnalyzer, WikiLink};
pub use properties::PropertyAnalyzer;
pub use structure::StructureAnalyzer;
pub use tag::TagAnalyzer;
pub(crate) use tag::TAG_TERMINATORS;
pub use task::TaskAnalyzer;
