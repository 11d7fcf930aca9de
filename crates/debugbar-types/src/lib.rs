pub mod report;
pub mod snapshot;
pub mod tree;

pub use report::*;
pub use snapshot::*;
pub use tree::*;
