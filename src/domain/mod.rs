//! Domain logic - pure business rules independent of git operations

pub mod branch;
pub mod category;
pub mod commit;
pub mod tag;
pub mod version;

pub use branch::BranchContext;
pub use category::Category;
pub use commit::{classify_all, ClassifiedCommit, RawCommit, Subject};
pub use tag::Tag;
pub use version::{next_version, BumpKind, Version};
