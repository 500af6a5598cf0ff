pub mod accumulator;
pub mod build;
pub mod cache;
pub mod dependency;
pub mod executable;
pub mod output;
pub mod rule;
pub mod source;

pub use accumulator::Accumulator;
pub use build::Build;
pub use cache::{Cache, CACHE_FILENAME};
pub use dependency::Dependency;
pub use executable::Executable;
pub use output::Output;
pub use rule::{DepStyle, Rule};
pub use source::Source;

/// Names the executor knows regardless of rule declaration: `in`/`out` are
/// reserved and may never be bound explicitly; `depfile` is built-in and
/// gets special path rewriting.
pub use crate::util::escape::{BUILTIN_VARIABLES, RESERVED_VARIABLES};

pub const OUTPUT_DIRNAME: &str = "output";
pub const DEPFILES_DIRNAME: &str = "depfiles";
pub const DEPENDENCY_DIRNAME: &str = "dependency";
