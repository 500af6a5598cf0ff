//! Fab: a Lua-configured meta-build engine that emits Ninja build graphs.
//!
//! This crate is the configuration engine described in the design
//! documents at the repository root: the embedded Lua runtime, the object
//! model exposed to configuration scripts, path/identifier hygiene, the
//! rule command parser, the graph emitter, the dependency manager, and the
//! cache. The `fab` binary (`src/bin/fab.rs`) is a thin CLI front end over
//! `ops::configure`, `ops::build`, and `ops::install`.

pub mod core;
pub mod ops;
pub mod script;
pub mod sources;
pub mod util;
