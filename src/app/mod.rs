// LogSieve - app/mod.rs
//
// Application layer: the load pipeline and the viewing session.
// Dependencies: core, platform, util.

pub mod load;
pub mod session;
