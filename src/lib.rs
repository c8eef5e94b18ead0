// LogSieve - lib.rs
//
// Library entry point. The `logsieve` binary in `main.rs` is a thin CLI
// over `app::session::Session`; everything else lives here so it can be
// driven programmatically and from integration tests.

pub mod app;
pub mod core;
pub mod platform;
pub mod util;
