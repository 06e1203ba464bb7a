//! Startup configuration: a TOML file chosen by `--settings` (or the build
//! profile default) with `IDENTITY__<SECTION>__<KEY>` environment overrides.

mod cli;
pub use clap::Parser;
pub use cli::*;

mod settings;
pub use settings::*;
