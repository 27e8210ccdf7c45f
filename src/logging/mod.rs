//! Terminal logger initialization.
//!
//! Logs go to stderr: stdout belongs to the interactive query loop.

use log::LevelFilter;
use simplelog::{ColorChoice, CombinedLogger, ConfigBuilder, TermLogger, TerminalMode};

/// Initialize the global logger at the level implied by the CLI flags.
/// Safe to call once; a second call is a no-op.
pub fn initialize(verbose: bool, quiet: bool) {
    let level = if quiet {
        LevelFilter::Warn
    } else if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .build();

    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        config,
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )]);
}
