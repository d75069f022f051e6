//! Tracing subscriber setup for binaries and tests that use the workspace.

use tracing_subscriber::EnvFilter;

/// All workspace crate targets that should receive log output.
const CRATE_TARGETS: &[&str] = &[
    "regarima",
    "regarima_linalg",
    "regarima_arma",
    "regarima_gls",
    "regarima_estimation",
];

/// Maps a verbosity count to a level name.
///
/// - 0 -> warn
/// - 1 -> info
/// - 2 -> debug
/// - 3+ -> trace
pub fn level(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Directive string enabling `level(verbosity)` for every workspace crate.
pub fn default_directives(verbosity: u8) -> String {
    let level = level(verbosity);
    CRATE_TARGETS
        .iter()
        .map(|t| format!("{t}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// Installs a global `fmt` subscriber filtered by verbosity.
///
/// `RUST_LOG` overrides the verbosity if set.
///
/// # Errors
///
/// Fails if a global subscriber is already installed.
pub fn init(verbosity: u8) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbosity)));
    tracing_subscriber::fmt().with_env_filter(filter).try_init()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_levels() {
        assert_eq!(level(0), "warn");
        assert_eq!(level(1), "info");
        assert_eq!(level(2), "debug");
        assert_eq!(level(9), "trace");
    }

    #[test]
    fn directives_cover_every_crate() {
        let d = default_directives(2);
        for target in CRATE_TARGETS {
            assert!(d.contains(&format!("{target}=debug")));
        }
    }

    #[test]
    fn second_init_is_an_error() {
        let _ = init(0);
        assert!(init(0).is_err());
    }
}
