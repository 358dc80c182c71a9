/// stderr logging for the terminal binary
use env_logger::{Builder, Env};

/// Level used when `RUST_LOG` is unset; anything chattier shows through the frame
pub const DEFAULT_FILTER: &str = "warn";

/// Install `env_logger` honoring `RUST_LOG`. A logger that is already set wins.
///
/// Redirect stderr (`2>poly3d.log`) to read the output while the alternate
/// screen is up.
pub fn init_logging() {
    let installed = Builder::from_env(Env::default().default_filter_or(DEFAULT_FILTER))
        .try_init()
        .is_ok();
    if installed {
        log::debug!("logging initialized");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_twice_is_harmless() {
        init_logging();
        init_logging();
        log::warn!("still logging");
    }
}
