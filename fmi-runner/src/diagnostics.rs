//! Opt-in dump of the process environment the external tools run in.

use itertools::Itertools;

/// Log the working directory and every environment variable (sorted by name) at `level`.
pub fn log_environment(level: log::Level) {
    if !log::log_enabled!(level) {
        return;
    }

    match std::env::current_dir() {
        Ok(cwd) => log::log!(level, "Working directory: {}", cwd.display()),
        Err(err) => log::log!(level, "Working directory unavailable: {err}"),
    }

    log::log!(level, "Environment:");
    for (key, value) in std::env::vars_os().sorted_by(|(a, _), (b, _)| a.cmp(b)) {
        log::log!(
            level,
            "  {}={}",
            key.to_string_lossy(),
            value.to_string_lossy()
        );
    }
}

#[cfg(test)]
mod tests {
    #[test_log::test]
    fn test_log_environment() {
        super::log_environment(log::Level::Debug);
        super::log_environment(log::Level::Trace);
    }
}
