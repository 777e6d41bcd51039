//! Internal logging facilities. This module (re)exports the five logging
//! macros: `error!`, `warn!`, `info!`, `debug!` and `trace!`, where `error!`
//! represents the highest-priority messages and `trace!` the lowest.
//!
//! Logging is disabled by default. Messages are enabled/disabled with:
//!
//!  - `enable_logging()`: turns on all log messages
//!  - `disable_logging()`: turns off all log messages
//!  - `set_log_level(level)`: enables only messages with priority at least `level`
//!  - `set_verbosity(verbose)`: maps a simulation-style verbosity float (the
//!    same scale the `verbose` option uses) onto a level filter
//!
//! Per-module filtering is available through `set_module_filter()` /
//! `remove_module_filter()`.

use env_logger::{Builder, Logger, WriteStyle};
pub use log::{debug, error, info, trace, warn, LevelFilter};
use log_reload::{ReloadHandle, ReloadLog};

use std::collections::HashMap;
use std::sync::{Mutex, OnceLock};

// Logging disabled.
const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Off;
// Automatically determine if output supports color.
const DEFAULT_LOG_STYLE: WriteStyle = WriteStyle::Auto;

/// A global instance of the logging configuration.
static LOG_CONFIGURATION: OnceLock<Mutex<LogConfiguration>> = OnceLock::new();

/// Holds logging configuration so it can persist across reinitialization of
/// the global logger.
///
/// Neither `env_logger::Builder` nor `env_logger::Logger` can be modified once
/// constructed, and the global logger can only be installed once. We install a
/// `log_reload::ReloadLog` wrapper and swap the inner logger whenever the
/// configuration changes.
struct LogConfiguration {
    /// The default level filter for modules ("targets") without an explicitly
    /// set filter. `LevelFilter::Off` disables logging.
    global_log_level: LevelFilter,
    /// Whether to colorize output.
    log_style: WriteStyle,
    /// Module ("target") specific level filters.
    module_level: HashMap<String, LevelFilter>,
    /// A handle that can replace the wrapped logger after installation.
    log_handle: Option<ReloadHandle<Logger>>,
}

impl Default for LogConfiguration {
    fn default() -> Self {
        LogConfiguration {
            global_log_level: DEFAULT_LOG_LEVEL,
            log_style: DEFAULT_LOG_STYLE,
            module_level: HashMap::new(),
            log_handle: None,
        }
    }
}

impl LogConfiguration {
    /// Constructs an `env_logger::Logger` from the current configuration
    /// without installing it.
    fn build(&self) -> Logger {
        let mut builder = Builder::new();
        builder
            .filter_level(self.global_log_level)
            .write_style(self.log_style);
        for (module, filter) in &self.module_level {
            builder.filter(Some(module), *filter);
        }
        builder.build()
    }
}

/// Enables the logger with no global level filter / full logging. Equivalent
/// to `set_log_level(LevelFilter::Trace)`.
pub fn enable_logging() {
    set_log_level(LevelFilter::Trace);
}

/// Disables logging completely. Equivalent to `set_log_level(LevelFilter::Off)`.
pub fn disable_logging() {
    set_log_level(LevelFilter::Off);
}

/// Sets the global log level. A filter level of `LevelFilter::Off` disables
/// logging.
pub fn set_log_level(level: LevelFilter) {
    with_log_configuration(|config| {
        config.global_log_level = level;
    });
    install_logger();
}

/// Maps a verbosity float onto a level filter and applies it: zero means
/// warnings only, fractional verbosity enables progress information, 1 enables
/// debugging detail, and anything higher enables everything.
pub fn set_verbosity(verbose: f64) {
    set_log_level(verbosity_to_level(verbose));
}

pub(crate) fn verbosity_to_level(verbose: f64) -> LevelFilter {
    if verbose <= 0.0 {
        LevelFilter::Warn
    } else if verbose < 1.0 {
        LevelFilter::Info
    } else if verbose < 2.0 {
        LevelFilter::Debug
    } else {
        LevelFilter::Trace
    }
}

/// Sets a level filter for the given module path.
pub fn set_module_filter(module_path: &str, level_filter: LevelFilter) {
    with_log_configuration(|config| {
        config
            .module_level
            .insert(module_path.to_string(), level_filter);
    });
    install_logger();
}

/// Removes a module-specific level filter for the given module path. The
/// global level filter applies to the module again.
pub fn remove_module_filter(module_path: &str) {
    with_log_configuration(|config| {
        config.module_level.remove(module_path);
    });
    install_logger();
}

fn with_log_configuration<R>(f: impl FnOnce(&mut LogConfiguration) -> R) -> R {
    let mutex = LOG_CONFIGURATION.get_or_init(Mutex::default);
    let mut config = mutex.lock().expect("log configuration lock poisoned");
    f(&mut config)
}

/// Initializes or replaces the existing global logger with one described by
/// the global log configuration.
fn install_logger() {
    with_log_configuration(|config| {
        let logger = config.build();
        match &config.log_handle {
            None => {
                let wrapping_logger = ReloadLog::new(logger);
                config.log_handle = Some(wrapping_logger.handle());
                let result = log::set_boxed_logger(Box::new(wrapping_logger));
                if let Err(error) = result {
                    error!(
                        "tried to initialize a global logger that has already been set: {}",
                        error
                    );
                }
            }
            Some(handle) => {
                if let Err(error) = handle.replace(logger) {
                    error!("failed to replace logger: {}", error);
                }
            }
        }
        log::set_max_level(config.global_log_level);
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_maps_onto_levels() {
        assert_eq!(verbosity_to_level(0.0), LevelFilter::Warn);
        assert_eq!(verbosity_to_level(-1.0), LevelFilter::Warn);
        assert_eq!(verbosity_to_level(0.1), LevelFilter::Info);
        assert_eq!(verbosity_to_level(1.0), LevelFilter::Debug);
        assert_eq!(verbosity_to_level(2.0), LevelFilter::Trace);
        assert_eq!(verbosity_to_level(10.0), LevelFilter::Trace);
    }

    #[test]
    fn configuration_builds_with_module_filters() {
        // Build (but do not install) a logger from a standalone configuration.
        let mut config = LogConfiguration::default();
        config.global_log_level = LevelFilter::Info;
        config
            .module_level
            .insert("covasim_dash::options".to_string(), LevelFilter::Trace);
        let logger = config.build();
        // The effective filter is the most permissive across all directives.
        assert_eq!(logger.filter(), LevelFilter::Trace);
    }
}
