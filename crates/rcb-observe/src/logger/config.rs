use crate::logger::{format::LoggerFormat, level::LoggerLevel};

/// Operator log settings.
#[derive(Debug, Clone)]
pub struct LoggerConfig {
    pub format: LoggerFormat,
    pub level: LoggerLevel,
    /// Print the record target (`rcb.worker`, `rcb.core.supervisor`, ...).
    pub with_targets: bool,
    /// ANSI colours for the text format; defaults to "stdout is a terminal".
    pub use_color: bool,
}

impl LoggerConfig {
    pub fn with_level(mut self, level: LoggerLevel) -> Self {
        self.level = level;
        self
    }

    pub fn with_format(mut self, format: LoggerFormat) -> Self {
        self.format = format;
        self
    }
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            format: LoggerFormat::default(),
            level: LoggerLevel::default(),
            with_targets: true,
            use_color: atty::is(atty::Stream::Stdout),
        }
    }
}
