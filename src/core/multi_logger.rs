//! Multiplexed System/Access/Error logger
//!
//! [`MultiLoggerBuilder`] holds the mutable configuration. [`MultiLoggerBuilder::init`]
//! consumes it, opens every enabled sink and returns a [`MultiLogger`],
//! which only exposes read accessors. Reconfiguring an initialized logger
//! or initializing twice therefore does not compile.

use super::channel::{Channel, PerChannel};
use super::error::Result;
use super::fanout::{BufferedChannelWriter, ChannelWriter, FanoutWriter};
use super::flags::LogFlags;
use super::logger::ChannelLogger;
use super::settings::{
    default_app_dir, normalize_tag, resolve_log_dir, resolve_log_file, Config, Options,
    Settings, SyslogConfig, DEFAULT_LOG_DIR,
};
use super::sink::Sink;
use crate::sinks::{SinkFactory, DEFAULT_DIR_MODE, DEFAULT_FILE_MODE};
use std::fmt;
use std::io::Write;
use std::path::Path;

/// Mutable configuration for a [`MultiLogger`].
///
/// # Example
///
/// ```no_run
/// use rust_multilog::prelude::*;
///
/// let mlw = MultiLoggerBuilder::new()
///     .defaults()
///     .app_name("inventory")
///     .enable_access(true)
///     .access_use_flags(true)
///     .flags_utc(true)
///     .init();
///
/// mlw.system_logger().print("service started");
/// mlw.access_logger().print("GET /devices 200");
/// ```
pub struct MultiLoggerBuilder {
    settings: Settings,
    extra_sinks: PerChannel<Vec<Box<dyn Sink>>>,
    file_mode: u32,
    dir_mode: u32,
}

impl MultiLoggerBuilder {
    /// Empty configuration: every toggle off, every string empty.
    pub fn new() -> Self {
        Self::from_settings(Settings::default())
    }

    pub fn from_settings(settings: Settings) -> Self {
        Self {
            settings,
            extra_sinks: PerChannel::default(),
            file_mode: DEFAULT_FILE_MODE,
            dir_mode: DEFAULT_DIR_MODE,
        }
    }

    /// Parse a configuration document.
    pub fn from_json(json: &str) -> Result<Self> {
        Settings::from_json(json).map(Self::from_settings)
    }

    /// Read a configuration document from disk.
    pub fn try_from_file(path: impl AsRef<Path>) -> Result<Self> {
        Settings::load(path).map(Self::from_settings)
    }

    /// Read a configuration document from disk, falling back to an empty
    /// configuration (with a warning on stderr) if it cannot be read or
    /// parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::try_from_file(path) {
            Ok(builder) => builder,
            Err(e) => {
                eprintln!(
                    "[LOGGER WARNING] Error opening {:?}: {}. Using default object.",
                    path.display().to_string(),
                    e
                );
                Self::new()
            }
        }
    }

    /// Reset every field to the documented baseline.
    ///
    /// System and Error log to files with composed flags, Access is off,
    /// console and syslog are off, formatting is "standard", no recovery
    /// stack. Extra sinks added with [`add_sink`](Self::add_sink) are kept.
    #[must_use = "builder methods return a new value"]
    pub fn defaults(self) -> Self {
        self.enable_system(true)
            .enable_access(false)
            .enable_error(true)
            .system_use_flags(true)
            .access_use_flags(false)
            .error_use_flags(true)
            .enable_console(false)
            .enable_syslog(false)
            .flags_utc(false)
            .flags_date(false)
            .flags_time(false)
            .flags_long_file(false)
            .flags_short_file(true)
            .flags_standard(true)
            .recovery_stack(false)
            .app_name("")
            .app_dir("")
            .log_dir(DEFAULT_LOG_DIR)
            .system_log("system.log")
            .access_log("access.log")
            .error_log("error.log")
            .syslog_prot("")
            .syslog_host("")
            .syslog_port("")
            .syslog_tag("")
            .system_tag("system")
            .access_tag("access")
            .error_tag("error")
            .computed_flags()
    }

    /// Store the flag bitmask each channel would get from the current
    /// options, so documents saved before `init` show it.
    fn computed_flags(mut self) -> Self {
        self.settings.config.log_flags =
            PerChannel::from_fn(|channel| self.settings.channel_flags(channel).bits());
        self
    }

    // Channel group toggles

    /// Turn file, console and syslog output of one channel on or off.
    #[must_use = "builder methods return a new value"]
    pub fn enable_channel(mut self, channel: Channel, enable: bool) -> Self {
        let options = &mut self.settings.options;
        *options.log_files.get_mut(channel) = enable;
        *options.console.get_mut(channel) = enable;
        *options.syslog.get_mut(channel) = enable;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn enable_system(self, enable: bool) -> Self {
        self.enable_channel(Channel::System, enable)
    }

    #[must_use = "builder methods return a new value"]
    pub fn enable_access(self, enable: bool) -> Self {
        self.enable_channel(Channel::Access, enable)
    }

    #[must_use = "builder methods return a new value"]
    pub fn enable_error(self, enable: bool) -> Self {
        self.enable_channel(Channel::Error, enable)
    }

    // Sink group toggles

    #[must_use = "builder methods return a new value"]
    pub fn enable_log_files(mut self, enable: bool) -> Self {
        self.settings.options.log_files.set_all(enable);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn enable_console(mut self, enable: bool) -> Self {
        self.settings.options.console.set_all(enable);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn enable_syslog(mut self, enable: bool) -> Self {
        self.settings.options.syslog.set_all(enable);
        self
    }

    // Individual toggles

    #[must_use = "builder methods return a new value"]
    pub fn log_file(mut self, channel: Channel, enable: bool) -> Self {
        *self.settings.options.log_files.get_mut(channel) = enable;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn console(mut self, channel: Channel, enable: bool) -> Self {
        *self.settings.options.console.get_mut(channel) = enable;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn syslog(mut self, channel: Channel, enable: bool) -> Self {
        *self.settings.options.syslog.get_mut(channel) = enable;
        self
    }

    /// Whether `channel` uses the composed formatting flags or none.
    #[must_use = "builder methods return a new value"]
    pub fn use_flags(mut self, channel: Channel, enable: bool) -> Self {
        *self.settings.options.use_flags.get_mut(channel) = enable;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn system_use_flags(self, enable: bool) -> Self {
        self.use_flags(Channel::System, enable)
    }

    #[must_use = "builder methods return a new value"]
    pub fn access_use_flags(self, enable: bool) -> Self {
        self.use_flags(Channel::Access, enable)
    }

    #[must_use = "builder methods return a new value"]
    pub fn error_use_flags(self, enable: bool) -> Self {
        self.use_flags(Channel::Error, enable)
    }

    // Formatting flags

    #[must_use = "builder methods return a new value"]
    pub fn flags_utc(mut self, enable: bool) -> Self {
        self.settings.options.log_flags.utc = enable;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn flags_date(mut self, enable: bool) -> Self {
        self.settings.options.log_flags.date = enable;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn flags_time(mut self, enable: bool) -> Self {
        self.settings.options.log_flags.time = enable;
        self
    }

    /// Enabling the long file form disables the short one.
    #[must_use = "builder methods return a new value"]
    pub fn flags_long_file(mut self, enable: bool) -> Self {
        let flags = &mut self.settings.options.log_flags;
        if enable {
            flags.short_file = false;
        }
        flags.long_file = enable;
        self
    }

    /// Enabling the short file form disables the long one.
    #[must_use = "builder methods return a new value"]
    pub fn flags_short_file(mut self, enable: bool) -> Self {
        let flags = &mut self.settings.options.log_flags;
        if enable {
            flags.long_file = false;
        }
        flags.short_file = enable;
        self
    }

    /// Enabling standard formatting clears UTC, date, time and both file forms.
    #[must_use = "builder methods return a new value"]
    pub fn flags_standard(mut self, enable: bool) -> Self {
        let flags = &mut self.settings.options.log_flags;
        if enable {
            flags.utc = false;
            flags.date = false;
            flags.time = false;
            flags.long_file = false;
            flags.short_file = false;
        }
        flags.standard = enable;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn recovery_stack(mut self, enable: bool) -> Self {
        self.settings.options.recovery_stack = enable;
        self
    }

    // Names and paths

    #[must_use = "builder methods return a new value"]
    pub fn app_name(mut self, name: impl Into<String>) -> Self {
        self.settings.config.app_name = name.into();
        self
    }

    /// Directory a bare log directory name is resolved against. Left empty,
    /// the directory of the running executable is used.
    #[must_use = "builder methods return a new value"]
    pub fn app_dir(mut self, dir: impl Into<String>) -> Self {
        self.settings.config.app_dir = dir.into();
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn log_dir(mut self, dir: impl Into<String>) -> Self {
        self.settings.config.log_dir = dir.into();
        self
    }

    /// Log file for `channel`; a bare name is placed in the log directory.
    #[must_use = "builder methods return a new value"]
    pub fn file_name(mut self, channel: Channel, file: impl Into<String>) -> Self {
        *self.settings.config.log_files.get_mut(channel) = file.into();
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn system_log(self, file: impl Into<String>) -> Self {
        self.file_name(Channel::System, file)
    }

    #[must_use = "builder methods return a new value"]
    pub fn access_log(self, file: impl Into<String>) -> Self {
        self.file_name(Channel::Access, file)
    }

    #[must_use = "builder methods return a new value"]
    pub fn error_log(self, file: impl Into<String>) -> Self {
        self.file_name(Channel::Error, file)
    }

    // Syslog

    #[must_use = "builder methods return a new value"]
    pub fn syslog_prot(mut self, prot: impl Into<String>) -> Self {
        self.settings.config.syslog.prot = prot.into();
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn syslog_host(mut self, host: impl Into<String>) -> Self {
        self.settings.config.syslog.host = host.into();
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn syslog_port(mut self, port: impl Into<String>) -> Self {
        self.settings.config.syslog.port = port.into();
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn syslog_tag(mut self, tag: impl Into<String>) -> Self {
        self.settings.config.syslog.tag = tag.into();
        self
    }

    // Line tags

    #[must_use = "builder methods return a new value"]
    pub fn tag(mut self, channel: Channel, tag: impl Into<String>) -> Self {
        *self.settings.config.log_tags.get_mut(channel) = tag.into();
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn system_tag(self, tag: impl Into<String>) -> Self {
        self.tag(Channel::System, tag)
    }

    #[must_use = "builder methods return a new value"]
    pub fn access_tag(self, tag: impl Into<String>) -> Self {
        self.tag(Channel::Access, tag)
    }

    #[must_use = "builder methods return a new value"]
    pub fn error_tag(self, tag: impl Into<String>) -> Self {
        self.tag(Channel::Error, tag)
    }

    // Runtime-only

    /// Attach an extra destination to `channel`, written after its file,
    /// console and syslog sinks. Not part of the configuration document.
    #[must_use = "builder methods return a new value"]
    pub fn add_sink<S: Sink + 'static>(mut self, channel: Channel, sink: S) -> Self {
        self.extra_sinks.get_mut(channel).push(Box::new(sink));
        self
    }

    /// Permission bits for created log files and directories.
    #[must_use = "builder methods return a new value"]
    pub fn sink_modes(mut self, file_mode: u32, dir_mode: u32) -> Self {
        self.file_mode = file_mode;
        self.dir_mode = dir_mode;
        self
    }

    // Inspection and persistence

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn options(&self) -> &Options {
        &self.settings.options
    }

    pub fn config(&self) -> &Config {
        &self.settings.config
    }

    /// The configuration document as tab-indented JSON.
    pub fn get_config(&self) -> Result<String> {
        self.settings.to_json()
    }

    pub fn save_config(&self, path: impl AsRef<Path>) -> Result<()> {
        self.settings.save(path)
    }

    /// Lock the configuration and open every enabled sink.
    ///
    /// Sinks that fail to open are reported on stderr and left out; a
    /// channel left without sinks discards its output.
    pub fn init(self) -> MultiLogger {
        let MultiLoggerBuilder {
            mut settings,
            mut extra_sinks,
            file_mode,
            dir_mode,
        } = self;

        resolve_paths(&mut settings.config);

        let flags: PerChannel<LogFlags> =
            PerChannel::from_fn(|channel| settings.channel_flags(channel));
        settings.config.log_flags = flags.clone().map(|_, f| f.bits());
        settings.config.log_tags = settings
            .config
            .log_tags
            .clone()
            .map(|_, tag| normalize_tag(&tag));

        let factory = SinkFactory::new(effective_syslog(&settings.config))
            .with_modes(file_mode, dir_mode);
        let mut sinks = open_sinks(&settings, &factory);

        for channel in Channel::ALL {
            sinks
                .get_mut(channel)
                .append(extra_sinks.get_mut(channel));
        }

        let writers = sinks.map(|_, sinks| ChannelWriter::new(FanoutWriter::new(sinks)));
        let buf_writers =
            PerChannel::from_fn(|channel| BufferedChannelWriter::new(writers.get(channel).clone()));
        let loggers = PerChannel::from_fn(|channel| {
            ChannelLogger::new(
                writers.get(channel).clone(),
                settings.config.log_tags.get(channel).clone(),
                *flags.get(channel),
            )
        });

        MultiLogger {
            settings,
            writers,
            buf_writers,
            loggers,
        }
    }
}

impl Default for MultiLoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MultiLoggerBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let extra_sinks: PerChannel<Vec<&str>> = PerChannel::from_fn(|channel| {
            self.extra_sinks
                .get(channel)
                .iter()
                .map(|sink| sink.name())
                .collect()
        });
        f.debug_struct("MultiLoggerBuilder")
            .field("settings", &self.settings)
            .field("extra_sinks", &extra_sinks)
            .finish()
    }
}

/// Fill in the application directory and resolve the log directory and
/// log file paths, writing the results back.
fn resolve_paths(config: &mut Config) {
    if config.app_dir.is_empty() {
        config.app_dir = default_app_dir().display().to_string();
    }

    let log_dir = resolve_log_dir(Path::new(&config.app_dir), &config.log_dir);
    config.log_dir = log_dir.display().to_string();

    for channel in Channel::ALL {
        let file = config.log_files.get_mut(channel);
        if !file.is_empty() {
            *file = resolve_log_file(&log_dir, file).display().to_string();
        }
    }
}

/// Syslog parameters with the program tag filled in: the configured tag,
/// else the application name, else the executable name.
fn effective_syslog(config: &Config) -> SyslogConfig {
    let mut syslog = config.syslog.clone();
    if syslog.tag.trim().is_empty() {
        syslog.tag = if !config.app_name.trim().is_empty() {
            config.app_name.trim().to_string()
        } else {
            std::env::current_exe()
                .ok()
                .and_then(|exe| exe.file_stem().map(|s| s.to_string_lossy().into_owned()))
                .unwrap_or_else(|| "rust_multilog".to_string())
        };
    }
    syslog
}

/// Open the enabled sinks: all files, then all consoles, then all syslog
/// connections. Failures are reported and skipped.
fn open_sinks(settings: &Settings, factory: &SinkFactory) -> PerChannel<Vec<Box<dyn Sink>>> {
    let options = &settings.options;
    let mut sinks: PerChannel<Vec<Box<dyn Sink>>> = PerChannel::default();

    for channel in Channel::ALL {
        if !*options.log_files.get(channel) {
            continue;
        }
        let file = settings.config.log_files.get(channel);
        if file.is_empty() {
            eprintln!(
                "[LOGGER WARNING] {} channel: log file enabled but no file name configured",
                channel
            );
            continue;
        }
        match factory.open_file(Path::new(file)) {
            Ok(sink) => sinks.get_mut(channel).push(sink),
            Err(e) => eprintln!("[LOGGER WARNING] {} channel: {}", channel, crate::decorate!(e)),
        }
    }

    for channel in Channel::ALL {
        if *options.console.get(channel) {
            sinks.get_mut(channel).push(factory.console(channel));
        }
    }

    for channel in Channel::ALL {
        if !*options.syslog.get(channel) {
            continue;
        }
        match factory.open_syslog(channel) {
            Ok(sink) => sinks.get_mut(channel).push(sink),
            Err(e) => eprintln!("[LOGGER WARNING] {} channel: {}", channel, crate::decorate!(e)),
        }
    }

    sinks
}

/// Initialized, locked logger with one writer, buffered writer and line
/// logger per channel.
///
/// Only read accessors exist; configuration is fixed once
/// [`MultiLoggerBuilder::init`] has run:
///
/// ```compile_fail
/// use rust_multilog::MultiLoggerBuilder;
///
/// let mlw = MultiLoggerBuilder::new().init();
/// let mlw = mlw.enable_console(true);
/// ```
pub struct MultiLogger {
    settings: Settings,
    writers: PerChannel<ChannelWriter>,
    buf_writers: PerChannel<BufferedChannelWriter>,
    loggers: PerChannel<ChannelLogger>,
}

impl MultiLogger {
    /// Start configuring a new logger.
    #[must_use]
    pub fn builder() -> MultiLoggerBuilder {
        MultiLoggerBuilder::new()
    }

    /// Baseline configuration, initialized.
    pub fn with_defaults() -> Self {
        MultiLoggerBuilder::new().defaults().init()
    }

    pub fn writer(&self, channel: Channel) -> &ChannelWriter {
        self.writers.get(channel)
    }

    pub fn buf_writer(&self, channel: Channel) -> &BufferedChannelWriter {
        self.buf_writers.get(channel)
    }

    pub fn logger(&self, channel: Channel) -> &ChannelLogger {
        self.loggers.get(channel)
    }

    pub fn system_writer(&self) -> &ChannelWriter {
        self.writer(Channel::System)
    }

    pub fn access_writer(&self) -> &ChannelWriter {
        self.writer(Channel::Access)
    }

    pub fn error_writer(&self) -> &ChannelWriter {
        self.writer(Channel::Error)
    }

    pub fn system_buf_writer(&self) -> &BufferedChannelWriter {
        self.buf_writer(Channel::System)
    }

    pub fn access_buf_writer(&self) -> &BufferedChannelWriter {
        self.buf_writer(Channel::Access)
    }

    pub fn error_buf_writer(&self) -> &BufferedChannelWriter {
        self.buf_writer(Channel::Error)
    }

    pub fn system_logger(&self) -> &ChannelLogger {
        self.logger(Channel::System)
    }

    pub fn access_logger(&self) -> &ChannelLogger {
        self.logger(Channel::Access)
    }

    pub fn error_logger(&self) -> &ChannelLogger {
        self.logger(Channel::Error)
    }

    /// Names of the sinks a channel actually writes to.
    pub fn active_sinks(&self, channel: Channel) -> Vec<String> {
        self.writers.get(channel).sink_names()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn options(&self) -> &Options {
        &self.settings.options
    }

    pub fn config(&self) -> &Config {
        &self.settings.config
    }

    pub fn recovery_stack(&self) -> bool {
        self.settings.options.recovery_stack
    }

    /// Flush every buffered writer, then every channel writer.
    ///
    /// All are attempted; the first failure is returned.
    pub fn flush(&self) -> Result<()> {
        let mut first_err = None;

        for channel in Channel::ALL {
            if let Err(e) = (&*self.buf_writers.get(channel)).flush() {
                first_err.get_or_insert(e);
            }
        }
        for channel in Channel::ALL {
            if let Err(e) = (&*self.writers.get(channel)).flush() {
                first_err.get_or_insert(e);
            }
        }

        match first_err {
            Some(e) => Err(e.into()),
            None => Ok(()),
        }
    }

    /// The configuration document as tab-indented JSON, including the
    /// values resolved during initialization.
    pub fn get_config(&self) -> Result<String> {
        self.settings.to_json()
    }

    pub fn save_config(&self, path: impl AsRef<Path>) -> Result<()> {
        self.settings.save(path)
    }
}

impl fmt::Debug for MultiLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MultiLogger")
            .field("settings", &self.settings)
            .field("sinks", &PerChannel::from_fn(|c| self.active_sinks(c)))
            .finish()
    }
}
