//! INI configuration files.
//!
//! ```ini
//! [sinks]
//! keys = console, errors
//!
//! [sink_console]
//! frontend = light
//! filter = debug | info
//! backend = stdout
//!
//! [sink_errors]
//! frontend = full
//! filter = >= warning
//! backend = syslog
//! ident = myapp
//! priority = err
//! ```
//!
//! Files are decoded with `encoding_rs` before parsing so configuration
//! written in a legacy encoding can still be read.

use std::fs;
use std::path::{Path, PathBuf};

use encoding_rs::Encoding;
use ini::{Ini, Properties};

use crate::backend::{SyslogFacility, SyslogOptions, SyslogPriority};
use crate::error::ConfigError;
use crate::predicate::Predicate;

use super::types::{BackendConfig, FrontendKind, LoggingConfig, SinkConfig};

const DEFAULT_ENCODING: &str = "utf-8";

/// Read and parse an INI file, decoding it with `encoding` (UTF-8 if `None`).
pub fn load_ini_file(
    path: impl AsRef<Path>,
    encoding: Option<&str>,
) -> Result<LoggingConfig, ConfigError> {
    let bytes = fs::read(path)?;
    let text = decode_with_encoding(&bytes, encoding.unwrap_or(DEFAULT_ENCODING))?;
    parse_ini_str(&text)
}

fn decode_with_encoding(bytes: &[u8], label: &str) -> Result<String, ConfigError> {
    let encoding = Encoding::for_label(label.trim().as_bytes())
        .ok_or_else(|| ConfigError::UnknownEncoding(label.to_owned()))?;
    let (decoded, actual, had_errors) = encoding.decode(bytes);
    if had_errors {
        return Err(ConfigError::Decode {
            encoding: actual.name(),
        });
    }
    Ok(decoded.into_owned())
}

/// Parse INI text into a [`LoggingConfig`].
pub fn parse_ini_str(text: &str) -> Result<LoggingConfig, ConfigError> {
    let ini = Ini::load_from_str(text).map_err(|err| ConfigError::Ini(err.to_string()))?;
    let sinks = ini
        .section(Some("sinks"))
        .ok_or_else(|| ConfigError::MissingOption("[sinks]".to_owned()))?;
    reject_unknown_keys("sinks", sinks, &["keys"])?;
    let keys = sinks
        .get("keys")
        .ok_or_else(|| ConfigError::MissingOption("keys".to_owned()))?;

    let mut config = LoggingConfig::new();
    for name in keys.split(',').map(str::trim).filter(|name| !name.is_empty()) {
        let section_name = format!("sink_{name}");
        let section = ini
            .section(Some(section_name.as_str()))
            .ok_or_else(|| ConfigError::MissingOption(format!("[{section_name}]")).in_sink(name))?;
        let sink = sink_from_section(&section_name, section).map_err(|err| err.in_sink(name))?;
        config = config.with_sink(name, sink);
    }
    Ok(config)
}

const FRONTEND_KEYS: &[&str] = &["frontend", "filter", "layout", "time_format", "backend"];
const FILE_KEYS: &[&str] = &["path"];
const SYSLOG_KEYS: &[&str] = &["ident", "priority", "facility", "socket", "udp"];

fn sink_from_section(section: &str, props: &Properties) -> Result<SinkConfig, ConfigError> {
    let backend_kind = props
        .get("backend")
        .ok_or_else(|| ConfigError::MissingOption("backend".to_owned()))?;
    let (backend, extra_keys) = match backend_kind.trim().to_ascii_lowercase().as_str() {
        "stdout" => (BackendConfig::Stdout, &[][..]),
        "stderr" => (BackendConfig::Stderr, &[][..]),
        "file" => (file_backend(props)?, FILE_KEYS),
        "syslog" => (syslog_backend(props)?, SYSLOG_KEYS),
        _ => {
            return Err(ConfigError::UnknownOption {
                key: "backend".to_owned(),
                value: backend_kind.to_owned(),
            });
        }
    };
    let allowed: Vec<&str> = FRONTEND_KEYS.iter().chain(extra_keys).copied().collect();
    reject_unknown_keys(section, props, &allowed)?;

    let frontend: FrontendKind = props
        .get("frontend")
        .ok_or_else(|| ConfigError::MissingOption("frontend".to_owned()))?
        .parse()?;
    let mut sink = SinkConfig::new().with_frontend(frontend).with_backend(backend);
    if let Some(filter) = props.get("filter") {
        sink = sink.with_filter(filter.parse::<Predicate>()?);
    }
    if let Some(layout) = props.get("layout") {
        sink = sink.with_layout(layout);
    }
    if let Some(format) = props.get("time_format") {
        sink = sink.with_time_format(format);
    }
    Ok(sink)
}

fn file_backend(props: &Properties) -> Result<BackendConfig, ConfigError> {
    let path = props
        .get("path")
        .ok_or_else(|| ConfigError::MissingOption("path".to_owned()))?;
    Ok(BackendConfig::File(PathBuf::from(path.trim())))
}

fn syslog_backend(props: &Properties) -> Result<BackendConfig, ConfigError> {
    let priority = match props.get("priority") {
        Some(priority) => priority.parse::<SyslogPriority>()?,
        None => SyslogPriority::Info,
    };
    let mut options = SyslogOptions::new();
    if let Some(ident) = props.get("ident") {
        options = options.ident(ident.trim());
    }
    if let Some(facility) = props.get("facility") {
        options = options.facility(facility.parse::<SyslogFacility>()?);
    }
    match (props.get("socket"), props.get("udp")) {
        (Some(_), Some(udp)) => {
            return Err(ConfigError::UnknownOption {
                key: "udp".to_owned(),
                value: format!("{udp} (conflicts with `socket`)"),
            });
        }
        (Some(socket), None) => options = options.unix_socket(socket.trim()),
        (None, Some(udp)) => options = options.udp(udp.trim()),
        (None, None) => {}
    }
    Ok(BackendConfig::Syslog { priority, options })
}

fn reject_unknown_keys(
    section: &str,
    props: &Properties,
    allowed: &[&str],
) -> Result<(), ConfigError> {
    match props.iter().find(|(key, _)| !allowed.contains(key)) {
        Some((key, _)) => Err(ConfigError::UnknownKey {
            section: section.to_owned(),
            key: key.to_owned(),
        }),
        None => Ok(()),
    }
}

impl LoggingConfig {
    /// See [`parse_ini_str`].
    pub fn from_ini_str(text: &str) -> Result<Self, ConfigError> {
        parse_ini_str(text)
    }

    /// See [`load_ini_file`].
    pub fn from_ini_file(path: impl AsRef<Path>, encoding: Option<&str>) -> Result<Self, ConfigError> {
        load_ini_file(path, encoding)
    }
}
