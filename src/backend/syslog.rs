//! Backend sending each record to the system log.
//!
//! Records are framed in the BSD syslog format
//! `<PRI>Mmm dd hh:mm:ss IDENT[PID]: TEXT` and sent as one datagram, either
//! to the local syslog socket or to a remote collector over UDP.

use std::fmt;
use std::io;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr, ToSocketAddrs, UdpSocket};
#[cfg(unix)]
use std::os::unix::net::UnixDatagram;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::Local;
use log::warn;
use parking_lot::Mutex;

use super::Backend;
use crate::error::ConfigError;
use crate::rate_limited_warner::RateLimitedWarner;

#[cfg(target_os = "macos")]
const DEFAULT_SOCKET: &str = "/var/run/syslog";
#[cfg(not(target_os = "macos"))]
const DEFAULT_SOCKET: &str = "/dev/log";

/// Syslog priority a backend stamps on every record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SyslogPriority {
    Emerg,
    Alert,
    Crit,
    Err,
    Warning,
    Notice,
    Info,
    Debug,
}

impl SyslogPriority {
    /// Native priority code, `LOG_EMERG` (0) through `LOG_DEBUG` (7).
    pub fn native(self) -> u8 {
        self as u8
    }
}

impl FromStr for SyslogPriority {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, ConfigError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "emerg" | "emergency" => Ok(Self::Emerg),
            "alert" => Ok(Self::Alert),
            "crit" | "critical" => Ok(Self::Crit),
            "err" | "error" => Ok(SyslogPriority::Err),
            "warning" | "warn" => Ok(Self::Warning),
            "notice" => Ok(Self::Notice),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            _ => Err(ConfigError::UnknownOption {
                key: "priority".to_owned(),
                value: s.to_owned(),
            }),
        }
    }
}

/// Syslog facility, identifying the kind of program logging.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SyslogFacility {
    Kern,
    #[default]
    User,
    Mail,
    Daemon,
    Auth,
    Syslog,
    Lpr,
    News,
    Uucp,
    Cron,
    AuthPriv,
    Ftp,
    Local0,
    Local1,
    Local2,
    Local3,
    Local4,
    Local5,
    Local6,
    Local7,
}

impl SyslogFacility {
    /// Native facility number (not yet shifted into the `PRI` field).
    pub fn native(self) -> u8 {
        match self {
            Self::Kern => 0,
            Self::User => 1,
            Self::Mail => 2,
            Self::Daemon => 3,
            Self::Auth => 4,
            Self::Syslog => 5,
            Self::Lpr => 6,
            Self::News => 7,
            Self::Uucp => 8,
            Self::Cron => 9,
            Self::AuthPriv => 10,
            Self::Ftp => 11,
            Self::Local0 => 16,
            Self::Local1 => 17,
            Self::Local2 => 18,
            Self::Local3 => 19,
            Self::Local4 => 20,
            Self::Local5 => 21,
            Self::Local6 => 22,
            Self::Local7 => 23,
        }
    }
}

impl FromStr for SyslogFacility {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, ConfigError> {
        let facility = match s.trim().to_ascii_lowercase().as_str() {
            "kern" => Self::Kern,
            "user" => Self::User,
            "mail" => Self::Mail,
            "daemon" => Self::Daemon,
            "auth" => Self::Auth,
            "syslog" => Self::Syslog,
            "lpr" => Self::Lpr,
            "news" => Self::News,
            "uucp" => Self::Uucp,
            "cron" => Self::Cron,
            "authpriv" => Self::AuthPriv,
            "ftp" => Self::Ftp,
            "local0" => Self::Local0,
            "local1" => Self::Local1,
            "local2" => Self::Local2,
            "local3" => Self::Local3,
            "local4" => Self::Local4,
            "local5" => Self::Local5,
            "local6" => Self::Local6,
            "local7" => Self::Local7,
            _ => {
                return Err(ConfigError::UnknownOption {
                    key: "facility".to_owned(),
                    value: s.to_owned(),
                });
            }
        };
        Ok(facility)
    }
}

/// Where syslog datagrams are sent.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum SyslogTarget {
    /// The platform's local syslog socket.
    #[default]
    Local,
    /// A Unix datagram socket at a specific path.
    Unix(PathBuf),
    /// A remote collector, as `host:port`.
    Udp(String),
}

/// Construction options for [`SyslogBackend`].
#[derive(Clone, Debug, Default)]
pub struct SyslogOptions {
    ident: Option<String>,
    facility: SyslogFacility,
    target: SyslogTarget,
}

impl SyslogOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Identifier prefixed to every record; defaults to the program name.
    pub fn ident(mut self, ident: impl Into<String>) -> Self {
        self.ident = Some(ident.into());
        self
    }

    pub fn facility(mut self, facility: SyslogFacility) -> Self {
        self.facility = facility;
        self
    }

    pub fn unix_socket(mut self, path: impl Into<PathBuf>) -> Self {
        self.target = SyslogTarget::Unix(path.into());
        self
    }

    pub fn udp(mut self, address: impl Into<String>) -> Self {
        self.target = SyslogTarget::Udp(address.into());
        self
    }

    pub fn target(&self) -> &SyslogTarget {
        &self.target
    }
}

fn program_name() -> String {
    std::env::args_os()
        .next()
        .as_deref()
        .map(std::path::Path::new)
        .and_then(|path| path.file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "sievelog".to_owned())
}

enum Transport {
    #[cfg(unix)]
    Unix(UnixDatagram),
    Udp(UdpSocket),
}

impl Transport {
    fn connect(target: &SyslogTarget) -> io::Result<Self> {
        match target {
            SyslogTarget::Local => Self::connect_unix(PathBuf::from(DEFAULT_SOCKET)),
            SyslogTarget::Unix(path) => Self::connect_unix(path.clone()),
            SyslogTarget::Udp(address) => {
                let remote = address.to_socket_addrs()?.next().ok_or_else(|| {
                    io::Error::new(
                        io::ErrorKind::InvalidInput,
                        format!("syslog address `{address}` did not resolve"),
                    )
                })?;
                let local = if remote.is_ipv4() {
                    SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0))
                } else {
                    SocketAddr::from((Ipv6Addr::UNSPECIFIED, 0))
                };
                let socket = UdpSocket::bind(local)?;
                socket.connect(remote)?;
                Ok(Self::Udp(socket))
            }
        }
    }

    #[cfg(unix)]
    fn connect_unix(path: PathBuf) -> io::Result<Self> {
        let socket = UnixDatagram::unbound()?;
        socket.connect(path)?;
        Ok(Self::Unix(socket))
    }

    #[cfg(not(unix))]
    fn connect_unix(path: PathBuf) -> io::Result<Self> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            format!("unix syslog socket {} is unavailable here", path.display()),
        ))
    }

    fn send(&self, datagram: &[u8]) -> io::Result<usize> {
        match self {
            #[cfg(unix)]
            Self::Unix(socket) => socket.send(datagram),
            Self::Udp(socket) => socket.send(datagram),
        }
    }
}

/// Backend emitting one syslog record per consumed line at a fixed priority.
///
/// The channel is opened when the backend is built and reopened once if a
/// send fails. The event's own severity plays no part here.
pub struct SyslogBackend {
    transport: Mutex<Transport>,
    target: SyslogTarget,
    ident: String,
    pid: u32,
    pri: u8,
    warner: RateLimitedWarner,
}

impl SyslogBackend {
    /// Backend on the local syslog socket, identified by the program name.
    pub fn new(priority: SyslogPriority) -> io::Result<Self> {
        Self::with_options(priority, SyslogOptions::default())
    }

    pub fn with_options(priority: SyslogPriority, options: SyslogOptions) -> io::Result<Self> {
        let transport = Transport::connect(&options.target)?;
        Ok(Self {
            transport: Mutex::new(transport),
            target: options.target,
            ident: options.ident.unwrap_or_else(program_name),
            pid: std::process::id(),
            pri: options.facility.native() * 8 + priority.native(),
            warner: RateLimitedWarner::default(),
        })
    }

    pub fn ident(&self) -> &str {
        &self.ident
    }

    fn frame(&self, text: &str) -> String {
        format!(
            "<{}>{} {}[{}]: {}",
            self.pri,
            Local::now().format("%b %e %H:%M:%S"),
            self.ident,
            self.pid,
            text
        )
    }

    fn send(&self, datagram: &[u8]) -> io::Result<()> {
        let mut transport = self.transport.lock();
        if transport.send(datagram).is_ok() {
            return Ok(());
        }
        *transport = Transport::connect(&self.target)?;
        transport.send(datagram).map(drop)
    }
}

impl Backend for SyslogBackend {
    fn consume(&self, text: &str) {
        let record = self.frame(text);
        if let Err(err) = self.send(record.as_bytes()) {
            self.warner.record_failure();
            self.warner.warn_if_due(|count| {
                warn!("SyslogBackend: failed to send {count} record(s): {err}");
            });
        }
    }
}

impl fmt::Debug for SyslogBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyslogBackend")
            .field("target", &self.target)
            .field("ident", &self.ident)
            .field("pri", &self.pri)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(SyslogPriority::Emerg, 0)]
    #[case(SyslogPriority::Err, 3)]
    #[case(SyslogPriority::Warning, 4)]
    #[case(SyslogPriority::Debug, 7)]
    fn priorities_map_to_native_codes(#[case] priority: SyslogPriority, #[case] code: u8) {
        assert_eq!(priority.native(), code);
    }

    #[rstest]
    #[case("err", SyslogPriority::Err)]
    #[case("WARN", SyslogPriority::Warning)]
    #[case(" notice ", SyslogPriority::Notice)]
    fn parses_priorities(#[case] input: &str, #[case] expected: SyslogPriority) {
        assert_eq!(input.parse::<SyslogPriority>().expect("known priority"), expected);
    }

    #[test]
    fn rejects_unknown_names() {
        assert!("loud".parse::<SyslogPriority>().is_err());
        assert!("local9".parse::<SyslogFacility>().is_err());
        assert_eq!(
            "local3".parse::<SyslogFacility>().expect("known facility"),
            SyslogFacility::Local3
        );
    }

    #[cfg(unix)]
    #[test]
    fn sends_bsd_framed_record_over_unix_socket() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("log.sock");
        let receiver = UnixDatagram::bind(&path).expect("bind receiver");
        let backend = SyslogBackend::with_options(
            SyslogPriority::Err,
            SyslogOptions::new().ident("myapp").unix_socket(&path),
        )
        .expect("connect to receiver");

        backend.consume("ERR main.rs:3 [main] disk on fire");

        let mut buf = [0u8; 512];
        let len = receiver.recv(&mut buf).expect("receive datagram");
        let record = std::str::from_utf8(&buf[..len]).expect("utf-8 record");
        assert!(record.starts_with("<11>"), "{record}");
        let suffix = format!("myapp[{}]: ERR main.rs:3 [main] disk on fire", std::process::id());
        assert!(record.ends_with(&suffix), "{record}");
    }

    #[cfg(unix)]
    #[test]
    fn reconnects_after_receiver_restarts() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("log.sock");
        let first = UnixDatagram::bind(&path).expect("bind receiver");
        let backend = SyslogBackend::with_options(
            SyslogPriority::Info,
            SyslogOptions::new().ident("svc").unix_socket(&path),
        )
        .expect("connect to receiver");
        drop(first);
        std::fs::remove_file(&path).expect("remove stale socket");
        let second = UnixDatagram::bind(&path).expect("rebind receiver");

        backend.consume("after restart");

        let mut buf = [0u8; 512];
        let len = second.recv(&mut buf).expect("receive datagram");
        assert!(std::str::from_utf8(&buf[..len])
            .expect("utf-8 record")
            .ends_with("]: after restart"));
    }

    #[test]
    fn sends_to_udp_collector_with_facility() {
        let receiver = UdpSocket::bind("127.0.0.1:0").expect("bind receiver");
        let address = receiver.local_addr().expect("local address").to_string();
        let backend = SyslogBackend::with_options(
            SyslogPriority::Info,
            SyslogOptions::new()
                .ident("udp-app")
                .facility(SyslogFacility::Local0)
                .udp(address),
        )
        .expect("connect to collector");

        backend.consume("hello");

        let mut buf = [0u8; 512];
        let len = receiver.recv(&mut buf).expect("receive datagram");
        let record = std::str::from_utf8(&buf[..len]).expect("utf-8 record");
        assert!(record.starts_with("<134>"), "{record}");
        assert!(record.contains(" udp-app["), "{record}");
    }

    #[test]
    fn ident_defaults_to_program_name() {
        assert!(!program_name().is_empty());
    }
}
