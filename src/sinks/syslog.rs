//! Syslog sink
//!
//! Sends each log line as one BSD-style syslog message
//! (`<PRI>TIMESTAMP HOSTNAME TAG[PID]: MSG`) to a remote collector over UDP
//! or TCP, to a named unix socket, or to the local daemon.

use crate::core::{LoggerError, Result, Sink, SyslogSeverity};
use chrono::Local;
use std::fmt;
use std::io::{self, Write};
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr, TcpStream, ToSocketAddrs, UdpSocket};
use std::str::FromStr;

/// Facility code for `local7`.
pub const FACILITY_LOCAL7: u8 = 23;

/// Well-known local daemon sockets, tried in order.
#[cfg(unix)]
const LOCAL_SOCKETS: [&str; 3] = ["/dev/log", "/var/run/syslog", "/var/run/log"];

/// Combined facility and severity, as carried in the `<PRI>` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyslogPriority {
    facility: u8,
    severity: SyslogSeverity,
}

impl SyslogPriority {
    pub fn new(facility: u8, severity: SyslogSeverity) -> Self {
        Self { facility, severity }
    }

    pub fn local7(severity: SyslogSeverity) -> Self {
        Self::new(FACILITY_LOCAL7, severity)
    }

    pub fn code(&self) -> u16 {
        u16::from(self.facility) * 8 + self.severity as u16
    }
}

/// How to reach the syslog collector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyslogTransport {
    Udp,
    Tcp,
    /// Named unix socket; the configured host is the socket path.
    Unix,
    /// The local daemon on its well-known socket.
    Local,
}

impl FromStr for SyslogTransport {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "" => Ok(SyslogTransport::Local),
            "udp" | "udp4" | "udp6" => Ok(SyslogTransport::Udp),
            "tcp" | "tcp4" | "tcp6" => Ok(SyslogTransport::Tcp),
            "unix" | "unixgram" => Ok(SyslogTransport::Unix),
            other => Err(LoggerError::config(
                "Syslog",
                format!("unsupported protocol '{}'", other),
            )),
        }
    }
}

impl fmt::Display for SyslogTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SyslogTransport::Udp => "udp",
            SyslogTransport::Tcp => "tcp",
            SyslogTransport::Unix => "unix",
            SyslogTransport::Local => "local",
        };
        write!(f, "{}", name)
    }
}

enum Connection {
    Udp(UdpSocket),
    Tcp(TcpStream),
    #[cfg(unix)]
    UnixDatagram(std::os::unix::net::UnixDatagram),
    #[cfg(unix)]
    UnixStream(std::os::unix::net::UnixStream),
}

impl Connection {
    fn is_network(&self) -> bool {
        matches!(self, Connection::Udp(_) | Connection::Tcp(_))
    }

    fn send(&mut self, frame: &[u8]) -> io::Result<()> {
        match self {
            Connection::Udp(socket) => socket.send(frame).map(|_| ()),
            Connection::Tcp(stream) => stream.write_all(frame),
            #[cfg(unix)]
            Connection::UnixDatagram(socket) => socket.send(frame).map(|_| ()),
            #[cfg(unix)]
            Connection::UnixStream(stream) => stream.write_all(frame),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Connection::Tcp(stream) => stream.flush(),
            #[cfg(unix)]
            Connection::UnixStream(stream) => stream.flush(),
            _ => Ok(()),
        }
    }
}

/// Open connection to a syslog collector.
pub struct SyslogSink {
    connection: Connection,
    priority: SyslogPriority,
    tag: String,
    hostname: String,
    pid: u32,
    label: String,
}

impl SyslogSink {
    /// Connect to a collector.
    ///
    /// `address` is `host:port` for network transports and a socket path
    /// for [`SyslogTransport::Unix`]; it is ignored for
    /// [`SyslogTransport::Local`].
    pub fn dial(
        transport: SyslogTransport,
        address: &str,
        priority: SyslogPriority,
        tag: impl Into<String>,
    ) -> Result<Self> {
        let target = match transport {
            SyslogTransport::Local => "local".to_string(),
            _ => address.to_string(),
        };
        let connection = connect(transport, address)
            .map_err(|e| LoggerError::sink_open("syslog", target.clone(), e))?;

        Ok(Self {
            connection,
            priority,
            tag: tag.into(),
            hostname: hostname(),
            pid: std::process::id(),
            label: format!("syslog:{}:{}", transport, target),
        })
    }

    pub fn priority(&self) -> SyslogPriority {
        self.priority
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Build one message frame.
    fn frame(&self, message: &str) -> String {
        let timestamp = Local::now().format("%b %e %H:%M:%S");
        let mut frame = if self.connection.is_network() {
            format!(
                "<{}>{} {} {}[{}]: {}",
                self.priority.code(),
                timestamp,
                self.hostname,
                self.tag,
                self.pid,
                message
            )
        } else {
            format!(
                "<{}>{} {}[{}]: {}",
                self.priority.code(),
                timestamp,
                self.tag,
                self.pid,
                message
            )
        };

        if matches!(self.connection, Connection::Tcp(_)) {
            frame.push('\n');
        }
        frame
    }
}

fn connect(transport: SyslogTransport, address: &str) -> io::Result<Connection> {
    match transport {
        SyslogTransport::Udp => {
            let remote = resolve(address)?;
            let local = if remote.is_ipv4() {
                SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0))
            } else {
                SocketAddr::from((Ipv6Addr::UNSPECIFIED, 0))
            };
            let socket = UdpSocket::bind(local)?;
            socket.connect(remote)?;
            Ok(Connection::Udp(socket))
        }
        SyslogTransport::Tcp => {
            let stream = TcpStream::connect(resolve(address)?)?;
            stream.set_nodelay(true)?;
            Ok(Connection::Tcp(stream))
        }
        SyslogTransport::Unix => connect_unix(address),
        SyslogTransport::Local => connect_local(),
    }
}

fn resolve(address: &str) -> io::Result<SocketAddr> {
    address.to_socket_addrs()?.next().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::AddrNotAvailable,
            format!("no address for '{}'", address),
        )
    })
}

#[cfg(unix)]
fn connect_unix(path: &str) -> io::Result<Connection> {
    use std::os::unix::net::{UnixDatagram, UnixStream};

    let datagram = UnixDatagram::unbound().and_then(|socket| {
        socket.connect(path)?;
        Ok(socket)
    });
    match datagram {
        Ok(socket) => Ok(Connection::UnixDatagram(socket)),
        Err(_) => UnixStream::connect(path).map(Connection::UnixStream),
    }
}

#[cfg(unix)]
fn connect_local() -> io::Result<Connection> {
    let mut last_err = None;
    for path in LOCAL_SOCKETS {
        match connect_unix(path) {
            Ok(connection) => return Ok(connection),
            Err(e) => last_err = Some(e),
        }
    }
    Err(last_err.unwrap_or_else(|| {
        io::Error::new(io::ErrorKind::NotFound, "no local syslog socket")
    }))
}

#[cfg(not(unix))]
fn connect_unix(_path: &str) -> io::Result<Connection> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "unix sockets are not available on this platform",
    ))
}

#[cfg(not(unix))]
fn connect_local() -> io::Result<Connection> {
    connect_unix("")
}

fn hostname() -> String {
    std::env::var("HOSTNAME")
        .ok()
        .or_else(|| std::fs::read_to_string("/etc/hostname").ok())
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "localhost".to_string())
}

impl Write for SyslogSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let text = String::from_utf8_lossy(buf);
        for line in text.lines().map(str::trim_end).filter(|l| !l.is_empty()) {
            let frame = self.frame(line);
            self.connection.send(frame.as_bytes())?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.connection.flush()
    }
}

impl Sink for SyslogSink {
    fn name(&self) -> &str {
        &self.label
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn udp_collector() -> (UdpSocket, String) {
        let socket = UdpSocket::bind("127.0.0.1:0").expect("bind collector");
        socket
            .set_read_timeout(Some(Duration::from_secs(2)))
            .expect("timeout");
        let addr = socket.local_addr().expect("addr").to_string();
        (socket, addr)
    }

    fn recv(socket: &UdpSocket) -> String {
        let mut buf = [0u8; 2048];
        let n = socket.recv(&mut buf).expect("datagram");
        String::from_utf8_lossy(&buf[..n]).into_owned()
    }

    #[test]
    fn test_priority_codes() {
        assert_eq!(SyslogPriority::local7(SyslogSeverity::Info).code(), 190);
        assert_eq!(SyslogPriority::local7(SyslogSeverity::Error).code(), 187);
    }

    #[test]
    fn test_transport_parse() {
        assert_eq!("udp".parse::<SyslogTransport>().unwrap(), SyslogTransport::Udp);
        assert_eq!("TCP".parse::<SyslogTransport>().unwrap(), SyslogTransport::Tcp);
        assert_eq!("unixgram".parse::<SyslogTransport>().unwrap(), SyslogTransport::Unix);
        assert_eq!("".parse::<SyslogTransport>().unwrap(), SyslogTransport::Local);
        assert!("sctp".parse::<SyslogTransport>().is_err());
    }

    #[test]
    fn test_udp_message_format() {
        let (collector, addr) = udp_collector();
        let mut sink = SyslogSink::dial(
            SyslogTransport::Udp,
            &addr,
            SyslogPriority::local7(SyslogSeverity::Error),
            "myapp",
        )
        .expect("dial");

        sink.write_all(b"error something failed\n").unwrap();

        let message = recv(&collector);
        assert!(message.starts_with("<187>"), "got {}", message);
        assert!(message.contains(&format!(" myapp[{}]: ", std::process::id())));
        assert!(message.ends_with("error something failed"));
    }

    #[test]
    fn test_one_message_per_line() {
        let (collector, addr) = udp_collector();
        let mut sink = SyslogSink::dial(
            SyslogTransport::Udp,
            &addr,
            SyslogPriority::local7(SyslogSeverity::Info),
            "batch",
        )
        .expect("dial");

        sink.write_all(b"first\nsecond\n\n").unwrap();

        assert!(recv(&collector).ends_with("first"));
        assert!(recv(&collector).ends_with("second"));
    }

    #[test]
    fn test_tcp_refused() {
        // Bind then drop to obtain a port nobody listens on
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let result = SyslogSink::dial(
            SyslogTransport::Tcp,
            &format!("127.0.0.1:{}", port),
            SyslogPriority::local7(SyslogSeverity::Info),
            "t",
        );
        assert!(matches!(result, Err(LoggerError::SinkOpen { .. })));
    }
}
