use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Address of the job manager's control endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostPort {
    pub host: String,
    pub port: u16,
}

impl HostPort {
    /// Address in a form `tokio::net::TcpStream::connect` accepts.
    pub fn socket_address(&self) -> String {
        if self.host.contains(':') { format!("[{}]:{}", self.host, self.port) } else { format!("{}:{}", self.host, self.port) }
    }
}

impl fmt::Display for HostPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.socket_address())
    }
}

impl FromStr for HostPort {
    type Err = Error;

    /// Accepts `host:port` and `[ipv6]:port`.
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| Error::InvalidEndpoint { input: input.to_string(), reason: reason.to_string() };

        let (host, port) = input.rsplit_once(':').ok_or_else(|| invalid("expected <host>:<port>"))?;

        let host = match host.strip_prefix('[') {
            Some(bracketed) => bracketed.strip_suffix(']').ok_or_else(|| invalid("unterminated IPv6 address"))?,
            None if host.contains(':') => return Err(invalid("IPv6 addresses must be enclosed in brackets")),
            None => host,
        };

        if host.is_empty() {
            return Err(invalid("host is empty"));
        }
        if host.chars().any(char::is_whitespace) {
            return Err(invalid("host contains whitespace"));
        }

        let port: u16 = port.parse().map_err(|_| invalid("port must be a number between 1 and 65535"))?;
        if port == 0 {
            return Err(invalid("port must be a number between 1 and 65535"));
        }

        Ok(HostPort { host: host.to_string(), port })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_host_and_port() {
        let endpoint: HostPort = "jobmanager.local:6123".parse().unwrap();

        assert_eq!(endpoint, HostPort { host: "jobmanager.local".to_string(), port: 6123 });
        assert_eq!(endpoint.to_string(), "jobmanager.local:6123");
    }

    #[test]
    fn test_parse_bracketed_ipv6() {
        let endpoint: HostPort = "[::1]:6123".parse().unwrap();

        assert_eq!(endpoint.host, "::1");
        assert_eq!(endpoint.socket_address(), "[::1]:6123");
    }

    #[test]
    fn test_reject_malformed_endpoints() {
        for input in ["localhost", "localhost:", ":6123", "localhost:port", "localhost:0", "localhost:70000", "::1:6123", "[::1:6123", "local host:6123"] {
            let result = input.parse::<HostPort>();
            assert!(matches!(result, Err(Error::InvalidEndpoint { .. })), "'{}' should be rejected", input);
        }
    }
}
