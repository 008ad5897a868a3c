//! Server startup and runtime errors.

use std::io;
use std::net::SocketAddr;

use thiserror::Error;

pub type ServerResult<T> = std::result::Result<T, ServerError>;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid server configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to bind to {address}: {source}")]
    BindError {
        address: SocketAddr,
        #[source]
        source: io::Error,
    },

    #[error("server runtime error: {0}")]
    Runtime(#[source] io::Error),

    #[error("TLS certificate error: {0}")]
    #[cfg_attr(not(feature = "tls"), allow(dead_code))]
    TlsCertificate(String),
}

impl ServerError {
    pub fn invalid_config(err: &anyhow::Error) -> Self {
        Self::InvalidConfig(format!("{err:#}"))
    }

    pub fn bind(address: SocketAddr, source: io::Error) -> Self {
        Self::BindError { address, source }
    }

    /// Stable code for logs and support requests.
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidConfig(_) => "E001",
            Self::BindError { .. } => "E002",
            Self::Runtime(_) => "E003",
            Self::TlsCertificate(_) => "E004",
        }
    }

    /// A hint for the operator, when one applies.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::InvalidConfig(_) => Some("check the command-line arguments and environment"),
            Self::BindError { source, .. } => match source.kind() {
                io::ErrorKind::PermissionDenied => {
                    Some("use a port above 1024 or run with the required privileges")
                }
                io::ErrorKind::AddrInUse => {
                    Some("the port is in use; pick another one or stop the other service")
                }
                io::ErrorKind::AddrNotAvailable => {
                    Some("the address is not available on this host")
                }
                _ => None,
            },
            Self::Runtime(_) => None,
            Self::TlsCertificate(_) => Some("check that the certificate and key are PEM files"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::net::{Ipv4Addr, SocketAddrV4};

    use super::*;

    fn addr() -> SocketAddr {
        SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::LOCALHOST, 3000))
    }

    #[test]
    fn bind_errors_explain_port_conflicts() {
        let err = ServerError::bind(addr(), io::Error::new(io::ErrorKind::AddrInUse, "in use"));
        assert!(err.to_string().contains("127.0.0.1:3000"));
        assert!(err.suggestion().is_some_and(|hint| hint.contains("port")));
    }

    #[test]
    fn error_codes_are_distinct() {
        let codes = [
            ServerError::InvalidConfig(String::new()).error_code(),
            ServerError::bind(addr(), io::Error::other("bind")).error_code(),
            ServerError::Runtime(io::Error::other("runtime")).error_code(),
            ServerError::TlsCertificate(String::new()).error_code(),
        ];

        for (i, code) in codes.iter().enumerate() {
            assert!(!codes[i + 1..].contains(code), "{code} is reused");
        }
    }

    #[test]
    fn runtime_errors_have_no_hint() {
        let err = ServerError::Runtime(io::Error::other("boom"));
        assert!(err.suggestion().is_none());
    }

    #[test]
    fn invalid_config_keeps_the_context_chain() {
        let source = anyhow::anyhow!("port 80 is below 1024").context("invalid server configuration");
        let err = ServerError::invalid_config(&source);
        assert!(err.to_string().contains("port 80"));
    }
}
