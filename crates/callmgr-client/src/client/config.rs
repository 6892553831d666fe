//! Client configuration
//!
//! [`ClientConfig`] names the daemon a session talks to and bounds how long
//! a request may wait for its reply. The defaults address the platform
//! call-manager daemon, so most applications never change them.
//!
//! # Usage Examples
//!
//! ```rust
//! use callmgr_client::ClientConfig;
//! use std::time::Duration;
//!
//! let config = ClientConfig::new().with_method_timeout(Duration::from_secs(2));
//!
//! assert_eq!(config.service, "org.tizen.callmgr");
//! assert_eq!(config.method_timeout(), Duration::from_secs(2));
//! assert!(config.validate().is_ok());
//! ```
//!
//! Configurations can also be loaded from any serde format; missing fields
//! take their defaults.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{CallManagerError, ClientResult};
use crate::protocol;

/// Connection settings for a client session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Well-known bus name of the daemon
    pub service: String,
    /// Object path methods are called on and signals are emitted from
    pub object_path: String,
    /// Interface of methods and signals
    pub interface: String,
    /// How long a request waits for its reply, in milliseconds
    pub method_timeout_ms: u64,
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_service(mut self, service: impl Into<String>) -> Self {
        self.service = service.into();
        self
    }

    pub fn with_object_path(mut self, object_path: impl Into<String>) -> Self {
        self.object_path = object_path.into();
        self
    }

    pub fn with_interface(mut self, interface: impl Into<String>) -> Self {
        self.interface = interface.into();
        self
    }

    pub fn with_method_timeout(mut self, timeout: Duration) -> Self {
        self.method_timeout_ms = timeout.as_millis() as u64;
        self
    }

    pub fn method_timeout(&self) -> Duration {
        Duration::from_millis(self.method_timeout_ms)
    }

    /// Check the configuration before a session is opened with it
    pub fn validate(&self) -> ClientResult<()> {
        if self.service.is_empty() {
            return Err(CallManagerError::invalid_parameter("service name is empty"));
        }
        if !self.object_path.starts_with('/') {
            return Err(CallManagerError::invalid_parameter(format!(
                "object path {:?} is not absolute",
                self.object_path
            )));
        }
        if self.interface.is_empty() {
            return Err(CallManagerError::invalid_parameter("interface name is empty"));
        }
        if self.method_timeout_ms == 0 {
            return Err(CallManagerError::invalid_parameter("method timeout must be non-zero"));
        }
        Ok(())
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            service: protocol::SERVICE.to_string(),
            object_path: protocol::OBJECT_PATH.to_string(),
            interface: protocol::INTERFACE.to_string(),
            method_timeout_ms: protocol::DEFAULT_METHOD_TIMEOUT.as_millis() as u64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_address_the_daemon() {
        let config = ClientConfig::default();
        assert_eq!(config.service, "org.tizen.callmgr");
        assert_eq!(config.object_path, "/org/tizen/callmgr");
        assert_eq!(config.interface, "org.tizen.callmgr");
        assert_eq!(config.method_timeout(), Duration::from_millis(5000));
    }

    #[test]
    fn test_partial_json_takes_defaults() {
        let config: ClientConfig = serde_json::from_str(r#"{"method_timeout_ms": 250}"#).unwrap();
        assert_eq!(config.method_timeout_ms, 250);
        assert_eq!(config.service, protocol::SERVICE);
    }

    #[test]
    fn test_validation() {
        assert!(ClientConfig::new().with_service("").validate().is_err());
        assert!(ClientConfig::new().with_object_path("relative").validate().is_err());
        assert!(ClientConfig::new().with_interface("").validate().is_err());
        assert!(ClientConfig::new().with_method_timeout(Duration::ZERO).validate().is_err());
    }
}
