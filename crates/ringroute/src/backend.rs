//! Backend handle used by the CLI.
//!
//! The CLI only routes keys; it never opens connections. A [`Backend`] records
//! the address a shard would be reached at so reports and `resolve` output can
//! show it.

use std::fmt;

use ringroute_select::BackendHandle;
use tracing::debug;

/// Address of a backend server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Backend {
    addr: String,
}

impl Backend {
    /// Create a handle for `addr`.
    pub fn new(addr: &str) -> Self {
        Self {
            addr: addr.to_string(),
        }
    }

    /// Backend address (`host:port`).
    pub fn addr(&self) -> &str {
        &self.addr
    }
}

impl BackendHandle for Backend {
    fn close(&self) {
        debug!(addr = %self.addr, "released backend");
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.addr)
    }
}
