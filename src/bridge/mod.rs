//! Operation bridge: typed façade over host-provided synchronous calls
//!
//! Every observation and action in this crate reaches the host through
//! [`HostOps`], one method per fact or action. [`OpBridge`] is the thin
//! façade the namespaces call; it forwards verbatim, adds no retry and no
//! caching, and surfaces host failures unchanged. Its single own behavior
//! is on environment reads: a non-string payload from the host getter is
//! normalized to "absent" instead of being raised as a type error, since
//! "variable not set" and "host returned no string" are the same outcome
//! to the caller.

pub mod host;
pub use host::SystemHost;

use std::collections::HashMap;
use std::rc::Rc;

use serde::Serialize;
use serde_json::Value;

use crate::errors::Result;

/// Descriptor for one processor, aggregate or per-core
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CpuInfo {
    /// Processor name (e.g. "cpu0", or "cpu" for the aggregate)
    pub name: String,
    /// Vendor identifier string
    pub vendor_id: String,
    /// Marketing/model name
    pub brand: String,
    /// Usage percentage since the previous query (0.0 on first query)
    pub usage: f32,
    /// Frequency in MHz
    pub frequency: u64,
}

/// Synchronous host operations backing the namespace.
///
/// All methods are blocking from the caller's perspective; none suspends.
/// Implementations report failures verbatim and perform no retries.
pub trait HostOps {
    // Static facts
    fn target_arch(&self) -> Result<&'static str>;
    fn target_os(&self) -> Result<&'static str>;
    fn target_env(&self) -> Result<Option<&'static str>>;
    fn hostname(&self) -> Result<Option<String>>;
    fn os_version(&self) -> Result<Option<String>>;
    fn long_os_version(&self) -> Result<Option<String>>;
    fn kernel_version(&self) -> Result<Option<String>>;
    fn physical_core_count(&self) -> Result<Option<usize>>;
    fn pid(&self) -> Result<i64>;
    fn ppid(&self) -> Result<i64>;
    fn loadavg(&self) -> Result<(f64, f64, f64)>;
    fn cpu(&self) -> Result<CpuInfo>;
    fn cpus(&self) -> Result<Vec<CpuInfo>>;

    // Memory counters, all in kibibytes
    fn total_memory_kib(&self) -> Result<u64>;
    fn free_memory_kib(&self) -> Result<u64>;
    fn available_memory_kib(&self) -> Result<u64>;
    fn used_memory_kib(&self) -> Result<u64>;

    // Environment accessors; bulk readers are point-in-time snapshots
    fn env_get(&self, key: &str) -> Result<Value>;
    fn env_set(&self, key: &str, value: &str) -> Result<()>;
    fn env_delete(&self, key: &str) -> Result<()>;
    fn env_has(&self, key: &str) -> Result<bool>;
    fn env_entries(&self) -> Result<Vec<(String, String)>>;
    fn env_keys(&self) -> Result<Vec<String>>;
    fn env_values(&self) -> Result<Vec<String>>;
    fn env_record(&self) -> Result<HashMap<String, String>>;

    /// Terminate the process with the given status code. Never returns;
    /// the return type makes any code after a call unreachable.
    fn exit(&self, code: i32) -> !;
}

/// Thin typed façade over a [`HostOps`] implementation
#[derive(Clone)]
pub struct OpBridge {
    host: Rc<dyn HostOps>,
}

impl OpBridge {
    pub fn new(host: Rc<dyn HostOps>) -> Self {
        Self { host }
    }

    pub fn target_arch(&self) -> Result<&'static str> {
        self.host.target_arch()
    }

    pub fn target_os(&self) -> Result<&'static str> {
        self.host.target_os()
    }

    pub fn target_env(&self) -> Result<Option<&'static str>> {
        self.host.target_env()
    }

    pub fn hostname(&self) -> Result<Option<String>> {
        self.host.hostname()
    }

    pub fn os_version(&self) -> Result<Option<String>> {
        self.host.os_version()
    }

    pub fn long_os_version(&self) -> Result<Option<String>> {
        self.host.long_os_version()
    }

    pub fn kernel_version(&self) -> Result<Option<String>> {
        self.host.kernel_version()
    }

    pub fn physical_core_count(&self) -> Result<Option<usize>> {
        self.host.physical_core_count()
    }

    pub fn pid(&self) -> Result<i64> {
        self.host.pid()
    }

    pub fn ppid(&self) -> Result<i64> {
        self.host.ppid()
    }

    pub fn loadavg(&self) -> Result<(f64, f64, f64)> {
        self.host.loadavg()
    }

    pub fn cpu(&self) -> Result<CpuInfo> {
        self.host.cpu()
    }

    pub fn cpus(&self) -> Result<Vec<CpuInfo>> {
        self.host.cpus()
    }

    pub fn total_memory_kib(&self) -> Result<u64> {
        self.host.total_memory_kib()
    }

    pub fn free_memory_kib(&self) -> Result<u64> {
        self.host.free_memory_kib()
    }

    pub fn available_memory_kib(&self) -> Result<u64> {
        self.host.available_memory_kib()
    }

    pub fn used_memory_kib(&self) -> Result<u64> {
        self.host.used_memory_kib()
    }

    /// Read one environment variable.
    ///
    /// A non-string payload from the host is normalized to `None`; "not
    /// set" and "no string returned" are indistinguishable to callers.
    pub fn env_get(&self, key: &str) -> Result<Option<String>> {
        let payload = self.host.env_get(key)?;
        Ok(match payload {
            Value::String(s) => Some(s),
            _ => None,
        })
    }

    pub fn env_set(&self, key: &str, value: &str) -> Result<()> {
        self.host.env_set(key, value)
    }

    pub fn env_delete(&self, key: &str) -> Result<()> {
        self.host.env_delete(key)
    }

    pub fn env_has(&self, key: &str) -> Result<bool> {
        self.host.env_has(key)
    }

    pub fn env_entries(&self) -> Result<Vec<(String, String)>> {
        self.host.env_entries()
    }

    pub fn env_keys(&self) -> Result<Vec<String>> {
        self.host.env_keys()
    }

    pub fn env_values(&self) -> Result<Vec<String>> {
        self.host.env_values()
    }

    pub fn env_record(&self) -> Result<HashMap<String, String>> {
        self.host.env_record()
    }

    /// Terminate the process through the host. Never returns.
    pub fn exit(&self, code: i32) -> ! {
        self.host.exit(code)
    }
}
