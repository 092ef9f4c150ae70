//! Shared test doubles: scripted host and recording dispatcher

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

use serde_json::Value;

use crate::bridge::{CpuInfo, HostOps};
use crate::errors::{OsNsError, Result};
use crate::lifecycle::EventDispatcher;

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Serialize tests that touch the real process environment
pub fn serial_guard() -> MutexGuard<'static, ()> {
    ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner())
}

/// In-memory host with a scripted variable store.
///
/// `raw_payloads` entries win over `vars` on reads, so tests can script
/// non-string payloads from the environment getter. `exit` panics with a
/// recognizable message; tests observe the unwind to prove the terminal
/// path was reached and nothing after it ran.
#[derive(Default)]
pub struct MockHost {
    pub vars: RefCell<BTreeMap<String, String>>,
    pub raw_payloads: RefCell<HashMap<String, Value>>,
    pub fail_ops: RefCell<bool>,
}

impl MockHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_vars(pairs: &[(&str, &str)]) -> Self {
        let host = Self::default();
        for (k, v) in pairs {
            host.vars
                .borrow_mut()
                .insert((*k).to_string(), (*v).to_string());
        }
        host
    }

    fn check_fail(&self) -> Result<()> {
        if *self.fail_ops.borrow() {
            return Err(OsNsError::HostOp("scripted failure".to_string()));
        }
        Ok(())
    }
}

pub const EXIT_PANIC: &str = "host exit invoked";

impl HostOps for MockHost {
    fn target_arch(&self) -> Result<&'static str> {
        Ok("x86_64")
    }

    fn target_os(&self) -> Result<&'static str> {
        Ok("linux")
    }

    fn target_env(&self) -> Result<Option<&'static str>> {
        Ok(Some("gnu"))
    }

    fn hostname(&self) -> Result<Option<String>> {
        Ok(Some("mockhost".to_string()))
    }

    fn os_version(&self) -> Result<Option<String>> {
        Ok(Some("24.04".to_string()))
    }

    fn long_os_version(&self) -> Result<Option<String>> {
        Ok(Some("Mock Linux 24.04".to_string()))
    }

    fn kernel_version(&self) -> Result<Option<String>> {
        Ok(Some("6.8.0-mock".to_string()))
    }

    fn physical_core_count(&self) -> Result<Option<usize>> {
        Ok(Some(4))
    }

    fn pid(&self) -> Result<i64> {
        Ok(4242)
    }

    fn ppid(&self) -> Result<i64> {
        Ok(4241)
    }

    fn loadavg(&self) -> Result<(f64, f64, f64)> {
        Ok((0.5, 0.25, 0.1))
    }

    fn cpu(&self) -> Result<CpuInfo> {
        Ok(CpuInfo {
            name: "cpu".to_string(),
            vendor_id: "MockVendor".to_string(),
            brand: "Mock CPU".to_string(),
            usage: 0.0,
            frequency: 2400,
        })
    }

    fn cpus(&self) -> Result<Vec<CpuInfo>> {
        Ok((0..4)
            .map(|i| CpuInfo {
                name: format!("cpu{}", i),
                vendor_id: "MockVendor".to_string(),
                brand: "Mock CPU".to_string(),
                usage: 0.0,
                frequency: 2400,
            })
            .collect())
    }

    fn total_memory_kib(&self) -> Result<u64> {
        Ok(16_000_000)
    }

    fn free_memory_kib(&self) -> Result<u64> {
        Ok(8_000_000)
    }

    fn available_memory_kib(&self) -> Result<u64> {
        Ok(12_000_000)
    }

    fn used_memory_kib(&self) -> Result<u64> {
        Ok(4_000_000)
    }

    fn env_get(&self, key: &str) -> Result<Value> {
        self.check_fail()?;
        if let Some(payload) = self.raw_payloads.borrow().get(key) {
            return Ok(payload.clone());
        }
        Ok(self
            .vars
            .borrow()
            .get(key)
            .map(|v| Value::String(v.clone()))
            .unwrap_or(Value::Null))
    }

    fn env_set(&self, key: &str, value: &str) -> Result<()> {
        self.check_fail()?;
        self.vars
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn env_delete(&self, key: &str) -> Result<()> {
        self.check_fail()?;
        self.vars.borrow_mut().remove(key);
        Ok(())
    }

    fn env_has(&self, key: &str) -> Result<bool> {
        self.check_fail()?;
        Ok(self.vars.borrow().contains_key(key))
    }

    fn env_entries(&self) -> Result<Vec<(String, String)>> {
        self.check_fail()?;
        Ok(self
            .vars
            .borrow()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }

    fn env_keys(&self) -> Result<Vec<String>> {
        self.check_fail()?;
        Ok(self.vars.borrow().keys().cloned().collect())
    }

    fn env_values(&self) -> Result<Vec<String>> {
        self.check_fail()?;
        Ok(self.vars.borrow().values().cloned().collect())
    }

    fn env_record(&self) -> Result<HashMap<String, String>> {
        self.check_fail()?;
        Ok(self
            .vars
            .borrow()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }

    fn exit(&self, code: i32) -> ! {
        panic!("{} with status {}", EXIT_PANIC, code)
    }
}

/// Dispatcher that records every dispatched event name
#[derive(Default)]
pub struct RecordingDispatcher {
    pub events: RefCell<Vec<String>>,
}

impl RecordingDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, event: &str) -> usize {
        self.events.borrow().iter().filter(|e| *e == event).count()
    }
}

impl EventDispatcher for RecordingDispatcher {
    fn dispatch(&self, event: &str) {
        self.events.borrow_mut().push(event.to_string());
    }
}
