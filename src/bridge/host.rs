//! Production host operations backed by the live process
//!
//! Facts are read from `/proc` and libc the same way the process observes
//! itself: memory counters from `/proc/meminfo` (already in kibibytes),
//! load averages from `/proc/loadavg`, processor descriptors from
//! `/proc/cpuinfo`, and usage percentages from a two-sample delta over
//! `/proc/stat`. Environment access goes through `std::env` after key and
//! value validation.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::env;
use std::fs;

use log::warn;
use nix::unistd;
use serde_json::Value;

use crate::bridge::{CpuInfo, HostOps};
use crate::errors::{OsNsError, Result};

const PROC_MEMINFO: &str = "/proc/meminfo";
const PROC_LOADAVG: &str = "/proc/loadavg";
const PROC_CPUINFO: &str = "/proc/cpuinfo";
const PROC_STAT: &str = "/proc/stat";
const KERNEL_OSRELEASE: &str = "/proc/sys/kernel/osrelease";
const OS_RELEASE: &str = "/etc/os-release";

/// Reject keys the process environment cannot represent
fn check_key(key: &str) -> Result<()> {
    if key.is_empty() || key.contains(['=', '\0']) {
        return Err(OsNsError::InvalidKey(key.to_string()));
    }
    Ok(())
}

/// Reject values the process environment cannot represent
fn check_value(key: &str, value: &str) -> Result<()> {
    if value.contains('\0') {
        return Err(OsNsError::InvalidValue(key.to_string()));
    }
    Ok(())
}

fn read_proc(path: &str) -> Result<String> {
    fs::read_to_string(path)
        .map_err(|e| OsNsError::ProcRead(format!("failed to read {}: {}", path, e)))
}

/// Extract a `kB` counter from /proc/meminfo contents
fn meminfo_field(content: &str, field: &str) -> Option<u64> {
    content
        .lines()
        .find(|line| line.starts_with(field))
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|v| v.parse().ok())
}

/// Parse the three load averages from /proc/loadavg contents
fn parse_loadavg(content: &str) -> Option<(f64, f64, f64)> {
    let mut parts = content.split_whitespace();
    let one = parts.next()?.parse().ok()?;
    let five = parts.next()?.parse().ok()?;
    let fifteen = parts.next()?.parse().ok()?;
    Some((one, five, fifteen))
}

/// One processor block from /proc/cpuinfo
#[derive(Debug, Default, Clone)]
struct CpuinfoBlock {
    index: u32,
    vendor_id: String,
    brand: String,
    mhz: u64,
    physical_id: Option<String>,
    core_id: Option<String>,
}

fn parse_cpuinfo(content: &str) -> Vec<CpuinfoBlock> {
    let mut blocks = Vec::new();
    let mut current: Option<CpuinfoBlock> = None;

    for line in content.lines() {
        if line.trim().is_empty() {
            if let Some(block) = current.take() {
                blocks.push(block);
            }
            continue;
        }
        let Some((field, value)) = line.split_once(':') else {
            continue;
        };
        let field = field.trim();
        let value = value.trim();

        if field == "processor" {
            if let Some(block) = current.take() {
                blocks.push(block);
            }
            current = Some(CpuinfoBlock {
                index: value.parse().unwrap_or(0),
                ..Default::default()
            });
            continue;
        }
        let Some(block) = current.as_mut() else {
            continue;
        };
        match field {
            "vendor_id" => block.vendor_id = value.to_string(),
            "model name" => block.brand = value.to_string(),
            "cpu MHz" => block.mhz = value.parse::<f64>().map(|m| m as u64).unwrap_or(0),
            "physical id" => block.physical_id = Some(value.to_string()),
            "core id" => block.core_id = Some(value.to_string()),
            _ => {}
        }
    }
    if let Some(block) = current.take() {
        blocks.push(block);
    }
    blocks
}

/// Busy and total jiffies for one `cpu*` line of /proc/stat
fn stat_times(content: &str, name: &str) -> Option<(u64, u64)> {
    let line = content
        .lines()
        .find(|l| l.split_whitespace().next() == Some(name))?;
    let fields: Vec<u64> = line
        .split_whitespace()
        .skip(1)
        .filter_map(|v| v.parse().ok())
        .collect();
    if fields.len() < 5 {
        return None;
    }
    let total: u64 = fields.iter().sum();
    // idle + iowait
    let idle = fields[3] + fields.get(4).copied().unwrap_or(0);
    Some((total - idle, total))
}

/// Host operations backed by the live process and `/proc`.
///
/// Keeps the previous `/proc/stat` sample per processor so usage can be
/// reported as a delta; the first query for a processor reports 0.0.
pub struct SystemHost {
    stat_samples: RefCell<HashMap<String, (u64, u64)>>,
}

impl SystemHost {
    pub fn new() -> Self {
        Self {
            stat_samples: RefCell::new(HashMap::new()),
        }
    }

    fn usage_percent(&self, name: &str, busy: u64, total: u64) -> f32 {
        let mut samples = self.stat_samples.borrow_mut();
        let usage = match samples.get(name) {
            Some(&(prev_busy, prev_total)) if total > prev_total => {
                let busy_delta = busy.saturating_sub(prev_busy) as f32;
                let total_delta = (total - prev_total) as f32;
                busy_delta / total_delta * 100.0
            }
            _ => 0.0,
        };
        samples.insert(name.to_string(), (busy, total));
        usage
    }

    fn cpu_info(&self, name: &str, block: &CpuinfoBlock, stat: &str) -> CpuInfo {
        let usage = match stat_times(stat, name) {
            Some((busy, total)) => self.usage_percent(name, busy, total),
            None => {
                warn!("no {} line in {}", name, PROC_STAT);
                0.0
            }
        };
        CpuInfo {
            name: name.to_string(),
            vendor_id: block.vendor_id.clone(),
            brand: block.brand.clone(),
            usage,
            frequency: block.mhz,
        }
    }

    fn meminfo_kib(&self, field: &str) -> Result<u64> {
        let content = read_proc(PROC_MEMINFO)?;
        meminfo_field(&content, field)
            .ok_or_else(|| OsNsError::ProcRead(format!("no {} field in {}", field, PROC_MEMINFO)))
    }
}

impl Default for SystemHost {
    fn default() -> Self {
        Self::new()
    }
}

/// Read one field from /etc/os-release, unquoted
fn os_release_field(field: &str) -> Option<String> {
    let content = fs::read_to_string(OS_RELEASE).ok()?;
    content
        .lines()
        .find_map(|line| line.strip_prefix(field)?.strip_prefix('='))
        .map(|v| v.trim().trim_matches('"').to_string())
}

impl HostOps for SystemHost {
    fn target_arch(&self) -> Result<&'static str> {
        Ok(env::consts::ARCH)
    }

    fn target_os(&self) -> Result<&'static str> {
        Ok(env::consts::OS)
    }

    fn target_env(&self) -> Result<Option<&'static str>> {
        let abi = if cfg!(target_env = "musl") {
            Some("musl")
        } else if cfg!(target_env = "gnu") {
            Some("gnu")
        } else if cfg!(target_env = "msvc") {
            Some("msvc")
        } else {
            None
        };
        Ok(abi)
    }

    fn hostname(&self) -> Result<Option<String>> {
        Ok(unistd::gethostname()
            .ok()
            .and_then(|h| h.into_string().ok()))
    }

    fn os_version(&self) -> Result<Option<String>> {
        Ok(os_release_field("VERSION_ID"))
    }

    fn long_os_version(&self) -> Result<Option<String>> {
        Ok(os_release_field("PRETTY_NAME"))
    }

    fn kernel_version(&self) -> Result<Option<String>> {
        Ok(fs::read_to_string(KERNEL_OSRELEASE)
            .ok()
            .map(|v| v.trim().to_string()))
    }

    fn physical_core_count(&self) -> Result<Option<usize>> {
        let content = read_proc(PROC_CPUINFO)?;
        let blocks = parse_cpuinfo(&content);
        let cores: HashSet<(String, String)> = blocks
            .iter()
            .filter_map(|b| Some((b.physical_id.clone()?, b.core_id.clone()?)))
            .collect();
        if !cores.is_empty() {
            return Ok(Some(cores.len()));
        }
        // Some architectures omit topology ids; fall back to online CPUs
        let online = unsafe { libc::sysconf(libc::_SC_NPROCESSORS_ONLN) };
        Ok((online > 0).then_some(online as usize))
    }

    fn pid(&self) -> Result<i64> {
        Ok(i64::from(unistd::getpid().as_raw()))
    }

    fn ppid(&self) -> Result<i64> {
        Ok(i64::from(unistd::getppid().as_raw()))
    }

    fn loadavg(&self) -> Result<(f64, f64, f64)> {
        let content = read_proc(PROC_LOADAVG)?;
        parse_loadavg(&content)
            .ok_or_else(|| OsNsError::ProcRead(format!("malformed {}", PROC_LOADAVG)))
    }

    fn cpu(&self) -> Result<CpuInfo> {
        let cpuinfo = read_proc(PROC_CPUINFO)?;
        let stat = read_proc(PROC_STAT)?;
        let blocks = parse_cpuinfo(&cpuinfo);
        let first = blocks.first().cloned().unwrap_or_default();
        Ok(self.cpu_info("cpu", &first, &stat))
    }

    fn cpus(&self) -> Result<Vec<CpuInfo>> {
        let cpuinfo = read_proc(PROC_CPUINFO)?;
        let stat = read_proc(PROC_STAT)?;
        Ok(parse_cpuinfo(&cpuinfo)
            .iter()
            .map(|block| self.cpu_info(&format!("cpu{}", block.index), block, &stat))
            .collect())
    }

    fn total_memory_kib(&self) -> Result<u64> {
        self.meminfo_kib("MemTotal:")
    }

    fn free_memory_kib(&self) -> Result<u64> {
        self.meminfo_kib("MemFree:")
    }

    fn available_memory_kib(&self) -> Result<u64> {
        self.meminfo_kib("MemAvailable:")
    }

    fn used_memory_kib(&self) -> Result<u64> {
        let total = self.meminfo_kib("MemTotal:")?;
        let available = self.meminfo_kib("MemAvailable:")?;
        Ok(total.saturating_sub(available))
    }

    fn env_get(&self, key: &str) -> Result<Value> {
        check_key(key)?;
        match env::var(key) {
            Ok(v) => Ok(Value::String(v)),
            Err(env::VarError::NotPresent) => Ok(Value::Null),
            Err(e @ env::VarError::NotUnicode(_)) => Err(OsNsError::HostOp(e.to_string())),
        }
    }

    fn env_set(&self, key: &str, value: &str) -> Result<()> {
        check_key(key)?;
        check_value(key, value)?;
        env::set_var(key, value);
        Ok(())
    }

    fn env_delete(&self, key: &str) -> Result<()> {
        check_key(key)?;
        env::remove_var(key);
        Ok(())
    }

    fn env_has(&self, key: &str) -> Result<bool> {
        check_key(key)?;
        match env::var(key) {
            Ok(_) => Ok(true),
            Err(env::VarError::NotPresent) => Ok(false),
            Err(e @ env::VarError::NotUnicode(_)) => Err(OsNsError::HostOp(e.to_string())),
        }
    }

    fn env_entries(&self) -> Result<Vec<(String, String)>> {
        Ok(env::vars().collect())
    }

    fn env_keys(&self) -> Result<Vec<String>> {
        Ok(env::vars().map(|(k, _)| k).collect())
    }

    fn env_values(&self) -> Result<Vec<String>> {
        Ok(env::vars().map(|(_, v)| v).collect())
    }

    fn env_record(&self) -> Result<HashMap<String, String>> {
        Ok(env::vars().collect())
    }

    fn exit(&self, code: i32) -> ! {
        std::process::exit(code)
    }
}
