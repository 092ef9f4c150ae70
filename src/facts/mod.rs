//! OS facts namespace: the frozen root object
//!
//! `OsNs` aggregates every static-fact accessor, the environment
//! namespace under the fixed `env` member, and the exit entry point.
//! Its member set is fixed at construction and never changes; the values
//! its accessors return may vary call-to-call as host state changes.
//! The closed struct with private fields is the prototype-less frozen
//! shape: nothing can be added, removed, or inherited.

use std::rc::Rc;

use crate::bridge::{CpuInfo, HostOps, OpBridge};
use crate::descriptor::{non_enumerable, read_only, Descriptor};
use crate::env::Environ;
use crate::errors::Result;
use crate::lifecycle::{EventDispatcher, LifecycleController};

/// What kind of member a published namespace entry is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberKind {
    /// Nested namespace (`env`)
    Namespace,
    /// Queryable OS fact
    Fact,
    /// Action with side effects (`exit`)
    Action,
    /// Internal embedding hook, hidden from enumeration
    Hook,
}

/// The OS facts namespace root, constructed once at process start
pub struct OsNs {
    bridge: OpBridge,
    env: Environ,
    lifecycle: Rc<LifecycleController>,
}

impl OsNs {
    pub fn new(host: Rc<dyn HostOps>, dispatcher: Rc<dyn EventDispatcher>) -> Self {
        let bridge = OpBridge::new(host.clone());
        let env = Environ::new(bridge.clone());
        let lifecycle = Rc::new(LifecycleController::new(host, dispatcher));
        Self {
            bridge,
            env,
            lifecycle,
        }
    }

    /// The environment namespace under the fixed `env` member
    pub fn env(&self) -> &Environ {
        &self.env
    }

    /// The lifecycle controller governing termination
    pub fn lifecycle(&self) -> &LifecycleController {
        &self.lifecycle
    }

    pub fn arch(&self) -> Result<&'static str> {
        self.bridge.target_arch()
    }

    pub fn platform(&self) -> Result<&'static str> {
        self.bridge.target_os()
    }

    pub fn hostname(&self) -> Result<Option<String>> {
        self.bridge.hostname()
    }

    pub fn version(&self) -> Result<Option<String>> {
        self.bridge.os_version()
    }

    pub fn long_version(&self) -> Result<Option<String>> {
        self.bridge.long_os_version()
    }

    pub fn kernel_version(&self) -> Result<Option<String>> {
        self.bridge.kernel_version()
    }

    pub fn physical_core_count(&self) -> Result<Option<usize>> {
        self.bridge.physical_core_count()
    }

    pub fn pid(&self) -> Result<i64> {
        self.bridge.pid()
    }

    pub fn ppid(&self) -> Result<i64> {
        self.bridge.ppid()
    }

    /// One, five and fifteen minute load averages
    pub fn loadavg(&self) -> Result<(f64, f64, f64)> {
        self.bridge.loadavg()
    }

    /// Aggregate processor descriptor
    pub fn cpu(&self) -> Result<CpuInfo> {
        self.bridge.cpu()
    }

    /// Per-core processor descriptors
    pub fn cpus(&self) -> Result<Vec<CpuInfo>> {
        self.bridge.cpus()
    }

    pub fn total_memory(&self) -> Result<u64> {
        self.bridge.total_memory_kib()
    }

    pub fn free_memory(&self) -> Result<u64> {
        self.bridge.free_memory_kib()
    }

    pub fn available_memory(&self) -> Result<u64> {
        self.bridge.available_memory_kib()
    }

    pub fn used_memory(&self) -> Result<u64> {
        self.bridge.used_memory_kib()
    }

    /// Request process termination; see
    /// [`LifecycleController::exit`] for the protocol.
    pub fn exit(&self, code: i32) {
        self.lifecycle.exit(code)
    }

    /// Install the exit override handler; see
    /// [`LifecycleController::install_exit_handler`].
    pub fn install_exit_handler<F>(&self, handler: F) -> Result<()>
    where
        F: Fn(i32) + 'static,
    {
        self.lifecycle.install_exit_handler(Rc::new(handler))
    }

    /// The script-facing member table with minimum-privilege descriptors.
    ///
    /// Facts and the environment namespace are read-only and enumerable;
    /// the embedding hook is hidden from enumeration. The returned set is
    /// the complete shape: nothing else is ever published.
    pub fn export_shape(&self) -> Vec<(&'static str, Descriptor<MemberKind>)> {
        vec![
            ("env", read_only(MemberKind::Namespace)),
            ("arch", read_only(MemberKind::Fact)),
            ("platform", read_only(MemberKind::Fact)),
            ("hostname", read_only(MemberKind::Fact)),
            ("version", read_only(MemberKind::Fact)),
            ("longVersion", read_only(MemberKind::Fact)),
            ("kernelVersion", read_only(MemberKind::Fact)),
            ("physicalCoreCount", read_only(MemberKind::Fact)),
            ("pid", read_only(MemberKind::Fact)),
            ("ppid", read_only(MemberKind::Fact)),
            ("loadavg", read_only(MemberKind::Fact)),
            ("cpu", read_only(MemberKind::Fact)),
            ("cpus", read_only(MemberKind::Fact)),
            ("totalMemory", read_only(MemberKind::Fact)),
            ("freeMemory", read_only(MemberKind::Fact)),
            ("availableMemory", read_only(MemberKind::Fact)),
            ("usedMemory", read_only(MemberKind::Fact)),
            ("exit", read_only(MemberKind::Action)),
            ("setExitHandler", non_enumerable(MemberKind::Hook)),
        ]
    }
}
