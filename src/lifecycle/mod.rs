//! Process lifecycle controller
//!
//! Owns the exit protocol: an "unload" notification is dispatched exactly
//! once before termination, an optional override handler can take over
//! what termination means (for embedding and test harnesses), and the
//! terminal host exit runs only when no override is installed.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use log::debug;

use crate::bridge::HostOps;
use crate::errors::{OsNsError, Result};

/// Event name announced to collaborators before termination
pub const UNLOAD_EVENT: &str = "unload";

/// Synchronous event dispatch consumed by the controller.
///
/// `dispatch` must invoke every registered listener before returning;
/// the controller relies on that ordering for its pre-exit guarantee.
pub trait EventDispatcher {
    fn dispatch(&self, event: &str);
}

/// Lifecycle states; `Terminating` is terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Running,
    Terminating,
}

/// Controller for orderly process termination.
///
/// Single-threaded by contract: interior state uses `Cell`/`RefCell`
/// and the controller is shared via `Rc`.
pub struct LifecycleController {
    host: Rc<dyn HostOps>,
    dispatcher: Rc<dyn EventDispatcher>,
    state: Cell<LifecycleState>,
    unload_dispatched: Cell<bool>,
    exit_override: RefCell<Option<Rc<dyn Fn(i32)>>>,
}

impl LifecycleController {
    pub fn new(host: Rc<dyn HostOps>, dispatcher: Rc<dyn EventDispatcher>) -> Self {
        Self {
            host,
            dispatcher,
            state: Cell::new(LifecycleState::Running),
            unload_dispatched: Cell::new(false),
            exit_override: RefCell::new(None),
        }
    }

    pub fn state(&self) -> LifecycleState {
        self.state.get()
    }

    /// Install the override handler that replaces the terminal host exit.
    ///
    /// The slot holds at most one handler for the life of the process;
    /// a second installation is rejected.
    pub fn install_exit_handler(&self, handler: Rc<dyn Fn(i32)>) -> Result<()> {
        let mut slot = self.exit_override.borrow_mut();
        if slot.is_some() {
            return Err(OsNsError::HandlerInstalled);
        }
        *slot = Some(handler);
        Ok(())
    }

    /// Request process termination with the given status code.
    ///
    /// In strict order: dispatch the unload notification if it has not
    /// fired yet for this process (listeners finish synchronously before
    /// anything else happens); then, if an override handler is installed,
    /// invoke it and return to the caller; otherwise call the terminal
    /// host exit, which never returns.
    pub fn exit(&self, code: i32) {
        self.state.set(LifecycleState::Terminating);

        // Latch before dispatching so re-entrant exit requests from
        // unload listeners cannot re-trigger the notification.
        if !self.unload_dispatched.replace(true) {
            debug!("dispatching {} before termination", UNLOAD_EVENT);
            self.dispatcher.dispatch(UNLOAD_EVENT);
        }

        let handler = self.exit_override.borrow().clone();
        if let Some(handler) = handler {
            debug!("exit({}) taken over by installed handler", code);
            handler(code);
            return;
        }

        debug!("terminating process with status {}", code);
        self.host.exit(code)
    }
}
