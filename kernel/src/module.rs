//! Driver module lifecycle.

use crate::error::{KernelError, KernelResult};
use crate::system::System;

/// Descriptive module metadata.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ModuleInfo {
    pub name: &'static str,
    pub author: &'static str,
    pub description: &'static str,
    pub version: &'static str,
    pub license: &'static str,
}

/// A loadable driver.
///
/// `init` either returns a fully set up module or fails having released
/// everything it acquired. `exit` runs exactly once per successful `init`.
pub trait Module: Sized + Send + 'static {
    const INFO: ModuleInfo;

    fn init(sys: &'static System) -> KernelResult<Self>;

    fn exit(self);
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ModuleState {
    Unloaded,
    Active,
}

/// Holds at most one live instance of `M`.
pub struct ModuleSlot<M> {
    inner: spin::Mutex<Option<M>>,
}

impl<M> Default for ModuleSlot<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> ModuleSlot<M> {
    pub const fn new() -> Self {
        Self {
            inner: spin::Mutex::new(None),
        }
    }
}

impl<M: Module> ModuleSlot<M> {
    pub fn try_load(&self, sys: &'static System) -> KernelResult<()> {
        let mut slot = self.inner.lock();
        if slot.is_some() {
            log::warn!("{}: already loaded", M::INFO.name);
            return Err(KernelError::AlreadyLoaded);
        }

        log::info!(
            "{}: loading {} ({}, {})",
            M::INFO.name,
            M::INFO.version,
            M::INFO.description,
            M::INFO.license
        );
        *slot = Some(M::init(sys)?);
        Ok(())
    }

    /// Load the module. Returns 0 or a negative errno.
    pub fn load(&self, sys: &'static System) -> i32 {
        match self.try_load(sys) {
            Ok(()) => 0,
            Err(err) => {
                log::error!("{}: init failed: {} ({})", M::INFO.name, err, err.errno());
                err.errno()
            }
        }
    }

    /// Run the module's exit routine if it is loaded.
    pub fn unload(&self) {
        // Exit runs outside the slot lock.
        let module = self.inner.lock().take();

        match module {
            Some(module) => {
                module.exit();
                log::info!("{}: unloaded", M::INFO.name);
            }
            None => log::warn!("{}: not loaded, nothing to unload", M::INFO.name),
        }
    }

    pub fn state(&self) -> ModuleState {
        if self.inner.lock().is_some() {
            ModuleState::Active
        } else {
            ModuleState::Unloaded
        }
    }

    /// Inspect the live instance.
    pub fn with<R>(&self, f: impl FnOnce(&M) -> R) -> Option<R> {
        self.inner.lock().as_ref().map(f)
    }
}
