//! Maintenance gate
//!
//! Holds the site-wide maintenance flag for the duration of a restore. The
//! flag is set when the gate is entered and cleared when it is released or
//! dropped, so every exit path (including `?` propagation and panics that
//! unwind) leaves the flag off. The gate never undoes data writes.

use std::time::Instant;

use tracing::{error, info, warn};

use crate::error::PressResult;
use crate::storage::Storage;

/// Scoped holder of the maintenance flag
pub struct MaintenanceGate<'a> {
    storage: &'a Storage,
    entered: bool,
    entered_at: Instant,
}

impl<'a> MaintenanceGate<'a> {
    /// Turn the maintenance flag on for every settings row
    pub fn enter(storage: &'a Storage) -> PressResult<Self> {
        match storage.set_maintenance(true) {
            Ok(rows) => {
                info!(rows, "maintenance mode on");
                Ok(Self {
                    storage,
                    entered: true,
                    entered_at: Instant::now(),
                })
            }
            Err(err) => {
                // The in-memory flag may already be set even though saving failed
                if let Err(clear_err) = storage.set_maintenance(false) {
                    error!(error = %clear_err, "failed to clear maintenance flag after failed enter");
                }
                Err(err)
            }
        }
    }

    /// Clear the flag, reporting failure to the caller
    ///
    /// If clearing fails the gate is still held and `Drop` tries once more.
    pub fn release(mut self) -> PressResult<()> {
        self.exit()
    }

    fn exit(&mut self) -> PressResult<()> {
        if !self.entered {
            return Ok(());
        }
        self.storage.set_maintenance(false)?;
        self.entered = false;
        info!(
            elapsed_ms = self.entered_at.elapsed().as_millis() as u64,
            "maintenance mode off"
        );
        Ok(())
    }
}

impl Drop for MaintenanceGate<'_> {
    fn drop(&mut self) {
        if self.entered {
            warn!("releasing maintenance gate on an aborted restore");
            if let Err(err) = self.exit() {
                error!(error = %err, "failed to clear maintenance flag");
            }
        }
    }
}
