// src/notify/mod.rs

//! Alerting the user once a run is over.
//!
//! The supervisor only knows the [`Notifier`] trait. Everything behind it is
//! best-effort: the supervisor catches errors (and panics) from `notify` and
//! downgrades them to warnings, so a broken desktop session can never change
//! the exit code.
//!
//! - [`DesktopNotifier`] is the production implementation: a toast from a
//!   [`Toaster`] followed by a taskbar flash from a [`WindowFlasher`].
//! - [`SilentNotifier`] is used for `--no-notify`.

use tracing::{debug, warn};

use crate::errors::NotifyError;
use crate::exec::RunResult;

pub mod toast;
pub mod window;

pub use toast::{NativeToaster, Toast, Toaster};
pub use window::{PlatformFlasher, WindowFlasher, WindowHandle, WindowTarget};

/// Something that tells the user a run finished.
pub trait Notifier: Send + Sync {
    fn notify(&self, result: &RunResult) -> Result<(), NotifyError>;
}

/// Notifier that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentNotifier;

impl Notifier for SilentNotifier {
    fn notify(&self, result: &RunResult) -> Result<(), NotifyError> {
        debug!(success = result.success, "notifications disabled");
        Ok(())
    }
}

/// Toast plus window flash.
pub struct DesktopNotifier {
    toaster: Box<dyn Toaster>,
    flasher: Box<dyn WindowFlasher>,
}

impl DesktopNotifier {
    pub fn new(toaster: Box<dyn Toaster>, flasher: Box<dyn WindowFlasher>) -> Self {
        Self { toaster, flasher }
    }

    fn flash_target(&self) -> Result<(), NotifyError> {
        match self.flasher.locate_target_window() {
            Some(handle) => {
                debug!(?handle, "flashing target window");
                self.flasher.flash(handle)
            }
            None => {
                debug!("no window to flash");
                Ok(())
            }
        }
    }
}

impl Notifier for DesktopNotifier {
    /// Shows the toast, then flashes the window even if the toast failed.
    fn notify(&self, result: &RunResult) -> Result<(), NotifyError> {
        let toast = self.toaster.show(&Toast::for_result(result));
        if let Err(err) = &toast {
            warn!(error = %err, "toast failed; still flashing window");
        }
        self.flash_target()?;
        toast
    }
}
