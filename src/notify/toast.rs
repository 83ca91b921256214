// src/notify/toast.rs

//! Desktop toast notifications via `notify-rust`.

use std::path::PathBuf;

use notify_rust::{Notification, Timeout};
use tracing::debug;

use crate::errors::NotifyError;
use crate::exec::RunResult;

/// Application name shown by the notification daemon.
pub const APP_NAME: &str = "termwatch";

/// The platform's stock notification sound.
#[cfg(all(unix, not(target_os = "macos")))]
pub const TOAST_SOUND: &str = "message-new-instant";
#[cfg(not(all(unix, not(target_os = "macos"))))]
pub const TOAST_SOUND: &str = "Default";

/// Content of one toast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub title: String,
    pub body: String,
    pub success: bool,
}

impl Toast {
    pub fn for_result(result: &RunResult) -> Self {
        let title = if result.success {
            "✅ Completed"
        } else {
            "❌ Failed"
        };
        Self {
            title: title.to_string(),
            body: format!(
                "{}\nFinished in {:.2} seconds.",
                result.description,
                result.duration_secs()
            ),
            success: result.success,
        }
    }
}

pub trait Toaster: Send + Sync {
    fn show(&self, toast: &Toast) -> Result<(), NotifyError>;
}

/// Native notifications (libnotify/D-Bus, macOS, WinRT).
#[derive(Debug, Clone, Default)]
pub struct NativeToaster {
    pub success_icon: Option<PathBuf>,
    pub failure_icon: Option<PathBuf>,
}

impl NativeToaster {
    /// Icon for this toast, if one was configured and exists on disk.
    fn icon_for(&self, toast: &Toast) -> Option<String> {
        let icon = if toast.success {
            self.success_icon.as_ref()
        } else {
            self.failure_icon.as_ref()
        }?;
        icon.exists().then(|| icon.display().to_string())
    }
}

impl Toaster for NativeToaster {
    fn show(&self, toast: &Toast) -> Result<(), NotifyError> {
        let mut notification = Notification::new();
        notification
            .appname(APP_NAME)
            .summary(&toast.title)
            .body(&toast.body)
            .sound_name(TOAST_SOUND)
            .timeout(Timeout::Milliseconds(5000));
        if let Some(icon) = self.icon_for(toast) {
            notification.icon(&icon);
        }

        notification
            .show()
            .map(|_| ())
            .map_err(|e| NotifyError::Toast(e.to_string()))?;
        debug!(title = %toast.title, "toast shown");
        Ok(())
    }
}
