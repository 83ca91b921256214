// src/notify/window.rs

//! Taskbar flashing for the window the user is most likely looking at.
//!
//! On Windows the target is the first visible top-level window whose title
//! contains [`WindowTarget::title_fragment`], falling back to the console
//! window. Other platforms have no portable equivalent, so no window is ever
//! located there and the flash is skipped.

use tracing::debug;

use crate::errors::NotifyError;

/// Title fragment of the editor window flashed by default.
pub const DEFAULT_WINDOW_TITLE: &str = "Visual Studio Code";

/// Number of flashes and the interval between them.
pub const FLASH_COUNT: u32 = 5;
pub const FLASH_INTERVAL_MS: u32 = 500;

/// Opaque native window handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowHandle(pub isize);

pub trait WindowFlasher: Send + Sync {
    fn locate_target_window(&self) -> Option<WindowHandle>;
    fn flash(&self, handle: WindowHandle) -> Result<(), NotifyError>;
}

/// Which window to look for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowTarget {
    pub title_fragment: String,
    /// Flash the console window when no titled window matches.
    pub console_fallback: bool,
}

impl Default for WindowTarget {
    fn default() -> Self {
        Self {
            title_fragment: DEFAULT_WINDOW_TITLE.to_string(),
            console_fallback: true,
        }
    }
}

/// The flasher for the platform we were built for.
#[derive(Debug, Clone, Default)]
pub struct PlatformFlasher {
    target: WindowTarget,
}

impl PlatformFlasher {
    pub fn new(target: WindowTarget) -> Self {
        Self { target }
    }
}

#[cfg(windows)]
impl WindowFlasher for PlatformFlasher {
    fn locate_target_window(&self) -> Option<WindowHandle> {
        if let Some(hwnd) = win::find_visible_window(&self.target.title_fragment) {
            return Some(WindowHandle(hwnd));
        }
        if !self.target.console_fallback {
            debug!(fragment = %self.target.title_fragment, "no matching window");
            return None;
        }
        win::console_window().map(WindowHandle)
    }

    fn flash(&self, handle: WindowHandle) -> Result<(), NotifyError> {
        win::flash(handle.0, FLASH_COUNT, FLASH_INTERVAL_MS);
        Ok(())
    }
}

#[cfg(not(windows))]
impl WindowFlasher for PlatformFlasher {
    fn locate_target_window(&self) -> Option<WindowHandle> {
        debug!(
            fragment = %self.target.title_fragment,
            "window flashing is only available on Windows"
        );
        None
    }

    fn flash(&self, _handle: WindowHandle) -> Result<(), NotifyError> {
        Err(NotifyError::WindowFlash(
            "window flashing is only available on Windows".to_string(),
        ))
    }
}

#[cfg(windows)]
mod win {
    use windows_sys::Win32::Foundation::{BOOL, HWND, LPARAM};
    use windows_sys::Win32::System::Console::GetConsoleWindow;
    use windows_sys::Win32::UI::WindowsAndMessaging::{
        EnumWindows, FlashWindowEx, GetWindowTextW, IsWindowVisible, FLASHWINFO, FLASHW_ALL,
    };

    struct Search<'a> {
        fragment: &'a str,
        found: Option<HWND>,
    }

    unsafe extern "system" fn visit(hwnd: HWND, lparam: LPARAM) -> BOOL {
        // SAFETY: lparam is the &mut Search passed to EnumWindows below.
        let search = unsafe { &mut *(lparam as *mut Search<'_>) };
        let mut buf = [0u16; 512];
        let len = unsafe { GetWindowTextW(hwnd, buf.as_mut_ptr(), buf.len() as i32) };
        if len <= 0 || unsafe { IsWindowVisible(hwnd) } == 0 {
            return 1;
        }
        let title = String::from_utf16_lossy(&buf[..len as usize]);
        if title.contains(search.fragment) {
            search.found = Some(hwnd);
            return 0; // stop enumerating
        }
        1
    }

    pub fn find_visible_window(fragment: &str) -> Option<isize> {
        let mut search = Search {
            fragment,
            found: None,
        };
        // EnumWindows reports failure when the callback stops early; ignore.
        unsafe {
            EnumWindows(Some(visit), &mut search as *mut Search<'_> as LPARAM);
        }
        search.found
    }

    pub fn console_window() -> Option<isize> {
        let hwnd = unsafe { GetConsoleWindow() };
        (hwnd != 0).then_some(hwnd)
    }

    pub fn flash(hwnd: isize, count: u32, interval_ms: u32) {
        let info = FLASHWINFO {
            cbSize: std::mem::size_of::<FLASHWINFO>() as u32,
            hwnd,
            dwFlags: FLASHW_ALL,
            uCount: count,
            dwTimeout: interval_ms,
        };
        // The return value is the previous highlight state, not a status.
        unsafe {
            FlashWindowEx(&info);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_target_is_the_editor_with_console_fallback() {
        let target = WindowTarget::default();
        assert_eq!(target.title_fragment, "Visual Studio Code");
        assert!(target.console_fallback);
    }

    #[cfg(not(windows))]
    #[test]
    fn no_window_is_located_off_windows() {
        let flasher = PlatformFlasher::new(WindowTarget::default());
        assert_eq!(flasher.locate_target_window(), None);
        assert!(matches!(
            flasher.flash(WindowHandle(1)),
            Err(NotifyError::WindowFlash(_))
        ));
    }
}
