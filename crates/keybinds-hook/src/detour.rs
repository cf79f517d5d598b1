/// Detour installation against external collaborators.
///
/// The actual memory scanning and trampoline writing belong to the
/// host SDK; this module drives them: resolve the signature to an
/// address, redirect it to our replacement, and capture the original
/// entry point exactly once.
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::{Context, Result, anyhow, bail};
use log::{error, info};

use crate::pattern::Pattern;

/// Resolves a byte pattern to a stable address in the running process.
pub trait SignatureScanner: Send + Sync {
    fn locate(&self, pattern: &Pattern) -> Option<usize>;
}

/// Redirects calls from `target` to `replacement` and returns a callable
/// address for the original code.
pub trait DetourInstaller: Send + Sync {
    /// # Safety
    /// `target` must be the entry of the function the pattern resolves
    /// to and `replacement` must match its calling convention exactly.
    unsafe fn detour(&self, target: usize, replacement: usize) -> Result<usize>;
}

/// Write-once cell for the original function's entry point.
///
/// The address is stored during installation, before any dispatch can
/// occur, and is never replaced: every hook entry forwards through it
/// for the remainder of the process.
#[derive(Debug)]
pub struct OriginalSlot(AtomicUsize);

impl OriginalSlot {
    pub const fn new() -> Self {
        Self(AtomicUsize::new(0))
    }

    pub fn store_once(&self, addr: usize) -> Result<()> {
        if addr == 0 {
            bail!("refusing to store a null original function pointer");
        }
        self.0
            .compare_exchange(0, addr, Ordering::SeqCst, Ordering::SeqCst)
            .map_err(|held| anyhow!("original function already captured at {held:#x}"))?;
        Ok(())
    }

    pub fn get(&self) -> Option<usize> {
        match self.0.load(Ordering::SeqCst) {
            0 => None,
            addr => Some(addr),
        }
    }
}

impl Default for OriginalSlot {
    fn default() -> Self {
        Self::new()
    }
}

/// Locate the hooked function, install the detour, and capture the
/// original entry in `slot`. Returns the original entry address.
///
/// A locate failure is fatal for the interception feature and is
/// logged loudly: a silent failure here would mean input events are
/// simply never observed.
///
/// # Safety
/// `replacement` must be a function with the intercepted function's
/// exact calling convention and argument layout.
pub unsafe fn install_input_hook(
    scanner: &dyn SignatureScanner,
    installer: &dyn DetourInstaller,
    pattern: &Pattern,
    replacement: usize,
    slot: &OriginalSlot,
) -> Result<usize> {
    let target = scanner.locate(pattern).ok_or_else(|| {
        error!("input event signature not found; keybind interception is unavailable");
        anyhow!("input event signature ({} bytes) not found", pattern.len())
    })?;

    let original = unsafe { installer.detour(target, replacement) }
        .with_context(|| format!("failed to detour input function at {target:#x}"))?;
    slot.store_once(original)?;
    info!("input hook installed at {target:#x}, original at {original:#x}");
    Ok(original)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedScanner(Option<usize>);
    impl SignatureScanner for FixedScanner {
        fn locate(&self, _pattern: &Pattern) -> Option<usize> {
            self.0
        }
    }

    struct FixedInstaller(Result<usize, &'static str>);
    impl DetourInstaller for FixedInstaller {
        unsafe fn detour(&self, _target: usize, _replacement: usize) -> Result<usize> {
            self.0.map_err(|msg| anyhow!(msg))
        }
    }

    fn pattern() -> Pattern {
        Pattern::parse("83 EC 1C").unwrap()
    }

    #[test]
    fn store_once_accepts_first_address() {
        let slot = OriginalSlot::new();
        assert!(slot.get().is_none());
        slot.store_once(0x1234).unwrap();
        assert_eq!(slot.get(), Some(0x1234));
    }

    #[test]
    fn store_once_rejects_second_address() {
        let slot = OriginalSlot::new();
        slot.store_once(0x1234).unwrap();
        let err = slot.store_once(0x5678).unwrap_err();
        assert!(err.to_string().contains("already captured"));
        assert_eq!(slot.get(), Some(0x1234));
    }

    #[test]
    fn store_once_rejects_null() {
        let slot = OriginalSlot::new();
        assert!(slot.store_once(0).is_err());
        assert!(slot.get().is_none());
    }

    #[test]
    fn install_captures_original() {
        let slot = OriginalSlot::new();
        let original = unsafe {
            install_input_hook(
                &FixedScanner(Some(0x4000)),
                &FixedInstaller(Ok(0x4005)),
                &pattern(),
                0x9000,
                &slot,
            )
        }
        .unwrap();
        assert_eq!(original, 0x4005);
        assert_eq!(slot.get(), Some(0x4005));
    }

    #[test]
    fn locate_failure_is_an_error() {
        let slot = OriginalSlot::new();
        let err = unsafe {
            install_input_hook(
                &FixedScanner(None),
                &FixedInstaller(Ok(0x4005)),
                &pattern(),
                0x9000,
                &slot,
            )
        }
        .unwrap_err();
        assert!(err.to_string().contains("not found"));
        assert!(slot.get().is_none());
    }

    #[test]
    fn installer_failure_propagates() {
        let slot = OriginalSlot::new();
        let err = unsafe {
            install_input_hook(
                &FixedScanner(Some(0x4000)),
                &FixedInstaller(Err("page not writable")),
                &pattern(),
                0x9000,
                &slot,
            )
        }
        .unwrap_err();
        assert!(format!("{err:#}").contains("page not writable"));
        assert!(slot.get().is_none());
    }
}
