//! The replacement function installed at the hooked address.
//!
//! Everything in this module crosses the foreign calling convention of
//! the intercepted function, so it only exists on the host's actual
//! target (32-bit Windows). The entry point is an observation point,
//! not a replacement: whatever happens during dispatch, every call is
//! forwarded to the original function with its arguments untouched and
//! its result returned unmodified.

use std::ffi::c_void;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::ptr;
use std::sync::{Arc, OnceLock};

use anyhow::{Result, anyhow};
use log::error;

use keybinds_core::{InputFrame, InputInterceptor};

use crate::detour::{DetourInstaller, OriginalSlot, SignatureScanner, install_input_hook};
use crate::host::{FNameRaw, HostMetadata};
use crate::pattern::on_input_event_pattern;

/// Layout of the intercepted function:
/// `(this, edx, controller, key, event, amount_depressed, is_gamepad)`.
pub type OnInputEventFn = unsafe extern "fastcall" fn(
    *mut c_void,
    *mut c_void,
    i32,
    FNameRaw,
    u8,
    f32,
    u32,
) -> *mut c_void;

struct RawHookState {
    interceptor: Arc<InputInterceptor>,
    metadata: Box<dyn HostMetadata>,
    original: OriginalSlot,
}

/// The one process-wide hook state. The extern entry point has no other
/// way to reach the service.
static STATE: OnceLock<RawHookState> = OnceLock::new();

/// Locate the input function, detour it to [`hook_on_input_event`], and
/// capture the original entry. Errors if already installed or if the
/// signature cannot be found.
pub fn install(
    interceptor: Arc<InputInterceptor>,
    metadata: Box<dyn HostMetadata>,
    scanner: &dyn SignatureScanner,
    installer: &dyn DetourInstaller,
) -> Result<()> {
    let state = RawHookState {
        interceptor,
        metadata,
        original: OriginalSlot::new(),
    };
    if STATE.set(state).is_err() {
        return Err(anyhow!("input hook already installed"));
    }
    let state = STATE
        .get()
        .ok_or_else(|| anyhow!("hook state missing after installation"))?;

    let pattern = on_input_event_pattern()?;
    unsafe {
        install_input_hook(
            scanner,
            installer,
            &pattern,
            hook_on_input_event as usize,
            &state.original,
        )?;
    }
    Ok(())
}

/// The detour target. Runs dedup, classification, and dispatch, then
/// forwards to the original function unconditionally.
///
/// # Safety
/// Must only ever be invoked by the host through the installed detour,
/// with the intercepted function's argument layout.
pub unsafe extern "fastcall" fn hook_on_input_event(
    this: *mut c_void,
    edx: *mut c_void,
    controller: i32,
    key: FNameRaw,
    event: u8,
    amount_depressed: f32,
    is_gamepad: u32,
) -> *mut c_void {
    let Some(state) = STATE.get() else {
        // Unreachable once installed; nothing to forward to either.
        return ptr::null_mut();
    };

    // A panic must not unwind across the foreign frame, and it must not
    // stop the original function from running.
    let dispatched = catch_unwind(AssertUnwindSafe(|| {
        let frame = InputFrame {
            controller,
            key: state.metadata.key_name(key),
            event,
            amount_depressed,
            is_gamepad: is_gamepad != 0,
            invoker_class: state.metadata.class_of(this),
        };
        state.interceptor.on_input_event(&frame);
    }));
    if dispatched.is_err() {
        error!("panic during keybind dispatch; input forwarded anyway");
    }

    match state.original.get() {
        Some(addr) => {
            let original: OnInputEventFn = unsafe { std::mem::transmute(addr) };
            unsafe { original(this, edx, controller, key, event, amount_depressed, is_gamepad) }
        }
        None => {
            error!("original input function not captured; dropping intercepted call");
            ptr::null_mut()
        }
    }
}
