// Detour boundary for the keybind interception engine: signature
// descriptors, scanner/installer collaborator seams, and the raw
// replacement function for the hooked input call.

pub mod detour;
pub mod host;
pub mod pattern;
#[cfg(all(target_os = "windows", target_arch = "x86"))]
pub mod raw;

pub use detour::{DetourInstaller, OriginalSlot, SignatureScanner, install_input_hook};
pub use host::{FNameRaw, HostMetadata};
pub use pattern::{ON_INPUT_EVENT_SIG, Pattern, on_input_event_pattern};
