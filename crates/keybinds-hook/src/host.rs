/// Host metadata lookups consumed at the hook boundary.
///
/// The engine passes keys as name-table references and identifies the
/// invoking object by a raw pointer; turning either into the core's
/// owned value types needs engine metadata the SDK owns. Both lookups
/// sit behind one trait so the raw entry point stays a thin crossing.
use std::ffi::c_void;

use keybinds_core::{ClassId, KeyName};

/// An engine name-table reference: index into the global name table
/// plus an instance number (`Key_2` style suffixes).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(C)]
pub struct FNameRaw {
    pub index: i32,
    pub number: i32,
}

/// Metadata services the host SDK provides to the hook.
pub trait HostMetadata: Send + Sync {
    /// Resolve a name-table reference to an owned key identity.
    fn key_name(&self, name: FNameRaw) -> KeyName;

    /// Runtime class identity of an engine object.
    fn class_of(&self, obj: *const c_void) -> ClassId;
}
