// Keybind interception engine: event dedup, gameplay-context
// classification, subscription registry, and dispatch. The raw detour
// boundary lives in keybinds-hook.

pub mod context;
pub mod dedup;
pub mod dispatch;
pub mod event;
pub mod interceptor;
pub mod key;
pub mod poll;
pub mod registry;

pub use context::{ClassId, ClassResolver, ContextClassifier, GAMEPLAY_INPUT_CLASS, InputContext};
pub use dedup::DedupFilter;
pub use dispatch::{Dispatcher, NullGate, RuntimeGate};
pub use event::{InputEvent, MAX_EVENT};
pub use interceptor::{InputFrame, InputInterceptor};
pub use key::{BindTarget, KeyName};
pub use poll::PressedKeysDiff;
pub use registry::{
    BindHandle, CallShape, DispatchFlow, KeybindArgs, KeybindCallback, KeybindEntry,
    KeybindRegistry,
};
