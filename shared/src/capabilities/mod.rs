mod backend;
mod files;
mod navigate;
mod network;
mod push;
mod timer;

pub use self::backend::{
    Backend, BackendError, BackendOperation, BackendOutput, BackendResult, DeleteOutcome,
};
pub use self::files::{FileCache, FileCacheOperation, FileCacheOutput};
pub use self::navigate::{Navigator, NavigatorOperation};
pub use self::network::{Reachability, ReachabilityOperation, ReachabilityStatus};
pub use self::push::{PermissionState, Push, PushError, PushOperation, PushOutput, PushResult};
pub use self::timer::{Timer, TimerOperation};

pub use crux_core::render::Render;
pub use crux_kv::KeyValue;

use crate::app::App;
use crate::event::Event;

/// Everything the core can ask the shell to do.
#[derive(crux_core::macros::Effect)]
pub struct Capabilities {
    pub render: Render<Event>,
    pub key_value: KeyValue<Event>,
    pub backend: Backend<Event>,
    pub reachability: Reachability<Event>,
    pub navigator: Navigator<Event>,
    pub timer: Timer<Event>,
    pub push: Push<Event>,
    pub file_cache: FileCache<Event>,
}
