//! X11 implementation using XRecord and XTest.

mod inject;
mod listen;

pub use inject::Injector;
pub use listen::{run_hook, stop_hook};
