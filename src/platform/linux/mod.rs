//! Linux platform implementation.
//!
//! Input is captured with the X11 RECORD extension and replayed with XTEST.
//! Both work under Xorg and XWayland, so a Wayland session needs the target
//! windows to be X clients.

mod keycodes;
mod x11;

pub use x11::*;
