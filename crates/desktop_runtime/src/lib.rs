//! Desktop runtime core: the window model and manager, interactive window geometry, and the
//! file-system boot routine used by the shell.

pub mod frame;
pub mod host;
pub mod model;
pub mod window_manager;

pub use frame::WindowFrame;
pub use host::{boot_browser_file_system, boot_file_system, BootError};
pub use model::*;
pub use window_manager::{clamp_position, clamp_size, layer_number, maximized_rect, WindowManager};
