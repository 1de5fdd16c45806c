use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;

use crate::{display::Panel, Error, Result};

/// Install signal handlers that flip the shared running flag instead of
/// exiting inline. The handler does nothing else; all teardown happens on
/// the main loop's own thread of control once it observes the flag.
pub(super) fn create_shutdown_flag() -> Result<Arc<AtomicBool>> {
    let running = Arc::new(AtomicBool::new(true));
    let running_handle = running.clone();

    ctrlc::set_handler(move || {
        running_handle.store(false, Ordering::SeqCst);
    })
    .map_err(|e| Error::Io(std::io::Error::other(e.to_string())))?;

    Ok(running)
}

/// Blank the panel on the way out: clear to black, backlight off.
pub(super) fn shutdown_panel(panel: &mut Panel) -> Result<()> {
    panel.clear(Rgb565::BLACK)?;
    panel.set_backlight(0)?;
    Ok(())
}
