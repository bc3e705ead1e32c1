use nix::sys::signal::{self, SaFlags, SigAction, SigHandler, SigSet, Signal};
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::{ErrorKind, Result};

static SIGINT_RECEIVED: AtomicBool = AtomicBool::new(false);

extern "C" fn on_sigint(_: nix::libc::c_int) {
    SIGINT_RECEIVED.store(true, Ordering::SeqCst);
}

/// Records SIGINT instead of terminating right away, so a running renderer
/// is waited for and temporary files are removed before exiting.
pub fn install_handler() -> Result<()> {
    let action = SigAction::new(
        SigHandler::Handler(on_sigint),
        SaFlags::empty(),
        SigSet::empty(),
    );

    // The handler only touches an atomic.
    unsafe { signal::sigaction(Signal::SIGINT, &action) }.map_err(io::Error::from)?;

    Ok(())
}

/// The flag set by the SIGINT handler.
pub fn sigint() -> &'static AtomicBool {
    &SIGINT_RECEIVED
}

/// Fails with [`ErrorKind::Interrupted`] once `flag` is set.
pub fn check(flag: &AtomicBool) -> Result<()> {
    if flag.load(Ordering::SeqCst) {
        Err(ErrorKind::Interrupted.into())
    } else {
        Ok(())
    }
}
