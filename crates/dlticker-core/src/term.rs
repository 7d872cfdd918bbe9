//! Terminal echo control while the ticker owns the screen.
//!
//! Keystrokes echoed into the live frame would corrupt the cursor math, so
//! echo is turned off for the length of a scroll session.

use std::io::IsTerminal;

/// Enable or disable echo of standard input. Does nothing when stdin is not a
/// terminal; failures are reported as diagnostics only.
pub fn set_stdin_echo(enabled: bool) {
    if !std::io::stdin().is_terminal() {
        return;
    }
    match imp::set_echo(enabled) {
        Ok(()) => tracing::debug!(enabled, "stdin echo changed"),
        Err(e) => tracing::debug!(enabled, error = %e, "stdin echo change failed"),
    }
}

#[cfg(unix)]
mod imp {
    use std::io;

    pub(super) fn set_echo(enabled: bool) -> io::Result<()> {
        let fd = libc::STDIN_FILENO;
        // SAFETY: termios is plain data; tcgetattr fills it before we read it.
        let mut attrs: libc::termios = unsafe { std::mem::zeroed() };
        if unsafe { libc::tcgetattr(fd, &mut attrs) } != 0 {
            return Err(io::Error::last_os_error());
        }
        let action = if enabled {
            attrs.c_lflag |= libc::ECHO;
            libc::TCSAFLUSH
        } else {
            attrs.c_lflag &= !libc::ECHO;
            libc::TCSADRAIN
        };
        if unsafe { libc::tcsetattr(fd, action, &attrs) } != 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }
}

#[cfg(not(unix))]
mod imp {
    pub(super) fn set_echo(_enabled: bool) -> std::io::Result<()> {
        Ok(())
    }
}
