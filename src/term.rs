//! Best-effort terminal geometry discovery.
//!
//! Probes a chain of platform mechanisms in priority order and falls back to
//! a hardcoded default. Every probe failure is silent: a redirected or
//! headless output target must never break the caller.

use tracing::debug;

/// Geometry reported when every probe fails.
const FALLBACK: (u16, u16) = (78, 25);

type Probe = fn() -> Option<(u16, u16)>;

/// Query the terminal size as `(columns, rows)`.
///
/// Never fails. Probes, in order: a `TIOCGWINSZ` ioctl against the stdin,
/// stdout, and stderr descriptors; crossterm's portable size query; the
/// controlling terminal device; the `COLUMNS`/`LINES` environment variables;
/// and finally `(78, 25)`.
pub fn terminal_size() -> (u16, u16) {
    resolve(&[
        ("ioctl", fd_probe),
        ("crossterm", crossterm_probe),
        ("controlling tty", ctty_probe),
        ("environment", env_probe),
    ])
}

/// Take the first size an ordered probe chain produces.
fn resolve(probes: &[(&str, Probe)]) -> (u16, u16) {
    for (source, probe) in probes {
        if let Some((cols, rows)) = probe() {
            debug!(source, cols, rows, "terminal size");
            return (cols, rows);
        }
    }
    debug!("terminal size from defaults");
    FALLBACK
}

/// Window-size ioctl against the three standard descriptors.
#[cfg(unix)]
fn fd_probe() -> Option<(u16, u16)> {
    use libc::{STDERR_FILENO, STDIN_FILENO, STDOUT_FILENO};

    [STDIN_FILENO, STDOUT_FILENO, STDERR_FILENO]
        .into_iter()
        .find_map(winsize_of)
}

/// Raw `TIOCGWINSZ` for a single descriptor. The kernel reports rows-major;
/// the public contract is `(columns, rows)`.
#[cfg(unix)]
fn winsize_of(fd: std::os::raw::c_int) -> Option<(u16, u16)> {
    use libc::{TIOCGWINSZ, ioctl, winsize};

    let mut ws: winsize = unsafe { std::mem::zeroed() };
    let rc = unsafe { ioctl(fd, TIOCGWINSZ, &mut ws) };
    if rc == 0 && ws.ws_col > 0 {
        Some((ws.ws_col, ws.ws_row))
    } else {
        None
    }
}

/// Reopen the controlling terminal and repeat the ioctl, for when all three
/// standard descriptors are redirected.
#[cfg(unix)]
fn ctty_probe() -> Option<(u16, u16)> {
    use std::os::fd::AsRawFd;

    let tty = std::fs::File::open("/dev/tty").ok()?;
    winsize_of(tty.as_raw_fd())
}

#[cfg(not(unix))]
fn fd_probe() -> Option<(u16, u16)> {
    None
}

#[cfg(not(unix))]
fn ctty_probe() -> Option<(u16, u16)> {
    None
}

fn crossterm_probe() -> Option<(u16, u16)> {
    crossterm::terminal::size()
        .ok()
        .filter(|&(cols, _)| cols > 0)
}

fn env_probe() -> Option<(u16, u16)> {
    let cols = std::env::var("COLUMNS").ok()?.parse().ok()?;
    let rows = std::env::var("LINES").ok()?.parse().ok()?;
    Some((cols, rows))
}
