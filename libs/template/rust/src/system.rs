//! Blocking and scheduling helpers.

use std::ffi::c_int;
use std::io::Write;
use std::thread;
use std::time::Duration;

#[cfg(windows)]
#[link(name = "kernel32")]
extern "system" {
    #[link_name = "Beep"]
    fn win32_beep(frequency: u32, duration: u32) -> i32;
}

/// Negative durations count as zero.
fn millis(ms: c_int) -> Duration {
    Duration::from_millis(u64::try_from(ms).unwrap_or(0))
}

/// Sound a tone of `frequency` Hz for `duration` ms.
///
/// Returns `true` only when the platform tone API played it. Elsewhere a BEL
/// is written to stdout and the call blocks for `duration` ms instead.
pub extern "C" fn beep(frequency: c_int, duration: c_int) -> bool {
    if let Some(played) = tone(frequency, duration) {
        return played;
    }
    let mut stdout = std::io::stdout().lock();
    let _ = stdout.write_all(b"\x07");
    let _ = stdout.flush();
    drop(stdout);
    thread::sleep(millis(duration));
    false
}

/// Play a tone with the platform API; `None` when there is none.
#[cfg(windows)]
fn tone(frequency: c_int, duration: c_int) -> Option<bool> {
    let (Ok(frequency), Ok(duration)) = (u32::try_from(frequency), u32::try_from(duration.max(0))) else {
        return Some(false);
    };
    // SAFETY: Beep takes plain integers and has no pointer arguments.
    Some(unsafe { win32_beep(frequency, duration) } != 0)
}

#[cfg(not(windows))]
fn tone(_frequency: c_int, _duration: c_int) -> Option<bool> {
    None
}

/// Block the calling thread for `ms` milliseconds.
pub extern "C" fn plugin_sleep(ms: c_int) -> bool {
    thread::sleep(millis(ms));
    true
}

/// Give up the rest of this thread's time slice.
///
/// Only a hint: a host with a single native thread gets control back at once.
pub extern "C" fn do_events() -> bool {
    thread::yield_now();
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn test_sleep_blocks_at_least_requested() {
        let start = Instant::now();
        assert!(plugin_sleep(30));
        assert!(start.elapsed() >= Duration::from_millis(30));
    }

    #[test]
    fn test_sleep_zero_and_negative() {
        assert!(plugin_sleep(0));
        assert!(plugin_sleep(-5));
    }

    #[test]
    fn test_millis_clamps_negative() {
        assert_eq!(millis(-1), Duration::ZERO);
        assert_eq!(millis(250), Duration::from_millis(250));
    }

    #[test]
    fn test_do_events_returns() {
        assert!(do_events());
    }

    #[cfg(not(windows))]
    #[test]
    fn test_beep_falls_back_and_blocks() {
        let start = Instant::now();
        assert!(!beep(440, 20));
        assert!(start.elapsed() >= Duration::from_millis(20));
    }
}
