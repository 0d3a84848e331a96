use std::io::Write;
use std::thread;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use crossterm::cursor::MoveTo;
use crossterm::execute;
use crossterm::terminal::{Clear, ClearType};

use crate::indicator::Blinker;
use crate::zones::{self, Zone};

pub struct TickOptions {
    pub interval: Duration,
    pub clear_screen: bool,
    /// Stop after this many frames; run forever when `None`.
    pub ticks: Option<u64>,
    pub zones: Vec<Zone>,
}

/// Current wall-clock time as whole seconds since the Unix epoch.
pub fn now_epoch() -> Result<i64> {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .context("system clock is set before 1970")?
        .as_secs();
    i64::try_from(secs).context("system clock is out of range")
}

fn clear_screen<W: Write>(out: &mut W) -> Result<()> {
    execute!(out, Clear(ClearType::All), MoveTo(0, 0))?;
    Ok(())
}

/// Render one frame per tick: clear, print every zone, toggle the LED, sleep.
/// `ticks: Some(0)` renders nothing, and there is no sleep after the final frame.
pub fn run<W: Write>(
    opts: &TickOptions,
    mut clock: impl FnMut() -> Result<i64>,
    blinker: &mut Blinker,
    out: &mut W,
) -> Result<()> {
    let mut frame = 0u64;
    loop {
        if opts.ticks.is_some_and(|limit| frame >= limit) {
            return Ok(());
        }
        if frame > 0 {
            thread::sleep(opts.interval);
        }

        let now = clock()?;
        if opts.clear_screen {
            clear_screen(out)?;
        }
        zones::render_frame(out, now, &opts.zones)?;
        blinker.tick(out)?;
        out.flush()?;
        frame += 1;
        log::trace!("frame {frame} at epoch {now}");
    }
}
