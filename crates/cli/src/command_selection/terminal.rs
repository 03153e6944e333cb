use std::io::{stdout, Stdout};
use std::time::{Duration, Instant};

use crossterm::cursor::Show;
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::terminal::{
    self, disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen,
    LeaveAlternateScreen,
};
use crossterm::{queue, ExecutableCommand};
use devtunnel_tui_core::error::Result;
use devtunnel_tui_core::execution::{Executor, RunMessage};
use log::debug;
use tokio::sync::mpsc::UnboundedReceiver;

use super::state::App;
use super::types::{Action, AppEvent};
use super::ui::{draw, render, Frame};

struct RawModeGuard;

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        // Restore the terminal on every exit path, panics included
        let _ = disable_raw_mode();
        let mut stdout = stdout();
        let _ = stdout.execute(Show);
        let _ = stdout.execute(LeaveAlternateScreen);
    }
}

/// Reads the next terminal event, waiting at most `timeout`.
fn next_terminal_event(timeout: Duration) -> Result<Option<AppEvent>> {
    if !event::poll(timeout)? {
        return Ok(None);
    }

    Ok(match event::read()? {
        Event::Key(key) if key.kind == KeyEventKind::Press => Some(AppEvent::Key(key)),
        Event::Resize(width, height) => Some(AppEvent::Resize(width, height)),
        _ => None,
    })
}

fn redraw(stdout: &mut Stdout, frame: &Frame, previous: Option<&Frame>) -> Result<()> {
    let resized = match previous {
        Some(previous) => {
            previous.width() != frame.width() || previous.height() != frame.height()
        }
        None => true,
    };
    if resized {
        queue!(stdout, Clear(ClearType::All))?;
    }
    draw(stdout, frame)
}

/// Runs the interface until the user quits.
///
/// Run messages are drained from `receiver` on every iteration, so results
/// from the background runner are applied on this thread only.
pub fn run_app<E: Executor>(
    app: &mut App<E>,
    receiver: &mut UnboundedReceiver<RunMessage>,
    tick: Duration,
) -> Result<()> {
    let mut stdout = stdout();

    stdout.execute(EnterAlternateScreen)?;
    enable_raw_mode()?;
    let _raw_mode_guard = RawModeGuard; // Leaving scope restores the terminal

    let (width, height) = terminal::size()?;
    app.update(AppEvent::Resize(width, height));

    let mut last_frame: Option<Frame> = None;
    let mut last_tick = Instant::now();

    loop {
        while let Ok(message) = receiver.try_recv() {
            debug!("Run message: {message:?}");
            app.update(AppEvent::Run(message));
        }

        let frame = render(app);
        if last_frame.as_ref() != Some(&frame) {
            redraw(&mut stdout, &frame, last_frame.as_ref())?;
            last_frame = Some(frame);
        }

        let timeout = tick.saturating_sub(last_tick.elapsed());
        if let Some(event) = next_terminal_event(timeout)? {
            if app.update(event) == Action::Quit {
                break;
            }
        }

        if last_tick.elapsed() >= tick {
            app.update(AppEvent::Tick);
            last_tick = Instant::now();
        }
    }

    Ok(())
}
