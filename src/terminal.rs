// Copyright (c) 2026 rezky_nightky

use std::io::{stdout, Result, Stdout, Write};

use crossterm::{
    cursor, event,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
    terminal, ExecutableCommand, QueueableCommand,
};

use crate::frame::Surface;

/// ANSI surface over any writer: `ESC[1;1H` per frame, `ESC[38;5;Nm` before
/// every glyph, a bare space for blanks.
pub struct AnsiSurface<W: Write> {
    out: W,
}

impl<W: Write> AnsiSurface<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Surface for AnsiSurface<W> {
    fn reset_cursor(&mut self) -> Result<()> {
        self.out.queue(cursor::MoveTo(0, 0))?;
        Ok(())
    }

    fn write_glyph(&mut self, ch: char, colour: u8) -> Result<()> {
        self.out.queue(SetForegroundColor(Color::AnsiValue(colour)))?;
        self.out.queue(Print(ch))?;
        Ok(())
    }

    fn write_blank(&mut self) -> Result<()> {
        self.out.queue(Print(' '))?;
        Ok(())
    }

    fn end_row(&mut self) -> Result<()> {
        self.out.queue(cursor::MoveToNextLine(1))?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.out.flush()
    }
}

/// Raw-mode alternate screen on stdout. Restores the terminal on drop.
pub struct Terminal {
    surface: AnsiSurface<Stdout>,
}

impl Terminal {
    pub fn new() -> Result<Self> {
        let mut out = stdout();
        terminal::enable_raw_mode()?;
        let init_res: Result<()> = (|| {
            out.execute(terminal::EnterAlternateScreen)?;
            out.execute(cursor::Hide)?;
            let _ = out.execute(terminal::DisableLineWrap);
            out.execute(SetAttribute(Attribute::Reset))?;
            out.execute(ResetColor)?;
            out.execute(terminal::Clear(terminal::ClearType::All))?;
            out.flush()?;
            Ok(())
        })();
        if let Err(e) = init_res {
            restore_terminal_best_effort();
            return Err(e);
        }
        Ok(Self {
            surface: AnsiSurface::new(out),
        })
    }

    pub fn size() -> Result<(u16, u16)> {
        terminal::size()
    }

    pub fn poll_event(timeout: std::time::Duration) -> Result<bool> {
        event::poll(timeout)
    }

    pub fn read_event() -> Result<event::Event> {
        event::read()
    }

    pub fn clear(&mut self) -> Result<()> {
        self.surface
            .out
            .queue(terminal::Clear(terminal::ClearType::All))?;
        Ok(())
    }
}

impl Surface for Terminal {
    fn reset_cursor(&mut self) -> Result<()> {
        self.surface.reset_cursor()
    }

    fn write_glyph(&mut self, ch: char, colour: u8) -> Result<()> {
        self.surface.write_glyph(ch, colour)
    }

    fn write_blank(&mut self) -> Result<()> {
        self.surface.write_blank()
    }

    fn end_row(&mut self) -> Result<()> {
        self.surface.end_row()
    }

    fn flush(&mut self) -> Result<()> {
        self.surface.out.queue(ResetColor)?;
        self.surface.flush()
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        restore_terminal_best_effort();
    }
}

pub fn restore_terminal_best_effort() {
    let mut out = stdout();
    let _ = out.execute(SetAttribute(Attribute::Reset));
    let _ = out.execute(ResetColor);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::EnableLineWrap);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
    let _ = out.flush();
}
