use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use ratatui::widgets::canvas::{Canvas, Line as CanvasLine};
use std::io::{self, stdout};
use std::time::Duration;

use super::{Surface, SurfaceEvent};
use crate::color::ColorScheme;
use crate::config::DisplayConfig;
use crate::engine::{FrameOutput, Segment};

/// Live preview of the wallpaper in the terminal.
pub struct TerminalSurface {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    color_scheme: ColorScheme,
    width: f64,
    height: f64,
    show_clock: bool,
    restored: bool,
}

impl TerminalSurface {
    pub fn new(config: &DisplayConfig) -> Result<Self> {
        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = stdout();
        execute!(stdout, EnterAlternateScreen)?;

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;

        Ok(Self {
            terminal,
            color_scheme: config.color_scheme,
            width: config.width.max(1) as f64,
            height: config.height.max(1) as f64,
            show_clock: config.show_clock,
            restored: false,
        })
    }

    pub fn restore(&mut self) -> Result<()> {
        if self.restored {
            return Ok(());
        }
        self.restored = true;

        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        Ok(())
    }

    fn draw(&mut self, output: &FrameOutput) -> Result<()> {
        let (width, height) = (self.width, self.height);
        let scheme = self.color_scheme;
        let clock = self.show_clock.then(|| output.clock.clone());
        let status = status_text(output);

        self.terminal.draw(|frame| {
            let area = frame.area();
            let [status_area, canvas_area] =
                Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(area);

            let count = output.segments.len().max(1) as f32;
            let canvas = Canvas::default()
                .marker(symbols::Marker::Braille)
                .background_color(glow_background(scheme, output.glow_opacity))
                .x_bounds([0.0, width])
                .y_bounds([0.0, height])
                .paint(|ctx| {
                    for (i, segment) in output.segments.iter().enumerate() {
                        if !segment.visible {
                            continue;
                        }
                        let (x1, y1, x2, y2) = to_canvas(segment, height);
                        let (r, g, b) = scheme.bar_color(i as f32 / count, output.glow_opacity);
                        ctx.draw(&CanvasLine::new(x1, y1, x2, y2, Color::Rgb(r, g, b)));
                    }
                });
            frame.render_widget(canvas, canvas_area);

            frame.render_widget(
                ratatui::text::Line::from(status).style(Style::default().fg(Color::DarkGray)),
                status_area,
            );
            if let Some(clock) = clock {
                frame.render_widget(
                    ratatui::text::Line::from(clock)
                        .alignment(Alignment::Right)
                        .style(Style::default().fg(Color::White).bold()),
                    status_area,
                );
            }
        })?;
        Ok(())
    }
}

impl Surface for TerminalSurface {
    fn present(&mut self, output: &FrameOutput) -> Result<SurfaceEvent> {
        self.draw(output)?;

        // The tick loop owns the pacing; only drain what is already queued
        let mut outcome = SurfaceEvent::Continue;
        while event::poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                match key_action(key) {
                    SurfaceEvent::Continue => {}
                    SurfaceEvent::Quit => return Ok(SurfaceEvent::Quit),
                    SurfaceEvent::NextMode => outcome = SurfaceEvent::NextMode,
                }
            }
        }
        Ok(outcome)
    }
}

impl Drop for TerminalSurface {
    fn drop(&mut self) {
        let _ = self.restore();
    }
}

fn key_action(key: KeyEvent) -> SurfaceEvent {
    if key.kind != KeyEventKind::Press {
        return SurfaceEvent::Continue;
    }
    match key {
        KeyEvent {
            code: KeyCode::Char('q'),
            ..
        }
        | KeyEvent {
            code: KeyCode::Esc, ..
        }
        | KeyEvent {
            code: KeyCode::Char('c'),
            modifiers: KeyModifiers::CONTROL,
            ..
        } => SurfaceEvent::Quit,
        KeyEvent {
            code: KeyCode::Char('m'),
            ..
        } => SurfaceEvent::NextMode,
        _ => SurfaceEvent::Continue,
    }
}

/// Display space has y growing downwards, the canvas has it growing up.
fn to_canvas(segment: &Segment, height: f64) -> (f64, f64, f64, f64) {
    (
        segment.x1,
        height - segment.y1,
        segment.x2,
        height - segment.y2,
    )
}

fn glow_background(scheme: ColorScheme, opacity: f32) -> Color {
    // Keep the halo dim so the bars stay readable
    let (r, g, b) = scheme.glow_color(opacity * 0.25);
    Color::Rgb(r, g, b)
}

fn status_text(output: &FrameOutput) -> String {
    format!(
        " {} | glow {:.2} blur {:.1} | rot {:5.1}° | drift {:+.0},{:+.0} | [m]ode [q]uit ",
        output.mode,
        output.glow_opacity,
        output.blur_radius,
        output.rotation_deg,
        output.drift_offset.0,
        output.drift_offset.1,
    )
}
