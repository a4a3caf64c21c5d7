//! Terminal host: crossterm event pump, keyboard snapshots and frame pacing
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute, queue, style, terminal,
};
use std::io::{self, stdout, Stdout, Write};
use std::time::{Duration, Instant};

use pipe3d_core::{Canvas, Color, FillMode, Key, KeyboardState, Platform, SceneConfig};

use crate::renderer::AsciiRenderer;

/// Text is laid out on a font grid of this many pixels per cell.
pub const TEXT_CELL_WIDTH: i32 = 8;
pub const TEXT_CELL_HEIGHT: i32 = 16;

/// Map a terminal key to the logical key it drives
pub fn map_key(code: KeyCode) -> Option<Key> {
    match code {
        KeyCode::Char('w') | KeyCode::Char('W') | KeyCode::Up => Some(Key::Forward),
        KeyCode::Char('s') | KeyCode::Char('S') | KeyCode::Down => Some(Key::Backward),
        KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Left => Some(Key::Left),
        KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Right => Some(Key::Right),
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => Some(Key::Exit),
        _ => None,
    }
}

fn to_term_color(color: Color) -> style::Color {
    style::Color::Rgb {
        r: color.r(),
        g: color.g(),
        b: color.b(),
    }
}

/// Frames-per-second counter, reported through the log once a second
struct FpsCounter {
    last: Instant,
    frames: u32,
}

impl FpsCounter {
    fn new() -> Self {
        Self {
            last: Instant::now(),
            frames: 0,
        }
    }

    fn tick(&mut self) {
        self.frames += 1;
        let now = Instant::now();
        let elapsed = now - self.last;
        if elapsed.as_secs() >= 1 {
            let fps = self.frames as f32 / elapsed.as_secs_f32();
            log::debug!("fps: {fps:.1}");
            self.frames = 0;
            self.last = now;
        }
    }
}

/// [`Platform`] implementation drawing into a terminal through crossterm.
///
/// Geometry arrives in the configured virtual pixel space and is scaled to
/// the terminal's cell grid; text is placed on a fixed font grid.
///
/// Terminals report presses and auto-repeats but rarely releases, so a key
/// counts as held only for the frame whose event pump saw its press or repeat.
pub struct TerminalPlatform<W: Write = Stdout> {
    out: W,
    renderer: AsciiRenderer,
    virtual_size: (f32, f32),
    pending: KeyboardState,
    close_requested: bool,
    frame_budget: Duration,
    frame_start: Instant,
    fps: FpsCounter,
    raw_mode: bool,
}

impl TerminalPlatform<Stdout> {
    /// Enter raw mode and the alternate screen on stdout.
    pub fn initialize(config: &SceneConfig) -> io::Result<Self> {
        let (cols, rows) = terminal::size()?;
        let mut platform = Self::with_writer(stdout(), cols, rows, config);

        terminal::enable_raw_mode()?;
        platform.raw_mode = true;
        execute!(platform.out, terminal::EnterAlternateScreen, cursor::Hide)?;

        log::debug!("terminal initialized at {cols}x{rows} cells");
        Ok(platform)
    }
}

impl<W: Write> TerminalPlatform<W> {
    /// Platform writing to `out` with a `cols` x `rows` cell grid, without
    /// touching the terminal mode.
    pub fn with_writer(out: W, cols: u16, rows: u16, config: &SceneConfig) -> Self {
        let frame_budget = match config.target_fps {
            0 => Duration::ZERO,
            fps => Duration::from_secs_f64(1.0 / fps as f64),
        };
        Self {
            out,
            renderer: AsciiRenderer::new(cols as usize, rows as usize),
            virtual_size: (config.window_width as f32, config.window_height as f32),
            pending: KeyboardState::new(),
            close_requested: false,
            frame_budget,
            frame_start: Instant::now(),
            fps: FpsCounter::new(),
            raw_mode: false,
        }
    }

    pub fn renderer(&self) -> &AsciiRenderer {
        &self.renderer
    }

    pub fn writer(&self) -> &W {
        &self.out
    }

    /// Mark `key` pressed for the frame that next reads the keyboard
    pub fn press(&mut self, key: Key) {
        self.pending.set(key, true);
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(KeyEvent {
                code: KeyCode::Char('c'),
                modifiers,
                ..
            }) if modifiers.contains(KeyModifiers::CONTROL) => {
                log::debug!("ctrl-c received");
                self.close_requested = true;
            }
            Event::Key(KeyEvent { code, kind, .. }) if kind != KeyEventKind::Release => {
                if let Some(key) = map_key(code) {
                    self.press(key);
                }
            }
            Event::Resize(cols, rows) => {
                log::debug!("terminal resized to {cols}x{rows}");
                self.renderer.resize(cols as usize, rows as usize);
            }
            _ => {}
        }
    }

    fn to_cells(&self, (x, y): (i32, i32)) -> (f32, f32) {
        let (vw, vh) = self.virtual_size;
        (
            x as f32 * self.renderer.width() as f32 / vw,
            y as f32 * self.renderer.height() as f32 / vh,
        )
    }

    fn restore(&mut self) -> io::Result<()> {
        if self.raw_mode {
            self.raw_mode = false;
            terminal::disable_raw_mode()?;
            execute!(self.out, terminal::LeaveAlternateScreen, cursor::Show)?;
            log::debug!("terminal restored");
        }
        Ok(())
    }
}

impl<W: Write> Canvas for TerminalPlatform<W> {
    fn draw_triangle(
        &mut self,
        p0: (i32, i32),
        p1: (i32, i32),
        p2: (i32, i32),
        color: Color,
        fill: FillMode,
    ) {
        let coords = [self.to_cells(p0), self.to_cells(p1), self.to_cells(p2)];
        let color = to_term_color(color);
        match fill {
            FillMode::Solid => self.renderer.fill_triangle(coords, color),
            FillMode::WireFrame => self.renderer.stroke_triangle(coords, color),
        }
    }

    fn print(&mut self, x: i32, y: i32, text: &str) {
        self.renderer.put_text(
            x.div_euclid(TEXT_CELL_WIDTH),
            y.div_euclid(TEXT_CELL_HEIGHT),
            text,
        );
    }
}

impl<W: Write> Platform for TerminalPlatform<W> {
    type Error = io::Error;

    fn process_message(&mut self) -> io::Result<bool> {
        while event::poll(Duration::ZERO)? {
            let event = event::read()?;
            self.handle_event(event);
        }
        Ok(self.close_requested)
    }

    fn begin_frame(&mut self) -> io::Result<()> {
        self.frame_start = Instant::now();
        self.renderer.clear();
        Ok(())
    }

    fn keyboard(&mut self) -> KeyboardState {
        std::mem::take(&mut self.pending)
    }

    fn end_frame(&mut self) -> io::Result<()> {
        queue!(self.out, cursor::MoveTo(0, 0))?;
        self.renderer.draw(&mut self.out)?;
        self.out.flush()?;

        let elapsed = self.frame_start.elapsed();
        if elapsed < self.frame_budget {
            std::thread::sleep(self.frame_budget - elapsed);
        }
        self.fps.tick();
        Ok(())
    }

    fn finalize(&mut self) -> io::Result<()> {
        self.restore()
    }
}

impl<W: Write> Drop for TerminalPlatform<W> {
    fn drop(&mut self) {
        if let Err(err) = self.restore() {
            log::error!("failed to restore terminal: {err}");
        }
    }
}
