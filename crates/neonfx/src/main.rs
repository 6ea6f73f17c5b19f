use std::{
    io::stdout,
    path::PathBuf,
    time::{Duration, Instant},
};

use clap::Parser;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseEvent, MouseEventKind,
    },
    execute,
};
use neonfx_config::Config;
use neonfx_core::Backdrop;
use neonfx_effects::{BackdropState, GlitchKind, GlitchPulses, ScreenDistortion};
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Constraint, Layout, Rect},
    style::Stylize,
    text::Line,
};
use rand::{Rng, SeedableRng, rngs::StdRng, seq::IndexedRandom};

mod logging;
mod page;

use page::Page;

/// A neon terminal portfolio page.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Load this config file instead of the default one
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for the random effects (random if omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Write the default config to the config directory and exit
    #[arg(long)]
    write_config: bool,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    logging::init()?;

    if args.write_config {
        let path = Config::default().save()?;
        println!("wrote {}", path.display());
        return Ok(());
    }

    let config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let terminal = ratatui::init();
    let result = execute!(stdout(), EnableMouseCapture)
        .map_err(color_eyre::Report::from)
        .and_then(|()| App::new(config, rng).run(terminal));
    let restored = execute!(stdout(), DisableMouseCapture);
    ratatui::restore();
    result?;
    restored?;
    Ok(())
}

/// The main application which holds the state and logic of the application.
#[derive(Debug)]
pub struct App {
    /// Is the application running?
    running: bool,
    config: Config,
    backdrop: Backdrop,
    background: BackdropState,
    page: Page,
    pulses: GlitchPulses,
    distortion: ScreenDistortion,
    rng: StdRng,
    /// Time origin for all effects.
    started: Instant,
    /// Area the page was last drawn into.
    viewport: Rect,
}

impl App {
    /// Construct a new instance of [`App`].
    pub fn new(config: Config, rng: StdRng) -> Self {
        let page = Page::new(&config);
        Self {
            running: false,
            backdrop: config.display.backdrop,
            background: BackdropState::new(&config),
            pulses: GlitchPulses::new(&config.glitch, page.title_count()),
            distortion: ScreenDistortion::new(&config.glitch),
            page,
            rng,
            started: Instant::now(),
            viewport: Rect::default(),
            config,
        }
    }

    fn elapsed_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }

    /// Run the application's main loop.
    pub fn run(mut self, mut terminal: DefaultTerminal) -> color_eyre::Result<()> {
        self.running = true;
        let now = self.elapsed_ms();
        self.background.start(now);
        self.pulses.start(now);
        self.distortion.start(now);
        if self.config.display.static_on_start {
            self.background.noise_mut().start(now);
        }
        log::info!("starting with {} backdrop", self.backdrop.name());

        let frame_time = Duration::from_millis(1000 / u64::from(self.config.display.fps.max(1)));
        while self.running {
            terminal.draw(|frame| self.render(frame))?;
            self.handle_crossterm_events(frame_time)?;
        }
        Ok(())
    }

    /// Renders the user interface.
    fn render(&mut self, frame: &mut Frame) {
        let now = self.elapsed_ms();
        let area = frame.area();
        let [body, help_area] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(area);
        self.viewport = body;

        self.page.observe(body, now);
        self.page.tick(now, &mut self.rng);
        self.pulses.tick(now, &mut self.rng);
        self.distortion.tick(now, &mut self.rng);

        let cell = self.background.cell_size();
        let buf = frame.buffer_mut();
        self.background.render(buf, area, self.backdrop, now, &mut self.rng);
        self.page.render(buf, body, now, &self.pulses, cell);

        let accent = self.config.display.accent.color();
        let help = Line::from(vec![
            "q".bold().fg(accent),
            " quit  ".dark_gray(),
            "b".bold().fg(accent),
            format!(" backdrop: {}  ", self.backdrop.name()).dark_gray(),
            "s".bold().fg(accent),
            " static  ".dark_gray(),
            "g".bold().fg(accent),
            " glitch  ".dark_gray(),
            "d".bold().fg(accent),
            " distort  ".dark_gray(),
            "r".bold().fg(accent),
            " replay".dark_gray(),
        ])
        .centered();
        frame.render_widget(help, help_area);

        self.distortion.apply(frame.buffer_mut(), area, now);
    }

    /// Reads the crossterm events and updates the state of [`App`].
    /// Polls with the frame time as timeout so animations keep running.
    fn handle_crossterm_events(&mut self, timeout: Duration) -> color_eyre::Result<()> {
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => self.on_key_event(key),
                Event::Mouse(mouse) => self.on_mouse_event(mouse),
                Event::FocusLost => self.background.clear_pointer(),
                _ => {}
            }
        }
        Ok(())
    }

    /// Handles the key events and updates the state of [`App`].
    fn on_key_event(&mut self, key: KeyEvent) {
        let now = self.elapsed_ms();
        match (key.modifiers, key.code) {
            (_, KeyCode::Esc | KeyCode::Char('q'))
            | (KeyModifiers::CONTROL, KeyCode::Char('c') | KeyCode::Char('C')) => self.quit(),
            (_, KeyCode::Char('b')) => self.cycle_backdrop(),
            (_, KeyCode::Char('s')) => self.background.noise_mut().toggle(now),
            (_, KeyCode::Char('g')) => self.glitch_random_title(now),
            (_, KeyCode::Char('d')) => self.distortion.trigger(now),
            (_, KeyCode::Char('r')) => self.page.replay(now),
            (_, KeyCode::Down | KeyCode::Char('j')) => self.page.scroll_by(1, self.viewport),
            (_, KeyCode::Up | KeyCode::Char('k')) => self.page.scroll_by(-1, self.viewport),
            (_, KeyCode::PageDown) => {
                let step = self.viewport.height.max(1) as i32;
                self.page.scroll_by(step, self.viewport);
            }
            (_, KeyCode::PageUp) => {
                let step = self.viewport.height.max(1) as i32;
                self.page.scroll_by(-step, self.viewport);
            }
            _ => {}
        }
    }

    fn on_mouse_event(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                let now = self.elapsed_ms();
                self.background.set_pointer_cell(mouse.column, mouse.row);
                self.page.hover(mouse.column, mouse.row, now, &mut self.pulses, &mut self.rng);
            }
            MouseEventKind::ScrollDown => self.page.scroll_by(3, self.viewport),
            MouseEventKind::ScrollUp => self.page.scroll_by(-3, self.viewport),
            _ => {}
        }
    }

    /// Cycle through the backdrops.
    fn cycle_backdrop(&mut self) {
        self.backdrop = self.backdrop.next();
        log::debug!("backdrop: {}", self.backdrop.name());
    }

    /// Play a random glitch on a random title right away.
    fn glitch_random_title(&mut self, now: u64) {
        let count = self.page.title_count();
        if count == 0 {
            return;
        }
        let target = self.rng.random_range(0..count);
        let kind = GlitchKind::ALL
            .choose(&mut self.rng)
            .copied()
            .unwrap_or(GlitchKind::Rgb);
        self.pulses.trigger(now, target, kind);
    }

    /// Set running to false to quit the application.
    fn quit(&mut self) {
        self.running = false;
    }
}
