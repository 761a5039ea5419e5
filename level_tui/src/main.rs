use anyhow::{Context as _, Result};
use clap::Parser;
use level_core::{Level, LoaderConfig, MovementStrategy, loader::LEVELS_DIRECTORY, load_levels};
use ratatui::{
    crossterm::{
        self,
        event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode},
        execute,
        terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
    },
    prelude::*,
    symbols::Marker,
    widgets::{
        canvas::{Canvas, Context, Points, Rectangle},
        *,
    },
};
use std::{
    fs::{File, OpenOptions},
    io::{self, Stdout},
    path::{Path, PathBuf},
    sync::Mutex,
    time::{Duration, Instant},
};
use tracing_subscriber::EnvFilter;

/// Empty space kept around the furthest entity when fitting a level on screen.
const MARGIN: f64 = 20.0;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Directory holding the level files
    #[arg(short, long, value_name = "DIR", default_value = LEVELS_DIRECTORY)]
    levels_dir: PathBuf,

    /// Milliseconds between enemy updates
    #[arg(short, long, value_name = "MS", default_value_t = 100)]
    tick_ms: u64,

    /// File receiving log output while the terminal UI is active
    #[arg(long, value_name = "FILE", default_value = "level_tui.log")]
    log_file: PathBuf,
}

struct App {
    /// Every level that loaded.
    levels: Vec<Level>,
    /// Index into `levels` of the level on screen.
    current: usize,
    /// Ticks since the current level was entered or reset.
    ticks: u64,
    paused: bool,
    should_quit: bool,
}

impl App {
    fn new(levels: Vec<Level>) -> Self {
        App {
            levels,
            current: 0,
            ticks: 0,
            paused: false,
            should_quit: false,
        }
    }

    fn level(&self) -> &Level {
        &self.levels[self.current]
    }

    /// Handles one step of the simulation.
    fn tick(&mut self) {
        if self.paused {
            return;
        }
        self.levels[self.current].update();
        self.ticks += 1;
    }

    fn next_level(&mut self) {
        self.current = (self.current + 1) % self.levels.len();
        self.ticks = 0;
    }

    fn previous_level(&mut self) {
        self.current = (self.current + self.levels.len() - 1) % self.levels.len();
        self.ticks = 0;
    }

    fn reset_level(&mut self) {
        self.levels[self.current].reset_to_initial_state();
        self.ticks = 0;
        tracing::debug!(level = self.current, "level reset");
    }

    fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    /// Sets the quit flag.
    fn quit(&mut self) {
        self.should_quit = true;
    }
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();
    init_tracing(&args.log_file)?;

    let config = LoaderConfig::new(&args.levels_dir);
    let levels = load_levels(&config);
    if levels.is_empty() {
        return Err(anyhow::anyhow!(
            "No levels loaded from {} (see {})",
            config.directory.display(),
            args.log_file.display()
        ));
    }
    tracing::info!(count = levels.len(), directory = %config.directory.display(), "levels loaded");

    // Set up the terminal
    let mut terminal = setup_terminal()?;

    let mut app = App::new(levels);

    // Run the main application loop
    let result = run_app(&mut terminal, &mut app, Duration::from_millis(args.tick_ms));

    // Restore the terminal state even if the loop failed
    restore_terminal(&mut terminal)?;

    result
}

/// Installs a subscriber appending to `log_file`, filtered by `RUST_LOG` and
/// defaulting to `info`. The terminal itself belongs to the UI.
fn init_tracing(log_file: &Path) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .with_context(|| format!("Failed to open log file {}", log_file.display()))?;

    if tracing::subscriber::set_global_default(file_subscriber(filter, file)).is_err() {
        eprintln!("tracing subscriber already set");
    }
    Ok(())
}

fn file_subscriber(filter: EnvFilter, file: File) -> impl tracing::Subscriber + Send + Sync {
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .finish()
}

/// Configures the terminal for TUI interaction.
fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    let mut stdout = io::stdout();
    enable_raw_mode()?;
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).map_err(Into::into)
}

/// Restores the terminal to its original state.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}

/// Runs the main loop of the TUI application.
fn run_app(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
    tick_rate: Duration,
) -> Result<()> {
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if crossterm::event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => app.quit(),
                    KeyCode::Char('n') | KeyCode::Right => app.next_level(),
                    KeyCode::Char('p') | KeyCode::Left => app.previous_level(),
                    KeyCode::Char('r') => app.reset_level(),
                    KeyCode::Char(' ') => app.toggle_pause(),
                    _ => {}
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            app.tick();
            last_tick = Instant::now();
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}

/// Renders the user interface.
fn ui(frame: &mut Frame, app: &App) {
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(10),   // Area for the level
            Constraint::Length(3), // Area for level stats
            Constraint::Length(2), // Area for help
        ])
        .split(frame.area());

    render_level(frame, main_layout[0], app);
    render_stats(frame, main_layout[1], app);

    let help_text = Paragraph::new(
        "q/Esc quit  n/→ next  p/← previous  r reset  space pause",
    )
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::TOP));
    frame.render_widget(help_text, main_layout[2]);
}

/// Largest x and y reached by anything in the level, plus a margin.
fn level_extent(level: &Level) -> (f64, f64) {
    let mut width = level.spawn.x.max(level.target_zone.x + level.target_zone.width);
    let mut height = level.spawn.y.max(level.target_zone.y + level.target_zone.height);
    for wall in &level.walls {
        width = width.max(wall.x + wall.width);
        height = height.max(wall.y + wall.height);
    }
    for coin in &level.coins {
        width = width.max(coin.x);
        height = height.max(coin.y);
    }
    for enemy in &level.enemies {
        width = width.max(enemy.bounds.x_max).max(enemy.position.x);
        height = height.max(enemy.bounds.y_max).max(enemy.position.y);
    }
    (width + MARGIN, height + MARGIN)
}

fn strategy_glyph(strategy: MovementStrategy) -> &'static str {
    match strategy {
        MovementStrategy::Vertical => "V",
        MovementStrategy::Horizontal => "H",
        MovementStrategy::Diagonal => "D",
        MovementStrategy::Circular => "C",
    }
}

/// Draws the level's entities. Level `y` grows downwards, canvas `y` upwards.
fn paint_level(ctx: &mut Context, level: &Level, height: f64) {
    for wall in &level.walls {
        ctx.draw(&Rectangle {
            x: wall.x,
            y: height - wall.y - wall.height,
            width: wall.width,
            height: wall.height,
            color: Color::DarkGray,
        });
    }

    let zone = &level.target_zone;
    ctx.draw(&Rectangle {
        x: zone.x,
        y: height - zone.y - zone.height,
        width: zone.width,
        height: zone.height,
        color: Color::Green,
    });

    let coins: Vec<(f64, f64)> = level
        .coins
        .iter()
        .filter(|coin| !coin.collected)
        .map(|coin| (coin.x, height - coin.y))
        .collect();
    ctx.draw(&Points {
        coords: &coins,
        color: Color::Yellow,
    });

    ctx.layer();
    ctx.print(
        level.spawn.x,
        height - level.spawn.y,
        Span::styled("@", Style::default().fg(Color::Cyan).bold()),
    );
    for enemy in &level.enemies {
        ctx.print(
            enemy.position.x,
            height - enemy.position.y,
            Span::styled(
                strategy_glyph(enemy.strategy),
                Style::default().fg(Color::Red).bold(),
            ),
        );
    }
}

/// Renders the current level onto a canvas scaled to fit the area.
fn render_level(frame: &mut Frame, area: Rect, app: &App) {
    let level = app.level();
    let (width, height) = level_extent(level);
    let title = format!(
        "Level {}/{}{}",
        app.current + 1,
        app.levels.len(),
        if app.paused { " (paused)" } else { "" }
    );

    let canvas = Canvas::default()
        .block(Block::default().title(title).borders(Borders::ALL))
        .marker(Marker::Braille)
        .x_bounds([0.0, width])
        .y_bounds([0.0, height])
        .paint(|ctx| paint_level(ctx, level, height));

    frame.render_widget(canvas, area);
}

/// Renders entity counts for the current level.
fn render_stats(frame: &mut Frame, area: Rect, app: &App) {
    let level = app.level();
    let stats = Line::from(vec![
        Span::styled(
            format!("Enemies: {}  ", level.enemies.len()),
            Style::default().fg(Color::Red),
        ),
        Span::styled(
            format!("Walls: {}  ", level.walls.len()),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            format!("Coins: {}/{}  ", level.remaining_coins(), level.coins.len()),
            Style::default().fg(Color::Yellow),
        ),
        Span::raw(format!(
            "Spawn: ({}, {})  Tick: {}",
            level.spawn.x, level.spawn.y, app.ticks
        )),
    ]);

    let stats_widget =
        Paragraph::new(stats).block(Block::default().borders(Borders::ALL).title("Stats"));
    frame.render_widget(stats_widget, area);
}
