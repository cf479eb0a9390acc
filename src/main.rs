use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use multiquiz::{
    app::{App, AppAction},
    app_dirs::AppDirs,
    celebration::CelebrationStyle,
    config::{Config, ConfigStore, FileConfigStore},
    logging,
    runtime::{CrosstermEventSource, FixedTicker, Runner},
    timers::MAX_FEEDBACK_DELAY_MS,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
};
use tracing::{info, warn};

/// times-tables practice in the terminal
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Practice the 2's to 12's times tables: answer randomized questions against the clock, then carry on to the next table."
)]
pub struct Cli {
    /// table to pre-select on the setup screen (2-12)
    #[clap(short = 't', long, value_parser = clap::value_parser!(u8).range(2..=12))]
    table: Option<u8>,

    /// number of questions per session
    #[clap(short = 'q', long, value_parser = clap::value_parser!(u32).range(1..))]
    questions: Option<u32>,

    /// how long answer feedback stays up before the next question, in milliseconds
    #[clap(long, value_parser = clap::value_parser!(u64).range(..=MAX_FEEDBACK_DELAY_MS))]
    delay_ms: Option<u64>,

    /// effect shown on the results screen
    #[clap(short = 'c', long, value_enum)]
    celebration: Option<CelebrationStyle>,

    /// do not ring the terminal bell on answers
    #[clap(long)]
    no_bell: bool,

    /// seed for a repeatable question sequence
    #[clap(long)]
    seed: Option<u64>,
}

impl Cli {
    /// Command line values win over the stored config
    fn apply(&self, mut config: Config) -> Config {
        if let Some(table) = self.table {
            config.table = table;
        }
        if let Some(questions) = self.questions {
            config.question_count = questions;
        }
        if let Some(delay_ms) = self.delay_ms {
            config.feedback_delay_ms = delay_ms;
        }
        if let Some(celebration) = self.celebration {
            config.celebration = celebration;
        }
        if self.no_bell {
            config.bell = false;
        }
        config
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    if let Some(path) = AppDirs::log_path() {
        // logging is best effort
        if let Err(e) = logging::init_file_logging(&path) {
            eprintln!("multiquiz: logging disabled ({}): {e}", path.display());
        }
    }

    let store = FileConfigStore::new();
    let mut config = cli.apply(store.load());
    if let Err(e) = config.validate() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::ValueValidation, e.to_string()).exit();
    }
    info!(version = env!("CARGO_PKG_VERSION"), ?config, "starting multiquiz");

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::from_config(&config, cli.seed);
    let result = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    config.remember(app.last_session());
    if let Err(e) = store.save(&config) {
        warn!(error = %e, path = %store.path().display(), "could not save settings");
    }

    result
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(CrosstermEventSource::new(), FixedTicker::default());

    let size = terminal.size()?;
    app.quiz.feedback_mut().set_area(size.width, size.height);

    loop {
        terminal.draw(|f| f.render_widget(&*app, f.area()))?;

        if app.on_event(runner.step()) == AppAction::Quit {
            break;
        }
    }

    Ok(())
}
