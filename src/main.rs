mod config;
mod keyboard;
mod tui;

use anyhow::{Context, Result};
use clap::{Command, CommandFactory, Parser, Subcommand, ValueEnum, ValueHint};
use clap_complete::{Generator, Shell, generate};
use config::{CONFIG_KEYS, Config, ConfigError};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use keyboard::{ConsoleSink, FileSink, KeyCommand, Keyboard, MemorySink, Reporter};
use ratatui::{
    Terminal,
    backend::{Backend, CrosstermBackend},
};
use std::io;
use tracing_subscriber::EnvFilter;
use tui::{app::App, ui};

#[derive(Parser)]
#[command(name = "keybind")]
#[command(about = "A keybinding processor with undo/redo and persisted state")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Press keys in order and save the resulting state")]
    Press {
        #[arg(required = true, help = "Key identifiers, e.g. a, ctrl+p, undo, redo")]
        keys: Vec<String>,
    },
    #[command(about = "Show the saved state, bindings and history")]
    Show,
    #[command(about = "Bind a key to a command")]
    Bind {
        #[arg(help = "Key identifier")]
        key: String,
        #[arg(value_enum, help = "Command to bind")]
        command: BindTarget,
        #[arg(help = "Step for volume commands (default 20)")]
        amount: Option<i64>,
    },
    #[command(about = "Remove a key binding")]
    Unbind {
        #[arg(help = "Key identifier")]
        key: String,
    },
    #[command(about = "Replace the saved state with the default bindings")]
    Reset,
    #[command(about = "Configuration management")]
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    #[command(about = "Generate shell completion scripts")]
    Completion {
        #[arg(help = "Shell to generate completions for")]
        shell: Shell,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum BindTarget {
    Char,
    VolumeUp,
    VolumeDown,
    MediaPlayer,
    Disabled,
}

#[derive(Subcommand)]
enum ConfigAction {
    #[command(about = "Set a configuration value")]
    Set {
        #[arg(help = "Configuration key (binds_file, default_binds_file, output_file)")]
        key: String,
        #[arg(help = "Configuration value", value_hint = ValueHint::FilePath)]
        value: String,
    },
    #[command(about = "Get a configuration value")]
    Get {
        #[arg(help = "Configuration key")]
        key: String,
    },
    #[command(about = "List all configuration values")]
    List,
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Press { keys }) => with_keyboard(|keyboard, config| press_keys(keyboard, config, &keys)),
        Some(Commands::Show) => with_keyboard(|keyboard, _| {
            print_state(keyboard);
            Ok(())
        }),
        Some(Commands::Bind { key, command, amount }) => {
            with_keyboard(|keyboard, config| bind_key(keyboard, config, &key, command, amount))
        }
        Some(Commands::Unbind { key }) => with_keyboard(|keyboard, config| unbind_key(keyboard, config, &key)),
        Some(Commands::Reset) => with_keyboard(|keyboard, config| keyboard.reset_to_defaults(&config.state_paths())),
        Some(Commands::Config { action }) => handle_config_command(action).map_err(anyhow::Error::from),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            print_completions(shell, &mut cmd);
            Ok(())
        }
        None => run_main_app(),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn handle_config_command(action: ConfigAction) -> Result<(), ConfigError> {
    match action {
        ConfigAction::Set { key, value } => {
            let mut config = Config::load_or_default()?;
            config.set(&key, value)?;
            config.save()?;
            println!("Configuration saved successfully.");
        }
        ConfigAction::Get { key } => {
            let config = Config::load_or_default()?;
            println!("{}", config.get(&key)?);
        }
        ConfigAction::List => {
            let config = Config::load_or_default()?;
            for key in CONFIG_KEYS {
                println!("{} = {}", key, config.get(key)?);
            }
        }
    }
    Ok(())
}

fn load_config() -> Result<Config> {
    let config = Config::load_or_default().context("Configuration error")?;
    config.ensure_dirs().context("Failed to prepare state directory")?;
    Ok(config)
}

fn console_keyboard(config: &Config) -> Result<Keyboard> {
    let reporter = Reporter::new(
        Box::new(FileSink::new(&config.output_file)),
        Box::new(ConsoleSink),
    );
    Keyboard::bootstrap(&config.state_paths(), reporter)
}

fn with_keyboard<F>(f: F) -> Result<()>
where
    F: FnOnce(&mut Keyboard, &Config) -> Result<()>,
{
    let config = load_config()?;
    let mut keyboard = console_keyboard(&config)?;
    f(&mut keyboard, &config)
}

fn press_keys(keyboard: &mut Keyboard, config: &Config, keys: &[String]) -> Result<()> {
    // Failed presses are reported by the keyboard and do not stop the sequence.
    for key in keys {
        keyboard.press(key).ok();
    }
    keyboard.save(&config.binds_file)?;
    Ok(())
}

fn bind_key(keyboard: &mut Keyboard, config: &Config, key: &str, target: BindTarget, amount: Option<i64>) -> Result<()> {
    let command = match target {
        BindTarget::Char => {
            let mut chars = key.chars();
            match (chars.next(), chars.next()) {
                (Some(ch), None) => Some(KeyCommand::character(ch)),
                _ => anyhow::bail!("'char' can only be bound to a single-character key, not '{}'", key),
            }
        }
        BindTarget::VolumeUp => Some(amount.map_or_else(KeyCommand::volume_up_default, KeyCommand::volume_up)),
        BindTarget::VolumeDown => Some(amount.map_or_else(KeyCommand::volume_down_default, KeyCommand::volume_down)),
        BindTarget::MediaPlayer => Some(KeyCommand::MediaPlayer),
        BindTarget::Disabled => None,
    };
    keyboard.bind(key, command);
    keyboard.save(&config.binds_file)?;
    Ok(())
}

fn unbind_key(keyboard: &mut Keyboard, config: &Config, key: &str) -> Result<()> {
    if keyboard.unbind(key).is_none() {
        println!("'{}' was not bound", key);
    }
    keyboard.save(&config.binds_file)?;
    Ok(())
}

fn print_state(keyboard: &Keyboard) {
    let state = keyboard.state();
    println!("text         = {:?}", state.text);
    println!("volume       = {}%", state.volume);
    println!("media_player = {}", state.media_player);
    println!();
    println!("bindings:");
    for (key, command) in keyboard.bindings() {
        match command {
            Some(command) => println!("  {:<10} {}", key, command),
            None => println!("  {:<10} (disabled)", key),
        }
    }
    println!();
    println!("back_history    = {:?}", keyboard.history().back_keys());
    println!("forward_history = {:?}", keyboard.history().forward_keys());
}

fn run_main_app() -> Result<()> {
    let config = load_config()?;

    let console = MemorySink::new();
    let reporter = Reporter::new(
        Box::new(FileSink::new(&config.output_file)),
        Box::new(console.clone()),
    );
    let keyboard = Keyboard::bootstrap(&config.state_paths(), reporter)?;
    let mut app = App::new(keyboard, console, config.binds_file.clone());

    run_tui(&mut app)?;

    Ok(())
}

fn run_tui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            app.handle_key_event(key)?;
            if app.should_quit {
                break;
            }
        }
    }
    Ok(())
}

fn print_completions<G: Generator>(generator: G, cmd: &mut Command) {
    generate(generator, cmd, cmd.get_name().to_string(), &mut io::stdout());
}
