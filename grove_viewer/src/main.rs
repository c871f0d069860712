use std::path::{Path, PathBuf};

use grove_core::{App, AppControl, KeyCode};
use grove_procgen::TreeInstance;
use grove_render::{HeadlessContainer, TreeRenderer};

mod config;
mod controls;
mod forest;

use config::{CliArgs, ViewerConfig, DEFAULT_CONFIG_FILE};
use controls::{Command, Outcome};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args = CliArgs::parse(std::env::args().skip(1))?;
    let config_path = args.config.clone().unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
    let mut config = ViewerConfig::load_or_default(&config_path)?;
    config.apply_args(&args);

    let trees = forest::initial_forest(&config)?;

    match config.snapshot.clone() {
        Some(path) => snapshot(&config, trees, &path),
        None => run_window(config, trees),
    }
}

/// Render one frame off-screen and write it as PNG
fn snapshot(config: &ViewerConfig, trees: Vec<TreeInstance>, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let container = HeadlessContainer::new(config.window_width, config.window_height);
    let renderer = TreeRenderer::new(trees, container, config.mode, config.renderer.clone())?;
    renderer.surface().save_png(path)?;

    let stats = renderer.last_frame_stats();
    log::info!(
        "Wrote {} ({} trees drawn, {} culled)",
        path.display(),
        stats.drawn,
        stats.culled
    );
    Ok(())
}

fn run_window(config: ViewerConfig, trees: Vec<TreeInstance>) -> Result<(), Box<dyn std::error::Error>> {
    let mut app = App::new("Grove", config.window_width, config.window_height);

    app.set_key_callback(|key, renderer| {
        let Some(command) = command_for(key) else {
            return AppControl::Ignored;
        };
        match controls::apply(command, renderer) {
            Outcome::Unchanged => AppControl::Ignored,
            Outcome::Changed => AppControl::Redraw,
            Outcome::Quit => AppControl::Exit,
        }
    });

    log::info!("G grow, W wither, R reset, Tab next tree, Esc quit");
    app.run(move |container| TreeRenderer::new(trees, container, config.mode, config.renderer))
}

fn command_for(key: KeyCode) -> Option<Command> {
    match key {
        KeyCode::KeyG => Some(Command::Grow),
        KeyCode::KeyW => Some(Command::Wither),
        KeyCode::KeyR => Some(Command::Reset),
        KeyCode::Tab => Some(Command::FocusNext),
        KeyCode::Escape => Some(Command::Quit),
        _ => None,
    }
}
