mod app;

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Graph snapshot JSON with `nodes`, `edges` and optional `conflicts`.
    snapshot: PathBuf,

    /// TOML file overriding simulation and view tunables.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, default_value_t = 1440.0)]
    width: f32,

    #[arg(long, default_value_t = 920.0)]
    height: f32,
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("lexgraph=info")),
        )
        .init();

    let args = Args::parse();
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([args.width, args.height]),
        ..Default::default()
    };

    let source = app::LoadSource {
        snapshot_path: args.snapshot,
        config_path: args.config,
    };

    eframe::run_native(
        "lexgraph",
        options,
        Box::new(move |cc| Ok(Box::new(app::GraphViewerApp::new(cc, source)))),
    )
}
