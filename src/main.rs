use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use eframe::egui;
use idol_catalog::app::IdolCatalogApp;
use idol_catalog::color::ColumnPalette;
use idol_catalog::config::AppConfig;
use idol_catalog::fonts;
use idol_catalog::state::AppState;

/// Browse and filter the idol card catalog.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Catalog file to open at startup.
    #[arg(env = "IDOL_CATALOG_DATA", default_value = "idol-list.csv")]
    data: PathBuf,

    /// JSON file with layout rules, colours, and load options.
    #[arg(long, env = "IDOL_CATALOG_CONFIG")]
    config: Option<PathBuf>,

    /// Text encoding of the catalog (overrides the config).
    #[arg(long)]
    encoding: Option<String>,

    /// Directory relative image paths resolve against (overrides the config).
    #[arg(long)]
    image_root: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => AppConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => AppConfig::default(),
    };
    if let Some(encoding) = args.encoding {
        config.encoding = encoding;
    }
    if let Some(root) = args.image_root {
        config.image_root = Some(root);
    }
    let palette = ColumnPalette::new(&config.column_colors).context("building column colours")?;

    let font_path = config.font_path.clone();
    let mut state = AppState::new(config, args.data.clone());
    state.load(&args.data);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([640.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "アイドル管理システム",
        options,
        Box::new(move |cc| {
            // Install image loaders so egui can render png/jpg from file:// URIs.
            egui_extras::install_image_loaders(&cc.egui_ctx);
            fonts::install_cjk_font(&cc.egui_ctx, font_path.as_deref());
            Ok(Box::new(IdolCatalogApp::new(state, palette)))
        }),
    )
    .map_err(|e| anyhow::anyhow!("running viewer: {e}"))
}
