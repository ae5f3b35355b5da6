#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the McBean shooting gallery.

mod assets;
mod presentation;
mod session;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use glam::Vec2;
use mcbean_core::{GAME_TITLE, SCREEN_HEIGHT, SCREEN_WIDTH};
use mcbean_rendering::{AudioCapability, Color, Presentation, RenderingBackend, Scene};
use mcbean_rendering_macroquad::{AssetManifest, MacroquadBackend};
use tracing_subscriber::EnvFilter;

use crate::session::Game;

#[derive(Debug, Parser)]
#[command(name = "mcbean", about = "Arcade shooting gallery starring M&M McBean")]
struct Args {
    /// Directory holding `manifest.toml` and the art, audio and font files.
    #[arg(long, default_value = "assets")]
    assets: PathBuf,
    /// Seed for every random source; drawn from OS entropy when omitted.
    #[arg(long)]
    seed: Option<u64>,
    /// Disable all sound for the whole run.
    #[arg(long)]
    mute: bool,
    /// Log frame-rate metrics once per second.
    #[arg(long)]
    show_fps: bool,
    /// Render as fast as possible instead of waiting for the display refresh.
    #[arg(long)]
    no_vsync: bool,
}

/// Entry point for the McBean command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let seed = args.seed.unwrap_or_else(rand::random);
    tracing::info!(seed, assets = %args.assets.display(), "starting");

    let manifest = AssetManifest::load_or_default(&args.assets);
    let sprites = assets::build_sprite_sheet(&manifest);

    let audio_capability = if args.mute {
        AudioCapability::Disabled
    } else {
        AudioCapability::Enabled
    };
    let backend = MacroquadBackend::new()
        .with_vsync(!args.no_vsync)
        .with_show_fps(args.show_fps)
        .with_fonts(manifest.fonts().clone())
        .with_audio(manifest.audio().clone(), audio_capability);

    let mut game = Game::new(seed);
    let mut scene = Scene::new(Color::BLACK);
    presentation::compose(game.world(), &mut scene);
    let presentation = Presentation::new(
        GAME_TITLE,
        Vec2::new(SCREEN_WIDTH, SCREEN_HEIGHT),
        sprites,
        scene,
    );

    backend.run(presentation, move |dt, input, scene| {
        let output = game.frame(dt, input);
        presentation::compose(game.world(), scene);
        output
    })
}
