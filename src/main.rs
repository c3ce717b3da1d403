use canvas_rasterizer::io::cli::Cli;
use canvas_rasterizer::io::preview::render_ascii;
use canvas_rasterizer::pipeline::canvas::Canvas;
use canvas_rasterizer::pipeline::passes::render_frame;
use canvas_rasterizer::scene::loader::{apply_render_options, build_world};
use clap::Parser;
use log::info;
use std::time::Instant;

fn main() -> Result<(), String> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .format_timestamp(None)
        .format_level(true)
        .init();

    let cli = Cli::parse();
    let config = cli.load_config()?;
    let mut world = build_world(&config)?;

    let mut canvas = Canvas::new(config.render.width, config.render.height)
        .map_err(|e| format!("Failed to create canvas: {}", e))?;
    apply_render_options(&mut canvas, &config);

    let start = Instant::now();
    let stats = render_frame(&mut canvas, &mut world).map_err(|e| format!("Render failed: {}", e))?;
    info!(
        "Rendered {}x{} in {:.2?}: {}",
        canvas.width(),
        canvas.height(),
        start.elapsed(),
        stats
    );

    if !cli.no_preview {
        print!("{}", render_ascii(canvas.framebuffer(), config.render.preview_columns));
    }
    Ok(())
}
