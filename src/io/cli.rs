use crate::io::config::Config;
use clap::Parser;
use log::info;

/// Renders a scene with the software canvas and previews it in the terminal.
#[derive(Parser, Debug)]
#[command(name = "canvas")]
pub struct Cli {
    /// Scene configuration file (TOML). The built-in demo scene is used without one.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<String>,

    /// Overrides the render width in pixels.
    #[arg(long)]
    pub width: Option<usize>,

    /// Overrides the render height in pixels.
    #[arg(long)]
    pub height: Option<usize>,

    /// Overrides the preview width in characters.
    #[arg(long)]
    pub columns: Option<usize>,

    /// Skips the terminal preview.
    #[arg(long)]
    pub no_preview: bool,
}

impl Cli {
    /// Loads the configuration and applies the command-line overrides.
    pub fn load_config(&self) -> Result<Config, String> {
        let mut config = match &self.config {
            Some(path) => {
                info!("Loading config: {}", path);
                Config::load(path)?
            }
            None => {
                info!("No config given, rendering the demo scene");
                Config::default()
            }
        };
        if let Some(w) = self.width {
            config.render.width = w;
        }
        if let Some(h) = self.height {
            config.render.height = h;
        }
        if let Some(c) = self.columns {
            config.render.preview_columns = c;
        }
        Ok(config)
    }
}
