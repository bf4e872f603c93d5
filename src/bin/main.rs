use clap::Parser;
use color_eyre::Result;
use std::path::PathBuf;
use std::{env, fs};
use tuiframe::app::App;
use tuiframe::config::Config;
use tuiframe::utils::{get_config_dir, initialize_panic_handler};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
/// TUI client for sending prompts and pictures to a Pi photo frame.
struct Args {
    /// Path to the configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Address of the frame server, e.g. http://localhost:3000.
    /// Overrides the configured address.
    #[arg(short, long)]
    address: Option<String>,
    /// Development mode
    #[arg(short, long)]
    dev: bool,
}

impl Args {
    fn config_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.config {
            Ok(path.clone())
        } else {
            Self::default_config_path()
        }
    }
    fn default_config_path() -> Result<PathBuf> {
        let config_dir = get_config_dir()?;
        fs::create_dir_all(&config_dir)?;
        Ok(config_dir.join("tuiframe.config.toml"))
    }
}

fn init_logger(dev: bool) -> Result<()> {
    if dev {
        tui_logger::init_logger(log::LevelFilter::Debug)?;
        tui_logger::set_default_level(log::LevelFilter::Debug);
    } else {
        let mut builder = env_logger::Builder::from_default_env();
        if env::var("RUST_LOG").is_err() {
            builder.filter_level(log::LevelFilter::Off);
        }
        builder.init();
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut config: Config = if args.config_path()?.exists() {
        toml::from_str(&fs::read_to_string(args.config_path()?)?)?
    } else {
        Config::default()
    };
    config.set_default_keybindings();
    if let Some(address) = args.address {
        config.server.address = address;
    }
    config.dev |= args.dev;

    init_logger(config.dev)?;

    initialize_panic_handler()?;

    App::new(config).run().await
}
