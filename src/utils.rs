use crate::tui;
use color_eyre::config::HookBuilder;
use color_eyre::eyre::{eyre, Result};
use directories::ProjectDirs;
use std::panic;
use std::path::PathBuf;

pub fn get_config_dir() -> Result<PathBuf> {
    if let Some(proj_dirs) = ProjectDirs::from("", "", "tuiframe") {
        Ok(proj_dirs.config_local_dir().to_path_buf())
    } else {
        Err(eyre!("failed to determine config directory"))
    }
}

pub fn initialize_panic_handler() -> color_eyre::Result<()> {
    let (panic_hook, eyre_hook) = HookBuilder::default().into_hooks();
    eyre_hook.install()?;

    let panic_hook = panic_hook.into_panic_hook();
    panic::set_hook(Box::new(move |panic_info| {
        tui::restore().expect("failed to restore terminal");
        panic_hook(panic_info);
    }));
    Ok(())
}
