use std::sync::Arc;

use crate::archive::ZipArchive;
use crate::config::BootConfig;
use crate::engine::PlaybackEngine;
use crate::foundation::error::BootResult;
use crate::input::device::SysfsProbe;
use crate::input::watcher::InputWatcher;
use crate::logs::source::DeviceLogFactory;
use crate::session::compositor::{AbortOnDeath, Compositor};

/// Build a ready-to-run engine: surface, archive, input device and log sources.
///
/// A missing archive or input device is not an error; the engine then plays the logo or runs
/// without buttons. Compositor death aborts the process.
#[tracing::instrument(skip_all)]
pub fn prepare_engine(config: &BootConfig, compositor: &mut dyn Compositor) -> BootResult<PlaybackEngine> {
    prepare_engine_with_kill(config, compositor, None)
}

/// [`prepare_engine`] with a replacement for the process abort on compositor death.
pub fn prepare_engine_with_kill(
    config: &BootConfig,
    compositor: &mut dyn Compositor,
    kill: Option<fn()>,
) -> BootResult<PlaybackEngine> {
    let opts = config.engine_opts()?;
    let info = compositor.display_info()?;
    tracing::info!(width = info.width, height = info.height, "display");
    let sink = compositor.create_surface(info)?;

    let mut engine = PlaybackEngine::new(sink, opts)
        .with_input(InputWatcher::discover(
            &config.input_dir,
            &SysfsProbe::new(&config.input_sysfs_dir),
        ))
        .with_log_factory(DeviceLogFactory::new(config.log_devices.clone()));
    if let Some(archive) = ZipArchive::open_first(&config.archive_paths) {
        engine = engine.with_archive(archive);
    }

    let cancel = engine.cancel_token();
    let recipient = match kill {
        Some(kill) => AbortOnDeath::with_kill(cancel, kill),
        None => AbortOnDeath::new(cancel),
    };
    compositor.link_to_death(Arc::new(recipient))?;
    Ok(engine)
}

#[cfg(test)]
#[path = "../../tests/unit/session/startup.rs"]
mod tests;
