use crate::animation::descriptor::{AnimationDescriptor, Frame};
use crate::archive::Archive;
use crate::foundation::error::BootResult;

/// Manifest entry at the archive root.
pub const MANIFEST_NAME: &str = "desc.txt";

/// Read, parse and validate the manifest, then attach frames from the archive listing.
#[tracing::instrument(skip_all, fields(archive = archive.location()))]
pub fn load_descriptor(archive: &dyn Archive) -> BootResult<AnimationDescriptor> {
    let text = archive.read_entry(MANIFEST_NAME)?;
    let mut desc = AnimationDescriptor::parse(&String::from_utf8_lossy(&text));
    desc.validate()?;
    resolve_frames(archive, &mut desc);
    tracing::info!(
        width = desc.width,
        height = desc.height,
        fps = desc.fps,
        parts = desc.parts.len(),
        frames = desc.frame_count(),
        "animation loaded"
    );
    Ok(desc)
}

/// Attach every stored entry `PATH/leaf` to each part whose path is `PATH`, then order each
/// part's frames by name.
///
/// Directory entries and compressed entries are never attached.
pub fn resolve_frames(archive: &dyn Archive, desc: &mut AnimationDescriptor) {
    for entry in archive.entries() {
        if entry.leaf().is_empty() {
            continue;
        }
        let dir = entry.directory();
        for part in desc.parts.iter_mut().filter(|p| p.path == dir) {
            if !entry.is_stored() {
                tracing::debug!(entry = %entry.name, method = ?entry.method, "ignoring compressed frame");
                continue;
            }
            part.frames.push(Frame {
                name: entry.leaf().to_owned(),
                span: entry.span.clone(),
                texture: None,
            });
        }
    }

    for part in &mut desc.parts {
        part.frames.sort_by(|a, b| a.name.cmp(&b.name));
        if part.frames.is_empty() {
            tracing::warn!(part = %part.path, "part has no frames");
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/frames.rs"]
mod tests;
