use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{bail, Context, Result};
use log::info;
use serde::Serialize;
use speedcam_engine::track::io::pack_track;
use speedcam_engine::track::{demo_route, read_track_from_file, Track};
use tempfile::NamedTempFile;

#[derive(Debug, Serialize)]
struct TrackMetadata {
    name: String,
    source: String,
    fixes: usize,
    length_km: f64,
    packed_bytes: usize,
    generated_at_epoch: u64,
}

/// Packs a track into the compressed replay format.
///
/// Usage: `pack_track <track.json | demo:NAME> <output>`
fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let [source, output] = args.as_slice() else {
        bail!("usage: pack_track <track.json | demo:NAME> <output>");
    };

    let track = load_source(source)?;
    let bytes = pack_track(&track).context("failed to pack track")?;

    let output = PathBuf::from(output);
    write_atomically(&output, &bytes)
        .with_context(|| format!("failed to write track to {}", output.display()))?;

    let metadata = TrackMetadata {
        name: track.name.clone(),
        source: source.clone(),
        fixes: track.len(),
        length_km: path_length_km(&track),
        packed_bytes: bytes.len(),
        generated_at_epoch: current_epoch_seconds(),
    };
    let metadata_path = output.with_extension("meta.json");
    fs::write(&metadata_path, serde_json::to_vec_pretty(&metadata)?)
        .with_context(|| format!("failed to write metadata to {}", metadata_path.display()))?;

    info!(
        "Packed track {:?} into {} ({} fixes, {:.2} km, {} bytes)",
        metadata.name,
        output.display(),
        metadata.fixes,
        metadata.length_km,
        metadata.packed_bytes
    );
    Ok(())
}

fn load_source(source: &str) -> Result<Track> {
    if let Some(name) = source.strip_prefix("demo:") {
        return demo_route(name)
            .cloned()
            .with_context(|| format!("no demo route named {name:?}"));
    }
    read_track_from_file(source).with_context(|| format!("failed to read track {source}"))
}

fn write_atomically(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).context("failed to create output directory")?;
    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(bytes)?;
    file.persist(path)?;
    Ok(())
}

fn path_length_km(track: &Track) -> f64 {
    track
        .fixes
        .windows(2)
        .map(|pair| pair[0].distance_km(&pair[1]))
        .sum()
}

fn current_epoch_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
