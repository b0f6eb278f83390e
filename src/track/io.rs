use std::fs;
use std::io::Cursor;
use std::path::Path;

use bincode::ErrorKind;
use thiserror::Error;

use crate::track::Track;

/// Compression level for packed track files.
///
/// Tracks are written once and replayed many times, so the slow top level
/// is worth it.
const TRACK_COMPRESSION_LEVEL: i32 = 19;

#[derive(Debug, Error)]
pub enum TrackError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Serialization error: {0}")]
    Serialize(#[from] Box<ErrorKind>),
    #[error("Compression error: {0}")]
    Compression(#[source] std::io::Error),
    #[error("track {0:?} has no position fixes")]
    Empty(String),
}

pub fn pack_track(track: &Track) -> Result<Vec<u8>, TrackError> {
    let encoded = bincode::serialize(track)?;
    let mut cursor = Cursor::new(encoded);
    zstd::stream::encode_all(&mut cursor, TRACK_COMPRESSION_LEVEL).map_err(TrackError::Compression)
}

pub fn unpack_track(bytes: &[u8]) -> Result<Track, TrackError> {
    let mut cursor = Cursor::new(bytes);
    let decoded = zstd::stream::decode_all(&mut cursor).map_err(TrackError::Compression)?;
    let track: Track = bincode::deserialize(&decoded)?;
    Ok(track)
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

/// Writes `.json` paths as pretty JSON and anything else packed.
pub fn write_track_to_file<P: AsRef<Path>>(track: &Track, path: P) -> Result<(), TrackError> {
    let path = path.as_ref();
    let bytes = if is_json(path) {
        serde_json::to_vec_pretty(track)?
    } else {
        pack_track(track)?
    };
    fs::write(path, bytes)?;
    Ok(())
}

pub fn read_track_from_file<P: AsRef<Path>>(path: P) -> Result<Track, TrackError> {
    let path = path.as_ref();
    let bytes = fs::read(path)?;
    let track: Track = if is_json(path) {
        serde_json::from_slice(&bytes)?
    } else {
        unpack_track(&bytes)?
    };
    if track.is_empty() {
        return Err(TrackError::Empty(track.name));
    }
    Ok(track)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::track::demo_route;
    use crate::GeoPoint;

    #[test]
    fn packed_and_json_files_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let track = demo_route("hek-north").unwrap().clone();

        for name in ["drive.json", "drive.trk"] {
            let path = dir.path().join(name);
            write_track_to_file(&track, &path).expect("write");
            assert_eq!(read_track_from_file(&path).expect("read"), track);
        }
    }

    #[test]
    fn empty_track_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.json");
        write_track_to_file(&Track::new("empty", Vec::<GeoPoint>::new()), &path).unwrap();
        assert!(matches!(read_track_from_file(&path), Err(TrackError::Empty(name)) if name == "empty"));
    }

    #[test]
    fn corrupt_packed_file_is_a_compression_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.trk");
        fs::write(&path, b"definitely not zstd").unwrap();
        assert!(matches!(read_track_from_file(&path), Err(TrackError::Compression(_))));
    }
}
