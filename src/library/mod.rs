//! In-memory media library for PrismPlayer
//!
//! The library holds every imported `VideoFile` for the lifetime of the
//! process. Nothing is persisted: closing the application discards the
//! collection. The visual library grid consumes the ordered listing; the
//! player consumes individual records by id.

use crate::media::{VideoFile, VideoId, VideoMetadata};
use crate::utils::error::{IntoPlayerError, PlayerError, Result};
use log::{debug, info};
use std::path::Path;
use std::time::SystemTime;

/// The in-memory collection of imported video files
#[derive(Debug, Default)]
pub struct Library {
    files: Vec<VideoFile>,
}

impl Library {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an already-constructed record, returning its id
    pub fn import(&mut self, file: VideoFile) -> VideoId {
        let id = file.id;
        info!("Imported \"{}\" ({} bytes)", file.display_name, file.size_bytes);
        self.files.push(file);
        id
    }

    /// Import a local file path, reading its size from disk
    ///
    /// Display metadata is supplied by the caller; the library makes no
    /// assumption about how it was derived.
    pub fn import_path(&mut self, path: &Path, metadata: VideoMetadata) -> Result<VideoId> {
        let stat = std::fs::metadata(path).library_err("Reading import source")?;
        if !stat.is_file() {
            return Err(PlayerError::Library(format!(
                "Not a regular file: {}",
                path.display()
            )));
        }

        let display_name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("Untitled")
            .to_string();
        let stream_uri = format!("file://{}", path.display());

        let file = VideoFile::new(path.to_path_buf(), display_name, stream_uri, stat.len(), metadata);
        Ok(self.import(file))
    }

    pub fn get(&self, id: VideoId) -> Option<&VideoFile> {
        self.files.iter().find(|f| f.id == id)
    }

    pub fn get_mut(&mut self, id: VideoId) -> Option<&mut VideoFile> {
        self.files.iter_mut().find(|f| f.id == id)
    }

    pub fn remove(&mut self, id: VideoId) {
        self.files.retain(|f| f.id != id);
    }

    /// Record that playback of `id` began at `now`
    ///
    /// Called once per play session, at the moment the engine starts
    /// playing; the record is otherwise immutable while a session is open.
    pub fn mark_played(&mut self, id: VideoId, now: SystemTime) {
        if let Some(file) = self.get_mut(id) {
            debug!("Marking \"{}\" as played", file.display_name);
            file.last_played_at = Some(now);
        }
    }

    /// Files ordered for the library grid: most recently played first,
    /// never-played files after them in insertion order
    pub fn ordered(&self) -> Vec<&VideoFile> {
        let mut ordered: Vec<&VideoFile> = self.files.iter().collect();
        ordered.sort_by(|a, b| match (b.last_played_at, a.last_played_at) {
            (Some(b_at), Some(a_at)) => b_at.cmp(&a_at),
            (Some(_), None) => std::cmp::Ordering::Greater,
            (None, Some(_)) => std::cmp::Ordering::Less,
            (None, None) => std::cmp::Ordering::Equal,
        });
        ordered
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
