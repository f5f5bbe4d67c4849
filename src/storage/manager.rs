use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use bytes::BytesMut;
use tokio_util::codec::{Decoder, Encoder};

use super::apply::apply_payload;
use super::error::StorageError;
use super::journal::{JournalCodec, UpdateRequest};
use crate::model::{CourseOutline, Payload, XBlockInfo};
use crate::tui::modal::{OnSave, XBlockUpdater};

const APP_DIR: &str = "outline-settings";
const OUTLINE_FILE: &str = "outline.json";
const JOURNAL_FILE: &str = "updates.jsonl";

/// File-backed course outline.
///
/// The outline lives in one JSON document; every update request is appended
/// to a JSON-lines journal in the same directory before it is applied.
#[derive(Debug)]
pub struct OutlineStore {
    path: PathBuf,
    journal_path: PathBuf,
    outline: CourseOutline,
}

impl OutlineStore {
    /// Returns the data directory: `data_dir` if given, else
    /// `~/.local/share/outline-settings/`.
    pub fn data_dir(data_dir: Option<PathBuf>) -> Result<PathBuf, StorageError> {
        match data_dir {
            Some(dir) => Ok(dir),
            None => Ok(dirs::data_dir()
                .ok_or(StorageError::NoDataDir)?
                .join(APP_DIR)),
        }
    }

    /// Opens `outline.json` in the data directory, creating the directory if
    /// it does not already exist.
    pub fn new(data_dir: Option<PathBuf>) -> Result<Self, StorageError> {
        let dir = Self::data_dir(data_dir)?;
        fs::create_dir_all(&dir)?;
        Self::with_path(dir.join(OUTLINE_FILE))
    }

    /// Opens the outline at `path`. A missing file reads as an empty outline.
    pub fn with_path(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let journal_path = path
            .parent()
            .map_or_else(|| PathBuf::from(JOURNAL_FILE), |dir| dir.join(JOURNAL_FILE));
        let outline = load_outline(&path)?;
        tracing::info!(
            path = %path.display(),
            items = outline.items.len(),
            "loaded outline"
        );
        Ok(Self {
            path,
            journal_path,
            outline,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn journal_path(&self) -> &Path {
        &self.journal_path
    }

    pub fn outline(&self) -> &CourseOutline {
        &self.outline
    }

    /// Writes the outline to disk, replacing the file.
    pub fn save(&self) -> Result<(), StorageError> {
        write_outline(&self.path, &self.outline)
    }

    /// Journals the request, applies it to the stored record and saves.
    ///
    /// The in-memory outline changes only once the updated outline has been
    /// written; a malformed value or a failed write leaves it untouched.
    pub fn apply_update(&mut self, locator: &str, payload: &Payload) -> Result<(), StorageError> {
        self.append_journal(&UpdateRequest::new(locator, payload.clone()))?;

        let mut updated = self.outline.clone();
        let item = updated
            .item_mut(locator)
            .ok_or_else(|| StorageError::UnknownBlock(locator.to_string()))?;
        apply_payload(item, payload)?;
        updated.refresh_ancestor_locks();

        write_outline(&self.path, &updated)?;
        self.outline = updated;
        Ok(())
    }

    fn append_journal(&self, request: &UpdateRequest) -> Result<(), StorageError> {
        let mut buf = BytesMut::new();
        JournalCodec.encode(request, &mut buf)?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.journal_path)?;
        file.write_all(&buf)?;
        Ok(())
    }

    /// Reads back every journaled request, oldest first.
    pub fn journal(&self) -> Result<Vec<UpdateRequest>, StorageError> {
        let mut buf = match fs::read(&self.journal_path) {
            Ok(bytes) => BytesMut::from(&bytes[..]),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let mut codec = JournalCodec;
        let mut requests = Vec::new();
        while let Some(request) = codec.decode_eof(&mut buf)? {
            requests.push(request);
        }
        Ok(requests)
    }
}

impl XBlockUpdater for OutlineStore {
    fn update_fields(&mut self, record: &XBlockInfo, payload: Payload, on_success: OnSave) {
        match self.apply_update(&record.id, &payload) {
            Ok(()) => {
                tracing::info!(locator = %record.id, "update applied");
                on_success();
            }
            Err(e) => tracing::error!(locator = %record.id, error = %e, "update failed"),
        }
    }
}

fn write_outline(path: &Path, outline: &CourseOutline) -> Result<(), StorageError> {
    if let Some(dir) = path.parent()
        && !dir.as_os_str().is_empty()
    {
        fs::create_dir_all(dir)?;
    }
    let file = fs::File::create(path)?;
    serde_json::to_writer_pretty(file, outline)?;
    Ok(())
}

fn load_outline(path: &Path) -> Result<CourseOutline, StorageError> {
    match fs::read_to_string(path) {
        Ok(text) => {
            let mut outline: CourseOutline = serde_json::from_str(&text)?;
            outline.refresh_ancestor_locks();
            Ok(outline)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::info!(path = %path.display(), "no outline file, starting empty");
            Ok(CourseOutline::default())
        }
        Err(e) => Err(e.into()),
    }
}
