//! Document records and the streaming readers that yield them from a dump.
//!
//! A dump is either a single JSON array of `{"title": .., "text": ..}` objects (the namuwiki
//! export format) or JSON Lines with one object per line. A directory input is treated as a
//! set of shards (`*.json`, `*.jsonl`) read in sorted path order. Nothing is materialized as a
//! whole: array dumps are decoded on a background thread and handed over through a bounded
//! channel.
//!
//! Records missing `title` or `text` come out as [`WikiGraphError::MalformedInput`] items so
//! batch consumers can count and skip them.

use crate::error::WikiGraphError;
use serde::{
    de::{SeqAccess, Visitor},
    Deserialize, Deserializer as _, Serialize,
};
use std::{
    collections::VecDeque,
    fmt,
    fs::File,
    io::{BufRead, BufReader, Read},
    path::{Path, PathBuf},
    sync::mpsc::{sync_channel, Receiver, SyncSender},
    thread,
};
use walkdir::WalkDir;

/// Records buffered between the decoder thread and the consumer.
const CHANNEL_CAPACITY: usize = 1024;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub title: String,
    pub text: String,
}

impl Document {
    pub fn new<T: Into<String>, U: Into<String>>(title: T, text: U) -> Document {
        Document {
            title: title.into(),
            text: text.into(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawDocument {
    title: Option<String>,
    text: Option<String>,
}

impl RawDocument {
    fn into_document(self, position: usize) -> Result<Document, WikiGraphError> {
        match (self.title, self.text) {
            (Some(title), Some(text)) => Ok(Document { title, text }),
            (None, _) => Err(WikiGraphError::MalformedInput(format!(
                "record {position} is missing `title`"
            ))),
            (Some(title), None) => Err(WikiGraphError::MalformedInput(format!(
                "record {position} ({title}) is missing `text`"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DumpFormat {
    JsonArray,
    JsonLines,
}

impl DumpFormat {
    pub fn from_path(path: &Path) -> DumpFormat {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("jsonl") | Some("ndjson") => DumpFormat::JsonLines,
            _ => DumpFormat::JsonArray,
        }
    }
}

type DocumentIter = Box<dyn Iterator<Item = Result<Document, WikiGraphError>> + Send>;

/// Lazily yields documents from one or more dump files.
pub struct DocumentReader {
    shards: VecDeque<PathBuf>,
    current: Option<DocumentIter>,
}

impl fmt::Debug for DocumentReader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentReader")
            .field("pending_shards", &self.shards)
            .field("reading", &self.current.is_some())
            .finish()
    }
}

impl DocumentReader {
    /// Opens a dump file or a directory of dump shards.
    ///
    /// A missing path, or a directory without any shard, is a fatal [`WikiGraphError::NotFound`].
    pub fn open<P: AsRef<Path>>(path: P) -> Result<DocumentReader, WikiGraphError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(WikiGraphError::NotFound(format!(
                "document dump {} does not exist",
                path.display()
            )));
        }
        let mut shards = Vec::new();
        if path.is_dir() {
            for entry in WalkDir::new(path).sort_by_file_name() {
                let entry = entry?;
                let is_shard = entry.file_type().is_file()
                    && matches!(
                        entry.path().extension().and_then(|ext| ext.to_str()),
                        Some("json") | Some("jsonl") | Some("ndjson")
                    );
                if is_shard {
                    shards.push(entry.into_path());
                }
            }
            if shards.is_empty() {
                return Err(WikiGraphError::NotFound(format!(
                    "no *.json or *.jsonl shards under {}",
                    path.display()
                )));
            }
        } else {
            shards.push(path.to_path_buf());
        }
        tracing::debug!("Reading {} dump shard(s) from {:?}", shards.len(), path);
        Ok(DocumentReader {
            shards: shards.into(),
            current: None,
        })
    }

    pub fn from_reader<R: Read + Send + 'static>(reader: R, format: DumpFormat) -> DocumentReader {
        DocumentReader {
            shards: VecDeque::new(),
            current: Some(decode(reader, format)),
        }
    }

    fn open_shard(path: &Path) -> Result<DocumentIter, WikiGraphError> {
        tracing::debug!("Opening dump shard {:?}", path);
        let file = File::open(path)?;
        Ok(decode(file, DumpFormat::from_path(path)))
    }
}

impl Iterator for DocumentReader {
    type Item = Result<Document, WikiGraphError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(current) = self.current.as_mut() {
                if let Some(item) = current.next() {
                    return Some(item);
                }
                self.current = None;
            }
            let shard = self.shards.pop_front()?;
            match Self::open_shard(&shard) {
                Ok(iter) => self.current = Some(iter),
                Err(e) => return Some(Err(e)),
            }
        }
    }
}

fn decode<R: Read + Send + 'static>(reader: R, format: DumpFormat) -> DocumentIter {
    match format {
        DumpFormat::JsonLines => Box::new(json_lines(BufReader::new(reader))),
        DumpFormat::JsonArray => Box::new(json_array(reader).into_iter()),
    }
}

fn json_lines<R: BufRead + Send>(
    reader: R,
) -> impl Iterator<Item = Result<Document, WikiGraphError>> + Send {
    reader
        .lines()
        .enumerate()
        .filter_map(|(idx, line)| match line {
            Ok(line) if line.trim().is_empty() => None,
            Ok(line) => Some(
                serde_json::from_str::<RawDocument>(&line)
                    .map_err(|e| {
                        WikiGraphError::MalformedInput(format!("line {}: {e}", idx + 1))
                    })
                    .and_then(|raw| raw.into_document(idx + 1)),
            ),
            Err(e) => Some(Err(e.into())),
        })
}

struct DocumentSeqVisitor<'a> {
    tx: &'a SyncSender<Result<Document, WikiGraphError>>,
}

impl<'de> Visitor<'de> for DocumentSeqVisitor<'_> {
    type Value = usize;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a JSON array of {title, text} records")
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<usize, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut position = 0;
        while let Some(raw) = seq.next_element::<RawDocument>()? {
            position += 1;
            if self.tx.send(raw.into_document(position)).is_err() {
                // Consumer hung up; stop decoding.
                break;
            }
        }
        Ok(position)
    }
}

/// Decodes a JSON array dump on a background thread, one element at a time.
fn json_array<R: Read + Send + 'static>(reader: R) -> Receiver<Result<Document, WikiGraphError>> {
    let (tx, rx) = sync_channel(CHANNEL_CAPACITY);
    thread::spawn(move || {
        let mut de = serde_json::Deserializer::from_reader(BufReader::new(reader));
        match de.deserialize_seq(DocumentSeqVisitor { tx: &tx }) {
            Ok(count) => tracing::debug!("Decoded {count} records from JSON array dump"),
            Err(e) => {
                let stopped = tx.send(Err(WikiGraphError::Serialization(format!(
                    "JSON array dump decoding stopped: {e}"
                ))));
                if stopped.is_ok() {
                    tracing::warn!("JSON array dump decoding stopped: {e}");
                }
            }
        }
    });
    rx
}
