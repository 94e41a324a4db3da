//! Plain-text corpus export and its index table.
//!
//! Each non-redirect document's plain text is written to `<root>/<bucket>/<n>.txt`, with
//! `bucket_size` documents per numbered bucket directory. `<root>/index.txt` maps every title
//! to its location:
//!
//! ```text
//! <title>\t<bucket>/<n>
//! ```

use crate::error::WikiGraphError;
use std::{
    collections::BTreeMap,
    fs::{self, File},
    io::{BufRead, BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

pub const INDEX_FILE: &str = "index.txt";

#[derive(Debug)]
pub struct TextCorpusWriter {
    root: PathBuf,
    bucket_size: usize,
    written: usize,
    index: BufWriter<File>,
}

impl TextCorpusWriter {
    pub fn create<P: AsRef<Path>>(
        root: P,
        bucket_size: usize,
    ) -> Result<TextCorpusWriter, WikiGraphError> {
        if bucket_size == 0 {
            return Err(WikiGraphError::Config(
                "corpus bucket size must be positive".to_string(),
            ));
        }
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        let index = BufWriter::new(File::create(root.join(INDEX_FILE))?);
        Ok(TextCorpusWriter {
            root,
            bucket_size,
            written: 0,
            index,
        })
    }

    /// Writes one document's text and returns its `<bucket>/<n>` location.
    pub fn write_document(&mut self, title: &str, text: &str) -> Result<String, WikiGraphError> {
        let bucket = self.written / self.bucket_size;
        let bucket_dir = self.root.join(bucket.to_string());
        if self.written % self.bucket_size == 0 {
            fs::create_dir_all(&bucket_dir)?;
        }
        let location = format!("{bucket}/{}", self.written);
        let mut file = BufWriter::new(File::create(bucket_dir.join(format!("{}.txt", self.written)))?);
        writeln!(file, "{text}")?;
        file.flush()?;
        writeln!(self.index, "{}\t{location}", title.replace(['\t', '\n'], " "))?;
        self.written += 1;
        Ok(location)
    }

    pub fn written(&self) -> usize {
        self.written
    }

    /// Flushes the index and returns the number of documents written.
    pub fn finish(mut self) -> Result<usize, WikiGraphError> {
        self.index.flush()?;
        tracing::info!(
            "Text corpus export done: {} documents under {:?}",
            self.written,
            self.root
        );
        Ok(self.written)
    }
}

/// Reads an index table, skipping and counting malformed lines.
pub fn read_index_table<R: BufRead>(
    reader: R,
) -> Result<(BTreeMap<String, String>, usize), WikiGraphError> {
    let mut index = BTreeMap::new();
    let mut malformed = 0;
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match line.split_once('\t') {
            Some((title, location)) if !title.is_empty() && !location.trim().is_empty() => {
                index.insert(title.to_string(), location.trim().to_string());
            }
            _ => {
                malformed += 1;
                tracing::warn!("Skipping malformed index table line {}", idx + 1);
            }
        }
    }
    Ok((index, malformed))
}

pub fn load_index<P: AsRef<Path>>(path: P) -> Result<BTreeMap<String, String>, WikiGraphError> {
    let (index, malformed) = read_index_table(BufReader::new(File::open(path)?))?;
    if malformed > 0 {
        tracing::warn!("Skipped {malformed} malformed index table line(s)");
    }
    Ok(index)
}
