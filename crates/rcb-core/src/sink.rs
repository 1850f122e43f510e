use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::{
    fs::{File, OpenOptions},
    io::AsyncWriteExt,
};

/// Destination for drained worker output lines.
#[async_trait]
pub trait LineSink: Send {
    /// Persist one line; the terminator is added by the sink.
    async fn write_line(&mut self, line: &str) -> std::io::Result<()>;
}

/// Append-mode log file, one newline-terminated record per line.
///
/// Every record is handed to the file in a single write and flushed before the next line is taken.
pub struct DurableLog {
    path: PathBuf,
    file: File,
}

impl DurableLog {
    pub async fn open(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await?;
        Ok(Self { path, file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn close(mut self) -> std::io::Result<()> {
        self.file.flush().await?;
        self.file.sync_all().await
    }
}

#[async_trait]
impl LineSink for DurableLog {
    async fn write_line(&mut self, line: &str) -> std::io::Result<()> {
        let mut record = String::with_capacity(line.len() + 1);
        record.push_str(line);
        record.push('\n');
        self.file.write_all(record.as_bytes()).await?;
        self.file.flush().await
    }
}

#[cfg(test)]
#[async_trait]
impl LineSink for Vec<String> {
    async fn write_line(&mut self, line: &str) -> std::io::Result<()> {
        self.push(line.to_string());
        Ok(())
    }
}
