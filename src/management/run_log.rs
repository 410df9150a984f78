use std::{
    io,
    path::{Path, PathBuf},
};

use async_fs::File;
use chrono::Local;
use futures::AsyncWriteExt;

use crate::utils;

/// Plain-text record of one run, one line per processed source track.
pub struct RunLog {
    path: PathBuf,
    file: File,
}

impl RunLog {
    /// Creates `Import <timestamp>.txt` inside `dir`, creating `dir` if
    /// needed.
    pub async fn create(dir: &Path) -> io::Result<Self> {
        async_fs::create_dir_all(dir).await?;
        let path = dir.join(utils::run_log_filename(&Local::now()));
        let file = File::create(&path).await?;
        Ok(RunLog { path, file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends `line` and flushes, so the file is complete even if the run
    /// is aborted.
    pub async fn write_line(&mut self, line: &str) -> io::Result<()> {
        self.file.write_all(line.as_bytes()).await?;
        self.file.write_all(b"\n").await?;
        self.file.flush().await
    }
}
