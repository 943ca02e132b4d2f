use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::{Error, Result};
use crate::frame::DetectionSequence;

#[derive(Debug, Clone, PartialEq)]
pub enum CachePolicy {
    /// Always run detection, never touch the disk.
    Disabled,
    /// Load from the file. Missing or malformed files are fatal.
    Read(PathBuf),
    /// Run detection, then store the result.
    Write(PathBuf),
}

impl CachePolicy {
    pub fn new(path: Option<PathBuf>, read: bool) -> Self {
        match (path, read) {
            (Some(path), true) => CachePolicy::Read(path),
            (Some(path), false) => CachePolicy::Write(path),
            (None, _) => CachePolicy::Disabled,
        }
    }

    /// Detections from the cache, or from `detect` according to the policy.
    pub fn resolve<F>(&self, detect: F) -> Result<DetectionSequence>
    where
        F: FnOnce() -> Result<DetectionSequence>,
    {
        match self {
            CachePolicy::Disabled => detect(),
            CachePolicy::Read(path) => load(path),
            CachePolicy::Write(path) => {
                let detections = detect()?;
                store(path, &detections)?;
                Ok(detections)
            }
        }
    }
}

pub fn load<P: AsRef<Path>>(path: P) -> Result<DetectionSequence> {
    let path = path.as_ref();

    let read = || -> Result<DetectionSequence> {
        let file = File::open(path)?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    };

    let detections = read().map_err(|err| cache_error(path, err))?;
    info!("loaded {} frames of detections from {:?}", detections.len(), path);

    Ok(detections)
}

pub fn store<P: AsRef<Path>>(path: P, detections: &DetectionSequence) -> Result<()> {
    let path = path.as_ref();

    let write = || -> Result<()> {
        let dir = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir)?;

        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        {
            let mut writer = BufWriter::new(tmp.as_file_mut());
            serde_json::to_writer(&mut writer, detections)?;
            writer.flush()?;
        }
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|err| Error::Io(err.error))?;

        Ok(())
    };

    write().map_err(|err| cache_error(path, err))?;
    info!("stored {} frames of detections in {:?}", detections.len(), path);

    Ok(())
}

fn cache_error(path: &Path, source: Error) -> Error {
    Error::Cache {
        path: path.to_path_buf(),
        source: Box::new(source),
    }
}
