//! Sequential frame names
//!
//! Frame files are first named after their acquisition month, so the
//! lexicographic order of the directory listing is the chronological order.

use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{NightError, NightResult};

/// Name of the `index`-th frame, counting from 1
pub fn frame_file_name(index: usize) -> String {
    format!("frame_{:03}.tif", index)
}

/// The `.tif` files of `directory`, in lexicographic order
pub fn list_frames(directory: &Path) -> NightResult<Vec<PathBuf>> {
    let context = || format!("Failed to list frames in {}", directory.display());
    let mut names = Vec::new();
    for entry in fs::read_dir(directory).map_err(|e| NightError::io(context(), e))? {
        let path = entry.map_err(|e| NightError::io(context(), e))?.path();
        if path.is_file() && path.extension().map_or(false, |ext| ext == "tif") {
            names.push(path);
        }
    }
    names.sort();
    Ok(names)
}

/// Renames the `.tif` files of a directory to `frame_001.tif`, `frame_002.tif`, ...
pub struct SequenceRelabeler {
    directory: PathBuf,
}

impl SequenceRelabeler {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        SequenceRelabeler { directory: directory.into() }
    }

    /// Renames every frame and returns the new paths in order
    ///
    /// File contents are untouched.
    pub fn relabel(&self) -> NightResult<Vec<PathBuf>> {
        let frames = list_frames(&self.directory)?;

        // Two passes so a source name never collides with a target name
        let mut staged = Vec::with_capacity(frames.len());
        for (i, path) in frames.iter().enumerate() {
            let temp = self.directory.join(format!(".relabel_{:06}.tmp", i + 1));
            rename(path, &temp)?;
            staged.push(temp);
        }

        let mut renamed = Vec::with_capacity(staged.len());
        for (i, temp) in staged.iter().enumerate() {
            let target = self.directory.join(frame_file_name(i + 1));
            rename(temp, &target)?;
            debug!("{} -> {}", frames[i].display(), target.display());
            renamed.push(target);
        }
        Ok(renamed)
    }
}

fn rename(from: &Path, to: &Path) -> NightResult<()> {
    fs::rename(from, to).map_err(|e| {
        NightError::io(format!("Failed to rename {} to {}", from.display(), to.display()), e)
    })
}
