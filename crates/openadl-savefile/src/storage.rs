//! Where save files live
//!
//! The engine only ever addresses save files by name. `SaveFileManager` maps
//! those names to storage: a directory on disk for real use, or memory for
//! tools and tests.
//!
//! Name patterns accept `*` (any run), `?` (any one character) and `#` (one
//! ASCII digit), matched case-insensitively. A backslash makes the next
//! character literal.

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Cursor, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

/// Storage backend for save files
pub trait SaveFileManager: Send + Sync {
    /// Open a save for reading; `Ok(None)` if it does not exist
    fn open_for_loading(&self, name: &str) -> io::Result<Option<Box<dyn Read>>>;

    /// Create or truncate a save; data is committed on `flush`
    fn open_for_saving(&self, name: &str) -> io::Result<Box<dyn Write>>;

    /// Names of all saves matching `pattern`, in storage order
    fn list_savefiles(&self, pattern: &str) -> io::Result<Vec<String>>;

    /// Delete a save; `Ok(false)` if there was nothing to delete
    fn remove_savefile(&self, name: &str) -> io::Result<bool>;
}

/// Match a save file name against a pattern
pub fn matches_pattern(pattern: &str, name: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let name: Vec<char> = name.chars().collect();

    let (mut p, mut n) = (0, 0);
    // Position after the last `*` and the name index it was tried at
    let mut backtrack: Option<(usize, usize)> = None;

    while n < name.len() {
        let (step, width) = match pattern.get(p) {
            Some('*') => {
                backtrack = Some((p + 1, n));
                p += 1;
                continue;
            }
            Some('?') => (true, 1),
            Some('#') => (name[n].is_ascii_digit(), 1),
            Some('\\') => match pattern.get(p + 1) {
                Some(c) => (c.eq_ignore_ascii_case(&name[n]), 2),
                None => (false, 1),
            },
            Some(c) => (c.eq_ignore_ascii_case(&name[n]), 1),
            None => (false, 1),
        };
        if step {
            p += width;
            n += 1;
        } else if let Some((bp, bn)) = backtrack {
            p = bp;
            n = bn + 1;
            backtrack = Some((bp, bn + 1));
        } else {
            return false;
        }
    }

    pattern[p..].iter().all(|&c| c == '*')
}

/// Escape a name so every character of it matches literally
pub fn escape_pattern(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        if matches!(c, '*' | '?' | '#' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

// ---------------------------------------------------------------------------
// Directory backend
// ---------------------------------------------------------------------------

/// Save files stored as plain files in one directory
#[derive(Debug, Clone)]
pub struct DirSaveFileManager {
    dir: PathBuf,
}

impl DirSaveFileManager {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl SaveFileManager for DirSaveFileManager {
    fn open_for_loading(&self, name: &str) -> io::Result<Option<Box<dyn Read>>> {
        match File::open(self.dir.join(name)) {
            Ok(file) => Ok(Some(Box::new(BufReader::new(file)))),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn open_for_saving(&self, name: &str) -> io::Result<Box<dyn Write>> {
        fs::create_dir_all(&self.dir)?;
        let file = File::create(self.dir.join(name))?;
        Ok(Box::new(BufWriter::new(file)))
    }

    fn list_savefiles(&self, pattern: &str) -> io::Result<Vec<String>> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry in {}: {}", self.dir.display(), e);
                    continue;
                }
            };
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            if !matches_pattern(pattern, &name) {
                continue;
            }
            // Follows symlinks, like File::open does when the save is loaded
            match fs::metadata(entry.path()) {
                Ok(meta) if meta.is_file() => names.push(name),
                Ok(_) => {}
                Err(e) => tracing::warn!("Skipping save file '{}': {}", name, e),
            }
        }
        Ok(names)
    }

    fn remove_savefile(&self, name: &str) -> io::Result<bool> {
        match fs::remove_file(self.dir.join(name)) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
        }
    }
}

// ---------------------------------------------------------------------------
// In-memory backend
// ---------------------------------------------------------------------------

type MemoryFiles = Arc<Mutex<Vec<(String, Vec<u8>)>>>;

/// Save files kept in memory, listed in insertion order
#[derive(Debug, Clone, Default)]
pub struct MemorySaveFileManager {
    files: MemoryFiles,
}

impl MemorySaveFileManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store raw bytes under `name`, replacing any existing save
    pub fn insert(&self, name: &str, data: Vec<u8>) {
        store(&mut lock(&self.files), name, data);
    }

    /// Raw bytes of a save
    pub fn contents(&self, name: &str) -> Option<Vec<u8>> {
        lock(&self.files)
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, data)| data.clone())
    }
}

fn lock(files: &MemoryFiles) -> MutexGuard<'_, Vec<(String, Vec<u8>)>> {
    // A panic while holding the lock cannot leave the Vec half-updated
    files.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn store(files: &mut Vec<(String, Vec<u8>)>, name: &str, data: Vec<u8>) {
    match files.iter_mut().find(|(n, _)| n == name) {
        Some((_, existing)) => *existing = data,
        None => files.push((name.to_string(), data)),
    }
}

/// Buffers writes and commits them to the shared map on flush and drop
struct MemoryWriter {
    name: String,
    buf: Vec<u8>,
    files: MemoryFiles,
}

impl Write for MemoryWriter {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        store(&mut lock(&self.files), &self.name, self.buf.clone());
        Ok(())
    }
}

impl Drop for MemoryWriter {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}

impl SaveFileManager for MemorySaveFileManager {
    fn open_for_loading(&self, name: &str) -> io::Result<Option<Box<dyn Read>>> {
        Ok(self
            .contents(name)
            .map(|data| Box::new(Cursor::new(data)) as Box<dyn Read>))
    }

    fn open_for_saving(&self, name: &str) -> io::Result<Box<dyn Write>> {
        Ok(Box::new(MemoryWriter {
            name: name.to_string(),
            buf: Vec::new(),
            files: Arc::clone(&self.files),
        }))
    }

    fn list_savefiles(&self, pattern: &str) -> io::Result<Vec<String>> {
        Ok(lock(&self.files)
            .iter()
            .filter(|(n, _)| matches_pattern(pattern, n))
            .map(|(n, _)| n.clone())
            .collect())
    }

    fn remove_savefile(&self, name: &str) -> io::Result<bool> {
        let mut files = lock(&self.files);
        let before = files.len();
        files.retain(|(n, _)| n != name);
        Ok(files.len() != before)
    }
}
