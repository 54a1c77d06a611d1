use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Read-all / write-all access to the save file.
///
/// The file holds the encoding produced by [`crate::codec`]; this type only
/// moves text in and out of it.
#[derive(Debug, Clone)]
pub struct Storage {
    path: PathBuf,
}

impl Storage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the whole save file.
    ///
    /// A missing file (and its directory) is created empty first.
    pub fn read_all(&self) -> Result<String> {
        if !self.path.exists() {
            if let Some(parent) = self.path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)?;
                }
            }
            OpenOptions::new().create(true).append(true).open(&self.path)?;
            log::info!("Created empty save file at {}", self.path.display());
            return Ok(String::new());
        }

        let mut f = OpenOptions::new().read(true).open(&self.path)?;
        let mut s = String::new();
        f.read_to_string(&mut s)?;
        Ok(s)
    }

    /// Writes `text` to the save file, appending or truncating first.
    pub fn write(&self, text: &str, append: bool) -> Result<()> {
        let mut f = OpenOptions::new()
            .create(true)
            .write(true)
            .append(append)
            .truncate(!append)
            .open(&self.path)?;
        f.write_all(text.as_bytes())?;
        Ok(())
    }

    /// Appends `text`, first ending a last line that lacks its newline.
    pub fn append(&self, text: &str) -> Result<()> {
        if self.ends_mid_line()? {
            log::warn!("{} did not end with a newline", self.path.display());
            return self.write(&format!("\n{}", text), true);
        }
        self.write(text, true)
    }

    fn ends_mid_line(&self) -> Result<bool> {
        let mut f = match File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(e.into()),
        };
        if f.metadata()?.len() == 0 {
            return Ok(false);
        }
        f.seek(SeekFrom::End(-1))?;
        let mut last = [0u8; 1];
        f.read_exact(&mut last)?;
        Ok(last[0] != b'\n')
    }

    /// Erases the file, then writes `text`.
    ///
    /// Not atomic: a crash between the two steps leaves an empty file.
    pub fn rewrite(&self, text: &str) -> Result<()> {
        self.write("", false)?;
        self.write(text, true)
    }

    /// Moves an unreadable save file aside to `<name>.corrupt`.
    ///
    /// Earlier quarantined files are kept: later ones become `<name>.corrupt.1`,
    /// `<name>.corrupt.2` and so on.
    pub fn quarantine(&self) -> Result<PathBuf> {
        let mut base = self.path.file_name().unwrap_or_default().to_os_string();
        base.push(".corrupt");
        let mut target = self.path.with_file_name(&base);
        let mut n = 0;
        while target.exists() {
            n += 1;
            let mut name = base.clone();
            name.push(format!(".{}", n));
            target = self.path.with_file_name(name);
        }
        fs::rename(&self.path, &target)?;
        log::warn!(
            "Moved unreadable save file {} to {}",
            self.path.display(),
            target.display()
        );
        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_created_empty() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::new(dir.path().join("nested").join("tasks.txt"));
        assert_eq!(storage.read_all().unwrap(), "");
        assert!(storage.path().exists());
    }

    #[test]
    fn test_append_and_rewrite() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::new(dir.path().join("tasks.txt"));
        storage.append("one\n").unwrap();
        storage.append("two\n").unwrap();
        assert_eq!(storage.read_all().unwrap(), "one\ntwo\n");

        storage.rewrite("three\n").unwrap();
        assert_eq!(storage.read_all().unwrap(), "three\n");

        storage.write("", false).unwrap();
        assert_eq!(storage.read_all().unwrap(), "");
    }

    #[test]
    fn test_quarantine() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::new(dir.path().join("tasks.txt"));
        storage.append("garbage\n").unwrap();
        let moved = storage.quarantine().unwrap();
        assert_eq!(moved, dir.path().join("tasks.txt.corrupt"));
        assert!(!storage.path().exists());
        assert_eq!(fs::read_to_string(moved).unwrap(), "garbage\n");

        storage.append("more garbage\n").unwrap();
        let moved_again = storage.quarantine().unwrap();
        assert_eq!(moved_again, dir.path().join("tasks.txt.corrupt.1"));
        assert_eq!(
            fs::read_to_string(dir.path().join("tasks.txt.corrupt")).unwrap(),
            "garbage\n"
        );
        assert_eq!(fs::read_to_string(moved_again).unwrap(), "more garbage\n");
    }

    #[test]
    fn test_append_after_unterminated_line() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::new(dir.path().join("tasks.txt"));
        fs::write(storage.path(), "1. [T][ ] a").unwrap();
        storage.append("2. [T][ ] b\n").unwrap();
        assert_eq!(storage.read_all().unwrap(), "1. [T][ ] a\n2. [T][ ] b\n");

        storage.append("3. [T][ ] c\n").unwrap();
        assert_eq!(
            storage.read_all().unwrap(),
            "1. [T][ ] a\n2. [T][ ] b\n3. [T][ ] c\n"
        );
    }
}
