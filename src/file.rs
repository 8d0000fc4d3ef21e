// src/file.rs

use std::{
    fs::{self, OpenOptions},
    io::{self, BufWriter, Write},
    path::Path,
};

use crate::csv::write_row;

pub fn ensure_directory(dir: &Path) -> io::Result<()> {
    if dir.exists() && !dir.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("Path exists but is not a directory: {}", dir.display()),
        ));
    }
    if !dir.exists() { fs::create_dir_all(dir)?; }
    Ok(())
}

fn ensure_parent(path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_directory(parent)?;
        }
    }
    Ok(())
}

/// Create `path` holding only the header row, unless it already exists.
/// Returns `true` when the file was created by this call.
pub fn create_with_header(path: &Path, header: &[&str], sep: char) -> io::Result<bool> {
    ensure_parent(path)?;
    let file = match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => return Ok(false),
        Err(e) => return Err(e),
    };
    let mut out = BufWriter::new(file);
    let header: Vec<String> = header.iter().map(|h| s!(*h)).collect();
    write_row(&mut out, &header, sep)?;
    out.flush()?;
    Ok(true)
}

/// Append rows to an existing CSV file (must be created already).
pub fn append_rows(
    path: &Path,
    rows: &[Vec<String>],
    sep: char,
) -> io::Result<()> {
    let file = OpenOptions::new().append(true).open(path)?;
    let mut out = BufWriter::new(file);
    for row in rows {
        write_row(&mut out, row, sep)?;
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_with_header_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("nested").join("a.csv");
        assert!(create_with_header(&p, &["x", "y"], ',').unwrap());
        append_rows(&p, &[vec![s!("1"), s!("2")]], ',').unwrap();
        assert!(!create_with_header(&p, &["x", "y"], ',').unwrap());
        assert_eq!(fs::read_to_string(&p).unwrap(), "x,y\n1,2\n");
    }

    #[test]
    fn ensure_directory_rejects_files() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("f");
        fs::write(&p, "x").unwrap();
        assert!(ensure_directory(&p).is_err());
    }
}
