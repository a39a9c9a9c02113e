//! Tarball extraction with provider root-directory rewriting.
//!
//! Hosting providers wrap every archive in a synthetic root folder whose name
//! is unique per download. Extraction rewrites that folder name to the
//! caller's install path, creates parent directories on demand, and tracks
//! which directories it created so the import scan can walk them afterwards.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use tar::Archive;

use crate::error::{FetchError, Result};

/// Unpack a gzip-compressed tar stream into `install_path`.
///
/// The install path is wiped and recreated first: extraction always produces
/// a clean replacement, never a merge. Returns every distinct parent
/// directory created, in creation order.
///
/// Entries whose rewritten path contains the substring "example" are skipped
/// entirely unless `include_examples` is set.
pub fn extract_tarball(
    data: &[u8],
    install_path: &Path,
    include_examples: bool,
) -> Result<Vec<PathBuf>> {
    if install_path.exists() {
        fs::remove_dir_all(install_path)?;
    }
    fs::create_dir_all(install_path)?;

    let decoder = GzDecoder::new(data);
    let mut archive = Archive::new(decoder);

    let install_str = install_path.to_string_lossy().into_owned();

    // Synthetic root folder name generated by the provider, captured from the
    // first file entry and used for every subsequent rewrite.
    let mut auto_path = String::new();
    let mut dirs: Vec<PathBuf> = Vec::new();

    for entry in archive
        .entries()
        .map_err(|e| FetchError::Archive(format!("failed to read tar stream: {}", e)))?
    {
        let mut entry =
            entry.map_err(|e| FetchError::Archive(format!("failed to read tar entry: {}", e)))?;

        // Directories are created implicitly from file parents, never from
        // explicit directory entries.
        if !entry.header().entry_type().is_file() {
            continue;
        }

        let raw = String::from_utf8_lossy(&entry.path_bytes()).into_owned();
        if raw.ends_with('/') {
            continue;
        }

        if auto_path.is_empty() {
            let idx = raw.find('/').ok_or_else(|| {
                FetchError::Archive(format!("entry {} is not under an archive root folder", raw))
            })?;
            auto_path = raw[..idx].to_string();
            log::debug!("archive root folder: {}", auto_path);
        }

        // Only the first occurrence is replaced. The provider's archive
        // layout puts the root folder name exactly once as a true prefix;
        // a later segment that repeats the name must stay untouched.
        let abs = raw.replacen(&auto_path, &install_str, 1);

        if !include_examples && abs.contains("example") {
            log::debug!("skipping example entry {}", raw);
            continue;
        }

        let dest = PathBuf::from(&abs);
        if let Some(dir) = dest.parent() {
            if !dirs.iter().any(|d| d == dir) {
                fs::create_dir_all(dir)?;
                dirs.push(dir.to_path_buf());
            }
        }

        let declared = entry
            .header()
            .size()
            .map_err(|e| FetchError::Archive(format!("bad size for {}: {}", raw, e)))?;

        let mut buf = Vec::with_capacity(declared as usize);
        entry.read_to_end(&mut buf)?;
        if buf.len() as u64 != declared {
            return Err(FetchError::Archive(format!(
                "short read for {}: got {} of {} bytes",
                raw,
                buf.len(),
                declared
            )));
        }

        fs::write(&dest, &buf)?;
    }

    Ok(dirs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use tempfile::TempDir;

    enum Entry<'a> {
        File(&'a str, &'a [u8]),
        Dir(&'a str),
    }

    fn make_targz(entries: &[Entry<'_>]) -> Vec<u8> {
        let encoder = GzEncoder::new(Vec::new(), Compression::default());
        let mut tar = tar::Builder::new(encoder);

        for entry in entries {
            match entry {
                Entry::File(path, data) => {
                    let mut header = tar::Header::new_gnu();
                    header.set_path(path).unwrap();
                    header.set_size(data.len() as u64);
                    header.set_cksum();
                    tar.append(&header, *data).unwrap();
                }
                Entry::Dir(path) => {
                    let mut header = tar::Header::new_gnu();
                    header.set_path(path).unwrap();
                    header.set_entry_type(tar::EntryType::Directory);
                    header.set_size(0);
                    header.set_cksum();
                    tar.append(&header, &[] as &[u8]).unwrap();
                }
            }
        }

        tar.into_inner().unwrap().finish().unwrap()
    }

    #[test]
    fn test_extract_rewrites_root_folder() {
        let temp = TempDir::new().unwrap();
        let install = temp.path().join("repo");

        let data = make_targz(&[
            Entry::File("owner-repo-1a2b3c/main.go", b"package main\n"),
            Entry::File("owner-repo-1a2b3c/sub/lib.go", b"package sub\n"),
        ]);

        let dirs = extract_tarball(&data, &install, false).unwrap();

        assert_eq!(
            fs::read(install.join("main.go")).unwrap(),
            b"package main\n"
        );
        assert_eq!(
            fs::read(install.join("sub/lib.go")).unwrap(),
            b"package sub\n"
        );
        assert_eq!(dirs, vec![install.clone(), install.join("sub")]);
    }

    #[test]
    fn test_extract_replaces_only_first_occurrence() {
        let temp = TempDir::new().unwrap();
        let install = temp.path().join("repo");

        // The root folder name recurs as a later path component; the later
        // occurrence must survive the rewrite.
        let data = make_targz(&[Entry::File(
            "pkg-1a2b3c/src/pkg-1a2b3c/deep.go",
            b"package deep\n",
        )]);

        extract_tarball(&data, &install, false).unwrap();

        assert_eq!(
            fs::read(install.join("src/pkg-1a2b3c/deep.go")).unwrap(),
            b"package deep\n"
        );
    }

    #[test]
    fn test_extract_excludes_examples_by_default() {
        let temp = TempDir::new().unwrap();
        let install = temp.path().join("repo");

        let data = make_targz(&[
            Entry::File("root-abc/lib.go", b"package lib\n"),
            Entry::File("root-abc/examples/demo.go", b"package main\n"),
        ]);

        let dirs = extract_tarball(&data, &install, false).unwrap();

        assert!(install.join("lib.go").exists());
        assert!(!install.join("examples").exists());
        assert!(!dirs.iter().any(|d| d.ends_with("examples")));
    }

    #[test]
    fn test_extract_includes_examples_when_requested() {
        let temp = TempDir::new().unwrap();
        let install = temp.path().join("repo");

        let data = make_targz(&[
            Entry::File("root-abc/lib.go", b"package lib\n"),
            Entry::File("root-abc/examples/demo.go", b"package main\n"),
        ]);

        extract_tarball(&data, &install, true).unwrap();

        assert_eq!(
            fs::read(install.join("examples/demo.go")).unwrap(),
            b"package main\n"
        );
    }

    #[test]
    fn test_extract_ignores_directory_entries() {
        let temp = TempDir::new().unwrap();
        let install = temp.path().join("repo");

        let data = make_targz(&[
            Entry::Dir("root-abc/"),
            Entry::Dir("root-abc/sub/"),
            Entry::Dir("root-abc/sub/deeper/"),
        ]);

        let dirs = extract_tarball(&data, &install, false).unwrap();

        assert!(dirs.is_empty());
        assert_eq!(fs::read_dir(&install).unwrap().count(), 0);
    }

    #[test]
    fn test_extract_records_each_parent_once() {
        let temp = TempDir::new().unwrap();
        let install = temp.path().join("repo");

        let data = make_targz(&[
            Entry::File("root-abc/sub/a.go", b"a"),
            Entry::File("root-abc/sub/b.go", b"b"),
            Entry::File("root-abc/sub/c.go", b"c"),
        ]);

        let dirs = extract_tarball(&data, &install, false).unwrap();

        assert_eq!(dirs, vec![install.join("sub")]);
    }

    #[test]
    fn test_extract_wipes_previous_contents() {
        let temp = TempDir::new().unwrap();
        let install = temp.path().join("repo");

        fs::create_dir_all(install.join("stale")).unwrap();
        fs::write(install.join("stale/old.go"), b"old").unwrap();

        let data = make_targz(&[Entry::File("root-abc/fresh.go", b"fresh")]);
        extract_tarball(&data, &install, false).unwrap();

        assert!(!install.join("stale").exists());
        assert!(install.join("fresh.go").exists());
    }

    #[test]
    fn test_extract_rejects_entry_at_archive_root() {
        let temp = TempDir::new().unwrap();
        let install = temp.path().join("repo");

        let data = make_targz(&[Entry::File("loose.go", b"package loose\n")]);

        let result = extract_tarball(&data, &install, false);
        assert!(matches!(result, Err(FetchError::Archive(_))));
    }

    #[test]
    fn test_extract_invalid_gzip() {
        let temp = TempDir::new().unwrap();
        let install = temp.path().join("repo");

        let result = extract_tarball(b"definitely not a gzip stream", &install, false);
        assert!(result.is_err());
    }
}
