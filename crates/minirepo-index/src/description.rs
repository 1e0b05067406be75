//! Reading `DESCRIPTION` out of package archives.
//!
//! Source tarballs and macOS binaries are gzip-compressed tar files; Windows
//! binaries are zip files. Every archive holds `<package>/DESCRIPTION`.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use flate2::read::GzDecoder;
use minirepo_layout::IndexFormat;

use crate::dcf::{parse_dcf, DcfRecord};
use crate::error::{IndexError, Result};

/// Package name encoded in an artifact file name (`<name>_<version><ext>`).
pub fn package_name_from_file(path: &Path) -> Option<&str> {
    let file_name = path.file_name()?.to_str()?;
    let (name, _) = file_name.split_once('_')?;
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

/// Extract and parse the `DESCRIPTION` record from an artifact.
pub fn read_description(path: &Path, format: IndexFormat) -> Result<DcfRecord> {
    let package = package_name_from_file(path).ok_or_else(|| IndexError::Archive {
        path: path.to_path_buf(),
        detail: "file name is not <package>_<version>".to_string(),
    })?;
    let member = format!("{package}/DESCRIPTION");

    let text = match format {
        IndexFormat::WinBinary => read_zip_member(path, &member)?,
        IndexFormat::Source | IndexFormat::MacBinary => read_tar_gz_member(path, &member)?,
    };
    let Some(text) = text else {
        return Err(IndexError::MissingDescription {
            path: path.to_path_buf(),
            package: package.to_string(),
        });
    };

    let record = parse_dcf(&text)?.into_iter().next().ok_or_else(|| {
        IndexError::MissingDescription {
            path: path.to_path_buf(),
            package: package.to_string(),
        }
    })?;

    for field in ["Package", "Version"] {
        if record.get(field).is_none() {
            return Err(IndexError::MissingField {
                path: path.to_path_buf(),
                field,
            });
        }
    }
    Ok(record)
}

fn read_tar_gz_member(path: &Path, member: &str) -> Result<Option<String>> {
    let file = File::open(path)?;
    let mut archive = tar::Archive::new(GzDecoder::new(file));
    let entries = archive.entries().map_err(|e| archive_error(path, e))?;

    for entry in entries {
        let mut entry = entry.map_err(|e| archive_error(path, e))?;
        let is_member = {
            let entry_path = entry.path().map_err(|e| archive_error(path, e))?;
            entry_path.to_string_lossy().trim_start_matches("./") == member
        };
        if !is_member {
            continue;
        }
        let mut text = String::new();
        entry
            .read_to_string(&mut text)
            .map_err(|e| archive_error(path, e))?;
        return Ok(Some(text));
    }
    Ok(None)
}

fn read_zip_member(path: &Path, member: &str) -> Result<Option<String>> {
    let file = File::open(path)?;
    let mut archive = zip::ZipArchive::new(file)?;
    let mut entry = match archive.by_name(member) {
        Ok(entry) => entry,
        Err(zip::result::ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let mut text = String::new();
    entry
        .read_to_string(&mut text)
        .map_err(|e| archive_error(path, e))?;
    Ok(Some(text))
}

fn archive_error(path: &Path, e: std::io::Error) -> IndexError {
    IndexError::Archive {
        path: path.to_path_buf(),
        detail: e.to_string(),
    }
}
