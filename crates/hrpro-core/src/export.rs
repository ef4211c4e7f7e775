// CSV export of grouping results.
//
// Output is UTF-8 with a leading byte-order mark so spreadsheet tools pick
// the right encoding. The header row is written bare; every data field is
// quoted.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use thiserror::Error;
use tracing::info;

use crate::grouping::Group;
use crate::labels::Locale;

pub const UTF8_BOM: &str = "\u{feff}";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("no groups to export")]
    NoGroups,

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("write error: {0}")]
    Write(#[from] std::io::Error),

    #[error("failed to create {path}: {source}")]
    Create {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Write `groups` as `Group,Name` rows, one per member.
pub fn write_groups_csv<W: Write>(
    groups: &[Group],
    locale: Locale,
    mut writer: W,
) -> Result<(), ExportError> {
    let [group_col, name_col] = locale.export_header();
    writeln!(writer, "{UTF8_BOM}{group_col},{name_col}")?;

    let mut csv_writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);

    for group in groups {
        for member in &group.members {
            csv_writer.write_record([group.name.as_str(), member.name.as_str()])?;
        }
    }
    csv_writer.flush()?;
    Ok(())
}

/// Render the export into a string (BOM included).
pub fn groups_to_csv_string(groups: &[Group], locale: Locale) -> Result<String, ExportError> {
    let mut buf = Vec::new();
    write_groups_csv(groups, locale, &mut buf)?;
    // Everything written above came from `&str`s.
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// `groups_2026-10-19.csv` style file name for `date`.
pub fn export_file_name(locale: Locale, date: NaiveDate) -> String {
    format!("{}_{}.csv", locale.export_prefix(), date.format("%Y-%m-%d"))
}

/// The user's download directory, or the working directory when the
/// platform has none.
pub fn default_export_dir() -> PathBuf {
    directories::UserDirs::new()
        .and_then(|dirs| dirs.download_dir().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Write the export file for `date` into `dir`, returning its path.
pub fn export_to_dir(
    dir: &Path,
    groups: &[Group],
    locale: Locale,
    date: NaiveDate,
) -> Result<PathBuf, ExportError> {
    if groups.is_empty() {
        return Err(ExportError::NoGroups);
    }

    std::fs::create_dir_all(dir).map_err(|source| ExportError::Create {
        path: dir.to_path_buf(),
        source,
    })?;
    let path = dir.join(export_file_name(locale, date));
    let file = File::create(&path).map_err(|source| ExportError::Create {
        path: path.clone(),
        source,
    })?;

    write_groups_csv(groups, locale, BufWriter::new(file))?;
    info!("Exported {} groups to {}", groups.len(), path.display());
    Ok(path)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
