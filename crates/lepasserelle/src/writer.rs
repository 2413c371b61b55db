// Report Writers
//
// *L'Écrivain* (The Writer) - JSON and Markdown reports plus the links data file

use crate::errors::{MaillageError, Result};
use leliens::{render_markdown, Recommendation, Report, Shortfall};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// JSON report file name
pub const REPORT_JSON: &str = "link-intel.json";

/// Markdown report file name
pub const REPORT_MARKDOWN: &str = "link-intel.md";

/// Links data file name
pub const LINKS_DATA: &str = "links.json";

/// Files produced by [`write_reports`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenReports {
    /// JSON report
    pub json: PathBuf,
    /// Markdown report
    pub markdown: PathBuf,
    /// Links data file
    pub links: PathBuf,
}

/// Page URL -> its recommendations, keyed for stable output
pub fn links_map(report: &Report) -> BTreeMap<&str, &[Recommendation]> {
    report
        .pages
        .iter()
        .map(|page| (page.url.as_str(), page.recommendations.as_slice()))
        .collect()
}

/// Write the JSON report, Markdown report and links data file into `out_dir`.
pub fn write_reports(
    out_dir: &Path,
    report: &Report,
    shortfalls: &[Shortfall],
) -> Result<WrittenReports> {
    fs::create_dir_all(out_dir)
        .map_err(|e| MaillageError::io_error("Failed to create output directory", out_dir, e))?;

    let written = WrittenReports {
        json: out_dir.join(REPORT_JSON),
        markdown: out_dir.join(REPORT_MARKDOWN),
        links: out_dir.join(LINKS_DATA),
    };

    write_atomic(&written.json, to_json(report)?.as_bytes())?;
    write_atomic(
        &written.markdown,
        render_markdown(report, shortfalls).as_bytes(),
    )?;
    write_atomic(&written.links, to_json(&links_map(report))?.as_bytes())?;

    info!("Wrote reports to {}", out_dir.display());
    Ok(written)
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value)
        .map(|json| json + "\n")
        .map_err(|e| MaillageError::config_error(format!("Failed to serialize output: {e}"), None))
}

/// Replace `path` with `contents` via a staged sibling file and a rename.
///
/// Readers see either the old file or the new one, never a partial write.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let staged = path.with_file_name(format!(".{file_name}.tmp"));

    let result = File::create(&staged)
        .and_then(|mut file| {
            file.write_all(contents)?;
            file.sync_all()
        })
        .and_then(|()| fs::rename(&staged, path));

    if let Err(e) = result {
        fs::remove_file(&staged).ok();
        return Err(MaillageError::io_error("Failed to write file", path, e));
    }

    debug!("Wrote {} bytes to {}", contents.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use leliens::build_link_intel_report_at;
    use leregistre::{ContentEntry, Locale, PageType, RecommendationConfig, Registry};
    use tempfile::TempDir;

    fn report() -> Report {
        let registry = Registry::new(vec![
            ContentEntry::new("/uk/sleep", PageType::Pillar, Locale::Uk, "Sleep")
                .with_pillar("sleep"),
            ContentEntry::new("/uk/sleep/naps", PageType::Cluster, Locale::Uk, "Naps")
                .with_pillar("sleep"),
        ])
        .unwrap();
        let at = Utc.with_ymd_and_hms(2026, 5, 4, 3, 2, 1).single().unwrap();
        build_link_intel_report_at(&registry, &RecommendationConfig::default(), at)
    }

    #[test]
    fn test_writes_all_three_files() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("reports").join("links");
        let written = write_reports(&out, &report(), &[]).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&written.json).unwrap()).unwrap();
        assert_eq!(json["runAt"], "2026-05-04T03:02:01.000Z");
        assert_eq!(json["summary"]["pages"], 2);

        let markdown = fs::read_to_string(&written.markdown).unwrap();
        assert!(markdown.contains("## Orphan pages"));

        let links: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&written.links).unwrap()).unwrap();
        assert_eq!(links["/uk/sleep/naps"][0]["url"], "/uk/sleep");
        assert_eq!(links["/uk/sleep"][0]["reason"], "pillar cluster");
    }

    #[test]
    fn test_atomic_write_leaves_no_staged_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.txt");
        fs::write(&path, "old").unwrap();

        write_atomic(&path, b"new").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names.len(), 1);
    }

    #[test]
    fn test_atomic_write_into_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let err = write_atomic(&dir.path().join("missing").join("f.txt"), b"x").unwrap_err();
        assert!(matches!(err, MaillageError::Io { .. }));
    }
}
