// Code Injection
//
// *L'Injection* (The Injection) - Splice the links map between sentinel lines of a source file

use crate::errors::{MaillageError, Result};
use crate::writer::{links_map, write_atomic};
use leliens::Report;
use std::fs;
use std::path::Path;
use tracing::info;

/// Line marking the start of generated content
pub const START_SENTINEL: &str = "// AUTO_LINKS_START";

/// Line marking the end of generated content
pub const END_SENTINEL: &str = "// AUTO_LINKS_END";

/// Generated object-literal entries, one page per line, each followed by a comma.
pub fn render_links_block(report: &Report) -> Result<Vec<String>> {
    links_map(report)
        .into_iter()
        .map(|(url, recommendations)| {
            let key = serde_json::to_string(url);
            let value = serde_json::to_string(recommendations);
            match (key, value) {
                (Ok(key), Ok(value)) => Ok(format!("{key}: {value},")),
                (Err(e), _) | (_, Err(e)) => Err(MaillageError::config_error(
                    format!("Failed to serialize links for {url}: {e}"),
                    None,
                )),
            }
        })
        .collect()
}

/// Replace the text strictly between the sentinels of `source` with `block`.
///
/// Each generated line is indented like the start sentinel and ends with the
/// start sentinel's line ending. Lines outside the sentinels, and the
/// sentinels themselves, are kept byte for byte.
pub fn splice(source: &str, block: &[String], path: &Path) -> Result<String> {
    let lines: Vec<&str> = source.split_inclusive('\n').collect();
    let find = |sentinel: &'static str| {
        lines
            .iter()
            .position(|line| line.trim() == sentinel)
            .ok_or_else(|| MaillageError::MissingSentinel {
                sentinel,
                path: path.to_path_buf(),
            })
    };

    let start = find(START_SENTINEL)?;
    let end = find(END_SENTINEL)?;
    if end < start {
        return Err(MaillageError::SentinelOrder {
            path: path.to_path_buf(),
        });
    }

    let start_line = lines[start];
    let newline = if start_line.ends_with("\r\n") { "\r\n" } else { "\n" };
    let indent = &start_line[..start_line.len() - start_line.trim_start().len()];

    let mut spliced = String::with_capacity(source.len());
    for line in &lines[..=start] {
        spliced.push_str(line);
    }
    for line in block {
        spliced.push_str(indent);
        spliced.push_str(line);
        spliced.push_str(newline);
    }
    for line in &lines[end..] {
        spliced.push_str(line);
    }
    Ok(spliced)
}

/// Inject the links map of `report` into `target`, atomically.
///
/// Fails without touching the file when a sentinel is missing or out of order.
pub fn inject_links(target: &Path, report: &Report) -> Result<()> {
    let source = fs::read_to_string(target)
        .map_err(|e| MaillageError::io_error("Failed to read injection target", target, e))?;

    let block = render_links_block(report)?;
    let spliced = splice(&source, &block, target)?;

    if spliced == source {
        info!("{} already up to date", target.display());
        return Ok(());
    }

    write_atomic(target, spliced.as_bytes())?;
    info!("Injected links for {} pages into {}", block.len(), target.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use leliens::build_link_intel_report_at;
    use leregistre::{ContentEntry, Locale, PageType, RecommendationConfig, Registry};
    use rstest::rstest;
    use tempfile::TempDir;

    const TARGET: &str = "export const AUTO_LINKS = {\n  // AUTO_LINKS_START\n  \"stale\": [],\n  // AUTO_LINKS_END\n};\n";

    fn report() -> Report {
        let registry = Registry::new(vec![
            ContentEntry::new("/uk/focus", PageType::Pillar, Locale::Uk, "Focus")
                .with_pillar("focus"),
            ContentEntry::new("/uk/focus/pomodoro", PageType::Cluster, Locale::Uk, "Pomodoro")
                .with_pillar("focus"),
        ])
        .unwrap();
        build_link_intel_report_at(&registry, &RecommendationConfig::default(), Utc::now())
    }

    fn block() -> Vec<String> {
        vec!["\"/a\": [],".to_string(), "\"/b\": [],".to_string()]
    }

    #[test]
    fn test_splice_replaces_only_between_sentinels() {
        let out = splice(TARGET, &block(), Path::new("links.ts")).unwrap();
        assert_eq!(
            out,
            "export const AUTO_LINKS = {\n  // AUTO_LINKS_START\n  \"/a\": [],\n  \"/b\": [],\n  // AUTO_LINKS_END\n};\n"
        );
    }

    #[test]
    fn test_splice_is_idempotent() {
        let once = splice(TARGET, &block(), Path::new("links.ts")).unwrap();
        let twice = splice(&once, &block(), Path::new("links.ts")).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_splice_keeps_crlf_line_endings() {
        let source = "const a = 1;\r\n// AUTO_LINKS_START\r\n// AUTO_LINKS_END\r\nconst b = 2;\r\n";
        assert_eq!(splice(source, &[], Path::new("links.ts")).unwrap(), source);

        let out = splice(source, &block(), Path::new("links.ts")).unwrap();
        assert_eq!(
            out,
            "const a = 1;\r\n// AUTO_LINKS_START\r\n\"/a\": [],\r\n\"/b\": [],\r\n// AUTO_LINKS_END\r\nconst b = 2;\r\n"
        );
    }

    #[test]
    fn test_splice_without_trailing_newline() {
        let source = "// AUTO_LINKS_START\n\"x\": [],\n// AUTO_LINKS_END";
        let out = splice(source, &block(), Path::new("links.ts")).unwrap();
        assert_eq!(out, "// AUTO_LINKS_START\n\"/a\": [],\n\"/b\": [],\n// AUTO_LINKS_END");
    }

    #[test]
    fn test_crlf_target_already_up_to_date_is_not_rewritten() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("links.ts");
        fs::write(&target, TARGET.replace('\n', "\r\n")).unwrap();

        inject_links(&target, &report()).unwrap();
        let first = fs::read_to_string(&target).unwrap();
        assert!(!first.contains("stale"));
        assert_eq!(first.matches('\n').count(), first.matches("\r\n").count());

        inject_links(&target, &report()).unwrap();
        assert_eq!(fs::read_to_string(&target).unwrap(), first);
    }

    #[rstest]
    #[case("const x = 1;\n// AUTO_LINKS_END\n", START_SENTINEL)]
    #[case("// AUTO_LINKS_START\nconst x = 1;\n", END_SENTINEL)]
    fn test_missing_sentinel(#[case] source: &str, #[case] missing: &str) {
        let err = splice(source, &block(), Path::new("links.ts")).unwrap_err();
        match err {
            MaillageError::MissingSentinel { sentinel, .. } => assert_eq!(sentinel, missing),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_end_before_start_is_rejected() {
        let err = splice("// AUTO_LINKS_END\n// AUTO_LINKS_START\n", &block(), Path::new("t.ts"))
            .unwrap_err();
        assert!(matches!(err, MaillageError::SentinelOrder { .. }));
    }

    #[test]
    fn test_inject_writes_target() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("links.ts");
        fs::write(&target, TARGET).unwrap();

        inject_links(&target, &report()).unwrap();

        let written = fs::read_to_string(&target).unwrap();
        assert!(!written.contains("stale"));
        assert!(written.contains("  \"/uk/focus/pomodoro\": [{\"url\":\"/uk/focus\""));
        assert!(written.ends_with("  // AUTO_LINKS_END\n};\n"));
    }

    #[test]
    fn test_failed_inject_leaves_file_untouched() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("links.ts");
        fs::write(&target, "no sentinels here\n").unwrap();

        assert!(inject_links(&target, &report()).is_err());
        assert_eq!(fs::read_to_string(&target).unwrap(), "no sentinels here\n");
    }
}
