use crate::config::load_config;
use crate::io::{read_file, FileWalker};
use crate::synchronized::{positions, OccurrenceKind};
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// One `synchronized` occurrence as reported by `scan`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanEntry {
    pub path: PathBuf,
    /// 1-based line of the keyword
    pub line: usize,
    pub start: usize,
    pub end: usize,
    pub kind: OccurrenceKind,
}

#[derive(Debug, Clone)]
pub struct ScanArgs {
    pub paths: Vec<PathBuf>,
    pub config: Option<PathBuf>,
    pub json: bool,
}

/// Every occurrence in `text`, in offset order.
pub fn scan_source(path: &Path, text: &str) -> crate::core::Result<Vec<ScanEntry>> {
    Ok(positions(text, None, false)?
        .into_iter()
        .map(|occ| {
            let keyword = occ.keyword_offset(text);
            ScanEntry {
                path: path.to_path_buf(),
                line: text[..keyword].matches('\n').count() + 1,
                start: occ.start,
                end: occ.end,
                kind: occ.kind,
            }
        })
        .collect())
}

fn collect_files(args: &ScanArgs) -> Result<Vec<PathBuf>> {
    let config = load_config(args.config.as_deref()).context("Failed to load configuration")?;
    let (files, dirs): (Vec<PathBuf>, Vec<PathBuf>) =
        args.paths.iter().cloned().partition(|p| p.is_file());

    let mut selected = files;
    if !dirs.is_empty() || args.paths.is_empty() {
        let walker = FileWalker::from_config(&config)?;
        let walker = if dirs.is_empty() {
            walker
        } else {
            walker.with_roots(dirs)
        };
        selected.extend(walker.walk()?);
    }
    Ok(selected)
}

pub fn handle_scan(args: ScanArgs) -> Result<Vec<ScanEntry>> {
    let mut entries = Vec::new();
    for path in collect_files(&args)? {
        let found = read_file(&path).and_then(|text| scan_source(&path, &text));
        match found {
            Ok(found) => entries.extend(found),
            Err(err) => log::warn!("Skipping {}: {}", path.display(), err),
        }
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        for entry in &entries {
            println!(
                "{}:{} {}..{} {}",
                entry.path.display(),
                entry.line,
                entry.start,
                entry.end,
                entry.kind
            );
        }
    }
    Ok(entries)
}
