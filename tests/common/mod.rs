//! # Deck Test Helpers
//!
//! Shared loaders for the integration tests. Fixture sources live under
//! `tests/fixtures/valid` (must parse completely) and `tests/fixtures/invalid`
//! (must fail with a diagnostic).

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use deck::ast::{Definition, Expression, Statement};
use deck::syntax::{parse, parse_expression, parse_statement};
use walkdir::WalkDir;

/// A fixture file and its contents.
#[derive(Debug, Clone)]
pub struct Fixture {
    pub path: PathBuf,
    pub source: String,
}

pub fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures")
}

/// Loads every `.deck` file under `tests/fixtures/<group>`, sorted by path.
pub fn load_fixtures(group: &str) -> Vec<Fixture> {
    let mut fixtures = Vec::new();
    for entry in WalkDir::new(fixtures_dir().join(group))
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if entry.file_type().is_file() && path.extension().is_some_and(|e| e == "deck") {
            let source = std::fs::read_to_string(path)
                .unwrap_or_else(|e| panic!("cannot read fixture '{}': {e}", path.display()));
            fixtures.push(Fixture {
                path: path.to_path_buf(),
                source,
            });
        }
    }
    assert!(!fixtures.is_empty(), "no fixtures found in group '{group}'");
    fixtures
}

/// Parses a complete definition, panicking with the rendered error otherwise.
pub fn parse_def(source: &str) -> Definition {
    match parse(source).and_then(|parsed| parsed.into_complete()) {
        Ok(def) => def,
        Err(e) => panic!("failed to parse {source:?}: {e}"),
    }
}

pub fn parse_expr(source: &str) -> Expression {
    match parse_expression(source).and_then(|parsed| parsed.into_complete()) {
        Ok(expr) => expr,
        Err(e) => panic!("failed to parse expression {source:?}: {e}"),
    }
}

pub fn parse_stmt(source: &str) -> Statement {
    match parse_statement(source).and_then(|parsed| parsed.into_complete()) {
        Ok(stmt) => stmt,
        Err(e) => panic!("failed to parse statement {source:?}: {e}"),
    }
}

/// Writes `contents` to a fresh file in the system temp directory.
pub fn temp_source(name: &str, contents: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("deck-tests-{}", std::process::id()));
    std::fs::create_dir_all(&dir).expect("create temp dir");
    let path = dir.join(name);
    std::fs::write(&path, contents).expect("write temp source");
    path
}
