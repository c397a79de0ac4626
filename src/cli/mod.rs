//! The deck Command-Line Interface.
//!
//! This module is the main entry point for all CLI commands and orchestrates
//! the parse driver and the printer. It holds no language semantics.

use clap::Parser as _;
use std::fs;
use std::path::Path;
use std::process::ExitCode;
use walkdir::WalkDir;

use crate::ast::{Definition, Traced};
use crate::cli::args::{AstFormat, Command, DeckArgs};
use crate::cli::output::StderrTrace;
use crate::errors::{DeckError, SourceContext};
use crate::printer::{print, print_structural};
use crate::syntax::{ParseOptions, Parsed, Parser};

pub mod args;
pub mod output;

const SOURCE_EXTENSION: &str = "deck";

/// The main entry point for the CLI.
pub fn run() -> ExitCode {
    let args = DeckArgs::parse();
    let session = Session::new(&args);

    // Dispatch to the appropriate subcommand handler.
    let result = match &args.command {
        Command::Parse { file } => session.handle_parse(file),
        Command::Format {
            file,
            check,
            structural,
        } => session.handle_format(file, *check, *structural),
        Command::Ast { file, format } => session.handle_ast(file, *format),
        Command::Check { path } => session.handle_check(path),
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            output::print_diagnostic(e);
            ExitCode::FAILURE
        }
    }
}

/// Settings shared by every subcommand.
struct Session {
    max_depth: Option<usize>,
    trace: bool,
}

impl Session {
    fn new(args: &DeckArgs) -> Self {
        Self {
            max_depth: args.max_depth,
            trace: args.trace,
        }
    }

    fn options(&self, name: &str) -> ParseOptions {
        let options = ParseOptions::default().named(name);
        match self.max_depth {
            Some(limit) => options.with_max_depth(limit),
            None => options,
        }
    }

    /// Parses `text`, reporting node events on stderr when tracing.
    fn parse_text(&self, name: &str, text: &str) -> Result<Parsed<Definition>, DeckError> {
        let parser = Parser::new(self.options(name));
        if !self.trace {
            return parser.parse(text);
        }
        let parsed = parser.with_observer(&StderrTrace).parse(text)?;
        let Parsed {
            node,
            end,
            incomplete,
        } = parsed;
        // Report teardown of a copy; the caller keeps the tree.
        drop(Traced::new(node.clone(), &StderrTrace));
        Ok(Parsed {
            node,
            end,
            incomplete,
        })
    }

    /// Reads and parses a whole file; leftover input is an error.
    fn load(&self, path: &Path) -> Result<(String, Definition), DeckError> {
        let name = path.display().to_string();
        let text = fs::read_to_string(path).map_err(|e| DeckError::io(&name, &e))?;
        let def = self.parse_text(&name, &text)?.into_complete()?;
        Ok((text, def))
    }

    // ------------------------------------------------------------------------
    // Subcommand handlers
    // ------------------------------------------------------------------------

    fn handle_parse(&self, path: &Path) -> Result<bool, DeckError> {
        let (text, def) = self.load(path)?;
        let name = def.name.as_ref().map_or("<anonymous>", |n| n.as_str());
        output::print_status(
            true,
            &format!(
                "ok: {} defines {name} ({} statements, {} bytes)",
                path.display(),
                def.body.len(),
                text.len()
            ),
        );
        Ok(true)
    }

    fn handle_format(&self, path: &Path, check: bool, structural: bool) -> Result<bool, DeckError> {
        let (text, def) = self.load(path)?;
        if structural {
            print!("{}", print_structural(&def));
            return Ok(true);
        }
        let formatted = print(&def);
        if !check {
            print!("{formatted}");
            return Ok(true);
        }
        if formatted == text {
            output::print_status(true, &format!("{} is canonical", path.display()));
            return Ok(true);
        }
        output::print_format_diff(&text, &formatted);
        output::print_status(false, &format!("{} is not canonical", path.display()));
        Ok(false)
    }

    fn handle_ast(&self, path: &Path, format: AstFormat) -> Result<bool, DeckError> {
        let (_, def) = self.load(path)?;
        let rendered = match format {
            AstFormat::Json => serde_json::to_string_pretty(&def).map_err(DeckError::serialize)?,
            AstFormat::Yaml => serde_yaml::to_string(&def).map_err(DeckError::serialize)?,
        };
        println!("{}", rendered.trim_end());
        Ok(true)
    }

    fn handle_check(&self, root: &Path) -> Result<bool, DeckError> {
        let mut checked = 0;
        let mut failed = 0;
        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = entry.map_err(|e| DeckError::Io {
                path: root.display().to_string(),
                message: e.to_string(),
            })?;
            let path = entry.path();
            let is_source = path.extension().is_some_and(|ext| ext == SOURCE_EXTENSION);
            if !entry.file_type().is_file() || !is_source {
                continue;
            }
            checked += 1;
            if let Err(e) = self.check_file(path) {
                failed += 1;
                self.report_failure(path, &e);
            }
        }
        let summary = format!("checked {checked} files, {failed} failed");
        output::print_status(failed == 0, &summary);
        Ok(failed == 0)
    }

    fn check_file(&self, path: &Path) -> Result<(), DeckError> {
        self.load(path).map(|_| ())
    }

    fn report_failure(&self, path: &Path, error: &DeckError) {
        let name = path.display().to_string();
        let (line, column) = match (error.span(), fs::read_to_string(path)) {
            (Some(span), Ok(text)) => SourceContext::from_file(&name, text).line_col(span.start),
            _ => (1, 1),
        };
        output::print_location(&name, line, column, &error.to_string());
    }
}
