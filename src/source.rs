//! The parse/print boundary around the engine.
//!
//! The engine itself only ever sees an in-memory `syn::File`. Parsing and
//! printing live here, and every parse is independent: there is no shared
//! file-set or position registry, so parses from different callers never
//! interfere.
//!
//! Printing uses prettyplease's default rendering. Plain `//` comments do not
//! survive a syn parse, so a printed file is a normalized rendition of the
//! tree rather than a byte-faithful copy of the input.

use std::path::Path;

use crate::error::Result;

/// Parse Rust source text into a syntax tree.
pub fn parse_source(source: &str) -> Result<syn::File> {
    Ok(syn::parse_file(source)?)
}

/// Parse the Rust source file at `path`.
pub fn parse_path(path: &Path) -> Result<syn::File> {
    let content = std::fs::read_to_string(path)?;
    parse_source(&content)
}

/// Render a syntax tree back to source text with default formatting.
pub fn print_source(file: &syn::File) -> String {
    prettyplease::unparse(file)
}

/// Render a syntax tree and write it to `path`.
pub fn write_path(path: &Path, file: &syn::File) -> Result<()> {
    std::fs::write(path, print_source(file))?;
    Ok(())
}
