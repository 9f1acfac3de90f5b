//! Emission of package index files.

use crate::format::{FormatError, FormatResult};
use crate::index::PackageIndex;
use serde::Serialize;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use tracing::debug;

/// Output encoding for an index written to disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Encoding {
    /// Generator-style JavaScript assignment, one line.
    Js,
    /// Pretty-printed bare JSON object.
    Json,
}

impl Encoding {
    /// Pick an encoding from a file extension. `.json` means JSON,
    /// everything else gets the canonical JavaScript form.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::Json,
            _ => Self::Js,
        }
    }
}

/// Serialize to the generator's JavaScript form.
///
/// The output is byte-faithful to the generator style: a single line
/// `Index.PACKAGES = {...};` with `", "` between members, `" : "` around
/// the key separator, `/` escaped as `\/`, and no trailing newline.
pub fn to_js_string(index: &PackageIndex) -> FormatResult<String> {
    let mut buf = Vec::with_capacity(4096);
    buf.extend_from_slice(b"Index.PACKAGES = ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, GeneratorFormatter);
    index.serialize(&mut ser)?;
    buf.push(b';');
    Ok(String::from_utf8(buf).expect("serde_json emits valid UTF-8"))
}

/// Serialize to pretty JSON.
pub fn to_json_string(index: &PackageIndex) -> FormatResult<String> {
    Ok(serde_json::to_string_pretty(index)?)
}

/// Write an index file in the given encoding.
pub fn write_index(
    index: &PackageIndex,
    path: impl AsRef<Path>,
    encoding: Encoding,
) -> FormatResult<()> {
    let path = path.as_ref();
    let content = match encoding {
        Encoding::Js => to_js_string(index)?,
        Encoding::Json => to_json_string(index)?,
    };
    fs::write(path, &content).map_err(|cause| FormatError::FileWrite {
        path: path.to_path_buf(),
        cause,
    })?;
    debug!(
        path = %path.display(),
        bytes = content.len(),
        ?encoding,
        "wrote index file"
    );
    Ok(())
}

/// `serde_json` formatter matching the documentation generator's output.
///
/// Differences from compact JSON: a space after member commas, `" : "`
/// around the object key separator, and `/` written as `\/` inside strings.
struct GeneratorFormatter;

impl serde_json::ser::Formatter for GeneratorFormatter {
    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        writer.write_all(b" : ")
    }

    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        // serde_json hands over unescaped runs; only the slash needs
        // rewriting on top of the standard escapes.
        let mut rest = fragment;
        while let Some(pos) = rest.find('/') {
            writer.write_all(rest[..pos].as_bytes())?;
            writer.write_all(b"\\/")?;
            rest = &rest[pos + 1..];
        }
        writer.write_all(rest.as_bytes())
    }
}
