pub mod config;
pub mod format;
pub mod index;
pub mod io;
pub mod logging;
pub mod query;
pub mod types;
pub mod validate;

pub use config::Settings;
pub use format::{Encoding, FormatError, parse_index, read_index, to_js_string, to_json_string, write_index};
pub use index::{Entry, IndexStats, PackageIndex};
pub use query::{ResolveResult, SearchResults, SymbolHit, resolve_symbol, search};
pub use types::Role;
pub use validate::{Diagnostic, Report, Rule, Severity, validate};
