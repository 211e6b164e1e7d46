pub mod json;
pub mod manifest;
pub mod terminal;
pub mod xhtml;

pub use json::{JsonWriter, JSON_REPORT_FILE_NAME};
pub use manifest::{manifest_file_name, render_manifest, ManifestWriter};
pub use terminal::TerminalWriter;
pub use xhtml::{XhtmlWriter, REPORT_FILE_NAME};
