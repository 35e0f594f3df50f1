/// Filesystem adapters for file I/O operations
mod directory_manifest_source;
mod file_writer;

pub use directory_manifest_source::{DirectoryManifestSource, MANIFEST_FILE_NAME};
pub use file_writer::{FileSystemWriter, StdoutPresenter};
