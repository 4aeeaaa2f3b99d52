//! Loader trait for writing records to a destination

use eyre::Result;

/// Loader trait for loading records into a destination
///
/// Implementors define how to load items to destinations:
/// - JSON dump files
/// - DynamoDB tables
///
/// # Example
/// ```no_run
/// use source_migrate::etl::Loader;
/// use eyre::Result;
/// use std::path::PathBuf;
///
/// struct FileLoader {
///     output: PathBuf,
/// }
///
/// impl Loader for FileLoader {
///     type Item = String;
///
///     async fn load(&self, items: Vec<Self::Item>) -> Result<usize> {
///         std::fs::write(&self.output, items.join("\n"))?;
///         Ok(items.len())
///     }
/// }
/// ```
pub trait Loader: Send + Sync {
    /// The type of items to load
    type Item: Send;

    /// Load items to the destination
    ///
    /// Returns the number of items loaded. Implementations stop at the first
    /// failing item; whatever was written before it stays written.
    ///
    /// # Errors
    /// Returns an error if loading fails (network, I/O, validation, etc.)
    fn load(
        &self,
        items: Vec<Self::Item>,
    ) -> impl std::future::Future<Output = Result<usize>> + Send;
}
