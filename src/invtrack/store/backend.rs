use crate::error::Result;
use crate::model::Data;

/// Abstract interface for raw storage I/O.
/// The backend handles the "how" of persistence (file vs memory), while
/// [`Store`](super::Store) owns the aggregate and its invariants.
pub trait Backend {
    /// Read the persisted aggregate.
    /// Returns Ok(None) when nothing has been stored yet.
    /// Returns Err when stored state exists but cannot be read or parsed.
    fn load(&self) -> Result<Option<Data>>;

    /// Replace the persisted aggregate with `data`.
    /// MUST fully replace prior content; a failed write must not leave a
    /// truncated document behind.
    fn save(&self, data: &Data) -> Result<()>;

    /// Where the data lives, for log lines.
    fn location(&self) -> String;
}
