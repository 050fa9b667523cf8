// # State Store Trait
//
// Defines the interface for the last-known IP record, the only state that
// survives between invocations.
//
// ## Implementations
//
// - File-based: plain-text `<prefix>.lastip`
// - In-memory: tests and embedding

use async_trait::async_trait;

/// Trait for state store implementations
///
/// There is no locking. At most one invocation runs at a time; the host
/// platform invokes the updater serially.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Read the last successfully applied IP
    ///
    /// A missing record and an unreadable record both return `None`.
    async fn load_last_ip(&self) -> Option<String>;

    /// Overwrite the last-known IP
    async fn save_last_ip(&self, ip: &str) -> Result<(), crate::Error>;
}
