//! The `State` trait implemented by every state tag a machine can occupy.
//!
//! State tags are opaque to the runtime: it only compares them for equality,
//! clones them into snapshots and history records, and asks them for a name
//! when logging.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Debug;

/// Trait for state tags.
///
/// Implement it by hand, derive it with [`state_enum!`](crate::state_enum),
/// or use `String` directly for machines whose states come from configuration.
///
/// # Example
///
/// ```rust
/// use statecraft::core::State;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
/// enum Door {
///     Open,
///     Closed,
///     Locked,
/// }
///
/// impl State for Door {
///     fn name(&self) -> &str {
///         match self {
///             Self::Open => "Open",
///             Self::Closed => "Closed",
///             Self::Locked => "Locked",
///         }
///     }
/// }
///
/// assert_eq!(Door::Locked.name(), "Locked");
/// assert!(!Door::Locked.is_final());
/// ```
pub trait State: Clone + PartialEq + Debug + Serialize + DeserializeOwned + Send + Sync {
    /// Name used in diagnostics and history output.
    fn name(&self) -> &str;

    /// Whether the machine is expected to stay here for good.
    ///
    /// Purely informational: the runtime keeps dispatching events in a
    /// final state if the transition table allows it.
    fn is_final(&self) -> bool {
        false
    }
}

impl State for String {
    fn name(&self) -> &str {
        self.as_str()
    }
}
