//! Frozen key/value data shared with guards, actions and listeners.
//!
//! Context and props live inside the machine as [`Snapshot`]s. A snapshot
//! offers read access only, and the machine never edits one in place: every
//! update builds a new map and swaps it in. Anything handed out earlier keeps
//! showing the values it was taken with.

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use std::ops::Deref;
use std::sync::Arc;

/// Plain key/value mapping used for context, props and action updates.
pub type Data = Map<String, Value>;

/// Immutable view over a [`Data`] map.
///
/// Cloning is cheap; there is no way to obtain a mutable reference.
///
/// ```compile_fail
/// use statecraft::core::freeze;
/// use serde_json::json;
///
/// let snapshot = freeze(Default::default());
/// snapshot.insert("count".into(), json!(1));
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Snapshot(Arc<Data>);

impl Snapshot {
    /// Copy the contents out into an owned, editable map.
    pub fn to_data(&self) -> Data {
        self.0.as_ref().clone()
    }

    /// True when both snapshots were produced by the same freeze.
    pub fn same_as(&self, other: &Snapshot) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Deref for Snapshot {
    type Target = Data;

    fn deref(&self) -> &Data {
        &self.0
    }
}

impl From<Data> for Snapshot {
    fn from(data: Data) -> Self {
        freeze(data)
    }
}

impl Serialize for Snapshot {
    fn serialize<Ser: Serializer>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error> {
        self.0.as_ref().serialize(serializer)
    }
}

/// Freeze a map so it can be shared without further mutation.
pub fn freeze(data: Data) -> Snapshot {
    Snapshot(Arc::new(data))
}

/// Shallow union of two maps; keys from `update` overwrite keys in `base`.
///
/// ```rust
/// use statecraft::core::merge;
/// use serde_json::json;
///
/// let base = json!({"count": 5, "label": "a"}).as_object().unwrap().clone();
/// let update = json!({"count": 15}).as_object().unwrap().clone();
///
/// let merged = merge(&base, update);
/// assert_eq!(merged["count"], json!(15));
/// assert_eq!(merged["label"], json!("a"));
/// ```
pub fn merge(base: &Data, update: Data) -> Data {
    let mut merged = base.clone();
    merged.extend(update);
    merged
}
