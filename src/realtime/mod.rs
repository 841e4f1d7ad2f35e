//! An embedded realtime key-value tree.
//!
//! Records are JSON values grouped into collections and addressed by key.
//! Subscribers receive the full set of matching records every time the
//! collection is written to, so consumers replace their state wholesale
//! instead of applying patches.

mod db;
mod push_id;
mod query;
mod subscription;

use std::collections::BTreeMap;

use serde_json::Value;

pub use db::RealtimeDb;
pub use query::Query;
pub use subscription::{SnapshotEvent, Subscription, SubscriptionHandle};

/// The records of a collection keyed by their store key, in key order.
///
/// Keys created by [RealtimeDb::push] sort by creation time, so iterating a
/// snapshot visits records in the order they were created.
pub type Snapshot = BTreeMap<String, Value>;
