use std::collections::BTreeMap;

/// All cached timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// A flat field/value record as held by the cache (one hash per key).
pub type FieldMap = BTreeMap<String, String>;
