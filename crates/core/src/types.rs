use serde_json::{Map, Value};

/// Application ids are UUIDs generated on submission.
pub type ApplicationId = uuid::Uuid;

/// User ids are opaque strings issued by the identity provider.
pub type UserId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// A form record: field name to current value.
pub type FormRecord = Map<String, Value>;
