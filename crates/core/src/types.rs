/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Display name of a catalog entry. The name is the identity key for
/// equality, deduplication and membership everywhere in the workspace.
pub type EntryName = String;
