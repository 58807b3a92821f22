//! redb table definitions shared by storage modules.

use redb::TableDefinition;

/// File name for the redb database within the configured DB directory.
pub const REDB_FILE_NAME: &str = "data.redb";

/// Resource metadata rows (`"lock:<id>"` -> `"<claimed_at>:<viewer_id>"`).
pub const RESOURCE_META: TableDefinition<&str, &str> = TableDefinition::new("resource_meta");
