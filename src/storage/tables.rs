use redb::TableDefinition;

/// Users: username -> User (msgpack)
pub const USERS: TableDefinition<&str, &[u8]> = TableDefinition::new("users");

/// Sweets: id -> Sweet (msgpack)
pub const SWEETS: TableDefinition<u64, &[u8]> = TableDefinition::new("sweets");

/// Id sequences: sequence name -> last assigned id
pub const SEQUENCES: TableDefinition<&str, u64> = TableDefinition::new("sequences");

/// Sequence name for sweet ids
pub const SWEET_SEQUENCE: &str = "sweets";
