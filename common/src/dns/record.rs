use std::collections::BTreeMap;

/// Record type → number of records of that type, ordered by type name.
pub type RecordTypeDistribution = BTreeMap<String, usize>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MxRecord {
    pub host: String,
    pub preference: u16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SrvRecord {
    pub target: String,
    pub port: u16,
    pub priority: u16,
    pub weight: u16,
}

/// One line of a transferred zone in presentation format.
///
/// `owner TTL class type rdata...`. The TTL is optional because the query tool may omit it;
/// the record type is always the fourth whitespace-separated field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneRecord {
    pub name: String,
    pub ttl: Option<u32>,
    pub class: String,
    pub record_type: String,
    pub data: Vec<String>,
}
