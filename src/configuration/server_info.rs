use serde_derive::Serialize;

const ENTRY_SEPARATOR: char = ';';
const KEY_VALUE_SEPARATOR: &str = "::";
const LINK_HINT: &str = "http";

/// One key/value annotation shown in the report header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServerInfo {
    pub key: String,
    pub value: String,
    pub is_link: bool,
}

/// Parses `key::value;key::value`. Entries without a `::` are dropped.
pub fn parse_server_info(raw: &str) -> Vec<ServerInfo> {
    raw.split(ENTRY_SEPARATOR)
        .filter_map(|entry| {
            let mut parts = entry.split(KEY_VALUE_SEPARATOR);
            let key = parts.next()?;
            let value = parts.next()?;
            Some(ServerInfo {
                key: key.to_owned(),
                value: value.to_owned(),
                is_link: value.contains(LINK_HINT),
            })
        })
        .collect()
}
