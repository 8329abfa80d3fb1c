//! HPACK static table per RFC 7541 Appendix A.
//! Contains 61 predefined header field entries, indexed from 1.

use std::collections::HashMap;

use crate::header::HeaderEntry;

/// Number of static table entries.
pub const STATIC_TABLE_LEN: usize = 61;

static ENTRIES: [(&str, &str); STATIC_TABLE_LEN] = [
    (":authority", ""),                   // 1
    (":method", "GET"),                   // 2
    (":method", "POST"),                  // 3
    (":path", "/"),                       // 4
    (":path", "/index.html"),             // 5
    (":scheme", "http"),                  // 6
    (":scheme", "https"),                 // 7
    (":status", "200"),                   // 8
    (":status", "204"),                   // 9
    (":status", "206"),                   // 10
    (":status", "304"),                   // 11
    (":status", "400"),                   // 12
    (":status", "404"),                   // 13
    (":status", "500"),                   // 14
    ("accept-charset", ""),               // 15
    ("accept-encoding", "gzip, deflate"), // 16
    ("accept-language", ""),              // 17
    ("accept-ranges", ""),                // 18
    ("accept", ""),                       // 19
    ("access-control-allow-origin", ""),  // 20
    ("age", ""),                          // 21
    ("allow", ""),                        // 22
    ("authorization", ""),                // 23
    ("cache-control", ""),                // 24
    ("content-disposition", ""),          // 25
    ("content-encoding", ""),             // 26
    ("content-language", ""),             // 27
    ("content-length", ""),               // 28
    ("content-location", ""),             // 29
    ("content-range", ""),                // 30
    ("content-type", ""),                 // 31
    ("cookie", ""),                       // 32
    ("date", ""),                         // 33
    ("etag", ""),                         // 34
    ("expect", ""),                       // 35
    ("expires", ""),                      // 36
    ("from", ""),                         // 37
    ("host", ""),                         // 38
    ("if-match", ""),                     // 39
    ("if-modified-since", ""),            // 40
    ("if-none-match", ""),                // 41
    ("if-range", ""),                     // 42
    ("if-unmodified-since", ""),          // 43
    ("last-modified", ""),                // 44
    ("link", ""),                         // 45
    ("location", ""),                     // 46
    ("max-forwards", ""),                 // 47
    ("proxy-authenticate", ""),           // 48
    ("proxy-authorization", ""),          // 49
    ("range", ""),                        // 50
    ("referer", ""),                      // 51
    ("refresh", ""),                      // 52
    ("retry-after", ""),                  // 53
    ("server", ""),                       // 54
    ("set-cookie", ""),                   // 55
    ("strict-transport-security", ""),    // 56
    ("transfer-encoding", ""),            // 57
    ("user-agent", ""),                   // 58
    ("vary", ""),                         // 59
    ("via", ""),                          // 60
    ("www-authenticate", ""),             // 61
];

/// The static table with its name index.
struct StaticTable {
    entries: Vec<HeaderEntry>,
    /// Map from name to matching indexes, in table order.
    by_name: HashMap<&'static str, Vec<usize>>,
}

impl StaticTable {
    fn new() -> Self {
        let mut by_name: HashMap<&'static str, Vec<usize>> = HashMap::new();
        let entries = ENTRIES
            .iter()
            .enumerate()
            .map(|(i, &(name, value))| {
                by_name.entry(name).or_default().push(i + 1);
                HeaderEntry::new(name, value)
            })
            .collect();

        Self { entries, by_name }
    }
}

lazy_static::lazy_static! {
    static ref STATIC_TABLE: StaticTable = StaticTable::new();
}

/// Total number of static table entries.
#[inline]
pub const fn len() -> usize {
    STATIC_TABLE_LEN
}

/// Get static table entry by 1-based index.
/// Returns None if index is 0 or out of bounds.
#[inline]
pub fn get(index: usize) -> Option<&'static HeaderEntry> {
    let table: &'static StaticTable = &STATIC_TABLE;
    index.checked_sub(1).and_then(|i| table.entries.get(i))
}

/// All entries with the given name as `(index, entry)`, in table order.
pub fn get_by_name(name: &str) -> impl Iterator<Item = (usize, &'static HeaderEntry)> {
    let table: &'static StaticTable = &STATIC_TABLE;
    table
        .by_name
        .get(name)
        .into_iter()
        .flatten()
        .map(move |&index| (index, &table.entries[index - 1]))
}

/// Find exact (name and value) match.
/// Returns Some(index) if found, None otherwise.
#[inline]
pub fn find_exact(name: &str, value: &str) -> Option<usize> {
    get_by_name(name)
        .find(|(_, entry)| entry.value() == value)
        .map(|(index, _)| index)
}

/// Find name-only match.
/// Returns Some(index) of first matching entry, None otherwise.
#[inline]
pub fn find_name(name: &str) -> Option<usize> {
    get_by_name(name).next().map(|(index, _)| index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_table_size() {
        assert_eq!(len(), 61);
        assert!(get(61).is_some());
        assert!(get(62).is_none());
        assert!(get(0).is_none());
    }

    #[test]
    fn test_get_entry() {
        let entry = get(2).unwrap();
        assert_eq!(entry.name(), ":method");
        assert_eq!(entry.value(), "GET");

        let entry = get(61).unwrap();
        assert_eq!(entry.name(), "www-authenticate");
        assert_eq!(entry.value(), "");
    }

    #[test]
    fn test_exact_match() {
        assert_eq!(find_exact(":method", "GET"), Some(2));
        assert_eq!(find_exact(":method", "POST"), Some(3));
        assert_eq!(find_exact(":status", "404"), Some(13));
        assert_eq!(find_exact(":authority", ""), Some(1));
        assert_eq!(find_exact(":method", "PUT"), None);
    }

    #[test]
    fn test_name_match() {
        assert_eq!(find_name(":path"), Some(4));
        assert_eq!(find_name(":status"), Some(8));
        assert_eq!(find_name("cache-control"), Some(24));
        assert_eq!(find_name("x-custom"), None);
    }

    #[test]
    fn test_get_by_name_ordered() {
        let indexes: Vec<usize> = get_by_name(":status").map(|(i, _)| i).collect();
        assert_eq!(indexes, vec![8, 9, 10, 11, 12, 13, 14]);
        assert_eq!(get_by_name("x-custom").count(), 0);
    }
}
