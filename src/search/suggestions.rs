/// Barangay names loaded once from the listing service, matched locally
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BarangaySuggestions {
    entries: Vec<String>,
}

/// A matching barangay split around the typed text for highlighting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Suggestion<'a> {
    pub barangay: &'a str,
    pub before: &'a str,
    pub matched: &'a str,
    pub after: &'a str,
}

impl BarangaySuggestions {
    pub fn new(entries: Vec<String>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Barangays containing `input`, case-insensitively, in service order.
    /// Nothing is suggested until something is typed.
    pub fn matching<'a>(&'a self, input: &str) -> Vec<Suggestion<'a>> {
        if input.is_empty() {
            return Vec::new();
        }
        self.entries
            .iter()
            .filter_map(|entry| {
                let (start, end) = find_ignore_case(entry, input)?;
                Some(Suggestion {
                    barangay: entry,
                    before: &entry[..start],
                    matched: &entry[start..end],
                    after: &entry[end..],
                })
            })
            .collect()
    }

    /// Barangay picked when the user presses Enter instead of clicking
    pub fn resolve(&self, input: &str) -> Option<&str> {
        self.matching(input).first().map(|s| s.barangay)
    }
}

/// Byte range of the first case-insensitive occurrence of `needle`
fn find_ignore_case(haystack: &str, needle: &str) -> Option<(usize, usize)> {
    if needle.is_empty() {
        return None;
    }
    haystack.char_indices().find_map(|(start, _)| {
        let mut rest = haystack[start..].char_indices();
        let mut end = start;
        for wanted in needle.chars() {
            let (offset, found) = rest.next()?;
            if !chars_eq_ignore_case(found, wanted) {
                return None;
            }
            end = start + offset + found.len_utf8();
        }
        Some((start, end))
    })
}

fn chars_eq_ignore_case(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}
