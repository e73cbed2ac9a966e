// 🔤 Normalize - Title Casing & Frequency Table
// Turns raw heading rows into the phrase -> count mapping the layout consumes

use crate::loader::HeadingRecord;
use std::collections::HashMap;

// ============================================================================
// TITLE CASING
// ============================================================================

/// Convert a heading to title case, word by word.
///
/// A word is a maximal run of alphabetic characters; anything else (spaces,
/// hyphens, digits, apostrophes, punctuation) ends the word, so the next
/// alphabetic character starts a new one. The first character of each word is
/// uppercased, the rest are lowercased.
///
/// "AGRICULTURE--SRI LANKA" → "Agriculture--Sri Lanka"
/// "TEA TRADE" → "Tea Trade"
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;

    for ch in s.chars() {
        if ch.is_alphabetic() {
            if at_word_start {
                // Some uppercase mappings expand to several characters
                // (e.g. 'ß' → "SS"); only the first stays uppercase
                let mut upper = ch.to_uppercase();
                if let Some(first) = upper.next() {
                    out.push(first);
                }
                for rest in upper {
                    for low in rest.to_lowercase() {
                        out.push(low);
                    }
                }
                at_word_start = false;
            } else {
                for low in ch.to_lowercase() {
                    out.push(low);
                }
            }
        } else {
            out.push(ch);
            at_word_start = true;
        }
    }

    out
}

/// Title-case every record's heading in place
pub fn normalize_headings(records: &mut [HeadingRecord]) {
    for record in records.iter_mut() {
        record.heading = title_case(&record.heading);
    }
}

// ============================================================================
// FREQUENCY TABLE
// ============================================================================

/// What to do when two rows normalize to the same heading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// Keep the count of the last occurrence (matches plain dict insertion)
    LastWins,
    /// Add the counts together
    Sum,
}

impl DuplicatePolicy {
    /// Human-readable description for summary output
    pub fn describe(&self) -> &str {
        match self {
            DuplicatePolicy::LastWins => "last occurrence wins",
            DuplicatePolicy::Sum => "counts summed",
        }
    }
}

/// FrequencyTable - phrase → count mapping with stable iteration order
///
/// Entries iterate in first-occurrence order, so two runs over the same file
/// see the same sequence. Re-inserting an existing heading updates it in
/// place and keeps its original position.
#[derive(Debug, Clone)]
pub struct FrequencyTable {
    entries: Vec<(String, u64)>,
    index: HashMap<String, usize>,
}

impl FrequencyTable {
    pub fn new() -> Self {
        FrequencyTable {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Build a table from normalized records
    pub fn from_records(records: &[HeadingRecord], policy: DuplicatePolicy) -> Self {
        let mut table = FrequencyTable::new();
        for record in records {
            table.insert(&record.heading, record.count, policy);
        }
        table
    }

    /// Insert a heading, resolving duplicates per the policy
    pub fn insert(&mut self, heading: &str, count: u64, policy: DuplicatePolicy) {
        match self.index.get(heading) {
            Some(&idx) => match policy {
                DuplicatePolicy::LastWins => self.entries[idx].1 = count,
                DuplicatePolicy::Sum => self.entries[idx].1 += count,
            },
            None => {
                self.index.insert(heading.to_string(), self.entries.len());
                self.entries.push((heading.to_string(), count));
            }
        }
    }

    pub fn get(&self, heading: &str) -> Option<u64> {
        self.index.get(heading).map(|&idx| self.entries[idx].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in first-occurrence order
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> + '_ {
        self.entries.iter().map(|(h, c)| (h.as_str(), *c))
    }
}

impl Default for FrequencyTable {
    fn default() -> Self {
        FrequencyTable::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================
