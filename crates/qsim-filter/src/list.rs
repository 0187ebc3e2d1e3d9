//! Ordered filter lists and their line-based text format.
//!
//! A saved list holds one mode tag per line. Text-bearing records are
//! followed by a line with their payload, base64 encoded as UTF-8:
//!
//! ```text
//! Text
//! RVtXXT0=
//! XML
//! Q2xpZW50c1dhaXRpbmdUaW1lcy0+Q2xpZW50c1dhaXRpbmdUaW1lLT5bTWVhbl0=
//! Space
//! ```

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use qsim_stats::StatisticsSource;

use crate::format::{FilterFormat, FormatOptions};
use crate::mode::FilterMode;
use crate::record::FilterRecord;

/// A sequence of filter instructions, run left to right.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterList {
    records: Vec<FilterRecord>,
}

/// Result of [`FilterList::load`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOutcome {
    pub list: FilterList,
    /// False when at least one line had to be skipped.
    pub fully_read: bool,
}

impl FilterList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[FilterRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FilterRecord> {
        self.records.iter()
    }

    pub fn push(&mut self, record: FilterRecord) {
        self.records.push(record);
    }

    /// Inserts before `index`; indices past the end append.
    pub fn insert(&mut self, index: usize, record: FilterRecord) {
        let index = index.min(self.records.len());
        self.records.insert(index, record);
    }

    pub fn remove(&mut self, index: usize) -> Option<FilterRecord> {
        (index < self.records.len()).then(|| self.records.remove(index))
    }

    /// Replaces the record at `index`, returning the previous one.
    pub fn replace(&mut self, index: usize, record: FilterRecord) -> Option<FilterRecord> {
        self.records
            .get_mut(index)
            .map(|slot| std::mem::replace(slot, record))
    }

    pub fn swap(&mut self, a: usize, b: usize) -> bool {
        if a >= self.records.len() || b >= self.records.len() {
            return false;
        }
        self.records.swap(a, b);
        true
    }

    pub fn move_up(&mut self, index: usize) -> bool {
        index > 0 && self.swap(index - 1, index)
    }

    pub fn move_down(&mut self, index: usize) -> bool {
        self.swap(index, index + 1)
    }

    /// Serializes the list into its line-based text form.
    pub fn save(&self) -> String {
        let mut out = String::new();
        for record in &self.records {
            out.push_str(record.mode.tag());
            out.push('\n');
            if record.mode.has_text() {
                out.push_str(&STANDARD.encode(record.text_value()));
                out.push('\n');
            }
        }
        out
    }

    /// Reads a saved list, skipping lines that cannot be understood.
    pub fn load(text: &str) -> LoadOutcome {
        let mut list = Self::new();
        let mut fully_read = true;
        let mut lines = text.lines().enumerate().peekable();

        while let Some((index, line)) = lines.next() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let Some(mode) = FilterMode::from_tag(line) else {
                tracing::debug!(line = index + 1, tag = line, "skipping unknown filter tag");
                fully_read = false;
                continue;
            };
            if !mode.has_text() {
                list.push(FilterRecord::new(mode));
                continue;
            }

            let next_is_tag = match lines.peek() {
                Some((_, next)) => FilterMode::from_tag(next).is_some(),
                None => true,
            };
            if next_is_tag {
                tracing::debug!(line = index + 1, tag = line, "filter record is missing its text");
                fully_read = false;
                continue;
            }
            let Some((payload_index, payload)) = lines.next() else {
                break;
            };
            match decode_payload(payload.trim()) {
                Some(text) => list.push(FilterRecord::with_text(mode, text)),
                None => {
                    tracing::debug!(line = payload_index + 1, "skipping undecodable filter text");
                    fully_read = false;
                }
            }
        }

        tracing::debug!(records = list.len(), fully_read, "loaded filter list");
        LoadOutcome { list, fully_read }
    }

    /// Runs every record against `stats` and concatenates the fragments.
    pub fn process(&self, stats: &dyn StatisticsSource, options: &FormatOptions) -> String {
        let mut format = FilterFormat::default();
        let output: String = self
            .records
            .iter()
            .map(|record| record.process(stats, &mut format, options))
            .collect();
        tracing::debug!(records = self.len(), bytes = output.len(), "processed filter list");
        output
    }
}

impl FromIterator<FilterRecord> for FilterList {
    fn from_iter<I: IntoIterator<Item = FilterRecord>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a FilterList {
    type Item = &'a FilterRecord;
    type IntoIter = std::slice::Iter<'a, FilterRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

fn decode_payload(payload: &str) -> Option<String> {
    let bytes = STANDARD.decode(payload).ok()?;
    String::from_utf8(bytes).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> FilterList {
        [
            FilterRecord::text("E[W]="),
            FilterRecord::xml("ClientsWaitingTimes->ClientsWaitingTime->[Mean]"),
            FilterRecord::new(FilterMode::Space),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn save_writes_tags_and_payloads() {
        insta::assert_snapshot!(sample().save().trim_end(), @r"
        Text
        RVtXXT0=
        XML
        Q2xpZW50c1dhaXRpbmdUaW1lcy0+Q2xpZW50c1dhaXRpbmdUaW1lLT5bTWVhbl0=
        Space
        ");
    }

    #[test]
    fn load_tolerates_blank_lines_and_crlf() {
        let outcome = FilterList::load("\r\nText\r\nRVtXXT0=\r\n\r\nSpace\r\n");
        assert!(outcome.fully_read);
        assert_eq!(
            outcome.list.records(),
            [FilterRecord::text("E[W]="), FilterRecord::new(FilterMode::Space)]
        );
    }

    #[test]
    fn load_skips_what_it_cannot_read() {
        let outcome = FilterList::load("Chart\nSpace\nText\n***\nNewLine\nXML\n");
        assert!(!outcome.fully_read);
        assert_eq!(
            outcome.list.records(),
            [FilterRecord::new(FilterMode::Space), FilterRecord::new(FilterMode::NewLine)]
        );
    }

    #[test]
    fn tag_line_is_not_taken_as_missing_text() {
        let outcome = FilterList::load("Text\nSpace\nNewLine\n");
        assert!(!outcome.fully_read);
        assert_eq!(
            outcome.list.records(),
            [FilterRecord::new(FilterMode::Space), FilterRecord::new(FilterMode::NewLine)]
        );

        let outcome = FilterList::load("XML\nexpression\nMSsx\n");
        assert!(!outcome.fully_read);
        assert_eq!(outcome.list.records(), [FilterRecord::expression("1+1")]);
    }

    #[test]
    fn empty_payload_round_trips() {
        let list: FilterList = [FilterRecord::new(FilterMode::Text)].into_iter().collect();
        assert_eq!(list.save(), "Text\n\n");
        let outcome = FilterList::load(&list.save());
        assert!(outcome.fully_read);
        assert_eq!(outcome.list, list);
    }

    #[test]
    fn editing_operations() {
        let mut list = sample();
        assert!(list.move_up(2));
        assert_eq!(list.records()[1].mode, FilterMode::Space);
        assert!(!list.move_up(0));
        assert!(!list.move_down(2));

        list.insert(99, FilterRecord::new(FilterMode::NewLine));
        assert_eq!(list.len(), 4);
        assert_eq!(list.records()[3].mode, FilterMode::NewLine);

        let old = list.replace(0, FilterRecord::text("Mean: "));
        assert_eq!(old, Some(FilterRecord::text("E[W]=")));
        assert_eq!(list.remove(7), None);
        assert_eq!(list.remove(3).map(|record| record.mode), Some(FilterMode::NewLine));
        assert!(!list.swap(0, 3));
    }
}
