//! Context assembly and citation markers.
//!
//! Notes are numbered from 1 in the order they were retrieved. Note `n` is
//! rendered as a `[note{n}]` block and gets a [`Reference`] whose
//! `reference_id` is `note{n}`, so a marker in the generated answer maps
//! straight back to its note.

use crate::types::{FilteredNote, Reference};

/// Prefix of every reference label.
pub const REFERENCE_PREFIX: &str = "note";

/// Label of the `n`th note (1-based), e.g. `note2`.
pub fn reference_label(n: usize) -> String {
    format!("{}{}", REFERENCE_PREFIX, n)
}

/// Citation marker of the `n`th note (1-based), e.g. `[note2]`.
pub fn citation_marker(n: usize) -> String {
    format!("[{}]", reference_label(n))
}

/// Build the prompt context and the parallel reference list.
pub fn assemble(notes: &[FilteredNote]) -> (String, Vec<Reference>) {
    let mut blocks = Vec::with_capacity(notes.len());
    let mut references = Vec::with_capacity(notes.len());

    for (i, note) in notes.iter().enumerate() {
        let n = i + 1;
        blocks.push(format!(
            "{}\nTitle: {}\nContent: {}",
            citation_marker(n),
            note.title,
            note.content
        ));
        references.push(Reference {
            id: note.id.clone(),
            title: note.title.clone(),
            relevance_score: note.relevance_score,
            reference_id: reference_label(n),
        });
    }

    (blocks.join("\n\n"), references)
}

/// Note numbers cited in `text` as `[noteN]`, deduplicated, in first-seen order.
pub fn extract_citations(text: &str) -> Vec<usize> {
    let open = format!("[{}", REFERENCE_PREFIX);
    let mut cited = Vec::new();
    let mut rest = text;

    while let Some(start) = rest.find(&open) {
        rest = &rest[start + open.len()..];

        let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
        if digits == 0 || !rest[digits..].starts_with(']') {
            continue;
        }

        if let Ok(n) = rest[..digits].parse::<usize>() {
            if n > 0 && !cited.contains(&n) {
                cited.push(n);
            }
        }
        rest = &rest[digits + 1..];
    }

    cited
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NoteSource;

    fn note(id: &str, title: &str, content: &str, score: f32) -> FilteredNote {
        FilteredNote {
            id: id.to_string(),
            title: title.to_string(),
            content: content.to_string(),
            relevance_score: score,
            source: NoteSource::RawSnippet,
        }
    }

    #[test]
    fn test_assemble_empty() {
        let (context, references) = assemble(&[]);
        assert_eq!(context, "");
        assert!(references.is_empty());
    }

    #[test]
    fn test_assemble_blocks() {
        let (context, references) = assemble(&[
            note("a", "Sleep", "Go to bed early.", 0.9),
            note("b", "Diet", "Eat less sugar.", 0.8),
        ]);

        assert_eq!(
            context,
            "[note1]\nTitle: Sleep\nContent: Go to bed early.\n\n\
             [note2]\nTitle: Diet\nContent: Eat less sugar."
        );
        assert_eq!(references.len(), 2);
        assert_eq!(references[1].id, "b");
        assert_eq!(references[1].title, "Diet");
        assert_eq!(references[1].relevance_score, 0.8);
    }

    #[test]
    fn test_labels_follow_position_not_score() {
        let (_, references) = assemble(&[
            note("A", "a", "a", 0.71),
            note("B", "b", "b", 0.99),
            note("C", "c", "c", 0.85),
        ]);

        let pairs: Vec<(&str, &str)> = references
            .iter()
            .map(|r| (r.reference_id.as_str(), r.id.as_str()))
            .collect();
        assert_eq!(pairs, vec![("note1", "A"), ("note2", "B"), ("note3", "C")]);
    }

    #[test]
    fn test_citation_marker() {
        assert_eq!(reference_label(3), "note3");
        assert_eq!(citation_marker(12), "[note12]");
    }

    #[test]
    fn test_extract_citations() {
        assert_eq!(
            extract_citations("A [note2] b [note10], again [note2] and [note1]."),
            vec![2, 10, 1]
        );
        assert!(extract_citations("no markers here").is_empty());
    }

    #[test]
    fn test_extract_citations_skips_malformed() {
        assert_eq!(
            extract_citations("[note] [noteX] [note3 [note0] [note4]"),
            vec![4]
        );
    }
}
