//! Lattice block parser.
//!
//! `paris-traceroute -a mda` ends its report with a block such as:
//!
//! ```text
//! Lattice:
//! None -> [ 10.0.0.1 ]
//! 10.0.0.1 -> [ 10.0.1.1, 10.0.2.1 ]
//! 10.0.1.1 -> [ 10.0.9.9 ]
//! 10.0.2.1 -> [ 10.0.9.9 ]
//! 10.0.9.9
//! ```
//!
//! Each record names an interface followed by every successor interface the
//! prober discovered for it. An interface with no successor is printed on its
//! own and adds no edge. The flat `<parent>, <child>, ...` layout is accepted
//! too. The block ends at the first blank line.

use crate::error::LatticeError;
use crate::topology::{AdjacencyMap, END_LABEL, START_LABEL};

/// Line that opens the lattice block.
pub const LATTICE_MARKER: &str = "Lattice:";

/// Token the prober prints in place of the source interface.
const SOURCE_TOKEN: &str = "None";

/// Separates an interface from its successor list.
const ARROW_TOKEN: &str = "->";

/// Punctuation around labels in a record.
const SEPARATORS: &[char] = &[',', '[', ']'];

/// Parse the lattice block out of a prober report.
///
/// The source interface is relabelled [`START_LABEL`] and any successor equal
/// to `destination` is relabelled [`END_LABEL`].
pub fn parse_lattice(output: &str, destination: &str) -> Result<AdjacencyMap, LatticeError> {
    let mut lines = output.lines().enumerate();

    lines
        .by_ref()
        .find(|(_, line)| line.trim() == LATTICE_MARKER)
        .ok_or(LatticeError::MarkerNotFound)?;

    let mut map = AdjacencyMap::new();
    for (index, raw) in lines {
        let line = raw.trim();
        if line.is_empty() {
            break;
        }
        parse_record(line, index + 1, destination, &mut map)?;
    }

    Ok(map)
}

fn parse_record(
    line: &str,
    line_number: usize,
    destination: &str,
    map: &mut AdjacencyMap,
) -> Result<(), LatticeError> {
    let malformed = || LatticeError::MalformedRecord {
        line: line_number,
        content: line.to_string(),
    };

    let mut tokens = line
        .split_whitespace()
        .map(|token| token.trim_matches(SEPARATORS))
        .filter(|token| !token.is_empty());

    let parent = match tokens.next() {
        None | Some(ARROW_TOKEN) => return Err(malformed()),
        Some(SOURCE_TOKEN) => START_LABEL,
        Some(label) => label,
    };

    let mut arrow = false;
    let mut children = 0;
    for child in tokens {
        if child == ARROW_TOKEN {
            if arrow {
                return Err(malformed());
            }
            arrow = true;
            continue;
        }
        let child = if child == destination { END_LABEL } else { child };
        map.insert(parent, child);
        children += 1;
    }

    // A bare interface is a leaf; an arrow must lead somewhere.
    if arrow && children == 0 {
        return Err(malformed());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const DIAMOND: &str = "Lattice:\nstart, A, B\nA, end\nB, end\n";

    #[test]
    fn test_parse_diamond() {
        let map = parse_lattice(DIAMOND, "10.0.9.9").unwrap();
        let expected: AdjacencyMap =
            [("start", "A"), ("start", "B"), ("A", "end"), ("B", "end")]
                .into_iter()
                .collect();
        assert_eq!(map, expected);
    }

    #[test]
    fn test_none_parent_becomes_start() {
        let output = "Lattice:\nNone, 10.0.0.1\n";
        let map = parse_lattice(output, "10.0.9.9").unwrap();
        assert!(map.contains_edge(START_LABEL, "10.0.0.1"));
        assert!(map.children("None").is_none());
    }

    #[test]
    fn test_destination_child_becomes_end() {
        let output = "Lattice:\n10.0.0.1, 10.0.9.9,\n";
        let map = parse_lattice(output, "10.0.9.9").unwrap();
        assert!(map.contains_edge("10.0.0.1", END_LABEL));
        assert!(!map.contains_edge("10.0.0.1", "10.0.9.9"));
    }

    #[test]
    fn test_text_before_marker_is_ignored() {
        let output = "mda to 10.0.9.9, 30 hops max\n 1 10.0.0.1 (0.4 ms)\n\nLattice:\nNone, 10.0.0.1\n";
        let map = parse_lattice(output, "10.0.9.9").unwrap();
        assert_eq!(map.edge_count(), 1);
    }

    #[test]
    fn test_block_stops_at_blank_line() {
        let output = "Lattice:\nNone, A\n   \nA, B\n";
        let map = parse_lattice(output, "B").unwrap();
        assert_eq!(map.edge_count(), 1);
        assert!(map.children("A").is_none());
    }

    #[test]
    fn test_marker_surrounded_by_whitespace() {
        let output = "  Lattice:\t\r\nNone, A\r\n";
        let map = parse_lattice(output, "A").unwrap();
        assert!(map.contains_edge(START_LABEL, END_LABEL));
    }

    #[test]
    fn test_missing_marker() {
        let err = parse_lattice("hop 1\nhop 2\n", "10.0.9.9").unwrap_err();
        assert_eq!(err, LatticeError::MarkerNotFound);
    }

    #[test]
    fn test_empty_output() {
        assert_eq!(
            parse_lattice("", "10.0.9.9").unwrap_err(),
            LatticeError::MarkerNotFound
        );
    }

    // ========================================================================
    // Arrow layout
    // ========================================================================

    const ARROW_DIAMOND: &str = "\
Lattice:
None -> [ 10.0.0.1 ]
10.0.0.1 -> [ 10.0.0.2, 10.0.0.3 ]
10.0.0.2 -> [ 10.0.9.9 ]
10.0.0.3 -> [ 10.0.9.9 ]
10.0.9.9

";

    #[test]
    fn test_parse_arrow_layout_with_leaf() {
        let map = parse_lattice(ARROW_DIAMOND, "10.0.9.9").unwrap();
        let expected: AdjacencyMap = [
            (START_LABEL, "10.0.0.1"),
            ("10.0.0.1", "10.0.0.2"),
            ("10.0.0.1", "10.0.0.3"),
            ("10.0.0.2", END_LABEL),
            ("10.0.0.3", END_LABEL),
        ]
        .into_iter()
        .collect();
        assert_eq!(map, expected);
    }

    #[test]
    fn test_arrow_and_comma_layouts_agree() {
        let flat = "Lattice:\nNone, 10.0.0.1\n10.0.0.1, 10.0.0.2, 10.0.0.3\n\
                    10.0.0.2, 10.0.9.9\n10.0.0.3, 10.0.9.9\n";
        assert_eq!(
            parse_lattice(ARROW_DIAMOND, "10.0.9.9").unwrap(),
            parse_lattice(flat, "10.0.9.9").unwrap()
        );
    }

    #[test]
    fn test_brackets_attached_to_labels() {
        let map = parse_lattice("Lattice:\nA -> [B, C]\n", "C").unwrap();
        assert!(map.contains_edge("A", "B"));
        assert!(map.contains_edge("A", END_LABEL));
        assert_eq!(map.edge_count(), 2);
    }

    #[test]
    fn test_leaf_only_block() {
        let map = parse_lattice("Lattice:\n10.0.9.9\nA,\n", "10.0.9.9").unwrap();
        assert!(map.is_empty());
    }

    #[test]
    fn test_stray_comma_is_skipped() {
        let map = parse_lattice("Lattice:\nA , B\n", "B").unwrap();
        assert!(map.contains_edge("A", END_LABEL));
        assert_eq!(map.edge_count(), 1);
    }

    #[test]
    fn test_record_without_parent_is_malformed() {
        let err = parse_lattice("header\nLattice:\nNone, A\n-> [ B ]\n", "B").unwrap_err();
        assert_eq!(
            err,
            LatticeError::MalformedRecord {
                line: 4,
                content: "-> [ B ]".into()
            }
        );
    }

    #[test]
    fn test_arrow_without_children_is_malformed() {
        let err = parse_lattice("Lattice:\nA -> [ ]\n", "B").unwrap_err();
        assert!(matches!(err, LatticeError::MalformedRecord { line: 2, .. }));
    }

    #[test]
    fn test_punctuation_only_record_is_malformed() {
        let err = parse_lattice("Lattice:\nNone, A\n, ]\n", "B").unwrap_err();
        assert!(matches!(err, LatticeError::MalformedRecord { line: 3, .. }));
    }

    #[test]
    fn test_marker_only_gives_empty_map() {
        let map = parse_lattice("Lattice:\n", "B").unwrap();
        assert!(map.is_empty());
    }
}
