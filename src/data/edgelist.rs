//! Plain-text edge list loading

use std::fs::File;
use std::io;
use std::path::Path;
use memmap2::Mmap;
use crate::config::LoaderOptions;
use crate::error::{AnalysisError, Result};
use crate::graph::NodeId;

/// Parse one endpoint token
fn parse_endpoint(token: Option<&str>, line: usize, record: &str) -> Result<NodeId> {
    token
        .and_then(|t| t.parse::<NodeId>().ok())
        .ok_or_else(|| AnalysisError::InvalidEdge {
            line,
            record: record.to_string(),
        })
}

/// Parse edge-list text into raw `(u, v)` pairs
///
/// Node ids are unsigned 32-bit integers; a token that is negative or above
/// `u32::MAX` is reported as `InvalidEdge`. Blank lines and lines whose first non-blank characters are the comment
/// marker are skipped. Columns after the first two are ignored.
pub fn parse_edge_list(text: &str, options: &LoaderOptions) -> Result<Vec<(NodeId, NodeId)>> {
    let mut edges = Vec::new();

    for (i, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        if !options.comment_marker.is_empty() && line.starts_with(options.comment_marker.as_str()) {
            continue;
        }

        let mut tokens: Box<dyn Iterator<Item = &str> + '_> = match options.delimiter {
            Some(delim) => Box::new(line.split(delim).map(str::trim)),
            None => Box::new(line.split_whitespace()),
        };

        let u = parse_endpoint(tokens.next(), i + 1, raw)?;
        let v = parse_endpoint(tokens.next(), i + 1, raw)?;
        edges.push((u, v));
    }

    Ok(edges)
}

/// Load an edge-list file
pub fn load_edge_list<P: AsRef<Path>>(path: P, options: &LoaderOptions) -> Result<Vec<(NodeId, NodeId)>> {
    let path = path.as_ref();
    log::info!("Reading edge list: {}", path.display());

    let file = File::open(path)?;
    if file.metadata()?.len() == 0 {
        return Ok(Vec::new());
    }

    // SAFETY: the map is read-only and dropped before this function returns;
    // the input file is not expected to change while it is being parsed.
    let mmap = unsafe { Mmap::map(&file)? };
    let text = std::str::from_utf8(&mmap)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

    let edges = parse_edge_list(text, options)?;
    log::info!("Loaded {} edge records", edges.len());

    Ok(edges)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn skips_comments_and_blank_lines() {
        let text = "# header\n\n1\t2\n  # indented comment\n2\t3\n";
        let edges = parse_edge_list(text, &LoaderOptions::default()).unwrap();
        assert_eq!(edges, vec![(1, 2), (2, 3)]);
    }

    #[test]
    fn extra_columns_ignored() {
        let edges = parse_edge_list("1 2 0.5\n", &LoaderOptions::default()).unwrap();
        assert_eq!(edges, vec![(1, 2)]);
    }

    #[test]
    fn explicit_delimiter() {
        let options = LoaderOptions {
            delimiter: Some(','),
            ..LoaderOptions::default()
        };
        let edges = parse_edge_list("1, 2\n3,4\n", &options).unwrap();
        assert_eq!(edges, vec![(1, 2), (3, 4)]);
    }

    #[test]
    fn non_integer_endpoint_reports_line() {
        let err = parse_edge_list("1\t2\n3\tx\n", &LoaderOptions::default()).unwrap_err();
        match err {
            AnalysisError::InvalidEdge { line, record } => {
                assert_eq!(line, 2);
                assert_eq!(record, "3\tx");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_endpoint_is_invalid() {
        assert!(matches!(
            parse_edge_list("7\n", &LoaderOptions::default()),
            Err(AnalysisError::InvalidEdge { line: 1, .. })
        ));
        assert!(matches!(
            parse_edge_list("-1 2\n", &LoaderOptions::default()),
            Err(AnalysisError::InvalidEdge { .. })
        ));
    }

    #[test]
    fn ids_are_limited_to_32_bits() {
        let edges = parse_edge_list("4294967295 0\n", &LoaderOptions::default()).unwrap();
        assert_eq!(edges, vec![(u32::MAX, 0)]);

        let err = parse_edge_list("1 2\n4294967296 0\n", &LoaderOptions::default()).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidEdge { line: 2, .. }));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# Directed graph (each unordered pair of nodes is saved once)").unwrap();
        writeln!(file, "# FromNodeId\tToNodeId").unwrap();
        writeln!(file, "10\t20").unwrap();
        writeln!(file, "20\t10").unwrap();
        file.flush().unwrap();

        let edges = load_edge_list(file.path(), &LoaderOptions::default()).unwrap();
        assert_eq!(edges, vec![(10, 20), (20, 10)]);
    }

    #[test]
    fn empty_file_has_no_edges() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let edges = load_edge_list(file.path(), &LoaderOptions::default()).unwrap();
        assert!(edges.is_empty());
    }
}
