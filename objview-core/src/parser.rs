/// Tolerant parser for line-oriented `v` / `f` mesh descriptions
///
/// Each line is parsed on its own. A malformed `v` or `f` line is recorded
/// as a [`LineError`] and skipped; the rest of the file still loads.
use nom::{
    branch::alt,
    character::complete::{char, u32 as index_u32},
    combinator::{all_consuming, eof, rest, verify},
    number::complete::float,
    sequence::{preceded, terminated},
    IResult,
};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use tracing::{debug, info, warn};

use crate::error::{LineError, LoadError};
use crate::geometry::{GeometryStore, Vertex};

/// How face records with more than three references are turned into triangles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FacePolicy {
    /// Keep only the first three references; the rest are dropped
    #[default]
    FirstTriangle,
    /// Fan-triangulate around the first reference
    Fan,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParserOptions {
    #[serde(default)]
    pub face_policy: FacePolicy,
}

/// Geometry produced by a load plus the lines that had to be skipped
#[derive(Debug, Clone, Default)]
pub struct ParsedMesh {
    pub geometry: GeometryStore,
    pub diagnostics: Vec<LineError>,
    pub lines_read: usize,
}

impl ParsedMesh {
    pub fn skipped_lines(&self) -> usize {
        self.diagnostics.len()
    }
}

/// What a single well-formed line contributes
#[derive(Debug, Clone, PartialEq)]
enum Record {
    Vertex(Vertex),
    Face(Vec<[u32; 3]>),
    Ignored,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MeshParser {
    options: ParserOptions,
}

impl MeshParser {
    pub fn new(options: ParserOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> ParserOptions {
        self.options
    }

    /// Parse an in-memory mesh description
    pub fn parse_str(&self, text: &str) -> ParsedMesh {
        let mut builder = Builder::new(self.options);
        for line in text.lines() {
            builder.feed(line);
        }
        builder.finish()
    }

    /// Parse from any buffered reader.
    ///
    /// Lines that are not valid UTF-8 are decoded lossily. Only a failing
    /// read aborts the parse.
    pub fn parse_reader<R: BufRead>(&self, mut reader: R) -> io::Result<ParsedMesh> {
        let mut builder = Builder::new(self.options);
        let mut buf = Vec::new();

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            let line = String::from_utf8_lossy(&buf);
            builder.feed(line.trim_end_matches(['\n', '\r']));
        }

        Ok(builder.finish())
    }

    /// Load a mesh file from disk.
    ///
    /// A file that cannot be opened or read yields [`LoadError::FileAccess`];
    /// callers that want to keep running can fall back to
    /// `ParsedMesh::default()`, which holds an empty store.
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<ParsedMesh, LoadError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Opening mesh file");

        let access = |source| LoadError::FileAccess {
            path: path.to_path_buf(),
            source,
        };
        let file = File::open(path).map_err(access)?;
        self.parse_reader(BufReader::new(file)).map_err(access)
    }
}

/// Parse a mesh description with default options
pub fn parse_mesh(text: &str) -> ParsedMesh {
    MeshParser::default().parse_str(text)
}

struct Builder {
    options: ParserOptions,
    mesh: ParsedMesh,
}

impl Builder {
    fn new(options: ParserOptions) -> Self {
        Self {
            options,
            mesh: ParsedMesh::default(),
        }
    }

    fn feed(&mut self, line: &str) {
        self.mesh.lines_read += 1;
        let line_no = self.mesh.lines_read;
        let line = match line_no {
            1 => line.strip_prefix('\u{feff}').unwrap_or(line),
            _ => line,
        };

        match parse_line(line_no, line, self.options.face_policy) {
            Ok(Record::Vertex(vertex)) => self.mesh.geometry.push_vertex(vertex),
            Ok(Record::Face(triangles)) => {
                for triangle in triangles {
                    self.mesh.geometry.push_triangle(triangle);
                }
            }
            Ok(Record::Ignored) => {}
            Err(err) => {
                warn!("{}", err);
                self.mesh.diagnostics.push(err);
            }
        }
    }

    fn finish(self) -> ParsedMesh {
        let geometry = &self.mesh.geometry;
        info!(
            vertices = geometry.vertex_count(),
            triangles = geometry.triangle_count(),
            indices = geometry.index_count(),
            skipped = self.mesh.skipped_lines(),
            "Loaded mesh"
        );
        self.mesh
    }
}

fn parse_line(line_no: usize, line: &str, policy: FacePolicy) -> Result<Record, LineError> {
    let mut tokens = line.split_whitespace();

    match tokens.next() {
        Some("v") => parse_vertex(tokens).ok_or_else(|| LineError::MalformedVertex {
            line: line_no,
            content: line.trim().to_string(),
        }),
        Some("f") => parse_face(tokens, policy).map_err(|reason| LineError::MalformedFace {
            line: line_no,
            content: line.trim().to_string(),
            reason,
        }),
        _ => Ok(Record::Ignored),
    }
}

/// Extra tokens after the third coordinate are ignored
fn parse_vertex<'a>(mut tokens: impl Iterator<Item = &'a str>) -> Option<Record> {
    let mut next = || tokens.next().and_then(|t| coordinate(t).ok()).map(|(_, v)| v);
    let x = next()?;
    let y = next()?;
    let z = next()?;
    Some(Record::Vertex(Vertex::new(x, y, z)))
}

fn parse_face<'a>(
    tokens: impl Iterator<Item = &'a str>,
    policy: FacePolicy,
) -> Result<Record, String> {
    let refs: Vec<&str> = tokens.collect();
    if refs.len() < 3 {
        return Err("face has fewer than 3 vertices".to_string());
    }

    let used = match policy {
        FacePolicy::FirstTriangle => &refs[..3],
        FacePolicy::Fan => &refs[..],
    };

    let indices = used
        .iter()
        .map(|token| resolve_face_ref(token))
        .collect::<Result<Vec<u32>, String>>()?;

    let triangles = (1..indices.len() - 1)
        .map(|i| [indices[0], indices[i], indices[i + 1]])
        .collect();
    Ok(Record::Face(triangles))
}

/// Turn a 1-based face reference (`12`, `12/3`, `12/3/4`, `12//4`) into a
/// 0-based index. Bounds are not checked here.
fn resolve_face_ref(token: &str) -> Result<u32, String> {
    match face_ref(token) {
        Ok((_, 0)) | Err(_) => Err(format!("invalid vertex reference '{}'", token)),
        Ok((_, one_based)) => Ok(one_based - 1),
    }
}

/// Non-finite values (`nan`, `inf`) are rejected
fn coordinate(input: &str) -> IResult<&str, f32> {
    all_consuming(verify(float, |v: &f32| v.is_finite()))(input)
}

fn face_ref(input: &str) -> IResult<&str, u32> {
    terminated(index_u32, alt((eof, preceded(char('/'), rest))))(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn indices_of(text: &str) -> Vec<u32> {
        parse_mesh(text).geometry.indices().to_vec()
    }

    #[test]
    fn test_vertex_coordinates_are_exact() {
        let mesh = parse_mesh("v 1.5 -2.25 3e2\nv 0.1 .5 -0\n");
        assert_eq!(
            mesh.geometry.vertices(),
            &[Vertex::new(1.5, -2.25, 300.0), Vertex::new(0.1, 0.5, -0.0)]
        );
        assert!(mesh.diagnostics.is_empty());
    }

    #[test]
    fn test_vertex_extra_coordinate_ignored() {
        let mesh = parse_mesh("v 1 2 3 1.0\n");
        assert_eq!(mesh.geometry.vertices(), &[Vertex::new(1.0, 2.0, 3.0)]);
    }

    #[test]
    fn test_short_vertex_is_skipped() {
        let mesh = parse_mesh("v 0 0 0\nv 1 2\nv 1 2 3\n");
        assert_eq!(mesh.geometry.vertex_count(), 2);
        assert_eq!(
            mesh.diagnostics,
            vec![LineError::MalformedVertex {
                line: 2,
                content: "v 1 2".to_string()
            }]
        );
    }

    #[test]
    fn test_non_numeric_vertex_is_skipped() {
        let mesh = parse_mesh("v 1 two 3\nv 1 2 3abc\n");
        assert_eq!(mesh.geometry.vertex_count(), 0);
        assert_eq!(mesh.skipped_lines(), 2);
    }

    #[test]
    fn test_non_finite_vertex_is_skipped() {
        let mesh = parse_mesh("v nan 0 0\nv 0 inf 0\nv 0 0 -infinity\nv 1 2 3\n");
        assert_eq!(mesh.geometry.vertices(), &[Vertex::new(1.0, 2.0, 3.0)]);
        let lines: Vec<usize> = mesh.diagnostics.iter().map(LineError::line).collect();
        assert_eq!(lines, vec![1, 2, 3]);
    }

    #[test]
    fn test_leading_byte_order_mark_is_stripped() {
        let mesh = parse_mesh("\u{feff}v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n");
        assert_eq!(mesh.geometry.vertex_count(), 3);
        assert_eq!(mesh.geometry.vertex(0), Some(&Vertex::new(0.0, 0.0, 0.0)));
        assert_eq!(mesh.geometry.indices(), &[0, 1, 2]);
        assert!(mesh.diagnostics.is_empty());

        let bytes: &[u8] = b"\xef\xbb\xbfv 5 6 7\n";
        let mesh = MeshParser::default().parse_reader(bytes).unwrap();
        assert_eq!(mesh.geometry.vertices(), &[Vertex::new(5.0, 6.0, 7.0)]);
    }

    #[test]
    fn test_face_is_converted_to_zero_based() {
        assert_eq!(indices_of("f 1 2 3\n"), vec![0, 1, 2]);
    }

    #[test]
    fn test_face_keeps_only_first_three_refs() {
        assert_eq!(indices_of("f 4 5 6 7 8\n"), vec![3, 4, 5]);
    }

    #[test]
    fn test_composite_ref_uses_first_field() {
        assert_eq!(indices_of("f 12/3/4 12 12//9\n"), vec![11, 11, 11]);
        assert_eq!(indices_of("f 1/1 2/2 3/3\n"), vec![0, 1, 2]);
    }

    #[test]
    fn test_short_face_is_skipped() {
        let mesh = parse_mesh("v 0 0 0\nf 1 2\nf\n");
        assert_eq!(mesh.geometry.index_count(), 0);
        assert_eq!(mesh.geometry.vertex_count(), 1);

        let lines: Vec<usize> = mesh.diagnostics.iter().map(LineError::line).collect();
        assert_eq!(lines, vec![2, 3]);
        match &mesh.diagnostics[0] {
            LineError::MalformedFace { content, .. } => assert_eq!(content, "f 1 2"),
            other => panic!("unexpected diagnostic: {:?}", other),
        }
    }

    #[test]
    fn test_bad_face_ref_skips_whole_line() {
        for text in ["f 1 x 3\n", "f 0 1 2\n", "f -1 2 3\n", "f 1 2 3a\n"] {
            let mesh = parse_mesh(text);
            assert_eq!(mesh.geometry.index_count(), 0, "{}", text);
            assert_eq!(mesh.skipped_lines(), 1, "{}", text);
        }
    }

    #[test]
    fn test_face_refs_are_not_bounds_checked() {
        assert_eq!(indices_of("v 0 0 0\nf 1 2 99\n"), vec![0, 1, 98]);
    }

    #[test]
    fn test_unknown_tags_ignored() {
        let text = "# comment\nvn 0 0 1\nvt 0 1\no thing\nusemtl steel\n\n   \nvertex 1 2 3\n";
        let mesh = parse_mesh(text);
        assert!(mesh.geometry.is_empty());
        assert!(mesh.diagnostics.is_empty());
        assert_eq!(mesh.lines_read, 8);
    }

    #[test]
    fn test_fan_policy() {
        let parser = MeshParser::new(ParserOptions {
            face_policy: FacePolicy::Fan,
        });
        let mesh = parser.parse_str("f 1 2 3 4 5\n");
        assert_eq!(mesh.geometry.indices(), &[0, 1, 2, 0, 2, 3, 0, 3, 4]);
        assert_eq!(mesh.geometry.triangle_count(), 3);
    }

    #[test]
    fn test_reader_handles_crlf_and_invalid_utf8() {
        let bytes: &[u8] = b"v 0 0 0\r\n# caf\xe9\r\nv 1 0 0\r\nv 0 1 0\r\nf 1 2 3";
        let mesh = MeshParser::default().parse_reader(bytes).unwrap();
        assert_eq!(mesh.geometry.vertex_count(), 3);
        assert_eq!(mesh.geometry.indices(), &[0, 1, 2]);
        assert!(mesh.diagnostics.is_empty());
    }
}
