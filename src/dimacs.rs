use std::fs;
use std::path::Path;

use nom::IResult;
use nom::branch::alt;
use nom::bytes::complete::tag;
use nom::character::complete::{digit1, space0, space1};
use nom::combinator::{all_consuming, map_res};
use nom::sequence::{preceded, terminated, tuple};
use tracing::{debug, warn};

use crate::error::{CliqueError, Result};
use crate::graph::Graph;

/// reads a number
fn read_integer(s:&str) -> IResult<&str, usize> {
    map_res(digit1, str::parse::<usize>)(s)
}

/// reads two numbers separated by spaces
fn read_two_integers(s:&str) -> IResult<&str, (usize,usize)> {
    let (s, (a, _, b)) = tuple((read_integer, space1, read_integer))(s)?;
    Ok((s, (a,b)))
}

/// reads header containing (n,m)
pub fn read_header(s:&str) -> IResult<&str, (usize,usize)> {
    terminated(
        preceded(tuple((tag("p"), space1, alt((tag("edge"), tag("col"))), space1)), read_two_integers),
        space0,
    )(s)
}

/// reads edge line (WARNING: indices start at 1 in the DIMACS format)
pub fn read_edge(s:&str) -> IResult<&str, (usize,usize)> {
    terminated(preceded(tuple((tag("e"), space1)), read_two_integers), space0)(s)
}

fn parse_error(line:usize, message:String) -> CliqueError {
    CliqueError::Parse { line, message }
}

/**
parses a DIMACS graph: comment lines start with 'c', the header is
"p edge n m" (or "p col n m"), edges are "e a b" with vertices numbered from 1.
Vertex i is labeled "i". Some files list each edge twice: both are accepted.
*/
pub fn parse_dimacs(content:&str) -> Result<Graph> {
    let mut res:Option<Graph> = None;
    let mut declared_edges = 0;
    let mut nb_edge_lines = 0;
    for (i, l) in content.lines().enumerate() {
        let line = i+1;
        let l = l.trim();
        if l.is_empty() || l.starts_with('c') { continue; }
        match res.as_mut() {
            None => {
                let (_, (n, m)) = all_consuming(read_header)(l)
                    .map_err(|_| parse_error(line, format!("invalid header: {:?}", l)))?;
                let mut g = Graph::with_capacity(n);
                for v in 1..=n { g.create_vertex(Some(&v.to_string())); }
                declared_edges = m;
                res = Some(g);
            },
            Some(g) => {
                let (_, (a, b)) = all_consuming(read_edge)(l)
                    .map_err(|_| parse_error(line, format!("invalid edge: {:?}", l)))?;
                let n = g.capacity();
                if a == 0 || b == 0 || a > n || b > n {
                    return Err(parse_error(line, format!("edge ({},{}) out of range 1..={}", a, b, n)));
                }
                g.connect(a-1, b-1);
                nb_edge_lines += 1;
            }
        }
    }
    let g = res.ok_or_else(|| parse_error(1, "missing header".to_string()))?;
    if nb_edge_lines != declared_edges && nb_edge_lines != 2*declared_edges {
        warn!("DIMACS: {} edges declared, {} read", declared_edges, nb_edge_lines);
    }
    Ok(g)
}

/** reads a DIMACS file (see [`parse_dimacs`]) */
pub fn read_dimacs<P:AsRef<Path>>(path:P) -> Result<Graph> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| CliqueError::io(path, e))?;
    let res = parse_dimacs(&content)?;
    debug!("read {:?}: {} vertices, {} edges", path, res.nb_vertices(), res.nb_edges());
    Ok(res)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_header() {
        let s = "p edge 2 1";
        assert_eq!(read_header(s).unwrap(), ("", (2,1)));
        assert_eq!(read_header("p col 5 10 ").unwrap().1, (5,10));
        assert!(read_header("p cnf 5 10").is_err());
    }

    #[test]
    fn test_read_edge() {
        let s = "e 1 2";
        assert_eq!(read_edge(s).unwrap().1, (1,2));
        assert_eq!(read_edge(s).unwrap().0, "");
    }

    #[test]
    fn test_parse_dimacs() {
        let s = "c this is a test comment\np edge 4 4\ne 1 2\ne 2 3\r\ne 3 1\ne 3 4\n";
        let g = parse_dimacs(s).unwrap();
        assert_eq!(g.nb_vertices(), 4);
        assert_eq!(g.nb_edges(), 4);
        assert_eq!(g.vertex("3"), Some(2));
        assert_eq!(g.degree(2), 3);
    }

    #[test]
    fn test_isolated_vertices_are_kept() {
        let g = parse_dimacs("p edge 5 1\ne 1 2\n").unwrap();
        assert_eq!(g.nb_vertices(), 5);
        assert_eq!(g.degree(4), 0);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(parse_dimacs("c nothing\n"), Err(CliqueError::Parse { .. })));
        assert!(matches!(parse_dimacs("p edge 2 1\ne 1 3\n"), Err(CliqueError::Parse { line: 2, .. })));
        assert!(matches!(parse_dimacs("p edge 2 1\nx 1 2\n"), Err(CliqueError::Parse { line: 2, .. })));
    }

    #[test]
    fn test_read_file() {
        let g = read_dimacs("insts/paw.col").unwrap();
        assert_eq!(g.nb_vertices(), 4);
        assert_eq!(g.nb_edges(), 4);
    }
}
