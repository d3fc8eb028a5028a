use std::fs;
use std::path::Path;

use nom::IResult;
use nom::bytes::complete::{tag, take_till1};
use nom::character::complete::{digit1, space0, space1};
use nom::combinator::{all_consuming, map_res};
use nom::sequence::{separated_pair, tuple};
use tracing::{debug, warn};

use crate::error::{CliqueError, Result};
use crate::graph::Graph;

/** reads the header containing (n,m) */
pub fn read_header(s:&str) -> IResult<&str, (usize,usize)> {
    let (s, (_, n, _, m, _)) = tuple((
        space0,
        map_res(digit1, str::parse::<usize>),
        space1,
        map_res(digit1, str::parse::<usize>),
        space0,
    ))(s)?;
    Ok((s, (n,m)))
}

/// vertex label: anything up to a tab or a whitespace
fn read_label(s:&str) -> IResult<&str, &str> {
    take_till1(|c:char| c.is_whitespace())(s)
}

/** reads an edge line: two labels separated by a tab */
pub fn read_edge(s:&str) -> IResult<&str, (&str,&str)> {
    separated_pair(read_label, tag("\t"), read_label)(s)
}

fn parse_error(line:usize, message:&str, content:&str) -> CliqueError {
    CliqueError::Parse { line, message: format!("{}: {:?}", message, content) }
}

/**
parses an edge list: a first line "n m", then one line per edge made of two
vertex labels separated by a tab. Vertices are created in order of first
appearance. Empty lines are ignored.
*/
pub fn parse_edge_list(content:&str) -> Result<Graph> {
    let mut lines = content.lines()
        .enumerate()
        .map(|(i,l)| (i+1, l.trim_end()))
        .filter(|(_,l)| !l.is_empty());
    let (header_line, header) = lines.next()
        .ok_or_else(|| CliqueError::Parse { line: 1, message: "missing header".to_string() })?;
    let (_, (n, m)) = all_consuming(read_header)(header)
        .map_err(|_| parse_error(header_line, "invalid header", header))?;
    let mut res = Graph::with_capacity(n);
    let mut nb_edges = 0;
    for (line, l) in lines {
        let (_, (a, b)) = all_consuming(read_edge)(l)
            .map_err(|_| parse_error(line, "invalid edge", l))?;
        let mut vertex = |label:&str| -> Result<usize> {
            if let Some(v) = res.vertex(label) { return Ok(v); }
            if res.nb_vertices() >= n { return Err(CliqueError::CapacityExceeded { capacity: n }); }
            Ok(res.create_vertex(Some(label)))
        };
        let va = vertex(a)?;
        let vb = vertex(b)?;
        res.connect(va, vb);
        nb_edges += 1;
    }
    if nb_edges != m {
        warn!("edge list: {} edges declared, {} read", m, nb_edges);
    }
    Ok(res)
}

/** reads an edge list file (see [`parse_edge_list`]) */
pub fn read_edge_list<P:AsRef<Path>>(path:P) -> Result<Graph> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| CliqueError::io(path, e))?;
    let res = parse_edge_list(&content)?;
    debug!("read {:?}: {} vertices, {} edges", path, res.nb_vertices(), res.nb_edges());
    Ok(res)
}

/** writes the active part of g as an edge list (edges in traversal order) */
pub fn edge_list_to_string(g:&Graph) -> String {
    let vertices:Vec<usize> = g.vertices().collect();
    let mut res = format!("{} {}\n", g.nb_vertices(), g.nb_edges());
    for (i,a) in vertices.iter().enumerate() {
        for b in &vertices[i+1..] {
            if g.are_adjacent(*a, *b) {
                res += format!("{}\t{}\n", g.display_label(*a), g.display_label(*b)).as_str();
            }
        }
    }
    res
}
