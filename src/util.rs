use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

use clap::ArgMatches;
use serde_json::Value;
use tracing::info;

use crate::config::SearchConfig;
use crate::dimacs::read_dimacs;
use crate::edge_list::read_edge_list;
use crate::error::{CliqueError, Result};
use crate::graph::Graph;
use crate::vertex_set::VertexSet;

/** format of an instance file */
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstanceFormat {
    /// "n m" header, then one tab-separated pair of labels per edge
    EdgeList,
    /// DIMACS "p edge" format
    Dimacs,
}

impl FromStr for InstanceFormat {
    type Err = CliqueError;

    fn from_str(s:&str) -> Result<Self> {
        match s {
            "edgelist" | "edge_list" => Ok(InstanceFormat::EdgeList),
            "dimacs" => Ok(InstanceFormat::Dimacs),
            _ => Err(CliqueError::Config(format!("instance type unknown {}", s))),
        }
    }
}

/** command line parameters of the executables */
#[derive(Debug, Clone)]
pub struct Params {
    /// instance file
    pub inst_filename: String,
    /// instance format
    pub format: InstanceFormat,
    /// search parameters
    pub config: SearchConfig,
    /// where to write the clique
    pub sol_file: Option<String>,
    /// where to write the statistics (JSON)
    pub perf_file: Option<String>,
    /// number of -v flags
    pub verbosity: u64,
    /// no logs at all
    pub quiet: bool,
    /// where to copy the logs
    pub log_file: Option<PathBuf>,
}

fn parse_number(main_args:&ArgMatches, name:&str) -> Result<Option<usize>> {
    match main_args.value_of(name) {
        None => Ok(None),
        Some(s) => s.parse::<usize>().map(Some).map_err(|_|
            CliqueError::Config(format!("unable to parse --{} ({})", name, s))
        ),
    }
}

/**
reads command line input: instance, format, configuration (a JSON file or
the mcq preset, overridden by --workers and --granularity), output files
and logging options.
*/
pub fn read_params(main_args:&ArgMatches) -> Result<Params> {
    let inst_filename = main_args.value_of("instance")
        .ok_or_else(|| CliqueError::Config("missing instance".to_string()))?
        .to_string();
    let format = main_args.value_of("type").unwrap_or("edgelist").parse::<InstanceFormat>()?;
    let mut config = match main_args.value_of("config") {
        Some(path) => SearchConfig::from_file(path)?,
        None if main_args.is_present("mcq") => SearchConfig::mcq(),
        None => SearchConfig::default(),
    };
    if let Some(workers) = parse_number(main_args, "workers")? { config.workers = workers; }
    if let Some(granularity) = parse_number(main_args, "granularity")? { config.granularity = granularity; }
    Ok(Params {
        inst_filename,
        format,
        config,
        sol_file: main_args.value_of("solution").map(|s| s.to_string()),
        perf_file: main_args.value_of("perf").map(|s| s.to_string()),
        verbosity: main_args.occurrences_of("verbose"),
        quiet: main_args.is_present("quiet"),
        log_file: main_args.value_of("log-file").map(PathBuf::from),
    })
}

/** reads an instance file */
pub fn read_instance(filename:&str, format:InstanceFormat) -> Result<Graph> {
    let res = match format {
        InstanceFormat::EdgeList => read_edge_list(filename)?,
        InstanceFormat::Dimacs => read_dimacs(filename)?,
    };
    info!("instance {}", filename);
    res.display_statistics();
    Ok(res)
}

/** clique as written in a solution file: one label per line */
pub fn clique_to_string(g:&Graph, clique:&VertexSet) -> String {
    let mut res = String::new();
    for label in clique.labels(g) {
        res += label.as_str();
        res += "\n";
    }
    res
}

/// exports search results to files
pub fn export_results(
    g:&Graph,
    clique:&VertexSet,
    stats:&Value,
    perf_file:Option<&str>,
    sol_file:Option<&str>,
) -> Result<()> {
    if let Some(filename) = perf_file {
        info!("printing perfs in: {}", filename);
        fs::write(filename, serde_json::to_string(stats)?)
            .map_err(|e| CliqueError::io(filename, e))?;
    }
    if let Some(filename) = sol_file {
        info!("printing solution in: {}", filename);
        fs::write(filename, clique_to_string(g, clique))
            .map_err(|e| CliqueError::io(filename, e))?;
    }
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::*;
    use clap::{App, Arg};
    use serde_json::json;

    fn app() -> App<'static, 'static> {
        App::new("test")
            .arg(Arg::with_name("instance").required(true))
            .arg(Arg::with_name("type").long("type").takes_value(true))
            .arg(Arg::with_name("config").long("config").takes_value(true))
            .arg(Arg::with_name("mcq").long("mcq"))
            .arg(Arg::with_name("workers").long("workers").takes_value(true))
            .arg(Arg::with_name("granularity").long("granularity").takes_value(true))
            .arg(Arg::with_name("solution").long("solution").takes_value(true))
            .arg(Arg::with_name("perf").long("perf").takes_value(true))
            .arg(Arg::with_name("verbose").short("v").multiple(true))
            .arg(Arg::with_name("quiet").long("quiet"))
            .arg(Arg::with_name("log-file").long("log-file").takes_value(true))
    }

    #[test]
    fn test_read_params() {
        let args = app().get_matches_from(vec![
            "test", "insts/paw.col", "--type", "dimacs", "--mcq", "--workers", "2", "-vv"
        ]);
        let params = read_params(&args).unwrap();
        assert_eq!(params.inst_filename, "insts/paw.col");
        assert_eq!(params.format, InstanceFormat::Dimacs);
        assert_eq!(params.config.workers, 2);
        assert_eq!(params.config.candidates, SearchConfig::mcq().candidates);
        assert_eq!(params.verbosity, 2);
        assert!(!params.quiet);
        let g = read_instance(&params.inst_filename, params.format).unwrap();
        assert_eq!(g.nb_vertices(), 4);
    }

    #[test]
    fn test_invalid_params() {
        let args = app().get_matches_from(vec!["test", "x", "--type", "json"]);
        assert!(matches!(read_params(&args), Err(CliqueError::Config(_))));
        let args = app().get_matches_from(vec!["test", "x", "--workers", "two"]);
        assert!(matches!(read_params(&args), Err(CliqueError::Config(_))));
    }

    #[test]
    fn test_export_results() {
        let dir = tempfile::tempdir().unwrap();
        let g = read_instance("insts/paw.txt", InstanceFormat::EdgeList).unwrap();
        let clique = VertexSet::from_vertices(&g, vec![0, 1, 2]);
        let perf = dir.path().join("perf.json");
        let sol = dir.path().join("sol.txt");
        export_results(
            &g, &clique, &json!({"clique_size": 3}),
            perf.to_str(), sol.to_str()
        ).unwrap();
        assert_eq!(fs::read_to_string(&sol).unwrap(), "A\nB\nC\n");
        let stats:Value = serde_json::from_str(&fs::read_to_string(&perf).unwrap()).unwrap();
        assert_eq!(stats["clique_size"], 3);
    }
}
