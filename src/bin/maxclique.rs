use std::process;

use clap::{App, load_yaml};
use serde_json::json;
use tracing::{error, info};

use dogs_clique::error::Result;
use dogs_clique::finder::find_maximum_clique_with_stats;
use dogs_clique::logging::setup_logging;
use dogs_clique::util::{read_params, read_instance, export_results};


/** reads an instance and searches for a maximum clique */
fn run() -> Result<()> {
    // parse arguments
    let yaml = load_yaml!("maxclique.yml");
    let main_args = App::from_yaml(yaml).get_matches();
    let params = read_params(&main_args)?;
    setup_logging(params.verbosity, params.quiet, params.log_file.as_deref())?;

    // solve it
    let mut g = read_instance(&params.inst_filename, params.format)?;
    let (clique, stats) = find_maximum_clique_with_stats(&mut g, &params.config)?;
    info!("maximum clique size: {}", clique.len());
    println!("{}", clique.len());
    println!("{}", clique.labels(&g).join("\t"));
    let perf = json!({
        "primal_list": vec![clique.len()],
        "clique_size": clique.len(),
        "time_searched": stats.time_searched,
        "inst_name": params.inst_filename,
        "nb_vertices": g.nb_vertices(),
        "nb_edges": g.nb_edges(),
        "heuristic": stats.heuristic_size,
        "nb_vertices_preprocessed": stats.nb_vertices_preprocessed,
        "nb_edges_preprocessed": stats.nb_edges_preprocessed,
        "branching": stats.branching,
        "workers": params.config.workers,
    });

    // export results
    export_results(&g, &clique, &perf, params.perf_file.as_deref(), params.sol_file.as_deref())
}

pub fn main() {
    if let Err(e) = run() {
        error!("{}", e);
        eprintln!("error: {}", e);
        process::exit(1);
    }
}
