use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CliqueError, Result};
use crate::graph::{DegreeOrder, Graph};
use crate::search::brancher::{Brancher, SearchDirection};
use crate::search::candidates::CandidateStrategy;
use crate::search::clique_test::{CliqueTest, TestKind};
use crate::search::preprocessor::{Preprocessor, StopCriterion};
use crate::vertex_set::VertexSet;

/** one preprocessing step, as written in a configuration file */
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StepConfig {
    /// clique test
    pub test: TestKind,
    /// candidate order
    #[serde(default)]
    pub candidates: CandidateStrategy,
    /// recursion level
    #[serde(default = "default_level")]
    pub level: usize,
}

fn default_level() -> usize { 1 }

/** configuration of a preprocessor */
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PreprocessorConfig {
    /// steps, applied in order
    pub steps: Vec<StepConfig>,
    /// measure compared between two sweeps
    pub stop_criterion: StopCriterion,
    /// a sweep is repeated while it reduces the measure below previous * stop_ratio
    pub stop_ratio: f64,
}

impl Default for PreprocessorConfig {
    fn default() -> Self {
        Self {
            steps: vec![StepConfig {
                test: TestKind::Color,
                candidates: CandidateStrategy::LowDegreeLazy,
                level: 1,
            }],
            stop_criterion: StopCriterion::Nodes,
            stop_ratio: 0.9,
        }
    }
}

impl PreprocessorConfig {
    /** builds the preprocessor. Lazy tests are computed on the whole graph. */
    pub fn build(&self, g:&Graph) -> Preprocessor {
        let full = VertexSet::full(g);
        let mut res = Preprocessor::new();
        res.set_stop_criterion(self.stop_criterion)
            .set_stop_ratio(self.stop_ratio);
        for step in &self.steps {
            res.add_step(CliqueTest::build(step.test, g, &full), step.candidates, step.level);
        }
        res
    }

    fn validate(&self, name:&str) -> Result<()> {
        if !(self.stop_ratio > 0. && self.stop_ratio <= 1.) {
            return Err(CliqueError::Config(format!(
                "{}: stop_ratio must be in (0,1] (found {})", name, self.stop_ratio
            )));
        }
        Ok(())
    }
}

/**
Parameters of the maximum clique search.

The pipeline is: greedy heuristic, preprocessing of the graph with the
heuristic size as target, shrink, sort, heuristic again (initial incumbent),
branch and bound (sequential, or distributed if workers > 0).
*/
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchConfig {
    /// runs the greedy heuristic to get a lower bound
    pub heuristic: bool,
    /// preprocesses the whole graph before the search
    pub preprocessing: Option<PreprocessorConfig>,
    /// compacts the graph after preprocessing
    pub shrink: bool,
    /// sorts the traversal order by degree before the search
    pub sort_by_degree: Option<DegreeOrder>,
    /// candidate selection of the brancher
    pub candidates: CandidateStrategy,
    /// branching order
    pub direction: SearchDirection,
    /// degree preprocessing when entering a node
    pub branch_degree_preprocessing: bool,
    /// degree preprocessing after each candidate
    pub node_degree_preprocessing: bool,
    /// preprocessing when entering a node
    pub branch_preprocessing: Option<PreprocessorConfig>,
    /// preprocessing after each candidate
    pub node_preprocessing: Option<PreprocessorConfig>,
    /// number of worker threads (0: sequential search)
    pub workers: usize,
    /// subtrees rooted deeper than this are sent to the workers
    pub granularity: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            heuristic: true,
            preprocessing: Some(PreprocessorConfig::default()),
            shrink: true,
            sort_by_degree: None,
            candidates: CandidateStrategy::LowDegreePreprocessing,
            direction: SearchDirection::BestToWorst,
            branch_degree_preprocessing: false,
            node_degree_preprocessing: false,
            branch_preprocessing: None,
            node_preprocessing: None,
            workers: 0,
            granularity: 1,
        }
    }
}

impl SearchConfig {

    /**
    coloring-based search: vertices sorted by increasing degree, candidates
    by decreasing color with the coloring bound, no preprocessing.
    */
    pub fn mcq() -> Self {
        Self {
            preprocessing: None,
            shrink: false,
            sort_by_degree: Some(DegreeOrder::Ascending),
            candidates: CandidateStrategy::HighColorLazy,
            ..Self::default()
        }
    }

    /** parses a JSON configuration. Missing fields take their default value. */
    pub fn from_json(s:&str) -> Result<Self> {
        let res:Self = serde_json::from_str(s)?;
        res.validate()?;
        Ok(res)
    }

    /** reads a JSON configuration file */
    pub fn from_file<P:AsRef<Path>>(path:P) -> Result<Self> {
        let path = path.as_ref();
        debug!("reading configuration {:?}", path);
        let content = fs::read_to_string(path).map_err(|e| CliqueError::io(path, e))?;
        Self::from_json(&content)
    }

    /** checks the values that serde cannot check */
    pub fn validate(&self) -> Result<()> {
        let preprocessors = [
            ("preprocessing", &self.preprocessing),
            ("branch_preprocessing", &self.branch_preprocessing),
            ("node_preprocessing", &self.node_preprocessing),
        ];
        for (name, p) in preprocessors.iter() {
            if let Some(p) = p { p.validate(name)?; }
        }
        Ok(())
    }

    /** builds the brancher described by the configuration */
    pub fn brancher(&self, g:&Graph) -> Brancher {
        let mut res = Brancher::new()
            .with_direction(self.direction)
            .with_candidates(self.candidates)
            .with_branch_degree_preprocessing(self.branch_degree_preprocessing)
            .with_node_degree_preprocessing(self.node_degree_preprocessing);
        if let Some(p) = &self.branch_preprocessing {
            res = res.with_branch_preprocessor(p.build(g));
        }
        if let Some(p) = &self.node_preprocessing {
            res = res.with_node_preprocessor(p.build(g));
        }
        res
    }
}
