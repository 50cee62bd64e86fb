//! Extract command: run a request and summarise the selected data.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{info, info_span};
use ukcp_cube::Cube;
use ukcp_io::NetcdfSource;
use ukcp_pipeline::{Processor, ProcessorOutput};

use crate::cli::ExtractArgs;
use crate::config::UkcpConfig;
use crate::request;

/// Run the selection pipeline.
pub fn run(args: ExtractArgs) -> Result<()> {
    let _cmd = info_span!("extract").entered();
    let config = UkcpConfig::load(&args.data)?;
    let vocab = config.vocabulary()?;
    let layout = config.layout()?;
    let input = request::read(&args.request, vocab)?;

    let mut processor = Processor::new(&NetcdfSource, &layout);
    if let Some(seed) = args.seed.or(config.sampling.seed) {
        processor = processor.with_seed(seed);
    }
    let output = processor.process(input).context("request failed")?;

    let summary = Summary::from_output(&output);
    print!("{summary}");

    if let Some(path) = &args.json {
        write_json(path, &summary)?;
        info!(path = %path.display(), "summary written");
    }
    Ok(())
}

fn write_json(path: &Path, summary: &Summary) -> Result<()> {
    let json = serde_json::to_string_pretty(summary).context("failed to serialise summary")?;
    std::fs::write(path, json).with_context(|| format!("failed to write summary: {}", path.display()))
}

/// Shape and metadata of one output cube.
#[derive(Debug, Serialize)]
pub struct CubeSummary {
    pub variable: Option<String>,
    pub scenario: Option<String>,
    pub name: String,
    pub units: String,
    pub dims: Vec<String>,
    pub shape: Vec<usize>,
    pub attributes: BTreeMap<String, String>,
}

impl CubeSummary {
    fn new(variable: Option<&str>, scenario: Option<&str>, cube: &Cube) -> Self {
        Self {
            variable: variable.map(str::to_string),
            scenario: scenario.map(str::to_string),
            name: cube.name().to_string(),
            units: cube.units().to_string(),
            dims: cube.dim_names().into_iter().map(str::to_string).collect(),
            shape: cube.shape().to_vec(),
            attributes: cube.attributes().clone(),
        }
    }
}

/// What `extract` prints and optionally writes as JSON.
#[derive(Debug, Serialize)]
pub struct Summary {
    pub title: String,
    pub cubes: Vec<CubeSummary>,
    pub overlay: Vec<CubeSummary>,
}

impl Summary {
    pub fn from_output(output: &ProcessorOutput) -> Self {
        Self {
            title: output.title.clone(),
            cubes: output
                .cubes
                .iter()
                .map(|v| CubeSummary::new(Some(&v.variable), v.scenario.as_deref(), &v.cube))
                .collect(),
            overlay: output
                .overlay
                .iter()
                .map(|c| CubeSummary::new(None, None, c))
                .collect(),
        }
    }
}

impl std::fmt::Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.title)?;
        for (heading, cubes) in [("cubes", &self.cubes), ("overlay", &self.overlay)] {
            if cubes.is_empty() {
                continue;
            }
            writeln!(f, "{heading}:")?;
            for c in cubes {
                let dims = c
                    .dims
                    .iter()
                    .zip(&c.shape)
                    .map(|(d, n)| format!("{d}: {n}"))
                    .collect::<Vec<_>>()
                    .join(", ");
                let scenario = c.scenario.as_deref().map(|s| format!(" [{s}]")).unwrap_or_default();
                writeln!(f, "  {}{scenario} ({}) {{{dims}}}", c.name, c.units)?;
            }
        }
        Ok(())
    }
}
