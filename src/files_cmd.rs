//! Files command: print the dataset files a request reads.

use anyhow::{Context, Result};
use tracing::info_span;
use ukcp_files::{FilePathSet, resolve, resolve_overlay};
use ukcp_input::validate;

use crate::cli::FilesArgs;
use crate::config::UkcpConfig;
use crate::request;

/// Resolve and print a request's files.
pub fn run(args: FilesArgs) -> Result<()> {
    let _cmd = info_span!("files").entered();
    let config = UkcpConfig::load(&args.data)?;
    let layout = config.layout()?;
    let input = validate(request::read(&args.request, config.vocabulary()?)?).context("invalid request")?;

    let files = if args.overlay {
        resolve_overlay(&input, &layout)
    } else {
        resolve(&input, &layout, args.baseline.as_deref())
    }
    .context("failed to resolve files")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&files).context("failed to serialise files")?);
    } else {
        print!("{}", listing(&files));
    }
    Ok(())
}

/// One header line per variable, scenario and member, each followed by its
/// patterns.
fn listing(files: &FilePathSet) -> String {
    let mut out = String::new();
    for v in files.variables() {
        for s in &v.scenarios {
            for e in &s.ensembles {
                let mut header = vec![v.variable.as_str()];
                header.extend(s.scenario.as_deref());
                header.extend(e.ensemble.as_deref());
                out.push_str(&format!("# {}\n", header.join(" ")));
                for p in &e.patterns {
                    out.push_str(&format!("{}\n", p.display()));
                }
            }
        }
    }
    out
}
