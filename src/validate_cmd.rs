//! Validate command: check a request and print its normalised criteria.

use anyhow::{Context, Result};
use tracing::info_span;
use ukcp_input::{InputData, ValidatedInput, validate};
use ukcp_vocab::InputType;

use crate::cli::ValidateArgs;
use crate::config::UkcpConfig;
use crate::request;

/// Validate a request file.
pub fn run(args: ValidateArgs) -> Result<()> {
    let _cmd = info_span!("validate").entered();
    let config = UkcpConfig::load(&args.data)?;
    let input = request::read(&args.request, config.vocabulary()?)?;
    let validated = validate(input).context("invalid request")?;
    print!("{}", criteria(&validated));
    Ok(())
}

/// `key = value` lines in category order, area first.
fn criteria(input: &ValidatedInput) -> String {
    let mut out = format!("area = {}\n", input.area());
    for category in input.categories() {
        out.push_str(&format!("{} = {}\n", category.key(), values(input, category)));
    }
    out
}

fn values(input: &InputData, category: InputType) -> String {
    if let Some(v) = input.get_single(category) {
        return v.to_string();
    }
    input
        .get_many(category)
        .unwrap_or_default()
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
