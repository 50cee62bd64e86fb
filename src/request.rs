//! Request files: TOML tables of selection criteria.
//!
//! ```toml
//! collection = "land-rcm"
//! variable = ["tasAnom"]
//! scenario = "rcp85"
//! ensemble = ["01", "04"]
//! temporal_average_type = "mon"
//! year = 2050
//! baseline = "b8100"
//! area = ["point", 450000, 250000]   # or "country|scotland"
//! ```
//!
//! Keys are category codes. A scalar given for a list category is a list
//! of one.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow, bail};
use ukcp_input::{AreaInput, InputData, InputValue};
use ukcp_vocab::{InputType, Vocabulary};

/// Read a request file.
pub fn read(path: &Path, vocab: Arc<Vocabulary>) -> Result<InputData> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read request file: {}", path.display()))?;
    parse(&text, vocab).with_context(|| format!("invalid request file: {}", path.display()))
}

/// Parse a request document.
pub fn parse(text: &str, vocab: Arc<Vocabulary>) -> Result<InputData> {
    let table: toml::Table = toml::from_str(text).context("failed to parse TOML request")?;
    let mut input = InputData::new(vocab);
    for (key, value) in &table {
        let category: InputType = key.parse()?;
        if category == InputType::Area {
            input.set_area(&area(value)?)?;
        } else if category.is_multi() {
            let values = match value {
                toml::Value::Array(items) => items.iter().map(scalar).collect::<Result<Vec<_>>>()?,
                other => vec![scalar(other)?],
            };
            input.set_many(category, values, None)?;
        } else {
            input.set(category, scalar(value)?, None)?;
        }
    }
    Ok(input)
}

fn scalar(value: &toml::Value) -> Result<InputValue> {
    Ok(match value {
        toml::Value::String(s) => InputValue::from(s.as_str()),
        toml::Value::Integer(i) => InputValue::from(*i),
        toml::Value::Float(f) => InputValue::from(*f),
        toml::Value::Boolean(b) => InputValue::from(*b),
        other => bail!("expected a single value, got {}", other.type_str()),
    })
}

fn area(value: &toml::Value) -> Result<AreaInput> {
    match value {
        toml::Value::String(s) => Ok(AreaInput::Named(s.clone())),
        toml::Value::Array(items) => {
            let (kind, coords) = items.split_first().ok_or_else(|| anyhow!("area is empty"))?;
            let kind = kind
                .as_str()
                .ok_or_else(|| anyhow!("area must start with its kind"))?;
            let coords = coords
                .iter()
                .map(|c| match c {
                    toml::Value::Integer(i) => Ok(*i as f64),
                    toml::Value::Float(f) => Ok(*f),
                    other => Err(anyhow!("area coordinate must be a number, got {}", other.type_str())),
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(AreaInput::Coordinates {
                kind: kind.to_string(),
                coords,
            })
        }
        other => bail!("area must be a string or an array, got {}", other.type_str()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocab() -> Arc<Vocabulary> {
        Arc::new(Vocabulary::builtin().unwrap())
    }

    #[test]
    fn parses_scalars_lists_and_point_area() {
        let input = parse(
            r#"
            collection = "land-rcm"
            variable = ["tasAnom"]
            scenario = "rcp85"
            ensemble = ["01", "04"]
            temporal_average_type = "mon"
            year = 2050
            baseline = "b8100"
            area = ["point", 450000, 250000.0]
            "#,
            vocab(),
        )
        .unwrap();
        assert_eq!(input.get_text(InputType::Collection), Some("land-rcm"));
        assert_eq!(input.get_many_text(InputType::Scenario), Some(vec!["rcp85".to_string()]));
        assert_eq!(
            input.get_many_text(InputType::Ensemble),
            Some(vec!["01".to_string(), "04".to_string()])
        );
        assert_eq!(input.get_int(InputType::Year), Some(2050));
        assert_eq!(input.area().unwrap().coordinates(), Some(&[450_000.0, 250_000.0][..]));
    }

    #[test]
    fn named_area() {
        let input = parse("area = \"country|scotland\"\n", vocab()).unwrap();
        assert_eq!(input.area().unwrap().region(), Some("scotland"));
    }

    #[test]
    fn unknown_key_is_rejected() {
        assert!(parse("colour = \"red\"\n", vocab()).is_err());
    }

    #[test]
    fn unknown_value_is_rejected() {
        assert!(parse("collection = \"land-xyz\"\n", vocab()).is_err());
    }

    #[test]
    fn table_value_is_rejected() {
        assert!(parse("[collection]\nx = 1\n", vocab()).is_err());
    }
}
