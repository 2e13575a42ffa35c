use std::collections::HashSet;

use serde::Deserialize;

use crate::error::Error;

/// One (name, measurement unit) pair of the measurement unit registry.
/// Identity is the pair; the same name may exist with several units.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IngredientSpec {
    pub name: String,
    pub measurement_unit: String,
}

/// Parses a bulk ingredient feed. Two formats are accepted, sniffed from
/// the content: a JSON array of `{"name", "measurement_unit"}` objects, or
/// CSV with one `name,unit` pair per line. Entries with empty fields are
/// rejected; duplicate pairs within the feed are collapsed, first one wins.
pub fn parse_feed(content: &str) -> Result<Vec<IngredientSpec>, Error> {
    let specs = if content.trim_start().starts_with('[') {
        parse_json(content)?
    } else {
        parse_csv(content)?
    };

    // Padding around a field must not split one registry entry into two,
    // whichever format it arrived in.
    let specs: Vec<IngredientSpec> = specs
        .into_iter()
        .map(|spec| IngredientSpec {
            name: spec.name.trim().to_string(),
            measurement_unit: spec.measurement_unit.trim().to_string(),
        })
        .collect();

    for spec in &specs {
        if spec.name.trim().is_empty() {
            return Err(Error::validation("ingredient name cannot be empty"));
        }
        if spec.measurement_unit.trim().is_empty() {
            return Err(Error::validation(
                "ingredient measurement unit cannot be empty",
            ));
        }
    }

    Ok(dedupe(specs))
}

fn parse_json(content: &str) -> Result<Vec<IngredientSpec>, Error> {
    serde_json::from_str(content)
        .map_err(|err| Error::validation(format!("invalid ingredient feed: {err}")))
}

fn parse_csv(content: &str) -> Result<Vec<IngredientSpec>, Error> {
    let mut specs = Vec::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let (name, unit) = line.split_once(',').ok_or_else(|| {
            Error::validation(format!("invalid ingredient feed line: {line:?}"))
        })?;
        specs.push(IngredientSpec {
            name: name.to_string(),
            measurement_unit: unit.to_string(),
        });
    }
    Ok(specs)
}

fn dedupe(specs: Vec<IngredientSpec>) -> Vec<IngredientSpec> {
    let mut seen = HashSet::new();
    specs
        .into_iter()
        .filter(|spec| seen.insert((spec.name.clone(), spec.measurement_unit.clone())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_json_feed() {
        let feed = r#"[
            {"name": "flour", "measurement_unit": "g"},
            {"name": "milk", "measurement_unit": "ml"}
        ]"#;
        let specs = parse_feed(feed).unwrap();
        assert_eq!(specs.len(), 2);
        assert_eq!(specs[0].name, "flour");
        assert_eq!(specs[1].measurement_unit, "ml");
    }

    #[test]
    fn parses_csv_feed() {
        let specs = parse_feed("flour,g\nmilk, ml\n\negg,pcs\n").unwrap();
        assert_eq!(specs.len(), 3);
        assert_eq!(specs[1].measurement_unit, "ml");
    }

    #[test]
    fn duplicates_within_feed_are_collapsed() {
        let specs = parse_feed("flour,g\nflour,g\nflour,cups\n").unwrap();
        assert_eq!(specs.len(), 2);
    }

    #[test]
    fn same_name_different_unit_is_not_a_duplicate() {
        let specs = parse_feed("flour,g\nflour,cups\n").unwrap();
        assert_eq!(specs.len(), 2);
    }

    #[test]
    fn empty_fields_are_rejected() {
        assert!(matches!(
            parse_feed("flour,\n"),
            Err(Error::Validation(_))
        ));
        assert!(matches!(parse_feed(",g\n"), Err(Error::Validation(_))));
    }

    #[test]
    fn malformed_json_is_rejected() {
        assert!(matches!(
            parse_feed("[{\"name\": \"flour\"}]"),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn csv_line_without_comma_is_rejected() {
        assert!(matches!(
            parse_feed("flour g\n"),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn empty_feed_is_empty_not_an_error() {
        assert!(parse_feed("").unwrap().is_empty());
        assert!(parse_feed("[]").unwrap().is_empty());
    }

    #[test]
    fn json_fields_are_trimmed() {
        let feed = r#"[{"name": " flour ", "measurement_unit": "g "}]"#;
        let specs = parse_feed(feed).unwrap();
        assert_eq!(specs[0].name, "flour");
        assert_eq!(specs[0].measurement_unit, "g");
    }

    #[test]
    fn padded_entries_collapse_with_exact_ones() {
        let feed = r#"[
            {"name": "flour ", "measurement_unit": "g"},
            {"name": "flour", "measurement_unit": " g"}
        ]"#;
        assert_eq!(parse_feed(feed).unwrap().len(), 1);
    }

    #[test]
    fn whitespace_only_json_field_is_rejected() {
        let feed = r#"[{"name": "   ", "measurement_unit": "g"}]"#;
        assert!(matches!(parse_feed(feed), Err(Error::Validation(_))));
    }
}
