use std::collections::BTreeMap;
use std::path::Path;

use fb_core::{BoolExpr, Schedule, Universe};
use serde::Serialize;

pub fn run(file: &Path, output: Option<&Path>) -> Result<(), String> {
    let compilation = super::compile_file(file)?;
    let content = export_json(&compilation)?;

    if let Some(path) = output {
        std::fs::write(path, &content)
            .map_err(|e| format!("cannot write to {}: {e}", path.display()))?;
        println!("  Exported to {}", path.display());
    } else {
        println!("{content}");
    }

    Ok(())
}

/// Model dump keyed by labels instead of internal indices.
#[derive(Serialize)]
struct StoryExport<'a> {
    factors: Vec<FactorExport<'a>>,
    transitions: Vec<TransitionExport<'a>>,
    descriptions: Vec<DescriptionExport<'a>>,
}

#[derive(Serialize)]
struct FactorExport<'a> {
    name: &'a str,
    initial: &'a str,
    values: Vec<&'a str>,
}

#[derive(Serialize)]
struct TransitionExport<'a> {
    name: &'a str,
    condition: String,
    schedule: &'a Schedule,
    effects: BTreeMap<&'a str, &'a str>,
    description: &'a str,
}

#[derive(Serialize)]
struct DescriptionExport<'a> {
    condition: String,
    text: &'a str,
}

fn export_json(compilation: &fb_dsl::Compilation) -> Result<String, String> {
    let universe = &compilation.universe;

    let factors = universe
        .factors()
        .iter()
        .map(|f| FactorExport {
            name: f.label(),
            initial: f.initial().as_str(),
            values: f.possible().iter().map(|v| v.as_str()).collect(),
        })
        .collect();

    let transitions = universe
        .transitions()
        .iter()
        .map(|t| TransitionExport {
            name: t.label(),
            condition: render_condition(universe, t.condition()),
            schedule: t.schedule(),
            effects: t
                .effects()
                .iter()
                .map(|(factor, value)| (factor_label(universe, *factor), value.as_str()))
                .collect(),
            description: t.description(),
        })
        .collect();

    let descriptions = compilation
        .descriptions
        .iter()
        .map(|d| DescriptionExport {
            condition: render_condition(universe, &d.condition),
            text: &d.text,
        })
        .collect();

    let export = StoryExport {
        factors,
        transitions,
        descriptions,
    };
    serde_json::to_string_pretty(&export).map_err(|e| format!("JSON serialization error: {e}"))
}

fn factor_label(universe: &Universe, factor: fb_core::FactorId) -> &str {
    universe.factor(factor).map_or("?", |f| f.label())
}

/// Render a condition back to story syntax. `&` binds looser than `|`, so
/// only conjunctions nested in a disjunction need parentheses.
fn render_condition(universe: &Universe, expr: &BoolExpr) -> String {
    match expr {
        BoolExpr::Equals { factor, value } => {
            format!("{} = {value}", factor_label(universe, *factor))
        }
        BoolExpr::And(clauses) if clauses.is_empty() => "true".to_string(),
        BoolExpr::Or(clauses) if clauses.is_empty() => "false".to_string(),
        BoolExpr::And(clauses) => clauses
            .iter()
            .map(|c| render_condition(universe, c))
            .collect::<Vec<_>>()
            .join(" & "),
        BoolExpr::Or(clauses) => clauses
            .iter()
            .map(|c| match c {
                BoolExpr::And(inner) if inner.len() > 1 => {
                    format!("({})", render_condition(universe, c))
                }
                _ => render_condition(universe, c),
            })
            .collect::<Vec<_>>()
            .join(" | "),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(source: &str) -> Vec<String> {
        let compilation = fb_dsl::compile_source(source).unwrap();
        compilation
            .universe
            .transitions()
            .iter()
            .map(|t| render_condition(&compilation.universe, t.condition()))
            .collect()
    }

    #[test]
    fn conditions_render_in_story_syntax() {
        let rendered = render(
            "factor a : (x, y)\nfactor b : (p, q)\n\
             transition : (a = x | a = y & b = p, spontaneous 1, a -> x)\n\
             transition : ((a = x & b = q) | a = y, spontaneous 1, a -> x)",
        );
        assert_eq!(rendered[0], "a = x | a = y & b = p");
        assert_eq!(rendered[1], "(a = x & b = q) | a = y");
    }

    #[test]
    fn json_uses_labels() {
        let compilation = fb_dsl::compile_source(
            "factor sun : (day, night)\n\
             transition sunset : (sun = day, spontaneous 0.5, sun -> night, \"Dusk.\")",
        )
        .unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&export_json(&compilation).unwrap()).unwrap();

        assert_eq!(json["factors"][0]["name"], "sun");
        assert_eq!(json["factors"][0]["values"][1], "night");
        let sunset = &json["transitions"][0];
        assert_eq!(sunset["condition"], "sun = day");
        assert_eq!(sunset["schedule"]["kind"], "spontaneous");
        assert_eq!(sunset["schedule"]["probability_per_turn"], 0.5);
        assert_eq!(sunset["effects"]["sun"], "night");
        assert_eq!(sunset["description"], "Dusk.");
    }

    #[test]
    fn json_carries_every_transition() {
        let compilation = fb_dsl::compile_source(
            "factor sun : (day, night)\n\
             transition sunset : (sun = day, spontaneous 0.5, sun -> night)\n\
             transition sunrise : (sun = night, spontaneous 0.5, sun -> day)\n\
             transition : (sun = day, choice : \"Wait.\", sun -> day)",
        )
        .unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&export_json(&compilation).unwrap()).unwrap();

        let transitions = json["transitions"].as_array().unwrap();
        assert_eq!(transitions.len(), compilation.universe.transition_count());
        assert_eq!(transitions[1]["name"], "sunrise");
        assert_eq!(transitions[2]["schedule"]["choice_description"], "Wait.");
    }
}
