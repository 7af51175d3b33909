use std::path::Path;

use comfy_table::{ContentArrangement, Table};
use fb_core::{Schedule, Universe};

pub fn run(file: &Path, verbose: bool) -> Result<(), String> {
    let compilation = super::compile_file(file)?;
    let universe = &compilation.universe;

    println!("  All checks passed for '{}'.", file.display());
    println!(
        "  {} factors, {} transitions, {} description blocks",
        universe.factor_count(),
        universe.transition_count(),
        compilation.descriptions.len()
    );

    if verbose {
        println!();
        println!("{}", factor_table(universe));
        if universe.transition_count() > 0 {
            println!("{}", transition_table(universe));
        }
    }

    Ok(())
}

fn factor_table(universe: &Universe) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Factor", "Initial", "Values"]);

    for factor in universe.factors() {
        let values: Vec<&str> = factor.possible().iter().map(|v| v.as_str()).collect();
        table.add_row(vec![
            factor.label().to_string(),
            factor.initial().to_string(),
            values.join(", "),
        ]);
    }
    table
}

fn transition_table(universe: &Universe) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Transition", "Schedule", "Effects"]);

    for transition in universe.transitions() {
        let name = if transition.label().is_empty() {
            "(anonymous)".to_string()
        } else {
            transition.label().to_string()
        };
        let schedule = match transition.schedule() {
            Schedule::Spontaneous {
                probability_per_turn,
            } => format!("spontaneous {probability_per_turn}"),
            Schedule::Chosen { choice_description } => format!("choice \"{choice_description}\""),
        };
        let effects: Vec<String> = transition
            .effects()
            .iter()
            .map(|(factor, value)| {
                let label = universe.factor(*factor).map_or("?", |f| f.label());
                format!("{label} -> {value}")
            })
            .collect();
        table.add_row(vec![name, schedule, effects.join(", ")]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unlabeled_transitions_are_marked_anonymous() {
        let compilation = fb_dsl::compile_source(
            "factor sun : (day, night)\n\
             transition sunset : (sun = day, spontaneous 0.5, sun -> night)\n\
             transition : (sun = night, choice : \"Wake\", sun -> day)",
        )
        .unwrap();
        let rendered = transition_table(&compilation.universe).to_string();

        assert!(rendered.contains("sunset"));
        assert!(rendered.contains("(anonymous)"));
        assert!(rendered.contains("choice \"Wake\""));
    }
}
