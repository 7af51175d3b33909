use std::io::{self, BufRead, Write};
use std::path::Path;
use std::sync::Arc;

use colored::Colorize;
use rand::Rng;

use fb_core::{SessionConfig, SpontaneousOrder, State, TransitionId};

pub fn run(file: &Path, seed: u64, shuffle: bool) -> Result<(), String> {
    let compilation = super::compile_file(file)?;
    let order = if shuffle {
        SpontaneousOrder::Shuffled
    } else {
        SpontaneousOrder::Declaration
    };
    let config = SessionConfig::default()
        .with_seed(seed)
        .with_spontaneous_order(order);
    let mut rng = config.rng();
    let mut state = State::with_config(Arc::new(compilation.universe), config);

    println!("  {} {}", "Playing".bold(), file.display());
    println!("  Seed: {seed} | Type a number to choose, 'u' to undo, 'r' to redo.\n");

    let stdin = io::stdin();
    let stdout = io::stdout();
    play_loop(&mut state, &mut rng, stdin.lock(), &mut stdout.lock())
}

/// What the player asked for at the prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Exit,
    Wait,
    Choose(usize),
    Undo,
    Redo,
}

/// Parse one input line against a menu of `choices` chosen transitions.
///
/// Menu numbers: `0` exits, `1` waits, `2..` pick a choice.
fn parse_action(input: &str, choices: usize) -> Option<Action> {
    match input {
        "u" | "undo" => Some(Action::Undo),
        "r" | "redo" => Some(Action::Redo),
        _ => match input.parse::<usize>().ok()? {
            0 => Some(Action::Exit),
            1 => Some(Action::Wait),
            n if n - 2 < choices => Some(Action::Choose(n - 2)),
            _ => None,
        },
    }
}

/// Drive a session until the player exits or input ends.
///
/// Each round runs one spontaneous pass, narrates what happened since the
/// previous menu, then asks for a choice. Undo and redo move through the
/// history without running a pass, so the redo branch survives.
pub fn play_loop<R, I, W>(
    state: &mut State,
    rng: &mut R,
    mut input: I,
    out: &mut W,
) -> Result<(), String>
where
    R: Rng + ?Sized,
    I: BufRead,
    W: Write,
{
    let mut log = state.now();
    let mut run_pass = true;
    let mut line = String::new();

    loop {
        if run_pass {
            let fired = state.run_spontaneous(rng);
            tracing::debug!(fired = fired.len(), now = %state.now(), "spontaneous pass");
            for transition in state.events_since(log) {
                if !transition.description().is_empty() {
                    writeln!(out, "{}", transition.description()).map_err(|e| e.to_string())?;
                }
            }
        }
        log = state.now();
        run_pass = true;

        let choices: Vec<(TransitionId, String)> = state
            .chosen_transitions()
            .iter()
            .map(|t| (t.id(), t.choice_description().unwrap_or_default().to_string()))
            .collect();
        write_menu(out, &choices).map_err(|e| e.to_string())?;

        let action = loop {
            write!(out, "> ").map_err(|e| e.to_string())?;
            out.flush().map_err(|e| e.to_string())?;

            line.clear();
            if input.read_line(&mut line).map_err(|e| e.to_string())? == 0 {
                return Ok(());
            }
            match parse_action(line.trim(), choices.len()) {
                Some(action) => break action,
                None => writeln!(
                    out,
                    "{}",
                    format!("Please enter a number between 0 and {}.", choices.len() + 1).yellow()
                )
                .map_err(|e| e.to_string())?,
            }
        };

        match action {
            Action::Exit => return Ok(()),
            Action::Wait => {}
            Action::Choose(index) => {
                let (id, _) = &choices[index];
                state.apply_id(*id).map_err(|e| e.to_string())?;
            }
            Action::Undo => {
                run_pass = false;
                if !state.undo() {
                    writeln!(out, "{}", "Nothing to undo.".yellow()).map_err(|e| e.to_string())?;
                }
            }
            Action::Redo => {
                run_pass = false;
                if !state.redo() {
                    writeln!(out, "{}", "Nothing to redo.".yellow()).map_err(|e| e.to_string())?;
                }
            }
        }
    }
}

fn write_menu<W: Write>(out: &mut W, choices: &[(TransitionId, String)]) -> io::Result<()> {
    writeln!(out, "  {}. Exit.", "0".bold())?;
    writeln!(out, "  {}. Do nothing.", "1".bold())?;
    for (i, (_, text)) in choices.iter().enumerate() {
        writeln!(out, "  {}. {text}", (i + 2).to_string().bold())?;
    }
    Ok(())
}
