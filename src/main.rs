//! Kin Canvas CLI
//!
//! Usage:
//!   kin-canvas [OPTIONS] [FILE]
//!
//! Options:
//!   -c, --config <FILE>  Layout configuration overlay (TOML)
//!   -g, --grammar        Show command reference
//!   --json               Emit the computed layout as JSON
//!   -h, --help           Print help

use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;

use clap::Parser;

use kin_canvas::{layout, run_script};

#[derive(Parser)]
#[command(name = "kin-canvas")]
#[command(about = "Family tree editor core: run an edit script, print the layout")]
struct Cli {
    /// Input script (reads from stdin if not provided)
    input: Option<PathBuf>,

    /// Layout configuration overlay (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Show command reference
    #[arg(short, long)]
    grammar: bool,

    /// Emit the computed layout as JSON
    #[arg(long)]
    json: bool,
}

fn main() {
    let cli = Cli::parse();

    if cli.grammar {
        print_grammar();
        return;
    }

    // If no input file and stdin is a terminal (interactive), show intro help
    if cli.input.is_none() && io::stdin().is_terminal() {
        print_intro();
        return;
    }

    let config = match &cli.config {
        Some(path) => match layout::LayoutConfig::load(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => layout::LayoutConfig::default(),
    };

    let (source, filename) = match &cli.input {
        Some(path) => match fs::read_to_string(path) {
            Ok(content) => (content, path.display().to_string()),
            Err(e) => {
                eprintln!("Error reading file '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => {
            let mut buffer = String::new();
            match io::stdin().read_to_string(&mut buffer) {
                Ok(_) => (buffer, "<stdin>".to_string()),
                Err(e) => {
                    eprintln!("Error reading from stdin: {}", e);
                    std::process::exit(1);
                }
            }
        }
    };

    let graph = match run_script(&source) {
        Ok(graph) => graph,
        Err(e) => {
            eprintln!("{}", e.format(&source, &filename));
            std::process::exit(1);
        }
    };

    let layout = layout::compute(&graph, &config);

    if cli.json {
        match serde_json::to_string_pretty(&layout) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing layout: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    println!(
        "{:>4}  {:<24} {:<7} {:>5} {:>6} {:>9} {:>9}",
        "id", "name", "gender", "level", "slot", "x", "y"
    );
    for person in graph.people() {
        // every person has a computed position
        let pos = layout
            .position(person.id())
            .expect("layout covers the whole graph");
        println!(
            "{:>4}  {:<24} {:<7} {:>5} {:>6} {:>9.1} {:>9.1}",
            person.id().to_string(),
            person.name(),
            person.gender().to_string(),
            person.level(),
            person.slot(),
            pos.x,
            pos.y
        );
    }
    println!("canvas: {:.0} x {:.0}", layout.width, layout.height);
}

fn print_intro() {
    println!(
        r#"Kin Canvas - family tree editor core

USAGE:
    kin-canvas [OPTIONS] [FILE]
    echo '<commands>' | kin-canvas

OPTIONS:
    -g, --grammar    Show command reference
    -c, --config     Layout configuration overlay (TOML file)
    --json           Emit the computed layout as JSON
    -h, --help       Print help

QUICK START:
    printf 'root "Ada" female\nspouse "Ada" "Will"\n' | kin-canvas

Run with --grammar for the full command reference."#
    );
}

fn print_grammar() {
    println!(
        r#"Kin Canvas command reference (one command per line, # starts a comment)

CREATING PEOPLE:
    root "Name" female|male [born YYYY-MM-DD]
        First person, or another entry point at generation 0.
    standalone "Name" female|male [born YYYY-MM-DD]
        Start a disconnected branch beside the existing generation-0 people.
    parent "Of" female|male "Name" [born YYYY-MM-DD]
        Add a parent; fails if that parent slot is taken. Adding the second
        parent also links them to the person's existing siblings.
    child "Of" "Name" female|male [born YYYY-MM-DD]
        Add a child, shared with the person's spouse or co-parent if any.
    spouse "Of" "Name" [born YYYY-MM-DD]
        Add a spouse (opposite gender); their children are reconciled.

LINKING EXISTING PEOPLE:
    link-parent "Parent" "Child"
    link-child "Parent" "Child"
        Adopt an existing person as a child; they snap back into the grid.
    link-spouses "A" "B"
        Marry two existing people; refused if either already co-parents.

EDITING:
    delete "Name"          Remove a person; relatives keep their other links.
    rename "Old" "New"
    birthday "Name" YYYY-MM-DD
    move "Name" DX DY      Accumulate a manual drag offset in pixels.
    clear                  Reset to an empty graph.

People are referenced by display name (first match in creation order)."#
    );
}
