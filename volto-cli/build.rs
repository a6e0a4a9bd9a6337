use clap::{Arg, ArgAction, Command, ValueHint};
use clap_complete::{generate_to, shells::*};
use std::env;
use std::io::Error;

// Mirror of the commands from src/commands.rs
// We need to duplicate this here since build scripts can't access src/ modules
const AVAILABLE_COMMANDS: &[(&str, &str)] = &[
    ("html2slate", "Convert HTML into Slate rich-text JSON"),
    ("slate2html", "Render Slate rich-text JSON as HTML"),
    ("toblocks", "Convert authored HTML into a Volto block tree"),
    ("blocks2html", "Render a Volto block tree as annotated HTML"),
    ("html2content", "Read annotated HTML back into content fields"),
];

fn main() -> Result<(), Error> {
    let outdir = match env::var_os("OUT_DIR") {
        None => return Ok(()),
        Some(outdir) => outdir,
    };

    let mut cmd = Command::new("volto")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert legacy HTML to Volto blocks and back")
        .arg_required_else_help(true)
        .arg(
            Arg::new("list-codecs")
                .long("list-codecs")
                .help("List block types with a dedicated codec")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Path to a volto.toml configuration file")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .arg(
            Arg::new("pretty")
                .long("pretty")
                .help("Pretty-print JSON output")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("sequential-ids")
                .long("sequential-ids")
                .help("Mint deterministic ids instead of UUIDs")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("diagnostics")
                .long("diagnostics")
                .help("Print the conversion warnings as JSON on stderr")
                .action(ArgAction::SetTrue)
                .global(true),
        );

    for (name, about) in AVAILABLE_COMMANDS {
        cmd = cmd.subcommand(
            Command::new(*name)
                .about(*about)
                .arg(
                    Arg::new("input")
                        .help("Input file path ('-' or absent for stdin)")
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .help("Output file path (defaults to stdout)")
                        .value_hint(ValueHint::FilePath),
                ),
        );
    }

    // Generate completions for bash
    generate_to(Bash, &mut cmd, "volto", &outdir)?;

    // Generate completions for zsh
    generate_to(Zsh, &mut cmd, "volto", &outdir)?;

    // Generate completions for fish
    generate_to(Fish, &mut cmd, "volto", &outdir)?;

    println!("cargo:warning=Shell completions generated in {outdir:?}");

    Ok(())
}
