// Command-line interface for volto-babel
//
// This binary exposes the conversions of the volto-babel library on files and
// standard input, one subcommand per conversion.
//
// Usage:
//  volto toblocks page.html                  - Authored HTML to a block tree (stdout)
//  volto blocks2html tree.json -o out.html   - Block tree to annotated HTML
//  volto html2content out.html               - Annotated HTML back to content fields
//  volto html2slate - < page.html            - Read from stdin
//  volto --list-codecs                       - List block types with a dedicated codec
//
// Configuration:
//
// volto.toml in the working directory is layered over the built-in defaults if
// present; --config adds an explicit file on top. The log level comes from the
// configuration and can be overridden with RUST_LOG. Logs go to stderr.

mod commands;

use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};
use std::fs;
use std::io::{self, Read};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use volto_babel::{CodecRegistry, Converter, Diagnostics, SequentialIds, Settings};
use volto_config::{Loader, VoltoConfig};

fn build_cli() -> Command {
    let mut cli = Command::new("volto")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert legacy HTML to Volto blocks and back")
        .long_about(
            "volto converts between authored HTML, Slate rich text and Volto block trees.\n\n\
            Commands:\n  \
            - html2slate / slate2html:   HTML <-> Slate JSON\n  \
            - toblocks:                  HTML -> block tree JSON\n  \
            - blocks2html / html2content: block tree <-> annotated HTML for translation\n\n\
            Input is read from a file, or from stdin when the path is '-' or missing.\n\
            Output goes to stdout unless -o is given.\n\n\
            Examples:\n  \
            volto toblocks page.html --pretty\n  \
            volto blocks2html tree.json -o annotated.html\n  \
            cat annotated.html | volto html2content",
        )
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
                .help("Mint deterministic ids (id-1, id-2, ...) instead of UUIDs")
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

    for (name, about) in commands::AVAILABLE_COMMANDS {
        cli = cli.subcommand(
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
    cli
}

fn main() {
    let matches = build_cli().get_matches();

    let config = load_cli_config(matches.get_one::<String>("config").map(|s| s.as_str()));
    init_logging(&config);

    if matches.get_flag("list-codecs") {
        handle_list_codecs_command();
        return;
    }

    let Some((command, sub_matches)) = matches.subcommand() else {
        eprintln!("Missing command. Use --help for usage information.");
        std::process::exit(1);
    };

    let mut converter = Converter::new(Settings::from(&config));
    if matches.get_flag("sequential-ids") {
        converter = converter.with_ids(Arc::new(SequentialIds::default()));
    }

    handle_convert_command(
        &converter,
        command,
        sub_matches,
        matches.get_flag("pretty"),
        matches.get_flag("diagnostics"),
    );
}

/// Handle one of the conversion commands
fn handle_convert_command(
    converter: &Converter,
    command: &str,
    sub_matches: &ArgMatches,
    pretty: bool,
    show_diagnostics: bool,
) {
    let input = sub_matches
        .get_one::<String>("input")
        .map(|s| s.as_str())
        .unwrap_or("-");
    let source = read_input(input).unwrap_or_else(|e| {
        eprintln!("Error reading '{input}': {e}");
        std::process::exit(1);
    });

    tracing::debug!(command, input, bytes = source.len(), "converting");
    let mut diagnostics = Diagnostics::new();
    let result = commands::execute(converter, command, &source, pretty, &mut diagnostics);

    if show_diagnostics {
        match serde_json::to_string(&diagnostics) {
            Ok(json) => eprintln!("{json}"),
            Err(e) => eprintln!("Error: could not serialize diagnostics: {e}"),
        }
    }

    let output = result.unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    });

    match sub_matches.get_one::<String>("output") {
        Some(path) => {
            fs::write(path, output).unwrap_or_else(|e| {
                eprintln!("Error writing file '{path}': {e}");
                std::process::exit(1);
            });
        }
        None => println!("{output}"),
    }
}

/// Handle the --list-codecs flag
fn handle_list_codecs_command() {
    println!("Block types with a dedicated codec:\n");
    for name in CodecRegistry::default().list() {
        println!("  {name}");
    }
    println!("\nOther block types go through the generic codec.");
}

fn read_input(path: &str) -> io::Result<String> {
    if path == "-" {
        let mut source = String::new();
        io::stdin().read_to_string(&mut source)?;
        Ok(source)
    } else {
        fs::read_to_string(path)
    }
}

fn load_cli_config(explicit_path: Option<&str>) -> VoltoConfig {
    let loader = Loader::new().with_optional_file("volto.toml");
    let loader = if let Some(path) = explicit_path {
        loader.with_file(path)
    } else {
        loader
    };

    loader.build().unwrap_or_else(|err| {
        eprintln!("Failed to load configuration: {err}");
        std::process::exit(1);
    })
}

fn init_logging(config: &VoltoConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log.filter))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}
