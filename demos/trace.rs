//! Prints the event trace of an info markup document.
//!
//! Usage:
//!   cargo run --example trace -- `<path>` [--format text|json|yaml] [--strict]
//!
//! Without a path the file name is read from standard input.
use clap::{Arg, ArgAction, Command};
use info_markup::api::trace_file;
use info_markup::{Configuration, Validator};
use miette::Report;
use std::io::{self, BufRead, Write};

fn main() {
    let matches = Command::new("trace")
        .about("Print the event trace of an info markup document")
        .arg(
            Arg::new("path")
                .help("Path to the .info file")
                .index(1),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .short('f')
                .help("Output format: text, json or yaml")
                .default_value("text"),
        )
        .arg(
            Arg::new("strict")
                .long("strict")
                .help("Validate against the sample moveset schema")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let path = match matches.get_one::<String>("path") {
        Some(path) => path.clone(),
        None => prompt_path(),
    };
    let format = matches
        .get_one::<String>("format")
        .map_or("text", String::as_str);
    let validator = matches.get_flag("strict").then(sample_schema);

    let mut config = Configuration::default();
    config.add_unit_scale("s", 1.0);
    config.add_unit_scale("ms", 0.001);

    let trace = match trace_file(&path, config, validator.as_ref()) {
        Ok(trace) => trace,
        Err(err) => {
            eprintln!("{:?}", Report::new(err));
            std::process::exit(1);
        }
    };
    eprintln!("File '{}' read successfully", path);

    let output = match format {
        "json" => trace.to_json().map_err(|e| e.to_string()),
        "yaml" => trace.to_yaml().map_err(|e| e.to_string()),
        "text" => Ok(trace.to_string()),
        other => Err(format!("unknown format '{}'", other)),
    };
    match output {
        Ok(output) => print!("{}", output),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn prompt_path() -> String {
    print!("Enter .info file path: ");
    let _ = io::stdout().flush();

    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line).is_err() {
        eprintln!("Error: could not read a path from standard input");
        std::process::exit(1);
    }
    line.trim().to_string()
}

fn sample_schema() -> Validator {
    let mut validator = Validator::new();
    let rules = [
        ("moveset", "?text", "/", "speed"),
        ("move", "text, ?number", "moveset", "anim, damage, speed, timing"),
        ("hit", "?text", "move", "box, damage"),
        ("anim", "text", "/, move", "frames, duration, name"),
    ];
    for (tag, parameters, containers, attributes) in rules {
        if let Err(err) = validator.set_element_rules(tag, parameters, containers, attributes) {
            eprintln!("{:?}", Report::new(err));
            std::process::exit(1);
        }
    }
    validator
}
