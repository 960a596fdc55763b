//! # mbe_nexus_cli
//!
//! Part of the libmbe_nexus crate family.
//!
//! Parse a single MBE NeXus file into a growth-run record and write it as YAML, the way
//! a data-management host would ingest it.
//!
//! ## Use
//!
//! ```bash
//! mbe_nexus_cli new -p config.yml
//! mbe_nexus_cli schema
//! mbe_nexus_cli -i growth.nxs -p config.yml -o growth.yml
//! ```
//!
//! The config path is optional when parsing; the default configuration reads the
//! instrumented layout. Without `-o` the record is printed to the terminal. Detailed
//! messages go to `mbe_nexus.log` in the working directory.
use clap::{Arg, ArgMatches, Command};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use libmbe_nexus::config::Config;
use libmbe_nexus::eln::all_sections;
use libmbe_nexus::parser::MbeNexusParser;
use libmbe_nexus::schema::EntryArchive;

fn make_template_config(path: &Path) {
    let config = Config::default();
    let yaml_str = serde_yaml::to_string(&config).unwrap();
    let mut file = File::create(path).expect("Could not create template config file!");
    file.write_all(yaml_str.as_bytes())
        .expect("Failed to write yaml data to file!");
}

/// Console sinks of the default logger plus a log file
fn make_logger() -> Arc<spdlog::Logger> {
    let file_sink = Arc::new(
        spdlog::sink::FileSink::builder()
            .path(PathBuf::from("./mbe_nexus.log"))
            .formatter(*Box::new(spdlog::formatter::PatternFormatter::new(
                spdlog::formatter::pattern!(
                    "[{date_short} {time_short}] - [{^{level}}] - {payload}{eol}"
                ),
            )))
            .truncate(true)
            .build()
            .unwrap(),
    );
    let mut builder = spdlog::Logger::builder();
    for sink in spdlog::default_logger().sinks() {
        builder.sink(sink.clone());
    }
    Arc::new(
        builder
            .sink(file_sink)
            .flush_level_filter(spdlog::LevelFilter::All)
            .build()
            .unwrap(),
    )
}

fn cli() -> Command {
    Command::new("mbe_nexus_cli")
        .arg_required_else_help(true)
        .subcommand(Command::new("new").about("Make a template configuration yaml file"))
        .subcommand(Command::new("schema").about("Print the ELN section definitions"))
        .arg(
            Arg::new("path")
                .short('p')
                .long("path")
                .global(true)
                .help("Path to the configuration file"),
        )
        .arg(
            Arg::new("input")
                .short('i')
                .long("input")
                .help("Path to the NeXus file to parse"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .help("Path to write the parsed record to (YAML)"),
        )
}

/// Where `new` should write the template config, if a path was given
fn template_config_path(new_matches: &ArgMatches) -> Option<PathBuf> {
    new_matches.get_one::<String>("path").map(PathBuf::from)
}

fn main() {
    let matches = cli().get_matches();

    let logger = make_logger();
    spdlog::set_default_logger(logger.clone());

    match matches.subcommand() {
        Some(("new", new_matches)) => {
            let Some(config_path) = template_config_path(new_matches) else {
                spdlog::error!("No config path given, use -p/--path");
                return;
            };
            spdlog::info!(
                "Making a template config at {}...",
                config_path.to_string_lossy()
            );
            make_template_config(&config_path);
            spdlog::info!("Done.");
            return;
        }
        Some(("schema", _)) => {
            match serde_yaml::to_string(&all_sections()) {
                Ok(yaml) => println!("{yaml}"),
                Err(e) => spdlog::error!("{e}"),
            }
            return;
        }
        _ => (),
    }

    // Load our config
    let parser = match matches.get_one::<String>("path") {
        Some(path) => {
            spdlog::info!("Loading config from {path}...");
            match MbeNexusParser::from_config_file(Path::new(path)) {
                Ok(p) => p,
                Err(e) => {
                    spdlog::error!("{e}");
                    return;
                }
            }
        }
        None => MbeNexusParser::new(Config::default()),
    };
    spdlog::info!("Layout: {:?}", parser.config().layout);

    let Some(input) = matches.get_one::<String>("input") else {
        spdlog::error!("No input file given, use -i/--input");
        return;
    };
    let input_path = PathBuf::from(input);

    let mut archive = EntryArchive::default();
    if let Err(e) = parser.parse(&input_path, &mut archive, &logger) {
        spdlog::error!("Parsing failed with error: {e}");
        return;
    }
    if let Some(run) = archive.data.as_mut() {
        run.normalize(&logger);
    }

    let yaml_str = match serde_yaml::to_string(&archive) {
        Ok(s) => s,
        Err(e) => {
            spdlog::error!("Unable to serialize the parsed record: {e}");
            return;
        }
    };
    match matches.get_one::<String>("output") {
        Some(output) => match File::create(output) {
            Ok(mut file) => match file.write_all(yaml_str.as_bytes()) {
                Ok(_) => spdlog::info!("Wrote record to {output}"),
                Err(e) => spdlog::error!("Error writing record to file {output}: {e}"),
            },
            Err(e) => spdlog::error!("Could not open file {output} for writing: {e}"),
        },
        None => println!("{yaml_str}"),
    }

    spdlog::info!("Done.");
    logger.flush();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_matches(args: &[&str]) -> Option<PathBuf> {
        let matches = cli().try_get_matches_from(args).unwrap();
        let (name, sub) = matches.subcommand().unwrap();
        assert_eq!(name, "new");
        template_config_path(sub)
    }

    #[test]
    fn test_new_without_path() {
        assert_eq!(new_matches(&["mbe_nexus_cli", "new"]), None);
    }

    #[test]
    fn test_new_with_path() {
        assert_eq!(
            new_matches(&["mbe_nexus_cli", "new", "-p", "config.yml"]),
            Some(PathBuf::from("config.yml"))
        );
        assert_eq!(
            new_matches(&["mbe_nexus_cli", "-p", "config.yml", "new"]),
            Some(PathBuf::from("config.yml"))
        );
    }
}
