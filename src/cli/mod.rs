pub mod actions;
pub mod config;

use clap::{Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;

use crate::protocol::modbus::FrameProtocol;

/// Build the command line definition.
pub fn command() -> Command {
    Command::new("modbus-generator")
        .about("Serve a simulated Modbus slave pre-populated from JSON value files")
        .arg(
            Arg::new("json-coil")
                .long("json-coil")
                .alias("jsonCoil")
                .help("JSON file with the coil values")
                .value_name("FILE")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("json-discrete")
                .long("json-discrete")
                .alias("jsonDiscrete")
                .help("JSON file with the discrete input values")
                .value_name("FILE")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("json-input")
                .long("json-input")
                .alias("jsonInput")
                .help("JSON file with the input register values")
                .value_name("FILE")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("json-holding")
                .long("json-holding")
                .alias("jsonHolding")
                .help("JSON file with the holding register values")
                .value_name("FILE")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("register-start-offset")
                .long("register-start-offset")
                .alias("registerStartOffset")
                .help("Added to every regAddr before placement (-1 keeps addresses as written)")
                .value_name("OFFSET")
                .allow_negative_numbers(true)
                .value_parser(clap::value_parser!(i64))
                .default_value("-1"),
        )
        .arg(
            Arg::new("listen")
                .long("listen")
                .alias("listenRTUTCPPort")
                .help("Address to listen on, ':port' binds every interface")
                .value_name("ADDR")
                .default_value(":5502"),
        )
        .arg(
            Arg::new("protocol")
                .long("protocol")
                .help("Framing on accepted connections: rtu_over_tcp or tcp")
                .value_name("PROTOCOL")
                .value_parser(|value: &str| value.parse::<FrameProtocol>())
                .default_value("rtu_over_tcp"),
        )
        .arg(
            Arg::new("station-id")
                .long("station-id")
                .help("Only answer this unit id (default: answer every unit id)")
                .value_name("ID")
                .value_parser(clap::value_parser!(u8)),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("Load settings from a .toml or .json file, flags override it")
                .value_name("FILE")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("dump")
                .long("dump")
                .help("Print the built register images as JSON and exit")
                .action(ArgAction::SetTrue),
        )
}

/// Parse command line arguments and return ArgMatches.
pub fn parse_args() -> ArgMatches {
    command().get_matches()
}
