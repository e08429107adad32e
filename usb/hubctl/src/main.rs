//! `hubctl`: list USB hubs and switch power on their ports.
//!
//! ```text
//! hubctl [-H <hub> | -B <bus> -D <dev>] -P <port> -p <0|1>
//! ```
//!
//! Without `-P` (or with `-P 0`) every hub is listed with the status of its ports. With a
//! port, the selected hub's port is switched on or off and its ports are listed again.

use std::io;
use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::{value_t, App, Arg, ArgMatches};

use hubctl_interface::libusb::LibUsbBus;
use hubctl_interface::{Config, HubTarget, Options, PowerState};

use crate::render::Renderer;

mod render;

struct Args {
    options: Options,
    config: Option<PathBuf>,
    verbosity: u64,
}

fn parse_args() -> Args {
    let matches = App::new("hubctl")
        .about("Lists USB hubs and switches power on their ports")
        .arg(
            Arg::with_name("HUB")
                .short("H")
                .long("hub")
                .takes_value(true)
                .help("Hub index as printed by the listing"),
        )
        .arg(
            Arg::with_name("BUS")
                .short("B")
                .long("bus")
                .takes_value(true)
                .help("Bus number of the hub, used without -H"),
        )
        .arg(
            Arg::with_name("DEVICE")
                .short("D")
                .long("device")
                .takes_value(true)
                .help("Device number of the hub, used without -H"),
        )
        .arg(
            Arg::with_name("PORT")
                .short("P")
                .long("port")
                .takes_value(true)
                .help("Port to switch; 0 only lists the hubs"),
        )
        .arg(
            Arg::with_name("POWER")
                .short("p")
                .long("power")
                .takes_value(true)
                .allow_hyphen_values(true)
                .help("0 turns the port off, anything else turns it on"),
        )
        .arg(
            Arg::with_name("CONFIG")
                .short("c")
                .long("config")
                .takes_value(true)
                .help("TOML configuration file"),
        )
        .arg(
            Arg::with_name("VERBOSE")
                .short("v")
                .multiple(true)
                .help("Log more to stderr; repeat for more detail"),
        )
        .get_matches();

    Args {
        options: options_from(&matches),
        config: matches.value_of("CONFIG").map(PathBuf::from),
        verbosity: matches.occurrences_of("VERBOSE"),
    }
}

fn options_from(matches: &ArgMatches) -> Options {
    // Invalid numbers print the usage and exit with status 1.
    fn number<T: std::str::FromStr>(matches: &ArgMatches, name: &str) -> Option<T> {
        if matches.is_present(name) {
            Some(value_t!(matches, name, T).unwrap_or_else(|e| e.exit()))
        } else {
            None
        }
    }

    let target = match number::<usize>(matches, "HUB") {
        Some(index) => HubTarget::Index(index),
        None => HubTarget::Address {
            bus: number(matches, "BUS").unwrap_or(0),
            device: number(matches, "DEVICE").unwrap_or(0),
        },
    };

    Options {
        target,
        port: number::<u16>(matches, "PORT").filter(|port| *port != 0),
        power: number::<i64>(matches, "POWER")
            .map(PowerState::from_level)
            .unwrap_or(PowerState::On),
    }
}

fn output_level(verbosity: u64) -> log::LevelFilter {
    match verbosity {
        0 => common::output_level(),
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    }
}

fn hubctl(args: &Args, renderer: &mut Renderer<io::Stdout>) -> Result<()> {
    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    common::setup_logging(
        "hubctl",
        output_level(args.verbosity),
        config.log_file.as_deref(),
        config.log_level.into(),
    );
    log::debug!("options {:?}, config {:?}", args.options, config);

    let bus = LibUsbBus::new().context("failed to initialize libusb")?;
    hubctl_interface::run(&bus, &args.options, &config, renderer)?;
    Ok(())
}

fn main() {
    let args = parse_args();
    let mut renderer = Renderer::new(io::stdout(), args.options.port.is_none());

    if let Err(err) = hubctl(&args, &mut renderer) {
        log::debug!("exiting: {:?}", err);
        renderer.fatal(&format!("{:#}", err));
        process::exit(1);
    }
}
