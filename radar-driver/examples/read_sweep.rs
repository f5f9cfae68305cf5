use clap::{Arg, Command};
use radar_driver::{run_driver, DriverConfig};
use std::io::Write;

struct Args {
    port_name: String,
    config_path: Option<String>,
}

fn get_args() -> Args {
    let matches = Command::new("Radar sweep receiver.")
        .about("Reads samples from a swept rangefinder and prints snapshots as JSON lines.")
        .disable_version_flag(true)
        .arg(
            Arg::new("port")
                .help("The device path to a serial port")
                .use_value_delimiter(false)
                .required(true),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("TOML file overriding the driver defaults"),
        )
        .get_matches();

    Args {
        port_name: matches.get_one::<String>("port").cloned().unwrap_or_default(),
        config_path: matches.get_one::<String>("config").cloned(),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = get_args();
    let config = match &args.config_path {
        Some(path) => DriverConfig::from_file(path)?,
        None => DriverConfig::default(),
    };

    let (driver_thread, feed) = run_driver(&args.port_name, &config)?;

    let stdout = std::io::stdout();
    for snapshot in feed.snapshots.iter() {
        let line = serde_json::to_string(&snapshot)?;
        if writeln!(stdout.lock(), "{}", line).is_err() {
            break;
        }
    }

    if let Some(stats) = driver_thread.stop() {
        log::info!("Samples received: {}", stats.total_received);
    }
    Ok(())
}
