use::std::env;
use::std::process;

use coin_mixer::{run, MixerConfig};
use log::info;

fn main() {
    // Expecting the command script path and an optional time unit in milliseconds
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 || args.len() > 3 {
        eprintln!("Usage: {} <commands.csv> [time_unit_ms]", args[0]);
        process::exit(1);
    }
    let filename = &args[1];
    let config = match args.get(2).map(|raw| MixerConfig::from_time_unit_millis(raw)) {
        None => MixerConfig::default(),
        Some(Ok(config)) => config,
        Some(Err(e)) => {
            eprintln!("Invalid time unit (expected milliseconds above zero): {}", e);
            process::exit(1);
        }
    };
    // Initialize logger (respect RUST_LOG env var if set)
    env_logger::init();

    info!(
        "starting coin mixer with file: {} (sweep every {:?}, withdraw every {:?})",
        filename, config.sweep_interval, config.withdraw_interval
    );

    if let Err(e) = run(filename, &config) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
