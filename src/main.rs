use std::env;
use std::fs;

use log::LevelFilter;
use nes_core::console::Console;

fn main() {
    let args: Vec<String> = env::args().collect();
    let verbose = args.iter().any(|a| a == "-v");
    setup_logging(verbose).expect("logger setup failed");

    let nestest_mode = args.iter().any(|a| a == "--nestest");
    let path = args
        .iter()
        .skip(1)
        .find(|a| !a.starts_with('-'))
        .expect("pass a .nes file path to run");

    let raw = fs::read(path).expect("failed to read ROM file");
    let mut console = Console::load_rom(&raw).expect("failed to load ROM");

    if nestest_mode {
        console
            .nestest(|line| println!("{line}"))
            .expect("nestest run failed");
        return;
    }

    nes_core::screen::run(console);
}

fn setup_logging(verbose: bool) -> Result<(), fern::InitError> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{}][{}] {}",
                record.target(),
                record.level(),
                message
            ))
        })
        .level(if verbose {
            LevelFilter::Trace
        } else {
            LevelFilter::Info
        })
        .chain(fern::log_file("output.log")?)
        .apply()?;
    Ok(())
}
