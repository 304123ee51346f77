use clap::Parser;
use readout::app::logging;
use readout::cli::{speak, Cli};

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = speak::run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
