//! Direct DFT: `dft <input-file> <output-file> <worker-count>`

use parfft::{cli, Engine};

fn main() {
    env_logger::init();

    if let Err(err) = cli::run(Engine::Naive, std::env::args()) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
