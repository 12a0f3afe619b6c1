//! Recursive FFT: `fft <input-file> <output-file> <worker-count>`
//!
//! The sample count and the worker count must both be powers of two, with no more workers
//! than samples.

use parfft::{cli, Engine};

fn main() {
    env_logger::init();

    if let Err(err) = cli::run(Engine::Recursive, std::env::args()) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
