//! Command line driver shared by the `dft` and `fft` binaries
//!
//! `<program> <input-file> <output-file> <worker-count>`. No flags are recognized and
//! arguments past the third are ignored.

use std::path::PathBuf;

use log::debug;

use crate::algorithms::{engine_for, Transform};
use crate::config::{Engine, TransformConfig};
use crate::error::{FftError, Result};
use crate::io::{read_samples, write_spectrum};
use crate::sample_buffer::SampleBuffer;

/// Parsed command line of one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args {
    pub input: PathBuf,
    pub output: PathBuf,
    pub workers: usize,
}

impl Args {
    /// Parse `args`, program name first
    pub fn parse<I, S>(engine: Engine, args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut args = args.into_iter().map(Into::<String>::into);
        let program = args.next().unwrap_or_else(|| engine.name().to_string());

        let (Some(input), Some(output), Some(workers)) = (args.next(), args.next(), args.next())
        else {
            return Err(FftError::Usage { program });
        };

        let workers = match workers.parse::<usize>() {
            Ok(workers) if workers > 0 => workers,
            _ => return Err(FftError::InvalidWorkerArg(workers)),
        };

        Ok(Self {
            input: input.into(),
            output: output.into(),
            workers,
        })
    }
}

/// Load the input file, run `engine`, and write the output file
pub fn run<I, S>(engine: Engine, args: I) -> Result<()>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let args = Args::parse(engine, args)?;
    debug!("{}: {:?}", engine.name(), args);

    let samples = read_samples(&args.input)?;
    let config = TransformConfig::new(samples.len(), args.workers, engine)?;

    let mut buffer = SampleBuffer::new(samples);
    engine_for(config)?.process(&mut buffer)?;

    write_spectrum(&args.output, buffer.output())
}
