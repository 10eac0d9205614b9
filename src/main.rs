use std::process;

use clap::Parser;
use log::{debug, info};

use piclo::cli::Args;
use piclo::config::Configuration;
use piclo::gff;
use piclo::pipeline;
use piclo::read_transcripts;

fn main() {
    let args = Args::parse();

    loggerv::init_with_verbosity(u64::from(args.verbose)).unwrap();

    debug!("pid is {}", process::id());
    debug!("parsed CLI arguments, loading the configuration");

    let mut config = match Configuration::from_path(&args.config) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{}", err);
            process::exit(1);
        }
    };
    if let Some(input) = args.input {
        config.input = Some(input);
    }
    if let Some(loci_out) = args.loci_out {
        config.loci_out = Some(loci_out);
    }
    if let Some(monoloci_out) = args.monoloci_out {
        config.monoloci_out = Some(monoloci_out);
    }
    if let Some(subloci_out) = args.subloci_out {
        config.subloci_out = Some(subloci_out);
    }
    if let Some(threads) = args.threads {
        config.run_options.threads = threads.max(1);
    }
    if args.purge {
        config.run_options.purge = true;
    }
    if config.loci_out.is_none() {
        config.loci_out = Some("/dev/stdout".to_string());
    }

    let input = match &config.input {
        Some(input) => input.clone(),
        None => {
            eprintln!("no input file specified, neither in the configuration nor with --input");
            process::exit(1);
        }
    };

    debug!("reading transcripts from {}", input);
    let transcripts = match read_transcripts(gff::Reader::from_file(&input)) {
        Ok(transcripts) => transcripts,
        Err(err) => {
            eprintln!("error parsing the input data: {}", err);
            process::exit(1);
        }
    };
    info!("found {} transcripts", transcripts.len());

    match pipeline::run(&config, transcripts) {
        Ok(result) => {
            info!(
                "picked {} loci from {} superloci ({} transcripts skipped, {} excluded)",
                result.loci.len(),
                result.superloci,
                result.skipped,
                result.excluded
            );
        }
        Err(err) => {
            eprintln!("{}", err);
            process::exit(1);
        }
    }
}
