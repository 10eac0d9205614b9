use clap::Parser;

/// Pick non-redundant representative transcripts per genomic locus
///
/// Transcripts are read from GFF3/GTF input, finalized, grouped into
/// superloci and refined into one representative transcript per locus,
/// ranked by the score defined in the configuration file.
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Args {
    /// Path to the JSON configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: String,

    /// Path to the GFF3/GTF input file (overrides the configuration)
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<String>,

    /// Path for the final loci output (overrides the configuration)
    #[arg(long, value_name = "FILE")]
    pub loci_out: Option<String>,

    /// Path for the monosubloci output (overrides the configuration)
    #[arg(long, value_name = "FILE")]
    pub monoloci_out: Option<String>,

    /// Path for the subloci output (overrides the configuration)
    #[arg(long, value_name = "FILE")]
    pub subloci_out: Option<String>,

    /// Number of worker threads (overrides the configuration)
    #[arg(short, long, value_name = "N")]
    pub threads: Option<usize>,

    /// Drop every transcript failing the requirements expression
    #[arg(long)]
    pub purge: bool,

    /// Sets the level of verbosity
    #[arg(short, action = clap::ArgAction::Count)]
    pub verbose: u8,
}
