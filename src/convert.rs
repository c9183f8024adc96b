extern crate clap;
use anyhow::Context;
use clap::*;
use std::path::Path;

use mafsplit::libs::fasta::{write_collection, SpeciesFastaSink};
use mafsplit::libs::maf::MafReader;
use mafsplit::libs::species::SpeciesSeqs;

fn make_command() -> Command {
    Command::new("convert")
        .version(crate_version!())
        .author(crate_authors!())
        .about("Split a multi-species MAF file into one FASTA file per species")
        .arg_required_else_help(true)
        .color(ColorChoice::Auto)
        .after_help(
            r###"
Every `s` line of every alignment block becomes one FASTA record. Records are
grouped by species, the part of the source name before the first dot
(`hg38.chr1` -> `hg38`), and written to `<outdir>/<species>.fasta`.

Notes:
* Gaps (-) are removed, nothing else is changed
* Sequences are written on a single line
* Records keep the order they have in the MAF file
* Existing files with the same names are overwritten
* Input files can be gzipped. If the input file is 'stdin', data is read from standard input
* Set RUST_LOG=info to see progress messages

Examples:
1. Extract per-species sequences:
   convert multiz.maf fasta/

2. Read everything into memory before writing:
   convert multiz.maf.gz fasta/ --buffered

"###,
        )
        .arg(
            Arg::new("infile")
                .required(true)
                .index(1)
                .help("Input MAF file to process"),
        )
        .arg(
            Arg::new("outdir")
                .required(true)
                .index(2)
                .help("Output directory, created if missing"),
        )
        .arg(
            Arg::new("buffered")
                .long("buffered")
                .action(ArgAction::SetTrue)
                .help("Collect all sequences before writing any file"),
        )
}

fn report(species: &str, path: &Path) {
    let filename = path.file_name().unwrap_or_default().to_string_lossy();
    println!("Saved {} sequences to {}", species, filename);
}

fn execute(args: &ArgMatches) -> anyhow::Result<()> {
    //----------------------------
    // Args
    //----------------------------
    let infile = args.get_one::<String>("infile").unwrap();
    let outdir = args.get_one::<String>("outdir").unwrap();
    let is_buffered = args.get_flag("buffered");

    let reader = mafsplit::reader(infile)?;
    let blocks = MafReader::new(reader);

    //----------------------------
    // Ops
    //----------------------------
    let n_species = if is_buffered {
        let seqs = SpeciesSeqs::from_blocks(blocks)
            .with_context(|| format!("failed to parse {}", infile))?;
        log::info!("{}: {} species", infile, seqs.len());

        write_collection(seqs, outdir, report)
            .with_context(|| format!("failed to write into {}", outdir))?
    } else {
        let mut sink = SpeciesFastaSink::new(outdir)
            .with_context(|| format!("failed to write into {}", outdir))?;

        let mut n_blocks = 0usize;
        for block in blocks {
            let block = block.with_context(|| format!("failed to parse {}", infile))?;
            sink.push_block(block)
                .with_context(|| format!("failed to write into {}", outdir))?;
            n_blocks += 1;
        }
        log::info!("{}: {} blocks, {} species", infile, n_blocks, sink.len());

        sink.finish(report)
            .with_context(|| format!("failed to write into {}", outdir))?
    };

    if n_species == 0 {
        log::warn!("{}: no sequence lines found", infile);
    }

    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    // usage errors exit with 1
    let matches = match make_command().try_get_matches() {
        Ok(matches) => matches,
        Err(e) => match e.kind() {
            error::ErrorKind::DisplayHelp | error::ErrorKind::DisplayVersion => e.exit(),
            _ => {
                let _ = e.print();
                std::process::exit(1);
            }
        },
    };

    execute(&matches)
}
