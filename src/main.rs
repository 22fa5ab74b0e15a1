//! VcfGenotypeEditor CLI entry point
//!
//! Browse a VCF by chromosome and position, and write a copy with edited
//! per-sample genotypes.

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Instant;
use vcf_editor::core::{io, Session, SessionConfig, VariantQuery, DEFAULT_COMPRESSION_LEVEL};
use vcf_editor::formats;

#[derive(Parser)]
#[command(name = "vcf-genotype-editor")]
#[command(about = "Browse, filter and edit per-sample genotypes in VCF files")]
#[command(version)]
#[command(author = "VcfGenotypeEditor Contributors")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List chromosomes present in the file
    Chroms {
        /// Input VCF or VCF.GZ file
        input: PathBuf,
    },
    /// List sample columns
    Samples {
        /// Input VCF or VCF.GZ file
        input: PathBuf,
    },
    /// Print the first rows of the file
    Head {
        /// Input VCF or VCF.GZ file
        input: PathBuf,
        /// Number of rows to print
        #[arg(short = 'n', long, default_value = "50")]
        lines: usize,
    },
    /// Print one page of variants on a chromosome
    View {
        /// Input VCF or VCF.GZ file
        input: PathBuf,
        /// Chromosome to show
        #[arg(short = 'c', long)]
        chrom: String,
        /// Position filter: a number (1234567) or range (1230000-1240000)
        #[arg(short = 'p', long)]
        pos: Option<String>,
        /// Page number (1-based)
        #[arg(long, default_value = "1")]
        page: usize,
        /// Rows per page
        #[arg(long = "page-size", default_value = "10")]
        page_size: usize,
    },
    /// Apply genotype edits and write the edited file
    Edit {
        /// Input VCF or VCF.GZ file
        input: PathBuf,
        /// Edit one cell: CHROM POS SAMPLE VALUE (repeatable)
        #[arg(long = "set", num_args = 4, value_names = ["CHROM", "POS", "SAMPLE", "VALUE"], action = clap::ArgAction::Append)]
        set: Vec<String>,
        /// Tab-delimited edit list (CHROM POS SAMPLE VALUE per line)
        #[arg(short = 'e', long)]
        edits: Option<PathBuf>,
        /// Output file (default: <input>.edited.vcf[.gz] next to the input)
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
        /// Gzip-compress the output
        #[arg(short = 'z', long)]
        compress: bool,
        /// Gzip compression level (0-9)
        #[arg(short = 'l', long, default_value_t = DEFAULT_COMPRESSION_LEVEL)]
        level: u32,
    },
}

fn load_session(input: &Path, config: SessionConfig) -> anyhow::Result<Session> {
    let start = Instant::now();
    eprintln!("Loading VCF file: {:?}", input);

    let bytes = io::read_input_auto(input)
        .with_context(|| format!("Failed to read {:?}", input))?;
    let name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut session = Session::with_config(config);
    session
        .upload_file(&bytes, &name)
        .map_err(|e| anyhow::anyhow!("Failed to load VCF file: {}", e))?;

    eprintln!("VCF file loaded in {:.2}s", start.elapsed().as_secs_f64());
    Ok(session)
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let start = Instant::now();

    match cli.command {
        Commands::Chroms { input } => {
            let session = load_session(&input, SessionConfig::default())?;
            for chrom in session.list_chromosomes()? {
                println!("{}", chrom);
            }
        }

        Commands::Samples { input } => {
            let session = load_session(&input, SessionConfig::default())?;
            let samples = session.list_samples()?;
            if samples.is_empty() {
                eprintln!("No samples found after FORMAT");
            }
            for sample in samples {
                println!("{}", sample);
            }
        }

        Commands::Head { input, lines } => {
            let session = load_session(&input, SessionConfig::default())?;
            println!("{}", session.header()?.column_line);
            for row in session.preview(lines)? {
                println!("{}", row.fields().join("\t"));
            }
        }

        Commands::View { input, chrom, pos, page, page_size } => {
            let mut session = load_session(&input, SessionConfig::default())?;
            let mut query = VariantQuery::new(chrom).with_page(page, page_size);
            if let Some(pos) = pos {
                query = query.with_position(pos);
            }

            let result = session.query_variants(&query)?;
            for warning in &result.warnings {
                eprintln!("Warning: {}", warning);
            }

            println!("{}", session.header()?.column_line);
            for row in &result.rows {
                println!("{}", row.fields.join("\t"));
            }
            eprintln!(
                "Page {}/{} ({} matching rows)",
                result.page, result.total_pages, result.total_rows
            );
        }

        Commands::Edit { input, set, edits, output, compress, level } => {
            let config = SessionConfig {
                compression_level: level,
                ..SessionConfig::default()
            };
            let mut session = load_session(&input, config)?;

            let mut queued = 0usize;
            for cell in set.chunks_exact(4) {
                session.set_cell_value(&cell[0], &cell[1], &cell[2], cell[3].as_str())?;
                queued += 1;
            }
            if let Some(path) = edits {
                let text = std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read edit list {:?}", path))?;
                for (key, value) in formats::parse_edit_list(&text)? {
                    session.set_cell_value(&key.chrom, &key.pos, &key.sample, value)?;
                    queued += 1;
                }
            }

            let report = session.apply_edits()?;
            for (key, reason) in &report.skipped {
                eprintln!("Skipped {}: {}", key, reason);
            }

            let output_path = match output {
                Some(path) => path,
                None => input.with_file_name(session.export_file_name(compress)?),
            };
            eprintln!("Writing VCF file: {:?} -> {:?}", input, output_path);
            if compress {
                std::fs::write(&output_path, session.export_compressed()?)?;
            } else {
                std::fs::write(&output_path, session.export_text()?)?;
            }

            eprintln!("\n=== Edit Statistics ===");
            eprintln!("Edits queued:    {}", queued);
            eprintln!("Applied:         {}", report.applied);
            eprintln!("Cells changed:   {}", report.cells_changed);
            eprintln!("Skipped:         {}", report.skipped_count());
            eprintln!("Time elapsed:    {:.2}s", start.elapsed().as_secs_f64());
        }
    }

    Ok(())
}
