use clap::Parser;
use dockscout::{
    detect_pose_format, get_contact_summary, render_summary, residues_to_df, run_with_threads,
    summary_to_df, write_df_to_file, ContactCutoff, DataFrameFileType, PoseFormat, ReportFormat,
};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, trace, warn};

#[derive(Parser, Debug, Clone)]
#[command(version, about)]
pub(crate) struct Args {
    /// Path to the receptor structure (PDB or PDBQT)
    #[arg(short, long)]
    receptor: PathBuf,

    /// Path to the ligand pose (PDB or PDBQT)
    #[arg(short, long)]
    pose: PathBuf,

    /// Contact distance cutoff in Ångströms
    #[arg(short, long, default_value_t = ContactCutoff::Standard)]
    cutoff: ContactCutoff,

    /// Report every available cutoff instead of a single one
    #[arg(long, default_value_t = false)]
    all_cutoffs: bool,

    /// Style of the printed report
    #[arg(long = "report", default_value_t = ReportFormat::Text)]
    report: ReportFormat,

    /// Format of the pose shown in the report; detected from the pose text if unset
    #[arg(long = "pose-format")]
    pose_format: Option<PoseFormat>,

    /// Output directory for the category and residue tables
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Name prefix of the output files
    #[arg(short = 'f', long = "filename", default_value_t = String::from("contacts"))]
    filename: String,

    /// Output file type
    #[arg(short = 't', long, default_value_t = DataFrameFileType::Csv)]
    output_format: DataFrameFileType,

    /// Number of threads to use for parallel processing
    #[arg(short = 'j', long = "num-threads", default_value_t = 1)]
    num_threads: usize,
}

fn read_structure(path: &Path) -> Option<String> {
    match std::fs::read_to_string(path) {
        Ok(text) => Some(text),
        Err(e) => {
            error!("Failed to read {}: {e}", path.display());
            None
        }
    }
}

pub(crate) fn run(args: &Args) {
    trace!("{args:?}");

    let Some(receptor_text) = read_structure(&args.receptor) else {
        return;
    };
    let Some(pose_text) = read_structure(&args.pose) else {
        return;
    };
    let pose_format = args
        .pose_format
        .unwrap_or_else(|| detect_pose_format(&pose_text));
    debug!("Treating pose as {pose_format}");

    let cutoffs: Vec<ContactCutoff> = match args.all_cutoffs {
        true => ContactCutoff::ALL.to_vec(),
        false => vec![args.cutoff],
    };

    for cutoff in cutoffs {
        let summary = run_with_threads(args.num_threads, || {
            debug!("Using {} thread(s)", rayon::current_num_threads());
            get_contact_summary(&receptor_text, &pose_text, cutoff.angstroms())
        });
        if summary.is_none() {
            warn!("No atom records found in the receptor or the pose");
        }
        println!(
            "{}",
            render_summary(summary.as_ref(), cutoff, pose_format, args.report)
        );

        let (Some(output), Some(summary)) = (&args.output, &summary) else {
            continue;
        };
        let output_path = match std::path::absolute(output) {
            Ok(path) => path,
            Err(e) => {
                error!("Failed to resolve the output directory: {e}");
                return;
            }
        };
        if let Err(e) = std::fs::create_dir_all(&output_path) {
            error!("Failed to create the output directory: {e}");
            return;
        }

        let tables = [
            ("categories", summary_to_df(summary)),
            ("residues", residues_to_df(summary)),
        ];
        for (table, df) in tables {
            // Keep the cutoff's decimal point out of the file extension
            let file_name = format!(
                "{}_{table}_{}A",
                args.filename,
                cutoff.to_string().replace('.', "_")
            );
            let written = df.and_then(|mut df| {
                write_df_to_file(&mut df, &output_path.join(file_name), args.output_format)
            });
            match written {
                Ok(path) => info!("Results saved to {}", path.display()),
                Err(e) => error!("Failed to save the {table} table: {e}"),
            }
        }
    }
}
