use clap::Parser;
use dockscout::client::{ApiClient, ClientConfig, JobState, RunResultEntry};
use dockscout::{
    detect_pose_format, get_pose_summaries, poses_to_df, render_run_summary, render_summary,
    run_with_threads, write_df_to_file, ContactCutoff, DataFrameFileType, ReportFormat,
};
use polars::prelude::*;
use std::path::PathBuf;
use tracing::{debug, error, info, trace, warn};

#[derive(Parser, Debug, Clone)]
#[command(version, about)]
pub(crate) struct Args {
    /// ID of the docking run
    #[arg(long = "run")]
    run_id: String,

    /// Protein target to analyze; defaults to the first target of the run
    #[arg(long = "protein")]
    protein_id: Option<String>,

    /// Contact distance cutoff in Ångströms
    #[arg(short, long, default_value_t = ContactCutoff::Standard)]
    cutoff: ContactCutoff,

    /// Style of the printed reports
    #[arg(long = "report", default_value_t = ReportFormat::Text)]
    report: ReportFormat,

    /// Output directory for the per-pose table
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Name of the output file
    #[arg(short = 'f', long = "filename", default_value_t = String::from("poses"))]
    filename: String,

    /// Output file type
    #[arg(short = 't', long, default_value_t = DataFrameFileType::Csv)]
    output_format: DataFrameFileType,

    /// Number of threads to use for parallel processing
    #[arg(short = 'j', long = "num-threads", default_value_t = 0)]
    num_threads: usize,
}

fn describe(entry: &RunResultEntry) -> String {
    let score = match entry.best_score {
        Some(score) => format!("{score:.2} kcal/mol"),
        None => "no score".to_string(),
    };
    let percentile = match entry.percentile {
        Some(p) => format!(", percentile {p:.0}"),
        None => String::new(),
    };
    format!(
        "{} ({}): {score}{percentile}",
        entry.protein_name, entry.protein_id
    )
}

/// Index (1-based) of the pose with the most contacts.
fn busiest_pose(df: &DataFrame) -> PolarsResult<Option<u32>> {
    let top = df
        .clone()
        .lazy()
        .filter(col("contacts").is_not_null())
        .sort(
            ["contacts"],
            SortMultipleOptions::default()
                .with_order_descending(true)
                .with_maintain_order(true),
        )
        .first()
        .collect()?;
    Ok(top.column("pose")?.u32()?.get(0))
}

pub(crate) fn run(args: &Args, config: &ClientConfig) {
    trace!("{args:?}");

    let api = match ApiClient::new(config) {
        Ok(api) => api,
        Err(e) => {
            error!("Failed to set up the backend client: {e}");
            return;
        }
    };

    let results = match api.fetch_run_results(&args.run_id) {
        Ok(results) => results,
        Err(e) => {
            error!("Failed to fetch results of run {}: {e}", args.run_id);
            return;
        }
    };
    println!("{}", render_run_summary(&args.run_id, &results, args.report));

    let Some(entry) = results.select(args.protein_id.as_deref()) else {
        error!("Run {} has no results", args.run_id);
        return;
    };
    if let Some(requested) = &args.protein_id {
        if requested != &entry.protein_id {
            warn!(
                "Protein {requested} not found in run {}, using {}",
                args.run_id, entry.protein_id
            );
        }
    }
    println!("{}", describe(entry));
    if entry.status == JobState::Failed {
        warn!(
            "Docking of {} failed: {}",
            entry.protein_id,
            entry.error.as_deref().unwrap_or("no error message")
        );
    }

    let (receptor, poses) = match api.fetch_structures(entry) {
        Ok(structures) => structures,
        Err(e) => {
            error!("Failed to fetch the receptor of {}: {e}", entry.protein_id);
            return;
        }
    };
    if poses.is_empty() {
        warn!("No poses available for {}", entry.protein_id);
    }
    debug!("Fetched {} pose(s)", poses.len());

    let cutoff = args.cutoff;
    let summaries = run_with_threads(args.num_threads, || {
        get_pose_summaries(&receptor, &poses, cutoff.angstroms())
    });

    let scores = entry.pose_scores();
    for (i, (pose, summary)) in poses.iter().zip(&summaries).enumerate() {
        match scores.get(i).copied().flatten() {
            Some(score) => println!("Pose {} ({score:.2} kcal/mol)", i + 1),
            None => println!("Pose {}", i + 1),
        }
        println!(
            "{}",
            render_summary(
                summary.as_ref(),
                cutoff,
                detect_pose_format(pose),
                args.report
            )
        );
    }

    let mut df_poses = match poses_to_df(&summaries, &scores) {
        Ok(df) => df,
        Err(e) => {
            error!("Failed to build the pose table: {e}");
            return;
        }
    };
    match busiest_pose(&df_poses) {
        Ok(Some(pose)) => info!("Pose {pose} has the most contacts"),
        Ok(None) => debug!("No pose has a contact summary"),
        Err(e) => warn!("Failed to rank poses: {e}"),
    }

    let Some(output) = &args.output else {
        return;
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
    let output_file = output_path.join(format!("{}_{}", args.filename, entry.protein_id));
    match write_df_to_file(&mut df_poses, &output_file, args.output_format) {
        Ok(path) => info!("Results saved to {}", path.display()),
        Err(e) => error!("Failed to save the pose table: {e}"),
    }
}
