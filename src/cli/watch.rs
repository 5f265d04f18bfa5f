use clap::{ArgGroup, Parser};
use dockscout::client::{
    ApiClient, ApiError, ClientConfig, PollOutcome, PollPolicy, Progress, StatusWatcher,
};
use std::time::Duration;
use tracing::{error, info, trace, warn};

#[derive(Parser, Debug, Clone)]
#[command(version, about)]
#[command(group(ArgGroup::new("target").required(true).args(["run_id", "batch_id"])))]
pub(crate) struct Args {
    /// ID of the docking run to follow
    #[arg(long = "run")]
    run_id: Option<String>,

    /// ID of the batch to follow
    #[arg(long = "batch")]
    batch_id: Option<String>,

    /// Seconds between two status requests
    #[arg(short, long, default_value_t = 4)]
    interval: u64,

    /// Stop after this many status requests (0 for no limit)
    #[arg(long, default_value_t = 900)]
    max_attempts: usize,

    /// Stop after this many failed requests in a row (0 for no limit)
    #[arg(long, default_value_t = 5)]
    max_failures: usize,
}

impl Args {
    fn policy(&self) -> PollPolicy {
        let limit = |n: usize| (n > 0).then_some(n);
        PollPolicy {
            interval: Duration::from_secs(self.interval),
            max_attempts: limit(self.max_attempts),
            max_consecutive_failures: limit(self.max_failures),
        }
    }
}

/// Follow one status endpoint until it ends and report how it ended.
fn follow<T, F>(label: &str, policy: PollPolicy, fetch: F)
where
    T: Progress + Send + 'static,
    F: FnMut() -> Result<T, ApiError> + Send + 'static,
{
    let mut watcher = StatusWatcher::new(policy);
    watcher.watch(
        fetch,
        |status: &T| status.state().is_terminal(),
        |status: &T| {
            println!(
                "{} {}/{} done, {} failed",
                status.state(),
                status.completed(),
                status.total(),
                status.failed()
            )
        },
    );

    match watcher.wait() {
        Some(PollOutcome::Finished(status)) => {
            info!("{label} finished as {}", status.state())
        }
        Some(PollOutcome::TooManyFailures(e)) => {
            error!("Stopped watching {label}: {e}")
        }
        Some(PollOutcome::AttemptsExhausted(_)) => {
            warn!("{label} is still running, stopped watching")
        }
        Some(PollOutcome::Cancelled) => info!("Stopped watching {label}"),
        None => error!("Status polling for {label} ended unexpectedly"),
    }
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

    match (&args.run_id, &args.batch_id) {
        (Some(run_id), _) => {
            let id = run_id.clone();
            follow(&format!("Run {run_id}"), args.policy(), move || {
                api.fetch_run_status(&id)
            })
        }
        (None, Some(batch_id)) => {
            let id = batch_id.clone();
            follow(&format!("Batch {batch_id}"), args.policy(), move || {
                api.fetch_batch_status(&id)
            })
        }
        (None, None) => error!("Either --run or --batch is required"),
    }
}
