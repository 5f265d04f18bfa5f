use core::fmt;
use serde::Deserialize;

/// Lifecycle state of a docking run, batch or task as reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobState {
    /// Queued, not started
    Pending,
    /// Started, not finished
    Running,
    /// Finished successfully
    Succeeded,
    /// Finished with an error
    Failed,
    /// Any state this client does not know about; treated as still in progress
    #[serde(other)]
    Unknown,
}

impl JobState {
    /// Whether the job has finished, successfully or not.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Succeeded | JobState::Failed)
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobState::Pending => write!(f, "PENDING"),
            JobState::Running => write!(f, "RUNNING"),
            JobState::Succeeded => write!(f, "SUCCEEDED"),
            JobState::Failed => write!(f, "FAILED"),
            JobState::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// Response of `GET /runs/{id}/status`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RunStatus {
    /// Overall state of the run
    pub status: JobState,
    /// Number of docking tasks in the run
    pub total: usize,
    /// Tasks finished successfully
    pub done: usize,
    /// Tasks finished with an error
    pub failed: usize,
    /// IDs of tasks currently running
    #[serde(default)]
    pub running: Vec<String>,
}

/// Response of `GET /batches/{id}/status`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BatchStatus {
    /// Overall state of the batch
    pub status: JobState,
    /// Number of runs in the batch
    pub total_runs: usize,
    /// Runs finished successfully
    pub done_runs: usize,
    /// Runs finished with an error
    pub failed_runs: usize,
    /// Number of docking tasks across all runs
    pub total_tasks: usize,
    /// Tasks finished successfully
    pub done_tasks: usize,
    /// Tasks finished with an error
    pub failed_tasks: usize,
}

/// Docking result of one protein target within a run.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RunResultEntry {
    /// Backend ID of the protein target
    pub protein_id: String,
    /// Display name of the target, e.g. `EGFR`
    pub protein_name: String,
    /// Best docking score in kcal/mol, lower is better
    pub best_score: Option<f64>,
    /// Percentile of the best score among reference ligands
    pub percentile: Option<f64>,
    /// Paths of the pose files for the best result, relative to `/files/`
    #[serde(default)]
    pub pose_paths: Vec<String>,
    /// State of the docking task
    pub status: JobState,
    /// Error message of a failed task
    pub error: Option<String>,
    /// Path of the prepared receptor, relative to `/protein-files/`
    pub receptor_pdbqt_path: Option<String>,
    /// Free-form docking metrics, including `pose_scores`
    pub metrics: Option<serde_json::Value>,
}

/// Response of `GET /runs/{id}/results`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RunResults {
    /// Entries sorted by best score, unscored entries last
    #[serde(default)]
    pub ranking: Vec<RunResultEntry>,
    /// Entries in submission order, one per target
    #[serde(default)]
    pub per_protein: Vec<RunResultEntry>,
}

impl RunResultEntry {
    /// Docking score of every pose, read from `metrics.pose_scores`.
    ///
    /// Missing metrics give an empty list; non-numeric entries are `None`.
    pub fn pose_scores(&self) -> Vec<Option<f64>> {
        self.metrics
            .as_ref()
            .and_then(|metrics| metrics.get("pose_scores"))
            .and_then(serde_json::Value::as_array)
            .map(|scores| scores.iter().map(serde_json::Value::as_f64).collect())
            .unwrap_or_default()
    }
}

impl RunResults {
    /// Entries to choose a target from, sorted by protein name.
    ///
    /// Uses `per_protein`, or `ranking` when a run reports no per-protein entries.
    pub fn targets(&self) -> Vec<&RunResultEntry> {
        let source = match self.per_protein.is_empty() {
            true => &self.ranking,
            false => &self.per_protein,
        };
        let mut targets: Vec<&RunResultEntry> = source.iter().collect();
        targets.sort_by(|a, b| {
            a.protein_name
                .to_lowercase()
                .cmp(&b.protein_name.to_lowercase())
                .then_with(|| a.protein_name.cmp(&b.protein_name))
        });
        targets
    }

    /// Pick the target for `protein_id`, or the first target by name if it is absent.
    pub fn select(&self, protein_id: Option<&str>) -> Option<&RunResultEntry> {
        let targets = self.targets();
        protein_id
            .and_then(|id| targets.iter().find(|e| e.protein_id == id))
            .or_else(|| targets.first())
            .copied()
    }

    /// Best ranked entries, at most `n`.
    pub fn top_ranked(&self, n: usize) -> &[RunResultEntry] {
        &self.ranking[..self.ranking.len().min(n)]
    }
}

/// Progress counters shared by run and batch status payloads.
pub trait Progress {
    /// Overall state
    fn state(&self) -> &JobState;
    /// Units finished successfully
    fn completed(&self) -> usize;
    /// Units finished with an error
    fn failed(&self) -> usize;
    /// Total number of units
    fn total(&self) -> usize;
}

impl Progress for RunStatus {
    fn state(&self) -> &JobState {
        &self.status
    }
    fn completed(&self) -> usize {
        self.done
    }
    fn failed(&self) -> usize {
        self.failed
    }
    fn total(&self) -> usize {
        self.total
    }
}

impl Progress for BatchStatus {
    fn state(&self) -> &JobState {
        &self.status
    }
    fn completed(&self) -> usize {
        self.done_runs
    }
    fn failed(&self) -> usize {
        self.failed_runs
    }
    fn total(&self) -> usize {
        self.total_runs
    }
}
