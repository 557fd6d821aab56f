//! `goinst <package>`: install a Go package's binaries via an isolated workspace.
//!
//! Stages run strictly in order: Provisioning → Fetching → Copying →
//! Reclaiming. Once a workspace exists, every exit path goes through
//! Reclaiming; an error from an earlier stage wins over a reclaim error.

use std::path::{Path, PathBuf};
use std::time::Instant;

use goinst_core::observability;
use goinst_sandbox::{copier, FetchBackend, GoGetBackend, ReclaimError, Workspace};

use crate::error::{error_chain, InstallError};
use crate::plan::InstallPlan;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Provisioning,
    Fetching,
    Copying,
    Reclaiming,
    Done,
    Failed,
}

impl PipelineState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }

    /// Allowed forward transitions; nothing is ever revisited.
    pub fn can_advance_to(&self, next: PipelineState) -> bool {
        use PipelineState::*;
        matches!(
            (self, next),
            (Idle, Provisioning)
                | (Idle, Failed)
                | (Provisioning, Fetching)
                | (Provisioning, Reclaiming)
                | (Provisioning, Failed)
                | (Fetching, Copying)
                | (Fetching, Reclaiming)
                | (Copying, Reclaiming)
                | (Reclaiming, Done)
                | (Reclaiming, Failed)
        )
    }
}

/// Outcome of a successful install.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallReport {
    pub package: String,
    /// Workspace the package was built in; deleted by the time this is returned.
    pub workspace: PathBuf,
    /// Destination paths written, in copy order.
    pub installed: Vec<PathBuf>,
}

pub struct InstallPipeline<'a> {
    plan: &'a InstallPlan,
    backend: &'a dyn FetchBackend,
    temp_root: Option<PathBuf>,
    state: PipelineState,
    history: Vec<PipelineState>,
}

impl<'a> InstallPipeline<'a> {
    pub fn new(plan: &'a InstallPlan, backend: &'a dyn FetchBackend) -> Self {
        Self {
            plan,
            backend,
            temp_root: None,
            state: PipelineState::Idle,
            history: Vec::new(),
        }
    }

    /// Provision workspaces under `root` instead of the OS temp dir.
    pub fn with_temp_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.temp_root = Some(root.into());
        self
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Every state entered after `Idle`, in order.
    pub fn history(&self) -> &[PipelineState] {
        &self.history
    }

    fn advance(&mut self, next: PipelineState) {
        debug_assert!(
            self.state.can_advance_to(next),
            "illegal pipeline transition {:?} -> {:?}",
            self.state,
            next
        );
        tracing::debug!(from = ?self.state, to = ?next, "pipeline transition");
        self.state = next;
        self.history.push(next);
    }

    /// Run the pipeline once. A pipeline cannot be rerun.
    pub fn run(&mut self) -> Result<InstallReport, InstallError> {
        debug_assert_eq!(self.state, PipelineState::Idle, "pipeline already ran");
        let started = Instant::now();
        observability::audit_install_started(
            self.plan.package(),
            self.plan.bin_dir(),
            self.plan.go_program(),
        );

        let result = self.run_stages();

        let duration_ms = started.elapsed().as_millis() as u64;
        match &result {
            Ok(report) => {
                observability::audit_install_completed(
                    self.plan.package(),
                    &report.installed,
                    duration_ms,
                    None,
                );
            }
            Err(e) => {
                observability::audit_install_completed(
                    self.plan.package(),
                    &[],
                    duration_ms,
                    Some(&error_chain(e)),
                );
            }
        }
        result
    }

    fn run_stages(&mut self) -> Result<InstallReport, InstallError> {
        let package = self.plan.package();

        if let Err(e) = self.plan.check_preconditions() {
            self.advance(PipelineState::Failed);
            return Err(e.into());
        }

        println!("=> Installing package {} ...", package);
        self.advance(PipelineState::Provisioning);
        let prefix = self.plan.workspace_prefix();
        let provisioned = match &self.temp_root {
            Some(root) => Workspace::provision_in(root, prefix),
            None => Workspace::provision(prefix),
        };
        let workspace = match provisioned {
            Ok(ws) => ws,
            Err(e) => {
                self.advance(PipelineState::Failed);
                return Err(e.into());
            }
        };
        println!("=> Using sandboxed workspace: {}", workspace.root().display());

        let outcome = self.fetch_and_copy(&workspace);
        self.reclaim(workspace, outcome)
    }

    fn fetch_and_copy(&mut self, workspace: &Workspace) -> Result<Vec<PathBuf>, InstallError> {
        if let Some(gopath) = self.plan.shared_gopath() {
            println!("=> Symlink GOPATH/bin into sandbox ...");
            workspace.link_host_bin(gopath)?;
            println!("   [DONE]");
        }

        self.advance(PipelineState::Fetching);
        println!(
            "=> Fetching {} with {} ...",
            self.plan.package(),
            self.backend.name()
        );
        self.backend.fetch(workspace.root(), self.plan.package())?;
        println!("   [DONE] Package successfully installed");

        self.advance(PipelineState::Copying);
        let bin_dir = self.plan.bin_dir();
        println!("=> Copying generated binaries into {} ...", bin_dir.display());
        let installed = copy_artifacts(&workspace.bin_dir(), bin_dir)?;
        println!("   [DONE]");
        Ok(installed)
    }

    fn reclaim(
        &mut self,
        workspace: Workspace,
        outcome: Result<Vec<PathBuf>, InstallError>,
    ) -> Result<InstallReport, InstallError> {
        self.advance(PipelineState::Reclaiming);
        let root = workspace.root().to_path_buf();
        println!("=> Delete isolated workspace ...");
        let reclaimed = workspace.reclaim();
        if reclaimed.is_ok() {
            println!("   [DONE]");
        }

        let result = settle(outcome, reclaimed, &root).map(|installed| InstallReport {
            package: self.plan.package().to_string(),
            workspace: root,
            installed,
        });

        self.advance(if result.is_ok() {
            PipelineState::Done
        } else {
            PipelineState::Failed
        });
        result
    }
}

/// Merge the stage outcome with the reclaim result. An earlier stage error
/// wins; a reclaim error after it is only logged.
fn settle(
    outcome: Result<Vec<PathBuf>, InstallError>,
    reclaimed: Result<(), ReclaimError>,
    workspace: &Path,
) -> Result<Vec<PathBuf>, InstallError> {
    match (outcome, reclaimed) {
        (Ok(installed), Ok(())) => Ok(installed),
        (Ok(_), Err(reclaim_err)) => Err(reclaim_err.into()),
        (Err(e), Ok(())) => Err(e),
        (Err(e), Err(reclaim_err)) => {
            tracing::warn!(
                workspace = %workspace.display(),
                "workspace cleanup also failed: {}",
                error_chain(&reclaim_err)
            );
            Err(e)
        }
    }
}

fn copy_artifacts(source_dir: &Path, dest_dir: &Path) -> Result<Vec<PathBuf>, InstallError> {
    let installed = copier::copy_all(source_dir, dest_dir, |src, dst| {
        println!("   * {} -> {}", src.display(), dst.display());
    })?;
    Ok(installed)
}

/// `goinst <package>`: run the pipeline with the `go get` backend.
pub fn run_install(plan: &InstallPlan) -> Result<InstallReport, InstallError> {
    let backend = GoGetBackend::new(plan.go_program());
    let mut pipeline = InstallPipeline::new(plan, &backend);
    let result = pipeline.run();
    debug_assert!(pipeline.state().is_terminal());
    tracing::debug!(state = ?pipeline.state(), "install finished");
    result
}
