use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result};

use util::{HashMap, IdVec};

use crate::marker::{self, MarkerState};
use crate::{aggregate, Error, Lock, LockGuard, PathTree, Status, Unit, UnitId, UnitKind, Work};

/// Counts of what happened to leaf units during a run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// leaves whose work function was called
    pub executed: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// leaves that were already complete
    pub skipped: usize,
}

/// Result of [`Scheduler::run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every reachable unit was resolved.
    Finished(RunSummary),
    /// Another invocation holds the lock; nothing was executed.
    Locked,
}

/// Owns the units of one sweep (sub)tree and runs them in dependency order.
///
/// Units are rebuilt from the filesystem every time a `Scheduler` is created;
/// marker files are the only thing carried over between invocations.
#[derive(Debug)]
pub struct Scheduler {
    /// arena of units, children always before their parents
    units: IdVec<UnitId, Unit>,
    /// unit for the target directory
    root: UnitId,
}

impl Scheduler {
    /// Build the unit tree under `target` and evaluate every unit's status.
    ///
    /// `target` must be an existing directory inside `sweep_root`.
    pub fn discover(sweep_root: &Path, target: &Path) -> Result<Self> {
        validate_target(sweep_root, target)?;
        let tree = PathTree::walk(target)
            .with_context(|| format!("while discovering units under {:?}", target))?;
        let mut scheduler = Self::from_tree(tree);
        scheduler.check_status()?;
        log::info!(
            "discovered {} units under {:?}",
            scheduler.units.len(),
            target
        );
        Ok(scheduler)
    }

    fn from_tree(tree: PathTree) -> Self {
        let mut units: IdVec<UnitId, Unit> = IdVec::with_capacity(tree.len());
        let mut by_path: HashMap<PathBuf, UnitId> = HashMap::default();

        for node in tree.nodes {
            let kind = if node.children.is_empty() {
                UnitKind::Leaf
            } else {
                UnitKind::Parent
            };
            let id = units.push(Unit::new(node.path.clone(), kind));
            by_path.insert(node.path, id);
        }

        // a unit depends on every unit sitting directly below it:
        let edges: Vec<(UnitId, UnitId)> = units
            .iter_ids()
            .filter_map(|(id, unit)| {
                let parent = unit.path.parent()?;
                by_path.get(parent).map(|parent_id| (*parent_id, id))
            })
            .collect();
        for (parent, child) in edges {
            units.get_mut(parent).dependencies.push(child);
        }

        let root = UnitId::from(units.len() - 1);
        Self { units, root }
    }

    /// Re-read every unit's status from disk, children before parents.
    ///
    /// This only updates in-memory state; parent markers are written by [`Self::run`].
    pub fn check_status(&mut self) -> Result<()> {
        for i in 0..self.units.len() {
            self.refresh(i.into(), false)?;
        }
        Ok(())
    }

    /// Id of the unit for the target directory.
    pub fn root(&self) -> UnitId {
        self.root
    }

    pub fn get(&self, id: UnitId) -> &Unit {
        self.units.get(id)
    }

    /// All units, children before parents.
    pub fn units(&self) -> impl Iterator<Item = (UnitId, &Unit)> + '_ {
        self.units.iter_ids()
    }

    /// Leaves that a run would execute.
    pub fn pending_leaves(&self) -> impl Iterator<Item = &Unit> + '_ {
        self.units
            .iter()
            .filter(|unit| !unit.is_parent() && !unit.completed())
    }

    /// Execute every incomplete unit while holding `lock`.
    ///
    /// A leaf exiting nonzero is recorded as failed and the run carries on.
    /// An `Err` from `work` stops the run immediately; the lock is still released.
    pub fn run(
        &mut self,
        lock: &mut dyn Lock,
        label: &str,
        work: &mut dyn Work,
    ) -> Result<RunOutcome> {
        let Some(_guard) = LockGuard::acquire(lock, label)? else {
            log::error!("Another instance is already running; not executing anything");
            return Ok(RunOutcome::Locked);
        };

        let mut summary = RunSummary::default();
        self.resolve(self.root, work, &mut summary)?;
        log::info!("run finished: {summary:?}");
        Ok(RunOutcome::Finished(summary))
    }

    /// Bring `id` to a terminal status, resolving its dependencies first.
    fn resolve(&mut self, id: UnitId, work: &mut dyn Work, summary: &mut RunSummary) -> Result<()> {
        match self.units.get(id).kind {
            UnitKind::Leaf => self.run_leaf(id, work, summary),
            UnitKind::Parent => {
                let deps = self.units.get(id).dependencies.clone();
                for dep in deps {
                    self.resolve(dep, work, summary)?;
                }
                let status = self.refresh(id, true)?;
                log::info!("{:?} finalized as {status}", self.units.get(id).path);
                Ok(())
            }
        }
    }

    fn run_leaf(
        &mut self,
        id: UnitId,
        work: &mut dyn Work,
        summary: &mut RunSummary,
    ) -> Result<()> {
        let unit = self.units.get(id);
        if unit.completed() {
            if unit.status == Status::Failed {
                log::info!(
                    "{:?} already completed with status FAILED; reset it to retry",
                    unit.path
                );
            } else {
                log::info!("{:?} already completed successfully; skipping", unit.path);
            }
            summary.skipped += 1;
            return Ok(());
        }

        let path = unit.path.clone();
        log::info!("starting {:?}", path);
        work.prepare(&path)
            .with_context(|| format!("while preparing {:?}", path))?;
        let exit_code = work
            .execute(&path)
            .with_context(|| format!("while executing {:?}", path))?;
        summary.executed += 1;

        let status = if exit_code == 0 {
            log::info!("{:?} ran successfully", path);
            marker::mark_success(&path)?;
            summary.succeeded += 1;
            Status::Success
        } else {
            log::error!("{:?} failed with exit code {exit_code}", path);
            marker::mark_failed(&path)?;
            summary.failed += 1;
            Status::Failed
        };
        self.units.get_mut(id).status = status;
        Ok(())
    }

    /// Recompute one unit's status from its markers (leaf) or dependencies (parent).
    /// Dependencies must already be up to date.
    fn refresh(&mut self, id: UnitId, persist: bool) -> Result<Status> {
        let unit = self.units.get(id);
        let on_disk = marker::read(&unit.path);
        if on_disk == MarkerState::Conflict {
            log::error!(
                "{:?} contains both SUCCESS and FAILED markers; treating it as FAILED",
                unit.path
            );
        }

        let status = match unit.kind {
            UnitKind::Leaf => Status::from_markers(on_disk),
            UnitKind::Parent => {
                let derived = aggregate(
                    unit.dependencies
                        .iter()
                        .map(|dep| self.units.get(*dep).status),
                );
                settle_parent(&unit.path, derived, on_disk, persist)?
            }
        };

        log::debug!("status of {:?}: {status}", unit.path);
        self.units.get_mut(id).status = status;
        Ok(status)
    }
}

/// Reconcile a parent's aggregated status with the marker already on disk,
/// writing the marker if `persist` is set and the parent just completed.
fn settle_parent(
    path: &Path,
    derived: Status,
    on_disk: MarkerState,
    persist: bool,
) -> Result<Status> {
    let status = match (derived, on_disk) {
        (_, MarkerState::Conflict) => Status::Failed,
        (Status::Pending, MarkerState::None) => Status::Pending,
        (Status::Pending, _) => {
            log::warn!(
                "{:?} has a {:?} marker but some of its units are pending; ignoring the marker",
                path,
                on_disk
            );
            Status::Pending
        }
        (Status::Success, MarkerState::None) => {
            if persist {
                marker::mark_success(path)?;
            }
            Status::Success
        }
        (Status::Failed, MarkerState::None) => {
            if persist {
                marker::mark_failed(path)?;
            }
            Status::Failed
        }
        (Status::Success, MarkerState::Success) | (Status::Failed, MarkerState::Failed) => derived,
        (_, _) => {
            log::error!(
                "{:?} has a {:?} marker but its units say {derived}; treating it as FAILED",
                path,
                on_disk
            );
            Status::Failed
        }
    };
    Ok(status)
}

/// Check that `target` names a directory inside `sweep_root` without escaping it via `..`.
///
/// The comparison is lexical, so `./runs/a` is inside `runs` but a symlink into
/// the root from elsewhere is not.
pub fn validate_target(sweep_root: &Path, target: &Path) -> Result<(), Error> {
    let escapes = target
        .components()
        .any(|component| matches!(component, Component::ParentDir));
    let (root, inner) = (without_cur_dir(sweep_root), without_cur_dir(target));
    // an empty root is the current directory, which holds no absolute paths:
    let outside = !inner.starts_with(&root) || (root.as_os_str().is_empty() && inner.has_root());
    if escapes || outside {
        return Err(Error::NotUnderSweepRoot(
            target.to_path_buf(),
            sweep_root.to_path_buf(),
        ));
    }
    if !target.is_dir() {
        return Err(Error::NotADirectory(target.to_path_buf()));
    }
    Ok(())
}

fn without_cur_dir(path: &Path) -> PathBuf {
    path.components()
        .filter(|component| !matches!(component, Component::CurDir))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FileLock, FAILED_MARKER, SUCCESS_MARKER};
    use anyhow::{anyhow, Result};
    use std::fs;
    use tempfile::{tempdir, TempDir};

    /// Exit codes keyed by leaf directory name; unlisted leaves succeed.
    #[derive(Default)]
    struct FakeWork {
        exit_codes: Vec<(&'static str, i32)>,
        explode_on: Option<&'static str>,
        calls: Vec<PathBuf>,
    }

    impl Work for FakeWork {
        fn execute(&mut self, unit_dir: &Path) -> Result<i32> {
            self.calls.push(unit_dir.to_path_buf());
            let name = unit_dir.file_name().and_then(|n| n.to_str()).unwrap_or("");
            if self.explode_on == Some(name) {
                return Err(anyhow!("simulated environment failure"));
            }
            let code = self
                .exit_codes
                .iter()
                .find(|(leaf, _)| *leaf == name)
                .map(|(_, code)| *code)
                .unwrap_or(0);
            Ok(code)
        }
    }

    struct Fixture {
        dir: TempDir,
        lock: FileLock,
    }

    impl Fixture {
        /// runs/cfg/{run_0,run_1}
        fn two_leaves() -> Result<Self> {
            let dir = tempdir()?;
            fs::create_dir_all(dir.path().join("runs/cfg/run_0"))?;
            fs::create_dir_all(dir.path().join("runs/cfg/run_1"))?;
            fs::write(dir.path().join("runs/cfg/config.yaml"), "threads: 4\n")?;
            let lock = FileLock::new(dir.path().join("sched.lock"));
            Ok(Self { dir, lock })
        }

        fn runs(&self) -> PathBuf {
            self.dir.path().join("runs")
        }

        fn path(&self, rel: &str) -> PathBuf {
            self.dir.path().join(rel)
        }

        fn discover(&self) -> Result<Scheduler> {
            Scheduler::discover(&self.runs(), &self.runs())
        }

        fn status_of(&self, sched: &Scheduler, rel: &str) -> Status {
            let path = self.path(rel);
            sched
                .units()
                .find(|(_, unit)| unit.path == path)
                .map(|(_, unit)| unit.status)
                .expect("unit not found")
        }
    }

    fn finished(outcome: RunOutcome) -> RunSummary {
        match outcome {
            RunOutcome::Finished(summary) => summary,
            RunOutcome::Locked => panic!("run unexpectedly locked out"),
        }
    }

    #[test]
    fn test_discovery_shape() -> Result<()> {
        let fx = Fixture::two_leaves()?;
        let sched = fx.discover()?;
        assert_eq!(sched.units().count(), 4);

        let root = sched.get(sched.root());
        assert_eq!(root.path, fx.runs());
        assert!(root.is_parent());
        assert_eq!(root.dependencies.len(), 1);

        let cfg = sched.get(root.dependencies[0]);
        assert_eq!(cfg.path, fx.path("runs/cfg"));
        assert!(cfg.is_parent());
        let leaves: Vec<&Unit> = cfg.dependencies.iter().map(|id| sched.get(*id)).collect();
        assert_eq!(leaves.len(), 2);
        for leaf in leaves {
            assert_eq!(leaf.kind, UnitKind::Leaf);
            assert!(leaf.dependencies.is_empty());
            assert_eq!(leaf.status, Status::Pending);
        }
        assert_eq!(sched.pending_leaves().count(), 2);
        Ok(())
    }

    #[test]
    fn test_target_outside_sweep_root() -> Result<()> {
        let fx = Fixture::two_leaves()?;
        let err = Scheduler::discover(&fx.runs(), fx.dir.path()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<Error>(),
            Some(Error::NotUnderSweepRoot(..))
        ));

        let sneaky = fx.runs().join("cfg/../..");
        let err = Scheduler::discover(&fx.runs(), &sneaky).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<Error>(),
            Some(Error::NotUnderSweepRoot(..))
        ));
        Ok(())
    }

    #[test]
    fn test_missing_target() -> Result<()> {
        let fx = Fixture::two_leaves()?;
        let err = Scheduler::discover(&fx.runs(), &fx.runs().join("nope")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<Error>(),
            Some(Error::NotADirectory(_))
        ));
        Ok(())
    }

    #[test]
    fn test_leading_cur_dir_is_ignored() -> Result<()> {
        // tests run from the package dir, which has a src/ directory:
        validate_target(Path::new("src"), Path::new("./src"))?;
        validate_target(Path::new("./src"), Path::new("src"))?;
        validate_target(Path::new("."), Path::new("src"))?;

        let err = validate_target(Path::new("."), &std::env::temp_dir()).unwrap_err();
        assert!(matches!(err, Error::NotUnderSweepRoot(..)));
        let err = validate_target(Path::new("./src"), Path::new("./target")).unwrap_err();
        assert!(matches!(err, Error::NotUnderSweepRoot(..)));
        Ok(())
    }

    #[test]
    fn test_target_without_subdirs_is_a_leaf() -> Result<()> {
        let fx = Fixture::two_leaves()?;
        let target = fx.path("runs/cfg/run_1");
        let mut sched = Scheduler::discover(&fx.runs(), &target)?;
        assert_eq!(sched.units().count(), 1);
        assert_eq!(sched.get(sched.root()).kind, UnitKind::Leaf);

        let mut work = FakeWork::default();
        let mut lock = FileLock::new(fx.path("single.lock"));
        let summary = finished(sched.run(&mut lock, "single", &mut work)?);
        assert_eq!(summary.executed, 1);
        assert_eq!(work.calls, vec![target.clone()]);
        assert!(marker::is_success(&target));
        assert!(!marker::is_success(&fx.path("runs/cfg/run_0")));
        Ok(())
    }

    // fresh tree, both leaves succeed:
    #[test]
    fn test_all_leaves_succeed() -> Result<()> {
        let mut fx = Fixture::two_leaves()?;
        let mut sched = fx.discover()?;
        let mut work = FakeWork::default();

        let summary = finished(sched.run(&mut fx.lock, "test", &mut work)?);
        assert_eq!(summary.executed, 2);
        assert_eq!(summary.succeeded, 2);

        for rel in ["runs/cfg/run_0", "runs/cfg/run_1", "runs/cfg", "runs"] {
            assert!(marker::is_success(&fx.path(rel)), "{rel} has SUCCESS");
            assert!(!marker::is_failed(&fx.path(rel)), "{rel} has no FAILED");
            assert_eq!(fx.status_of(&sched, rel), Status::Success);
        }
        assert!(!fx.lock.path().exists(), "lock released");
        Ok(())
    }

    // one leaf fails; its sibling still runs:
    #[test]
    fn test_one_leaf_fails() -> Result<()> {
        let mut fx = Fixture::two_leaves()?;
        let mut sched = fx.discover()?;
        let mut work = FakeWork {
            exit_codes: vec![("run_0", 1)],
            ..Default::default()
        };

        let summary = finished(sched.run(&mut fx.lock, "test", &mut work)?);
        assert_eq!(work.calls.len(), 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.succeeded, 1);

        assert_eq!(fx.status_of(&sched, "runs/cfg/run_0"), Status::Failed);
        assert_eq!(fx.status_of(&sched, "runs/cfg/run_1"), Status::Success);
        assert_eq!(fx.status_of(&sched, "runs/cfg"), Status::Failed);
        assert!(marker::is_failed(&fx.path("runs/cfg/run_0")));
        assert!(marker::is_success(&fx.path("runs/cfg/run_1")));
        assert!(marker::is_failed(&fx.path("runs/cfg")));
        assert!(marker::is_failed(&fx.path("runs")));
        Ok(())
    }

    // a second scheduler over the finished tree runs nothing:
    #[test]
    fn test_resume_runs_nothing() -> Result<()> {
        let mut fx = Fixture::two_leaves()?;
        let mut work = FakeWork::default();
        fx.discover()?.run(&mut fx.lock, "first", &mut work)?;
        assert_eq!(work.calls.len(), 2);

        let mut sched = fx.discover()?;
        assert_eq!(sched.pending_leaves().count(), 0);
        let mut work = FakeWork::default();
        let summary = finished(sched.run(&mut fx.lock, "second", &mut work)?);
        assert!(work.calls.is_empty());
        assert_eq!(summary.skipped, 2);
        assert_eq!(fx.status_of(&sched, "runs"), Status::Success);
        Ok(())
    }

    #[test]
    fn test_running_twice_in_process_is_idempotent() -> Result<()> {
        let mut fx = Fixture::two_leaves()?;
        let mut sched = fx.discover()?;
        let mut work = FakeWork {
            exit_codes: vec![("run_1", 3)],
            ..Default::default()
        };
        sched.run(&mut fx.lock, "once", &mut work)?;
        sched.run(&mut fx.lock, "twice", &mut work)?;
        assert_eq!(work.calls.len(), 2);
        assert!(marker::is_failed(&fx.path("runs/cfg/run_1")));
        assert!(!marker::is_success(&fx.path("runs/cfg/run_1")));
        Ok(())
    }

    // lock already held by someone else:
    #[test]
    fn test_held_lock_runs_nothing() -> Result<()> {
        let mut fx = Fixture::two_leaves()?;
        fs::write(fx.lock.path(), "other-run")?;
        marker::mark_success(&fx.path("runs/cfg/run_0"))?;

        let mut sched = fx.discover()?;
        let mut work = FakeWork::default();
        let outcome = sched.run(&mut fx.lock, "mine", &mut work)?;

        assert_eq!(outcome, RunOutcome::Locked);
        assert!(work.calls.is_empty());
        assert_eq!(fx.lock.holder().as_deref(), Some("other-run"));
        assert!(marker::is_success(&fx.path("runs/cfg/run_0")));
        assert!(!marker::is_success(&fx.path("runs/cfg")));
        assert_eq!(marker::read(&fx.path("runs/cfg/run_1")), MarkerState::None);
        Ok(())
    }

    // the work function errors out instead of returning an exit code:
    #[test]
    fn test_work_error_is_fatal_and_releases_lock() -> Result<()> {
        let mut fx = Fixture::two_leaves()?;
        let mut sched = fx.discover()?;
        let mut work = FakeWork {
            explode_on: Some("run_0"),
            ..Default::default()
        };

        let err = sched.run(&mut fx.lock, "test", &mut work).unwrap_err();
        assert!(format!("{err:?}").contains("simulated environment failure"));
        assert_eq!(work.calls.len(), 1, "run stopped at the failing unit");
        assert_eq!(marker::read(&fx.path("runs/cfg/run_0")), MarkerState::None);
        assert_eq!(marker::read(&fx.path("runs/cfg")), MarkerState::None);
        assert!(!fx.lock.path().exists(), "lock released");
        Ok(())
    }

    #[test]
    fn test_conflicting_markers_fail_loudly() -> Result<()> {
        let mut fx = Fixture::two_leaves()?;
        let leaf = fx.path("runs/cfg/run_0");
        fs::write(leaf.join(SUCCESS_MARKER), "")?;
        fs::write(leaf.join(FAILED_MARKER), "")?;

        let mut sched = fx.discover()?;
        assert_eq!(fx.status_of(&sched, "runs/cfg/run_0"), Status::Failed);

        let mut work = FakeWork::default();
        sched.run(&mut fx.lock, "test", &mut work)?;
        assert_eq!(work.calls, vec![fx.path("runs/cfg/run_1")]);
        assert_eq!(fx.status_of(&sched, "runs/cfg"), Status::Failed);
        Ok(())
    }

    #[test]
    fn test_check_status_does_not_write() -> Result<()> {
        let fx = Fixture::two_leaves()?;
        marker::mark_success(&fx.path("runs/cfg/run_0"))?;
        marker::mark_success(&fx.path("runs/cfg/run_1"))?;

        let sched = fx.discover()?;
        assert_eq!(fx.status_of(&sched, "runs/cfg"), Status::Success);
        assert_eq!(marker::read(&fx.path("runs/cfg")), MarkerState::None);
        Ok(())
    }

    #[test]
    fn test_parent_pending_until_children_complete() -> Result<()> {
        let fx = Fixture::two_leaves()?;
        marker::mark_failed(&fx.path("runs/cfg/run_0"))?;
        let sched = fx.discover()?;
        assert_eq!(fx.status_of(&sched, "runs/cfg"), Status::Pending);
        assert_eq!(fx.status_of(&sched, "runs"), Status::Pending);
        Ok(())
    }

    #[test]
    fn test_stale_parent_marker_disagreeing_with_children() -> Result<()> {
        let fx = Fixture::two_leaves()?;
        marker::mark_success(&fx.path("runs/cfg/run_0"))?;
        marker::mark_failed(&fx.path("runs/cfg/run_1"))?;
        marker::mark_success(&fx.path("runs/cfg"))?;
        let sched = fx.discover()?;
        assert_eq!(fx.status_of(&sched, "runs/cfg"), Status::Failed);
        Ok(())
    }

    #[test]
    fn test_children_finish_before_parents() -> Result<()> {
        // runs/a/{x/{r0,r1},y}, runs/b
        let dir = tempdir()?;
        let runs = dir.path().join("runs");
        for rel in ["a/x/r0", "a/x/r1", "a/y", "b"] {
            fs::create_dir_all(runs.join(rel))?;
        }

        struct OrderCheck {
            runs: PathBuf,
            calls: Vec<PathBuf>,
        }
        impl Work for OrderCheck {
            fn execute(&mut self, unit_dir: &Path) -> Result<i32> {
                // no ancestor may be finalized while a descendant still runs:
                let ancestors = unit_dir.ancestors().skip(1);
                for ancestor in ancestors.take_while(|a| a.starts_with(&self.runs)) {
                    assert_eq!(marker::read(ancestor), MarkerState::None);
                }
                self.calls.push(unit_dir.to_path_buf());
                Ok(0)
            }
        }

        let mut sched = Scheduler::discover(&runs, &runs)?;
        let mut lock = FileLock::new(dir.path().join("sched.lock"));
        let mut work = OrderCheck {
            runs: runs.clone(),
            calls: Vec::new(),
        };
        let summary = finished(sched.run(&mut lock, "order", &mut work)?);
        assert_eq!(summary.executed, 4);
        assert_eq!(work.calls.len(), 4);
        for rel in ["a/x", "a", ""] {
            assert!(marker::is_success(&runs.join(rel)));
        }
        Ok(())
    }

    #[test]
    fn test_lock_can_be_substituted() -> Result<()> {
        #[derive(Default)]
        struct MemoryLock {
            holder: Option<String>,
            releases: usize,
        }
        impl Lock for MemoryLock {
            fn acquire(&mut self, label: &str) -> Result<bool> {
                if self.holder.is_some() {
                    return Ok(false);
                }
                self.holder = Some(label.to_owned());
                Ok(true)
            }
            fn release(&mut self) -> Result<()> {
                self.holder = None;
                self.releases += 1;
                Ok(())
            }
            fn holder(&self) -> Option<String> {
                self.holder.clone()
            }
        }

        let fx = Fixture::two_leaves()?;
        let mut sched = fx.discover()?;
        let mut lock = MemoryLock::default();
        let mut work = FakeWork::default();
        finished(sched.run(&mut lock, "in-memory", &mut work)?);
        assert_eq!(lock.releases, 1);
        assert_eq!(lock.holder(), None);

        lock.holder = Some("someone".to_owned());
        assert_eq!(sched.run(&mut lock, "again", &mut work)?, RunOutcome::Locked);
        Ok(())
    }
}
