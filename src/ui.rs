use std::cell::RefCell;

use anyhow::Result;
use colored::Colorize;

use sched::{RunSummary, Scheduler, Status, Unit, UnitId};
use util::Timer;

use crate::settings::Settings;

/// All interactions with the text UI should go through this struct.
pub struct Ui {
    /// -v setting, displays extra text info to user
    pub verbose: bool,
    /// -y setting, ignores all points where the user is prompted to enter 'y'
    override_confirmation: bool,
    /// keeps track of time for each run
    timer: Timer,
    /// buffer to hold strings internally when getting input
    strbuf: RefCell<String>,
}

impl Ui {
    pub fn new(settings: &Settings) -> Self {
        Self {
            verbose: settings.verbose > 0,
            override_confirmation: settings.yes,
            timer: Timer::now(),
            // Refcell so we can call confirm() w/o needing a unique reference:
            strbuf: RefCell::new(String::with_capacity(16)),
        }
    }

    pub fn confirm(&self, prompt: &str) -> Result<bool> {
        if self.override_confirmation {
            return Ok(true);
        }
        eprintln!("{} (y/N)", prompt);

        let mut strbuf = self.strbuf.borrow_mut();

        strbuf.clear();
        std::io::stdin().read_line(&mut strbuf)?;
        match strbuf.trim_start().chars().next() {
            Some('y') | Some('Y') => Ok(true),
            _ => Ok(false),
        }
    }

    pub fn start_timer(&mut self) {
        self.timer.reset();
    }

    pub fn print_elapsed(&self, what: &str) {
        if self.verbose {
            self.timer.print_elapsed(what);
        }
    }

    pub fn verbose_msg(&self, msg: &str) {
        if self.verbose {
            eprintln!("{}", msg);
        }
    }

    /// Print the unit tree below the scheduler's root with one status line per unit.
    pub fn print_status(&self, sched: &Scheduler) {
        print!("{}", render_status(sched));
    }

    /// For dry runs: say which runs would execute and which are already done.
    pub fn print_plan(&self, sched: &Scheduler) {
        let completed: Vec<&Unit> = sched
            .units()
            .map(|(_, unit)| unit)
            .filter(|unit| !unit.is_parent() && unit.completed())
            .collect();
        if !completed.is_empty() {
            eprintln!(
                "\nThe following runs are {} and will not run:",
                "already complete".green()
            );
            for unit in completed {
                eprintln!("{} {}", "COMPLETED".green(), status_line(unit));
            }
        }

        let pending: Vec<&Unit> = sched.pending_leaves().collect();
        if pending.is_empty() {
            eprintln!("\nNothing to run.");
        } else {
            eprintln!("\nThe following runs {}:", "will run".green());
            for unit in pending {
                eprintln!("{} {}", "RUN".green(), unit.path.display());
            }
        }
        eprintln!();
    }

    pub fn print_summary(&self, summary: &RunSummary) {
        eprintln!(
            "\n{} {} executed ({} succeeded, {} failed), {} already complete.\n",
            "Completed sweep.".green(),
            summary.executed,
            summary.succeeded.to_string().green(),
            summary.failed.to_string().red(),
            summary.skipped,
        );
    }
}

fn status_line(unit: &Unit) -> String {
    let path = unit.path.display();
    match unit.status {
        Status::Success => format!("✅ {path} ({})", "SUCCESS".green()),
        Status::Failed => format!("❌ {path} ({})", "FAILED".red()),
        Status::Pending => format!("🕒 {path} ({})", "PENDING".yellow()),
    }
}

/// The status report: one line per unit, children indented under their parent,
/// then a count of leaves by status.
fn render_status(sched: &Scheduler) -> String {
    let mut out = String::with_capacity(64 * sched.units().count());
    render_unit(sched, sched.root(), 0, &mut out);

    let (mut succeeded, mut failed, mut pending) = (0, 0, 0);
    for (_, unit) in sched.units() {
        if unit.is_parent() {
            continue;
        }
        match unit.status {
            Status::Success => succeeded += 1,
            Status::Failed => failed += 1,
            Status::Pending => pending += 1,
        }
    }
    out.push_str(&format!(
        "\n{} succeeded, {} failed, {} pending\n",
        succeeded.to_string().green(),
        failed.to_string().red(),
        pending.to_string().yellow(),
    ));
    out
}

fn render_unit(sched: &Scheduler, id: UnitId, depth: usize, out: &mut String) {
    let unit = sched.get(id);
    if depth > 0 {
        out.push_str(&"   ".repeat(depth - 1));
        out.push_str("|--- ");
    }
    out.push_str(&status_line(unit));
    out.push('\n');
    for dep in &unit.dependencies {
        render_unit(sched, *dep, depth + 1, out);
    }
}
