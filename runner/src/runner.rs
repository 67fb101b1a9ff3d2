use crate::{
    config::Params,
    executors::{CommandExecutor, ExecutorError},
    registry::{self, Phase, RegistryError, Vendor},
    resolve::{resolve_set, ResolveError},
};
use itertools::Itertools;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("Failed to resolve phase commands")]
    Resolve(#[from] ResolveError),
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error("Aborting in strict mode")]
    Execution(#[from] ExecutorError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseTiming {
    pub phase: Phase,
    pub elapsed: Duration,
}

/// Drives the fixed phase sequence for one vendor.
///
/// By default the runner is lenient: a failing command is logged and the
/// sequence keeps going, which means all configured phases execute even when
/// an earlier one broke the database state they depend on. Strict mode turns
/// the first failure into an error instead.
pub struct PhaseRunner {
    vendor: Vendor,
    params: Params,
    strict: bool,
    dry_run: bool,
}

impl PhaseRunner {
    pub fn new(vendor: Vendor, params: Params) -> Self {
        Self {
            vendor,
            params,
            strict: false,
            dry_run: false,
        }
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    // resolve the whole sequence up front so registry gaps and missing
    // parameters abort before any command is issued
    fn resolve_sequence(&self) -> Result<Vec<(Phase, Vec<String>)>, RunnerError> {
        Phase::SEQUENCE
            .iter()
            .map(|&phase| {
                let set = registry::templates_for(self.vendor, phase)?;
                Ok((phase, resolve_set(set, &self.params)?))
            })
            .collect()
    }

    /// Run every phase in sequence order, returning the wall-clock timing of
    /// each measured phase.
    pub fn run<E: CommandExecutor>(
        &self,
        executor: &mut E,
    ) -> Result<Vec<PhaseTiming>, RunnerError> {
        let sequence = self.resolve_sequence()?;
        let mut timings = Vec::new();

        for (phase, commands) in sequence {
            let start = Instant::now();

            for command in commands {
                info!("[{phase}] Execute command: {command}");

                if self.dry_run {
                    continue;
                }

                match executor.run(&command) {
                    Ok(status) if !status.success() => {
                        if self.strict {
                            return Err(ExecutorError::Failed { command, status }.into());
                        }
                        warn!("[{phase}] command exited with {status}, continuing");
                    }
                    Ok(_) => {}
                    Err(error) => {
                        if self.strict {
                            return Err(error.into());
                        }
                        warn!("[{phase}] {error}, continuing");
                    }
                }
            }

            let elapsed = start.elapsed();

            if phase.is_setup() {
                info!("[{phase}] setup finished");
            } else {
                info!("[{phase}] finished in {:.3}s", elapsed.as_secs_f64());
                timings.push(PhaseTiming { phase, elapsed });
            }
        }

        Ok(timings)
    }
}

/// Log the end-of-run summary, one line per measured phase plus the total.
pub fn report(timings: &[PhaseTiming]) {
    let total: Duration = timings.iter().map(|timing| timing.elapsed).sum();
    let summary = timings
        .iter()
        .map(|timing| format!("{} {:.3}s", timing.phase, timing.elapsed.as_secs_f64()))
        .join(" | ");

    info!("Phase timings: {summary}");
    info!("Total measured time: {:.3}s", total.as_secs_f64());
}
