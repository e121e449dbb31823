//! Parallel dispatch of compilation tasks.
//!
//! Tasks run on a dedicated rayon pool. A task starts once every task it
//! depends on in the same pass has succeeded; when one fails, everything that
//! transitively depends on it is skipped without being started.

use std::collections::VecDeque;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};

use anyhow::Result;
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::builder::plan::{CompilationTask, TaskKind};
use crate::core::ConfigurationId;

/// Something that compiles one task.
pub trait TaskRunner: Send + Sync {
    fn run(&self, task: &CompilationTask) -> Result<()>;
}

/// Final state of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Succeeded,
    Failed,
    /// A dependency failed
    Skipped,
    /// Not started because the build was cancelled
    Cancelled,
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TaskStatus::Succeeded => "succeeded",
            TaskStatus::Failed => "failed",
            TaskStatus::Skipped => "skipped",
            TaskStatus::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TaskReport {
    pub id: ConfigurationId,
    pub kind: TaskKind,
    pub status: TaskStatus,
    pub error: Option<String>,
}

/// Outcome of a dispatch, one report per task in plan order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DispatchReport {
    pub tasks: Vec<TaskReport>,
}

impl DispatchReport {
    pub fn count(&self, status: TaskStatus) -> usize {
        self.tasks.iter().filter(|t| t.status == status).count()
    }

    pub fn is_success(&self) -> bool {
        self.tasks.iter().all(|t| t.status == TaskStatus::Succeeded)
    }

    /// Turn an unsuccessful report into an error.
    pub fn into_result(self) -> Result<DispatchReport, DispatchError> {
        if self.count(TaskStatus::Cancelled) > 0 {
            return Err(DispatchError::Cancelled);
        }
        let failed = self.count(TaskStatus::Failed);
        if failed > 0 {
            return Err(DispatchError::Failed {
                failed,
                skipped: self.count(TaskStatus::Skipped),
            });
        }
        Ok(self)
    }
}

#[derive(Debug, Error, miette::Diagnostic)]
pub enum DispatchError {
    #[error("{failed} compilation task(s) failed, {skipped} skipped")]
    #[diagnostic(code(flexbuild::build::failed))]
    Failed { failed: usize, skipped: usize },

    #[error("build cancelled")]
    #[diagnostic(code(flexbuild::build::cancelled))]
    Cancelled,

    #[error("failed to start the compilation pool")]
    #[diagnostic(code(flexbuild::build::pool))]
    Pool(#[from] rayon::ThreadPoolBuildError),
}

/// Runs compilation tasks with bounded parallelism.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    jobs: usize,
    cancelled: Arc<AtomicBool>,
}

impl Dispatcher {
    pub fn new(jobs: usize) -> Self {
        Dispatcher {
            jobs: jobs.max(1),
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Share an externally owned cancellation flag.
    pub fn with_cancellation(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancelled = flag;
        self
    }

    /// Flag that stops new tasks from starting once set.
    pub fn cancellation(&self) -> Arc<AtomicBool> {
        self.cancelled.clone()
    }

    pub fn jobs(&self) -> usize {
        self.jobs
    }

    /// Run `tasks` and report what happened to each.
    ///
    /// Task failures are recorded in the report, not returned as errors.
    pub fn run(&self, tasks: &[CompilationTask], runner: &dyn TaskRunner) -> Result<DispatchReport, DispatchError> {
        let graph = dependency_graph(tasks);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.jobs)
            .thread_name(|i| format!("flexbuild-compile-{}", i))
            .build()?;

        let mut status: Vec<Option<TaskStatus>> = vec![None; tasks.len()];
        let mut errors: Vec<Option<String>> = vec![None; tasks.len()];
        let mut waiting_on: Vec<usize> = graph
            .node_indices()
            .map(|n| graph.neighbors_directed(n, Direction::Incoming).count())
            .collect();
        let mut ready: VecDeque<usize> = (0..tasks.len()).filter(|&i| waiting_on[i] == 0).collect();

        pool.in_place_scope(|scope| {
            let (tx, rx) = mpsc::channel::<(usize, Result<()>)>();
            let mut running = 0usize;

            loop {
                while let Some(i) = ready.pop_front() {
                    if self.cancelled.load(Ordering::SeqCst) {
                        break;
                    }
                    let task = &tasks[i];
                    let tx = tx.clone();
                    debug!("starting {}", task);
                    running += 1;
                    scope.spawn(move |_| {
                        let result = runner.run(task);
                        let _ = tx.send((i, result));
                    });
                }

                if running == 0 {
                    break;
                }
                let Ok((i, result)) = rx.recv() else {
                    break;
                };
                running -= 1;

                match result {
                    Ok(()) => {
                        debug!("finished {}", tasks[i]);
                        status[i] = Some(TaskStatus::Succeeded);
                        for dependent in graph.neighbors_directed(NodeIndex::new(i), Direction::Outgoing) {
                            let d = dependent.index();
                            waiting_on[d] -= 1;
                            if waiting_on[d] == 0 && status[d].is_none() {
                                ready.push_back(d);
                            }
                        }
                    }
                    Err(err) => {
                        warn!("{} failed: {:#}", tasks[i], err);
                        status[i] = Some(TaskStatus::Failed);
                        errors[i] = Some(format!("{:#}", err));
                        skip_dependents(&graph, i, &mut status);
                    }
                }
            }
        });

        let reports = tasks
            .iter()
            .zip(status)
            .zip(errors)
            .map(|((task, status), error)| TaskReport {
                id: task.id(),
                kind: task.kind,
                status: status.unwrap_or(TaskStatus::Cancelled),
                error,
            })
            .collect();
        Ok(DispatchReport { tasks: reports })
    }
}

/// Mark every task reachable from `failed` as skipped.
fn skip_dependents(graph: &DiGraph<usize, ()>, failed: usize, status: &mut [Option<TaskStatus>]) {
    let mut stack = vec![NodeIndex::new(failed)];
    while let Some(node) = stack.pop() {
        for dependent in graph.neighbors_directed(node, Direction::Outgoing) {
            if status[dependent.index()].is_none() {
                status[dependent.index()] = Some(TaskStatus::Skipped);
                stack.push(dependent);
            }
        }
    }
}

/// Edges run from a dependency's main task to every task that links it.
///
/// Edges inside a dependency cycle are dropped so the tasks of the cycle can
/// still run; the order among them is then unspecified.
fn dependency_graph(tasks: &[CompilationTask]) -> DiGraph<usize, ()> {
    let mut graph = DiGraph::new();
    let nodes: Vec<NodeIndex> = (0..tasks.len()).map(|i| graph.add_node(i)).collect();

    for (i, task) in tasks.iter().enumerate() {
        for dep in &task.dependencies {
            let providers = tasks
                .iter()
                .enumerate()
                .filter(|(j, t)| *j != i && t.kind == TaskKind::Main && &t.id() == dep);
            for (j, _) in providers {
                graph.update_edge(nodes[j], nodes[i], ());
            }
        }
    }

    let sccs = tarjan_scc(&graph);
    let mut component = vec![0usize; tasks.len()];
    for (c, scc) in sccs.iter().enumerate() {
        if scc.len() > 1 {
            let names: Vec<String> = scc.iter().map(|n| tasks[n.index()].to_string()).collect();
            warn!("dependency cycle between {}", names.join(", "));
        }
        for node in scc {
            component[node.index()] = c;
        }
    }
    graph.retain_edges(|g, edge| {
        g.edge_endpoints(edge)
            .map_or(true, |(a, b)| component[a.index()] != component[b.index()])
    });
    graph
}
