use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::bifurcation::sample_bifurcation;
use crate::cloud::{Sample, sample_region};
use crate::params::{BifurcationParams, RasterParams, SampleParams};
use crate::raster::{RasterFrame, render_region};
use crate::stream::Message;

/// A parameter snapshot for one run of one engine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "engine", rename_all = "lowercase")]
pub enum Job {
    Raster(RasterParams),
    Cloud(SampleParams),
    Bifurcation(BifurcationParams),
}

impl Job {
    pub fn name(&self) -> &'static str {
        match self {
            Job::Raster(_) => "raster",
            Job::Cloud(_) => "cloud",
            Job::Bifurcation(_) => "bifurcation",
        }
    }

    /// Runs the job synchronously on the calling thread.
    pub fn events(self) -> Box<dyn Iterator<Item = Event> + Send> {
        match self {
            Job::Raster(p) => Box::new(render_region(p).map(Event::Raster)),
            Job::Cloud(p) => Box::new(sample_region(p).map(Event::Points)),
            Job::Bifurcation(p) => Box::new(sample_bifurcation(p).map(Event::Points)),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    Raster(Message<RasterFrame>),
    Points(Message<Vec<Sample>>),
}

impl Event {
    pub fn progress(&self) -> f64 {
        match self {
            Event::Raster(m) => m.progress(),
            Event::Points(m) => m.progress(),
        }
    }

    pub fn is_complete(&self) -> bool {
        match self {
            Event::Raster(m) => m.is_complete(),
            Event::Points(m) => m.is_complete(),
        }
    }
}

/// Events a worker may queue ahead of the caller before it blocks.
pub const SESSION_BACKLOG: usize = 4;

/// An event tagged with the run it belongs to.
#[derive(Clone, Debug, PartialEq)]
pub struct Envelope {
    pub generation: u64,
    pub event: Event,
}

/// Runs one engine at a time off the caller's thread and hands back its messages in order.
///
/// Starting a run replaces the previous one: the shared generation counter is
/// bumped, the old worker stops at its next chunk boundary, and anything it
/// already queued is dropped by `recv`. At most `SESSION_BACKLOG` events wait
/// in the channel; a worker that gets further ahead blocks until the caller reads.
pub struct Session {
    generation: Arc<AtomicU64>,
    sender: mpsc::Sender<Envelope>,
    receiver: mpsc::Receiver<Envelope>,
    worker: Option<JoinHandle<()>>,
}

impl Session {
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::channel(SESSION_BACKLOG);
        Session { generation: Arc::new(AtomicU64::new(0)), sender, receiver, worker: None }
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Starts `job` on the blocking pool and returns its generation.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&mut self, job: Job) -> u64 {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        log::info!("starting {} run, generation {}", job.name(), generation);
        self.discard_queued();

        let token = Arc::clone(&self.generation);
        let sender = self.sender.clone();
        self.worker = Some(tokio::task::spawn_blocking(move || {
            run(job, generation, &token, &sender);
        }));

        generation
    }

    /// Abandons the current run without starting another.
    pub fn cancel(&mut self) {
        let stale = self.generation.fetch_add(1, Ordering::SeqCst);
        log::info!("cancelled generation {}", stale);
        self.discard_queued();
    }

    /// Number of events waiting to be read.
    pub fn backlog(&self) -> usize {
        self.sender.max_capacity() - self.sender.capacity()
    }

    // frees the channel so a replaced worker blocked on a full queue gets back
    // to its generation check
    fn discard_queued(&mut self) {
        let mut dropped = 0;
        while self.receiver.try_recv().is_ok() {
            dropped += 1;
        }
        if dropped > 0 {
            log::trace!("discarded {} queued events", dropped);
        }
    }

    /// Whether the last started worker has returned, either finished or cancelled.
    pub fn is_idle(&self) -> bool {
        self.worker.as_ref().is_none_or(|w| w.is_finished())
    }

    /// Next event of the current run. Events from replaced runs are skipped.
    ///
    /// Waits forever when no run is active; stop calling after `Complete`.
    pub async fn recv(&mut self) -> Option<Envelope> {
        loop {
            let envelope = self.receiver.recv().await?;
            if envelope.generation == self.generation() {
                return Some(envelope);
            }
            log::trace!("dropping event from stale generation {}", envelope.generation);
        }
    }

    /// Collects the current run up to and including its `Complete`.
    pub async fn drain(&mut self) -> Vec<Envelope> {
        let mut out = Vec::new();
        while let Some(envelope) = self.recv().await {
            let done = envelope.event.is_complete();
            out.push(envelope);
            if done {
                break;
            }
        }
        out
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

fn run(job: Job, generation: u64, token: &AtomicU64, sender: &mpsc::Sender<Envelope>) {
    let current = || token.load(Ordering::SeqCst) == generation;
    let mut events = job.events();

    // checked before computing a chunk and again before handing it over
    while current() {
        let Some(event) = events.next() else { return };
        if !current() {
            break;
        }
        if sender.blocking_send(Envelope { generation, event }).is_err() {
            log::debug!("session dropped, stopping generation {}", generation);
            return;
        }
    }
    log::debug!("generation {} superseded, stopping", generation);
}
