use std::thread;

use crossbeam::channel::{unbounded, Receiver, Sender};
use tracing::{debug, info, warn};

use crate::config::SearchConfig;
use crate::error::{CliqueError, Result};
use crate::graph::Graph;
use crate::search::brancher::{LocalSearch, SubtreeDispatch};
use crate::vertex_set::VertexSet;

/// coordinator -> worker: the search is over
pub const TAG_DONE:u32 = 0;
/// coordinator -> worker: here is a new job
pub const TAG_JOB:u32 = 1;
/// coordinator -> worker: updated information
pub const TAG_INFO:u32 = 2;
/// coordinator -> worker: report the current status and wait
pub const TAG_WAIT:u32 = 3;
/// coordinator -> worker: new instructions (follows TAG_WAIT)
pub const TAG_INSTRUCT:u32 = 4;

/// worker -> coordinator: idle, carries the best clique known by the worker
pub const TAG_READY:u32 = 0;
/// worker -> coordinator: updated information
pub const TAG_WORKER_INFO:u32 = 1;
/// worker -> coordinator: status sent in reply to TAG_WAIT
pub const TAG_WAITING:u32 = 2;

/** message sent by the coordinator to a worker */
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToWorker {
    /// subtree to explore
    Job {
        /// size of the best clique known by the coordinator
        best_size: usize,
        /// vertices that may extend the partial clique
        working_set: VertexSet,
        /// clique built so far
        partial_clique: VertexSet,
        /// best clique known by the coordinator
        best_clique: VertexSet,
    },
    /// end of the search, with the final clique
    Done {
        /// best clique found
        clique: VertexSet,
    },
    /// updated information (no payload)
    Info,
    /// report and wait (no payload)
    Wait,
    /// new instructions (no payload)
    Instruct,
}

/** message sent by a worker to the coordinator */
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToCoordinator {
    /// the worker is idle
    Ready {
        /// best clique known by the worker
        clique: VertexSet,
    },
    /// updated information (no payload)
    Info,
    /// status, in reply to a Wait (no payload)
    Waiting,
}

/// splits a packet into its tag and payload
fn split_tag(packet:&[u32]) -> Result<(u32, &[u32])> {
    match packet.split_first() {
        Some((tag, payload)) => Ok((*tag, payload)),
        None => Err(CliqueError::PacketTooShort { expected: 1, found: 0 }),
    }
}

/// checks that a payload holds at least n words
fn check_payload(payload:&[u32], n:usize) -> Result<()> {
    if payload.len() < n {
        return Err(CliqueError::PacketTooShort { expected: n+1, found: payload.len()+1 });
    }
    Ok(())
}

/// [size][packed set]
fn encode_sized_set(res:&mut Vec<u32>, set:&VertexSet) {
    res.push(set.len() as u32);
    res.extend(set.pack());
}

impl ToWorker {

    /** encodes the message as [tag][payload] */
    pub fn encode(&self) -> Vec<u32> {
        match self {
            ToWorker::Job { best_size, working_set, partial_clique, best_clique } => {
                let mut res = vec![TAG_JOB, *best_size as u32];
                res.extend(working_set.pack());
                res.extend(partial_clique.pack());
                res.extend(best_clique.pack());
                res
            },
            ToWorker::Done { clique } => {
                let mut res = vec![TAG_DONE];
                encode_sized_set(&mut res, clique);
                res
            },
            ToWorker::Info => vec![TAG_INFO],
            ToWorker::Wait => vec![TAG_WAIT],
            ToWorker::Instruct => vec![TAG_INSTRUCT],
        }
    }

    /** decodes a packet. Sets are read with the given capacity. */
    pub fn decode(capacity:usize, packet:&[u32]) -> Result<Self> {
        let (tag, payload) = split_tag(packet)?;
        let words = VertexSet::pack_size(capacity);
        match tag {
            TAG_JOB => {
                check_payload(payload, 1 + 3*words)?;
                let at = |i:usize| &payload[1 + i*words .. 1 + (i+1)*words];
                Ok(ToWorker::Job {
                    best_size: payload[0] as usize,
                    working_set: VertexSet::from_packed(capacity, at(0))?,
                    partial_clique: VertexSet::from_packed(capacity, at(1))?,
                    best_clique: VertexSet::from_packed(capacity, at(2))?,
                })
            },
            TAG_DONE => {
                check_payload(payload, 1 + words)?;
                Ok(ToWorker::Done { clique: VertexSet::from_packed(capacity, &payload[1..])? })
            },
            TAG_INFO => Ok(ToWorker::Info),
            TAG_WAIT => Ok(ToWorker::Wait),
            TAG_INSTRUCT => Ok(ToWorker::Instruct),
            other => Err(CliqueError::UnknownTag(other)),
        }
    }
}

impl ToCoordinator {

    /** encodes the message as [tag][payload] */
    pub fn encode(&self) -> Vec<u32> {
        match self {
            ToCoordinator::Ready { clique } => {
                let mut res = vec![TAG_READY];
                encode_sized_set(&mut res, clique);
                res
            },
            ToCoordinator::Info => vec![TAG_WORKER_INFO],
            ToCoordinator::Waiting => vec![TAG_WAITING],
        }
    }

    /** decodes a packet. Sets are read with the given capacity. */
    pub fn decode(capacity:usize, packet:&[u32]) -> Result<Self> {
        let (tag, payload) = split_tag(packet)?;
        match tag {
            TAG_READY => {
                check_payload(payload, 1 + VertexSet::pack_size(capacity))?;
                Ok(ToCoordinator::Ready { clique: VertexSet::from_packed(capacity, &payload[1..])? })
            },
            TAG_WORKER_INFO => Ok(ToCoordinator::Info),
            TAG_WAITING => Ok(ToCoordinator::Waiting),
            other => Err(CliqueError::UnknownTag(other)),
        }
    }
}


/**
Coordinator side of the distributed search.

Plugged into the brancher as its SubtreeDispatch: subtrees rooted deeper
than the granularity are sent to an idle worker instead of being explored.
When no worker is idle, the coordinator blocks until one reports READY.
*/
#[derive(Debug)]
pub struct Coordinator {
    /// capacity of the graph (to decode packets)
    capacity: usize,
    /// subtrees rooted at depth > granularity are dispatched
    granularity: usize,
    /// one channel per worker
    to_workers: Vec<Sender<Vec<u32>>>,
    /// shared channel (worker id, packet)
    from_workers: Receiver<(usize, Vec<u32>)>,
    /// busy[w]: true iff worker w is working (or not ready yet)
    busy: Vec<bool>,
    /// number of busy workers
    nb_busy: usize,
    /// number of jobs sent
    nb_jobs: u64,
    /// set when the workers cannot be reached anymore (subtrees are then explored locally)
    failure: Option<CliqueError>,
}

impl Coordinator {

    /** creates a coordinator. Every worker is considered busy until its first READY. */
    pub fn new(
        capacity:usize,
        granularity:usize,
        to_workers:Vec<Sender<Vec<u32>>>,
        from_workers:Receiver<(usize, Vec<u32>)>,
    ) -> Self {
        let nb_workers = to_workers.len();
        Self {
            capacity,
            granularity,
            to_workers,
            from_workers,
            busy: vec![true ; nb_workers],
            nb_busy: nb_workers,
            nb_jobs: 0,
            failure: None,
        }
    }

    /// number of jobs sent to the workers
    pub fn nb_jobs(&self) -> u64 { self.nb_jobs }

    /// waits for a message of a worker and handles it
    fn receive(&mut self, best:&mut VertexSet) -> Result<()> {
        let (worker, packet) = self.from_workers.recv()
            .map_err(|_| CliqueError::WorkersDisconnected)?;
        match ToCoordinator::decode(self.capacity, &packet) {
            Ok(ToCoordinator::Ready { clique }) => {
                if clique.len() > best.len() {
                    debug!("worker {} improved the best clique: {}", worker, clique.len());
                    *best = clique;
                }
                if self.busy[worker] {
                    self.busy[worker] = false;
                    self.nb_busy -= 1;
                }
            },
            Ok(ToCoordinator::Info) => {},
            Ok(ToCoordinator::Waiting) => {
                warn!("unexpected waiting reply from worker {}, ignoring", worker);
            },
            Err(e) => warn!("invalid packet from worker {} ({}), ignoring", worker, e),
        }
        Ok(())
    }

    /// blocks until a worker is idle and returns it
    fn idle_worker(&mut self, best:&mut VertexSet) -> Result<usize> {
        loop {
            if let Some(w) = self.busy.iter().position(|b| !b) { return Ok(w); }
            self.receive(best)?;
        }
    }

    /**
    waits for every worker to be idle, then sends DONE with the final clique.
    */
    pub fn finish(&mut self, best:&mut VertexSet) -> Result<()> {
        if let Some(e) = self.failure.take() { return Err(e); }
        while self.nb_busy > 0 {
            self.receive(best)?;
        }
        let packet = ToWorker::Done { clique: best.clone() }.encode();
        for (w, channel) in self.to_workers.iter().enumerate() {
            if channel.send(packet.clone()).is_err() {
                warn!("worker {} left before the end of the search", w);
            }
        }
        info!("distributed search: {} jobs sent", self.nb_jobs);
        Ok(())
    }
}

impl SubtreeDispatch for Coordinator {
    fn dispatch(&mut self, depth:usize, set:&VertexSet, clique:&VertexSet, best:&mut VertexSet) -> bool {
        if depth <= self.granularity || self.failure.is_some() { return false; }
        let worker = match self.idle_worker(best) {
            Ok(w) => w,
            Err(e) => {
                warn!("{}: exploring the remaining subtrees locally", e);
                self.failure = Some(e);
                return false;
            }
        };
        let job = ToWorker::Job {
            best_size: best.len(),
            working_set: set.clone(),
            partial_clique: clique.clone(),
            best_clique: best.clone(),
        };
        if self.to_workers[worker].send(job.encode()).is_err() {
            warn!("worker {} unreachable: exploring the remaining subtrees locally", worker);
            self.failure = Some(CliqueError::WorkerFailed(worker));
            return false;
        }
        self.busy[worker] = true;
        self.nb_busy += 1;
        self.nb_jobs += 1;
        true
    }
}


/**
worker loop: announces itself READY, then explores every job it receives
with its own brancher, replying READY with its best clique after each job.
Returns the final clique sent with DONE.
*/
fn run_worker(
    id:usize,
    mut g:Graph,
    config:SearchConfig,
    inbox:Receiver<Vec<u32>>,
    outbox:Sender<(usize, Vec<u32>)>,
) -> Result<VertexSet> {
    let mut brancher = config.brancher(&g);
    let mut best = VertexSet::new(&g);
    let send = |best:&VertexSet| {
        outbox.send((id, ToCoordinator::Ready { clique: best.clone() }.encode()))
            .map_err(|_| CliqueError::CoordinatorDisconnected)
    };
    send(&best)?;
    loop {
        let packet = inbox.recv().map_err(|_| CliqueError::CoordinatorDisconnected)?;
        match ToWorker::decode(g.capacity(), &packet) {
            Ok(ToWorker::Job { best_size, working_set, partial_clique, best_clique }) => {
                if best_size > best.len() { best = best_clique; }
                brancher.search_from(&mut g, working_set, &mut best, &partial_clique, &mut LocalSearch);
                send(&best)?;
            },
            Ok(ToWorker::Done { clique }) => {
                debug!("worker {} done ({} nodes)", id, brancher.statistics().nb_nodes);
                return Ok(clique);
            },
            Ok(ToWorker::Info) | Ok(ToWorker::Wait) => {},
            Ok(ToWorker::Instruct) => warn!("worker {}: unexpected instructions, ignoring", id),
            Err(e) => warn!("worker {}: invalid packet ({}), ignoring", id, e),
        }
    }
}

/**
searches a maximum clique of g with config.workers worker threads. The
calling thread acts as the coordinator: it explores the search tree down to
config.granularity and ships the deeper subtrees to the workers.
best is used as the initial incumbent and receives the result.
Returns the size of the maximum clique.
*/
pub fn distributed_search(g:&mut Graph, config:&SearchConfig, best:&mut VertexSet) -> Result<usize> {
    let (to_coordinator, from_workers) = unbounded();
    let mut to_workers = Vec::with_capacity(config.workers);
    let mut handles = Vec::with_capacity(config.workers);
    for id in 0..config.workers {
        let (tx, rx) = unbounded();
        to_workers.push(tx);
        let graph = g.clone();
        let worker_config = config.clone();
        let outbox = to_coordinator.clone();
        let handle = thread::Builder::new()
            .name(format!("clique-worker-{}", id))
            .spawn(move || run_worker(id, graph, worker_config, rx, outbox))
            .map_err(|e| {
                warn!("unable to start worker {}: {}", id, e);
                CliqueError::WorkerFailed(id)
            })?;
        handles.push(handle);
    }
    drop(to_coordinator);
    info!("distributed search: {} workers, granularity {}", config.workers, config.granularity);
    let mut coordinator = Coordinator::new(g.capacity(), config.granularity, to_workers, from_workers);
    let mut brancher = config.brancher(g);
    let set = VertexSet::full(g);
    let clique = VertexSet::new(g);
    brancher.search_from(g, set, best, &clique, &mut coordinator);
    let finished = coordinator.finish(best);
    drop(coordinator);
    for (id, handle) in handles.into_iter().enumerate() {
        match handle.join() {
            Ok(Ok(_)) => {},
            Ok(Err(e)) => warn!("worker {} stopped: {}", id, e),
            Err(_) => return Err(CliqueError::WorkerFailed(id)),
        }
    }
    finished?;
    Ok(best.len())
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::{brute_force_clique_size, random_graph};

    #[test]
    fn test_job_packet_layout() {
        let g = Graph::new(40);
        let job = ToWorker::Job {
            best_size: 3,
            working_set: VertexSet::from_vertices(&g, vec![0, 39]),
            partial_clique: VertexSet::from_vertices(&g, vec![1]),
            best_clique: VertexSet::from_vertices(&g, vec![2, 3, 4]),
        };
        let packet = job.encode();
        assert_eq!(packet.len(), 2 + 3*2);
        assert_eq!(packet[0], TAG_JOB);
        assert_eq!(packet[1], 3);
        assert_eq!(packet[2], 0x8000_0000);
        assert_eq!(packet[3], 0x0100_0000);
        assert_eq!(ToWorker::decode(40, &packet).unwrap(), job);
    }

    #[test]
    fn test_ready_and_done_packets() {
        let g = Graph::new(10);
        let clique = VertexSet::from_vertices(&g, vec![1, 5]);
        let ready = ToCoordinator::Ready { clique: clique.clone() };
        let packet = ready.encode();
        assert_eq!(&packet[..2], &[TAG_READY, 2]);
        assert_eq!(ToCoordinator::decode(10, &packet).unwrap(), ready);
        let done = ToWorker::Done { clique };
        assert_eq!(ToWorker::decode(10, &done.encode()).unwrap(), done);
        assert_eq!(ToWorker::decode(10, &[TAG_WAIT]).unwrap(), ToWorker::Wait);
        assert_eq!(ToCoordinator::decode(10, &[TAG_WAITING]).unwrap(), ToCoordinator::Waiting);
    }

    #[test]
    fn test_invalid_packets() {
        assert!(matches!(ToWorker::decode(10, &[]), Err(CliqueError::PacketTooShort { .. })));
        assert!(matches!(ToWorker::decode(10, &[42]), Err(CliqueError::UnknownTag(42))));
        assert!(matches!(ToWorker::decode(64, &[TAG_JOB, 1, 0]), Err(CliqueError::PacketTooShort { .. })));
        assert!(matches!(ToCoordinator::decode(10, &[TAG_READY]), Err(CliqueError::PacketTooShort { .. })));
    }

    #[test]
    fn test_coordinator_ignores_unknown_tags() {
        let g = Graph::new(4);
        let (to_coordinator, from_workers) = unbounded();
        let (tx, rx) = unbounded();
        let mut coordinator = Coordinator::new(4, 0, vec![tx], from_workers);
        to_coordinator.send((0, vec![99])).unwrap();
        to_coordinator.send((0, vec![TAG_WAITING])).unwrap();
        let clique = VertexSet::from_vertices(&g, vec![2]);
        to_coordinator.send((0, ToCoordinator::Ready { clique }.encode())).unwrap();
        let mut best = VertexSet::new(&g);
        let set = VertexSet::full(&g);
        assert!(coordinator.dispatch(1, &set, &VertexSet::new(&g), &mut best));
        assert_eq!(best.len(), 1);
        assert_eq!(coordinator.nb_jobs(), 1);
        let packet = rx.recv().unwrap();
        assert!(matches!(ToWorker::decode(4, &packet), Ok(ToWorker::Job { best_size: 1, .. })));
    }

    #[test]
    fn test_matches_sequential_search() {
        for seed in 0..4 {
            let mut g = random_graph(30, 0.5, seed);
            let omega = {
                let mut h = g.clone();
                let mut best = VertexSet::new(&h);
                SearchConfig::default().brancher(&h).search(&mut h, &mut best)
            };
            let mut config = SearchConfig::default();
            config.workers = 2;
            config.granularity = 1;
            let mut best = VertexSet::new(&g);
            assert_eq!(distributed_search(&mut g, &config, &mut best).unwrap(), omega);
            assert!(best.is_clique(&g));
        }
        let mut g = random_graph(12, 0.6, 9);
        let omega = brute_force_clique_size(&g);
        let mut config = SearchConfig::default();
        config.workers = 3;
        config.granularity = 0;
        let mut best = VertexSet::new(&g);
        assert_eq!(distributed_search(&mut g, &config, &mut best).unwrap(), omega);
    }
}
