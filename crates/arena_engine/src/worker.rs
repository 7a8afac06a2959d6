use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender, TryRecvError, unbounded};

use crate::config::PhysicsConfig;
use crate::error::{ArenaError, Result};
use crate::physics::Simulator;
use crate::scene::Arena;
use crate::snapshot::{BodySnapshot, StateMessage, WorkerMessage};

const WORKER_NAME: &str = "physics-worker";

/// Outcome of draining the worker's state channel.
#[derive(Debug, Clone, PartialEq)]
pub enum Drain
{
    /// Newest message received, if any arrived since the last drain.
    Latest(Option<StateMessage>),
    /// The worker is gone; carries whatever arrived before it stopped.
    Disconnected(Option<StateMessage>),
}

/// Simulator running on its own thread. Requests and state flow through two FIFO channels.
pub struct SimulationWorker
{
    requests: Option<Sender<WorkerMessage>>,
    states: Receiver<StateMessage>,
    handle: Option<JoinHandle<()>>,
}

impl SimulationWorker
{
    pub fn spawn(config: PhysicsConfig) -> Result<Self>
    {
        let (request_tx, request_rx) = unbounded::<WorkerMessage>();
        let (state_tx, state_rx) = unbounded::<StateMessage>();

        let handle = thread::Builder::new()
            .name(WORKER_NAME.to_string())
            .spawn(move || run(config, request_rx, state_tx))
            .map_err(|e| ArenaError::WorkerSpawn(e.to_string()))?;

        log::info!("Spawned {} thread", WORKER_NAME);
        Ok(Self { requests: Some(request_tx), states: state_rx, handle: Some(handle) })
    }

    /// Queues a request. Returns `false` once the worker has stopped.
    pub fn send(&self, message: WorkerMessage) -> bool
    {
        match &self.requests
        {
            Some(requests) => requests.send(message).is_ok(),
            None => false,
        }
    }

    /// Empties the state channel without blocking and keeps only the last message.
    pub fn drain(&self) -> Drain
    {
        let mut latest = None;
        loop
        {
            match self.states.try_recv()
            {
                Ok(message) => latest = Some(message),
                Err(TryRecvError::Empty) => return Drain::Latest(latest),
                Err(TryRecvError::Disconnected) => return Drain::Disconnected(latest),
            }
        }
    }

    /// Closes the request channel and waits for the thread to finish. States published before
    /// the stop can still be drained.
    pub fn stop(&mut self)
    {
        self.requests.take();
        if let Some(handle) = self.handle.take()
        {
            if handle.join().is_err()
            {
                log::warn!("{} panicked", WORKER_NAME);
            }
        }
    }

    /// Blocks until the next state message arrives.
    pub fn recv(&self) -> Option<StateMessage>
    {
        self.states.recv().ok()
    }
}

impl Drop for SimulationWorker
{
    fn drop(&mut self)
    {
        self.stop();
    }
}

fn run(config: PhysicsConfig, requests: Receiver<WorkerMessage>, states: Sender<StateMessage>)
{
    let mut simulator = Simulator::new(Vec::new(), Arena::default(), config);
    let mut epoch = 0;
    let mut sequence = 0;

    for message in requests.iter()
    {
        match message
        {
            WorkerMessage::Init(snapshot) =>
            {
                simulator.load(snapshot.to_spheres(), snapshot.arena());
            }
            WorkerMessage::Reset(snapshot) =>
            {
                epoch += 1;
                sequence = 0;
                simulator.load(snapshot.to_spheres(), snapshot.arena());
            }
            WorkerMessage::Step { dt, input } =>
            {
                if !simulator.advance(dt, &input)
                {
                    continue;
                }
            }
        }

        sequence += 1;
        let state = StateMessage
        {
            epoch,
            sequence,
            bodies: simulator.spheres().iter().map(BodySnapshot::from).collect(),
        };

        if states.send(state).is_err()
        {
            break;
        }
    }

    log::info!("{} stopped", WORKER_NAME);
}
