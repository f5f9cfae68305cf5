use crate::buffer::SampleBuffer;
use crate::config::DriverConfig;
use crate::constants::{COMMAND_QUEUE, MARKER_QUEUE};
use crate::error::Result;
use crate::line::{LineAssembler, LineParser, ParsedEvent};
use crate::snapshot::RadarSnapshot;
use crate::sweep::SweepTracker;
use crate::transport::Transport;
use crossbeam_channel::{bounded, Receiver, Sender, TryRecvError, TrySendError};
use radar_data::{ScanStats, Snapshot, StatusMarker};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

/// Requests accepted by a running acquisition loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Close the transport and end the loop
    Stop,
    /// Forget every stored distance. The sweep angle is kept.
    Clear,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    Idle,
    Running,
    /// Terminal
    Stopped,
}

/// Receiving ends handed to the renderer.
pub struct RadarFeed {
    /// Latest views of the radar. When the renderer falls behind, older
    /// snapshots are discarded in favour of newer ones.
    pub snapshots: Receiver<Snapshot>,
    pub markers: Receiver<StatusMarker>,
}

#[derive(Debug, Default)]
struct Counters {
    total_received: u64,
    dropped_lines: u64,
    read_errors: u64,
    last_sample_at: Option<Duration>,
}

impl Counters {
    fn stats(&self, now: Duration) -> ScanStats {
        ScanStats {
            total_received: self.total_received,
            since_last_sample: self.last_sample_at.map(|t| now.saturating_sub(t)),
            dropped_lines: self.dropped_lines,
            read_errors: self.read_errors,
        }
    }
}

/// Sole owner and writer of the sample buffer and sweep state.
///
/// Each [`step`](AcquisitionLoop::step) handles pending commands, polls the
/// transport once, applies every complete line and publishes a snapshot when
/// a sample arrived or the render interval elapsed. [`run`](AcquisitionLoop::run)
/// repeats this until stopped; callers that want their own scheduling can
/// drive `step` directly.
pub struct AcquisitionLoop {
    transport: Option<Box<dyn Transport>>,
    state: LoopState,
    assembler: LineAssembler,
    parser: LineParser,
    buffer: SampleBuffer,
    sweep: SweepTracker,
    counters: Counters,
    render_interval: Duration,
    read_timeout: Duration,
    last_render: Option<Duration>,
    command_rx: Receiver<Command>,
    snapshot_tx: Sender<Snapshot>,
    // Lets the loop evict the oldest queued snapshot when the queue is full
    snapshot_drain: Receiver<Snapshot>,
    marker_tx: Sender<StatusMarker>,
}

impl AcquisitionLoop {
    pub fn new(
        transport: Box<dyn Transport>,
        config: &DriverConfig,
    ) -> Result<(AcquisitionLoop, Sender<Command>, RadarFeed)> {
        config.validate()?;
        let (command_tx, command_rx) = bounded(COMMAND_QUEUE);
        let (snapshot_tx, snapshot_rx) = bounded(config.snapshot_queue);
        let (marker_tx, marker_rx) = bounded(MARKER_QUEUE);

        let acquisition = AcquisitionLoop {
            transport: Some(transport),
            state: LoopState::Idle,
            assembler: LineAssembler::new(),
            parser: LineParser::new(config.max_distance),
            buffer: SampleBuffer::new(config.fade_time(), config.max_distance),
            sweep: SweepTracker::new(),
            counters: Counters::default(),
            render_interval: config.render_interval(),
            read_timeout: config.read_timeout(),
            last_render: None,
            command_rx,
            snapshot_tx,
            snapshot_drain: snapshot_rx.clone(),
            marker_tx,
        };
        let feed = RadarFeed {
            snapshots: snapshot_rx,
            markers: marker_rx,
        };
        Ok((acquisition, command_tx, feed))
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn stats(&self, now: Duration) -> ScanStats {
        self.counters.stats(now)
    }

    /// Runs one iteration with `now` measured from the start of acquisition.
    pub fn step(&mut self, now: Duration) -> LoopState {
        self.step_with(|| now)
    }

    /// Reads `clock` once before the transport poll and once after, so samples
    /// are stamped with the time the read completed.
    fn step_with(&mut self, clock: impl Fn() -> Duration) -> LoopState {
        match self.state {
            LoopState::Stopped => return LoopState::Stopped,
            LoopState::Idle => {
                log::info!("Waiting for radar data");
                self.state = LoopState::Running;
            }
            LoopState::Running => {}
        }

        if !self.process_commands(clock()) {
            self.shutdown();
            return self.state;
        }

        self.poll_transport();
        let now = clock();
        while let Some(line) = self.assembler.next_line() {
            self.handle_line(&line, now);
        }
        self.counters.dropped_lines += self.assembler.take_overflowed();

        if self.is_render_due(now) {
            self.render(now);
        }
        self.state
    }

    /// Steps with a monotonic clock until a stop request arrives.
    pub fn run(mut self) -> ScanStats {
        let started = Instant::now();
        while self.step_with(|| started.elapsed()) != LoopState::Stopped {}
        self.stats(started.elapsed())
    }

    /// Returns `false` once the loop should stop.
    fn process_commands(&mut self, now: Duration) -> bool {
        loop {
            match self.command_rx.try_recv() {
                Ok(Command::Clear) => {
                    self.buffer.clear();
                    log::info!("Cleared sample buffer");
                    self.render(now);
                }
                Ok(Command::Stop) => return false,
                Err(TryRecvError::Empty) => return true,
                Err(TryRecvError::Disconnected) => {
                    log::info!("Command channel closed");
                    return false;
                }
            }
        }
    }

    fn poll_transport(&mut self) {
        let Some(transport) = self.transport.as_mut() else {
            return;
        };
        let started = Instant::now();
        match transport.read_available() {
            Ok(Some(data)) => self.assembler.extend(&data),
            Ok(None) => {
                // An empty read that returned early still takes a full timeout
                std::thread::sleep(self.read_timeout.saturating_sub(started.elapsed()));
            }
            Err(e) => {
                self.counters.read_errors += 1;
                log::warn!("Failed to read from transport: {}", e);
                // Failing reads return immediately, so pace them like a timed out read
                std::thread::sleep(self.read_timeout);
            }
        }
    }

    fn handle_line(&mut self, line: &str, now: Duration) {
        match self.parser.parse(line) {
            ParsedEvent::Sample { angle, distance } => {
                self.buffer.update(angle, distance, now);
                self.sweep.record(angle);
                self.counters.total_received += 1;
                self.counters.last_sample_at = Some(now);
                log::debug!("Angle: {}°, distance: {}", angle.degrees(), distance);
                // New data skips the render interval
                self.render(now);
            }
            ParsedEvent::StatusMarker(marker) => {
                log::info!("Device reported {:?}", marker);
                if self.marker_tx.try_send(marker).is_err() {
                    log::trace!("Marker queue unavailable, dropping {:?}", marker);
                }
            }
            ParsedEvent::Ignored => {
                if !line.is_empty() {
                    self.counters.dropped_lines += 1;
                    log::trace!("Ignoring line {:?}", line);
                }
            }
        }
    }

    fn is_render_due(&self, now: Duration) -> bool {
        match self.last_render {
            Some(t) => now.saturating_sub(t) >= self.render_interval,
            None => true,
        }
    }

    fn render(&mut self, now: Duration) {
        let stats = self.counters.stats(now);
        let snapshot = Snapshot::build(&mut self.buffer, &self.sweep, now, stats);
        self.publish(snapshot);
        self.last_render = Some(now);
    }

    fn publish(&mut self, snapshot: Snapshot) {
        match self.snapshot_tx.try_send(snapshot) {
            Ok(()) => {}
            Err(TrySendError::Full(snapshot)) => {
                let _ = self.snapshot_drain.try_recv();
                if self.snapshot_tx.try_send(snapshot).is_err() {
                    log::trace!("Snapshot queue still full, dropping snapshot");
                }
            }
            Err(TrySendError::Disconnected(_)) => {}
        }
    }

    fn shutdown(&mut self) {
        self.release_transport();
        self.state = LoopState::Stopped;
        log::info!(
            "Acquisition stopped. Samples received: {}",
            self.counters.total_received
        );
    }

    fn release_transport(&mut self) {
        if let Some(mut transport) = self.transport.take() {
            if let Err(e) = transport.close() {
                log::error!("Failed to close transport: {}", e);
            }
        }
    }
}

impl Drop for AcquisitionLoop {
    fn drop(&mut self) {
        self.release_transport();
    }
}

/// Handle to the acquisition thread.
pub struct DriverThread {
    pub(crate) command_tx: Sender<Command>,
    pub(crate) acquisition_thread: Option<JoinHandle<ScanStats>>,
}

impl DriverThread {
    pub fn send(&self, command: Command) {
        if self.command_tx.send(command).is_err() {
            log::debug!("Acquisition loop already finished, dropping {:?}", command);
        }
    }

    pub fn clear(&self) {
        self.send(Command::Clear);
    }

    /// Stops acquisition and waits for the thread. Returns the final statistics.
    pub fn stop(mut self) -> Option<ScanStats> {
        join(&mut self)
    }
}

/// Function to stop and join the acquisition thread.
/// This function is automatically called when `driver_thread` is dropped.
pub fn join(driver_thread: &mut DriverThread) -> Option<ScanStats> {
    let thread = driver_thread.acquisition_thread.take()?;
    driver_thread.send(Command::Stop);
    match thread.join() {
        Ok(stats) => Some(stats),
        Err(_) => {
            log::error!("Acquisition thread panicked");
            None
        }
    }
}

impl Drop for DriverThread {
    fn drop(&mut self) {
        join(self);
    }
}
