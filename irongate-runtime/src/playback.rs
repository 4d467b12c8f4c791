//! Tick-driven playback
//!
//! Advances a [`PlaybackClock`] once per tick and publishes one pose per
//! tick until the timeline ends. Each frame is delivered before the next
//! tick is awaited.

use core::future::Future;

use embassy_futures::select::{select, Either};
use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::signal::Signal;

use irongate_core::scheduler::{PlaybackClock, PlaybackFrame, PlaybackPhase, Timeline};

/// Wall-clock tick interval in milliseconds
pub const TICK_INTERVAL_MS: u64 = 100;

/// Source of playback ticks
pub trait TickSource {
    /// Wait for the next tick
    fn next(&mut self) -> impl Future<Output = ()>;
}

#[cfg(feature = "time")]
impl TickSource for embassy_time::Ticker {
    fn next(&mut self) -> impl Future<Output = ()> {
        embassy_time::Ticker::next(self)
    }
}

/// Ticker firing every [`TICK_INTERVAL_MS`]
#[cfg(feature = "time")]
pub fn playback_ticker() -> embassy_time::Ticker {
    embassy_time::Ticker::every(embassy_time::Duration::from_millis(TICK_INTERVAL_MS))
}

/// Receiver of playback frames
pub trait PoseSink {
    fn publish(&mut self, frame: PlaybackFrame);
}

impl<M: RawMutex> PoseSink for &Signal<M, PlaybackFrame> {
    fn publish(&mut self, frame: PlaybackFrame) {
        self.signal(frame);
    }
}

/// How a playback run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PlaybackOutcome {
    /// Reached the end of the timeline
    Finished { frames: u32 },
    /// Stop requested; the clock was rewound
    Stopped { frames: u32 },
    /// Nothing to play
    Empty,
}

/// Play a timeline to the end
///
/// An idle or finished clock starts over from t = 0; a paused clock
/// resumes where it was. Dropping the future stops producing ticks.
pub async fn run_playback<T, P>(timeline: &Timeline, clock: &mut PlaybackClock, ticks: &mut T, sink: &mut P) -> PlaybackOutcome
where
    T: TickSource,
    P: PoseSink,
{
    if !begin(timeline, clock) {
        return PlaybackOutcome::Empty;
    }

    let mut frames = 0;
    loop {
        ticks.next().await;
        if let Some(outcome) = step(timeline, clock, sink, &mut frames) {
            return outcome;
        }
    }
}

/// Play a timeline until it ends or `stop` is signaled
///
/// On stop the clock is rewound to t = 0 and no further frame is published.
pub async fn run_playback_until<T, P, M>(
    timeline: &Timeline,
    clock: &mut PlaybackClock,
    ticks: &mut T,
    sink: &mut P,
    stop: &Signal<M, ()>,
) -> PlaybackOutcome
where
    T: TickSource,
    P: PoseSink,
    M: RawMutex,
{
    if !begin(timeline, clock) {
        return PlaybackOutcome::Empty;
    }

    let mut frames = 0;
    loop {
        match select(stop.wait(), ticks.next()).await {
            Either::First(()) => {
                clock.stop();
                info!("Playback stopped after {} frames", frames);
                return PlaybackOutcome::Stopped { frames };
            }
            Either::Second(()) => {
                if let Some(outcome) = step(timeline, clock, sink, &mut frames) {
                    return outcome;
                }
            }
        }
    }
}

/// Put the clock into the playing phase
fn begin(timeline: &Timeline, clock: &mut PlaybackClock) -> bool {
    match clock.phase() {
        PlaybackPhase::Playing => {}
        PlaybackPhase::Paused => clock.resume(),
        PlaybackPhase::Idle | PlaybackPhase::Finished => {
            if !clock.start(timeline) {
                warn!("No movements to play");
                return false;
            }
        }
    }
    info!(
        "Playback started: {} movements, {} s at {}x",
        timeline.len(),
        timeline.total_duration(),
        clock.speed()
    );
    true
}

/// Advance one tick and publish its frame
///
/// Returns the outcome once playback is over.
fn step<P: PoseSink>(timeline: &Timeline, clock: &mut PlaybackClock, sink: &mut P, frames: &mut u32) -> Option<PlaybackOutcome> {
    let Some(frame) = clock.tick(timeline) else {
        return Some(PlaybackOutcome::Finished { frames: *frames });
    };

    sink.publish(frame);
    *frames += 1;

    if frame.finished {
        info!("Playback finished at {} s after {} frames", frame.time_s, *frames);
        return Some(PlaybackOutcome::Finished { frames: *frames });
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_futures::block_on;
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;
    use irongate_core::graph::{Edge, EdgeId, Graph, Node, NodeId};
    use irongate_core::motion::{ActionCategory, Pose};
    use irongate_core::scheduler::{simulate, PlaybackConfig, SimulationConfig};
    use std::vec::Vec;

    /// Counts ticks; every tick is immediately due
    #[derive(Default)]
    struct ManualTicks {
        count: u32,
    }

    impl TickSource for ManualTicks {
        async fn next(&mut self) {
            self.count += 1;
        }
    }

    /// Raises `stop` on the given tick
    struct StopAfter<'a> {
        count: u32,
        limit: u32,
        stop: &'a Signal<NoopRawMutex, ()>,
    }

    impl TickSource for StopAfter<'_> {
        async fn next(&mut self) {
            self.count += 1;
            if self.count == self.limit {
                self.stop.signal(());
            }
        }
    }

    #[derive(Default)]
    struct Recorder(Vec<PlaybackFrame>);

    impl PoseSink for Recorder {
        fn publish(&mut self, frame: PlaybackFrame) {
            self.0.push(frame);
        }
    }

    fn id(s: &str) -> NodeId {
        NodeId::new(s).unwrap()
    }

    /// A: move(100) -> B: turn(90) from the origin, 1.5 s total
    fn timeline() -> Timeline {
        let mut graph = Graph::new();
        graph.add_node(Node::new(id("A"), ActionCategory::Move, 100.0)).unwrap();
        graph.add_node(Node::new(id("B"), ActionCategory::Turn, 90.0)).unwrap();
        graph
            .add_edge(Edge::new(EdgeId::new("conn-1").unwrap(), id("A"), id("B")))
            .unwrap();
        simulate(&graph, &SimulationConfig::starting_at(Pose::ORIGIN))
    }

    fn half_second_clock() -> PlaybackClock {
        PlaybackClock::new(PlaybackConfig {
            tick_s: 0.5,
            speed: 1.0,
        })
    }

    #[test]
    fn test_plays_to_the_end() {
        let timeline = timeline();
        let mut clock = half_second_clock();
        let mut ticks = ManualTicks::default();
        let mut sink = Recorder::default();

        let outcome = block_on(run_playback(&timeline, &mut clock, &mut ticks, &mut sink));

        assert_eq!(outcome, PlaybackOutcome::Finished { frames: 3 });
        assert_eq!(ticks.count, 3);
        let times: Vec<f64> = sink.0.iter().map(|f| f.time_s).collect();
        assert_eq!(times, vec![0.5, 1.0, 1.5]);
        assert_eq!(sink.0[0].pose, Pose::new(100.0, 0.0, 0.0));
        assert_eq!(sink.0[1].pose, Pose::new(100.0, 0.0, 45.0));
        assert_eq!(sink.0[2].pose, Pose::new(100.0, 0.0, 90.0));
        assert_eq!(clock.phase(), PlaybackPhase::Finished);
    }

    #[test]
    fn test_one_frame_per_tick_and_single_finish() {
        let timeline = timeline();
        let mut clock = PlaybackClock::default();
        let mut ticks = ManualTicks::default();
        let mut sink = Recorder::default();

        let outcome = block_on(run_playback(&timeline, &mut clock, &mut ticks, &mut sink));

        let PlaybackOutcome::Finished { frames } = outcome else {
            panic!("unexpected outcome {:?}", outcome);
        };
        assert_eq!(frames as usize, sink.0.len());
        assert_eq!(ticks.count, frames);
        assert_eq!(sink.0.iter().filter(|f| f.finished).count(), 1);
        assert!(sink.0.last().unwrap().finished);
        assert_eq!(sink.0.last().unwrap().time_s, 1.5);
        assert!(sink.0.windows(2).all(|w| w[0].time_s < w[1].time_s));
    }

    #[test]
    fn test_empty_timeline() {
        let timeline = Timeline::new(Pose::HOME);
        let mut clock = PlaybackClock::default();
        let mut ticks = ManualTicks::default();
        let mut sink = Recorder::default();

        let outcome = block_on(run_playback(&timeline, &mut clock, &mut ticks, &mut sink));

        assert_eq!(outcome, PlaybackOutcome::Empty);
        assert_eq!(ticks.count, 0);
        assert!(sink.0.is_empty());
    }

    #[test]
    fn test_signal_sink_holds_latest_frame() {
        let timeline = timeline();
        let signal: Signal<NoopRawMutex, PlaybackFrame> = Signal::new();
        let mut clock = half_second_clock();
        let mut ticks = ManualTicks::default();
        let mut sink = &signal;

        block_on(run_playback(&timeline, &mut clock, &mut ticks, &mut sink));

        let last = signal.try_take().unwrap();
        assert!(last.finished);
        assert_eq!(last.pose, Pose::new(100.0, 0.0, 90.0));
        assert!(signal.try_take().is_none());
    }

    #[test]
    fn test_paused_clock_resumes() {
        let timeline = timeline();
        let mut clock = half_second_clock();
        clock.start(&timeline);
        clock.tick(&timeline);
        clock.pause();

        let mut ticks = ManualTicks::default();
        let mut sink = Recorder::default();
        let outcome = block_on(run_playback(&timeline, &mut clock, &mut ticks, &mut sink));

        assert_eq!(outcome, PlaybackOutcome::Finished { frames: 2 });
        assert_eq!(sink.0[0].time_s, 1.0);
    }

    #[test]
    fn test_finished_clock_restarts() {
        let timeline = timeline();
        let mut clock = half_second_clock();
        let mut sink = Recorder::default();

        block_on(run_playback(&timeline, &mut clock, &mut ManualTicks::default(), &mut sink));
        let outcome = block_on(run_playback(&timeline, &mut clock, &mut ManualTicks::default(), &mut sink));

        assert_eq!(outcome, PlaybackOutcome::Finished { frames: 3 });
        assert_eq!(sink.0.len(), 6);
        assert_eq!(sink.0[3].time_s, 0.5);
    }

    #[test]
    fn test_stop_before_first_tick() {
        let timeline = timeline();
        let stop: Signal<NoopRawMutex, ()> = Signal::new();
        stop.signal(());

        let mut clock = half_second_clock();
        let mut ticks = ManualTicks::default();
        let mut sink = Recorder::default();
        let outcome = block_on(run_playback_until(&timeline, &mut clock, &mut ticks, &mut sink, &stop));

        assert_eq!(outcome, PlaybackOutcome::Stopped { frames: 0 });
        assert!(sink.0.is_empty());
        assert_eq!(clock.phase(), PlaybackPhase::Idle);
    }

    #[test]
    fn test_stop_mid_run_rewinds() {
        let timeline = timeline();
        let stop: Signal<NoopRawMutex, ()> = Signal::new();
        let mut clock = PlaybackClock::default();
        let mut ticks = StopAfter {
            count: 0,
            limit: 3,
            stop: &stop,
        };
        let mut sink = Recorder::default();

        let outcome = block_on(run_playback_until(&timeline, &mut clock, &mut ticks, &mut sink, &stop));

        assert_eq!(outcome, PlaybackOutcome::Stopped { frames: 3 });
        assert_eq!(sink.0.len(), 3);
        assert_eq!(clock.phase(), PlaybackPhase::Idle);
        assert_eq!(clock.time_s(), 0.0);
        assert_eq!(clock.pose(&timeline), Pose::ORIGIN);
    }

    #[test]
    fn test_unstopped_run_finishes() {
        let timeline = timeline();
        let stop: Signal<NoopRawMutex, ()> = Signal::new();
        let mut clock = half_second_clock();
        let mut ticks = ManualTicks::default();
        let mut sink = Recorder::default();

        let outcome = block_on(run_playback_until(&timeline, &mut clock, &mut ticks, &mut sink, &stop));
        assert_eq!(outcome, PlaybackOutcome::Finished { frames: 3 });
    }
}
