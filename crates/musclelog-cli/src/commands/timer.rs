use clap::Subcommand;
use musclelog_core::{Config, Event, IntervalScheduler, TickScheduler, TimeTracker, TimerKind};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::UnboundedReceiver;

/// Ticks between two progress lines (one second).
const PROGRESS_EVERY: u64 = 100;

const HELP_LINE: &str = "commands: p pause/resume, r reset, <minutes> preset, q quit";

#[derive(Subcommand)]
pub enum TimerAction {
    /// Run the stopwatch. Reads commands from stdin while it runs
    Stopwatch {
        /// Stop after this many seconds (default: run until `q` or end of input)
        #[arg(long)]
        seconds: Option<u64>,
        /// Only print events, no progress lines
        #[arg(long)]
        quiet: bool,
    },
    /// Run the countdown. Reads commands from stdin while it runs
    Countdown {
        /// Preset in minutes (must be one of `timer.countdown_presets_min`)
        #[arg(long, conflicts_with = "seconds")]
        preset: Option<u64>,
        /// Custom duration in seconds
        #[arg(long)]
        seconds: Option<u64>,
        #[arg(long)]
        quiet: bool,
    },
    /// List the configured countdown presets
    Presets,
}

/// A line typed while a timer runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Input {
    Toggle,
    Reset,
    Preset(u64),
    Quit,
}

fn parse_input(line: &str) -> Option<Input> {
    match line.trim().to_ascii_lowercase().as_str() {
        "p" | "pause" | "play" => Some(Input::Toggle),
        "r" | "reset" => Some(Input::Reset),
        "q" | "quit" => Some(Input::Quit),
        other => other.parse().ok().map(Input::Preset),
    }
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let presets = config.timer.countdown_presets_min.clone();

    let (kind, countdown_ms, stop_at_ms, quiet) = match action {
        TimerAction::Presets => {
            for minutes in &presets {
                println!("{minutes} min");
            }
            return Ok(());
        }
        TimerAction::Stopwatch { seconds, quiet } => (
            TimerKind::Stopwatch,
            config.default_countdown_ms(),
            seconds.map(|s| s.saturating_mul(1000)),
            quiet,
        ),
        TimerAction::Countdown {
            preset,
            seconds,
            quiet,
        } => {
            let duration_ms = match (preset, seconds) {
                (Some(minutes), _) => {
                    if !presets.contains(&minutes) {
                        return Err(
                            format!("no {minutes} minute preset (available: {presets:?})").into(),
                        );
                    }
                    musclelog_core::timer::minutes_to_ms(minutes)
                }
                (None, Some(secs)) => secs.saturating_mul(1000),
                (None, None) => config.default_countdown_ms(),
            };
            (TimerKind::Countdown, duration_ms, None, quiet)
        }
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;
    let result = runtime.block_on(async {
        let (scheduler, ticks) = IntervalScheduler::new();
        let tracker = TimeTracker::new(scheduler, countdown_ms);
        drive(tracker, ticks, kind, &presets, stop_at_ms, quiet).await
    });
    // A blocked stdin read cannot be cancelled; don't wait for it.
    runtime.shutdown_background();
    result
}

fn print_event(event: &Event) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string(event)?);
    Ok(())
}

/// Apply one typed command to the timer shown in this session.
fn apply<S: TickScheduler>(
    tracker: &mut TimeTracker<S>,
    kind: TimerKind,
    input: Input,
    presets: &[u64],
) -> Option<Event> {
    match (kind, input) {
        (TimerKind::Stopwatch, Input::Toggle) => tracker.toggle_stopwatch(),
        (TimerKind::Stopwatch, Input::Reset) => tracker.reset_stopwatch(),
        (TimerKind::Countdown, Input::Toggle) => tracker.toggle_countdown(),
        (TimerKind::Countdown, Input::Reset) => tracker.reset_countdown(),
        (TimerKind::Countdown, Input::Preset(minutes)) if presets.contains(&minutes) => {
            tracker.select_preset(minutes)
        }
        (TimerKind::Countdown, Input::Preset(minutes)) => {
            eprintln!("no {minutes} minute preset (available: {presets:?})");
            None
        }
        (TimerKind::Stopwatch, Input::Preset(_)) => {
            eprintln!("presets only apply to the countdown");
            None
        }
        (_, Input::Quit) => None,
    }
}

/// Whether the session is over without an explicit `q`.
fn should_stop<S: TickScheduler>(
    tracker: &TimeTracker<S>,
    kind: TimerKind,
    stop_at_ms: Option<u64>,
    input_open: bool,
) -> bool {
    let running = tracker.is_running(kind);
    match kind {
        TimerKind::Stopwatch => {
            let reached = stop_at_ms.is_some_and(|t| tracker.stopwatch().elapsed_ms() >= t);
            reached || (!input_open && (!running || stop_at_ms.is_none()))
        }
        TimerKind::Countdown => !input_open && !running,
    }
}

async fn drive(
    mut tracker: TimeTracker<IntervalScheduler>,
    mut ticks: UnboundedReceiver<TimerKind>,
    kind: TimerKind,
    presets: &[u64],
    stop_at_ms: Option<u64>,
    quiet: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut input_open = true;
    let mut count = 0u64;

    if !quiet {
        eprintln!("{HELP_LINE}");
    }
    let started = match kind {
        TimerKind::Stopwatch => tracker.start_stopwatch(),
        TimerKind::Countdown => tracker.start_countdown(),
    };
    if let Some(event) = started {
        print_event(&event)?;
    }

    while !should_stop(&tracker, kind, stop_at_ms, input_open) {
        tokio::select! {
            tick = ticks.recv() => {
                let Some(tick) = tick else {
                    break;
                };
                if let Some(event) = tracker.on_tick(tick) {
                    print_event(&event)?;
                    if !quiet && input_open {
                        eprintln!("finished: p to restart, q to quit");
                    }
                }
                count += 1;
                if !quiet && count % PROGRESS_EVERY == 0 {
                    eprintln!("{}", tracker.display(kind));
                }
            }
            line = lines.next_line(), if input_open => match line {
                Ok(Some(line)) => match parse_input(&line) {
                    Some(Input::Quit) => break,
                    Some(input) => {
                        if let Some(event) = apply(&mut tracker, kind, input, presets) {
                            print_event(&event)?;
                        }
                    }
                    None => eprintln!("unknown command '{}'; {HELP_LINE}", line.trim()),
                },
                Ok(None) => input_open = false,
                Err(e) => {
                    tracing::warn!(error = %e, "stopped reading commands");
                    input_open = false;
                }
            },
        }
    }

    let paused = match kind {
        TimerKind::Stopwatch => tracker.pause_stopwatch(),
        TimerKind::Countdown => tracker.pause_countdown(),
    };
    if let Some(event) = paused {
        print_event(&event)?;
    }
    print_event(&tracker.snapshot(kind))?;
    Ok(())
}
