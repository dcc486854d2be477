use std::time::Duration;

use super::*;
use crate::engine::EngineOpts;
use crate::foundation::cancel::CancelToken;
use crate::foundation::core::Size;
use crate::input::device::ScriptedInputDevice;
use crate::input::event::KEY_VOLUMEDOWN;
use crate::input::watcher::InputWatcher;
use crate::logs::entry::{LogEntry, LogPriority};
use crate::logs::source::{LogSource, MemoryLogSource};
use crate::render::decode::DefaultDecoder;
use crate::render::headless::{HeadlessProbe, HeadlessSink};
use crate::render::pacing::{Clock, ManualClock};

fn context(input: InputWatcher, tick_limit: Option<u64>) -> (EngineContext, HeadlessProbe, ManualClock) {
    let sink = HeadlessSink::new(Size::new(200, 90));
    let probe = sink.probe();
    let clock = ManualClock::new();
    let opts = EngineOpts {
        initial_threshold: DisplayThreshold::FATAL_ONLY,
        tick_limit,
        ..EngineOpts::default()
    };
    let ctx = EngineContext::new(
        Box::new(sink),
        Box::new(clock.clone()),
        Box::new(DefaultDecoder),
        input,
        CancelToken::new(),
        opts,
    )
    .unwrap();
    (ctx, probe, clock)
}

fn server_line(sec: u32) -> LogEntry {
    LogEntry::new(0, sec, 0, LogPriority::Info, "SystemServer", format!("step {sec}"))
}

#[test]
fn redraws_only_on_first_tick_and_changes() {
    let (mut ctx, probe, clock) = context(InputWatcher::disabled(), Some(4));
    let mut factory = || {
        vec![Box::new(MemoryLogSource::new("main").would_block().entry(server_line(1)))
            as Box<dyn LogSource>]
    };

    assert_eq!(run(&mut ctx, &mut factory).unwrap(), ModeOutcome::Cancelled);
    // Tick 1 draws the blank screen, tick 2 the new line, ticks 3 and 4 have nothing new.
    assert_eq!(probe.stats().swaps, 2);
    assert_eq!(ctx.buffer.display_text().last().unwrap(), "SystemServer: step 1");
    // Paced at 5 fps.
    assert_eq!(clock.now(), Duration::from_millis(800));
}

#[test]
fn buffer_is_cleared_on_entry() {
    let (mut ctx, _, _) = context(InputWatcher::disabled(), Some(1));
    ctx.buffer.append("stale");
    let mut factory = || vec![Box::new(MemoryLogSource::new("main")) as Box<dyn LogSource>];

    run(&mut ctx, &mut factory).unwrap();
    assert!(ctx.buffer.display_text().iter().all(String::is_empty));
}

#[test]
fn losing_every_source_goes_back_to_silent() {
    let (mut ctx, probe, _) = context(InputWatcher::disabled(), None);
    let mut factory = || vec![Box::new(MemoryLogSource::new("main").fail()) as Box<dyn LogSource>];

    assert_eq!(run(&mut ctx, &mut factory).unwrap(), ModeOutcome::Switch);
    assert_eq!(ctx.state.threshold, DisplayThreshold::SILENT);
    assert_eq!(probe.stats().swaps, 0);

    let mut nothing = Vec::<Box<dyn LogSource>>::new;
    assert_eq!(run(&mut ctx, &mut nothing).unwrap(), ModeOutcome::Switch);
}

#[test]
fn volume_key_requests_a_switch() {
    let input = InputWatcher::with_device(Box::new(
        ScriptedInputDevice::new().idle(2).key_down(KEY_VOLUMEDOWN),
    ));
    let (mut ctx, _, _) = context(input, Some(100));
    let mut factory = || vec![Box::new(MemoryLogSource::new("main")) as Box<dyn LogSource>];

    assert_eq!(run(&mut ctx, &mut factory).unwrap(), ModeOutcome::Switch);
    assert_eq!(ctx.ticks, 2);
    assert_eq!(ctx.state.threshold, DisplayThreshold::SILENT);
}
