//! Behavioural tests covering process startup and signal-driven shutdown.

use std::cell::RefCell;
use std::io::Cursor;
use std::sync::{Arc, Mutex, mpsc};
use std::thread;
use std::time::{Duration, Instant};

use noox_config::Config;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

use crate::bootstrap::ConfiguredWifiInfo;
use crate::bridge::BridgeIo;
use crate::console::Console;
use crate::health::HealthReporter;
use crate::process::launch::serve;
use crate::process::{LaunchError, ShutdownError, ShutdownSignal, run_bridge};
use crate::tests::support::{
    HealthEvent, IdleLink, RecordingExecutor, RecordingHealthReporter, SharedBuffer,
};

const WAIT_TIMEOUT: Duration = Duration::from_secs(5);
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Stop listener released by sending on its paired channel.
struct ManualStop {
    requests: Mutex<mpsc::Receiver<()>>,
}

impl ShutdownSignal for ManualStop {
    fn wait(&self) -> Result<(), ShutdownError> {
        let requests = self.requests.lock().expect("stop lock");
        let _ = requests.recv();
        Ok(())
    }
}

struct ProcessWorld {
    reporter: Arc<RecordingHealthReporter>,
    stop_sender: mpsc::Sender<()>,
    stop: Option<ManualStop>,
    idle_link: bool,
    port: Option<String>,
    handle: Option<thread::JoinHandle<Result<(), LaunchError>>>,
    result: Option<Result<(), LaunchError>>,
}

impl ProcessWorld {
    fn new() -> Self {
        let (stop_sender, requests) = mpsc::channel();
        Self {
            reporter: Arc::new(RecordingHealthReporter::default()),
            stop_sender,
            stop: Some(ManualStop {
                requests: Mutex::new(requests),
            }),
            idle_link: false,
            port: None,
            handle: None,
            result: None,
        }
    }

    fn quick_config(extra: &[&str]) -> Config {
        let args = ["noox-host", "--settle-delay-ms", "0"]
            .into_iter()
            .chain(extra.iter().copied());
        Config::load_from_iter(args).expect("test configuration parses")
    }

    fn start_background(&mut self) {
        assert!(self.idle_link, "scenario must provide a device link");
        let reporter = self.reporter.clone() as Arc<dyn HealthReporter>;
        let stop = self.stop.take().expect("stop listener unused");
        self.handle = Some(thread::spawn(move || {
            let io = BridgeIo {
                link_reader: Box::new(IdleLink),
                operator_input: Box::new(Cursor::new(Vec::new())),
                console: Console::new(SharedBuffer::default()),
                executor: Arc::new(RecordingExecutor::succeeding("")),
            };
            serve(
                io,
                Box::new(SharedBuffer::default()),
                &Self::quick_config(&[]),
                &ConfiguredWifiInfo::default(),
                &reporter,
                &stop,
            )
        }));
    }

    fn wait_for_event(&self, expected: &HealthEvent) -> bool {
        let deadline = Instant::now() + WAIT_TIMEOUT;
        while Instant::now() < deadline {
            if self.reporter.events().contains(expected) {
                return true;
            }
            thread::sleep(POLL_INTERVAL);
        }
        false
    }

    fn join_background(&mut self) {
        let handle = self.handle.take().expect("bridge running");
        self.result = Some(handle.join().expect("bridge thread panicked"));
    }
}

#[fixture]
fn world() -> RefCell<ProcessWorld> {
    RefCell::new(ProcessWorld::new())
}

#[given("an idle device link")]
fn given_idle_link(world: &RefCell<ProcessWorld>) {
    world.borrow_mut().idle_link = true;
}

#[given("the configured port is \"{port}\"")]
fn given_configured_port(world: &RefCell<ProcessWorld>, port: String) {
    world.borrow_mut().port = Some(port);
}

#[when("the bridge is served in the background")]
fn when_served_in_background(world: &RefCell<ProcessWorld>) {
    world.borrow_mut().start_background();
}

#[when("the bridge is started against the configured port")]
fn when_started_against_port(world: &RefCell<ProcessWorld>) {
    let mut world = world.borrow_mut();
    let port = world.port.clone().expect("port configured");
    let config = ProcessWorld::quick_config(&["--port", port.as_str()]);
    let reporter = world.reporter.clone() as Arc<dyn HealthReporter>;
    let stop = world.stop.take().expect("stop listener unused");
    let result = run_bridge(&config, &reporter, &stop);
    world.result = Some(result);
}

#[when("a shutdown signal arrives")]
fn when_shutdown_arrives(world: &RefCell<ProcessWorld>) {
    world
        .borrow()
        .stop_sender
        .send(())
        .expect("bridge is waiting for a stop request");
    world.borrow_mut().join_background();
}

#[then("the bridge is still running after the operator input closes")]
fn then_still_running(world: &RefCell<ProcessWorld>) {
    let world = world.borrow();
    assert!(
        world.wait_for_event(&HealthEvent::OperatorStopped { forwarded: 0 }),
        "operator loop should stop on empty input"
    );
    let handle = world.handle.as_ref().expect("bridge running");
    assert!(!handle.is_finished(), "bridge must outlive its operator loop");
}

#[then("the bridge exits cleanly")]
fn then_exits_cleanly(world: &RefCell<ProcessWorld>) {
    match world.borrow().result.as_ref() {
        Some(Ok(())) => {}
        other => panic!("expected clean exit, got {other:?}"),
    }
}

#[then("the reader stopped because it was cancelled")]
fn then_reader_cancelled(world: &RefCell<ProcessWorld>) {
    let events = world.borrow().reporter.events();
    assert!(events.contains(&HealthEvent::ShutdownRequested), "{events:?}");
    assert!(
        events.contains(&HealthEvent::ReaderStopped {
            routed: 0,
            cancelled: true,
        }),
        "{events:?}"
    );
}

#[then("startup fails mentioning \"{fragment}\"")]
fn then_startup_fails(world: &RefCell<ProcessWorld>, fragment: String) {
    match world.borrow().result.as_ref() {
        Some(Err(error)) => {
            let message = error.to_string();
            assert!(message.contains(&fragment), "unexpected error: {message}");
        }
        other => panic!("expected startup failure, got {other:?}"),
    }
}

#[then("the health reporter recorded the startup failure")]
fn then_failure_recorded(world: &RefCell<ProcessWorld>) {
    let events = world.borrow().reporter.events();
    assert_eq!(events.first(), Some(&HealthEvent::StartupStarting));
    assert!(
        events
            .iter()
            .any(|event| matches!(event, HealthEvent::StartupFailed(_))),
        "{events:?}"
    );
    assert!(
        !events
            .iter()
            .any(|event| matches!(event, HealthEvent::DeviceConnected(_))),
        "{events:?}"
    );
}

#[scenario(
    path = "tests/features/process.feature",
    name = "Bridge stays up until a shutdown signal arrives"
)]
fn bridge_waits_for_shutdown(#[from(world)] _: RefCell<ProcessWorld>) {}

#[scenario(
    path = "tests/features/process.feature",
    name = "Startup fails when the configured port cannot be opened"
)]
fn startup_fails_on_bad_port(#[from(world)] _: RefCell<ProcessWorld>) {}
