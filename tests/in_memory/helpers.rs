//! Shared harness for in-memory host integration tests.

use rstest::fixture;
use spark_bridge::platform::{
    adapters::memory::{
        InMemoryCommandRegistry, InMemoryConnection, InMemoryConnectionRegistry,
        InMemoryTaskScheduler, InMemoryTickDispatcher,
    },
    config::PluginConfig,
    domain::SenderId,
    ports::{
        CommandSender, HostServices, MonitoringCore, MonitoringCoreError, MonitoringCoreFactory,
        MonitoringCoreResult, PlatformCapabilities, TickListener,
    },
    services::PluginLifecycle,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Permission node guarding the broadcast subcommand.
pub const BROADCAST_PERMISSION: &str = "spark";

/// Listener recording every tick token it receives.
#[derive(Debug, Default)]
pub struct RecordingListener {
    tokens: Mutex<Vec<u64>>,
}

impl RecordingListener {
    /// Returns the tokens received so far.
    #[must_use]
    pub fn tokens(&self) -> Vec<u64> {
        self.tokens
            .lock()
            .expect("listener lock should not be poisoned")
            .clone()
    }

    /// Returns the number of notifications received.
    #[must_use]
    pub fn count(&self) -> usize {
        self.tokens().len()
    }
}

impl TickListener for RecordingListener {
    fn on_tick(&self, token: u64) {
        self.tokens
            .lock()
            .expect("listener lock should not be poisoned")
            .push(token);
    }
}

/// One command invocation as observed by the core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Identity of the invoking sender.
    pub sender: SenderId,
    /// Argument tokens.
    pub args: Vec<String>,
}

/// Small monitoring core exercising every platform capability.
///
/// On enable it samples tick starts and tick durations. It understands
/// `tps`, `broadcast <text>` and `report ...`, which replies asynchronously.
pub struct RecordingCore {
    platform: Arc<dyn PlatformCapabilities>,
    tick_starts: Arc<RecordingListener>,
    tick_durations: Arc<RecordingListener>,
    invocations: Mutex<Vec<Invocation>>,
    enabled: AtomicBool,
}

impl RecordingCore {
    /// Creates a core bound to the given platform.
    #[must_use]
    pub fn new(platform: Arc<dyn PlatformCapabilities>) -> Self {
        Self {
            platform,
            tick_starts: Arc::new(RecordingListener::default()),
            tick_durations: Arc::new(RecordingListener::default()),
            invocations: Mutex::new(Vec::new()),
            enabled: AtomicBool::new(false),
        }
    }

    /// Returns the invocations received so far.
    #[must_use]
    pub fn invocations(&self) -> Vec<Invocation> {
        self.invocations
            .lock()
            .expect("invocation lock should not be poisoned")
            .clone()
    }

    /// Returns the tick-start tokens sampled so far.
    #[must_use]
    pub fn tick_starts(&self) -> Vec<u64> {
        self.tick_starts.tokens()
    }

    /// Returns the tick durations sampled so far.
    #[must_use]
    pub fn tick_durations(&self) -> Vec<u64> {
        self.tick_durations.tokens()
    }

    /// Returns whether the core is currently enabled.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }
}

impl MonitoringCore for RecordingCore {
    fn enable(&self) -> MonitoringCoreResult<()> {
        self.platform
            .create_tick_hook(self.tick_starts.clone())
            .start()
            .map_err(MonitoringCoreError::runtime)?;
        self.platform
            .create_tick_reporter(self.tick_durations.clone())
            .start()
            .map_err(MonitoringCoreError::runtime)?;
        self.enabled.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn disable(&self) {
        self.enabled.store(false, Ordering::SeqCst);
    }

    fn execute_command(
        &self,
        sender: Arc<dyn CommandSender>,
        args: &[String],
    ) -> MonitoringCoreResult<()> {
        self.invocations
            .lock()
            .map_err(|err| MonitoringCoreError::runtime(std::io::Error::other(err.to_string())))?
            .push(Invocation {
                sender: sender.identity(),
                args: args.to_vec(),
            });

        match args.split_first() {
            None => {
                sender.send_message(&format!(
                    "spark v{} running on {}",
                    self.platform.plugin_version(),
                    self.platform.platform_info()
                ));
                Ok(())
            }
            Some((subcommand, rest)) => match subcommand.as_str() {
                "tps" => {
                    sender.send_message(&format!("ticks sampled: {}", self.tick_starts.count()));
                    Ok(())
                }
                "broadcast" => {
                    let text = rest.join(" ");
                    for recipient in self.platform.senders_with_permission(BROADCAST_PERMISSION) {
                        recipient.send_message(&text);
                    }
                    Ok(())
                }
                "report" => {
                    let requester = Arc::clone(&sender);
                    self.platform
                        .execute_async(Box::new(move || requester.send_message("report uploaded")));
                    Ok(())
                }
                other => Err(MonitoringCoreError::Command(format!(
                    "Unknown command: {other}"
                ))),
            },
        }
    }
}

/// In-memory host plus a plugin instance wired to it.
pub struct Harness {
    /// Host tick dispatcher.
    pub ticks: InMemoryTickDispatcher,
    /// Host command system.
    pub commands: InMemoryCommandRegistry,
    /// Host scheduler.
    pub scheduler: InMemoryTaskScheduler,
    /// Host connection registry.
    pub connections: InMemoryConnectionRegistry,
    /// Plugin under test.
    pub lifecycle: PluginLifecycle,
    cores: Arc<Mutex<Vec<Arc<RecordingCore>>>>,
}

impl Harness {
    /// Builds a harness around `config` without activating the plugin.
    #[must_use]
    pub fn new(config: PluginConfig) -> Self {
        let ticks = InMemoryTickDispatcher::new();
        let commands = InMemoryCommandRegistry::new();
        let scheduler = InMemoryTaskScheduler::new();
        let connections = InMemoryConnectionRegistry::new();
        let services = HostServices::new(
            Arc::new(ticks.clone()),
            Arc::new(commands.clone()),
            Arc::new(scheduler.clone()),
            Arc::new(connections.clone()),
        );
        let cores = Arc::new(Mutex::new(Vec::new()));
        let lifecycle = PluginLifecycle::new(config, services, recording_factory(&cores));

        Self {
            ticks,
            commands,
            scheduler,
            connections,
            lifecycle,
            cores,
        }
    }

    /// Returns the most recently created core.
    ///
    /// # Panics
    ///
    /// Panics when no core has been created.
    #[must_use]
    pub fn core(&self) -> Arc<RecordingCore> {
        self.cores
            .lock()
            .expect("core lock should not be poisoned")
            .last()
            .cloned()
            .expect("a core should have been created")
    }

    /// Returns how many cores the plugin constructed.
    #[must_use]
    pub fn cores_created(&self) -> usize {
        self.cores
            .lock()
            .expect("core lock should not be poisoned")
            .len()
    }

    /// Connects a sender to the host.
    ///
    /// # Panics
    ///
    /// Panics when the registry rejects the connection.
    #[must_use]
    pub fn join(&self, connection: InMemoryConnection) -> Arc<InMemoryConnection> {
        let shared = Arc::new(connection);
        self.connections
            .connect(shared.clone())
            .expect("connection should register");
        shared
    }

    /// Types a command line as `sender`, returning whether a command matched.
    ///
    /// # Panics
    ///
    /// Panics when the host command system fails.
    #[must_use]
    pub fn run(&self, sender: &Arc<InMemoryConnection>, line: &str) -> bool {
        self.commands
            .execute(sender.clone(), line)
            .expect("command execution should succeed")
    }

    /// Advances the host by `count` ticks of `duration_millis` each.
    ///
    /// # Panics
    ///
    /// Panics when the dispatcher fails.
    pub fn tick(&self, count: usize, duration_millis: u64) {
        for _ in 0..count {
            self.ticks
                .run_tick(duration_millis)
                .expect("tick should run");
        }
    }
}

fn recording_factory(
    cores: &Arc<Mutex<Vec<Arc<RecordingCore>>>>,
) -> Arc<dyn MonitoringCoreFactory> {
    let created = Arc::clone(cores);
    Arc::new(
        move |platform: Arc<dyn PlatformCapabilities>| -> MonitoringCoreResult<Arc<dyn MonitoringCore>> {
            let core = Arc::new(RecordingCore::new(platform));
            created
                .lock()
                .map_err(|err| MonitoringCoreError::runtime(std::io::Error::other(err.to_string())))?
                .push(Arc::clone(&core));
            Ok(core)
        },
    )
}

/// Provides an inactive plugin on a fresh in-memory host.
#[fixture]
pub fn harness() -> Harness {
    Harness::new(PluginConfig::default())
}

/// Provides an active plugin on a fresh in-memory host.
#[fixture]
pub fn active_harness() -> Harness {
    let fresh = Harness::new(PluginConfig::default());
    fresh.lifecycle.activate();
    fresh
}
