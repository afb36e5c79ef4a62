//! Command registration and dispatch through the host command system.

use super::helpers::{Harness, Invocation, active_harness};
use rstest::rstest;
use spark_bridge::platform::{
    adapters::memory::InMemoryConnection, config::PluginConfig, ports::HostConnection,
};

#[rstest]
fn report_upload_reaches_the_core_once(active_harness: Harness) {
    let player = active_harness.join(InMemoryConnection::player("Notch"));

    let handled = active_harness.run(&player, "spark report --upload");

    assert!(handled);
    assert_eq!(
        active_harness.core().invocations(),
        vec![Invocation {
            sender: player.id(),
            args: vec!["report".to_owned(), "--upload".to_owned()],
        }]
    );
}

#[rstest]
fn asynchronous_reply_arrives_on_a_later_tick(active_harness: Harness) {
    let player = active_harness.join(InMemoryConnection::player("Notch"));

    assert!(active_harness.run(&player, "spark report"));
    assert!(player.messages().is_empty());

    active_harness
        .scheduler
        .run_pending()
        .expect("queue should drain");
    assert_eq!(player.messages(), vec!["report uploaded".to_owned()]);
}

#[rstest]
fn bare_command_dispatches_no_arguments(active_harness: Harness) {
    let console = active_harness.join(InMemoryConnection::console());

    assert!(active_harness.run(&console, "/spark"));

    let invocations = active_harness.core().invocations();
    assert_eq!(invocations.len(), 1);
    assert!(invocations.iter().all(|invocation| invocation.args.is_empty()));
    assert_eq!(
        console.messages(),
        vec![format!(
            "spark v{} running on Minestom 1.0 (server, protocol 1.16.5)",
            env!("CARGO_PKG_VERSION")
        )]
    );
}

#[rstest]
fn unknown_subcommand_is_reported_to_the_sender(active_harness: Harness) {
    let player = active_harness.join(InMemoryConnection::player("Alex"));

    assert!(active_harness.run(&player, "spark heapdumpp"));

    assert_eq!(
        player.messages(),
        vec!["Unknown command: heapdumpp".to_owned()]
    );
}

#[rstest]
fn tps_reports_sampled_ticks(active_harness: Harness) {
    let console = active_harness.join(InMemoryConnection::console());
    active_harness.tick(20, 50);

    assert!(active_harness.run(&console, "spark tps"));

    assert_eq!(console.messages(), vec!["ticks sampled: 20".to_owned()]);
}

#[rstest]
fn broadcast_reaches_only_permitted_senders(active_harness: Harness) {
    let console = active_harness.join(InMemoryConnection::console());
    let operator =
        active_harness.join(InMemoryConnection::player("Notch").with_permissions(["spark"]));
    let visitor = active_harness.join(InMemoryConnection::player("Alex"));

    assert!(active_harness.run(&console, "spark broadcast profiler   started"));

    assert_eq!(console.messages(), vec!["profiler started".to_owned()]);
    assert_eq!(operator.messages(), vec!["profiler started".to_owned()]);
    assert!(visitor.messages().is_empty());
}

#[rstest]
fn reply_to_departed_sender_is_dropped(active_harness: Harness) {
    let player = active_harness.join(InMemoryConnection::player("Steve"));

    assert!(active_harness.run(&player, "spark report"));
    player.disconnect();
    let executed = active_harness
        .scheduler
        .run_pending()
        .expect("queue should drain");

    assert_eq!(executed, 1);
    assert!(player.messages().is_empty());
}

#[test]
fn configured_command_name_replaces_the_default() {
    let config = PluginConfig::default()
        .with_command_name("SparkM")
        .expect("command name should be valid");
    let harness = Harness::new(config);
    harness.lifecycle.activate();
    let console = harness.join(InMemoryConnection::console());

    assert!(!harness.run(&console, "spark tps"));
    assert!(harness.run(&console, "sparkm tps"));
    assert!(harness.commands.is_registered("sparkm"));
}

#[test]
fn inactive_plugin_registers_nothing() {
    let harness = Harness::new(PluginConfig::default());
    let console = harness.join(InMemoryConnection::console());

    assert!(!harness.run(&console, "spark"));
    assert_eq!(harness.cores_created(), 0);
}
