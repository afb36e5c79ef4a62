//! Plugin activation and shutdown against the in-memory host.

use super::helpers::{Harness, active_harness, harness};
use camino::Utf8Path;
use rstest::rstest;
use spark_bridge::platform::{
    adapters::memory::InMemoryConnection,
    config::PluginConfig,
    domain::{PermissionPolicy, PlatformKind, PluginState},
    ports::PlatformCapabilities,
};

#[rstest]
fn activation_enables_core_and_registers_command(harness: Harness) {
    assert_eq!(harness.lifecycle.state(), PluginState::Inactive);

    harness.lifecycle.activate();

    assert_eq!(harness.lifecycle.state(), PluginState::Active);
    assert!(harness.core().is_enabled());
    assert!(harness.commands.is_registered("spark"));
    assert_eq!(harness.ticks.tick_start_callback_count(), 1);
    assert_eq!(harness.ticks.tick_end_callback_count(), 1);
}

#[rstest]
fn deactivation_releases_every_host_resource(active_harness: Harness) {
    active_harness.lifecycle.deactivate();

    assert_eq!(active_harness.lifecycle.state(), PluginState::Deactivated);
    assert!(!active_harness.core().is_enabled());
    assert!(!active_harness.commands.is_registered("spark"));
    assert_eq!(active_harness.ticks.tick_start_callback_count(), 0);
    assert_eq!(active_harness.ticks.tick_end_callback_count(), 0);
}

#[rstest]
fn repeated_signals_are_ignored(active_harness: Harness) {
    active_harness.lifecycle.activate();
    active_harness.lifecycle.deactivate();
    active_harness.lifecycle.deactivate();
    active_harness.lifecycle.activate();

    assert_eq!(active_harness.cores_created(), 1);
    assert_eq!(active_harness.lifecycle.state(), PluginState::Deactivated);
    assert!(!active_harness.commands.is_registered("spark"));
}

#[rstest]
fn shutdown_before_activation_is_a_no_op(harness: Harness) {
    harness.lifecycle.deactivate();
    harness.lifecycle.activate();

    assert_eq!(harness.lifecycle.state(), PluginState::Active);
    assert_eq!(harness.cores_created(), 1);
}

#[test]
fn json_configuration_shapes_the_running_plugin() {
    let config = PluginConfig::from_json_str(
        r#"{
            "command_name": "sparkc",
            "plugin_directory": "/srv/host/plugins-data/spark",
            "permission_policy": "allow_all",
            "platform": {
                "kind": "proxy",
                "name": "Velocity",
                "implementation_version": "3.1.1",
                "protocol_version": "1.17"
            }
        }"#,
    )
    .expect("configuration should parse");
    let harness = Harness::new(config);
    harness.lifecycle.activate();
    let player = harness.join(InMemoryConnection::player("Steve"));

    let platform = harness
        .lifecycle
        .platform()
        .expect("active plugin should expose its platform");
    assert_eq!(platform.platform_info().kind(), PlatformKind::Proxy);
    assert_eq!(platform.platform_info().name(), "Velocity");
    assert_eq!(
        platform.plugin_directory(),
        Utf8Path::new("/srv/host/plugins-data/spark")
    );
    assert_eq!(
        platform.config().permission_policy,
        PermissionPolicy::AllowAll
    );
    assert!(harness.run(&player, "sparkc tps"));
    assert_eq!(platform.senders_with_permission("spark").len(), 1);
}
