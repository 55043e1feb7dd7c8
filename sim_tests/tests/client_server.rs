//! In-process integration tests: client send queue -> server inbox.

use std::f64::consts::PI;

use sim_client::input::{HeldKeys, InputState, ViewAngles};
use sim_client::GameClient;
use sim_server::CommandInbox;
use sim_shared::commands::TranslationMask;
use sim_shared::config::SimConfig;
use sim_shared::net::ClientId;

/// Full loop: client ticks on one task, server inbox drains on another.
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn client_to_inbox_roundtrip() -> anyhow::Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("info")
        .with_test_writer()
        .try_init();

    let cfg = SimConfig::from_json_str(r#"{ "tick_hz": 64, "inbox_capacity": 4 }"#)?;
    let (mut client, rx) = GameClient::with_queue(ClientId(1), &cfg);

    let server = tokio::spawn(async move {
        let mut inbox = CommandInbox::default();
        let stats = inbox.run(rx).await;
        (stats, inbox.drain())
    });

    let mut sent = Vec::new();
    for i in 0..32 {
        let input = InputState {
            keys: HeldKeys {
                forward: true,
                jump: i % 8 == 0,
                ..HeldKeys::default()
            },
            view: ViewAngles {
                yaw: f64::from(i) * 0.25,
                pitch: -0.1,
                roll: 0.0,
            },
        };
        sent.push(client.tick(&input).await?);
    }
    drop(client);

    let (stats, intents) = server.await?;
    assert_eq!(stats.accepted, sent.len());
    assert_eq!(stats.duplicates, 0);
    assert_eq!(intents.len(), sent.len());

    for (cmd, intent) in sent.iter().zip(&intents) {
        assert_eq!(intent.client, ClientId(1));
        assert_eq!(intent.sequence, cmd.header.sequence);
        assert_eq!(intent.translation, cmd.translation());
        // Both ends reconstruct the same orientation from the same codes.
        assert_eq!(intent.view, cmd.rotation());
    }
    assert!(intents[0].jumping());
    assert!(!intents[1].jumping());
    Ok(())
}

/// Yaw of pi survives the full path as a half turn about Z.
#[tokio::test]
async fn half_turn_yaw_survives_loop() -> anyhow::Result<()> {
    let cfg = SimConfig::default();
    let (mut client, mut rx) = GameClient::with_queue(ClientId(2), &cfg);
    let input = InputState {
        keys: HeldKeys {
            forward: true,
            jump: true,
            ..HeldKeys::default()
        },
        view: ViewAngles {
            yaw: PI,
            pitch: 0.0,
            roll: 0.0,
        },
    };
    let cmd = client.tick(&input).await?;
    assert_eq!(cmd.angle_codes(), (16383, 0, 0));

    let (from, frame) = rx.recv().await.expect("queued frame");
    let mut inbox = CommandInbox::default();
    inbox.receive(from, &frame)?;
    let intent = inbox.drain()[0];

    assert_eq!(intent.translation, TranslationMask::JUMP | TranslationMask::POS_X);
    assert_eq!(intent.translation.bits(), 129);
    assert!((intent.view.z - 1.0).abs() < 1e-6);
    assert!(intent.view.w.abs() < 1e-3);
    // Facing the other way, forward points down -X.
    let world = intent.world_wish();
    assert!((world.x + 1.0).abs() < 1e-3);
    assert!(world.y.abs() < 1e-3);
    Ok(())
}
