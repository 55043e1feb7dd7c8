//! In-process loopback runner.
//!
//! Usage:
//!   cargo run -p sim_tests --bin loopback -- [--ticks 256] [--tick-hz 64] [--sensitivity 50] [--config sim.json]
//!
//! Drives a scripted input path through the client at the configured tick
//! rate, feeds the encoded frames to a server inbox on another task, and
//! reports how far the decoded view drifted from the sampled one.

use std::env;
use std::time::Duration;

use anyhow::Context;
use sim_client::input::{HeldKeys, InputState};
use sim_client::GameClient;
use sim_server::CommandInbox;
use sim_shared::commands::STEP_DEGREES;
use sim_shared::config::{InputSettings, SimConfig};
use sim_shared::net::ClientId;
use tracing::info;

struct Args {
    cfg: SimConfig,
    ticks: u32,
}

fn parse_args() -> anyhow::Result<Args> {
    let mut cfg = SimConfig::default();
    let mut ticks = 256;
    let args: Vec<String> = env::args().collect();
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" if i + 1 < args.len() => {
                let text = std::fs::read_to_string(&args[i + 1])
                    .with_context(|| format!("read config {}", args[i + 1]))?;
                cfg = SimConfig::from_json_str(&text).context("parse config")?;
                i += 2;
            }
            "--ticks" if i + 1 < args.len() => {
                ticks = args[i + 1].parse().context("parse --ticks")?;
                i += 2;
            }
            "--tick-hz" if i + 1 < args.len() => {
                cfg.tick_hz = args[i + 1].parse().context("parse --tick-hz")?;
                i += 2;
            }
            "--sensitivity" if i + 1 < args.len() => {
                let slider = args[i + 1].parse().context("parse --sensitivity")?;
                cfg.input = InputSettings {
                    invert_mouse_y: cfg.input.invert_mouse_y,
                    ..InputSettings::from_slider(slider)
                };
                i += 2;
            }
            _ => i += 1,
        }
    }
    Ok(Args { cfg, ticks })
}

/// Scripted input: strafe in a circle while sweeping the mouse.
fn scripted_input(tick: u32, input: &mut InputState, settings: &InputSettings) {
    let phase = tick % 64;
    input.keys = HeldKeys {
        forward: phase < 48,
        left: (16..32).contains(&phase),
        right: (32..48).contains(&phase),
        jump: phase == 0,
        crouch: phase >= 56,
        ..HeldKeys::default()
    };
    let dx = 40.0 * (f64::from(tick) * 0.1).sin();
    let dy = 10.0 * (f64::from(tick) * 0.05).cos();
    input.view.apply_mouse(dx, dy, settings);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();

    let Args { cfg, ticks } = parse_args()?;
    info!(
        ticks,
        tick_hz = cfg.tick_hz,
        sensitivity = cfg.input.mouse_sensitivity,
        "Starting loopback"
    );

    let (mut client, rx) = GameClient::with_queue(ClientId::new_unique(), &cfg);
    let server = tokio::spawn(async move {
        let mut inbox = CommandInbox::default();
        let stats = inbox.run(rx).await;
        (stats, inbox.drain())
    });

    let tick_interval = Duration::from_secs_f32(cfg.tick_seconds());
    let mut next_tick = tokio::time::Instant::now();
    let mut input = InputState::default();
    let mut sampled = Vec::with_capacity(ticks as usize);

    for tick in 0..ticks {
        scripted_input(tick, &mut input, &cfg.input);
        let cmd = client.tick(&input).await?;
        sampled.push((cmd.header.sequence, input.view));

        next_tick += tick_interval;
        tokio::time::sleep_until(next_tick).await;
    }
    drop(client);

    let (stats, intents) = server.await.context("inbox task")?;

    anyhow::ensure!(
        intents.len() == sampled.len(),
        "sent {} commands but the inbox produced {}",
        sampled.len(),
        intents.len()
    );

    // Largest gap between the sampled yaw and the decoded rotation's yaw.
    let mut worst_deg = 0.0f64;
    for ((sequence, view), intent) in sampled.iter().zip(&intents) {
        anyhow::ensure!(*sequence == intent.sequence, "sequence mismatch at {sequence}");
        let q = intent.view;
        let decoded_yaw = f64::from(2.0 * (q.w * q.z + q.x * q.y))
            .atan2(f64::from(1.0 - 2.0 * (q.y * q.y + q.z * q.z)));
        let diff = (view.yaw - decoded_yaw).to_degrees().rem_euclid(360.0);
        worst_deg = worst_deg.max(diff.min(360.0 - diff));
    }

    info!(
        accepted = stats.accepted,
        duplicates = stats.duplicates,
        worst_yaw_error_deg = worst_deg,
        step_deg = STEP_DEGREES,
        "Loopback finished"
    );
    Ok(())
}
