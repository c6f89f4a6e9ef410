use clap::Parser;
use flexi_logger::{Cleanup, Criterion, Duplicate, FileSpec, Logger, Naming};
use log::info;
use serde::Deserialize;
use serde_json::json;
use std::path::Path;
use std::time::Duration;
use tokio::fs;
use tokio::io::{self, AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use tokio::task;
use tokio::time;
use vidbridge::{
    finished_channel, Bridge, Command, PlaybackConfig, Registry, Result, SimPlayer, SurfaceHandle,
};

const DEFAULT_URL: &str = "http://clips.vorwaerts-gmbh.de/big_buck_bunny.mp4";
const TICK: Duration = Duration::from_millis(200);

#[derive(Parser)]
#[command(name = "vidbridge-demo", version, about = "Drive a playback surface from the terminal")]
struct Args {
    /// Initial video url, overriding the config file
    #[arg(long)]
    url: Option<String>,
    /// Start playing immediately, overriding the config file
    #[arg(long)]
    autoplay: bool,
    /// Simulated track length in seconds, overriding the config file
    #[arg(long)]
    track_secs: Option<u64>,
}

#[derive(Deserialize)]
#[serde(default)]
struct DemoConfig {
    url: String,
    autoplay: bool,
    track_secs: u64,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_owned(),
            autoplay: false,
            track_secs: 30,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let home_dir = std::env::var("HOME")?;
    let config_dir = format!("{home_dir}/.config/vidbridge");
    let log_dir = format!("{config_dir}/logs");
    fs::create_dir_all(&log_dir).await?;

    Logger::try_with_str("info")?
        .log_to_file(FileSpec::default().directory(&log_dir))
        .rotate(
            Criterion::Size(1_000_000),
            Naming::Timestamps,
            Cleanup::KeepLogFiles(3),
        )
        .duplicate_to_stderr(Duplicate::None)
        .start()?;

    let mut config = load_demo_config(&format!("{config_dir}/demo.toml")).await?;
    if let Some(url) = args.url {
        config.url = url;
    }
    if args.autoplay {
        config.autoplay = true;
    }
    if let Some(secs) = args.track_secs {
        config.track_secs = secs;
    }

    let sim = SimPlayer::new(Duration::from_secs(config.track_secs));
    let registry = Registry::builder()
        .component("video", {
            let sim = sim.clone();
            move || Box::new(sim.clone())
        })
        .build();
    let bridge = Bridge::new(registry);

    let (listener, mut finished_rx) = finished_channel();
    let surface = bridge
        .create_surface(
            "video",
            PlaybackConfig {
                auto_play: config.autoplay,
                source_url: config.url.clone(),
            },
            Some(listener),
        )
        .await?;
    info!("demo surface {surface} mounted, commands {:?}", Command::names());

    task::spawn(async move {
        while let Some(event) = finished_rx.recv().await {
            println!("video finished: {} (foo={})", event.message, event.foo);
        }
    });

    // The simulated clock ticks until the prompt loop winds down.
    let (stop_sender, mut stop_receiver) = watch::channel(());
    task::spawn({
        let sim = sim.clone();
        async move {
            let mut ticker = time::interval(TICK);
            loop {
                tokio::select! {
                    _ = ticker.tick() => sim.advance(TICK),
                    _ = stop_receiver.changed() => break,
                }
            }
        }
    });

    println!("playing {} ({}s track)", config.url, config.track_secs);
    println!("commands: toggle | change <url> | tap | state | quit");
    let mut lines = BufReader::new(io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if handle_line(&bridge, surface, line.trim()).await? {
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    let _ = stop_sender.send(());
    bridge.destroy_surface(surface).await?;
    Ok(())
}

async fn load_demo_config(path: &str) -> Result<DemoConfig> {
    if !Path::new(path).exists() {
        let defaults = DemoConfig::default();
        let body = format!(
            "url = {:?}\nautoplay = {}\ntrack_secs = {}\n",
            defaults.url, defaults.autoplay, defaults.track_secs
        );
        fs::write(path, body).await?;
        return Ok(defaults);
    }
    let content = fs::read_to_string(path).await?;
    Ok(toml::from_str(&content)?)
}

// Commands go through the by-name path, the same way a shell-side caller
// would dispatch them.
async fn handle_line(bridge: &Bridge, surface: SurfaceHandle, line: &str) -> Result<bool> {
    let mut parts = line.split_whitespace();
    match parts.next() {
        Some("toggle" | "t") => bridge.dispatch_by_name(surface, "togglePlay", &[]).await?,
        Some("change" | "c") => {
            if let Some(url) = parts.next() {
                bridge
                    .dispatch_by_name(surface, "changeVideo", &[json!(url), json!("bar")])
                    .await?;
            } else {
                println!("usage: change <url>");
            }
        }
        Some("tap") => bridge.tap(surface).await?,
        Some("state" | "s") => {
            let snap = bridge.snapshot(surface).await?;
            println!(
                "{:?} source={} position={:.1}s/{:.1}s",
                snap.state,
                snap.source.as_deref().unwrap_or("<none>"),
                snap.position.as_secs_f64(),
                snap.duration.as_secs_f64(),
            );
        }
        Some("quit" | "q") => return Ok(true),
        Some(other) => println!("unknown command: {other}"),
        None => {}
    }
    Ok(false)
}
