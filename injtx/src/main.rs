//! Injection Transmit Tool
//!
//! Opens an injection session on one adapter, tunes it, and repeatedly
//! injects a raw 802.11 frame. Runs against the simulated driver, so every
//! step can be exercised without radio hardware.

mod settings;
mod tx;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use inj_catalog::Modulation;
use inj_detect::CardDirectory;
use inj_session::DeviceSession;
use inj_sim::SimDriver;
use settings::Settings;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tx::{RadioPlan, TxPlan, WEP_FRAME};

#[derive(Parser, Debug)]
#[command(name = "injtx")]
#[command(about = "Inject raw 802.11 frames through a wireless adapter")]
struct Args {
    /// Interface name
    #[arg(short, long)]
    interface: Option<String>,

    /// Driver used on the interface
    #[arg(short, long)]
    driver: Option<String>,

    /// Channel to transmit on
    #[arg(short, long)]
    channel: Option<i32>,

    /// Number of packets to send; omit to send until interrupted
    #[arg(short = 'n', long)]
    count: Option<u64>,

    /// Seconds to sleep between packets
    #[arg(short, long)]
    sleep: Option<f64>,

    /// Modulation to request (DSSS, OFDM, ...)
    #[arg(long)]
    modulation: Option<Modulation>,

    /// Rate in Mb/s
    #[arg(long)]
    rate: Option<f64>,

    /// Frame to inject, as hex; defaults to a WEP-encrypted data frame
    #[arg(long)]
    frame: Option<String>,

    /// List supported drivers and exit
    #[arg(long)]
    list: bool,

    /// Simulated driver configuration (JSON)
    #[arg(long)]
    sim_config: Option<PathBuf>,

    /// Write the effective settings back as the new defaults
    #[arg(long)]
    save: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    /// Fold command-line overrides into the stored settings, then validate
    fn merge_into(&self, settings: &mut Settings) -> Result<()> {
        if let Some(interface) = &self.interface {
            settings.interface = interface.clone();
        }
        if let Some(driver) = &self.driver {
            settings.driver = driver.clone();
        }
        if let Some(channel) = self.channel {
            settings.channel = channel;
        }
        if let Some(modulation) = self.modulation {
            settings.modulation = modulation;
        }
        if let Some(rate) = self.rate {
            settings.rate = Some(rate);
        }
        if let Some(sleep) = self.sleep {
            settings.sleep_secs = sleep;
        }
        settings.validate()
    }

    fn frame(&self) -> Result<Vec<u8>> {
        let frame = match &self.frame {
            Some(text) => hex::decode(text.trim()).context("Frame is not valid hex")?,
            None => WEP_FRAME.to_vec(),
        };
        if frame.is_empty() {
            bail!("Frame must not be empty");
        }
        Ok(frame)
    }
}

fn print_drivers(driver: &SimDriver) {
    let directory = CardDirectory::new(driver);
    println!("Driver library version {}", directory.version());
    println!("Supported drivers:");
    for card in directory.supported_drivers() {
        println!(
            "\t{} - {} [{}]",
            card.name,
            card.description,
            card.capabilities.join(", ")
        );
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let default_filter = if args.verbose {
        "injtx=debug,inj_catalog=debug,inj_session=debug,inj_detect=debug,inj_sim=debug"
    } else {
        "injtx=info,inj_catalog=info,inj_session=info,inj_detect=info,inj_sim=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let driver = match &args.sim_config {
        Some(path) => SimDriver::load(path)
            .with_context(|| format!("Failed to load simulator config {}", path.display()))?,
        None => SimDriver::new(),
    };

    if args.list {
        print_drivers(&driver);
        return Ok(());
    }

    let mut settings = Settings::load();
    args.merge_into(&mut settings)?;

    if args.save {
        let path = settings.save()?;
        info!("Saved settings to {}", path.display());
    }

    if settings.interface.is_empty() {
        print_drivers(&driver);
        bail!("Must specify an interface name");
    }
    if settings.driver.is_empty() {
        print_drivers(&driver);
        bail!("Must specify a driver name");
    }

    let frame = args.frame()?;

    let mut session = DeviceSession::open(driver, &settings.interface, &settings.driver)
        .with_context(|| {
            format!(
                "Failed to open {} with driver {}",
                settings.interface, settings.driver
            )
        })?;

    tx::prepare(
        &mut session,
        &RadioPlan {
            channel: settings.channel,
            modulation: settings.modulation,
            rate: settings.rate,
        },
    )?;

    let plan = TxPlan {
        frame,
        count: args.count,
        sleep: settings.sleep_duration()?,
    };
    let stop = async {
        // If the handler cannot be installed, run until the count is reached
        if tokio::signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
    };

    let sent = tx::run(&mut session, &plan, stop).await?;
    session.close();

    println!("{} packets transmitted", sent);
    Ok(())
}
