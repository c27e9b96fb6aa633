use clap::Parser;
use miette::{IntoDiagnostic, Result};
use revtopup::application::flow::FlowController;
use revtopup::config::AppConfig;
use revtopup::domain::ports::ClockBox;
use revtopup::infrastructure::in_memory::{InMemorySessionStorage, InstantClock, TokioClock};
use revtopup::interfaces::csv::event_reader::EventReader;
use revtopup::interfaces::csv::report_writer::{FlowReport, ReportWriter};
use std::fs::File;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Flow-event CSV script to replay
    script: PathBuf,

    /// TOML configuration overriding the built-in defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Drive timers in real time instead of completing them instantly
    #[arg(long)]
    real_time: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match cli.config {
        Some(path) => AppConfig::load(&path).into_diagnostic()?,
        None => AppConfig::default(),
    };
    let clock: ClockBox = if cli.real_time {
        Box::new(TokioClock)
    } else {
        Box::new(InstantClock::new())
    };

    let slot = Box::new(InMemorySessionStorage::new());
    let mut controller = FlowController::new(config, slot);

    // Replay events
    let file = File::open(cli.script).into_diagnostic()?;
    let reader = EventReader::new(file);
    for event_result in reader.events() {
        match event_result {
            Ok(event) => {
                if let Err(e) = controller.apply(event, clock.as_ref()).await {
                    eprintln!("Error applying event: {}", e);
                }
            }
            Err(e) => {
                eprintln!("Error reading event: {}", e);
            }
        }
    }

    // Collect final state
    let order = controller.stored_order().await.into_diagnostic()?;
    let report = FlowReport {
        screen: controller.screen().to_string(),
        email: controller.session().user_email.clone(),
        balance: controller.session().balance.value(),
        order_total: order.as_ref().map(|o| o.total),
        order_country: order.map(|o| o.country),
    };

    // Output final state
    let stdout = io::stdout();
    let mut writer = ReportWriter::new(stdout.lock());
    writer.write_report(&report).into_diagnostic()?;

    Ok(())
}
