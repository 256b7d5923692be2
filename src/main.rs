use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use guided_ops::cli::{parse_line, Args, CliCommand, HELP};
use guided_ops::config::Config;
use guided_ops::kernel::controller::DispatchSettings;
use guided_ops::kernel::event::{Event, InputEvent};
use guided_ops::outputs::render_view;
use guided_ops::services::backend::{BackendClient, ReferenceId};
use guided_ops::speech::CommandRecognizer;
use guided_ops::Reactor;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let mut config = Config::from_env()?;
    if let Some(url) = &args.backend_url {
        config = config.with_base_url(url)?;
    }
    if let Some(secs) = args.timeout_secs {
        config = config.with_timeout(Duration::from_secs(secs));
    }
    info!(backend = %config.base_url, timeout = ?config.request_timeout, "Guided Operations starting");

    let client = BackendClient::new(&config)?;

    // Interaction channel
    let (tx, rx) = mpsc::channel(100);
    let mut reactor = Reactor::new(
        rx,
        tx.clone(),
        Arc::new(client.clone()),
        CommandRecognizer::from_config(&config),
        DispatchSettings::from(&config),
    );
    let mut first_message = reactor.on_first_message();
    let mut first_message_seen = false;

    if let Some(reference) = args.reference {
        reactor.process(Event::Input(InputEvent::ReferenceSelected(Some(ReferenceId::new(reference)))));
    }

    // Reference list, fetched once at startup
    spawn_reference_listing(client.clone());

    // Console input
    let (cli_tx, mut cli_rx) = mpsc::channel::<CliCommand>(32);
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if cli_tx.send(parse_line(&line)).await.is_err() {
                break;
            }
        }
    });

    let mut rendered = (reactor.controller.state().version(), reactor.speech.state());
    println!("{}", render_view(reactor.controller.state(), reactor.speech.state()));

    loop {
        tokio::select! {
            Some(event) = reactor.next_event() => reactor.process(event),

            command = cli_rx.recv() => match command {
                None | Some(CliCommand::Quit) => break,
                Some(CliCommand::Inputs(inputs)) => {
                    for input in inputs {
                        reactor.process(Event::Input(input));
                    }
                }
                Some(CliCommand::ListReferences) => spawn_reference_listing(client.clone()),
                Some(CliCommand::Upload(path)) => {
                    let client = client.clone();
                    tokio::spawn(async move {
                        match client.upload_document(&path).await {
                            Ok(()) => {
                                println!("File uploaded and processed successfully!");
                                spawn_reference_listing(client);
                            }
                            Err(e) => {
                                warn!("Error uploading file: {}", e);
                                println!("Failed to process the file.");
                            }
                        }
                    });
                }
                Some(CliCommand::Stats) => println!("{}", reactor.recorder.snapshot()),
                Some(CliCommand::Help) => println!("{}", HELP),
                Some(CliCommand::Unknown(line)) => println!("Unknown command: {} (try /help)", line),
            },

            res = &mut first_message, if !first_message_seen => {
                first_message_seen = true;
                if res.is_ok() {
                    info!("First message sent");
                }
            }
        }

        let current = (reactor.controller.state().version(), reactor.speech.state());
        if current != rendered {
            rendered = current;
            println!("{}", render_view(reactor.controller.state(), reactor.speech.state()));
        }
    }

    reactor.shutdown();
    Ok(())
}

fn spawn_reference_listing(client: BackendClient) {
    tokio::spawn(async move {
        match client.list_references().await {
            Ok(references) if references.is_empty() => println!("No manuals uploaded yet."),
            Ok(references) => {
                println!("Manuals:");
                for reference in references {
                    println!("  {}", reference);
                }
            }
            Err(e) => warn!("Error fetching manuals: {}", e),
        }
    });
}
