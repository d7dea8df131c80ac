// ABOUTME: Example application that decodes an MMS PDU file and prints its headers and parts
// ABOUTME: Useful for inspecting captures from an MMSC

pub(crate) use argh::FromArgs;
use mms_pdu::{Pdu, PduParser};
use std::error::Error;
use std::path::PathBuf;

/// Example application to print the contents of an encoded MMS PDU
#[derive(FromArgs)]
struct CliArgs {
    /// whether or not to enable debugging
    #[argh(switch, short = 'd')]
    debugging: bool,

    /// skip Content-Disposition part headers
    #[argh(switch)]
    no_disposition: bool,

    /// the PDU file to decode
    #[argh(positional)]
    file: PathBuf,
}

use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli_args: CliArgs = argh::from_env();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(if cli_args.debugging {
            Level::TRACE
        } else {
            Level::INFO
        })
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let data = tokio::fs::read(&cli_args.file).await?;
    let pdu = PduParser::new(&data)
        .parse_content_disposition(!cli_args.no_disposition)
        .try_parse()
        .map_err(|e| {
            eprintln!("Failed to decode {}: {e}", cli_args.file.display());
            e
        })?;

    println!("{} (MMS {})", pdu.message_type().name(), pdu.mms_version());
    if let Some(transaction_id) = pdu.transaction_id() {
        println!("  transaction: {transaction_id}");
    }
    match &pdu {
        Pdu::NotificationInd(notification) => {
            println!("  location: {}", notification.content_location);
            println!("  size: {} octets", notification.message_size);
        }
        Pdu::SendConf(conf) => {
            println!("  status: {:?}", conf.response_status);
            if let Some(message_id) = &conf.message_id {
                println!("  message id: {message_id}");
            }
        }
        other => println!("  {other:#?}"),
    }

    if let Some(body) = pdu.body() {
        for (index, part) in body.iter().enumerate() {
            println!(
                "  part {index}: {} location={:?} id={:?} {} octets",
                part.content_type(),
                part.content_location(),
                part.content_id(),
                part.bytes().map_or(0, |b| b.len())
            );
        }
    }
    Ok(())
}
