// ABOUTME: Example application composing an m-send-req from the command line and writing it to a file
// ABOUTME: Attachments are read with resolver::prefetch before the PDU is encoded

pub(crate) use argh::FromArgs;
use mms_pdu::datatypes::{ContentType, MmsVersion};
use mms_pdu::resolver::prefetch;
use mms_pdu::{PduComposer, PduPart, SendReq};
use std::error::Error;
use std::path::PathBuf;

/// Example application to compose an MMS m-send-req
#[derive(FromArgs)]
struct CliArgs {
    /// whether or not to enable debugging
    #[argh(switch, short = 'd')]
    debugging: bool,

    /// the recipient telephone number or e-mail address (repeatable)
    #[argh(option, short = 't')]
    to: Vec<String>,

    /// the sender address (default: inserted by the MMSC)
    #[argh(option, short = 'f')]
    from: Option<String>,

    /// the message subject
    #[argh(option, short = 's')]
    subject: Option<String>,

    /// the message text
    #[argh(option, short = 'm')]
    message: Option<String>,

    /// an image to attach, relative to --dir (repeatable)
    #[argh(option, short = 'i')]
    image: Vec<String>,

    /// directory attachments are read from (default: current directory)
    #[argh(option)]
    dir: Option<PathBuf>,

    /// leave out the generated SMIL presentation
    #[argh(switch)]
    no_smil: bool,

    /// where to write the encoded PDU
    #[argh(option, short = 'o')]
    out: PathBuf,
}

use tracing::Level;
use tracing_subscriber::FmtSubscriber;

fn image_type(name: &str) -> &'static str {
    match name.rsplit('.').next().map(str::to_ascii_lowercase).as_deref() {
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        _ => "image/jpeg",
    }
}

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

    let mut builder = SendReq::builder().mms_version(MmsVersion::V1_2);
    for to in &cli_args.to {
        builder = builder.to(to.as_str());
    }
    if let Some(from) = &cli_args.from {
        builder = builder.from(from.as_str());
    }
    if let Some(subject) = &cli_args.subject {
        builder = builder.subject(subject.as_str());
    }
    if let Some(message) = &cli_args.message {
        let part = PduPart::builder(ContentType::new("text/plain"))
            .charset(mms_pdu::datatypes::Charset::Utf8)
            .content_location("text_0.txt")
            .data(message.clone())
            .build()?;
        builder = builder.part(part);
    }
    for image in &cli_args.image {
        let part = PduPart::builder(ContentType::new(image_type(image)))
            .content_location(image.clone())
            .uri(image.clone())
            .build()?;
        builder = builder.part(part);
    }
    let mut send_req = builder.build()?;

    let dir = cli_args.dir.unwrap_or_else(|| PathBuf::from("."));
    send_req.body = prefetch(&send_req.body, &dir).await?;

    let bytes = PduComposer::new()
        .with_smil(!cli_args.no_smil)
        .make(&send_req)?;
    tokio::fs::write(&cli_args.out, &bytes).await?;

    println!(
        "Wrote {} octets (transaction {}) to {}",
        bytes.len(),
        send_req.transaction_id,
        cli_args.out.display()
    );
    Ok(())
}
