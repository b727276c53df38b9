use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use rsvp_calendar::{
    CalendarActionResults, CalendarItem, CalendarResponseMessage, CreateItemService,
    DispositionRequest, FolderTarget, HttpItemService, ItemId, ResponseError, ResponseObject,
};
use rsvp_core::{AppError, Config};

#[derive(Parser)]
#[command(name = "rsvp", about = "Respond to a meeting invitation")]
struct Cli {
    #[command(subcommand)]
    response: Response,

    /// Id of the meeting request or calendar item
    #[arg(long)]
    item: String,

    #[arg(long)]
    change_key: Option<String>,

    /// You organize this meeting (required to cancel it)
    #[arg(long)]
    organizer: bool,

    /// Message body to include with the reply
    #[arg(long)]
    body: Option<String>,

    #[arg(long, value_enum, default_value_t = Disposition::SendAndSaveCopy)]
    disposition: Disposition,

    /// Well-known folder for the saved copy (overrides the configured default).
    /// Not accepted with `--disposition send`.
    #[arg(long)]
    folder: Option<String>,
}

#[derive(Subcommand)]
enum Response {
    Accept,
    Tentative,
    Decline,
    /// Cancel a meeting you organize
    Cancel,
}

#[derive(Clone, Copy, ValueEnum)]
enum Disposition {
    Save,
    Send,
    SendAndSaveCopy,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("rsvp failed: {}", err);
            eprintln!("{}", err.user_message());
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), AppError> {
    rsvp_core::init()?;

    let (config, _) = Config::load_validated()?;
    let request = disposition_request(&cli, &config)?;
    let service = HttpItemService::from_config(&config)?;

    let item = reference_item(&cli);
    let results = match cli.response {
        Response::Accept => {
            dispatch(&cli, item.create_accept_message(&service, false)?, request).await?
        }
        Response::Tentative => {
            dispatch(&cli, item.create_accept_message(&service, true)?, request).await?
        }
        Response::Decline => {
            dispatch(&cli, item.create_decline_message(&service)?, request).await?
        }
        Response::Cancel => {
            dispatch(&cli, item.create_cancel_meeting_message(&service)?, request).await?
        }
    };

    print_results(&results);
    Ok(())
}

/// The item is not fetched, so organizer state comes from the command line.
fn reference_item(cli: &Cli) -> CalendarItem {
    let mut item_id = ItemId::new(cli.item.clone());
    if let Some(change_key) = &cli.change_key {
        item_id = item_id.with_change_key(change_key);
    }
    let mut item = CalendarItem::new(item_id);
    item.is_organizer = cli.organizer;
    item
}

/// Only the dispositions that keep a copy consult a folder, explicit or
/// configured.
fn disposition_request(cli: &Cli, config: &Config) -> Result<DispositionRequest, ResponseError> {
    let responses = &config.responses;
    match cli.disposition {
        Disposition::Send if cli.folder.is_some() => Err(ResponseError::invalid_argument(
            "folder",
            "a sent response keeps no copy; use send-and-save-copy to choose a folder",
        )),
        Disposition::Send => Ok(DispositionRequest::Send),
        Disposition::Save => Ok(DispositionRequest::Save(folder_target(
            cli,
            responses.default_save_folder.as_deref(),
        )?)),
        Disposition::SendAndSaveCopy => Ok(DispositionRequest::SendAndSaveCopy(folder_target(
            cli,
            responses.default_copy_folder.as_deref(),
        )?)),
    }
}

fn folder_target(cli: &Cli, configured: Option<&str>) -> Result<FolderTarget, ResponseError> {
    FolderTarget::from_config(cli.folder.as_deref().or(configured))
}

async fn dispatch<S, M>(
    cli: &Cli,
    mut message: CalendarResponseMessage<'_, S, M>,
    request: DispositionRequest,
) -> Result<CalendarActionResults, ResponseError>
where
    S: CreateItemService,
    M: ResponseObject,
{
    if let Some(body) = &cli.body {
        message = message.with_body(body.clone());
    }
    message.dispose(request).await
}

fn print_results(results: &CalendarActionResults) {
    if results.is_empty() {
        println!("Done. The server reported no new or changed items.");
        return;
    }

    let slots = [
        ("Response copy", results.response_copy()),
        ("Original item", results.original_item()),
        ("Calendar item", results.calendar_item()),
    ];
    for (label, item) in slots {
        if let Some(item) = item {
            println!(
                "{}: {} ({:?}){}",
                label,
                item.item_id.id,
                item.kind,
                item.subject
                    .as_deref()
                    .map(|s| format!(" \"{}\"", s))
                    .unwrap_or_default()
            );
        }
    }
    for item in results.unclassified() {
        tracing::info!("Other item: {} ({:?})", item.item_id.id, item.kind);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rsvp_calendar::WellKnownFolderName;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(["rsvp", "--item", "AAMkAD="].into_iter().chain(args.iter().copied()))
    }

    fn config_with_folders(save: &str, copy: &str) -> Config {
        let mut config = Config::default();
        config.responses.default_save_folder = Some(save.to_string());
        config.responses.default_copy_folder = Some(copy.to_string());
        config
    }

    #[test]
    fn test_send_ignores_configured_folders() {
        let config = config_with_folders("not-a-folder", "also-not-a-folder");
        let request = disposition_request(&cli(&["--disposition", "send", "accept"]), &config);
        assert_eq!(request.unwrap(), DispositionRequest::Send);
    }

    #[test]
    fn test_send_rejects_explicit_folder() {
        let cli = cli(&["--disposition", "send", "--folder", "drafts", "decline"]);
        let err = disposition_request(&cli, &Config::default()).unwrap_err();
        assert_eq!(err.param(), Some("folder"));
    }

    #[test]
    fn test_save_uses_configured_save_folder() {
        let config = config_with_folders("drafts", "sentitems");
        let request = disposition_request(&cli(&["--disposition", "save", "accept"]), &config);
        assert_eq!(
            request.unwrap(),
            DispositionRequest::Save(FolderTarget::WellKnown(WellKnownFolderName::Drafts))
        );
    }

    #[test]
    fn test_explicit_folder_overrides_configured_copy_folder() {
        let config = config_with_folders("drafts", "sentitems");
        let request = disposition_request(&cli(&["--folder", "inbox", "tentative"]), &config);
        assert_eq!(
            request.unwrap(),
            DispositionRequest::SendAndSaveCopy(FolderTarget::WellKnown(
                WellKnownFolderName::Inbox
            ))
        );
    }

    #[test]
    fn test_unknown_configured_folder_fails_before_sending() {
        let config = config_with_folders("drafts", "nowhere");
        let err = disposition_request(&cli(&["accept"]), &config).unwrap_err();
        assert_eq!(err.param(), Some("folder_name"));
    }

    #[test]
    fn test_cancel_requires_organizer_flag() {
        let service = HttpItemService::new("http://localhost:1", None);

        let item = reference_item(&cli(&["cancel"]));
        assert!(!item.is_organizer);
        assert!(matches!(
            item.create_cancel_meeting_message(&service),
            Err(ResponseError::InvalidOperation(_))
        ));

        let item = reference_item(&cli(&["--organizer", "cancel"]));
        assert!(item.create_cancel_meeting_message(&service).is_ok());
    }

    #[test]
    fn test_organizer_cannot_accept() {
        let service = HttpItemService::new("http://localhost:1", None);
        let item = reference_item(&cli(&["--organizer", "--change-key", "CQAAAB", "accept"]));
        assert_eq!(item.item_id.change_key.as_deref(), Some("CQAAAB"));
        assert!(matches!(
            item.create_accept_message(&service, false),
            Err(ResponseError::InvalidOperation(_))
        ));
    }
}
