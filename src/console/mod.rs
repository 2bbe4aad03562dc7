pub mod commands;
pub mod render;

use anyhow::Result;
use futures_util::StreamExt;
use tokio::io::AsyncBufReadExt;
use tokio_stream::wrappers::LinesStream;

use crate::{app::App, preferences::DraftEdit, service::types::ArticleId};

use commands::{Command, parse_command};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    Quit,
    StdinClosed,
    Interrupted,
}

/// Line-oriented driver over stdin. Data goes to stdout, operational
/// messages to stderr, structured events to the tracing pipeline.
pub async fn run(mut app: App) -> Result<ExitReason> {
    let reader = tokio::io::BufReader::new(tokio::io::stdin());
    let mut lines = LinesStream::new(reader.lines());

    eprintln!("gazette console. `help` lists commands; `login` starts an anonymous session.");

    loop {
        eprint!("> ");
        tokio::select! {
            maybe_line = lines.next() => {
                let Some(line) = maybe_line else {
                    eprintln!("stdin closed; exiting.");
                    return Ok(ExitReason::StdinClosed);
                };
                let line = line?;
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                match parse_command(trimmed) {
                    Ok(Command::Quit) => {
                        eprintln!("bye.");
                        return Ok(ExitReason::Quit);
                    }
                    Ok(command) => execute(&mut app, command).await,
                    Err(message) => eprintln!("{}", message),
                }
            }
            _ = tokio::signal::ctrl_c() => {
                eprintln!("interrupted; exiting.");
                return Ok(ExitReason::Interrupted);
            }
        }
    }
}

async fn execute(app: &mut App, command: Command) {
    match command {
        Command::Login => match app.sign_in().await {
            Ok(report) => {
                println!(
                    "signed in as {}",
                    render::short_user_id(&report.session.user_id)
                );
                if let Some(err) = report.preferences_error {
                    eprintln!(
                        "preferences load failed: {}",
                        render::service_error_line(&err)
                    );
                }
                if let Some(err) = report.feed_error {
                    eprintln!("feed refresh failed: {}", render::service_error_line(&err));
                }
                println!("{}", render::feed_block(&app.feed_view()));
            }
            Err(err) => eprintln!("sign-in failed: {}", render::app_error_line(&err)),
        },
        Command::ShowPreferences => {
            let store = app.preferences();
            println!(
                "{}",
                render::preferences_block(store.confirmed(), store.draft())
            );
            println!("{}", render::catalogs_block());
        }
        Command::SetLanguage(value) => apply_edit(app, DraftEdit::SetLanguage(value)),
        Command::SetRegion(value) => apply_edit(app, DraftEdit::SetRegion(value)),
        Command::ToggleCategory(category) => apply_edit(app, DraftEdit::ToggleCategory(category)),
        Command::Save => match app.save_preferences().await {
            Ok(outcome) => {
                println!("preferences saved.");
                if let Some(err) = outcome.refresh_error {
                    eprintln!("feed refresh failed: {}", render::service_error_line(&err));
                } else if outcome.refreshed {
                    println!("{}", render::feed_block(&app.feed_view()));
                }
            }
            Err(err) => eprintln!("save failed: {}", render::app_error_line(&err)),
        },
        Command::ShowFeed => println!("{}", render::feed_block(&app.feed_view())),
        Command::Refresh => match app.refresh_feed().await {
            Ok(()) => println!("{}", render::feed_block(&app.feed_view())),
            Err(err) => eprintln!("refresh failed: {}", render::app_error_line(&err)),
        },
        Command::Interact {
            item_number,
            action,
        } => {
            let Some(article_id) = item_id_by_number(app, item_number) else {
                eprintln!("no item {} in the current feed.", item_number);
                return;
            };
            match app.record_interaction(article_id, action).await {
                Ok(report) => {
                    match report.interaction_error {
                        Some(err) => eprintln!(
                            "{} failed: {}",
                            action.as_str(),
                            render::service_error_line(&err)
                        ),
                        None => println!("{} recorded.", action.as_str()),
                    }
                    match report.refresh_error {
                        Some(err) => {
                            eprintln!("feed refresh failed: {}", render::service_error_line(&err))
                        }
                        None => println!("{}", render::feed_block(&app.feed_view())),
                    }
                }
                Err(err) => eprintln!(
                    "{} failed: {}",
                    action.as_str(),
                    render::app_error_line(&err)
                ),
            }
        }
        Command::Compose { title, content } => {
            let draft = app.article_draft_from_preferences(title, content);
            match app.publish(draft).await {
                Ok(article) => println!(
                    "published \"{}\" as {}. `refresh` to fetch the feed again.",
                    article.title, article.id
                ),
                Err(err) => eprintln!("publish failed: {}", render::app_error_line(&err)),
            }
        }
        Command::Help => println!("{}", HELP_TEXT),
        // Quit never reaches here; the loop intercepts it.
        Command::Quit => {}
    }
}

fn apply_edit(app: &mut App, edit: DraftEdit) {
    match app.edit_draft(edit) {
        Ok(()) => {
            let store = app.preferences();
            println!(
                "{}",
                render::preferences_block(store.confirmed(), store.draft())
            );
        }
        Err(err) => eprintln!("{}", render::app_error_line(&err)),
    }
}

fn item_id_by_number(app: &App, item_number: usize) -> Option<ArticleId> {
    app.feed_view()
        .items
        .get(item_number - 1)
        .map(|item| item.id.clone())
}

const HELP_TEXT: &str = "\
commands:
  login                       start an anonymous session and fetch the feed
  prefs                       show confirmed and draft preferences
  lang <code|->               set the draft language (- for auto)
  region <code|->             set the draft region (- for auto)
  toggle <category>           toggle a draft category
  save                        save the draft preferences
  feed                        show the current feed
  refresh                     fetch the feed again
  view|like|share <n>         record an interaction with the n-th item
  compose <title> :: <text>   publish an article
  help                        this text
  quit                        leave";
