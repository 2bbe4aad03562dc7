use crate::service::types::InteractionAction;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Login,
    ShowPreferences,
    SetLanguage(Option<String>),
    SetRegion(Option<String>),
    ToggleCategory(String),
    Save,
    ShowFeed,
    Refresh,
    Interact {
        item_number: usize,
        action: InteractionAction,
    },
    Compose {
        title: String,
        content: String,
    },
    Help,
    Quit,
}

/// Parses one non-empty console line. Errors are user-facing usage hints.
pub fn parse_command(line: &str) -> Result<Command, String> {
    let trimmed = line.trim();
    let (head, rest) = split_head(trimmed);
    match head.to_ascii_lowercase().as_str() {
        "login" => Ok(Command::Login),
        "prefs" | "preferences" => Ok(Command::ShowPreferences),
        "lang" | "language" => Ok(Command::SetLanguage(parse_filter_value(
            rest,
            "lang <code|->",
        )?)),
        "region" => Ok(Command::SetRegion(parse_filter_value(
            rest,
            "region <code|->",
        )?)),
        "toggle" => {
            let category = first_token(rest).ok_or("usage: toggle <category>")?;
            Ok(Command::ToggleCategory(category.to_string()))
        }
        "save" => Ok(Command::Save),
        "feed" => Ok(Command::ShowFeed),
        "refresh" => Ok(Command::Refresh),
        "view" | "read" => parse_interaction(rest, InteractionAction::View, "view <n>"),
        "like" => parse_interaction(rest, InteractionAction::Like, "like <n>"),
        "share" => parse_interaction(rest, InteractionAction::Share, "share <n>"),
        "compose" => parse_compose(rest),
        "help" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        other => Err(format!("unknown command '{}'; try `help`", other)),
    }
}

fn split_head(line: &str) -> (&str, &str) {
    match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (line, ""),
    }
}

fn first_token(rest: &str) -> Option<&str> {
    rest.split_whitespace().next()
}

/// `-` clears the filter back to auto.
fn parse_filter_value(rest: &str, usage: &str) -> Result<Option<String>, String> {
    let value = first_token(rest).ok_or_else(|| format!("usage: {}", usage))?;
    if value == "-" {
        Ok(None)
    } else {
        Ok(Some(value.to_string()))
    }
}

fn parse_interaction(
    rest: &str,
    action: InteractionAction,
    usage: &str,
) -> Result<Command, String> {
    let token = first_token(rest).ok_or_else(|| format!("usage: {}", usage))?;
    let item_number: usize = token
        .parse()
        .map_err(|_| format!("'{}' is not an item number", token))?;
    if item_number == 0 {
        return Err("item numbers start at 1".to_string());
    }
    Ok(Command::Interact {
        item_number,
        action,
    })
}

fn parse_compose(rest: &str) -> Result<Command, String> {
    let Some((title, content)) = rest.split_once("::") else {
        return Err("usage: compose <title> :: <content>".to_string());
    };
    let title = title.trim();
    let content = content.trim();
    if title.is_empty() {
        return Err("a title is required".to_string());
    }
    Ok(Command::Compose {
        title: title.to_string(),
        content: content.to_string(),
    })
}
