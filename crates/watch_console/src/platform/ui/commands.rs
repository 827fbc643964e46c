use watch_core::{ChatId, Msg, View};

pub const HELP: &str = "\
commands:
  dashboard | keywords | chats | settings   switch screen
  endpoint <url>                            save backend url and connect
  forget                                    forget the backend url
  add-keyword <word>    del-keyword <word>
  add-chat <id>         del-chat <id>
  help                                      show this text
  quit                                      exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Msg(Msg),
    Help,
    Quit,
}

/// Maps one input line to a command. Blank lines yield `Ok(None)`.
pub fn parse_line(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    if let Some(view) = View::parse(verb) {
        return Ok(Some(Command::Msg(Msg::Navigate(view))));
    }

    let command = match verb {
        "endpoint" => Command::Msg(Msg::EndpointSubmitted(rest.to_string())),
        "forget" => Command::Msg(Msg::EndpointCleared),
        "add-keyword" => Command::Msg(Msg::KeywordAddRequested(rest.to_string())),
        "del-keyword" => {
            if rest.is_empty() {
                return Err("del-keyword needs a keyword".to_string());
            }
            Command::Msg(Msg::KeywordDeleteRequested(rest.to_string()))
        }
        "add-chat" => Command::Msg(Msg::ChatAddRequested(rest.to_string())),
        "del-chat" => {
            let chat_id = rest
                .parse::<ChatId>()
                .map_err(|_| format!("not a chat id: {rest:?}"))?;
            Command::Msg(Msg::ChatDeleteRequested(chat_id))
        }
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(format!("unknown command {other:?}, try `help`")),
    };
    Ok(Some(command))
}
