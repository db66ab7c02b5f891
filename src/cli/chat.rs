use anyhow::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use crate::ai::chat::models::channel_id;
use crate::ai::chat::{Chat, ConversationStore, SendOutcome, SkipReason};
use crate::api::AppState;
use crate::core::AppConfig;

const HELP: &str = "Commands:
  /channels      list channels
  /new NAME      create a channel
  /join ID       switch to a channel
  /help          show this message
  /quit          exit";

#[derive(Debug, PartialEq)]
enum Input {
    Message(String),
    Channels,
    NewChannel(String),
    Join(String),
    Help,
    Quit,
    Unknown(String),
}

fn parse_line(line: &str) -> Input {
    let trimmed = line.trim();
    let Some(command) = trimmed.strip_prefix('/') else {
        return Input::Message(line.to_string());
    };

    let (name, arg) = match command.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (command, ""),
    };

    match name {
        "channels" => Input::Channels,
        "new" => Input::NewChannel(arg.to_string()),
        "join" => Input::Join(arg.to_string()),
        "help" => Input::Help,
        "quit" | "exit" => Input::Quit,
        other => Input::Unknown(other.to_string()),
    }
}

fn print_channels(chat: &Chat) {
    let snapshot = chat.conversation().snapshot();
    for channel in snapshot.channels() {
        let marker = if snapshot.active_channel_id() == Some(channel.id.as_str()) {
            "*"
        } else {
            " "
        };
        println!(
            "{} #{} ({} messages)",
            marker,
            channel.id,
            channel.messages.len()
        );
    }
}

fn print_history(chat: &Chat) {
    let snapshot = chat.conversation().snapshot();
    for msg in snapshot.messages() {
        println!("[{:?}] {}", msg.role, msg.content);
    }
}

/// Creates the channel if needed and switches to it. A blank name
/// keeps the current channel.
fn open_channel(conversation: &ConversationStore, name: &str) {
    if name.trim().is_empty() {
        return;
    }
    conversation.add_channel(name);
    conversation.select_channel(&channel_id(name));
}

async fn send(chat: &Chat, content: &str) {
    match chat.send(content).await {
        SendOutcome::Replied { reply, .. } | SendOutcome::Failed { reply, .. } => {
            println!("{}", reply.content)
        }
        SendOutcome::Skipped {
            reason: SkipReason::NoActiveChannel,
        } => println!("No channel selected. Use /join ID to pick one."),
        SendOutcome::Skipped {
            reason: SkipReason::Busy,
        } => println!("Still waiting on the last response."),
        SendOutcome::Skipped {
            reason: SkipReason::EmptyMessage,
        } => {}
    }
}

pub async fn run(config: AppConfig, channel: Option<String>) -> Result<()> {
    let chat = AppState::load(config).await?.chat;

    if !chat.settings().is_configured() {
        println!("No API key configured. Run `chatroom settings set --api-key KEY` first.");
    }

    if let Some(name) = channel {
        open_channel(chat.conversation(), &name);
    }
    print_history(&chat);

    let mut rl = DefaultEditor::new()?;

    loop {
        let prompt = match chat.conversation().snapshot().active_channel_id() {
            Some(id) => format!("#{} >>> ", id),
            None => ">>> ".to_string(),
        };

        match rl.readline(&prompt) {
            Ok(line) => {
                let _ = rl.add_history_entry(line.as_str());
                match parse_line(&line) {
                    Input::Message(content) => send(&chat, &content).await,
                    Input::Channels => print_channels(&chat),
                    Input::NewChannel(name) => {
                        let before = chat.conversation().snapshot().channels().len();
                        let after = chat.conversation().add_channel(&name).channels().len();
                        if after > before {
                            println!("Created #{}", channel_id(&name));
                        } else {
                            println!("Channel name is empty or already taken.");
                        }
                    }
                    Input::Join(id) => {
                        let snapshot = chat.conversation().select_channel(&id);
                        if snapshot.active_channel().is_some() {
                            print_history(&chat);
                        } else {
                            println!("No channel #{}", id);
                        }
                    }
                    Input::Help => println!("{}", HELP),
                    Input::Quit => break,
                    Input::Unknown(name) => println!("Unknown command /{}. Try /help.", name),
                }
            }
            Err(ReadlineError::Interrupted) => break,
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }

    Ok(())
}
