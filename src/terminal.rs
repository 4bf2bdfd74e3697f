use chat_client_core::{ChatBackend, ChatClient, KeyValueStore, Message, MessageView, Theme};
use tokio::io::{self, AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::info;

const HELP: &str = "Type a message and press Enter to send.\n\
                    /new      start a new chat\n\
                    /history  show the conversation again\n\
                    /help     show this help\n\
                    /quit     exit";

/// One line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Send(String),
    New,
    History,
    Help,
    Quit,
    Unknown(String),
    Empty,
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Command::Empty;
        }
        if !trimmed.starts_with('/') {
            return Command::Send(line.to_string());
        }
        match trimmed {
            "/new" | "/reset" => Command::New,
            "/history" => Command::History,
            "/help" => Command::Help,
            "/quit" | "/exit" => Command::Quit,
            other => Command::Unknown(other.to_string()),
        }
    }
}

/// Renders a message as `[U] text` / `[A] text`, indenting continuation
/// lines under the text.
pub fn format_message(message: &Message) -> String {
    let view = MessageView::render(message, Theme::default());
    let mut lines = view.text.lines();
    let mut out = format!("[{}] {}", view.avatar, lines.next().unwrap_or_default());
    for line in lines {
        out.push_str("\n    ");
        out.push_str(line);
    }
    out
}

/// Runs the interactive loop until `/quit` or end of input.
pub async fn run<B, S, R, W>(client: &ChatClient<B, S>, input: R, mut output: W) -> io::Result<()>
where
    B: ChatBackend,
    S: KeyValueStore,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let session_id = client.start().await;
    info!("Active session {session_id}");
    write_line(&mut output, &format!("Session {session_id}. Type /help for commands.")).await?;
    write_messages(&mut output, &client.messages()).await?;

    let mut lines = input.lines();
    loop {
        output.write_all(b"> ").await?;
        output.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        match Command::parse(&line) {
            Command::Send(text) => {
                let before = client.messages().len();
                client.set_input(text);
                if client.submit().await {
                    let replies: Vec<Message> = client
                        .messages()
                        .into_iter()
                        .skip(before)
                        .filter(|m| !m.is_user())
                        .collect();
                    write_messages(&mut output, &replies).await?;
                }
            }
            Command::New => {
                let session_id = client.reset_session().await;
                info!("Started session {session_id}");
                write_line(&mut output, &format!("New chat started (session {session_id}).")).await?;
                write_messages(&mut output, &client.messages()).await?;
            }
            Command::History => {
                let messages = client.messages();
                if messages.is_empty() {
                    write_line(&mut output, "No messages yet.").await?;
                }
                write_messages(&mut output, &messages).await?;
            }
            Command::Help => write_line(&mut output, HELP).await?,
            Command::Quit => break,
            Command::Unknown(cmd) => {
                write_line(&mut output, &format!("Unknown command {cmd}, try /help")).await?
            }
            Command::Empty => {}
        }
    }

    output.flush().await
}

async fn write_messages<W: AsyncWrite + Unpin>(output: &mut W, messages: &[Message]) -> io::Result<()> {
    for message in messages {
        write_line(output, &format_message(message)).await?;
    }
    Ok(())
}

async fn write_line<W: AsyncWrite + Unpin>(output: &mut W, line: &str) -> io::Result<()> {
    output.write_all(line.as_bytes()).await?;
    output.write_all(b"\n").await
}
