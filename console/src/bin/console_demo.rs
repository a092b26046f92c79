// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Runs the console against a simulated event source. Type to chat, `/help` for
//! commands, `exit` or `/quit` to leave.

use std::{io::IsTerminal, path::PathBuf, sync::Arc, time::Duration};

use clap::Parser;
use miette::IntoDiagnostic;
use r3bl_console::{CommandDispatcher, ConsoleConfig, ConsoleEvents, ConsoleHandle,
                   Coordinator, DEFAULT_LOG_FILE_NAME, DEFAULT_TRACING_LOG_FILE_NAME,
                   DisplayPreference, DomainEvent, EchoSink, IgnoreRules, IgnoredMessage,
                   InputDevice, OutputDevice, TracingConfig, WriterArg, tracing_init};

#[derive(Debug, Parser)]
#[command(bin_name = "console_demo")]
#[command(about = "Interactive console with a live event feed")]
#[command(version)]
#[command(next_line_help = true)]
pub struct CLIArg {
    #[arg(long, default_value = "Console", help = "Terminal window title")]
    pub title: String,

    #[arg(long, help = "Append every rendered line to the log file")]
    pub log: bool,

    #[arg(long, default_value = DEFAULT_LOG_FILE_NAME, help = "Where `--log` writes to")]
    pub log_file: PathBuf,

    #[arg(
        long,
        value_name = "WRITER",
        help = "Where diagnostics go: none, console, file. Can be repeated"
    )]
    pub tracing: Vec<WriterArg>,

    #[arg(
        long,
        default_value = DEFAULT_TRACING_LOG_FILE_NAME,
        help = "Where `--tracing file` writes to"
    )]
    pub tracing_file: PathBuf,

    #[arg(
        long,
        value_name = "KIND",
        help = "Hide a family of system messages, eg: system-message, pm-message. Can be repeated"
    )]
    pub ignore: Vec<IgnoredMessage>,

    #[arg(long, default_value = "me", help = "Your own name, used by `--ignore kick-message`")]
    pub username: String,
}

#[tokio::main]
async fn main() -> miette::Result<()> {
    let cli_arg = CLIArg::parse();

    if !std::io::stdout().is_terminal() || !std::io::stdin().is_terminal() {
        miette::bail!("console_demo needs an interactive terminal");
    }

    let config = ConsoleConfig::default()
        .with_title(cli_arg.title.as_str())
        .with_log_file(cli_arg.log_file.clone(), cli_arg.log);

    let mut coordinator = Coordinator::new(
        config,
        OutputDevice::new_stdout(),
        InputDevice::new_event_stream(),
    );
    let handle = coordinator.handle();

    tracing_init::init(
        TracingConfig::new(DisplayPreference::ConsoleWriter(handle.console_writer()))
            .with_writers(cli_arg.tracing.clone())
            .with_log_file_path(cli_arg.tracing_file.clone()),
    )?;
    // % is Display, ? is Debug.
    tracing::debug!(message = "Start console_demo", cli_arg = ?cli_arg);

    if !cli_arg.ignore.is_empty() {
        handle.set_message_filter(Some(
            IgnoreRules::new(cli_arg.ignore.iter().copied())
                .with_own_username(cli_arg.username.as_str())
                .into_filter(),
        ));
    }

    coordinator.bind(Arc::new(DemoDispatcher {
        handle: handle.clone(),
        username: cli_arg.username.clone(),
    }));

    let exit_handle = handle.clone();
    handle.register_custom_command("exit", move |_| exit_handle.request_shutdown());

    coordinator.start().into_diagnostic()?;
    handle.write_notification("Type to chat, /help for commands, exit to leave.");

    let event_source = tokio::spawn(simulate_event_source(handle.clone()));

    coordinator.wait_for_shutdown_request().await;
    event_source.abort();
    coordinator.shutdown().await.into_diagnostic()?;

    tracing::debug!(message = "Stop console_demo");
    Ok(())
}

struct DemoDispatcher {
    handle: ConsoleHandle,
    username: String,
}

impl CommandDispatcher for DemoDispatcher {
    fn dispatch(&self, command_line: &str, echo: EchoSink) {
        let (command, args) = command_line
            .split_once(' ')
            .unwrap_or((command_line, ""));

        match command.to_lowercase().as_str() {
            "say" => self.handle.on_chat(&self.username, args, true),
            "help" => {
                echo.print("/say <text>, /log on|off, /time, /quit. Plain text is chat.");
            }
            "log" => match args.trim() {
                "on" => {
                    self.handle.set_logging(true);
                    echo.print("Logging to file enabled.");
                }
                "off" => {
                    self.handle.set_logging(false);
                    echo.print("Logging to file disabled.");
                }
                _ => echo.print(format!(
                    "Logging is {}.",
                    if self.handle.is_logging() { "on" } else { "off" }
                )),
            },
            "time" => echo.print(chrono::Local::now().to_rfc2822()),
            "quit" => self.handle.request_shutdown(),
            _ => self.handle.write_error(format!("Unknown command: {command}")),
        }
    }
}

/// Stands in for a game server: a fixed script of events, one every couple of seconds.
async fn simulate_event_source(handle: ConsoleHandle) {
    let script = [
        DomainEvent::Info {
            title: "* WORLD".into(),
            text: "Connected to the demo world.".into(),
        },
        DomainEvent::Join {
            username: "alice".into(),
        },
        DomainEvent::Chat {
            chat_name: "alice".into(),
            text: "hello everyone!".into(),
            is_friend: true,
        },
        DomainEvent::Join {
            username: "bob".into(),
        },
        DomainEvent::System {
            title: "* SYSTEM".into(),
            text: "bob can now edit this world.".into(),
        },
        DomainEvent::Chat {
            chat_name: "bob".into(),
            text: "what are we building today?".into(),
            is_friend: false,
        },
        DomainEvent::System {
            title: "* MAGIC".into(),
            text: "A wild effect appears.".into(),
        },
        DomainEvent::Leave {
            username: "alice".into(),
        },
    ];

    let mut interval = tokio::time::interval(Duration::from_secs(2));
    for event in script.iter().cycle() {
        interval.tick().await;
        tracing::trace!(message = "Simulated event", event = ?event);
        handle.on_event(event);
    }
}
