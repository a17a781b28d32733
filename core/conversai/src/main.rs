mod adapter;
mod cli;
mod domain;
mod ports;
mod usecase;
mod wiring;

#[cfg(test)]
mod tests;

use std::io::{self, Write};
use std::process;

use adapter::terminal_view::{
    view_error, write_export, write_notice, write_record, write_reply, write_transcript,
};
use cli::{config_to_command, parse_args, print_completion, Config, ParseOutcome};
use common::error::Error;
use common::ports::outbound::{LogLevel, LogRecord};
use domain::Command;
use ports::inbound::UseCaseRunner;
use usecase::interactive::InteractiveLoop;
use wiring::{wire, App};

/// Command をディスパッチする Runner（match は main レイヤーに集約）
struct Runner {
    app: App,
}

impl UseCaseRunner for Runner {
    fn run(&mut self, config: Config) -> Result<i32, Error> {
        let cmd = config_to_command(&config)?;
        let command_name = cmd_name_for_log(&cmd);
        let _ = self.app.logger.log(
            &LogRecord::new(LogLevel::Info, "cli", "lifecycle", "command started")
                .with_field("command", command_name),
        );

        let result = self.dispatch(cmd);

        let code = result.as_ref().copied().unwrap_or(0);
        let _ = self.app.logger.log(
            &LogRecord::new(LogLevel::Info, "cli", "lifecycle", "command finished")
                .with_field("command", command_name)
                .with_field("exit_code", code),
        );
        if let Err(ref e) = result {
            let _ = self
                .app
                .logger
                .log(&LogRecord::new(LogLevel::Error, "cli", "error", e.to_string()));
        }
        result
    }
}

impl Runner {
    fn dispatch(&mut self, cmd: Command) -> Result<i32, Error> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        match cmd {
            Command::Help => print_help(),
            Command::Chat => {
                let stdin = io::stdin();
                let mut input = stdin.lock();
                let logger = self.app.logger.clone();
                InteractiveLoop::new(&mut self.app.chat, logger).run(&mut input, &mut out)?;
            }
            Command::Say { message } => {
                if let Some(reply) = self.app.chat.send(&message)? {
                    write_reply(&mut out, &reply).map_err(view_error)?;
                }
            }
            Command::History => {
                write_transcript(&mut out, &self.app.chat.transcript()).map_err(view_error)?
            }
            Command::Log => {
                let record = self.app.chat.memory_log()?;
                write_record(&mut out, record.as_deref()).map_err(view_error)?;
            }
            Command::Export { dest } => {
                let exported = self.app.chat.export(&dest)?;
                write_export(&mut out, &dest, exported).map_err(view_error)?;
            }
            Command::Clear => {
                self.app.chat.reset()?;
                write_notice(&mut out, "Memory cleared.").map_err(view_error)?;
            }
        }
        out.flush()
            .map_err(|e| Error::io_msg(format!("flush stdout: {}", e)))?;
        Ok(0)
    }
}

fn cmd_name_for_log(cmd: &Command) -> &'static str {
    match cmd {
        Command::Help => "help",
        Command::Chat => "chat",
        Command::Say { .. } => "say",
        Command::History => "history",
        Command::Log => "log",
        Command::Export { .. } => "export",
        Command::Clear => "clear",
    }
}

fn main() {
    let exit_code = match run() {
        Ok(code) => code,
        Err(e) => {
            if e.is_usage() {
                print_usage();
            }
            eprintln!("conversai: {}", e);
            e.exit_code()
        }
    };
    process::exit(exit_code);
}

pub fn run() -> Result<i32, Error> {
    let config = match parse_args()? {
        ParseOutcome::Config(c) => c,
        ParseOutcome::GenerateCompletion(shell) => {
            print_completion(shell);
            return Ok(0);
        }
    };
    // help は配線（設定ファイル・ログの準備）なしで表示する
    if config_to_command(&config)? == Command::Help {
        print_help();
        return Ok(0);
    }
    let app = wire(&config)?;
    let mut runner = Runner { app };
    runner.run(config)
}

fn print_usage() {
    eprintln!("Usage: conversai [options] [command] [args...]");
}

fn print_help() {
    println!("Usage: conversai [options] [command] [args...]");
    println!("Commands:");
    println!("  chat                          Interactive chat (default when no command is given)");
    println!("  say <message...>              Send one message and print the reply");
    println!("  history                       Show the remembered conversation");
    println!("  log                           Show the raw memory file");
    println!("  export <path>                 Write the memory file to <path>");
    println!("  clear                         Forget the whole conversation");
    println!("Options:");
    println!("  -h, --help                    Show this help message");
    println!("  -f, --memory-file <path>      Memory file (default: memory.json)");
    println!("  -t, --summarize-threshold <n> Summarize replies longer than n characters (default: 500)");
    println!("  -n, --history-limit <n>       Number of turns to remember (default: 20)");
    println!("  -p, --provider <provider>     Model provider: groq (default) or echo");
    println!("  -m, --model <model>           Model name (default: llama-3.3-70b-versatile)");
    println!("  -e, --endpoint <url>          Chat completions endpoint URL");
    println!("  -v, --verbose                 Also write logs to stderr");
    println!("  --generate <shell>            Generate shell completion script (bash, zsh, fish)");
    println!();
    println!("Environment:");
    println!("  GROQ_API_KEY      Bearer token for the endpoint");
    println!("  GROQ_ENDPOINT     Endpoint URL when neither -e nor settings.json sets one");
    println!("  CONVERSAI_HOME    Directory for settings.json and logs/.");
    println!("                    If unset, $XDG_CONFIG_HOME/conversai and $XDG_STATE_HOME/conversai are used.");
    println!();
    println!("Chat commands:");
    println!("  /history /log /export <path> /clear /help /quit");
    println!();
    println!("Examples:");
    println!("  conversai");
    println!("  conversai say What is the Rust borrow checker?");
    println!("  conversai -f work.json -n 10 history");
    println!("  conversai -p echo say testing without network");
}
