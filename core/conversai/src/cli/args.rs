use crate::adapter::MemoryOverrides;
use crate::domain::Command;
use clap::builder::ArgAction;
use clap::value_parser;
use clap_complete::Shell;
use common::domain::ModelName;
use common::error::Error;
use common::llm::{ClientSettings, ProviderKind};
use std::ffi::OsString;
use std::path::PathBuf;

const BIN_NAME: &str = "conversai";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub help: bool,
    /// -v / --verbose: ログを stderr にも出す
    pub verbose: bool,
    /// -f / --memory-file
    pub memory_file: Option<PathBuf>,
    /// -t / --summarize-threshold: この文字数を超える応答を要約する
    pub summarize_threshold: Option<usize>,
    /// -n / --history-limit: 保持する発言数の上限
    pub history_limit: Option<usize>,
    pub provider: Option<ProviderKind>,
    pub model: Option<ModelName>,
    pub endpoint: Option<String>,
    /// 最初の位置引数（chat / say / history / log / export / clear）
    pub command: Option<String>,
    pub args: Vec<String>,
}

impl Config {
    /// CLI で指定されたクライアント設定（settings.json より優先）
    pub fn client_overrides(&self) -> ClientSettings {
        ClientSettings {
            provider: self.provider,
            endpoint: self.endpoint.clone(),
            model: self.model.as_ref().map(|m| m.to_string()),
            ..ClientSettings::default()
        }
    }

    /// CLI で指定されたメモリ設定（settings.json より優先）
    pub fn memory_overrides(&self) -> MemoryOverrides {
        MemoryOverrides {
            memory_file: self.memory_file.clone(),
            summarize_threshold: self.summarize_threshold,
            history_limit: self.history_limit,
        }
    }
}

/// 解析結果: 通常の Config / 補完スクリプト生成
#[derive(Debug, Clone)]
pub enum ParseOutcome {
    Config(Config),
    GenerateCompletion(Shell),
}

fn parse_provider(s: &str) -> Result<ProviderKind, String> {
    ProviderKind::parse(s).map_err(|e| e.to_string())
}

pub fn build_clap_command() -> clap::Command {
    clap::Command::new(BIN_NAME)
        .about("Chat with a hosted language model, remembering the conversation in a JSON file")
        .disable_help_flag(true)
        .arg(
            clap::Arg::new("help")
                .short('h')
                .long("help")
                .help("Show this help message")
                .action(ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Also write logs to stderr")
                .action(ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("memory-file")
                .short('f')
                .long("memory-file")
                .value_name("path")
                .help("Memory file to read and write (default: memory.json)")
                .value_parser(value_parser!(PathBuf))
                .num_args(1),
        )
        .arg(
            clap::Arg::new("summarize-threshold")
                .short('t')
                .long("summarize-threshold")
                .value_name("chars")
                .help("Summarize replies longer than this many characters (default: 500)")
                .value_parser(value_parser!(usize))
                .num_args(1),
        )
        .arg(
            clap::Arg::new("history-limit")
                .short('n')
                .long("history-limit")
                .value_name("turns")
                .help("Number of turns to remember (default: 20)")
                .value_parser(value_parser!(usize))
                .num_args(1),
        )
        .arg(
            clap::Arg::new("provider")
                .short('p')
                .long("provider")
                .value_name("provider")
                .help("Model provider (groq, echo)")
                .value_parser(parse_provider)
                .num_args(1),
        )
        .arg(
            clap::Arg::new("model")
                .short('m')
                .long("model")
                .value_name("model")
                .help("Model name (default: llama-3.3-70b-versatile)")
                .num_args(1),
        )
        .arg(
            clap::Arg::new("endpoint")
                .short('e')
                .long("endpoint")
                .value_name("url")
                .help("Chat completions endpoint URL")
                .num_args(1),
        )
        .arg(
            clap::Arg::new("generate")
                .long("generate")
                .value_name("shell")
                .help("Generate shell completion script")
                .value_parser(value_parser!(Shell))
                .num_args(1),
        )
        .arg(
            clap::Arg::new("positional")
                .index(1)
                .help("Command (chat, say, history, log, export, clear) then its arguments")
                .num_args(0..)
                .trailing_var_arg(true),
        )
}

fn matches_to_config(matches: &clap::ArgMatches) -> Config {
    let positional: Vec<String> = matches
        .get_many::<String>("positional")
        .map(|i| i.cloned().collect())
        .unwrap_or_default();
    let (command, args) = match positional.split_first() {
        Some((first, rest)) => (Some(first.clone()), rest.to_vec()),
        None => (None, vec![]),
    };

    Config {
        help: matches.get_flag("help"),
        verbose: matches.get_flag("verbose"),
        memory_file: matches.get_one::<PathBuf>("memory-file").cloned(),
        summarize_threshold: matches.get_one::<usize>("summarize-threshold").copied(),
        history_limit: matches.get_one::<usize>("history-limit").copied(),
        provider: matches.get_one::<ProviderKind>("provider").copied(),
        model: matches
            .get_one::<String>("model")
            .map(|s| ModelName::new(s.clone())),
        endpoint: matches.get_one::<String>("endpoint").cloned(),
        command,
        args,
    }
}

fn parse_outcome_from<I, T>(args: I) -> Result<ParseOutcome, Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = build_clap_command()
        .try_get_matches_from(args)
        .map_err(|e| Error::invalid_argument(e.to_string()))?;

    if let Some(&shell) = matches.get_one::<Shell>("generate") {
        return Ok(ParseOutcome::GenerateCompletion(shell));
    }
    Ok(ParseOutcome::Config(matches_to_config(&matches)))
}

/// コマンドラインを解析する。補完生成が要求された場合は ParseOutcome::GenerateCompletion を返す。
pub fn parse_args() -> Result<ParseOutcome, Error> {
    parse_outcome_from(std::env::args_os())
}

/// テスト用: 引数スライスから解析する
#[cfg(test)]
pub fn parse_args_from(args: &[&str]) -> Result<Config, Error> {
    match parse_outcome_from(args.iter().copied())? {
        ParseOutcome::Config(config) => Ok(config),
        ParseOutcome::GenerateCompletion(shell) => Err(Error::invalid_argument(format!(
            "unexpected completion request for {}",
            shell
        ))),
    }
}

/// 補完スクリプトを標準出力に出力する。
pub fn print_completion(shell: Shell) {
    let mut cmd = build_clap_command();
    clap_complete::generate(shell, &mut cmd, BIN_NAME, &mut std::io::stdout());
}

/// Config を Command に変換する
pub fn config_to_command(config: &Config) -> Result<Command, Error> {
    if config.help {
        return Ok(Command::Help);
    }
    let Some(name) = config.command.as_deref() else {
        return Ok(Command::Chat);
    };
    let no_args = |cmd: Command| {
        if config.args.is_empty() {
            Ok(cmd)
        } else {
            Err(Error::invalid_argument(format!(
                "'{}' takes no arguments",
                name
            )))
        }
    };
    match name {
        "chat" => no_args(Command::Chat),
        "help" => Ok(Command::Help),
        "history" => no_args(Command::History),
        "log" => no_args(Command::Log),
        "clear" => no_args(Command::Clear),
        "say" => {
            let message = config.args.join(" ");
            if message.trim().is_empty() {
                return Err(Error::invalid_argument("No message provided for 'say'."));
            }
            Ok(Command::Say { message })
        }
        "export" => match config.args.as_slice() {
            [dest] => Ok(Command::Export {
                dest: PathBuf::from(dest),
            }),
            [] => Err(Error::invalid_argument("'export' requires a destination path")),
            _ => Err(Error::invalid_argument("'export' takes exactly one path")),
        },
        other => Err(Error::invalid_argument(format!(
            "Unknown command '{}'. Expected one of: chat, say, history, log, export, clear",
            other
        ))),
    }
}
