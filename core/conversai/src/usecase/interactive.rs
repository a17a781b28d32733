//! 対話ループ: 1 行読むごとに ReplInput として解釈し、ChatUseCase を呼ぶ
//!
//! 通信失敗は表示して続行する。メモリファイルの書き込み失敗と表示の失敗はループを止めて Err を返す。

use crate::adapter::terminal_view::{
    view_error, write_export, write_notice, write_prompt, write_record, write_repl_help,
    write_reply, write_transcript,
};
use crate::domain::ReplInput;
use crate::usecase::chat::ChatUseCase;
use common::error::Error;
use common::ports::outbound::{Log, LogLevel, LogRecord};
use std::io::{BufRead, Write};
use std::sync::Arc;

/// ループの終わり方
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplExit {
    /// /quit または /exit
    Quit,
    /// 入力の終端
    Eof,
}

pub struct InteractiveLoop<'a> {
    chat: &'a mut ChatUseCase,
    log: Arc<dyn Log>,
}

impl<'a> InteractiveLoop<'a> {
    pub fn new(chat: &'a mut ChatUseCase, log: Arc<dyn Log>) -> Self {
        Self { chat, log }
    }

    pub fn run(&mut self, input: &mut dyn BufRead, out: &mut dyn Write) -> Result<ReplExit, Error> {
        write_notice(
            out,
            &format!(
                "ConversAI ({}, {} turns remembered). Type /help for commands.",
                self.chat.client_name(),
                self.chat.history().len()
            ),
        )
        .map_err(view_error)?;

        let mut line = String::new();
        loop {
            write_prompt(out).map_err(view_error)?;
            line.clear();
            let n = input
                .read_line(&mut line)
                .map_err(|e| Error::io_msg(format!("read input: {}", e)))?;
            if n == 0 {
                write_notice(out, "").map_err(view_error)?;
                return Ok(ReplExit::Eof);
            }
            if let Some(exit) = self.handle(ReplInput::parse(&line), out)? {
                return Ok(exit);
            }
        }
    }

    fn handle(&mut self, input: ReplInput, out: &mut dyn Write) -> Result<Option<ReplExit>, Error> {
        match input {
            ReplInput::Empty => {}
            ReplInput::Quit => return Ok(Some(ReplExit::Quit)),
            ReplInput::Help => write_repl_help(out).map_err(view_error)?,
            ReplInput::History => write_transcript(out, &self.chat.transcript()).map_err(view_error)?,
            ReplInput::Log => {
                let record = self.chat.memory_log()?;
                write_record(out, record.as_deref()).map_err(view_error)?;
            }
            ReplInput::Export(dest) => match self.chat.export(&dest) {
                Ok(exported) => write_export(out, &dest, exported).map_err(view_error)?,
                Err(e) => self.show_error(out, &e)?,
            },
            ReplInput::Clear => {
                self.chat.reset()?;
                write_notice(out, "Memory cleared.").map_err(view_error)?;
            }
            ReplInput::Invalid(text) => {
                write_notice(out, &format!("Unknown command: {} (try /help)", text)).map_err(view_error)?
            }
            ReplInput::Message(text) => match self.chat.send(&text) {
                Ok(Some(reply)) => write_reply(out, &reply).map_err(view_error)?,
                Ok(None) => {}
                Err(e @ Error::Http(_)) => self.show_error(out, &e)?,
                Err(e) => return Err(e),
            },
        }
        Ok(None)
    }

    fn show_error(&self, out: &mut dyn Write, e: &Error) -> Result<(), Error> {
        let _ = self.log.log(
            &LogRecord::new(LogLevel::Warn, "usecase", "repl", e.to_string())
                .with_field("exit_code", e.exit_code()),
        );
        write_notice(out, &format!("error: {}", e)).map_err(view_error)
    }
}
