//! 標準入出力の Console 実装

use crate::ports::outbound::Console;
use common::error::Error;
use std::io::{self, BufRead, Write};

/// stdin / stdout を使う Console
#[derive(Debug, Clone, Default)]
pub struct StdConsole;

impl Console for StdConsole {
    fn read_line(&self, prompt: &str) -> Result<Option<String>, Error> {
        let mut out = io::stdout().lock();
        out.write_all(prompt.as_bytes())?;
        out.flush()?;
        drop(out);

        let mut line = String::new();
        let n = io::stdin().lock().read_line(&mut line)?;
        if n == 0 {
            // 入力終端。プロンプトの後で改行しておく
            println!();
            return Ok(None);
        }
        let trimmed_len = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed_len);
        Ok(Some(line))
    }

    fn print_line(&self, line: &str) -> Result<(), Error> {
        let mut out = io::stdout().lock();
        writeln!(out, "{}", line)?;
        out.flush()?;
        Ok(())
    }
}
