pub mod commands;
pub mod render;

use std::{
    io::{self, BufRead, Write},
    thread,
};

use tokio::sync::mpsc;

use crate::infrastructure::shutdown::ShutdownListener;

pub use commands::{parse, Command};

const BLOCK_TERMINATOR: &str = ".";
const LINE_BUFFER: usize = 16;

/// Line-oriented terminal front end. Every read gives up once shutdown is
/// signalled.
pub struct Console {
    lines: mpsc::Receiver<String>,
    shutdown: ShutdownListener,
}

impl Console {
    /// Reads stdin on its own OS thread so a blocked read never holds the
    /// runtime open at exit.
    pub fn stdin(shutdown: ShutdownListener) -> io::Result<Self> {
        let (sender, receiver) = mpsc::channel(LINE_BUFFER);
        thread::Builder::new()
            .name("stdin-reader".into())
            .spawn(move || forward_lines(io::stdin().lock(), sender))?;
        Ok(Self::from_lines(receiver, shutdown))
    }

    pub fn from_lines(lines: mpsc::Receiver<String>, shutdown: ShutdownListener) -> Self {
        Self { lines, shutdown }
    }

    pub fn prompt(&self, marker: &str) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        write!(stdout, "{marker}")?;
        stdout.flush()
    }

    /// Next line of input; `None` on end of input or shutdown.
    pub async fn read_line(&mut self) -> Option<String> {
        tokio::select! {
            line = self.lines.recv() => line,
            _ = self.shutdown.notified() => None,
        }
    }

    /// Reads lines until a lone `.`; `None` if input ends first.
    pub async fn read_block(&mut self) -> io::Result<Option<String>> {
        let mut block = Vec::new();
        loop {
            self.prompt("| ")?;
            match self.read_line().await {
                Some(line) if line.trim_end() == BLOCK_TERMINATOR => break,
                Some(line) => block.push(line),
                None => return Ok(None),
            }
        }
        Ok(Some(block.join("\n")))
    }

    pub async fn confirm(&mut self, question: &str) -> io::Result<bool> {
        self.prompt(&format!("{question} [y/N] "))?;
        Ok(self
            .read_line()
            .await
            .is_some_and(|answer| is_affirmative(&answer)))
    }
}

fn forward_lines<R: BufRead>(reader: R, sender: mpsc::Sender<String>) {
    for line in reader.lines() {
        let line = match line {
            Ok(line) => line,
            Err(err) => {
                tracing::warn!(target: "console", error = %err, "stdin read failed");
                break;
            }
        };
        if sender.blocking_send(line).is_err() {
            break;
        }
    }
}

pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
