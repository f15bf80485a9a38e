mod close;
mod complete;
mod context;

use std::io::Read as _;
use std::path::PathBuf;

use anyhow::Context as _;
use anyhow::Result;
use clap::Parser;
use clap::Subcommand;
use dfdls_conf::Settings;
use dfdls_source::Position;
use dfdls_source::TextDocument;
use dfdls_tags::resolve_prefix_or;
use dfdls_tags::NamespacePrefix;

use crate::args::Args;
use crate::exit::Exit;

pub trait Command {
    fn execute(&self, args: &Args, settings: &Settings) -> Result<Exit>;
}

#[derive(Debug, Subcommand)]
pub enum DfdlsCommand {
    /// Print the tag context resolved at a cursor position
    Context(self::context::Context),
    /// Print the element completions offered at a cursor position
    Complete(self::complete::Complete),
    /// Print the auto-close edit for a `>` typed just before the cursor
    Close(self::close::Close),
}

impl Command for DfdlsCommand {
    fn execute(&self, args: &Args, settings: &Settings) -> Result<Exit> {
        match self {
            DfdlsCommand::Context(cmd) => cmd.execute(args, settings),
            DfdlsCommand::Complete(cmd) => cmd.execute(args, settings),
            DfdlsCommand::Close(cmd) => cmd.execute(args, settings),
        }
    }
}

/// A document and a cursor in it, shared by every command.
#[derive(Debug, Parser)]
pub struct CursorArgs {
    /// Schema file to read; `-` or nothing reads stdin.
    path: Option<PathBuf>,

    /// Zero-based line of the cursor.
    #[arg(long)]
    line: u32,

    /// Zero-based column of the cursor, counted in characters.
    #[arg(long)]
    character: u32,
}

/// A loaded document with the cursor converted to a byte position and the
/// namespace prefix resolved for it.
pub struct Request {
    pub document: TextDocument,
    pub position: Position,
    pub prefix: NamespacePrefix,
}

impl CursorArgs {
    pub fn load(&self, settings: &Settings) -> Result<Request> {
        let source = self.read_source()?;
        let document = TextDocument::new(source);

        let position = Position::new(self.line, document.byte_column(self.line, self.character));
        document
            .check_position(position)
            .with_context(|| format!("Invalid cursor {}:{}", self.line, self.character))?;

        let prefix = resolve_prefix_or(&document, position, &settings.default_prefix);
        tracing::debug!(line = position.line, character = position.character, %prefix, "request");

        Ok(Request {
            document,
            position,
            prefix,
        })
    }

    fn read_source(&self) -> Result<String> {
        match &self.path {
            Some(path) if path.as_os_str() != "-" => std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display())),
            _ => {
                let mut source = String::new();
                std::io::stdin()
                    .read_to_string(&mut source)
                    .context("Failed to read stdin")?;
                Ok(source)
            }
        }
    }
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{json}");
    Ok(())
}
