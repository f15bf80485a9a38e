use anyhow::Context as _;
use anyhow::Result;
use clap::Parser;
use dfdls_conf::Settings;
use dfdls_ide::close_element;
use dfdls_ide::EditSink;

use crate::args::Args;
use crate::commands::print_json;
use crate::commands::Command;
use crate::commands::CursorArgs;
use crate::exit::Exit;

#[derive(Debug, Parser)]
pub struct Close {
    #[command(flatten)]
    cursor: CursorArgs,

    /// Print the document with the edit applied instead of the edit.
    #[arg(long)]
    apply: bool,
}

impl Command for Close {
    fn execute(&self, _args: &Args, settings: &Settings) -> Result<Exit> {
        let mut request = self.cursor.load(settings)?;
        let edit = close_element(&request.document, request.position, &request.prefix);

        if self.apply {
            if let Some(edit) = &edit {
                request
                    .document
                    .apply(edit)
                    .context("Failed to apply edit")?;
            }
            print!("{}", request.document.content());
        } else {
            print_json(&edit)?;
        }

        if edit.is_some() {
            Ok(Exit::success())
        } else {
            Ok(Exit::error().with_message("Nothing to close."))
        }
    }
}
