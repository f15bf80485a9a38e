use anyhow::Result;
use clap::Parser;
use dfdls_conf::Settings;
use dfdls_ide::element_completions;

use crate::args::Args;
use crate::commands::print_json;
use crate::commands::Command;
use crate::commands::CursorArgs;
use crate::exit::Exit;

#[derive(Debug, Parser)]
pub struct Complete {
    #[command(flatten)]
    cursor: CursorArgs,
}

impl Command for Complete {
    fn execute(&self, _args: &Args, settings: &Settings) -> Result<Exit> {
        let request = self.cursor.load(settings)?;
        let items = element_completions(&request.document, request.position, &request.prefix);
        print_json(&items)?;
        Ok(Exit::success())
    }
}
