use anyhow::Result;
use clap::Parser;
use dfdls_conf::Settings;
use dfdls_ide::CursorContext;

use crate::args::Args;
use crate::commands::print_json;
use crate::commands::Command;
use crate::commands::CursorArgs;
use crate::exit::Exit;

#[derive(Debug, Parser)]
pub struct Context {
    #[command(flatten)]
    cursor: CursorArgs,
}

impl Command for Context {
    fn execute(&self, _args: &Args, settings: &Settings) -> Result<Exit> {
        let request = self.cursor.load(settings)?;
        let context = CursorContext::analyze(&request.document, request.position, request.prefix);
        print_json(&context)?;
        Ok(Exit::success())
    }
}
