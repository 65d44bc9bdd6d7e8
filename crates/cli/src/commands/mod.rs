mod purge;
mod send;
mod serve;

use anyhow::Result;

use crate::cli::{Cli, Commands};

pub async fn dispatch(cli: Cli) -> Result<()> {
	match cli.command {
		Commands::Serve(args) => serve::run(args).await,
		Commands::Purge(args) => purge::run(args).await,
		Commands::Send(args) => send::run(args).await,
	}
}
