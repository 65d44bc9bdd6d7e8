use anyhow::Result;

use crate::cli::ServeArgs;
use crate::server;

pub async fn run(args: ServeArgs) -> Result<()> {
	server::run(&args.host, args.port, args.memory).await
}
