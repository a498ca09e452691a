use clap::Args;
use jiff::Timestamp;

use crate::cli::{DatabaseArgs, campaigns::print_group_buy};

#[derive(Debug, Args)]
pub(crate) struct ExpiringArgs {
    /// Only campaigns whose end date is before this RFC 3339 timestamp
    #[arg(long)]
    before: Timestamp,

    #[command(flatten)]
    database: DatabaseArgs,
}

pub(crate) async fn run(args: ExpiringArgs) -> Result<(), String> {
    let ctx = args.database.context().await?;

    let group_buys = ctx
        .group_buys
        .list_expiring(args.before, Timestamp::now())
        .await
        .map_err(|error| format!("failed to list campaigns: {error}"))?;

    if group_buys.is_empty() {
        println!("no campaigns end before {}", args.before);
        return Ok(());
    }

    for group_buy in &group_buys {
        print_group_buy(group_buy);
        println!();
    }

    Ok(())
}
