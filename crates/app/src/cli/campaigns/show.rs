use clap::Args;
use jiff::Timestamp;

use crate::cli::{DatabaseArgs, campaigns::print_group_buy};

#[derive(Debug, Args)]
pub(crate) struct ShowArgs {
    /// Shareable campaign link
    link: String,

    #[command(flatten)]
    database: DatabaseArgs,
}

pub(crate) async fn run(args: ShowArgs) -> Result<(), String> {
    let ctx = args.database.context().await?;

    let group_buy = ctx
        .group_buys
        .get_group_buy(&args.link, Timestamp::now())
        .await
        .map_err(|error| format!("failed to load campaign {}: {error}", args.link))?;

    print_group_buy(&group_buy);

    Ok(())
}
