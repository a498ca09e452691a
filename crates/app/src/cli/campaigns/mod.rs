use clap::{Args, Subcommand};
use groupbuy_app::domain::group_buys::models::GroupBuy;

mod expiring;
mod show;

#[derive(Debug, Args)]
pub(crate) struct CampaignsCommand {
    #[command(subcommand)]
    command: CampaignsSubcommand,
}

#[derive(Debug, Subcommand)]
enum CampaignsSubcommand {
    /// List campaigns ending before a point in time
    Expiring(expiring::ExpiringArgs),

    /// Print one campaign by its shareable link
    Show(show::ShowArgs),
}

pub(crate) async fn run(command: CampaignsCommand) -> Result<(), String> {
    match command.command {
        CampaignsSubcommand::Expiring(args) => expiring::run(args).await,
        CampaignsSubcommand::Show(args) => show::run(args).await,
    }
}

fn print_group_buy(group_buy: &GroupBuy) {
    println!("group_buy_uuid: {}", group_buy.uuid);
    println!("unique_link: {}", group_buy.unique_link);
    println!("product_uuid: {}", group_buy.product_uuid);
    println!("status: {}", group_buy.status);
    println!(
        "participants: {}/{}",
        group_buy.current_participants, group_buy.min_participants
    );
    println!("discount_percentage: {}", group_buy.discount_percentage);
    println!("end_date: {}", group_buy.end_date);
}
