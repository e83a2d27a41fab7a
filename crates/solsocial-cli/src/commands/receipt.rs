// Receipt commands

use super::{bootstrap, GlobalOpts};
use clap::Subcommand;
use solsocial_app::workflows::{check_receipt_status, toggle_receipt};

#[derive(Subcommand, Debug, Clone)]
pub enum ReceiptSubcommand {
    /// Toggle the receipt on a post
    Toggle {
        /// Post transaction signature
        signature: String,

        /// Read the server status first so the toggle starts from it
        #[arg(long)]
        sync: bool,
    },

    /// Show the server's receipt status
    Status {
        /// Post transaction signature
        signature: String,
    },
}

/// Dispatch a receipt subcommand.
pub async fn handle_receipt_command(
    opts: &GlobalOpts,
    command: &ReceiptSubcommand,
) -> anyhow::Result<()> {
    let app_core = bootstrap(opts).await?;
    match command {
        ReceiptSubcommand::Toggle { signature, sync } => {
            if *sync {
                check_receipt_status(&app_core, signature).await?;
            }
            let receipted = toggle_receipt(&app_core, signature).await?;
            println!(
                "{} {signature}",
                if receipted { "Receipted" } else { "Removed receipt for" }
            );
        }
        ReceiptSubcommand::Status { signature } => {
            let receipted = check_receipt_status(&app_core, signature).await?;
            println!("{signature}: {}", if receipted { "receipted" } else { "not receipted" });
        }
    }
    Ok(())
}
