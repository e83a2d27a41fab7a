// Feed watching

use super::{bootstrap, GlobalOpts};
use solsocial_app::workflows::{load_feed, merge_pending, polling_enabled};
use solsocial_app::FeedPoller;
use solsocial_core::types::{FeedItem, FeedKind};

fn print_item(prefix: &str, item: &FeedItem) {
    let author = item
        .author_handle
        .clone()
        .unwrap_or_else(|| item.author.short());
    let id: String = item.id.as_str().chars().take(14).collect();
    let text: String = item.text.chars().take(72).collect();
    println!("{prefix} {id:<14} {author:<16} {text}");
}

/// Load `feed`, then print pending posts after every poll.
pub async fn run(opts: &GlobalOpts, feed: &str, ticks: u32, merge: bool) -> anyhow::Result<()> {
    let kind: FeedKind = feed.parse()?;
    let app_core = bootstrap(opts).await?;

    let loaded = load_feed(&app_core, kind).await?;
    println!("Loaded {loaded} posts from {kind}");
    for item in app_core.read().await.snapshot().feed.items() {
        print_item(" ", item);
    }

    if !polling_enabled(&*app_core.read().await) {
        println!("Polling is off for this session (sign in with --wallet; {kind} must support polling)");
        return Ok(());
    }

    let mut revisions = app_core.read().await.subscribe();
    let poller = FeedPoller::spawn_configured(app_core.clone()).await;
    let mut polls = 0u32;

    loop {
        tokio::select! {
            changed = revisions.changed() => {
                if changed.is_err() {
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                println!("Interrupted");
                break;
            }
        }

        // The poller is the only other writer, so each revision is one poll.
        let feed = app_core.read().await.snapshot().feed;
        polls += 1;

        match feed.poll_error() {
            Some(error) => println!("[poll {polls}] failed: {error}"),
            None => {
                println!("[poll {polls}] {} new", feed.new_count());
                for item in feed.pending() {
                    print_item("+", item);
                }
                if merge && !feed.pending().is_empty() {
                    let merged = merge_pending(&app_core).await;
                    println!("[poll {polls}] merged {merged} posts");
                    revisions.borrow_and_update();
                }
            }
        }

        if ticks > 0 && polls >= ticks {
            break;
        }
    }

    poller.shutdown().await;
    Ok(())
}
