// Comment listing

use super::{bootstrap, parse_content, GlobalOpts};
use solsocial_app::workflows::{create_comment, load_comments};
use solsocial_core::types::CreateCommentRequest;

/// Optionally post `text`, then list the comments on `content`.
pub async fn run(opts: &GlobalOpts, content: &str, text: Option<&str>) -> anyhow::Result<()> {
    let content_id = parse_content(content)?;
    let app_core = bootstrap(opts).await?;

    if let Some(text) = text {
        let comment =
            create_comment(&app_core, CreateCommentRequest::new(content_id.clone(), text)).await?;
        println!("Posted comment {}", comment.id);
    } else {
        load_comments(&app_core, &content_id).await?;
    }

    let views = app_core.read().await.snapshot();
    let comments = views.interactions.comments_for(&content_id);
    println!("{} comments on {content_id}", comments.len());
    for comment in comments {
        println!(
            "{pin}{score:>5}  {author:<12} {text}",
            pin = if comment.is_pinned { "*" } else { " " },
            score = comment.score,
            author = comment.author.short(),
            text = comment.text,
        );
    }
    Ok(())
}
