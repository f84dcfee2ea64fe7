// UI layer: the console flow around the publisher client.
// Prints a banner, confirms the account, lets the user pick an article
// and publishes it. Everything is synchronous; the spinner only keeps the
// terminal alive while the blocking request runs.

use crate::api::{ClientConfig, PublishedPost, PublisherClient, API_KEY_VAR};
use crate::articles::{Article, ARTICLES};
use anyhow::{Context, Result};
use crossterm::style::Stylize;
use dialoguer::Input;
use indicatif::{ProgressBar, ProgressStyle};
use rand::seq::SliceRandom;
use rand::Rng;
use std::time::Duration;
use tracing::{debug, info};

/// How a run ended. Only `Failed` maps to a failing process exit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Published,
    MissingApiKey,
    Failed,
}

impl Outcome {
    pub fn is_success(self) -> bool {
        !matches!(self, Outcome::Failed)
    }
}

/// Run the interactive publishing flow once.
pub fn run(config: ClientConfig) -> Result<Outcome> {
    print_banner();

    if !config.has_api_key() {
        print_api_key_help();
        return Ok(Outcome::MissingApiKey);
    }

    let api = PublisherClient::new(config).context("Failed to set up the API client")?;
    debug!(endpoint = api.endpoint(), "client ready");

    let user = match api.fetch_current_user() {
        Ok(user) => user,
        Err(e) => {
            println!("\n{} {}", "❌ API error:".red(), e);
            return Ok(Outcome::Failed);
        }
    };
    match &user.name {
        Some(name) => println!("\n{} @{} ({})", "✅ Connected:".green(), user.username, name),
        None => println!("\n{} @{}", "✅ Connected:".green(), user.username),
    }

    println!("\n📝 Available articles:");
    for line in article_menu(ARTICLES) {
        println!("{line}");
    }

    // Blank input is allowed: it means "pick one at random".
    let choice: String = Input::new()
        .with_prompt("Choose an article (Enter for random)")
        .allow_empty(true)
        .interact_text()?;
    let article = select_article(&choice, ARTICLES, &mut rand::thread_rng())
        .context("The article library is empty")?;
    info!(title = article.title, "article selected");

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner} {msg}")?);
    spinner.set_message(format!("📤 Publishing: {}...", article.title));
    spinner.enable_steady_tick(Duration::from_millis(100));
    let result = api.create_post(&article.to_draft());
    spinner.finish_and_clear();

    match result {
        Ok(post) => {
            print_published(&post);
            Ok(Outcome::Published)
        }
        Err(e) => {
            println!("\n{} {}", "❌ Publish failed:".red(), e);
            Ok(Outcome::Failed)
        }
    }
}

/// Lines of the article list, numbered from 1.
pub fn article_menu(articles: &[Article]) -> Vec<String> {
    articles
        .iter()
        .enumerate()
        .map(|(i, article)| format!("  {}. {}", i + 1, article.title))
        .collect()
}

/// Resolve the user's input to an article. Blank input picks at random,
/// a valid 1-based number picks that article, anything else falls back to
/// the first one. Returns `None` only for an empty library.
pub fn select_article<'a, R>(input: &str, articles: &'a [Article], rng: &mut R) -> Option<&'a Article>
where
    R: Rng + ?Sized,
{
    let input = input.trim();
    if input.is_empty() {
        return articles.choose(rng);
    }
    input
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| articles.get(i))
        .or_else(|| articles.first())
}

fn print_banner() {
    let rule = "=".repeat(50);
    println!("{rule}");
    println!("🚀 Hashnode Publisher");
    println!("{rule}");
}

fn print_api_key_help() {
    println!("\n{}", format!("❌ {API_KEY_VAR} is not set").red());
    println!("Set the environment variable:");
    println!("  export {API_KEY_VAR}='your-hashnode-api-key'");
    println!("\nTo get a key:");
    println!("  1. Log in at https://hashnode.com");
    println!("  2. Open Settings → Developer");
    println!("  3. Click \"Generate new token\"");
}

fn print_published(post: &PublishedPost) {
    println!("\n{}", "✅ Published!".green());
    println!("📄 {}", post.title);
    println!("🔗 {}", post.url);
}
