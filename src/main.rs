mod api;
mod cli;
mod error;
mod manager;
mod models;
mod order;
mod output;
mod retention;
mod selection;

use std::io::{self, Write};
use std::process;

use anyhow::Result;
use clap::Parser;
use regex::Regex;

use api::{ApiClient, Role, Session};
use cli::{Cli, Command, FilterArgs, PruneArgs};
use error::AppError;
use manager::TagManager;
use models::ImageRepo;
use output::{
    print_error_banner, print_images, print_outcome, print_plan, print_repositories,
    print_tag_list,
};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    let session = build_session(&cli).await?;

    // Mutating commands are admin-only; reject before any network call.
    if matches!(cli.command, Command::Delete { .. } | Command::Prune(_)) && !session.role.is_admin()
    {
        return Err(AppError::AdminRequired.into());
    }

    let client = ApiClient::new(&cli.api, session, cli.verbose);
    let mut manager = TagManager::new(client, cli.verbose);

    match cli.command {
        Command::Images(ref args) => run_images(&mut manager, args).await,
        Command::Repos(ref args) => run_repos(&mut manager, args).await,
        Command::Tags { ref image } => run_tags(&mut manager, image).await,
        Command::Delete { ref image, ref tag } => {
            run_delete(&mut manager, image, tag, cli.yes).await
        }
        Command::Prune(ref args) => run_prune(&mut manager, args, cli.yes).await,
    }
}

async fn build_session(cli: &Cli) -> Result<Session> {
    if let (Some(username), Some(password)) = (&cli.username, &cli.password) {
        let session = ApiClient::login(&cli.api, username, password, cli.verbose).await?;
        if cli.verbose {
            eprintln!("[DEBUG] Logged in as {} ({:?})", username, session.role);
        }
        Ok(session)
    } else if let Some(token) = &cli.token {
        let role = cli.role.as_deref().map(Role::parse).unwrap_or(Role::Viewer);
        Ok(Session::with_token(token.clone(), role))
    } else {
        Ok(Session::anonymous())
    }
}

async fn run_images(manager: &mut TagManager<ApiClient>, args: &FilterArgs) -> Result<()> {
    manager.refresh().await;

    let images = filter_images(&manager.images, args.filter.as_deref());
    print_images(&images);
    print_error_banner(&manager.errors);

    if !manager.errors.is_empty() && images.is_empty() {
        process::exit(1);
    }
    Ok(())
}

async fn run_repos(manager: &mut TagManager<ApiClient>, args: &FilterArgs) -> Result<()> {
    manager.refresh().await;

    let repositories: Vec<String> = match args.filter.as_deref() {
        Some(filter) => {
            let needle = filter.to_lowercase();
            manager
                .repositories
                .iter()
                .filter(|r| r.to_lowercase().contains(&needle))
                .cloned()
                .collect()
        }
        None => manager.repositories.clone(),
    };

    print_repositories(&repositories);
    print_error_banner(&manager.errors);

    if !manager.errors.is_empty() && repositories.is_empty() {
        process::exit(1);
    }
    Ok(())
}

async fn run_tags(manager: &mut TagManager<ApiClient>, image: &str) -> Result<()> {
    manager.refresh().await;
    print_error_banner(&manager.errors);

    let ordered = manager
        .ordered_tags(image)
        .ok_or_else(|| AppError::UnknownImage(image.to_string()))?;

    print_tag_list(image, &ordered);
    Ok(())
}

async fn run_delete(
    manager: &mut TagManager<ApiClient>,
    image: &str,
    tag: &str,
    yes: bool,
) -> Result<()> {
    manager.refresh().await;
    print_error_banner(&manager.errors);

    if !yes && !confirm(&format!("Delete tag {} from image {}?", tag, image)) {
        println!("Aborted.");
        return Ok(());
    }

    manager.delete_one(image, tag).await?;
    println!("Deleted {}:{}", image, tag);
    Ok(())
}

async fn run_prune(
    manager: &mut TagManager<ApiClient>,
    args: &PruneArgs,
    yes: bool,
) -> Result<()> {
    manager.refresh().await;
    print_error_banner(&manager.errors);

    let mut selection = manager.open(&args.image)?;

    if args.all {
        selection.toggle_select_all();
    }

    if let Some(pattern) = &args.pattern {
        let re = Regex::new(pattern).map_err(AppError::InvalidPattern)?;
        for tag in selection.deletable() {
            if re.is_match(&tag) && !selection.is_selected(&tag) {
                selection.toggle(&tag);
            }
        }
    }

    for tag in &args.tags {
        if !selection.ordered().contains(tag) {
            eprintln!(
                "[WARN] Tag '{}' not found for image {}; skipping",
                tag, args.image
            );
            continue;
        }
        if !selection.toggle(tag) {
            eprintln!(
                "[WARN] Tag '{}' is protected by the retention policy; skipping",
                tag
            );
        }
    }

    if selection.is_empty() {
        println!("Nothing to delete.");
        return Ok(());
    }

    let selected = selection.selected_in_order();
    print_plan(&args.image, &selected);

    if !yes
        && !confirm(&format!(
            "Delete {} tags from image {}?",
            selected.len(),
            args.image
        ))
    {
        println!("Aborted.");
        return Ok(());
    }

    let outcome = manager.delete_selected(&args.image, &mut selection).await;
    print_outcome(&outcome);

    if outcome.failed > 0 {
        process::exit(1);
    }
    Ok(())
}

fn filter_images(images: &[ImageRepo], filter: Option<&str>) -> Vec<ImageRepo> {
    match filter {
        Some(filter) => {
            let needle = filter.to_lowercase();
            images
                .iter()
                .filter(|repo| repo.image.to_lowercase().contains(&needle))
                .cloned()
                .collect()
        }
        None => images.to_vec(),
    }
}

fn confirm(prompt: &str) -> bool {
    print!("{} [y/N] ", prompt);
    let _ = io::stdout().flush();

    let mut answer = String::new();
    if io::stdin().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim(), "y" | "Y" | "yes" | "YES")
}
