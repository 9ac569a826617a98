use clap::{Args, Parser, Subcommand};

/// tagwarden: registry tag console for the cluster dashboard API
#[derive(Parser, Debug)]
#[command(name = "tagwarden", version, about)]
pub struct Cli {
    /// Dashboard API base URL (e.g., http://localhost:8000/api)
    #[arg(long, env = "TAGWARDEN_API")]
    pub api: String,

    /// Bearer token of an existing session
    #[arg(long, env = "TAGWARDEN_TOKEN", conflicts_with = "username")]
    pub token: Option<String>,

    /// Role claim to go with --token (admin unlocks delete and prune)
    #[arg(long, requires = "token")]
    pub role: Option<String>,

    /// Username; performs the login exchange before the command runs
    #[arg(long, requires = "password")]
    pub username: Option<String>,

    /// Password for --username
    #[arg(long, env = "TAGWARDEN_PASSWORD", requires = "username")]
    pub password: Option<String>,

    /// Assume yes on confirmation prompts
    #[arg(short = 'y', long, default_value_t = false)]
    pub yes: bool,

    /// Verbose output
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List images with their tags
    Images(FilterArgs),
    /// List repository names
    Repos(FilterArgs),
    /// Show the ordered tag list for one image
    Tags {
        /// Image name
        image: String,
    },
    /// Delete a single tag (admin only)
    Delete {
        /// Image name
        image: String,
        /// Tag to delete
        tag: String,
    },
    /// Select and bulk-delete tags from one image (admin only)
    Prune(PruneArgs),
}

#[derive(Args, Debug)]
pub struct FilterArgs {
    /// Case-insensitive substring filter on names
    #[arg(long)]
    pub filter: Option<String>,
}

#[derive(Args, Debug)]
pub struct PruneArgs {
    /// Image whose tags to prune
    pub image: String,

    /// Tags to select for deletion
    #[arg(conflicts_with = "all")]
    pub tags: Vec<String>,

    /// Select deletable tags matching this regex
    #[arg(long, conflicts_with = "all")]
    pub pattern: Option<String>,

    /// Select every deletable tag
    #[arg(long, default_value_t = false)]
    pub all: bool,
}
