//! Command-line interface definitions.
//!
//! Defines all CLI arguments and subcommands using clap.

use crate::widget::WidgetKind;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// cmscy: render CMS mount points into html pages
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Config file path (default: cmscy.toml)
    #[arg(short = 'C', long, default_value = "cmscy.toml")]
    pub config: PathBuf,

    /// CMS endpoint base URL, used when a page has no `cms-cy-api` block
    #[arg(long = "api-url")]
    pub api_url: Option<String>,

    /// CMS project code, used when a page has no `cms-cy-api` block
    #[arg(long)]
    pub project: Option<String>,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Shared rendering arguments for Render and Serve commands
#[derive(clap::Args, Debug, Clone)]
pub struct RenderArgs {
    /// Minify the rewritten html pages
    #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub minify: Option<bool>,

    /// Inject the base stylesheet into pages containing mount points
    #[arg(long = "base-styles", action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub base_styles: Option<bool>,

    /// Emit gallery initialization scripts after mounted fragments
    #[arg(long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub hooks: Option<bool>,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Render every mount point of a page (or a directory of pages)
    Render {
        /// Html file or directory of html files
        input: PathBuf,

        /// Output file or directory (default: rewrite in place)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Page URL to render a single file for, query string included.
        ///
        /// Example:
        ///   cmscy render news.html --location "https://example.com/news.html?page=2"
        #[arg(short, long)]
        location: Option<String>,

        /// Base URL that directory pages are located under
        #[arg(long = "base-url")]
        base_url: Option<String>,

        /// Pages rendered concurrently
        #[arg(short, long)]
        jobs: Option<usize>,

        #[command(flatten)]
        render_args: RenderArgs,
    },

    /// Render one widget and print its fragment to stdout
    Widget {
        /// Widget type
        #[arg(short = 't', long = "type", value_enum)]
        kind: WidgetKind,

        /// Component name configured in the CMS
        #[arg(short, long)]
        name: String,

        /// Page URL the widget is rendered for, query string included
        #[arg(short, long)]
        location: String,
    },

    /// Serve a directory, rendering mount points on every html request
    Serve {
        /// Directory to serve
        root: Option<PathBuf>,

        /// Interface to bind on
        #[arg(short, long)]
        interface: Option<String>,

        /// The port you should provide
        #[arg(short, long)]
        port: Option<u16>,

        #[command(flatten)]
        render_args: RenderArgs,
    },
}

impl Cli {
    pub const fn is_serve(&self) -> bool {
        matches!(self.command, Commands::Serve { .. })
    }

    /// Rendering flags of the current command, if it has any
    pub const fn render_args(&self) -> Option<&RenderArgs> {
        match &self.command {
            Commands::Render { render_args, .. } | Commands::Serve { render_args, .. } => {
                Some(render_args)
            }
            Commands::Widget { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_widget_command() {
        let cli = Cli::parse_from([
            "cmscy",
            "widget",
            "--type",
            "article-list",
            "--name",
            "news",
            "--location",
            "https://example.com/news.html?page=2",
        ]);
        match cli.command {
            Commands::Widget { kind, name, location } => {
                assert_eq!(kind, WidgetKind::ArticleList);
                assert_eq!(name, "news");
                assert_eq!(location, "https://example.com/news.html?page=2");
            }
            _ => panic!("expected widget command"),
        }
    }

    #[test]
    fn test_parse_render_flags() {
        let cli = Cli::parse_from([
            "cmscy",
            "--project",
            "demo",
            "render",
            "public",
            "--minify",
            "--hooks",
            "false",
            "-j",
            "8",
        ]);
        assert_eq!(cli.project.as_deref(), Some("demo"));
        let args = cli.render_args().unwrap();
        assert_eq!(args.minify, Some(true));
        assert_eq!(args.hooks, Some(false));
        assert_eq!(args.base_styles, None);
        match cli.command {
            Commands::Render { input, jobs, .. } => {
                assert_eq!(input, PathBuf::from("public"));
                assert_eq!(jobs, Some(8));
            }
            _ => panic!("expected render command"),
        }
    }

    #[test]
    fn test_parse_serve_defaults() {
        let cli = Cli::parse_from(["cmscy", "serve"]);
        assert!(cli.is_serve());
        assert_eq!(cli.config, PathBuf::from("cmscy.toml"));
        match cli.command {
            Commands::Serve { root, port, .. } => {
                assert!(root.is_none());
                assert!(port.is_none());
            }
            _ => panic!("expected serve command"),
        }
    }
}
