//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// atelier - command-line client for the content administration backend
#[derive(Parser, Debug, Clone)]
#[command(name = "atelier")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// API base, absolute (`https://host/api`) or a path joined to the origin
    #[arg(long, global = true)]
    pub api_base: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Sign in; the password is prompted for
    Login {
        #[arg(short, long)]
        username: Option<String>,

        /// Keep the session across restarts
        #[arg(short, long)]
        remember: bool,
    },

    /// Create an account and sign in with it
    Register {
        #[arg(short, long)]
        username: String,

        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        remember: bool,
    },

    /// Forget the stored session
    Logout,

    /// Show the stored user and token expiry
    Whoami,

    /// Check the token with the server, picking up a replacement if issued
    Verify,

    /// List the menu permissions of the signed-in user
    Permissions,

    /// Clothing catalogue
    Clothing {
        #[command(subcommand)]
        command: ClothingCommand,
    },

    /// Media library
    Media {
        #[command(subcommand)]
        command: MediaCommand,
    },

    /// Upload images
    Upload {
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Which size limit applies
        #[arg(long, value_enum, default_value_t = UploadTarget::Standard)]
        target: UploadTarget,
    },

    /// Show site settings
    Settings {
        #[arg(value_enum, default_value_t = SettingsSection::All)]
        section: SettingsSection,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ClothingCommand {
    Get { id: String },

    List {
        #[arg(long)]
        page: Option<u32>,

        #[arg(long)]
        limit: Option<u32>,

        /// Filter by name
        #[arg(long)]
        name: Option<String>,
    },

    Stats,
}

#[derive(Subcommand, Debug, Clone)]
pub enum MediaCommand {
    List {
        #[arg(long)]
        page: Option<u32>,

        #[arg(long)]
        limit: Option<u32>,

        #[arg(long = "type", value_enum)]
        media_type: Option<MediaType>,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    Image,
    Video,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Image => "image",
            MediaType::Video => "video",
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadTarget {
    Standard,
    Settings,
    Clothing,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsSection {
    Basic,
    Security,
    Notification,
    All,
}
