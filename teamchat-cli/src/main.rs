//! teamchat command-line client
//!
//! Thin presentation layer over teamchat-core: parses arguments, enforces
//! the admin gate on admin-only commands and prints results. All domain
//! rules live in the core.

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use teamchat_core::config::Config;
use teamchat_core::core_identity::policy_from_config;
use teamchat_core::core_message::extract_mentions;
use teamchat_core::{
    demo, ApprovalStatus, GroupId, GroupManager, Handle, IdentityManager, LogConfig,
    MessageEngine, Store, SystemClock, User, UserId,
};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "teamchat")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Override the configured log level (trace, debug, info, warn, error)
    #[arg(short, long)]
    log_level: Option<String>,

    /// Enable JSON formatted logging
    #[arg(long)]
    json_logs: bool,

    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Register a new account; it starts out pending approval
    Signup {
        email: String,
        password: String,
        username: String,
    },
    /// Log in; the session persists until logout
    Login { email: String, password: String },
    /// Clear the session
    Logout,
    /// Show the logged-in user
    Whoami,
    /// List all users, or only approved ones with --active
    Users {
        #[arg(long)]
        active: bool,
    },
    /// Approve a user (admin)
    Approve { user_id: String },
    /// Reject a user (admin)
    Reject { user_id: String },
    /// List groups and their members
    Groups,
    /// Create a group (admin)
    CreateGroup { name: String },
    /// Join a group
    Join { group_id: String },
    /// Join every group (admin)
    JoinAll,
    /// Remove a member from a group (admin)
    RemoveMember { group_id: String, handle: String },
    /// Delete a group and all of its messages (admin)
    DeleteGroup { group_id: String },
    /// Send a message to a group
    Send { group_id: String, message: String },
    /// Show the messages of a group
    Messages { group_id: String },
    /// Mention autocomplete for a partially typed handle
    Suggest { partial: String },
    /// Show the remaining send cooldown
    Cooldown,
    /// Seed the demo users, groups and messages
    Seed,
}

fn load_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    if let Some(level) = &args.log_level {
        config.logging.level = level.clone();
    }
    if args.json_logs {
        config.logging.json_format = true;
    }
    Ok(config)
}

fn require_login(identity: &IdentityManager) -> Result<User> {
    match identity.current_user() {
        Some(user) => Ok(user.clone()),
        None => bail!("Not logged in. Use `teamchat login` first."),
    }
}

fn require_admin(identity: &IdentityManager) -> Result<User> {
    let user = require_login(identity)?;
    if !user.is_admin {
        bail!("Admin privileges required.");
    }
    Ok(user)
}

/// Handles are `@`-prefixed everywhere in the core; accept both spellings
/// on the command line
fn parse_handle(raw: &str) -> Handle {
    if raw.starts_with('@') {
        Handle::new(raw)
    } else {
        Handle::from_base(raw)
    }
}

fn print_user(user: &User) {
    let role = if user.is_admin { " [admin]" } else { "" };
    println!(
        "{} <{}> {} ({}){}",
        user.username, user.email, user.id, user.approval_status, role
    );
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = load_config(&args)?;

    teamchat_core::init_logging_with_config(LogConfig::from_settings(&config.logging)?)?;

    let store = if config.storage.in_memory {
        Store::memory()
    } else {
        Store::open(config.storage.db_path())?
    };
    let clock = Arc::new(SystemClock);

    if config.identity.seed_demo_data {
        demo::seed_demo_data(&store, clock.as_ref())?;
    }

    let policy = policy_from_config(&config.identity);
    let mut identity = IdentityManager::new(store.clone(), clock.clone(), policy)?;
    let groups = GroupManager::new(store.clone());
    let engine = MessageEngine::new(store.clone(), clock.clone(), &config.messaging);

    // Apply any automatic approvals that have come due
    identity.tick()?;

    match args.command {
        Command::Signup {
            email,
            password,
            username,
        } => {
            let handle = identity.signup(&email, &password, &username)?;
            println!(
                "Signup successful! Your account is pending approval. Your handle is {}.",
                handle
            );
        }
        Command::Login { email, password } => {
            let user = identity.login(&email, &password)?;
            println!("Login successful! Welcome, {}.", user.username);
        }
        Command::Logout => {
            identity.logout()?;
            println!("Logged out.");
        }
        Command::Whoami => {
            let user = require_login(&identity)?;
            print_user(&user);
        }
        Command::Users { active } => {
            let users = if active {
                identity.list_active_users()?
            } else {
                identity.list_users()?
            };
            for user in &users {
                print_user(user);
            }
        }
        Command::Approve { user_id } => {
            require_admin(&identity)?;
            identity.update_user_status(&UserId::new(user_id), ApprovalStatus::Approved)?;
            println!("User approved.");
        }
        Command::Reject { user_id } => {
            require_admin(&identity)?;
            identity.update_user_status(&UserId::new(user_id), ApprovalStatus::Rejected)?;
            println!("User rejected.");
        }
        Command::Groups => {
            for group in groups.list_groups()? {
                let members: Vec<&str> = group.members.iter().map(Handle::as_str).collect();
                println!("#{} ({}) members: {}", group.name, group.id, members.join(", "));
            }
        }
        Command::CreateGroup { name } => {
            let admin = require_admin(&identity)?;
            let group = groups.create_group(&name, &admin.username)?;
            println!("Group \"{}\" created with id {}.", group.name, group.id);
        }
        Command::Join { group_id } => {
            let user = require_login(&identity)?;
            groups.join_group(&GroupId::new(group_id), &user.username)?;
            println!("Joined.");
        }
        Command::JoinAll => {
            let admin = require_admin(&identity)?;
            groups.join_all_groups(&admin.username)?;
            println!("Joined all available groups!");
        }
        Command::RemoveMember { group_id, handle } => {
            require_admin(&identity)?;
            let handle = parse_handle(&handle);
            groups.remove_member(&GroupId::new(group_id), &handle)?;
            println!("{} has been removed from the group.", handle);
        }
        Command::DeleteGroup { group_id } => {
            require_admin(&identity)?;
            groups.delete_group(&GroupId::new(group_id))?;
            println!("Group deleted.");
        }
        Command::Send { group_id, message } => {
            let user = require_login(&identity)?;
            let content = message.trim();
            if content.is_empty() {
                bail!("Cannot send an empty message.");
            }
            let sent = engine.send_message(&GroupId::new(group_id), &user, content)?;
            info!(id = %sent.id, "message stored");
            println!("Sent.");
        }
        Command::Messages { group_id } => {
            for message in engine.list_messages(&GroupId::new(group_id))? {
                println!("[{}] {}: {}", message.timestamp, message.sender, message.content);
                let mentions = extract_mentions(&message.content);
                if !mentions.is_empty() {
                    println!("        mentions: {}", mentions.join(", "));
                }
            }
        }
        Command::Suggest { partial } => {
            let directory: Vec<Handle> = identity
                .list_users()?
                .into_iter()
                .map(|u| u.username)
                .collect();
            for handle in engine.suggest_mentions(&partial, &directory) {
                println!("{}", handle);
            }
        }
        Command::Cooldown => {
            let user = require_login(&identity)?;
            let remaining = engine.remaining_cooldown(&user.id)?;
            if remaining.is_zero() {
                println!("Ready to send.");
            } else {
                println!("On cooldown for another {} seconds.", remaining.as_secs());
            }
        }
        Command::Seed => {
            demo::seed_demo_data(&store, clock.as_ref())?;
            println!("Demo data seeded where collections were empty.");
        }
    }

    Ok(())
}
