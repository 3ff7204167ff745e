mod init;
pub use init::cmd_init;

use std::path::Path;
use std::time::Duration;

use tracing::{debug, info};

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io;
use crate::io::file_store::FileStore;
use crate::io::session::SessionAuth;
use crate::model::config::Config;
use crate::model::post::sample_posts;
use crate::model::task::TaskId;
use crate::ops::like_ops::LikeSet;
use crate::ops::task_ops::clean_text;
use crate::remote::{AuthService, DocumentStore, Snapshot, UserId};

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// Run a subcommand. The TUI (no subcommand) is launched from main.
pub fn dispatch(
    command: Commands,
    json: bool,
    data_dir: &Path,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Init(args) => cmd_init(args, data_dir),

        // Session
        Commands::Signin(args) => cmd_signin(args, data_dir, json),
        Commands::Signout => cmd_signout(data_dir),
        Commands::Whoami => cmd_whoami(data_dir, json),

        // Tasks
        Commands::List => cmd_list(data_dir, config, json),
        Commands::Add(args) => cmd_add(args, data_dir, config, json),
        Commands::Edit(args) => cmd_edit(args, data_dir, config),
        Commands::Rm(args) => cmd_rm(args, data_dir, config),

        Commands::Feed => cmd_feed(json),
        Commands::Config(args) => cmd_config(args, data_dir),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn open_store(data_dir: &Path, config: &Config) -> Result<FileStore, Box<dyn std::error::Error>> {
    let store = FileStore::open(&config_io::store_dir(data_dir))?
        .with_lock_timeout(Duration::from_millis(config.store.lock_timeout_ms));
    Ok(store)
}

fn require_user(data_dir: &Path) -> Result<UserId, Box<dyn std::error::Error>> {
    SessionAuth::open(data_dir)
        .current_user()
        .ok_or_else(|| "not signed in (try `smartdo signin <name>`)".into())
}

/// Resolve a full id or a unique prefix of one against the user's records
fn resolve_id(snapshot: &Snapshot, query: &str) -> Result<TaskId, String> {
    if let Some(task) = snapshot.iter().find(|t| t.id.as_str() == query) {
        return Ok(task.id.clone());
    }
    let matches: Vec<&TaskId> = snapshot
        .iter()
        .map(|t| &t.id)
        .filter(|id| !query.is_empty() && id.as_str().starts_with(query))
        .collect();
    match matches.as_slice() {
        [] => Err(format!("task not found: {}", query)),
        [id] => Ok((*id).clone()),
        many => Err(format!(
            "ambiguous id '{}' matches {} tasks",
            query,
            many.len()
        )),
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// ---------------------------------------------------------------------------
// Session commands
// ---------------------------------------------------------------------------

fn cmd_signin(
    args: SigninArgs,
    data_dir: &Path,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut auth = SessionAuth::open(data_dir);
    let user = auth.sign_in(&args.name)?;
    info!(user = %user, "signed in");
    if json {
        print_json(&WhoamiJson {
            user: Some(user.to_string()),
        })
    } else {
        println!("Signed in as {}", user);
        Ok(())
    }
}

fn cmd_signout(data_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let mut auth = SessionAuth::open(data_dir);
    let previous = auth.current_user();
    auth.sign_out()?;
    match previous {
        Some(user) => {
            info!(user = %user, "signed out");
            println!("Signed out {}", user);
        }
        None => println!("Not signed in"),
    }
    Ok(())
}

fn cmd_whoami(data_dir: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let user = SessionAuth::open(data_dir).current_user();
    if json {
        return print_json(&WhoamiJson {
            user: user.map(|u| u.to_string()),
        });
    }
    match user {
        Some(user) => println!("{}", user),
        None => println!("Not signed in"),
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Task commands
// ---------------------------------------------------------------------------

fn cmd_list(
    data_dir: &Path,
    config: &Config,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let user = require_user(data_dir)?;
    let store = open_store(data_dir, config)?;
    let snapshot = store.snapshot(&user)?;
    debug!(user = %user, count = snapshot.len(), "listing tasks");

    if json {
        return print_json(&TaskListJson {
            user: user.to_string(),
            tasks: snapshot.iter().map(task_to_json).collect(),
        });
    }
    print!("{}", format_task_list(&snapshot));
    Ok(())
}

fn cmd_add(
    args: AddArgs,
    data_dir: &Path,
    config: &Config,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let user = require_user(data_dir)?;
    let joined = args.text.join(" ");
    let Some(text) = clean_text(&joined) else {
        eprintln!("Nothing to add: task text is empty");
        return Ok(());
    };

    let store = open_store(data_dir, config)?;
    let id = store.create(&user, text)?;
    info!(user = %user, id = %id, "added task");

    if json {
        let snapshot = store.snapshot(&user)?;
        if let Some(task) = snapshot.iter().find(|t| t.id == id) {
            return print_json(&task_to_json(task));
        }
    }
    println!("{}", id);
    Ok(())
}

fn cmd_edit(
    args: EditArgs,
    data_dir: &Path,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let user = require_user(data_dir)?;
    let store = open_store(data_dir, config)?;
    let id = resolve_id(&store.snapshot(&user)?, &args.id)?;
    store.update(&user, &id, &args.text.join(" "))?;
    info!(user = %user, id = %id, "edited task");
    println!("Updated {}", short_id(id.as_str()));
    Ok(())
}

fn cmd_rm(
    args: RmArgs,
    data_dir: &Path,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let user = require_user(data_dir)?;
    let store = open_store(data_dir, config)?;
    let id = resolve_id(&store.snapshot(&user)?, &args.id)?;
    store.delete(&user, &id)?;
    info!(user = %user, id = %id, "deleted task");
    println!("Deleted {}", short_id(id.as_str()));
    Ok(())
}

// ---------------------------------------------------------------------------
// Feed and config
// ---------------------------------------------------------------------------

fn cmd_feed(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let posts = sample_posts();
    let likes = LikeSet::new();
    if json {
        let items: Vec<PostJson> = posts.iter().map(|p| post_to_json(p, &likes)).collect();
        return print_json(&items);
    }
    for (i, post) in posts.iter().enumerate() {
        if i > 0 {
            println!();
        }
        print!("{}", format_post(post, &likes));
    }
    Ok(())
}

fn cmd_config(args: ConfigArgs, data_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let mut doc = config_io::read_config_doc(data_dir)?;
    match args.value {
        None => {
            let value = config_io::get_value(&doc, &args.key)
                .ok_or_else(|| format!("{} is not set", args.key))?;
            println!("{}", value);
        }
        Some(raw) => {
            config_io::set_value(&mut doc, &args.key, &raw)?;
            config_io::write_config(data_dir, &doc)?;
            info!(key = %args.key, value = %raw, "config updated");
            println!("{} = {}", args.key, raw);
        }
    }
    Ok(())
}
