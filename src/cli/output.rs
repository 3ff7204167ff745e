use serde::Serialize;

use crate::model::post::Post;
use crate::model::task::count_label;
use crate::ops::like_ops::LikeSet;
use crate::remote::StoredTask;

/// Number of id characters shown in text output
pub const SHORT_ID_LEN: usize = 8;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct TaskJson {
    pub id: String,
    pub text: String,
    pub created_at: String,
}

#[derive(Serialize)]
pub struct TaskListJson {
    pub user: String,
    pub tasks: Vec<TaskJson>,
}

#[derive(Serialize)]
pub struct PostJson {
    pub id: u32,
    pub author: String,
    pub handle: String,
    pub caption: String,
    pub tags: Vec<String>,
    pub likes: u32,
    pub comments: u32,
    pub liked: bool,
}

#[derive(Serialize)]
pub struct WhoamiJson {
    pub user: Option<String>,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

pub fn task_to_json(task: &StoredTask) -> TaskJson {
    TaskJson {
        id: task.id.to_string(),
        text: task.text.clone(),
        created_at: task
            .created_at
            .to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
    }
}

pub fn post_to_json(post: &Post, likes: &LikeSet) -> PostJson {
    PostJson {
        id: post.id,
        author: post.author.clone(),
        handle: post.handle.clone(),
        caption: post.caption.clone(),
        tags: post.hashtags().into_iter().map(String::from).collect(),
        likes: likes.display_likes(post),
        comments: post.comments,
        liked: likes.is_liked(post.id),
    }
}

// ---------------------------------------------------------------------------
// Text formatting
// ---------------------------------------------------------------------------

/// First few characters of an id, enough to type back as a prefix
pub fn short_id(id: &str) -> &str {
    match id.char_indices().nth(SHORT_ID_LEN) {
        Some((idx, _)) => &id[..idx],
        None => id,
    }
}

/// One line per task: `<short id>  <text>`, followed by the total
pub fn format_task_list(tasks: &[StoredTask]) -> String {
    if tasks.is_empty() {
        return "No tasks yet\n".to_string();
    }
    let mut out = String::new();
    for task in tasks {
        out.push_str(&format!(
            "{:<width$}  {}\n",
            short_id(task.id.as_str()),
            task.text,
            width = SHORT_ID_LEN
        ));
    }
    out.push_str(&format!("\n{}\n", count_label(tasks.len())));
    out
}

pub fn format_post(post: &Post, likes: &LikeSet) -> String {
    let heart = if likes.is_liked(post.id) { "♥" } else { "♡" };
    format!(
        "{} {}\n  {}\n  {} {}  💬 {}\n",
        post.author,
        post.handle,
        post.caption,
        heart,
        likes.display_likes(post),
        post.comments
    )
}
