use indexmap::IndexSet;

use crate::model::post::Post;

/// Post ids the viewer has liked, in the order they were liked
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LikeSet {
    liked: IndexSet<u32>,
}

impl LikeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Like the post if it isn't liked yet, otherwise unlike it.
    /// Returns whether the post is liked afterwards.
    pub fn toggle(&mut self, post_id: u32) -> bool {
        if self.liked.shift_remove(&post_id) {
            false
        } else {
            self.liked.insert(post_id);
            true
        }
    }

    pub fn is_liked(&self, post_id: u32) -> bool {
        self.liked.contains(&post_id)
    }

    /// Like count as shown to the viewer, counting their own like
    pub fn display_likes(&self, post: &Post) -> u32 {
        post.likes + u32::from(self.is_liked(post.id))
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.liked.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.liked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.liked.is_empty()
    }
}
