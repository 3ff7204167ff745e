use serde::{Deserialize, Serialize};

/// A post in the fitness feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: u32,
    /// Display name, e.g. "Sarah Chen"
    pub author: String,
    /// Handle including the `@`
    pub handle: String,
    pub caption: String,
    /// Like count before the viewer's own like
    pub likes: u32,
    pub comments: u32,
}

impl Post {
    /// Initials used as an avatar stand-in ("Sarah Chen" -> "SC")
    pub fn initials(&self) -> String {
        self.author
            .split_whitespace()
            .filter_map(|w| w.chars().next())
            .collect()
    }

    /// Hashtags in the caption, without the `#`
    pub fn hashtags(&self) -> Vec<&str> {
        self.caption
            .split_whitespace()
            .filter_map(|w| w.strip_prefix('#'))
            .filter(|t| !t.is_empty())
            .collect()
    }
}

/// The built-in sample feed
pub fn sample_posts() -> Vec<Post> {
    vec![
        Post {
            id: 1,
            author: "Sarah Chen".into(),
            handle: "@sarahfitslife".into(),
            caption: "Just crushed my PR on deadlifts! 💪 185lbs x 5 reps. The grind never stops! #DeadliftPR #StrengthTraining".into(),
            likes: 127,
            comments: 23,
        },
        Post {
            id: 2,
            author: "Mike Rodriguez".into(),
            handle: "@mikelifts".into(),
            caption: "Morning 10K run through the mountains 🏔️ Nothing beats that fresh air and sunrise motivation! #MorningRun #TrailRunning".into(),
            likes: 89,
            comments: 15,
        },
        Post {
            id: 3,
            author: "Emma Thompson".into(),
            handle: "@emmayoga".into(),
            caption: "Finding balance in warrior III pose 🧘‍♀️ Yoga isn't just about flexibility, it's about mental strength too! #YogaLife #Balance".into(),
            likes: 156,
            comments: 31,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initials_from_author() {
        let posts = sample_posts();
        assert_eq!(posts[0].initials(), "SC");
        assert_eq!(posts[1].initials(), "MR");
        assert_eq!(posts[2].initials(), "ET");
    }

    #[test]
    fn hashtags_from_caption() {
        let posts = sample_posts();
        assert_eq!(posts[1].hashtags(), vec!["MorningRun", "TrailRunning"]);
    }

    #[test]
    fn sample_ids_are_unique() {
        let posts = sample_posts();
        let mut ids: Vec<u32> = posts.iter().map(|p| p.id).collect();
        ids.dedup();
        assert_eq!(ids.len(), posts.len());
    }
}
