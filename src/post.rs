pub const TITLE_COUNT: usize = 5;

/// Shown when the model echoed its own output schema back at us.
pub const SCHEMA_ECHO_TITLES: [&str; TITLE_COUNT] =
    ["🔥 热门话题", "💡 实用技巧", "✨ 生活妙招", "🚀 必看攻略", "💯 超实用"];
pub const SCHEMA_ECHO_CONTENT: &str = "内容正在生成中，请稍后重试... 🌟";

pub const FALLBACK_CONTENT: &str = "内容生成中，请重试...";

pub fn fallback_titles() -> [String; TITLE_COUNT] {
    std::array::from_fn(|i| format!("🌟 精彩标题{}", i + 1))
}

/// A generated post: exactly five titles and one body paragraph.
///
/// Values of this type always satisfy both invariants; `new` repairs any
/// malformed input instead of failing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Post {
    pub titles: [String; TITLE_COUNT],
    pub content: String,
}

impl Post {
    /// Title replacement is all-or-nothing: four real titles and one filler
    /// would read as a glitch, five matching fillers read as "try again".
    pub fn new(titles: Vec<String>, content: String) -> Self {
        let titles =
            <[String; TITLE_COUNT]>::try_from(titles).unwrap_or_else(|_| fallback_titles());

        let content = match content.trim() {
            "" => FALLBACK_CONTENT.to_string(),
            trimmed => trimmed.to_string(),
        };

        Post { titles, content }
    }

    pub fn schema_echo() -> Self {
        Post {
            titles: SCHEMA_ECHO_TITLES.map(str::to_string),
            content: SCHEMA_ECHO_CONTENT.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_five_valid_titles() {
        let titles: Vec<String> = ["a", "b", "c", "d", "e"].map(str::to_string).into();
        let post = Post::new(titles.clone(), "正文".to_string());
        assert_eq!(post.titles.to_vec(), titles);
        assert_eq!(post.content, "正文");
    }

    #[test]
    fn wrong_length_swaps_in_the_whole_placeholder_set() {
        let post = Post::new(vec!["只有一个".to_string()], "正文".to_string());
        assert_eq!(post.titles, fallback_titles());

        let six: Vec<String> = (0..6).map(|i| format!("标题{i}")).collect();
        let post = Post::new(six, "正文".to_string());
        assert_eq!(post.titles, fallback_titles());
    }

    #[test]
    fn empty_content_gets_placeholder() {
        let titles: Vec<String> = ["a", "b", "c", "d", "e"].map(str::to_string).into();
        let post = Post::new(titles, "   ".to_string());
        assert_eq!(post.content, FALLBACK_CONTENT);
    }

    #[test]
    fn content_is_trimmed() {
        let titles: Vec<String> = ["a", "b", "c", "d", "e"].map(str::to_string).into();
        let post = Post::new(titles, "\n  正文内容  \n".to_string());
        assert_eq!(post.content, "正文内容");
    }
}
