/// The reply framing the parser's labeled-line strategy expects. Models
/// follow it most of the time; everything in `parse.rs` exists for the times
/// they don't.
const PROMPT_TEMPLATE: &str = r#"
请为主题"{topic}"创作小红书内容。

要求：
1. 共5个标题，每个标题都要包含emoji，长度在20字以内
2. 正文要包含emoji和话题标签，长度在800字以内

格式要求：
标题1: [包含emoji的标题1]
标题2: [包含emoji的标题2]
标题3: [包含emoji的标题3]
标题4: [包含emoji的标题4]
标题5: [包含emoji的标题5]

正文:
[包含emoji和标签的正文内容]
"#;

pub fn build_prompt(topic: &str) -> String {
    PROMPT_TEMPLATE.replace("{topic}", topic)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embeds_topic_verbatim() {
        let prompt = build_prompt("健康饮食");
        assert!(prompt.contains("\"健康饮食\""));
    }

    #[test]
    fn asks_for_the_labeled_framing() {
        let prompt = build_prompt("旅行攻略");
        for n in 1..=5 {
            assert!(prompt.contains(&format!("标题{n}:")));
        }
        assert!(prompt.contains("正文:"));
    }
}
