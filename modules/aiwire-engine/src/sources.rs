//! Fixed rosters: syndication feeds and the organization-name list.

/// One syndication source: display name, feed URL, and the label stored on
/// items ingested from it.
pub struct FeedSource {
    pub name: &'static str,
    pub url: &'static str,
    pub source: &'static str,
}

/// AI news feeds, polled in declaration order.
pub const FEED_SOURCES: &[FeedSource] = &[
    FeedSource {
        name: "机器之心",
        url: "https://www.jiqizhixin.com/rss",
        source: "机器之心",
    },
    FeedSource {
        name: "量子位",
        url: "https://www.qbitai.com/feed",
        source: "量子位",
    },
    FeedSource {
        name: "TechCrunch AI",
        url: "https://techcrunch.com/category/artificial-intelligence/feed/",
        source: "TechCrunch",
    },
];

/// Organization roster for update extraction. Matching is case-sensitive
/// substring search; declaration order is precedence, first match wins.
pub const ORGANIZATIONS: &[&str] = &[
    "OpenAI",
    "Anthropic",
    "Google",
    "DeepMind",
    "Microsoft",
    "Meta",
    "Facebook",
    "Amazon",
    "Apple",
    "Nvidia",
    "Tesla",
    "xAI",
    "Mistral",
    "Cohere",
    "AI21 Labs",
    "百度",
    "阿里",
    "腾讯",
    "字节跳动",
    "智谱",
    "月之暗面",
    "MiniMax",
    "零一万物",
    "科大讯飞",
    "华为",
    "商汤",
    "旷视",
    "依图",
    "百川智能",
    "面壁智能",
    "阶跃星辰",
    "Stability AI",
    "Midjourney",
    "Runway",
    "Character.AI",
    "Perplexity",
];

/// Find the first roster organization mentioned in the given text.
pub fn find_organization(text: &str) -> Option<&'static str> {
    ORGANIZATIONS.iter().find(|org| text.contains(*org)).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_first_in_declaration_order() {
        // Both OpenAI and Microsoft appear; OpenAI is declared first.
        let text = "Microsoft deepens its OpenAI partnership";
        assert_eq!(find_organization(text), Some("OpenAI"));
    }

    #[test]
    fn matching_is_case_sensitive() {
        assert_eq!(find_organization("openai ships a thing"), None);
        assert_eq!(find_organization("OpenAI ships a thing"), Some("OpenAI"));
    }

    #[test]
    fn cjk_names_match() {
        assert_eq!(find_organization("智谱发布新模型"), Some("智谱"));
    }

    #[test]
    fn no_roster_name_means_none() {
        assert_eq!(find_organization("Acme raises $50M Series B"), None);
    }
}
