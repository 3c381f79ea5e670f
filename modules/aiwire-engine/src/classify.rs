//! Keyword classifier for news and organization-update entries.
//!
//! Pure and deterministic: the category precedence and the keyword sets live
//! in one ordered table, evaluated by a single dispatch function. First
//! category with any keyword hit wins; entries matching nothing fall back to
//! `TECH`.

use aiwire_common::NewsCategory;

/// Ordered (category, keywords) table. Order is precedence: the first
/// category with a hit becomes the entry's category. Keywords are matched as
/// substrings against the lowercased title+body, so they must be lowercase
/// here (CJK keywords are unaffected by case).
pub const CATEGORY_KEYWORDS: &[(NewsCategory, &[&str])] = &[
    (
        NewsCategory::Funding,
        &[
            "融资", "投资", "funding", "raised", "raises", "million", "billion", "investment",
            "series", "估值", "valuation",
        ],
    ),
    (
        NewsCategory::Product,
        &[
            "发布", "新品", "launch", "release", "product", "model", "gpt", "chatgpt", "claude",
            "gemini", "模型",
        ],
    ),
    (
        NewsCategory::Hiring,
        &["招聘", "hiring", "join", "hire", "职位", "人才", "加入"],
    ),
    (
        NewsCategory::Acquisition,
        &["收购", "acquisition", "acquire", "并购", "buy"],
    ),
    (
        NewsCategory::Partnership,
        &["合作", "partnership", "collaborate", "partner", "team", "联盟"],
    ),
    (
        NewsCategory::Policy,
        &["政策", "法规", "regulation", "law", "policy", "ai act", "合规"],
    ),
    (
        NewsCategory::Trend,
        &["趋势", "market", "industry", "analysis", "报告", "预测"],
    ),
    (
        NewsCategory::Tech,
        &["技术", "突破", "algorithm", "architecture", "method", "paper", "research"],
    ),
];

const MAX_TAGS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub category: NewsCategory,
    /// Up to three matched keywords, collected in table order, deduplicated.
    pub tags: Vec<String>,
}

/// Classify an entry by its title and body text.
pub fn classify(title: &str, body: &str) -> Classification {
    let text = format!("{title} {body}").to_lowercase();

    let mut category = None;
    let mut tags: Vec<String> = Vec::new();

    for (cat, keywords) in CATEGORY_KEYWORDS {
        let mut hit = false;
        for keyword in *keywords {
            if text.contains(keyword) {
                hit = true;
                if tags.len() < MAX_TAGS && !tags.iter().any(|t| t == keyword) {
                    tags.push((*keyword).to_string());
                }
            }
        }
        if hit && category.is_none() {
            category = Some(*cat);
        }
    }

    Classification {
        category: category.unwrap_or_default(),
        tags,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn funding_outranks_product() {
        // "series" (funding) and "model" (product) both hit; funding comes
        // first in the table.
        let c = classify("Acme raises $50M Series B to build new model", "");
        assert_eq!(c.category, NewsCategory::Funding);
    }

    #[test]
    fn product_launch() {
        let c = classify("OpenAI launches new ChatGPT feature", "");
        assert_eq!(c.category, NewsCategory::Product);
        assert!(c.tags.iter().any(|t| t == "launch" || t == "chatgpt"));
    }

    #[test]
    fn acquisition_text() {
        let c = classify("Big Corp to acquire tiny startup", "");
        assert_eq!(c.category, NewsCategory::Acquisition);
    }

    #[test]
    fn cjk_keywords_match() {
        let c = classify("某公司完成新一轮融资", "估值超过十亿美元");
        assert_eq!(c.category, NewsCategory::Funding);
        assert!(c.tags.contains(&"融资".to_string()));
    }

    #[test]
    fn no_match_falls_back_to_tech_with_empty_tags() {
        let c = classify("Quiet day in the valley", "nothing much happened");
        assert_eq!(c.category, NewsCategory::Tech);
        assert!(c.tags.is_empty());
    }

    #[test]
    fn tags_capped_at_three() {
        let c = classify(
            "funding raised million billion investment series",
            "launch release product",
        );
        assert_eq!(c.tags.len(), 3);
    }

    #[test]
    fn deterministic_for_identical_input() {
        let a = classify("Anthropic partners with university on research", "");
        let b = classify("Anthropic partners with university on research", "");
        assert_eq!(a, b);
    }

    #[test]
    fn case_insensitive_matching() {
        let c = classify("MASSIVE FUNDING ROUND ANNOUNCED", "");
        assert_eq!(c.category, NewsCategory::Funding);
    }
}
