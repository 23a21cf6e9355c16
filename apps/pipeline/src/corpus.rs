//! Corpus source — abstract provider of published reference posts.
//!
//! The analyzer does not care where posts come from. The bundled
//! `SampleCorpus` serves a small set of hand-curated posts with
//! date-staggered variations; a scraper or content store would implement
//! the same trait.

use chrono::{Duration, Utc};

use crate::errors::PipelineError;

/// One raw corpus entry, prior to analysis.
#[derive(Debug, Clone)]
pub struct CorpusEntry {
    pub title: String,
    pub url: String,
    pub text: String,
    pub date: String,
}

/// Enumerable source of reference posts.
pub trait CorpusSource: Send + Sync {
    fn fetch(&self, count: usize) -> Result<Vec<CorpusEntry>, PipelineError>;
}

/// Bundled sample posts, cycled with title/date variations to reach the
/// requested count.
pub struct SampleCorpus;

struct SamplePost {
    title: &'static str,
    url: &'static str,
    content: &'static str,
}

impl CorpusSource for SampleCorpus {
    fn fetch(&self, count: usize) -> Result<Vec<CorpusEntry>, PipelineError> {
        let now = Utc::now();
        let entries = (0..count)
            .map(|i| {
                let base = &SAMPLE_POSTS[i % SAMPLE_POSTS.len()];
                let date = (now - Duration::days(i as i64)).format("%Y-%m-%d").to_string();
                let title = if i < SAMPLE_POSTS.len() {
                    base.title.to_string()
                } else {
                    format!("{} - Variation {}", base.title, i + 1)
                };
                CorpusEntry {
                    title,
                    url: base.url.to_string(),
                    text: base.content.to_string(),
                    date,
                }
            })
            .collect();
        Ok(entries)
    }
}

const SAMPLE_POSTS: [SamplePost; 3] = [
    SamplePost {
        title: "Why AI Agents Will Transform B2B Sales in 2025",
        url: "https://example.com/ai-agents-b2b-sales/",
        content: "The landscape of B2B sales is shifting beneath our feet.\n\n\
What happens when artificial intelligence becomes your best sales development representative?\n\n\
Companies like Klarna have already demonstrated the power of AI agents in customer service, reducing costs by 66% while improving resolution times. The same transformation is now beginning in B2B sales, where AI agents are starting to handle lead qualification, meeting scheduling, and initial prospect research with remarkable effectiveness.\n\n\
Three factors are driving this transformation. First, the quality of language models has reached a threshold where they can engage in sophisticated sales conversations. They can understand context, ask relevant questions, and provide personalized responses that feel genuinely human. Second, integration capabilities have matured to the point where AI agents can seamlessly access CRM systems, email platforms, and scheduling tools. Third, the cost differential is becoming impossible to ignore.\n\n\
The math is compelling for early adopters. A human SDR costs approximately $75,000 annually in total compensation, while an AI agent can handle similar tasks for less than $500 per month. This 150x cost advantage means companies can deploy dozens of AI agents for the price of a single human hire.\n\n\
However, the most successful implementations won't replace human sales professionals entirely. Instead, they'll create hybrid teams where AI agents handle initial prospecting and qualification, freeing human salespeople to focus on relationship building and complex deal negotiations. This division of labor plays to each participant's strengths.\n\n\
The companies that embrace this transformation in 2025 will build significant competitive advantages in pipeline generation and sales efficiency.",
    },
    SamplePost {
        title: "The Rise of Micro-SaaS: Why Small Software Companies Are Winning",
        url: "https://example.com/micro-saas-winning/",
        content: "Venture capital has trained us to think big.\n\n\
But what if the future belongs to the deliberately small?\n\n\
A new category of software companies is emerging that challenges conventional wisdom about scale and growth. These micro-SaaS businesses typically generate $10,000 to $500,000 in annual recurring revenue, serve highly specific niches, and often operate with teams of one to five people. Despite their modest size, they're achieving profit margins that would make Fortune 500 companies envious.\n\n\
The enabling factors are technological and economic. Modern development frameworks allow individual developers to build sophisticated applications in weeks rather than months. Cloud infrastructure costs have fallen to the point where hosting a micro-SaaS application costs less than $100 monthly. Payment processing, customer support, and marketing automation can all be handled through APIs and integrations.\n\n\
More importantly, the market has become incredibly fragmented. Every industry now has dozens of specialized workflows that larger software companies consider too small to address. A micro-SaaS focused on invoice processing for wedding photographers can capture an entire market segment that the major platforms would never prioritize.\n\n\
The financial model is surprisingly robust. A micro-SaaS business serving 200 customers at $99 monthly generates nearly $240,000 in annual revenue. With gross margins typically exceeding 90% and minimal overhead costs, the founder often takes home more than senior engineers at major tech companies.\n\n\
This trend represents a fundamental shift in how we think about software entrepreneurship. The tools for building and distributing software have become so accessible that individual creativity and market insight matter more than capital or team size.",
    },
    SamplePost {
        title: "How Data Teams Are Becoming Revenue Drivers",
        url: "https://example.com/data-teams-revenue-drivers/",
        content: "Data teams used to be cost centers.\n\n\
Now they're becoming the engine of revenue growth.\n\n\
The transformation is happening across industries as companies discover that sophisticated data analysis can directly drive sales and customer acquisition. Rather than simply reporting on what happened last quarter, modern data teams are predicting which prospects will convert, identifying expansion opportunities within existing accounts, and optimizing pricing strategies in real-time.\n\n\
This evolution reflects three fundamental changes in how businesses operate. First, the volume and quality of customer data has reached a critical mass where machine learning models can make accurate predictions about behavior. Second, business intelligence tools have become sophisticated enough for non-technical teams to act on data insights immediately. Third, competitive pressure has forced companies to become more scientific about growth.\n\n\
Consider how a streaming platform's data team drives revenue. They analyze listening patterns to predict which users are likely to upgrade to premium subscriptions, then trigger personalized marketing campaigns at precisely the right moment. This approach has helped achieve a premium conversion rate of approximately 46%, significantly higher than industry averages.\n\n\
However, success requires more than technical capability. The highest-performing data teams combine statistical expertise with deep business intuition. They understand that correlation isn't causation and that the most elegant model is worthless if it doesn't drive practical decisions.\n\n\
Companies that treat their data teams as strategic revenue partners rather than analytical support functions will build substantial competitive advantages in customer acquisition and retention.",
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_returns_requested_count() {
        let entries = SampleCorpus.fetch(7).unwrap();
        assert_eq!(entries.len(), 7);
    }

    #[test]
    fn test_variations_get_distinct_titles() {
        let entries = SampleCorpus.fetch(5).unwrap();
        assert!(entries[3].title.contains("Variation 4"));
        assert_ne!(entries[0].title, entries[3].title);
    }

    #[test]
    fn test_sample_posts_carry_data_points() {
        let entries = SampleCorpus.fetch(1).unwrap();
        assert!(entries[0].text.contains("66%"));
    }
}
