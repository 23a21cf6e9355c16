// Cross-cutting prompt constants shared by the generation backends and the
// scoring judges.

/// System prompt for blog-post generation calls.
pub const GENERATION_SYSTEM: &str = "You are an expert analyst writing for an audience of \
    startup founders and venture investors. You write concise, data-driven prose \
    with no section headers, no bullet lists, and no preamble. \
    Respond with the blog post text only.";

/// System prompt for the rubric judge — enforces the parseable score line.
pub const JUDGE_SYSTEM: &str = "You are an expert blog post evaluator. \
    You always begin your response with a line of the form 'Score: NN' \
    where NN is an overall score from 0 to 100.";

/// Rubric-judge prompt template. Replace `{reference}` and `{candidate}`
/// before sending.
pub const RUBRIC_JUDGE_PROMPT_TEMPLATE: &str = r#"You are comparing AI-generated content with published reference content.

**Task**: Evaluate how well the AI-generated post matches the style, quality, and characteristics of the published reference post.

**Published Reference Post** (high-quality reference writing):
{reference}

**AI-Generated Post** (to be evaluated):
{candidate}

**Evaluation Criteria** (weigh as follows):
1. Voice & Style Match (25%): Does the AI capture the analytical, data-driven voice?
2. Structure & Flow (20%): Does it follow the reference paragraph structure and logical flow?
3. Content Depth (20%): Is the insight depth comparable to the reference?
4. Data Integration (15%): Does it use statistics and examples effectively?
5. Hook Effectiveness (10%): Is the opening as engaging as the reference style?
6. Conclusion Impact (10%): Does it end with forward-looking insights?

**Output Format**:
Score: [0-100 overall score]

**Key Strengths**: [2-3 things the AI did well]
**Key Weaknesses**: [2-3 areas needing improvement]
**Overall Assessment**: [1-2 sentences on overall quality]

Be precise and constructive. Focus on actionable insights."#;

/// Head-to-head comparison prompt template. Replace `{reference}` and
/// `{candidate}` before sending.
pub const PAIRWISE_PROMPT_TEMPLATE: &str = r#"Compare the two posts below head-to-head.

**Post A** (reference):
{reference}

**Post B** (candidate):
{candidate}

How does Post B's insight quality and depth compare to Post A's? Respond with a single line of the form 'Score: NN' where NN is 0-100: 50 means equal quality, above 50 means Post B is stronger, below 50 means Post A is stronger."#;
