use tj_core::ContentItem;

pub fn bias_prompt(item: &ContentItem) -> String {
    format!(
        "Analyze the following article for potential bias. Consider:\n\
         1. Language and tone\n\
         2. Source credibility\n\
         3. Fact presentation\n\
         4. Balance of viewpoints\n\n\
         Title: {}\n\
         Author: {}\n\
         Source: {}\n\
         Content: {}\n\n\
         Provide a JSON response with:\n\
         - bias_level: (number between -1 and 1, where -1 is extremely left-leaning, 0 is neutral, 1 is extremely right-leaning)\n\
         - confidence: (number between 0 and 1)\n\
         - reasoning: (string explaining the analysis)",
        item.title, item.author, item.source_name, item.summary
    )
}

pub fn summary_prompt(item: &ContentItem) -> String {
    format!(
        "Summarize the following article in a concise, informative manner:\n\n\
         Title: {}\n\
         Author: {}\n\
         Content: {}\n\n\
         Provide a 2-3 sentence summary that captures the key points and main message.",
        item.title, item.author, item.summary
    )
}

pub fn trajectory_prompt(items: &[ContentItem]) -> String {
    let articles = items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            format!(
                "Article {}:\nDate: {}\nTitle: {}\nSummary: {}",
                i + 1,
                item.published_at.format("%Y-%m-%d %H:%M UTC"),
                item.title,
                item.summary
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "Analyze how this story has evolved across multiple articles. Consider:\n\
         1. Key developments\n\
         2. Changing perspectives\n\
         3. New information\n\
         4. Shifts in tone or focus\n\n\
         Articles in chronological order:\n{}\n\n\
         Provide a JSON response with:\n\
         - evolution: (array of key developments in chronological order)\n\
         - perspective_shifts: (array of notable changes in how the story is being told)\n\
         - confidence: (number between 0 and 1 indicating confidence in the analysis)",
        articles
    )
}

pub fn related_prompt(item: &ContentItem, candidates: &[ContentItem]) -> String {
    let candidates = candidates
        .iter()
        .enumerate()
        .map(|(i, c)| format!("Candidate {}:\nTitle: {}\nSummary: {}", i + 1, c.title, c.summary))
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "Compare the following article with each candidate article and rate their relatedness on a scale of 0 to 1, \
         where 1 means directly related (same story/topic) and 0 means completely unrelated.\n\n\
         Base article:\nTitle: {}\nSummary: {}\n\n{}\n\n\
         Provide a JSON array of scores, one for each candidate article.",
        item.title, item.summary, candidates
    )
}
