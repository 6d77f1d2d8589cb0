//! Fixed prompt for the compatibility judgement call.
//!
//! Two static system blocks: a domain-knowledge block describing how
//! relationship compatibility is assessed, and a task block that pins the
//! required JSON output shape. The user turn carries the two signed photo
//! URLs and nothing else.

use serde_json::{json, Value};

/// Background block given to the model before the task itself
pub const DOMAIN_KNOWLEDGE: &str = "To determine compatibility in relationships, key methods include:\n\
    \n\
    Similarity: Matching on personality traits, values, and interests.\n\
    Complementarity: Some research supports the idea that opposites attract, though this is debated.\n\
    Communication: Effective and open communication patterns are crucial for compatibility.\n\
    Behavioral Interdependence: How well partners' actions mesh over time impacts long-term compatibility.\n\
    Psychological Factors: Traits like emotional stability, agreeableness, and attachment styles are predictive of compatibility.\n\
    These factors collectively influence satisfaction, stability, and relationship longevity.";

/// Task block pinning the `{score, reason}` output shape
pub const TASK: &str = "Take in two images. \n\
    Image 1 is of the user, and Image 2 is of someone they may be compatible with. \n\
    Judge the images and return a JSON response that shows how compatible they would be in terms of a relationship. \n\
    The score is fictional and just based on how they look and what they may be into based on stereotypes.\n\
    The response should look like this: \n\
    {\"score\": \"a compatibility score from 0 to 100\", \"reason\": \"reasoning why, short\"}";

/// Build the full chat completion request body for one photo pair
pub fn completion_request(model: &str, subject_url: &str, candidate_url: &str) -> Value {
    json!({
        "model": model,
        "messages": [
            {
                "role": "system",
                "content": [
                    { "type": "text", "text": DOMAIN_KNOWLEDGE },
                    { "type": "text", "text": TASK }
                ]
            },
            {
                "role": "user",
                "content": [
                    { "type": "image_url", "image_url": { "url": subject_url } },
                    { "type": "image_url", "image_url": { "url": candidate_url } }
                ]
            }
        ]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_carries_both_image_urls() {
        let request = completion_request("gpt-4o-mini", "https://s3.test/u1", "https://s3.test/u2");

        assert_eq!(request["model"], "gpt-4o-mini");

        let user_content = request["messages"][1]["content"].as_array().unwrap();
        assert_eq!(user_content.len(), 2);
        assert_eq!(user_content[0]["type"], "image_url");
        assert_eq!(user_content[0]["image_url"]["url"], "https://s3.test/u1");
        assert_eq!(user_content[1]["image_url"]["url"], "https://s3.test/u2");
    }

    #[test]
    fn test_system_turn_has_knowledge_and_task_blocks() {
        let request = completion_request("gpt-4o-mini", "u1", "u2");

        let system_content = request["messages"][0]["content"].as_array().unwrap();
        assert_eq!(system_content.len(), 2);
        assert_eq!(system_content[0]["text"], DOMAIN_KNOWLEDGE);
        assert_eq!(system_content[1]["text"], TASK);
    }
}
