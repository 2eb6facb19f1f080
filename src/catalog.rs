use crate::models::Question;
use std::collections::BTreeMap;

pub const DEFAULT_QUESTION_ID: &str = "1";

pub const DEFAULT_QUESTION_TEXT: &str = "Do you agree or disagree with the following statement? Modern technology has made life more complicated. Use specific reasons and examples to support your answer.";

const DEFAULT_REFERENCE_ANSWER: &str = "Technology has both simplified and complicated modern life. While it has automated many tasks and improved communication, it has also introduced new challenges like digital security concerns, information overload, and technological dependence. However, these complications are balanced by significant benefits in healthcare, education, and global connectivity. The key to managing technology is developing proper skills and establishing boundaries for its use.";

#[derive(Debug, Clone)]
pub struct Catalog {
    questions: BTreeMap<String, String>,
    reference_answers: BTreeMap<String, String>,
}

impl Default for Catalog {
    fn default() -> Self {
        let mut questions = BTreeMap::new();
        questions.insert(DEFAULT_QUESTION_ID.to_string(), DEFAULT_QUESTION_TEXT.to_string());

        let mut reference_answers = BTreeMap::new();
        reference_answers.insert(
            DEFAULT_QUESTION_ID.to_string(),
            DEFAULT_REFERENCE_ANSWER.to_string(),
        );

        Self {
            questions,
            reference_answers,
        }
    }
}

impl Catalog {
    pub fn question(&self, id: &str) -> Option<Question> {
        self.questions.get(id).map(|text| Question {
            id: id.to_string(),
            text: text.clone(),
        })
    }

    pub fn reference_answer(&self, id: &str) -> &str {
        self.reference_answers
            .get(id)
            .map(String::as_str)
            .unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_question_is_served() {
        let catalog = Catalog::default();
        let question = catalog.question("1").expect("question 1");
        assert_eq!(question.id, "1");
        assert!(question.text.starts_with("Do you agree or disagree"));
        assert!(catalog.question("2").is_none());
    }

    #[test]
    fn unknown_reference_answer_is_empty() {
        let catalog = Catalog::default();
        assert!(catalog.reference_answer("1").starts_with("Technology has both"));
        assert_eq!(catalog.reference_answer("42"), "");
    }
}
