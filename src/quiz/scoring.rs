use crate::quiz::catalog::{Catalog, Category};
use crate::quiz::AnswerSet;

/// A category at or above this score is green.
pub const GREEN_FROM: u32 = 9;
/// A category at or above this score (and below green) is yellow.
pub const YELLOW_FROM: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Level {
    Red,
    Yellow,
    Green,
}

impl Level {
    pub fn from_score(score: u32) -> Self {
        if score >= GREEN_FROM {
            Level::Green
        } else if score >= YELLOW_FROM {
            Level::Yellow
        } else {
            Level::Red
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Level::Red => "#ef4444",
            Level::Yellow => "#f97316",
            Level::Green => "#22c55e",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Level::Red => "紅燈",
            Level::Yellow => "黃燈",
            Level::Green => "綠燈",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Level::Red => "🔴",
            Level::Yellow => "🟡",
            Level::Green => "🟢",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DimensionSummary {
    pub category: Category,
    pub score: u32,
    pub level: Level,
    pub color: &'static str,
    pub description: &'static str,
    pub suggestion: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreSummary {
    pub dimensions: Vec<DimensionSummary>,
    pub total: u32,
}

impl ScoreSummary {
    pub fn get(&self, category: Category) -> Option<&DimensionSummary> {
        self.dimensions.iter().find(|d| d.category == category)
    }

    /// Every category has exactly one entry.
    pub fn is_complete(&self) -> bool {
        self.dimensions.len() == Category::ALL.len()
            && Category::ALL.iter().all(|c| self.get(*c).is_some())
    }
}

/// Sums answer values per category. Unanswered questions count as zero, so
/// any answer set (including an empty one) yields a full summary.
pub fn summarize(answers: &AnswerSet, catalog: &Catalog) -> ScoreSummary {
    let dimensions = Category::ALL
        .iter()
        .map(|category| {
            let score = catalog
                .in_category(*category)
                .map(|q| answers.get(q.id).map(u32::from).unwrap_or(0))
                .sum::<u32>();
            let level = Level::from_score(score);
            DimensionSummary {
                category: *category,
                score,
                level,
                color: level.color(),
                description: category.description(),
                suggestion: category.suggestion(level),
            }
        })
        .collect::<Vec<_>>();

    let total = dimensions.iter().map(|d| d.score).sum();
    ScoreSummary { dimensions, total }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn all_answered(value: u8) -> AnswerSet {
        let mut answers = AnswerSet::default();
        for question in Catalog::builtin().questions() {
            answers.insert(question.id, value);
        }
        answers
    }

    #[test]
    fn level_boundaries() {
        assert_eq!(Level::from_score(12), Level::Green);
        assert_eq!(Level::from_score(9), Level::Green);
        assert_eq!(Level::from_score(8), Level::Yellow);
        assert_eq!(Level::from_score(5), Level::Yellow);
        assert_eq!(Level::from_score(4), Level::Red);
        assert_eq!(Level::from_score(0), Level::Red);
    }

    #[test]
    fn empty_answers_score_zero_everywhere() {
        let summary = summarize(&AnswerSet::default(), &Catalog::builtin());
        assert!(summary.is_complete());
        assert_eq!(summary.total, 0);
        assert!(summary.dimensions.iter().all(|d| d.level == Level::Red));
    }

    #[test]
    fn full_marks_are_all_green() {
        let summary = summarize(&all_answered(3), &Catalog::builtin());
        assert_eq!(summary.total, 48);
        for dimension in &summary.dimensions {
            assert_eq!(dimension.score, 12);
            assert_eq!(dimension.level, Level::Green);
            assert_eq!(dimension.color, "#22c55e");
        }
    }

    #[test]
    fn scores_only_count_their_own_category() {
        let mut answers = AnswerSet::default();
        // questions 5..=8 are the social block
        answers.insert(5, 3);
        answers.insert(6, 2);
        let summary = summarize(&answers, &Catalog::builtin());
        assert_eq!(summary.get(Category::SocialPresence).map(|d| d.score), Some(5));
        assert_eq!(
            summary.get(Category::SocialPresence).map(|d| d.level),
            Some(Level::Yellow)
        );
        assert_eq!(summary.get(Category::Appearance).map(|d| d.score), Some(0));
        assert_eq!(summary.total, 5);
    }

    #[test]
    fn suggestion_follows_level() {
        let summary = summarize(&all_answered(2), &Catalog::builtin());
        let mindset = summary.get(Category::Mindset).unwrap();
        assert_eq!(mindset.score, 8);
        assert_eq!(mindset.suggestion, Category::Mindset.suggestion(Level::Yellow));
    }

    #[test]
    fn answers_for_unknown_questions_are_ignored() {
        let mut answers = all_answered(1);
        answers.insert(999, 3);
        assert_eq!(summarize(&answers, &Catalog::builtin()).total, 16);
    }

    fn answers_strategy() -> impl Strategy<Value = Vec<Option<u8>>> {
        prop::collection::vec(prop::option::of(0u8..=3), 16)
    }

    proptest! {
        #[test]
        fn totals_stay_in_range(values in answers_strategy()) {
            let catalog = Catalog::builtin();
            let mut answers = AnswerSet::default();
            for (question, value) in catalog.questions().iter().zip(&values) {
                if let Some(value) = value {
                    answers.insert(question.id, *value);
                }
            }
            let summary = summarize(&answers, &catalog);
            prop_assert!(summary.total <= 48);
            for dimension in &summary.dimensions {
                prop_assert!(dimension.score <= 12);
                prop_assert_eq!(dimension.level, Level::from_score(dimension.score));
            }
            prop_assert_eq!(summary.total, summary.dimensions.iter().map(|d| d.score).sum::<u32>());
        }

        #[test]
        fn level_is_monotonic(a in 0u32..=12, b in 0u32..=12) {
            let rank = |l: Level| match l { Level::Red => 0, Level::Yellow => 1, Level::Green => 2 };
            if a <= b {
                prop_assert!(rank(Level::from_score(a)) <= rank(Level::from_score(b)));
            }
        }
    }
}
