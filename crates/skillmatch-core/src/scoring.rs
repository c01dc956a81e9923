//! Assessment scoring.
//!
//! A completed session scores the percentage of answered-correct questions,
//! rounded half-up to an integer in [0, 100]. A session terminated for
//! violations is forced to 0 elsewhere; this module only computes the
//! honest percentage.

use crate::model::Question;

/// Percentage of questions whose recorded answer matches the correct
/// option, rounded half-up. `answers` must be position-aligned with
/// `questions`; unanswered positions count as incorrect.
pub fn score_percent(questions: &[Question], answers: &[Option<usize>]) -> u8 {
    if questions.is_empty() {
        return 0;
    }
    let correct = correct_count(questions, answers);
    round_half_up_percent(correct, questions.len())
}

/// Number of positions where the recorded answer equals the correct index.
pub fn correct_count(questions: &[Question], answers: &[Option<usize>]) -> usize {
    questions
        .iter()
        .zip(answers.iter())
        .filter(|(q, a)| **a == Some(q.correct_index))
        .count()
}

/// Integer `round(100 * part / whole)` with half-up tie-breaking, computed
/// without floating point so exact .5 cases round predictably.
pub(crate) fn round_half_up_percent(part: usize, whole: usize) -> u8 {
    debug_assert!(whole > 0);
    debug_assert!(part <= whole);
    ((200 * part + whole) / (2 * whole)) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Difficulty;

    fn questions(n: usize) -> Vec<Question> {
        (0..n)
            .map(|i| Question {
                text: format!("question {i}"),
                options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
                correct_index: i % 4,
                difficulty: Difficulty::Easy,
            })
            .collect()
    }

    fn answers_with_correct(qs: &[Question], correct: usize) -> Vec<Option<usize>> {
        qs.iter()
            .enumerate()
            .map(|(i, q)| {
                if i < correct {
                    Some(q.correct_index)
                } else {
                    Some((q.correct_index + 1) % q.options.len())
                }
            })
            .collect()
    }

    #[test]
    fn three_of_five_scores_sixty() {
        let qs = questions(5);
        let answers = answers_with_correct(&qs, 3);
        assert_eq!(score_percent(&qs, &answers), 60);
    }

    #[test]
    fn all_correct_scores_hundred() {
        let qs = questions(5);
        let answers = answers_with_correct(&qs, 5);
        assert_eq!(score_percent(&qs, &answers), 100);
    }

    #[test]
    fn unanswered_counts_as_incorrect() {
        let qs = questions(4);
        let mut answers = answers_with_correct(&qs, 4);
        answers[3] = None;
        assert_eq!(score_percent(&qs, &answers), 75);
    }

    #[test]
    fn exact_half_rounds_up() {
        // 1/8 = 12.5% -> 13, 3/8 = 37.5% -> 38
        assert_eq!(round_half_up_percent(1, 8), 13);
        assert_eq!(round_half_up_percent(3, 8), 38);
    }

    #[test]
    fn below_half_rounds_down() {
        // 1/3 = 33.33% -> 33, 2/3 = 66.67% -> 67
        assert_eq!(round_half_up_percent(1, 3), 33);
        assert_eq!(round_half_up_percent(2, 3), 67);
    }

    #[test]
    fn score_is_always_in_range() {
        for n in 1..=20usize {
            let qs = questions(n);
            for correct in 0..=n {
                let answers = answers_with_correct(&qs, correct);
                let score = score_percent(&qs, &answers);
                assert!(score <= 100, "score {score} out of range for {correct}/{n}");
            }
        }
    }

    #[test]
    fn empty_question_list_scores_zero() {
        assert_eq!(score_percent(&[], &[]), 0);
    }
}
