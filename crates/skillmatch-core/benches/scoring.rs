use criterion::{black_box, criterion_group, criterion_main, Criterion};

use skillmatch_core::jobs::match_score;
use skillmatch_core::model::{Difficulty, Question};
use skillmatch_core::scoring::score_percent;

fn make_questions(n: usize) -> Vec<Question> {
    (0..n)
        .map(|i| Question {
            text: format!("question {i}"),
            options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            correct_index: i % 4,
            difficulty: Difficulty::Medium,
        })
        .collect()
}

fn make_answers(questions: &[Question], correct_every: usize) -> Vec<Option<usize>> {
    questions
        .iter()
        .enumerate()
        .map(|(i, q)| {
            if i % correct_every == 0 {
                Some(q.correct_index)
            } else {
                Some((q.correct_index + 1) % q.options.len())
            }
        })
        .collect()
}

fn bench_score_percent(c: &mut Criterion) {
    let mut group = c.benchmark_group("score_percent");

    for n in [5usize, 50, 500] {
        let questions = make_questions(n);
        let answers = make_answers(&questions, 2);
        group.bench_function(format!("n={n}"), |b| {
            b.iter(|| score_percent(black_box(&questions), black_box(&answers)))
        });
    }

    group.finish();
}

fn bench_match_score(c: &mut Criterion) {
    let mut group = c.benchmark_group("match_score");

    let profile: Vec<String> = (0..40).map(|i| format!("skill-{i}")).collect();
    let required: Vec<String> = (0..10).map(|i| format!("skill-{}", i * 3)).collect();

    group.bench_function("profile=40,required=10", |b| {
        b.iter(|| match_score(black_box(&profile), black_box(&required)))
    });

    group.finish();
}

criterion_group!(benches, bench_score_percent, bench_match_score);
criterion_main!(benches);
