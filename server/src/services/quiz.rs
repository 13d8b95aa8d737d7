//! Quiz grading and rewards
//!
//! Questions go out without their answers and are graded here. Reward
//! tables are pure functions of the score so they can be checked on
//! their own.

use crate::catalog::books::book_quiz;
use crate::catalog::quizzes::{
    dragon_village_pool, find, QuestionType, QuizDifficulty, QuizQuestion, POKEMON_QUESTIONS,
};
use crate::config::{
    EBOOK_QUIZ_PASS_PERCENT, ENGLISH_QUIZ_OPTIONS, ENGLISH_QUIZ_QUESTIONS,
    STANDALONE_QUIZ_QUESTIONS,
};
use crate::database::{
    EbookQuizProgress, NewQuizAttempt, NewQuizResult, QuizAttempt, QuizResult, QuizTier,
    Repository,
};
use crate::error::{AppError, Result};
use crate::services::badges::BadgesService;
use crate::services::ebooks::lookup;
use crate::services::learning::LearningReward;
use crate::services::ledger::LedgerService;
use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::str::FromStr;

const DRAGON_STREAK_BONUS: i64 = 300;
const DRAGON_STREAK_THRESHOLD: i64 = 5;
const MIN_HINT_MULTIPLIER: f64 = 0.1;
const HINT_PENALTY: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuizKind {
    Pokemon,
    DragonVillage,
    English,
}

impl QuizKind {
    pub fn as_str(self) -> &'static str {
        match self {
            QuizKind::Pokemon => "pokemon",
            QuizKind::DragonVillage => "dragon-village",
            QuizKind::English => "english",
        }
    }
}

impl FromStr for QuizKind {
    type Err = AppError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "pokemon" => Ok(QuizKind::Pokemon),
            "dragon-village" => Ok(QuizKind::DragonVillage),
            "english" => Ok(QuizKind::English),
            other => Err(AppError::QuizNotFound(other.to_string())),
        }
    }
}

// ===== Reward tables =====

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QuizReward {
    pub points: i64,
    pub ticket_minutes: i64,
    pub stars: i64,
    pub message: Option<String>,
}

pub fn score_percent(correct: i64, total: i64) -> i64 {
    if total <= 0 {
        return 0;
    }
    (correct as f64 * 100.0 / total as f64).round() as i64
}

fn stars_from(score: i64, top: i64) -> i64 {
    if score >= top {
        3
    } else if score >= 70 {
        2
    } else if score >= 40 {
        1
    } else {
        0
    }
}

pub fn dragon_village_reward(score: i64, correct: i64, max_streak: i64) -> QuizReward {
    let (mut points, message) = if score == 100 {
        (3000, "드래곤 빌리지 퀴즈 만점! 🐉🏆")
    } else if score >= 90 {
        (2500, "드래곤 빌리지 마스터! 🐉⭐")
    } else if score >= 80 {
        (2000, "드래곤 빌리지 고수! 🐉💪")
    } else if score >= 70 {
        (1500, "드래곤 빌리지 도전자! 🐉")
    } else if score >= 50 {
        (1000, "드래곤 빌리지 학습중!")
    } else if correct > 0 {
        (500, "드래곤 빌리지 도전!")
    } else {
        (0, "")
    };

    let mut message = message.to_string();
    if points > 0 && max_streak >= DRAGON_STREAK_THRESHOLD {
        points += DRAGON_STREAK_BONUS;
        message.push_str(&format!(" ({}연속 보너스!)", max_streak));
    }

    QuizReward {
        points,
        ticket_minutes: 0,
        stars: stars_from(score, 90),
        message: (points > 0).then_some(message),
    }
}

pub fn pokemon_reward(score: i64) -> QuizReward {
    let (points, ticket_minutes, message) = if score == 100 {
        (2000, 60, "포켓몬 퀴즈 만점! 🏆".to_string())
    } else if score >= 80 {
        (1500, 45, format!("포켓몬 퀴즈 {}점 달성! ⭐", score))
    } else if score >= 60 {
        (1000, 30, format!("포켓몬 퀴즈 {}점 달성! 👍", score))
    } else if score >= 40 {
        (500, 15, format!("포켓몬 퀴즈 {}점 달성!", score))
    } else {
        (0, 0, String::new())
    };

    QuizReward {
        points,
        ticket_minutes,
        stars: stars_from(score, 100),
        message: (points > 0).then_some(message),
    }
}

pub fn english_reward(score: i64) -> QuizReward {
    let (points, message) = if score == 100 {
        (1000, "영어 퀴즈 만점 달성!".to_string())
    } else if score >= 70 {
        (500, format!("영어 퀴즈 {}점 달성!", score))
    } else {
        (0, String::new())
    };

    QuizReward {
        points,
        ticket_minutes: 0,
        stars: stars_from(score, 100),
        message: (points > 0).then_some(message),
    }
}

/// Points for one correct tier-quiz answer after hint penalties
pub fn tier_question_points(base_points: i64, hints_used: i64) -> i64 {
    let multiplier = (1.0 - HINT_PENALTY * hints_used.max(0) as f64).max(MIN_HINT_MULTIPLIER);
    (base_points as f64 * multiplier).round() as i64
}

/// Longest run of consecutive correct answers
pub fn max_streak(results: &[bool]) -> i64 {
    let mut best = 0;
    let mut run = 0;
    for correct in results {
        run = if *correct { run + 1 } else { 0 };
        best = best.max(run);
    }
    best
}

fn normalize(answer: &str) -> String {
    answer.trim().to_lowercase()
}

// ===== Request and response shapes =====

/// A question as sent to the child
#[derive(Debug, Clone, Serialize)]
pub struct PublicQuestion {
    pub id: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub question: String,
    /// Empty for short-answer questions
    pub options: Vec<String>,
    pub hint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<QuizDifficulty>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl PublicQuestion {
    fn from_bank(question: &QuizQuestion) -> Self {
        let mut options: Vec<String> = question.options.iter().map(|o| o.to_string()).collect();
        // O/X keeps its order
        if question.question_type == QuestionType::MultipleChoice {
            options.shuffle(&mut rand::thread_rng());
        }
        Self {
            id: question.id.to_string(),
            question_type: question.question_type,
            question: question.question.to_string(),
            options,
            hint: Some(question.hint.to_string()),
            difficulty: None,
            image: question.image_url(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct QuizSheet {
    pub kind: QuizKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<QuizDifficulty>,
    pub questions: Vec<PublicQuestion>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubmittedAnswer {
    pub question_id: String,
    pub answer: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct GradedAnswer {
    pub question_id: String,
    pub is_correct: bool,
    pub correct_answer: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuizOutcome {
    pub result: QuizResult,
    pub reward: QuizReward,
    pub answers: Vec<GradedAnswer>,
    pub payout: Option<LearningReward>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TierAnswer {
    pub question_id: String,
    pub answer: String,
    #[serde(default)]
    pub hints_used: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TierQuizOutcome {
    pub progress: EbookQuizProgress,
    pub correct_count: i64,
    pub total_questions: i64,
    pub score_percent: i64,
    pub passed: bool,
    pub question_points: i64,
    pub bonus: i64,
    pub total_points: i64,
    pub next_unlocked: Option<QuizTier>,
    pub answers: Vec<GradedAnswer>,
    pub payout: Option<LearningReward>,
}

// ===== Service =====

#[derive(Clone)]
pub struct QuizService {
    repo: Repository,
    ledger: LedgerService,
    badges: BadgesService,
}

impl QuizService {
    pub fn new(repo: Repository, ledger: LedgerService, badges: BadgesService) -> Self {
        Self {
            repo,
            ledger,
            badges,
        }
    }

    /// Draw a fresh question sheet. Only Dragon Village has levels; it
    /// starts at easy when none is given.
    pub async fn start(
        &self,
        kind: QuizKind,
        difficulty: Option<QuizDifficulty>,
    ) -> Result<QuizSheet> {
        let difficulty = level_for(kind, difficulty);
        let questions = match kind {
            QuizKind::Pokemon => draw(POKEMON_QUESTIONS, false),
            QuizKind::DragonVillage => draw(&bank_for(kind, difficulty), true),
            QuizKind::English => self.english_sheet().await?,
        };

        Ok(QuizSheet {
            kind,
            difficulty,
            questions,
        })
    }

    async fn english_sheet(&self) -> Result<Vec<PublicQuestion>> {
        let words = self.repo.list_words(None, None).await?;
        if words.len() < ENGLISH_QUIZ_OPTIONS {
            return Err(AppError::Validation(
                "Not enough words for an English quiz".to_string(),
            ));
        }

        let mut rng = rand::thread_rng();
        let picked: Vec<_> = words
            .choose_multiple(&mut rng, ENGLISH_QUIZ_QUESTIONS)
            .collect();

        Ok(picked
            .into_iter()
            .map(|word| {
                let mut options = vec![word.meaning.clone()];
                let mut distractors: Vec<&String> = words
                    .iter()
                    .map(|w| &w.meaning)
                    .filter(|m| **m != word.meaning)
                    .collect::<HashSet<_>>()
                    .into_iter()
                    .collect();
                distractors.shuffle(&mut rng);
                options.extend(
                    distractors
                        .into_iter()
                        .take(ENGLISH_QUIZ_OPTIONS - 1)
                        .cloned(),
                );
                options.shuffle(&mut rng);

                PublicQuestion {
                    id: format!("w{}", word.id),
                    question_type: QuestionType::MultipleChoice,
                    question: format!("'{}'의 뜻은 무엇일까요?", word.word),
                    options,
                    hint: word.pronunciation.clone(),
                    difficulty: None,
                    image: None,
                }
            })
            .collect())
    }

    /// Number of questions a full sheet of this kind carries
    async fn sheet_size(&self, kind: QuizKind, bank: &[QuizQuestion]) -> Result<usize> {
        Ok(match kind {
            QuizKind::English => {
                let words = self.repo.count_words().await?.max(0) as usize;
                words.min(ENGLISH_QUIZ_QUESTIONS)
            }
            _ => bank.len().min(STANDALONE_QUIZ_QUESTIONS),
        })
    }

    async fn grade(
        &self,
        kind: QuizKind,
        bank: &[QuizQuestion],
        submitted: &SubmittedAnswer,
    ) -> Result<GradedAnswer> {
        let question_id = submitted.question_id.as_str();
        let unknown = || AppError::Validation(format!("Unknown question: {}", question_id));

        if kind == QuizKind::English {
            let word_id: i64 = question_id
                .strip_prefix('w')
                .and_then(|id| id.parse().ok())
                .ok_or_else(unknown)?;
            let meaning = self.repo.get_word(word_id).await?.meaning;
            return Ok(GradedAnswer {
                question_id: question_id.to_string(),
                is_correct: normalize(&submitted.answer) == normalize(&meaning),
                correct_answer: meaning,
            });
        }

        let question = find(bank, question_id).ok_or_else(unknown)?;
        Ok(GradedAnswer {
            question_id: question_id.to_string(),
            is_correct: question.is_correct(&submitted.answer),
            correct_answer: question.answer.to_string(),
        })
    }

    /// Grade a finished standalone quiz, store it and pay the reward.
    /// Every question of a full sheet must be answered exactly once so
    /// the score is always out of the whole sheet.
    pub async fn submit(
        &self,
        kind: QuizKind,
        difficulty: Option<QuizDifficulty>,
        answers: &[SubmittedAnswer],
        now: DateTime<Utc>,
    ) -> Result<QuizOutcome> {
        let bank = bank_for(kind, level_for(kind, difficulty));
        let expected = self.sheet_size(kind, &bank).await?;
        if expected == 0 || answers.len() != expected {
            return Err(AppError::Validation(format!(
                "A {} quiz has exactly {} answers, got {}",
                kind.as_str(),
                expected,
                answers.len()
            )));
        }
        ensure_unique(answers.iter().map(|a| a.question_id.as_str()))?;

        let mut graded = Vec::with_capacity(answers.len());
        for submitted in answers {
            graded.push(self.grade(kind, &bank, submitted).await?);
        }

        let flags: Vec<bool> = graded.iter().map(|g| g.is_correct).collect();
        let total = expected as i64;
        let correct = flags.iter().filter(|c| **c).count() as i64;
        let streak = max_streak(&flags);
        let score = score_percent(correct, total);

        let reward = match kind {
            QuizKind::Pokemon => pokemon_reward(score),
            QuizKind::DragonVillage => dragon_village_reward(score, correct, streak),
            QuizKind::English => english_reward(score),
        };

        let result = self
            .repo
            .record_quiz_result(&NewQuizResult {
                quiz_kind: kind.as_str(),
                total_questions: total,
                correct_count: correct,
                score_percent: score,
                stars: reward.stars,
                max_streak: streak,
                points_awarded: reward.points,
                ticket_minutes: reward.ticket_minutes,
            })
            .await?;

        tracing::info!(
            "{} quiz finished: {}/{} ({}%), {} points",
            kind.as_str(),
            correct,
            total,
            score,
            reward.points
        );

        let payout = match &reward.message {
            Some(message) if reward.points > 0 => {
                Some(self.pay(reward.points, message, now).await?)
            }
            _ => None,
        };

        Ok(QuizOutcome {
            result,
            reward,
            answers: graded,
            payout,
        })
    }

    pub async fn recent_results(&self, limit: i64) -> Result<Vec<QuizResult>> {
        self.repo.list_quiz_results(limit.clamp(1, 100)).await
    }

    // ===== E-book tier quizzes =====

    pub async fn tier_progress(&self, book_id: &str) -> Result<Vec<EbookQuizProgress>> {
        lookup(book_id)?;
        self.repo.list_quiz_progress(Some(book_id)).await
    }

    async fn ensure_unlocked(&self, book_id: &str, tier: QuizTier) -> Result<Vec<QuizQuestion>> {
        let questions = book_quiz(book_id, tier);
        if questions.is_empty() {
            return Err(AppError::QuizNotFound(format!("{}/{}", book_id, tier.as_str())));
        }

        let unlocked = self
            .repo
            .get_quiz_progress(book_id, tier)
            .await?
            .is_some_and(|p| p.is_unlocked);
        if !unlocked {
            return Err(AppError::TierLocked {
                book_id: book_id.to_string(),
                tier: tier.as_str().to_string(),
            });
        }

        Ok(questions)
    }

    pub async fn tier_questions(&self, book_id: &str, tier: QuizTier) -> Result<Vec<PublicQuestion>> {
        lookup(book_id)?;
        let questions = self.ensure_unlocked(book_id, tier).await?;
        Ok(questions.iter().map(PublicQuestion::from_bank).collect())
    }

    /// Grade a whole tier attempt. Every question of the tier must be
    /// answered exactly once.
    pub async fn submit_tier(
        &self,
        book_id: &str,
        tier: QuizTier,
        answers: &[TierAnswer],
        now: DateTime<Utc>,
    ) -> Result<TierQuizOutcome> {
        let book = lookup(book_id)?;
        let questions = self.ensure_unlocked(book.id, tier).await?;

        if answers.len() != questions.len() {
            return Err(AppError::Validation(format!(
                "Expected {} answers, got {}",
                questions.len(),
                answers.len()
            )));
        }
        ensure_unique(answers.iter().map(|a| a.question_id.as_str()))?;

        let base_points = tier.base_points();
        let mut attempts = Vec::with_capacity(answers.len());
        let mut graded = Vec::with_capacity(answers.len());
        for submitted in answers {
            if submitted.hints_used < 0 {
                return Err(AppError::Validation(
                    "Hints used must not be negative".to_string(),
                ));
            }
            let question = find(&questions, &submitted.question_id).ok_or_else(|| {
                AppError::Validation(format!("Unknown question: {}", submitted.question_id))
            })?;

            let is_correct = submitted.answer.trim() == question.answer;
            let earned_points = if is_correct {
                tier_question_points(base_points, submitted.hints_used)
            } else {
                0
            };

            attempts.push(NewQuizAttempt {
                question_id: question.id.to_string(),
                user_answer: submitted.answer.clone(),
                is_correct,
                hints_used: submitted.hints_used,
                base_points,
                earned_points,
            });
            graded.push(GradedAnswer {
                question_id: question.id.to_string(),
                is_correct,
                correct_answer: question.answer.to_string(),
            });
        }

        let total = questions.len() as i64;
        let correct = attempts.iter().filter(|a| a.is_correct).count() as i64;
        let score = score_percent(correct, total);
        let passed = score >= EBOOK_QUIZ_PASS_PERCENT;
        let question_points: i64 = attempts.iter().map(|a| a.earned_points).sum();
        let bonus = if passed { tier.completion_bonus() } else { 0 };
        let total_points = question_points + bonus;

        let progress = self
            .repo
            .record_quiz_tier_attempt(book.id, tier, &attempts, score, passed)
            .await?;

        tracing::info!(
            "Tier quiz {} {} finished: {}/{} passed={}",
            book.id,
            tier.as_str(),
            correct,
            total,
            passed
        );

        let payout = if total_points > 0 {
            let note = format!(
                "📚 {} - {} 완료 ({}/{})",
                book.title,
                tier.label(),
                correct,
                total
            );
            Some(self.pay(total_points, &note, now).await?)
        } else {
            None
        };

        Ok(TierQuizOutcome {
            progress,
            correct_count: correct,
            total_questions: total,
            score_percent: score,
            passed,
            question_points,
            bonus,
            total_points,
            next_unlocked: if passed { tier.next() } else { None },
            answers: graded,
            payout,
        })
    }

    pub async fn tier_attempts(&self, book_id: &str, tier: QuizTier) -> Result<Vec<QuizAttempt>> {
        lookup(book_id)?;
        self.repo.list_quiz_attempts(book_id, tier).await
    }

    async fn pay(&self, amount: i64, note: &str, now: DateTime<Utc>) -> Result<LearningReward> {
        let transaction = self.ledger.award(amount, note).await?;
        let new_badges = self.badges.check_and_award(now).await?;
        Ok(LearningReward {
            transaction,
            new_badges,
        })
    }
}

fn level_for(kind: QuizKind, difficulty: Option<QuizDifficulty>) -> Option<QuizDifficulty> {
    match kind {
        QuizKind::DragonVillage => Some(difficulty.unwrap_or(QuizDifficulty::Easy)),
        _ => None,
    }
}

/// Questions a sheet of this kind may be drawn from
fn bank_for(kind: QuizKind, difficulty: Option<QuizDifficulty>) -> Vec<QuizQuestion> {
    match kind {
        QuizKind::Pokemon => POKEMON_QUESTIONS.to_vec(),
        QuizKind::DragonVillage => {
            dragon_village_pool(difficulty.unwrap_or(QuizDifficulty::Easy))
        }
        QuizKind::English => Vec::new(),
    }
}

fn draw(bank: &[QuizQuestion], with_levels: bool) -> Vec<PublicQuestion> {
    bank.choose_multiple(&mut rand::thread_rng(), STANDALONE_QUIZ_QUESTIONS)
        .map(|question| PublicQuestion {
            difficulty: with_levels.then_some(question.difficulty),
            ..PublicQuestion::from_bank(question)
        })
        .collect()
}

fn ensure_unique<'a>(ids: impl Iterator<Item = &'a str>) -> Result<()> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(AppError::Validation(format!(
                "Question answered twice: {}",
                id
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::repository::tests::create_test_repo;
    use crate::database::seed::seed_defaults;
    use crate::services::activity::ActivityHub;
    use chrono::FixedOffset;

    async fn create_test_service() -> (QuizService, Repository) {
        let repo = create_test_repo().await;
        seed_defaults(&repo, "주우").await.unwrap();
        let hub = ActivityHub::new();
        let tz = FixedOffset::east_opt(9 * 3600).unwrap();
        let ledger = LedgerService::new(repo.clone(), hub.clone());
        let badges = BadgesService::new(repo.clone(), hub, tz);
        (QuizService::new(repo.clone(), ledger, badges), repo)
    }

    fn answer(question_id: &str, answer: &str) -> SubmittedAnswer {
        SubmittedAnswer {
            question_id: question_id.to_string(),
            answer: answer.to_string(),
        }
    }

    #[test]
    fn test_dragon_village_table() {
        assert_eq!(dragon_village_reward(100, 10, 10).points, 3300);
        assert_eq!(
            dragon_village_reward(100, 10, 10).message.as_deref(),
            Some("드래곤 빌리지 퀴즈 만점! 🐉🏆 (10연속 보너스!)")
        );
        assert_eq!(dragon_village_reward(90, 9, 4).points, 2500);
        assert_eq!(dragon_village_reward(80, 8, 3).points, 2000);
        assert_eq!(dragon_village_reward(70, 7, 2).points, 1500);
        assert_eq!(dragon_village_reward(50, 5, 1).points, 1000);
        assert_eq!(dragon_village_reward(10, 1, 1).points, 500);
        assert_eq!(dragon_village_reward(0, 0, 0), QuizReward::default());
        assert_eq!(dragon_village_reward(90, 9, 4).stars, 3);
        assert_eq!(dragon_village_reward(40, 4, 1).stars, 1);
    }

    #[test]
    fn test_pokemon_table() {
        let perfect = pokemon_reward(100);
        assert_eq!((perfect.points, perfect.ticket_minutes, perfect.stars), (2000, 60, 3));
        let good = pokemon_reward(80);
        assert_eq!((good.points, good.ticket_minutes, good.stars), (1500, 45, 2));
        assert_eq!(good.message.as_deref(), Some("포켓몬 퀴즈 80점 달성! ⭐"));
        assert_eq!(pokemon_reward(60).ticket_minutes, 30);
        assert_eq!(pokemon_reward(40).points, 500);
        assert_eq!(pokemon_reward(30).points, 0);
        assert!(pokemon_reward(30).message.is_none());
    }

    #[test]
    fn test_english_table() {
        assert_eq!(english_reward(100).points, 1000);
        assert_eq!(english_reward(70).points, 500);
        assert_eq!(english_reward(69).points, 0);
    }

    #[test]
    fn test_hint_penalty() {
        assert_eq!(tier_question_points(10, 0), 10);
        assert_eq!(tier_question_points(15, 1), 14);
        assert_eq!(tier_question_points(20, 3), 14);
        assert_eq!(tier_question_points(20, 20), 2);
    }

    #[test]
    fn test_score_and_streak() {
        assert_eq!(score_percent(2, 3), 67);
        assert_eq!(score_percent(0, 0), 0);
        assert_eq!(max_streak(&[true, true, false, true, true, true]), 3);
    }

    #[tokio::test]
    async fn test_standalone_sheet_hides_answers() {
        let (service, _) = create_test_service().await;

        let sheet = service.start(QuizKind::Pokemon, None).await.unwrap();
        assert_eq!(sheet.questions.len(), STANDALONE_QUIZ_QUESTIONS);
        assert!(sheet.difficulty.is_none());
        assert!(sheet.questions.iter().all(|q| q.image.is_some()));

        let english = service.start(QuizKind::English, None).await.unwrap();
        assert_eq!(english.questions.len(), ENGLISH_QUIZ_QUESTIONS);
        assert!(english
            .questions
            .iter()
            .all(|q| q.options.len() == ENGLISH_QUIZ_OPTIONS));

        let json = serde_json::to_string(&sheet).unwrap();
        assert!(!json.contains("\"answer\""));
    }

    #[tokio::test]
    async fn test_pokemon_submission_pays_and_records() {
        let (service, repo) = create_test_service().await;
        let answers: Vec<SubmittedAnswer> = POKEMON_QUESTIONS
            .iter()
            .take(10)
            .map(|q| answer(q.id, q.answer))
            .collect();

        let outcome = service
            .submit(QuizKind::Pokemon, None, &answers, Utc::now())
            .await
            .unwrap();

        assert_eq!(outcome.result.score_percent, 100);
        assert_eq!(outcome.result.ticket_minutes, 60);
        assert_eq!(repo.get_balance().await.unwrap(), 2000);
        assert_eq!(repo.quiz_counts().await.unwrap(), (1, 1));
        let payout = outcome.payout.unwrap();
        assert_eq!(payout.transaction.note.as_deref(), Some("포켓몬 퀴즈 만점! 🏆"));
        assert!(payout.new_badges.iter().any(|b| b.code == "perfect_quiz"));
    }

    #[tokio::test]
    async fn test_failed_quiz_pays_nothing() {
        let (service, repo) = create_test_service().await;
        let answers: Vec<SubmittedAnswer> = POKEMON_QUESTIONS
            .iter()
            .take(10)
            .map(|q| answer(q.id, "모름"))
            .collect();

        let outcome = service
            .submit(QuizKind::Pokemon, None, &answers, Utc::now())
            .await
            .unwrap();

        assert_eq!(outcome.result.total_questions, 10);
        assert_eq!(outcome.result.points_awarded, 0);
        assert!(outcome.payout.is_none());
        assert_eq!(repo.get_balance().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_submission_validation() {
        let (service, _) = create_test_service().await;
        let now = Utc::now();

        assert!(service.submit(QuizKind::Pokemon, None, &[], now).await.is_err());

        let mut twice: Vec<SubmittedAnswer> = POKEMON_QUESTIONS
            .iter()
            .take(9)
            .map(|q| answer(q.id, q.answer))
            .collect();
        twice.push(answer("p1", "전기"));
        assert!(service.submit(QuizKind::Pokemon, None, &twice, now).await.is_err());

        // Pokémon ids are not part of the Dragon Village bank
        let foreign: Vec<SubmittedAnswer> = POKEMON_QUESTIONS
            .iter()
            .take(8)
            .map(|q| answer(q.id, q.answer))
            .collect();
        assert!(service
            .submit(QuizKind::DragonVillage, None, &foreign, now)
            .await
            .is_err());
        assert!("trivia".parse::<QuizKind>().is_err());
    }

    #[tokio::test]
    async fn test_short_sheet_is_rejected() {
        let (service, repo) = create_test_service().await;

        let one_right = [answer("p1", "전기")];
        let err = service
            .submit(QuizKind::Pokemon, None, &one_right, Utc::now())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(repo.get_balance().await.unwrap(), 0);
        assert_eq!(repo.quiz_counts().await.unwrap(), (0, 0));
    }

    #[tokio::test]
    async fn test_dragon_village_levels() {
        let (service, repo) = create_test_service().await;

        let easy = service
            .start(QuizKind::DragonVillage, Some(QuizDifficulty::Easy))
            .await
            .unwrap();
        assert_eq!(easy.questions.len(), 8);
        assert!(easy.questions.iter().all(|q| q.id.starts_with('e')));
        assert_eq!(easy.difficulty, Some(QuizDifficulty::Easy));

        let medium = service
            .start(QuizKind::DragonVillage, Some(QuizDifficulty::Medium))
            .await
            .unwrap();
        assert_eq!(medium.questions.len(), STANDALONE_QUIZ_QUESTIONS);
        assert!(medium.questions.iter().all(|q| !q.id.starts_with('h')));

        let hard = service
            .start(QuizKind::DragonVillage, Some(QuizDifficulty::Hard))
            .await
            .unwrap();
        assert_eq!(hard.questions.len(), STANDALONE_QUIZ_QUESTIONS);

        // Defaults to easy
        let default = service.start(QuizKind::DragonVillage, None).await.unwrap();
        assert_eq!(default.difficulty, Some(QuizDifficulty::Easy));

        let short = easy
            .questions
            .iter()
            .find(|q| q.id == "e7")
            .unwrap();
        assert_eq!(short.question_type, QuestionType::ShortAnswer);
        assert!(short.options.is_empty());

        // Short answers take an accepted alternate
        let answers: Vec<SubmittedAnswer> = dragon_village_pool(QuizDifficulty::Easy)
            .iter()
            .map(|q| answer(q.id, if q.id == "e7" { "전투" } else { q.answer }))
            .collect();
        let outcome = service
            .submit(QuizKind::DragonVillage, None, &answers, Utc::now())
            .await
            .unwrap();

        assert_eq!(outcome.result.total_questions, 8);
        assert_eq!(outcome.result.score_percent, 100);
        assert_eq!(outcome.reward.points, 3300);
        assert_eq!(repo.get_balance().await.unwrap(), 3300);
    }

    #[tokio::test]
    async fn test_hard_questions_need_a_hard_sheet() {
        let (service, _) = create_test_service().await;
        let mut answers: Vec<SubmittedAnswer> = dragon_village_pool(QuizDifficulty::Easy)
            .iter()
            .take(7)
            .map(|q| answer(q.id, q.answer))
            .collect();
        answers.push(answer("h1", "풀"));

        assert!(service
            .submit(QuizKind::DragonVillage, Some(QuizDifficulty::Easy), &answers, Utc::now())
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_english_grading_by_meaning() {
        let (service, _) = create_test_service().await;
        let words = service.repo.list_words(None, None).await.unwrap();
        let answers: Vec<SubmittedAnswer> = words
            .iter()
            .take(ENGLISH_QUIZ_QUESTIONS)
            .map(|w| answer(&format!("w{}", w.id), &format!(" {} ", w.meaning)))
            .collect();

        let outcome = service
            .submit(QuizKind::English, None, &answers, Utc::now())
            .await
            .unwrap();

        assert_eq!(outcome.result.score_percent, 100);
        assert_eq!(outcome.reward.points, 1000);
    }

    #[tokio::test]
    async fn test_tier_quiz_flow() {
        let (service, repo) = create_test_service().await;
        let book = "pokemon-go-guide";
        let now = Utc::now();

        assert!(matches!(
            service.tier_questions(book, QuizTier::Basic).await,
            Err(AppError::TierLocked { .. })
        ));
        repo.unlock_quiz_tier(book, QuizTier::Basic).await.unwrap();

        // 3 of 5 correct, one of them with two hints
        let questions = book_quiz(book, QuizTier::Basic);
        let answers: Vec<TierAnswer> = questions
            .iter()
            .enumerate()
            .map(|(i, q)| TierAnswer {
                question_id: q.id.to_string(),
                answer: if i < 3 { q.answer.to_string() } else { "모름".to_string() },
                hints_used: if i == 0 { 2 } else { 0 },
            })
            .collect();

        let outcome = service
            .submit_tier(book, QuizTier::Basic, &answers, now)
            .await
            .unwrap();

        assert_eq!(outcome.score_percent, 60);
        assert!(outcome.passed);
        assert_eq!(outcome.question_points, 8 + 10 + 10);
        assert_eq!(outcome.bonus, 50);
        assert_eq!(outcome.total_points, 78);
        assert_eq!(outcome.next_unlocked, Some(QuizTier::Intermediate));
        assert!(outcome.progress.is_completed);
        assert_eq!(repo.get_balance().await.unwrap(), 78);
        assert_eq!(
            outcome.payout.unwrap().transaction.note.as_deref(),
            Some("📚 주우를 위한 포켓몬고 레벨업 대모험! - 기초 퀴즈 완료 (3/5)")
        );
        assert_eq!(
            service.tier_attempts(book, QuizTier::Basic).await.unwrap().len(),
            5
        );

        let next = service.tier_questions(book, QuizTier::Intermediate).await.unwrap();
        assert_eq!(next.len(), 5);
    }

    #[tokio::test]
    async fn test_failed_tier_keeps_next_locked() {
        let (service, repo) = create_test_service().await;
        let book = "pokemon-go-guide";
        repo.unlock_quiz_tier(book, QuizTier::Basic).await.unwrap();

        let answers: Vec<TierAnswer> = book_quiz(book, QuizTier::Basic)
            .iter()
            .enumerate()
            .map(|(i, q)| TierAnswer {
                question_id: q.id.to_string(),
                answer: if i == 0 { q.answer.to_string() } else { "x".to_string() },
                hints_used: 0,
            })
            .collect();

        let outcome = service
            .submit_tier(book, QuizTier::Basic, &answers, Utc::now())
            .await
            .unwrap();

        assert!(!outcome.passed);
        assert_eq!(outcome.total_points, 10);
        assert_eq!(outcome.progress.total_attempts, 1);
        assert_eq!(outcome.progress.best_score, 20);
        assert!(matches!(
            service.tier_questions(book, QuizTier::Intermediate).await,
            Err(AppError::TierLocked { .. })
        ));
        assert!(service
            .submit_tier(book, QuizTier::Basic, &answers[..2], Utc::now())
            .await
            .is_err());
    }
}
