//! English vocabulary learning
//!
//! Reviews update per-word mastery. Finishing a flashcard deck, a word
//! category or a voice session pays a fixed reward, and every correct
//! word-game answer pays by level. Each reward triggers a badge check.

use crate::catalog::BadgeDefinition;
use crate::config::{
    FLASHCARD_DECK_REWARD, MAX_WORD_GAME_LEVEL, VOICE_LEARNING_REWARD, WORD_CATEGORY_REWARD,
    WORD_GAME_POINTS_PER_LEVEL,
};
use crate::database::{CategorySummary, Difficulty, EnglishWord, PointTransaction, Repository, WordProgress};
use crate::error::{AppError, Result};
use crate::services::badges::BadgesService;
use crate::services::ledger::LedgerService;
use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// Points granted by a learning activity plus any badges it unlocked
#[derive(Debug, Clone, Serialize)]
pub struct LearningReward {
    pub transaction: PointTransaction,
    pub new_badges: Vec<BadgeDefinition>,
}

/// One flashcard the child marked as known or not
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct CardResult {
    pub word_id: i64,
    pub known: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum GameMode {
    /// Type the Korean meaning of the English word
    WordMatch,
    /// Spell the English word
    Spelling,
    /// Write a sentence that uses the word
    Sentence,
}

#[derive(Debug, Clone, Serialize)]
pub struct GameOutcome {
    pub correct: bool,
    pub word: EnglishWord,
    pub points: i64,
    pub reward: Option<LearningReward>,
}

/// Difficulty of the words offered at a word-game level
pub fn difficulty_for_level(level: i64) -> Difficulty {
    match level {
        i64::MIN..=1 => Difficulty::Easy,
        2 => Difficulty::Medium,
        3 => Difficulty::Hard,
        _ => Difficulty::Expert,
    }
}

/// Case-insensitive comparison of a typed answer against the word
pub fn is_correct_answer(mode: GameMode, word: &EnglishWord, answer: &str) -> bool {
    let answer = answer.trim().to_lowercase();
    if answer.is_empty() {
        return false;
    }

    match mode {
        GameMode::WordMatch => answer == word.meaning.to_lowercase(),
        GameMode::Spelling => answer == word.word.to_lowercase(),
        GameMode::Sentence => answer.contains(&word.word.to_lowercase()),
    }
}

#[derive(Clone)]
pub struct LearningService {
    repo: Repository,
    ledger: LedgerService,
    badges: BadgesService,
}

impl LearningService {
    pub fn new(repo: Repository, ledger: LedgerService, badges: BadgesService) -> Self {
        Self {
            repo,
            ledger,
            badges,
        }
    }

    pub async fn list_words(
        &self,
        category: Option<&str>,
        difficulty: Option<Difficulty>,
    ) -> Result<Vec<EnglishWord>> {
        self.repo.list_words(category, difficulty).await
    }

    pub async fn categories(&self) -> Result<Vec<CategorySummary>> {
        self.repo.category_summaries().await
    }

    pub async fn progress(&self) -> Result<Vec<WordProgress>> {
        self.repo.list_word_progress().await
    }

    /// A random word of the given difficulty, or of any difficulty when
    /// none exist at that level
    pub async fn random_word(&self, difficulty: Option<Difficulty>) -> Result<EnglishWord> {
        let mut words = self.repo.list_words(None, difficulty).await?;
        if words.is_empty() && difficulty.is_some() {
            words = self.repo.list_words(None, None).await?;
        }

        words
            .choose(&mut rand::thread_rng())
            .cloned()
            .ok_or_else(|| AppError::Validation("No words available".to_string()))
    }

    pub async fn record_review(
        &self,
        word_id: i64,
        correct: bool,
        now: DateTime<Utc>,
    ) -> Result<WordProgress> {
        self.repo.get_word(word_id).await?;
        self.repo.record_word_review(word_id, correct, now).await
    }

    /// Record every card of a finished deck and pay the deck reward
    pub async fn complete_flashcards(
        &self,
        cards: &[CardResult],
        now: DateTime<Utc>,
    ) -> Result<LearningReward> {
        if cards.is_empty() {
            return Err(AppError::Validation("Deck has no cards".to_string()));
        }
        for card in cards {
            self.repo.get_word(card.word_id).await?;
        }

        for card in cards {
            self.repo
                .record_word_review(card.word_id, card.known, now)
                .await?;
        }
        let known = cards.iter().filter(|c| c.known).count() as i64;
        self.repo
            .record_session("flashcard", cards.len() as i64, known)
            .await?;

        tracing::info!("Flashcard deck finished: {}/{} known", known, cards.len());
        self.reward(
            FLASHCARD_DECK_REWARD,
            &format!("플래시카드 {}개 학습 완료", cards.len()),
            now,
        )
        .await
    }

    pub async fn complete_category(&self, category: &str, now: DateTime<Utc>) -> Result<LearningReward> {
        let words = self.repo.list_words(Some(category), None).await?;
        if words.is_empty() {
            return Err(AppError::Validation(format!(
                "Unknown word category: {}",
                category
            )));
        }

        self.repo
            .record_session("category", words.len() as i64, words.len() as i64)
            .await?;

        tracing::info!("Word category finished: {}", category);
        self.reward(WORD_CATEGORY_REWARD, "영어 단어 카테고리 완료", now)
            .await
    }

    pub async fn complete_voice(&self, item_count: i64, now: DateTime<Utc>) -> Result<LearningReward> {
        self.repo
            .record_session("voice", item_count.max(0), item_count.max(0))
            .await?;

        tracing::info!("Voice learning finished");
        self.reward(VOICE_LEARNING_REWARD, "음성 학습 완료", now).await
    }

    /// Grade a word-game answer. Only correct answers pay.
    pub async fn answer_word_game(
        &self,
        word_id: i64,
        mode: GameMode,
        level: i64,
        answer: &str,
        now: DateTime<Utc>,
    ) -> Result<GameOutcome> {
        if !(1..=MAX_WORD_GAME_LEVEL).contains(&level) {
            return Err(AppError::Validation(format!(
                "Level must be between 1 and {}",
                MAX_WORD_GAME_LEVEL
            )));
        }

        let word = self.repo.get_word(word_id).await?;
        let correct = is_correct_answer(mode, &word, answer);
        self.repo.record_word_review(word.id, correct, now).await?;

        if !correct {
            tracing::debug!("Word game miss on {}", word.word);
            return Ok(GameOutcome {
                correct,
                word,
                points: 0,
                reward: None,
            });
        }

        let points = level * WORD_GAME_POINTS_PER_LEVEL;
        let reward = self
            .reward(points, &format!("영어 학습 게임 정답 ({})", word.word), now)
            .await?;

        Ok(GameOutcome {
            correct,
            word,
            points,
            reward: Some(reward),
        })
    }

    async fn reward(&self, amount: i64, note: &str, now: DateTime<Utc>) -> Result<LearningReward> {
        let transaction = self.ledger.award(amount, note).await?;
        let new_badges = self.badges.check_and_award(now).await?;
        Ok(LearningReward {
            transaction,
            new_badges,
        })
    }
}
