//! E-book library and reading progress

use crate::catalog::books::{book_has_quiz, find_book, Book, BOOKS};
use crate::config::EBOOK_COMPLETION_REWARD;
use crate::database::{EbookProgress, QuizTier, Repository};
use crate::error::{AppError, Result};
use crate::services::learning::LearningReward;
use crate::services::badges::BadgesService;
use crate::services::ledger::LedgerService;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct BookSummary {
    #[serde(flatten)]
    pub book: Book,
    pub total_pages: i64,
    pub has_quiz: bool,
    pub progress: Option<EbookProgress>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BookPage {
    pub book_id: &'static str,
    pub page: i64,
    pub total_pages: i64,
    pub content: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReadingOutcome {
    pub progress: EbookProgress,
    /// Set only when this save finished the book for the first time
    pub reward: Option<LearningReward>,
    pub quiz_unlocked: bool,
}

pub(crate) fn lookup(book_id: &str) -> Result<&'static Book> {
    find_book(book_id).ok_or_else(|| AppError::BookNotFound(book_id.to_string()))
}

#[derive(Clone)]
pub struct EbooksService {
    repo: Repository,
    ledger: LedgerService,
    badges: BadgesService,
}

impl EbooksService {
    pub fn new(repo: Repository, ledger: LedgerService, badges: BadgesService) -> Self {
        Self {
            repo,
            ledger,
            badges,
        }
    }

    pub async fn library(&self) -> Result<Vec<BookSummary>> {
        let progress = self.repo.list_ebook_progress().await?;

        Ok(BOOKS
            .iter()
            .map(|book| BookSummary {
                book: *book,
                total_pages: book.total_pages(),
                has_quiz: book_has_quiz(book.id),
                progress: progress.iter().find(|p| p.book_id == book.id).cloned(),
            })
            .collect())
    }

    /// Zero-based page of a book
    pub fn page(&self, book_id: &str, page: i64) -> Result<BookPage> {
        let book = lookup(book_id)?;
        let content = usize::try_from(page)
            .ok()
            .and_then(|index| book.pages.get(index))
            .ok_or_else(|| {
                AppError::Validation(format!(
                    "Page must be between 0 and {}",
                    book.total_pages() - 1
                ))
            })?;

        Ok(BookPage {
            book_id: book.id,
            page,
            total_pages: book.total_pages(),
            content,
        })
    }

    pub async fn progress(&self, book_id: &str) -> Result<Option<EbookProgress>> {
        lookup(book_id)?;
        self.repo.get_ebook_progress(book_id).await
    }

    /// Save the reader's page. Reaching the last page completes the book
    /// once, pays the reading reward and opens the first quiz tier.
    pub async fn save_progress(
        &self,
        book_id: &str,
        current_page: i64,
        now: DateTime<Utc>,
    ) -> Result<ReadingOutcome> {
        let book = lookup(book_id)?;
        let total_pages = book.total_pages();
        if !(0..total_pages).contains(&current_page) {
            return Err(AppError::Validation(format!(
                "Page must be between 0 and {}",
                total_pages - 1
            )));
        }

        let (progress, newly_completed) = self
            .repo
            .save_ebook_progress(book.id, current_page, total_pages)
            .await?;

        if !newly_completed {
            return Ok(ReadingOutcome {
                progress,
                reward: None,
                quiz_unlocked: false,
            });
        }

        tracing::info!("Book finished: {}", book.title);

        let quiz_unlocked = book_has_quiz(book.id);
        if quiz_unlocked {
            self.repo.unlock_quiz_tier(book.id, QuizTier::Basic).await?;
        }

        let transaction = self
            .ledger
            .award(
                EBOOK_COMPLETION_REWARD,
                &format!("e북 읽기 완료: {}", book.title),
            )
            .await?;
        let new_badges = self.badges.check_and_award(now).await?;

        Ok(ReadingOutcome {
            progress,
            reward: Some(LearningReward {
                transaction,
                new_badges,
            }),
            quiz_unlocked,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::repository::tests::create_test_repo;
    use crate::database::seed::seed_defaults;
    use crate::services::activity::ActivityHub;
    use chrono::FixedOffset;

    async fn create_test_service() -> (EbooksService, Repository) {
        let repo = create_test_repo().await;
        seed_defaults(&repo, "주우").await.unwrap();
        let hub = ActivityHub::new();
        let tz = FixedOffset::east_opt(9 * 3600).unwrap();
        let ledger = LedgerService::new(repo.clone(), hub.clone());
        let badges = BadgesService::new(repo.clone(), hub, tz);
        (EbooksService::new(repo.clone(), ledger, badges), repo)
    }

    #[tokio::test]
    async fn test_completion_pays_once_and_unlocks_quiz() {
        let (service, repo) = create_test_service().await;
        let now = Utc::now();

        let midway = service.save_progress("pokemon-go-guide", 5, now).await.unwrap();
        assert!(!midway.progress.is_completed);
        assert!(midway.reward.is_none());

        let finished = service.save_progress("pokemon-go-guide", 16, now).await.unwrap();
        assert!(finished.progress.is_completed);
        assert!(finished.quiz_unlocked);
        let reward = finished.reward.unwrap();
        assert_eq!(reward.transaction.amount, EBOOK_COMPLETION_REWARD);
        assert_eq!(
            reward.transaction.note.as_deref(),
            Some("e북 읽기 완료: 주우를 위한 포켓몬고 레벨업 대모험!")
        );
        assert!(reward.new_badges.iter().any(|b| b.code == "first_book"));

        let basic = repo
            .get_quiz_progress("pokemon-go-guide", QuizTier::Basic)
            .await
            .unwrap()
            .unwrap();
        assert!(basic.is_unlocked);

        // Re-reading keeps completion and pays nothing
        let again = service.save_progress("pokemon-go-guide", 2, now).await.unwrap();
        assert!(again.progress.is_completed);
        assert_eq!(again.progress.current_page, 2);
        service.save_progress("pokemon-go-guide", 16, now).await.unwrap();
        assert_eq!(repo.get_balance().await.unwrap(), EBOOK_COMPLETION_REWARD);
    }

    #[tokio::test]
    async fn test_last_page_completes() {
        let (service, _) = create_test_service().await;

        let outcome = service.save_progress("sample-1", 3, Utc::now()).await.unwrap();
        assert!(outcome.progress.is_completed);
        assert!(!outcome.quiz_unlocked);
    }

    #[tokio::test]
    async fn test_page_bounds() {
        let (service, _) = create_test_service().await;

        assert!(service.save_progress("sample-1", 4, Utc::now()).await.is_err());
        assert!(service.save_progress("sample-1", -1, Utc::now()).await.is_err());
        assert!(matches!(
            service.save_progress("nope", 0, Utc::now()).await,
            Err(AppError::BookNotFound(_))
        ));
        assert_eq!(service.page("sample-1", 0).unwrap().total_pages, 4);
        assert!(service.page("sample-1", 4).is_err());
    }

    #[tokio::test]
    async fn test_library_lists_every_book() {
        let (service, _) = create_test_service().await;
        service.save_progress("sample-2", 1, Utc::now()).await.unwrap();

        let library = service.library().await.unwrap();

        assert_eq!(library.len(), BOOKS.len());
        let sample = library.iter().find(|b| b.book.id == "sample-2").unwrap();
        assert_eq!(sample.progress.as_ref().unwrap().current_page, 1);
    }
}
