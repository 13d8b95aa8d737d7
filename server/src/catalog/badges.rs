//! Badge definitions and the thresholds that earn them

use serde::Serialize;

/// What a badge checks against the child's stats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum BadgeCondition {
    Points(i64),
    WordsLearned(i64),
    WordsMastered(i64),
    /// Accuracy percent, only counted after `min_reviews` reviews
    Accuracy { percent: i64, min_reviews: i64 },
    Reviews(i64),
    Streak(i64),
    MaxStreak(i64),
    FlashcardSessions(i64),
    PerfectQuizzes(i64),
    DaysActive(i64),
    BooksCompleted(i64),
    /// Learning between 05:00 and 08:59 local time
    EarlyBird,
    /// Learning from 21:00 until 04:59 local time
    NightOwl,
    /// Learning on Saturday or Sunday
    Weekend,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct BadgeDefinition {
    pub code: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub category: &'static str,
    pub rarity: &'static str,
    pub requirement: &'static str,
    pub condition: BadgeCondition,
}

const fn badge(
    code: &'static str,
    name: &'static str,
    description: &'static str,
    icon: &'static str,
    category: &'static str,
    rarity: &'static str,
    requirement: &'static str,
    condition: BadgeCondition,
) -> BadgeDefinition {
    BadgeDefinition {
        code,
        name,
        description,
        icon,
        category,
        rarity,
        requirement,
        condition,
    }
}

use BadgeCondition::*;

pub const BADGES: &[BadgeDefinition] = &[
    badge("points_100", "첫 100포인트", "100 포인트를 모았어요!", "💰", "points", "common", "100 포인트 달성", Points(100)),
    badge("points_500", "500포인트 달성", "500 포인트를 모았어요!", "💵", "points", "common", "500 포인트 달성", Points(500)),
    badge("points_1000", "천 포인트!", "1,000 포인트를 모았어요!", "💎", "points", "rare", "1,000 포인트 달성", Points(1000)),
    badge("points_5000", "부자가 되었어요", "5,000 포인트를 모았어요!", "🏆", "points", "epic", "5,000 포인트 달성", Points(5000)),
    badge("points_10000", "포인트 왕", "10,000 포인트를 모았어요!", "👑", "points", "legendary", "10,000 포인트 달성", Points(10000)),
    badge("first_word", "첫 단어 학습", "첫 번째 영어 단어를 배웠어요!", "📚", "learning", "common", "첫 단어 학습", WordsLearned(1)),
    badge("words_10", "단어 수집가", "10개 단어를 배웠어요!", "📖", "learning", "common", "10개 단어 학습", WordsLearned(10)),
    badge("words_50", "단어 탐험가", "50개 단어를 배웠어요!", "🔍", "learning", "rare", "50개 단어 학습", WordsLearned(50)),
    badge("words_100", "단어 마스터", "100개 단어를 배웠어요!", "🎓", "learning", "epic", "100개 단어 학습", WordsLearned(100)),
    badge("words_500", "단어 천재", "500개 단어를 배웠어요!", "🧠", "learning", "legendary", "500개 단어 학습", WordsLearned(500)),
    badge("mastered_10", "완벽한 10", "10개 단어를 완벽히 외웠어요!", "⭐", "learning", "rare", "10개 단어 마스터", WordsMastered(10)),
    badge("mastered_50", "기억의 달인", "50개 단어를 완벽히 외웠어요!", "🌟", "learning", "epic", "50개 단어 마스터", WordsMastered(50)),
    badge("mastered_100", "기억력 천재", "100개 단어를 완벽히 외웠어요!", "✨", "learning", "legendary", "100개 단어 마스터", WordsMastered(100)),
    badge("accuracy_80", "정확한 학습자", "정답률 80% 이상 달성!", "🎯", "learning", "rare", "정답률 80% 이상", Accuracy { percent: 80, min_reviews: 20 }),
    badge("accuracy_90", "거의 완벽해요", "정답률 90% 이상 달성!", "💯", "learning", "epic", "정답률 90% 이상", Accuracy { percent: 90, min_reviews: 50 }),
    badge("reviews_100", "복습왕", "100번 복습했어요!", "🔄", "learning", "rare", "100회 복습", Reviews(100)),
    badge("reviews_500", "복습 마스터", "500번 복습했어요!", "♻️", "learning", "epic", "500회 복습", Reviews(500)),
    badge("first_book", "첫 책 완독", "첫 번째 e북을 끝까지 읽었어요!", "📕", "learning", "common", "e북 1권 완독", BooksCompleted(1)),
    badge("books_3", "책벌레", "e북 3권을 끝까지 읽었어요!", "🐛", "learning", "rare", "e북 3권 완독", BooksCompleted(3)),
    badge("streak_3", "3일 연속", "3일 연속으로 학습했어요!", "🔥", "streak", "common", "3일 연속 학습", Streak(3)),
    badge("streak_7", "일주일 연속", "7일 연속으로 학습했어요!", "🔥🔥", "streak", "rare", "7일 연속 학습", Streak(7)),
    badge("streak_14", "2주 연속", "14일 연속으로 학습했어요!", "🌟🔥", "streak", "epic", "14일 연속 학습", Streak(14)),
    badge("streak_30", "한 달 연속", "30일 연속으로 학습했어요!", "👑🔥", "streak", "legendary", "30일 연속 학습", Streak(30)),
    badge("max_streak_10", "끈기의 시작", "최대 10일 연속 기록!", "💪", "streak", "rare", "최대 10일 연속 달성", MaxStreak(10)),
    badge("max_streak_30", "끈기의 왕", "최대 30일 연속 기록!", "🏆💪", "streak", "legendary", "최대 30일 연속 달성", MaxStreak(30)),
    badge("first_session", "시작이 반이다", "첫 플래시카드 학습을 완료했어요!", "🚀", "special", "common", "첫 학습 완료", FlashcardSessions(1)),
    badge("sessions_10", "꾸준한 학습자", "10번의 학습 세션을 완료했어요!", "📝", "special", "rare", "10회 학습 세션", FlashcardSessions(10)),
    badge("sessions_50", "학습 중독자", "50번의 학습 세션을 완료했어요!", "📚✨", "special", "epic", "50회 학습 세션", FlashcardSessions(50)),
    badge("perfect_quiz", "퍼펙트!", "퀴즈에서 100점을 받았어요!", "💯", "special", "rare", "퀴즈 만점", PerfectQuizzes(1)),
    badge("perfect_quiz_10", "만점 수집가", "10번의 퀴즈에서 만점!", "🏅", "special", "epic", "10회 퀴즈 만점", PerfectQuizzes(10)),
    badge("days_active_7", "일주일 활동", "7일 동안 활동했어요!", "📆", "special", "common", "7일 활동", DaysActive(7)),
    badge("days_active_30", "한 달 활동", "30일 동안 활동했어요!", "📅", "special", "rare", "30일 활동", DaysActive(30)),
    badge("days_active_100", "100일의 기적", "100일 동안 활동했어요!", "🎊", "special", "legendary", "100일 활동", DaysActive(100)),
    badge("early_bird", "아침형 인간", "아침에 학습을 완료했어요!", "🌅", "special", "rare", "아침 학습", EarlyBird),
    badge("night_owl", "올빼미", "밤에 학습을 완료했어요!", "🦉", "special", "rare", "밤 학습", NightOwl),
    badge("weekend_warrior", "주말 전사", "주말에 학습을 완료했어요!", "🎮", "special", "common", "주말 학습", Weekend),
];

pub fn find_badge(code: &str) -> Option<&'static BadgeDefinition> {
    BADGES.iter().find(|b| b.code == code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_codes_are_unique() {
        let codes: HashSet<_> = BADGES.iter().map(|b| b.code).collect();
        assert_eq!(codes.len(), BADGES.len());
    }

    #[test]
    fn test_find_badge() {
        assert_eq!(find_badge("night_owl").unwrap().condition, NightOwl);
        assert!(find_badge("unknown").is_none());
    }
}
