//! E-book library and the tiered quizzes attached to books

use super::quizzes::QuizQuestion;
use crate::database::QuizTier;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Book {
    pub id: &'static str,
    pub title: &'static str,
    pub author: &'static str,
    pub cover_emoji: &'static str,
    pub description: &'static str,
    pub category: &'static str,
    #[serde(skip)]
    pub pages: &'static [&'static str],
}

impl Book {
    pub fn total_pages(&self) -> i64 {
        self.pages.len() as i64
    }
}

pub const BOOKS: &[Book] = &[
    Book {
        id: "pokemon-go-guide",
        title: "주우를 위한 포켓몬고 레벨업 대모험!",
        author: "아빠",
        cover_emoji: "🚀",
        description: "70레벨 마스터를 향한 첫걸음! 포켓몬고 완벽 공략집",
        category: "공략집",
        pages: &[
            "🚀 주우를 위한 포켓몬고 레벨업 대모험! 70레벨 마스터를 향한 첫걸음! 준비됐지? 출발!",
            "🌈 1장: 포켓몬고 세상과 친해지기. 밖으로 나가 걸으면 포켓몬이 나타나고, 몬스터볼을 던져서 잡으면 돼.",
            "🎒 모험에 꼭 필요한 도구들! 몬스터볼, 상처약, 나무열매. 파인열매는 사탕을 2배로, 라즈열매는 도망가지 않게 도와줘.",
            "📍 포켓스탑은 파란색 네모 모양이야. 체육관에 포켓몬을 보내 지키면 포켓코인을 받을 수 있어!",
            "🎯 2장: 경험치(XP) 쑥쑥! 레벨업 비법. 경험치 많이 얻는 꿀팁 BEST 5!",
            "1️⃣ 엑설런트 던지기는 1,000 XP! 2️⃣ 베스트 프렌드가 되면 100,000 XP를 한 번에 얻을 수 있어!",
            "3️⃣ 행복의알을 쓰면 30분 동안 경험치가 2배! 4️⃣ 5성 레이드에서 이기면 10,000 XP!",
            "5️⃣ 사탕이 적게 드는 포켓몬을 모았다가 한 번에 진화시키자. 첫 포켓몬 잡기는 1,500 XP!",
            "🌟 3장: 강력한 포켓몬 군단 만들기! CP가 높은 포켓몬과 전설의 포켓몬을 키워보자.",
            "✨ 강화는 CP와 HP를 높이고 별의모래와 사탕이 필요해. 진화는 모습을 바꾸고 사탕이 많이 필요해.",
            "🍬 별의모래는 정말 소중하니까 마음에 드는 강한 포켓몬에게만 집중적으로 투자하자!",
            "🛡️ 4장: 배틀 마스터가 되는 길! 상대의 약점을 찌르는 타입을 내보내면 쉽게 이길 수 있어. 불 타입은 물 공격에 약해!",
            "🤝 레이드 배틀은 친구들과 힘을 합쳐 보스를 무찌르는 거야. GO로켓단을 이기면 그림자 포켓몬을 구할 수 있어.",
            "💡 안전하게 게임하자! 항상 주변을 잘 살피고 차 조심, 사람 조심!",
            "🏆 5장: 레벨 40이 넘으면 특별한 미션을 깨야 레벨업을 할 수 있어. 플래티넘 메달을 모아보자!",
            "📚 부록: CP는 강한 정도, HP는 체력, 개체값(IV)은 숨겨진 능력치야. 타입 상성은 가위바위보 같아.",
            "🎉 커뮤니티 데이는 한 달에 한 번! 가장 중요한 건 포켓몬들과 즐겁게 모험하는 마음이야. - 끝 -",
        ],
    },
    Book {
        id: "sample-1",
        title: "주우의 첫 번째 모험",
        author: "아빠",
        cover_emoji: "🌟",
        description: "주우가 포켓몬 세계에서 첫 모험을 시작하는 이야기",
        category: "동화",
        pages: &[
            "어느 맑은 날, 주우는 포켓몬 마스터가 되기로 결심했어요. \"나도 피카츄랑 모험을 떠날 거야!\"",
            "주우는 집 앞 풀숲에서 작은 포켓몬을 발견했어요. \"안녕! 너 이름이 뭐야?\" \"피카!\"",
            "주우와 피카츄는 금방 친구가 되었어요. \"우리 최고의 파트너가 되자!\"",
            "해가 질 무렵, 주우와 피카츄는 집으로 돌아왔어요. \"오늘 정말 재미있었어!\" - 끝 -",
        ],
    },
    Book {
        id: "sample-2",
        title: "용감한 꼬부기",
        author: "아빠",
        cover_emoji: "🐢",
        description: "작은 꼬부기가 용기를 내는 이야기",
        category: "동화",
        pages: &[
            "작은 꼬부기는 늘 겁이 많았어요. \"나는 왜 이렇게 무서운 걸까...\"",
            "어느 날, 친구 피카츄가 물에 빠졌어요! 꼬부기는 너무 무서웠지만...",
            "\"내가 갈게!\" 꼬부기는 물 속으로 뛰어들어 피카츄를 구했어요.",
            "그날 이후, 꼬부기는 더 이상 무섭지 않았어요. 모든 친구들이 꼬부기를 응원해줬답니다. - 끝 -",
        ],
    },
];

/// A question belonging to one tier of a book's quiz
#[derive(Debug, Clone, Copy)]
pub struct BookQuizQuestion {
    pub book_id: &'static str,
    pub tier: QuizTier,
    pub question: QuizQuestion,
}

const fn bq(
    book_id: &'static str,
    tier: QuizTier,
    id: &'static str,
    question: &'static str,
    answer: &'static str,
    options: &'static [&'static str],
    hint: &'static str,
) -> BookQuizQuestion {
    BookQuizQuestion {
        book_id,
        tier,
        question: QuizQuestion::multiple_choice(id, question, answer, options, hint),
    }
}

const GUIDE: &str = "pokemon-go-guide";

pub const BOOK_QUIZZES: &[BookQuizQuestion] = &[
    bq(GUIDE, QuizTier::Basic, "pg-b1", "포켓몬을 잡을 때 던지는 동그란 공은?", "몬스터볼", &["몬스터볼", "상처약", "나무열매", "포켓코인"], "포켓스탑에서 많이 얻을 수 있어!"),
    bq(GUIDE, QuizTier::Basic, "pg-b2", "포켓스탑은 무슨 색 네모 모양일까?", "파란색", &["파란색", "빨간색", "노란색", "초록색"], "하늘 색깔을 떠올려 봐!"),
    bq(GUIDE, QuizTier::Basic, "pg-b3", "사탕을 2배로 주는 열매는?", "파인열매", &["파인열매", "라즈열매", "나나열매", "금색열매"], "파인애플처럼 생겼어!"),
    bq(GUIDE, QuizTier::Basic, "pg-b4", "체육관을 지키면 받는 용돈은?", "포켓코인", &["포켓코인", "별의모래", "사탕", "알"], "아이템을 살 수 있는 돈이야!"),
    bq(GUIDE, QuizTier::Basic, "pg-b5", "게임할 때 꼭 지켜야 할 것은?", "차 조심", &["차 조심", "빨리 뛰기", "혼자 멀리 가기", "밤새 하기"], "안전이 제일 중요해!"),
    bq(GUIDE, QuizTier::Intermediate, "pg-i1", "엑설런트 던지기로 얻는 경험치는?", "1,000 XP", &["1,000 XP", "100 XP", "500 XP", "10,000 XP"], "천 단위야!"),
    bq(GUIDE, QuizTier::Intermediate, "pg-i2", "행복의알은 몇 분 동안 경험치를 2배로 줄까?", "30분", &["30분", "10분", "1시간", "5분"], "반 시간이야!"),
    bq(GUIDE, QuizTier::Intermediate, "pg-i3", "베스트 프렌드가 되면 한 번에 얻는 경험치는?", "100,000 XP", &["100,000 XP", "10,000 XP", "1,000 XP", "50,000 XP"], "가장 큰 숫자야!"),
    bq(GUIDE, QuizTier::Intermediate, "pg-i4", "포켓몬의 CP와 HP를 높이는 것은?", "강화", &["강화", "진화", "교환", "정화"], "별의모래와 사탕이 필요해!"),
    bq(GUIDE, QuizTier::Intermediate, "pg-i5", "그림자 포켓몬을 가진 악당은?", "GO로켓단", &["GO로켓단", "팀 발러", "체육관 관장", "박사님"], "검은 포켓스탑에 나타나!"),
    bq(GUIDE, QuizTier::Master, "pg-m1", "불 타입 포켓몬은 어떤 타입 공격에 약할까?", "물", &["물", "풀", "벌레", "얼음"], "불을 끄는 것!"),
    bq(GUIDE, QuizTier::Master, "pg-m2", "5성 레이드에서 이기면 얻는 경험치는?", "10,000 XP", &["10,000 XP", "1,000 XP", "25,000 XP", "500 XP"], "만 단위야!"),
    bq(GUIDE, QuizTier::Master, "pg-m3", "포켓몬이 태어날 때부터 가진 숨겨진 능력치는?", "개체값", &["개체값", "CP", "HP", "타입 상성"], "영어로 IV라고 해!"),
    bq(GUIDE, QuizTier::Master, "pg-m4", "레벨 40이 넘으면 레벨업에 필요한 것은?", "특별한 미션", &["특별한 미션", "포켓코인", "상처약", "몬스터볼"], "경험치만으로는 안 돼!"),
    bq(GUIDE, QuizTier::Master, "pg-m5", "특정 포켓몬이 아주 많이 나타나는 특별한 날은?", "커뮤니티 데이", &["커뮤니티 데이", "레이드 데이", "스포트라이트 아워", "주말"], "한 달에 한 번이야!"),
];

pub fn find_book(id: &str) -> Option<&'static Book> {
    BOOKS.iter().find(|b| b.id == id)
}

pub fn book_has_quiz(book_id: &str) -> bool {
    BOOK_QUIZZES.iter().any(|q| q.book_id == book_id)
}

pub fn book_quiz(book_id: &str, tier: QuizTier) -> Vec<QuizQuestion> {
    BOOK_QUIZZES
        .iter()
        .filter(|q| q.book_id == book_id && q.tier == tier)
        .map(|q| q.question)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_counts() {
        assert_eq!(find_book("pokemon-go-guide").unwrap().total_pages(), 17);
        assert_eq!(find_book("sample-1").unwrap().total_pages(), 4);
        assert_eq!(find_book("sample-2").unwrap().total_pages(), 4);
        assert!(find_book("missing").is_none());
    }

    #[test]
    fn test_every_tier_has_questions() {
        assert!(book_has_quiz("pokemon-go-guide"));
        assert!(!book_has_quiz("sample-1"));
        for tier in QuizTier::ALL {
            let questions = book_quiz("pokemon-go-guide", tier);
            assert_eq!(questions.len(), 5);
            assert!(questions.iter().all(|q| q.options.contains(&q.answer)));
        }
    }
}
