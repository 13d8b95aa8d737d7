//! Question banks for the standalone quizzes

use serde::{Deserialize, Serialize};
use QuizDifficulty::{Easy, Hard, Medium};

const SPRITE_BASE: &str = "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuizDifficulty {
    Easy,
    Medium,
    Hard,
}

impl QuizDifficulty {
    pub fn as_str(self) -> &'static str {
        match self {
            QuizDifficulty::Easy => "easy",
            QuizDifficulty::Medium => "medium",
            QuizDifficulty::Hard => "hard",
        }
    }

    /// Levels are cumulative: a medium sheet mixes easy and medium
    /// questions, a hard sheet draws from the whole bank.
    pub fn includes(self, question: QuizDifficulty) -> bool {
        question <= self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionType {
    MultipleChoice,
    TrueFalse,
    ShortAnswer,
}

/// A bank question. Answers never leave the server.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct QuizQuestion {
    pub id: &'static str,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub difficulty: QuizDifficulty,
    pub question: &'static str,
    pub options: &'static [&'static str],
    #[serde(skip)]
    pub answer: &'static str,
    /// Other spellings graded as correct for short answers
    #[serde(skip)]
    pub accepted: &'static [&'static str],
    pub hint: &'static str,
    #[serde(skip)]
    pub sprite: Option<&'static str>,
}

impl QuizQuestion {
    pub const fn multiple_choice(
        id: &'static str,
        question: &'static str,
        answer: &'static str,
        options: &'static [&'static str],
        hint: &'static str,
    ) -> Self {
        Self {
            id,
            question_type: QuestionType::MultipleChoice,
            difficulty: QuizDifficulty::Easy,
            question,
            options,
            answer,
            accepted: &[],
            hint,
            sprite: None,
        }
    }

    const fn at(mut self, difficulty: QuizDifficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    const fn with_sprite(mut self, sprite: &'static str) -> Self {
        self.sprite = Some(sprite);
        self
    }

    pub fn image_url(&self) -> Option<String> {
        self.sprite.map(|path| format!("{}/{}", SPRITE_BASE, path))
    }

    /// Case-insensitive match against the answer and its accepted forms
    pub fn is_correct(&self, given: &str) -> bool {
        let given = given.trim().to_lowercase();
        std::iter::once(self.answer)
            .chain(self.accepted.iter().copied())
            .any(|candidate| candidate.trim().to_lowercase() == given)
    }
}

const fn pk(
    id: &'static str,
    sprite: &'static str,
    question: &'static str,
    answer: &'static str,
    options: &'static [&'static str],
    hint: &'static str,
) -> QuizQuestion {
    QuizQuestion::multiple_choice(id, question, answer, options, hint).with_sprite(sprite)
}

const fn mc(
    id: &'static str,
    difficulty: QuizDifficulty,
    question: &'static str,
    answer: &'static str,
    options: &'static [&'static str],
    hint: &'static str,
) -> QuizQuestion {
    QuizQuestion::multiple_choice(id, question, answer, options, hint).at(difficulty)
}

const fn tf(
    id: &'static str,
    difficulty: QuizDifficulty,
    question: &'static str,
    answer: &'static str,
    hint: &'static str,
) -> QuizQuestion {
    QuizQuestion {
        question_type: QuestionType::TrueFalse,
        ..QuizQuestion::multiple_choice(id, question, answer, &["O", "X"], hint).at(difficulty)
    }
}

const fn sa(
    id: &'static str,
    difficulty: QuizDifficulty,
    question: &'static str,
    answer: &'static str,
    accepted: &'static [&'static str],
    hint: &'static str,
) -> QuizQuestion {
    QuizQuestion {
        question_type: QuestionType::ShortAnswer,
        accepted,
        ..QuizQuestion::multiple_choice(id, question, answer, &[], hint).at(difficulty)
    }
}

macro_rules! artwork {
    ($n:literal) => {
        concat!("pokemon/other/official-artwork/", $n, ".png")
    };
}

pub const POKEMON_QUESTIONS: &[QuizQuestion] = &[
    pk("p1", artwork!(25), "피카츄의 타입은 무엇일까요?", "전기", &["전기", "불꽃", "물", "풀"], "번개를 쏘는 포켓몬이에요!"),
    pk("p2", artwork!(1), "이상해씨가 진화하면 무엇이 될까요?", "이상해풀", &["이상해풀", "피카츄", "꼬부기", "파이리"], "등에 씨앗이 있는 포켓몬이에요!"),
    pk("p3", artwork!(6), "이 포켓몬의 이름은 무엇일까요?", "리자몽", &["리자몽", "망나뇽", "갸라도스", "잠만보"], "불꽃과 비행 타입이에요!"),
    pk("p4", artwork!(7), "꼬부기의 타입은 무엇일까요?", "물", &["물", "바위", "땅", "얼음"], "등껍질이 있는 거북이 포켓몬이에요!"),
    pk("p5", artwork!(4), "파이리가 최종 진화하면 무엇이 될까요?", "리자몽", &["리자몽", "리자드", "부스터", "마그마"], "날개가 생겨서 날 수 있어요!"),
    pk("p6", artwork!(143), "이 포켓몬의 이름은 무엇일까요?", "잠만보", &["잠만보", "뚱보", "고라파덕", "코다크"], "항상 자고 먹기만 해요!"),
    pk("p7", artwork!(133), "이브이의 진화형이 아닌 것은?", "피카츄", &["피카츄", "부스터", "샤미드", "쥬피썬더"], "이브이는 여러 가지로 진화할 수 있어요!"),
    pk("p8", artwork!(25), "피카츄의 진화형은 무엇일까요?", "라이츄", &["라이츄", "피츄", "에레브", "쥬피썬더"], "천둥의 돌을 사용해요!"),
    pk("p9", artwork!(150), "뮤츠는 어떤 타입일까요?", "에스퍼", &["에스퍼", "악", "격투", "드래곤"], "초능력을 사용하는 전설의 포켓몬이에요!"),
    pk("p10", "items/poke-ball.png", "포켓몬을 잡을 때 사용하는 것은?", "몬스터볼", &["몬스터볼", "열매", "포션", "돌"], "던져서 포켓몬을 잡아요!"),
    pk("p11", artwork!(94), "이 포켓몬의 이름은 무엇일까요?", "팬텀", &["팬텀", "고우스트", "피카츄", "뮤"], "고스트 타입의 무서운 포켓몬이에요!"),
    pk("p12", artwork!(129), "잉어킹이 진화하면 무엇이 될까요?", "갸라도스", &["갸라도스", "라프라스", "샤미드", "물짱이"], "강력한 용이 되어요!"),
    pk("p13", artwork!(149), "망나뇽은 어떤 타입일까요?", "드래곤", &["드래곤", "물", "불꽃", "바위"], "하늘을 나는 귀여운 용이에요!"),
    pk("p14", "items/rare-candy.png", "포켓몬 GO에서 포켓몬을 진화시키려면 필요한 것은?", "사탕", &["사탕", "돈", "포션", "몬스터볼"], "같은 포켓몬을 잡으면 얻을 수 있어요!"),
    pk("p15", artwork!(151), "이 포켓몬의 이름은 무엇일까요?", "뮤", &["뮤", "뮤츠", "세레비", "피카츄"], "분홍색 환상의 포켓몬이에요!"),
    pk("p16", artwork!(26), "라이츄는 어떤 포켓몬의 진화형일까요?", "피카츄", &["피카츄", "피츄", "에레브", "쥬피썬더"], "전기를 쏘는 노란 포켓몬에서 진화해요!"),
    pk("p17", "items/lucky-egg.png", "레어 포켓몬을 부화시키려면 무엇이 필요할까요?", "알", &["알", "사탕", "돈", "별의모래"], "인큐베이터에 넣고 걸으면 부화해요!"),
    pk("p18", artwork!(144), "포켓몬 GO 팀이 아닌 것은?", "팀 골드", &["팀 골드", "팀 미스틱", "팀 발러", "팀 인스팅트"], "파랑, 빨강, 노랑 팀이 있어요!"),
    pk("p19", artwork!(7), "꼬부기가 진화하면 무엇이 될까요?", "어니부기", &["어니부기", "거북왕", "라프라스", "물짱이"], "더 커진 거북이가 되어요!"),
    pk("p20", artwork!(249), "이 전설의 포켓몬 이름은 무엇일까요?", "루기아", &["루기아", "칠색조", "뮤츠", "아르세우스"], "바다의 수호신이에요!"),
];

pub const DRAGON_VILLAGE_QUESTIONS: &[QuizQuestion] = &[
    mc("e1", Easy, "드래곤 빌리지에서 드래곤을 부화시키려면 무엇이 필요할까요?", "알", &["알", "마법석", "금화", "나뭇잎"], "둥글고 예쁜 것에서 드래곤이 태어나요!"),
    mc("e2", Easy, "불 속성 드래곤이 강한 상대 속성은?", "풀", &["풀", "물", "불", "땅"], "불이 태울 수 있는 것을 생각해보세요!"),
    mc("e3", Easy, "물 속성 드래곤이 강한 상대 속성은?", "불", &["불", "풀", "물", "전기"], "물로 끌 수 있는 것을 생각해보세요!"),
    tf("e4", Easy, "드래곤은 레벨이 올라가면 더 강해진다. (O/X)", "O", "경험치를 모으면 무엇이 될까요?"),
    mc("e5", Easy, "드래곤이 진화하면 어떻게 될까요?", "더 강해진다", &["더 강해진다", "더 약해진다", "변화 없다", "사라진다"], "진화는 성장이에요!"),
    mc("e6", Easy, "풀 속성 드래곤이 강한 상대 속성은?", "물", &["물", "불", "풀", "바람"], "식물이 좋아하는 것을 생각해보세요!"),
    sa("e7", Easy, "드래곤이 싸우는 곳을 뭐라고 부를까요?", "배틀", &["배틀", "전투", "싸움", "대전", "아레나", "전장"], "영어로 '싸움'을 뜻해요!"),
    mc("e8", Easy, "가장 흔한 드래곤 등급은?", "노말", &["노말", "레어", "에픽", "레전드"], "가장 쉽게 얻을 수 있는 등급이에요!"),
    mc("m1", Medium, "전기 속성 드래곤이 강한 상대 속성은?", "물", &["물", "땅", "전기", "불"], "전기가 잘 통하는 것을 생각해보세요!"),
    mc("m2", Medium, "땅 속성 드래곤이 강한 상대 속성은?", "전기", &["전기", "물", "풀", "불"], "땅은 전기를 어떻게 할까요?"),
    mc("m3", Medium, "가장 희귀한 드래곤 등급은?", "레전드", &["레전드", "에픽", "레어", "노말"], "전설적인 드래곤이에요!"),
    tf("m4", Medium, "배틀에서 속성 상성이 중요하다. (O/X)", "O", "가위바위보처럼 유리한 속성이 있어요!"),
    mc("m5", Medium, "빛 속성 드래곤이 강한 상대 속성은?", "어둠", &["어둠", "빛", "불", "물"], "빛과 어둠은 서로 반대예요!"),
    mc("m6", Medium, "어둠 속성 드래곤이 강한 상대 속성은?", "빛", &["빛", "어둠", "땅", "바람"], "빛과 어둠은 서로 반대예요!"),
    sa("m7", Medium, "드래곤이 더 강하게 변하는 것을 뭐라고 할까요?", "진화", &["진화", "진화하기", "이볼브", "성장"], "포켓몬에서도 이런 걸 해요!"),
    mc("m8", Medium, "바람 속성 드래곤이 강한 상대 속성은?", "땅", &["땅", "물", "불", "전기"], "바람은 하늘을 날아다녀요!"),
    mc("h1", Hard, "얼음 속성 드래곤이 강한 상대 속성은?", "풀", &["풀", "물", "불", "얼음"], "추우면 식물이 어떻게 될까요?"),
    sa("h2", Hard, "두 가지 속성을 가진 드래곤을 뭐라고 할까요?", "듀얼", &["듀얼", "듀얼속성", "이중속성", "듀얼 속성", "복합속성", "하이브리드"], "영어로 '둘'을 뜻하는 단어로 시작해요!"),
    mc("h3", Hard, "드래곤 배틀에서 가장 중요한 것은?", "속성 상성", &["속성 상성", "레벨만", "외모", "이름"], "가위바위보처럼 이기는 조합이 있어요!"),
    tf("h4", Hard, "레전드 드래곤은 노말 드래곤보다 무조건 강하다. (O/X)", "O", "등급이 높으면 기본 능력치가 높아요!"),
    mc("h5", Hard, "드래곤의 스킬을 강화하려면 무엇이 필요할까요?", "스킬북", &["스킬북", "알", "금화", "경험치"], "책처럼 생긴 아이템이에요!"),
    sa("h6", Hard, "모든 드래곤 중에서 가장 강력한 드래곤 종류는?", "레전드", &["레전드", "레전더리", "전설", "레전드 드래곤"], "전설적인 드래곤이에요!"),
    mc("h7", Hard, "불, 물, 풀 속성의 관계는 어떤 게임과 비슷할까요?", "가위바위보", &["가위바위보", "오목", "체스", "주사위"], "세 가지가 서로 이기고 지는 관계예요!"),
    mc("h8", Hard, "드래곤의 HP가 0이 되면 어떻게 될까요?", "기절한다", &["기절한다", "진화한다", "도망간다", "더 강해진다"], "배틀에서 지면 어떻게 될까요?"),
];

/// Dragon Village questions playable at a difficulty
pub fn dragon_village_pool(difficulty: QuizDifficulty) -> Vec<QuizQuestion> {
    DRAGON_VILLAGE_QUESTIONS
        .iter()
        .filter(|q| difficulty.includes(q.difficulty))
        .copied()
        .collect()
}

/// Find a question by id in a bank
pub fn find(bank: &[QuizQuestion], id: &str) -> Option<QuizQuestion> {
    bank.iter().find(|q| q.id == id).copied()
}
