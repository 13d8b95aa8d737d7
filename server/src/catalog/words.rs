//! Starter vocabulary

use crate::database::Difficulty;

/// (word, meaning, category, pronunciation, difficulty)
pub const DEFAULT_WORDS: &[(&str, &str, &str, &str, Difficulty)] = &[
    ("cat", "고양이", "동물", "캣", Difficulty::Easy),
    ("dog", "강아지", "동물", "도그", Difficulty::Easy),
    ("bird", "새", "동물", "버드", Difficulty::Easy),
    ("fish", "물고기", "동물", "피쉬", Difficulty::Easy),
    ("cow", "소", "동물", "카우", Difficulty::Easy),
    ("pig", "돼지", "동물", "피그", Difficulty::Easy),
    ("duck", "오리", "동물", "덕", Difficulty::Easy),
    ("hen", "암탉", "동물", "헨", Difficulty::Easy),
    ("rabbit", "토끼", "동물", "래빗", Difficulty::Medium),
    ("elephant", "코끼리", "동물", "엘리펀트", Difficulty::Medium),
    ("lion", "사자", "동물", "라이언", Difficulty::Medium),
    ("apple", "사과", "과일", "애플", Difficulty::Easy),
    ("banana", "바나나", "과일", "바나나", Difficulty::Easy),
    ("orange", "오렌지", "과일", "오린지", Difficulty::Easy),
    ("grape", "포도", "과일", "그레이프", Difficulty::Easy),
    ("lemon", "레몬", "과일", "레몬", Difficulty::Easy),
    ("melon", "멜론", "과일", "멜론", Difficulty::Easy),
    ("peach", "복숭아", "과일", "피치", Difficulty::Easy),
    ("pear", "배", "과일", "페어", Difficulty::Easy),
    ("strawberry", "딸기", "과일", "스트로베리", Difficulty::Medium),
    ("watermelon", "수박", "과일", "워터멜론", Difficulty::Medium),
    ("pineapple", "파인애플", "과일", "파인애플", Difficulty::Medium),
    ("red", "빨간색", "색깔", "레드", Difficulty::Easy),
    ("blue", "파란색", "색깔", "블루", Difficulty::Easy),
    ("yellow", "노란색", "색깔", "옐로우", Difficulty::Easy),
    ("green", "초록색", "색깔", "그린", Difficulty::Easy),
    ("orange", "주황색", "색깔", "오린지", Difficulty::Easy),
    ("purple", "보라색", "색깔", "퍼플", Difficulty::Easy),
    ("pink", "분홍색", "색깔", "핑크", Difficulty::Easy),
    ("black", "검은색", "색깔", "블랙", Difficulty::Easy),
    ("silver", "은색", "색깔", "실버", Difficulty::Medium),
    ("beige", "베이지색", "색깔", "베이지", Difficulty::Medium),
    ("navy", "남색", "색깔", "네이비", Difficulty::Medium),
    ("one", "하나/1", "숫자", "원", Difficulty::Easy),
    ("two", "둘/2", "숫자", "투", Difficulty::Easy),
    ("three", "셋/3", "숫자", "쓰리", Difficulty::Easy),
    ("four", "넷/4", "숫자", "포", Difficulty::Easy),
    ("five", "다섯/5", "숫자", "파이브", Difficulty::Easy),
    ("six", "여섯/6", "숫자", "식스", Difficulty::Easy),
    ("seven", "일곱/7", "숫자", "세븐", Difficulty::Easy),
    ("eight", "여덟/8", "숫자", "에이트", Difficulty::Easy),
    ("thirteen", "열셋/13", "숫자", "써틴", Difficulty::Medium),
    ("fourteen", "열넷/14", "숫자", "포틴", Difficulty::Medium),
    ("fifteen", "열다섯/15", "숫자", "피프틴", Difficulty::Medium),
    ("mom", "엄마", "가족", "맘", Difficulty::Easy),
    ("dad", "아빠", "가족", "대드", Difficulty::Easy),
    ("baby", "아기", "가족", "베이비", Difficulty::Easy),
    ("family", "가족", "가족", "패밀리", Difficulty::Easy),
    ("mother", "어머니", "가족", "마더", Difficulty::Easy),
    ("father", "아버지", "가족", "파더", Difficulty::Easy),
    ("brother", "형/오빠/남동생", "가족", "브라더", Difficulty::Easy),
    ("sister", "누나/언니/여동생", "가족", "시스터", Difficulty::Easy),
    ("uncle", "삼촌/외삼촌", "가족", "엉클", Difficulty::Medium),
    ("aunt", "이모/고모", "가족", "앤트", Difficulty::Medium),
    ("cousin", "사촌", "가족", "커즌", Difficulty::Medium),
    ("bread", "빵", "음식", "브레드", Difficulty::Easy),
    ("rice", "밥", "음식", "라이스", Difficulty::Easy),
    ("egg", "달걀", "음식", "에그", Difficulty::Easy),
    ("milk", "우유", "음식", "밀크", Difficulty::Easy),
    ("water", "물", "음식", "워터", Difficulty::Easy),
    ("juice", "주스", "음식", "주스", Difficulty::Easy),
    ("pizza", "피자", "음식", "피자", Difficulty::Easy),
    ("chicken", "치킨", "음식", "치킨", Difficulty::Easy),
    ("pasta", "파스타", "음식", "파스타", Difficulty::Medium),
    ("steak", "스테이크", "음식", "스테이크", Difficulty::Medium),
    ("sausage", "소시지", "음식", "소시지", Difficulty::Medium),
];
