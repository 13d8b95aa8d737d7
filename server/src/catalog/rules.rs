//! Default rule catalog

/// Categories a rule may belong to
pub const RULE_CATEGORIES: &[&str] = &[
    "생활습관",
    "운동건강",
    "학습독서",
    "예의태도",
    "집안일",
    "거짓말태도",
    "시간약속",
    "생활미준수",
    "물건관리",
];

/// (name, description, category, point amount)
pub const DEFAULT_RULES: &[(&str, &str, &str, i64)] = &[
    ("9시 30분 전에 취침", "일찍 자는 습관", "생활습관", 1000),
    ("8시 전에 숙제 완료", "숙제를 제시간에 완료", "생활습관", 1000),
    ("아침에 스스로 일어나기", "알람 듣고 혼자 일어나기", "생활습관", 800),
    ("양치질 하루 3번 완료", "아침, 점심, 저녁 양치", "생활습관", 500),
    ("정리정돈 스스로 하기", "방 정리, 책상 정리", "생활습관", 700),
    ("식사 시 편식하지 않기", "골고루 먹기", "생활습관", 600),
    ("옷 스스로 입기", "혼자서 옷 입기", "생활습관", 400),
    ("러닝 1km 완주", "1km 달리기", "운동건강", 1000),
    ("자전거 타기 30분", "자전거 운동", "운동건강", 800),
    ("줄넘기 100개", "줄넘기 운동", "운동건강", 500),
    ("수영 30분", "수영장에서 수영", "운동건강", 1200),
    ("스트레칭 10분", "몸 풀기 운동", "운동건강", 300),
    ("책 한 권 읽기", "책 완독하기", "학습독서", 1500),
    ("숙제 완벽하게 완료", "숙제 100점 받기", "학습독서", 1200),
    ("새로운 단어 10개 배우기", "어휘력 향상", "학습독서", 800),
    ("수학 문제 10개 풀기", "수학 공부", "학습독서", 1000),
    ("영어 단어 20개 암기", "영어 공부", "학습독서", 1000),
    ("부모님께 인사 잘하기", "아침, 저녁 인사", "예의태도", 500),
    ("동생/친구와 사이좋게 놀기", "싸우지 않고 놀기", "예의태도", 700),
    ("어른 말씀 잘 듣기", "말 잘 듣기", "예의태도", 600),
    ("고맙습니다/미안합니다 말하기", "예의바른 말", "예의태도", 400),
    ("자발적으로 심부름하기", "스스로 도와주기", "예의태도", 1000),
    ("설거지 돕기", "설거지 도와주기", "집안일", 800),
    ("청소기 돌리기", "청소 도와주기", "집안일", 1000),
    ("빨래 개기 돕기", "빨래 정리 돕기", "집안일", 700),
    ("쓰레기 버리기", "쓰레기 버리기", "집안일", 500),
    ("동생 돌보기", "동생 챙겨주기", "집안일", 1200),
    ("거짓말 하기", "거짓말은 나쁜 행동", "거짓말태도", -30000),
    ("부모님께 대들기", "말대꾸하기", "거짓말태도", -10000),
    ("동생/친구 때리기", "폭력 사용", "거짓말태도", -15000),
    ("욕설/나쁜 말 사용", "나쁜 말하기", "거짓말태도", -5000),
    ("물건 던지기", "화내며 물건 던지기", "거짓말태도", -8000),
    ("등원 1분 지각", "유치원/학교 늦기", "시간약속", -1000),
    ("취침 시간 10분 초과", "늦게 자기", "시간약속", -500),
    ("숙제 시간 지키지 않기", "숙제 늦게 하기", "시간약속", -1500),
    ("약속 시간 어기기", "약속 안 지키기", "시간약속", -2000),
    ("양치질 안하기", "양치 안하기", "생활미준수", -1000),
    ("정리정돈 안하기", "방 어지럽히기", "생활미준수", -800),
    ("편식하기", "음식 가리기", "생활미준수", -700),
    ("게임/TV 시간 초과", "너무 오래 보기", "생활미준수", -2000),
    ("숙제 안하기", "숙제 안하기", "생활미준수", -3000),
    ("장난감 망가뜨리기", "장난감 고의로 부수기", "물건관리", -5000),
    ("책 찢기/낙서", "책 망가뜨리기", "물건관리", -4000),
    ("옷 더럽히기 (고의)", "일부러 옷 더럽히기", "물건관리", -2000),
];
