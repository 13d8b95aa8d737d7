//! Default shop catalog

/// Categories a shop item may belong to
pub const SHOP_CATEGORIES: &[&str] = &["게임시간", "장난감", "간식음식", "특별활동", "특권"];

/// (name, description, category, point cost)
pub const DEFAULT_SHOP_ITEMS: &[(&str, &str, &str, i64)] = &[
    ("포켓몬고 10분", "포켓몬고 게임 10분", "게임시간", 3000),
    ("가오레 1판", "가오레 게임 1판", "게임시간", 1500),
    ("닌텐도 스위치 30분", "스위치 게임 30분", "게임시간", 5000),
    ("태블릿 게임 20분", "태블릿 게임 20분", "게임시간", 4000),
    ("TV 시청 30분", "TV 보기 30분", "게임시간", 2000),
    ("작은 장난감", "1만원 상당 장난감", "장난감", 10000),
    ("중간 장난감", "3만원 상당 장난감", "장난감", 30000),
    ("큰 장난감", "5만원 상당 장난감", "장난감", 50000),
    ("레고 세트", "2만원 상당 레고", "장난감", 20000),
    ("피규어 1개", "피규어 한 개", "장난감", 8000),
    ("아이스크림", "아이스크림 1개", "간식음식", 1500),
    ("과자 1봉지", "좋아하는 과자", "간식음식", 1000),
    ("초콜릿", "초콜릿 1개", "간식음식", 800),
    ("패스트푸드 세트", "햄버거 세트", "간식음식", 8000),
    ("피자 1판", "피자 한 판", "간식음식", 15000),
    ("놀이공원 방문", "놀이공원 가기", "특별활동", 30000),
    ("영화관 관람", "영화 보러가기", "특별활동", 10000),
    ("키즈카페 2시간", "키즈카페 놀기", "특별활동", 12000),
    ("수영장 방문", "수영장 가기", "특별활동", 8000),
    ("친구 집 놀러가기", "친구네 놀러가기", "특별활동", 5000),
    ("숙제 1일 면제권", "숙제 하루 안해도 됨", "특권", 15000),
    ("취침 시간 30분 연장", "30분 더 늦게 자기", "특권", 5000),
    ("주말 늦잠 자기", "주말에 늦게 일어나기", "특권", 3000),
    ("좋아하는 메뉴 선택권", "저녁 메뉴 정하기", "특권", 4000),
    ("부모님과 특별한 시간", "부모님과 1시간 놀기", "특권", 10000),
];
