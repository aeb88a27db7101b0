//! Built-in keyword lists and pattern families for the event classifier.
//!
//! Keyword lists are matched as substrings of the lower-cased text. Pattern
//! families are case-insensitive regexes.

pub const INVITATION_KEYWORDS: &[&str] = &[
    "приглашаем",
    "приглашение",
    "ждем вас",
    "ждём вас",
    "добро пожаловать",
    "скоро состоится",
    "состоится",
    "проводится",
    "пройдет",
    "пройдёт",
    "встреча",
    "мероприятие",
    "событие",
    "конференция",
    "семинар",
    "вебинар",
    "тренинг",
    "мастер-класс",
    "воркшоп",
    "презентация",
    "выставка",
    "фестиваль",
    "концерт",
    "спектакль",
    "показ",
    "регистрация",
    "записаться",
    "участие",
    "участвовать",
    "не пропустите",
    "успейте",
    "ограниченное количество мест",
    "бесплатный вход",
    "билеты",
    "вход свободный",
    "запись открыта",
    "приходите",
    "ждем",
    "ждём",
    "встречаемся",
    "увидимся",
    "открываем",
    "открытие",
    "откроется",
    "бронь",
    "бронируйте",
    "забронировать",
    // Restaurants and nightlife
    "бронирование",
    "бронирование стола",
    "забронировать стол",
    "столы",
    "уикенд",
    "выходные",
    "классные события",
    "события",
    "впереди",
    "можно принести",
    "со своим",
    "алкоголь",
    "администратор",
    "подробности",
    "телефон",
    "звоните",
    "связаться",
    "планы на вечер",
    "планы",
    "открываемся",
    "новое меню",
    "меню",
    "специальная",
    "винная карта",
    "вино",
    "бокал",
    "бутылка",
    "танцы",
    "live-концерт",
    "live",
    "main stage",
    "stage",
    "veranda",
    "веранда",
    "летняя веранда",
    "свободный вход",
    "по спискам",
    "списки",
    "список",
    "действует",
    "при брони",
    "брони стола",
    "всю ночь",
    "после полуночи",
    "без списков",
    "девушкам",
    "присылайте",
    "фамилии",
    "директ",
    "dj",
    "диджей",
    "сет",
    "выступление",
    "программа",
];

pub const LOCATION_KEYWORDS: &[&str] = &[
    "адрес",
    "место",
    "проводится",
    "состоится",
    "пройдет",
    "пройдёт",
    "ул.",
    "улица",
    "проспект",
    "пр.",
    "площадь",
    "пл.",
    "переулок",
    "пер.",
    "офис",
    "здание",
    "центр",
    "зал",
    "аудитория",
    "кабинет",
    "комната",
    "онлайн",
    "zoom",
    "teams",
    "skype",
    "discord",
    "meet",
    "телеграм",
    "где:",
    "адрес:",
    "место:",
    "локация",
    "веранда",
    "летняя веранда",
    "main stage",
    "veranda",
    "сцена",
    "танцпол",
    "бар",
    "ресторан",
    "клуб",
    "заведение",
];

/// Venue and service vocabulary. Reported for diagnostics only.
pub const SERVICE_KEYWORDS: &[&str] = &[
    "бронирование",
    "бронь",
    "стол",
    "столы",
    "ресторан",
    "кафе",
    "администратор",
    "подробности",
    "услуги",
    "сервис",
    "меню",
    "винная карта",
    "бар",
    "клуб",
    "заведение",
];

const MONTHS: &str = "января|февраля|марта|апреля|мая|июня|июля|августа|сентября|октября|ноября|декабря";
const MONTHS_SHORT: &str = "янв|фев|мар|апр|май|июн|июл|авг|сен|окт|ноя|дек";
const WEEKDAYS: &str = "понедельник|вторник|среда|четверг|пятница|суббота|воскресенье";

#[must_use]
pub fn date_patterns() -> Vec<String> {
    vec![
        // 25.12.2024, 25/12/2024
        r"\b(\d{1,2})\.(\d{1,2})\.(\d{4})\b".to_string(),
        r"\b(\d{1,2})/(\d{1,2})/(\d{4})\b".to_string(),
        // 25 декабря 2024, 25 дек. 2024
        format!(r"\b(\d{{1,2}})\s+({MONTHS})\s+(\d{{4}})\b"),
        format!(r"\b(\d{{1,2}})\s+({MONTHS_SHORT})\.?\s+(\d{{4}})\b"),
        // 6 июня, пятница
        format!(r"\b(\d{{1,2}})\s+({MONTHS}),?\s+({WEEKDAYS})\b"),
        format!(r"\b(\d{{1,2}})\s+({MONTHS_SHORT})\.?,?\s+({WEEKDAYS})\b"),
        // пятница, 6 июня
        format!(r"\b({WEEKDAYS}),?\s+(\d{{1,2}})\s+({MONTHS})\b"),
        format!(r"\b({WEEKDAYS}),?\s+(\d{{1,2}})\s+({MONTHS_SHORT})\.?\b"),
        format!(r"\b({WEEKDAYS})\b"),
        r"\b(завтра|послезавтра|сегодня)\b".to_string(),
        r"\b(\d{1,2})\s+числа\b".to_string(),
        r"\bдата:\s*(\d{1,2})\.(\d{1,2})\.(\d{4})\b".to_string(),
        r"\bкогда:\s*(\d{1,2})\.(\d{1,2})\.(\d{4})\b".to_string(),
        // 6-го июня, пятница
        format!(r"\b(\d{{1,2}})-го\s+({MONTHS})\b"),
        format!(r"\b(\d{{1,2}})-го\s+({MONTHS}),?\s+({WEEKDAYS})\b"),
        // Periods
        r"\b(большой\s+)?уикенд\b".to_string(),
        r"\b(выходные|выходных)\b".to_string(),
        r"\bвпереди\b".to_string(),
        r"\bна\s+вечер\b".to_string(),
        r"\bвечер[а-я]*\b".to_string(),
        r"\bсегодня\s+вечером\b".to_string(),
        r"\bэтим\s+вечером\b".to_string(),
    ]
}

pub const TIME_PATTERNS: &[&str] = &[
    r"\b(\d{1,2}):(\d{2})\b",
    r"\b(\d{1,2})\.(\d{2})\b",
    r"\b(\d{1,2})\s*ч\s*(\d{2})\s*мин\b",
    r"\b(\d{1,2})\s*часов?\b",
    r"\bв\s+(\d{1,2}):(\d{2})\b",
    r"\bс\s+(\d{1,2}):(\d{2})\b",
    r"\bначало\s+в?\s*(\d{1,2}):(\d{2})\b",
    r"\bвремя:\s*(\d{1,2}):(\d{2})\b",
    r"\bво\s+сколько:\s*(\d{1,2}):(\d{2})\b",
    // Ranges
    r"\bс\s+(\d{1,2}):(\d{2})\s+и?\s*до\s+(\d{1,2}):(\d{2})\b",
    r"\b(\d{1,2}):(\d{2})\s*-\s*(\d{1,2}):(\d{2})\b",
    // "23:00 Live-концерт"
    r"\b(\d{1,2}):(\d{2})\s+[A-Za-zА-Яа-я]",
    r"\bдо\s+(\d{1,2}):(\d{2})\b",
    r"\bпосле\s+полуночи\b",
    r"\bвсю\s+ночь\b",
    r"\bна\s+вечер\b",
    r"\bвечер[а-я]*\b",
];

pub const CONTACT_PATTERNS: &[&str] = &[
    // 77-95-76, 777-95-76 and looser groupings
    r"\b(\d{2})-(\d{2})-(\d{2})\b",
    r"\b(\d{3})-(\d{2})-(\d{2})\b",
    r"\b(\d{1,3})-(\d{2,3})-(\d{2,3})\b",
    // +7(xxx)xxx-xx-xx
    r"\b\+?[78][\s\-]?\(?(\d{3})\)?[\s\-]?(\d{3})[\s\-]?(\d{2})[\s\-]?(\d{2})\b",
    r"\bтелефон[у:]?\s*(\d+[\-\s\d]+)\b",
    r"\bзвоните\s+по\s+(\d+[\-\s\d]+)\b",
    r"\bприсылайте\b",
    r"\bв\s+директ\b",
    r"\bфамилии\b",
];

pub const PRICE_PATTERNS: &[&str] = &[
    r"\b(\d+)\s*₽",
    r"\b(\d+)\s*руб\b",
    r"\bот\s+(\d+)\s*₽",
    r"\bза\s+(\d+)\s*₽",
    r"\b(\d+)\s*₽\s+за\s+\w+\b",
    r"\bбесплатн(?:о|ый|ая|ое|ые)\b",
    r"\bсвободный\s+вход\b",
    r"\bвход\s+свободный\b",
];

pub const PROGRAM_PATTERNS: &[&str] = &[
    r"\b(\d{1,2}):(\d{2})\s+[A-Za-zА-Яа-я]",
    r"\bmain\s+stage\b",
    r"\bveranda\b",
    r"\blive[-\s]концерт\b",
    // Line-ups: "Lacoste / Raimov", "A / B / C"
    r"\b[A-Z][a-z]+\s*/\s*[A-Z][a-z]+\b",
];

fn owned(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| (*s).to_string()).collect()
}

#[must_use]
pub fn invitation_keywords() -> Vec<String> {
    owned(INVITATION_KEYWORDS)
}

#[must_use]
pub fn location_keywords() -> Vec<String> {
    owned(LOCATION_KEYWORDS)
}

#[must_use]
pub fn service_keywords() -> Vec<String> {
    owned(SERVICE_KEYWORDS)
}

#[must_use]
pub fn time_patterns() -> Vec<String> {
    owned(TIME_PATTERNS)
}

#[must_use]
pub fn contact_patterns() -> Vec<String> {
    owned(CONTACT_PATTERNS)
}

#[must_use]
pub fn price_patterns() -> Vec<String> {
    owned(PRICE_PATTERNS)
}

#[must_use]
pub fn program_patterns() -> Vec<String> {
    owned(PROGRAM_PATTERNS)
}
