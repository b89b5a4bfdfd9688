//! Simulated operator feeds for catalog refresh.
//!
//! Real scraping of operator sites is out of scope; the refresh endpoint
//! works from a fixed table of six operators with three tours each. The
//! structure is deterministic, but each refresh perturbs prices by a
//! uniform jitter and picks a promo image at random, so the randomness
//! source is injected to keep refreshes reproducible in tests.

use rand::seq::IndexedRandom;
use rand::Rng;

/// Maximum absolute price perturbation applied per refresh, in rubles.
pub const PRICE_JITTER: i64 = 5000;

/// A freshly generated tour record, before the store assigns an id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTour {
    pub title: String,
    pub destination: String,
    pub country: String,
    pub price: i64,
    pub price_formatted: String,
    pub duration: String,
    pub image_url: String,
    pub description: String,
    pub category: String,
    pub source: String,
}

/// One tour as listed on an operator's site.
#[derive(Debug, Clone, Copy)]
pub struct FeedTour {
    pub title: &'static str,
    pub destination: &'static str,
    pub country: &'static str,
    pub base_price: i64,
    pub duration: &'static str,
    pub description: &'static str,
    pub category: &'static str,
}

/// An operator together with its current offers.
#[derive(Debug, Clone, Copy)]
pub struct OperatorFeed {
    pub source: &'static str,
    pub tours: &'static [FeedTour],
}

/// The six operators whose catalogs the refresh simulates.
pub const OPERATORS: &[OperatorFeed] = &[
    OperatorFeed {
        source: "Coral Travel",
        tours: &[
            FeedTour {
                title: "Турция Анталия 5★",
                destination: "Турция",
                country: "asia",
                base_price: 142_000,
                duration: "7 дней",
                description: "All Inclusive, 5★, аквапарк, детский клуб",
                category: "beach",
            },
            FeedTour {
                title: "Египет Хургада Люкс",
                destination: "Египет",
                country: "asia",
                base_price: 165_000,
                duration: "10 дней",
                description: "Ultra All, дайвинг, коралловый риф",
                category: "beach",
            },
            FeedTour {
                title: "ОАЭ Дубай Премиум",
                destination: "ОАЭ",
                country: "asia",
                base_price: 385_000,
                duration: "7 дней",
                description: "Burj Al Arab район, пляж, экскурсии",
                category: "beach",
            },
        ],
    },
    OperatorFeed {
        source: "Tez Tour",
        tours: &[
            FeedTour {
                title: "Таиланд Пхукет Relax",
                destination: "Таиланд",
                country: "asia",
                base_price: 178_000,
                duration: "9 дней",
                description: "Пляж Патонг, массаж, экскурсии",
                category: "beach",
            },
            FeedTour {
                title: "Вьетнам Нячанг Море",
                destination: "Вьетнам",
                country: "asia",
                base_price: 195_000,
                duration: "10 дней",
                description: "Пляжный отдых, SPA, морепродукты",
                category: "beach",
            },
            FeedTour {
                title: "Бали Убуд + Пляж",
                destination: "Индонезия",
                country: "asia",
                base_price: 267_000,
                duration: "11 дней",
                description: "Рисовые террасы, храмы, океан",
                category: "beach",
            },
        ],
    },
    OperatorFeed {
        source: "Anex Tour",
        tours: &[
            FeedTour {
                title: "Греция Крит 4★",
                destination: "Греция",
                country: "europe",
                base_price: 225_000,
                duration: "8 дней",
                description: "Пляж, экскурсии, греческая кухня",
                category: "beach",
            },
            FeedTour {
                title: "Испания Барселона+Море",
                destination: "Испания",
                country: "europe",
                base_price: 298_000,
                duration: "9 дней",
                description: "Гауди, Коста Брава, тапас",
                category: "culture",
            },
            FeedTour {
                title: "Италия Рим+Флоренция",
                destination: "Италия",
                country: "europe",
                base_price: 315_000,
                duration: "8 дней",
                description: "Колизей, Ватикан, Тоскана",
                category: "culture",
            },
        ],
    },
    OperatorFeed {
        source: "Pegas Touristik",
        tours: &[
            FeedTour {
                title: "Мальдивы Water Villa",
                destination: "Мальдивы",
                country: "maldives",
                base_price: 485_000,
                duration: "7 дней",
                description: "Водное бунгало, снорклинг, SPA",
                category: "beach",
            },
            FeedTour {
                title: "Сейшелы Остров Маэ",
                destination: "Сейшелы",
                country: "maldives",
                base_price: 620_000,
                duration: "10 дней",
                description: "Приватный пляж, дайвинг, природа",
                category: "beach",
            },
            FeedTour {
                title: "Куба Варадеро All",
                destination: "Куба",
                country: "america",
                base_price: 345_000,
                duration: "10 дней",
                description: "Белый песок, ром, сальса",
                category: "beach",
            },
        ],
    },
    OperatorFeed {
        source: "Biblio Globus",
        tours: &[
            FeedTour {
                title: "Франция Париж Класс",
                destination: "Франция",
                country: "europe",
                base_price: 287_000,
                duration: "6 дней",
                description: "Эйфелева башня, Лувр, Версаль",
                category: "culture",
            },
            FeedTour {
                title: "Австрия Вена+Зальцбург",
                destination: "Австрия",
                country: "europe",
                base_price: 265_000,
                duration: "7 дней",
                description: "Императорские дворцы, музыка",
                category: "culture",
            },
            FeedTour {
                title: "Швейцария Альпы Зима",
                destination: "Швейцария",
                country: "europe",
                base_price: 565_000,
                duration: "6 дней",
                description: "Горные лыжи, шале, фондю",
                category: "mountains",
            },
        ],
    },
    OperatorFeed {
        source: "Intourist",
        tours: &[
            FeedTour {
                title: "Черногория Будва Лето",
                destination: "Черногория",
                country: "europe",
                base_price: 158_000,
                duration: "10 дней",
                description: "Адриатика, горы, морепродукты",
                category: "beach",
            },
            FeedTour {
                title: "Кипр Айя-Напа 4★",
                destination: "Кипр",
                country: "europe",
                base_price: 189_000,
                duration: "8 дней",
                description: "Пляжи, античные руины, вино",
                category: "beach",
            },
            FeedTour {
                title: "Шри-Ланка Эко-тур",
                destination: "Шри-Ланка",
                country: "asia",
                base_price: 218_000,
                duration: "11 дней",
                description: "Чайные плантации, слоны, океан",
                category: "beach",
            },
        ],
    },
];

/// Promo images rotated across refreshed tours.
const IMAGE_URLS: [&str; 3] = [
    "https://cdn.poehali.dev/projects/ea4c3f24-08ba-472c-8695-daadf72c5465/files/24a87b57-c32e-4592-a4b2-835aba31e914.jpg",
    "https://cdn.poehali.dev/projects/ea4c3f24-08ba-472c-8695-daadf72c5465/files/4201e134-950f-43a2-b3c5-33dd2890385e.jpg",
    "https://cdn.poehali.dev/projects/ea4c3f24-08ba-472c-8695-daadf72c5465/files/0e47a49c-602b-46bd-9b38-422c14345e66.jpg",
];

/// Format a ruble amount with space-grouped thousands and a currency suffix.
///
/// `142000` becomes `"142 000 ₽"`.
pub fn format_price(price: i64) -> String {
    let digits = price.abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(ch);
    }
    if price < 0 {
        format!("-{grouped} ₽")
    } else {
        format!("{grouped} ₽")
    }
}

/// Produce a full refresh dataset from the simulated operator feeds.
///
/// Every tour's final price is its base price perturbed by a uniform
/// integer in `[-PRICE_JITTER, +PRICE_JITTER]`, and each record gets one
/// of the fixed promo images. Operators and tours appear in feed order.
pub fn scrape_operator_feeds<R: Rng + ?Sized>(rng: &mut R) -> Vec<NewTour> {
    let mut tours = Vec::new();
    for operator in OPERATORS {
        for feed_tour in operator.tours {
            let jitter = rng.random_range(-PRICE_JITTER..=PRICE_JITTER);
            let price = feed_tour.base_price + jitter;
            let image_url = IMAGE_URLS
                .choose(rng)
                .copied()
                .unwrap_or(IMAGE_URLS[0])
                .to_string();

            tours.push(NewTour {
                title: feed_tour.title.to_string(),
                destination: feed_tour.destination.to_string(),
                country: feed_tour.country.to_string(),
                price,
                price_formatted: format_price(price),
                duration: feed_tour.duration.to_string(),
                image_url,
                description: feed_tour.description.to_string(),
                category: feed_tour.category.to_string(),
                source: operator.source.to_string(),
            });
        }
    }
    tours
}
