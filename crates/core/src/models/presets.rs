use super::subscription::{Category, SubscriptionFields};

/// A well-known service offered as a quick-add preset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PopularService {
    pub name: &'static str,
    pub category: Category,
    /// Brand color, used as the custom color of a subscription created from it
    pub color: &'static str,
    pub url: &'static str,
    /// Typical monthly price (KRW)
    pub default_cost: f64,
}

impl PopularService {
    /// Prefill a new subscription from this preset.
    #[must_use]
    pub fn to_fields(&self, billing_day: u32) -> SubscriptionFields {
        SubscriptionFields::new(self.name, self.default_cost, billing_day, self.category)
            .with_url(self.url)
            .with_color(self.color)
    }
}

const fn preset(
    name: &'static str,
    category: Category,
    color: &'static str,
    url: &'static str,
    default_cost: f64,
) -> PopularService {
    PopularService {
        name,
        category,
        color,
        url,
        default_cost,
    }
}

const POPULAR_SERVICES: &[PopularService] = &[
    // OTT
    preset("Netflix", Category::Ott, "#E50914", "https://www.netflix.com", 17000.0),
    preset("YouTube Premium", Category::Ott, "#FF0000", "https://www.youtube.com", 14900.0),
    preset("Disney+", Category::Ott, "#113CCF", "https://www.disneyplus.com", 9900.0),
    preset("Wavve", Category::Ott, "#1C1B1F", "https://www.wavve.com", 13900.0),
    preset("Tving", Category::Ott, "#FF153C", "https://www.tving.com", 13900.0),
    preset("Watcha", Category::Ott, "#FF0558", "https://watcha.com", 12900.0),
    // Music
    preset("Spotify", Category::Music, "#1DB954", "https://www.spotify.com", 10900.0),
    preset("Melon", Category::Music, "#00CD3C", "https://www.melon.com", 10900.0),
    preset("Apple Music", Category::Music, "#FA233B", "https://music.apple.com", 10900.0),
    preset("Genie", Category::Music, "#3D85C6", "https://www.genie.co.kr", 10900.0),
    preset("Bugs", Category::Music, "#FF3366", "https://music.bugs.co.kr", 9500.0),
    // Shopping
    preset("Coupang Wow", Category::Shopping, "#342971", "https://www.coupang.com", 7890.0),
    preset("Naver Plus", Category::Shopping, "#03C75A", "https://nid.naver.com", 4900.0),
    preset("SSG 유니버스", Category::Shopping, "#FF5A5A", "https://www.ssg.com", 4900.0),
    // Work
    preset("Notion", Category::Work, "#000000", "https://www.notion.so", 10000.0),
    preset("ChatGPT Plus", Category::Work, "#10A37F", "https://chat.openai.com", 20000.0),
    preset("Figma", Category::Work, "#F24E1E", "https://www.figma.com", 15000.0),
    preset("GitHub Copilot", Category::Work, "#000000", "https://github.com", 10000.0),
    preset("Slack", Category::Work, "#4A154B", "https://slack.com", 10000.0),
    preset("Zoom", Category::Work, "#2D8CFF", "https://zoom.us", 16000.0),
    preset("Adobe CC", Category::Work, "#FF0000", "https://www.adobe.com", 24000.0),
    // Education
    preset("밀리의 서재", Category::Education, "#FFD700", "https://www.millie.co.kr", 9900.0),
    preset("Duolingo", Category::Education, "#58CC02", "https://www.duolingo.com", 14900.0),
    preset("Coursera", Category::Education, "#0056D2", "https://www.coursera.org", 59000.0),
    preset("클래스101", Category::Education, "#FF6B00", "https://class101.net", 19900.0),
    // Health
    preset("Nike Training Club", Category::Health, "#000000", "https://www.nike.com", 0.0),
    preset("Keep", Category::Health, "#00C8FF", "https://www.gotokeep.com", 9900.0),
    // Utility
    preset("iCloud+", Category::Utility, "#3478F6", "https://www.icloud.com", 1100.0),
    preset("Google One", Category::Utility, "#4285F4", "https://one.google.com", 2400.0),
    preset("Dropbox", Category::Utility, "#0061FF", "https://www.dropbox.com", 12000.0),
    preset("1Password", Category::Utility, "#1A8CFF", "https://1password.com", 5000.0),
    preset("NordVPN", Category::Utility, "#4687FF", "https://nordvpn.com", 15000.0),
];

/// The quick-add catalog.
#[must_use]
pub fn popular_services() -> &'static [PopularService] {
    POPULAR_SERVICES
}

/// Case-insensitive exact-name lookup in the catalog.
#[must_use]
pub fn find_popular_service(name: &str) -> Option<&'static PopularService> {
    let wanted = name.trim().to_lowercase();
    POPULAR_SERVICES.iter().find(|p| p.name.to_lowercase() == wanted)
}

/// Sample collection seeded into every new demo session.
#[must_use]
pub fn demo_subscriptions() -> Vec<SubscriptionFields> {
    vec![
        SubscriptionFields::new("Netflix", 17000.0, 15, Category::Ott)
            .with_url("https://www.netflix.com")
            .with_color("#E50914")
            .with_notes("프리미엄 요금제"),
        SubscriptionFields::new("Spotify", 10900.0, 20, Category::Music)
            .with_url("https://www.spotify.com")
            .with_color("#1DB954"),
        SubscriptionFields::new("YouTube Premium", 14900.0, 5, Category::Ott)
            .with_url("https://www.youtube.com")
            .with_color("#FF0000")
            .with_notes("가족 요금제"),
        SubscriptionFields::new("ChatGPT Plus", 28600.0, 10, Category::Work)
            .with_url("https://chat.openai.com")
            .with_color("#10A37F")
            .with_notes("GPT-4 사용"),
        SubscriptionFields::new("Coupang Wow", 7890.0, 1, Category::Shopping)
            .with_url("https://www.coupang.com")
            .with_color("#342971")
            .with_notes("로켓배송 무료"),
        SubscriptionFields::new("iCloud+", 1100.0, 25, Category::Utility)
            .with_url("https://www.icloud.com")
            .with_color("#3478F6")
            .with_notes("50GB 저장공간")
            .paused(),
        SubscriptionFields::new("Notion", 10000.0, 12, Category::Work)
            .with_url("https://www.notion.so")
            .with_color("#000000")
            .with_notes("Plus 요금제"),
        SubscriptionFields::new("밀리의 서재", 9900.0, 18, Category::Education)
            .with_url("https://www.millie.co.kr")
            .with_color("#FFD700"),
    ]
}
