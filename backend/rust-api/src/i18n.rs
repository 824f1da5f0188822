//! Flat key lookup for the two UI languages.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Lt,
}

impl Locale {
    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Lt => "lt",
        }
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Locale::En),
            "lt" => Ok(Locale::Lt),
            other => Err(format!("unsupported locale: {}", other)),
        }
    }
}

const EN: &[(&str, &str)] = &[
    ("nav.home", "Home"),
    ("nav.modules", "Philosophy Modules"),
    ("nav.profile", "My Profile"),
    ("nav.login", "Login"),
    ("nav.logout", "Logout"),
    ("nav.parentDashboard", "Parent Dashboard"),
    ("welcome.title", "Welcome to Philosophy for Kids!"),
    ("welcome.description", "Start your journey into the world of philosophy"),
    ("lesson.complete", "Mark as Complete"),
    ("lesson.completed", "Completed"),
    ("lesson.quiz.submit", "Submit Answers"),
    ("profile.progress", "Your Progress"),
    ("profile.achievements", "Achievements"),
    ("profile.recentActivity", "Recent Activity"),
    ("dashboard.modulesStarted", "Modules Started"),
    ("dashboard.modulesCompleted", "Modules Completed"),
    ("dashboard.lessonsCompleted", "Lessons Completed"),
    ("dashboard.averageQuizScore", "Average Quiz Score"),
    ("dashboard.timeSpent", "Time Spent"),
];

const LT: &[(&str, &str)] = &[
    ("nav.home", "Pradžia"),
    ("nav.modules", "Filosofijos Moduliai"),
    ("nav.profile", "Mano Profilis"),
    ("nav.login", "Prisijungti"),
    ("nav.logout", "Atsijungti"),
    ("nav.parentDashboard", "Tėvų Skydelis"),
    ("welcome.title", "Sveiki atvykę į Filosofiją Vaikams!"),
    ("welcome.description", "Pradėkite savo kelionę į filosofijos pasaulį"),
    ("lesson.complete", "Pažymėti kaip baigtą"),
    ("lesson.completed", "Baigta"),
    ("profile.progress", "Tavo Pažanga"),
    ("profile.achievements", "Pasiekimai"),
    ("profile.recentActivity", "Naujausia Veikla"),
    ("dashboard.modulesStarted", "Pradėti Moduliai"),
    ("dashboard.modulesCompleted", "Baigti Moduliai"),
    ("dashboard.lessonsCompleted", "Baigtos Pamokos"),
    ("dashboard.averageQuizScore", "Vidutinis Testo Balas"),
    ("dashboard.timeSpent", "Praleistas Laikas"),
];

#[derive(Debug, Clone)]
pub struct Translations {
    default_locale: Locale,
    tables: HashMap<Locale, HashMap<&'static str, &'static str>>,
}

impl Translations {
    pub fn new(default_locale: Locale) -> Self {
        let mut tables = HashMap::new();
        tables.insert(Locale::En, EN.iter().copied().collect());
        tables.insert(Locale::Lt, LT.iter().copied().collect());
        Self {
            default_locale,
            tables,
        }
    }

    pub fn default_locale(&self) -> Locale {
        self.default_locale
    }

    /// Locale table, then the default locale, then the key itself.
    pub fn translate<'a>(&'a self, locale: Locale, key: &'a str) -> &'a str {
        self.lookup(locale, key)
            .or_else(|| self.lookup(self.default_locale, key))
            .unwrap_or(key)
    }

    /// Every key known to the default locale, resolved for `locale`.
    pub fn table(&self, locale: Locale) -> HashMap<&'static str, &str> {
        self.tables
            .get(&self.default_locale)
            .map(|defaults| {
                defaults
                    .keys()
                    .map(|key| (*key, self.translate(locale, key)))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn lookup(&self, locale: Locale, key: &str) -> Option<&'static str> {
        self.tables.get(&locale)?.get(key).copied()
    }
}

impl Default for Translations {
    fn default() -> Self {
        Self::new(Locale::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lithuanian_lookup() {
        let t = Translations::default();
        assert_eq!(t.translate(Locale::Lt, "nav.home"), "Pradžia");
        assert_eq!(t.translate(Locale::En, "nav.home"), "Home");
    }

    #[test]
    fn test_falls_back_to_default_locale() {
        let t = Translations::default();
        // only present in the English table
        assert_eq!(t.translate(Locale::Lt, "lesson.quiz.submit"), "Submit Answers");
    }

    #[test]
    fn test_unknown_key_returns_key() {
        let t = Translations::default();
        assert_eq!(t.translate(Locale::Lt, "unknown.key"), "unknown.key");
    }

    #[test]
    fn test_table_covers_default_keys() {
        let t = Translations::default();
        let lt = t.table(Locale::Lt);
        assert_eq!(lt.len(), EN.len());
        assert_eq!(lt["nav.logout"], "Atsijungti");
    }

    #[test]
    fn test_locale_parsing() {
        assert_eq!("LT".parse::<Locale>().unwrap(), Locale::Lt);
        assert!("de".parse::<Locale>().is_err());
    }
}
