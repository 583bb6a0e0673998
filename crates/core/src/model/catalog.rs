use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("unknown level: {0}")]
    UnknownLevel(String),

    #[error("unknown theme: {0}")]
    UnknownTheme(String),

    #[error("theme filter cannot be empty")]
    EmptyThemeFilter,
}

//
// ─── LEVEL ─────────────────────────────────────────────────────────────────────
//

/// Exam track. Each level has its own question bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// Carte de Séjour Pluriannuelle
    #[default]
    Csp,
    /// Carte de Résident
    Cr,
    /// Naturalisation
    Nat,
}

impl Level {
    #[must_use]
    pub const fn all() -> [Level; 3] {
        [Level::Csp, Level::Cr, Level::Nat]
    }

    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Level::Csp => "csp",
            Level::Cr => "cr",
            Level::Nat => "nat",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Level::Csp => "CSP",
            Level::Cr => "CR",
            Level::Nat => "Naturalisation",
        }
    }

    #[must_use]
    pub const fn full_label(self) -> &'static str {
        match self {
            Level::Csp => "Carte de Séjour Pluriannuelle",
            Level::Cr => "Carte de Résident",
            Level::Nat => "Naturalisation Française",
        }
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Level::Csp => "Préparez l'examen civique pour la Carte de Séjour Pluriannuelle",
            Level::Cr => "Préparez l'examen civique pour la Carte de Résident",
            Level::Nat => "Préparez l'examen civique pour la Naturalisation Française",
        }
    }

    /// Nominal number of records in the level's full bank.
    #[must_use]
    pub const fn bank_size(self) -> u32 {
        match self {
            Level::Csp => 192,
            Level::Cr => 209,
            Level::Nat => 280,
        }
    }
}

impl FromStr for Level {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Level::all()
            .into_iter()
            .find(|level| level.slug() == normalized)
            .ok_or_else(|| CatalogError::UnknownLevel(s.to_string()))
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

//
// ─── THEME ─────────────────────────────────────────────────────────────────────
//

/// Topical category used to group and filter a bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Theme {
    PrincipesValeurs,
    Institutions,
    DroitsDevoirs,
    Histoire,
    VieSociete,
}

impl Theme {
    /// All themes in display order.
    #[must_use]
    pub const fn all() -> [Theme; 5] {
        [
            Theme::PrincipesValeurs,
            Theme::Institutions,
            Theme::DroitsDevoirs,
            Theme::Histoire,
            Theme::VieSociete,
        ]
    }

    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Theme::PrincipesValeurs => "principes-valeurs",
            Theme::Institutions => "institutions",
            Theme::DroitsDevoirs => "droits-devoirs",
            Theme::Histoire => "histoire",
            Theme::VieSociete => "vie-societe",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Theme::PrincipesValeurs => "Principes et Valeurs",
            Theme::Institutions => "Institutions",
            Theme::DroitsDevoirs => "Droits et Devoirs",
            Theme::Histoire => "Histoire",
            Theme::VieSociete => "Vie en Société",
        }
    }

    #[must_use]
    pub const fn icon(self) -> &'static str {
        match self {
            Theme::PrincipesValeurs => "⚖️",
            Theme::Institutions => "🏛️",
            Theme::DroitsDevoirs => "📜",
            Theme::Histoire => "📚",
            Theme::VieSociete => "🤝",
        }
    }

    /// Bank file name for this theme inside a level directory.
    #[must_use]
    pub fn file_name(self) -> String {
        format!("{}.json", self.slug())
    }
}

impl FromStr for Theme {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Theme::all()
            .into_iter()
            .find(|theme| theme.slug() == normalized)
            .ok_or_else(|| CatalogError::UnknownTheme(s.to_string()))
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

//
// ─── THEME FILTER ──────────────────────────────────────────────────────────────
//

/// Which themes feed a session's candidate pool.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ThemeFilter {
    #[default]
    All,
    Only(Vec<Theme>),
}

impl ThemeFilter {
    /// Build a filter from an explicit list, dropping repeats and keeping order.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::EmptyThemeFilter` if the list is empty.
    pub fn only(themes: impl IntoIterator<Item = Theme>) -> Result<Self, CatalogError> {
        let mut selected: Vec<Theme> = Vec::new();
        for theme in themes {
            if !selected.contains(&theme) {
                selected.push(theme);
            }
        }
        if selected.is_empty() {
            return Err(CatalogError::EmptyThemeFilter);
        }
        Ok(Self::Only(selected))
    }

    /// Themes to load, in display order for `All`.
    #[must_use]
    pub fn themes(&self) -> Vec<Theme> {
        match self {
            ThemeFilter::All => Theme::all().to_vec(),
            ThemeFilter::Only(themes) => themes.clone(),
        }
    }

    /// Human label used on the start screen.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            ThemeFilter::All => "Tous les thèmes".to_string(),
            ThemeFilter::Only(themes) => themes
                .iter()
                .map(|theme| theme.label())
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}
