//! Localized labels for the workspace tables
//!
//! The record store holds one design table per client plus a single shared
//! results table. Column names and select options are localized per client,
//! but the shared tables always store canonical French labels, so every
//! localized rank label must map back onto its French counterpart before a
//! write.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::api::constants::TS_EXPORT_PATH;

/// Number of rank slots a voter must fill. A ballot is valid only when it
/// uses each slot exactly once.
pub const RANK_SLOTS: usize = 3;

/// Title column of the design table (identical in all languages).
pub const DESIGN_TITLE_COL: &str = "Design";

/// Title column of the shared results table.
pub const RESULT_CLIENT_COL: &str = "Client";

/// Join column holding the client page id on each results row. Name-equality
/// on the `Client` column remains only as a fallback for rows created before
/// this column existed.
pub const RESULT_CLIENT_ID_COL: &str = "Client ID";

/// Accepted titles of the shared results table, one per supported language.
pub const RESULTS_DB_TITLES: [&str; 3] = ["Résultats", "Results", "Resultados"];

/// Display name used when a client page has an empty or missing title.
pub const PLACEHOLDER_CLIENT_NAME: &str = "Vote";

/// UI language of a client's design table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    #[default]
    Fr,
    En,
    Es,
}

impl Lang {
    pub const ALL: [Lang; 3] = [Lang::Fr, Lang::En, Lang::Es];

    /// Detect the table language from its set of column names. Unrecognized
    /// column sets fall back to French, the canonical store language.
    pub fn detect<'a, I: IntoIterator<Item = &'a str>>(column_names: I) -> Lang {
        let mut lang = Lang::Fr;
        for name in column_names {
            match name {
                "Ranking" => lang = Lang::En,
                "Clasificación" => lang = Lang::Es,
                _ => {}
            }
        }
        lang
    }
}

/// Column names and select options of a design table in one language.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct LabelSet {
    pub ranking: &'static str,
    pub rank_options: [&'static str; RANK_SLOTS],
    pub description: &'static str,
    pub recommended: &'static str,
    pub image: &'static str,
    pub comment: &'static str,
    pub db_title: &'static str,
    pub results_db_title: &'static str,
    pub result_rank_cols: [&'static str; RANK_SLOTS],
    pub result_comment: &'static str,
    pub result_date: &'static str,
    pub result_vote_link: &'static str,
    pub result_site_link: &'static str,
}

const FR: LabelSet = LabelSet {
    ranking: "Classement",
    rank_options: ["1er choix", "2e choix", "3e choix"],
    description: "Description",
    recommended: "Recommandé",
    image: "Image",
    comment: "Commentaire",
    db_title: "Designs proposés",
    results_db_title: "Résultats",
    result_rank_cols: ["1er choix", "2e choix", "3e choix"],
    result_comment: "Commentaire",
    result_date: "Date",
    result_vote_link: "Lien vote",
    result_site_link: "Lien site",
};

const EN: LabelSet = LabelSet {
    ranking: "Ranking",
    rank_options: ["1st choice", "2nd choice", "3rd choice"],
    description: "Description",
    recommended: "Recommended",
    image: "Image",
    comment: "Comment",
    db_title: "Proposed designs",
    results_db_title: "Results",
    result_rank_cols: ["1st choice", "2nd choice", "3rd choice"],
    result_comment: "Comment",
    result_date: "Date",
    result_vote_link: "Vote link",
    result_site_link: "Site link",
};

const ES: LabelSet = LabelSet {
    ranking: "Clasificación",
    rank_options: ["1ª opción", "2ª opción", "3ª opción"],
    description: "Descripción",
    recommended: "Recomendado",
    image: "Imagen",
    comment: "Comentario",
    db_title: "Diseños propuestos",
    results_db_title: "Resultados",
    result_rank_cols: ["1ª opción", "2ª opción", "3ª opción"],
    result_comment: "Comentario",
    result_date: "Fecha",
    result_vote_link: "Enlace de voto",
    result_site_link: "Enlace del sitio",
};

/// Labels for one language.
pub fn labels(lang: Lang) -> &'static LabelSet {
    match lang {
        Lang::Fr => &FR,
        Lang::En => &EN,
        Lang::Es => &ES,
    }
}

/// Canonical (French) labels, the language the shared tables are stored in.
pub fn canonical_labels() -> &'static LabelSet {
    &FR
}

/// Translate a localized rank label to the canonical store label.
///
/// Unknown labels pass through unchanged so pre-existing data written with
/// other conventions keeps working.
pub fn canonical_rank_label(label: &str) -> &str {
    for lang in Lang::ALL {
        let set = labels(lang);
        for (i, option) in set.rank_options.iter().enumerate() {
            if *option == label {
                return FR.rank_options[i];
            }
        }
    }
    label
}

/// Ordinal embedded in a rank label (`"2e choix"` → 2). Labels without a
/// digit sort last.
pub fn rank_ordinal(label: &str) -> u32 {
    let digits: String = label.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse().unwrap_or(u32::MAX)
}

/// Whether a rank label denotes first place (carries the voter comment).
pub fn is_first_place(label: &str) -> bool {
    rank_ordinal(label) == 1
}

/// One offered widget variant.
#[derive(Debug, Clone)]
pub struct VariantMeta {
    /// Stable option letter embedded in every row title.
    pub letter: &'static str,
    pub name: [&'static str; 3],
    pub description: [&'static str; 3],
    pub recommended: bool,
}

impl VariantMeta {
    fn localized(&self, lang: Lang) -> (&'static str, &'static str) {
        let i = match lang {
            Lang::Fr => 0,
            Lang::En => 1,
            Lang::Es => 2,
        };
        (self.name[i], self.description[i])
    }

    pub fn name(&self, lang: Lang) -> &'static str {
        self.localized(lang).0
    }

    pub fn description(&self, lang: Lang) -> &'static str {
        self.localized(lang).1
    }

    /// Row title: `Option <letter> - <name>`, starred when recommended.
    pub fn row_title(&self, lang: Lang) -> String {
        if self.recommended {
            format!("Option {} - {} ⭐", self.letter, self.name(lang))
        } else {
            format!("Option {} - {}", self.letter, self.name(lang))
        }
    }
}

/// The offered variants in their fixed canonical order.
pub const VARIANTS: [VariantMeta; 4] = [
    VariantMeta {
        letter: "B",
        name: ["Classique", "Classic", "Clásico"],
        description: [
            "Rotation 180° avec témoin de présence externe",
            "180° rotation with external presence indicator",
            "Rotación 180° con indicador de presencia externo",
        ],
        recommended: false,
    },
    VariantMeta {
        letter: "B2",
        name: ["Présence Intégrée", "Integrated Presence", "Presencia Integrada"],
        description: [
            "Le cercle du logo devient le témoin de présence",
            "The logo circle becomes the presence indicator",
            "El círculo del logo se convierte en el indicador de presencia",
        ],
        recommended: true,
    },
    VariantMeta {
        letter: "D",
        name: ["Symétrie Verticale", "Vertical Symmetry", "Simetría Vertical"],
        description: [
            "Pill en haut, cercle en bas avec témoin externe",
            "Pill on top, circle at bottom with external indicator",
            "Píldora arriba, círculo abajo con indicador externo",
        ],
        recommended: false,
    },
    VariantMeta {
        letter: "D2",
        name: ["Symétrie + Glow", "Symmetry + Glow", "Simetría + Glow"],
        description: [
            "Symétrie verticale avec cercle vert intégré",
            "Vertical symmetry with integrated green circle",
            "Simetría vertical con círculo verde integrado",
        ],
        recommended: true,
    },
];
