use anyhow::Result;

use crate::models::Language;
use crate::storage::Persister;

/// The fixed set of supported locales.
pub const LANGUAGES: [Language; 5] = [
    Language {
        code: "en",
        label: "English",
        native_label: "English",
    },
    Language {
        code: "de",
        label: "German",
        native_label: "Deutsch",
    },
    Language {
        code: "fr",
        label: "French",
        native_label: "Français",
    },
    Language {
        code: "it",
        label: "Italian",
        native_label: "Italiano",
    },
    Language {
        code: "rm",
        label: "Romansh",
        native_label: "Rumantsch",
    },
];

pub fn find(code: &str) -> Option<Language> {
    LANGUAGES.iter().copied().find(|l| l.code == code)
}

/// The locale the process environment reports, e.g. `de_CH.UTF-8` → `de`.
pub fn system_locale() -> Option<String> {
    let lang = std::env::var("LANG").ok()?;
    let code = lang.split(['_', '.']).next()?.trim();
    if code.is_empty() {
        None
    } else {
        Some(code.to_lowercase())
    }
}

/// The persisted locale preference plus the key→string lookup.
///
/// Initialization order: persisted code, else the system locale when it is
/// one of the supported set, else English. Evaluated once at load.
pub struct LanguageStore<P: Persister> {
    current: Language,
    persister: P,
}

impl<P: Persister> LanguageStore<P> {
    pub fn load(persister: P, system: Option<&str>) -> Result<Self> {
        let saved = persister.load()?;
        let current = saved
            .as_deref()
            .map(str::trim)
            .and_then(find)
            .or_else(|| system.and_then(find))
            .unwrap_or(LANGUAGES[0]);
        Ok(Self { current, persister })
    }

    pub fn current(&self) -> Language {
        self.current
    }

    pub fn set_language(&mut self, lang: Language) -> Result<()> {
        tracing::debug!(code = lang.code, "language changed");
        self.current = lang;
        self.persister.save(lang.code)
    }

    /// Look up `key` in the active locale's table. A key the table lacks
    /// comes back unchanged, so untranslated strings stay visible as raw
    /// keys instead of silently borrowing another locale. Total: never
    /// panics, never returns nothing.
    pub fn translate<'a>(&self, key: &'a str) -> &'a str {
        table(self.current.code)
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| *v)
            .unwrap_or(key)
    }
}

fn table(code: &str) -> &'static [(&'static str, &'static str)] {
    match code {
        "en" => EN,
        "de" => DE,
        "fr" => FR,
        "it" => IT,
        "rm" => RM,
        _ => &[],
    }
}

const EN: &[(&str, &str)] = &[
    ("nav.sign_in", "Sign In"),
    ("common.loading", "Loading..."),
    ("common.location", "Location"),
    ("common.salary", "Salary"),
    ("swipe.smart_discovery", "Smart Discovery"),
    ("swipe.undo", "Undo"),
    ("swipe.not_interested", "Not interested"),
    ("swipe.interested", "Apply instantly!"),
    ("swipe_job.great_job_exploring", "Great Job Exploring!"),
    (
        "swipe_job.reviewed_all_positions",
        "You've reviewed all available positions. Check your applications and saved jobs.",
    ),
    ("swipe_job.view_saved_jobs", "View Saved Jobs"),
    ("swipe_job.job_description", "Job Description"),
    ("swipe_job.apply", "APPLY"),
    ("swipe_job.pass", "PASS"),
    ("swipe_job.superlike", "SUPER LIKE"),
    ("swipe_job.job_of", "Job {current} of {total}"),
];

const DE: &[(&str, &str)] = &[
    ("nav.sign_in", "Anmelden"),
    ("common.loading", "Lädt..."),
    ("common.location", "Standort"),
    ("common.salary", "Gehalt"),
    ("swipe.smart_discovery", "Intelligente Entdeckung"),
    ("swipe.undo", "Rückgängig"),
    ("swipe.not_interested", "Nicht interessiert"),
    ("swipe.interested", "Sofort bewerben!"),
    ("swipe_job.great_job_exploring", "Tolle Arbeit beim Erkunden!"),
    (
        "swipe_job.reviewed_all_positions",
        "Sie haben alle verfügbaren Positionen überprüft. Überprüfen Sie Ihre Bewerbungen und gespeicherten Jobs.",
    ),
    ("swipe_job.view_saved_jobs", "Gespeicherte Jobs Anzeigen"),
    ("swipe_job.job_description", "Stellenbeschreibung"),
    ("swipe_job.apply", "BEWERBEN"),
    ("swipe_job.pass", "ABLEHNEN"),
    ("swipe_job.superlike", "SUPER LIKE"),
    ("swipe_job.job_of", "Job {current} von {total}"),
];

const FR: &[(&str, &str)] = &[
    ("nav.sign_in", "Se Connecter"),
    ("common.loading", "Chargement..."),
    ("common.location", "Lieu"),
    ("common.salary", "Salaire"),
    ("swipe.smart_discovery", "Découverte Intelligente"),
    ("swipe.undo", "Annuler"),
    ("swipe.not_interested", "Pas intéressé"),
    ("swipe.interested", "Postuler instantanément!"),
    ("swipe_job.great_job_exploring", "Excellent Travail d'Exploration!"),
    (
        "swipe_job.reviewed_all_positions",
        "Vous avez examiné toutes les positions disponibles. Vérifiez vos candidatures et emplois sauvegardés.",
    ),
    ("swipe_job.view_saved_jobs", "Voir les Emplois Sauvegardés"),
    ("swipe_job.job_description", "Description du Poste"),
    ("swipe_job.apply", "POSTULER"),
    ("swipe_job.pass", "PASSER"),
    ("swipe_job.superlike", "SUPER LIKE"),
    ("swipe_job.job_of", "Emploi {current} sur {total}"),
];

const IT: &[(&str, &str)] = &[
    ("nav.sign_in", "Accedi"),
    ("common.loading", "Caricamento..."),
    ("common.location", "Posizione"),
    ("common.salary", "Stipendio"),
    ("swipe.smart_discovery", "Scoperta Intelligente"),
    ("swipe.undo", "Annulla"),
    ("swipe.not_interested", "Non interessato"),
    ("swipe.interested", "Candidati subito!"),
    ("swipe_job.great_job_exploring", "Ottimo Lavoro di Esplorazione!"),
    (
        "swipe_job.reviewed_all_positions",
        "Hai esaminato tutte le posizioni disponibili. Controlla le tue candidature e i lavori salvati.",
    ),
    ("swipe_job.view_saved_jobs", "Visualizza Lavori Salvati"),
    ("swipe_job.job_description", "Descrizione del Lavoro"),
    ("swipe_job.apply", "CANDIDATI"),
    ("swipe_job.pass", "SALTA"),
    ("swipe_job.superlike", "SUPER LIKE"),
    ("swipe_job.job_of", "Lavoro {current} di {total}"),
];

const RM: &[(&str, &str)] = &[
    ("nav.sign_in", "Sa Connectar"),
    ("common.loading", "Chargiar..."),
    ("common.location", "Lieu"),
    ("common.salary", "Salari"),
    ("swipe.smart_discovery", "Scuverta Intelligenta"),
    ("swipe.undo", "Interrumper"),
    ("swipe.not_interested", "Betg interessà"),
    ("swipe.interested", "Sa candidar directamain!"),
    ("swipe_job.great_job_exploring", "Grond Lavur da Exploraziun!"),
    (
        "swipe_job.reviewed_all_positions",
        "Vus avais controllà tut las posiziuns disponiblas. Controllai vossas candidaturas e plazzas memorisadas.",
    ),
    ("swipe_job.view_saved_jobs", "Vesair Plazzas Memorisadas"),
    ("swipe_job.job_description", "Descripziun da la Plazza"),
    ("swipe_job.apply", "SA CANDIDAR"),
    ("swipe_job.pass", "SURSIGLIR"),
    ("swipe_job.superlike", "SUPER LIKE"),
    ("swipe_job.job_of", "Plazza {current} da {total}"),
];
