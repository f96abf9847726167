use super::model::NotificationChannel;

/// UI strings for the notification settings panel.
pub(crate) struct SettingsLabels {
    pub title: &'static str,
    pub description: &'static str,
    pub channels_heading: &'static str,
    pub general: (&'static str, &'static str),
    pub reviews: (&'static str, &'static str),
    pub favorites: (&'static str, &'static str),
    pub leads: (&'static str, &'static str),
    pub business: (&'static str, &'static str),
    pub digest: (&'static str, &'static str),
    pub language: &'static str,
    pub quiet_hours: &'static str,
    pub quiet_hours_description: &'static str,
    pub quiet_start: &'static str,
    pub quiet_end: &'static str,
    pub timezone: &'static str,
    pub timezone_auto: &'static str,
    pub weekly_cap: &'static str,
    pub weekly_cap_hint: &'static str,
    pub saving: &'static str,
    pub saved: &'static str,
    pub save_failed: &'static str,
}

impl SettingsLabels {
    /// (label, description) for a channel toggle.
    pub fn channel(&self, ch: NotificationChannel) -> (&'static str, &'static str) {
        match ch {
            NotificationChannel::General => self.general,
            NotificationChannel::Reviews => self.reviews,
            NotificationChannel::Favorites => self.favorites,
            NotificationChannel::Leads => self.leads,
            NotificationChannel::Business => self.business,
            NotificationChannel::Digest => self.digest,
        }
    }
}

/// Supported locales, in fallback order. English first.
pub(crate) const SUPPORTED_LOCALES: [(&str, &str); 3] =
    [("en", "English"), ("es", "Español"), ("fr", "Français")];

static EN: SettingsLabels = SettingsLabels {
    title: "Email notifications",
    description: "Choose which emails we send you about your listings.",
    channels_heading: "Channels",
    general: ("General updates", "Product news and account notices."),
    reviews: ("Reviews & Replies", "When someone reviews or replies on your listing."),
    favorites: ("Favorites", "When a pet owner saves your listing."),
    leads: ("New leads", "When a customer sends you an inquiry."),
    business: ("Business tips", "Advice for growing your pet-care business."),
    digest: ("Weekly digest", "A summary of your listing activity."),
    language: "Email language",
    quiet_hours: "Quiet hours",
    quiet_hours_description: "Hold emails during these hours.",
    quiet_start: "From",
    quiet_end: "Until",
    timezone: "Time zone",
    timezone_auto: "Automatic",
    weekly_cap: "Maximum emails per week",
    weekly_cap_hint: "Between 1 and 1000.",
    saving: "Saving…",
    saved: "Saved",
    save_failed: "Could not save",
};

static ES: SettingsLabels = SettingsLabels {
    title: "Notificaciones por correo",
    description: "Elige qué correos te enviamos sobre tus fichas.",
    channels_heading: "Canales",
    general: ("Novedades generales", "Noticias del producto y avisos de la cuenta."),
    reviews: ("Reseñas y respuestas", "Cuando alguien reseña o responde en tu ficha."),
    favorites: ("Favoritos", "Cuando un dueño de mascota guarda tu ficha."),
    leads: ("Nuevos contactos", "Cuando un cliente te envía una consulta."),
    business: ("Consejos de negocio", "Ideas para hacer crecer tu negocio de mascotas."),
    digest: ("Resumen semanal", "Un resumen de la actividad de tus fichas."),
    language: "Idioma de los correos",
    quiet_hours: "Horas de silencio",
    quiet_hours_description: "Retener los correos durante estas horas.",
    quiet_start: "Desde",
    quiet_end: "Hasta",
    timezone: "Zona horaria",
    timezone_auto: "Automática",
    weekly_cap: "Máximo de correos por semana",
    weekly_cap_hint: "Entre 1 y 1000.",
    saving: "Guardando…",
    saved: "Guardado",
    save_failed: "No se pudo guardar",
};

static FR: SettingsLabels = SettingsLabels {
    title: "Notifications par e-mail",
    description: "Choisissez les e-mails que nous vous envoyons sur vos fiches.",
    channels_heading: "Canaux",
    general: ("Actualités générales", "Nouveautés du produit et avis du compte."),
    reviews: ("Avis et réponses", "Quand quelqu'un laisse un avis ou répond sur votre fiche."),
    favorites: ("Favoris", "Quand un propriétaire d'animal enregistre votre fiche."),
    leads: ("Nouveaux contacts", "Quand un client vous envoie une demande."),
    business: ("Conseils business", "Des idées pour développer votre activité."),
    digest: ("Résumé hebdomadaire", "Un résumé de l'activité de vos fiches."),
    language: "Langue des e-mails",
    quiet_hours: "Heures calmes",
    quiet_hours_description: "Retenir les e-mails pendant ces heures.",
    quiet_start: "De",
    quiet_end: "À",
    timezone: "Fuseau horaire",
    timezone_auto: "Automatique",
    weekly_cap: "Nombre maximum d'e-mails par semaine",
    weekly_cap_hint: "Entre 1 et 1000.",
    saving: "Enregistrement…",
    saved: "Enregistré",
    save_failed: "Échec de l'enregistrement",
};

/// Unknown codes fall back to English. Region suffixes (`es-MX`) are ignored.
pub(crate) fn labels_for(locale: &str) -> &'static SettingsLabels {
    let lang = locale
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    match lang.as_str() {
        "es" => &ES,
        "fr" => &FR,
        _ => &EN,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_for_known_locales() {
        assert_eq!(labels_for("es").saved, "Guardado");
        assert_eq!(labels_for("fr-CA").saved, "Enregistré");
        assert_eq!(labels_for("EN").saved, "Saved");
    }

    #[test]
    fn test_unknown_locale_falls_back_to_english() {
        assert_eq!(labels_for("de").title, EN.title);
        assert_eq!(labels_for("").title, EN.title);
        assert_eq!(SUPPORTED_LOCALES[0].0, "en");
    }

    #[test]
    fn test_reviews_channel_label() {
        assert_eq!(labels_for("en").channel(NotificationChannel::Reviews).0, "Reviews & Replies");
    }
}
