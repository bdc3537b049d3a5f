use crate::models::{Guide, Resource, SongRecord};

/// Something the modal can launch outside the terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ModalAction {
    pub(crate) label: String,
    pub(crate) url: String,
}

/// Overlay describing one guide of one song.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct GuideModal {
    pub(crate) title: String,
    pub(crate) meta: String,
    pub(crate) body: String,
    pub(crate) action: Option<ModalAction>,
}

impl GuideModal {
    /// Build the overlay, classifying the guide value right now rather than
    /// trusting anything cached on the record.
    pub(crate) fn for_song(song: &SongRecord, guide: Guide) -> Self {
        let (body, action) = match song.resource(guide) {
            Resource::Missing => ("This version is not available yet.".to_string(), None),
            Resource::Link(url) => (
                format!(
                    "Guide type: {}\n\nExternal resource ready to open.",
                    guide.label()
                ),
                Some(ModalAction {
                    label: format!("Open {}", guide.label()),
                    url: url.to_string(),
                }),
            ),
            Resource::Text(text) => (text.to_string(), None),
        };

        Self {
            title: song.name.clone(),
            meta: song.meta_line(),
            body,
            action,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn song(versions: &[(Guide, &str)]) -> SongRecord {
        SongRecord {
            key: "ode to joy".to_string(),
            name: "Ode to Joy".to_string(),
            artist: "Beethoven".to_string(),
            genre: String::new(),
            level_stars: "★★☆☆☆".to_string(),
            level_num: 2,
            content: String::new(),
            versions: versions
                .iter()
                .map(|(guide, value)| (*guide, value.to_string()))
                .collect::<BTreeMap<_, _>>(),
        }
    }

    #[test]
    fn missing_guide_says_so() {
        let modal = GuideModal::for_song(&song(&[]), Guide::Notes);
        assert_eq!(modal.title, "Ode to Joy");
        assert_eq!(modal.meta, "Beethoven · — · ★★☆☆☆");
        assert_eq!(modal.body, "This version is not available yet.");
        assert_eq!(modal.action, None);
    }

    #[test]
    fn link_guide_offers_to_open_it() {
        let modal =
            GuideModal::for_song(&song(&[(Guide::Score, "HTTPS://sheets.example/ode")]), Guide::Score);
        assert!(modal.body.contains("Partitura"));
        assert_eq!(
            modal.action,
            Some(ModalAction {
                label: "Open Partitura".to_string(),
                url: "HTTPS://sheets.example/ode".to_string(),
            })
        );
    }

    #[test]
    fn text_guide_is_shown_verbatim() {
        let modal = GuideModal::for_song(&song(&[(Guide::Numbers, " 3 3 4 5 ")]), Guide::Numbers);
        assert_eq!(modal.body, "3 3 4 5");
        assert_eq!(modal.action, None);
    }
}
