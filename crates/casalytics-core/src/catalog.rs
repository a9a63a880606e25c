//! Event catalog and category registry.
//!
//! The catalog maps every canonical client event name to one of four
//! semantic categories. It is a fixed, build-time resource — not user
//! configurable — but it is carried as a value (`EventCatalog`) rather than a
//! global so tests and future catalog versions can swap it without touching
//! consuming code.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventCategory {
    Search,
    Navigation,
    Property,
    Conversion,
}

impl EventCategory {
    pub const ALL: [EventCategory; 4] = [
        EventCategory::Search,
        EventCategory::Navigation,
        EventCategory::Property,
        EventCategory::Conversion,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventCategory::Search => "search",
            EventCategory::Navigation => "navigation",
            EventCategory::Property => "property",
            EventCategory::Conversion => "conversion",
        }
    }
}

/// One catalog row. Deserializable so a catalog can be loaded as data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub name: String,
    pub category: EventCategory,
}

/// The canonical event names emitted by the site snippet, in declaration
/// order. Legacy names kept by older snippet versions map to the same
/// category as their replacements; no migration step is needed downstream.
const BUILTIN: &[(&str, EventCategory)] = &[
    // Search behaviour
    ("search_submit", EventCategory::Search),
    ("search_results_view", EventCategory::Search),
    ("autocomplete_select", EventCategory::Search),
    ("filter_apply", EventCategory::Search),
    ("filter_clear", EventCategory::Search),
    ("sort_change", EventCategory::Search),
    ("map_area_search", EventCategory::Search),
    ("saved_search_create", EventCategory::Search),
    // Site navigation
    ("session_start", EventCategory::Navigation),
    ("page_view", EventCategory::Navigation),
    ("menu_click", EventCategory::Navigation),
    ("breadcrumb_click", EventCategory::Navigation),
    ("pagination_click", EventCategory::Navigation),
    ("footer_link_click", EventCategory::Navigation),
    ("external_link_click", EventCategory::Navigation),
    // Listing engagement
    ("property_view", EventCategory::Property),
    ("property_gallery_open", EventCategory::Property),
    ("property_photo_next", EventCategory::Property),
    ("property_video_play", EventCategory::Property),
    ("property_map_view", EventCategory::Property),
    ("property_share", EventCategory::Property),
    ("property_favorite", EventCategory::Property),
    ("contact_form_open", EventCategory::Property),
    // Conversions
    ("conversion_contact_form", EventCategory::Conversion),
    // Legacy snippet (< v3) name for conversion_contact_form.
    ("contact_form_submit", EventCategory::Conversion),
    // Legacy snippet (< v2) name, still seen from cached pages.
    ("lead_form_submit", EventCategory::Conversion),
    ("conversion_phone_click", EventCategory::Conversion),
    ("conversion_whatsapp_click", EventCategory::Conversion),
    ("conversion_schedule_visit", EventCategory::Conversion),
    ("conversion_newsletter_signup", EventCategory::Conversion),
    ("conversion_broker_chat", EventCategory::Conversion),
];

/// Immutable event-name → category lookup.
///
/// `category_of` is total over the catalog and returns `None` for anything
/// outside it — events outside the fixed catalog occur in practice and must
/// never fail aggregation.
#[derive(Debug, Clone)]
pub struct EventCatalog {
    entries: Vec<CatalogEntry>,
    index: HashMap<String, EventCategory>,
}

impl EventCatalog {
    /// The catalog shipped with this build.
    pub fn builtin() -> Self {
        Self::from_entries(
            BUILTIN
                .iter()
                .map(|(name, category)| CatalogEntry {
                    name: (*name).to_string(),
                    category: *category,
                })
                .collect(),
        )
    }

    /// Build a catalog from explicit entries. The first entry wins on
    /// duplicate names; declaration order is preserved for `events_in`.
    pub fn from_entries(entries: Vec<CatalogEntry>) -> Self {
        let mut index = HashMap::with_capacity(entries.len());
        let mut deduped = Vec::with_capacity(entries.len());
        for entry in entries {
            if index.contains_key(&entry.name) {
                continue;
            }
            index.insert(entry.name.clone(), entry.category);
            deduped.push(entry);
        }
        Self {
            entries: deduped,
            index,
        }
    }

    /// Category for a canonical event name; `None` for unknown names.
    pub fn category_of(&self, name: &str) -> Option<EventCategory> {
        self.index.get(name).copied()
    }

    /// All catalog names in `category`, in declaration order. Deterministic,
    /// suitable for building `event IN (…)` predicates.
    pub fn events_in(&self, category: EventCategory) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|entry| entry.category == category)
            .map(|entry| entry.name.as_str())
            .collect()
    }

    pub fn is_in_category(&self, name: &str, category: EventCategory) -> bool {
        self.category_of(name) == Some(category)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
