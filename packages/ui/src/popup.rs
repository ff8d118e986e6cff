//! Popup HTML formatters.
//!
//! Every interpolated value is HTML-escaped, since resource descriptions
//! come straight from the database.

use beredskap_map_resource_models::NearestCandidate;
use geojson::JsonObject;

/// CSS class applied to every popup.
pub const POPUP_CLASS: &str = "custom-popup";

/// Fallback heading for shelters without an address.
pub const UNKNOWN_ADDRESS: &str = "Ukjent adresse";

/// Formats a feature's properties as popup HTML.
pub type PopupFormatter = fn(&JsonObject) -> String;

/// Escapes text for inclusion in HTML.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escaped display text of a property. Missing and null read as empty.
fn prop(props: &JsonObject, key: &str) -> String {
    match props.get(key) {
        Some(serde_json::Value::String(s)) => escape_html(s),
        Some(serde_json::Value::Null) | None => String::new(),
        Some(other) => escape_html(&other.to_string()),
    }
}

/// Popup for a preparedness resource.
#[must_use]
pub fn resource_popup(props: &JsonObject) -> String {
    format!(
        "<h3>{}</h3>\n<p><strong>Kategori:</strong> {}</p>\n<p>{}</p>",
        prop(props, "navn"),
        prop(props, "kategori"),
        prop(props, "beskrivelse"),
    )
}

/// Popup for a public shelter.
#[must_use]
pub fn shelter_popup(props: &JsonObject) -> String {
    let address = prop(props, "adresse");
    let heading = if address.trim().is_empty() {
        UNKNOWN_ADDRESS.to_string()
    } else {
        address
    };

    format!(
        "<h3>{heading}</h3>\n\
         <p><strong>Type:</strong> {}</p>\n\
         <p><strong>Kapasitet:</strong> {} personer</p>\n\
         <p><em>Romnummer: {}</em></p>",
        prop(props, "objtype"),
        prop(props, "plasser"),
        prop(props, "romnr"),
    )
}

/// Popup for the nearest resource to a clicked point.
#[must_use]
pub fn nearest_popup(candidate: &NearestCandidate) -> String {
    format!(
        "<div class=\"popup-hendelse\">\n\
         <h4>📍 Din posisjon</h4>\n\
         <p><strong>Nærmeste ressurs:</strong><br> {}</p>\n\
         <p><strong>Kategori:</strong> {}</p>\n\
         <p><strong>Avstand:</strong> ca. {} meter</p>\n\
         </div>",
        escape_html(&candidate.name),
        escape_html(&candidate.category),
        candidate.rounded_distance(),
    )
}
