//! Booking form payloads: talent options and event submissions.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Default venue shown on a fresh booking form.
pub const DEFAULT_LOCATION_TEXT: &str = "Decatur Recreation Center";
/// Default venue link shown on a fresh booking form.
pub const DEFAULT_LOCATION_URL: &str = "https://www.contradance.org/locations";
/// Default admission text shown on a fresh booking form.
pub const DEFAULT_EVENT_COST: &str = "Pay as you can";

/// A content node id. The API emits these as strings or numbers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Nid {
    Number(u64),
    Text(String),
}

impl fmt::Display for Nid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// A band, caller, sound tech, or host that can be picked on the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TalentOption {
    pub nid: Nid,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// The four talent categories on the booking form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TalentKind {
    Band,
    Caller,
    SoundTech,
    Host,
}

impl TalentKind {
    pub const ALL: [TalentKind; 4] =
        [Self::Band, Self::Caller, Self::SoundTech, Self::Host];
}

impl fmt::Display for TalentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Band => "band",
            Self::Caller => "caller",
            Self::SoundTech => "sound tech",
            Self::Host => "host",
        })
    }
}

/// Body of the booking form data endpoint.
///
/// Each map goes from an opaque id to an option. Ordered maps keep the
/// listing stable between runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingFormData {
    #[serde(default)]
    pub band_options: BTreeMap<String, TalentOption>,
    #[serde(default)]
    pub caller_options: BTreeMap<String, TalentOption>,
    #[serde(default)]
    pub sound_tech_options: BTreeMap<String, TalentOption>,
    #[serde(default)]
    pub host_options: BTreeMap<String, TalentOption>,
}

impl BookingFormData {
    /// The options for one category.
    pub fn options(&self, kind: TalentKind) -> &BTreeMap<String, TalentOption> {
        match kind {
            TalentKind::Band => &self.band_options,
            TalentKind::Caller => &self.caller_options,
            TalentKind::SoundTech => &self.sound_tech_options,
            TalentKind::Host => &self.host_options,
        }
    }

    /// Finds an option by exact name, ignoring ASCII case.
    pub fn find_by_name(&self, kind: TalentKind, name: &str) -> Option<&TalentOption> {
        self.options(kind)
            .values()
            .find(|o| o.name.eq_ignore_ascii_case(name))
    }
}

/// A talent slot on the event: either a known option or free text typed
/// into the autocomplete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Talent {
    Selected(TalentOption),
    Named(String),
}

impl Default for Talent {
    fn default() -> Self {
        Self::Named(String::new())
    }
}

/// Body of `POST /api/booking/event/create`.
///
/// Currency fields stay strings: the form accepts whatever the currency
/// input produced. Times are ISO 8601 strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSubmission {
    pub event_title: String,
    pub event_description: String,
    pub event_start_time: String,
    pub event_end_time: String,
    pub event_cost: String,
    pub event_location_text: String,
    #[serde(rename = "eventLocationURL")]
    pub event_location_url: String,
    pub band: Talent,
    pub band_pay: String,
    #[serde(default)]
    pub band_travel: String,
    pub caller: Talent,
    pub caller_pay: String,
    #[serde(default)]
    pub caller_travel: String,
    pub sound_tech: Talent,
    pub sound_tech_pay: String,
    pub host: Talent,
}

impl EventSubmission {
    /// An event with the form's default venue and cost and everything
    /// else blank.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            event_title: title.into(),
            event_description: String::new(),
            event_start_time: String::new(),
            event_end_time: String::new(),
            event_cost: DEFAULT_EVENT_COST.to_string(),
            event_location_text: DEFAULT_LOCATION_TEXT.to_string(),
            event_location_url: DEFAULT_LOCATION_URL.to_string(),
            band: Talent::default(),
            band_pay: String::new(),
            band_travel: String::new(),
            caller: Talent::default(),
            caller_pay: String::new(),
            caller_travel: String::new(),
            sound_tech: Talent::default(),
            sound_tech_pay: String::new(),
            host: Talent::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FORM_DATA: &str = r#"{
        "bandOptions": {
            "0": {"nid": "0", "name": "Jimmy and the Hendricks", "description": "Cool description"},
            "1": {"nid": 1, "name": "Contraforce"}
        },
        "callerOptions": {"12": {"nid": "12", "name": "Pat Caller"}},
        "soundTechOptions": {},
        "hostOptions": {"3": {"nid": 3, "name": "Sam Host"}}
    }"#;

    #[test]
    fn test_form_data_parses_mixed_nids() {
        let data: BookingFormData = serde_json::from_str(FORM_DATA).unwrap();
        assert_eq!(data.band_options.len(), 2);
        assert_eq!(data.band_options["0"].nid, Nid::Text("0".into()));
        assert_eq!(data.band_options["1"].nid, Nid::Number(1));
        assert_eq!(
            data.band_options["0"].description.as_deref(),
            Some("Cool description")
        );
        assert!(data.sound_tech_options.is_empty());
    }

    #[test]
    fn test_form_data_missing_category_defaults_to_empty() {
        let data: BookingFormData = serde_json::from_str(r#"{"bandOptions": {}}"#).unwrap();
        assert!(data.options(TalentKind::Host).is_empty());
    }

    #[test]
    fn test_find_by_name_ignores_case() {
        let data: BookingFormData = serde_json::from_str(FORM_DATA).unwrap();
        let band = data.find_by_name(TalentKind::Band, "contraforce").unwrap();
        assert_eq!(band.nid.to_string(), "1");
        assert!(data.find_by_name(TalentKind::Caller, "nobody").is_none());
    }

    #[test]
    fn test_event_serializes_with_form_field_names() {
        let mut event = EventSubmission::new("Friday Dance");
        event.band = Talent::Selected(TalentOption {
            nid: Nid::Text("1".into()),
            name: "Contraforce".into(),
            description: None,
        });
        event.caller = Talent::Named("Guest Caller".into());
        event.band_pay = "$300.00".into();

        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["eventTitle"], "Friday Dance");
        assert_eq!(value["eventLocationURL"], DEFAULT_LOCATION_URL);
        assert_eq!(value["eventLocationText"], DEFAULT_LOCATION_TEXT);
        assert_eq!(value["eventCost"], DEFAULT_EVENT_COST);
        assert_eq!(value["band"]["name"], "Contraforce");
        assert_eq!(value["caller"], "Guest Caller");
        assert_eq!(value["bandPay"], "$300.00");
        assert!(value.get("soundTechPay").is_some());
    }

    #[test]
    fn test_event_parses_selected_and_free_text_talent() {
        let json = r#"{
            "eventTitle": "T", "eventDescription": "D",
            "eventStartTime": "2026-11-06T19:30:00Z", "eventEndTime": "2026-11-06T22:30:00Z",
            "eventCost": "$10", "eventLocationText": "Hall",
            "eventLocationURL": "https://example.org",
            "band": {"nid": 4, "name": "Great Bear"}, "bandPay": "1",
            "caller": "Someone New", "callerPay": "2",
            "soundTech": {"nid": "9", "name": "Lee"}, "soundTechPay": "3",
            "host": "Host Person"
        }"#;
        let event: EventSubmission = serde_json::from_str(json).unwrap();
        assert!(matches!(event.band, Talent::Selected(ref o) if o.name == "Great Bear"));
        assert_eq!(event.caller, Talent::Named("Someone New".into()));
        assert_eq!(event.band_travel, "");
    }
}
