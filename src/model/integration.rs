use serde::{Deserialize, Serialize};
use std::fmt;

use crate::model::calendar::{GlobalCalendarIntegration, TeamCalendarSettings};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntegrationKind {
    Jira,
    Zendesk,
}

impl IntegrationKind {
    pub const ALL: [IntegrationKind; 2] = [IntegrationKind::Jira, IntegrationKind::Zendesk];

    pub fn as_str(&self) -> &'static str {
        match self {
            IntegrationKind::Jira => "jira",
            IntegrationKind::Zendesk => "zendesk",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            IntegrationKind::Jira => "Jira",
            IntegrationKind::Zendesk => "Zendesk",
        }
    }

    pub fn parse(s: &str) -> Option<IntegrationKind> {
        match s {
            "jira" => Some(IntegrationKind::Jira),
            "zendesk" => Some(IntegrationKind::Zendesk),
            _ => None,
        }
    }
}

impl fmt::Display for IntegrationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JiraIntegration {
    pub url: String,
    pub username: String,
    pub api_token: String,
    pub project_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_failing_policies: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_software_vulnerabilities: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZendeskIntegration {
    pub url: String,
    pub email: String,
    pub api_token: String,
    pub group_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_failing_policies: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_software_vulnerabilities: Option<bool>,
}

/// Position in each list is the entry's original index, the identity used
/// to correlate a displayed row back to its source entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Integrations {
    #[serde(default)]
    pub jira: Vec<JiraIntegration>,
    #[serde(default)]
    pub zendesk: Vec<ZendeskIntegration>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum IntegrationEntry {
    Jira(JiraIntegration),
    Zendesk(ZendeskIntegration),
}

impl IntegrationEntry {
    pub fn kind(&self) -> IntegrationKind {
        match self {
            IntegrationEntry::Jira(_) => IntegrationKind::Jira,
            IntegrationEntry::Zendesk(_) => IntegrationKind::Zendesk,
        }
    }
}

impl Integrations {
    pub fn len(&self) -> usize {
        self.jira.len() + self.zendesk.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jira.is_empty() && self.zendesk.is_empty()
    }

    pub fn push(&mut self, entry: IntegrationEntry) {
        match entry {
            IntegrationEntry::Jira(j) => self.jira.push(j),
            IntegrationEntry::Zendesk(z) => self.zendesk.push(z),
        }
    }

    pub fn remove(
        &mut self,
        kind: IntegrationKind,
        original_index: usize,
    ) -> Option<IntegrationEntry> {
        match kind {
            IntegrationKind::Jira => {
                if original_index < self.jira.len() {
                    Some(IntegrationEntry::Jira(self.jira.remove(original_index)))
                } else {
                    None
                }
            }
            IntegrationKind::Zendesk => {
                if original_index < self.zendesk.len() {
                    Some(IntegrationEntry::Zendesk(self.zendesk.remove(original_index)))
                } else {
                    None
                }
            }
        }
    }

    // Editing a row while switching its service is a remove + push, not a
    // replace.
    pub fn replace(&mut self, original_index: usize, entry: IntegrationEntry) -> bool {
        match entry {
            IntegrationEntry::Jira(j) => {
                if let Some(slot) = self.jira.get_mut(original_index) {
                    *slot = j;
                    true
                } else {
                    false
                }
            }
            IntegrationEntry::Zendesk(z) => {
                if let Some(slot) = self.zendesk.get_mut(original_index) {
                    *slot = z;
                    true
                } else {
                    false
                }
            }
        }
    }
}

// The server sends google_calendar as null when unconfigured.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GlobalIntegrations {
    #[serde(flatten)]
    pub integrations: Integrations,
    #[serde(default)]
    pub google_calendar: Option<Vec<GlobalCalendarIntegration>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamIntegrations {
    #[serde(flatten)]
    pub integrations: Integrations,
    #[serde(default)]
    pub google_calendar: Option<TeamCalendarSettings>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jira(project_key: &str) -> JiraIntegration {
        JiraIntegration {
            url: "https://example.atlassian.net".into(),
            username: "ops@example.com".into(),
            api_token: "secret".into(),
            project_key: project_key.into(),
            enable_failing_policies: None,
            enable_software_vulnerabilities: Some(true),
        }
    }

    fn zendesk(group_id: u64) -> ZendeskIntegration {
        ZendeskIntegration {
            url: "https://example.zendesk.com".into(),
            email: "ops@example.com".into(),
            api_token: "secret".into(),
            group_id,
            enable_failing_policies: None,
            enable_software_vulnerabilities: None,
        }
    }

    #[test]
    fn kind_round_trips_through_str() {
        for kind in IntegrationKind::ALL {
            assert_eq!(IntegrationKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(IntegrationKind::parse("linear"), None);
    }

    #[test]
    fn jira_serializes_with_snake_case_wire_keys() {
        let json = serde_json::to_string(&jira("PROJ")).unwrap();
        assert!(json.contains("\"api_token\""));
        assert!(json.contains("\"project_key\""));
        assert!(json.contains("\"enable_software_vulnerabilities\":true"));
        // Unset toggles are omitted, not sent as null
        assert!(!json.contains("enable_failing_policies"));
    }

    #[test]
    fn collection_round_trip_preserves_every_record() {
        let mut ints = Integrations::default();
        for key in ["ENG", "OPS", "SEC"] {
            ints.push(IntegrationEntry::Jira(jira(key)));
        }
        ints.push(IntegrationEntry::Zendesk(zendesk(1001)));
        ints.push(IntegrationEntry::Zendesk(zendesk(1002)));

        let json = serde_json::to_string(&ints).unwrap();
        let back: Integrations = serde_json::from_str(&json).unwrap();
        assert_eq!(back.jira.len(), 3);
        assert_eq!(back.zendesk.len(), 2);
        assert_eq!(back, ints);
    }

    #[test]
    fn empty_lists_deserialize_from_missing_keys() {
        let ints: Integrations = serde_json::from_str("{}").unwrap();
        assert!(ints.is_empty());
    }

    #[test]
    fn global_calendar_accepts_null() {
        let json = r#"{"jira":[],"zendesk":[],"google_calendar":null}"#;
        let global: GlobalIntegrations = serde_json::from_str(json).unwrap();
        assert!(global.google_calendar.is_none());
    }

    #[test]
    fn remove_targets_only_the_named_variant() {
        let mut ints = Integrations::default();
        ints.push(IntegrationEntry::Jira(jira("ENG")));
        ints.push(IntegrationEntry::Zendesk(zendesk(7)));

        let removed = ints.remove(IntegrationKind::Zendesk, 0).unwrap();
        assert_eq!(removed.kind(), IntegrationKind::Zendesk);
        assert_eq!(ints.jira.len(), 1);
        assert!(ints.zendesk.is_empty());
    }

    #[test]
    fn remove_out_of_range_is_none() {
        let mut ints = Integrations::default();
        ints.push(IntegrationEntry::Jira(jira("ENG")));
        assert!(ints.remove(IntegrationKind::Jira, 1).is_none());
        assert_eq!(ints.jira.len(), 1);
    }

    #[test]
    fn replace_overwrites_in_place() {
        let mut ints = Integrations::default();
        ints.push(IntegrationEntry::Jira(jira("ENG")));
        ints.push(IntegrationEntry::Jira(jira("OPS")));

        let ok = ints.replace(1, IntegrationEntry::Jira(jira("SEC")));
        assert!(ok);
        assert_eq!(ints.jira[0].project_key, "ENG");
        assert_eq!(ints.jira[1].project_key, "SEC");
    }

    #[test]
    fn replace_out_of_range_is_false() {
        let mut ints = Integrations::default();
        assert!(!ints.replace(0, IntegrationEntry::Zendesk(zendesk(1))));
    }

    #[test]
    fn global_integrations_flatten_wire_shape() {
        let global = GlobalIntegrations {
            integrations: Integrations {
                jira: vec![jira("ENG")],
                zendesk: vec![],
            },
            google_calendar: None,
        };
        let value = serde_json::to_value(&global).unwrap();
        // jira/zendesk sit at the top level of the integrations object
        assert!(value.get("jira").is_some());
        assert!(value.get("zendesk").is_some());
        assert!(value.get("integrations").is_none());
    }
}
