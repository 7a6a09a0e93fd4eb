use crate::model::integration::{
    IntegrationEntry, IntegrationKind, JiraIntegration, ZendeskIntegration,
};
use crate::model::table::IntegrationRow;

// Everything is a string while the user types; validate decides what it
// means.
#[derive(Debug, Clone)]
pub struct IntegrationFormData {
    pub kind: IntegrationKind,
    pub url: String,
    pub username: String,
    pub email: String,
    pub api_token: String,
    pub project_key: String,
    pub group_id: String,
    pub enable_software_vulnerabilities: bool,
}

impl IntegrationFormData {
    pub fn new(kind: IntegrationKind) -> Self {
        IntegrationFormData {
            kind,
            url: String::new(),
            username: String::new(),
            email: String::new(),
            api_token: String::new(),
            project_key: String::new(),
            group_id: String::new(),
            enable_software_vulnerabilities: false,
        }
    }

    pub fn from_row(row: &IntegrationRow) -> Self {
        IntegrationFormData {
            kind: row.kind,
            url: row.url.clone(),
            username: row.username.clone().unwrap_or_default(),
            email: row.email.clone().unwrap_or_default(),
            api_token: row.api_token.clone(),
            project_key: row.project_key.clone().unwrap_or_default(),
            group_id: row.group_id.map(|id| id.to_string()).unwrap_or_default(),
            enable_software_vulnerabilities: row
                .enable_software_vulnerabilities
                .unwrap_or(false),
        }
    }

    // Call only after validate reports clean; a bad group id falls back to
    // 0 here rather than panicking.
    pub fn into_entry(self) -> IntegrationEntry {
        let vuln = if self.enable_software_vulnerabilities {
            Some(true)
        } else {
            None
        };
        match self.kind {
            IntegrationKind::Jira => IntegrationEntry::Jira(JiraIntegration {
                url: self.url,
                username: self.username,
                api_token: self.api_token,
                project_key: self.project_key,
                enable_failing_policies: None,
                enable_software_vulnerabilities: vuln,
            }),
            IntegrationKind::Zendesk => IntegrationEntry::Zendesk(ZendeskIntegration {
                url: self.url,
                email: self.email,
                api_token: self.api_token,
                group_id: self.group_id.trim().parse().unwrap_or(0),
                enable_failing_policies: None,
                enable_software_vulnerabilities: vuln,
            }),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct IntegrationFormErrors {
    pub url: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub api_token: Option<String>,
    pub project_key: Option<String>,
    pub group_id: Option<String>,
}

impl IntegrationFormErrors {
    pub fn is_clean(&self) -> bool {
        self.url.is_none()
            && self.username.is_none()
            && self.email.is_none()
            && self.api_token.is_none()
            && self.project_key.is_none()
            && self.group_id.is_none()
    }

    pub fn messages(&self) -> Vec<(&'static str, &str)> {
        let slots = [
            ("url", &self.url),
            ("username", &self.username),
            ("email", &self.email),
            ("api_token", &self.api_token),
            ("project_key", &self.project_key),
            ("group_id", &self.group_id),
        ];
        slots
            .into_iter()
            .filter_map(|(field, slot)| slot.as_deref().map(|msg| (field, msg)))
            .collect()
    }
}

pub fn validate(form: &IntegrationFormData) -> IntegrationFormErrors {
    let mut errors = IntegrationFormErrors::default();

    let url = form.url.trim();
    if url.is_empty() {
        errors.url = Some("URL is required".into());
    } else if !is_http_url(url) {
        errors.url = Some("URL must start with http:// or https://".into());
    }

    if form.api_token.trim().is_empty() {
        errors.api_token = Some("API token is required".into());
    }

    match form.kind {
        IntegrationKind::Jira => {
            if form.username.trim().is_empty() {
                errors.username = Some("Username is required".into());
            }
            if form.project_key.trim().is_empty() {
                errors.project_key = Some("Project key is required".into());
            }
        }
        IntegrationKind::Zendesk => {
            let email = form.email.trim();
            if email.is_empty() {
                errors.email = Some("Email is required".into());
            } else if !is_email(email) {
                errors.email = Some("Must be a valid email address".into());
            }
            let group = form.group_id.trim();
            if group.is_empty() {
                errors.group_id = Some("Group ID is required".into());
            } else if group.parse::<u64>().is_err() {
                errors.group_id = Some("Group ID must be a number".into());
            }
        }
    }

    errors
}

fn is_http_url(s: &str) -> bool {
    let rest = s
        .strip_prefix("https://")
        .or_else(|| s.strip_prefix("http://"));
    matches!(rest, Some(host) if !host.is_empty())
}

fn is_email(s: &str) -> bool {
    // Local@domain with a dot somewhere in the domain; real validation is
    // the mail server's job.
    match s.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jira_form() -> IntegrationFormData {
        IntegrationFormData {
            kind: IntegrationKind::Jira,
            url: "https://example.atlassian.net".into(),
            username: "ops@example.com".into(),
            email: String::new(),
            api_token: "token".into(),
            project_key: "ENG".into(),
            group_id: String::new(),
            enable_software_vulnerabilities: false,
        }
    }

    fn zendesk_form() -> IntegrationFormData {
        IntegrationFormData {
            kind: IntegrationKind::Zendesk,
            url: "https://example.zendesk.com".into(),
            username: String::new(),
            email: "ops@example.com".into(),
            api_token: "token".into(),
            project_key: String::new(),
            group_id: "12345".into(),
            enable_software_vulnerabilities: true,
        }
    }

    #[test]
    fn valid_jira_form_is_clean() {
        assert!(validate(&jira_form()).is_clean());
    }

    #[test]
    fn valid_zendesk_form_is_clean() {
        assert!(validate(&zendesk_form()).is_clean());
    }

    #[test]
    fn missing_url_is_flagged() {
        let mut form = jira_form();
        form.url = "  ".into();
        let errors = validate(&form);
        assert_eq!(errors.url.as_deref(), Some("URL is required"));
    }

    #[test]
    fn non_http_url_is_flagged() {
        let mut form = jira_form();
        form.url = "example.atlassian.net".into();
        assert!(validate(&form).url.is_some());

        form.url = "ftp://example.com".into();
        assert!(validate(&form).url.is_some());

        form.url = "https://".into();
        assert!(validate(&form).url.is_some());
    }

    #[test]
    fn jira_requires_username_and_project_key() {
        let mut form = jira_form();
        form.username.clear();
        form.project_key.clear();
        let errors = validate(&form);
        assert!(errors.username.is_some());
        assert!(errors.project_key.is_some());
        // Zendesk-only fields stay clean on a Jira form
        assert!(errors.email.is_none());
        assert!(errors.group_id.is_none());
    }

    #[test]
    fn zendesk_requires_email_and_numeric_group() {
        let mut form = zendesk_form();
        form.email = "not-an-email".into();
        form.group_id = "abc".into();
        let errors = validate(&form);
        assert_eq!(errors.email.as_deref(), Some("Must be a valid email address"));
        assert_eq!(errors.group_id.as_deref(), Some("Group ID must be a number"));
        assert!(errors.username.is_none());
        assert!(errors.project_key.is_none());
    }

    #[test]
    fn missing_token_is_flagged_for_both_variants() {
        let mut jira = jira_form();
        jira.api_token.clear();
        assert!(validate(&jira).api_token.is_some());

        let mut zendesk = zendesk_form();
        zendesk.api_token = " ".into();
        assert!(validate(&zendesk).api_token.is_some());
    }

    #[test]
    fn email_shape_edge_cases() {
        assert!(is_email("a@b.co"));
        assert!(!is_email("a@b"));
        assert!(!is_email("@b.co"));
        assert!(!is_email("a@.co"));
        assert!(!is_email("a@b.co."));
        assert!(!is_email("plain"));
    }

    #[test]
    fn messages_list_set_slots_in_form_order() {
        let mut form = zendesk_form();
        form.url.clear();
        form.group_id = "xyz".into();
        let errors = validate(&form);
        let fields: Vec<&str> = errors.messages().iter().map(|(f, _)| *f).collect();
        assert_eq!(fields, vec!["url", "group_id"]);
        assert!(validate(&zendesk_form()).messages().is_empty());
    }

    #[test]
    fn into_entry_builds_matching_variant() {
        let entry = jira_form().into_entry();
        match entry {
            IntegrationEntry::Jira(j) => {
                assert_eq!(j.project_key, "ENG");
                // Unchecked toggle is omitted from the wire, not sent false
                assert_eq!(j.enable_software_vulnerabilities, None);
            }
            IntegrationEntry::Zendesk(_) => panic!("expected jira entry"),
        }

        let entry = zendesk_form().into_entry();
        match entry {
            IntegrationEntry::Zendesk(z) => {
                assert_eq!(z.group_id, 12345);
                assert_eq!(z.enable_software_vulnerabilities, Some(true));
            }
            IntegrationEntry::Jira(_) => panic!("expected zendesk entry"),
        }
    }

    #[test]
    fn from_row_round_trips_through_form() {
        use crate::model::integration::{Integrations, ZendeskIntegration};
        use crate::model::table::table_rows;

        let ints = Integrations {
            jira: vec![],
            zendesk: vec![ZendeskIntegration {
                url: "https://x.zendesk.com".into(),
                email: "x@example.com".into(),
                api_token: "tok".into(),
                group_id: 99,
                enable_failing_policies: None,
                enable_software_vulnerabilities: Some(true),
            }],
        };
        let rows = table_rows(&ints);
        let form = IntegrationFormData::from_row(&rows[0]);
        assert_eq!(form.kind, IntegrationKind::Zendesk);
        assert_eq!(form.group_id, "99");
        assert!(form.enable_software_vulnerabilities);

        match form.into_entry() {
            IntegrationEntry::Zendesk(z) => {
                assert_eq!(z, ints.zendesk[0]);
            }
            IntegrationEntry::Jira(_) => panic!("expected zendesk entry"),
        }
    }
}
