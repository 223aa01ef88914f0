//! Form state for the auth screens, the application dialogs and settings

use std::path::PathBuf;
use std::sync::LazyLock;

use regex::Regex;

use crate::api::{ApplicationResponse, ApplicationStatus, ProfileUpdate, User};

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\S+@\S+\.\S+").expect("email pattern compiles"));

pub const MIN_PASSWORD_LEN: usize = 6;

pub const REJECTION_REASONS: &[&str] = &[
    "Insufficient content",
    "Content quality does not meet standards",
    "Copyright concerns",
    "Incomplete profile information",
    "Inappropriate content",
    "Duplicate application",
    "Other",
];

/// (value sent to the backend, label shown)
pub const COUNTRIES: &[(&str, &str)] = &[
    ("AU", "Australia"),
    ("BR", "Brazil"),
    ("CA", "Canada"),
    ("CN", "China"),
    ("FR", "France"),
    ("DE", "Germany"),
    ("IN", "India"),
    ("ID", "Indonesia"),
    ("IT", "Italy"),
    ("JP", "Japan"),
    ("KR", "South Korea"),
    ("MX", "Mexico"),
    ("NL", "Netherlands"),
    ("ES", "Spain"),
    ("SE", "Sweden"),
    ("TH", "Thailand"),
    ("GB", "United Kingdom"),
    ("US", "United States"),
    ("VN", "Vietnam"),
];

pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if email.trim().is_empty() {
        Err("Email is required")
    } else if !EMAIL_PATTERN.is_match(email) {
        Err("Email is invalid")
    } else {
        Ok(())
    }
}

/// Keyboard editing shared by every multi-field form
pub trait Form {
    fn field_count(&self) -> usize;
    fn focus(&self) -> usize;
    fn set_focus(&mut self, index: usize);
    /// Text behind a field; `None` for fields that are not free text
    fn field_mut(&mut self, index: usize) -> Option<&mut String>;

    fn focus_next(&mut self) {
        let next = (self.focus() + 1) % self.field_count().max(1);
        self.set_focus(next);
    }

    fn focus_prev(&mut self) {
        let count = self.field_count().max(1);
        self.set_focus((self.focus() + count - 1) % count);
    }

    fn insert_char(&mut self, c: char) {
        let focus = self.focus();
        if let Some(value) = self.field_mut(focus) {
            value.push(c);
        }
    }

    fn backspace(&mut self) {
        let focus = self.focus();
        if let Some(value) = self.field_mut(focus) {
            value.pop();
        }
    }
}

// ============================================================================
// Auth
// ============================================================================

#[derive(Clone, Debug, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub focus: usize,
    pub error: Option<String>,
}

impl LoginForm {
    pub fn validate(&mut self) -> bool {
        let result = validate_email(&self.email).and_then(|_| {
            if self.password.is_empty() {
                Err("Password is required")
            } else {
                Ok(())
            }
        });
        self.error = result.err().map(str::to_string);
        self.error.is_none()
    }
}

impl Form for LoginForm {
    fn field_count(&self) -> usize {
        2
    }

    fn focus(&self) -> usize {
        self.focus
    }

    fn set_focus(&mut self, index: usize) {
        self.focus = index;
    }

    fn field_mut(&mut self, index: usize) -> Option<&mut String> {
        self.error = None;
        match index {
            0 => Some(&mut self.email),
            1 => Some(&mut self.password),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ForgotPasswordForm {
    pub email: String,
    pub error: Option<String>,
}

impl ForgotPasswordForm {
    pub fn validate(&mut self) -> bool {
        self.error = validate_email(&self.email).err().map(str::to_string);
        self.error.is_none()
    }
}

impl Form for ForgotPasswordForm {
    fn field_count(&self) -> usize {
        1
    }

    fn focus(&self) -> usize {
        0
    }

    fn set_focus(&mut self, _index: usize) {}

    fn field_mut(&mut self, _index: usize) -> Option<&mut String> {
        // Typing clears the previous validation message.
        self.error = None;
        Some(&mut self.email)
    }
}

#[derive(Clone, Debug, Default)]
pub struct OtpForm {
    /// Address the code was sent to
    pub email: String,
    pub otp: String,
    pub is_password_reset: bool,
    pub error: Option<String>,
}

impl OtpForm {
    pub fn validate(&mut self) -> bool {
        let otp = self.otp.trim();
        self.error = if otp.is_empty() {
            Some("Code is required".to_string())
        } else if !otp.chars().all(|c| c.is_ascii_digit()) {
            Some("Code must contain digits only".to_string())
        } else {
            None
        };
        self.error.is_none()
    }
}

impl Form for OtpForm {
    fn field_count(&self) -> usize {
        1
    }

    fn focus(&self) -> usize {
        0
    }

    fn set_focus(&mut self, _index: usize) {}

    fn field_mut(&mut self, _index: usize) -> Option<&mut String> {
        self.error = None;
        Some(&mut self.otp)
    }
}

#[derive(Clone, Debug, Default)]
pub struct ResetPasswordForm {
    pub email: String,
    pub otp: String,
    pub password: String,
    pub confirm: String,
    pub focus: usize,
    pub error: Option<String>,
}

impl ResetPasswordForm {
    pub fn validate(&mut self) -> bool {
        self.error = if self.password.chars().count() < MIN_PASSWORD_LEN {
            Some(format!("Password must be at least {} characters", MIN_PASSWORD_LEN))
        } else if self.password != self.confirm {
            Some("Passwords do not match".to_string())
        } else {
            None
        };
        self.error.is_none()
    }
}

impl Form for ResetPasswordForm {
    fn field_count(&self) -> usize {
        2
    }

    fn focus(&self) -> usize {
        self.focus
    }

    fn set_focus(&mut self, index: usize) {
        self.focus = index;
    }

    fn field_mut(&mut self, index: usize) -> Option<&mut String> {
        self.error = None;
        match index {
            0 => Some(&mut self.password),
            1 => Some(&mut self.confirm),
            _ => None,
        }
    }
}

// ============================================================================
// Artist application decision
// ============================================================================

/// Data entered in the approve / reject dialogs
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ApplicationDecision {
    /// Index into [`REJECTION_REASONS`]
    pub rejection_reason: Option<usize>,
    pub details: String,
}

impl ApplicationDecision {
    pub fn reason_label(&self) -> Option<&'static str> {
        self.rejection_reason.and_then(|i| REJECTION_REASONS.get(i).copied())
    }

    pub fn next_reason(&mut self) {
        self.rejection_reason = Some(match self.rejection_reason {
            Some(i) => (i + 1) % REJECTION_REASONS.len(),
            None => 0,
        });
    }

    pub fn prev_reason(&mut self) {
        let len = REJECTION_REASONS.len();
        self.rejection_reason = Some(match self.rejection_reason {
            Some(i) => (i + len - 1) % len,
            None => len - 1,
        });
    }

    pub fn can_confirm(&self, status: ApplicationStatus, responding: bool) -> bool {
        if responding {
            return false;
        }
        match status {
            ApplicationStatus::Reject => self.reason_label().is_some(),
            _ => true,
        }
    }

    pub fn response(&self, status: ApplicationStatus) -> ApplicationResponse {
        ApplicationResponse {
            status,
            details: self.details.clone(),
            rejection_reason: self.reason_label().unwrap_or_default().to_string(),
        }
    }
}

// ============================================================================
// Settings
// ============================================================================

pub const PROFILE_FIELDS: [&str; 9] = [
    "Full name",
    "Instagram",
    "Twitter",
    "YouTube",
    "Facebook",
    "Website",
    "Country",
    "Bio",
    "Avatar file",
];

pub const COUNTRY_FIELD: usize = 6;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProfileForm {
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub instagram: String,
    pub twitter: String,
    pub youtube: String,
    pub facebook: String,
    pub website: String,
    /// Index into [`COUNTRIES`]
    pub country: Option<usize>,
    pub biography: String,
    pub avatar_path: String,
    pub focus: usize,
}

impl ProfileForm {
    pub fn from_user(user: &User) -> Self {
        let text = |v: &Option<String>| v.clone().unwrap_or_default();
        Self {
            username: user.username.clone(),
            email: user.email.clone(),
            full_name: user.full_name.clone(),
            instagram: text(&user.instagram),
            twitter: text(&user.twitter),
            youtube: text(&user.youtube),
            facebook: text(&user.facebook),
            website: text(&user.website),
            country: user
                .country
                .as_deref()
                .and_then(|c| COUNTRIES.iter().position(|(value, _)| *value == c)),
            biography: text(&user.biography),
            avatar_path: String::new(),
            focus: 0,
        }
    }

    pub fn country_label(&self) -> &'static str {
        self.country
            .and_then(|i| COUNTRIES.get(i))
            .map(|(_, label)| *label)
            .unwrap_or("Select a country")
    }

    pub fn cycle_country(&mut self, forward: bool) {
        let len = COUNTRIES.len();
        self.country = Some(match (self.country, forward) {
            (Some(i), true) => (i + 1) % len,
            (Some(i), false) => (i + len - 1) % len,
            (None, true) => 0,
            (None, false) => len - 1,
        });
    }

    /// Value of a field for display, in [`PROFILE_FIELDS`] order
    pub fn value(&self, index: usize) -> &str {
        match index {
            0 => &self.full_name,
            1 => &self.instagram,
            2 => &self.twitter,
            3 => &self.youtube,
            4 => &self.facebook,
            5 => &self.website,
            COUNTRY_FIELD => self.country_label(),
            7 => &self.biography,
            8 => &self.avatar_path,
            _ => "",
        }
    }

    pub fn to_update(&self) -> ProfileUpdate {
        let avatar = self.avatar_path.trim();
        ProfileUpdate {
            full_name: self.full_name.trim().to_string(),
            instagram: self.instagram.trim().to_string(),
            twitter: self.twitter.trim().to_string(),
            youtube: self.youtube.trim().to_string(),
            facebook: self.facebook.trim().to_string(),
            website: self.website.trim().to_string(),
            country: self
                .country
                .and_then(|i| COUNTRIES.get(i))
                .map(|(value, _)| value.to_string())
                .unwrap_or_default(),
            biography: self.biography.clone(),
            avatar: (!avatar.is_empty()).then(|| PathBuf::from(avatar)),
        }
    }
}

impl Form for ProfileForm {
    fn field_count(&self) -> usize {
        PROFILE_FIELDS.len()
    }

    fn focus(&self) -> usize {
        self.focus
    }

    fn set_focus(&mut self, index: usize) {
        self.focus = index;
    }

    fn field_mut(&mut self, index: usize) -> Option<&mut String> {
        match index {
            0 => Some(&mut self.full_name),
            1 => Some(&mut self.instagram),
            2 => Some(&mut self.twitter),
            3 => Some(&mut self.youtube),
            4 => Some(&mut self.facebook),
            5 => Some(&mut self.website),
            7 => Some(&mut self.biography),
            8 => Some(&mut self.avatar_path),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_validation() {
        assert_eq!(validate_email("   "), Err("Email is required"));
        assert_eq!(validate_email("neo"), Err("Email is invalid"));
        assert_eq!(validate_email("neo@matrix"), Err("Email is invalid"));
        assert_eq!(validate_email("neo@matrix.io"), Ok(()));
    }

    #[test]
    fn test_forgot_password_error_clears_on_typing() {
        let mut form = ForgotPasswordForm::default();
        assert!(!form.validate());
        assert_eq!(form.error.as_deref(), Some("Email is required"));

        form.insert_char('a');
        assert_eq!(form.error, None);
        assert_eq!(form.email, "a");
    }

    #[test]
    fn test_reset_password_rules() {
        let mut form = ResetPasswordForm::default();
        form.password = "abc".into();
        assert!(!form.validate());

        form.password = "hunter22".into();
        form.confirm = "hunter23".into();
        assert!(!form.validate());
        assert_eq!(form.error.as_deref(), Some("Passwords do not match"));

        form.confirm = "hunter22".into();
        assert!(form.validate());
    }

    #[test]
    fn test_focus_wraps() {
        let mut form = LoginForm::default();
        form.focus_prev();
        assert_eq!(form.focus, 1);
        form.focus_next();
        assert_eq!(form.focus, 0);
    }

    #[test]
    fn test_reject_needs_reason_and_idle_dialog() {
        let mut decision = ApplicationDecision::default();
        assert!(!decision.can_confirm(ApplicationStatus::Reject, false));
        assert!(decision.can_confirm(ApplicationStatus::Approve, false));

        decision.next_reason();
        assert_eq!(decision.reason_label(), Some(REJECTION_REASONS[0]));
        assert!(decision.can_confirm(ApplicationStatus::Reject, false));
        assert!(!decision.can_confirm(ApplicationStatus::Reject, true));

        decision.details = "thanks".into();
        let response = decision.response(ApplicationStatus::Reject);
        assert_eq!(response.rejection_reason, REJECTION_REASONS[0]);
        assert_eq!(response.details, "thanks");
    }

    #[test]
    fn test_profile_form_round_trip() {
        let user = User {
            username: "neo".into(),
            full_name: "Thomas".into(),
            country: Some("JP".into()),
            website: Some(" https://neo.dev ".into()),
            ..Default::default()
        };
        let mut form = ProfileForm::from_user(&user);
        assert_eq!(form.country_label(), "Japan");
        assert_eq!(form.value(COUNTRY_FIELD), "Japan");

        form.set_focus(COUNTRY_FIELD);
        form.insert_char('x');
        assert_eq!(form.country_label(), "Japan");

        let update = form.to_update();
        assert_eq!(update.country, "JP");
        assert_eq!(update.website, "https://neo.dev");
        assert_eq!(update.avatar, None);
    }
}
